//! `salonbook-core`: shared domain primitives.
//!
//! Identifiers and the domain error model. No IO, no HTTP.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{DocumentId, Identity, SalonId};
