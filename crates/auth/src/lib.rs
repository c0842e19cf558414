//! `salonbook-auth`: the document access policy (zero-trust).
//!
//! Every read, list, create and write against a collection is decided here.
//! This crate is intentionally decoupled from HTTP and storage: membership and
//! ownership lookups go through the [`PolicyDirectory`] trait.

pub mod admin;
pub mod authorize;
pub mod caller;
pub mod claims;
pub mod directory;
pub mod request;
pub mod rules;
pub mod surface;

pub use admin::AdminAllowList;
pub use authorize::{
    AuthzError, Denial, DenialKind, Grant, PolicyEvaluator, PolicyExplanation, PublicClause,
};
pub use caller::Caller;
pub use claims::{Hs256JwtValidator, JwtClaims, JwtValidator, TokenValidationError, validate_claims};
pub use directory::PolicyDirectory;
pub use request::{AccessRequest, DocumentFields, Operation};
pub use surface::PublicSurface;
