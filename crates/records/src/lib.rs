//! Salon document records.
//!
//! Typed shapes for every collection the application stores, plus the small
//! amount of dashboard logic built on them (client roster, loyalty stamps,
//! booking form validation). Pure domain code: no IO, no HTTP, no storage.

pub mod booking;
pub mod catalog;
pub mod clients;
pub mod collection;
pub mod loyalty;
pub mod record;
pub mod salon;
pub mod session;
pub mod team;

pub use booking::{BookingForm, BookingRequest, BookingStatus, FieldError};
pub use catalog::{Provider, Service};
pub use clients::{Client, ClientSummary, client_roster, filter_roster};
pub use collection::Collection;
pub use loyalty::{CustomerPass, LoyaltyProgram, VisitRecord};
pub use record::{CollectionRecord, Record, validate_body};
pub use salon::{Salon, SalonSettings};
pub use session::Session;
pub use team::{
    Invitation, InvitationStatus, ShiftChangeRequest, ShiftChangeStatus, TeamMember,
    TeamPermissions, TeamRole,
};
