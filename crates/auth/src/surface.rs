//! Explicitly public parts of the policy.
//!
//! Each flag opens one class of access to callers with no relationship to the
//! salon. Defaults keep the deployed behavior (all open); turning a flag off
//! leaves only the scoped clauses for that operation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicSurface {
    /// Any caller may read any salon document.
    pub salon_reads: bool,
    /// Any caller may list the salons collection.
    pub salon_listing: bool,
    /// Any caller may read providers and services.
    pub catalog_reads: bool,
    /// Any caller may list providers and services.
    pub catalog_listing: bool,
    /// Any caller may list the sessions collection.
    pub session_listing: bool,
    /// Any authenticated caller may read and list booking requests.
    pub authenticated_booking_reads: bool,
}

impl Default for PublicSurface {
    fn default() -> Self {
        Self {
            salon_reads: true,
            salon_listing: true,
            catalog_reads: true,
            catalog_listing: true,
            session_listing: true,
            authenticated_booking_reads: true,
        }
    }
}

impl PublicSurface {
    /// Everything scoped: only owners, members, admins and explicit clauses.
    pub fn closed() -> Self {
        Self {
            salon_reads: false,
            salon_listing: false,
            catalog_reads: false,
            catalog_listing: false,
            session_listing: false,
            authenticated_booking_reads: false,
        }
    }
}
