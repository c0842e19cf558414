use core::str::FromStr;

use serde::{Deserialize, Serialize};

use salonbook_core::DomainError;

/// Every document collection the application stores.
///
/// The camelCase names are the wire contract shared with existing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Salons,
    Providers,
    Services,
    BookingRequests,
    TeamMembers,
    Invitations,
    LoyaltyPrograms,
    CustomerPasses,
    VisitRecords,
    Clients,
    ShiftChangeRequests,
    SessionTracking,
    Sessions,
}

impl Collection {
    pub const ALL: [Collection; 13] = [
        Collection::Salons,
        Collection::Providers,
        Collection::Services,
        Collection::BookingRequests,
        Collection::TeamMembers,
        Collection::Invitations,
        Collection::LoyaltyPrograms,
        Collection::CustomerPasses,
        Collection::VisitRecords,
        Collection::Clients,
        Collection::ShiftChangeRequests,
        Collection::SessionTracking,
        Collection::Sessions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Salons => "salons",
            Collection::Providers => "providers",
            Collection::Services => "services",
            Collection::BookingRequests => "bookingRequests",
            Collection::TeamMembers => "teamMembers",
            Collection::Invitations => "invitations",
            Collection::LoyaltyPrograms => "loyaltyPrograms",
            Collection::CustomerPasses => "customerPasses",
            Collection::VisitRecords => "visitRecords",
            Collection::Clients => "clients",
            Collection::ShiftChangeRequests => "shiftChangeRequests",
            Collection::SessionTracking => "sessionTracking",
            Collection::Sessions => "sessions",
        }
    }

    /// Whether documents in this collection are scoped by a `salonId` field.
    pub fn is_salon_scoped(&self) -> bool {
        !matches!(self, Collection::Salons)
    }
}

impl core::fmt::Display for Collection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::invalid_id(format!("unknown collection '{s}'")))
    }
}
