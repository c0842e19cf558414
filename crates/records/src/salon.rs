use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salonbook_core::{DomainError, DomainResult, Identity, SalonId};

use crate::Collection;
use crate::record::{CollectionRecord, is_plausible_email, require_non_empty};

/// Salon (tenant) document.
///
/// `owner_id` is the explicit ownership relation. Older documents omit it;
/// for those the salon's key is its owner's identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salon {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Identity>,
    pub name: String,
    /// Public booking-page slug; salons with a slug are discoverable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub settings: SalonSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalonSettings {
    pub timezone: String,
    pub currency: String,
    pub allow_online_booking: bool,
    /// Minimum notice for online bookings.
    pub booking_lead_minutes: u32,
}

impl Default for SalonSettings {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            currency: "USD".to_string(),
            allow_online_booking: true,
            booking_lead_minutes: 60,
        }
    }
}

impl Salon {
    /// Resolve the owning identity of the salon stored under `salon_id`.
    pub fn owner(&self, salon_id: &SalonId) -> Option<Identity> {
        match &self.owner_id {
            Some(owner) => Some(owner.clone()),
            None => Identity::parse(salon_id.as_str()).ok(),
        }
    }
}

impl CollectionRecord for Salon {
    const COLLECTION: Collection = Collection::Salons;

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("name", &self.name)?;
        if let Some(slug) = &self.slug {
            let valid = !slug.is_empty()
                && slug
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
            if !valid {
                return Err(DomainError::validation(
                    "slug must be lowercase letters, digits and dashes",
                ));
            }
        }
        if let Some(email) = &self.email {
            if !is_plausible_email(email) {
                return Err(DomainError::validation("email is not a valid address"));
            }
        }
        require_non_empty("settings.currency", &self.settings.currency)
    }
}
