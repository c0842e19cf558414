use serde::{Deserialize, Serialize};

use salonbook_core::{DocumentId, DomainError, DomainResult, Identity, SalonId};

use crate::Collection;
use crate::record::{CollectionRecord, require_non_empty};

/// A bookable staff member shown on the booking page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub salon_id: SalonId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Account of the staff member, when the provider has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Identity>,
    #[serde(default)]
    pub service_ids: Vec<DocumentId>,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Provider {
    pub fn offers(&self, service_id: &DocumentId) -> bool {
        self.service_ids.iter().any(|s| s == service_id)
    }
}

impl CollectionRecord for Provider {
    const COLLECTION: Collection = Collection::Providers;

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("name", &self.name)
    }
}

/// A menu item with duration and price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub salon_id: SalonId,
    pub name: String,
    pub duration_minutes: u32,
    pub price_cents: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CollectionRecord for Service {
    const COLLECTION: Collection = Collection::Services;

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("name", &self.name)?;
        if self.duration_minutes == 0 {
            return Err(DomainError::validation("durationMinutes must be positive"));
        }
        Ok(())
    }
}
