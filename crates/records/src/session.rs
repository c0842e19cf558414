use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salonbook_core::{DomainError, DomainResult, Identity, SalonId};

use crate::Collection;
use crate::record::CollectionRecord;

/// Visitor session, stored in both `sessions` and `sessionTracking`.
///
/// Sessions are opened before sign-in, so both the salon and the user are
/// optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salon_id: Option<SalonId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Identity>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl CollectionRecord for Session {
    const COLLECTION: Collection = Collection::Sessions;

    fn validate(&self) -> DomainResult<()> {
        if let Some(seen) = self.last_seen_at {
            if seen < self.started_at {
                return Err(DomainError::validation("lastSeenAt precedes startedAt"));
            }
        }
        Ok(())
    }
}
