//! Query strings and response shapes.

use serde::{Deserialize, Serialize};

use salonbook_core::DocumentId;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub salon_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RosterQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainQuery {
    pub collection: String,
    pub operation: String,
    pub id: Option<String>,
    /// Scope for `list`, or the proposed `salonId` for `create`.
    pub salon_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub id: DocumentId,
    pub estimated_total_cents: Option<u64>,
}

pub fn items<T: Serialize>(items: Vec<T>) -> serde_json::Value {
    serde_json::json!({ "items": items })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollPass {
    pub program_id: String,
    pub client_email: String,
}
