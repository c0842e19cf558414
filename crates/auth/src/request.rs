//! The operation being authorized.

use serde::{Deserialize, Serialize};

use salonbook_core::{DocumentId, Identity, SalonId};
use salonbook_records::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Fetch one document.
    Read,
    /// Query a collection.
    List,
    /// Store a new document.
    Create,
    /// Update or delete an existing document.
    Write,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Write => "write",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" | "get" => Ok(Operation::Read),
            "list" => Ok(Operation::List),
            "create" => Ok(Operation::Create),
            "write" | "update" | "delete" => Ok(Operation::Write),
            other => Err(format!("unknown operation '{other}'")),
        }
    }
}

/// The fields of a document body the policy looks at.
///
/// Extracted leniently from raw JSON: a missing, null, or malformed value is
/// `None`, which every scoped clause treats as "no access".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFields {
    pub salon_id: Option<SalonId>,
    pub slug: Option<String>,
    pub user_id: Option<Identity>,
    pub provider_id: Option<Identity>,
    pub owner_id: Option<Identity>,
    /// Invited address, normalized to lowercase.
    pub email: Option<String>,
}

fn string_field<'a>(body: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(serde_json::Value::as_str)
}

impl DocumentFields {
    pub fn from_json(body: &serde_json::Value) -> Self {
        Self {
            salon_id: string_field(body, "salonId").and_then(|s| SalonId::parse(s).ok()),
            slug: string_field(body, "slug").map(str::to_string),
            user_id: string_field(body, "userId").and_then(|s| Identity::parse(s).ok()),
            provider_id: string_field(body, "providerId").and_then(|s| Identity::parse(s).ok()),
            owner_id: string_field(body, "ownerId").and_then(|s| Identity::parse(s).ok()),
            email: string_field(body, "email")
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// One access decision's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    pub operation: Operation,
    pub collection: Collection,
    pub document_id: Option<DocumentId>,
    /// Stored document (read/write).
    pub existing: Option<DocumentFields>,
    /// Incoming document (create/update; `None` for delete).
    pub proposed: Option<DocumentFields>,
    /// Salon the listing is restricted to, if any.
    pub list_scope: Option<SalonId>,
}

impl AccessRequest {
    pub fn read(
        collection: Collection,
        id: DocumentId,
        existing: Option<&serde_json::Value>,
    ) -> Self {
        Self {
            operation: Operation::Read,
            collection,
            document_id: Some(id),
            existing: existing.map(DocumentFields::from_json),
            proposed: None,
            list_scope: None,
        }
    }

    pub fn list(collection: Collection, scope: Option<SalonId>) -> Self {
        Self {
            operation: Operation::List,
            collection,
            document_id: None,
            existing: None,
            proposed: None,
            list_scope: scope,
        }
    }

    pub fn create(collection: Collection, id: DocumentId, proposed: &serde_json::Value) -> Self {
        Self {
            operation: Operation::Create,
            collection,
            document_id: Some(id),
            existing: None,
            proposed: Some(DocumentFields::from_json(proposed)),
            list_scope: None,
        }
    }

    /// Update (`proposed` is `Some`) or delete (`proposed` is `None`).
    pub fn write(
        collection: Collection,
        id: DocumentId,
        existing: Option<&serde_json::Value>,
        proposed: Option<&serde_json::Value>,
    ) -> Self {
        Self {
            operation: Operation::Write,
            collection,
            document_id: Some(id),
            existing: existing.map(DocumentFields::from_json),
            proposed: proposed.map(DocumentFields::from_json),
            list_scope: None,
        }
    }

    /// Salon whose access gates this request, by operation.
    pub fn scope(&self) -> Option<&SalonId> {
        match self.operation {
            Operation::Read | Operation::Write => {
                self.existing.as_ref().and_then(|d| d.salon_id.as_ref())
            }
            Operation::Create => self.proposed.as_ref().and_then(|d| d.salon_id.as_ref()),
            Operation::List => self.list_scope.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_and_malformed_fields_are_absent() {
        let fields = DocumentFields::from_json(&json!({
            "salonId": null,
            "userId": 42,
            "providerId": "",
            "slug": "glow-studio",
            "email": " Ana@Example.com "
        }));
        assert_eq!(fields.salon_id, None);
        assert_eq!(fields.user_id, None);
        assert_eq!(fields.provider_id, None);
        assert_eq!(fields.slug.as_deref(), Some("glow-studio"));
        assert_eq!(fields.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn scope_follows_operation() {
        let id = DocumentId::parse("d1").unwrap();
        let body = json!({ "salonId": "s1" });
        assert_eq!(
            AccessRequest::create(Collection::Clients, id.clone(), &body).scope().map(|s| s.as_str()),
            Some("s1")
        );
        assert_eq!(AccessRequest::read(Collection::Clients, id, None).scope(), None);
        assert_eq!(
            AccessRequest::list(Collection::Clients, Some(SalonId::parse("s2").unwrap()))
                .scope()
                .map(|s| s.as_str()),
            Some("s2")
        );
    }

    #[test]
    fn operation_aliases() {
        assert_eq!("update".parse::<Operation>().unwrap(), Operation::Write);
        assert_eq!("get".parse::<Operation>().unwrap(), Operation::Read);
        assert!("patch".parse::<Operation>().is_err());
    }
}
