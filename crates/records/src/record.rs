//! Typed view over a stored document.

use serde::Serialize;
use serde::de::DeserializeOwned;

use salonbook_core::{DocumentId, DomainError, DomainResult};

use crate::{
    BookingRequest, Client, Collection, CustomerPass, Invitation, LoyaltyProgram, Provider,
    Salon, Service, Session, ShiftChangeRequest, TeamMember, VisitRecord,
};

/// A record type stored in exactly one collection.
pub trait CollectionRecord: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    /// Field-level checks beyond what deserialization enforces.
    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }
}

/// A decoded document: its key plus the typed body.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub id: DocumentId,
    pub data: T,
}

impl<T: CollectionRecord> Record<T> {
    /// Decode a raw document body.
    pub fn decode(id: DocumentId, body: &serde_json::Value) -> DomainResult<Self> {
        let data = serde_json::from_value(body.clone()).map_err(|e| {
            DomainError::validation(format!("{}/{}: {}", T::COLLECTION, id, e))
        })?;
        Ok(Self { id, data })
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut body = serde_json::to_value(&self.data).unwrap_or(serde_json::Value::Null);
        if let Some(obj) = body.as_object_mut() {
            obj.insert("id".to_string(), serde_json::Value::String(self.id.to_string()));
        }
        body
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Loose shape check: one `@`, non-empty local part, dotted domain.
pub(crate) fn is_plausible_email(value: &str) -> bool {
    let mut parts = value.trim().split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

fn check<T: CollectionRecord>(body: &serde_json::Value) -> DomainResult<()> {
    let record: T = serde_json::from_value(body.clone())
        .map_err(|e| DomainError::validation(format!("{}: {}", T::COLLECTION, e)))?;
    record.validate()
}

/// Validate a proposed document body against its collection's record type.
pub fn validate_body(collection: Collection, body: &serde_json::Value) -> DomainResult<()> {
    if !body.is_object() {
        return Err(DomainError::validation("document body must be a JSON object"));
    }
    match collection {
        Collection::Salons => check::<Salon>(body),
        Collection::Providers => check::<Provider>(body),
        Collection::Services => check::<Service>(body),
        Collection::BookingRequests => check::<BookingRequest>(body),
        Collection::TeamMembers => check::<TeamMember>(body),
        Collection::Invitations => check::<Invitation>(body),
        Collection::LoyaltyPrograms => check::<LoyaltyProgram>(body),
        Collection::CustomerPasses => check::<CustomerPass>(body),
        Collection::VisitRecords => check::<VisitRecord>(body),
        Collection::Clients => check::<Client>(body),
        Collection::ShiftChangeRequests => check::<ShiftChangeRequest>(body),
        Collection::SessionTracking | Collection::Sessions => check::<Session>(body),
    }
}
