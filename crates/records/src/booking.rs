//! Booking requests submitted from the public booking page.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salonbook_core::{DocumentId, DomainError, DomainResult, SalonId};

use crate::record::{CollectionRecord, is_plausible_email, require_non_empty};
use crate::{Collection, Service};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub salon_id: SalonId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<DocumentId>,
    #[serde(default)]
    pub service_ids: Vec<DocumentId>,
    pub client_name: String,
    pub client_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    /// Price estimate captured at submission time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_total_cents: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl BookingRequest {
    /// Estimated spend: the captured estimate, else the current price of each
    /// requested service that is still on the menu.
    pub fn estimated_spend(&self, services: &HashMap<DocumentId, Service>) -> u64 {
        match self.estimated_total_cents {
            Some(total) => total,
            None => self
                .service_ids
                .iter()
                .filter_map(|id| services.get(id))
                .map(|s| s.price_cents)
                .sum(),
        }
    }
}

impl CollectionRecord for BookingRequest {
    const COLLECTION: Collection = Collection::BookingRequests;

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("clientName", &self.client_name)?;
        if !is_plausible_email(&self.client_email) {
            return Err(DomainError::validation("clientEmail is not a valid address"));
        }
        Ok(())
    }
}

/// A field-level form error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Booking page form input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    #[serde(default)]
    pub provider_id: Option<DocumentId>,
    #[serde(default)]
    pub service_ids: Vec<DocumentId>,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    pub requested_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingForm {
    /// Validate every field; all failures are reported, not just the first.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.client_name.trim().is_empty() {
            errors.push(FieldError::new("clientName", "name is required"));
        }
        if !is_plausible_email(&self.client_email) {
            errors.push(FieldError::new("clientEmail", "a valid email is required"));
        }
        if let Some(phone) = &self.client_phone {
            let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
            if digits < 7 {
                errors.push(FieldError::new("clientPhone", "phone number is too short"));
            }
        }
        if self.service_ids.is_empty() {
            errors.push(FieldError::new("serviceIds", "select at least one service"));
        }
        if self.requested_at <= now {
            errors.push(FieldError::new("requestedAt", "requested time must be in the future"));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Turn a valid form into a pending booking request, pricing it from the menu.
    pub fn into_request(
        self,
        salon_id: SalonId,
        services: &HashMap<DocumentId, Service>,
        now: DateTime<Utc>,
    ) -> Result<BookingRequest, Vec<FieldError>> {
        self.validate(now)?;

        let unknown: Vec<&DocumentId> = self
            .service_ids
            .iter()
            .filter(|id| !services.contains_key(*id))
            .collect();
        if !unknown.is_empty() {
            return Err(vec![FieldError::new(
                "serviceIds",
                format!("unknown services: {unknown:?}"),
            )]);
        }

        let estimate = self
            .service_ids
            .iter()
            .filter_map(|id| services.get(id))
            .map(|s| s.price_cents)
            .sum();

        Ok(BookingRequest {
            salon_id,
            provider_id: self.provider_id,
            service_ids: self.service_ids,
            client_name: self.client_name.trim().to_string(),
            client_email: self.client_email.trim().to_lowercase(),
            client_phone: self.client_phone,
            requested_at: self.requested_at,
            notes: self.notes,
            status: BookingStatus::Pending,
            estimated_total_cents: Some(estimate),
            created_at: Some(now),
        })
    }
}
