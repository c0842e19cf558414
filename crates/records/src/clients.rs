//! Client records and the dashboard's client roster.
//!
//! The roster is derived from booking requests: requests are grouped by
//! client email (case-insensitive) and their estimated spend summed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salonbook_core::{DocumentId, DomainError, DomainResult, SalonId};

use crate::record::{CollectionRecord, Record, is_plausible_email, require_non_empty};
use crate::{BookingRequest, BookingStatus, Collection, Service};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub salon_id: SalonId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CollectionRecord for Client {
    const COLLECTION: Collection = Collection::Clients;

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("name", &self.name)?;
        if !is_plausible_email(&self.email) {
            return Err(DomainError::validation("email is not a valid address"));
        }
        Ok(())
    }
}

/// One row of the client roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    /// Normalized (trimmed, lowercase) email; the grouping key.
    pub email: String,
    /// Name from the client's most recent request.
    pub name: String,
    pub phone: Option<String>,
    pub request_count: usize,
    pub confirmed_count: usize,
    pub total_estimated_cents: u64,
    pub last_requested_at: DateTime<Utc>,
}

/// Group booking requests by client and total their estimated spend.
///
/// Declined and cancelled requests still count as requests but add nothing to
/// spend. Rows are ordered by spend (highest first), then by email.
pub fn client_roster(
    bookings: &[Record<BookingRequest>],
    services: &HashMap<DocumentId, Service>,
) -> Vec<ClientSummary> {
    let mut by_email: HashMap<String, ClientSummary> = HashMap::new();

    for booking in bookings {
        let b = &booking.data;
        let key = b.client_email.trim().to_lowercase();
        let spend = match b.status {
            BookingStatus::Declined | BookingStatus::Cancelled => 0,
            BookingStatus::Pending | BookingStatus::Confirmed => b.estimated_spend(services),
        };
        let confirmed = usize::from(b.status == BookingStatus::Confirmed);

        by_email
            .entry(key.clone())
            .and_modify(|row| {
                row.request_count += 1;
                row.confirmed_count += confirmed;
                row.total_estimated_cents += spend;
                if b.requested_at >= row.last_requested_at {
                    row.last_requested_at = b.requested_at;
                    row.name = b.client_name.clone();
                    if b.client_phone.is_some() {
                        row.phone = b.client_phone.clone();
                    }
                }
            })
            .or_insert_with(|| ClientSummary {
                email: key,
                name: b.client_name.clone(),
                phone: b.client_phone.clone(),
                request_count: 1,
                confirmed_count: confirmed,
                total_estimated_cents: spend,
                last_requested_at: b.requested_at,
            });
    }

    let mut rows: Vec<ClientSummary> = by_email.into_values().collect();
    rows.sort_by(|a, b| {
        b.total_estimated_cents
            .cmp(&a.total_estimated_cents)
            .then_with(|| a.email.cmp(&b.email))
    });
    rows
}

/// Case-insensitive substring search over name and email.
pub fn filter_roster<'a>(rows: &'a [ClientSummary], query: &str) -> Vec<&'a ClientSummary> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return rows.iter().collect();
    }
    rows.iter()
        .filter(|r| r.email.contains(&q) || r.name.to_lowercase().contains(&q))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn booking(
        id: &str,
        email: &str,
        name: &str,
        cents: u64,
        status: BookingStatus,
        at: DateTime<Utc>,
    ) -> Record<BookingRequest> {
        Record {
            id: DocumentId::parse(id).unwrap(),
            data: BookingRequest {
                salon_id: SalonId::parse("s1").unwrap(),
                provider_id: None,
                service_ids: vec![],
                client_name: name.to_string(),
                client_email: email.to_string(),
                client_phone: None,
                requested_at: at,
                notes: None,
                status,
                estimated_total_cents: Some(cents),
                created_at: None,
            },
        }
    }

    #[test]
    fn groups_by_email_case_insensitively() {
        let now = Utc::now();
        let bookings = vec![
            booking("b1", "Ana@Example.com", "Ana", 3000, BookingStatus::Confirmed, now - Duration::days(3)),
            booking("b2", "ana@example.com ", "Ana Silva", 5000, BookingStatus::Pending, now),
            booking("b3", "bo@example.com", "Bo", 9000, BookingStatus::Pending, now),
        ];

        let rows = client_roster(&bookings, &HashMap::new());
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].email, "bo@example.com");
        assert_eq!(rows[1].email, "ana@example.com");
        assert_eq!(rows[1].request_count, 2);
        assert_eq!(rows[1].confirmed_count, 1);
        assert_eq!(rows[1].total_estimated_cents, 8000);
        assert_eq!(rows[1].name, "Ana Silva");
        assert_eq!(rows[1].last_requested_at, now);
    }

    #[test]
    fn declined_requests_add_no_spend() {
        let now = Utc::now();
        let bookings = vec![
            booking("b1", "cy@example.com", "Cy", 4000, BookingStatus::Declined, now),
            booking("b2", "cy@example.com", "Cy", 1000, BookingStatus::Pending, now),
        ];
        let rows = client_roster(&bookings, &HashMap::new());
        assert_eq!(rows[0].request_count, 2);
        assert_eq!(rows[0].total_estimated_cents, 1000);
    }

    #[test]
    fn filter_matches_name_or_email() {
        let now = Utc::now();
        let rows = client_roster(
            &[
                booking("b1", "ana@example.com", "Ana Silva", 1, BookingStatus::Pending, now),
                booking("b2", "bo@shop.io", "Bo", 2, BookingStatus::Pending, now),
            ],
            &HashMap::new(),
        );
        assert_eq!(filter_roster(&rows, "SILVA").len(), 1);
        assert_eq!(filter_roster(&rows, "shop").len(), 1);
        assert_eq!(filter_roster(&rows, "  ").len(), 2);
    }

    proptest! {
        /// Property: the roster's total spend equals the spend of all
        /// non-declined, non-cancelled requests.
        #[test]
        fn roster_preserves_total_spend(
            entries in prop::collection::vec((0usize..4, 0u64..100_000, 0u8..4), 0..40)
        ) {
            let now = Utc::now();
            let emails = ["a@x.io", "B@x.io", "b@x.io", "c@x.io"];
            let bookings: Vec<_> = entries
                .iter()
                .enumerate()
                .map(|(i, (e, cents, s))| {
                    let status = match s {
                        0 => BookingStatus::Pending,
                        1 => BookingStatus::Confirmed,
                        2 => BookingStatus::Declined,
                        _ => BookingStatus::Cancelled,
                    };
                    booking(&format!("b{i}"), emails[*e], "n", *cents, status, now)
                })
                .collect();

            let expected: u64 = bookings
                .iter()
                .filter(|b| matches!(b.data.status, BookingStatus::Pending | BookingStatus::Confirmed))
                .map(|b| b.data.estimated_total_cents.unwrap_or(0))
                .sum();

            let rows = client_roster(&bookings, &HashMap::new());
            let total: u64 = rows.iter().map(|r| r.total_estimated_cents).sum();
            let count: usize = rows.iter().map(|r| r.request_count).sum();

            prop_assert_eq!(total, expected);
            prop_assert_eq!(count, bookings.len());
            prop_assert!(rows.len() <= 3);
        }
    }
}
