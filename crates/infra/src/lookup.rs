//! Typed lookups used by the booking page and the dashboard.
//!
//! These fetch and decode only; callers authorize first.

use std::collections::HashMap;

use salonbook_core::{DocumentId, DomainError, DomainResult, SalonId};
use salonbook_records::{
    BookingRequest, ClientSummary, CollectionRecord, Provider, Record, Salon, Service,
    client_roster,
};

use crate::store::DocumentStore;

#[derive(Debug, Clone)]
pub struct SalonLookup<S> {
    store: S,
}

impl<S: DocumentStore> SalonLookup<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn fetch<T: CollectionRecord>(&self, id: &DocumentId) -> DomainResult<Record<T>> {
        let body = self
            .store
            .get(T::COLLECTION, id)
            .ok_or(DomainError::NotFound)?;
        Record::decode(id.clone(), &body)
    }

    /// Decode every document of `T` scoped to the salon, skipping (and
    /// logging) documents that no longer match the record shape.
    fn scoped<T: CollectionRecord>(&self, salon_id: &SalonId) -> Vec<Record<T>> {
        let collection = T::COLLECTION;
        self.store
            .list_for_salon(collection, salon_id)
            .into_iter()
            .filter_map(|(id, body)| match Record::<T>::decode(id, &body) {
                Ok(rec) => Some(rec),
                Err(e) => {
                    tracing::warn!(%collection, salon = %salon_id, "skipping document: {e}");
                    None
                }
            })
            .collect()
    }

    pub fn get_provider(&self, id: &DocumentId) -> DomainResult<Record<Provider>> {
        self.fetch(id)
    }

    pub fn get_salon(&self, id: &SalonId) -> DomainResult<Record<Salon>> {
        self.fetch(&id.as_document_id())
    }

    /// Booking requests for a salon, newest request time first.
    pub fn list_booking_requests(&self, salon_id: &SalonId) -> Vec<Record<BookingRequest>> {
        let mut rows = self.scoped::<BookingRequest>(salon_id);
        rows.sort_by(|a, b| {
            b.data
                .requested_at
                .cmp(&a.data.requested_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        rows
    }

    pub fn services_by_id(&self, salon_id: &SalonId) -> HashMap<DocumentId, Service> {
        self.scoped::<Service>(salon_id)
            .into_iter()
            .map(|rec| (rec.id, rec.data))
            .collect()
    }

    pub fn client_roster(&self, salon_id: &SalonId) -> Vec<ClientSummary> {
        let bookings = self.list_booking_requests(salon_id);
        let services = self.services_by_id(salon_id);
        client_roster(&bookings, &services)
    }
}
