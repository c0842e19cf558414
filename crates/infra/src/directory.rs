//! Policy lookups answered from the document store.

use salonbook_auth::PolicyDirectory;
use salonbook_core::{Identity, SalonId};
use salonbook_records::{Collection, Record, Salon};

use crate::store::DocumentStore;

/// [`PolicyDirectory`] over stored `teamMembers` and `salons` documents.
#[derive(Debug, Clone)]
pub struct StoreDirectory<S> {
    store: S,
}

impl<S> StoreDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: DocumentStore> PolicyDirectory for StoreDirectory<S> {
    fn team_member_salon(&self, identity: &Identity) -> Option<SalonId> {
        let body = self.store.get(Collection::TeamMembers, &identity.as_document_id())?;
        body.get("salonId")
            .and_then(serde_json::Value::as_str)
            .and_then(|s| SalonId::parse(s).ok())
    }

    fn salon_owner(&self, salon_id: &SalonId) -> Option<Identity> {
        let id = salon_id.as_document_id();
        let body = self.store.get(Collection::Salons, &id)?;
        match Record::<Salon>::decode(id, &body) {
            Ok(salon) => salon.data.owner(salon_id),
            Err(e) => {
                // A stored salon that no longer decodes still has the legacy owner.
                tracing::warn!(salon = %salon_id, "undecodable salon document: {e}");
                Identity::parse(salon_id.as_str()).ok()
            }
        }
    }
}
