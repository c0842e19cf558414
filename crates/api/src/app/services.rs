//! Service wiring plus the authorize-then-touch-the-store flows behind the routes.
//!
//! Every store access in this module is preceded by a policy decision.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use salonbook_auth::{AccessRequest, Caller, Grant, Operation, PolicyEvaluator, PolicyExplanation};
use salonbook_core::{DocumentId, DomainError, SalonId};
use salonbook_infra::{DocumentStore, InMemoryDocumentStore, SalonLookup, StoreDirectory};
use salonbook_records::{
    BookingForm, BookingRequest, ClientSummary, Collection, CollectionRecord, CustomerPass, Invitation,
    InvitationStatus, LoyaltyProgram, Provider, Record, Salon, TeamMember, VisitRecord, filter_roster,
    validate_body,
};

use crate::app::errors::ApiError;
use crate::config::ApiConfig;

pub type SharedStore = Arc<InMemoryDocumentStore>;

pub struct AppServices {
    store: SharedStore,
    policy: PolicyEvaluator<StoreDirectory<SharedStore>>,
    lookup: SalonLookup<SharedStore>,
}

pub fn build_services(config: &ApiConfig, store: SharedStore) -> AppServices {
    let policy = PolicyEvaluator::new(
        StoreDirectory::new(store.clone()),
        config.admins.clone(),
        config.surface,
    );
    let lookup = SalonLookup::new(store.clone());
    AppServices {
        store,
        policy,
        lookup,
    }
}

fn parse_doc_id(raw: &str) -> Result<DocumentId, ApiError> {
    Ok(DocumentId::parse(raw)?)
}

fn parse_salon_id(raw: &str) -> Result<SalonId, ApiError> {
    Ok(SalonId::parse(raw)?)
}

/// Document bodies are stored without their key.
fn strip_id(mut body: Value) -> Result<Value, ApiError> {
    match body.as_object_mut() {
        Some(map) => {
            map.remove("id");
            Ok(body)
        }
        None => Err(DomainError::validation("document body must be a JSON object").into()),
    }
}

fn with_id(id: &DocumentId, mut body: Value) -> Value {
    if let Some(map) = body.as_object_mut() {
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
    body
}

impl AppServices {
    pub fn policy(&self) -> &PolicyEvaluator<StoreDirectory<SharedStore>> {
        &self.policy
    }

    fn authorize(&self, caller: Option<&Caller>, request: &AccessRequest) -> Result<Grant, ApiError> {
        let grant = self.policy.authorize(caller, request)?;
        tracing::debug!(
            operation = %request.operation,
            collection = %request.collection,
            ?grant,
            "access granted"
        );
        Ok(grant)
    }

    pub fn read_document(
        &self,
        caller: Option<&Caller>,
        collection: &str,
        id: &str,
    ) -> Result<Value, ApiError> {
        let collection = self.policy.resolve_collection(collection, Operation::Read)?;
        let id = parse_doc_id(id)?;
        let existing = self.store.get(collection, &id);

        self.authorize(caller, &AccessRequest::read(collection, id.clone(), existing.as_ref()))?;

        let body = existing.ok_or(DomainError::NotFound)?;
        Ok(with_id(&id, body))
    }

    pub fn list_documents(
        &self,
        caller: Option<&Caller>,
        collection: &str,
        salon_id: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        let collection = self.policy.resolve_collection(collection, Operation::List)?;
        let scope = salon_id.map(parse_salon_id).transpose()?;

        self.authorize(caller, &AccessRequest::list(collection, scope.clone()))?;

        let rows = match &scope {
            Some(salon_id) if collection.is_salon_scoped() => self.store.list_for_salon(collection, salon_id),
            _ => self.store.list(collection),
        };
        Ok(rows.into_iter().map(|(id, body)| with_id(&id, body)).collect())
    }

    /// Create a document; a missing `id` gets a generated one, except for
    /// salons, which are keyed by their owner's identity.
    pub fn create_document(
        &self,
        caller: Option<&Caller>,
        collection: &str,
        id: Option<&str>,
        body: Value,
    ) -> Result<Value, ApiError> {
        let collection = self.policy.resolve_collection(collection, Operation::Create)?;
        let id = match (id, caller) {
            (Some(raw), _) => parse_doc_id(raw)?,
            (None, Some(caller)) if collection == Collection::Salons => {
                SalonId::for_owner(caller.identity()).as_document_id()
            }
            (None, _) => DocumentId::generate(),
        };
        let body = strip_id(body)?;

        self.authorize(caller, &AccessRequest::create(collection, id.clone(), &body))?;
        validate_body(collection, &body)?;

        self.store.create(collection, id.clone(), body.clone())?;
        tracing::info!(%collection, %id, "document created");
        Ok(with_id(&id, body))
    }

    pub fn update_document(
        &self,
        caller: Option<&Caller>,
        collection: &str,
        id: &str,
        body: Value,
    ) -> Result<Value, ApiError> {
        let collection = self.policy.resolve_collection(collection, Operation::Write)?;
        let id = parse_doc_id(id)?;
        let body = strip_id(body)?;
        let existing = self.store.get(collection, &id);

        self.authorize(
            caller,
            &AccessRequest::write(collection, id.clone(), existing.as_ref(), Some(&body)),
        )?;
        let Some(expected) = existing else {
            return Err(DomainError::NotFound.into());
        };
        validate_body(collection, &body)?;

        self.store.replace(collection, id.clone(), &expected, body.clone())?;
        tracing::info!(%collection, %id, "document replaced");
        Ok(with_id(&id, body))
    }

    pub fn delete_document(
        &self,
        caller: Option<&Caller>,
        collection: &str,
        id: &str,
    ) -> Result<(), ApiError> {
        let collection = self.policy.resolve_collection(collection, Operation::Write)?;
        let id = parse_doc_id(id)?;
        let existing = self.store.get(collection, &id);

        self.authorize(caller, &AccessRequest::write(collection, id.clone(), existing.as_ref(), None))?;
        let expected = existing.ok_or(DomainError::NotFound)?;

        self.store.delete(collection, &id, &expected)?;
        tracing::info!(%collection, %id, "document deleted");
        Ok(())
    }

    pub fn get_salon(&self, caller: Option<&Caller>, salon_id: &str) -> Result<Record<Salon>, ApiError> {
        let salon_id = parse_salon_id(salon_id)?;
        let doc_id = salon_id.as_document_id();
        let existing = self.store.get(Collection::Salons, &doc_id);
        self.authorize(caller, &AccessRequest::read(Collection::Salons, doc_id, existing.as_ref()))?;
        Ok(self.lookup.get_salon(&salon_id)?)
    }

    pub fn get_provider(&self, caller: Option<&Caller>, id: &str) -> Result<Record<Provider>, ApiError> {
        let id = parse_doc_id(id)?;
        let existing = self.store.get(Collection::Providers, &id);
        self.authorize(caller, &AccessRequest::read(Collection::Providers, id.clone(), existing.as_ref()))?;
        Ok(self.lookup.get_provider(&id)?)
    }

    pub fn list_booking_requests(
        &self,
        caller: Option<&Caller>,
        salon_id: &str,
    ) -> Result<Vec<Record<BookingRequest>>, ApiError> {
        let salon_id = parse_salon_id(salon_id)?;
        self.authorize(caller, &AccessRequest::list(Collection::BookingRequests, Some(salon_id.clone())))?;
        Ok(self.lookup.list_booking_requests(&salon_id))
    }

    /// Client roster derived from the salon's booking requests.
    pub fn client_roster(
        &self,
        caller: Option<&Caller>,
        salon_id: &str,
        query: Option<&str>,
    ) -> Result<Vec<ClientSummary>, ApiError> {
        let salon_id = parse_salon_id(salon_id)?;
        self.authorize(caller, &AccessRequest::list(Collection::Clients, Some(salon_id.clone())))?;
        let roster = self.lookup.client_roster(&salon_id);
        Ok(match query {
            Some(q) => filter_roster(&roster, q).into_iter().cloned().collect(),
            None => roster,
        })
    }

    /// Booking page submission: authorize against the target salon, then
    /// validate and price the form and store it as a pending request.
    pub fn submit_booking(
        &self,
        caller: Option<&Caller>,
        salon_id: &str,
        form: BookingForm,
        now: DateTime<Utc>,
    ) -> Result<Record<BookingRequest>, ApiError> {
        let salon_id = parse_salon_id(salon_id)?;
        let id = DocumentId::generate();
        self.authorize(
            caller,
            &AccessRequest::create(BookingRequest::COLLECTION, id.clone(), &json!({ "salonId": salon_id })),
        )?;

        let services = self.lookup.services_by_id(&salon_id);
        let request = form
            .into_request(salon_id, &services, now)
            .map_err(ApiError::Form)?;

        let record = Record { id, data: request };
        let body = strip_id(record.to_json())?;
        self.store.create(BookingRequest::COLLECTION, record.id.clone(), body)?;
        tracing::info!(salon = %record.data.salon_id, id = %record.id, "booking request submitted");
        Ok(record)
    }

    /// Turn a pending invitation into the caller's team membership.
    ///
    /// The invitation is marked accepted first; if the membership cannot be
    /// stored it is put back to pending.
    pub fn accept_invitation(
        &self,
        caller: Option<&Caller>,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Record<TeamMember>, ApiError> {
        let id = parse_doc_id(id)?;
        let stored = self.store.get(Collection::Invitations, &id);

        self.policy
            .authorize_acceptance(caller, stored.as_ref().unwrap_or(&Value::Null))?;
        let (Some(caller), Some(stored)) = (caller, stored) else {
            return Err(DomainError::NotFound.into());
        };

        let invitation = Record::<Invitation>::decode(id.clone(), &stored)?;
        let member = Record {
            id: caller.identity.as_document_id(),
            data: invitation.data.accept(caller.identity.clone(), now)?,
        };
        let accepted = Record {
            id: id.clone(),
            data: Invitation {
                status: InvitationStatus::Accepted,
                ..invitation.data
            },
        };
        let accepted_body = strip_id(accepted.to_json())?;

        self.store
            .replace(Collection::Invitations, id.clone(), &stored, accepted_body.clone())?;
        if let Err(e) = self
            .store
            .create(TeamMember::COLLECTION, member.id.clone(), strip_id(member.to_json())?)
        {
            self.store.replace(Collection::Invitations, id, &accepted_body, stored)?;
            return Err(e.into());
        }
        tracing::info!(salon = %member.data.salon_id, user = %member.id, "invitation accepted");
        Ok(member)
    }

    /// Enroll a client in one of the salon's loyalty programs.
    pub fn enroll_pass(
        &self,
        caller: Option<&Caller>,
        salon_id: &str,
        program_id: &str,
        client_email: &str,
    ) -> Result<Record<CustomerPass>, ApiError> {
        let salon_id = parse_salon_id(salon_id)?;
        let program_id = parse_doc_id(program_id)?;
        let id = DocumentId::generate();
        self.authorize(
            caller,
            &AccessRequest::create(CustomerPass::COLLECTION, id.clone(), &json!({ "salonId": salon_id })),
        )?;

        let program = self.salon_program(&salon_id, &program_id)?;
        let pass = Record {
            id,
            data: CustomerPass::new(salon_id, program.id, client_email),
        };
        pass.data.validate()?;
        self.store
            .create(CustomerPass::COLLECTION, pass.id.clone(), strip_id(pass.to_json())?)?;
        tracing::info!(salon = %pass.data.salon_id, id = %pass.id, "customer pass issued");
        Ok(pass)
    }

    /// Store a visit; a visit naming a pass also stamps that pass.
    pub fn record_visit(
        &self,
        caller: Option<&Caller>,
        salon_id: &str,
        body: Value,
    ) -> Result<Record<VisitRecord>, ApiError> {
        let salon_id = parse_salon_id(salon_id)?;
        let id = DocumentId::generate();
        let body = strip_id(body)?;

        self.authorize(caller, &AccessRequest::create(VisitRecord::COLLECTION, id.clone(), &body))?;
        validate_body(VisitRecord::COLLECTION, &body)?;
        let visit = Record::<VisitRecord>::decode(id, &body)?;
        if visit.data.salon_id != salon_id {
            return Err(DomainError::validation("salonId must match the salon in the path").into());
        }

        if let Some(pass_id) = &visit.data.pass_id {
            self.update_pass(caller, pass_id, |pass| Ok(pass.record_visit(&visit.data)?))?;
        }
        self.store.create(VisitRecord::COLLECTION, visit.id.clone(), body)?;
        tracing::info!(salon = %salon_id, id = %visit.id, "visit recorded");
        Ok(visit)
    }

    /// Spend a pass's stamps on its program's reward.
    pub fn redeem_reward(
        &self,
        caller: Option<&Caller>,
        pass_id: &str,
    ) -> Result<Record<CustomerPass>, ApiError> {
        let pass_id = parse_doc_id(pass_id)?;
        let pass = self.update_pass(caller, &pass_id, |pass| {
            let program = self.salon_program(&pass.salon_id, &pass.program_id)?;
            pass.redeem(&program.data)?;
            Ok(())
        })?;
        tracing::info!(salon = %pass.data.salon_id, id = %pass.id, "reward redeemed");
        Ok(pass)
    }

    /// Load a pass the caller may write, apply `change`, and store it back
    /// only if nobody else changed it meanwhile.
    fn update_pass<F>(
        &self,
        caller: Option<&Caller>,
        pass_id: &DocumentId,
        change: F,
    ) -> Result<Record<CustomerPass>, ApiError>
    where
        F: FnOnce(&mut CustomerPass) -> Result<(), ApiError>,
    {
        let existing = self.store.get(CustomerPass::COLLECTION, pass_id);
        self.authorize(
            caller,
            &AccessRequest::write(CustomerPass::COLLECTION, pass_id.clone(), existing.as_ref(), existing.as_ref()),
        )?;
        let existing = existing.ok_or(DomainError::NotFound)?;

        let mut pass = Record::<CustomerPass>::decode(pass_id.clone(), &existing)?;
        change(&mut pass.data)?;
        self.store
            .replace(CustomerPass::COLLECTION, pass_id.clone(), &existing, strip_id(pass.to_json())?)?;
        Ok(pass)
    }

    fn salon_program(
        &self,
        salon_id: &SalonId,
        program_id: &DocumentId,
    ) -> Result<Record<LoyaltyProgram>, ApiError> {
        let body = self
            .store
            .get(LoyaltyProgram::COLLECTION, program_id)
            .ok_or(DomainError::NotFound)?;
        let program = Record::<LoyaltyProgram>::decode(program_id.clone(), &body)?;
        if &program.data.salon_id != salon_id {
            return Err(DomainError::NotFound.into());
        }
        Ok(program)
    }

    pub fn explain(
        &self,
        caller: Option<&Caller>,
        collection: &str,
        operation: &str,
        id: Option<&str>,
        salon_id: Option<&str>,
    ) -> Result<PolicyExplanation, ApiError> {
        let operation: Operation = operation.parse().map_err(DomainError::validation)?;
        let collection = self.policy.resolve_collection(collection, operation)?;
        let id = id.map(parse_doc_id).transpose()?;
        let salon_id = salon_id.map(parse_salon_id).transpose()?;
        let existing = id.as_ref().and_then(|id| self.store.get(collection, id));

        let request = match operation {
            Operation::List => AccessRequest::list(collection, salon_id),
            Operation::Create => {
                let proposed = json!({ "salonId": salon_id });
                AccessRequest::create(collection, id.unwrap_or_else(DocumentId::generate), &proposed)
            }
            Operation::Read | Operation::Write => {
                let id = id.ok_or_else(|| DomainError::validation("id is required for read and write"))?;
                match operation {
                    Operation::Read => AccessRequest::read(collection, id, existing.as_ref()),
                    _ => AccessRequest::write(collection, id, existing.as_ref(), existing.as_ref()),
                }
            }
        };
        Ok(self.policy.explain(caller, &request))
    }
}
