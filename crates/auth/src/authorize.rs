use serde::Serialize;
use thiserror::Error;

use salonbook_core::{DocumentId, Identity, SalonId};
use salonbook_records::Collection;

use crate::rules::{self, PolicyContext};
use crate::{AccessRequest, AdminAllowList, Caller, DocumentFields, Operation, PolicyDirectory, PublicSurface};

/// Public clauses, one per [`PublicSurface`] flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicClause {
    SalonReads,
    SalonListing,
    CatalogReads,
    CatalogListing,
    SessionListing,
}

/// The clause that allowed a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    Public(PublicClause),
    /// Caller owns the salon.
    Owner,
    /// Caller's team-member record references the salon.
    TeamMember,
    /// Salon has a public booking slug.
    PublishedSalon,
    PlatformAdmin,
    /// Caller's own team-member record.
    SelfRecord,
    /// Caller is the provider named on the shift change.
    AssignedProvider,
    AnyAuthenticated,
    /// Open submission (booking requests, sessions).
    OpenSubmission,
    /// Caller's email is the one an invitation was sent to.
    Invitee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    MissingSalonId,
    NotOwner,
    NoSalonAccess,
    NoMatchingRule,
    UnknownCollection,
    MemberKeyMismatch,
    NotInvitee,
}

impl DenialKind {
    pub fn message(&self) -> &'static str {
        match self {
            DenialKind::Unauthenticated => "caller is not authenticated",
            DenialKind::MissingSalonId => "document has no salonId",
            DenialKind::NotOwner => "caller does not own the salon",
            DenialKind::NoSalonAccess => "caller is neither owner nor team member of the salon",
            DenialKind::NoMatchingRule => "no rule allows this operation",
            DenialKind::UnknownCollection => "collection is not governed by any rule",
            DenialKind::MemberKeyMismatch => "team member record key differs from its userId",
            DenialKind::NotInvitee => "invitation was sent to a different email",
        }
    }

    fn suggestions(&self) -> Vec<String> {
        let items: &[&str] = match self {
            DenialKind::Unauthenticated => &["Sign in and retry with a bearer token"],
            DenialKind::MissingSalonId => &["Set salonId on the document"],
            DenialKind::NotOwner => &["Only the salon owner may perform this operation"],
            DenialKind::NoSalonAccess => &[
                "Ask the salon owner for a team invitation",
                "Scope list requests with ?salonId=<your salon>",
            ],
            DenialKind::NoMatchingRule => &["Contact a platform administrator"],
            DenialKind::UnknownCollection => &["Check the collection name"],
            DenialKind::MemberKeyMismatch => &["Store team members under teamMembers/<userId>"],
            DenialKind::NotInvitee => &["Sign in with the invited email address"],
        };
        items.iter().map(|s| s.to_string()).collect()
    }
}

impl core::fmt::Display for DenialKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("permission denied: {operation} on {collection}: {kind}")]
    PermissionDenied {
        operation: Operation,
        collection: String,
        kind: DenialKind,
    },
}

impl AuthzError {
    pub fn kind(&self) -> DenialKind {
        match self {
            AuthzError::PermissionDenied { kind, .. } => *kind,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Denial {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

/// Predicate values for the request's salon scope.
#[derive(Debug, Clone, Serialize)]
pub struct PredicateState {
    pub authenticated: bool,
    pub platform_admin: bool,
    pub salon_id: Option<SalonId>,
    pub is_owner: bool,
    pub is_team_member: bool,
}

/// Why a request was (or would be) allowed or denied.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyExplanation {
    pub operation: Operation,
    pub collection: Collection,
    pub document_id: Option<DocumentId>,
    pub caller: Option<Identity>,
    pub predicates: PredicateState,
    pub granted: bool,
    pub grant: Option<Grant>,
    pub denial: Option<Denial>,
}

/// Stateless policy evaluator over a directory of memberships and salons.
pub struct PolicyEvaluator<D> {
    directory: D,
    admins: AdminAllowList,
    surface: PublicSurface,
}

impl<D: PolicyDirectory> PolicyEvaluator<D> {
    pub fn new(directory: D, admins: AdminAllowList, surface: PublicSurface) -> Self {
        Self {
            directory,
            admins,
            surface,
        }
    }

    fn context<'a>(&'a self, caller: Option<&'a Caller>) -> PolicyContext<'a> {
        PolicyContext {
            caller,
            admins: &self.admins,
            surface: &self.surface,
            directory: &self.directory,
        }
    }

    pub fn is_platform_admin(&self, caller: Option<&Caller>) -> bool {
        self.context(caller).is_platform_admin()
    }

    pub fn has_access(&self, caller: Option<&Caller>, salon_id: &SalonId) -> bool {
        self.context(caller).has_access(salon_id).is_some()
    }

    /// Map a wire collection name; unknown collections are denied.
    pub fn resolve_collection(
        &self,
        name: &str,
        operation: Operation,
    ) -> Result<Collection, AuthzError> {
        name.parse().map_err(|_| {
            tracing::debug!(collection = name, %operation, "denied: unknown collection");
            AuthzError::PermissionDenied {
                operation,
                collection: name.to_string(),
                kind: DenialKind::UnknownCollection,
            }
        })
    }

    /// Decide a request.
    ///
    /// - No IO beyond directory lookups
    /// - No panics
    /// - All-or-nothing: no partial grants
    pub fn authorize(
        &self,
        caller: Option<&Caller>,
        request: &AccessRequest,
    ) -> Result<Grant, AuthzError> {
        let verdict = rules::decide(&self.context(caller), request);
        enforce(caller, request.operation, request.collection, verdict)
    }

    /// Decide whether the caller may accept the stored invitation `body`.
    pub fn authorize_acceptance(
        &self,
        caller: Option<&Caller>,
        invitation: &serde_json::Value,
    ) -> Result<Grant, AuthzError> {
        let fields = DocumentFields::from_json(invitation);
        let verdict = rules::accept_invitation(&self.context(caller), &fields);
        enforce(caller, Operation::Write, Collection::Invitations, verdict)
    }

    /// Explain a decision without enforcing it.
    pub fn explain(&self, caller: Option<&Caller>, request: &AccessRequest) -> PolicyExplanation {
        let ctx = self.context(caller);
        let salon_id = match (request.collection, request.scope()) {
            (_, Some(salon)) => Some(salon.clone()),
            (Collection::Salons, None) => request
                .document_id
                .as_ref()
                .and_then(|id| SalonId::parse(id.as_str()).ok()),
            _ => None,
        };

        let verdict = rules::decide(&ctx, request);
        // A denied read or write says nothing about the stored document.
        let salon_id = match (&verdict, request.operation) {
            (Err(_), Operation::Read | Operation::Write) => None,
            _ => salon_id,
        };

        let predicates = PredicateState {
            authenticated: ctx.authenticated(),
            platform_admin: ctx.is_platform_admin(),
            is_owner: salon_id.as_ref().is_some_and(|s| ctx.is_owner(s)),
            is_team_member: salon_id.as_ref().is_some_and(|s| ctx.is_team_member(s)),
            salon_id,
        };

        PolicyExplanation {
            operation: request.operation,
            collection: request.collection,
            document_id: request.document_id.clone(),
            caller: caller.map(|c| c.identity.clone()),
            predicates,
            granted: verdict.is_ok(),
            grant: verdict.ok(),
            denial: verdict.err().map(|kind| Denial {
                kind,
                message: kind.message().to_string(),
                suggestions: kind.suggestions(),
            }),
        }
    }
}

fn enforce(
    caller: Option<&Caller>,
    operation: Operation,
    collection: Collection,
    verdict: rules::Verdict,
) -> Result<Grant, AuthzError> {
    match verdict {
        Ok(grant) => {
            tracing::trace!(%collection, %operation, ?grant, "allowed");
            Ok(grant)
        }
        Err(kind) => {
            tracing::debug!(
                %collection,
                %operation,
                caller = caller.map(|c| c.identity.as_str()),
                reason = kind.message(),
                "denied"
            );
            Err(AuthzError::PermissionDenied {
                operation,
                collection: collection.to_string(),
                kind,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use proptest::prelude::*;
    use serde_json::json;

    /// Fixed directory: identity -> member salon, salon -> explicit owner.
    #[derive(Default)]
    struct StaticDirectory {
        members: HashMap<Identity, SalonId>,
        owners: HashMap<SalonId, Identity>,
    }

    impl PolicyDirectory for StaticDirectory {
        fn team_member_salon(&self, identity: &Identity) -> Option<SalonId> {
            self.members.get(identity).cloned()
        }

        fn salon_owner(&self, salon_id: &SalonId) -> Option<Identity> {
            self.owners.get(salon_id).cloned()
        }
    }

    fn id(s: &str) -> Identity {
        Identity::parse(s).unwrap()
    }

    fn salon(s: &str) -> SalonId {
        SalonId::parse(s).unwrap()
    }

    fn doc(s: &str) -> DocumentId {
        DocumentId::parse(s).unwrap()
    }

    fn caller(uid: &str) -> Caller {
        Caller::new(id(uid), Some(format!("{uid}@example.com")))
    }

    /// Owner "owner-1" (legacy key) and "owner-2" (explicit owner of "salon-2");
    /// "stylist" is a member of "owner-1".
    fn evaluator(surface: PublicSurface) -> PolicyEvaluator<StaticDirectory> {
        let mut dir = StaticDirectory::default();
        dir.members.insert(id("stylist"), salon("owner-1"));
        dir.owners.insert(salon("owner-1"), id("owner-1"));
        dir.owners.insert(salon("salon-2"), id("owner-2"));
        PolicyEvaluator::new(
            dir,
            AdminAllowList::new(["root@salonbook.app", "ops@salonbook.app"]),
            surface,
        )
    }

    fn grant(
        ev: &PolicyEvaluator<StaticDirectory>,
        who: Option<&Caller>,
        req: AccessRequest,
    ) -> Result<Grant, DenialKind> {
        ev.authorize(who, &req).map_err(|e| e.kind())
    }

    #[test]
    fn salons_are_publicly_readable_by_default() {
        let ev = evaluator(PublicSurface::default());
        let body = json!({ "name": "Glow" });
        let req = AccessRequest::read(Collection::Salons, doc("owner-1"), Some(&body));
        assert_eq!(
            grant(&ev, None, req),
            Ok(Grant::Public(PublicClause::SalonReads))
        );
    }

    #[test]
    fn closed_surface_scopes_salon_reads() {
        let ev = evaluator(PublicSurface::closed());
        let private = json!({ "name": "Glow" });
        let published = json!({ "name": "Glow", "slug": "glow" });

        let read = |body: &serde_json::Value| {
            AccessRequest::read(Collection::Salons, doc("owner-1"), Some(body))
        };

        assert_eq!(grant(&ev, None, read(&private)), Err(DenialKind::Unauthenticated));
        assert_eq!(grant(&ev, None, read(&published)), Ok(Grant::PublishedSalon));
        assert_eq!(grant(&ev, Some(&caller("owner-1")), read(&private)), Ok(Grant::Owner));
        assert_eq!(grant(&ev, Some(&caller("stylist")), read(&private)), Ok(Grant::TeamMember));
        assert_eq!(
            grant(&ev, Some(&caller("stranger")), read(&private)),
            Err(DenialKind::NoSalonAccess)
        );

        let admin = Caller::new(id("uid-admin"), Some("ROOT@salonbook.app".to_string()));
        assert_eq!(grant(&ev, Some(&admin), read(&private)), Ok(Grant::PlatformAdmin));
        assert_eq!(
            grant(&ev, Some(&admin), AccessRequest::list(Collection::Salons, None)),
            Ok(Grant::PlatformAdmin)
        );
    }

    #[test]
    fn salon_writes_are_owner_only() {
        let ev = evaluator(PublicSurface::default());
        let body = json!({ "name": "Glow" });

        let update = AccessRequest::write(Collection::Salons, doc("salon-2"), Some(&body), Some(&body));
        assert_eq!(grant(&ev, Some(&caller("owner-2")), update.clone()), Ok(Grant::Owner));
        // Explicit owner overrides the legacy key scheme.
        assert_eq!(grant(&ev, Some(&caller("salon-2")), update), Err(DenialKind::NotOwner));

        let create_legacy = AccessRequest::create(Collection::Salons, doc("new-owner"), &body);
        assert_eq!(grant(&ev, Some(&caller("new-owner")), create_legacy.clone()), Ok(Grant::Owner));
        assert_eq!(grant(&ev, Some(&caller("someone")), create_legacy), Err(DenialKind::NotOwner));

        let typed = json!({ "name": "Glow", "ownerId": "new-owner" });
        let create_typed = AccessRequest::create(Collection::Salons, doc("new-owner"), &typed);
        assert_eq!(grant(&ev, Some(&caller("new-owner")), create_typed), Ok(Grant::Owner));
        let elsewhere = AccessRequest::create(Collection::Salons, doc("salon-9"), &typed);
        assert_eq!(grant(&ev, Some(&caller("new-owner")), elsewhere), Err(DenialKind::NotOwner));
    }

    #[test]
    fn salon_keys_cannot_be_claimed_by_another_caller() {
        let ev = evaluator(PublicSurface::default());
        let squat = json!({ "name": "Mine now", "ownerId": "attacker" });
        let req = AccessRequest::create(Collection::Salons, doc("victim"), &squat);
        assert_eq!(grant(&ev, Some(&caller("attacker")), req), Err(DenialKind::NotOwner));

        let handed_off = json!({ "name": "Glow", "ownerId": "someone-else" });
        let req = AccessRequest::create(Collection::Salons, doc("owner-9"), &handed_off);
        assert_eq!(grant(&ev, Some(&caller("owner-9")), req), Err(DenialKind::NotOwner));
    }

    #[test]
    fn team_member_reads_are_owner_or_self() {
        let ev = evaluator(PublicSurface::default());
        let record = json!({ "salonId": "owner-1", "userId": "stylist" });
        let read = || AccessRequest::read(Collection::TeamMembers, doc("stylist"), Some(&record));

        assert_eq!(grant(&ev, Some(&caller("owner-1")), read()), Ok(Grant::Owner));
        assert_eq!(grant(&ev, Some(&caller("stylist")), read()), Ok(Grant::SelfRecord));
        assert_eq!(grant(&ev, Some(&caller("owner-2")), read()), Err(DenialKind::NotOwner));
        assert_eq!(grant(&ev, None, read()), Err(DenialKind::Unauthenticated));
    }

    #[test]
    fn team_member_self_reads_follow_the_user_id() {
        let ev = evaluator(PublicSurface::default());
        let record = json!({ "salonId": "salon-2", "userId": "someone-else" });
        let read = AccessRequest::read(Collection::TeamMembers, doc("visitor"), Some(&record));
        assert_eq!(grant(&ev, Some(&caller("visitor")), read), Err(DenialKind::NotOwner));
    }

    #[test]
    fn team_member_records_are_keyed_by_user_id() {
        let ev = evaluator(PublicSurface::default());
        let body = json!({ "salonId": "owner-1", "userId": "new-hire" });
        let misplaced = AccessRequest::create(Collection::TeamMembers, doc("other-key"), &body);
        assert_eq!(
            grant(&ev, Some(&caller("owner-1")), misplaced),
            Err(DenialKind::MemberKeyMismatch)
        );

        let stored = json!({ "salonId": "owner-1", "userId": "stylist" });
        let rekey = json!({ "salonId": "owner-1", "userId": "intruder" });
        let write = AccessRequest::write(Collection::TeamMembers, doc("stylist"), Some(&stored), Some(&rekey));
        assert_eq!(
            grant(&ev, Some(&caller("owner-1")), write),
            Err(DenialKind::MemberKeyMismatch)
        );
        let removal = AccessRequest::write(Collection::TeamMembers, doc("stylist"), Some(&stored), None);
        assert_eq!(grant(&ev, Some(&caller("owner-1")), removal), Ok(Grant::Owner));
    }

    #[test]
    fn team_member_creation_requires_salon_ownership() {
        let ev = evaluator(PublicSurface::default());
        let body = json!({ "salonId": "owner-1", "userId": "new-hire" });
        let create = || AccessRequest::create(Collection::TeamMembers, doc("new-hire"), &body);

        assert_eq!(grant(&ev, Some(&caller("owner-1")), create()), Ok(Grant::Owner));
        // Already a member of this very salon, still not its owner.
        assert_eq!(grant(&ev, Some(&caller("stylist")), create()), Err(DenialKind::NotOwner));
        assert_eq!(grant(&ev, None, create()), Err(DenialKind::Unauthenticated));

        let orphan = json!({ "userId": "new-hire" });
        assert_eq!(
            grant(
                &ev,
                Some(&caller("owner-1")),
                AccessRequest::create(Collection::TeamMembers, doc("new-hire"), &orphan)
            ),
            Err(DenialKind::MissingSalonId)
        );
    }

    #[test]
    fn booking_requests_need_only_a_salon_id_to_be_submitted() {
        let ev = evaluator(PublicSurface::default());
        let ok = json!({ "salonId": "salon-2", "clientName": "A", "clientEmail": "a@b.co" });
        let null = json!({ "salonId": null, "clientName": "A", "clientEmail": "a@b.co" });

        assert_eq!(
            grant(&ev, None, AccessRequest::create(Collection::BookingRequests, doc("b1"), &ok)),
            Ok(Grant::OpenSubmission)
        );
        assert_eq!(
            grant(&ev, Some(&caller("stranger")), AccessRequest::create(Collection::BookingRequests, doc("b1"), &ok)),
            Ok(Grant::OpenSubmission)
        );
        assert_eq!(
            grant(&ev, Some(&caller("owner-2")), AccessRequest::create(Collection::BookingRequests, doc("b1"), &null)),
            Err(DenialKind::MissingSalonId)
        );
    }

    #[test]
    fn booking_reads_by_strangers_follow_the_surface_flag() {
        let body = json!({ "salonId": "owner-1" });
        let read = || AccessRequest::read(Collection::BookingRequests, doc("b1"), Some(&body));

        let open = evaluator(PublicSurface::default());
        assert_eq!(grant(&open, Some(&caller("stranger")), read()), Ok(Grant::AnyAuthenticated));
        assert_eq!(grant(&open, Some(&caller("stylist")), read()), Ok(Grant::TeamMember));
        assert_eq!(grant(&open, None, read()), Err(DenialKind::Unauthenticated));

        let closed = evaluator(PublicSurface::closed());
        assert_eq!(grant(&closed, Some(&caller("stranger")), read()), Err(DenialKind::NoSalonAccess));
    }

    #[test]
    fn anonymous_booking_listing_is_denied() {
        let ev = evaluator(PublicSurface::default());
        let scoped = AccessRequest::list(Collection::BookingRequests, Some(salon("owner-1")));
        assert_eq!(grant(&ev, None, scoped), Err(DenialKind::Unauthenticated));
        assert_eq!(
            grant(&ev, None, AccessRequest::list(Collection::BookingRequests, None)),
            Err(DenialKind::Unauthenticated)
        );
    }

    #[test]
    fn private_collections_require_salon_access() {
        let ev = evaluator(PublicSurface::default());
        let body = json!({ "salonId": "owner-1" });
        for collection in [
            Collection::Invitations,
            Collection::LoyaltyPrograms,
            Collection::CustomerPasses,
            Collection::VisitRecords,
            Collection::Clients,
        ] {
            let read = AccessRequest::read(collection, doc("d1"), Some(&body));
            assert_eq!(grant(&ev, Some(&caller("stylist")), read.clone()), Ok(Grant::TeamMember));
            assert_eq!(grant(&ev, Some(&caller("owner-2")), read), Err(DenialKind::NoSalonAccess));

            let scoped = AccessRequest::list(collection, Some(salon("owner-1")));
            assert_eq!(grant(&ev, Some(&caller("owner-1")), scoped), Ok(Grant::Owner));
            let unscoped = AccessRequest::list(collection, None);
            assert_eq!(grant(&ev, Some(&caller("owner-1")), unscoped), Err(DenialKind::NoSalonAccess));
        }
    }

    #[test]
    fn documents_cannot_be_moved_to_a_foreign_salon() {
        let ev = evaluator(PublicSurface::default());
        let before = json!({ "salonId": "owner-1", "name": "Ana", "email": "a@b.co" });
        let after = json!({ "salonId": "salon-2", "name": "Ana", "email": "a@b.co" });
        let req = AccessRequest::write(Collection::Clients, doc("c1"), Some(&before), Some(&after));
        assert_eq!(grant(&ev, Some(&caller("owner-1")), req), Err(DenialKind::NoSalonAccess));

        let delete = AccessRequest::write(Collection::Clients, doc("c1"), Some(&before), None);
        assert_eq!(grant(&ev, Some(&caller("stylist")), delete), Ok(Grant::TeamMember));
    }

    #[test]
    fn shift_changes_are_visible_to_the_requesting_provider() {
        let ev = evaluator(PublicSurface::default());
        let body = json!({ "salonId": "salon-2", "providerId": "freelancer" });
        let read = AccessRequest::read(Collection::ShiftChangeRequests, doc("s1"), Some(&body));
        assert_eq!(grant(&ev, Some(&caller("freelancer")), read.clone()), Ok(Grant::AssignedProvider));
        assert_eq!(grant(&ev, Some(&caller("stylist")), read), Err(DenialKind::NoSalonAccess));
    }

    #[test]
    fn shift_changes_need_a_salon_to_be_created() {
        let ev = evaluator(PublicSurface::default());
        let body = json!({ "salonId": null, "providerId": "stylist" });
        let req = AccessRequest::create(Collection::ShiftChangeRequests, doc("s2"), &body);
        assert_eq!(grant(&ev, Some(&caller("stylist")), req), Err(DenialKind::MissingSalonId));
    }

    #[test]
    fn invitations_are_accepted_by_the_invited_email() {
        let ev = evaluator(PublicSurface::default());
        let invitation = json!({ "salonId": "owner-1", "email": "New.Hire@Example.com" });
        let invitee = Caller::new(id("hire"), Some("new.hire@example.com".to_string()));
        assert_eq!(
            ev.authorize_acceptance(Some(&invitee), &invitation).map_err(|e| e.kind()),
            Ok(Grant::Invitee)
        );
        assert_eq!(
            ev.authorize_acceptance(Some(&caller("stylist")), &invitation).map_err(|e| e.kind()),
            Err(DenialKind::NotInvitee)
        );
        let no_email = Caller::new(id("hire"), None);
        assert_eq!(
            ev.authorize_acceptance(Some(&no_email), &invitation).map_err(|e| e.kind()),
            Err(DenialKind::NotInvitee)
        );
        assert_eq!(
            ev.authorize_acceptance(None, &invitation).map_err(|e| e.kind()),
            Err(DenialKind::Unauthenticated)
        );
    }

    #[test]
    fn sessions_are_open_to_create_and_list() {
        let ev = evaluator(PublicSurface::default());
        let body = json!({ "startedAt": "2026-10-19T10:00:00Z" });
        assert_eq!(
            grant(&ev, None, AccessRequest::create(Collection::SessionTracking, doc("x"), &body)),
            Ok(Grant::OpenSubmission)
        );
        assert_eq!(
            grant(&ev, None, AccessRequest::list(Collection::Sessions, None)),
            Ok(Grant::Public(PublicClause::SessionListing))
        );
        assert_eq!(
            grant(&ev, None, AccessRequest::list(Collection::SessionTracking, None)),
            Err(DenialKind::Unauthenticated)
        );
    }

    #[test]
    fn unknown_collections_are_denied() {
        let ev = evaluator(PublicSurface::default());
        let err = ev.resolve_collection("users", Operation::Read).unwrap_err();
        assert_eq!(err.kind(), DenialKind::UnknownCollection);
    }

    #[test]
    fn explanation_reports_predicates_and_denial() {
        let ev = evaluator(PublicSurface::default());
        let body = json!({ "salonId": "owner-1" });
        let req = AccessRequest::read(Collection::Clients, doc("c1"), Some(&body));

        let allowed = ev.explain(Some(&caller("stylist")), &req);
        assert!(allowed.granted);
        assert!(allowed.predicates.is_team_member);
        assert!(!allowed.predicates.is_owner);

        let denied = ev.explain(Some(&caller("owner-2")), &req);
        assert!(!denied.granted);
        let denial = denied.denial.unwrap();
        assert_eq!(denial.kind, DenialKind::NoSalonAccess);
        assert!(!denial.suggestions.is_empty());
    }

    #[test]
    fn denied_explanations_do_not_reveal_the_document_salon() {
        let ev = evaluator(PublicSurface::closed());
        let body = json!({ "salonId": "owner-1" });
        let read = AccessRequest::read(Collection::Clients, doc("c1"), Some(&body));
        let denied = ev.explain(Some(&caller("owner-2")), &read);
        assert!(!denied.granted);
        assert_eq!(denied.predicates.salon_id, None);
        assert!(!denied.predicates.is_owner);

        // A stranger learns the same thing whether or not the document exists.
        let missing = AccessRequest::read(Collection::Clients, doc("c9"), None);
        let absent = ev.explain(Some(&caller("owner-2")), &missing);
        assert_eq!(
            serde_json::to_value(&denied.predicates).unwrap(),
            serde_json::to_value(&absent.predicates).unwrap()
        );

        let salon_read = AccessRequest::read(Collection::Salons, doc("owner-1"), Some(&json!({ "name": "Glow" })));
        assert_eq!(ev.explain(None, &salon_read).predicates.salon_id, None);
    }

    proptest! {
        /// Listing sessions never depends on who is asking.
        #[test]
        fn session_listing_ignores_authentication(uid in "[a-z0-9]{1,12}", signed_in in any::<bool>()) {
            let ev = evaluator(PublicSurface::default());
            let who = caller(&uid);
            let who = signed_in.then_some(&who);
            prop_assert!(ev.authorize(who, &AccessRequest::list(Collection::Sessions, None)).is_ok());
        }

        /// Only the two configured addresses are platform admins.
        #[test]
        fn platform_admin_only_for_listed_emails(email in "[a-z]{1,8}@[a-z]{1,8}\\.(com|app)") {
            let ev = evaluator(PublicSurface::default());
            let listed = email == "root@salonbook.app" || email == "ops@salonbook.app";
            let who = Caller::new(id("uid"), Some(email));
            prop_assert_eq!(ev.is_platform_admin(Some(&who)), listed);
            prop_assert!(!ev.is_platform_admin(None));
        }
    }
}
