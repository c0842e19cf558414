//! Per-collection decision functions.
//!
//! Each collection has one function that walks its clauses in order and
//! returns the first matching verdict. There is no deny override: a request
//! is denied only when no clause grants it.

use salonbook_core::{Identity, SalonId};
use salonbook_records::Collection;

use crate::authorize::{DenialKind, Grant, PublicClause};
use crate::{AccessRequest, AdminAllowList, Caller, DocumentFields, Operation, PolicyDirectory, PublicSurface};

pub type Verdict = Result<Grant, DenialKind>;

/// Everything one decision may consult.
pub struct PolicyContext<'a> {
    pub caller: Option<&'a Caller>,
    pub admins: &'a AdminAllowList,
    pub surface: &'a PublicSurface,
    pub directory: &'a dyn PolicyDirectory,
}

impl PolicyContext<'_> {
    pub fn authenticated(&self) -> bool {
        self.caller.is_some()
    }

    /// The salon's owner is the caller. Salons not (yet) stored fall back to
    /// the legacy scheme where the salon key is the owner's identity.
    pub fn is_owner(&self, salon_id: &SalonId) -> bool {
        let Some(caller) = self.caller else {
            return false;
        };
        match self.directory.salon_owner(salon_id) {
            Some(owner) => owner == caller.identity,
            None => caller.identity.is_salon_key(salon_id),
        }
    }

    /// The caller's own team-member record points at this salon.
    pub fn is_team_member(&self, salon_id: &SalonId) -> bool {
        let Some(caller) = self.caller else {
            return false;
        };
        self.directory
            .team_member_salon(&caller.identity)
            .is_some_and(|salon| &salon == salon_id)
    }

    pub fn has_access(&self, salon_id: &SalonId) -> Option<Grant> {
        if self.is_owner(salon_id) {
            Some(Grant::Owner)
        } else if self.is_team_member(salon_id) {
            Some(Grant::TeamMember)
        } else {
            None
        }
    }

    pub fn is_platform_admin(&self) -> bool {
        self.admins.admits(self.caller)
    }

    fn is_caller(&self, identity: Option<&Identity>) -> bool {
        match (self.caller, identity) {
            (Some(caller), Some(identity)) => &caller.identity == identity,
            _ => false,
        }
    }

    fn unmatched(&self, kind: DenialKind) -> DenialKind {
        if self.authenticated() { kind } else { DenialKind::Unauthenticated }
    }
}

/// Decide one request.
pub fn decide(ctx: &PolicyContext<'_>, req: &AccessRequest) -> Verdict {
    match req.collection {
        Collection::Salons => salons(ctx, req),
        Collection::Providers | Collection::Services => catalog(ctx, req),
        Collection::BookingRequests => booking_requests(ctx, req),
        Collection::TeamMembers => team_members(ctx, req),
        Collection::Invitations
        | Collection::LoyaltyPrograms
        | Collection::CustomerPasses
        | Collection::VisitRecords
        | Collection::Clients => salon_private(ctx, req),
        Collection::ShiftChangeRequests => shift_change_requests(ctx, req),
        Collection::Sessions | Collection::SessionTracking => sessions(ctx, req),
    }
}

fn existing_salon(req: &AccessRequest) -> Option<&SalonId> {
    req.existing.as_ref().and_then(|d| d.salon_id.as_ref())
}

fn proposed_salon(req: &AccessRequest) -> Result<&SalonId, DenialKind> {
    req.proposed
        .as_ref()
        .and_then(|d| d.salon_id.as_ref())
        .ok_or(DenialKind::MissingSalonId)
}

fn require_access(ctx: &PolicyContext<'_>, salon_id: Option<&SalonId>) -> Verdict {
    if !ctx.authenticated() {
        return Err(DenialKind::Unauthenticated);
    }
    salon_id
        .and_then(|salon| ctx.has_access(salon))
        .ok_or(DenialKind::NoSalonAccess)
}

fn require_owner(ctx: &PolicyContext<'_>, salon_id: Option<&SalonId>) -> Verdict {
    if !ctx.authenticated() {
        return Err(DenialKind::Unauthenticated);
    }
    match salon_id {
        Some(salon) if ctx.is_owner(salon) => Ok(Grant::Owner),
        _ => Err(DenialKind::NotOwner),
    }
}

/// Update/delete: access to the stored document's salon, and for updates
/// also to the salon the document would move to.
fn write_access(
    ctx: &PolicyContext<'_>,
    req: &AccessRequest,
    check: fn(&PolicyContext<'_>, Option<&SalonId>) -> Verdict,
) -> Verdict {
    let grant = check(ctx, existing_salon(req))?;
    if req.proposed.is_some() {
        check(ctx, Some(proposed_salon(req)?))?;
    }
    Ok(grant)
}

fn salons(ctx: &PolicyContext<'_>, req: &AccessRequest) -> Verdict {
    let salon_key = req
        .document_id
        .as_ref()
        .and_then(|id| SalonId::parse(id.as_str()).ok());

    match req.operation {
        Operation::Read => {
            if ctx.surface.salon_reads {
                return Ok(Grant::Public(PublicClause::SalonReads));
            }
            if let Some(salon) = &salon_key {
                if let Some(grant) = ctx.has_access(salon) {
                    return Ok(grant);
                }
            }
            if req.existing.as_ref().is_some_and(|d| d.slug.is_some()) {
                return Ok(Grant::PublishedSalon);
            }
            if ctx.is_platform_admin() {
                return Ok(Grant::PlatformAdmin);
            }
            Err(ctx.unmatched(DenialKind::NoSalonAccess))
        }
        Operation::List => {
            if ctx.surface.salon_listing {
                return Ok(Grant::Public(PublicClause::SalonListing));
            }
            if ctx.is_platform_admin() {
                return Ok(Grant::PlatformAdmin);
            }
            Err(ctx.unmatched(DenialKind::NoMatchingRule))
        }
        // A new salon is keyed by its owner's identity; a typed ownerId must
        // name that same caller.
        Operation::Create => {
            let Some(caller) = ctx.caller else {
                return Err(DenialKind::Unauthenticated);
            };
            let own_key = salon_key.as_ref().is_some_and(|s| caller.identity.is_salon_key(s));
            let owner_id = req.proposed.as_ref().and_then(|d| d.owner_id.as_ref());
            if own_key && owner_id.is_none_or(|owner| owner == &caller.identity) {
                Ok(Grant::Owner)
            } else {
                Err(DenialKind::NotOwner)
            }
        }
        Operation::Write => require_owner(ctx, salon_key.as_ref()),
    }
}

fn catalog(ctx: &PolicyContext<'_>, req: &AccessRequest) -> Verdict {
    match req.operation {
        Operation::Read => {
            if ctx.surface.catalog_reads {
                return Ok(Grant::Public(PublicClause::CatalogReads));
            }
            if let Some(grant) = existing_salon(req).and_then(|s| ctx.has_access(s)) {
                return Ok(grant);
            }
            if ctx.is_platform_admin() {
                return Ok(Grant::PlatformAdmin);
            }
            Err(ctx.unmatched(DenialKind::NoSalonAccess))
        }
        Operation::List => {
            if ctx.surface.catalog_listing {
                return Ok(Grant::Public(PublicClause::CatalogListing));
            }
            if ctx.is_platform_admin() {
                return Ok(Grant::PlatformAdmin);
            }
            require_access(ctx, req.list_scope.as_ref())
        }
        Operation::Create => require_access(ctx, Some(proposed_salon(req)?)),
        Operation::Write => write_access(ctx, req, require_access),
    }
}

fn booking_requests(ctx: &PolicyContext<'_>, req: &AccessRequest) -> Verdict {
    let any_authenticated = ctx.authenticated() && ctx.surface.authenticated_booking_reads;
    match req.operation {
        Operation::Read => {
            if let Some(grant) = existing_salon(req).and_then(|s| ctx.has_access(s)) {
                return Ok(grant);
            }
            if any_authenticated {
                return Ok(Grant::AnyAuthenticated);
            }
            require_access(ctx, existing_salon(req))
        }
        Operation::List => {
            if any_authenticated {
                return Ok(Grant::AnyAuthenticated);
            }
            require_access(ctx, req.list_scope.as_ref())
        }
        // Public booking page: anyone may submit a request naming a salon.
        Operation::Create => proposed_salon(req).map(|_| Grant::OpenSubmission),
        Operation::Write => write_access(ctx, req, require_access),
    }
}

fn team_members(ctx: &PolicyContext<'_>, req: &AccessRequest) -> Verdict {
    match req.operation {
        Operation::Read => {
            if existing_salon(req).is_some_and(|s| ctx.is_owner(s)) {
                return Ok(Grant::Owner);
            }
            if ctx.is_caller(req.existing.as_ref().and_then(|d| d.user_id.as_ref())) {
                return Ok(Grant::SelfRecord);
            }
            Err(ctx.unmatched(DenialKind::NotOwner))
        }
        Operation::List => {
            if ctx.authenticated() {
                Ok(Grant::AnyAuthenticated)
            } else {
                Err(DenialKind::Unauthenticated)
            }
        }
        Operation::Create => {
            let grant = require_owner(ctx, Some(proposed_salon(req)?))?;
            member_keyed_by_user(req)?;
            Ok(grant)
        }
        Operation::Write => {
            let grant = write_access(ctx, req, require_owner)?;
            if req.proposed.is_some() {
                member_keyed_by_user(req)?;
            }
            Ok(grant)
        }
    }
}

/// Membership lookups go by document key, so the key must be the userId.
fn member_keyed_by_user(req: &AccessRequest) -> Result<(), DenialKind> {
    let user_id = req.proposed.as_ref().and_then(|d| d.user_id.as_ref());
    match (user_id, &req.document_id) {
        (Some(user), Some(key)) if user.as_str() == key.as_str() => Ok(()),
        _ => Err(DenialKind::MemberKeyMismatch),
    }
}

/// Accepting an invitation: the signed-in caller's email is the invited one.
pub fn accept_invitation(ctx: &PolicyContext<'_>, invitation: &DocumentFields) -> Verdict {
    let Some(caller) = ctx.caller else {
        return Err(DenialKind::Unauthenticated);
    };
    let email = caller.email().map(|e| e.trim().to_lowercase());
    match (email, invitation.email.as_deref()) {
        (Some(email), Some(invited)) if email == invited => Ok(Grant::Invitee),
        _ => Err(DenialKind::NotInvitee),
    }
}

fn salon_private(ctx: &PolicyContext<'_>, req: &AccessRequest) -> Verdict {
    match req.operation {
        Operation::Read => require_access(ctx, existing_salon(req)),
        Operation::List => require_access(ctx, req.list_scope.as_ref()),
        Operation::Create => require_access(ctx, Some(proposed_salon(req)?)),
        Operation::Write => write_access(ctx, req, require_access),
    }
}

fn shift_change_requests(ctx: &PolicyContext<'_>, req: &AccessRequest) -> Verdict {
    match req.operation {
        Operation::Read => {
            if let Some(grant) = existing_salon(req).and_then(|s| ctx.has_access(s)) {
                return Ok(grant);
            }
            if ctx.is_caller(req.existing.as_ref().and_then(|d| d.provider_id.as_ref())) {
                return Ok(Grant::AssignedProvider);
            }
            require_access(ctx, existing_salon(req))
        }
        Operation::List => {
            if ctx.authenticated() {
                Ok(Grant::AnyAuthenticated)
            } else {
                Err(DenialKind::Unauthenticated)
            }
        }
        Operation::Create => require_access(ctx, Some(proposed_salon(req)?)),
        Operation::Write => write_access(ctx, req, require_access),
    }
}

fn sessions(ctx: &PolicyContext<'_>, req: &AccessRequest) -> Verdict {
    match req.operation {
        // Sessions are opened before sign-in.
        Operation::Create => Ok(Grant::OpenSubmission),
        Operation::List => {
            if req.collection == Collection::Sessions && ctx.surface.session_listing {
                return Ok(Grant::Public(PublicClause::SessionListing));
            }
            require_access(ctx, req.list_scope.as_ref())
        }
        Operation::Read => require_access(ctx, existing_salon(req)),
        Operation::Write => {
            let grant = require_access(ctx, existing_salon(req))?;
            // Sessions may legitimately carry no salon.
            if let Some(target) = req.proposed.as_ref().and_then(|d| d.salon_id.as_ref()) {
                require_access(ctx, Some(target))?;
            }
            Ok(grant)
        }
    }
}
