use std::sync::Arc;

use salonbook_core::{Identity, SalonId};

/// Auxiliary lookups the policy performs while deciding.
///
/// Missing records are `None`; the policy treats absence as "relationship
/// does not hold", never as an error.
pub trait PolicyDirectory: Send + Sync {
    /// Salon referenced by the team-member record stored under `identity`.
    fn team_member_salon(&self, identity: &Identity) -> Option<SalonId>;

    /// Owning identity of the salon stored under `salon_id`, if it exists.
    fn salon_owner(&self, salon_id: &SalonId) -> Option<Identity>;
}

impl<D> PolicyDirectory for Arc<D>
where
    D: PolicyDirectory + ?Sized,
{
    fn team_member_salon(&self, identity: &Identity) -> Option<SalonId> {
        (**self).team_member_salon(identity)
    }

    fn salon_owner(&self, salon_id: &SalonId) -> Option<Identity> {
        (**self).salon_owner(salon_id)
    }
}
