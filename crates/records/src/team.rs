//! Staff records: team membership, invitations and shift changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salonbook_core::{DomainError, DomainResult, Identity, SalonId};

use crate::Collection;
use crate::record::{CollectionRecord, is_plausible_email};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Manager,
    #[default]
    Stylist,
    Reception,
}

/// Dashboard capabilities granted to a team member.
///
/// These gate dashboard navigation only; document access is decided by the
/// access policy (owner or member of the salon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamPermissions {
    pub manage_clients: bool,
    pub manage_team: bool,
    pub manage_loyalty: bool,
    pub manage_schedule: bool,
    pub view_reports: bool,
}

impl Default for TeamPermissions {
    fn default() -> Self {
        Self::for_role(TeamRole::Stylist)
    }
}

impl TeamPermissions {
    pub fn for_role(role: TeamRole) -> Self {
        match role {
            TeamRole::Manager => Self {
                manage_clients: true,
                manage_team: true,
                manage_loyalty: true,
                manage_schedule: true,
                view_reports: true,
            },
            TeamRole::Stylist => Self {
                manage_clients: true,
                manage_team: false,
                manage_loyalty: false,
                manage_schedule: false,
                view_reports: false,
            },
            TeamRole::Reception => Self {
                manage_clients: true,
                manage_team: false,
                manage_loyalty: true,
                manage_schedule: true,
                view_reports: false,
            },
        }
    }
}

/// Membership record, stored under the member's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub salon_id: SalonId,
    pub user_id: Identity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: TeamRole,
    #[serde(default)]
    pub permissions: TeamPermissions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
}

impl CollectionRecord for TeamMember {
    const COLLECTION: Collection = Collection::TeamMembers;

    fn validate(&self) -> DomainResult<()> {
        if let Some(email) = &self.email {
            if !is_plausible_email(email) {
                return Err(DomainError::validation("email is not a valid address"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Revoked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub salon_id: SalonId,
    pub email: String,
    #[serde(default)]
    pub role: TeamRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<Identity>,
    #[serde(default)]
    pub status: InvitationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Membership record created when `user_id` accepts this invitation.
    pub fn accept(&self, user_id: Identity, now: DateTime<Utc>) -> DomainResult<TeamMember> {
        if self.status != InvitationStatus::Pending {
            return Err(DomainError::conflict("invitation is no longer pending"));
        }
        Ok(TeamMember {
            salon_id: self.salon_id.clone(),
            user_id,
            email: Some(self.email.clone()),
            display_name: None,
            role: self.role,
            permissions: TeamPermissions::for_role(self.role),
            joined_at: Some(now),
        })
    }
}

impl CollectionRecord for Invitation {
    const COLLECTION: Collection = Collection::Invitations;

    fn validate(&self) -> DomainResult<()> {
        if !is_plausible_email(&self.email) {
            return Err(DomainError::validation("email is not a valid address"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftChangeStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A provider's request to move or drop a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftChangeRequest {
    pub salon_id: SalonId,
    /// Identity of the requesting provider.
    pub provider_id: Identity,
    pub shift_start: DateTime<Utc>,
    pub shift_end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: ShiftChangeStatus,
}

impl CollectionRecord for ShiftChangeRequest {
    const COLLECTION: Collection = Collection::ShiftChangeRequests;

    fn validate(&self) -> DomainResult<()> {
        if self.shift_end <= self.shift_start {
            return Err(DomainError::validation("shiftEnd must be after shiftStart"));
        }
        match (self.requested_start, self.requested_end) {
            (Some(start), Some(end)) if end <= start => Err(DomainError::validation(
                "requestedEnd must be after requestedStart",
            )),
            (Some(_), None) | (None, Some(_)) => Err(DomainError::validation(
                "requestedStart and requestedEnd must be given together",
            )),
            _ => Ok(()),
        }
    }
}
