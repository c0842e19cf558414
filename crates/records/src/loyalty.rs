//! Stamp-card loyalty: programs, customer passes and the visits that feed them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use salonbook_core::{DocumentId, DomainError, DomainResult, SalonId};

use crate::Collection;
use crate::record::{CollectionRecord, is_plausible_email, require_non_empty};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyProgram {
    pub salon_id: SalonId,
    pub name: String,
    pub stamps_required: u32,
    pub reward: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CollectionRecord for LoyaltyProgram {
    const COLLECTION: Collection = Collection::LoyaltyPrograms;

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("name", &self.name)?;
        require_non_empty("reward", &self.reward)?;
        if self.stamps_required == 0 {
            return Err(DomainError::validation("stampsRequired must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPass {
    pub salon_id: SalonId,
    pub program_id: DocumentId,
    pub client_email: String,
    #[serde(default)]
    pub stamps: u32,
    #[serde(default)]
    pub rewards_redeemed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit_at: Option<DateTime<Utc>>,
}

impl CustomerPass {
    pub fn new(salon_id: SalonId, program_id: DocumentId, client_email: &str) -> Self {
        Self {
            salon_id,
            program_id,
            client_email: client_email.trim().to_lowercase(),
            stamps: 0,
            rewards_redeemed: 0,
            last_visit_at: None,
        }
    }

    /// Credit a visit's stamps to this pass.
    pub fn record_visit(&mut self, visit: &VisitRecord) -> DomainResult<()> {
        if visit.salon_id != self.salon_id {
            return Err(DomainError::validation("visit belongs to another salon"));
        }
        self.stamps = self.stamps.saturating_add(visit.stamps_awarded);
        self.last_visit_at = Some(match self.last_visit_at {
            Some(prev) if prev > visit.visited_at => prev,
            _ => visit.visited_at,
        });
        Ok(())
    }

    pub fn reward_available(&self, program: &LoyaltyProgram) -> bool {
        program.active && self.stamps >= program.stamps_required
    }

    /// Spend one reward's worth of stamps.
    pub fn redeem(&mut self, program: &LoyaltyProgram) -> DomainResult<()> {
        if !self.reward_available(program) {
            return Err(DomainError::conflict(format!(
                "{} of {} stamps collected",
                self.stamps, program.stamps_required
            )));
        }
        self.stamps -= program.stamps_required;
        self.rewards_redeemed += 1;
        Ok(())
    }
}

impl CollectionRecord for CustomerPass {
    const COLLECTION: Collection = Collection::CustomerPasses;

    fn validate(&self) -> DomainResult<()> {
        if !is_plausible_email(&self.client_email) {
            return Err(DomainError::validation("clientEmail is not a valid address"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub salon_id: SalonId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_id: Option<DocumentId>,
    pub client_email: String,
    pub visited_at: DateTime<Utc>,
    #[serde(default)]
    pub service_ids: Vec<DocumentId>,
    #[serde(default = "default_stamps")]
    pub stamps_awarded: u32,
}

fn default_stamps() -> u32 {
    1
}

impl CollectionRecord for VisitRecord {
    const COLLECTION: Collection = Collection::VisitRecords;

    fn validate(&self) -> DomainResult<()> {
        if !is_plausible_email(&self.client_email) {
            return Err(DomainError::validation("clientEmail is not a valid address"));
        }
        Ok(())
    }
}
