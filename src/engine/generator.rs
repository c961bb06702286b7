// ==========================================
// Panitia Engine - assignment generator
// ==========================================
// Responsibility: propose and commit a committee for one program.
// Greedy, single pass, no backtracking; infeasibility is detected by
// threshold gates, not search. Deterministic under identical inputs.
//
// Regeneration contract: all unlocked rows are replaced and all locked
// rows preserved inside one transaction; locked members keep their role
// and are excluded from reassignment within the same pass.
// ==========================================

use crate::config::generator_config::GeneratorConfigReader;
use crate::domain::assignment::{Assignment, Revision};
use crate::engine::availability::AvailabilityIndex;
use crate::engine::events::{AssignmentEvent, AssignmentEventType, OptionalEventPublisher};
use crate::engine::generator_core::GeneratorCore;
use crate::repository::assignment_repo::AssignmentRepository;
use crate::repository::commission_repo::CommissionRepository;
use crate::repository::error::RepositoryError;
use crate::repository::program_repo::ProgramRepository;
use crate::repository::revision_repo::RevisionRepository;
use chrono::{NaiveDateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

// ==========================================
// Errors
// ==========================================

/// Generator error taxonomy
///
/// The four feasibility variants report why no committee could be formed;
/// none of them leaves partial assignments behind.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("insufficient available members: {available} available, {required} required")]
    InsufficientMembers { available: usize, required: usize },

    #[error("insufficient commission diversity: {distinct} distinct commissions, {required} required")]
    InsufficientCommissionDiversity { distinct: usize, required: usize },

    #[error("gatekeeper commission unavailable: no available member of '{commission}' for role '{role}'")]
    GatekeeperCommissionUnavailable { role: String, commission: String },

    #[error("insufficient role fill: {filled} of {total} required roles filled, {required} needed")]
    InsufficientRoleFill {
        filled: usize,
        required: usize,
        total: usize,
    },

    #[error("program window is empty or inverted: start={start}, end={end}")]
    InvalidWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("configuration read failed: {0}")]
    Config(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl GeneratorError {
    /// Stable machine-readable kind for feasibility failures
    pub fn feasibility_kind(&self) -> Option<&'static str> {
        match self {
            GeneratorError::InsufficientMembers { .. } => Some("INSUFFICIENT_MEMBERS"),
            GeneratorError::InsufficientCommissionDiversity { .. } => {
                Some("INSUFFICIENT_COMMISSION_DIVERSITY")
            }
            GeneratorError::GatekeeperCommissionUnavailable { .. } => {
                Some("GATEKEEPER_COMMISSION_UNAVAILABLE")
            }
            GeneratorError::InsufficientRoleFill { .. } => Some("INSUFFICIENT_ROLE_FILL"),
            _ => None,
        }
    }
}

/// Outcome of one committed generation pass
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub program_id: String,
    /// Rows inserted by this pass
    pub assignments: Vec<Assignment>,
    /// Locked rows that survived regeneration untouched
    pub preserved: Vec<Assignment>,
    /// Revision recorded before the destructive replace, if any
    pub revision_id: Option<String>,
}

// ==========================================
// AssignmentGenerator
// ==========================================
pub struct AssignmentGenerator<C>
where
    C: GeneratorConfigReader,
{
    config: Arc<C>,
    program_repo: Arc<ProgramRepository>,
    commission_repo: Arc<CommissionRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    revision_repo: Arc<RevisionRepository>,
    availability: Arc<AvailabilityIndex>,
    events: OptionalEventPublisher,
}

impl<C> AssignmentGenerator<C>
where
    C: GeneratorConfigReader,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<C>,
        program_repo: Arc<ProgramRepository>,
        commission_repo: Arc<CommissionRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        revision_repo: Arc<RevisionRepository>,
        availability: Arc<AvailabilityIndex>,
        events: OptionalEventPublisher,
    ) -> Self {
        Self {
            config,
            program_repo,
            commission_repo,
            assignment_repo,
            revision_repo,
            availability,
            events,
        }
    }

    /// Generate (or regenerate) the committee of one program
    ///
    /// Feasibility gates, in order:
    /// 1. enough available members
    /// 2. enough distinct commissions among them
    /// 3. every gatekeeper commission has at least one available member
    /// 4. enough required roles actually filled
    ///
    /// Any gate failure returns before the store is touched.
    #[instrument(skip(self), fields(program_id = %program_id))]
    pub async fn generate(
        &self,
        program_id: &str,
        batch_id: Option<&str>,
    ) -> Result<GenerationResult, GeneratorError> {
        let program = self.program_repo.find_by_id(program_id)?;
        if !program.has_valid_window() {
            return Err(GeneratorError::InvalidWindow {
                start: program.start_datetime,
                end: program.end_datetime,
            });
        }

        let required_roles = self
            .config
            .get_required_roles()
            .await
            .map_err(|e| GeneratorError::Config(e.to_string()))?;
        let min_members = self
            .config
            .get_min_available_members()
            .await
            .map_err(|e| GeneratorError::Config(e.to_string()))?;
        let min_commissions = self
            .config
            .get_min_commission_diversity()
            .await
            .map_err(|e| GeneratorError::Config(e.to_string()))?;
        let min_roles_filled = self
            .config
            .get_min_roles_filled()
            .await
            .map_err(|e| GeneratorError::Config(e.to_string()))?;
        let gatekeeper_rules = self
            .config
            .get_gatekeeper_rules()
            .await
            .map_err(|e| GeneratorError::Config(e.to_string()))?;
        let revision_on_regenerate = self
            .config
            .get_revision_on_regenerate()
            .await
            .map_err(|e| GeneratorError::Config(e.to_string()))?;

        // Gate 1: available-member floor
        let available = self.availability.available(
            program.start_datetime,
            program.end_datetime,
            Some(program_id),
        )?;
        if available.len() < min_members {
            return Err(GeneratorError::InsufficientMembers {
                available: available.len(),
                required: min_members,
            });
        }

        // Gate 2: commission diversity
        let distinct = GeneratorCore::partition_by_commission(&available).len();
        if distinct < min_commissions {
            return Err(GeneratorError::InsufficientCommissionDiversity {
                distinct,
                required: min_commissions,
            });
        }

        // Locked rows survive; their members and roles leave the pass
        let locked = self.assignment_repo.find_locked_by_program(program_id)?;
        let locked_member_ids: HashSet<&str> =
            locked.iter().map(|a| a.member_id.as_str()).collect();
        let locked_roles: HashSet<String> = locked.iter().map(|a| a.role.clone()).collect();

        let candidates: Vec<_> = available
            .into_iter()
            .filter(|m| !locked_member_ids.contains(m.member_id.as_str()))
            .collect();

        // Gate 3: every gatekeeper rule needs at least one candidate, unless
        // a locked row already occupies the gatekeeper role
        let commission_id_by_name: HashMap<String, String> = self
            .commission_repo
            .list()?
            .into_iter()
            .map(|c| (c.name, c.commission_id))
            .collect();

        let mut gatekeeper_by_role: HashMap<String, String> = HashMap::new();
        for rule in &gatekeeper_rules {
            if locked_roles.contains(&rule.role) {
                continue;
            }

            // an unknown commission name behaves like an empty pool
            let has_candidate = commission_id_by_name
                .get(&rule.commission_name)
                .map_or(false, |cid| {
                    candidates
                        .iter()
                        .any(|m| m.commission_id.as_deref() == Some(cid.as_str()))
                });
            if !has_candidate {
                return Err(GeneratorError::GatekeeperCommissionUnavailable {
                    role: rule.role.clone(),
                    commission: rule.commission_name.clone(),
                });
            }

            let commission_id = commission_id_by_name[&rule.commission_name].clone();
            gatekeeper_by_role.insert(rule.role.clone(), commission_id);
        }

        // Fixed-order walk over the required roles
        let picks = GeneratorCore::select_committee(
            &candidates,
            &required_roles,
            &locked_roles,
            &gatekeeper_by_role,
        );

        // Gate 4: role-fill floor (locked required roles count as filled)
        let locked_required = locked
            .iter()
            .filter(|a| required_roles.contains(&a.role))
            .count();
        let filled = picks.len() + locked_required;
        if filled < min_roles_filled {
            return Err(GeneratorError::InsufficientRoleFill {
                filled,
                required: min_roles_filled,
                total: required_roles.len(),
            });
        }

        // Advisory snapshot before the destructive replace
        let existing = self.assignment_repo.find_by_program(program_id)?;
        let revision_id = if !existing.is_empty() && revision_on_regenerate {
            Some(self.record_revision(program_id, &existing)?)
        } else {
            None
        };

        let replacements: Vec<Assignment> = picks
            .iter()
            .map(|pick| {
                Assignment::new_generated(
                    program_id,
                    &pick.member_id,
                    &pick.role,
                    pick.commission_id.clone(),
                    batch_id.map(str::to_string),
                    revision_id.clone(),
                )
            })
            .collect();

        // One transaction: delete unlocked, insert replacements, keep locked
        self.assignment_repo
            .replace_unlocked_for_program(program_id, &replacements)?;

        tracing::info!(
            program_id,
            inserted = replacements.len(),
            preserved = locked.len(),
            "committee generated"
        );

        self.events.publish(AssignmentEvent::new(
            program_id,
            AssignmentEventType::AssignmentsRegenerated,
            Some("AssignmentGenerator"),
        ));

        Ok(GenerationResult {
            program_id: program_id.to_string(),
            assignments: replacements,
            preserved: locked,
            revision_id,
        })
    }

    fn record_revision(
        &self,
        program_id: &str,
        assignments: &[Assignment],
    ) -> Result<String, GeneratorError> {
        let snapshot_json = serde_json::to_string(assignments)
            .map_err(|e| GeneratorError::Config(format!("snapshot serialization failed: {}", e)))?;

        let revision = Revision {
            revision_id: Uuid::new_v4().to_string(),
            program_id: program_id.to_string(),
            revision_no: self.revision_repo.next_revision_no(program_id)?,
            change_reason: Some("regeneration".to_string()),
            snapshot_json,
            created_at: Utc::now().naive_utc(),
        };

        self.revision_repo.insert(&revision)?;
        Ok(revision.revision_id)
    }
}
