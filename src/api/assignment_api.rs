// ==========================================
// Panitia Engine - assignment API
// ==========================================
// Responsibility: the caller-facing operation surface over the generator,
// conflict detector, lock/revision manager and assignment store.
// Conflicts are advisory: they ride alongside successful results and
// never block an operation.
// ==========================================

use crate::config::generator_config::GeneratorConfigReader;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::assignment::{Assignment, GenerationBatch, Revision};
use crate::engine::conflict::{ConflictDetector, MemberConflictReport};
use crate::engine::events::{AssignmentEvent, AssignmentEventType, OptionalEventPublisher};
use crate::engine::generator::AssignmentGenerator;
use crate::repository::assignment_repo::AssignmentRepository;
use crate::repository::batch_repo::BatchRepository;
use crate::repository::member_repo::MemberRepository;
use crate::repository::program_repo::ProgramRepository;
use crate::repository::revision_repo::RevisionRepository;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

// ==========================================
// Request / response types
// ==========================================

/// Filter for assignment listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentFilter {
    pub program_id: Option<String>,
    pub member_id: Option<String>,
}

/// Successful generation response
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub program_id: String,
    /// The program's full current committee (new + preserved locked rows)
    pub assignments: Vec<Assignment>,
    /// Revision recorded before the replace, if one was taken
    pub revision_id: Option<String>,
    /// Advisory conflict reports for the new committee
    pub conflicts: Vec<MemberConflictReport>,
}

/// One failed program within a bulk run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkFailure {
    pub program_id: String,
    pub kind: String,
    pub reason: String,
}

/// Bulk generation report: per-program isolation, partial success expected
#[derive(Debug, Clone)]
pub struct BulkGenerationReport {
    pub batch_id: String,
    pub succeeded: Vec<String>,
    pub failed: Vec<BulkFailure>,
}

// ==========================================
// AssignmentApi
// ==========================================
pub struct AssignmentApi<C>
where
    C: GeneratorConfigReader,
{
    program_repo: Arc<ProgramRepository>,
    member_repo: Arc<MemberRepository>,
    assignment_repo: Arc<AssignmentRepository>,
    revision_repo: Arc<RevisionRepository>,
    batch_repo: Arc<BatchRepository>,
    generator: Arc<AssignmentGenerator<C>>,
    conflict_detector: Arc<ConflictDetector>,
    events: OptionalEventPublisher,
}

impl<C> AssignmentApi<C>
where
    C: GeneratorConfigReader,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        program_repo: Arc<ProgramRepository>,
        member_repo: Arc<MemberRepository>,
        assignment_repo: Arc<AssignmentRepository>,
        revision_repo: Arc<RevisionRepository>,
        batch_repo: Arc<BatchRepository>,
        generator: Arc<AssignmentGenerator<C>>,
        conflict_detector: Arc<ConflictDetector>,
        events: OptionalEventPublisher,
    ) -> Self {
        Self {
            program_repo,
            member_repo,
            assignment_repo,
            revision_repo,
            batch_repo,
            generator,
            conflict_detector,
            events,
        }
    }

    /// Generate (or regenerate) one program's committee
    ///
    /// On success the response carries the full current committee plus
    /// advisory conflict reports; feasibility failures write nothing.
    #[instrument(skip(self))]
    pub async fn generate_assignments(&self, program_id: &str) -> ApiResult<GenerationOutcome> {
        let result = self.generator.generate(program_id, None).await?;

        let program = self.program_repo.find_by_id(program_id)?;
        let assignments = self.assignment_repo.find_by_program(program_id)?;
        let conflicts = self.conflict_detector.detect_for_program(&program)?;

        Ok(GenerationOutcome {
            program_id: program_id.to_string(),
            assignments,
            revision_id: result.revision_id,
            conflicts,
        })
    }

    /// Generate committees for several programs, sequentially
    ///
    /// Failures are isolated per program: an infeasible program lands in
    /// `failed` with its reason and does not roll back or block the others.
    #[instrument(skip(self, program_ids), fields(count = program_ids.len()))]
    pub async fn bulk_generate(
        &self,
        program_ids: &[String],
        description: Option<&str>,
    ) -> ApiResult<BulkGenerationReport> {
        if program_ids.is_empty() {
            return Err(ApiError::InvalidInput(
                "bulk generation needs at least one program".to_string(),
            ));
        }

        let batch = GenerationBatch::new(description, program_ids);
        self.batch_repo.insert(&batch)?;

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();

        for program_id in program_ids {
            match self.generator.generate(program_id, Some(&batch.batch_id)).await {
                Ok(_) => succeeded.push(program_id.clone()),
                Err(e) => {
                    let api_err: ApiError = e.into();
                    tracing::warn!(
                        program_id = program_id.as_str(),
                        kind = api_err.kind(),
                        "bulk generation: program skipped"
                    );
                    failed.push(BulkFailure {
                        program_id: program_id.clone(),
                        kind: api_err.kind().to_string(),
                        reason: api_err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            batch_id = batch.batch_id.as_str(),
            succeeded = succeeded.len(),
            failed = failed.len(),
            "bulk generation finished"
        );

        Ok(BulkGenerationReport {
            batch_id: batch.batch_id,
            succeeded,
            failed,
        })
    }

    /// List assignments, optionally narrowed to a program and/or member
    pub fn list_assignments(&self, filter: &AssignmentFilter) -> ApiResult<Vec<Assignment>> {
        Ok(self.assignment_repo.find_by_filters(
            filter.program_id.as_deref(),
            filter.member_id.as_deref(),
        )?)
    }

    /// Manually add one assignment
    ///
    /// Bypasses the generator's feasibility gates; only existence, a
    /// non-empty role, commission affiliation and the uniqueness invariant
    /// are enforced.
    pub fn add_assignment(
        &self,
        program_id: &str,
        member_id: &str,
        role: &str,
    ) -> ApiResult<Assignment> {
        let role = role.trim();
        if role.is_empty() {
            return Err(ApiError::InvalidInput("role must not be empty".to_string()));
        }

        self.program_repo.find_by_id(program_id)?;
        let member = self.member_repo.find_by_id(member_id)?;

        let commission_id = member.commission_id.clone().ok_or_else(|| {
            ApiError::BusinessRuleViolation(format!(
                "member '{}' has no commission affiliation",
                member.name
            ))
        })?;

        let assignment =
            Assignment::new_manual(program_id, member_id, role, Some(commission_id));
        self.assignment_repo.insert(&assignment)?;

        self.events.publish(AssignmentEvent::new(
            program_id,
            AssignmentEventType::AssignmentAdded,
            Some("AssignmentApi"),
        ));

        Ok(assignment)
    }

    /// Flip an assignment's advisory lock flag
    pub fn toggle_lock(&self, assignment_id: &str) -> ApiResult<Assignment> {
        let current = self.assignment_repo.find_by_id(assignment_id)?;
        let updated = self
            .assignment_repo
            .set_locked(assignment_id, !current.is_locked)?;

        self.events.publish(AssignmentEvent::new(
            &updated.program_id,
            AssignmentEventType::LockToggled,
            Some("AssignmentApi"),
        ));

        Ok(updated)
    }

    /// Remove one assignment, locked or not
    ///
    /// Locking protects against bulk regeneration only; explicit removal
    /// always operates on the targeted row.
    pub fn remove_assignment(&self, assignment_id: &str) -> ApiResult<()> {
        let assignment = self.assignment_repo.find_by_id(assignment_id)?;
        self.assignment_repo.delete(assignment_id)?;

        self.events.publish(AssignmentEvent::new(
            &assignment.program_id,
            AssignmentEventType::AssignmentRemoved,
            Some("AssignmentApi"),
        ));

        Ok(())
    }

    /// Conflict reports for every current assignee of a program
    pub fn detect_conflicts(&self, program_id: &str) -> ApiResult<Vec<MemberConflictReport>> {
        let program = self.program_repo.find_by_id(program_id)?;
        Ok(self.conflict_detector.detect_for_program(&program)?)
    }

    /// Capture a revision snapshot of a program's current committee
    pub fn snapshot_revision(&self, program_id: &str, reason: Option<&str>) -> ApiResult<Revision> {
        self.program_repo.find_by_id(program_id)?;
        let assignments = self.assignment_repo.find_by_program(program_id)?;

        let snapshot_json = serde_json::to_string(&assignments)
            .map_err(|e| ApiError::InternalError(format!("snapshot serialization failed: {}", e)))?;

        let revision = Revision {
            revision_id: Uuid::new_v4().to_string(),
            program_id: program_id.to_string(),
            revision_no: self.revision_repo.next_revision_no(program_id)?,
            change_reason: reason.map(str::to_string),
            snapshot_json,
            created_at: Utc::now().naive_utc(),
        };
        self.revision_repo.insert(&revision)?;

        Ok(revision)
    }

    /// Revision history of a program, newest first
    pub fn list_revisions(&self, program_id: &str) -> ApiResult<Vec<Revision>> {
        self.program_repo.find_by_id(program_id)?;
        Ok(self.revision_repo.find_by_program(program_id)?)
    }
}
