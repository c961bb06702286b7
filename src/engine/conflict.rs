// ==========================================
// Panitia Engine - time-conflict detector
// ==========================================
// Responsibility: report overlapping commitments for a member or for every
// current assignee of a program. Reporting only, never mutates state.
// Used proactively (the availability index is its batch form) and
// reactively, after a schedule changed under existing assignments.
// ==========================================

use crate::domain::program::Program;
use crate::repository::assignment_repo::AssignmentRepository;
use crate::repository::error::RepositoryResult;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Conflicts found for one current assignee of a program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberConflictReport {
    pub member_id: String,                 // conflicted assignee
    pub roles: Vec<String>,                // roles they hold on the program
    pub conflicting_programs: Vec<Program>, // overlapping programs, by start time
}

impl MemberConflictReport {
    pub fn conflicting_program_ids(&self) -> Vec<String> {
        self.conflicting_programs
            .iter()
            .map(|p| p.program_id.clone())
            .collect()
    }
}

// ==========================================
// ConflictDetector
// ==========================================
pub struct ConflictDetector {
    assignment_repo: Arc<AssignmentRepository>,
}

impl ConflictDetector {
    pub fn new(assignment_repo: Arc<AssignmentRepository>) -> Self {
        Self { assignment_repo }
    }

    /// Programs the member is committed to that overlap `[start, end)`
    ///
    /// Ordered by program start time, then program id. Commitments on
    /// `exclude_program_id` are skipped.
    pub fn conflicts_for(
        &self,
        member_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude_program_id: Option<&str>,
    ) -> RepositoryResult<Vec<Program>> {
        let programs = self
            .assignment_repo
            .list_member_programs(member_id, exclude_program_id)?;

        // repo returns them ordered by start time already; keep only overlaps
        Ok(programs
            .into_iter()
            .filter(|p| p.overlaps(start, end))
            .collect())
    }

    /// Re-check every current assignee of a program
    ///
    /// Surfaces conflicts introduced after assignment, e.g. when another
    /// program's schedule moved. One report per conflicted member.
    #[instrument(skip(self, program), fields(program_id = %program.program_id))]
    pub fn detect_for_program(&self, program: &Program) -> RepositoryResult<Vec<MemberConflictReport>> {
        let assignments = self.assignment_repo.find_by_program(&program.program_id)?;

        let mut reports: Vec<MemberConflictReport> = Vec::new();
        for assignment in assignments {
            if let Some(existing) = reports
                .iter_mut()
                .find(|r| r.member_id == assignment.member_id)
            {
                existing.roles.push(assignment.role);
                continue;
            }

            let conflicts = self.conflicts_for(
                &assignment.member_id,
                program.start_datetime,
                program.end_datetime,
                Some(&program.program_id),
            )?;

            if !conflicts.is_empty() {
                reports.push(MemberConflictReport {
                    member_id: assignment.member_id,
                    roles: vec![assignment.role],
                    conflicting_programs: conflicts,
                });
            }
        }

        Ok(reports)
    }
}
