// ==========================================
// Panitia Engine - workload tracker
// ==========================================
// Responsibility: per-member active-assignment counts and overload
// classification. The count is always recomputed from the assignment
// store; there is no cached counter to drift out of sync.
// ==========================================

use crate::config::generator_config::GeneratorConfigReader;
use crate::domain::member::Member;
use crate::domain::types::WorkloadLevel;
use crate::repository::assignment_repo::AssignmentRepository;
use crate::repository::error::RepositoryError;
use crate::repository::member_repo::MemberRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Workload tracker error type
#[derive(Error, Debug)]
pub enum WorkloadError {
    #[error("configuration read failed: {0}")]
    Config(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// One member's current load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberWorkload {
    pub member: Member,
    pub active_assignments: i64,
    pub level: WorkloadLevel,
}

// ==========================================
// WorkloadTracker
// ==========================================
pub struct WorkloadTracker<C>
where
    C: GeneratorConfigReader,
{
    config: Arc<C>,
    member_repo: Arc<MemberRepository>,
    assignment_repo: Arc<AssignmentRepository>,
}

impl<C> WorkloadTracker<C>
where
    C: GeneratorConfigReader,
{
    pub fn new(
        config: Arc<C>,
        member_repo: Arc<MemberRepository>,
        assignment_repo: Arc<AssignmentRepository>,
    ) -> Self {
        Self {
            config,
            member_repo,
            assignment_repo,
        }
    }

    /// Count a member's assignments on non-terminal programs
    pub fn recompute(&self, member_id: &str) -> Result<i64, WorkloadError> {
        // existence check first, so a typo'd id is NotFound rather than 0
        self.member_repo.find_by_id(member_id)?;
        Ok(self.assignment_repo.count_active_for_member(member_id)?)
    }

    async fn thresholds(&self) -> Result<(i64, i64), WorkloadError> {
        let available_max = self
            .config
            .get_workload_available_max()
            .await
            .map_err(|e| WorkloadError::Config(e.to_string()))?;
        let heavy_max = self
            .config
            .get_workload_heavy_max()
            .await
            .map_err(|e| WorkloadError::Config(e.to_string()))?;
        Ok((available_max, heavy_max))
    }

    /// Count and classify one member
    pub async fn member_workload(&self, member_id: &str) -> Result<MemberWorkload, WorkloadError> {
        let member = self.member_repo.find_by_id(member_id)?;
        let count = self.assignment_repo.count_active_for_member(member_id)?;
        let (available_max, heavy_max) = self.thresholds().await?;

        Ok(MemberWorkload {
            member,
            active_assignments: count,
            level: WorkloadLevel::classify(count, available_max, heavy_max),
        })
    }

    /// Load overview across all active members, heaviest first
    pub async fn report(&self) -> Result<Vec<MemberWorkload>, WorkloadError> {
        let (available_max, heavy_max) = self.thresholds().await?;

        let mut report = Vec::new();
        for member in self.member_repo.list_active()? {
            let count = self.assignment_repo.count_active_for_member(&member.member_id)?;
            report.push(MemberWorkload {
                active_assignments: count,
                level: WorkloadLevel::classify(count, available_max, heavy_max),
                member,
            });
        }

        report.sort_by(|a, b| {
            b.active_assignments
                .cmp(&a.active_assignments)
                .then_with(|| a.member.name.cmp(&b.member.name))
        });

        Ok(report)
    }
}
