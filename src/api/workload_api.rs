// ==========================================
// Panitia Engine - workload API
// ==========================================
// Thin surface over the workload tracker for overload reporting.
// ==========================================

use crate::api::error::ApiResult;
use crate::config::generator_config::GeneratorConfigReader;
use crate::engine::workload::{MemberWorkload, WorkloadTracker};
use std::sync::Arc;

// ==========================================
// WorkloadApi
// ==========================================
pub struct WorkloadApi<C>
where
    C: GeneratorConfigReader,
{
    tracker: Arc<WorkloadTracker<C>>,
}

impl<C> WorkloadApi<C>
where
    C: GeneratorConfigReader,
{
    pub fn new(tracker: Arc<WorkloadTracker<C>>) -> Self {
        Self { tracker }
    }

    /// Active-assignment count for one member, derived from the store
    pub fn recompute(&self, member_id: &str) -> ApiResult<i64> {
        Ok(self.tracker.recompute(member_id)?)
    }

    /// Count plus overload classification for one member
    pub async fn member_workload(&self, member_id: &str) -> ApiResult<MemberWorkload> {
        Ok(self.tracker.member_workload(member_id).await?)
    }

    /// Overview across all active members, heaviest first
    pub async fn report(&self) -> ApiResult<Vec<MemberWorkload>> {
        Ok(self.tracker.report().await?)
    }
}
