// ==========================================
// Panitia Engine - availability index
// ==========================================
// Responsibility: given a candidate time window, compute which active
// members have no overlapping commitment on another program.
// Input: member directory + current commitments (non-terminal programs)
// Output: deterministic candidate list, never an error on "nobody free"
// ==========================================

use crate::domain::member::Member;
use crate::repository::assignment_repo::AssignmentRepository;
use crate::repository::error::RepositoryResult;
use crate::repository::member_repo::MemberRepository;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// AvailabilityIndex
// ==========================================
pub struct AvailabilityIndex {
    member_repo: Arc<MemberRepository>,
    assignment_repo: Arc<AssignmentRepository>,
}

impl AvailabilityIndex {
    pub fn new(
        member_repo: Arc<MemberRepository>,
        assignment_repo: Arc<AssignmentRepository>,
    ) -> Self {
        Self {
            member_repo,
            assignment_repo,
        }
    }

    /// Active members free for the `[start, end)` window
    ///
    /// A member is available iff none of their commitments on other
    /// non-terminal programs overlaps the window (half-open:
    /// `a.start < b.end && b.start < a.end`). Commitments on
    /// `exclude_program_id` never count, so regenerating a program does not
    /// disqualify its own current committee.
    ///
    /// The returned order is the member directory's stable order
    /// (name, then id) and is the generator's tie-break order.
    #[instrument(skip(self), fields(start = %start, end = %end))]
    pub fn available(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        exclude_program_id: Option<&str>,
    ) -> RepositoryResult<Vec<Member>> {
        let members = self.member_repo.list_active()?;
        let commitments = self
            .assignment_repo
            .list_commitments(None, exclude_program_id)?;

        // member_id -> committed windows
        let mut windows: HashMap<String, Vec<(NaiveDateTime, NaiveDateTime)>> = HashMap::new();
        for c in commitments {
            windows
                .entry(c.member_id)
                .or_default()
                .push((c.start_datetime, c.end_datetime));
        }

        let available = members
            .into_iter()
            .filter(|m| {
                windows
                    .get(&m.member_id)
                    .map(|ws| !ws.iter().any(|(ws_start, ws_end)| *ws_start < end && start < *ws_end))
                    .unwrap_or(true)
            })
            .collect();

        Ok(available)
    }
}
