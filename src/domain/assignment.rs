// ==========================================
// Panitia Engine - assignment, revision and batch models
// ==========================================
// An assignment ties one member to one role on one program and snapshots
// the member's commission at assignment time. At most one assignment may
// exist per (program, member, role) triple.
// ==========================================

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Assignment - one member, one role, one program
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_id: String,         // assignment ID (uuid)
    pub program_id: String,            // target program
    pub member_id: String,             // assigned member
    pub role: String,                  // role name (ketua / sekretaris / ...)
    pub commission_id: Option<String>, // commission snapshot at assignment time
    pub is_required_role: bool,        // leadership role vs optional division
    pub is_locked: bool,               // shielded from bulk regeneration
    pub batch_id: Option<String>,      // bulk-generation run, traceability only
    pub revision_id: Option<String>,   // revision that preceded this row, if any
    pub created_at: NaiveDateTime,
}

impl Assignment {
    /// Build a fresh generated assignment for a required role
    pub fn new_generated(
        program_id: &str,
        member_id: &str,
        role: &str,
        commission_id: Option<String>,
        batch_id: Option<String>,
        revision_id: Option<String>,
    ) -> Self {
        Self {
            assignment_id: Uuid::new_v4().to_string(),
            program_id: program_id.to_string(),
            member_id: member_id.to_string(),
            role: role.to_string(),
            commission_id,
            is_required_role: true,
            is_locked: false,
            batch_id,
            revision_id,
            created_at: Utc::now().naive_utc(),
        }
    }

    /// Build a manual assignment (operator-added, not generator-proposed)
    pub fn new_manual(
        program_id: &str,
        member_id: &str,
        role: &str,
        commission_id: Option<String>,
    ) -> Self {
        Self {
            assignment_id: Uuid::new_v4().to_string(),
            program_id: program_id.to_string(),
            member_id: member_id.to_string(),
            role: role.to_string(),
            commission_id,
            is_required_role: false,
            is_locked: false,
            batch_id: None,
            revision_id: None,
            created_at: Utc::now().naive_utc(),
        }
    }
}

// ==========================================
// Revision - immutable pre-change snapshot
// ==========================================
// Captured before a destructive regeneration; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    pub revision_id: String,          // revision ID (uuid)
    pub program_id: String,           // snapshotted program
    pub revision_no: i32,             // monotonic per program
    pub change_reason: Option<String>, // why the change happened
    pub snapshot_json: String,        // full assignment set as JSON
    pub created_at: NaiveDateTime,
}

// ==========================================
// GenerationBatch - one bulk-generation invocation
// ==========================================
// Groups assignments created by one bulk run across programs.
// Traceability only, no constraint logic reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationBatch {
    pub batch_id: String,             // batch ID (uuid)
    pub description: Option<String>,  // operator note
    pub program_ids: Vec<String>,     // programs the run covered
    pub created_at: NaiveDateTime,
}

impl GenerationBatch {
    pub fn new(description: Option<&str>, program_ids: &[String]) -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            description: description.map(str::to_string),
            program_ids: program_ids.to_vec(),
            created_at: Utc::now().naive_utc(),
        }
    }
}
