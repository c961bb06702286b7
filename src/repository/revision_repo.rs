// ==========================================
// Panitia Engine - revision repository
// ==========================================
// Revisions are immutable pre-change snapshots of a program's assignment
// set. Insert-only; there is deliberately no update path.
// ==========================================

use crate::db::DATETIME_FORMAT;
use crate::domain::assignment::Revision;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::member_repo::parse_datetime;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// RevisionRepository
// ==========================================
pub struct RevisionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RevisionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert a revision snapshot
    pub fn insert(&self, revision: &Revision) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO panitia_revisions (
                    revision_id, program_id, revision_no, change_reason,
                    snapshot_json, created_at
                ) VALUES (?, ?, ?, ?, ?, ?)"#,
            params![
                &revision.revision_id,
                &revision.program_id,
                revision.revision_no,
                &revision.change_reason,
                &revision.snapshot_json,
                revision.created_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;

        Ok(())
    }

    /// Next revision number for a program (1-based, monotonic)
    pub fn next_revision_no(&self, program_id: &str) -> RepositoryResult<i32> {
        let conn = self.get_conn()?;

        let max: Option<i32> = conn.query_row(
            "SELECT MAX(revision_no) FROM panitia_revisions WHERE program_id = ?",
            params![program_id],
            |row| row.get(0),
        )?;

        Ok(max.unwrap_or(0) + 1)
    }

    /// All revisions of a program, newest first
    pub fn find_by_program(&self, program_id: &str) -> RepositoryResult<Vec<Revision>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT revision_id, program_id, revision_no, change_reason,
                      snapshot_json, created_at
               FROM panitia_revisions
               WHERE program_id = ?
               ORDER BY revision_no DESC"#,
        )?;

        let revisions = stmt
            .query_map(params![program_id], map_row)?
            .collect::<Result<Vec<Revision>, _>>()?;

        Ok(revisions)
    }
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Revision> {
    Ok(Revision {
        revision_id: row.get(0)?,
        program_id: row.get(1)?,
        revision_no: row.get(2)?,
        change_reason: row.get(3)?,
        snapshot_json: row.get(4)?,
        created_at: parse_datetime(row, 5)?,
    })
}
