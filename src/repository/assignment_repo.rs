// ==========================================
// Panitia Engine - assignment store
// ==========================================
// The single source of truth for current assignments. All mutation paths
// (generation, manual add/remove, lock toggling) go through here.
//
// Invariant: regeneration replaces unlocked rows and preserves locked rows
// inside one transaction; a concurrent reader sees the fully-old or the
// fully-new set, never an intermediate empty state.
// ==========================================

use crate::db::DATETIME_FORMAT;
use crate::domain::assignment::Assignment;
use crate::domain::program::Program;
use crate::domain::types::ProgramStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::member_repo::parse_datetime;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// One member's commitment to a program, as seen by availability and
/// conflict checks. Only non-terminal programs appear here.
#[derive(Debug, Clone)]
pub struct MemberCommitment {
    pub member_id: String,
    pub program_id: String,
    pub program_name: String,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: NaiveDateTime,
}

// ==========================================
// AssignmentRepository
// ==========================================
pub struct AssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

const ASSIGNMENT_COLUMNS: &str = "assignment_id, program_id, member_id, role, commission_id, \
     is_required_role, is_locked, batch_id, revision_id, created_at";

impl AssignmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert a single assignment row
    pub fn insert(&self, assignment: &Assignment) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        Self::insert_with(&conn, assignment)?;
        Ok(())
    }

    fn insert_with(conn: &Connection, assignment: &Assignment) -> rusqlite::Result<()> {
        conn.execute(
            r#"INSERT INTO panitia_assignments (
                    assignment_id, program_id, member_id, role, commission_id,
                    is_required_role, is_locked, batch_id, revision_id, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                &assignment.assignment_id,
                &assignment.program_id,
                &assignment.member_id,
                &assignment.role,
                &assignment.commission_id,
                if assignment.is_required_role { 1 } else { 0 },
                if assignment.is_locked { 1 } else { 0 },
                &assignment.batch_id,
                &assignment.revision_id,
                assignment.created_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }

    /// Find an assignment by id
    pub fn find_by_id(&self, assignment_id: &str) -> RepositoryResult<Assignment> {
        let conn = self.get_conn()?;

        let assignment = conn
            .query_row(
                &format!(
                    "SELECT {} FROM panitia_assignments WHERE assignment_id = ?",
                    ASSIGNMENT_COLUMNS
                ),
                params![assignment_id],
                map_row,
            )
            .optional()?;

        assignment.ok_or_else(|| RepositoryError::NotFound {
            entity: "Assignment".to_string(),
            id: assignment_id.to_string(),
        })
    }

    /// List assignments filtered by program and/or member
    pub fn find_by_filters(
        &self,
        program_id: Option<&str>,
        member_id: Option<&str>,
    ) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;

        let mut sql = format!(
            "SELECT {} FROM panitia_assignments WHERE 1 = 1",
            ASSIGNMENT_COLUMNS
        );
        let mut values: Vec<String> = Vec::new();

        if let Some(pid) = program_id {
            sql.push_str(" AND program_id = ?");
            values.push(pid.to_string());
        }
        if let Some(mid) = member_id {
            sql.push_str(" AND member_id = ?");
            values.push(mid.to_string());
        }

        sql.push_str(" ORDER BY program_id, created_at, role, assignment_id");

        let mut stmt = conn.prepare(&sql)?;
        let assignments = stmt
            .query_map(rusqlite::params_from_iter(values), map_row)?
            .collect::<Result<Vec<Assignment>, _>>()?;

        Ok(assignments)
    }

    /// All assignments of one program
    pub fn find_by_program(&self, program_id: &str) -> RepositoryResult<Vec<Assignment>> {
        self.find_by_filters(Some(program_id), None)
    }

    /// Locked assignments of one program
    pub fn find_locked_by_program(&self, program_id: &str) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM panitia_assignments \
             WHERE program_id = ? AND is_locked = 1 \
             ORDER BY created_at, role, assignment_id",
            ASSIGNMENT_COLUMNS
        ))?;

        let assignments = stmt
            .query_map(params![program_id], map_row)?
            .collect::<Result<Vec<Assignment>, _>>()?;

        Ok(assignments)
    }

    /// Replace a program's unlocked assignments with a new set, atomically
    ///
    /// Deletes every unlocked row of the program and inserts the replacement
    /// rows inside one transaction. Locked rows are never touched. On any
    /// failure the transaction rolls back and the store is unchanged.
    pub fn replace_unlocked_for_program(
        &self,
        program_id: &str,
        replacements: &[Assignment],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "DELETE FROM panitia_assignments WHERE program_id = ? AND is_locked = 0",
            params![program_id],
        )?;

        for assignment in replacements {
            Self::insert_with(&tx, assignment)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(replacements.len())
    }

    /// Flip the advisory lock flag and return the updated row
    pub fn set_locked(&self, assignment_id: &str, locked: bool) -> RepositoryResult<Assignment> {
        {
            let conn = self.get_conn()?;
            let count = conn.execute(
                "UPDATE panitia_assignments SET is_locked = ? WHERE assignment_id = ?",
                params![if locked { 1 } else { 0 }, assignment_id],
            )?;

            if count == 0 {
                return Err(RepositoryError::NotFound {
                    entity: "Assignment".to_string(),
                    id: assignment_id.to_string(),
                });
            }
        }

        self.find_by_id(assignment_id)
    }

    /// Delete a single assignment regardless of its lock state
    ///
    /// Locking only protects against bulk regeneration, not explicit removal.
    pub fn delete(&self, assignment_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let count = conn.execute(
            "DELETE FROM panitia_assignments WHERE assignment_id = ?",
            params![assignment_id],
        )?;

        if count == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Assignment".to_string(),
                id: assignment_id.to_string(),
            });
        }

        Ok(())
    }

    /// Current commitments across all non-terminal programs
    ///
    /// Feeds the availability index; assignments on `exclude_program_id`
    /// never count (used while regenerating that same program).
    pub fn list_commitments(
        &self,
        member_id: Option<&str>,
        exclude_program_id: Option<&str>,
    ) -> RepositoryResult<Vec<MemberCommitment>> {
        let conn = self.get_conn()?;

        let mut sql = String::from(
            r#"SELECT a.member_id, p.program_id, p.name, p.start_datetime, p.end_datetime
               FROM panitia_assignments a
               INNER JOIN programs p ON a.program_id = p.program_id
               WHERE p.status NOT IN ('completed', 'rejected')"#,
        );
        let mut values: Vec<String> = Vec::new();

        if let Some(mid) = member_id {
            sql.push_str(" AND a.member_id = ?");
            values.push(mid.to_string());
        }
        if let Some(pid) = exclude_program_id {
            sql.push_str(" AND a.program_id <> ?");
            values.push(pid.to_string());
        }

        sql.push_str(" ORDER BY p.start_datetime, p.program_id, a.member_id");

        let mut stmt = conn.prepare(&sql)?;
        let commitments = stmt
            .query_map(rusqlite::params_from_iter(values), |row| {
                Ok(MemberCommitment {
                    member_id: row.get(0)?,
                    program_id: row.get(1)?,
                    program_name: row.get(2)?,
                    start_datetime: parse_datetime(row, 3)?,
                    end_datetime: parse_datetime(row, 4)?,
                })
            })?
            .collect::<Result<Vec<MemberCommitment>, _>>()?;

        Ok(commitments)
    }

    /// Distinct programs a member is committed to, excluding one program
    ///
    /// Feeds the conflict detector. Ordered by program start time, then id.
    pub fn list_member_programs(
        &self,
        member_id: &str,
        exclude_program_id: Option<&str>,
    ) -> RepositoryResult<Vec<Program>> {
        let conn = self.get_conn()?;

        let mut sql = String::from(
            r#"SELECT DISTINCT p.program_id, p.name, p.program_type, p.status,
                      p.start_datetime, p.end_datetime, p.created_at, p.updated_at
               FROM panitia_assignments a
               INNER JOIN programs p ON a.program_id = p.program_id
               WHERE a.member_id = ?
                 AND p.status NOT IN ('completed', 'rejected')"#,
        );
        let mut values: Vec<String> = vec![member_id.to_string()];

        if let Some(pid) = exclude_program_id {
            sql.push_str(" AND p.program_id <> ?");
            values.push(pid.to_string());
        }

        sql.push_str(" ORDER BY p.start_datetime, p.program_id");

        let mut stmt = conn.prepare(&sql)?;
        let programs = stmt
            .query_map(rusqlite::params_from_iter(values), |row| {
                let status_raw: String = row.get(3)?;
                let status = status_raw.parse::<ProgramStatus>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        e.into(),
                    )
                })?;
                Ok(Program {
                    program_id: row.get(0)?,
                    name: row.get(1)?,
                    program_type: row.get(2)?,
                    status,
                    start_datetime: parse_datetime(row, 4)?,
                    end_datetime: parse_datetime(row, 5)?,
                    created_at: parse_datetime(row, 6)?,
                    updated_at: parse_datetime(row, 7)?,
                })
            })?
            .collect::<Result<Vec<Program>, _>>()?;

        Ok(programs)
    }

    /// Number of a member's assignments on non-terminal programs
    ///
    /// The workload count is always derived from the store; there is no
    /// cached counter that could drift out of sync.
    pub fn count_active_for_member(&self, member_id: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        let count: i64 = conn.query_row(
            r#"SELECT COUNT(*)
               FROM panitia_assignments a
               INNER JOIN programs p ON a.program_id = p.program_id
               WHERE a.member_id = ?
                 AND p.status NOT IN ('completed', 'rejected')"#,
            params![member_id],
            |row| row.get(0),
        )?;

        Ok(count)
    }
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Assignment> {
    Ok(Assignment {
        assignment_id: row.get(0)?,
        program_id: row.get(1)?,
        member_id: row.get(2)?,
        role: row.get(3)?,
        commission_id: row.get(4)?,
        is_required_role: row.get::<_, i32>(5)? == 1,
        is_locked: row.get::<_, i32>(6)? == 1,
        batch_id: row.get(7)?,
        revision_id: row.get(8)?,
        created_at: parse_datetime(row, 9)?,
    })
}
