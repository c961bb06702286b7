// ==========================================
// Panitia Engine - program repository
// ==========================================
// The engine only reads program windows and statuses; program CRUD is an
// external collaborator. Insert/update exist for seeding and tests.
// ==========================================

use crate::db::DATETIME_FORMAT;
use crate::domain::program::Program;
use crate::domain::types::ProgramStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::member_repo::parse_datetime;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// ProgramRepository
// ==========================================
pub struct ProgramRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProgramRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert a program row
    pub fn insert(&self, program: &Program) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO programs (
                    program_id, name, program_type, status,
                    start_datetime, end_datetime, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                &program.program_id,
                &program.name,
                &program.program_type,
                program.status.as_str(),
                program.start_datetime.format(DATETIME_FORMAT).to_string(),
                program.end_datetime.format(DATETIME_FORMAT).to_string(),
                program.created_at.format(DATETIME_FORMAT).to_string(),
                program.updated_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;

        Ok(())
    }

    /// Find a program by id
    pub fn find_by_id(&self, program_id: &str) -> RepositoryResult<Program> {
        let conn = self.get_conn()?;

        let program = conn
            .query_row(
                r#"SELECT program_id, name, program_type, status,
                          start_datetime, end_datetime, created_at, updated_at
                   FROM programs WHERE program_id = ?"#,
                params![program_id],
                map_row,
            )
            .optional()?;

        program.ok_or_else(|| RepositoryError::NotFound {
            entity: "Program".to_string(),
            id: program_id.to_string(),
        })
    }

    /// List programs in a non-terminal status, ordered by start time
    pub fn list_open(&self) -> RepositoryResult<Vec<Program>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT program_id, name, program_type, status,
                      start_datetime, end_datetime, created_at, updated_at
               FROM programs
               WHERE status NOT IN ('completed', 'rejected')
               ORDER BY start_datetime, program_id"#,
        )?;

        let programs = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<Program>, _>>()?;

        Ok(programs)
    }

    /// Update a program's lifecycle status (test/seed plumbing)
    pub fn update_status(&self, program_id: &str, status: ProgramStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let count = conn.execute(
            "UPDATE programs SET status = ?, updated_at = ? WHERE program_id = ?",
            params![
                status.as_str(),
                chrono::Utc::now()
                    .naive_utc()
                    .format(DATETIME_FORMAT)
                    .to_string(),
                program_id
            ],
        )?;

        if count == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Program".to_string(),
                id: program_id.to_string(),
            });
        }

        Ok(())
    }
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Program> {
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
}
