// ==========================================
// Panitia Engine - commission repository
// ==========================================
// Commissions are immutable reference data for the engine.
// ==========================================

use crate::db::DATETIME_FORMAT;
use crate::domain::member::Commission;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::member_repo::parse_datetime;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// CommissionRepository
// ==========================================
pub struct CommissionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CommissionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert a commission row
    pub fn insert(&self, commission: &Commission) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO commissions (commission_id, name, description, created_at)
               VALUES (?, ?, ?, ?)"#,
            params![
                &commission.commission_id,
                &commission.name,
                &commission.description,
                commission.created_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;

        Ok(())
    }

    /// List all commissions ordered by name
    pub fn list(&self) -> RepositoryResult<Vec<Commission>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT commission_id, name, description, created_at
               FROM commissions
               ORDER BY name"#,
        )?;

        let commissions = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<Commission>, _>>()?;

        Ok(commissions)
    }

    /// Look up a commission by its unique name (e.g. a gatekeeper rule target)
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Commission>> {
        let conn = self.get_conn()?;

        let commission = conn
            .query_row(
                r#"SELECT commission_id, name, description, created_at
                   FROM commissions WHERE name = ?"#,
                params![name],
                map_row,
            )
            .optional()?;

        Ok(commission)
    }
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Commission> {
    Ok(Commission {
        commission_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_at: parse_datetime(row, 3)?,
    })
}
