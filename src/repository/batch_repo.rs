// ==========================================
// Panitia Engine - generation batch repository
// ==========================================
// Batches group the assignments of one bulk-generation run; traceability
// only, no constraint logic reads them.
// ==========================================

use crate::db::DATETIME_FORMAT;
use crate::domain::assignment::GenerationBatch;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::member_repo::parse_datetime;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// BatchRepository
// ==========================================
pub struct BatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BatchRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert a batch row
    pub fn insert(&self, batch: &GenerationBatch) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let program_ids_json = serde_json::to_string(&batch.program_ids)
            .map_err(|e| RepositoryError::ValidationError(e.to_string()))?;

        conn.execute(
            r#"INSERT INTO generation_batches (batch_id, description, program_ids_json, created_at)
               VALUES (?, ?, ?, ?)"#,
            params![
                &batch.batch_id,
                &batch.description,
                program_ids_json,
                batch.created_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;

        Ok(())
    }

    /// Find a batch by id
    pub fn find_by_id(&self, batch_id: &str) -> RepositoryResult<GenerationBatch> {
        let conn = self.get_conn()?;

        let batch = conn
            .query_row(
                r#"SELECT batch_id, description, program_ids_json, created_at
                   FROM generation_batches WHERE batch_id = ?"#,
                params![batch_id],
                map_row,
            )
            .optional()?;

        batch.ok_or_else(|| RepositoryError::NotFound {
            entity: "GenerationBatch".to_string(),
            id: batch_id.to_string(),
        })
    }
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<GenerationBatch> {
    let program_ids_json: String = row.get(2)?;
    let program_ids: Vec<String> = serde_json::from_str(&program_ids_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(GenerationBatch {
        batch_id: row.get(0)?,
        description: row.get(1)?,
        program_ids,
        created_at: parse_datetime(row, 3)?,
    })
}
