// ==========================================
// Panitia Engine - member repository
// ==========================================
// Member directory access. Read-only from the engine's perspective;
// inserts exist for seeding and tests.
// ==========================================

use crate::db::DATETIME_FORMAT;
use crate::domain::member::Member;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// MemberRepository
// ==========================================
pub struct MemberRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MemberRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Insert a member row
    pub fn insert(&self, member: &Member) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO members (
                    member_id, name, commission_id, is_active, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?)"#,
            params![
                &member.member_id,
                &member.name,
                &member.commission_id,
                if member.is_active { 1 } else { 0 },
                member.created_at.format(DATETIME_FORMAT).to_string(),
                member.updated_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;

        Ok(())
    }

    /// Find a member by id
    pub fn find_by_id(&self, member_id: &str) -> RepositoryResult<Member> {
        let conn = self.get_conn()?;

        let member = conn
            .query_row(
                r#"SELECT member_id, name, commission_id, is_active, created_at, updated_at
                   FROM members WHERE member_id = ?"#,
                params![member_id],
                map_row,
            )
            .optional()?;

        member.ok_or_else(|| RepositoryError::NotFound {
            entity: "Member".to_string(),
            id: member_id.to_string(),
        })
    }

    /// List all active members in deterministic order (name, then id)
    ///
    /// This order is the generator's tie-break: regeneration under identical
    /// inputs must pick the same members again.
    pub fn list_active(&self) -> RepositoryResult<Vec<Member>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT member_id, name, commission_id, is_active, created_at, updated_at
               FROM members
               WHERE is_active = 1
               ORDER BY name, member_id"#,
        )?;

        let members = stmt
            .query_map([], map_row)?
            .collect::<Result<Vec<Member>, _>>()?;

        Ok(members)
    }
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Member> {
    Ok(Member {
        member_id: row.get(0)?,
        name: row.get(1)?,
        commission_id: row.get(2)?,
        is_active: row.get::<_, i32>(3)? == 1,
        created_at: parse_datetime(row, 4)?,
        updated_at: parse_datetime(row, 5)?,
    })
}

pub(crate) fn parse_datetime(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
