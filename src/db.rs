// ==========================================
// Panitia Engine - SQLite connection setup
// ==========================================
// Goals:
// - One place for Connection::open PRAGMA behavior, so every module gets
//   foreign keys and busy_timeout instead of "some connections do, some don't"
// - One place for the schema bootstrap used by the app and the test suite
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Storage format for all datetime columns (ISO-8601, sorts lexicographically)
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Apply the unified PRAGMA set to a connection
///
/// foreign_keys and busy_timeout are per-connection settings and must be
/// re-applied to every connection that is opened.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration applied
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create all tables and indexes if they do not exist yet (idempotent)
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS commissions (
            commission_id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS members (
            member_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            commission_id TEXT REFERENCES commissions(commission_id),
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS programs (
            program_id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            program_type TEXT NOT NULL,
            status TEXT NOT NULL,
            start_datetime TEXT NOT NULL,
            end_datetime TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS panitia_assignments (
            assignment_id TEXT PRIMARY KEY,
            program_id TEXT NOT NULL REFERENCES programs(program_id) ON DELETE CASCADE,
            member_id TEXT NOT NULL REFERENCES members(member_id),
            role TEXT NOT NULL,
            commission_id TEXT,
            is_required_role INTEGER NOT NULL DEFAULT 0,
            is_locked INTEGER NOT NULL DEFAULT 0,
            batch_id TEXT,
            revision_id TEXT,
            created_at TEXT NOT NULL,
            UNIQUE (program_id, member_id, role)
        );
        CREATE INDEX IF NOT EXISTS idx_panitia_program ON panitia_assignments(program_id);
        CREATE INDEX IF NOT EXISTS idx_panitia_member ON panitia_assignments(member_id);

        CREATE TABLE IF NOT EXISTS panitia_revisions (
            revision_id TEXT PRIMARY KEY,
            program_id TEXT NOT NULL REFERENCES programs(program_id) ON DELETE CASCADE,
            revision_no INTEGER NOT NULL,
            change_reason TEXT,
            snapshot_json TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (program_id, revision_no)
        );

        CREATE TABLE IF NOT EXISTS generation_batches (
            batch_id TEXT PRIMARY KEY,
            description TEXT,
            program_ids_json TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;
    Ok(())
}
