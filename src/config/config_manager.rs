// ==========================================
// Panitia Engine - configuration manager
// ==========================================
// Storage: config_kv table (key -> value text, JSON for structured values).
// Missing keys fall back to the documented defaults, so an empty table
// behaves exactly like the observed production rules.
// ==========================================

use crate::config::generator_config::{
    ConfigResult, GatekeeperRule, GeneratorConfigReader, DEFAULT_MIN_AVAILABLE_MEMBERS,
    DEFAULT_MIN_COMMISSION_DIVERSITY, DEFAULT_MIN_ROLES_FILLED, DEFAULT_REQUIRED_ROLES,
    DEFAULT_WORKLOAD_AVAILABLE_MAX, DEFAULT_WORKLOAD_HEAVY_MAX,
};
use crate::db::configure_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// Config keys
pub const KEY_REQUIRED_ROLES: &str = "generator/required_roles";
pub const KEY_MIN_AVAILABLE_MEMBERS: &str = "generator/min_available_members";
pub const KEY_MIN_COMMISSION_DIVERSITY: &str = "generator/min_commission_diversity";
pub const KEY_MIN_ROLES_FILLED: &str = "generator/min_roles_filled";
pub const KEY_GATEKEEPER_RULES: &str = "generator/gatekeeper_rules";
pub const KEY_REVISION_ON_REGENERATE: &str = "generator/revision_on_regenerate";
pub const KEY_WORKLOAD_AVAILABLE_MAX: &str = "workload/available_max";
pub const KEY_WORKLOAD_HEAVY_MAX: &str = "workload/heavy_max";

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Create a ConfigManager over an existing shared connection
    ///
    /// Re-applies the unified PRAGMAs to the connection (idempotent).
    pub fn from_connection(
        conn: Arc<Mutex<Connection>>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        {
            let guard = conn
                .lock()
                .map_err(|e| format!("lock acquisition failed: {}", e))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("lock acquisition failed: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// Write a config value (operator override of a default)
    pub fn set_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("lock acquisition failed: {}", e))?;

        conn.execute(
            r#"INSERT INTO config_kv (key, value, updated_at)
               VALUES (?1, ?2, datetime('now'))
               ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                              updated_at = excluded.updated_at"#,
            params![key, value],
        )?;

        Ok(())
    }

    fn get_parsed<T: FromStr>(&self, key: &str, default: T) -> ConfigResult<T> {
        match self.get_value(key)? {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|_| format!("invalid config value for {}: {}", key, raw).into()),
            None => Ok(default),
        }
    }
}

#[async_trait]
impl GeneratorConfigReader for ConfigManager {
    async fn get_required_roles(&self) -> ConfigResult<Vec<String>> {
        match self.get_value(KEY_REQUIRED_ROLES)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(DEFAULT_REQUIRED_ROLES
                .iter()
                .map(|r| r.to_string())
                .collect()),
        }
    }

    async fn get_min_available_members(&self) -> ConfigResult<usize> {
        self.get_parsed(KEY_MIN_AVAILABLE_MEMBERS, DEFAULT_MIN_AVAILABLE_MEMBERS)
    }

    async fn get_min_commission_diversity(&self) -> ConfigResult<usize> {
        self.get_parsed(
            KEY_MIN_COMMISSION_DIVERSITY,
            DEFAULT_MIN_COMMISSION_DIVERSITY,
        )
    }

    async fn get_min_roles_filled(&self) -> ConfigResult<usize> {
        self.get_parsed(KEY_MIN_ROLES_FILLED, DEFAULT_MIN_ROLES_FILLED)
    }

    async fn get_gatekeeper_rules(&self) -> ConfigResult<Vec<GatekeeperRule>> {
        match self.get_value(KEY_GATEKEEPER_RULES)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(GatekeeperRule::default_rules()),
        }
    }

    async fn get_revision_on_regenerate(&self) -> ConfigResult<bool> {
        self.get_parsed(KEY_REVISION_ON_REGENERATE, true)
    }

    async fn get_workload_available_max(&self) -> ConfigResult<i64> {
        self.get_parsed(KEY_WORKLOAD_AVAILABLE_MAX, DEFAULT_WORKLOAD_AVAILABLE_MAX)
    }

    async fn get_workload_heavy_max(&self) -> ConfigResult<i64> {
        self.get_parsed(KEY_WORKLOAD_HEAVY_MAX, DEFAULT_WORKLOAD_HEAVY_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_on_empty_table() {
        let config = manager();

        assert_eq!(
            config.get_required_roles().await.unwrap(),
            vec!["ketua", "sekretaris", "bendahara", "divisi_acara"]
        );
        assert_eq!(config.get_min_available_members().await.unwrap(), 3);
        assert_eq!(config.get_min_commission_diversity().await.unwrap(), 3);
        assert_eq!(config.get_min_roles_filled().await.unwrap(), 3);
        assert!(config.get_revision_on_regenerate().await.unwrap());
        assert_eq!(config.get_workload_available_max().await.unwrap(), 3);
        assert_eq!(config.get_workload_heavy_max().await.unwrap(), 5);

        let rules = config.get_gatekeeper_rules().await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].role, "divisi_acara");
        assert_eq!(rules[0].commission_name, "Komisi B");
    }

    #[tokio::test]
    async fn test_overrides() {
        let config = manager();

        config.set_value(KEY_MIN_AVAILABLE_MEMBERS, "5").unwrap();
        assert_eq!(config.get_min_available_members().await.unwrap(), 5);

        config
            .set_value(KEY_REQUIRED_ROLES, r#"["ketua", "wakil_ketua"]"#)
            .unwrap();
        assert_eq!(
            config.get_required_roles().await.unwrap(),
            vec!["ketua", "wakil_ketua"]
        );

        config
            .set_value(
                KEY_GATEKEEPER_RULES,
                r#"[{"role": "bendahara", "commission_name": "Komisi A"}]"#,
            )
            .unwrap();
        let rules = config.get_gatekeeper_rules().await.unwrap();
        assert_eq!(rules[0].role, "bendahara");

        config.set_value(KEY_REVISION_ON_REGENERATE, "false").unwrap();
        assert!(!config.get_revision_on_regenerate().await.unwrap());
    }

    #[tokio::test]
    async fn test_invalid_value_is_an_error() {
        let config = manager();
        config.set_value(KEY_MIN_ROLES_FILLED, "many").unwrap();
        assert!(config.get_min_roles_filled().await.is_err());
    }
}
