// ==========================================
// Panitia Engine - generator configuration contract
// ==========================================
// Every tunable the generator and workload tracker read goes through this
// trait, so tests can substitute a mock and the engine never hard-codes a
// threshold. Defaults mirror the observed production behavior.
// ==========================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Default required roles, filled in this exact order
pub const DEFAULT_REQUIRED_ROLES: [&str; 4] =
    ["ketua", "sekretaris", "bendahara", "divisi_acara"];

/// Feasibility floor on available members
pub const DEFAULT_MIN_AVAILABLE_MEMBERS: usize = 3;

/// Feasibility floor on distinct commissions among available members
pub const DEFAULT_MIN_COMMISSION_DIVERSITY: usize = 3;

/// Feasibility floor on filled required roles
pub const DEFAULT_MIN_ROLES_FILLED: usize = 3;

/// Default gatekeeper pairing: divisi_acara must come from Komisi B
pub const DEFAULT_GATEKEEPER_ROLE: &str = "divisi_acara";
pub const DEFAULT_GATEKEEPER_COMMISSION: &str = "Komisi B";

/// Workload thresholds: available <= 3, heavy 4-5, overloaded > 5
pub const DEFAULT_WORKLOAD_AVAILABLE_MAX: i64 = 3;
pub const DEFAULT_WORKLOAD_HEAVY_MAX: i64 = 5;

/// A mandatory role/commission pairing
///
/// The named commission is the only eligible pool for the named role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatekeeperRule {
    pub role: String,            // role the rule applies to
    pub commission_name: String, // commission whose members must fill it
}

impl GatekeeperRule {
    pub fn default_rules() -> Vec<GatekeeperRule> {
        vec![GatekeeperRule {
            role: DEFAULT_GATEKEEPER_ROLE.to_string(),
            commission_name: DEFAULT_GATEKEEPER_COMMISSION.to_string(),
        }]
    }
}

pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// GeneratorConfigReader
// ==========================================
#[async_trait]
pub trait GeneratorConfigReader: Send + Sync {
    /// Ordered list of roles generation always attempts to fill
    async fn get_required_roles(&self) -> ConfigResult<Vec<String>>;

    /// Feasibility gate 1: minimum available members
    async fn get_min_available_members(&self) -> ConfigResult<usize>;

    /// Feasibility gate 2: minimum distinct commissions represented
    async fn get_min_commission_diversity(&self) -> ConfigResult<usize>;

    /// Feasibility gate 4: minimum required roles actually filled
    async fn get_min_roles_filled(&self) -> ConfigResult<usize>;

    /// Mandatory role/commission pairings (gate 3 applies per rule)
    async fn get_gatekeeper_rules(&self) -> ConfigResult<Vec<GatekeeperRule>>;

    /// Whether regeneration records a revision snapshot first
    async fn get_revision_on_regenerate(&self) -> ConfigResult<bool>;

    /// Workload classification: upper bound of "available"
    async fn get_workload_available_max(&self) -> ConfigResult<i64>;

    /// Workload classification: upper bound of "heavy"
    async fn get_workload_heavy_max(&self) -> ConfigResult<i64>;
}
