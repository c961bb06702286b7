// ==========================================
// Panitia Engine - application state
// ==========================================
// Responsibility: wire repositories, engines and API instances over one
// shared connection. Hosts (CLI, service shells) hold an AppState and
// call the APIs on it.
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{AssignmentApi, WorkloadApi};
use crate::config::ConfigManager;
use crate::db;
use crate::engine::{
    AssignmentEventPublisher, AssignmentGenerator, AvailabilityIndex, ConflictDetector,
    OptionalEventPublisher, WorkloadTracker,
};
use crate::repository::{
    AssignmentRepository, BatchRepository, CommissionRepository, MemberRepository,
    ProgramRepository, RevisionRepository,
};

/// Default database location under the platform data directory
pub fn get_default_db_path() -> String {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("panitia-engine")
        .join("panitia.db")
        .to_string_lossy()
        .to_string()
}

/// Application state
///
/// Owns the API instances and the shared resources behind them.
pub struct AppState {
    /// Database path
    pub db_path: String,

    /// Assignment operations (generation, locks, conflicts, revisions)
    pub assignment_api: Arc<AssignmentApi<ConfigManager>>,

    /// Workload reporting
    pub workload_api: Arc<WorkloadApi<ConfigManager>>,

    /// Member directory access (seeding, lookups)
    pub member_repo: Arc<MemberRepository>,

    /// Commission registry access
    pub commission_repo: Arc<CommissionRepository>,

    /// Program store access
    pub program_repo: Arc<ProgramRepository>,

    /// Configuration manager
    pub config: Arc<ConfigManager>,
}

impl AppState {
    /// Build the full wiring over a database file
    ///
    /// Opens the shared connection, bootstraps the schema, then constructs
    /// repositories, engines and APIs.
    pub fn new(
        db_path: String,
        event_publisher: Option<Arc<dyn AssignmentEventPublisher>>,
    ) -> Result<Self, String> {
        tracing::info!("initializing AppState, database: {}", db_path);

        if let Some(parent) = PathBuf::from(&db_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("cannot create data directory: {}", e))?;
        }

        let conn = db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("cannot open database: {}", e))?;
        db::init_schema(&conn).map_err(|e| format!("schema bootstrap failed: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        Self::from_connection(db_path, conn, event_publisher)
    }

    /// Build the wiring over an existing shared connection (tests)
    pub fn from_connection(
        db_path: String,
        conn: Arc<Mutex<Connection>>,
        event_publisher: Option<Arc<dyn AssignmentEventPublisher>>,
    ) -> Result<Self, String> {
        // repository layer
        let member_repo = Arc::new(MemberRepository::new(conn.clone()));
        let commission_repo = Arc::new(CommissionRepository::new(conn.clone()));
        let program_repo = Arc::new(ProgramRepository::new(conn.clone()));
        let assignment_repo = Arc::new(AssignmentRepository::new(conn.clone()));
        let revision_repo = Arc::new(RevisionRepository::new(conn.clone()));
        let batch_repo = Arc::new(BatchRepository::new(conn.clone()));

        let config = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("config manager init failed: {}", e))?,
        );

        // engine layer
        let availability = Arc::new(AvailabilityIndex::new(
            member_repo.clone(),
            assignment_repo.clone(),
        ));
        let conflict_detector = Arc::new(ConflictDetector::new(assignment_repo.clone()));

        let generator_events = match &event_publisher {
            Some(p) => OptionalEventPublisher::with_publisher(p.clone()),
            None => OptionalEventPublisher::none(),
        };
        let generator = Arc::new(AssignmentGenerator::new(
            config.clone(),
            program_repo.clone(),
            commission_repo.clone(),
            assignment_repo.clone(),
            revision_repo.clone(),
            availability,
            generator_events,
        ));

        let tracker = Arc::new(WorkloadTracker::new(
            config.clone(),
            member_repo.clone(),
            assignment_repo.clone(),
        ));

        // API layer
        let api_events = match &event_publisher {
            Some(p) => OptionalEventPublisher::with_publisher(p.clone()),
            None => OptionalEventPublisher::none(),
        };
        let assignment_api = Arc::new(AssignmentApi::new(
            program_repo.clone(),
            member_repo.clone(),
            assignment_repo,
            revision_repo,
            batch_repo,
            generator,
            conflict_detector,
            api_events,
        ));
        let workload_api = Arc::new(WorkloadApi::new(tracker));

        tracing::info!("AppState initialized");

        Ok(Self {
            db_path,
            assignment_api,
            workload_api,
            member_repo,
            commission_repo,
            program_repo,
            config,
        })
    }
}
