// ==========================================
// Panitia Engine - service entry point
// ==========================================
// Boots the engine over the default database and prints a short status
// summary. UI/API hosting layers embed AppState the same way.
// ==========================================

use panitia_engine::app::{get_default_db_path, AppState};
use panitia_engine::logging;

#[tokio::main]
async fn main() {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", panitia_engine::APP_NAME, panitia_engine::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("using database: {}", db_path);

    let app_state = match AppState::new(db_path, None) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("initialization failed: {}", e);
            std::process::exit(1);
        }
    };

    match app_state.workload_api.report().await {
        Ok(report) => {
            tracing::info!("active members: {}", report.len());
            for entry in report.iter().take(10) {
                tracing::info!(
                    "  {} - {} active assignment(s), {}",
                    entry.member.name,
                    entry.active_assignments,
                    entry.level
                );
            }
        }
        Err(e) => {
            tracing::error!("workload report failed: {}", e);
            std::process::exit(1);
        }
    }
}
