// ==========================================
// Test helpers
// ==========================================
// Temp database setup, seed builders and a recording event publisher
// shared by the integration suites.
// ==========================================

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, Utc};
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use panitia_engine::app::AppState;
use panitia_engine::domain::{Commission, Member, Program, ProgramStatus};
use panitia_engine::engine::{AssignmentEvent, AssignmentEventPublisher};

/// Create a temp-file database with full wiring
///
/// The NamedTempFile must stay alive for the duration of the test.
pub fn create_test_state() -> (NamedTempFile, AppState) {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();
    let state = AppState::new(db_path, None).unwrap();
    (temp_file, state)
}

/// Same, but with an event publisher attached
pub fn create_test_state_with_events(
    publisher: Arc<dyn AssignmentEventPublisher>,
) -> (NamedTempFile, AppState) {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();
    let state = AppState::new(db_path, Some(publisher)).unwrap();
    (temp_file, state)
}

/// Shorthand for a January-2024 timestamp
pub fn dt(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn seed_commission(state: &AppState, commission_id: &str, name: &str) -> Commission {
    let commission = Commission {
        commission_id: commission_id.to_string(),
        name: name.to_string(),
        description: None,
        created_at: Utc::now().naive_utc(),
    };
    state.commission_repo.insert(&commission).unwrap();
    commission
}

pub fn seed_member(
    state: &AppState,
    member_id: &str,
    name: &str,
    commission_id: Option<&str>,
    is_active: bool,
) -> Member {
    let now = Utc::now().naive_utc();
    let member = Member {
        member_id: member_id.to_string(),
        name: name.to_string(),
        commission_id: commission_id.map(str::to_string),
        is_active,
        created_at: now,
        updated_at: now,
    };
    state.member_repo.insert(&member).unwrap();
    member
}

pub fn seed_program(
    state: &AppState,
    program_id: &str,
    name: &str,
    status: ProgramStatus,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Program {
    let now = Utc::now().naive_utc();
    let program = Program {
        program_id: program_id.to_string(),
        name: name.to_string(),
        program_type: "kegiatan_kecil".to_string(),
        status,
        start_datetime: start,
        end_datetime: end,
        created_at: now,
        updated_at: now,
    };
    state.program_repo.insert(&program).unwrap();
    program
}

/// Standard population: commissions A/B/C, five members spanning
/// {A, A, B, C, C} with names in the availability walk order.
pub fn seed_standard_population(state: &AppState) {
    seed_commission(state, "KA", "Komisi A");
    seed_commission(state, "KB", "Komisi B");
    seed_commission(state, "KC", "Komisi C");

    seed_member(state, "M1", "Andi", Some("KA"), true);
    seed_member(state, "M2", "Budi", Some("KA"), true);
    seed_member(state, "M3", "Citra", Some("KB"), true);
    seed_member(state, "M4", "Dewi", Some("KC"), true);
    seed_member(state, "M5", "Eka", Some("KC"), true);
}

/// Event publisher that records everything it is handed
#[derive(Default)]
pub struct RecordingPublisher {
    pub events: Mutex<Vec<AssignmentEvent>>,
}

impl RecordingPublisher {
    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl AssignmentEventPublisher for RecordingPublisher {
    fn publish(&self, event: AssignmentEvent) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
