// ==========================================
// Conflict detector & availability integration tests
// ==========================================
// Half-open overlap semantics, the exclude-program rule, terminal-status
// filtering and reactive conflict reporting.
// ==========================================

mod helpers;

use helpers::*;
use panitia_engine::domain::ProgramStatus;

// Program P [09:00, 17:00); member committed to Q [08:00, 10:00).
// Availability for P excludes them, and their assignment on P reports Q.
#[tokio::test]
async fn test_overlapping_commitment_blocks_and_reports() {
    let (_tmp, state) = create_test_state();
    seed_standard_population(&state);

    let _q = seed_program(
        &state,
        "Q1",
        "Latihan Pagi",
        ProgramStatus::InProgress,
        dt(10, 8, 0),
        dt(10, 10, 0),
    );
    seed_program(
        &state,
        "P1",
        "Pentas Seni",
        ProgramStatus::Approved,
        dt(10, 9, 0),
        dt(10, 17, 0),
    );

    state
        .assignment_api
        .add_assignment("Q1", "M1", "divisi_humas")
        .unwrap();

    // proactive: generation for P1 never picks the busy member
    let outcome = state.assignment_api.generate_assignments("P1").await.unwrap();
    assert!(outcome.assignments.iter().all(|a| a.member_id != "M1"));

    // reactive: force the double-booking manually, then detect
    state
        .assignment_api
        .add_assignment("P1", "M1", "divisi_dokumentasi")
        .unwrap();

    let reports = state.assignment_api.detect_conflicts("P1").unwrap();
    let report = reports
        .iter()
        .find(|r| r.member_id == "M1")
        .expect("double-booked member missing from conflict report");
    assert_eq!(report.conflicting_program_ids(), vec!["Q1".to_string()]);

    // and the conflict is mutual from the other program's view
    let reports_q = state.assignment_api.detect_conflicts("Q1").unwrap();
    let report_q = reports_q.iter().find(|r| r.member_id == "M1").unwrap();
    assert_eq!(report_q.conflicting_program_ids(), vec!["P1".to_string()]);
}

#[tokio::test]
async fn test_disjoint_windows_never_conflict() {
    let (_tmp, state) = create_test_state();
    seed_standard_population(&state);

    seed_program(
        &state,
        "Q1",
        "Latihan",
        ProgramStatus::InProgress,
        dt(10, 8, 0),
        dt(10, 9, 0),
    );
    seed_program(
        &state,
        "P1",
        "Rapat Sore",
        ProgramStatus::Approved,
        dt(10, 12, 0),
        dt(10, 13, 0),
    );

    state
        .assignment_api
        .add_assignment("Q1", "M1", "divisi_humas")
        .unwrap();
    state
        .assignment_api
        .add_assignment("P1", "M1", "divisi_humas")
        .unwrap();

    assert!(state.assignment_api.detect_conflicts("P1").unwrap().is_empty());
    assert!(state.assignment_api.detect_conflicts("Q1").unwrap().is_empty());
}

// Touching endpoints do not overlap: [08:00, 09:00) then [09:00, 17:00).
#[tokio::test]
async fn test_back_to_back_windows_do_not_conflict() {
    let (_tmp, state) = create_test_state();
    seed_standard_population(&state);

    seed_program(
        &state,
        "Q1",
        "Persiapan",
        ProgramStatus::InProgress,
        dt(10, 8, 0),
        dt(10, 9, 0),
    );
    seed_program(
        &state,
        "P1",
        "Acara",
        ProgramStatus::Approved,
        dt(10, 9, 0),
        dt(10, 17, 0),
    );

    state
        .assignment_api
        .add_assignment("Q1", "M1", "divisi_perlengkapan")
        .unwrap();

    // member stays available for the adjacent window
    let outcome = state.assignment_api.generate_assignments("P1").await.unwrap();
    assert!(outcome.assignments.iter().any(|a| a.member_id == "M1"));
    assert!(outcome.conflicts.is_empty());
}

#[tokio::test]
async fn test_terminal_programs_do_not_bind_members() {
    let (_tmp, state) = create_test_state();
    seed_standard_population(&state);

    seed_program(
        &state,
        "Q1",
        "Acara Selesai",
        ProgramStatus::InProgress,
        dt(10, 8, 0),
        dt(10, 10, 0),
    );
    seed_program(
        &state,
        "P1",
        "Pentas Seni",
        ProgramStatus::Approved,
        dt(10, 9, 0),
        dt(10, 17, 0),
    );

    state
        .assignment_api
        .add_assignment("Q1", "M1", "divisi_humas")
        .unwrap();

    // once the overlapping program completes, the commitment dissolves
    state
        .program_repo
        .update_status("Q1", ProgramStatus::Completed)
        .unwrap();

    let outcome = state.assignment_api.generate_assignments("P1").await.unwrap();
    assert!(outcome.assignments.iter().any(|a| a.member_id == "M1"));
    assert!(state.assignment_api.detect_conflicts("P1").unwrap().is_empty());
}

#[tokio::test]
async fn test_conflicts_are_ordered_by_start_time() {
    let (_tmp, state) = create_test_state();
    seed_standard_population(&state);

    // two overlapping commitments, seeded out of chronological order
    seed_program(
        &state,
        "Q2",
        "Gladi Bersih",
        ProgramStatus::InProgress,
        dt(10, 11, 0),
        dt(10, 14, 0),
    );
    seed_program(
        &state,
        "Q1",
        "Latihan",
        ProgramStatus::InProgress,
        dt(10, 8, 0),
        dt(10, 10, 0),
    );
    seed_program(
        &state,
        "P1",
        "Acara Utama",
        ProgramStatus::Approved,
        dt(10, 9, 0),
        dt(10, 17, 0),
    );

    state
        .assignment_api
        .add_assignment("Q1", "M1", "divisi_humas")
        .unwrap();
    state
        .assignment_api
        .add_assignment("Q2", "M1", "divisi_humas")
        .unwrap();
    state
        .assignment_api
        .add_assignment("P1", "M1", "ketua")
        .unwrap();

    let reports = state.assignment_api.detect_conflicts("P1").unwrap();
    let report = reports.iter().find(|r| r.member_id == "M1").unwrap();
    assert_eq!(
        report.conflicting_program_ids(),
        vec!["Q1".to_string(), "Q2".to_string()]
    );
}
