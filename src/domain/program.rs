// ==========================================
// Panitia Engine - program model
// ==========================================
// A program is an event with a half-open [start, end) time window and a
// lifecycle status. The engine only reads it; program CRUD lives elsewhere.
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::ProgramStatus;

// ==========================================
// Program - an organizational event
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub program_id: String,           // program ID
    pub name: String,                 // program name
    pub program_type: String,         // type (kegiatan_besar / kegiatan_kecil / advokasi)
    pub status: ProgramStatus,        // lifecycle status
    pub start_datetime: NaiveDateTime, // window start (inclusive)
    pub end_datetime: NaiveDateTime,   // window end (exclusive)
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Program {
    /// Half-open interval overlap with another window
    ///
    /// `[a.start, a.end)` overlaps `[b.start, b.end)` iff
    /// `a.start < b.end && b.start < a.end`. Back-to-back windows
    /// (one ends exactly when the other starts) do not overlap.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_datetime < end && start < self.end_datetime
    }

    /// Whether the program window is non-empty
    pub fn has_valid_window(&self) -> bool {
        self.start_datetime < self.end_datetime
    }

    /// Whether the program still binds its committee members
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn program(start: NaiveDateTime, end: NaiveDateTime) -> Program {
        Program {
            program_id: "P1".to_string(),
            name: "Test".to_string(),
            program_type: "kegiatan_kecil".to_string(),
            status: ProgramStatus::Approved,
            start_datetime: start,
            end_datetime: end,
            created_at: dt(0, 0),
            updated_at: dt(0, 0),
        }
    }

    #[test]
    fn test_overlap_partial() {
        // [08:00, 10:00) vs [09:00, 17:00) overlap
        let p = program(dt(8, 0), dt(10, 0));
        assert!(p.overlaps(dt(9, 0), dt(17, 0)));
    }

    #[test]
    fn test_overlap_containment() {
        let p = program(dt(9, 0), dt(17, 0));
        assert!(p.overlaps(dt(10, 0), dt(11, 0)));
    }

    #[test]
    fn test_no_overlap_back_to_back() {
        // [08:00, 09:00) vs [09:00, 17:00): touching endpoints do not overlap
        let p = program(dt(8, 0), dt(9, 0));
        assert!(!p.overlaps(dt(9, 0), dt(17, 0)));
    }

    #[test]
    fn test_no_overlap_disjoint() {
        let p = program(dt(8, 0), dt(9, 0));
        assert!(!p.overlaps(dt(12, 0), dt(13, 0)));
    }

    #[test]
    fn test_window_validity() {
        assert!(program(dt(8, 0), dt(9, 0)).has_valid_window());
        assert!(!program(dt(9, 0), dt(9, 0)).has_valid_window());
        assert!(!program(dt(10, 0), dt(9, 0)).has_valid_window());
    }
}
