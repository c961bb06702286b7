// ==========================================
// Panitia Engine - domain type definitions
// ==========================================
// Program lifecycle states and workload classification levels.
// Serialized form: snake_case (matches the stored text)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Program lifecycle status
// ==========================================
// Terminal states (completed / rejected) drop out of availability and
// workload accounting; everything else counts as a live commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    InProgress,
    Completed,
}

impl ProgramStatus {
    /// Stored text form
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramStatus::Draft => "draft",
            ProgramStatus::Submitted => "submitted",
            ProgramStatus::UnderReview => "under_review",
            ProgramStatus::Approved => "approved",
            ProgramStatus::Rejected => "rejected",
            ProgramStatus::InProgress => "in_progress",
            ProgramStatus::Completed => "completed",
        }
    }

    /// Terminal statuses no longer bind members or count toward workload
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgramStatus::Completed | ProgramStatus::Rejected)
    }
}

impl fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProgramStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProgramStatus::Draft),
            "submitted" => Ok(ProgramStatus::Submitted),
            "under_review" => Ok(ProgramStatus::UnderReview),
            "approved" => Ok(ProgramStatus::Approved),
            "rejected" => Ok(ProgramStatus::Rejected),
            "in_progress" => Ok(ProgramStatus::InProgress),
            "completed" => Ok(ProgramStatus::Completed),
            other => Err(format!("unknown program status: {}", other)),
        }
    }
}

// ==========================================
// Workload classification
// ==========================================
// Pure function of the active-assignment count; thresholds come from
// configuration (defaults: available <=3, heavy 4-5, overloaded >5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadLevel {
    Available,
    Heavy,
    Overloaded,
}

impl WorkloadLevel {
    /// Classify an active-assignment count against the configured thresholds
    pub fn classify(count: i64, available_max: i64, heavy_max: i64) -> Self {
        if count > heavy_max {
            WorkloadLevel::Overloaded
        } else if count > available_max {
            WorkloadLevel::Heavy
        } else {
            WorkloadLevel::Available
        }
    }
}

impl fmt::Display for WorkloadLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadLevel::Available => write!(f, "available"),
            WorkloadLevel::Heavy => write!(f, "heavy"),
            WorkloadLevel::Overloaded => write!(f, "overloaded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            ProgramStatus::Draft,
            ProgramStatus::Submitted,
            ProgramStatus::UnderReview,
            ProgramStatus::Approved,
            ProgramStatus::Rejected,
            ProgramStatus::InProgress,
            ProgramStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<ProgramStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<ProgramStatus>().is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(ProgramStatus::Completed.is_terminal());
        assert!(ProgramStatus::Rejected.is_terminal());
        assert!(!ProgramStatus::Approved.is_terminal());
        assert!(!ProgramStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_workload_classification_defaults() {
        assert_eq!(WorkloadLevel::classify(0, 3, 5), WorkloadLevel::Available);
        assert_eq!(WorkloadLevel::classify(3, 3, 5), WorkloadLevel::Available);
        assert_eq!(WorkloadLevel::classify(4, 3, 5), WorkloadLevel::Heavy);
        assert_eq!(WorkloadLevel::classify(5, 3, 5), WorkloadLevel::Heavy);
        assert_eq!(WorkloadLevel::classify(6, 3, 5), WorkloadLevel::Overloaded);
    }
}
