//! Lifecycle status shared by simulations and Live20 analysis runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a long-running backend job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Paused,
    Completed,
    Cancelled,
    Failed,
    /// Any status string this client does not know about.
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Statuses from which no further transition happens.
    pub const TERMINAL: [JobStatus; 3] =
        [JobStatus::Completed, JobStatus::Cancelled, JobStatus::Failed];

    pub fn is_terminal(&self) -> bool {
        Self::TERMINAL.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Paused => "paused",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Failed => "failed",
            JobStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_set() {
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(!JobStatus::Paused.is_terminal());
        assert!(!JobStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_unknown_status_string() {
        let status: JobStatus = serde_json::from_str(r#""queued""#).unwrap();
        assert_eq!(status, JobStatus::Unknown);
    }
}
