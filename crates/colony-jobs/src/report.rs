//! What a finished job leaves behind.

use chrono::{DateTime, Utc};
use colony_types::JobSummary;
use serde::{Deserialize, Serialize};

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobOutcome {
    /// The terminal state ran its side effects.
    Completed,
    /// The job was cancelled or hit an abnormal condition.
    Interrupted {
        /// Human-readable reason.
        reason: String,
    },
}

impl JobOutcome {
    /// Whether the job completed normally.
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Record handed to job listeners when a job finishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    /// Final snapshot of the job.
    pub summary: JobSummary,
    /// How the job ended.
    pub outcome: JobOutcome,
    /// Simulation tick at which it ended.
    pub finished_at_tick: u64,
    /// Wall-clock time at which it ended.
    pub recorded_at: DateTime<Utc>,
}
