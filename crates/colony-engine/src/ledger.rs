//! Job ledger: a listener that keeps the colony's job board and tallies.
//!
//! [`JobLedger`] is registered on a player's job manager both as a list
//! listener (mirroring the manager's live list, index for index, the way
//! a job board UI would) and as a completion listener (counting outcomes
//! per job kind). Every notification is also logged.

use std::collections::HashMap;
use std::sync::Mutex;

use colony_jobs::{JobListener, JobManagerListener, JobOutcome, JobReport};
use colony_types::{JobKindTag, JobSummary};
use tracing::{debug, warn};

/// Outcome counts for one job kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Jobs that completed.
    pub completed: u64,
    /// Jobs that were interrupted.
    pub interrupted: u64,
}

/// Job board mirror plus per-kind outcome tallies.
#[derive(Debug, Default)]
pub struct JobLedger {
    board: Mutex<Vec<JobSummary>>,
    tallies: Mutex<HashMap<JobKindTag, Tally>>,
}

impl JobLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mirrored job board.
    pub fn board(&self) -> Vec<JobSummary> {
        self.board.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Outcome counts for `kind`.
    pub fn tally(&self, kind: JobKindTag) -> Tally {
        self.tallies
            .lock()
            .ok()
            .and_then(|t| t.get(&kind).copied())
            .unwrap_or_default()
    }

    /// Outcome counts summed over every kind.
    pub fn totals(&self) -> Tally {
        self.tallies.lock().map_or_else(
            |_| Tally::default(),
            |t| {
                t.values().fold(Tally::default(), |acc, v| Tally {
                    completed: acc.completed.saturating_add(v.completed),
                    interrupted: acc.interrupted.saturating_add(v.interrupted),
                })
            },
        )
    }
}

impl JobListener for JobLedger {
    fn on_done(&self, report: &JobReport) {
        let Ok(mut tallies) = self.tallies.lock() else {
            warn!(job = %report.summary.id, "job ledger lock poisoned");
            return;
        };
        let tally = tallies.entry(report.summary.kind).or_default();
        match &report.outcome {
            JobOutcome::Completed => tally.completed = tally.completed.saturating_add(1),
            JobOutcome::Interrupted { .. } => {
                tally.interrupted = tally.interrupted.saturating_add(1);
            }
        }
    }
}

impl JobManagerListener for JobLedger {
    fn on_added(&self, job: &JobSummary, index: usize) {
        let Ok(mut board) = self.board.lock() else {
            return;
        };
        let at = index.min(board.len());
        board.insert(at, job.clone());
        debug!(job = %job.id, kind = ?job.kind, index, status = %job.status, "board: job added");
    }

    fn on_removed(&self, job: &JobSummary, index: usize) {
        let Ok(mut board) = self.board.lock() else {
            return;
        };
        if board.get(index).is_some_and(|s| s.id == job.id) {
            board.remove(index);
        } else {
            warn!(job = %job.id, index, "board out of step with manager");
            board.retain(|s| s.id != job.id);
        }
        debug!(job = %job.id, kind = ?job.kind, index, "board: job removed");
    }
}
