//! Tick callback that reports colony progress.
//!
//! After each tick the callback checks the summary for jobs that ended and,
//! every `summary_interval_ticks`, logs the ledger's job board size and
//! running outcome totals alongside the colony's headcount.

use std::sync::Arc;

use colony_core::runner::TickCallback;
use colony_core::tick::{SimulationState, TickSummary};
use tracing::{debug, info};

use crate::ledger::JobLedger;

/// Callback that bridges the tick cycle to the job ledger.
pub struct ColonyCallback {
    ledger: Arc<JobLedger>,
    interval: u64,
}

impl ColonyCallback {
    /// Report every `interval` ticks (0 = never).
    pub const fn new(ledger: Arc<JobLedger>, interval: u64) -> Self {
        Self { ledger, interval }
    }

    const fn is_milestone(&self, tick: u64) -> bool {
        self.interval > 0 && matches!(tick.checked_rem(self.interval), Some(0))
    }
}

impl TickCallback for ColonyCallback {
    fn on_tick(&mut self, summary: &TickSummary, sim: &SimulationState) {
        for report in &summary.reports {
            debug!(
                tick = summary.tick,
                job = %report.summary.id,
                kind = ?report.summary.kind,
                completed = report.outcome.is_completed(),
                "job ended"
            );
        }
        if !self.is_milestone(summary.tick) {
            return;
        }
        let totals = self.ledger.totals();
        info!(
            tick = summary.tick,
            day = summary.day,
            workers = sim.world.roster.len(),
            busy = sim.world.roster.claimed_count(),
            board = self.ledger.board().len(),
            completed = totals.completed,
            interrupted = totals.interrupted,
            "colony report"
        );
    }
}
