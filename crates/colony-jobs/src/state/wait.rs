//! Keeping a claimed worker busy in place for a number of ticks.
//!
//! This is the generic "doing the work" step: the owning job decides what
//! the work produces once the wait finishes.

use colony_types::{TimerId, WorkerId};

use super::Step;
use crate::context::JobContext;

/// Park `worker` and finish after `duration` ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitDuration {
    worker: WorkerId,
    duration: u64,
    label: &'static str,
    timer: Option<TimerId>,
    started_at: u64,
    elapsed: u64,
}

impl WaitDuration {
    /// Wait `duration` ticks; `label` names the activity in status lines.
    pub const fn new(worker: WorkerId, duration: u64, label: &'static str) -> Self {
        Self {
            worker,
            duration,
            label,
            timer: None,
            started_at: 0,
            elapsed: 0,
        }
    }

    /// The busy worker.
    pub const fn worker(&self) -> WorkerId {
        self.worker
    }

    /// Total duration in ticks.
    pub const fn duration(&self) -> u64 {
        self.duration
    }

    pub(crate) fn start(&mut self, ctx: &mut JobContext<'_>) -> Step {
        ctx.workers.stop(self.worker);
        ctx.workers.set_occupied(self.worker, true);
        self.started_at = ctx.tick;
        self.timer = Some(ctx.timers.add_timer(self.duration));
        self.poll(ctx)
    }

    pub(crate) fn poll(&mut self, ctx: &mut JobContext<'_>) -> Step {
        if !ctx.workers.exists(self.worker) {
            return Step::WorkerLost(self.worker);
        }
        self.elapsed = ctx.tick.saturating_sub(self.started_at);
        match self.timer {
            Some(timer) if ctx.timers.has_fired(timer) => {
                ctx.timers.remove_timer(timer);
                self.timer = None;
                Step::Finished
            }
            Some(_) => Step::Pending,
            None => Step::Finished,
        }
    }

    pub(crate) fn finish(&mut self, ctx: &mut JobContext<'_>) {
        ctx.workers.set_occupied(self.worker, false);
    }

    pub(crate) fn interrupt(&mut self, ctx: &mut JobContext<'_>) {
        if let Some(timer) = self.timer.take() {
            ctx.timers.remove_timer(timer);
        }
        ctx.workers.set_occupied(self.worker, false);
    }

    pub(crate) fn status(&self) -> String {
        format!(
            "{} ({}/{} ticks)",
            self.label,
            self.elapsed.min(self.duration),
            self.duration
        )
    }
}
