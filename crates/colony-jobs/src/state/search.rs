//! Acquiring a worker: any qualified idle worker, or one specific worker.
//!
//! Acquisition is a single non-blocking test-and-set per candidate per
//! tick. Losing the race, or finding nobody, leaves the state pending: the
//! job stalls until capacity shows up.

use colony_types::{ItemKind, LaborKind, PlayerId, WorkerId};
use tracing::debug;

use super::Step;
use crate::context::JobContext;

/// Claim the first idle worker of `owner` enabled for a labor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForWorker {
    owner: PlayerId,
    labor: LaborKind,
    tool: Option<ItemKind>,
    found: Option<WorkerId>,
}

impl SearchForWorker {
    /// Search for a worker enabled for `labor`.
    pub const fn new(owner: PlayerId, labor: LaborKind) -> Self {
        Self {
            owner,
            labor,
            tool: None,
            found: None,
        }
    }

    /// Additionally require an equipped tool.
    #[must_use]
    pub const fn with_tool(mut self, tool: Option<ItemKind>) -> Self {
        self.tool = tool;
        self
    }

    /// The labor searched for.
    pub const fn labor(&self) -> LaborKind {
        self.labor
    }

    /// The claimed worker, once found.
    pub const fn worker(&self) -> Option<WorkerId> {
        self.found
    }

    pub(crate) fn start(&mut self, ctx: &mut JobContext<'_>) -> Step {
        self.poll(ctx)
    }

    pub(crate) fn poll(&mut self, ctx: &mut JobContext<'_>) -> Step {
        if self.found.is_some() {
            return Step::Finished;
        }
        for candidate in ctx.workers.idle_workers(self.owner) {
            if !ctx.workers.has_labor(candidate, self.labor) {
                continue;
            }
            if self
                .tool
                .is_some_and(|tool| !ctx.workers.has_equipped(candidate, tool))
            {
                continue;
            }
            if ctx.workers.try_acquire(candidate) {
                debug!(worker = %candidate, labor = %self.labor, "worker claimed");
                self.found = Some(candidate);
                return Step::Finished;
            }
        }
        Step::Pending
    }

    pub(crate) fn interrupt(&mut self, ctx: &mut JobContext<'_>) {
        if let Some(worker) = self.found.take() {
            ctx.workers.release(worker);
        }
    }

    pub(crate) fn status(&self) -> String {
        match self.tool {
            Some(tool) => format!("Waiting for a worker with {} and a {tool:?}", self.labor),
            None => format!("Waiting for a worker with {}", self.labor),
        }
    }
}

/// Claim one specific worker as soon as it is free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitForWorker {
    worker: WorkerId,
    acquired: bool,
}

impl WaitForWorker {
    /// Wait for `worker`.
    pub const fn new(worker: WorkerId) -> Self {
        Self {
            worker,
            acquired: false,
        }
    }

    /// The awaited worker.
    pub const fn worker(&self) -> WorkerId {
        self.worker
    }

    pub(crate) fn start(&mut self, ctx: &mut JobContext<'_>) -> Step {
        self.poll(ctx)
    }

    pub(crate) fn poll(&mut self, ctx: &mut JobContext<'_>) -> Step {
        if self.acquired {
            return Step::Finished;
        }
        if !ctx.workers.exists(self.worker) {
            return Step::Abort(format!("worker {} is gone", self.worker));
        }
        if ctx.workers.try_acquire(self.worker) {
            debug!(worker = %self.worker, "awaited worker claimed");
            self.acquired = true;
            return Step::Finished;
        }
        Step::Pending
    }

    pub(crate) fn interrupt(&mut self, ctx: &mut JobContext<'_>) {
        if self.acquired {
            self.acquired = false;
            ctx.workers.release(self.worker);
        }
    }

    pub(crate) fn status(&self) -> String {
        format!("Waiting for worker {} to become free", self.worker)
    }
}
