//! Walking a claimed worker to a cell.

use colony_types::{Coord, MovementHandle, MovementStatus, WorkerId};
use tracing::debug;

use super::Step;
use crate::context::JobContext;

/// Walk `worker` to `target`, or next to it when `adjacent` is set.
///
/// An unreachable target aborts the job. A movement order replaced from
/// outside the job is simply reissued. A worker that disappears mid-walk is
/// reported as lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkToPosition {
    worker: WorkerId,
    target: Coord,
    adjacent: bool,
    handle: Option<MovementHandle>,
}

impl WalkToPosition {
    /// Walk onto `target`, or next to it when `adjacent` is set.
    pub const fn new(worker: WorkerId, target: Coord, adjacent: bool) -> Self {
        Self {
            worker,
            target,
            adjacent,
            handle: None,
        }
    }

    /// The walking worker.
    pub const fn worker(&self) -> WorkerId {
        self.worker
    }

    /// The destination.
    pub const fn target(&self) -> Coord {
        self.target
    }

    fn order(&mut self, ctx: &mut JobContext<'_>) -> bool {
        self.handle = ctx
            .workers
            .walk_to(self.worker, self.target, self.adjacent);
        self.handle.is_some()
    }

    pub(crate) fn start(&mut self, ctx: &mut JobContext<'_>) -> Step {
        if !self.order(ctx) {
            return Step::WorkerLost(self.worker);
        }
        self.poll(ctx)
    }

    pub(crate) fn poll(&mut self, ctx: &mut JobContext<'_>) -> Step {
        let Some(handle) = self.handle else {
            return Step::WorkerLost(self.worker);
        };
        match ctx.workers.movement_status(handle) {
            MovementStatus::Arrived => Step::Finished,
            MovementStatus::Walking => Step::Pending,
            MovementStatus::NoPath => Step::Abort("No path to site".to_owned()),
            MovementStatus::Lost => Step::WorkerLost(self.worker),
            MovementStatus::Superseded => {
                debug!(worker = %self.worker, target = %self.target, "movement order reissued");
                if self.order(ctx) {
                    Step::Pending
                } else {
                    Step::WorkerLost(self.worker)
                }
            }
        }
    }

    pub(crate) fn interrupt(&mut self, ctx: &mut JobContext<'_>) {
        if self.handle.take().is_some() {
            ctx.workers.stop(self.worker);
        }
    }

    pub(crate) fn status(&self) -> String {
        format!("Walking to {}", self.target)
    }
}
