//! Sleeping.

use colony_types::{ItemId, ItemKind, ItemQuery, JobKindTag, PlayerId, WorkerId};
use tracing::{debug, info};

use super::{Transition, unexpected};
use crate::context::JobContext;
use crate::state::{JobState, WaitDuration, WaitForWorker, WalkToPosition};

/// WaitForWorker -> (walk to a free bed) -> Wait -> rested.
///
/// Without a free installed bed the worker sleeps where it stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SleepJob {
    owner: PlayerId,
    worker: WorkerId,
    held: bool,
    bed: Option<ItemId>,
}

impl SleepJob {
    /// Put `worker` to bed.
    pub const fn new(owner: PlayerId, worker: WorkerId) -> Self {
        Self {
            owner,
            worker,
            held: false,
            bed: None,
        }
    }

    pub(crate) const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The sleeper.
    pub const fn sleeper(&self) -> WorkerId {
        self.worker
    }

    /// The sleeper, once the job holds it.
    pub const fn held_worker(&self) -> Option<WorkerId> {
        if self.held { Some(self.worker) } else { None }
    }

    /// The claimed bed.
    pub const fn bed(&self) -> Option<ItemId> {
        self.bed
    }

    pub(crate) fn first_state(&self) -> JobState {
        WaitForWorker::new(self.worker).into()
    }

    fn sleep(&self, ctx: &JobContext<'_>) -> JobState {
        WaitDuration::new(self.worker, ctx.config.sleep_ticks, "Sleeping").into()
    }

    pub(crate) fn on_state_done(&mut self, ctx: &mut JobContext<'_>, finished: JobState) -> Transition {
        match finished {
            JobState::WaitForWorker(_) => {
                self.held = true;
                let near = ctx.workers.position(self.worker);
                let query = ItemQuery::kind(ItemKind::Bed).installed();
                let bed = ctx
                    .items
                    .find_unclaimed(&query, near)
                    .filter(|&bed| ctx.items.claim(bed));
                let bed_cell = bed.and_then(|b| ctx.items.position(b));
                match (bed, bed_cell) {
                    (Some(bed), Some(cell)) => {
                        debug!(worker = %self.worker, bed = %bed, "bed claimed");
                        self.bed = Some(bed);
                        let adjacent = !ctx.terrain.is_walkable(cell);
                        Transition::Next(WalkToPosition::new(self.worker, cell, adjacent).into())
                    }
                    (Some(bed), None) => {
                        ctx.items.release(bed);
                        Transition::Next(self.sleep(ctx))
                    }
                    (None, _) => Transition::Next(self.sleep(ctx)),
                }
            }
            JobState::WalkToPosition(_) => Transition::Next(self.sleep(ctx)),
            JobState::WaitDuration(_) => {
                ctx.workers.rest(self.worker);
                info!(worker = %self.worker, in_bed = self.bed.is_some(), "worker rested");
                self.release(ctx);
                Transition::Complete
            }
            other => unexpected(JobKindTag::Sleep, &other),
        }
    }

    fn release(&mut self, ctx: &mut JobContext<'_>) {
        if let Some(bed) = self.bed.take() {
            ctx.items.release(bed);
        }
        if self.held {
            self.held = false;
            ctx.workers.release(self.worker);
        }
    }

    pub(crate) fn on_interrupt(&mut self, ctx: &mut JobContext<'_>) {
        self.release(ctx);
    }
}
