//! Felling trees.

use colony_types::{BlockKind, Coord, ItemKind, JobKindTag, LaborKind, PlayerId, WorkerId};
use tracing::info;

use super::{Transition, release_worker, train, unexpected, work_site};
use crate::context::JobContext;
use crate::state::{JobState, SearchForWorker, WaitDuration};

/// Search(Woodcutting) -> Walk next to the tree -> Wait -> fell it.
///
/// A felled tree leaves grass and one log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChopTreeJob {
    owner: PlayerId,
    cell: Coord,
    worker: Option<WorkerId>,
}

impl ChopTreeJob {
    /// Fell the tree at `cell`.
    pub const fn new(owner: PlayerId, cell: Coord) -> Self {
        Self {
            owner,
            cell,
            worker: None,
        }
    }

    pub(crate) const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The tree's cell.
    pub const fn cell(&self) -> Coord {
        self.cell
    }

    /// The claimed woodcutter.
    pub const fn worker(&self) -> Option<WorkerId> {
        self.worker
    }

    pub(crate) fn first_state(&self, ctx: &JobContext<'_>) -> JobState {
        let tool = ctx.config.require_tools.then_some(ItemKind::Axe);
        SearchForWorker::new(self.owner, LaborKind::Woodcutting)
            .with_tool(tool)
            .into()
    }

    pub(crate) fn on_state_done(&mut self, ctx: &mut JobContext<'_>, finished: JobState) -> Transition {
        match finished {
            JobState::SearchForWorker(search) => {
                let Some(worker) = search.worker() else {
                    return unexpected(JobKindTag::ChopTree, &JobState::SearchForWorker(search));
                };
                self.worker = Some(worker);
                Transition::Next(work_site(ctx, worker, self.cell).into())
            }
            JobState::WalkToPosition(walk) => Transition::Next(
                WaitDuration::new(walk.worker(), ctx.config.chop_ticks, "Chopping").into(),
            ),
            JobState::WaitDuration(_) => self.fell(ctx),
            other => unexpected(JobKindTag::ChopTree, &other),
        }
    }

    fn fell(&mut self, ctx: &mut JobContext<'_>) -> Transition {
        let Some(worker) = self.worker else {
            return Transition::Abort("no woodcutter".to_owned());
        };
        if ctx.terrain.block(self.cell) != Some(BlockKind::Tree) {
            return Transition::Abort("tree already felled".to_owned());
        }
        if let Err(err) = ctx.terrain.mutate_block(self.cell, BlockKind::Grass) {
            return Transition::Abort(err.to_string());
        }
        let log = ctx.items.create_item(ItemKind::Log, self.cell, self.owner);
        train(ctx, worker, LaborKind::Woodcutting);
        release_worker(ctx, &mut self.worker);
        info!(worker = %worker, cell = %self.cell, item = %log, "tree felled");
        Transition::Complete
    }

    pub(crate) fn on_worker_lost(&mut self, ctx: &JobContext<'_>) -> Transition {
        self.worker = None;
        Transition::Next(self.first_state(ctx))
    }

    pub(crate) fn on_interrupt(&mut self, ctx: &mut JobContext<'_>) {
        release_worker(ctx, &mut self.worker);
    }
}
