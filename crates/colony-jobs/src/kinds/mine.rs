//! Digging: mine a solid block out to floor, or channel a cell to open space.

use colony_types::{BlockKind, Coord, DesignationKind, ItemKind, JobKindTag, LaborKind, PlayerId, WorkerId};
use tracing::info;

use super::{Transition, release_worker, train, unexpected, work_site};
use crate::context::JobContext;
use crate::state::{JobState, SearchForWorker, WaitDuration};

/// Search(Mining) -> Walk next to the cell -> Wait -> dig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MineJob {
    owner: PlayerId,
    cell: Coord,
    channel: bool,
    worker: Option<WorkerId>,
}

impl MineJob {
    /// Dig `cell` out, leaving floor.
    pub const fn dig(owner: PlayerId, cell: Coord) -> Self {
        Self {
            owner,
            cell,
            channel: false,
            worker: None,
        }
    }

    /// Dig `cell` away entirely, leaving open space.
    pub const fn channel(owner: PlayerId, cell: Coord) -> Self {
        Self {
            owner,
            cell,
            channel: true,
            worker: None,
        }
    }

    pub(crate) const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The dug cell.
    pub const fn cell(&self) -> Coord {
        self.cell
    }

    /// Whether this is a channel rather than a dig.
    pub const fn is_channel(&self) -> bool {
        self.channel
    }

    /// The claimed miner.
    pub const fn worker(&self) -> Option<WorkerId> {
        self.worker
    }

    const fn tag(&self) -> JobKindTag {
        if self.channel {
            JobKindTag::Channel
        } else {
            JobKindTag::Mine
        }
    }

    const fn designation(&self) -> DesignationKind {
        if self.channel {
            DesignationKind::Channel
        } else {
            DesignationKind::Mine
        }
    }

    pub(crate) fn first_state(&self, ctx: &JobContext<'_>) -> JobState {
        let tool = ctx.config.require_tools.then_some(ItemKind::Pickaxe);
        SearchForWorker::new(self.owner, LaborKind::Mining)
            .with_tool(tool)
            .into()
    }

    pub(crate) fn on_state_done(&mut self, ctx: &mut JobContext<'_>, finished: JobState) -> Transition {
        match finished {
            JobState::SearchForWorker(search) => {
                let Some(worker) = search.worker() else {
                    return unexpected(self.tag(), &JobState::SearchForWorker(search));
                };
                self.worker = Some(worker);
                Transition::Next(work_site(ctx, worker, self.cell).into())
            }
            JobState::WalkToPosition(walk) => {
                let (ticks, label) = if self.channel {
                    (ctx.config.channel_ticks, "Channeling")
                } else {
                    (ctx.config.mine_ticks, "Mining")
                };
                Transition::Next(WaitDuration::new(walk.worker(), ticks, label).into())
            }
            JobState::WaitDuration(_) => self.dig_out(ctx),
            other => unexpected(self.tag(), &other),
        }
    }

    fn dig_out(&mut self, ctx: &mut JobContext<'_>) -> Transition {
        let Some(worker) = self.worker else {
            return Transition::Abort("no miner".to_owned());
        };
        if !ctx.terrain.is_valid_for_designation(self.designation(), self.cell) {
            return Transition::Abort("target already dug".to_owned());
        }
        let yielded = ctx.terrain.block(self.cell).and_then(BlockKind::mined_yield);
        let result = if self.channel {
            BlockKind::Open
        } else {
            BlockKind::Floor
        };
        if let Err(err) = ctx.terrain.mutate_block(self.cell, result) {
            return Transition::Abort(err.to_string());
        }
        if let Some(kind) = yielded {
            ctx.items.create_item(kind, self.cell, self.owner);
        }
        train(ctx, worker, LaborKind::Mining);
        release_worker(ctx, &mut self.worker);
        info!(
            worker = %worker,
            cell = %self.cell,
            channel = self.channel,
            yielded = ?yielded,
            "cell dug out"
        );
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
