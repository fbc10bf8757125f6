//! Installing an item (furniture) on a cell.

use colony_types::{Coord, ItemId, ItemKind, ItemQuery, JobKindTag, LaborKind, PlayerId, WorkerId};
use tracing::info;

use super::{Transition, release_worker, train, unexpected};
use crate::context::JobContext;
use crate::state::{HaulItem, JobState, SearchForWorker, WaitDuration, WalkToPosition};

/// Haul the item -> Search(Building) -> Walk -> Wait -> install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceItemJob {
    owner: PlayerId,
    kind: ItemKind,
    cell: Coord,
    worker: Option<WorkerId>,
    item: Option<ItemId>,
}

impl PlaceItemJob {
    /// Install a `kind` on `cell`.
    pub const fn new(owner: PlayerId, kind: ItemKind, cell: Coord) -> Self {
        Self {
            owner,
            kind,
            cell,
            worker: None,
            item: None,
        }
    }

    pub(crate) const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Where the item goes.
    pub const fn cell(&self) -> Coord {
        self.cell
    }

    /// What is installed.
    pub const fn item_kind(&self) -> ItemKind {
        self.kind
    }

    /// The claimed installer.
    pub const fn worker(&self) -> Option<WorkerId> {
        self.worker
    }

    pub(crate) fn first_state(&self) -> JobState {
        HaulItem::new(self.owner, ItemQuery::kind(self.kind), self.cell).into()
    }

    pub(crate) fn on_state_done(&mut self, ctx: &mut JobContext<'_>, finished: JobState) -> Transition {
        match finished {
            JobState::HaulItem(mut haul) => {
                self.item = haul.take_item();
                Transition::Next(SearchForWorker::new(self.owner, LaborKind::Building).into())
            }
            JobState::SearchForWorker(search) => {
                let Some(worker) = search.worker() else {
                    return unexpected(JobKindTag::PlaceItem, &JobState::SearchForWorker(search));
                };
                self.worker = Some(worker);
                let adjacent = !ctx.terrain.is_walkable(self.cell);
                Transition::Next(WalkToPosition::new(worker, self.cell, adjacent).into())
            }
            JobState::WalkToPosition(walk) => Transition::Next(
                WaitDuration::new(walk.worker(), ctx.config.place_ticks, "Installing").into(),
            ),
            JobState::WaitDuration(_) => self.install(ctx),
            other => unexpected(JobKindTag::PlaceItem, &other),
        }
    }

    fn install(&mut self, ctx: &mut JobContext<'_>) -> Transition {
        let (Some(worker), Some(item)) = (self.worker, self.item) else {
            return Transition::Abort("nothing to install".to_owned());
        };
        if ctx.items.position(item) != Some(self.cell) {
            return Transition::Abort(format!("{:?} is no longer on site", self.kind));
        }
        if let Err(err) = ctx.items.install(item) {
            return Transition::Abort(err.to_string());
        }
        ctx.items.release(item);
        self.item = None;
        train(ctx, worker, LaborKind::Building);
        release_worker(ctx, &mut self.worker);
        info!(worker = %worker, item = %item, cell = %self.cell, "item installed");
        Transition::Complete
    }

    pub(crate) fn on_worker_lost(&mut self) -> Transition {
        self.worker = None;
        Transition::Next(SearchForWorker::new(self.owner, LaborKind::Building).into())
    }

    pub(crate) fn on_interrupt(&mut self, ctx: &mut JobContext<'_>) {
        release_worker(ctx, &mut self.worker);
        if let Some(item) = self.item.take() {
            ctx.items.release(item);
        }
    }
}
