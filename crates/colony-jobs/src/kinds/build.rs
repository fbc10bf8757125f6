//! Constructions: walls and floors.

use colony_types::{ConstructionKind, Coord, DesignationKind, ItemId, JobKindTag, LaborKind, PlayerId, WorkerId};
use tracing::{debug, info, warn};

use super::{Transition, consume_all, release_items, release_worker, train, unexpected, work_site};
use crate::context::JobContext;
use crate::state::{HaulResourceSet, JobState, SearchForWorker, WaitDuration};

/// Ticks to wait before checking again whether a busy worker left the site.
const SITE_CLEAR_RETRY_TICKS: u64 = 1;

/// Haul materials -> Search(Building) -> Walk next to the site -> Wait -> build.
///
/// Materials stay claimed by the job from delivery until they are consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildJob {
    owner: PlayerId,
    cell: Coord,
    construction: ConstructionKind,
    worker: Option<WorkerId>,
    materials: Vec<ItemId>,
}

impl BuildJob {
    /// Build `construction` on `cell`.
    pub const fn new(owner: PlayerId, cell: Coord, construction: ConstructionKind) -> Self {
        Self {
            owner,
            cell,
            construction,
            worker: None,
            materials: Vec::new(),
        }
    }

    pub(crate) const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The building site.
    pub const fn cell(&self) -> Coord {
        self.cell
    }

    /// What is being built.
    pub const fn construction(&self) -> ConstructionKind {
        self.construction
    }

    /// The claimed builder.
    pub const fn worker(&self) -> Option<WorkerId> {
        self.worker
    }

    /// Materials delivered and held for the build.
    pub fn materials(&self) -> &[ItemId] {
        &self.materials
    }

    pub(crate) fn first_state(&self) -> JobState {
        HaulResourceSet::new(self.owner, &self.construction.requirements(), self.cell).into()
    }

    pub(crate) fn on_state_done(&mut self, ctx: &mut JobContext<'_>, finished: JobState) -> Transition {
        match finished {
            JobState::HaulResourceSet(mut haul) => {
                self.materials = haul.take_items();
                debug!(cell = %self.cell, materials = self.materials.len(), "materials on site");
                Transition::Next(SearchForWorker::new(self.owner, LaborKind::Building).into())
            }
            JobState::SearchForWorker(search) => {
                let Some(worker) = search.worker() else {
                    return unexpected(JobKindTag::Build, &JobState::SearchForWorker(search));
                };
                self.worker = Some(worker);
                Transition::Next(work_site(ctx, worker, self.cell).into())
            }
            JobState::WalkToPosition(walk) => Transition::Next(
                WaitDuration::new(walk.worker(), ctx.config.build_ticks, "Building").into(),
            ),
            JobState::WaitDuration(_) => self.raise(ctx),
            other => unexpected(JobKindTag::Build, &other),
        }
    }

    fn raise(&mut self, ctx: &mut JobContext<'_>) -> Transition {
        let Some(worker) = self.worker else {
            return Transition::Abort("no builder".to_owned());
        };
        let designation = DesignationKind::Construct(self.construction);
        if !ctx.terrain.is_valid_for_designation(designation, self.cell) {
            return Transition::Abort("site no longer buildable".to_owned());
        }
        if !self.site_is_clear(ctx) {
            return Transition::Next(
                WaitDuration::new(worker, SITE_CLEAR_RETRY_TICKS, "Waiting for the site to clear")
                    .into(),
            );
        }
        if let Err(reason) = consume_all(ctx, &mut self.materials) {
            return Transition::Abort(reason);
        }
        self.clear_site(ctx);
        if let Err(err) = ctx
            .terrain
            .mutate_block(self.cell, self.construction.result_block())
        {
            return Transition::Abort(err.to_string());
        }
        train(ctx, worker, LaborKind::Building);
        release_worker(ctx, &mut self.worker);
        info!(
            worker = %worker,
            cell = %self.cell,
            construction = ?self.construction,
            "construction finished"
        );
        Transition::Complete
    }

    /// Shift idle workers off a site that is about to become solid.
    ///
    /// Returns `false` while a busy worker still stands on the site.
    fn site_is_clear(&self, ctx: &mut JobContext<'_>) -> bool {
        if self.construction.result_block().is_walkable() {
            return true;
        }
        let standing = ctx.workers.workers_at(self.cell);
        if standing.is_empty() {
            return true;
        }
        let Some(spot) = ctx.terrain.adjacent_walkable_cells(self.cell).into_iter().next() else {
            warn!(cell = %self.cell, workers = standing.len(), "no room to move workers off site");
            return false;
        };
        let mut clear = true;
        for worker in standing {
            if ctx.workers.shift_idle(worker, spot) {
                debug!(worker = %worker, from = %self.cell, to = %spot, "worker moved off site");
            } else {
                clear = false;
            }
        }
        clear
    }

    /// Move whatever still lies on the site to a walkable neighbour.
    fn clear_site(&self, ctx: &mut JobContext<'_>) {
        let leftovers = ctx.items.items_at(self.cell);
        if leftovers.is_empty() {
            return;
        }
        let Some(spot) = ctx.terrain.adjacent_walkable_cells(self.cell).into_iter().next() else {
            warn!(cell = %self.cell, items = leftovers.len(), "no room to move items off site");
            return;
        };
        for item in leftovers {
            if let Err(err) = ctx.items.put_down(item, spot) {
                warn!(item = %item, error = %err, "could not move item off site");
            }
        }
    }

    /// Delivered materials stay claimed while another builder is found.
    pub(crate) fn on_worker_lost(&mut self) -> Transition {
        self.worker = None;
        Transition::Next(SearchForWorker::new(self.owner, LaborKind::Building).into())
    }

    pub(crate) fn on_interrupt(&mut self, ctx: &mut JobContext<'_>) {
        release_worker(ctx, &mut self.worker);
        release_items(ctx, &mut self.materials);
    }
}
