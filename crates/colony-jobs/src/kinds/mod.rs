//! Concrete job kinds.
//!
//! A kind holds the job's immutable parameters (target cell, recipe, tool)
//! plus whatever it has acquired so far (the claimed worker, hauled items).
//! It never runs states itself: [`JobKind::first_state`] picks the entry
//! state and [`JobKind::on_state_done`] maps each finished state to a
//! [`Transition`]. Terminal side effects happen inside `on_state_done`,
//! after the target has been re-validated.
//!
//! # Modules
//!
//! - [`build`] -- Haul materials, then raise a wall or floor
//! - [`chop`] -- Fell a tree
//! - [`craft`] -- Produce items at a workshop, plus the recipe table
//! - [`military`] -- Guard a station and fight hostiles that come close
//! - [`mine`] -- Dig out a block or channel a cell
//! - [`pickup_tool`] -- Fetch and equip a tool
//! - [`place_item`] -- Haul an item to a cell and install it
//! - [`plant`] -- Plant bare grass or harvest a mature crop
//! - [`sleep`] -- Put a tired worker to bed

pub mod build;
pub mod chop;
pub mod craft;
pub mod military;
pub mod mine;
pub mod pickup_tool;
pub mod place_item;
pub mod plant;
pub mod sleep;

use colony_types::{
    Coord, DesignationKind, ItemId, JobKindTag, LaborKind, PlayerId, WorkerId,
};
use tracing::{error, warn};

use crate::context::JobContext;
use crate::state::{JobState, WalkToPosition};

pub use build::BuildJob;
pub use chop::ChopTreeJob;
pub use craft::{CraftJob, RECIPES, Recipe, recipe_for};
pub use military::MilitaryStationJob;
pub use mine::MineJob;
pub use pickup_tool::PickupToolJob;
pub use place_item::PlaceItemJob;
pub use plant::PlantJob;
pub use sleep::SleepJob;

/// What a job does after one of its states finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Enter this state next.
    Next(JobState),
    /// The terminal side effects ran; the job is complete.
    Complete,
    /// The target turned out invalid; interrupt the job.
    Abort(String),
}

/// Every kind of job the framework runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    /// Dig a block out, or channel a cell.
    Mine(MineJob),
    /// Fell a tree.
    ChopTree(ChopTreeJob),
    /// Build a construction.
    Build(BuildJob),
    /// Craft at a workshop.
    Craft(CraftJob),
    /// Plant or harvest.
    Plant(PlantJob),
    /// Sleep.
    Sleep(SleepJob),
    /// Equip a tool.
    PickupTool(PickupToolJob),
    /// Install an item.
    PlaceItem(PlaceItemJob),
    /// Guard a station.
    MilitaryStation(MilitaryStationJob),
}

impl JobKind {
    /// The per-cell job a designation of `kind` creates.
    pub const fn for_designation(kind: DesignationKind, owner: PlayerId, cell: Coord) -> Self {
        match kind {
            DesignationKind::Mine => Self::Mine(MineJob::dig(owner, cell)),
            DesignationKind::Channel => Self::Mine(MineJob::channel(owner, cell)),
            DesignationKind::ChopTree => Self::ChopTree(ChopTreeJob::new(owner, cell)),
            DesignationKind::Construct(construction) => {
                Self::Build(BuildJob::new(owner, cell, construction))
            }
            DesignationKind::Farm => Self::Plant(PlantJob::new(owner, cell)),
        }
    }

    /// Kind tag for summaries.
    pub const fn tag(&self) -> JobKindTag {
        match self {
            Self::Mine(job) if job.is_channel() => JobKindTag::Channel,
            Self::Mine(_) => JobKindTag::Mine,
            Self::ChopTree(_) => JobKindTag::ChopTree,
            Self::Build(_) => JobKindTag::Build,
            Self::Craft(_) => JobKindTag::Craft,
            Self::Plant(_) => JobKindTag::Plant,
            Self::Sleep(_) => JobKindTag::Sleep,
            Self::PickupTool(_) => JobKindTag::PickupTool,
            Self::PlaceItem(_) => JobKindTag::PlaceItem,
            Self::MilitaryStation(_) => JobKindTag::MilitaryStation,
        }
    }

    /// Player the job works for.
    pub const fn owner(&self) -> PlayerId {
        match self {
            Self::Mine(job) => job.owner(),
            Self::ChopTree(job) => job.owner(),
            Self::Build(job) => job.owner(),
            Self::Craft(job) => job.owner(),
            Self::Plant(job) => job.owner(),
            Self::Sleep(job) => job.owner(),
            Self::PickupTool(job) => job.owner(),
            Self::PlaceItem(job) => job.owner(),
            Self::MilitaryStation(job) => job.owner(),
        }
    }

    /// Target cell, for jobs that have a fixed one.
    pub const fn position(&self) -> Option<Coord> {
        match self {
            Self::Mine(job) => Some(job.cell()),
            Self::ChopTree(job) => Some(job.cell()),
            Self::Build(job) => Some(job.cell()),
            Self::Craft(job) => Some(job.site()),
            Self::Plant(job) => Some(job.cell()),
            Self::PlaceItem(job) => Some(job.cell()),
            Self::MilitaryStation(job) => Some(job.station()),
            Self::Sleep(_) | Self::PickupTool(_) => None,
        }
    }

    /// The worker the job currently holds, if any.
    pub const fn worker(&self) -> Option<WorkerId> {
        match self {
            Self::Mine(job) => job.worker(),
            Self::ChopTree(job) => job.worker(),
            Self::Build(job) => job.worker(),
            Self::Craft(job) => job.worker(),
            Self::Plant(job) => job.worker(),
            Self::Sleep(job) => job.held_worker(),
            Self::PickupTool(job) => job.held_worker(),
            Self::PlaceItem(job) => job.worker(),
            Self::MilitaryStation(job) => job.held_soldier(),
        }
    }

    /// The state the job enters first.
    pub fn first_state(&self, ctx: &JobContext<'_>) -> JobState {
        match self {
            Self::Mine(job) => job.first_state(ctx),
            Self::ChopTree(job) => job.first_state(ctx),
            Self::Build(job) => job.first_state(),
            Self::Craft(job) => job.first_state(),
            Self::Plant(job) => job.first_state(),
            Self::Sleep(job) => job.first_state(),
            Self::PickupTool(job) => job.first_state(),
            Self::PlaceItem(job) => job.first_state(),
            Self::MilitaryStation(job) => job.first_state(),
        }
    }

    /// Pick the successor of a state that just finished.
    pub fn on_state_done(&mut self, ctx: &mut JobContext<'_>, finished: JobState) -> Transition {
        match self {
            Self::Mine(job) => job.on_state_done(ctx, finished),
            Self::ChopTree(job) => job.on_state_done(ctx, finished),
            Self::Build(job) => job.on_state_done(ctx, finished),
            Self::Craft(job) => job.on_state_done(ctx, finished),
            Self::Plant(job) => job.on_state_done(ctx, finished),
            Self::Sleep(job) => job.on_state_done(ctx, finished),
            Self::PickupTool(job) => job.on_state_done(ctx, finished),
            Self::PlaceItem(job) => job.on_state_done(ctx, finished),
            Self::MilitaryStation(job) => job.on_state_done(ctx, finished),
        }
    }

    /// React to the held worker vanishing mid-job.
    ///
    /// Kinds that searched for any qualified worker search again; kinds
    /// bound to one specific worker give up.
    pub fn on_worker_lost(&mut self, ctx: &JobContext<'_>, worker: WorkerId) -> Transition {
        match self {
            Self::Mine(job) => job.on_worker_lost(ctx),
            Self::ChopTree(job) => job.on_worker_lost(ctx),
            Self::Build(job) => job.on_worker_lost(),
            Self::Craft(job) => job.on_worker_lost(),
            Self::Plant(job) => job.on_worker_lost(),
            Self::PlaceItem(job) => job.on_worker_lost(),
            Self::Sleep(_) | Self::PickupTool(_) | Self::MilitaryStation(_) => {
                Transition::Abort(format!("worker {worker} is gone"))
            }
        }
    }

    /// Job-level cleanup after the current state has been interrupted.
    pub fn on_interrupt(&mut self, ctx: &mut JobContext<'_>) {
        match self {
            Self::Mine(job) => job.on_interrupt(ctx),
            Self::ChopTree(job) => job.on_interrupt(ctx),
            Self::Build(job) => job.on_interrupt(ctx),
            Self::Craft(job) => job.on_interrupt(ctx),
            Self::Plant(job) => job.on_interrupt(ctx),
            Self::Sleep(job) => job.on_interrupt(ctx),
            Self::PickupTool(job) => job.on_interrupt(ctx),
            Self::PlaceItem(job) => job.on_interrupt(ctx),
            Self::MilitaryStation(job) => job.on_interrupt(ctx),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Release the worker held in `slot`, if any.
pub(crate) fn release_worker(ctx: &mut JobContext<'_>, slot: &mut Option<WorkerId>) {
    if let Some(worker) = slot.take() {
        ctx.workers.release(worker);
    }
}

/// Clear the claims on every item in `items`.
pub(crate) fn release_items(ctx: &mut JobContext<'_>, items: &mut Vec<ItemId>) {
    for item in items.drain(..) {
        ctx.items.release(item);
    }
}

/// Destroy every item in `items`. Nothing is consumed unless all still exist.
pub(crate) fn consume_all(ctx: &mut JobContext<'_>, items: &mut Vec<ItemId>) -> Result<(), String> {
    if let Some(missing) = items.iter().find(|&&item| !ctx.items.exists(item)) {
        return Err(format!("material {missing} vanished"));
    }
    for item in items.drain(..) {
        if let Err(err) = ctx.items.consume(item) {
            warn!(item = %item, error = %err, "material could not be consumed");
        }
    }
    Ok(())
}

/// Raise a skill by the configured gain.
pub(crate) fn train(ctx: &mut JobContext<'_>, worker: WorkerId, labor: LaborKind) {
    let gain = ctx.config.skill_gain;
    ctx.workers.raise_skill(worker, labor, gain);
}

/// Walk order for working on `cell`.
///
/// A solid cell is worked from any neighbour. A walkable cell is worked
/// from the walkable neighbour closest to the worker, so nobody ends up
/// standing inside what gets built or dug there.
pub(crate) fn work_site(ctx: &JobContext<'_>, worker: WorkerId, cell: Coord) -> WalkToPosition {
    if !ctx.terrain.is_walkable(cell) {
        return WalkToPosition::new(worker, cell, true);
    }
    let from = ctx.workers.position(worker).unwrap_or(cell);
    let stand = ctx
        .terrain
        .adjacent_walkable_cells(cell)
        .into_iter()
        .min_by_key(|&c| (c.manhattan(from), c));
    match stand {
        Some(stand) => WalkToPosition::new(worker, stand, false),
        None => WalkToPosition::new(worker, cell, true),
    }
}

/// A state finished that the kind never enters at this point.
pub(crate) fn unexpected(tag: JobKindTag, finished: &JobState) -> Transition {
    error!(kind = ?tag, state = finished.name(), "unexpected state finished");
    Transition::Abort(format!("unexpected state {}", finished.name()))
}
