//! Collaborator ports consumed by the job framework.
//!
//! The job framework never touches worker components, item storage, the
//! map, or the clock directly. It talks to them through these narrow traits
//! so the reference implementations in `colony-world` and `colony-agents`
//! (or a GUI client's own world model) can be swapped freely.
//!
//! All claim flags exposed here are non-blocking test-and-set booleans.
//! Losing a race simply means "try again next tick".

use crate::enums::{
    BlockKind, CropStatus, DesignationKind, ItemKind, LaborKind, MovementStatus, WorkshopKind,
};
use crate::ids::{HostileId, ItemId, PlayerId, TimerId, WorkerId, WorkshopId};
use crate::structs::{Area, Coord, ItemQuery, MovementHandle};

/// Errors reported by collaborators for mutations that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The worker does not exist.
    #[error("unknown worker: {0}")]
    UnknownWorker(WorkerId),

    /// The item does not exist (never created, or already consumed).
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    /// The item is being carried and cannot be used in place.
    #[error("item {0} is being carried")]
    ItemCarried(ItemId),

    /// The cell lies outside the map.
    #[error("cell {0} is out of bounds")]
    OutOfBounds(Coord),

    /// The cell cannot hold a crop, or the crop is not in the expected state.
    #[error("cell {cell} cannot be farmed: {reason}")]
    NotFarmable {
        /// The offending cell.
        cell: Coord,
        /// Why the operation was refused.
        reason: String,
    },

    /// The collaborator refused the mutation for another reason.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Worker collaborator: idle pool, claim flag, labors, movement.
pub trait Workforce {
    /// Workers of `owner` that are not claimed by any job, in stable order.
    fn idle_workers(&self, owner: PlayerId) -> Vec<WorkerId>;

    /// Whether the worker still exists.
    fn exists(&self, worker: WorkerId) -> bool;

    /// Whether the worker exists and is not claimed.
    fn is_idle(&self, worker: WorkerId) -> bool;

    /// Claim the worker. Returns `false` if it is already claimed or gone.
    fn try_acquire(&mut self, worker: WorkerId) -> bool;

    /// Clear the claim and return the worker to idle movement.
    fn release(&mut self, worker: WorkerId);

    /// Whether the worker is enabled for `labor`.
    fn has_labor(&self, worker: WorkerId, labor: LaborKind) -> bool;

    /// Whether the worker has a tool of `tool` equipped.
    fn has_equipped(&self, worker: WorkerId, tool: ItemKind) -> bool;

    /// Current cell of the worker.
    fn position(&self, worker: WorkerId) -> Option<Coord>;

    /// Order the worker to walk to `target` (or next to it).
    ///
    /// Returns `None` if the worker does not exist.
    fn walk_to(
        &mut self,
        worker: WorkerId,
        target: Coord,
        arrive_adjacent: bool,
    ) -> Option<MovementHandle>;

    /// Status of a previously issued movement order.
    fn movement_status(&self, handle: MovementHandle) -> MovementStatus;

    /// Cancel any movement order.
    fn stop(&mut self, worker: WorkerId);

    /// Park the worker in place (busy working) or let it move again.
    fn set_occupied(&mut self, worker: WorkerId, occupied: bool);

    /// Raise the worker's skill in `labor` by `amount` levels.
    fn raise_skill(&mut self, worker: WorkerId, labor: LaborKind, amount: u32);

    /// Reset the worker's fatigue after sleeping.
    fn rest(&mut self, worker: WorkerId);

    /// Equip `item` (of `kind`) on the worker. Returns `false` if the worker is gone.
    fn equip(&mut self, worker: WorkerId, item: ItemId, kind: ItemKind) -> bool;

    /// Workers of any owner currently standing on `cell`.
    fn workers_at(&self, cell: Coord) -> Vec<WorkerId>;

    /// Move an idle worker to `to` at once. Returns `false` if the worker
    /// is claimed or gone.
    fn shift_idle(&mut self, worker: WorkerId, to: Coord) -> bool;
}

/// Item and resource collaborator.
pub trait Stockpile {
    /// An unclaimed item on the ground matching `query`, nearest to `near` when given.
    fn find_unclaimed(&self, query: &ItemQuery, near: Option<Coord>) -> Option<ItemId>;

    /// Whether the item exists.
    fn exists(&self, item: ItemId) -> bool;

    /// Whether the item is claimed.
    fn is_claimed(&self, item: ItemId) -> bool;

    /// Cell the item lies on. `None` while carried or once gone.
    fn position(&self, item: ItemId) -> Option<Coord>;

    /// Kind of the item.
    fn kind(&self, item: ItemId) -> Option<ItemKind>;

    /// Claim the item. Returns `false` if it is already claimed or gone.
    fn claim(&mut self, item: ItemId) -> bool;

    /// Clear the item's claim.
    fn release(&mut self, item: ItemId);

    /// Destroy the item.
    fn consume(&mut self, item: ItemId) -> Result<(), PortError>;

    /// Create a new, unclaimed item on the ground.
    fn create_item(&mut self, kind: ItemKind, position: Coord, owner: PlayerId) -> ItemId;

    /// Move the item into a worker's hands.
    fn pick_up(&mut self, item: ItemId, worker: WorkerId) -> Result<(), PortError>;

    /// Put the item down on a cell.
    fn put_down(&mut self, item: ItemId, position: Coord) -> Result<(), PortError>;

    /// Items lying on a cell.
    fn items_at(&self, position: Coord) -> Vec<ItemId>;

    /// Mark the item as installed where it lies.
    fn install(&mut self, item: ItemId) -> Result<(), PortError>;
}

/// Map and world collaborator.
pub trait Terrain {
    /// Every cell of the map, as one box.
    fn bounds(&self) -> Area;

    /// Block at `cell`, or `None` outside the map.
    fn block(&self, cell: Coord) -> Option<BlockKind>;

    /// Whether a worker can stand on `cell`.
    fn is_walkable(&self, cell: Coord) -> bool;

    /// Whether `cell` is a valid target for designation `kind`.
    fn is_valid_for_designation(&self, kind: DesignationKind, cell: Coord) -> bool;

    /// Replace the block at `cell`.
    fn mutate_block(&mut self, cell: Coord, block: BlockKind) -> Result<(), PortError>;

    /// Walkable neighbours of `cell`.
    fn adjacent_walkable_cells(&self, cell: Coord) -> Vec<Coord>;

    /// Crop state at `cell` as of the map's current tick.
    fn crop(&self, cell: Coord) -> CropStatus;

    /// Plant a crop at `cell`.
    fn plant_crop(&mut self, cell: Coord) -> Result<(), PortError>;

    /// Harvest the mature crop at `cell`, returning the number of food items it yields.
    fn harvest_crop(&mut self, cell: Coord) -> Result<u32, PortError>;

    /// Current cell of a hostile.
    fn hostile_position(&self, hostile: HostileId) -> Option<Coord>;

    /// Remove a hostile. Returns `false` if it was already gone.
    fn defeat_hostile(&mut self, hostile: HostileId) -> bool;
}

/// Workshop collaborator.
pub trait Workshops {
    /// Cell where the workshop's crafter works.
    fn position(&self, workshop: WorkshopId) -> Option<Coord>;

    /// Kind of the workshop.
    fn kind(&self, workshop: WorkshopId) -> Option<WorkshopKind>;

    /// Claim the workshop. Returns `false` if it is busy or gone.
    fn try_claim(&mut self, workshop: WorkshopId) -> bool;

    /// Free the workshop.
    fn release(&mut self, workshop: WorkshopId);

    /// Whether the workshop is claimed.
    fn is_claimed(&self, workshop: WorkshopId) -> bool;
}

/// Time collaborator.
pub trait Timers {
    /// Register a timer firing `ticks` ticks from now.
    fn add_timer(&mut self, ticks: u64) -> TimerId;

    /// Remove a timer. Returns `false` if it was unknown.
    fn remove_timer(&mut self, timer: TimerId) -> bool;

    /// Whether the timer's deadline has passed.
    fn has_fired(&self, timer: TimerId) -> bool;
}
