//! The block grid, its crops, and the hostiles roaming it.
//!
//! [`TileMap`] is the reference map/world collaborator: it implements
//! [`Terrain`] on top of a dense 3D block array. The map keeps its own copy
//! of the current tick (set by the simulation each tick) so crop growth can
//! be answered without threading the clock through every query.

use std::collections::BTreeMap;

use colony_types::{
    Area, BlockKind, ConstructionKind, Coord, CropStatus, DesignationKind, HostileId, PortError,
    Terrain,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;
use crate::farming::{BASE_HARVEST_YIELD, CropRegistry};

/// A dense, bounded 3D grid of blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    width: u32,
    height: u32,
    depth: u32,
    blocks: Vec<BlockKind>,
    crops: CropRegistry,
    hostiles: BTreeMap<HostileId, Coord>,
    tick: u64,
}

impl TileMap {
    /// Create a map filled with `fill`.
    pub fn new(width: u32, height: u32, depth: u32, fill: BlockKind) -> Result<Self, WorldError> {
        let invalid = WorldError::InvalidDimensions {
            width,
            height,
            depth,
        };
        if width == 0 || height == 0 || depth == 0 {
            return Err(invalid);
        }
        let len = usize::try_from(width)
            .ok()
            .and_then(|w| w.checked_mul(usize::try_from(height).ok()?))
            .and_then(|wh| wh.checked_mul(usize::try_from(depth).ok()?))
            .ok_or(invalid)?;
        Ok(Self {
            width,
            height,
            depth,
            blocks: vec![fill; len],
            crops: CropRegistry::default(),
            hostiles: BTreeMap::new(),
            tick: 0,
        })
    }

    /// Replace the crop registry (e.g. to change growth time).
    #[must_use]
    pub fn with_crops(mut self, crops: CropRegistry) -> Self {
        self.crops = crops;
        self
    }

    /// Width in cells.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of levels.
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.blocks.len()
    }

    /// The map's current tick.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance the map's notion of time (drives crop growth).
    pub const fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// Whether `cell` lies inside the map.
    pub fn in_bounds(&self, cell: Coord) -> bool {
        self.index(cell).is_some()
    }

    fn index(&self, cell: Coord) -> Option<usize> {
        let x = u32::try_from(cell.x).ok()?;
        let y = u32::try_from(cell.y).ok()?;
        let z = u32::try_from(cell.z).ok()?;
        if x >= self.width || y >= self.height || z >= self.depth {
            return None;
        }
        let layer = usize::try_from(self.width.checked_mul(self.height)?).ok()?;
        let row = usize::try_from(y.checked_mul(self.width)?.checked_add(x)?).ok()?;
        usize::try_from(z).ok()?.checked_mul(layer)?.checked_add(row)
    }

    /// Overwrite the block at `cell`.
    ///
    /// A crop growing on the cell is dropped unless the new block is grass.
    pub fn set_block(&mut self, cell: Coord, block: BlockKind) -> Result<(), WorldError> {
        let idx = self.index(cell).ok_or(WorldError::OutOfBounds(cell))?;
        let slot = self
            .blocks
            .get_mut(idx)
            .ok_or(WorldError::OutOfBounds(cell))?;
        *slot = block;
        if block != BlockKind::Grass {
            self.crops.clear(cell);
        }
        Ok(())
    }

    /// Fill every in-bounds cell between two corners (inclusive).
    pub fn fill(&mut self, a: Coord, b: Coord, block: BlockKind) {
        let Some(area) = Area::new(a, b).intersect(self.bounds()) else {
            return;
        };
        for cell in area.cells() {
            let _ = self.set_block(cell, block);
        }
    }

    /// Read-only access to the crop registry.
    pub const fn crops(&self) -> &CropRegistry {
        &self.crops
    }

    // -----------------------------------------------------------------------
    // Hostiles
    // -----------------------------------------------------------------------

    /// Place a hostile on the map.
    pub fn spawn_hostile(&mut self, position: Coord) -> Result<HostileId, WorldError> {
        if !self.in_bounds(position) {
            return Err(WorldError::OutOfBounds(position));
        }
        let id = HostileId::new();
        self.hostiles.insert(id, position);
        debug!(hostile = %id, %position, "hostile spawned");
        Ok(id)
    }

    /// All hostiles and their positions, in spawn order.
    pub fn hostiles(&self) -> impl Iterator<Item = (HostileId, Coord)> + '_ {
        self.hostiles.iter().map(|(&id, &pos)| (id, pos))
    }
}

impl Terrain for TileMap {
    fn bounds(&self) -> Area {
        let corner = |n: u32| i32::try_from(n.saturating_sub(1)).unwrap_or(i32::MAX);
        Area::new(
            Coord::new(0, 0, 0),
            Coord::new(corner(self.width), corner(self.height), corner(self.depth)),
        )
    }

    fn block(&self, cell: Coord) -> Option<BlockKind> {
        self.blocks.get(self.index(cell)?).copied()
    }

    fn is_walkable(&self, cell: Coord) -> bool {
        self.block(cell).is_some_and(BlockKind::is_walkable)
    }

    fn is_valid_for_designation(&self, kind: DesignationKind, cell: Coord) -> bool {
        let Some(block) = self.block(cell) else {
            return false;
        };
        match kind {
            DesignationKind::Mine => block.is_mineable(),
            DesignationKind::Channel => block.is_mineable() || block.is_walkable(),
            DesignationKind::ChopTree => block == BlockKind::Tree,
            DesignationKind::Construct(ConstructionKind::Wall) => {
                block.is_walkable() && !self.crops.has_crop(cell)
            }
            DesignationKind::Construct(ConstructionKind::Floor) => block == BlockKind::Open,
            DesignationKind::Farm => {
                block == BlockKind::Grass
                    && self.crops.status(cell, self.tick) != CropStatus::Growing
            }
        }
    }

    fn mutate_block(&mut self, cell: Coord, block: BlockKind) -> Result<(), PortError> {
        self.set_block(cell, block).map_err(PortError::from)
    }

    fn adjacent_walkable_cells(&self, cell: Coord) -> Vec<Coord> {
        cell.neighbors()
            .into_iter()
            .filter(|&n| self.is_walkable(n))
            .collect()
    }

    fn crop(&self, cell: Coord) -> CropStatus {
        self.crops.status(cell, self.tick)
    }

    fn plant_crop(&mut self, cell: Coord) -> Result<(), PortError> {
        if self.block(cell) != Some(BlockKind::Grass) {
            return Err(PortError::NotFarmable {
                cell,
                reason: "not grass".to_owned(),
            });
        }
        if self.crops.plant(cell, self.tick) {
            Ok(())
        } else {
            Err(PortError::NotFarmable {
                cell,
                reason: "already planted".to_owned(),
            })
        }
    }

    fn harvest_crop(&mut self, cell: Coord) -> Result<u32, PortError> {
        if self.crops.harvest(cell, self.tick) {
            Ok(BASE_HARVEST_YIELD)
        } else {
            Err(PortError::NotFarmable {
                cell,
                reason: "nothing ready to harvest".to_owned(),
            })
        }
    }

    fn hostile_position(&self, hostile: HostileId) -> Option<Coord> {
        self.hostiles.get(&hostile).copied()
    }

    fn defeat_hostile(&mut self, hostile: HostileId) -> bool {
        self.hostiles.remove(&hostile).is_some()
    }
}
