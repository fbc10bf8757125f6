//! Default starting map for a new colony.
//!
//! A single grass level with a rock face along the east edge (ore veins
//! in it), a small grove in the south-west corner, one workshop of each
//! kind, and a starter stockpile of raw materials, food, and tools.

use colony_types::{
    Area, BlockKind, Coord, ItemKind, PlayerId, Stockpile, WorkshopId, WorkshopKind,
};
use tracing::info;

use crate::error::WorldError;
use crate::farming::CropRegistry;
use crate::items::ItemStore;
use crate::tile_map::TileMap;
use crate::workshop::WorkshopRegistry;

/// Smallest width the layout fits in.
pub const MIN_WIDTH: u32 = 16;

/// Smallest height the layout fits in.
pub const MIN_HEIGHT: u32 = 12;

/// Parameters for [`create_starting_world`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartingWorldParams {
    /// Map width in cells.
    pub width: u32,
    /// Map height in cells.
    pub height: u32,
    /// Ticks a crop needs to mature.
    pub crop_growth_ticks: u64,
    /// Player owning the starter stockpile.
    pub owner: PlayerId,
}

/// Identifiers of the starting workshops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartingWorkshops {
    /// Woodworking.
    pub carpenter: WorkshopId,
    /// Stone dressing.
    pub mason: WorkshopId,
    /// Smelting and tool making.
    pub forge: WorkshopId,
}

/// Everything the starting layout creates.
#[derive(Debug, Clone)]
pub struct StartingWorld {
    /// The block grid.
    pub map: TileMap,
    /// The starter stockpile.
    pub items: ItemStore,
    /// The starting workshops.
    pub workshops: WorkshopRegistry,
    /// IDs of the starting workshops.
    pub workshop_ids: StartingWorkshops,
    /// Open ground where workers should be placed.
    pub spawn_area: Area,
    /// The rock face along the east edge (mining target).
    pub rock_face: Area,
}

fn coord(x: u32, y: u32) -> Result<Coord, WorldError> {
    let x = i32::try_from(x).map_err(|_| WorldError::ArithmeticOverflow)?;
    let y = i32::try_from(y).map_err(|_| WorldError::ArithmeticOverflow)?;
    Ok(Coord::new(x, y, 0))
}

/// Build the default starting world.
pub fn create_starting_world(params: StartingWorldParams) -> Result<StartingWorld, WorldError> {
    let StartingWorldParams {
        width,
        height,
        crop_growth_ticks,
        owner,
    } = params;
    if width < MIN_WIDTH || height < MIN_HEIGHT {
        return Err(WorldError::InvalidDimensions {
            width,
            height,
            depth: 1,
        });
    }
    let mut map = TileMap::new(width, height, 1, BlockKind::Grass)?
        .with_crops(CropRegistry::new(crop_growth_ticks));

    let last_x = width.checked_sub(1).ok_or(WorldError::ArithmeticOverflow)?;
    let last_y = height.checked_sub(1).ok_or(WorldError::ArithmeticOverflow)?;
    let face_x = width.checked_sub(4).ok_or(WorldError::ArithmeticOverflow)?;

    // Rock face with ore veins on every third row.
    let rock_face = Area::new(coord(face_x, 0)?, coord(last_x, last_y)?);
    map.fill(rock_face.min, rock_face.max, BlockKind::Rock);
    let vein_x = width.checked_sub(2).ok_or(WorldError::ArithmeticOverflow)?;
    for y in (1..height).step_by(3) {
        map.set_block(coord(vein_x, y)?, BlockKind::Ore)?;
    }

    // Grove in the south-west corner.
    let grove_y = height.checked_sub(3).ok_or(WorldError::ArithmeticOverflow)?;
    for (x, y) in [(1, grove_y), (3, grove_y), (2, last_y.saturating_sub(1)), (1, last_y)] {
        map.set_block(coord(x, y)?, BlockKind::Tree)?;
    }

    let mut workshops = WorkshopRegistry::new();
    let workshop_ids = StartingWorkshops {
        carpenter: workshops.add(WorkshopKind::Carpenter, coord(4, 1)?),
        mason: workshops.add(WorkshopKind::Mason, coord(6, 1)?),
        forge: workshops.add(WorkshopKind::Forge, coord(8, 1)?),
    };

    let mut items = ItemStore::new();
    let stock: [(ItemKind, u32, (u32, u32)); 7] = [
        (ItemKind::Log, 4, (2, 3)),
        (ItemKind::Stone, 4, (3, 3)),
        (ItemKind::Plank, 2, (4, 3)),
        (ItemKind::MetalBar, 1, (5, 3)),
        (ItemKind::Food, 6, (6, 3)),
        (ItemKind::Pickaxe, 1, (7, 3)),
        (ItemKind::Axe, 1, (8, 3)),
    ];
    for (kind, count, (x, y)) in stock {
        let pos = coord(x, y)?;
        for _ in 0..count {
            items.create_item(kind, pos, owner);
        }
    }
    let bed = items.create_item(ItemKind::Bed, coord(1, 1)?, owner);
    items.install(bed)?;

    let spawn_area = Area::new(coord(4, 5)?, coord(8, 8)?);
    info!(width, height, items = items.len(), "starting world created");

    Ok(StartingWorld {
        map,
        items,
        workshops,
        workshop_ids,
        spawn_area,
        rock_face,
    })
}
