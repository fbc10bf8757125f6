//! The colony's opening orders.
//!
//! Once workers are spawned the engine queues a fixed set of commands so a
//! fresh colony has something to do: dig into the rock face, fell the
//! grove, farm a plot, raise a short wall, dress stone, build a second bed
//! and install it, arm a miner, and post a guard.

use colony_agents::WorkerRoster;
use colony_core::command::Command;
use colony_types::{Area, ConstructionKind, Coord, DesignationKind, ItemKind, LaborKind};
use colony_world::StartingWorld;

use crate::error::EngineError;

fn cell(x: u32, y: u32) -> Result<Coord, EngineError> {
    let overflow = || EngineError::Spawner {
        message: format!("order cell ({x}, {y}) out of range"),
    };
    let x = i32::try_from(x).map_err(|_| overflow())?;
    let y = i32::try_from(y).map_err(|_| overflow())?;
    Ok(Coord::new(x, y, 0))
}

/// Commands for the first tick, in the order they should be applied.
///
/// # Errors
///
/// Returns [`EngineError::Spawner`] if the map is too large to address.
pub fn initial_orders(
    start: &StartingWorld,
    roster: &WorkerRoster,
) -> Result<Vec<Command>, EngineError> {
    let height = start.map.height();
    let last_y = height.saturating_sub(1);
    let face = start.rock_face.min;
    let mut orders = vec![
        Command::Designate {
            kind: DesignationKind::Mine,
            area: Area::new(face, Coord::new(face.x, 4, 0)),
        },
        Command::Designate {
            kind: DesignationKind::ChopTree,
            area: Area::new(cell(0, height.saturating_sub(3))?, cell(3, last_y)?),
        },
        Command::Designate {
            kind: DesignationKind::Farm,
            area: Area::new(cell(10, 5)?, cell(11, 7)?),
        },
        Command::Designate {
            kind: DesignationKind::Construct(ConstructionKind::Wall),
            area: Area::new(cell(10, 9)?, cell(11, 9)?),
        },
        Command::Craft {
            workshop: start.workshop_ids.carpenter,
            output: ItemKind::Bed,
        },
        Command::Craft {
            workshop: start.workshop_ids.mason,
            output: ItemKind::StoneBlock,
        },
        Command::PlaceItem {
            kind: ItemKind::Bed,
            cell: cell(2, 1)?,
        },
    ];

    if let Some(miner) = roster.iter().find(|w| w.labors.contains(&LaborKind::Mining)) {
        orders.push(Command::PickupTool {
            worker: miner.id,
            tool: ItemKind::Pickaxe,
        });
    }
    if let Some(soldier) = roster.iter().find(|w| w.labors.contains(&LaborKind::Military)) {
        orders.push(Command::StationSoldier {
            soldier: soldier.id,
            station: cell(9, 6)?,
        });
    }
    Ok(orders)
}
