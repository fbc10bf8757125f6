//! Enumeration types for the Colony simulation.
//!
//! Labors, blocks, items, designations, workshops, and the small status
//! enums that collaborators report back to the job framework.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::structs::{ItemQuery, ResourceRequirement};

// ---------------------------------------------------------------------------
// Labor
// ---------------------------------------------------------------------------

/// A category of work a worker may or may not be enabled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LaborKind {
    /// Digging out rock, ore and soil, and channeling floors.
    Mining,
    /// Felling trees.
    Woodcutting,
    /// Raising walls and laying floors.
    Building,
    /// Woodworking at a carpenter's workshop.
    Carpentry,
    /// Stone dressing at a mason's workshop.
    Masonry,
    /// Smelting and tool making at a forge.
    Smithing,
    /// Planting and harvesting crops.
    Farming,
    /// Carrying items between places.
    Hauling,
    /// Guarding stations and fighting hostiles.
    Military,
}

impl LaborKind {
    /// Every labor kind, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Mining,
        Self::Woodcutting,
        Self::Building,
        Self::Carpentry,
        Self::Masonry,
        Self::Smithing,
        Self::Farming,
        Self::Hauling,
        Self::Military,
    ];

    /// Human-readable name used in status strings.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mining => "Mining",
            Self::Woodcutting => "Woodcutting",
            Self::Building => "Building",
            Self::Carpentry => "Carpentry",
            Self::Masonry => "Masonry",
            Self::Smithing => "Smithing",
            Self::Farming => "Farming",
            Self::Hauling => "Hauling",
            Self::Military => "Military",
        }
    }
}

impl core::fmt::Display for LaborKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// The material occupying a single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum BlockKind {
    /// Empty space with nothing to stand on (e.g. a channeled hole).
    Open,
    /// Bare walkable floor.
    Floor,
    /// Walkable, fertile ground that can be farmed.
    Grass,
    /// Solid diggable earth.
    Soil,
    /// Solid stone.
    Rock,
    /// Solid stone carrying a metal vein.
    Ore,
    /// A standing tree.
    Tree,
    /// A constructed wall.
    Wall,
}

impl BlockKind {
    /// Whether a worker can stand on this block.
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Floor | Self::Grass)
    }

    /// Whether this block can be dug out by a mining job.
    pub const fn is_mineable(self) -> bool {
        matches!(self, Self::Soil | Self::Rock | Self::Ore)
    }

    /// The item left behind when this block is dug out, if any.
    pub const fn mined_yield(self) -> Option<ItemKind> {
        match self {
            Self::Rock => Some(ItemKind::Stone),
            Self::Ore => Some(ItemKind::Ore),
            Self::Tree => Some(ItemKind::Log),
            Self::Open | Self::Floor | Self::Grass | Self::Soil | Self::Wall => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Broad grouping of item kinds used by resource queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ItemCategory {
    /// Raw and dressed stone.
    Stone,
    /// Logs and planks.
    Wood,
    /// Ore and refined metal.
    Metal,
    /// Anything edible.
    Food,
    /// Equipment a worker can carry.
    Tool,
    /// Items that can be installed on the map.
    Furniture,
}

/// A concrete kind of item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ItemKind {
    /// A rough stone boulder from mining rock.
    Stone,
    /// A dressed stone block.
    StoneBlock,
    /// A chunk of metal ore.
    Ore,
    /// A refined metal bar.
    MetalBar,
    /// A felled tree trunk.
    Log,
    /// A sawn plank.
    Plank,
    /// Harvested food.
    Food,
    /// A mining tool.
    Pickaxe,
    /// A woodcutting tool.
    Axe,
    /// A bed workers sleep in once installed.
    Bed,
}

impl ItemKind {
    /// Category this item kind belongs to.
    pub const fn category(self) -> ItemCategory {
        match self {
            Self::Stone | Self::StoneBlock => ItemCategory::Stone,
            Self::Ore | Self::MetalBar => ItemCategory::Metal,
            Self::Log | Self::Plank => ItemCategory::Wood,
            Self::Food => ItemCategory::Food,
            Self::Pickaxe | Self::Axe => ItemCategory::Tool,
            Self::Bed => ItemCategory::Furniture,
        }
    }
}

// ---------------------------------------------------------------------------
// Designations
// ---------------------------------------------------------------------------

/// What a construction designation raises on its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ConstructionKind {
    /// A solid wall built on walkable ground.
    Wall,
    /// A floor laid over open space.
    Floor,
}

impl ConstructionKind {
    /// Materials that must be hauled to the site before building starts.
    pub fn requirements(self) -> Vec<ResourceRequirement> {
        match self {
            Self::Wall => vec![ResourceRequirement::new(
                ItemQuery::category(ItemCategory::Stone),
                1,
            )],
            Self::Floor => vec![ResourceRequirement::new(
                ItemQuery::category(ItemCategory::Wood),
                1,
            )],
        }
    }

    /// Block the site turns into once built.
    pub const fn result_block(self) -> BlockKind {
        match self {
            Self::Wall => BlockKind::Wall,
            Self::Floor => BlockKind::Floor,
        }
    }
}

/// A kind of painted map area that generates one job per eligible cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum DesignationKind {
    /// Dig out solid blocks, leaving floor.
    Mine,
    /// Dig a hole, leaving open space.
    Channel,
    /// Fell trees.
    ChopTree,
    /// Build a construction.
    Construct(ConstructionKind),
    /// Plant and harvest crops.
    Farm,
}

impl DesignationKind {
    /// The designation set every player starts with.
    pub const STANDARD: [Self; 6] = [
        Self::Mine,
        Self::Channel,
        Self::ChopTree,
        Self::Construct(ConstructionKind::Wall),
        Self::Construct(ConstructionKind::Floor),
        Self::Farm,
    ];
}

impl core::fmt::Display for DesignationKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Mine => f.write_str("Mine"),
            Self::Channel => f.write_str("Channel"),
            Self::ChopTree => f.write_str("Chop trees"),
            Self::Construct(ConstructionKind::Wall) => f.write_str("Build walls"),
            Self::Construct(ConstructionKind::Floor) => f.write_str("Build floors"),
            Self::Farm => f.write_str("Farm"),
        }
    }
}

// ---------------------------------------------------------------------------
// Workshops
// ---------------------------------------------------------------------------

/// The kind of workshop a crafting recipe requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum WorkshopKind {
    /// Woodworking.
    Carpenter,
    /// Stone dressing.
    Mason,
    /// Smelting and tool making.
    Forge,
}

// ---------------------------------------------------------------------------
// Collaborator status
// ---------------------------------------------------------------------------

/// Outcome of a movement order, as reported by the worker collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementStatus {
    /// Still on the way (or the path is still being planned).
    Walking,
    /// Reached the target cell, or a cell adjacent to it when requested.
    Arrived,
    /// No path to the target exists.
    NoPath,
    /// A newer order replaced this one.
    Superseded,
    /// The worker no longer exists.
    Lost,
}

/// Crop state of a single farm cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropStatus {
    /// Nothing planted.
    Bare,
    /// Planted but not ready.
    Growing,
    /// Ready for harvest.
    Mature,
}

/// Kind tag carried by job summaries for the GUI shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum JobKindTag {
    /// Dig out a block.
    Mine,
    /// Dig a hole.
    Channel,
    /// Build a construction.
    Build,
    /// Produce items at a workshop.
    Craft,
    /// Plant or harvest a crop.
    Plant,
    /// Fell a tree.
    ChopTree,
    /// Put a worker to bed.
    Sleep,
    /// Equip a tool.
    PickupTool,
    /// Haul and install an item.
    PlaceItem,
    /// Guard a station.
    MilitaryStation,
    /// A designation managing per-cell jobs.
    Designation(DesignationKind),
}
