//! Map, items, and workshops for the Colony simulation.
//!
//! This crate holds the reference implementations of the map, item, and
//! workshop collaborators the job framework talks to through the traits in
//! [`colony_types::ports`].
//!
//! # Modules
//!
//! - [`error`] -- Error types for map, item, and workshop operations.
//! - [`farming`] -- Per-cell crop growth and harvest readiness.
//! - [`items`] -- [`ItemStore`]: item positions, carriers, and claim flags.
//! - [`pathfinding`] -- Breadth-first shortest paths over walkable cells.
//! - [`starting_world`] -- Default starting layout for a new colony.
//! - [`tile_map`] -- [`TileMap`]: the block grid, crops, and hostiles.
//! - [`workshop`] -- [`WorkshopRegistry`]: crafting stations.

pub mod error;
pub mod farming;
pub mod items;
pub mod pathfinding;
pub mod starting_world;
pub mod tile_map;
pub mod workshop;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use farming::{BASE_HARVEST_YIELD, CropRegistry, CropState, DEFAULT_GROWTH_TICKS};
pub use items::{Item, ItemLocation, ItemStore};
pub use pathfinding::{DEFAULT_SEARCH_LIMIT, find_path, is_goal};
pub use starting_world::{
    StartingWorkshops, StartingWorld, StartingWorldParams, create_starting_world,
};
pub use tile_map::TileMap;
pub use workshop::{Workshop, WorkshopRegistry};
