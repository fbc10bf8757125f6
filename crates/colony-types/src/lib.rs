//! Shared type definitions for the Colony simulation.
//!
//! This crate is the single source of truth for the identifiers, enums and
//! plain structs used across the workspace, and for the collaborator ports
//! the job framework consumes. Types handed to the GUI shell flow
//! downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Labors, blocks, items, designations, workshops, statuses
//! - [`structs`] -- Coordinates, areas, item queries, job summaries
//! - [`ports`] -- Collaborator traits (workers, items, map, workshops, time)

pub mod enums;
pub mod ids;
pub mod ports;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    BlockKind, ConstructionKind, CropStatus, DesignationKind, ItemCategory, ItemKind, JobKindTag,
    LaborKind, MovementStatus, WorkshopKind,
};
pub use ids::{HostileId, ItemId, JobId, PlayerId, TimerId, WorkerId, WorkshopId};
pub use ports::{PortError, Stockpile, Terrain, Timers, Workforce, Workshops};
pub use structs::{
    Area, Coord, ItemMatch, ItemQuery, JobSummary, MovementHandle, ResourceRequirement,
};

#[cfg(test)]
mod tests {
    //! Binding generation for the types the GUI shell consumes.

    #[test]
    fn export_bindings() {
        // ts-rs writes the files to the `bindings/` directory relative to
        // the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::PlayerId::export_all();
        let _ = crate::ids::WorkerId::export_all();
        let _ = crate::ids::ItemId::export_all();
        let _ = crate::ids::JobId::export_all();
        let _ = crate::ids::WorkshopId::export_all();
        let _ = crate::ids::HostileId::export_all();
        let _ = crate::ids::TimerId::export_all();

        // Enums
        let _ = crate::enums::LaborKind::export_all();
        let _ = crate::enums::BlockKind::export_all();
        let _ = crate::enums::ItemCategory::export_all();
        let _ = crate::enums::ItemKind::export_all();
        let _ = crate::enums::ConstructionKind::export_all();
        let _ = crate::enums::DesignationKind::export_all();
        let _ = crate::enums::WorkshopKind::export_all();
        let _ = crate::enums::JobKindTag::export_all();

        // Structs
        let _ = crate::structs::Coord::export_all();
        let _ = crate::structs::Area::export_all();
        let _ = crate::structs::ItemMatch::export_all();
        let _ = crate::structs::ItemQuery::export_all();
        let _ = crate::structs::ResourceRequirement::export_all();
        let _ = crate::structs::JobSummary::export_all();
    }
}
