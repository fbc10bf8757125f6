//! Error types for the `colony-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`]. The
//! collaborator trait implementations convert it into
//! [`PortError`](colony_types::PortError) at the boundary.

use colony_types::{Coord, ItemId, PortError, WorkshopId};

/// Errors that can occur during map, item, or workshop operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A map was requested with a zero or oversized dimension.
    #[error("invalid map dimensions {width}x{height}x{depth}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Requested depth.
        depth: u32,
    },

    /// The cell lies outside the map.
    #[error("cell {0} is out of bounds")]
    OutOfBounds(Coord),

    /// The item does not exist.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// The item is carried by a worker and has no map position.
    #[error("item {0} is being carried")]
    ItemCarried(ItemId),

    /// The workshop does not exist.
    #[error("workshop not found: {0}")]
    WorkshopNotFound(WorkshopId),

    /// The cell cannot hold a crop, or the crop is in the wrong state.
    #[error("cell {cell} cannot be farmed: {reason}")]
    NotFarmable {
        /// The offending cell.
        cell: Coord,
        /// Why the operation was refused.
        reason: String,
    },

    /// A collaborator operation was refused.
    #[error(transparent)]
    Port(#[from] PortError),

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}

impl From<WorldError> for PortError {
    fn from(err: WorldError) -> Self {
        match err {
            WorldError::OutOfBounds(cell) => Self::OutOfBounds(cell),
            WorldError::ItemNotFound(item) => Self::UnknownItem(item),
            WorldError::ItemCarried(item) => Self::ItemCarried(item),
            WorldError::NotFarmable { cell, reason } => Self::NotFarmable { cell, reason },
            WorldError::Port(inner) => inner,
            other @ (WorldError::InvalidDimensions { .. }
            | WorldError::WorkshopNotFound(_)
            | WorldError::ArithmeticOverflow) => Self::Rejected(other.to_string()),
        }
    }
}
