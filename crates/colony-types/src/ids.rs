//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every entity the colony tracks has a strongly-typed ID so that a worker
//! can never be handed to an API expecting an item. All IDs use UUID v7
//! (time-ordered), which makes ordered maps keyed by ID iterate in creation
//! order -- the job framework relies on that for its "first idle worker
//! wins" scan.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a player (faction) that owns workers and jobs.
    PlayerId
}

define_id! {
    /// Unique identifier for a worker in the colony.
    WorkerId
}

define_id! {
    /// Unique identifier for an item lying on the map or carried by a worker.
    ItemId
}

define_id! {
    /// Unique identifier for a job, including designations.
    JobId
}

define_id! {
    /// Unique identifier for a workshop.
    WorkshopId
}

define_id! {
    /// Unique identifier for a hostile creature on the map.
    HostileId
}

define_id! {
    /// Unique identifier for a timer registered with the time collaborator.
    TimerId
}
