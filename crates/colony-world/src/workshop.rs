//! Workshops: fixed crafting stations with a single occupancy flag.

use std::collections::BTreeMap;

use colony_types::{Coord, WorkshopId, WorkshopKind, Workshops};
use serde::{Deserialize, Serialize};

/// A crafting station on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    /// Unique identifier.
    pub id: WorkshopId,
    /// What the workshop can make.
    pub kind: WorkshopKind,
    /// Cell the crafter stands on.
    pub position: Coord,
    /// Whether a craft job occupies the workshop.
    pub claimed: bool,
}

/// All workshops, keyed by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkshopRegistry {
    workshops: BTreeMap<WorkshopId, Workshop>,
}

impl WorkshopRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            workshops: BTreeMap::new(),
        }
    }

    /// Build a workshop.
    pub fn add(&mut self, kind: WorkshopKind, position: Coord) -> WorkshopId {
        let id = WorkshopId::new();
        self.workshops.insert(
            id,
            Workshop {
                id,
                kind,
                position,
                claimed: false,
            },
        );
        id
    }

    /// Look up a workshop.
    pub fn get(&self, workshop: WorkshopId) -> Option<&Workshop> {
        self.workshops.get(&workshop)
    }

    /// First workshop of `kind` that is currently free.
    pub fn find_free(&self, kind: WorkshopKind) -> Option<WorkshopId> {
        self.workshops
            .values()
            .find(|w| w.kind == kind && !w.claimed)
            .map(|w| w.id)
    }

    /// All workshops in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Workshop> {
        self.workshops.values()
    }
}

impl Workshops for WorkshopRegistry {
    fn position(&self, workshop: WorkshopId) -> Option<Coord> {
        self.workshops.get(&workshop).map(|w| w.position)
    }

    fn kind(&self, workshop: WorkshopId) -> Option<WorkshopKind> {
        self.workshops.get(&workshop).map(|w| w.kind)
    }

    fn try_claim(&mut self, workshop: WorkshopId) -> bool {
        match self.workshops.get_mut(&workshop) {
            Some(w) if !w.claimed => {
                w.claimed = true;
                true
            }
            _ => false,
        }
    }

    fn release(&mut self, workshop: WorkshopId) {
        if let Some(w) = self.workshops.get_mut(&workshop) {
            w.claimed = false;
        }
    }

    fn is_claimed(&self, workshop: WorkshopId) -> bool {
        self.workshops.get(&workshop).is_some_and(|w| w.claimed)
    }
}
