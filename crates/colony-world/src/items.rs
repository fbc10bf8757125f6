//! Item storage: what lies where, who carries what, and which items are
//! spoken for.
//!
//! [`ItemStore`] is the reference item/resource collaborator. Items live
//! either on a map cell or in a worker's hands. Each item carries a single
//! non-blocking claim flag that jobs test-and-set before hauling or
//! consuming it.

use std::collections::BTreeMap;

use colony_types::{Coord, ItemId, ItemKind, ItemQuery, PlayerId, PortError, Stockpile, WorkerId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WorldError;

/// Where an item currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemLocation {
    /// Lying on a map cell.
    Ground(Coord),
    /// In a worker's hands.
    Carried(WorkerId),
}

/// A single item instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier.
    pub id: ItemId,
    /// What the item is.
    pub kind: ItemKind,
    /// Player the item belongs to.
    pub owner: PlayerId,
    /// Where the item is.
    pub location: ItemLocation,
    /// Whether a job has claimed the item.
    pub claimed: bool,
    /// Whether the item has been installed on the map (beds).
    pub installed: bool,
}

/// All items in the world, keyed by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStore {
    items: BTreeMap<ItemId, Item>,
}

impl ItemStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    /// Look up an item.
    pub fn get(&self, item: ItemId) -> Option<&Item> {
        self.items.get(&item)
    }

    /// All items in ID (creation) order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items of `kind`, wherever they are.
    pub fn count_kind(&self, kind: ItemKind) -> usize {
        self.items.values().filter(|i| i.kind == kind).count()
    }

    /// Number of claimed items.
    pub fn claimed_count(&self) -> usize {
        self.items.values().filter(|i| i.claimed).count()
    }

    /// The worker carrying `item`, if any.
    pub fn carrier(&self, item: ItemId) -> Option<WorkerId> {
        match self.items.get(&item)?.location {
            ItemLocation::Carried(worker) => Some(worker),
            ItemLocation::Ground(_) => None,
        }
    }

    fn get_mut(&mut self, item: ItemId) -> Result<&mut Item, WorldError> {
        self.items
            .get_mut(&item)
            .ok_or(WorldError::ItemNotFound(item))
    }

    /// Drop everything `worker` is carrying where it stands.
    ///
    /// Used when a worker is removed from the colony. Returns the dropped
    /// items.
    pub fn drop_all_carried(&mut self, worker: WorkerId, position: Coord) -> Vec<ItemId> {
        let mut dropped = Vec::new();
        for item in self.items.values_mut() {
            if item.location == ItemLocation::Carried(worker) {
                item.location = ItemLocation::Ground(position);
                dropped.push(item.id);
            }
        }
        dropped
    }
}

impl Stockpile for ItemStore {
    fn find_unclaimed(&self, query: &ItemQuery, near: Option<Coord>) -> Option<ItemId> {
        self.items
            .values()
            .filter(|i| !i.claimed && query.matches(i.kind, i.installed))
            .filter_map(|i| match i.location {
                ItemLocation::Ground(pos) => Some((i.id, pos)),
                ItemLocation::Carried(_) => None,
            })
            .min_by_key(|&(id, pos)| (near.map_or(0, |n| n.manhattan(pos)), id))
            .map(|(id, _)| id)
    }

    fn exists(&self, item: ItemId) -> bool {
        self.items.contains_key(&item)
    }

    fn is_claimed(&self, item: ItemId) -> bool {
        self.items.get(&item).is_some_and(|i| i.claimed)
    }

    fn position(&self, item: ItemId) -> Option<Coord> {
        match self.items.get(&item)?.location {
            ItemLocation::Ground(pos) => Some(pos),
            ItemLocation::Carried(_) => None,
        }
    }

    fn kind(&self, item: ItemId) -> Option<ItemKind> {
        self.items.get(&item).map(|i| i.kind)
    }

    fn claim(&mut self, item: ItemId) -> bool {
        match self.items.get_mut(&item) {
            Some(i) if !i.claimed => {
                i.claimed = true;
                true
            }
            _ => false,
        }
    }

    fn release(&mut self, item: ItemId) {
        if let Some(i) = self.items.get_mut(&item) {
            i.claimed = false;
        }
    }

    fn consume(&mut self, item: ItemId) -> Result<(), PortError> {
        let removed = self
            .items
            .remove(&item)
            .ok_or(WorldError::ItemNotFound(item))?;
        debug!(item = %item, kind = ?removed.kind, "item consumed");
        Ok(())
    }

    fn create_item(&mut self, kind: ItemKind, position: Coord, owner: PlayerId) -> ItemId {
        let id = ItemId::new();
        self.items.insert(
            id,
            Item {
                id,
                kind,
                owner,
                location: ItemLocation::Ground(position),
                claimed: false,
                installed: false,
            },
        );
        debug!(item = %id, ?kind, %position, "item created");
        id
    }

    fn pick_up(&mut self, item: ItemId, worker: WorkerId) -> Result<(), PortError> {
        let entry = self.get_mut(item)?;
        entry.location = ItemLocation::Carried(worker);
        entry.installed = false;
        Ok(())
    }

    fn put_down(&mut self, item: ItemId, position: Coord) -> Result<(), PortError> {
        let entry = self.get_mut(item)?;
        entry.location = ItemLocation::Ground(position);
        Ok(())
    }

    fn items_at(&self, position: Coord) -> Vec<ItemId> {
        self.items
            .values()
            .filter(|i| i.location == ItemLocation::Ground(position))
            .map(|i| i.id)
            .collect()
    }

    fn install(&mut self, item: ItemId) -> Result<(), PortError> {
        let entry = self.get_mut(item)?;
        if let ItemLocation::Carried(_) = entry.location {
            return Err(WorldError::ItemCarried(item).into());
        }
        entry.installed = true;
        Ok(())
    }
}
