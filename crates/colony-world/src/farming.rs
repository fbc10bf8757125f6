//! Crop state tracking for farm cells: planting, growth timers, and harvest
//! readiness.
//!
//! Any grass cell can carry a crop. Cells without an entry in the
//! [`CropRegistry`] are bare.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use colony_types::{Coord, CropStatus};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default number of ticks for a crop to mature after planting.
pub const DEFAULT_GROWTH_TICKS: u64 = 600;

/// Food items produced by harvesting one mature cell.
pub const BASE_HARVEST_YIELD: u32 = 2;

// ---------------------------------------------------------------------------
// CropState
// ---------------------------------------------------------------------------

/// Growth state of the crop on a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropState {
    /// The tick when the crop was planted.
    pub planted_at_tick: u64,
    /// The tick at which the crop becomes harvestable.
    pub mature_at_tick: u64,
}

impl CropState {
    /// Create a crop planted at `current_tick`, maturing after
    /// `growth_ticks` ticks.
    ///
    /// Returns `None` on arithmetic overflow.
    pub fn plant(current_tick: u64, growth_ticks: u64) -> Option<Self> {
        let mature_at = current_tick.checked_add(growth_ticks)?;
        Some(Self {
            planted_at_tick: current_tick,
            mature_at_tick: mature_at,
        })
    }

    /// Whether the crop is ready for harvest.
    pub const fn is_mature(&self, current_tick: u64) -> bool {
        current_tick >= self.mature_at_tick
    }
}

// ---------------------------------------------------------------------------
// CropRegistry
// ---------------------------------------------------------------------------

/// Registry mapping farm cells to their crop growth state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegistry {
    crops: BTreeMap<Coord, CropState>,
    growth_ticks: u64,
}

impl Default for CropRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_GROWTH_TICKS)
    }
}

impl CropRegistry {
    /// Create an empty registry whose crops mature after `growth_ticks`.
    pub const fn new(growth_ticks: u64) -> Self {
        Self {
            crops: BTreeMap::new(),
            growth_ticks,
        }
    }

    /// Plant a crop on `cell`.
    ///
    /// Returns `false` if the cell already carries a crop or the maturity
    /// tick would overflow.
    pub fn plant(&mut self, cell: Coord, current_tick: u64) -> bool {
        if self.crops.contains_key(&cell) {
            return false;
        }
        match CropState::plant(current_tick, self.growth_ticks) {
            Some(state) => {
                self.crops.insert(cell, state);
                true
            }
            None => false,
        }
    }

    /// Crop status of `cell` at `current_tick`.
    pub fn status(&self, cell: Coord, current_tick: u64) -> CropStatus {
        match self.crops.get(&cell) {
            None => CropStatus::Bare,
            Some(state) if state.is_mature(current_tick) => CropStatus::Mature,
            Some(_) => CropStatus::Growing,
        }
    }

    /// Whether `cell` carries any crop, mature or not.
    pub fn has_crop(&self, cell: Coord) -> bool {
        self.crops.contains_key(&cell)
    }

    /// Remove a mature crop.
    ///
    /// Returns `false` if nothing mature grows on the cell; a growing crop
    /// is left in place.
    pub fn harvest(&mut self, cell: Coord, current_tick: u64) -> bool {
        if self.status(cell, current_tick) != CropStatus::Mature {
            return false;
        }
        self.crops.remove(&cell).is_some()
    }

    /// Drop whatever grows on a cell whose ground was dug out or built over.
    pub fn clear(&mut self, cell: Coord) {
        self.crops.remove(&cell);
    }

    /// Number of cells carrying a crop.
    pub fn active_count(&self) -> usize {
        self.crops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_matures_after_growth_ticks() {
        let state = CropState::plant(10, 10).unwrap_or(CropState {
            planted_at_tick: 0,
            mature_at_tick: 0,
        });
        assert_eq!(state.mature_at_tick, 20);
        assert!(!state.is_mature(19));
        assert!(state.is_mature(20));
    }

    #[test]
    fn plant_overflow_is_refused() {
        assert!(CropState::plant(u64::MAX, 1).is_none());
        let mut reg = CropRegistry::new(1);
        assert!(!reg.plant(Coord::new(0, 0, 0), u64::MAX));
    }

    #[test]
    fn status_follows_growth() {
        let mut reg = CropRegistry::new(5);
        let cell = Coord::new(1, 1, 0);
        assert_eq!(reg.status(cell, 0), CropStatus::Bare);
        assert!(reg.plant(cell, 0));
        assert_eq!(reg.status(cell, 4), CropStatus::Growing);
        assert_eq!(reg.status(cell, 5), CropStatus::Mature);
    }

    #[test]
    fn cannot_double_plant() {
        let mut reg = CropRegistry::new(5);
        let cell = Coord::new(1, 1, 0);
        assert!(reg.plant(cell, 0));
        assert!(!reg.plant(cell, 1));
        assert_eq!(reg.active_count(), 1);
    }

    #[test]
    fn harvest_only_when_mature() {
        let mut reg = CropRegistry::new(5);
        let cell = Coord::new(2, 2, 0);
        assert!(reg.plant(cell, 0));
        assert!(!reg.harvest(cell, 3));
        assert!(reg.has_crop(cell));
        assert!(reg.harvest(cell, 5));
        assert!(!reg.has_crop(cell));
    }

    #[test]
    fn clear_removes_growing_crop() {
        let mut reg = CropRegistry::new(5);
        let cell = Coord::new(0, 3, 0);
        assert!(reg.plant(cell, 0));
        reg.clear(cell);
        assert_eq!(reg.status(cell, 10), CropStatus::Bare);
    }
}
