//! Per-worker skill levels, one per labor kind.
//!
//! Levels start at 0 and rise by whole levels when a job using that labor
//! completes, capped at [`MAX_SKILL_LEVEL`].

use std::collections::BTreeMap;

use colony_types::LaborKind;
use serde::{Deserialize, Serialize};

/// Maximum skill level a worker can reach.
pub const MAX_SKILL_LEVEL: u32 = 20;

/// Skill levels of a single worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    levels: BTreeMap<LaborKind, u32>,
}

impl SkillSet {
    /// Create an empty skill set (every labor at level 0).
    pub const fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Current level in `labor`.
    pub fn level(&self, labor: LaborKind) -> u32 {
        self.levels.get(&labor).copied().unwrap_or(0)
    }

    /// Raise `labor` by `amount` levels, saturating at [`MAX_SKILL_LEVEL`].
    ///
    /// Returns the new level.
    pub fn raise(&mut self, labor: LaborKind, amount: u32) -> u32 {
        let entry = self.levels.entry(labor).or_insert(0);
        *entry = entry.saturating_add(amount).min(MAX_SKILL_LEVEL);
        *entry
    }

    /// All labors with a non-zero level.
    pub fn trained(&self) -> impl Iterator<Item = (LaborKind, u32)> + '_ {
        self.levels
            .iter()
            .filter(|&(_, &lvl)| lvl > 0)
            .map(|(&labor, &lvl)| (labor, lvl))
    }
}
