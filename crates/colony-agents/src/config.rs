//! Tunables for worker needs and movement.
//!
//! [`WorkerConfig`] is embedded in the simulation's YAML configuration under
//! the `workers` key; every field falls back to its default when omitted.

use serde::{Deserialize, Serialize};

/// Configuration for worker needs and movement applied each tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Fatigue points added per tick (default: 1).
    #[serde(default = "default_fatigue_per_tick")]
    pub fatigue_per_tick: u32,

    /// Fatigue at which a worker is sent to bed (default: 960).
    #[serde(default = "default_fatigue_threshold")]
    pub fatigue_threshold: u32,

    /// Cells a walking worker advances per tick (default: 1).
    #[serde(default = "default_steps_per_tick")]
    pub steps_per_tick: u32,

    /// Cap on cells visited by a single path search (default: 16384).
    #[serde(default = "default_path_search_limit")]
    pub path_search_limit: usize,
}

const fn default_fatigue_per_tick() -> u32 {
    1
}

const fn default_fatigue_threshold() -> u32 {
    960
}

const fn default_steps_per_tick() -> u32 {
    1
}

const fn default_path_search_limit() -> usize {
    colony_world::DEFAULT_SEARCH_LIMIT
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            fatigue_per_tick: default_fatigue_per_tick(),
            fatigue_threshold: default_fatigue_threshold(),
            steps_per_tick: default_steps_per_tick(),
            path_search_limit: default_path_search_limit(),
        }
    }
}
