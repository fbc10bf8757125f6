//! Durations and tunables for job execution.
//!
//! These values are embedded in the simulation's YAML configuration under
//! the `jobs` key. All durations are in simulation ticks.

use serde::{Deserialize, Serialize};

/// Configuration for job durations, skill gain, and military behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Ticks to dig out a block (default: 60, one hour).
    #[serde(default = "default_mine_ticks")]
    pub mine_ticks: u64,

    /// Ticks to channel a cell (default: 60).
    #[serde(default = "default_channel_ticks")]
    pub channel_ticks: u64,

    /// Ticks to fell a tree (default: 45).
    #[serde(default = "default_chop_ticks")]
    pub chop_ticks: u64,

    /// Ticks to raise a construction (default: 90).
    #[serde(default = "default_build_ticks")]
    pub build_ticks: u64,

    /// Ticks to plant or harvest a cell (default: 20).
    #[serde(default = "default_plant_ticks")]
    pub plant_ticks: u64,

    /// Ticks a worker sleeps (default: 240).
    #[serde(default = "default_sleep_ticks")]
    pub sleep_ticks: u64,

    /// Ticks to install an item (default: 30).
    #[serde(default = "default_place_ticks")]
    pub place_ticks: u64,

    /// Ticks a soldier fights a hostile (default: 10).
    #[serde(default = "default_attack_ticks")]
    pub attack_ticks: u64,

    /// Ticks between a guard's rations (default: 480).
    #[serde(default = "default_ration_interval")]
    pub ration_interval: u64,

    /// Distance within which a guard reacts to a threat (default: 8).
    #[serde(default = "default_guard_radius")]
    pub guard_radius: u32,

    /// Skill levels gained per completed job (default: 1).
    #[serde(default = "default_skill_gain")]
    pub skill_gain: u32,

    /// Whether mining needs a pickaxe and chopping an axe (default: false).
    #[serde(default)]
    pub require_tools: bool,
}

const fn default_mine_ticks() -> u64 {
    60
}

const fn default_channel_ticks() -> u64 {
    60
}

const fn default_chop_ticks() -> u64 {
    45
}

const fn default_build_ticks() -> u64 {
    90
}

const fn default_plant_ticks() -> u64 {
    20
}

const fn default_sleep_ticks() -> u64 {
    240
}

const fn default_place_ticks() -> u64 {
    30
}

const fn default_attack_ticks() -> u64 {
    10
}

const fn default_ration_interval() -> u64 {
    480
}

const fn default_guard_radius() -> u32 {
    8
}

const fn default_skill_gain() -> u32 {
    1
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            mine_ticks: default_mine_ticks(),
            channel_ticks: default_channel_ticks(),
            chop_ticks: default_chop_ticks(),
            build_ticks: default_build_ticks(),
            plant_ticks: default_plant_ticks(),
            sleep_ticks: default_sleep_ticks(),
            place_ticks: default_place_ticks(),
            attack_ticks: default_attack_ticks(),
            ration_interval: default_ration_interval(),
            guard_radius: default_guard_radius(),
            skill_gain: default_skill_gain(),
            require_tools: false,
        }
    }
}
