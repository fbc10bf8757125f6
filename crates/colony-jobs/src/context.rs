//! The bundle of collaborators a job is driven with.

use colony_types::{Stockpile, Terrain, Timers, Workforce, Workshops};

use crate::config::JobConfig;

/// Everything a job state may read or mutate while it runs.
///
/// Built fresh by the simulation for every tick (or event) from whatever
/// concrete collaborators the host uses.
pub struct JobContext<'a> {
    /// The current simulation tick.
    pub tick: u64,
    /// Worker collaborator.
    pub workers: &'a mut dyn Workforce,
    /// Item collaborator.
    pub items: &'a mut dyn Stockpile,
    /// Map collaborator.
    pub terrain: &'a mut dyn Terrain,
    /// Workshop collaborator.
    pub workshops: &'a mut dyn Workshops,
    /// Time collaborator.
    pub timers: &'a mut dyn Timers,
    /// Job durations and tunables.
    pub config: &'a JobConfig,
}

impl core::fmt::Debug for JobContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JobContext")
            .field("tick", &self.tick)
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
