//! The reference collaborators, bundled.
//!
//! [`ColonyWorld`] owns one instance of every collaborator the job
//! framework talks to and hands out a [`JobContext`] over them. The fields
//! are disjoint so the context can be built while the job managers, which
//! live elsewhere in the simulation state, are borrowed mutably.

use colony_agents::{WorkerConfig, WorkerRoster};
use colony_jobs::{JobConfig, JobContext, TimerQueue};
use colony_world::{ItemStore, StartingWorld, TileMap, WorkshopRegistry};

/// Map, items, workshops, workers, and timers of one colony.
#[derive(Debug, Clone)]
pub struct ColonyWorld {
    /// The block grid, crops, and hostiles.
    pub map: TileMap,
    /// Every item.
    pub items: ItemStore,
    /// Crafting stations.
    pub workshops: WorkshopRegistry,
    /// Every worker.
    pub roster: WorkerRoster,
    /// Pending timers.
    pub timers: TimerQueue,
}

impl ColonyWorld {
    /// Assemble a world from its parts, with no timers pending.
    pub const fn new(
        map: TileMap,
        items: ItemStore,
        workshops: WorkshopRegistry,
        roster: WorkerRoster,
    ) -> Self {
        Self {
            map,
            items,
            workshops,
            roster,
            timers: TimerQueue::new(),
        }
    }

    /// Take over a freshly generated starting world, with an empty roster.
    pub fn from_starting(start: StartingWorld, workers: WorkerConfig) -> Self {
        Self::new(
            start.map,
            start.items,
            start.workshops,
            WorkerRoster::new(workers),
        )
    }

    /// Bring the time-keeping collaborators to `tick`.
    pub fn set_tick(&mut self, tick: u64) {
        self.timers.advance_to(tick);
        self.map.set_tick(tick);
    }

    /// A job context over every collaborator.
    pub fn context<'a>(&'a mut self, tick: u64, config: &'a JobConfig) -> JobContext<'a> {
        JobContext {
            tick,
            workers: &mut self.roster,
            items: &mut self.items,
            terrain: &mut self.map,
            workshops: &mut self.workshops,
            timers: &mut self.timers,
            config,
        }
    }
}
