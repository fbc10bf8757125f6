//! A tick-driven timer queue: the reference time collaborator.

use std::collections::BTreeMap;

use colony_types::{TimerId, Timers};

/// Timers keyed by ID, each with an absolute deadline tick.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    now: u64,
    deadlines: BTreeMap<TimerId, u64>,
}

impl TimerQueue {
    /// Create an empty queue at tick 0.
    pub const fn new() -> Self {
        Self {
            now: 0,
            deadlines: BTreeMap::new(),
        }
    }

    /// Move the queue's clock forward. Time never runs backwards.
    pub fn advance_to(&mut self, tick: u64) {
        self.now = self.now.max(tick);
    }

    /// The queue's current tick.
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Number of registered timers.
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    /// Whether no timers are registered.
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

impl Timers for TimerQueue {
    fn add_timer(&mut self, ticks: u64) -> TimerId {
        let id = TimerId::new();
        self.deadlines.insert(id, self.now.saturating_add(ticks));
        id
    }

    fn remove_timer(&mut self, timer: TimerId) -> bool {
        self.deadlines.remove(&timer).is_some()
    }

    fn has_fired(&self, timer: TimerId) -> bool {
        self.deadlines
            .get(&timer)
            .is_some_and(|&deadline| deadline <= self.now)
    }
}
