//! Standing guard at a station.
//!
//! The guard never finishes on its own. Two external events drive it: the
//! ration timer, which feeds the soldier and re-arms itself, and a
//! [`JobSignal::ThreatSpotted`] close enough to the station, which finishes
//! the state so the owning job can send the soldier to fight.

use colony_types::{Coord, HostileId, ItemCategory, ItemQuery, PlayerId, TimerId, WorkerId};
use tracing::{debug, warn};

use super::{JobSignal, Step};
use crate::context::JobContext;

/// Guard `station` with `soldier` until a threat comes within `radius`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    owner: PlayerId,
    soldier: WorkerId,
    station: Coord,
    radius: u32,
    ration_interval: u64,
    ration_timer: Option<TimerId>,
    rations_eaten: u32,
    threat: Option<(HostileId, Coord)>,
}

impl Guard {
    /// Guard using the radius and ration interval from the job config.
    pub const fn new(
        owner: PlayerId,
        soldier: WorkerId,
        station: Coord,
        radius: u32,
        ration_interval: u64,
    ) -> Self {
        Self {
            owner,
            soldier,
            station,
            radius,
            ration_interval,
            ration_timer: None,
            rations_eaten: 0,
            threat: None,
        }
    }

    /// The guarding soldier.
    pub const fn soldier(&self) -> WorkerId {
        self.soldier
    }

    /// The guarded cell.
    pub const fn station(&self) -> Coord {
        self.station
    }

    /// The hostile that ended the watch, and where it was seen.
    pub const fn threat(&self) -> Option<(HostileId, Coord)> {
        self.threat
    }

    /// Number of rations consumed so far.
    pub const fn rations_eaten(&self) -> u32 {
        self.rations_eaten
    }

    pub(crate) fn start(&mut self, ctx: &mut JobContext<'_>) -> Step {
        self.ration_timer = Some(ctx.timers.add_timer(self.ration_interval));
        self.poll(ctx)
    }

    pub(crate) fn poll(&mut self, ctx: &mut JobContext<'_>) -> Step {
        if !ctx.workers.exists(self.soldier) {
            return Step::Abort(format!("soldier {} is gone", self.soldier));
        }
        if let Some(timer) = self.ration_timer {
            if ctx.timers.has_fired(timer) {
                ctx.timers.remove_timer(timer);
                self.eat(ctx);
                self.ration_timer = Some(ctx.timers.add_timer(self.ration_interval));
            }
        }
        Step::Pending
    }

    fn eat(&mut self, ctx: &mut JobContext<'_>) {
        let query = ItemQuery::category(ItemCategory::Food);
        let near = ctx.workers.position(self.soldier).or(Some(self.station));
        let Some(food) = ctx.items.find_unclaimed(&query, near) else {
            warn!(soldier = %self.soldier, owner = %self.owner, "no rations left for guard");
            return;
        };
        if !ctx.items.claim(food) {
            return;
        }
        match ctx.items.consume(food) {
            Ok(()) => {
                self.rations_eaten = self.rations_eaten.saturating_add(1);
                debug!(soldier = %self.soldier, item = %food, "guard ate a ration");
            }
            Err(err) => {
                ctx.items.release(food);
                warn!(soldier = %self.soldier, error = %err, "ration could not be eaten");
            }
        }
    }

    pub(crate) fn signal(&mut self, _ctx: &mut JobContext<'_>, signal: &JobSignal) -> Step {
        match signal {
            JobSignal::ThreatSpotted { hostile, position } => {
                if position.manhattan(self.station) > self.radius {
                    return Step::Pending;
                }
                debug!(
                    soldier = %self.soldier,
                    hostile = %hostile,
                    position = %position,
                    "threat spotted near station"
                );
                self.threat = Some((*hostile, *position));
                Step::Finished
            }
        }
    }

    pub(crate) fn finish(&mut self, ctx: &mut JobContext<'_>) {
        if let Some(timer) = self.ration_timer.take() {
            ctx.timers.remove_timer(timer);
        }
    }

    pub(crate) fn interrupt(&mut self, ctx: &mut JobContext<'_>) {
        self.finish(ctx);
    }

    pub(crate) fn status(&self) -> String {
        format!("Guarding {}", self.station)
    }
}
