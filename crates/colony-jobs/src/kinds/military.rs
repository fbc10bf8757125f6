//! Stationing a soldier.
//!
//! The job has no terminal state. The soldier walks to the station and
//! guards it; a threat close enough sends it off to fight, after which it
//! walks back and resumes guarding. Only an interrupt ends the job.

use colony_types::{Coord, HostileId, JobKindTag, LaborKind, PlayerId, WorkerId};
use tracing::{debug, info};

use super::{Transition, train, unexpected};
use crate::context::JobContext;
use crate::state::{Guard, JobState, WaitDuration, WaitForWorker, WalkToPosition};

/// Which walk the soldier is on, and what it is fighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Reporting,
    ToStation,
    OnWatch,
    Engaging(HostileId),
    Fighting(HostileId),
}

/// WaitForWorker -> Walk to station -> Guard -> (Walk to hostile -> Fight -> Walk back -> Guard)...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilitaryStationJob {
    owner: PlayerId,
    soldier: WorkerId,
    station: Coord,
    held: bool,
    leg: Leg,
    victories: u32,
}

impl MilitaryStationJob {
    /// Station `soldier` at `station`.
    pub const fn new(owner: PlayerId, soldier: WorkerId, station: Coord) -> Self {
        Self {
            owner,
            soldier,
            station,
            held: false,
            leg: Leg::Reporting,
            victories: 0,
        }
    }

    pub(crate) const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The guarded cell.
    pub const fn station(&self) -> Coord {
        self.station
    }

    /// The soldier, once the job holds it.
    pub const fn held_soldier(&self) -> Option<WorkerId> {
        if self.held { Some(self.soldier) } else { None }
    }

    /// Hostiles defeated so far.
    pub const fn victories(&self) -> u32 {
        self.victories
    }

    pub(crate) fn first_state(&self) -> JobState {
        WaitForWorker::new(self.soldier).into()
    }

    fn return_to_station(&mut self) -> Transition {
        self.leg = Leg::ToStation;
        Transition::Next(WalkToPosition::new(self.soldier, self.station, false).into())
    }

    fn guard(&mut self, ctx: &JobContext<'_>) -> Transition {
        self.leg = Leg::OnWatch;
        Transition::Next(
            Guard::new(
                self.owner,
                self.soldier,
                self.station,
                ctx.config.guard_radius,
                ctx.config.ration_interval,
            )
            .into(),
        )
    }

    pub(crate) fn on_state_done(&mut self, ctx: &mut JobContext<'_>, finished: JobState) -> Transition {
        match (self.leg, finished) {
            (Leg::Reporting, JobState::WaitForWorker(_)) => {
                self.held = true;
                self.return_to_station()
            }
            (Leg::ToStation, JobState::WalkToPosition(_)) => self.guard(ctx),
            (Leg::OnWatch, JobState::Guard(guard)) => {
                let Some((hostile, seen_at)) = guard.threat() else {
                    return self.guard(ctx);
                };
                let Some(position) = ctx.terrain.hostile_position(hostile) else {
                    debug!(soldier = %self.soldier, hostile = %hostile, "threat already gone");
                    return self.guard(ctx);
                };
                debug!(soldier = %self.soldier, hostile = %hostile, seen_at = %seen_at, "engaging");
                self.leg = Leg::Engaging(hostile);
                Transition::Next(WalkToPosition::new(self.soldier, position, true).into())
            }
            (Leg::Engaging(hostile), JobState::WalkToPosition(_)) => {
                self.leg = Leg::Fighting(hostile);
                Transition::Next(
                    WaitDuration::new(self.soldier, ctx.config.attack_ticks, "Fighting").into(),
                )
            }
            (Leg::Fighting(hostile), JobState::WaitDuration(_)) => {
                if ctx.terrain.defeat_hostile(hostile) {
                    self.victories = self.victories.saturating_add(1);
                    train(ctx, self.soldier, LaborKind::Military);
                    info!(soldier = %self.soldier, hostile = %hostile, "hostile defeated");
                }
                self.return_to_station()
            }
            (_, other) => unexpected(JobKindTag::MilitaryStation, &other),
        }
    }

    pub(crate) fn on_interrupt(&mut self, ctx: &mut JobContext<'_>) {
        if self.held {
            self.held = false;
            ctx.workers.release(self.soldier);
        }
    }
}
