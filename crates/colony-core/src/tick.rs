//! Tick cycle: the six phases that drive the Colony simulation.
//!
//! Each tick runs through these phases, in order:
//!
//! 1. **Clock** -- advance the clock, fire due timers, let crops grow.
//! 2. **Needs** -- accumulate fatigue; a worker that crosses the threshold
//!    gets a `Sleep` job from its player's manager.
//! 3. **Movement** -- step every walking worker along its path.
//! 4. **Threats** -- broadcast every hostile on the map to every manager as
//!    a `ThreatSpotted` signal.
//! 5. **Jobs** -- tick every player's job manager.
//! 6. **Upkeep** -- periodically re-check designated cells, and retire
//!    finished sleep jobs.
//!
//! The cycle is deterministic: managers are visited in player order and
//! every collaborator iterates in ID order.

use std::collections::BTreeMap;

use colony_jobs::{JobConfig, JobKind, JobManager, JobReport, JobSignal, SleepJob};
use colony_types::{Coord, HostileId, JobId, JobKindTag, PlayerId, WorkerId};
use tracing::{debug, info, warn};

use crate::clock::{ClockError, WorldClock};
use crate::config::SimulationConfig;
use crate::world::ColonyWorld;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Day number during this tick.
    pub day: u64,
    /// Hour of day during this tick.
    pub hour: u64,
    /// Workers that changed cell.
    pub workers_moved: usize,
    /// Sleep jobs issued this tick.
    pub sleep_requests: usize,
    /// Hostiles broadcast this tick.
    pub threats: usize,
    /// Whether designated cells were re-checked this tick.
    pub revalidated: bool,
    /// Live entries across every manager at the end of the tick.
    pub live_jobs: usize,
    /// Reports of every job that ended this tick.
    pub reports: Vec<JobReport>,
}

impl TickSummary {
    /// Jobs that completed this tick.
    pub fn completed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.is_completed())
            .count()
    }

    /// Jobs that were interrupted this tick.
    pub fn interrupted(&self) -> usize {
        self.reports.len().saturating_sub(self.completed())
    }
}

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug)]
pub struct SimulationState {
    /// The world clock.
    pub clock: WorldClock,
    /// Every collaborator.
    pub world: ColonyWorld,
    /// Job durations and tunables.
    pub job_config: JobConfig,
    /// One job manager per player.
    pub managers: BTreeMap<PlayerId, JobManager>,
    /// Re-check designated cells every N ticks (0 = never).
    pub revalidate_interval_ticks: u64,
    /// Log a tick summary at info level every N ticks (0 = never).
    pub summary_interval_ticks: u64,
    /// Sleep jobs issued by the needs phase, and whom they are for.
    sleep_jobs: BTreeMap<JobId, WorkerId>,
}

impl SimulationState {
    /// State with no players, revalidation, or summaries.
    pub const fn new(clock: WorldClock, world: ColonyWorld, job_config: JobConfig) -> Self {
        Self {
            clock,
            world,
            job_config,
            managers: BTreeMap::new(),
            revalidate_interval_ticks: 0,
            summary_interval_ticks: 0,
            sleep_jobs: BTreeMap::new(),
        }
    }

    /// State with the clock, job tunables, and intervals from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError`] if the time configuration is invalid.
    pub fn from_config(config: &SimulationConfig, world: ColonyWorld) -> Result<Self, ClockError> {
        let clock = WorldClock::new(&config.time)?;
        let mut state = Self::new(clock, world, config.jobs.clone());
        state.revalidate_interval_ticks = config.simulation.revalidate_interval_ticks;
        state.summary_interval_ticks = config.logging.summary_interval_ticks;
        Ok(state)
    }

    /// Give `owner` a job manager. Returns `false` if it already has one.
    pub fn add_player(&mut self, owner: PlayerId) -> bool {
        if self.managers.contains_key(&owner) {
            return false;
        }
        self.managers.insert(owner, JobManager::new(owner));
        info!(player = %owner, "player joined");
        true
    }

    /// The job manager of `owner`.
    pub fn manager(&self, owner: PlayerId) -> Option<&JobManager> {
        self.managers.get(&owner)
    }

    /// Sleep jobs issued by the needs phase that have not ended yet.
    pub fn pending_sleep_jobs(&self) -> usize {
        self.sleep_jobs.len()
    }

    /// Live entries (designations, their cell jobs, standalone jobs).
    pub fn live_jobs(&self) -> usize {
        self.managers
            .values()
            .map(|m| {
                let cells: usize = m.designations().map(colony_jobs::Designation::len).sum();
                m.len().saturating_add(cells)
            })
            .sum()
    }

    /// Forget ended sleep jobs; an interrupted one frees its worker to be
    /// sent to bed again.
    pub fn settle_reports(&mut self, reports: &[JobReport]) {
        for report in reports {
            if report.summary.kind != JobKindTag::Sleep {
                continue;
            }
            let Some(worker) = self.sleep_jobs.remove(&report.summary.id) else {
                continue;
            };
            if !report.outcome.is_completed() {
                self.world.roster.clear_sleep_request(worker);
                debug!(worker = %worker, job = %report.summary.id, "sleep request dropped");
            }
        }
    }
}

/// Execute one complete tick of the simulation.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter overflows.
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    // --- Phase 1: Clock ---
    let tick = state.clock.advance()?;
    state.world.set_tick(tick);

    // --- Phase 2: Needs ---
    let sleep_requests = phase_needs(state, tick);

    // --- Phase 3: Movement ---
    let workers_moved = state.world.roster.advance_movement(&state.world.map);

    // --- Phase 4: Threats ---
    let mut reports = Vec::new();
    let threats = phase_threats(state, tick, &mut reports);

    // --- Phase 5: Jobs ---
    for manager in state.managers.values_mut() {
        let mut ctx = state.world.context(tick, &state.job_config);
        reports.extend(manager.on_tick(&mut ctx));
    }

    // --- Phase 6: Upkeep ---
    let revalidated = state.revalidate_interval_ticks > 0
        && tick.checked_rem(state.revalidate_interval_ticks) == Some(0);
    if revalidated {
        for manager in state.managers.values_mut() {
            let mut ctx = state.world.context(tick, &state.job_config);
            reports.extend(manager.revalidate(&mut ctx));
        }
    }
    state.settle_reports(&reports);

    let summary = TickSummary {
        tick,
        day: state.clock.day(),
        hour: state.clock.hour_of_day(),
        workers_moved,
        sleep_requests,
        threats,
        revalidated,
        live_jobs: state.live_jobs(),
        reports,
    };
    log_summary(state, &summary);
    Ok(summary)
}

/// Phase 2: fatigue, and a sleep job for every worker that just got tired.
fn phase_needs(state: &mut SimulationState, tick: u64) -> usize {
    let tired = state.world.roster.accumulate_fatigue();
    let mut issued: usize = 0;
    for worker in tired {
        let Some(owner) = state.world.roster.get(worker).map(|w| w.owner) else {
            continue;
        };
        let Some(manager) = state.managers.get_mut(&owner) else {
            warn!(worker = %worker, player = %owner, "tired worker has no job manager");
            state.world.roster.clear_sleep_request(worker);
            continue;
        };
        let mut ctx = state.world.context(tick, &state.job_config);
        let job = manager.add_job(&mut ctx, JobKind::Sleep(SleepJob::new(owner, worker)));
        state.sleep_jobs.insert(job, worker);
        debug!(tick, worker = %worker, job = %job, "worker is tired");
        issued = issued.saturating_add(1);
    }
    issued
}

/// Phase 4: tell every manager about every hostile.
fn phase_threats(state: &mut SimulationState, tick: u64, reports: &mut Vec<JobReport>) -> usize {
    let hostiles: Vec<(HostileId, Coord)> = state.world.map.hostiles().collect();
    for &(hostile, position) in &hostiles {
        let signal = JobSignal::ThreatSpotted { hostile, position };
        for manager in state.managers.values_mut() {
            let mut ctx = state.world.context(tick, &state.job_config);
            reports.extend(manager.broadcast(&mut ctx, &signal));
        }
    }
    hostiles.len()
}

fn log_summary(state: &SimulationState, summary: &TickSummary) {
    let milestone = state.summary_interval_ticks > 0
        && summary.tick.checked_rem(state.summary_interval_ticks) == Some(0);
    if milestone {
        info!(
            tick = summary.tick,
            day = summary.day,
            hour = summary.hour,
            completed = summary.completed(),
            interrupted = summary.interrupted(),
            live_jobs = summary.live_jobs,
            "tick summary"
        );
    } else {
        debug!(
            tick = summary.tick,
            moved = summary.workers_moved,
            ended = summary.reports.len(),
            "tick complete"
        );
    }
}
