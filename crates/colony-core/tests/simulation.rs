//! Whole-simulation tests: the tick cycle, player commands, and the async
//! runner, driven over the default starting world.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use std::collections::BTreeSet;
use std::sync::Arc;

use colony_core::clock::WorldClock;
use colony_core::command::{Command, CommandError, CommandOutcome, apply_command};
use colony_core::config::SimulationConfig;
use colony_core::control::{RunControl, SimulationEndReason};
use colony_core::runner::{NoOpCallback, TickCallback, run_simulation};
use colony_core::tick::{SimulationState, TickSummary, run_tick};
use colony_core::world::ColonyWorld;
use colony_jobs::{Job, JobError, JobReport};
use colony_types::{
    Area, BlockKind, Coord, DesignationKind, ItemKind, JobId, JobKindTag, LaborKind, PlayerId,
    Terrain, WorkerId, WorkshopKind,
};
use colony_world::{StartingWorldParams, create_starting_world};

const fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y, 0)
}

fn build(config: &SimulationConfig) -> (SimulationState, PlayerId) {
    let owner = PlayerId::new();
    let start = create_starting_world(StartingWorldParams {
        width: 20,
        height: 14,
        crop_growth_ticks: config.world.crop_growth_ticks,
        owner,
    })
    .unwrap();
    let world = ColonyWorld::from_starting(start, config.workers.clone());
    let mut state = SimulationState::from_config(config, world).unwrap();
    state.add_player(owner);
    (state, owner)
}

fn spawn(
    state: &mut SimulationState,
    owner: PlayerId,
    name: &str,
    at: Coord,
    labors: &[LaborKind],
) -> WorkerId {
    state
        .world
        .roster
        .add_worker(name, owner, at, labors.iter().copied().collect::<BTreeSet<_>>())
        .unwrap()
}

/// Run ticks until a report matching `pred` shows up.
fn run_until_report(
    state: &mut SimulationState,
    max: u64,
    pred: impl Fn(&JobReport) -> bool,
) -> Option<JobReport> {
    for _ in 0..max {
        let summary = run_tick(state).unwrap();
        if let Some(report) = summary.reports.into_iter().find(|r| pred(r)) {
            return Some(report);
        }
    }
    None
}

fn state_name(state: &SimulationState, owner: PlayerId, job: JobId) -> Option<&'static str> {
    state.manager(owner)?.job(job).and_then(Job::state_name)
}

#[test]
fn designated_rock_is_mined_over_whole_ticks() {
    let (mut state, owner) = build(&SimulationConfig::default());
    spawn(&mut state, owner, "Urist", c(6, 6), &[LaborKind::Mining]);
    let rock = c(16, 6);
    assert_eq!(state.world.map.block(rock), Some(BlockKind::Rock));
    let stone_before = state.world.items.count_kind(ItemKind::Stone);

    let outcome = apply_command(
        &mut state,
        owner,
        Command::Designate {
            kind: DesignationKind::Mine,
            area: Area::cell(rock),
        },
    )
    .unwrap();
    assert_eq!(outcome, CommandOutcome::Designated { claimed: 1 });

    let report = run_until_report(&mut state, 300, |r| r.summary.kind == JobKindTag::Mine).unwrap();
    assert!(report.outcome.is_completed());
    assert_eq!(state.world.map.block(rock), Some(BlockKind::Floor));
    assert_eq!(state.world.items.count_kind(ItemKind::Stone), stone_before + 1);
    assert!(state.manager(owner).unwrap().designation(DesignationKind::Mine).unwrap().is_empty());
    assert_eq!(state.world.roster.claimed_count(), 0);
}

#[test]
fn tired_worker_is_sent_to_bed() {
    let mut config = SimulationConfig::default();
    config.workers.fatigue_threshold = 5;
    config.jobs.sleep_ticks = 10;
    let (mut state, owner) = build(&config);
    let sleeper = spawn(&mut state, owner, "Sleepy", c(5, 5), &[]);

    let mut requests = 0;
    for _ in 0..5 {
        requests += run_tick(&mut state).unwrap().sleep_requests;
    }
    assert_eq!(requests, 1);
    assert_eq!(state.pending_sleep_jobs(), 1);
    assert!(state.world.roster.get(sleeper).unwrap().sleep_pending);

    let report =
        run_until_report(&mut state, 100, |r| r.summary.kind == JobKindTag::Sleep).unwrap();
    assert!(report.outcome.is_completed());
    let worker = state.world.roster.get(sleeper).unwrap();
    assert_eq!(worker.position, c(1, 1));
    assert_eq!(worker.fatigue, 0);
    assert!(!worker.sleep_pending);
    assert_eq!(state.pending_sleep_jobs(), 0);
}

#[test]
fn cancelled_sleep_can_be_issued_again() {
    let mut config = SimulationConfig::default();
    config.workers.fatigue_threshold = 2;
    let (mut state, owner) = build(&config);
    let sleeper = spawn(&mut state, owner, "Sleepy", c(5, 5), &[]);

    run_tick(&mut state).unwrap();
    let summary = run_tick(&mut state).unwrap();
    assert_eq!(summary.sleep_requests, 1);
    let job = state
        .manager(owner)
        .unwrap()
        .jobs()
        .map(Job::summary)
        .find(|s| s.kind == JobKindTag::Sleep)
        .unwrap()
        .id;

    let outcome = apply_command(&mut state, owner, Command::CancelJob { job }).unwrap();
    assert!(matches!(outcome, CommandOutcome::JobCancelled(ref r) if !r.outcome.is_completed()));
    assert!(!state.world.roster.get(sleeper).unwrap().sleep_pending);
    assert_eq!(state.pending_sleep_jobs(), 0);

    // Still tired: the next tick asks again.
    assert_eq!(run_tick(&mut state).unwrap().sleep_requests, 1);
}

#[test]
fn commands_are_validated() {
    let (mut state, owner) = build(&SimulationConfig::default());
    let hauler = spawn(&mut state, owner, "Hauler", c(5, 5), &[LaborKind::Hauling]);

    let stranger = PlayerId::new();
    let err = apply_command(&mut state, stranger, Command::CancelJob { job: JobId::new() });
    assert!(matches!(err, Err(CommandError::UnknownPlayer(p)) if p == stranger));

    let err = apply_command(
        &mut state,
        owner,
        Command::StationSoldier {
            soldier: hauler,
            station: c(6, 6),
        },
    );
    assert!(matches!(
        err,
        Err(CommandError::MissingLabor {
            labor: LaborKind::Military,
            ..
        })
    ));

    let err = apply_command(
        &mut state,
        owner,
        Command::PickupTool {
            worker: hauler,
            tool: ItemKind::Food,
        },
    );
    assert!(matches!(err, Err(CommandError::NotATool(ItemKind::Food))));

    let err = apply_command(
        &mut state,
        owner,
        Command::PickupTool {
            worker: WorkerId::new(),
            tool: ItemKind::Axe,
        },
    );
    assert!(matches!(err, Err(CommandError::UnknownWorker(_))));

    let rival = PlayerId::new();
    state.add_player(rival);
    let err = apply_command(
        &mut state,
        rival,
        Command::PickupTool {
            worker: hauler,
            tool: ItemKind::Axe,
        },
    );
    assert!(matches!(err, Err(CommandError::NotYourWorker { .. })));

    let err = apply_command(&mut state, owner, Command::CancelJob { job: JobId::new() });
    assert!(matches!(
        err,
        Err(CommandError::Job {
            source: JobError::JobNotFound(_)
        })
    ));
}

#[test]
fn craft_command_uses_the_starting_workshop() {
    let (mut state, owner) = build(&SimulationConfig::default());
    spawn(
        &mut state,
        owner,
        "Carver",
        c(5, 5),
        &[LaborKind::Hauling, LaborKind::Carpentry],
    );
    let workshop = state
        .world
        .workshops
        .iter()
        .find(|w| w.kind == WorkshopKind::Carpenter)
        .unwrap()
        .id;
    let planks = state.world.items.count_kind(ItemKind::Plank);

    let outcome = apply_command(
        &mut state,
        owner,
        Command::Craft {
            workshop,
            output: ItemKind::Plank,
        },
    )
    .unwrap();
    assert!(matches!(outcome, CommandOutcome::JobAdded(_)));

    let report =
        run_until_report(&mut state, 600, |r| r.summary.kind == JobKindTag::Craft).unwrap();
    assert!(report.outcome.is_completed());
    assert!(state.world.items.count_kind(ItemKind::Plank) > planks);
}

#[test]
fn stationed_soldier_fights_a_spawned_hostile() {
    let mut config = SimulationConfig::default();
    config.jobs.attack_ticks = 3;
    let (mut state, owner) = build(&config);
    let soldier = spawn(&mut state, owner, "Guard", c(5, 6), &[LaborKind::Military]);

    let CommandOutcome::JobAdded(job) = apply_command(
        &mut state,
        owner,
        Command::StationSoldier {
            soldier,
            station: c(6, 6),
        },
    )
    .unwrap() else {
        panic!("expected a job");
    };
    for _ in 0..20 {
        run_tick(&mut state).unwrap();
    }
    assert_eq!(state_name(&state, owner, job), Some("Guard"));

    let hostile = state.world.map.spawn_hostile(c(10, 6)).unwrap();
    let summary = run_tick(&mut state).unwrap();
    assert_eq!(summary.threats, 1);

    let mut gone = false;
    for _ in 0..100 {
        run_tick(&mut state).unwrap();
        if state.world.map.hostile_position(hostile).is_none() {
            gone = true;
            break;
        }
    }
    assert!(gone);
    assert_eq!(state.world.roster.skill(soldier, LaborKind::Military), 1);
}

#[test]
fn undesignating_mid_work_restores_the_world() {
    let (mut state, owner) = build(&SimulationConfig::default());
    spawn(&mut state, owner, "Urist", c(14, 6), &[LaborKind::Mining]);
    let rock = c(16, 6);
    apply_command(
        &mut state,
        owner,
        Command::Designate {
            kind: DesignationKind::Mine,
            area: Area::cell(rock),
        },
    )
    .unwrap();
    for _ in 0..10 {
        run_tick(&mut state).unwrap();
    }
    assert_eq!(state.world.roster.claimed_count(), 1);

    let CommandOutcome::Undesignated { reports } = apply_command(
        &mut state,
        owner,
        Command::Undesignate {
            kind: DesignationKind::Mine,
            area: Area::cell(rock),
        },
    )
    .unwrap() else {
        panic!("expected undesignation");
    };
    assert_eq!(reports.len(), 1);
    assert!(!reports[0].outcome.is_completed());
    assert_eq!(state.world.roster.claimed_count(), 0);
    assert_eq!(state.world.map.block(rock), Some(BlockKind::Rock));
    assert!(state.world.timers.is_empty());
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

struct Counter {
    ticks: Vec<u64>,
}

impl TickCallback for Counter {
    fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) {
        self.ticks.push(summary.tick);
    }
}

#[tokio::test]
async fn runner_stops_at_the_tick_limit() {
    let (mut state, _owner) = build(&SimulationConfig::default());
    let control = Arc::new(RunControl::new(5, 0));
    let mut counter = Counter { ticks: Vec::new() };

    let result = run_simulation(&mut state, &control, &mut counter)
        .await
        .unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
    assert_eq!(result.total_ticks, 5);
    assert_eq!(counter.ticks, vec![1, 2, 3, 4, 5]);
    assert_eq!(result.final_summary.unwrap().tick, 5);
    assert_eq!(state.clock.tick(), 5);
}

#[tokio::test]
async fn runner_honours_a_stop_request() {
    let (mut state, _owner) = build(&SimulationConfig::default());
    let control = Arc::new(RunControl::new(0, 0));
    control.request_stop();

    let result = run_simulation(&mut state, &control, &mut NoOpCallback)
        .await
        .unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::Stopped);
    assert_eq!(result.total_ticks, 0);
    assert!(result.final_summary.is_none());
}

#[tokio::test]
async fn runner_stops_from_another_task() {
    let (mut state, _owner) = build(&SimulationConfig::default());
    let control = Arc::new(RunControl::new(0, 1));
    let stopper = {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
            control.request_stop();
        })
    };

    let result = run_simulation(&mut state, &control, &mut NoOpCallback)
        .await
        .unwrap();
    stopper.await.unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::Stopped);
    assert!(result.total_ticks > 0);
}

#[tokio::test]
async fn runner_applies_queued_commands() {
    let (mut state, owner) = build(&SimulationConfig::default());
    let control = Arc::new(RunControl::new(1, 0));
    control
        .queue_command(
            owner,
            Command::Designate {
                kind: DesignationKind::Mine,
                area: Area::new(c(16, 2), c(16, 4)),
            },
        )
        .await;
    // Rejected commands are logged and skipped.
    control
        .queue_command(PlayerId::new(), Command::CancelJob { job: JobId::new() })
        .await;

    let result = run_simulation(&mut state, &control, &mut NoOpCallback)
        .await
        .unwrap();

    assert_eq!(result.total_ticks, 1);
    let mine = state
        .manager(owner)
        .unwrap()
        .designation(DesignationKind::Mine)
        .unwrap();
    assert_eq!(mine.len(), 3);
}

#[test]
fn state_from_config_uses_the_configured_clock() {
    let mut config = SimulationConfig::default();
    config.time.ticks_per_hour = 10;
    config.simulation.revalidate_interval_ticks = 7;
    let (state, _owner) = build(&config);
    assert_eq!(state.clock, WorldClock::from_parts(0, 10, 24).unwrap());
    assert_eq!(state.revalidate_interval_ticks, 7);
}
