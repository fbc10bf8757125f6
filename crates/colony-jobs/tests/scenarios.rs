//! End-to-end job scenarios against the reference collaborators.
//!
//! Each test builds a small grass map, a roster, an item store and a timer
//! queue, then drives a [`JobManager`] tick by tick the same way the
//! simulation loop does: advance time, step movement, tick jobs.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use colony_agents::{WorkerConfig, WorkerRoster};
use colony_jobs::{
    BuildJob, CraftJob, Job, JobConfig, JobContext, JobError, JobKind, JobManager,
    JobManagerListener, JobOutcome, JobReport, JobSignal, MilitaryStationJob, MineJob,
    PickupToolJob, PlaceItemJob, SleepJob, TimerQueue,
};
use colony_types::{
    Area, BlockKind, ConstructionKind, Coord, CropStatus, DesignationKind, ItemId, ItemKind,
    JobId, JobKindTag, JobSummary, LaborKind, PlayerId, Stockpile, Terrain, WorkerId, Workforce,
    WorkshopKind, Workshops,
};
use colony_world::{BASE_HARVEST_YIELD, CropRegistry, ItemStore, TileMap, WorkshopRegistry};

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

const fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y, 0)
}

struct World {
    owner: PlayerId,
    map: TileMap,
    items: ItemStore,
    workshops: WorkshopRegistry,
    roster: WorkerRoster,
    timers: TimerQueue,
    config: JobConfig,
    tick: u64,
}

impl World {
    fn new() -> Self {
        Self {
            owner: PlayerId::new(),
            map: TileMap::new(16, 10, 1, BlockKind::Grass).unwrap(),
            items: ItemStore::new(),
            workshops: WorkshopRegistry::new(),
            roster: WorkerRoster::new(WorkerConfig::default()),
            timers: TimerQueue::new(),
            config: JobConfig::default(),
            tick: 0,
        }
    }

    fn ctx(&mut self) -> JobContext<'_> {
        JobContext {
            tick: self.tick,
            workers: &mut self.roster,
            items: &mut self.items,
            terrain: &mut self.map,
            workshops: &mut self.workshops,
            timers: &mut self.timers,
            config: &self.config,
        }
    }

    fn worker(&mut self, name: &str, position: Coord, labors: &[LaborKind]) -> WorkerId {
        let labors: BTreeSet<LaborKind> = labors.iter().copied().collect();
        self.roster
            .add_worker(name, self.owner, position, labors)
            .unwrap()
    }

    fn item(&mut self, kind: ItemKind, position: Coord) -> ItemId {
        self.items.create_item(kind, position, self.owner)
    }

    fn advance(&mut self) {
        self.tick += 1;
        self.timers.advance_to(self.tick);
        self.map.set_tick(self.tick);
        self.roster.advance_movement(&self.map);
    }

    fn step(&mut self, manager: &mut JobManager) -> Vec<JobReport> {
        self.advance();
        let mut ctx = self.ctx();
        manager.on_tick(&mut ctx)
    }

    fn run(&mut self, manager: &mut JobManager, ticks: u64) -> Vec<JobReport> {
        let mut reports = Vec::new();
        for _ in 0..ticks {
            reports.extend(self.step(manager));
        }
        reports
    }

    /// Step until a report arrives, up to `limit` ticks.
    fn run_to_report(&mut self, manager: &mut JobManager, limit: u64) -> Vec<JobReport> {
        for _ in 0..limit {
            let reports = self.step(manager);
            if !reports.is_empty() {
                return reports;
            }
        }
        Vec::new()
    }

    /// Step until `pred` holds, up to `limit` ticks.
    fn run_until(
        &mut self,
        manager: &mut JobManager,
        limit: u64,
        pred: impl Fn(&JobManager) -> bool,
    ) -> bool {
        for _ in 0..limit {
            if pred(manager) {
                return true;
            }
            self.step(manager);
        }
        pred(manager)
    }

    fn add(&mut self, manager: &mut JobManager, kind: JobKind) -> JobId {
        let mut ctx = self.ctx();
        manager.add_job(&mut ctx, kind)
    }

    fn designate(&mut self, manager: &mut JobManager, kind: DesignationKind, area: Area) -> usize {
        let mut ctx = self.ctx();
        manager.designate(&mut ctx, kind, area).unwrap()
    }
}

fn state_of(manager: &JobManager, id: JobId) -> Option<&'static str> {
    manager.job(id).and_then(Job::state_name)
}

fn mine_job(manager: &JobManager, cell: Coord) -> Option<&Job> {
    manager
        .designation(DesignationKind::Mine)
        .and_then(|d| d.job_at(cell))
}

// ---------------------------------------------------------------------------
// Scenario A: a mine designation runs to completion
// ---------------------------------------------------------------------------

#[test]
fn mine_designation_runs_to_completion() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let rock = c(8, 3);
    world.map.set_block(rock, BlockKind::Rock).unwrap();
    let miner = world.worker("Urist", c(2, 3), &[LaborKind::Mining]);

    assert_eq!(
        world.designate(&mut manager, DesignationKind::Mine, Area::cell(rock)),
        1
    );
    let job = mine_job(&manager, rock).unwrap();
    assert_eq!(job.state_name(), Some("WalkToPosition"));
    assert!(!world.roster.is_idle(miner));

    let mut seen_wait = false;
    let mut reports = Vec::new();
    for _ in 0..300 {
        reports = world.step(&mut manager);
        if !reports.is_empty() {
            break;
        }
        if mine_job(&manager, rock).and_then(Job::state_name) == Some("WaitDuration") {
            seen_wait = true;
        }
    }
    assert!(seen_wait);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(reports[0].summary.kind, JobKindTag::Mine);

    assert_eq!(world.map.block(rock), Some(BlockKind::Floor));
    let left = world.items.items_at(rock);
    assert_eq!(left.len(), 1);
    assert_eq!(world.items.kind(left[0]), Some(ItemKind::Stone));
    assert_eq!(world.roster.skill(miner, LaborKind::Mining), 1);
    assert!(world.roster.is_idle(miner));
    assert!(!world.roster.get(miner).unwrap().occupied);
    assert!(manager.designation(DesignationKind::Mine).unwrap().is_empty());
}

#[test]
fn channel_leaves_open_space() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let cell = c(6, 6);
    world.worker("Digger", c(2, 6), &[LaborKind::Mining]);

    world.designate(&mut manager, DesignationKind::Channel, Area::cell(cell));
    let reports = world.run_to_report(&mut manager, 300);
    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(reports[0].summary.kind, JobKindTag::Channel);
    assert_eq!(world.map.block(cell), Some(BlockKind::Open));
    // Grass yields nothing.
    assert!(world.items.is_empty());
}

// ---------------------------------------------------------------------------
// Scenario B: no builder available
// ---------------------------------------------------------------------------

#[test]
fn build_without_builders_waits_in_search() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let site = c(5, 5);
    let stone = world.item(ItemKind::Stone, site);
    world.worker("Hauler", c(1, 1), &[LaborKind::Hauling]);

    let id = world.add(
        &mut manager,
        JobKind::Build(BuildJob::new(world.owner, site, ConstructionKind::Wall)),
    );
    let reports = world.run(&mut manager, 100);

    assert!(reports.is_empty());
    assert_eq!(state_of(&manager, id), Some("SearchForWorker"));
    let status = manager.job(id).unwrap().status();
    assert!(status.starts_with("Waiting for a worker with"), "{status}");
    assert_eq!(world.map.block(site), Some(BlockKind::Grass));
    assert!(world.items.exists(stone));
    assert!(world.items.is_claimed(stone));
    assert_eq!(manager.jobs().count(), 1);
}

// ---------------------------------------------------------------------------
// Scenario C: interrupt mid-walk
// ---------------------------------------------------------------------------

#[test]
fn interrupting_build_mid_walk_releases_worker_and_materials() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let site = c(12, 5);
    let stone = world.item(ItemKind::Stone, site);
    let builder = world.worker("Builder", c(1, 5), &[LaborKind::Building]);

    let id = world.add(
        &mut manager,
        JobKind::Build(BuildJob::new(world.owner, site, ConstructionKind::Wall)),
    );
    assert_eq!(state_of(&manager, id), Some("WalkToPosition"));
    world.run(&mut manager, 3);
    assert_eq!(state_of(&manager, id), Some("WalkToPosition"));
    assert!(world.items.is_claimed(stone));

    let report = {
        let mut ctx = world.ctx();
        manager.interrupt_job(&mut ctx, id, "cancelled by player").unwrap()
    };
    assert_eq!(
        report.outcome,
        JobOutcome::Interrupted {
            reason: "cancelled by player".to_owned()
        }
    );
    assert!(world.roster.is_idle(builder));
    assert!(!world.items.is_claimed(stone));
    assert!(manager.job(id).is_none());
    assert_eq!(world.map.block(site), Some(BlockKind::Grass));
}

// ---------------------------------------------------------------------------
// Scenario D: a missing input blocks a craft
// ---------------------------------------------------------------------------

#[test]
fn craft_with_missing_input_never_leaves_haul() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let forge = world.workshops.add(WorkshopKind::Forge, c(10, 2));
    world.item(ItemKind::Log, c(3, 3));
    world.worker("Smith", c(2, 2), &[LaborKind::Hauling, LaborKind::Smithing]);

    let owner = world.owner;
    let kind = {
        let mut ctx = world.ctx();
        CraftJob::new(&mut ctx, owner, forge, ItemKind::MetalBar).unwrap()
    };
    let id = world.add(&mut manager, JobKind::Craft(kind));
    let reports = world.run(&mut manager, 200);

    assert!(reports.is_empty());
    assert_eq!(state_of(&manager, id), Some("HaulResourceSet"));
    assert_eq!(world.items.count_kind(ItemKind::MetalBar), 0);
    assert!(world.workshops.is_claimed(forge));
}

// ---------------------------------------------------------------------------
// Scenario E: shrink during the terminal wait
// ---------------------------------------------------------------------------

#[test]
fn shrinking_during_terminal_wait_skips_side_effects() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let rock = c(6, 4);
    world.map.set_block(rock, BlockKind::Rock).unwrap();
    let miner = world.worker("Urist", c(2, 4), &[LaborKind::Mining]);

    world.designate(&mut manager, DesignationKind::Mine, Area::cell(rock));
    assert!(world.run_until(&mut manager, 100, |m| {
        mine_job(m, rock).and_then(Job::state_name) == Some("WaitDuration")
    }));
    assert!(world.roster.get(miner).unwrap().occupied);

    let reports = {
        let mut ctx = world.ctx();
        manager
            .undesignate(&mut ctx, DesignationKind::Mine, Area::cell(rock))
            .unwrap()
    };
    assert_eq!(reports.len(), 1);
    assert_eq!(
        reports[0].outcome,
        JobOutcome::Interrupted {
            reason: "designation removed".to_owned()
        }
    );

    let later = world.run(&mut manager, 120);
    assert!(later.is_empty());
    assert_eq!(world.map.block(rock), Some(BlockKind::Rock));
    assert!(world.items.is_empty());
    assert!(world.roster.is_idle(miner));
    assert!(!world.roster.get(miner).unwrap().occupied);
    assert_eq!(world.roster.skill(miner, LaborKind::Mining), 0);
    assert!(manager.designation(DesignationKind::Mine).unwrap().is_empty());
    assert!(world.timers.is_empty());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn stale_state_token_is_rejected() {
    let mut world = World::new();
    let rock = c(7, 2);
    world.map.set_block(rock, BlockKind::Rock).unwrap();
    world.worker("Urist", c(1, 2), &[LaborKind::Mining]);

    let mut job = Job::new(JobKind::Mine(MineJob::dig(world.owner, rock)));
    let first = job.current_token();
    {
        let mut ctx = world.ctx();
        assert!(job.start(&mut ctx).is_none());
    }
    assert_eq!(job.state_name(), Some("WalkToPosition"));
    let walking = job.current_token();
    assert_ne!(first, walking);

    let mut ctx = world.ctx();
    assert_eq!(
        job.state_done(&mut ctx, first),
        Err(JobError::StaleState {
            job: job.id(),
            token: first
        })
    );
    // The current token is accepted and moves the job on.
    assert_eq!(job.state_done(&mut ctx, walking), Ok(None));
    assert_eq!(job.state_name(), Some("WaitDuration"));
}

#[test]
fn workers_are_claimed_by_one_job_at_a_time() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    world.map.fill(c(10, 1), c(10, 8), BlockKind::Rock);
    world.worker("A", c(2, 2), &[LaborKind::Mining]);
    world.worker("B", c(2, 6), &[LaborKind::Mining]);

    let claimed = world.designate(
        &mut manager,
        DesignationKind::Mine,
        Area::new(c(10, 1), c(10, 8)),
    );
    assert_eq!(claimed, 8);

    let mut completed = 0;
    for _ in 0..1500 {
        completed += world.step(&mut manager).len();
        let designation = manager.designation(DesignationKind::Mine).unwrap();
        let holders: Vec<WorkerId> = designation
            .jobs()
            .filter_map(|j| j.kind().worker())
            .collect();
        let unique: BTreeSet<WorkerId> = holders.iter().copied().collect();
        assert_eq!(holders.len(), unique.len());
        assert_eq!(world.roster.claimed_count(), unique.len());
        assert!(unique.len() <= 2);
    }
    assert_eq!(completed, 8);
}

#[test]
fn designation_cells_match_live_jobs() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    world.map.set_block(c(3, 3), BlockKind::Rock).unwrap();
    world.map.set_block(c(4, 3), BlockKind::Ore).unwrap();
    world.map.set_block(c(5, 3), BlockKind::Tree).unwrap();

    let area = Area::new(c(2, 3), c(6, 3));
    assert_eq!(world.designate(&mut manager, DesignationKind::Mine, area), 2);
    // Growing again claims nothing new.
    assert_eq!(world.designate(&mut manager, DesignationKind::Mine, area), 0);

    let designation = manager.designation(DesignationKind::Mine).unwrap();
    let cells: Vec<Coord> = designation.claimed_cells().collect();
    assert_eq!(cells, vec![c(3, 3), c(4, 3)]);
    let mut ids = BTreeSet::new();
    for cell in cells {
        let job = designation.job_at(cell).unwrap();
        assert_eq!(job.kind().position(), Some(cell));
        assert!(!job.is_finished());
        assert!(ids.insert(job.id()));
    }
    assert_eq!(designation.jobs().count(), 2);
}

#[test]
fn interrupting_a_craft_releases_workshop_and_hauled_items() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let bench = world.workshops.add(WorkshopKind::Carpenter, c(12, 2));
    let log = world.item(ItemKind::Log, c(6, 6));
    let hauler = world.worker("Hauler", c(1, 1), &[LaborKind::Hauling]);

    let owner = world.owner;
    let kind = {
        let mut ctx = world.ctx();
        CraftJob::new(&mut ctx, owner, bench, ItemKind::Plank).unwrap()
    };
    let id = world.add(&mut manager, JobKind::Craft(kind));
    world.run(&mut manager, 4);
    assert!(world.items.is_claimed(log));
    assert!(!world.roster.is_idle(hauler));
    assert!(world.workshops.is_claimed(bench));

    {
        let mut ctx = world.ctx();
        manager.interrupt_job(&mut ctx, id, "no longer needed").unwrap();
    }
    assert!(!world.items.is_claimed(log));
    assert!(world.roster.is_idle(hauler));
    assert!(!world.workshops.is_claimed(bench));
    assert_eq!(world.items.claimed_count(), 0);
}

#[test]
fn interrupting_a_finished_job_is_rejected() {
    let mut world = World::new();
    let miner = world.worker("Urist", c(1, 1), &[LaborKind::Mining]);
    let mut job = Job::new(JobKind::Mine(MineJob::dig(world.owner, c(9, 9))));
    world.map.set_block(c(9, 9), BlockKind::Rock).unwrap();

    let mut ctx = world.ctx();
    job.start(&mut ctx);
    let first = job.interrupt(&mut ctx, "stop").unwrap();
    assert!(!first.outcome.is_completed());
    assert!(job.is_finished());
    assert_eq!(
        job.interrupt(&mut ctx, "stop again"),
        Err(JobError::AlreadyFinished(job.id()))
    );
    assert_eq!(job.tick(&mut ctx), None);
    assert!(ctx.workers.is_idle(miner));
}

#[test]
fn designation_cells_cannot_be_interrupted_twice() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let rock = c(5, 5);
    world.map.set_block(rock, BlockKind::Rock).unwrap();
    world.designate(&mut manager, DesignationKind::Mine, Area::cell(rock));

    let mut ctx = world.ctx();
    let reports = manager
        .undesignate(&mut ctx, DesignationKind::Mine, Area::cell(rock))
        .unwrap();
    assert_eq!(reports.len(), 1);
    let again = manager
        .undesignate(&mut ctx, DesignationKind::Mine, Area::cell(rock))
        .unwrap();
    assert!(again.is_empty());
}

// ---------------------------------------------------------------------------
// Manager surface
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<(bool, JobKindTag, usize)>>,
}

impl JobManagerListener for Recorder {
    fn on_added(&self, job: &JobSummary, index: usize) {
        self.events.lock().unwrap().push((true, job.kind, index));
    }

    fn on_removed(&self, job: &JobSummary, index: usize) {
        self.events.lock().unwrap().push((false, job.kind, index));
    }
}

#[test]
fn manager_listeners_see_additions_and_removals_with_indices() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let recorder = Arc::new(Recorder::default());
    manager.add_listener(recorder.clone());
    let standard = DesignationKind::STANDARD.len();
    assert_eq!(recorder.events.lock().unwrap().len(), standard);

    let soldier = world.worker("Guard", c(1, 1), &[LaborKind::Military]);
    let first = world.add(
        &mut manager,
        JobKind::MilitaryStation(MilitaryStationJob::new(world.owner, soldier, c(3, 3))),
    );
    let second = world.add(
        &mut manager,
        JobKind::Sleep(SleepJob::new(world.owner, soldier)),
    );
    {
        let mut ctx = world.ctx();
        manager.interrupt_job(&mut ctx, first, "stand down").unwrap();
    }

    let events = recorder.events.lock().unwrap().clone();
    let tail = &events[standard..];
    assert_eq!(
        tail,
        &[
            (true, JobKindTag::MilitaryStation, standard),
            (true, JobKindTag::Sleep, standard + 1),
            (false, JobKindTag::MilitaryStation, standard),
        ]
    );
    assert!(manager.job(second).is_some());
    assert_eq!(manager.len(), standard + 1);
}

#[test]
fn designations_cannot_be_cancelled() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let id = manager.designation(DesignationKind::Farm).unwrap().id();
    let mut ctx = world.ctx();
    assert_eq!(
        manager.interrupt_job(&mut ctx, id, "nope"),
        Err(JobError::DesignationNotCancellable(id))
    );
    let unknown = JobId::new();
    assert_eq!(
        manager.interrupt_job(&mut ctx, unknown, "nope"),
        Err(JobError::JobNotFound(unknown))
    );
}

#[test]
fn revalidation_drops_cells_that_became_invalid() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let tree = c(7, 7);
    world.map.set_block(tree, BlockKind::Tree).unwrap();
    world.designate(&mut manager, DesignationKind::ChopTree, Area::cell(tree));

    world.map.set_block(tree, BlockKind::Grass).unwrap();
    let mut ctx = world.ctx();
    let reports = manager.revalidate(&mut ctx);
    assert_eq!(reports.len(), 1);
    assert!(!reports[0].outcome.is_completed());
    assert!(manager.designation(DesignationKind::ChopTree).unwrap().is_empty());
}

#[test]
fn designating_far_past_the_map_edge_only_visits_map_cells() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let rock = c(15, 9);
    world.map.set_block(rock, BlockKind::Rock).unwrap();

    let everything = Area::new(
        Coord::new(i32::MIN, i32::MIN, i32::MIN),
        Coord::new(i32::MAX, i32::MAX, i32::MAX),
    );
    assert_eq!(world.designate(&mut manager, DesignationKind::Mine, everything), 1);
    assert!(mine_job(&manager, rock).is_some());

    let off_map = Area::new(c(1_000_000, 1_000_000), c(i32::MAX, i32::MAX));
    assert_eq!(world.designate(&mut manager, DesignationKind::Mine, off_map), 0);
    assert_eq!(manager.designation(DesignationKind::Mine).unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Job kinds
// ---------------------------------------------------------------------------

#[test]
fn chopping_a_tree_leaves_a_log() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let tree = c(9, 4);
    world.map.set_block(tree, BlockKind::Tree).unwrap();
    let cutter = world.worker("Cutter", c(3, 4), &[LaborKind::Woodcutting]);

    world.designate(&mut manager, DesignationKind::ChopTree, Area::cell(tree));
    let reports = world.run_to_report(&mut manager, 300);
    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(world.map.block(tree), Some(BlockKind::Grass));
    assert_eq!(world.items.count_kind(ItemKind::Log), 1);
    assert_eq!(world.roster.skill(cutter, LaborKind::Woodcutting), 1);
}

#[test]
fn building_a_wall_consumes_stone_and_clears_the_site() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let site = c(8, 5);
    let stone = world.item(ItemKind::Stone, c(3, 5));
    let food = world.item(ItemKind::Food, site);
    let builder = world.worker(
        "Mason",
        c(1, 5),
        &[LaborKind::Hauling, LaborKind::Building],
    );

    world.designate(
        &mut manager,
        DesignationKind::Construct(ConstructionKind::Wall),
        Area::cell(site),
    );
    let reports = world.run_to_report(&mut manager, 500);
    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(world.map.block(site), Some(BlockKind::Wall));
    assert!(!world.items.exists(stone));
    let moved_to = world.items.position(food).unwrap();
    assert!(moved_to.is_adjacent(site));
    assert_eq!(world.roster.skill(builder, LaborKind::Building), 1);
    assert_ne!(world.roster.get(builder).unwrap().position, site);
    assert!(world.roster.is_idle(builder));
}

#[test]
fn crafting_planks_at_the_carpenter() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let bench = world.workshops.add(WorkshopKind::Carpenter, c(10, 2));
    world.item(ItemKind::Log, c(4, 4));
    let crafter = world.worker(
        "Carpenter",
        c(2, 2),
        &[LaborKind::Hauling, LaborKind::Carpentry],
    );

    let owner = world.owner;
    let kind = {
        let mut ctx = world.ctx();
        CraftJob::new(&mut ctx, owner, bench, ItemKind::Plank).unwrap()
    };
    world.add(&mut manager, JobKind::Craft(kind));
    let reports = world.run_to_report(&mut manager, 500);

    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(world.items.count_kind(ItemKind::Plank), 2);
    assert_eq!(world.items.count_kind(ItemKind::Log), 0);
    assert!(!world.workshops.is_claimed(bench));
    assert_eq!(world.roster.skill(crafter, LaborKind::Carpentry), 1);
}

#[test]
fn craft_construction_errors() {
    let mut world = World::new();
    let bench = world.workshops.add(WorkshopKind::Carpenter, c(10, 2));
    let owner = world.owner;
    let mut ctx = world.ctx();

    assert_eq!(
        CraftJob::new(&mut ctx, owner, bench, ItemKind::Food),
        Err(JobError::UnknownRecipe(ItemKind::Food))
    );
    assert_eq!(
        CraftJob::new(&mut ctx, owner, bench, ItemKind::Pickaxe),
        Err(JobError::WrongWorkshop {
            workshop: bench,
            expected: WorkshopKind::Forge,
            found: WorkshopKind::Carpenter,
        })
    );
    assert!(CraftJob::new(&mut ctx, owner, bench, ItemKind::Plank).is_ok());
    assert_eq!(
        CraftJob::new(&mut ctx, owner, bench, ItemKind::Bed),
        Err(JobError::WorkshopBusy(bench))
    );
}

#[test]
fn farming_plants_then_harvests() {
    let mut world = World::new();
    world.map = TileMap::new(16, 10, 1, BlockKind::Grass)
        .unwrap()
        .with_crops(CropRegistry::new(30));
    world.config.plant_ticks = 5;
    let mut manager = JobManager::new(world.owner);
    let field = c(6, 6);
    world.worker("Farmer", c(2, 6), &[LaborKind::Farming]);

    world.designate(&mut manager, DesignationKind::Farm, Area::cell(field));
    let reports = world.run_to_report(&mut manager, 100);
    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(world.map.crop(field), CropStatus::Growing);
    // A growing crop cannot be designated again.
    assert_eq!(
        world.designate(&mut manager, DesignationKind::Farm, Area::cell(field)),
        0
    );

    world.run(&mut manager, 40);
    assert_eq!(world.map.crop(field), CropStatus::Mature);
    assert_eq!(
        world.designate(&mut manager, DesignationKind::Farm, Area::cell(field)),
        1
    );
    let reports = world.run_to_report(&mut manager, 100);
    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(world.map.crop(field), CropStatus::Bare);
    assert_eq!(
        world.items.count_kind(ItemKind::Food),
        usize::try_from(BASE_HARVEST_YIELD).unwrap()
    );
}

#[test]
fn sleeping_in_an_installed_bed() {
    let mut world = World::new();
    world.config.sleep_ticks = 10;
    let mut manager = JobManager::new(world.owner);
    let bed = world.item(ItemKind::Bed, c(1, 1));
    world.items.install(bed).unwrap();
    let sleeper = world.worker("Sleepy", c(5, 5), &[]);

    world.add(
        &mut manager,
        JobKind::Sleep(SleepJob::new(world.owner, sleeper)),
    );
    assert!(world.items.is_claimed(bed));
    let reports = world.run_to_report(&mut manager, 100);

    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(world.roster.get(sleeper).unwrap().position, c(1, 1));
    assert!(!world.items.is_claimed(bed));
    assert!(world.roster.is_idle(sleeper));
    assert_eq!(world.roster.get(sleeper).unwrap().fatigue, 0);
}

#[test]
fn picking_up_a_tool_equips_it() {
    let mut world = World::new();
    world.config.require_tools = true;
    let mut manager = JobManager::new(world.owner);
    let pick = world.item(ItemKind::Pickaxe, c(6, 2));
    let miner = world.worker("Urist", c(2, 2), &[LaborKind::Mining]);
    let rock = c(12, 2);
    world.map.set_block(rock, BlockKind::Rock).unwrap();

    // Without a pickaxe the mine job cannot find a worker.
    world.designate(&mut manager, DesignationKind::Mine, Area::cell(rock));
    world.run(&mut manager, 5);
    assert_eq!(
        mine_job(&manager, rock).and_then(Job::state_name),
        Some("SearchForWorker")
    );

    world.add(
        &mut manager,
        JobKind::PickupTool(PickupToolJob::new(world.owner, miner, ItemKind::Pickaxe)),
    );
    let reports = world.run_to_report(&mut manager, 100);
    assert_eq!(reports[0].summary.kind, JobKindTag::PickupTool);
    assert!(world.roster.has_equipped(miner, ItemKind::Pickaxe));
    assert!(world.items.is_claimed(pick));
    assert_eq!(world.items.position(pick), None);

    let reports = world.run_to_report(&mut manager, 300);
    assert_eq!(reports[0].summary.kind, JobKindTag::Mine);
    assert_eq!(world.map.block(rock), Some(BlockKind::Floor));
}

#[test]
fn pickup_without_a_tool_aborts() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let worker = world.worker("Urist", c(2, 2), &[]);
    world.add(
        &mut manager,
        JobKind::PickupTool(PickupToolJob::new(world.owner, worker, ItemKind::Axe)),
    );
    let reports = world.step(&mut manager);
    assert_eq!(
        reports[0].outcome,
        JobOutcome::Interrupted {
            reason: "no Axe available".to_owned()
        }
    );
    assert!(world.roster.is_idle(worker));
}

#[test]
fn placing_a_bed_installs_it() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let bed = world.item(ItemKind::Bed, c(3, 3));
    let target = c(9, 6);
    world.worker("Fitter", c(1, 1), &[LaborKind::Hauling, LaborKind::Building]);

    world.add(
        &mut manager,
        JobKind::PlaceItem(PlaceItemJob::new(world.owner, ItemKind::Bed, target)),
    );
    let reports = world.run_to_report(&mut manager, 300);
    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(world.items.position(bed), Some(target));
    assert!(world.items.get(bed).unwrap().installed);
    assert!(!world.items.is_claimed(bed));
}

#[test]
fn soldier_guards_fights_and_returns() {
    let mut world = World::new();
    world.config.ration_interval = 5;
    world.config.attack_ticks = 3;
    let mut manager = JobManager::new(world.owner);
    let station = c(5, 5);
    world.item(ItemKind::Food, c(5, 6));
    let soldier = world.worker("Guard", c(1, 5), &[LaborKind::Military]);

    let id = world.add(
        &mut manager,
        JobKind::MilitaryStation(MilitaryStationJob::new(world.owner, soldier, station)),
    );
    assert!(world.run_until(&mut manager, 50, |m| state_of(m, id) == Some("Guard")));
    world.run(&mut manager, 6);
    assert_eq!(world.items.count_kind(ItemKind::Food), 0);

    // Far away: ignored.
    let far = world.map.spawn_hostile(c(15, 9)).unwrap();
    let mut ctx = world.ctx();
    let signal = JobSignal::ThreatSpotted {
        hostile: far,
        position: c(15, 9),
    };
    assert!(manager.broadcast(&mut ctx, &signal).is_empty());
    assert_eq!(state_of(&manager, id), Some("Guard"));

    let near = world.map.spawn_hostile(c(8, 5)).unwrap();
    let mut ctx = world.ctx();
    let signal = JobSignal::ThreatSpotted {
        hostile: near,
        position: c(8, 5),
    };
    assert!(manager.broadcast(&mut ctx, &signal).is_empty());
    assert_eq!(state_of(&manager, id), Some("WalkToPosition"));

    assert!(world.run_until(&mut manager, 100, |m| state_of(m, id) == Some("Guard")));
    assert_eq!(world.map.hostile_position(near), None);
    assert!(world.map.hostile_position(far).is_some());
    assert_eq!(world.roster.skill(soldier, LaborKind::Military), 1);
    assert_eq!(world.roster.get(soldier).unwrap().position, station);
    assert!(!world.roster.is_idle(soldier));
}

// ---------------------------------------------------------------------------
// Lost workers, moved items, and targets that change under a job
// ---------------------------------------------------------------------------

#[test]
fn miner_lost_mid_walk_is_replaced() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let rock = c(12, 3);
    world.map.set_block(rock, BlockKind::Rock).unwrap();
    let first = world.worker("Urist", c(1, 3), &[LaborKind::Mining]);

    world.designate(&mut manager, DesignationKind::Mine, Area::cell(rock));
    world.run(&mut manager, 2);
    assert_eq!(
        mine_job(&manager, rock).and_then(Job::state_name),
        Some("WalkToPosition")
    );

    world.roster.remove_worker(first).unwrap();
    let second = world.worker("Bomrek", c(1, 5), &[LaborKind::Mining]);
    let reports = world.run_to_report(&mut manager, 300);

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(world.map.block(rock), Some(BlockKind::Floor));
    assert_eq!(world.roster.skill(second, LaborKind::Mining), 1);
    assert!(world.roster.is_idle(second));
}

#[test]
fn woodcutter_lost_while_chopping_is_replaced() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let tree = c(6, 6);
    world.map.set_block(tree, BlockKind::Tree).unwrap();
    let first = world.worker("Cutter", c(5, 6), &[LaborKind::Woodcutting]);

    world.designate(&mut manager, DesignationKind::ChopTree, Area::cell(tree));
    let chopping = world.run_until(&mut manager, 50, |m| {
        m.designation(DesignationKind::ChopTree)
            .and_then(|d| d.job_at(tree))
            .and_then(Job::state_name)
            == Some("WaitDuration")
    });
    assert!(chopping);

    world.roster.remove_worker(first).unwrap();
    world.step(&mut manager);
    assert!(
        manager
            .designation(DesignationKind::ChopTree)
            .unwrap()
            .job_at(tree)
            .is_some()
    );

    let second = world.worker("Feller", c(8, 8), &[LaborKind::Woodcutting]);
    let reports = world.run_to_report(&mut manager, 300);
    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(world.items.count_kind(ItemKind::Log), 1);
    assert_eq!(world.roster.skill(second, LaborKind::Woodcutting), 1);
}

#[test]
fn losing_a_named_worker_ends_the_job() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let pick = world.item(ItemKind::Pickaxe, c(12, 2));
    let miner = world.worker("Urist", c(1, 2), &[LaborKind::Mining]);

    world.add(
        &mut manager,
        JobKind::PickupTool(PickupToolJob::new(world.owner, miner, ItemKind::Pickaxe)),
    );
    world.run(&mut manager, 2);
    world.roster.remove_worker(miner).unwrap();

    let reports = world.run_to_report(&mut manager, 10);
    assert_eq!(reports.len(), 1);
    assert!(!reports[0].outcome.is_completed());
    assert!(!world.items.is_claimed(pick));
    assert_eq!(world.items.position(pick), Some(c(12, 2)));
}

#[test]
fn rock_dug_away_during_the_wait_skips_the_yield() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let rock = c(7, 2);
    world.map.set_block(rock, BlockKind::Rock).unwrap();
    let miner = world.worker("Urist", c(5, 2), &[LaborKind::Mining]);

    world.designate(&mut manager, DesignationKind::Mine, Area::cell(rock));
    let digging = world.run_until(&mut manager, 50, |m| {
        mine_job(m, rock).and_then(Job::state_name) == Some("WaitDuration")
    });
    assert!(digging);

    world.map.set_block(rock, BlockKind::Floor).unwrap();
    let reports = world.run_to_report(&mut manager, 300);
    assert_eq!(
        reports[0].outcome,
        JobOutcome::Interrupted {
            reason: "target already dug".to_owned()
        }
    );
    assert!(world.items.items_at(rock).is_empty());
    assert_eq!(world.roster.skill(miner, LaborKind::Mining), 0);
    assert!(world.roster.is_idle(miner));
    assert!(manager.designation(DesignationKind::Mine).unwrap().is_empty());
}

#[test]
fn tree_felled_by_someone_else_leaves_no_log() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let tree = c(6, 6);
    world.map.set_block(tree, BlockKind::Tree).unwrap();
    let cutter = world.worker("Cutter", c(5, 6), &[LaborKind::Woodcutting]);

    world.designate(&mut manager, DesignationKind::ChopTree, Area::cell(tree));
    let chopping = world.run_until(&mut manager, 50, |m| {
        m.designation(DesignationKind::ChopTree)
            .and_then(|d| d.job_at(tree))
            .and_then(Job::state_name)
            == Some("WaitDuration")
    });
    assert!(chopping);

    world.map.set_block(tree, BlockKind::Grass).unwrap();
    let reports = world.run_to_report(&mut manager, 300);
    assert_eq!(
        reports[0].outcome,
        JobOutcome::Interrupted {
            reason: "tree already felled".to_owned()
        }
    );
    assert_eq!(world.items.count_kind(ItemKind::Log), 0);
    assert!(world.roster.is_idle(cutter));
}

#[test]
fn moving_the_item_off_site_stops_the_install() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let bed = world.item(ItemKind::Bed, c(3, 3));
    let target = c(9, 6);
    let fitter = world.worker("Fitter", c(1, 1), &[LaborKind::Hauling, LaborKind::Building]);

    let id = world.add(
        &mut manager,
        JobKind::PlaceItem(PlaceItemJob::new(world.owner, ItemKind::Bed, target)),
    );
    let installing = world.run_until(&mut manager, 300, |m| {
        state_of(m, id) == Some("WaitDuration")
    });
    assert!(installing);

    world.items.put_down(bed, c(2, 8)).unwrap();
    let reports = world.run_to_report(&mut manager, 100);
    assert!(!reports[0].outcome.is_completed());
    assert!(!world.items.get(bed).unwrap().installed);
    assert!(!world.items.is_claimed(bed));
    assert!(world.roster.is_idle(fitter));
}

#[test]
fn input_consumed_mid_haul_is_replaced() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let bench = world.workshops.add(WorkshopKind::Carpenter, c(12, 2));
    let log = world.item(ItemKind::Log, c(2, 8));
    world.worker(
        "Carpenter",
        c(1, 1),
        &[LaborKind::Hauling, LaborKind::Carpentry],
    );

    let owner = world.owner;
    let kind = {
        let mut ctx = world.ctx();
        CraftJob::new(&mut ctx, owner, bench, ItemKind::Plank).unwrap()
    };
    let id = world.add(&mut manager, JobKind::Craft(kind));
    let fetching = world.run_until(&mut manager, 50, |m| {
        m.job(id).is_some_and(|j| j.status().contains("Fetching"))
    });
    assert!(fetching);

    world.items.consume(log).unwrap();
    let spare = world.item(ItemKind::Log, c(6, 6));
    let reports = world.run_to_report(&mut manager, 500);

    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert!(!world.items.exists(spare));
    assert_eq!(world.items.count_kind(ItemKind::Plank), 2);
    assert!(!world.workshops.is_claimed(bench));
}

#[test]
fn wall_is_never_raised_on_a_worker() {
    let mut world = World::new();
    let mut manager = JobManager::new(world.owner);
    let site = c(8, 5);
    world.item(ItemKind::Stone, c(3, 5));
    let hauler = world.worker("Porter", c(1, 5), &[LaborKind::Hauling]);
    let builder = world.worker("Mason", c(14, 5), &[LaborKind::Building]);

    world.designate(
        &mut manager,
        DesignationKind::Construct(ConstructionKind::Wall),
        Area::cell(site),
    );
    let reports = world.run_to_report(&mut manager, 500);

    assert_eq!(reports[0].outcome, JobOutcome::Completed);
    assert_eq!(world.map.block(site), Some(BlockKind::Wall));
    assert!(world.roster.workers_at(site).is_empty());
    assert!(world.map.is_walkable(world.roster.get(hauler).unwrap().position));
    assert!(world.map.is_walkable(world.roster.get(builder).unwrap().position));
}
