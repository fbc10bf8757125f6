//! The worker roster: the reference worker collaborator.
//!
//! [`WorkerRoster`] owns every worker and implements
//! [`Workforce`] for the job framework. It also drives the per-tick worker
//! mechanics the simulation needs outside of jobs: stepping movement along
//! planned paths and accumulating fatigue.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use colony_types::{
    Coord, ItemId, ItemKind, LaborKind, MovementHandle, MovementStatus, PlayerId, Terrain,
    WorkerId, Workforce,
};
use colony_world::{find_path, is_goal};
use tracing::{debug, info};

use crate::config::WorkerConfig;
use crate::error::AgentError;
use crate::worker::{MovementState, Worker};

/// All workers, keyed by ID (creation order).
#[derive(Debug, Clone, Default)]
pub struct WorkerRoster {
    workers: BTreeMap<WorkerId, Worker>,
    config: WorkerConfig,
}

impl WorkerRoster {
    /// Create an empty roster.
    pub const fn new(config: WorkerConfig) -> Self {
        Self {
            workers: BTreeMap::new(),
            config,
        }
    }

    /// Add a worker. Names must be unique.
    pub fn add_worker(
        &mut self,
        name: &str,
        owner: PlayerId,
        position: Coord,
        labors: BTreeSet<LaborKind>,
    ) -> Result<WorkerId, AgentError> {
        if self.workers.values().any(|w| w.name == name) {
            return Err(AgentError::DuplicateName(name.to_owned()));
        }
        let worker = Worker::new(name, owner, position, labors);
        let id = worker.id;
        info!(worker = %id, name, %position, "worker joined");
        self.workers.insert(id, worker);
        Ok(id)
    }

    /// Remove a worker from the colony.
    pub fn remove_worker(&mut self, worker: WorkerId) -> Result<Worker, AgentError> {
        let removed = self
            .workers
            .remove(&worker)
            .ok_or(AgentError::WorkerNotFound(worker))?;
        info!(worker = %worker, name = %removed.name, "worker left");
        Ok(removed)
    }

    /// Look up a worker.
    pub fn get(&self, worker: WorkerId) -> Option<&Worker> {
        self.workers.get(&worker)
    }

    /// All workers in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Worker> {
        self.workers.values()
    }

    /// Number of workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Number of workers currently claimed by a job.
    pub fn claimed_count(&self) -> usize {
        self.workers.values().filter(|w| w.claimed).count()
    }

    /// Enable or disable a labor for a worker.
    pub fn set_labor(
        &mut self,
        worker: WorkerId,
        labor: LaborKind,
        enabled: bool,
    ) -> Result<(), AgentError> {
        let w = self
            .workers
            .get_mut(&worker)
            .ok_or(AgentError::WorkerNotFound(worker))?;
        if enabled {
            w.labors.insert(labor);
        } else {
            w.labors.remove(&labor);
        }
        Ok(())
    }

    /// Skill level of a worker in `labor` (0 for unknown workers).
    pub fn skill(&self, worker: WorkerId, labor: LaborKind) -> u32 {
        self.workers
            .get(&worker)
            .map_or(0, |w| w.skills.level(labor))
    }

    /// Teleport a worker (spawning, tests). Cancels any movement order.
    pub fn place(&mut self, worker: WorkerId, position: Coord) -> Result<(), AgentError> {
        let w = self
            .workers
            .get_mut(&worker)
            .ok_or(AgentError::WorkerNotFound(worker))?;
        w.position = position;
        w.movement.begin(MovementState::Idle);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Per-tick mechanics
    // -----------------------------------------------------------------------

    /// Advance every walking worker along its path.
    ///
    /// Paths are planned lazily on the first step after an order and
    /// replanned when the next cell has become blocked. Occupied workers
    /// stay put. Returns the number of workers that changed cell.
    pub fn advance_movement<T: Terrain + ?Sized>(&mut self, terrain: &T) -> usize {
        let steps = self.config.steps_per_tick;
        let limit = self.config.path_search_limit;
        let mut moved: usize = 0;
        for worker in self.workers.values_mut() {
            if worker.occupied {
                continue;
            }
            let start = worker.position;
            let state = std::mem::replace(&mut worker.movement.state, MovementState::Idle);
            let (position, next) = step_worker(terrain, start, state, steps, limit);
            if next == MovementState::NoPath {
                debug!(worker = %worker.id, from = %start, "no path to destination");
            }
            worker.position = position;
            worker.movement.state = next;
            if position != start {
                moved = moved.saturating_add(1);
            }
        }
        moved
    }

    /// Add one tick of fatigue to every worker that is not resting.
    ///
    /// Returns the workers that just became tired enough to need a bed and
    /// have no sleep request outstanding; they are marked as having one.
    pub fn accumulate_fatigue(&mut self) -> Vec<WorkerId> {
        let per_tick = self.config.fatigue_per_tick;
        let threshold = self.config.fatigue_threshold;
        let mut tired = Vec::new();
        for worker in self.workers.values_mut() {
            if worker.sleep_pending && worker.occupied {
                continue;
            }
            worker.fatigue = worker.fatigue.saturating_add(per_tick);
            if worker.fatigue >= threshold && !worker.sleep_pending {
                worker.sleep_pending = true;
                tired.push(worker.id);
            }
        }
        tired
    }

    /// Forget an outstanding sleep request (the sleep job was cancelled).
    pub fn clear_sleep_request(&mut self, worker: WorkerId) {
        if let Some(w) = self.workers.get_mut(&worker) {
            w.sleep_pending = false;
        }
    }
}

/// One movement step for a single worker.
fn step_worker<T: Terrain + ?Sized>(
    terrain: &T,
    start: Coord,
    state: MovementState,
    steps: u32,
    limit: usize,
) -> (Coord, MovementState) {
    let (target, adjacent, mut path) = match state {
        MovementState::Planning { target, adjacent } => {
            match find_path(terrain, start, target, adjacent, limit) {
                Some(p) => (target, adjacent, VecDeque::from(p)),
                None => return (start, MovementState::NoPath),
            }
        }
        MovementState::Walking {
            target,
            adjacent,
            path,
        } => (target, adjacent, path),
        other @ (MovementState::Idle | MovementState::Arrived | MovementState::NoPath) => {
            return (start, other);
        }
    };

    let mut position = start;
    for _ in 0..steps {
        let Some(&next) = path.front() else {
            break;
        };
        if !terrain.is_walkable(next) {
            match find_path(terrain, position, target, adjacent, limit) {
                Some(p) => {
                    path = VecDeque::from(p);
                    continue;
                }
                None => return (position, MovementState::NoPath),
            }
        }
        position = next;
        path.pop_front();
    }

    if path.is_empty() {
        (position, MovementState::Arrived)
    } else {
        (
            position,
            MovementState::Walking {
                target,
                adjacent,
                path,
            },
        )
    }
}

impl Workforce for WorkerRoster {
    fn idle_workers(&self, owner: PlayerId) -> Vec<WorkerId> {
        self.workers
            .values()
            .filter(|w| w.owner == owner && w.is_idle())
            .map(|w| w.id)
            .collect()
    }

    fn exists(&self, worker: WorkerId) -> bool {
        self.workers.contains_key(&worker)
    }

    fn is_idle(&self, worker: WorkerId) -> bool {
        self.workers.get(&worker).is_some_and(Worker::is_idle)
    }

    fn try_acquire(&mut self, worker: WorkerId) -> bool {
        match self.workers.get_mut(&worker) {
            Some(w) if !w.claimed => {
                w.claimed = true;
                true
            }
            _ => false,
        }
    }

    fn release(&mut self, worker: WorkerId) {
        if let Some(w) = self.workers.get_mut(&worker) {
            w.claimed = false;
            w.occupied = false;
            w.movement.begin(MovementState::Idle);
        }
    }

    fn has_labor(&self, worker: WorkerId, labor: LaborKind) -> bool {
        self.workers
            .get(&worker)
            .is_some_and(|w| w.labors.contains(&labor))
    }

    fn has_equipped(&self, worker: WorkerId, tool: ItemKind) -> bool {
        self.workers
            .get(&worker)
            .is_some_and(|w| w.equipment.contains_key(&tool))
    }

    fn position(&self, worker: WorkerId) -> Option<Coord> {
        self.workers.get(&worker).map(|w| w.position)
    }

    fn walk_to(
        &mut self,
        worker: WorkerId,
        target: Coord,
        arrive_adjacent: bool,
    ) -> Option<MovementHandle> {
        let w = self.workers.get_mut(&worker)?;
        let state = if is_goal(w.position, target, arrive_adjacent) {
            MovementState::Arrived
        } else {
            MovementState::Planning {
                target,
                adjacent: arrive_adjacent,
            }
        };
        let order = w.movement.begin(state);
        Some(MovementHandle { worker, order })
    }

    fn movement_status(&self, handle: MovementHandle) -> MovementStatus {
        match self.workers.get(&handle.worker) {
            None => MovementStatus::Lost,
            Some(w) if w.movement.order != handle.order => MovementStatus::Superseded,
            Some(w) => w.movement.status(),
        }
    }

    fn stop(&mut self, worker: WorkerId) {
        if let Some(w) = self.workers.get_mut(&worker) {
            w.movement.begin(MovementState::Idle);
        }
    }

    fn set_occupied(&mut self, worker: WorkerId, occupied: bool) {
        if let Some(w) = self.workers.get_mut(&worker) {
            w.occupied = occupied;
        }
    }

    fn raise_skill(&mut self, worker: WorkerId, labor: LaborKind, amount: u32) {
        if let Some(w) = self.workers.get_mut(&worker) {
            let level = w.skills.raise(labor, amount);
            debug!(worker = %worker, %labor, level, "skill raised");
        }
    }

    fn rest(&mut self, worker: WorkerId) {
        if let Some(w) = self.workers.get_mut(&worker) {
            w.fatigue = 0;
            w.sleep_pending = false;
        }
    }

    fn equip(&mut self, worker: WorkerId, item: ItemId, kind: ItemKind) -> bool {
        match self.workers.get_mut(&worker) {
            Some(w) => {
                w.equipment.insert(kind, item);
                true
            }
            None => false,
        }
    }

    fn workers_at(&self, cell: Coord) -> Vec<WorkerId> {
        self.workers
            .values()
            .filter(|w| w.position == cell)
            .map(|w| w.id)
            .collect()
    }

    fn shift_idle(&mut self, worker: WorkerId, to: Coord) -> bool {
        if !self.is_idle(worker) {
            return false;
        }
        self.place(worker, to).is_ok()
    }
}
