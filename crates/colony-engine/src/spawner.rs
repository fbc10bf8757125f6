//! Worker spawner for seeding the colony with its first workers.
//!
//! At startup the spawner creates N workers with names drawn from a
//! built-in pool and places them on random cells of the starting world's
//! spawn area. Worker `i` is enabled for the `i`-th labor (cycling through
//! every labor, so a colony of nine or more covers them all), for hauling,
//! and sometimes for one extra labor. All choices come from an RNG seeded
//! with the world seed, so a given config always spawns the same colony.

use std::collections::BTreeSet;

use colony_agents::WorkerRoster;
use colony_types::{Area, Coord, LaborKind, PlayerId, WorkerId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::error::EngineError;

/// Chance that a worker gets an extra random labor.
const EXTRA_LABOR_CHANCE: f64 = 0.5;

/// Built-in pool of worker names. The spawner picks without replacement.
const NAME_POOL: &[&str] = &[
    "Urist", "Bomrek", "Kadol", "Litast", "Mebzuth", "Olin", "Rigoth", "Sakzul",
    "Tobul", "Zefon", "Asmel", "Datan", "Erith", "Fikod", "Goden", "Ingish",
    "Kib", "Likot", "Momuz", "Nish", "Onul", "Rovod", "Stukos", "Thikut",
    "Udib", "Vabok", "Zasit", "Avuz", "Bembul", "Catten",
];

/// The spawned workers, in spawn order.
#[derive(Debug)]
pub struct SpawnResult {
    /// Worker IDs.
    pub workers: Vec<WorkerId>,
    /// Display names, parallel to `workers`.
    pub names: Vec<String>,
}

/// Spawn `count` workers for `owner` on cells of `area`.
///
/// # Errors
///
/// Returns [`EngineError::Spawner`] if `count` exceeds the name pool,
/// or [`EngineError::Agent`] if the roster rejects a worker.
pub fn spawn_initial_workers(
    roster: &mut WorkerRoster,
    owner: PlayerId,
    area: Area,
    count: u32,
    seed: u64,
) -> Result<SpawnResult, EngineError> {
    let wanted = usize::try_from(count).map_err(|_| EngineError::Spawner {
        message: format!("cannot spawn {count} workers"),
    })?;
    if wanted > NAME_POOL.len() {
        return Err(EngineError::Spawner {
            message: format!(
                "cannot spawn {wanted} workers: only {} names available",
                NAME_POOL.len()
            ),
        });
    }
    let cells: Vec<Coord> = area.cells().collect();
    if cells.is_empty() && wanted > 0 {
        return Err(EngineError::Spawner {
            message: String::from("spawn area has no cells"),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut available: Vec<&str> = NAME_POOL.to_vec();
    let mut result = SpawnResult {
        workers: Vec::with_capacity(wanted),
        names: Vec::with_capacity(wanted),
    };

    for i in 0..wanted {
        let name = available.swap_remove(rng.random_range(0..available.len()));
        let position = cells
            .get(rng.random_range(0..cells.len()))
            .copied()
            .ok_or_else(|| EngineError::Spawner {
                message: String::from("spawn cell out of range"),
            })?;
        let labors = pick_labors(&mut rng, i);
        let id = roster.add_worker(name, owner, position, labors)?;
        result.workers.push(id);
        result.names.push(name.to_owned());
    }

    info!(count = result.workers.len(), seed, "initial workers spawned");
    Ok(result)
}

/// Primary labor by spawn index, hauling, and maybe one extra.
fn pick_labors(rng: &mut impl Rng, index: usize) -> BTreeSet<LaborKind> {
    let mut labors = BTreeSet::from([LaborKind::Hauling]);
    let primary = index
        .checked_rem(LaborKind::ALL.len())
        .and_then(|i| LaborKind::ALL.get(i))
        .copied();
    if let Some(labor) = primary {
        labors.insert(labor);
    }
    if rng.random_bool(EXTRA_LABOR_CHANCE) {
        let pick = rng.random_range(0..LaborKind::ALL.len());
        if let Some(&extra) = LaborKind::ALL.get(pick) {
            labors.insert(extra);
        }
    }
    labors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_agents::WorkerConfig;

    use super::*;

    fn area() -> Area {
        Area::new(Coord::new(4, 5, 0), Coord::new(8, 8, 0))
    }

    #[test]
    fn spawns_requested_count_with_unique_names() {
        let mut roster = WorkerRoster::new(WorkerConfig::default());
        let result = spawn_initial_workers(&mut roster, PlayerId::new(), area(), 12, 42).unwrap();
        assert_eq!(result.workers.len(), 12);
        assert_eq!(roster.len(), 12);
        let names: BTreeSet<&String> = result.names.iter().collect();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn workers_land_in_the_area_and_can_haul() {
        let mut roster = WorkerRoster::new(WorkerConfig::default());
        spawn_initial_workers(&mut roster, PlayerId::new(), area(), 9, 7).unwrap();
        for worker in roster.iter() {
            assert!(area().contains(worker.position));
            assert!(worker.labors.contains(&LaborKind::Hauling));
        }
        // Nine workers cover every labor.
        let covered: BTreeSet<LaborKind> =
            roster.iter().flat_map(|w| w.labors.iter().copied()).collect();
        assert_eq!(covered.len(), LaborKind::ALL.len());
    }

    #[test]
    fn same_seed_same_colony() {
        let owner = PlayerId::new();
        let mut a = WorkerRoster::new(WorkerConfig::default());
        let mut b = WorkerRoster::new(WorkerConfig::default());
        let ra = spawn_initial_workers(&mut a, owner, area(), 6, 99).unwrap();
        let rb = spawn_initial_workers(&mut b, owner, area(), 6, 99).unwrap();
        assert_eq!(ra.names, rb.names);
        // IDs differ, so compare by name.
        let layout = |roster: &WorkerRoster| {
            let mut v: Vec<_> = roster
                .iter()
                .map(|w| (w.name.clone(), w.position, w.labors.clone()))
                .collect();
            v.sort_by(|x, y| x.0.cmp(&y.0));
            v
        };
        assert_eq!(layout(&a), layout(&b));
    }

    #[test]
    fn too_many_workers_is_rejected() {
        let mut roster = WorkerRoster::new(WorkerConfig::default());
        let err = spawn_initial_workers(&mut roster, PlayerId::new(), area(), 1000, 1);
        assert!(matches!(err, Err(EngineError::Spawner { .. })));
        assert!(roster.is_empty());
    }
}
