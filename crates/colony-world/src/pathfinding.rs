//! Breadth-first pathfinding over walkable cells.
//!
//! Workers move between horizontally adjacent walkable cells on one level,
//! one cell per step, so every step costs the same and a plain BFS finds a
//! shortest path. Neighbours are expanded in a fixed order, which keeps the
//! chosen path deterministic.

use std::collections::{BTreeMap, VecDeque};

use colony_types::{Coord, Terrain};

/// Default cap on the number of cells a single search may visit.
pub const DEFAULT_SEARCH_LIMIT: usize = 16_384;

/// Whether `cell` satisfies a walk order towards `target`.
pub const fn is_goal(cell: Coord, target: Coord, arrive_adjacent: bool) -> bool {
    (cell.x == target.x && cell.y == target.y && cell.z == target.z)
        || (arrive_adjacent && cell.is_adjacent(target))
}

/// Find a shortest walkable path from `from` to `target`.
///
/// The returned path excludes `from` and ends on the goal cell: `target`
/// itself, or a walkable neighbour of it when `arrive_adjacent` is set.
/// Returns `Some(vec![])` if `from` already satisfies the goal, and `None`
/// if no path exists within `max_nodes` visited cells.
pub fn find_path<T: Terrain + ?Sized>(
    terrain: &T,
    from: Coord,
    target: Coord,
    arrive_adjacent: bool,
    max_nodes: usize,
) -> Option<Vec<Coord>> {
    if is_goal(from, target, arrive_adjacent) {
        return Some(Vec::new());
    }

    // Predecessor map for path reconstruction; doubles as the visited set.
    let mut prev: BTreeMap<Coord, Coord> = BTreeMap::new();
    let mut queue: VecDeque<Coord> = VecDeque::new();
    let mut visited: usize = 1;
    queue.push_back(from);

    let mut found: Option<Coord> = None;
    'search: while let Some(current) = queue.pop_front() {
        for neighbor in current.neighbors() {
            if neighbor == from || prev.contains_key(&neighbor) {
                continue;
            }
            if !terrain.is_walkable(neighbor) {
                continue;
            }
            prev.insert(neighbor, current);
            if is_goal(neighbor, target, arrive_adjacent) {
                found = Some(neighbor);
                break 'search;
            }
            visited = visited.saturating_add(1);
            if visited >= max_nodes {
                break 'search;
            }
            queue.push_back(neighbor);
        }
    }

    // Reconstruct path.
    let goal = found?;
    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(&step) = prev.get(&cursor) {
        if step == from {
            break;
        }
        path.push(step);
        cursor = step;
    }
    path.reverse();
    Some(path)
}
