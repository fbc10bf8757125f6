//! Plain data structs shared across the workspace.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ItemCategory, ItemKind, JobKindTag};
use crate::ids::{JobId, PlayerId, WorkerId};

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A map cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Depth level.
    pub z: i32,
}

impl Coord {
    /// Create a coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The four horizontal neighbours on the same level.
    ///
    /// Neighbours that would overflow `i32` are skipped.
    pub fn neighbors(self) -> Vec<Self> {
        let offsets: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
        offsets
            .iter()
            .filter_map(|&(dx, dy)| {
                Some(Self {
                    x: self.x.checked_add(dx)?,
                    y: self.y.checked_add(dy)?,
                    z: self.z,
                })
            })
            .collect()
    }

    /// Whether `other` is one of the four horizontal neighbours.
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.z == other.z
            && ((self.x == other.x && self.y.abs_diff(other.y) == 1)
                || (self.y == other.y && self.x.abs_diff(other.x) == 1))
    }

    /// Manhattan distance, saturating at `u32::MAX`.
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
            .saturating_add(self.z.abs_diff(other.z))
    }
}

impl core::fmt::Display for Coord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// An inclusive, axis-aligned box of cells painted by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Area {
    /// Lowest corner (inclusive).
    pub min: Coord,
    /// Highest corner (inclusive).
    pub max: Coord,
}

impl Area {
    /// Build an area from any two opposite corners.
    pub fn new(a: Coord, b: Coord) -> Self {
        Self {
            min: Coord::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Coord::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// A single-cell area.
    pub const fn cell(cell: Coord) -> Self {
        Self {
            min: cell,
            max: cell,
        }
    }

    /// Whether `cell` lies inside the area.
    pub const fn contains(&self, cell: Coord) -> bool {
        cell.x >= self.min.x
            && cell.x <= self.max.x
            && cell.y >= self.min.y
            && cell.y <= self.max.y
            && cell.z >= self.min.z
            && cell.z <= self.max.z
    }

    /// The cells shared with `other`, or `None` if the boxes do not overlap.
    pub fn intersect(&self, other: Self) -> Option<Self> {
        let min = Coord::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.min.z.max(other.min.z),
        );
        let max = Coord::new(
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
            self.max.z.min(other.max.z),
        );
        (min.x <= max.x && min.y <= max.y && min.z <= max.z).then_some(Self { min, max })
    }

    /// Iterate every cell in (z, y, x) order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + use<> {
        let (min, max) = (self.min, self.max);
        (min.z..=max.z).flat_map(move |z| {
            (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| Coord::new(x, y, z)))
        })
    }
}

// ---------------------------------------------------------------------------
// Item queries
// ---------------------------------------------------------------------------

/// What an item query matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ItemMatch {
    /// Exactly this kind.
    Kind(ItemKind),
    /// Any kind in this category.
    Category(ItemCategory),
}

/// A request for "some item like this" sent to the item collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ItemQuery {
    /// Kind or category to match.
    pub matcher: ItemMatch,
    /// Only match items that have been installed on the map.
    pub installed_only: bool,
}

impl ItemQuery {
    /// Match a single item kind.
    pub const fn kind(kind: ItemKind) -> Self {
        Self {
            matcher: ItemMatch::Kind(kind),
            installed_only: false,
        }
    }

    /// Match any item of a category.
    pub const fn category(category: ItemCategory) -> Self {
        Self {
            matcher: ItemMatch::Category(category),
            installed_only: false,
        }
    }

    /// Match installed items only. Without this, installed items never match.
    #[must_use]
    pub const fn installed(mut self) -> Self {
        self.installed_only = true;
        self
    }

    /// Whether an item of `kind` with the given installed flag satisfies the query.
    pub fn matches(&self, kind: ItemKind, installed: bool) -> bool {
        if self.installed_only != installed {
            return false;
        }
        match self.matcher {
            ItemMatch::Kind(k) => k == kind,
            ItemMatch::Category(c) => kind.category() == c,
        }
    }
}

impl core::fmt::Display for ItemQuery {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.matcher {
            ItemMatch::Kind(k) => write!(f, "{k:?}"),
            ItemMatch::Category(c) => write!(f, "any {c:?}"),
        }
    }
}

/// A number of items matching a query that a job needs delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceRequirement {
    /// Which items qualify.
    pub query: ItemQuery,
    /// How many are needed.
    pub quantity: u32,
}

impl ResourceRequirement {
    /// Create a requirement.
    pub const fn new(query: ItemQuery, quantity: u32) -> Self {
        Self { query, quantity }
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// Handle to one movement order issued to a worker.
///
/// The order serial lets a state tell its own order apart from a newer one
/// issued to the same worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementHandle {
    /// The walking worker.
    pub worker: WorkerId,
    /// Serial of the order on that worker.
    pub order: u64,
}

// ---------------------------------------------------------------------------
// Job summaries
// ---------------------------------------------------------------------------

/// Snapshot of a job handed to listeners (GUI, network shell).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct JobSummary {
    /// Job identifier.
    pub id: JobId,
    /// Player the job works for.
    pub owner: PlayerId,
    /// What kind of job this is.
    pub kind: JobKindTag,
    /// Target cell, if the job has one.
    pub position: Option<Coord>,
    /// Human-readable status line.
    pub status: String,
    /// Whether the job has completed or been interrupted.
    pub finished: bool,
}
