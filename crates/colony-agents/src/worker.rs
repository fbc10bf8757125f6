//! A single worker: identity, labors, skills, equipment, needs, and the
//! current movement order.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use colony_types::{Coord, ItemId, ItemKind, LaborKind, MovementStatus, PlayerId, WorkerId};
use serde::{Deserialize, Serialize};

use crate::skills::SkillSet;

/// Progress of the worker's current movement order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementState {
    /// No order.
    Idle,
    /// Order accepted; the path is planned during the next movement step.
    Planning {
        /// Destination cell.
        target: Coord,
        /// Stop next to the destination instead of on it.
        adjacent: bool,
    },
    /// Following a planned path.
    Walking {
        /// Destination cell.
        target: Coord,
        /// Stop next to the destination instead of on it.
        adjacent: bool,
        /// Remaining cells, next step first.
        path: VecDeque<Coord>,
    },
    /// The order completed.
    Arrived,
    /// The destination is unreachable.
    NoPath,
}

/// The worker's movement order and its serial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Serial of the current order. Bumped on every new order or stop.
    pub order: u64,
    /// Progress of the current order.
    pub state: MovementState,
}

impl Movement {
    /// Status of the current order as reported to jobs.
    pub const fn status(&self) -> MovementStatus {
        match self.state {
            MovementState::Planning { .. } | MovementState::Walking { .. } => {
                MovementStatus::Walking
            }
            MovementState::Arrived => MovementStatus::Arrived,
            MovementState::NoPath => MovementStatus::NoPath,
            MovementState::Idle => MovementStatus::Superseded,
        }
    }

    /// Start a new order, returning its serial.
    pub(crate) fn begin(&mut self, state: MovementState) -> u64 {
        self.order = self.order.wrapping_add(1);
        self.state = state;
        self.order
    }
}

/// A colonist that can be assigned to jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique identifier.
    pub id: WorkerId,
    /// Display name.
    pub name: String,
    /// Player the worker belongs to.
    pub owner: PlayerId,
    /// Current cell.
    pub position: Coord,
    /// Labors the worker is enabled for.
    pub labors: BTreeSet<LaborKind>,
    /// Skill levels.
    pub skills: SkillSet,
    /// Equipped tools by kind.
    pub equipment: BTreeMap<ItemKind, ItemId>,
    /// Whether a job holds the worker's claim flag.
    pub claimed: bool,
    /// Parked in place by a job (working, sleeping).
    pub occupied: bool,
    /// Accumulated tiredness.
    pub fatigue: u32,
    /// A sleep job has been issued and not yet finished.
    pub sleep_pending: bool,
    /// Current movement order.
    pub movement: Movement,
}

impl Worker {
    /// Create an idle worker.
    pub fn new(name: &str, owner: PlayerId, position: Coord, labors: BTreeSet<LaborKind>) -> Self {
        Self {
            id: WorkerId::new(),
            name: name.to_owned(),
            owner,
            position,
            labors,
            skills: SkillSet::new(),
            equipment: BTreeMap::new(),
            claimed: false,
            occupied: false,
            fatigue: 0,
            sleep_pending: false,
            movement: Movement {
                order: 0,
                state: MovementState::Idle,
            },
        }
    }

    /// Whether the worker walks or works for a job right now.
    pub const fn is_idle(&self) -> bool {
        !self.claimed
    }
}
