//! Job states: the single steps a job's execution is composed of.
//!
//! [`JobState`] is a closed set of reusable primitives. A state never
//! decides what comes after it; it only reports a [`Step`] each time it is
//! started, polled, or signalled. The owning job drives the transition:
//! when a state reports [`Step::Finished`], the job runs the state's own
//! final actions ([`JobState::finish`]), hands the finished state to its
//! kind to pick the successor, and starts that successor immediately.
//!
//! Every state the job enters is stamped with a fresh [`StateToken`], so a
//! late "done" report for a state that is no longer current can be told
//! apart and rejected.
//!
//! # Modules
//!
//! - [`guard`] -- Event-driven station guarding with periodic rations.
//! - [`haul`] -- Fetching one item, or a whole set of materials, to a site.
//! - [`search`] -- Finding and claiming a worker.
//! - [`wait`] -- Keeping a worker busy for a number of ticks.
//! - [`walk`] -- Walking a worker to a cell.

pub mod guard;
pub mod haul;
pub mod search;
pub mod wait;
pub mod walk;

use colony_types::{Coord, HostileId, WorkerId};
use serde::{Deserialize, Serialize};

use crate::context::JobContext;

pub use guard::Guard;
pub use haul::{HaulItem, HaulResourceSet};
pub use search::{SearchForWorker, WaitForWorker};
pub use wait::WaitDuration;
pub use walk::WalkToPosition;

/// Stamp identifying one entry of a job into a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct StateToken(u64);

impl StateToken {
    /// The token following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl core::fmt::Display for StateToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a state reports after being started, polled, or signalled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Not done yet; poll again on the next tick.
    Pending,
    /// Done; the job should move on.
    Finished,
    /// An invariant broke (no path, target gone); the job must be interrupted.
    Abort(String),
    /// The claimed worker no longer exists. The job decides whether to look
    /// for another one or give up.
    WorkerLost(WorkerId),
}

/// External events forwarded to jobs outside the regular tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobSignal {
    /// A hostile was seen at `position`.
    ThreatSpotted {
        /// The hostile.
        hostile: HostileId,
        /// Where it was seen.
        position: Coord,
    },
}

/// One step of a job's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    /// Find and claim any idle worker with a labor.
    SearchForWorker(SearchForWorker),
    /// Claim one specific worker once it is free.
    WaitForWorker(WaitForWorker),
    /// Walk a claimed worker to a cell.
    WalkToPosition(WalkToPosition),
    /// Keep a claimed worker busy for a number of ticks.
    WaitDuration(WaitDuration),
    /// Bring one matching item to a destination.
    HaulItem(HaulItem),
    /// Bring a set of materials to a destination.
    HaulResourceSet(HaulResourceSet),
    /// Stand guard until a threat shows up.
    Guard(Guard),
}

impl JobState {
    /// Short name for logs and errors.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SearchForWorker(_) => "SearchForWorker",
            Self::WaitForWorker(_) => "WaitForWorker",
            Self::WalkToPosition(_) => "WalkToPosition",
            Self::WaitDuration(_) => "WaitDuration",
            Self::HaulItem(_) => "HaulItem",
            Self::HaulResourceSet(_) => "HaulResourceSet",
            Self::Guard(_) => "Guard",
        }
    }

    /// Enter the state. Called exactly once.
    pub fn start(&mut self, ctx: &mut JobContext<'_>) -> Step {
        match self {
            Self::SearchForWorker(s) => s.start(ctx),
            Self::WaitForWorker(s) => s.start(ctx),
            Self::WalkToPosition(s) => s.start(ctx),
            Self::WaitDuration(s) => s.start(ctx),
            Self::HaulItem(s) => s.start(ctx),
            Self::HaulResourceSet(s) => s.start(ctx),
            Self::Guard(s) => s.start(ctx),
        }
    }

    /// Re-check progress on a new tick.
    pub fn poll(&mut self, ctx: &mut JobContext<'_>) -> Step {
        match self {
            Self::SearchForWorker(s) => s.poll(ctx),
            Self::WaitForWorker(s) => s.poll(ctx),
            Self::WalkToPosition(s) => s.poll(ctx),
            Self::WaitDuration(s) => s.poll(ctx),
            Self::HaulItem(s) => s.poll(ctx),
            Self::HaulResourceSet(s) => s.poll(ctx),
            Self::Guard(s) => s.poll(ctx),
        }
    }

    /// React to an external event. Only event-driven states care.
    pub fn signal(&mut self, ctx: &mut JobContext<'_>, signal: &JobSignal) -> Step {
        match self {
            Self::Guard(s) => s.signal(ctx, signal),
            Self::SearchForWorker(_)
            | Self::WaitForWorker(_)
            | Self::WalkToPosition(_)
            | Self::WaitDuration(_)
            | Self::HaulItem(_)
            | Self::HaulResourceSet(_) => Step::Pending,
        }
    }

    /// The state's own final actions, run once before the job moves on.
    pub fn finish(&mut self, ctx: &mut JobContext<'_>) {
        match self {
            Self::WaitDuration(s) => s.finish(ctx),
            Self::Guard(s) => s.finish(ctx),
            Self::SearchForWorker(_)
            | Self::WaitForWorker(_)
            | Self::WalkToPosition(_)
            | Self::HaulItem(_)
            | Self::HaulResourceSet(_) => {}
        }
    }

    /// Release everything the state acquired. Never finishes the state.
    pub fn interrupt(&mut self, ctx: &mut JobContext<'_>) {
        match self {
            Self::SearchForWorker(s) => s.interrupt(ctx),
            Self::WaitForWorker(s) => s.interrupt(ctx),
            Self::WalkToPosition(s) => s.interrupt(ctx),
            Self::WaitDuration(s) => s.interrupt(ctx),
            Self::HaulItem(s) => s.interrupt(ctx),
            Self::HaulResourceSet(s) => s.interrupt(ctx),
            Self::Guard(s) => s.interrupt(ctx),
        }
    }

    /// Human-readable status line.
    pub fn status(&self) -> String {
        match self {
            Self::SearchForWorker(s) => s.status(),
            Self::WaitForWorker(s) => s.status(),
            Self::WalkToPosition(s) => s.status(),
            Self::WaitDuration(s) => s.status(),
            Self::HaulItem(s) => s.status(),
            Self::HaulResourceSet(s) => s.status(),
            Self::Guard(s) => s.status(),
        }
    }
}

impl From<SearchForWorker> for JobState {
    fn from(s: SearchForWorker) -> Self {
        Self::SearchForWorker(s)
    }
}

impl From<WaitForWorker> for JobState {
    fn from(s: WaitForWorker) -> Self {
        Self::WaitForWorker(s)
    }
}

impl From<WalkToPosition> for JobState {
    fn from(s: WalkToPosition) -> Self {
        Self::WalkToPosition(s)
    }
}

impl From<WaitDuration> for JobState {
    fn from(s: WaitDuration) -> Self {
        Self::WaitDuration(s)
    }
}

impl From<HaulItem> for JobState {
    fn from(s: HaulItem) -> Self {
        Self::HaulItem(s)
    }
}

impl From<HaulResourceSet> for JobState {
    fn from(s: HaulResourceSet) -> Self {
        Self::HaulResourceSet(s)
    }
}

impl From<Guard> for JobState {
    fn from(s: Guard) -> Self {
        Self::Guard(s)
    }
}
