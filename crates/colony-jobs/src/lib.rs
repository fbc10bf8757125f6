//! Job framework for the Colony simulation.
//!
//! A [`Job`] is a chain of reusable [`JobState`] primitives (search for a
//! worker, walk, wait, haul, guard). Each job kind decides which state
//! follows which; the job itself drives the transitions, stamps each state
//! with a [`StateToken`], and reports its outcome to [`JobListener`]s.
//! [`Designation`]s turn painted areas into one job per eligible cell, and
//! the per-player [`JobManager`] forwards ticks and signals to everything
//! it holds.
//!
//! The framework reaches the rest of the world only through the
//! collaborator ports in `colony_types::ports`, bundled per call in a
//! [`JobContext`].
//!
//! # Modules
//!
//! - [`config`] -- Job durations and tunables
//! - [`context`] -- The collaborator bundle jobs are driven with
//! - [`designation`] -- Area designations owning per-cell jobs
//! - [`error`] -- Error types for job operations
//! - [`job`] -- The job driver
//! - [`kinds`] -- Concrete job kinds and the recipe table
//! - [`listener`] -- Listener traits and copy-on-write listener sets
//! - [`manager`] -- The per-player job manager
//! - [`report`] -- Job outcomes and completion reports
//! - [`state`] -- The state primitives
//! - [`timer`] -- Reference timer queue

pub mod config;
pub mod context;
pub mod designation;
pub mod error;
pub mod job;
pub mod kinds;
pub mod listener;
pub mod manager;
pub mod report;
pub mod state;
pub mod timer;

pub use config::JobConfig;
pub use context::JobContext;
pub use designation::Designation;
pub use error::JobError;
pub use job::Job;
pub use kinds::{
    BuildJob, ChopTreeJob, CraftJob, JobKind, MilitaryStationJob, MineJob, PickupToolJob,
    PlaceItemJob, PlantJob, RECIPES, Recipe, SleepJob, Transition, recipe_for,
};
pub use listener::{JobListener, JobManagerListener, ListenerSet};
pub use manager::JobManager;
pub use report::{JobOutcome, JobReport};
pub use state::{
    Guard, HaulItem, HaulResourceSet, JobSignal, JobState, SearchForWorker, StateToken, Step,
    WaitDuration, WaitForWorker, WalkToPosition,
};
pub use timer::TimerQueue;
