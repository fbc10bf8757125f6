//! Workers, skills, and movement for the Colony simulation.
//!
//! This crate is the reference worker collaborator: everything the job
//! framework asks of a worker (claim flag, labors, movement, skills,
//! equipment) is answered by [`WorkerRoster`] through the
//! [`Workforce`](colony_types::Workforce) trait.
//!
//! # Modules
//!
//! - [`config`] -- Tunables for needs and movement ([`WorkerConfig`])
//! - [`error`] -- Error types for roster operations ([`AgentError`])
//! - [`roster`] -- The roster and its per-tick mechanics ([`WorkerRoster`])
//! - [`skills`] -- Per-labor skill levels ([`SkillSet`])
//! - [`worker`] -- A single worker and its movement order ([`Worker`])

pub mod config;
pub mod error;
pub mod roster;
pub mod skills;
pub mod worker;

// Re-export primary types at crate root for convenience.
pub use config::WorkerConfig;
pub use error::AgentError;
pub use roster::WorkerRoster;
pub use skills::{MAX_SKILL_LEVEL, SkillSet};
pub use worker::{Movement, MovementState, Worker};
