//! World clock, configuration, commands, and the tick loop for the Colony
//! simulation.
//!
//! This crate wires the job framework to the reference collaborators and
//! drives them: one tick at a time through [`tick::run_tick`], or bounded
//! and paced through the async [`runner::run_simulation`].
//!
//! # Modules
//!
//! - [`clock`] -- Tick counter with derived hour of day and day number.
//! - [`command`] -- Player commands and [`apply_command`](command::apply_command).
//! - [`config`] -- Configuration loading from `colony-config.yaml`.
//! - [`control`] -- Shared pause, stop, pacing, and command queue.
//! - [`runner`] -- The async simulation loop.
//! - [`tick`] -- The six-phase tick cycle and [`SimulationState`](tick::SimulationState).
//! - [`world`] -- The collaborator bundle ([`ColonyWorld`](world::ColonyWorld)).

pub mod clock;
pub mod command;
pub mod config;
pub mod control;
pub mod runner;
pub mod tick;
pub mod world;
