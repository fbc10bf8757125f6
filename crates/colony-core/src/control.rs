//! Shared run control for the simulation loop.
//!
//! [`RunControl`] is wrapped in an `Arc` and shared between the tick loop
//! and whatever drives it (the binary's signal handler, a GUI shell). It
//! carries the pause and stop flags, the runtime-adjustable tick interval,
//! and a queue of player commands applied before the next tick.
//!
//! All flags are atomics so the tick loop reads them without locking.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use colony_types::PlayerId;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

use crate::command::Command;
use crate::config::SimulationBoundsConfig;

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// A stop was requested.
    Stopped,
}

/// Pause, stop, pacing, and queued commands for one run.
#[derive(Debug)]
pub struct RunControl {
    paused: AtomicBool,
    resume_notify: Notify,
    stop_requested: AtomicBool,
    tick_interval_ms: AtomicU64,
    max_ticks: u64,
    started_at: DateTime<Utc>,
    commands: Mutex<Vec<(PlayerId, Command)>>,
}

impl RunControl {
    /// Control for a run of at most `max_ticks` ticks (0 = unlimited).
    pub fn new(max_ticks: u64, tick_interval_ms: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            max_ticks,
            started_at: Utc::now(),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Control from the configured bounds.
    pub fn from_bounds(bounds: &SimulationBoundsConfig) -> Self {
        Self::new(bounds.max_ticks, bounds.tick_interval_ms)
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Whether the loop is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the loop before its next tick.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume a paused loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the loop is resumed or asked to stop.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Ask the loop to stop before its next tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        // A paused loop must wake up to see the request.
        self.resume_notify.notify_one();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    // -----------------------------------------------------------------------
    // Pacing and bounds
    // -----------------------------------------------------------------------

    /// Milliseconds to sleep between ticks.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Change the pacing. Returns the previous interval.
    pub fn set_tick_interval_ms(&self, ms: u64) -> u64 {
        self.tick_interval_ms.swap(ms, Ordering::AcqRel)
    }

    /// Configured tick limit (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Whether `ticks_run` reaches the limit.
    pub const fn tick_limit_reached(&self, ticks_run: u64) -> bool {
        self.max_ticks > 0 && ticks_run >= self.max_ticks
    }

    /// When the control was created.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Queue a command for the next tick.
    pub async fn queue_command(&self, player: PlayerId, command: Command) {
        self.commands.lock().await.push((player, command));
    }

    /// Take every queued command, in arrival order.
    pub async fn drain_commands(&self) -> Vec<(PlayerId, Command)> {
        std::mem::take(&mut *self.commands.lock().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_flag_round_trips() {
        let control = RunControl::new(0, 0);
        assert!(!control.is_stop_requested());
        control.request_stop();
        assert!(control.is_stop_requested());
    }

    #[test]
    fn unlimited_ticks_never_reach_the_limit() {
        let control = RunControl::new(0, 0);
        assert!(!control.tick_limit_reached(u64::MAX));
        let bounded = RunControl::new(5, 0);
        assert!(!bounded.tick_limit_reached(4));
        assert!(bounded.tick_limit_reached(5));
    }

    #[test]
    fn interval_is_adjustable() {
        let control = RunControl::new(0, 1000);
        assert_eq!(control.set_tick_interval_ms(250), 1000);
        assert_eq!(control.tick_interval_ms(), 250);
    }

    #[tokio::test]
    async fn commands_drain_in_order() {
        let control = RunControl::new(0, 0);
        let player = PlayerId::new();
        control
            .queue_command(player, Command::CancelJob { job: colony_types::JobId::new() })
            .await;
        control
            .queue_command(player, Command::CancelJob { job: colony_types::JobId::new() })
            .await;
        assert_eq!(control.drain_commands().await.len(), 2);
        assert!(control.drain_commands().await.is_empty());
    }

    #[tokio::test]
    async fn resume_wakes_a_paused_wait() {
        let control = std::sync::Arc::new(RunControl::new(0, 0));
        control.pause();
        let waiter = {
            let control = std::sync::Arc::clone(&control);
            tokio::spawn(async move { control.wait_if_paused().await })
        };
        tokio::task::yield_now().await;
        control.resume();
        assert!(waiter.await.is_ok());
        assert!(!control.is_paused());
    }
}
