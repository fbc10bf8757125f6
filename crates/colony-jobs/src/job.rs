//! A single job: one kind, one current state, one outcome.
//!
//! The job owns its current [`JobState`] and drives every transition
//! itself. A state that reports [`Step::Finished`] gets its final actions
//! run, is handed to the job's kind to pick a successor, and the successor
//! is started right away, so zero-duration states chain within one call.
//! A state that reports [`Step::Abort`] interrupts the job. A state that
//! reports [`Step::WorkerLost`] is interrupted and the kind decides what
//! comes next, usually searching for another worker.

use std::ops::ControlFlow;
use std::sync::Arc;

use chrono::Utc;
use colony_types::{JobId, JobSummary, PlayerId};
use tracing::{debug, info, warn};

use crate::context::JobContext;
use crate::error::JobError;
use crate::kinds::{JobKind, Transition};
use crate::listener::{JobListener, ListenerSet};
use crate::report::{JobOutcome, JobReport};
use crate::state::{JobSignal, JobState, StateToken, Step};

/// A unit of work driven by a chain of states.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    kind: JobKind,
    state: Option<JobState>,
    token: StateToken,
    started: bool,
    outcome: Option<JobOutcome>,
    listeners: ListenerSet<dyn JobListener>,
}

impl Job {
    /// Create a job. It does nothing until started.
    pub fn new(kind: JobKind) -> Self {
        Self {
            id: JobId::new(),
            kind,
            state: None,
            token: StateToken::default(),
            started: false,
            outcome: None,
            listeners: ListenerSet::new(),
        }
    }

    /// Job identifier.
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Player the job works for.
    pub const fn owner(&self) -> PlayerId {
        self.kind.owner()
    }

    /// The job's kind and everything it holds.
    pub const fn kind(&self) -> &JobKind {
        &self.kind
    }

    /// Whether the job completed or was interrupted.
    pub const fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// How the job ended, once it has.
    pub const fn outcome(&self) -> Option<&JobOutcome> {
        self.outcome.as_ref()
    }

    /// Token of the current state.
    pub const fn current_token(&self) -> StateToken {
        self.token
    }

    /// The current state, while the job runs.
    pub const fn state(&self) -> Option<&JobState> {
        self.state.as_ref()
    }

    /// Name of the current state, while the job runs.
    pub fn state_name(&self) -> Option<&'static str> {
        self.state.as_ref().map(JobState::name)
    }

    /// Human-readable status line.
    pub fn status(&self) -> String {
        match (&self.outcome, &self.state) {
            (Some(JobOutcome::Completed), _) => "Completed".to_owned(),
            (Some(JobOutcome::Interrupted { reason }), _) => format!("Interrupted: {reason}"),
            (None, Some(state)) => state.status(),
            (None, None) => "Not started".to_owned(),
        }
    }

    /// Snapshot for listeners.
    pub fn summary(&self) -> JobSummary {
        JobSummary {
            id: self.id,
            owner: self.owner(),
            kind: self.kind.tag(),
            position: self.kind.position(),
            status: self.status(),
            finished: self.is_finished(),
        }
    }

    /// Register a completion listener.
    pub fn add_listener(&self, listener: Arc<dyn JobListener>) {
        self.listeners.add(listener);
    }

    /// Unregister a completion listener.
    pub fn remove_listener(&self, listener: &Arc<dyn JobListener>) -> bool {
        self.listeners.remove(listener)
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Enter the first state. Does nothing if the job already started.
    ///
    /// Returns the report if the job finished during the call.
    pub fn start(&mut self, ctx: &mut JobContext<'_>) -> Option<JobReport> {
        if self.started || self.is_finished() {
            return None;
        }
        self.started = true;
        let mut first = self.kind.first_state(ctx);
        debug!(job = %self.id, kind = ?self.kind.tag(), state = first.name(), "job started");
        let step = first.start(ctx);
        self.state = Some(first);
        self.run(ctx, step)
    }

    /// Advance one tick: start the job if needed, otherwise poll its state.
    pub fn tick(&mut self, ctx: &mut JobContext<'_>) -> Option<JobReport> {
        if self.is_finished() {
            return None;
        }
        if !self.started {
            return self.start(ctx);
        }
        let step = self.state.as_mut()?.poll(ctx);
        self.run(ctx, step)
    }

    /// Forward an external event to the current state.
    pub fn signal(&mut self, ctx: &mut JobContext<'_>, signal: &JobSignal) -> Option<JobReport> {
        if self.is_finished() {
            return None;
        }
        let step = self.state.as_mut()?.signal(ctx, signal);
        self.run(ctx, step)
    }

    /// Report that the state stamped `token` is done, and move on.
    ///
    /// # Errors
    ///
    /// - [`JobError::AlreadyFinished`] if the job has ended
    /// - [`JobError::StaleState`] if `token` is not the current state's
    pub fn state_done(
        &mut self,
        ctx: &mut JobContext<'_>,
        token: StateToken,
    ) -> Result<Option<JobReport>, JobError> {
        if self.is_finished() {
            return Err(JobError::AlreadyFinished(self.id));
        }
        if self.state.is_none() || token != self.token {
            return Err(JobError::StaleState { job: self.id, token });
        }
        Ok(self.run(ctx, Step::Finished))
    }

    /// Cancel the job, releasing everything it holds.
    ///
    /// # Errors
    ///
    /// [`JobError::AlreadyFinished`] if the job has already ended; nothing
    /// is released a second time.
    pub fn interrupt(
        &mut self,
        ctx: &mut JobContext<'_>,
        reason: &str,
    ) -> Result<JobReport, JobError> {
        if self.is_finished() {
            return Err(JobError::AlreadyFinished(self.id));
        }
        info!(job = %self.id, kind = ?self.kind.tag(), reason, "job interrupted");
        Ok(self.release_and_report(ctx, reason.to_owned()))
    }

    fn run(&mut self, ctx: &mut JobContext<'_>, mut step: Step) -> Option<JobReport> {
        loop {
            match step {
                Step::Pending => return None,
                Step::Abort(reason) => return Some(self.abort(ctx, reason)),
                Step::WorkerLost(worker) => {
                    let mut lost = self.state.take()?;
                    lost.interrupt(ctx);
                    let from = lost.name();
                    warn!(job = %self.id, worker = %worker, state = from, "claimed worker lost");
                    let transition = self.kind.on_worker_lost(ctx, worker);
                    match self.enter(ctx, from, transition) {
                        ControlFlow::Continue(next) => step = next,
                        ControlFlow::Break(report) => return Some(report),
                    }
                }
                Step::Finished => {
                    let mut finished = self.state.take()?;
                    finished.finish(ctx);
                    let from = finished.name();
                    let transition = self.kind.on_state_done(ctx, finished);
                    match self.enter(ctx, from, transition) {
                        ControlFlow::Continue(next) => step = next,
                        ControlFlow::Break(report) => return Some(report),
                    }
                }
            }
        }
    }

    /// Apply a transition: enter the next state, or end the job.
    fn enter(
        &mut self,
        ctx: &mut JobContext<'_>,
        from: &'static str,
        transition: Transition,
    ) -> ControlFlow<JobReport, Step> {
        match transition {
            Transition::Next(mut next) => {
                self.token = self.token.next();
                debug!(
                    job = %self.id,
                    from,
                    to = next.name(),
                    token = %self.token,
                    "state transition"
                );
                let step = next.start(ctx);
                self.state = Some(next);
                ControlFlow::Continue(step)
            }
            Transition::Complete => ControlFlow::Break(self.complete(ctx)),
            Transition::Abort(reason) => ControlFlow::Break(self.abort(ctx, reason)),
        }
    }

    fn abort(&mut self, ctx: &mut JobContext<'_>, reason: String) -> JobReport {
        warn!(
            job = %self.id,
            kind = ?self.kind.tag(),
            state = self.state_name().unwrap_or("none"),
            reason = %reason,
            "job aborted"
        );
        self.release_and_report(ctx, reason)
    }

    fn release_and_report(&mut self, ctx: &mut JobContext<'_>, reason: String) -> JobReport {
        if let Some(mut state) = self.state.take() {
            state.interrupt(ctx);
        }
        self.kind.on_interrupt(ctx);
        self.finish_with(ctx.tick, JobOutcome::Interrupted { reason })
    }

    fn complete(&mut self, ctx: &JobContext<'_>) -> JobReport {
        info!(job = %self.id, kind = ?self.kind.tag(), tick = ctx.tick, "job completed");
        self.finish_with(ctx.tick, JobOutcome::Completed)
    }

    fn finish_with(&mut self, tick: u64, outcome: JobOutcome) -> JobReport {
        self.outcome = Some(outcome.clone());
        let report = JobReport {
            summary: self.summary(),
            outcome,
            finished_at_tick: tick,
            recorded_at: Utc::now(),
        };
        self.listeners.notify(|l| l.on_done(&report));
        report
    }
}
