//! The per-player job manager.
//!
//! The manager's list holds the player's designations first (created once,
//! never removed) followed by the live standalone jobs in insertion order.
//! Listener indices refer to positions in that list. The manager knows no
//! job kind: it forwards ticks and signals, drops finished jobs, and tells
//! its listeners.

use std::sync::Arc;

use colony_types::{Area, DesignationKind, JobId, JobSummary, PlayerId};
use tracing::{debug, info};

use crate::context::JobContext;
use crate::designation::Designation;
use crate::error::JobError;
use crate::job::Job;
use crate::kinds::JobKind;
use crate::listener::{JobListener, JobManagerListener, ListenerSet};
use crate::report::JobReport;
use crate::state::JobSignal;

/// A player's designations and live jobs.
#[derive(Debug)]
pub struct JobManager {
    owner: PlayerId,
    designations: Vec<Designation>,
    jobs: Vec<Job>,
    listeners: ListenerSet<dyn JobManagerListener>,
    job_listeners: ListenerSet<dyn JobListener>,
    finished: Vec<JobReport>,
}

impl JobManager {
    /// A manager holding the standard designation set.
    pub fn new(owner: PlayerId) -> Self {
        let designations = DesignationKind::STANDARD
            .iter()
            .map(|&kind| Designation::new(owner, kind))
            .collect();
        Self {
            owner,
            designations,
            jobs: Vec::new(),
            listeners: ListenerSet::new(),
            job_listeners: ListenerSet::new(),
            finished: Vec::new(),
        }
    }

    /// The player this manager works for.
    pub const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Number of entries (designations and jobs).
    pub fn len(&self) -> usize {
        self.designations.len().saturating_add(self.jobs.len())
    }

    /// Whether the list is empty. Never true once designations exist.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live standalone jobs, in insertion order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// A live standalone job, or a live cell job of a designation.
    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id() == id).or_else(|| {
            self.designations
                .iter()
                .flat_map(Designation::jobs)
                .find(|j| j.id() == id)
        })
    }

    /// The designations, in list order.
    pub fn designations(&self) -> impl Iterator<Item = &Designation> {
        self.designations.iter()
    }

    /// The designation of `kind`.
    pub fn designation(&self, kind: DesignationKind) -> Option<&Designation> {
        self.designations.iter().find(|d| d.kind() == kind)
    }

    /// Summaries of every entry, in list order.
    pub fn summaries(&self) -> Vec<JobSummary> {
        self.designations
            .iter()
            .map(Designation::summary)
            .chain(self.jobs.iter().map(Job::summary))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------

    /// Register a list listener. It is told about every existing entry first.
    pub fn add_listener(&self, listener: Arc<dyn JobManagerListener>) {
        for (index, summary) in self.summaries().iter().enumerate() {
            listener.on_added(summary, index);
        }
        self.listeners.add(listener);
    }

    /// Unregister a list listener.
    pub fn remove_listener(&self, listener: &Arc<dyn JobManagerListener>) -> bool {
        self.listeners.remove(listener)
    }

    /// Attach a completion listener to every job started from now on,
    /// designation cell jobs included.
    pub fn add_job_listener(&self, listener: Arc<dyn JobListener>) {
        for designation in &self.designations {
            designation.add_cell_listener(Arc::clone(&listener));
        }
        self.job_listeners.add(listener);
    }

    fn job_index(&self, position: usize) -> usize {
        self.designations.len().saturating_add(position)
    }

    fn notify_removed(&self, summary: &JobSummary, index: usize) {
        self.listeners.notify(|l| l.on_removed(summary, index));
    }

    // -----------------------------------------------------------------------
    // Jobs
    // -----------------------------------------------------------------------

    /// Append a job, tell listeners, and start it.
    ///
    /// A job that ends while starting is removed again at once; its report
    /// is returned by the next [`on_tick`](Self::on_tick).
    pub fn add_job(&mut self, ctx: &mut JobContext<'_>, kind: JobKind) -> JobId {
        let job = Job::new(kind);
        let id = job.id();
        for listener in self.job_listeners.snapshot().iter() {
            job.add_listener(Arc::clone(listener));
        }
        let position = self.jobs.len();
        let index = self.job_index(position);
        let summary = job.summary();
        self.jobs.push(job);
        self.listeners.notify(|l| l.on_added(&summary, index));
        debug!(job = %id, kind = ?summary.kind, index, "job added");

        let report = self.jobs.get_mut(position).and_then(|job| job.start(ctx));
        if let Some(report) = report {
            self.jobs.remove(position);
            self.notify_removed(&report.summary, index);
            self.finished.push(report);
        }
        id
    }

    /// Advance every designation and job one tick.
    ///
    /// Returns the reports of every job that ended since the last call.
    pub fn on_tick(&mut self, ctx: &mut JobContext<'_>) -> Vec<JobReport> {
        let mut reports = std::mem::take(&mut self.finished);
        for designation in &mut self.designations {
            reports.extend(designation.on_tick(ctx));
        }
        let mut position = 0_usize;
        while let Some(job) = self.jobs.get_mut(position) {
            let report = job.tick(ctx);
            position = self.settle(position, report, &mut reports);
        }
        reports
    }

    /// Forward an external event to every designation and job.
    pub fn broadcast(&mut self, ctx: &mut JobContext<'_>, signal: &JobSignal) -> Vec<JobReport> {
        let mut reports = Vec::new();
        for designation in &mut self.designations {
            reports.extend(designation.signal(ctx, signal));
        }
        let mut position = 0_usize;
        while let Some(job) = self.jobs.get_mut(position) {
            let report = job.signal(ctx, signal);
            position = self.settle(position, report, &mut reports);
        }
        reports
    }

    /// Drop the job at `position` if it ended; returns the next position.
    fn settle(
        &mut self,
        position: usize,
        report: Option<JobReport>,
        reports: &mut Vec<JobReport>,
    ) -> usize {
        let finished = self.jobs.get(position).is_some_and(Job::is_finished);
        if !finished {
            return position.saturating_add(1);
        }
        let job = self.jobs.remove(position);
        self.notify_removed(&job.summary(), self.job_index(position));
        if let Some(report) = report {
            reports.push(report);
        }
        position
    }

    /// Cancel a standalone job.
    ///
    /// # Errors
    ///
    /// - [`JobError::DesignationNotCancellable`] if `id` names a designation
    /// - [`JobError::JobNotFound`] if no live job has this ID
    pub fn interrupt_job(
        &mut self,
        ctx: &mut JobContext<'_>,
        id: JobId,
        reason: &str,
    ) -> Result<JobReport, JobError> {
        if self.designations.iter().any(|d| d.id() == id) {
            return Err(JobError::DesignationNotCancellable(id));
        }
        let position = self
            .jobs
            .iter()
            .position(|j| j.id() == id)
            .ok_or(JobError::JobNotFound(id))?;
        let mut job = self.jobs.remove(position);
        let report = job.interrupt(ctx, reason)?;
        self.notify_removed(&report.summary, self.job_index(position));
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Designations
    // -----------------------------------------------------------------------

    fn designation_mut(&mut self, kind: DesignationKind) -> Result<&mut Designation, JobError> {
        self.designations
            .iter_mut()
            .find(|d| d.kind() == kind)
            .ok_or(JobError::UnknownDesignation(kind))
    }

    /// Grow the designation of `kind` by `area`.
    ///
    /// # Errors
    ///
    /// [`JobError::UnknownDesignation`] if the player has none of that kind.
    pub fn designate(
        &mut self,
        ctx: &mut JobContext<'_>,
        kind: DesignationKind,
        area: Area,
    ) -> Result<usize, JobError> {
        let claimed = self.designation_mut(kind)?.grow(ctx, area);
        info!(owner = %self.owner, designation = %kind, claimed, "area designated");
        Ok(claimed)
    }

    /// Shrink the designation of `kind` by `area`.
    ///
    /// # Errors
    ///
    /// [`JobError::UnknownDesignation`] if the player has none of that kind.
    pub fn undesignate(
        &mut self,
        ctx: &mut JobContext<'_>,
        kind: DesignationKind,
        area: Area,
    ) -> Result<Vec<JobReport>, JobError> {
        Ok(self.designation_mut(kind)?.shrink(ctx, area))
    }

    /// Re-check every claimed cell of every designation.
    pub fn revalidate(&mut self, ctx: &mut JobContext<'_>) -> Vec<JobReport> {
        let mut reports = Vec::new();
        for designation in &mut self.designations {
            reports.extend(designation.revalidate(ctx));
        }
        reports
    }
}
