//! Designations: painted areas that own one job per eligible cell.
//!
//! A designation is itself a job in the manager's list (it has an ID and a
//! summary) but it never finishes. Growing it claims cells and starts their
//! jobs. Shrinking it interrupts them. A cell whose job ends for any reason
//! leaves the claimed set and is not recreated.

use std::collections::BTreeMap;
use std::sync::Arc;

use colony_types::{Area, Coord, DesignationKind, JobId, JobKindTag, JobSummary, PlayerId};
use tracing::{debug, error, info};

use crate::context::JobContext;
use crate::error::JobError;
use crate::job::Job;
use crate::kinds::JobKind;
use crate::listener::{JobListener, ListenerSet};
use crate::report::JobReport;
use crate::state::JobSignal;

/// Reason given to jobs whose cell is removed from the area.
pub const REMOVED_REASON: &str = "designation removed";

/// Reason given to jobs whose cell no longer qualifies.
pub const INVALID_REASON: &str = "designated cell is no longer valid";

/// A player's area of one designation kind.
#[derive(Debug)]
pub struct Designation {
    id: JobId,
    owner: PlayerId,
    kind: DesignationKind,
    cells: BTreeMap<Coord, Job>,
    cell_listeners: ListenerSet<dyn JobListener>,
    finished: Vec<JobReport>,
}

impl Designation {
    /// An empty designation.
    pub fn new(owner: PlayerId, kind: DesignationKind) -> Self {
        Self {
            id: JobId::new(),
            owner,
            kind,
            cells: BTreeMap::new(),
            cell_listeners: ListenerSet::new(),
            finished: Vec::new(),
        }
    }

    /// Designation identifier.
    pub const fn id(&self) -> JobId {
        self.id
    }

    /// Player the designation belongs to.
    pub const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// Designation kind.
    pub const fn kind(&self) -> DesignationKind {
        self.kind
    }

    /// Claimed cells, in order.
    pub fn claimed_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.keys().copied()
    }

    /// Number of claimed cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is claimed.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The live job on `cell`.
    pub fn job_at(&self, cell: Coord) -> Option<&Job> {
        self.cells.get(&cell)
    }

    /// Live per-cell jobs, in cell order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.cells.values()
    }

    /// Snapshot for listeners.
    pub fn summary(&self) -> JobSummary {
        JobSummary {
            id: self.id,
            owner: self.owner,
            kind: JobKindTag::Designation(self.kind),
            position: None,
            status: format!("{}: {} cells", self.kind, self.cells.len()),
            finished: false,
        }
    }

    /// Attach a listener to every cell job created from now on.
    pub fn add_cell_listener(&self, listener: Arc<dyn JobListener>) {
        self.cell_listeners.add(listener);
    }

    /// Claim every valid, unclaimed cell of `area` and start its job.
    ///
    /// Returns the number of newly claimed cells. Cells off the map are
    /// ignored without being visited.
    pub fn grow(&mut self, ctx: &mut JobContext<'_>, area: Area) -> usize {
        let Some(area) = area.intersect(ctx.terrain.bounds()) else {
            return 0;
        };
        let mut claimed = 0_usize;
        for cell in area.cells() {
            if self.cells.contains_key(&cell)
                || !ctx.terrain.is_valid_for_designation(self.kind, cell)
            {
                continue;
            }
            let mut job = Job::new(JobKind::for_designation(self.kind, self.owner, cell));
            for listener in self.cell_listeners.snapshot().iter() {
                job.add_listener(Arc::clone(listener));
            }
            claimed = claimed.saturating_add(1);
            match job.start(ctx) {
                Some(report) => self.finished.push(report),
                None => {
                    self.cells.insert(cell, job);
                }
            }
        }
        if claimed > 0 {
            info!(designation = %self.kind, owner = %self.owner, claimed, "designation grown");
        }
        claimed
    }

    /// Release every claimed cell of `area`, interrupting its job.
    pub fn shrink(&mut self, ctx: &mut JobContext<'_>, area: Area) -> Vec<JobReport> {
        let removed: Vec<Coord> = self
            .cells
            .keys()
            .copied()
            .filter(|&cell| area.contains(cell))
            .collect();
        let mut reports = Vec::with_capacity(removed.len());
        for cell in removed {
            match self.interrupt_cell(ctx, cell, REMOVED_REASON) {
                Ok(report) => reports.push(report),
                Err(err) => error!(designation = %self.kind, cell = %cell, error = %err, "shrink failed"),
            }
        }
        if !reports.is_empty() {
            info!(designation = %self.kind, removed = reports.len(), "designation shrunk");
        }
        reports
    }

    /// Interrupt the job on one claimed cell and drop the cell.
    ///
    /// # Errors
    ///
    /// [`JobError::CellNotClaimed`] if the cell is not (or no longer) claimed.
    pub fn interrupt_cell(
        &mut self,
        ctx: &mut JobContext<'_>,
        cell: Coord,
        reason: &str,
    ) -> Result<JobReport, JobError> {
        let mut job = self.cells.remove(&cell).ok_or(JobError::CellNotClaimed {
            designation: self.kind,
            cell,
        })?;
        job.interrupt(ctx, reason)
    }

    /// Drop claimed cells that no longer qualify, interrupting their jobs.
    pub fn revalidate(&mut self, ctx: &mut JobContext<'_>) -> Vec<JobReport> {
        let invalid: Vec<Coord> = self
            .cells
            .keys()
            .copied()
            .filter(|&cell| !ctx.terrain.is_valid_for_designation(self.kind, cell))
            .collect();
        let mut reports = Vec::with_capacity(invalid.len());
        for cell in invalid {
            debug!(designation = %self.kind, cell = %cell, "designated cell invalidated");
            if let Ok(report) = self.interrupt_cell(ctx, cell, INVALID_REASON) {
                reports.push(report);
            }
        }
        reports
    }

    /// Advance every cell job one tick, dropping cells whose job ended.
    pub fn on_tick(&mut self, ctx: &mut JobContext<'_>) -> Vec<JobReport> {
        let mut reports = std::mem::take(&mut self.finished);
        self.cells.retain(|_, job| {
            if let Some(report) = job.tick(ctx) {
                reports.push(report);
            }
            !job.is_finished()
        });
        reports
    }

    /// Forward an external event to every cell job.
    pub fn signal(&mut self, ctx: &mut JobContext<'_>, signal: &JobSignal) -> Vec<JobReport> {
        let mut reports = Vec::new();
        self.cells.retain(|_, job| {
            if let Some(report) = job.signal(ctx, signal) {
                reports.push(report);
            }
            !job.is_finished()
        });
        reports
    }
}
