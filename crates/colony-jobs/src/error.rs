//! Error types for the `colony-jobs` crate.
//!
//! Expected conditions (no worker, no item, no path) are never errors: they
//! are stalls or interrupts. [`JobError`] covers programming-invariant
//! violations surfaced to the caller, and hard failures that abort job
//! construction.

use colony_types::{Coord, DesignationKind, ItemKind, JobId, PortError, WorkshopId, WorkshopKind};

use crate::state::StateToken;

/// Errors raised by jobs, designations, and the job manager.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    /// `state_done` was called with a state that is not the job's current one.
    #[error("job {job}: state {token} is not the current state")]
    StaleState {
        /// The job.
        job: JobId,
        /// The token that was presented.
        token: StateToken,
    },

    /// The job has already completed or been interrupted.
    #[error("job {0} is already finished")]
    AlreadyFinished(JobId),

    /// No live job with this ID is registered.
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    /// Designations live for the whole session and cannot be cancelled.
    #[error("job {0} is a designation and cannot be cancelled")]
    DesignationNotCancellable(JobId),

    /// The player has no designation of this kind.
    #[error("no designation of kind {0}")]
    UnknownDesignation(DesignationKind),

    /// The cell is not claimed by the designation.
    #[error("{designation} designation does not claim cell {cell}")]
    CellNotClaimed {
        /// The designation kind.
        designation: DesignationKind,
        /// The cell.
        cell: Coord,
    },

    /// No recipe produces this item.
    #[error("no recipe produces {0:?}")]
    UnknownRecipe(ItemKind),

    /// The workshop does not exist.
    #[error("workshop not found: {0}")]
    UnknownWorkshop(WorkshopId),

    /// The workshop is occupied by another craft job.
    #[error("workshop {0} is busy")]
    WorkshopBusy(WorkshopId),

    /// The recipe needs a different kind of workshop.
    #[error("workshop {workshop} is a {found:?}, recipe needs a {expected:?}")]
    WrongWorkshop {
        /// The workshop.
        workshop: WorkshopId,
        /// Kind the recipe needs.
        expected: WorkshopKind,
        /// Kind of the given workshop.
        found: WorkshopKind,
    },

    /// A collaborator refused a mutation.
    #[error(transparent)]
    Port(#[from] PortError),
}
