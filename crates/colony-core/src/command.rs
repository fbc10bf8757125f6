//! Player commands and their application to the simulation state.
//!
//! A [`Command`] is what a player (or the GUI shell acting for one) asks
//! of the colony between ticks. [`apply_command`] validates it against the
//! world, turns it into a designation change or a new job on the player's
//! manager, and returns a [`CommandOutcome`].

use colony_jobs::{
    CraftJob, JobError, JobKind, JobReport, MilitaryStationJob, PickupToolJob, PlaceItemJob,
};
use colony_types::{
    Area, Coord, DesignationKind, ItemCategory, ItemKind, JobId, LaborKind, PlayerId, WorkerId,
    WorkshopId,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::tick::SimulationState;

/// Errors that reject a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The player has no job manager.
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// The worker does not exist.
    #[error("unknown worker: {0}")]
    UnknownWorker(WorkerId),

    /// The worker belongs to another player.
    #[error("worker {worker} does not belong to player {player}")]
    NotYourWorker {
        /// The worker.
        worker: WorkerId,
        /// The commanding player.
        player: PlayerId,
    },

    /// The worker lacks a labor the command needs.
    #[error("worker {worker} is not enabled for {labor}")]
    MissingLabor {
        /// The worker.
        worker: WorkerId,
        /// The labor.
        labor: LaborKind,
    },

    /// Only tools can be picked up as equipment.
    #[error("{0:?} is not a tool")]
    NotATool(ItemKind),

    /// The job framework refused.
    #[error("job error: {source}")]
    Job {
        /// The underlying job error.
        #[from]
        source: JobError,
    },
}

/// A player's request to the colony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Paint an area into a designation.
    Designate {
        /// Designation kind.
        kind: DesignationKind,
        /// Cells to add.
        area: Area,
    },
    /// Erase an area from a designation.
    Undesignate {
        /// Designation kind.
        kind: DesignationKind,
        /// Cells to remove.
        area: Area,
    },
    /// Craft one batch at a workshop.
    Craft {
        /// The workshop.
        workshop: WorkshopId,
        /// What to make.
        output: ItemKind,
    },
    /// Install an item of a kind on a cell.
    PlaceItem {
        /// Kind of item to install.
        kind: ItemKind,
        /// Where.
        cell: Coord,
    },
    /// Have a worker equip a tool.
    PickupTool {
        /// The worker.
        worker: WorkerId,
        /// Tool kind.
        tool: ItemKind,
    },
    /// Station a soldier at a cell.
    StationSoldier {
        /// The soldier.
        soldier: WorkerId,
        /// Guard post.
        station: Coord,
    },
    /// Cancel a standalone job.
    CancelJob {
        /// The job.
        job: JobId,
    },
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Newly claimed cells.
    Designated {
        /// Number of cells claimed.
        claimed: usize,
    },
    /// Jobs interrupted by the removal.
    Undesignated {
        /// Their reports.
        reports: Vec<JobReport>,
    },
    /// A job was added to the player's manager.
    JobAdded(JobId),
    /// The job was cancelled.
    JobCancelled(JobReport),
}

/// Apply `command` on behalf of `player`.
///
/// # Errors
///
/// Returns [`CommandError`] if the player, worker, or request is invalid,
/// or the job framework rejects it.
pub fn apply_command(
    state: &mut SimulationState,
    player: PlayerId,
    command: Command,
) -> Result<CommandOutcome, CommandError> {
    let tick = state.clock.tick();
    if !state.managers.contains_key(&player) {
        return Err(CommandError::UnknownPlayer(player));
    }
    let kind = match command {
        Command::Designate { kind, area } => {
            let manager = state
                .managers
                .get_mut(&player)
                .ok_or(CommandError::UnknownPlayer(player))?;
            let mut ctx = state.world.context(tick, &state.job_config);
            let claimed = manager.designate(&mut ctx, kind, area)?;
            return Ok(CommandOutcome::Designated { claimed });
        }
        Command::Undesignate { kind, area } => {
            let manager = state
                .managers
                .get_mut(&player)
                .ok_or(CommandError::UnknownPlayer(player))?;
            let mut ctx = state.world.context(tick, &state.job_config);
            let reports = manager.undesignate(&mut ctx, kind, area)?;
            state.settle_reports(&reports);
            return Ok(CommandOutcome::Undesignated { reports });
        }
        Command::CancelJob { job } => {
            let manager = state
                .managers
                .get_mut(&player)
                .ok_or(CommandError::UnknownPlayer(player))?;
            let mut ctx = state.world.context(tick, &state.job_config);
            let report = manager.interrupt_job(&mut ctx, job, "cancelled by player")?;
            state.settle_reports(std::slice::from_ref(&report));
            return Ok(CommandOutcome::JobCancelled(report));
        }
        Command::Craft { workshop, output } => {
            let mut ctx = state.world.context(tick, &state.job_config);
            JobKind::Craft(CraftJob::new(&mut ctx, player, workshop, output)?)
        }
        Command::PlaceItem { kind, cell } => {
            JobKind::PlaceItem(PlaceItemJob::new(player, kind, cell))
        }
        Command::PickupTool { worker, tool } => {
            check_worker(state, player, worker, None)?;
            if tool.category() != ItemCategory::Tool {
                return Err(CommandError::NotATool(tool));
            }
            JobKind::PickupTool(PickupToolJob::new(player, worker, tool))
        }
        Command::StationSoldier { soldier, station } => {
            check_worker(state, player, soldier, Some(LaborKind::Military))?;
            JobKind::MilitaryStation(MilitaryStationJob::new(player, soldier, station))
        }
    };
    let tag = kind.tag();
    let manager = state
        .managers
        .get_mut(&player)
        .ok_or(CommandError::UnknownPlayer(player))?;
    let mut ctx = state.world.context(tick, &state.job_config);
    let job = manager.add_job(&mut ctx, kind);
    info!(player = %player, job = %job, kind = ?tag, "job ordered");
    Ok(CommandOutcome::JobAdded(job))
}

fn check_worker(
    state: &SimulationState,
    player: PlayerId,
    worker: WorkerId,
    labor: Option<LaborKind>,
) -> Result<(), CommandError> {
    let w = state
        .world
        .roster
        .get(worker)
        .ok_or(CommandError::UnknownWorker(worker))?;
    if w.owner != player {
        return Err(CommandError::NotYourWorker { worker, player });
    }
    if let Some(labor) = labor.filter(|l| !w.labors.contains(l)) {
        return Err(CommandError::MissingLabor { worker, labor });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use colony_types::{ConstructionKind, Coord};

    use super::*;

    #[test]
    fn commands_use_a_type_tag_on_the_wire() {
        let json = r#"{
            "type": "designate",
            "kind": "Mine",
            "area": {"min": {"x": 1, "y": 2, "z": 0}, "max": {"x": 3, "y": 2, "z": 0}}
        }"#;
        let command: Command = serde_json::from_str(json).unwrap();
        assert_eq!(
            command,
            Command::Designate {
                kind: DesignationKind::Mine,
                area: Area::new(Coord::new(1, 2, 0), Coord::new(3, 2, 0)),
            }
        );
    }

    #[test]
    fn construct_designations_round_trip() {
        let command = Command::Undesignate {
            kind: DesignationKind::Construct(ConstructionKind::Wall),
            area: Area::cell(Coord::new(0, 0, 0)),
        };
        let json = serde_json::to_string(&command).unwrap();
        assert!(json.contains(r#""type":"undesignate""#));
        assert_eq!(serde_json::from_str::<Command>(&json).unwrap(), command);
    }
}
