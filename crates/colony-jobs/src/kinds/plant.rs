//! Farming: plant bare grass, harvest mature crops.

use colony_types::{Coord, CropStatus, ItemKind, JobKindTag, LaborKind, PlayerId, WorkerId};
use tracing::info;

use super::{Transition, release_worker, train, unexpected};
use crate::context::JobContext;
use crate::state::{JobState, SearchForWorker, WaitDuration, WalkToPosition};

/// Search(Farming) -> Walk onto the cell -> Wait -> plant or harvest.
///
/// What happens at the end depends on the crop found there: a bare cell is
/// planted, a mature crop is harvested into food, and a crop still growing
/// means another farmer got there first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantJob {
    owner: PlayerId,
    cell: Coord,
    worker: Option<WorkerId>,
}

impl PlantJob {
    /// Tend the farm cell `cell`.
    pub const fn new(owner: PlayerId, cell: Coord) -> Self {
        Self {
            owner,
            cell,
            worker: None,
        }
    }

    pub(crate) const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The farm cell.
    pub const fn cell(&self) -> Coord {
        self.cell
    }

    /// The claimed farmer.
    pub const fn worker(&self) -> Option<WorkerId> {
        self.worker
    }

    pub(crate) fn first_state(&self) -> JobState {
        SearchForWorker::new(self.owner, LaborKind::Farming).into()
    }

    pub(crate) fn on_state_done(&mut self, ctx: &mut JobContext<'_>, finished: JobState) -> Transition {
        match finished {
            JobState::SearchForWorker(search) => {
                let Some(worker) = search.worker() else {
                    return unexpected(JobKindTag::Plant, &JobState::SearchForWorker(search));
                };
                self.worker = Some(worker);
                Transition::Next(WalkToPosition::new(worker, self.cell, false).into())
            }
            JobState::WalkToPosition(walk) => Transition::Next(
                WaitDuration::new(walk.worker(), ctx.config.plant_ticks, "Tending crops").into(),
            ),
            JobState::WaitDuration(_) => self.tend(ctx),
            other => unexpected(JobKindTag::Plant, &other),
        }
    }

    fn tend(&mut self, ctx: &mut JobContext<'_>) -> Transition {
        let Some(worker) = self.worker else {
            return Transition::Abort("no farmer".to_owned());
        };
        match ctx.terrain.crop(self.cell) {
            CropStatus::Bare => {
                if let Err(err) = ctx.terrain.plant_crop(self.cell) {
                    return Transition::Abort(err.to_string());
                }
                info!(worker = %worker, cell = %self.cell, "crop planted");
            }
            CropStatus::Mature => {
                let food = match ctx.terrain.harvest_crop(self.cell) {
                    Ok(food) => food,
                    Err(err) => return Transition::Abort(err.to_string()),
                };
                for _ in 0..food {
                    ctx.items.create_item(ItemKind::Food, self.cell, self.owner);
                }
                info!(worker = %worker, cell = %self.cell, food, "crop harvested");
            }
            CropStatus::Growing => return Transition::Abort("crop still growing".to_owned()),
        }
        train(ctx, worker, LaborKind::Farming);
        release_worker(ctx, &mut self.worker);
        Transition::Complete
    }

    pub(crate) fn on_worker_lost(&mut self) -> Transition {
        self.worker = None;
        Transition::Next(self.first_state())
    }

    pub(crate) fn on_interrupt(&mut self, ctx: &mut JobContext<'_>) {
        release_worker(ctx, &mut self.worker);
    }
}
