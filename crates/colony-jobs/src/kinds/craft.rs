//! Workshop crafting and the recipe table.

use colony_types::{
    Coord, ItemCategory, ItemId, ItemKind, ItemQuery, JobKindTag, LaborKind, PlayerId,
    ResourceRequirement, WorkerId, WorkshopId, WorkshopKind,
};
use tracing::info;

use super::{Transition, consume_all, release_items, release_worker, train, unexpected};
use crate::context::JobContext;
use crate::error::JobError;
use crate::state::{HaulResourceSet, JobState, SearchForWorker, WaitDuration, WalkToPosition};

/// How to produce one batch of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recipe {
    /// Produced item.
    pub output: ItemKind,
    /// Items produced per batch.
    pub output_quantity: u32,
    /// Consumed inputs.
    pub inputs: &'static [ResourceRequirement],
    /// Labor the crafter needs.
    pub labor: LaborKind,
    /// Workshop the batch is made at.
    pub workshop: WorkshopKind,
    /// Work time in ticks.
    pub ticks: u64,
}

/// Every known recipe. One recipe per output.
pub static RECIPES: &[Recipe] = &[
    Recipe {
        output: ItemKind::Plank,
        output_quantity: 2,
        inputs: &[ResourceRequirement::new(ItemQuery::kind(ItemKind::Log), 1)],
        labor: LaborKind::Carpentry,
        workshop: WorkshopKind::Carpenter,
        ticks: 30,
    },
    Recipe {
        output: ItemKind::Bed,
        output_quantity: 1,
        inputs: &[ResourceRequirement::new(ItemQuery::kind(ItemKind::Plank), 2)],
        labor: LaborKind::Carpentry,
        workshop: WorkshopKind::Carpenter,
        ticks: 60,
    },
    Recipe {
        output: ItemKind::StoneBlock,
        output_quantity: 1,
        inputs: &[ResourceRequirement::new(ItemQuery::kind(ItemKind::Stone), 1)],
        labor: LaborKind::Masonry,
        workshop: WorkshopKind::Mason,
        ticks: 30,
    },
    Recipe {
        output: ItemKind::MetalBar,
        output_quantity: 1,
        inputs: &[
            ResourceRequirement::new(ItemQuery::kind(ItemKind::Ore), 1),
            ResourceRequirement::new(ItemQuery::category(ItemCategory::Wood), 1),
        ],
        labor: LaborKind::Smithing,
        workshop: WorkshopKind::Forge,
        ticks: 60,
    },
    Recipe {
        output: ItemKind::Pickaxe,
        output_quantity: 1,
        inputs: &[
            ResourceRequirement::new(ItemQuery::kind(ItemKind::MetalBar), 1),
            ResourceRequirement::new(ItemQuery::kind(ItemKind::Plank), 1),
        ],
        labor: LaborKind::Smithing,
        workshop: WorkshopKind::Forge,
        ticks: 60,
    },
    Recipe {
        output: ItemKind::Axe,
        output_quantity: 1,
        inputs: &[
            ResourceRequirement::new(ItemQuery::kind(ItemKind::MetalBar), 1),
            ResourceRequirement::new(ItemQuery::kind(ItemKind::Plank), 1),
        ],
        labor: LaborKind::Smithing,
        workshop: WorkshopKind::Forge,
        ticks: 60,
    },
];

/// The recipe producing `output`, if any.
pub fn recipe_for(output: ItemKind) -> Option<&'static Recipe> {
    RECIPES.iter().find(|r| r.output == output)
}

/// Haul inputs to the workshop -> Search(recipe labor) -> Walk -> Wait -> produce.
///
/// The workshop is claimed when the job is created and held until the job
/// ends either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftJob {
    owner: PlayerId,
    workshop: WorkshopId,
    site: Coord,
    recipe: &'static Recipe,
    worker: Option<WorkerId>,
    inputs: Vec<ItemId>,
    workshop_held: bool,
}

impl CraftJob {
    /// Claim `workshop` for one batch of `output`.
    ///
    /// # Errors
    ///
    /// - [`JobError::UnknownRecipe`] if nothing produces `output`
    /// - [`JobError::UnknownWorkshop`] if the workshop does not exist
    /// - [`JobError::WrongWorkshop`] if the recipe needs another workshop kind
    /// - [`JobError::WorkshopBusy`] if another job holds the workshop
    pub fn new(
        ctx: &mut JobContext<'_>,
        owner: PlayerId,
        workshop: WorkshopId,
        output: ItemKind,
    ) -> Result<Self, JobError> {
        let recipe = recipe_for(output).ok_or(JobError::UnknownRecipe(output))?;
        let found = ctx
            .workshops
            .kind(workshop)
            .ok_or(JobError::UnknownWorkshop(workshop))?;
        if found != recipe.workshop {
            return Err(JobError::WrongWorkshop {
                workshop,
                expected: recipe.workshop,
                found,
            });
        }
        let site = ctx
            .workshops
            .position(workshop)
            .ok_or(JobError::UnknownWorkshop(workshop))?;
        if !ctx.workshops.try_claim(workshop) {
            return Err(JobError::WorkshopBusy(workshop));
        }
        Ok(Self {
            owner,
            workshop,
            site,
            recipe,
            worker: None,
            inputs: Vec::new(),
            workshop_held: true,
        })
    }

    pub(crate) const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The claimed workshop.
    pub const fn workshop(&self) -> WorkshopId {
        self.workshop
    }

    /// Where the crafter works.
    pub const fn site(&self) -> Coord {
        self.site
    }

    /// The recipe being made.
    pub const fn recipe(&self) -> &'static Recipe {
        self.recipe
    }

    /// The claimed crafter.
    pub const fn worker(&self) -> Option<WorkerId> {
        self.worker
    }

    pub(crate) fn first_state(&self) -> JobState {
        HaulResourceSet::new(self.owner, self.recipe.inputs, self.site).into()
    }

    pub(crate) fn on_state_done(&mut self, ctx: &mut JobContext<'_>, finished: JobState) -> Transition {
        match finished {
            JobState::HaulResourceSet(mut haul) => {
                self.inputs = haul.take_items();
                Transition::Next(SearchForWorker::new(self.owner, self.recipe.labor).into())
            }
            JobState::SearchForWorker(search) => {
                let Some(worker) = search.worker() else {
                    return unexpected(JobKindTag::Craft, &JobState::SearchForWorker(search));
                };
                self.worker = Some(worker);
                let adjacent = !ctx.terrain.is_walkable(self.site);
                Transition::Next(WalkToPosition::new(worker, self.site, adjacent).into())
            }
            JobState::WalkToPosition(walk) => Transition::Next(
                WaitDuration::new(walk.worker(), self.recipe.ticks, "Crafting").into(),
            ),
            JobState::WaitDuration(_) => self.produce(ctx),
            other => unexpected(JobKindTag::Craft, &other),
        }
    }

    fn produce(&mut self, ctx: &mut JobContext<'_>) -> Transition {
        let Some(worker) = self.worker else {
            return Transition::Abort("no crafter".to_owned());
        };
        if let Err(reason) = consume_all(ctx, &mut self.inputs) {
            return Transition::Abort(reason);
        }
        for _ in 0..self.recipe.output_quantity {
            ctx.items.create_item(self.recipe.output, self.site, self.owner);
        }
        train(ctx, worker, self.recipe.labor);
        release_worker(ctx, &mut self.worker);
        self.release_workshop(ctx);
        info!(
            worker = %worker,
            workshop = %self.workshop,
            output = ?self.recipe.output,
            quantity = self.recipe.output_quantity,
            "batch crafted"
        );
        Transition::Complete
    }

    fn release_workshop(&mut self, ctx: &mut JobContext<'_>) {
        if self.workshop_held {
            self.workshop_held = false;
            ctx.workshops.release(self.workshop);
        }
    }

    pub(crate) fn on_worker_lost(&mut self) -> Transition {
        self.worker = None;
        Transition::Next(SearchForWorker::new(self.owner, self.recipe.labor).into())
    }

    pub(crate) fn on_interrupt(&mut self, ctx: &mut JobContext<'_>) {
        release_worker(ctx, &mut self.worker);
        release_items(ctx, &mut self.inputs);
        self.release_workshop(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_output_has_one_recipe() {
        for recipe in RECIPES {
            let same = RECIPES.iter().filter(|r| r.output == recipe.output).count();
            assert_eq!(same, 1, "{:?}", recipe.output);
            assert!(recipe.output_quantity > 0);
            assert!(!recipe.inputs.is_empty());
        }
    }

    #[test]
    fn planks_come_from_logs_at_the_carpenter() {
        let recipe = recipe_for(ItemKind::Plank);
        assert!(recipe.is_some_and(|r| r.workshop == WorkshopKind::Carpenter
            && r.output_quantity == 2
            && r.inputs.iter().all(|i| i.query.matches(ItemKind::Log, false))));
        assert!(recipe_for(ItemKind::Food).is_none());
    }
}
