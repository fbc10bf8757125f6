//! Fetching and equipping a tool.

use colony_types::{ItemId, ItemKind, ItemQuery, JobKindTag, PlayerId, WorkerId};
use tracing::{info, warn};

use super::{Transition, unexpected};
use crate::context::JobContext;
use crate::state::{JobState, WaitForWorker, WalkToPosition};

/// WaitForWorker -> claim the nearest tool -> Walk to it -> pick up and equip.
///
/// An equipped tool stays claimed for as long as the worker carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupToolJob {
    owner: PlayerId,
    worker: WorkerId,
    tool: ItemKind,
    held: bool,
    item: Option<ItemId>,
}

impl PickupToolJob {
    /// Have `worker` equip a `tool`.
    pub const fn new(owner: PlayerId, worker: WorkerId, tool: ItemKind) -> Self {
        Self {
            owner,
            worker,
            tool,
            held: false,
            item: None,
        }
    }

    pub(crate) const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The kind of tool fetched.
    pub const fn tool(&self) -> ItemKind {
        self.tool
    }

    /// The worker, once the job holds it.
    pub const fn held_worker(&self) -> Option<WorkerId> {
        if self.held { Some(self.worker) } else { None }
    }

    /// The claimed tool.
    pub const fn item(&self) -> Option<ItemId> {
        self.item
    }

    pub(crate) fn first_state(&self) -> JobState {
        WaitForWorker::new(self.worker).into()
    }

    pub(crate) fn on_state_done(&mut self, ctx: &mut JobContext<'_>, finished: JobState) -> Transition {
        match finished {
            JobState::WaitForWorker(_) => {
                self.held = true;
                let near = ctx.workers.position(self.worker);
                let Some(item) = ctx
                    .items
                    .find_unclaimed(&ItemQuery::kind(self.tool), near)
                    .filter(|&item| ctx.items.claim(item))
                else {
                    return Transition::Abort(format!("no {:?} available", self.tool));
                };
                self.item = Some(item);
                let Some(cell) = ctx.items.position(item) else {
                    return Transition::Abort(format!("{:?} vanished", self.tool));
                };
                let adjacent = !ctx.terrain.is_walkable(cell);
                Transition::Next(WalkToPosition::new(self.worker, cell, adjacent).into())
            }
            JobState::WalkToPosition(_) => self.equip(ctx),
            other => unexpected(JobKindTag::PickupTool, &other),
        }
    }

    fn equip(&mut self, ctx: &mut JobContext<'_>) -> Transition {
        let Some(item) = self.item else {
            return Transition::Abort("no tool claimed".to_owned());
        };
        if let Err(err) = ctx.items.pick_up(item, self.worker) {
            return Transition::Abort(err.to_string());
        }
        if !ctx.workers.equip(self.worker, item, self.tool) {
            return Transition::Abort(format!("worker {} is gone", self.worker));
        }
        // The claim now belongs to the worker carrying the tool.
        self.item = None;
        self.held = false;
        ctx.workers.release(self.worker);
        info!(worker = %self.worker, item = %item, tool = ?self.tool, "tool equipped");
        Transition::Complete
    }

    pub(crate) fn on_interrupt(&mut self, ctx: &mut JobContext<'_>) {
        if let Some(item) = self.item.take() {
            if ctx.items.position(item).is_none() && ctx.items.exists(item) {
                if let Some(pos) = ctx.workers.position(self.worker) {
                    if let Err(err) = ctx.items.put_down(item, pos) {
                        warn!(item = %item, error = %err, "could not drop carried tool");
                    }
                }
            }
            ctx.items.release(item);
        }
        if self.held {
            self.held = false;
            ctx.workers.release(self.worker);
        }
    }
}
