//! Hauling: fetching items to a site.
//!
//! [`HaulItem`] locates and claims one matching item, finds an idle hauler,
//! walks it to the item, picks the item up, walks to the destination and
//! drops it there. The item stays claimed after delivery so the owning job
//! can consume it later. [`HaulResourceSet`] runs one `HaulItem` per unit of
//! every requirement and finishes once all of them have delivered.
//!
//! A vanished item or hauler is never fatal: the haul falls back to
//! searching again. Only an unreachable item or destination aborts.

use colony_types::{Coord, ItemId, ItemQuery, LaborKind, PlayerId, ResourceRequirement, WorkerId};
use tracing::{debug, warn};

use super::Step;
use super::walk::WalkToPosition;
use crate::context::JobContext;

/// Upper bound on phase changes within a single poll.
const MAX_PHASE_CHANGES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
enum HaulPhase {
    Locate,
    AwaitHauler,
    ToItem(WalkToPosition),
    ToDestination(WalkToPosition),
    Delivered,
}

enum Flow {
    Continue,
    Yield(Step),
}

/// Bring one item matching a query to a destination cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaulItem {
    owner: PlayerId,
    query: ItemQuery,
    destination: Coord,
    phase: HaulPhase,
    item: Option<ItemId>,
    hauler: Option<WorkerId>,
    hauler_position: Option<Coord>,
}

impl HaulItem {
    /// Haul one item matching `query` to `destination`.
    pub const fn new(owner: PlayerId, query: ItemQuery, destination: Coord) -> Self {
        Self {
            owner,
            query,
            destination,
            phase: HaulPhase::Locate,
            item: None,
            hauler: None,
            hauler_position: None,
        }
    }

    /// What is being hauled.
    pub const fn query(&self) -> ItemQuery {
        self.query
    }

    /// The claimed item, once located.
    pub const fn item(&self) -> Option<ItemId> {
        self.item
    }

    /// The claimed hauler, while one is walking.
    pub const fn hauler(&self) -> Option<WorkerId> {
        self.hauler
    }

    /// Whether the item lies at the destination.
    pub const fn is_delivered(&self) -> bool {
        matches!(self.phase, HaulPhase::Delivered)
    }

    /// Hand the delivered item (and its claim) over to the caller.
    pub const fn take_item(&mut self) -> Option<ItemId> {
        self.item.take()
    }

    pub(crate) fn start(&mut self, ctx: &mut JobContext<'_>) -> Step {
        self.poll(ctx)
    }

    pub(crate) fn poll(&mut self, ctx: &mut JobContext<'_>) -> Step {
        if let Some(hauler) = self.hauler {
            if let Some(pos) = ctx.workers.position(hauler) {
                self.hauler_position = Some(pos);
            }
        }
        for _ in 0..MAX_PHASE_CHANGES {
            let phase = std::mem::replace(&mut self.phase, HaulPhase::Locate);
            let (next, flow) = self.advance(ctx, phase);
            self.phase = next;
            if let Flow::Yield(step) = flow {
                return step;
            }
        }
        Step::Pending
    }

    fn advance(&mut self, ctx: &mut JobContext<'_>, phase: HaulPhase) -> (HaulPhase, Flow) {
        match phase {
            HaulPhase::Locate => self.locate(ctx),
            HaulPhase::AwaitHauler => self.await_hauler(ctx),
            HaulPhase::ToItem(walk) => self.to_item(ctx, walk),
            HaulPhase::ToDestination(walk) => self.to_destination(ctx, walk),
            HaulPhase::Delivered => (HaulPhase::Delivered, Flow::Yield(Step::Finished)),
        }
    }

    fn locate(&mut self, ctx: &mut JobContext<'_>) -> (HaulPhase, Flow) {
        let Some(item) = ctx.items.find_unclaimed(&self.query, Some(self.destination)) else {
            return (HaulPhase::Locate, Flow::Yield(Step::Pending));
        };
        if !ctx.items.claim(item) {
            return (HaulPhase::Locate, Flow::Yield(Step::Pending));
        }
        self.item = Some(item);
        if ctx.items.position(item) == Some(self.destination) {
            debug!(item = %item, destination = %self.destination, "item already in place");
            return (HaulPhase::Delivered, Flow::Yield(Step::Finished));
        }
        (HaulPhase::AwaitHauler, Flow::Continue)
    }

    fn await_hauler(&mut self, ctx: &mut JobContext<'_>) -> (HaulPhase, Flow) {
        let Some(item) = self.item else {
            return (HaulPhase::Locate, Flow::Continue);
        };
        let Some(item_pos) = ctx.items.position(item) else {
            self.drop_item_claim(ctx);
            return (HaulPhase::Locate, Flow::Yield(Step::Pending));
        };
        let mut hauler = None;
        for candidate in ctx.workers.idle_workers(self.owner) {
            if ctx.workers.has_labor(candidate, LaborKind::Hauling)
                && ctx.workers.try_acquire(candidate)
            {
                hauler = Some(candidate);
                break;
            }
        }
        let Some(hauler) = hauler else {
            return (HaulPhase::AwaitHauler, Flow::Yield(Step::Pending));
        };
        debug!(worker = %hauler, item = %item, "hauler claimed");
        self.hauler = Some(hauler);
        self.hauler_position = ctx.workers.position(hauler);
        let adjacent = !ctx.terrain.is_walkable(item_pos);
        let mut walk = WalkToPosition::new(hauler, item_pos, adjacent);
        match walk.start(ctx) {
            Step::Abort(reason) => (HaulPhase::ToItem(walk), Flow::Yield(Step::Abort(reason))),
            Step::WorkerLost(_) => {
                self.hauler = None;
                (HaulPhase::AwaitHauler, Flow::Yield(Step::Pending))
            }
            Step::Pending | Step::Finished => (HaulPhase::ToItem(walk), Flow::Continue),
        }
    }

    fn to_item(&mut self, ctx: &mut JobContext<'_>, mut walk: WalkToPosition) -> (HaulPhase, Flow) {
        let (Some(item), Some(hauler)) = (self.item, self.hauler) else {
            return (HaulPhase::Locate, Flow::Continue);
        };
        if !ctx.workers.exists(hauler) {
            self.hauler = None;
            return (HaulPhase::AwaitHauler, Flow::Yield(Step::Pending));
        }
        if ctx.items.position(item).is_none() {
            self.release_hauler(ctx);
            self.drop_item_claim(ctx);
            return (HaulPhase::Locate, Flow::Yield(Step::Pending));
        }
        match walk.poll(ctx) {
            Step::Pending => (HaulPhase::ToItem(walk), Flow::Yield(Step::Pending)),
            Step::Abort(reason) => (HaulPhase::ToItem(walk), Flow::Yield(Step::Abort(reason))),
            Step::WorkerLost(_) => {
                self.hauler = None;
                (HaulPhase::AwaitHauler, Flow::Yield(Step::Pending))
            }
            Step::Finished => {
                if ctx.items.pick_up(item, hauler).is_err() {
                    self.release_hauler(ctx);
                    self.drop_item_claim(ctx);
                    return (HaulPhase::Locate, Flow::Yield(Step::Pending));
                }
                let adjacent = !ctx.terrain.is_walkable(self.destination);
                let mut next = WalkToPosition::new(hauler, self.destination, adjacent);
                match next.start(ctx) {
                    Step::Abort(reason) => (
                        HaulPhase::ToDestination(next),
                        Flow::Yield(Step::Abort(reason)),
                    ),
                    Step::WorkerLost(_) | Step::Pending | Step::Finished => {
                        (HaulPhase::ToDestination(next), Flow::Continue)
                    }
                }
            }
        }
    }

    fn to_destination(
        &mut self,
        ctx: &mut JobContext<'_>,
        mut walk: WalkToPosition,
    ) -> (HaulPhase, Flow) {
        let (Some(item), Some(hauler)) = (self.item, self.hauler) else {
            return (HaulPhase::Locate, Flow::Continue);
        };
        if !ctx.workers.exists(hauler) {
            return self.drop_lost_load(ctx, item);
        }
        match walk.poll(ctx) {
            Step::Pending => (HaulPhase::ToDestination(walk), Flow::Yield(Step::Pending)),
            Step::Abort(reason) => (
                HaulPhase::ToDestination(walk),
                Flow::Yield(Step::Abort(reason)),
            ),
            Step::WorkerLost(_) => self.drop_lost_load(ctx, item),
            Step::Finished => {
                let delivered = ctx.items.put_down(item, self.destination);
                self.release_hauler(ctx);
                if delivered.is_err() {
                    self.item = None;
                    return (HaulPhase::Locate, Flow::Yield(Step::Pending));
                }
                debug!(item = %item, destination = %self.destination, "item delivered");
                (HaulPhase::Delivered, Flow::Yield(Step::Finished))
            }
        }
    }

    /// The hauler vanished with the item in hand: leave it where it was last seen.
    fn drop_lost_load(&mut self, ctx: &mut JobContext<'_>, item: ItemId) -> (HaulPhase, Flow) {
        self.hauler = None;
        let drop_at = self.hauler_position.unwrap_or(self.destination);
        if ctx.items.put_down(item, drop_at).is_err() {
            self.item = None;
            return (HaulPhase::Locate, Flow::Yield(Step::Pending));
        }
        (HaulPhase::AwaitHauler, Flow::Yield(Step::Pending))
    }

    fn release_hauler(&mut self, ctx: &mut JobContext<'_>) {
        if let Some(hauler) = self.hauler.take() {
            ctx.workers.release(hauler);
        }
    }

    fn drop_item_claim(&mut self, ctx: &mut JobContext<'_>) {
        if let Some(item) = self.item.take() {
            ctx.items.release(item);
        }
    }

    pub(crate) fn interrupt(&mut self, ctx: &mut JobContext<'_>) {
        let phase = std::mem::replace(&mut self.phase, HaulPhase::Locate);
        match phase {
            HaulPhase::ToDestination(mut walk) => {
                walk.interrupt(ctx);
                if let Some(item) = self.item {
                    let drop_at = self
                        .hauler
                        .and_then(|h| ctx.workers.position(h))
                        .or(self.hauler_position)
                        .unwrap_or(self.destination);
                    if let Err(err) = ctx.items.put_down(item, drop_at) {
                        warn!(item = %item, error = %err, "could not drop hauled item");
                    }
                }
            }
            HaulPhase::ToItem(mut walk) => walk.interrupt(ctx),
            HaulPhase::Locate | HaulPhase::AwaitHauler | HaulPhase::Delivered => {}
        }
        self.release_hauler(ctx);
        self.drop_item_claim(ctx);
    }

    pub(crate) fn status(&self) -> String {
        match &self.phase {
            HaulPhase::Locate => format!("Waiting for {}", self.query),
            HaulPhase::AwaitHauler => format!("Waiting for a hauler to fetch {}", self.query),
            HaulPhase::ToItem(_) => format!("Fetching {}", self.query),
            HaulPhase::ToDestination(_) => {
                format!("Hauling {} to {}", self.query, self.destination)
            }
            HaulPhase::Delivered => format!("{} delivered", self.query),
        }
    }
}

/// Bring every unit of a list of requirements to one destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HaulResourceSet {
    parts: Vec<HaulItem>,
}

impl HaulResourceSet {
    /// One haul per unit of every requirement.
    pub fn new(owner: PlayerId, requirements: &[ResourceRequirement], destination: Coord) -> Self {
        let parts = requirements
            .iter()
            .flat_map(|req| {
                (0..req.quantity).map(move |_| HaulItem::new(owner, req.query, destination))
            })
            .collect();
        Self { parts }
    }

    /// Number of units to haul.
    pub fn total(&self) -> usize {
        self.parts.len()
    }

    /// Number of units delivered so far.
    pub fn delivered(&self) -> usize {
        self.parts.iter().filter(|p| p.is_delivered()).count()
    }

    /// Items claimed by the parts so far (delivered or in flight).
    pub fn claimed_items(&self) -> Vec<ItemId> {
        self.parts.iter().filter_map(HaulItem::item).collect()
    }

    /// Hand every delivered item (and its claim) over to the caller.
    pub fn take_items(&mut self) -> Vec<ItemId> {
        self.parts.iter_mut().filter_map(HaulItem::take_item).collect()
    }

    pub(crate) fn start(&mut self, ctx: &mut JobContext<'_>) -> Step {
        self.poll(ctx)
    }

    pub(crate) fn poll(&mut self, ctx: &mut JobContext<'_>) -> Step {
        for part in &mut self.parts {
            if part.is_delivered() {
                continue;
            }
            if let Step::Abort(reason) = part.poll(ctx) {
                return Step::Abort(reason);
            }
        }
        if self.parts.iter().all(HaulItem::is_delivered) {
            Step::Finished
        } else {
            Step::Pending
        }
    }

    pub(crate) fn interrupt(&mut self, ctx: &mut JobContext<'_>) {
        for part in &mut self.parts {
            part.interrupt(ctx);
        }
    }

    pub(crate) fn status(&self) -> String {
        let waiting = self
            .parts
            .iter()
            .find(|p| !p.is_delivered())
            .map(HaulItem::status);
        match waiting {
            Some(line) => format!(
                "Hauling materials ({}/{}): {line}",
                self.delivered(),
                self.total()
            ),
            None => format!("Materials delivered ({})", self.total()),
        }
    }
}
