//! Listener surfaces and the copy-on-write set that holds them.
//!
//! A listener may add or remove listeners (itself included) while a
//! notification is in progress. [`ListenerSet`] therefore notifies over a
//! snapshot taken when the notification starts; mutations made during the
//! callbacks only affect later notifications.

use std::sync::Arc;

use arc_swap::ArcSwap;
use colony_types::JobSummary;

use crate::report::JobReport;

/// Observer of a single job's completion.
pub trait JobListener: Send + Sync {
    /// The job completed or was interrupted.
    fn on_done(&self, report: &JobReport);
}

/// Observer of the job manager's live job list.
pub trait JobManagerListener: Send + Sync {
    /// A job was added at `index` of the manager's list.
    fn on_added(&self, job: &JobSummary, index: usize);

    /// The job at `index` was removed from the manager's list.
    fn on_removed(&self, job: &JobSummary, index: usize);
}

/// A set of shared listeners with snapshot iteration.
pub struct ListenerSet<L: ?Sized> {
    inner: ArcSwap<Vec<Arc<L>>>,
}

impl<L: ?Sized> ListenerSet<L> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Register a listener.
    pub fn add(&self, listener: Arc<L>) {
        self.inner.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(Arc::clone(&listener));
            next
        });
    }

    /// Unregister a listener. Returns `false` if it was not registered.
    pub fn remove(&self, listener: &Arc<L>) -> bool {
        let previous = self.inner.rcu(|current| {
            current
                .iter()
                .filter(|l| !Arc::ptr_eq(l, listener))
                .cloned()
                .collect::<Vec<_>>()
        });
        previous.iter().any(|l| Arc::ptr_eq(l, listener))
    }

    /// The listeners registered right now.
    pub fn snapshot(&self) -> Arc<Vec<Arc<L>>> {
        self.inner.load_full()
    }

    /// Call `f` for every listener registered when the call starts.
    pub fn notify(&self, mut f: impl FnMut(&L)) {
        let snapshot = self.snapshot();
        for listener in snapshot.iter() {
            f(listener);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.load().len()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.load().is_empty()
    }
}

impl<L: ?Sized> Default for ListenerSet<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> core::fmt::Debug for ListenerSet<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.len())
            .finish()
    }
}
