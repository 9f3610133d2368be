//! Bound on simultaneously held notifications.
//!
//! The bound applies to the store itself, so the store *is* the visible
//! set. Evicted records are dropped for good, never parked for later.

use crate::record::Notification;
use crate::scheduler::Scheduler;
use crate::store::NotificationStore;
use crate::timers::DismissalTimers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityWindow {
    max_visible: usize,
}

impl VisibilityWindow {
    pub fn new(max_visible: usize) -> Self {
        Self {
            max_visible: max_visible.max(1),
        }
    }

    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    /// Evict oldest-first until the store fits, cancelling each evicted
    /// record's timer before removing it. Returns the evicted records in
    /// eviction order.
    pub fn enforce<S: Scheduler>(
        &self,
        store: &mut NotificationStore,
        timers: &mut DismissalTimers<S>,
    ) -> Vec<Notification> {
        let mut evicted = Vec::new();
        while store.len() > self.max_visible {
            let Some(id) = store.oldest().map(Notification::id) else {
                break;
            };
            timers.cancel(id);
            if let Some(record) = store.remove(id) {
                evicted.push(record);
            }
        }
        evicted
    }
}
