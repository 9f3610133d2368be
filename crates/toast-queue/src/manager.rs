//! Notification queue façade.
//!
//! Owns the store and the timer set behind one lock. Every mutating call
//! finishes its eviction pass and republishes the visible list before
//! returning, so observers never see more than `max_visible` entries.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, watch};

use crate::Result;
use crate::config::ToastConfig;
use crate::events::{Dismissal, ToastEvent};
use crate::record::{Notification, NotificationId, ToastInput};
use crate::scheduler::{Scheduler, TokioScheduler};
use crate::store::NotificationStore;
use crate::timers::{DismissalTimers, TimerToken};
use crate::window::VisibilityWindow;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Cloneable handle to one notification queue.
///
/// Clones share the same queue; create one per UI session and hand clones
/// to producers and the renderer.
pub struct ToastManager<S: Scheduler = TokioScheduler> {
    inner: Arc<ManagerInner<S>>,
}

impl<S: Scheduler> Clone for ToastManager<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ManagerInner<S: Scheduler> {
    config: ToastConfig,
    window: VisibilityWindow,
    state: Mutex<QueueState<S>>,
    visible_tx: watch::Sender<Vec<Notification>>,
    events_tx: broadcast::Sender<ToastEvent>,
}

struct QueueState<S: Scheduler> {
    store: NotificationStore,
    timers: DismissalTimers<S>,
}

impl ToastManager<TokioScheduler> {
    /// Create a manager whose timers run on the current tokio runtime.
    pub fn new(config: ToastConfig) -> Result<Self> {
        Ok(Self::with_scheduler(config, TokioScheduler::current()?))
    }
}

impl<S: Scheduler> ToastManager<S> {
    pub fn with_scheduler(config: ToastConfig, scheduler: S) -> Self {
        let (visible_tx, _) = watch::channel(Vec::new());
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(ManagerInner {
                window: VisibilityWindow::new(config.max_visible),
                config,
                state: Mutex::new(QueueState {
                    store: NotificationStore::new(),
                    timers: DismissalTimers::new(scheduler),
                }),
                visible_tx,
                events_tx,
            }),
        }
    }

    /// Queue a notification and return its id.
    ///
    /// The oldest entries are evicted synchronously if the bound is
    /// exceeded, and the new entry's dismissal timer is armed.
    pub fn add(&self, input: ToastInput) -> Result<NotificationId> {
        let duration = self.resolve_duration(input.duration_ms);
        self.insert(Notification::from_input(NotificationId::new(), input, duration))
    }

    fn insert(&self, record: Notification) -> Result<NotificationId> {
        let id = record.id();
        let kind = record.kind();
        let mut state = self.inner.lock();

        if let Err(e) = state.store.append(record.clone()) {
            tracing::error!(%id, "Notification id collision, id generation is broken");
            return Err(e);
        }
        tracing::debug!(%id, ?kind, "Toast added");
        self.inner.emit(ToastEvent::Added {
            notification: record,
        });

        let state = &mut *state;
        for evicted in self.inner.window.enforce(&mut state.store, &mut state.timers) {
            tracing::debug!(id = %evicted.id(), "Toast evicted");
            self.inner.emit(ToastEvent::Removed {
                id: evicted.id(),
                reason: Dismissal::Evicted,
            });
        }

        self.arm_unarmed(state);
        self.inner.publish(state);
        Ok(id)
    }

    /// Dismiss a notification by id. Absent ids are a no-op.
    ///
    /// Returns `true` if something was removed.
    pub fn remove(&self, id: NotificationId) -> bool {
        let mut state = self.inner.lock();
        state.timers.cancel(id);
        if state.store.remove(id).is_none() {
            return false;
        }

        tracing::debug!(%id, "Toast dismissed");
        self.inner.emit(ToastEvent::Removed {
            id,
            reason: Dismissal::Manual,
        });
        self.inner.publish(&state);
        true
    }

    /// Cancel every timer and drop every notification. Returns how many
    /// notifications were dropped.
    pub fn clear(&self) -> usize {
        let mut state = self.inner.lock();
        state.timers.cancel_all();
        let ids: Vec<NotificationId> = state.store.iter().map(Notification::id).collect();
        state.store.clear();

        for id in &ids {
            self.inner.emit(ToastEvent::Removed {
                id: *id,
                reason: Dismissal::Cleared,
            });
        }
        if !ids.is_empty() {
            tracing::debug!(count = ids.len(), "Toasts cleared");
            self.inner.publish(&state);
        }
        ids.len()
    }

    /// Current visible notifications, oldest first.
    pub fn visible(&self) -> Vec<Notification> {
        self.inner.lock().store.snapshot()
    }

    /// Watch the visible list. The value is replaced after every change.
    ///
    /// Do not hold a borrow of the receiver while calling back into the
    /// manager.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.inner.visible_tx.subscribe()
    }

    /// Lifecycle events, including why each notification left.
    pub fn events(&self) -> broadcast::Receiver<ToastEvent> {
        self.inner.events_tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().store.is_empty()
    }

    /// Number of dismissal timers currently armed.
    pub fn armed_timers(&self) -> usize {
        self.inner.lock().timers.len()
    }

    pub fn is_armed(&self, id: NotificationId) -> bool {
        self.inner.lock().timers.is_armed(id)
    }

    pub fn config(&self) -> &ToastConfig {
        &self.inner.config
    }

    fn resolve_duration(&self, requested: Option<u64>) -> Duration {
        match requested {
            Some(0) => {
                tracing::warn!("Toast requested a zero duration, using the default");
                self.inner.config.default_duration
            }
            Some(ms) => Duration::from_millis(ms),
            None => self.inner.config.default_duration,
        }
    }

    fn arm_unarmed(&self, state: &mut QueueState<S>) {
        let due: Vec<(NotificationId, Duration)> = state
            .store
            .iter()
            .filter(|n| !state.timers.is_armed(n.id()))
            .map(|n| (n.id(), n.duration()))
            .collect();

        for (id, delay) in due {
            let weak = Arc::downgrade(&self.inner);
            state.timers.arm(id, delay, move |id, token| {
                if let Some(inner) = weak.upgrade() {
                    inner.expire(id, token);
                }
            });
        }
    }
}

impl<S: Scheduler> ManagerInner<S> {
    fn lock(&self) -> MutexGuard<'_, QueueState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn expire(&self, id: NotificationId, token: TimerToken) {
        let mut state = self.lock();
        if !state.timers.claim(id, token) {
            return;
        }
        if state.store.remove(id).is_some() {
            tracing::debug!(%id, "Toast expired");
            self.emit(ToastEvent::Removed {
                id,
                reason: Dismissal::Expired,
            });
            self.publish(&state);
        }
    }

    fn emit(&self, event: ToastEvent) {
        let _ = self.events_tx.send(event);
    }

    fn publish(&self, state: &QueueState<S>) {
        self.visible_tx.send_replace(state.store.snapshot());
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
