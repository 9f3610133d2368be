//! "Run this after a delay" abstraction used by the dismissal timers.
//!
//! [`TokioScheduler`] backs real deployments; [`ManualScheduler`] is a
//! simulated clock that only moves when told to.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

use crate::{Result, ToastError};

/// Callback run once when a scheduled delay elapses.
pub type TimerTask = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a pending scheduled task.
pub trait TimerHandle: Send + 'static {
    /// Stop the task if it has not run yet. Safe to call after it ran.
    fn cancel(self);
}

/// Schedules single-shot callbacks.
pub trait Scheduler: Send + Sync + 'static {
    type Handle: TimerHandle;

    fn schedule(&self, delay: Duration, task: TimerTask) -> Self::Handle;
}

/// Spawns one sleeping task per timer on a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: Handle,
}

impl TokioScheduler {
    /// Bind to the runtime the caller is running on.
    pub fn current() -> Result<Self> {
        Handle::try_current()
            .map(Self::with_handle)
            .map_err(|_| ToastError::NoRuntime)
    }

    pub fn with_handle(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl Scheduler for TokioScheduler {
    type Handle = AbortHandle;

    fn schedule(&self, delay: Duration, task: TimerTask) -> AbortHandle {
        self.runtime
            .spawn(async move {
                tokio::time::sleep(delay).await;
                task();
            })
            .abort_handle()
    }
}

impl TimerHandle for AbortHandle {
    fn cancel(self) {
        self.abort();
    }
}

/// Key of a pending manual task: deadline first, then arming order.
type SlotKey = (Duration, u64);

#[derive(Default)]
struct ManualClock {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<SlotKey, TimerTask>,
}

/// Deterministic simulated clock.
///
/// Nothing fires until [`advance`](Self::advance) is called; due tasks then
/// run in deadline order, ties broken by the order they were scheduled.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<ManualClock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of tasks still waiting for their deadline.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Move the clock forward, running every task that comes due.
    ///
    /// Tasks run without the clock lock held, so they may schedule or
    /// cancel other tasks; anything scheduled inside the advanced window
    /// also runs before this returns. Returns how many tasks ran.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.lock().now.checked_add(by).unwrap_or(Duration::MAX);
        let mut ran = 0;

        loop {
            let task = {
                let mut clock = self.lock();
                let due = clock
                    .pending
                    .first_key_value()
                    .map(|(key, _)| *key)
                    .filter(|(deadline, _)| *deadline <= target);
                match due {
                    Some(key) => {
                        clock.now = key.0;
                        clock.pending.remove(&key)
                    }
                    None => {
                        clock.now = target;
                        None
                    }
                }
            };

            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Shorthand for [`advance`](Self::advance) in milliseconds.
    pub fn advance_ms(&self, ms: u64) -> usize {
        self.advance(Duration::from_millis(ms))
    }

    fn lock(&self) -> MutexGuard<'_, ManualClock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay: Duration, task: TimerTask) -> ManualHandle {
        let mut clock = self.lock();
        // Saturate so an effectively infinite delay never fires
        let deadline = clock.now.checked_add(delay).unwrap_or(Duration::MAX);
        let key = (deadline, clock.next_seq);
        clock.next_seq += 1;
        clock.pending.insert(key, task);
        ManualHandle {
            clock: Arc::downgrade(&self.clock),
            key,
        }
    }
}

/// Handle returned by [`ManualScheduler`].
pub struct ManualHandle {
    clock: Weak<Mutex<ManualClock>>,
    key: SlotKey,
}

impl TimerHandle for ManualHandle {
    fn cancel(self) {
        if let Some(clock) = self.clock.upgrade() {
            let removed = clock
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pending
                .remove(&self.key);
            drop(removed);
        }
    }
}
