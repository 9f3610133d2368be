//! One auto-dismiss countdown per visible notification.
//!
//! Every arm gets a fresh [`TimerToken`]. A firing callback must
//! [`claim`](DismissalTimers::claim) its token before acting: the claim
//! clears the record, so a fire that lost a race with `cancel` (or with a
//! re-arm) sees a mismatched or missing token and does nothing.

use std::collections::HashMap;
use std::time::Duration;

use crate::record::NotificationId;
use crate::scheduler::{Scheduler, TimerHandle};

/// Identifies one particular arming of a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

struct ArmedTimer<H> {
    token: TimerToken,
    handle: H,
}

pub struct DismissalTimers<S: Scheduler> {
    scheduler: S,
    armed: HashMap<NotificationId, ArmedTimer<S::Handle>>,
    next_token: u64,
}

impl<S: Scheduler> DismissalTimers<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            armed: HashMap::new(),
            next_token: 0,
        }
    }

    /// Start a single-shot countdown for `id`, replacing any armed one.
    ///
    /// `on_fire` receives the id and the token it must claim.
    pub fn arm<F>(&mut self, id: NotificationId, delay: Duration, on_fire: F) -> TimerToken
    where
        F: FnOnce(NotificationId, TimerToken) + Send + 'static,
    {
        if self.cancel(id) {
            tracing::debug!(%id, "Re-armed dismissal timer");
        }

        let token = TimerToken(self.next_token);
        self.next_token += 1;

        let handle = self
            .scheduler
            .schedule(delay, Box::new(move || on_fire(id, token)));
        self.armed.insert(id, ArmedTimer { token, handle });
        token
    }

    /// Stop the countdown for `id`. Returns whether one was armed.
    pub fn cancel(&mut self, id: NotificationId) -> bool {
        match self.armed.remove(&id) {
            Some(timer) => {
                timer.handle.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every armed countdown, returning how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.armed.len();
        for (_, timer) in self.armed.drain() {
            timer.handle.cancel();
        }
        count
    }

    /// Take ownership of a firing timer.
    ///
    /// Returns `true` exactly once per arming, and only if that arming is
    /// still current; the record is cleared before returning.
    pub fn claim(&mut self, id: NotificationId, token: TimerToken) -> bool {
        match self.armed.get(&id) {
            Some(timer) if timer.token == token => {
                self.armed.remove(&id);
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self, id: NotificationId) -> bool {
        self.armed.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.armed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.armed.is_empty()
    }
}

impl<S: Scheduler> Drop for DismissalTimers<S> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::scheduler::ManualScheduler;

    type Fired = Arc<Mutex<Vec<(NotificationId, TimerToken)>>>;

    fn setup() -> (ManualScheduler, DismissalTimers<ManualScheduler>, Fired) {
        let scheduler = ManualScheduler::new();
        let timers = DismissalTimers::new(scheduler.clone());
        (scheduler, timers, Arc::new(Mutex::new(Vec::new())))
    }

    fn sink(fired: &Fired) -> impl FnOnce(NotificationId, TimerToken) + Send + 'static {
        let fired = fired.clone();
        move |id, token| fired.lock().unwrap().push((id, token))
    }

    #[test]
    fn fire_delivers_current_token_once() {
        let (clock, mut timers, fired) = setup();
        let id = NotificationId::new();
        let token = timers.arm(id, Duration::from_millis(100), sink(&fired));

        clock.advance_ms(100);
        assert_eq!(*fired.lock().unwrap(), vec![(id, token)]);

        assert!(timers.claim(id, token));
        assert!(!timers.claim(id, token));
        assert!(timers.is_empty());
    }

    #[test]
    fn cancel_is_total() {
        let (clock, mut timers, fired) = setup();
        let id = NotificationId::new();

        assert!(!timers.cancel(id));
        timers.arm(id, Duration::from_millis(10), sink(&fired));
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));

        clock.advance_ms(50);
        assert!(fired.lock().unwrap().is_empty());
    }

    #[test]
    fn rearm_replaces_previous_timer() {
        let (clock, mut timers, fired) = setup();
        let id = NotificationId::new();

        let first = timers.arm(id, Duration::from_millis(10), sink(&fired));
        let second = timers.arm(id, Duration::from_millis(30), sink(&fired));
        assert_ne!(first, second);
        assert_eq!(timers.len(), 1);

        clock.advance_ms(20);
        assert!(fired.lock().unwrap().is_empty());
        assert!(!timers.claim(id, first));

        clock.advance_ms(10);
        assert_eq!(*fired.lock().unwrap(), vec![(id, second)]);
        assert!(timers.claim(id, second));
    }

    #[test]
    fn stale_fire_after_cancel_cannot_claim() {
        let (_clock, mut timers, _fired) = setup();
        let id = NotificationId::new();
        let token = timers.arm(id, Duration::from_millis(10), |_, _| {});

        // A callback already past its deadline when cancel runs
        timers.cancel(id);
        assert!(!timers.claim(id, token));
    }

    #[test]
    fn cancel_all_silences_everything() {
        let (clock, mut timers, fired) = setup();
        for ms in [10, 20, 30] {
            timers.arm(NotificationId::new(), Duration::from_millis(ms), sink(&fired));
        }

        assert_eq!(timers.cancel_all(), 3);
        assert_eq!(clock.pending(), 0);
        clock.advance_ms(100);
        assert!(fired.lock().unwrap().is_empty());
    }
}
