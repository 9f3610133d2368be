//! Bounded, self-expiring toast notification queue.
//!
//! Producers [`add`](ToastManager::add) notifications for chat events; at
//! most `max_visible` are held at once (oldest evicted first) and each one
//! dismisses itself after its own duration unless closed earlier with
//! [`remove`](ToastManager::remove). A renderer watches the visible list via
//! [`subscribe`](ToastManager::subscribe).

pub mod config;
mod error;
pub mod events;
pub mod manager;
pub mod record;
pub mod scheduler;
pub mod store;
pub mod timers;
pub mod window;

// Re-exports for convenience
pub use config::ToastConfig;
pub use error::{Result, ToastError};
pub use events::{Dismissal, ToastEvent};
pub use manager::ToastManager;
pub use record::{Notification, NotificationId, NotificationKind, ToastInput};
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle, TokioScheduler};
