//! Lifecycle events published by the manager.

use serde::Serialize;

use crate::record::{Notification, NotificationId};

/// How a notification left the queue.
///
/// Consumers of the visible list cannot tell these apart; they exist for
/// diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dismissal {
    /// Closed by the user.
    Manual,
    /// Its own timer ran out.
    Expired,
    /// Pushed out by newer arrivals.
    Evicted,
    /// Dropped by a full teardown.
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToastEvent {
    Added { notification: Notification },
    Removed { id: NotificationId, reason: Dismissal },
}

impl ToastEvent {
    pub fn id(&self) -> NotificationId {
        match self {
            Self::Added { notification } => notification.id(),
            Self::Removed { id, .. } => *id,
        }
    }
}
