//! Decides whether a chat event deserves a toast and forwards it.

use std::sync::{Arc, PoisonError, RwLock};

use toast_queue::{NotificationId, Result, Scheduler, ToastManager, TokioScheduler};

use crate::event::{ChatEvent, Conversation};
use crate::history::{History, HistoryEntry};

/// Producer front-end for a [`ToastManager`].
///
/// Events the user sent themselves, and events for the conversation they
/// are looking at, are dropped. All others become toasts and are recorded
/// in the [`History`].
pub struct Notifier<S: Scheduler = TokioScheduler> {
    manager: ToastManager<S>,
    history: History,
    active: Arc<RwLock<Option<Conversation>>>,
    self_name: Arc<RwLock<Option<String>>>,
}

impl<S: Scheduler> Clone for Notifier<S> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
            history: self.history.clone(),
            active: Arc::clone(&self.active),
            self_name: Arc::clone(&self.self_name),
        }
    }
}

impl<S: Scheduler> Notifier<S> {
    pub fn new(manager: ToastManager<S>) -> Self {
        Self::with_history(manager, History::new())
    }

    pub fn with_history(manager: ToastManager<S>, history: History) -> Self {
        Self {
            manager,
            history,
            active: Arc::new(RwLock::new(None)),
            self_name: Arc::new(RwLock::new(None)),
        }
    }

    pub fn manager(&self) -> &ToastManager<S> {
        &self.manager
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Raise a toast for `event` and record it, unless the user sent it or
    /// its conversation is open.
    ///
    /// Returns `Ok(None)` when suppressed.
    pub fn notify(&self, event: &ChatEvent) -> Result<Option<NotificationId>> {
        if self.is_from_self(event) {
            tracing::debug!(
                message_id = event.message_id(),
                "Toast suppressed for own message"
            );
            return Ok(None);
        }
        if self.is_active(&event.conversation()) {
            tracing::debug!(
                message_id = event.message_id(),
                "Toast suppressed for open conversation"
            );
            return Ok(None);
        }

        let input = event.to_input();
        let id = self.manager.add(input.clone())?;
        self.history.record(HistoryEntry::new(id, event, input));
        Ok(Some(id))
    }

    /// Set the current user's display name. Matching is case-insensitive.
    pub fn set_self_name(&self, name: impl Into<String>) {
        let name = name.into().trim().to_string();
        let name = (!name.is_empty()).then_some(name);
        *self.self_name.write().unwrap_or_else(PoisonError::into_inner) = name;
    }

    pub fn self_name(&self) -> Option<String> {
        self.self_name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_active(&self, conversation: Conversation) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(conversation);
    }

    pub fn clear_active(&self) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn active(&self) -> Option<Conversation> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn is_from_self(&self, event: &ChatEvent) -> bool {
        self.self_name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
            .is_some_and(|me| me.to_lowercase() == event.sender().to_lowercase())
    }

    fn is_active(&self, conversation: &Conversation) -> bool {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            == Some(conversation)
    }
}
