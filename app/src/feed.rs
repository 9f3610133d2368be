//! Input feed: one JSON command per line from the chat transport side.

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use chat_notify::{ChatEvent, Conversation};
use toast_queue::NotificationId;

use crate::app::SharedState;

/// A line of input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedCommand {
    /// A chat event that may raise a toast.
    Chat { event: ChatEvent },
    /// The user closed a toast.
    Dismiss { id: NotificationId },
    /// The user opened a conversation.
    Focus { conversation: Conversation },
    /// No conversation is open.
    Blur,
    /// Drop every toast.
    Clear,
    /// Set the local user's display name.
    Identify { name: String },
    /// Notification center actions.
    MarkRead { id: NotificationId },
    MarkAllRead,
    Archive { id: NotificationId },
    ArchiveAll,
    Delete { id: NotificationId },
    ClearHistory,
}

/// Parse one input line. Blank lines yield `None`; malformed ones are logged.
pub fn parse_line(line: &str) -> Option<FeedCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(command) => Some(command),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed feed line");
            None
        }
    }
}

/// Apply one command to the shared state.
pub fn apply(state: &SharedState, command: FeedCommand) {
    match command {
        FeedCommand::Chat { event } => match state.notifier().notify(&event) {
            Ok(Some(id)) => tracing::info!(%id, message_id = event.message_id(), "Toast raised"),
            Ok(None) => {}
            Err(e) => tracing::error!("Failed to raise toast: {e}"),
        },
        FeedCommand::Dismiss { id } => {
            if !state.manager().remove(id) {
                tracing::debug!(%id, "Dismiss for a toast that is already gone");
            }
        }
        FeedCommand::Focus { conversation } => {
            tracing::debug!(?conversation, "Conversation opened");
            state.notifier().set_active(conversation);
        }
        FeedCommand::Blur => state.notifier().clear_active(),
        FeedCommand::Clear => {
            let count = state.manager().clear();
            tracing::info!(count, "Toasts cleared on request");
        }
        FeedCommand::Identify { name } => state.notifier().set_self_name(name),
        FeedCommand::MarkRead { id } => {
            if !state.history().mark_read(id) {
                tracing::debug!(%id, "No history entry to mark read");
            }
        }
        FeedCommand::MarkAllRead => {
            let count = state.history().mark_all_read();
            tracing::debug!(count, "History marked read");
        }
        FeedCommand::Archive { id } => {
            if !state.history().archive(id) {
                tracing::debug!(%id, "No history entry to archive");
            }
        }
        FeedCommand::ArchiveAll => {
            let count = state.history().archive_all();
            tracing::debug!(count, "History archived");
        }
        FeedCommand::Delete { id } => {
            if !state.history().delete(id) {
                tracing::debug!(%id, "No history entry to delete");
            }
        }
        FeedCommand::ClearHistory => {
            let count = state.history().clear();
            tracing::info!(count, "History cleared on request");
        }
    }
}

/// Read commands until end of input or shutdown.
pub async fn feed_loop<R>(state: SharedState, reader: R)
where
    R: AsyncBufRead + Unpin,
{
    let token = state.shutdown_token().clone();
    let mut lines = reader.lines();

    loop {
        let next = tokio::select! {
            _ = token.cancelled() => {
                tracing::info!("Feed loop stopped (shutdown)");
                return;
            }
            next = lines.next_line() => next,
        };

        match next {
            Ok(Some(line)) => {
                if let Some(command) = parse_line(&line) {
                    apply(&state, command);
                }
            }
            Ok(None) => {
                tracing::info!("Feed input closed");
                return;
            }
            Err(e) => {
                tracing::error!("Feed read failed: {e}");
                return;
            }
        }
    }
}
