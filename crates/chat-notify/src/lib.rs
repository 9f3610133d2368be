//! Turns chat events into toast notifications.
//!
//! Handles wording (titles, body previews), suppression of the user's own
//! messages and of the conversation they already have open, and keeps a
//! notification history beside the toasts.

pub mod event;
pub mod history;
pub mod notifier;

pub use event::{BODY_PREVIEW_CHARS, ChatEvent, Conversation, preview};
pub use history::{Category, EntryStatus, History, HistoryEntry, MAX_HISTORY, Priority};
pub use notifier::Notifier;
