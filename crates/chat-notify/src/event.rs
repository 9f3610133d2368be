//! Chat events that may raise a toast, and how they are worded.

use serde::{Deserialize, Serialize};
use toast_queue::{NotificationKind, ToastInput};

/// Longest body shown before truncation, in characters.
pub const BODY_PREVIEW_CHARS: usize = 100;

/// A chat event the transport reports for the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    ChannelMessage {
        message_id: String,
        channel: String,
        sender: String,
        text: String,
        #[serde(default)]
        mentions_me: bool,
    },
    DirectMessage {
        message_id: String,
        sender_id: String,
        sender: String,
        text: String,
    },
}

/// The conversation the user currently has open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Conversation {
    Channel(String),
    Direct(String),
}

impl ChatEvent {
    pub fn message_id(&self) -> &str {
        match self {
            Self::ChannelMessage { message_id, .. } | Self::DirectMessage { message_id, .. } => {
                message_id
            }
        }
    }

    /// Display name of whoever sent the message.
    pub fn sender(&self) -> &str {
        match self {
            Self::ChannelMessage { sender, .. } | Self::DirectMessage { sender, .. } => sender,
        }
    }

    /// The conversation this event belongs to.
    pub fn conversation(&self) -> Conversation {
        match self {
            Self::ChannelMessage { channel, .. } => Conversation::Channel(channel.clone()),
            Self::DirectMessage { sender_id, .. } => Conversation::Direct(sender_id.clone()),
        }
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::ChannelMessage {
                mentions_me: true, ..
            } => NotificationKind::Mention,
            Self::ChannelMessage { .. } => NotificationKind::Channel,
            Self::DirectMessage { .. } => NotificationKind::DirectMessage,
        }
    }

    /// Title and truncated body for the toast.
    pub fn to_input(&self) -> ToastInput {
        let (title, text) = match self {
            Self::ChannelMessage {
                channel,
                sender,
                text,
                mentions_me: true,
                ..
            } => (format!("{sender} mentioned you in #{channel}"), text),
            Self::ChannelMessage {
                channel,
                sender,
                text,
                ..
            } => (format!("{sender} in #{channel}"), text),
            Self::DirectMessage { sender, text, .. } => (format!("New DM from {sender}"), text),
        };
        ToastInput::new(self.kind(), title, preview(text))
    }
}

/// Cut `text` to [`BODY_PREVIEW_CHARS`] characters, appending `...` if cut.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(BODY_PREVIEW_CHARS) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
