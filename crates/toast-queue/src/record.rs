//! Notification record and producer input types.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a notification, assigned by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Draw a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for NotificationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Kind of chat event a notification represents.
///
/// Only used as a display hint; queueing treats all kinds the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Channel,
    #[serde(rename = "dm")]
    DirectMessage,
    Mention,
}

/// What a producer hands to [`ToastManager::add`](crate::ToastManager::add).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastInput {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToastInput {
    pub fn new(kind: NotificationKind, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            duration_ms: None,
        }
    }

    pub fn channel(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NotificationKind::Channel, title, body)
    }

    pub fn direct_message(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NotificationKind::DirectMessage, title, body)
    }

    pub fn mention(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NotificationKind::Mention, title, body)
    }

    /// Override the manager's default display duration.
    #[must_use]
    pub fn with_duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = Some(ms);
        self
    }
}

/// An immutable notification as held by the store and shown by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    id: NotificationId,
    kind: NotificationKind,
    title: String,
    body: String,
    duration_ms: u64,
    created_at: DateTime<Utc>,
}

impl Notification {
    pub(crate) fn from_input(id: NotificationId, input: ToastInput, duration: Duration) -> Self {
        Self {
            id,
            kind: input.kind,
            title: input.title,
            body: input.body,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> NotificationId {
        self.id
    }

    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Auto-dismiss delay for this notification.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Wall-clock insertion time. Diagnostics only; ordering is by insertion.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_parse_back() {
        let a = NotificationId::new();
        let b = NotificationId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().parse::<NotificationId>().unwrap(), a);
        assert!("not-an-id".parse::<NotificationId>().is_err());
    }

    #[test]
    fn kind_uses_short_wire_names() {
        let cases = vec![
            (NotificationKind::Channel, "\"channel\""),
            (NotificationKind::DirectMessage, "\"dm\""),
            (NotificationKind::Mention, "\"mention\""),
        ];
        for (kind, want) in cases {
            assert_eq!(serde_json::to_string(&kind).unwrap(), want);
        }
    }

    #[test]
    fn input_builder_sets_duration() {
        let input = ToastInput::mention("alice mentioned you", "hi").with_duration_ms(750);
        assert_eq!(input.kind, NotificationKind::Mention);
        assert_eq!(input.duration_ms, Some(750));
    }

    #[test]
    fn record_keeps_producer_text_untouched() {
        let input = ToastInput::channel("<b>bob</b> in #general", "  spaced  ");
        let n = Notification::from_input(NotificationId::new(), input, Duration::from_millis(1200));
        assert_eq!(n.title(), "<b>bob</b> in #general");
        assert_eq!(n.body(), "  spaced  ");
        assert_eq!(n.duration(), Duration::from_millis(1200));
    }
}
