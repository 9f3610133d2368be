//! Notification center: a bounded, newest-first record of raised toasts.
//!
//! Toasts disappear on their own; history entries stay until deleted or
//! pushed out by newer ones, and carry a read/archived status.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use toast_queue::{NotificationId, NotificationKind, ToastInput};

use crate::event::{ChatEvent, Conversation};

/// Entries kept before the oldest are dropped.
pub const MAX_HISTORY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Unread,
    Read,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn for_kind(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Mention => Self::High,
            NotificationKind::DirectMessage => Self::Medium,
            NotificationKind::Channel => Self::Low,
        }
    }
}

/// Whether an entry came from another person directly or from a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    System,
    User,
}

impl Category {
    pub fn for_kind(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::DirectMessage => Self::User,
            NotificationKind::Channel | NotificationKind::Mention => Self::System,
        }
    }
}

/// One recorded notification. Shares its id with the toast it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub priority: Priority,
    pub category: Category,
    pub status: EntryStatus,
    /// Where the user lands when opening the entry
    pub conversation: Conversation,
    pub message_id: String,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(id: NotificationId, event: &ChatEvent, input: ToastInput) -> Self {
        Self {
            id,
            kind: input.kind,
            title: input.title,
            body: input.body,
            priority: Priority::for_kind(input.kind),
            category: Category::for_kind(input.kind),
            status: EntryStatus::Unread,
            conversation: event.conversation(),
            message_id: event.message_id().to_string(),
            recorded_at: Utc::now(),
        }
    }
}

/// Shared handle to the notification center. Clones see the same entries.
#[derive(Debug, Clone)]
pub struct History {
    entries: Arc<Mutex<VecDeque<HistoryEntry>>>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Insert at the front, dropping the oldest entries past capacity.
    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self.lock();
        entries.retain(|e| e.id != entry.id);
        entries.push_front(entry);
        if entries.len() > self.capacity {
            let dropped = entries.len() - self.capacity;
            entries.truncate(self.capacity);
            tracing::debug!(dropped, "History full, oldest entries dropped");
        }
    }

    /// Snapshot, newest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn get(&self, id: NotificationId) -> Option<HistoryEntry> {
        self.lock().iter().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|e| e.status == EntryStatus::Unread)
            .count()
    }

    /// Mark one unread entry as read. Archived entries stay archived.
    pub fn mark_read(&self, id: NotificationId) -> bool {
        self.update(id, |e| {
            if e.status == EntryStatus::Unread {
                e.status = EntryStatus::Read;
            }
        })
    }

    /// Returns how many entries changed.
    pub fn mark_all_read(&self) -> usize {
        self.update_all(|e| {
            let unread = e.status == EntryStatus::Unread;
            if unread {
                e.status = EntryStatus::Read;
            }
            unread
        })
    }

    pub fn archive(&self, id: NotificationId) -> bool {
        self.update(id, |e| e.status = EntryStatus::Archived)
    }

    /// Returns how many entries changed.
    pub fn archive_all(&self) -> usize {
        self.update_all(|e| {
            let changed = e.status != EntryStatus::Archived;
            e.status = EntryStatus::Archived;
            changed
        })
    }

    /// Remove one entry. Absent ids are a no-op.
    pub fn delete(&self, id: NotificationId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Drop every entry, returning how many were held.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let count = entries.len();
        entries.clear();
        count
    }

    fn update(&self, id: NotificationId, f: impl FnOnce(&mut HistoryEntry)) -> bool {
        match self.lock().iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }

    fn update_all(&self, mut f: impl FnMut(&mut HistoryEntry) -> bool) -> usize {
        self.lock().iter_mut().map(|e| f(e)).filter(|changed| *changed).count()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<HistoryEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(n: usize, mentions_me: bool) -> ChatEvent {
        ChatEvent::ChannelMessage {
            message_id: format!("m{n}"),
            channel: "general".into(),
            sender: "alice".into(),
            text: format!("message {n}"),
            mentions_me,
        }
    }

    fn entry(n: usize) -> HistoryEntry {
        let event = event(n, false);
        HistoryEntry::new(NotificationId::new(), &event, event.to_input())
    }

    fn statuses(history: &History) -> Vec<EntryStatus> {
        history.entries().iter().map(|e| e.status).collect()
    }

    #[test]
    fn priority_and_category_follow_kind() {
        let cases = vec![
            (NotificationKind::Mention, Priority::High, Category::System),
            (NotificationKind::DirectMessage, Priority::Medium, Category::User),
            (NotificationKind::Channel, Priority::Low, Category::System),
        ];
        for (kind, priority, category) in cases {
            assert_eq!(Priority::for_kind(kind), priority, "{kind:?}");
            assert_eq!(Category::for_kind(kind), category, "{kind:?}");
        }
    }

    #[test]
    fn entry_copies_toast_text_and_target() {
        let event = event(1, true);
        let id = NotificationId::new();
        let e = HistoryEntry::new(id, &event, event.to_input());

        assert_eq!(e.id, id);
        assert_eq!(e.kind, NotificationKind::Mention);
        assert_eq!(e.title, "alice mentioned you in #general");
        assert_eq!(e.body, "message 1");
        assert_eq!(e.status, EntryStatus::Unread);
        assert_eq!(e.conversation, Conversation::Channel("general".into()));
        assert_eq!(e.message_id, "m1");
    }

    #[test]
    fn newest_first_and_bounded() {
        let history = History::with_capacity(3);
        for n in 0..5 {
            history.record(entry(n));
        }

        let ids: Vec<_> = history
            .entries()
            .iter()
            .map(|e| e.message_id.clone())
            .collect();
        assert_eq!(ids, vec!["m4", "m3", "m2"]);
        assert_eq!(History::new().capacity(), MAX_HISTORY);
    }

    #[test]
    fn read_and_archive_transitions() {
        let history = History::new();
        let (a, b, c) = (entry(1), entry(2), entry(3));
        let (a_id, b_id) = (a.id, b.id);
        for e in [a, b, c] {
            history.record(e);
        }
        assert_eq!(history.unread_count(), 3);

        assert!(history.mark_read(a_id));
        assert!(history.archive(b_id));
        assert!(!history.mark_read(NotificationId::new()));
        // newest first: c, b, a
        assert_eq!(
            statuses(&history),
            vec![EntryStatus::Unread, EntryStatus::Archived, EntryStatus::Read]
        );

        // archived entries are not pulled back to read
        assert!(history.mark_read(b_id));
        assert_eq!(history.get(b_id).unwrap().status, EntryStatus::Archived);

        assert_eq!(history.mark_all_read(), 1);
        assert_eq!(history.unread_count(), 0);
        assert_eq!(history.archive_all(), 2);
        assert!(statuses(&history).iter().all(|s| *s == EntryStatus::Archived));
    }

    #[test]
    fn delete_and_clear() {
        let history = History::new();
        let a = entry(1);
        let a_id = a.id;
        history.record(a);
        history.record(entry(2));

        assert!(history.delete(a_id));
        assert!(!history.delete(a_id));
        assert_eq!(history.len(), 1);

        let shared = history.clone();
        assert_eq!(shared.clear(), 1);
        assert!(history.is_empty());
    }

    #[test]
    fn rerecording_an_id_replaces_it() {
        let history = History::new();
        let first = entry(1);
        let mut again = first.clone();
        again.body = "edited".into();

        history.record(first);
        history.record(entry(2));
        history.record(again);

        let entries = history.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].body, "edited");
    }
}
