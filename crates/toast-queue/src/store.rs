//! Arrival-ordered notification store.
//!
//! Records live in a map keyed by id; a separate deque keeps arrival order.
//! Removal only touches the map and leaves a stale id behind in the deque,
//! which is popped once it reaches the front (or swept by compaction), so
//! append, remove and oldest are all O(1) amortized. Stale ids are tracked
//! so a re-appended id never appears twice in the order.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::record::{Notification, NotificationId};
use crate::{Result, ToastError};

/// Stale ids tolerated in the order deque before a full sweep.
const COMPACT_THRESHOLD: usize = 64;

#[derive(Debug, Default)]
pub struct NotificationStore {
    order: VecDeque<NotificationId>,
    records: HashMap<NotificationId, Notification>,
    /// Ids removed from `records` but still present in `order`
    stale: HashSet<NotificationId>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record at the tail.
    pub fn append(&mut self, record: Notification) -> Result<()> {
        let id = record.id();
        if self.records.contains_key(&id) {
            return Err(ToastError::DuplicateId(id));
        }
        if self.stale.remove(&id) {
            self.order.retain(|queued| *queued != id);
        }
        self.order.push_back(id);
        self.records.insert(id, record);
        Ok(())
    }

    /// Remove a record by id. Absent ids are a no-op.
    pub fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        let removed = self.records.remove(&id)?;
        self.stale.insert(id);
        self.trim_front();
        if self.stale.len() > COMPACT_THRESHOLD {
            let records = &self.records;
            self.order.retain(|id| records.contains_key(id));
            self.stale.clear();
        }
        Some(removed)
    }

    /// The earliest-arrived record still present.
    pub fn oldest(&self) -> Option<&Notification> {
        self.order.front().and_then(|id| self.records.get(id))
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: NotificationId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Owned copy of the current sequence, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.iter().cloned().collect()
    }

    /// Drop every record, returning how many were held.
    pub fn clear(&mut self) -> usize {
        let count = self.records.len();
        self.records.clear();
        self.order.clear();
        self.stale.clear();
        count
    }

    fn trim_front(&mut self) {
        while let Some(id) = self.order.front() {
            if self.records.contains_key(id) {
                break;
            }
            if let Some(id) = self.order.pop_front() {
                self.stale.remove(&id);
            }
        }
    }
}
