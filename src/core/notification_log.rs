//! In-memory activity feed of ledger and bill mutations.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::core::subscribers::{Listeners, Subscription};
use crate::domain::{Notification, NotificationKind};

#[derive(Debug, Default)]
struct LogState {
    next_id: u64,
    // Most recent first.
    entries: Vec<Notification>,
}

/// Append-only, most-recent-first list of notifications with read tracking.
///
/// Shared through an `Arc` so the ledger and bill book can append while a host
/// reads; entries are never removed for the lifetime of the log.
#[derive(Debug, Default)]
pub struct NotificationLog {
    state: RwLock<LogState>,
    listeners: Listeners,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Prepends a new unread notification and signals subscribers.
    pub fn add(&self, message: impl Into<String>, kind: NotificationKind) -> Notification {
        let notification = {
            let mut state = self.write();
            state.next_id += 1;
            let notification = Notification {
                id: state.next_id,
                message: message.into(),
                kind,
                timestamp: Utc::now(),
                read: false,
            };
            state.entries.insert(0, notification.clone());
            notification
        };
        tracing::debug!(id = notification.id, kind = %kind, "notification added");
        self.listeners.notify();
        notification
    }

    /// Marks one notification read. Unknown ids are ignored; returns whether the
    /// id exists.
    pub fn mark_read(&self, id: u64) -> bool {
        let changed = {
            let mut state = self.write();
            match state.entries.iter_mut().find(|entry| entry.id == id) {
                Some(entry) => {
                    let was_unread = !entry.read;
                    entry.read = true;
                    Some(was_unread)
                }
                None => None,
            }
        };
        if changed == Some(true) {
            self.listeners.notify();
        }
        changed.is_some()
    }

    /// Marks every notification read and returns how many changed.
    pub fn mark_all_read(&self) -> usize {
        let changed = {
            let mut state = self.write();
            let mut changed = 0;
            for entry in state.entries.iter_mut().filter(|entry| !entry.read) {
                entry.read = true;
                changed += 1;
            }
            changed
        };
        if changed > 0 {
            self.listeners.notify();
        }
        changed
    }

    /// Snapshot of all notifications, most recent first.
    pub fn list(&self) -> Vec<Notification> {
        self.read().entries.clone()
    }

    pub fn get(&self, id: u64) -> Option<Notification> {
        self.read()
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
    }

    pub fn unread_count(&self) -> usize {
        self.read().entries.iter().filter(|entry| !entry.read).count()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Filters and orders the history for display.
    pub fn query(&self, query: &NotificationQuery) -> Vec<Notification> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);
        let mut matches: Vec<Notification> = self
            .read()
            .entries
            .iter()
            .filter(|entry| query.kind.map_or(true, |kind| entry.kind == kind))
            .filter(|entry| {
                needle
                    .as_deref()
                    .map_or(true, |term| entry.message.to_lowercase().contains(term))
            })
            .cloned()
            .collect();
        match query.order {
            SortOrder::NewestFirst => {
                matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)))
            }
            SortOrder::OldestFirst => {
                matches.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)))
            }
        }
        matches
    }

    /// Number of notifications per kind; kinds with no entries are omitted.
    pub fn kind_counts(&self) -> BTreeMap<NotificationKind, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.read().entries.iter() {
            *counts.entry(entry.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback)
    }

    fn read(&self) -> RwLockReadGuard<'_, LogState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LogState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Display filter for [`NotificationLog::query`].
#[derive(Debug, Clone, Default)]
pub struct NotificationQuery {
    pub kind: Option<NotificationKind>,
    pub search: Option<String>,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}
