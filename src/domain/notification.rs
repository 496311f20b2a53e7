use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single activity-feed entry. Immutable apart from `read`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// What kind of mutation a notification describes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ExpenseAdded,
    ExpenseUpdated,
    ExpenseDeleted,
    BillUpdated,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 4] = [
        NotificationKind::ExpenseAdded,
        NotificationKind::ExpenseUpdated,
        NotificationKind::ExpenseDeleted,
        NotificationKind::BillUpdated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::ExpenseAdded => "expense_added",
            NotificationKind::ExpenseUpdated => "expense_updated",
            NotificationKind::ExpenseDeleted => "expense_deleted",
            NotificationKind::BillUpdated => "bill_updated",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        NotificationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown notification type `{value}`"))
    }
}
