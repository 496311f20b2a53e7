//! Domain types for recurring household bills.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub id: Uuid,
    pub title: String,
    pub subtitle: String,
    pub due: BillDue,
    pub amount: f64,
    pub status: BillStatus,
}

impl Bill {
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        due: BillDue,
        amount: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            subtitle: subtitle.into(),
            due,
            amount,
            status: BillStatus::Pending,
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_status(mut self, status: BillStatus) -> Self {
        self.status = status;
        self
    }

    /// Days from `today` until the due date; `None` for open-ended cadences.
    pub fn days_until_due(&self, today: NaiveDate) -> Option<i64> {
        match self.due {
            BillDue::On(date) => Some((date - today).num_days()),
            BillDue::Weekly => None,
        }
    }
}

impl Identifiable for Bill {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Bill {
    fn name(&self) -> &str {
        &self.title
    }
}

impl Displayable for Bill {
    fn display_label(&self) -> String {
        format!(
            "{} ({}) due {} {:.2} [{}]",
            self.title, self.subtitle, self.due, self.amount, self.status
        )
    }
}

/// When a bill falls due.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BillDue {
    On(NaiveDate),
    Weekly,
}

impl fmt::Display for BillDue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillDue::On(date) => write!(f, "{}", date.format("%b %-d, %Y")),
            BillDue::Weekly => f.write_str("Weekly"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Pending,
    DueSoon,
    Paid,
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BillStatus::Pending => "pending",
            BillStatus::DueSoon => "due soon",
            BillStatus::Paid => "paid",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_dates_render_like_a_calendar_entry() {
        let due = BillDue::On(NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        assert_eq!(due.to_string(), "Jan 5, 2025");
        assert_eq!(BillDue::Weekly.to_string(), "Weekly");
    }

    #[test]
    fn days_until_due_counts_calendar_days() {
        let today = NaiveDate::from_ymd_opt(2024, 12, 29).unwrap();
        let bill = Bill::new(
            "Rent Payment",
            "Monthly apartment rent",
            BillDue::On(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            1845.0,
        );
        assert_eq!(bill.days_until_due(today), Some(3));
        let groceries = Bill::new("Groceries Budget", "Weekly", BillDue::Weekly, 100.0);
        assert_eq!(groceries.days_until_due(today), None);
    }
}
