//! Domain types for shared expenses and the people who pay them.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// One recorded expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub date: NaiveDate,
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub paid_by: Payer,
    #[serde(default)]
    pub status: ExpenseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Builds a fresh `paid` record with a new identifier from validated input.
    pub fn from_new(input: NewExpense, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: input.date,
            name: input.name,
            category: input.category,
            amount: input.amount,
            paid_by: input.paid_by,
            status: ExpenseStatus::Paid,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy with every supplied field of `changes` applied.
    pub fn merged(&self, changes: &ExpenseUpdate) -> Self {
        let mut next = self.clone();
        if let Some(date) = changes.date {
            next.date = date;
        }
        if let Some(name) = changes.name.as_ref() {
            next.name = name.clone();
        }
        if let Some(category) = changes.category.as_ref() {
            next.category = category.clone();
        }
        if let Some(amount) = changes.amount {
            next.amount = amount;
        }
        if let Some(paid_by) = changes.paid_by {
            next.paid_by = paid_by;
        }
        if let Some(status) = changes.status {
            next.status = status;
        }
        next
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Expense {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!(
            "{} {} [{}] {:.2} by {} ({})",
            self.date, self.name, self.category, self.amount, self.paid_by, self.status
        )
    }
}

/// Input accepted by the ledger when recording a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub paid_by: Payer,
}

impl NewExpense {
    pub fn new(
        date: NaiveDate,
        name: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        paid_by: Payer,
    ) -> Self {
        Self {
            date,
            name: name.into(),
            category: category.into(),
            amount,
            paid_by,
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseUpdate {
    pub date: Option<NaiveDate>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub paid_by: Option<Payer>,
    pub status: Option<ExpenseStatus>,
}

impl ExpenseUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn paid_by(mut self, payer: Payer) -> Self {
        self.paid_by = Some(payer);
        self
    }

    pub fn status(mut self, status: ExpenseStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Who paid for an expense. `User` is the unattributed identity: its amounts
/// count toward the household total but belong to neither tracked person.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Payer {
    Samarth,
    Prachi,
    User,
}

impl Payer {
    /// The two people who split the household total.
    pub const TRACKED: [Payer; 2] = [Payer::Samarth, Payer::Prachi];
    pub const ALL: [Payer; 3] = [Payer::Samarth, Payer::Prachi, Payer::User];

    pub fn is_tracked(self) -> bool {
        !matches!(self, Payer::User)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Payer::Samarth => "Samarth",
            Payer::Prachi => "Prachi",
            Payer::User => "User",
        }
    }
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Payer {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "samarth" => Ok(Payer::Samarth),
            "prachi" => Ok(Payer::Prachi),
            "user" | "unattributed" => Ok(Payer::User),
            other => Err(format!("unknown payer `{other}`")),
        }
    }
}

/// Payment state of an expense; only changed through an explicit update.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    #[default]
    Paid,
    Pending,
}

impl ExpenseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseStatus::Paid => "paid",
            ExpenseStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "paid" => Ok(ExpenseStatus::Paid),
            "pending" => Ok(ExpenseStatus::Pending),
            other => Err(format!("unknown status `{other}`")),
        }
    }
}
