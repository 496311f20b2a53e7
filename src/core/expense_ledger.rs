//! The shared expense ledger: an in-memory cache of every expense, written
//! through to one [`ExpenseStore`], that reports each successful mutation to
//! the notification log and to its own subscribers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::core::notification_log::NotificationLog;
use crate::core::subscribers::{Listeners, Subscription};
use crate::currency::format_amount;
use crate::domain::{Expense, ExpenseUpdate, NewExpense, NotificationKind, Payer};
use crate::errors::{LedgerError, Result};
use crate::storage::{
    open_fallback, open_store, sort_newest_first, ExpenseStore, StoreBackend, StoreSettings,
};
use crate::utils::paths::fallback_file_in;

/// Settings the ledger needs after its store has been chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerOptions {
    pub categories: Vec<String>,
    pub currency_symbol: String,
    /// Where to fail over when the store becomes unreachable mid-session.
    /// `None` fails over to memory.
    pub fallback_path: Option<PathBuf>,
    /// Seed a newly created fallback with the demo rows when the store is
    /// already unreachable at load time.
    pub seed_demo_data: bool,
}

impl Default for LedgerOptions {
    fn default() -> Self {
        let config = Config::default();
        Self {
            categories: config.categories,
            currency_symbol: config.currency_symbol,
            fallback_path: None,
            seed_demo_data: false,
        }
    }
}

impl LedgerOptions {
    pub fn from_config(config: &Config, base: &Path) -> Self {
        Self {
            categories: config.categories.clone(),
            currency_symbol: config.currency_symbol.clone(),
            fallback_path: Some(
                config
                    .fallback_path
                    .clone()
                    .unwrap_or_else(|| fallback_file_in(base)),
            ),
            seed_demo_data: config.seed_demo_data,
        }
    }
}

/// Aggregate figures derived from the current expense list.
///
/// `share_amount` is always half of `total_expenses`: the household is split
/// between exactly two people, and unattributed spending raises the total
/// without crediting either balance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub total_expenses: f64,
    pub share_amount: f64,
    pub samarth_total: f64,
    pub prachi_total: f64,
    pub unattributed_total: f64,
    pub samarth_balance: f64,
    pub prachi_balance: f64,
}

impl Totals {
    pub fn compute<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Self {
        let mut totals = Totals::default();
        for expense in expenses {
            totals.total_expenses += expense.amount;
            match expense.paid_by {
                Payer::Samarth => totals.samarth_total += expense.amount,
                Payer::Prachi => totals.prachi_total += expense.amount,
                Payer::User => totals.unattributed_total += expense.amount,
            }
        }
        totals.share_amount = totals.total_expenses / 2.0;
        totals.samarth_balance = totals.samarth_total - totals.share_amount;
        totals.prachi_balance = totals.prachi_total - totals.share_amount;
        totals
    }

    pub fn subtotal(&self, payer: Payer) -> f64 {
        match payer {
            Payer::Samarth => self.samarth_total,
            Payer::Prachi => self.prachi_total,
            Payer::User => self.unattributed_total,
        }
    }

    /// Positive when `payer` has paid more than their share. `None` for the
    /// unattributed identity, which carries no balance.
    pub fn balance(&self, payer: Payer) -> Option<f64> {
        match payer {
            Payer::Samarth => Some(self.samarth_balance),
            Payer::Prachi => Some(self.prachi_balance),
            Payer::User => None,
        }
    }
}

/// Owns the expense collection. Mutations take `&mut self`; reads return
/// owned snapshots.
pub struct ExpenseLedger {
    // Store order: loaded rows first, then additions in insertion order.
    expenses: Vec<Expense>,
    store: Box<dyn ExpenseStore>,
    notifications: Arc<NotificationLog>,
    listeners: Listeners,
    options: LedgerOptions,
}

impl std::fmt::Debug for ExpenseLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseLedger")
            .field("expenses", &self.expenses.len())
            .field("backend", &self.store.backend())
            .field("options", &self.options)
            .finish()
    }
}

impl ExpenseLedger {
    /// Builds a ledger over `store`, loading every existing row. A store that
    /// is unreachable at this point is replaced by the local fallback.
    pub fn new(
        store: Box<dyn ExpenseStore>,
        notifications: Arc<NotificationLog>,
        options: LedgerOptions,
    ) -> Result<Self> {
        let started_at = Instant::now();
        let (store, expenses) = match store.load_all() {
            Ok(rows) => (store, rows),
            Err(err) if err.is_unavailable() => {
                tracing::warn!(
                    backend = %store.backend(),
                    error = %err,
                    "expense store unavailable at load, falling back to local storage"
                );
                let fallback = open_fallback(&StoreSettings {
                    database_path: None,
                    fallback_path: options.fallback_path.clone(),
                    seed_demo_data: options.seed_demo_data,
                })?;
                let rows = fallback.load_all()?;
                (fallback, rows)
            }
            Err(err) => return Err(err),
        };
        tracing::info!(
            backend = %store.backend(),
            count = expenses.len(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "expense ledger loaded"
        );
        Ok(Self {
            expenses,
            store,
            notifications,
            listeners: Listeners::new(),
            options,
        })
    }

    /// Selects a store for `config` (probing the primary database once) and
    /// loads the ledger from it.
    pub fn open(config: &Config, base: &Path, notifications: Arc<NotificationLog>) -> Result<Self> {
        let store = open_store(&config.store_settings(base))?;
        Self::new(store, notifications, LedgerOptions::from_config(config, base))
    }

    pub fn backend(&self) -> StoreBackend {
        self.store.backend()
    }

    pub fn categories(&self) -> &[String] {
        &self.options.categories
    }

    pub fn currency_symbol(&self) -> &str {
        &self.options.currency_symbol
    }

    /// Every expense, newest date first; equal dates keep insertion order.
    pub fn list(&self) -> Vec<Expense> {
        let mut rows = self.expenses.clone();
        sort_newest_first(&mut rows);
        rows
    }

    pub fn list_by_payer(&self, payer: Payer) -> Vec<Expense> {
        let mut rows: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|expense| expense.paid_by == payer)
            .cloned()
            .collect();
        sort_newest_first(&mut rows);
        rows
    }

    pub fn get(&self, id: Uuid) -> Option<Expense> {
        self.expenses.iter().find(|expense| expense.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Records a new `paid` expense.
    pub fn add(&mut self, input: NewExpense) -> Result<Expense> {
        validate_name(&input.name)?;
        self.validate_category(&input.category)?;
        validate_amount(input.amount)?;
        let expense = Expense::from_new(input, Utc::now());

        let stored = self.persist(|store| store.insert(&expense))?;
        self.expenses.push(stored.clone());
        tracing::info!(id = %stored.id, amount = stored.amount, paid_by = %stored.paid_by, "expense added");

        let message = format!(
            "New expense \"{}\" ({}) added",
            stored.name,
            self.money(stored.amount)
        );
        self.notifications.add(message, NotificationKind::ExpenseAdded);
        self.listeners.notify();
        Ok(stored)
    }

    /// Applies the supplied fields of `changes` to the expense with `id`.
    pub fn update(&mut self, id: Uuid, changes: ExpenseUpdate) -> Result<Expense> {
        let index = self.position(id)?;
        if changes.is_empty() {
            return Err(LedgerError::validation("no fields to update"));
        }
        let current = &self.expenses[index];
        let previous_amount = current.amount;
        let mut next = current.merged(&changes);
        validate_name(&next.name)?;
        self.validate_category(&next.category)?;
        validate_amount(next.amount)?;
        next.updated_at = Utc::now();

        let stored = self.persist(|store| store.update(&next))?;
        self.expenses[index] = stored.clone();
        tracing::info!(id = %id, "expense updated");

        let message = format!(
            "Expense \"{}\" updated from {} to {}",
            stored.name,
            self.money(previous_amount),
            self.money(stored.amount)
        );
        self.notifications
            .add(message, NotificationKind::ExpenseUpdated);
        self.listeners.notify();
        Ok(stored)
    }

    /// Removes the expense with `id` and returns it.
    pub fn delete(&mut self, id: Uuid) -> Result<Expense> {
        let index = self.position(id)?;
        if self.persist(|store| store.delete(id))?.is_none() {
            tracing::warn!(id = %id, "expense was already missing from the store");
        }
        let removed = self.expenses.remove(index);
        tracing::info!(id = %id, "expense deleted");

        let message = format!(
            "Expense \"{}\" ({}) deleted",
            removed.name,
            self.money(removed.amount)
        );
        self.notifications
            .add(message, NotificationKind::ExpenseDeleted);
        self.listeners.notify();
        Ok(removed)
    }

    pub fn compute_totals(&self) -> Totals {
        Totals::compute(&self.expenses)
    }

    /// Registers a callback run after every successful mutation.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback)
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or(LedgerError::NotFound(id))
    }

    fn money(&self, amount: f64) -> String {
        format_amount(amount, &self.options.currency_symbol)
    }

    /// Runs one write against the store. When the store has become
    /// unreachable, switches to the local fallback and retries once.
    fn persist<T>(&mut self, mut op: impl FnMut(&mut dyn ExpenseStore) -> Result<T>) -> Result<T> {
        match op(self.store.as_mut()) {
            Err(err) if err.is_unavailable() => {
                tracing::warn!(
                    backend = %self.store.backend(),
                    error = %err,
                    "expense store became unavailable, failing over to local storage"
                );
                self.fail_over()?;
                op(self.store.as_mut())
            }
            Err(err) => {
                tracing::error!(backend = %self.store.backend(), error = %err, "expense write failed");
                Err(err)
            }
            ok => ok,
        }
    }

    fn fail_over(&mut self) -> Result<()> {
        let settings = StoreSettings {
            database_path: None,
            fallback_path: self.options.fallback_path.clone(),
            seed_demo_data: false,
        };
        let mut store = open_fallback(&settings)?;
        store.replace_all(&self.expenses)?;
        tracing::info!(
            backend = %store.backend(),
            count = self.expenses.len(),
            "local storage seeded with current expenses"
        );
        self.store = store;
        Ok(())
    }

    /// Category must be one of the configured names, spelled exactly.
    fn validate_category(&self, category: &str) -> Result<()> {
        if category.trim().is_empty() {
            return Err(LedgerError::validation("category must not be empty"));
        }
        if self.options.categories.iter().any(|known| known == category) {
            Ok(())
        } else {
            Err(LedgerError::validation(format!(
                "unknown category `{category}`"
            )))
        }
    }
}

/// Names are stored as given; only a blank name is rejected.
fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::validation("expense name must not be empty"));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(LedgerError::validation("amount must be a finite number"));
    }
    if amount < 0.0 {
        return Err(LedgerError::validation("amount must not be negative"));
    }
    Ok(())
}
