#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use shared_expenses::{
    config::Config,
    core::{ExpenseLedger, LedgerOptions, NotificationLog},
    domain::{NewExpense, Payer},
    storage::MemoryStore,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory that outlives the calling test.
pub fn temp_base_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Empty in-memory ledger plus the log it reports to.
pub fn memory_ledger() -> (ExpenseLedger, Arc<NotificationLog>) {
    let log = NotificationLog::shared();
    let ledger = ExpenseLedger::new(
        Box::new(MemoryStore::new()),
        Arc::clone(&log),
        LedgerOptions::default(),
    )
    .expect("memory ledger");
    (ledger, log)
}

/// Config that keeps every file inside `base` and starts with no demo rows.
pub fn quiet_config(base: &std::path::Path) -> Config {
    Config {
        database_path: Some(base.join("expenses.sqlite3")),
        fallback_path: Some(base.join("expenses.json")),
        seed_demo_data: false,
        ..Config::default()
    }
}

pub fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid date")
}

pub fn expense(name: &str, category: &str, amount: f64, payer: Payer) -> NewExpense {
    NewExpense::new(day(1, 1), name, category, amount, payer)
}
