//! Persistence backends for the expense table.
//!
//! Two interchangeable implementations sit behind [`ExpenseStore`]: a SQLite
//! table (the primary, shared database) and a JSON document on local disk used
//! as the fallback. [`open_store`] probes the primary once at startup and picks
//! the backend; nothing above this module branches on which one it got.

pub mod demo;
pub mod json_backend;
pub mod memory;
pub mod sqlite_backend;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::Utc;
use uuid::Uuid;

use crate::{domain::Expense, errors::Result};

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
pub use sqlite_backend::SqliteStore;

/// Abstraction over persistence backends capable of storing expense rows.
///
/// Every write is a single unit of work: either it fully applies and returns
/// the stored row, or it fails and leaves the backend unchanged.
pub trait ExpenseStore: Send {
    /// Which backend this is. For logging only.
    fn backend(&self) -> StoreBackend;

    /// All rows, newest date first, ties in insertion order.
    fn load_all(&self) -> Result<Vec<Expense>>;

    /// Persists a new row and returns it as stored.
    fn insert(&mut self, expense: &Expense) -> Result<Expense>;

    /// Overwrites the row with the same id and returns it as stored.
    fn update(&mut self, expense: &Expense) -> Result<Expense>;

    /// Removes the row with `id`, returning it, or `None` when absent.
    fn delete(&mut self, id: Uuid) -> Result<Option<Expense>>;

    /// Replaces the whole table with `expenses`, preserving their order.
    fn replace_all(&mut self, expenses: &[Expense]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Json,
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Json => "json",
            StoreBackend::Memory => "memory",
        };
        f.write_str(label)
    }
}

/// Where the primary and fallback stores live.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    pub database_path: Option<PathBuf>,
    pub fallback_path: Option<PathBuf>,
    pub seed_demo_data: bool,
}

/// Probes the primary database once and returns the store to use for the
/// session. An unreachable primary, whether at the probe or while seeding,
/// degrades to the local fallback; other failures are returned.
pub fn open_store(settings: &StoreSettings) -> Result<Box<dyn ExpenseStore>> {
    if let Some(path) = settings.database_path.as_ref() {
        match open_primary(path, settings.seed_demo_data) {
            Ok(store) => {
                tracing::info!(path = %path.display(), "using sqlite expense store");
                return Ok(Box::new(store));
            }
            Err(err) if err.is_unavailable() => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "expense database unavailable, falling back to local storage"
                );
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "expense database failed");
                return Err(err);
            }
        }
    }
    open_fallback(settings)
}

/// Opens the primary table and seeds it when empty.
fn open_primary(path: &Path, seed_demo_data: bool) -> Result<SqliteStore> {
    let mut store = SqliteStore::open(path)?;
    if seed_demo_data && store.row_count()? == 0 {
        tracing::info!("expense table is empty, inserting demo data");
        store.replace_all(&demo::demo_expenses(Utc::now()))?;
    }
    Ok(store)
}

/// Opens the local fallback store, seeding it with the demo dataset the first
/// time it is created.
pub fn open_fallback(settings: &StoreSettings) -> Result<Box<dyn ExpenseStore>> {
    let Some(path) = settings.fallback_path.as_ref() else {
        tracing::info!("no fallback path configured, using in-memory expense store");
        let rows = if settings.seed_demo_data {
            demo::demo_expenses(Utc::now())
        } else {
            Vec::new()
        };
        return Ok(Box::new(MemoryStore::with_rows(rows)));
    };
    let fresh = !path.exists();
    let mut store = JsonStore::open(path)?;
    if fresh && settings.seed_demo_data {
        store.replace_all(&demo::demo_expenses(Utc::now()))?;
        tracing::info!(path = %path.display(), "initialized local storage with demo data");
    }
    tracing::info!(path = %path.display(), "using local json expense store");
    Ok(Box::new(store))
}

/// Orders rows newest date first; the sort is stable so equal dates keep their
/// insertion order.
pub(crate) fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
}
