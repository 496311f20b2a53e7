//! SQLite-backed `expenses` table.
//!
//! The table is never created implicitly: opening a database without it is
//! reported as [`LedgerError::StorageUnavailable`] so the caller can fall back
//! to local storage. [`SqliteStore::create_schema`] provisions a database explicitly.

use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use uuid::Uuid;

use crate::{
    domain::{Expense, ExpenseStatus, Payer},
    errors::{LedgerError, Result},
};

use super::{ExpenseStore, StoreBackend};

pub const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS expenses (
    id TEXT PRIMARY KEY NOT NULL,
    date TEXT NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    amount REAL NOT NULL CHECK (amount >= 0),
    paid_by TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'paid',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses (date DESC);";

const SELECT_SQL: &str = "SELECT
    id,
    date,
    name,
    category,
    amount,
    paid_by,
    status,
    created_at,
    updated_at
FROM expenses";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw column values as read from a row, decoded separately so that invalid
/// persisted data surfaces as a storage error rather than a SQL error.
struct RawRow {
    id: String,
    date: String,
    name: String,
    category: String,
    amount: f64,
    paid_by: String,
    status: Option<String>,
    created_at: String,
    updated_at: String,
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens an existing database and probes for the `expenses` table. Never
    /// creates the database file.
    pub fn open(path: &Path) -> Result<Self> {
        let started_at = Instant::now();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)?;
        let store = Self::from_connection(conn)?;
        tracing::debug!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "expense database opened"
        );
        Ok(store)
    }

    /// Creates (or opens) the database at `path` and provisions the schema.
    pub fn create_schema(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA_SQL)?;
        tracing::info!(path = %path.display(), "expense schema provisioned");
        Self::from_connection(conn)
    }

    /// Wraps an already configured connection, probing for the table.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(Duration::from_secs(5))?;
        let store = Self { conn };
        store.probe()?;
        Ok(store)
    }

    /// Cheap availability check: a missing table maps to `StorageUnavailable`.
    pub fn probe(&self) -> Result<()> {
        self.conn
            .prepare("SELECT id FROM expenses LIMIT 1")?
            .exists([])?;
        Ok(())
    }

    pub fn row_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn fetch(&self, id: Uuid) -> Result<Option<Expense>> {
        let raw = self
            .conn
            .query_row(
                &format!("{SELECT_SQL} WHERE id = ?1"),
                params![id.to_string()],
                read_row,
            )
            .optional()?;
        raw.map(decode_row).transpose()
    }
}

impl ExpenseStore for SqliteStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Sqlite
    }

    fn load_all(&self) -> Result<Vec<Expense>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_SQL} ORDER BY date DESC, rowid ASC"))?;
        let raw_rows = stmt.query_map([], read_row)?;
        let mut expenses = Vec::new();
        for raw in raw_rows {
            expenses.push(decode_row(raw?)?);
        }
        Ok(expenses)
    }

    fn insert(&mut self, expense: &Expense) -> Result<Expense> {
        insert_row(&self.conn, expense)?;
        self.fetch(expense.id)?.ok_or_else(|| {
            LedgerError::Storage(format!(
                "inserted expense {} could not be read back",
                expense.id
            ))
        })
    }

    fn update(&mut self, expense: &Expense) -> Result<Expense> {
        let changed = self.conn.execute(
            "UPDATE expenses SET
                date = ?2,
                name = ?3,
                category = ?4,
                amount = ?5,
                paid_by = ?6,
                status = ?7,
                updated_at = ?8
            WHERE id = ?1;",
            params![
                expense.id.to_string(),
                expense.date.format(DATE_FORMAT).to_string(),
                expense.name.as_str(),
                expense.category.as_str(),
                expense.amount,
                expense.paid_by.as_str(),
                expense.status.as_str(),
                expense.updated_at.to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(LedgerError::NotFound(expense.id));
        }
        self.fetch(expense.id)?
            .ok_or(LedgerError::NotFound(expense.id))
    }

    fn delete(&mut self, id: Uuid) -> Result<Option<Expense>> {
        let tx = self.conn.transaction()?;
        let existing = tx
            .query_row(
                &format!("{SELECT_SQL} WHERE id = ?1"),
                params![id.to_string()],
                read_row,
            )
            .optional()?;
        let Some(raw) = existing else {
            return Ok(None);
        };
        let removed = decode_row(raw)?;
        tx.execute("DELETE FROM expenses WHERE id = ?1;", params![id.to_string()])?;
        tx.commit()?;
        Ok(Some(removed))
    }

    fn replace_all(&mut self, expenses: &[Expense]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM expenses;", [])?;
        for expense in expenses {
            insert_row(&tx, expense)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn insert_row(conn: &Connection, expense: &Expense) -> Result<()> {
    conn.execute(
        "INSERT INTO expenses (
            id,
            date,
            name,
            category,
            amount,
            paid_by,
            status,
            created_at,
            updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
        params![
            expense.id.to_string(),
            expense.date.format(DATE_FORMAT).to_string(),
            expense.name.as_str(),
            expense.category.as_str(),
            expense.amount,
            expense.paid_by.as_str(),
            expense.status.as_str(),
            expense.created_at.to_rfc3339(),
            expense.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        date: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        amount: row.get(4)?,
        paid_by: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn decode_row(raw: RawRow) -> Result<Expense> {
    let invalid = |field: &str, value: &str| {
        LedgerError::Storage(format!(
            "invalid persisted {field} `{value}` for expense {}",
            raw.id
        ))
    };
    let id = Uuid::parse_str(&raw.id).map_err(|_| invalid("id", &raw.id))?;
    let date = NaiveDate::parse_from_str(&raw.date, DATE_FORMAT)
        .map_err(|_| invalid("date", &raw.date))?;
    let paid_by = raw
        .paid_by
        .parse::<Payer>()
        .map_err(|_| invalid("paid_by", &raw.paid_by))?;
    let status = match raw.status.as_deref() {
        Some(value) => value
            .parse::<ExpenseStatus>()
            .map_err(|_| invalid("status", value))?,
        None => ExpenseStatus::Paid,
    };
    let created_at = parse_timestamp(&raw.created_at)
        .ok_or_else(|| invalid("created_at", &raw.created_at))?;
    let updated_at = parse_timestamp(&raw.updated_at)
        .ok_or_else(|| invalid("updated_at", &raw.updated_at))?;
    Ok(Expense {
        id,
        date,
        name: raw.name,
        category: raw.category,
        amount: raw.amount,
        paid_by,
        status,
        created_at,
        updated_at,
    })
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|stamp| stamp.with_timezone(&Utc))
}
