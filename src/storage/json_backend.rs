use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use uuid::Uuid;

use crate::{
    domain::Expense,
    errors::{LedgerError, Result},
    utils::persistence::write_atomic,
};

use super::{sort_newest_first, ExpenseStore, StoreBackend};

pub const JSON_SCHEMA_VERSION: u32 = 1;

/// On-disk layout of the fallback document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ExpenseDocument {
    schema_version: u32,
    expenses: Vec<Expense>,
}

/// Local fallback store: the whole table lives in one JSON document that is
/// rewritten atomically on every mutation.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    // Insertion order.
    rows: Vec<Expense>,
}

impl JsonStore {
    /// Opens the document at `path`. A missing file is an empty store; the file
    /// is only created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let rows = if path.exists() {
            load_document(&path)?.expenses
        } else {
            Vec::new()
        };
        Ok(Self { path, rows })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&mut self, rows: Vec<Expense>) -> Result<()> {
        let document = ExpenseDocument {
            schema_version: JSON_SCHEMA_VERSION,
            expenses: rows,
        };
        let json = serde_json::to_string_pretty(&document)?;
        write_atomic(&self.path, &json)?;
        self.rows = document.expenses;
        Ok(())
    }
}

impl ExpenseStore for JsonStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Json
    }

    fn load_all(&self) -> Result<Vec<Expense>> {
        let mut rows = self.rows.clone();
        sort_newest_first(&mut rows);
        Ok(rows)
    }

    fn insert(&mut self, expense: &Expense) -> Result<Expense> {
        if self.rows.iter().any(|row| row.id == expense.id) {
            return Err(LedgerError::Storage(format!(
                "expense {} already exists",
                expense.id
            )));
        }
        let mut rows = self.rows.clone();
        rows.push(expense.clone());
        self.commit(rows)?;
        Ok(expense.clone())
    }

    fn update(&mut self, expense: &Expense) -> Result<Expense> {
        let mut rows = self.rows.clone();
        let slot = rows
            .iter_mut()
            .find(|row| row.id == expense.id)
            .ok_or(LedgerError::NotFound(expense.id))?;
        *slot = expense.clone();
        self.commit(rows)?;
        Ok(expense.clone())
    }

    fn delete(&mut self, id: Uuid) -> Result<Option<Expense>> {
        let Some(index) = self.rows.iter().position(|row| row.id == id) else {
            return Ok(None);
        };
        let mut rows = self.rows.clone();
        let removed = rows.remove(index);
        self.commit(rows)?;
        Ok(Some(removed))
    }

    fn replace_all(&mut self, expenses: &[Expense]) -> Result<()> {
        self.commit(expenses.to_vec())
    }
}

fn load_document(path: &Path) -> Result<ExpenseDocument> {
    let data = fs::read_to_string(path)?;
    let document: ExpenseDocument = serde_json::from_str(&data)?;
    if document.schema_version > JSON_SCHEMA_VERSION {
        return Err(LedgerError::Storage(format!(
            "expense document `{}` is from a newer schema version",
            path.display()
        )));
    }
    Ok(document)
}
