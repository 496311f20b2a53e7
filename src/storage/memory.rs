use uuid::Uuid;

use crate::{
    domain::Expense,
    errors::{LedgerError, Result},
};

use super::{sort_newest_first, ExpenseStore, StoreBackend};

/// Process-local store with no persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<Expense>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Expense>) -> Self {
        Self { rows }
    }
}

impl ExpenseStore for MemoryStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Memory
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
        self.rows.push(expense.clone());
        Ok(expense.clone())
    }

    fn update(&mut self, expense: &Expense) -> Result<Expense> {
        let slot = self
            .rows
            .iter_mut()
            .find(|row| row.id == expense.id)
            .ok_or(LedgerError::NotFound(expense.id))?;
        *slot = expense.clone();
        Ok(expense.clone())
    }

    fn delete(&mut self, id: Uuid) -> Result<Option<Expense>> {
        Ok(self
            .rows
            .iter()
            .position(|row| row.id == id)
            .map(|index| self.rows.remove(index)))
    }

    fn replace_all(&mut self, expenses: &[Expense]) -> Result<()> {
        self.rows = expenses.to_vec();
        Ok(())
    }
}
