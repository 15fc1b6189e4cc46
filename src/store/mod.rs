//! The durable expense ledger: keyed CRUD plus inclusive range queries.

pub mod json_backend;

use crate::domain::Expense;
use crate::errors::{ExpenseError, Result};

pub use json_backend::JsonStore;

/// Abstraction over ledger backends. Scans return newest-first; range bounds
/// are inclusive on both ends. Ids are assigned on insert and never reused.
pub trait ExpenseStore: Send + Sync {
    fn insert(&mut self, expense: Expense) -> Result<i64>;
    fn update(&mut self, expense: Expense) -> Result<()>;
    fn delete(&mut self, id: i64) -> Result<()>;
    fn get_by_id(&self, id: i64) -> Result<Option<Expense>>;
    fn get_all(&self) -> Result<Vec<Expense>>;
    fn get_by_range(&self, start_ms: i64, end_ms: i64) -> Result<Vec<Expense>>;
}

/// In-memory ledger used by tests and throwaway sessions.
#[derive(Debug)]
pub struct MemoryStore {
    next_id: i64,
    expenses: Vec<Expense>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            expenses: Vec::new(),
        }
    }
}

fn newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
}

impl ExpenseStore for MemoryStore {
    fn insert(&mut self, mut expense: Expense) -> Result<i64> {
        expense.id = self.next_id;
        self.next_id += 1;
        let id = expense.id;
        self.expenses.push(expense);
        Ok(id)
    }

    fn update(&mut self, expense: Expense) -> Result<()> {
        match self.expenses.iter_mut().find(|e| e.id == expense.id) {
            Some(slot) => {
                *slot = expense;
                Ok(())
            }
            None => Err(ExpenseError::ExpenseNotFound(expense.id)),
        }
    }

    fn delete(&mut self, id: i64) -> Result<()> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        if self.expenses.len() == before {
            return Err(ExpenseError::ExpenseNotFound(id));
        }
        Ok(())
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Expense>> {
        Ok(self.expenses.iter().find(|e| e.id == id).cloned())
    }

    fn get_all(&self) -> Result<Vec<Expense>> {
        let mut all = self.expenses.clone();
        newest_first(&mut all);
        Ok(all)
    }

    fn get_by_range(&self, start_ms: i64, end_ms: i64) -> Result<Vec<Expense>> {
        let mut hits: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| e.timestamp_ms >= start_ms && e.timestamp_ms <= end_ms)
            .cloned()
            .collect();
        newest_first(&mut hits);
        Ok(hits)
    }
}
