//! JSON-file ledger backend.
//!
//! The whole ledger lives in a single document `{ next_id, expenses }`.
//! Every mutation rewrites the file atomically (temp file then rename) so a
//! crash mid-write never corrupts the ledger.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::Expense;
use crate::errors::{ExpenseError, Result};

use super::{ExpenseStore, MemoryStore};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerDocument {
    next_id: i64,
    expenses: Vec<Expense>,
}

/// File-backed expense ledger.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonStore {
    /// Opens the ledger at `path`, creating an empty one if absent.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = if path.exists() {
            let data = fs::read_to_string(&path)
                .map_err(|err| ExpenseError::StoreRead(format!("{}: {err}", path.display())))?;
            let document: LedgerDocument = serde_json::from_str(&data)
                .map_err(|err| ExpenseError::StoreRead(format!("{}: {err}", path.display())))?;
            MemoryStore {
                next_id: document.next_id.max(1),
                expenses: document.expenses,
            }
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let document = LedgerDocument {
            next_id: self.inner.next_id,
            expenses: self.inner.expenses.clone(),
        };
        let json = serde_json::to_string_pretty(&document)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_atomic(&self.path, &json)
    }
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let tmp = path.with_extension(TMP_SUFFIX);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

impl ExpenseStore for JsonStore {
    fn insert(&mut self, expense: Expense) -> Result<i64> {
        let id = self.inner.insert(expense)?;
        self.persist()?;
        tracing::debug!(id, "expense inserted");
        Ok(id)
    }

    fn update(&mut self, expense: Expense) -> Result<()> {
        self.inner.update(expense)?;
        self.persist()
    }

    fn delete(&mut self, id: i64) -> Result<()> {
        self.inner.delete(id)?;
        self.persist()
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Expense>> {
        self.inner.get_by_id(id)
    }

    fn get_all(&self) -> Result<Vec<Expense>> {
        self.inner.get_all()
    }

    fn get_by_range(&self, start_ms: i64, end_ms: i64) -> Result<Vec<Expense>> {
        self.inner.get_by_range(start_ms, end_ms)
    }
}
