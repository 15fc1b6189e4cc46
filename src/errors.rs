use thiserror::Error;

/// Error type that captures common expense-ledger failures.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Store read failed: {0}")]
    StoreRead(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(i64),
    #[error("Missing date range parameter: {0}")]
    MissingDateRangeParameter(&'static str),
    #[error("Export write failed: {0}")]
    ExportWrite(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ExpenseError>;
