//! Expense ledger domain models.

pub mod category;
pub mod expense;

pub use category::Category;
pub use expense::Expense;
