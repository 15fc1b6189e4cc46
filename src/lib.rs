#![doc(test(attr(deny(warnings))))]

//! Expense Core offers the ledger, aggregation, and reporting primitives that
//! power expense-tracking front ends: date-window resolution, grouped
//! transaction views, rollup statistics, and CSV export.

pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod money;
pub mod report;
pub mod store;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::from_default_env().add_directive("expense_core=info".parse().unwrap());

    fmt().with_env_filter(filter).init();
}
