use chrono::NaiveDate;

use expense_core::domain::{Category, Expense};
use expense_core::export::to_csv;
use expense_core::report::{aggregate, build_report, day_start_ms, resolve, DateFilter, Grouping};
use expense_core::store::{ExpenseStore, MemoryStore};

const HOUR_MS: i64 = 3_600_000;

#[test]
fn record_aggregate_report_export_smoke() {
    expense_core::init();

    let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let base = day_start_ms(day).unwrap();
    let now_ms = base + 18 * HOUR_MS;

    let mut store = MemoryStore::new();
    store
        .insert(Expense::new("Coffee", 45.0, Category::Food, base + 10 * HOUR_MS))
        .unwrap();
    store
        .insert(Expense::new("Metro", 30.0, Category::Transport, base + 12 * HOUR_MS))
        .unwrap();

    let window = resolve(DateFilter::Today, now_ms).unwrap();
    let snapshot = store.get_by_range(window.start_ms, window.end_ms).unwrap();
    let result = aggregate(&snapshot, Grouping::ByCategory, now_ms).unwrap();
    assert_eq!(result.total_count, 2);
    assert!((result.total_amount - 75.0).abs() < 1e-9);

    let report = build_report(&store, now_ms).unwrap();
    assert_eq!(report.daily_totals.len(), 7);
    assert!((report.overall_total_amount - 75.0).abs() < 1e-9);

    let csv = to_csv(&report.expenses, &report.title, now_ms);
    assert!(csv.contains("Coffee"));
    assert!(csv.contains("Metro"));
    assert!(csv.starts_with("Report Title:,"));
}
