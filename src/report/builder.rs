//! Builds the trailing seven-day expense report.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::{Category, Expense};
use crate::errors::Result;
use crate::money;
use crate::store::ExpenseStore;

use super::date_range::{day_end_ms, day_start_ms, local_day};

/// Number of calendar days covered by a report, reference day included.
pub const REPORT_WINDOW_DAYS: i64 = 7;

/// Spend total for one calendar day of the window. Days without expenses are
/// present with a zero total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyTotal {
    pub date_label: String,
    pub total_amount: f64,
    pub total_amount_formatted: String,
}

/// Spend total for one category present in the window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category_display_name: String,
    pub total_amount: f64,
    pub total_amount_formatted: String,
    /// Fraction of the window's overall total in `[0, 1]`; `0.0` when the
    /// overall total is zero.
    pub percentage_of_total: f64,
}

/// A minimal (x-label, y-value) pair for charting collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartDataEntry {
    pub label: String,
    pub value: f64,
}

/// The assembled report over the trailing window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseReport {
    pub title: String,
    /// One entry per window day, chronological, zero-filled.
    pub daily_totals: Vec<DailyTotal>,
    /// One entry per category present, sorted by amount descending.
    pub category_totals: Vec<CategoryTotal>,
    pub overall_total_amount: f64,
    pub overall_total_amount_formatted: String,
    pub daily_chart: Vec<ChartDataEntry>,
    pub category_chart: Vec<ChartDataEntry>,
    /// Raw window snapshot, retained for export.
    pub expenses: Vec<Expense>,
}

/// Builds the report for the seven calendar days ending on, and including,
/// the day containing `reference_ms`. The store is queried exactly once; a
/// failed query surfaces as an error with no partial report.
pub fn build_report(store: &dyn ExpenseStore, reference_ms: i64) -> Result<ExpenseReport> {
    let end_day = local_day(reference_ms)?;
    let start_day = end_day - Duration::days(REPORT_WINDOW_DAYS - 1);
    let start_ms = day_start_ms(start_day)?;
    let end_ms = day_end_ms(end_day)?;

    let expenses = store.get_by_range(start_ms, end_ms)?;
    tracing::debug!(
        count = expenses.len(),
        %start_day,
        %end_day,
        "building expense report"
    );

    let formatter = money::formatter();

    // Zero-fill every window day, then fold in the actual spend.
    let mut daily: BTreeMap<chrono::NaiveDate, f64> = (0..REPORT_WINDOW_DAYS)
        .map(|offset| (start_day + Duration::days(offset), 0.0))
        .collect();
    let mut by_category: BTreeMap<Category, f64> = BTreeMap::new();
    let mut overall_total = 0.0;

    for expense in &expenses {
        let amount = expense.safe_amount();
        overall_total += amount;
        *by_category.entry(expense.resolved_category()).or_insert(0.0) += amount;
        if let Ok(day) = local_day(expense.timestamp_ms) {
            if let Some(total) = daily.get_mut(&day) {
                *total += amount;
            }
        }
    }

    let daily_totals: Vec<DailyTotal> = daily
        .iter()
        .map(|(day, &total)| DailyTotal {
            date_label: money::full_date_label(*day),
            total_amount: total,
            total_amount_formatted: formatter.format(total),
        })
        .collect();

    let daily_chart: Vec<ChartDataEntry> = daily
        .iter()
        .map(|(day, &total)| ChartDataEntry {
            label: money::weekday_label(*day),
            value: total,
        })
        .collect();

    let mut category_totals: Vec<(Category, f64)> = by_category.into_iter().collect();
    category_totals.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let category_chart: Vec<ChartDataEntry> = category_totals
        .iter()
        .map(|(category, total)| ChartDataEntry {
            label: category.short_label(),
            value: *total,
        })
        .collect();

    let category_totals: Vec<CategoryTotal> = category_totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category_display_name: category.display_name().to_uppercase(),
            total_amount: total,
            total_amount_formatted: formatter.format(total),
            percentage_of_total: if overall_total > 0.0 {
                total / overall_total
            } else {
                0.0
            },
        })
        .collect();

    Ok(ExpenseReport {
        title: format!(
            "Report: {} - {}",
            money::full_date_label(start_day),
            money::full_date_label(end_day)
        ),
        daily_totals,
        category_totals,
        overall_total_amount: overall_total,
        overall_total_amount_formatted: formatter.format(overall_total),
        daily_chart,
        category_chart,
        expenses,
    })
}
