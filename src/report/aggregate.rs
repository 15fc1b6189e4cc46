//! The aggregation engine: flat display lists, grouped buckets, and totals.
//!
//! Aggregation is a pure pass over an immutable snapshot of expenses; running
//! it twice on the same input produces identical output, formatted strings
//! included. The flat list is sorted newest-first — the one ordering
//! guarantee the rest of the system relies on (CSV export deliberately uses
//! the opposite order, see [`crate::export`]).

use std::collections::BTreeMap;

use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::domain::{Category, Expense};
use crate::errors::Result;
use crate::money;

use super::date_range::{local_day, local_moment};

/// How the transaction list should be partitioned for display.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Grouping {
    #[default]
    None,
    ByCategory,
    ByTime,
}

/// Title of the sentinel bucket holding expenses whose timestamp cannot be
/// resolved to a local calendar day. Such expenses are never dropped.
pub const INVALID_TIMESTAMP_GROUP: &str = "Invalid timestamp";

/// Hours covered by one time-of-day slot; 8 slots partition a day.
pub const SLOT_HOURS: u32 = 3;

/// An expense mapped for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseListItem {
    pub id: i64,
    pub title: String,
    pub amount: f64,
    pub amount_formatted: String,
    pub category: Category,
    pub date_label: String,
    pub timestamp_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,
}

/// A named bucket of display items with its own subtotal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupedExpenses {
    pub title: String,
    pub expenses: Vec<ExpenseListItem>,
    pub total_amount: f64,
    pub total_amount_formatted: String,
}

/// Output of one aggregation pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregationResult {
    /// All input expenses mapped for display, newest first.
    pub expenses: Vec<ExpenseListItem>,
    /// Buckets per the requested grouping; empty for [`Grouping::None`].
    pub groups: Vec<GroupedExpenses>,
    pub total_count: usize,
    pub total_amount: f64,
    pub total_amount_formatted: String,
}

/// Maps one expense to its display form relative to the reference day.
pub fn to_display_item(expense: &Expense, reference_day: NaiveDate) -> ExpenseListItem {
    let date_label = match local_moment(expense.timestamp_ms) {
        Some(moment) => money::relative_date_label(&moment, reference_day),
        None => INVALID_TIMESTAMP_GROUP.to_string(),
    };
    ExpenseListItem {
        id: expense.id,
        title: expense.title.clone(),
        amount: expense.amount,
        amount_formatted: money::formatter().format(expense.amount),
        category: expense.resolved_category(),
        date_label,
        timestamp_ms: expense.timestamp_ms,
        image_uri: expense.image_uri.clone(),
    }
}

/// Runs one aggregation pass over an immutable snapshot.
pub fn aggregate(
    expenses: &[Expense],
    grouping: Grouping,
    reference_ms: i64,
) -> Result<AggregationResult> {
    let reference_day = local_day(reference_ms)?;

    let mut items: Vec<ExpenseListItem> = expenses
        .iter()
        .map(|expense| to_display_item(expense, reference_day))
        .collect();
    items.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));

    let total_amount: f64 = expenses.iter().map(Expense::safe_amount).sum();

    let groups = match grouping {
        Grouping::None => Vec::new(),
        Grouping::ByCategory => group_by_category(&items),
        Grouping::ByTime => group_by_time(&items),
    };

    Ok(AggregationResult {
        expenses: items,
        groups,
        total_count: expenses.len(),
        total_amount,
        total_amount_formatted: money::formatter().format(total_amount),
    })
}

fn sanitize(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

fn bucket(title: String, members: Vec<ExpenseListItem>) -> GroupedExpenses {
    let total_amount: f64 = members.iter().map(|item| sanitize(item.amount)).sum();
    GroupedExpenses {
        title,
        expenses: members,
        total_amount,
        total_amount_formatted: money::formatter().format(total_amount),
    }
}

/// One bucket per category present in the input (no zero-filling), titled
/// with the uppercased display name and sorted alphabetically by title.
fn group_by_category(items: &[ExpenseListItem]) -> Vec<GroupedExpenses> {
    let mut by_title: BTreeMap<String, Vec<ExpenseListItem>> = BTreeMap::new();
    for item in items {
        by_title
            .entry(item.category.display_name().to_uppercase())
            .or_default()
            .push(item.clone());
    }
    // Members keep the newest-first order of the flat list.
    by_title
        .into_iter()
        .map(|(title, members)| bucket(title, members))
        .collect()
}

fn slot_title(day: NaiveDate, slot: u32) -> String {
    let start_hour = slot * SLOT_HOURS;
    // The final slot runs up to midnight of the following day.
    let end_hour = ((slot + 1) * SLOT_HOURS) % 24;
    format!(
        "{} ({} - {})",
        money::full_date_label(day),
        money::hour_label(start_hour),
        money::hour_label(end_hour)
    )
}

/// Buckets keyed by (local calendar day, 3-hour slot), ordered by the
/// timestamp of their most recent member descending, slot index breaking
/// ties. Unresolvable timestamps land in a trailing sentinel bucket.
fn group_by_time(items: &[ExpenseListItem]) -> Vec<GroupedExpenses> {
    let mut by_slot: BTreeMap<(NaiveDate, u32), Vec<ExpenseListItem>> = BTreeMap::new();
    let mut invalid: Vec<ExpenseListItem> = Vec::new();

    for item in items {
        match local_moment(item.timestamp_ms) {
            Some(moment) => {
                let key = (moment.date_naive(), moment.hour() / SLOT_HOURS);
                by_slot.entry(key).or_default().push(item.clone());
            }
            None => invalid.push(item.clone()),
        }
    }

    let mut slots: Vec<((NaiveDate, u32), Vec<ExpenseListItem>)> = by_slot.into_iter().collect();
    slots.sort_by(|((_, slot_a), members_a), ((_, slot_b), members_b)| {
        let newest_a = members_a.first().map(|item| item.timestamp_ms);
        let newest_b = members_b.first().map(|item| item.timestamp_ms);
        newest_b.cmp(&newest_a).then(slot_a.cmp(slot_b))
    });

    let mut groups: Vec<GroupedExpenses> = slots
        .into_iter()
        .map(|((day, slot), members)| bucket(slot_title(day, slot), members))
        .collect();

    if !invalid.is_empty() {
        groups.push(bucket(INVALID_TIMESTAMP_GROUP.to_string(), invalid));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::date_range::day_start_ms;
    use chrono::Duration;

    const HOUR_MS: i64 = 3_600_000;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn expense_at(title: &str, amount: f64, category: Category, ms: i64) -> Expense {
        let mut expense = Expense::new(title, amount, category, ms);
        expense.id = ms;
        expense
    }

    fn sample() -> (Vec<Expense>, i64) {
        let base = day_start_ms(day()).unwrap();
        let reference = base + 12 * HOUR_MS;
        let expenses = vec![
            expense_at("Chai", 20.0, Category::Food, base + HOUR_MS),
            expense_at("Bus", 35.0, Category::Transport, base + 4 * HOUR_MS),
            expense_at("Lunch", 120.0, Category::Food, base + 5 * HOUR_MS),
        ];
        (expenses, reference)
    }

    #[test]
    fn flat_list_is_newest_first() {
        let (expenses, reference) = sample();
        let result = aggregate(&expenses, Grouping::None, reference).unwrap();
        assert!(result.groups.is_empty());
        let stamps: Vec<i64> = result.expenses.iter().map(|i| i.timestamp_ms).collect();
        let mut sorted = stamps.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(stamps, sorted);
    }

    #[test]
    fn category_buckets_are_alphabetical_with_uppercase_titles() {
        let (expenses, reference) = sample();
        let result = aggregate(&expenses, Grouping::ByCategory, reference).unwrap();
        let titles: Vec<&str> = result.groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["FOOD & DINING", "TRANSPORT"]);
        assert_eq!(result.groups[0].expenses.len(), 2);
        assert!((result.groups[0].total_amount - 140.0).abs() < 1e-9);
    }

    #[test]
    fn time_buckets_use_three_hour_slots() {
        let (expenses, reference) = sample();
        let result = aggregate(&expenses, Grouping::ByTime, reference).unwrap();
        // 01:00 falls in slot 0, 04:00 and 05:00 in slot 1.
        assert_eq!(result.groups.len(), 2);
        assert_eq!(
            result.groups[0].title,
            format!("{} (03:00 AM - 06:00 AM)", money::full_date_label(day()))
        );
        assert_eq!(
            result.groups[1].title,
            format!("{} (12:00 AM - 03:00 AM)", money::full_date_label(day()))
        );
        assert_eq!(result.groups[0].expenses.len(), 2);
    }

    #[test]
    fn final_slot_ends_at_midnight() {
        assert_eq!(
            slot_title(day(), 7),
            format!("{} (09:00 PM - 12:00 AM)", money::full_date_label(day()))
        );
    }

    #[test]
    fn most_recent_slot_sorts_first_across_days() {
        let base = day_start_ms(day()).unwrap();
        let earlier_day = day_start_ms(day() - Duration::days(2)).unwrap();
        let expenses = vec![
            expense_at("Old", 10.0, Category::Other, earlier_day + 22 * HOUR_MS),
            expense_at("New", 10.0, Category::Other, base + 2 * HOUR_MS),
        ];
        let result = aggregate(&expenses, Grouping::ByTime, base + 12 * HOUR_MS).unwrap();
        assert_eq!(result.groups[0].expenses[0].title, "New");
        assert_eq!(result.groups[1].expenses[0].title, "Old");
    }

    #[test]
    fn unresolvable_timestamps_go_to_the_sentinel_bucket() {
        let base = day_start_ms(day()).unwrap();
        let expenses = vec![
            expense_at("Fine", 10.0, Category::Food, base + HOUR_MS),
            expense_at("Broken", 10.0, Category::Food, i64::MAX),
        ];
        let result = aggregate(&expenses, Grouping::ByTime, base + 12 * HOUR_MS).unwrap();
        let last = result.groups.last().unwrap();
        assert_eq!(last.title, INVALID_TIMESTAMP_GROUP);
        assert_eq!(last.expenses.len(), 1);
        let member_count: usize = result.groups.iter().map(|g| g.expenses.len()).sum();
        assert_eq!(member_count, expenses.len());
    }

    #[test]
    fn totals_ignore_non_finite_and_negative_amounts() {
        let base = day_start_ms(day()).unwrap();
        let mut bad = expense_at("Bad", 50.0, Category::Food, base + HOUR_MS);
        bad.amount = f64::NAN;
        let mut negative = expense_at("Neg", 50.0, Category::Food, base + HOUR_MS);
        negative.amount = -10.0;
        let expenses = vec![
            expense_at("Good", 75.0, Category::Food, base + HOUR_MS),
            bad,
            negative,
        ];
        let result = aggregate(&expenses, Grouping::ByCategory, base + 12 * HOUR_MS).unwrap();
        assert!((result.total_amount - 75.0).abs() < 1e-9);
        assert!((result.groups[0].total_amount - 75.0).abs() < 1e-9);
        assert_eq!(result.total_count, 3);
    }

    #[test]
    fn category_fallback_applies_in_display_and_grouping() {
        let base = day_start_ms(day()).unwrap();
        let mut expense = expense_at("Mystery", 10.0, Category::Food, base + HOUR_MS);
        expense.category = "bogus_unknown".into();
        let result = aggregate(
            std::slice::from_ref(&expense),
            Grouping::ByCategory,
            base + 12 * HOUR_MS,
        )
        .unwrap();
        assert_eq!(result.expenses[0].category, Category::Other);
        assert_eq!(result.groups[0].title, "OTHER");
    }

    #[test]
    fn aggregation_is_idempotent() {
        let (expenses, reference) = sample();
        let first = aggregate(&expenses, Grouping::ByTime, reference).unwrap();
        let second = aggregate(&expenses, Grouping::ByTime, reference).unwrap();
        assert_eq!(first, second);
    }
}
