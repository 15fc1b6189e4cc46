//! Resolution of logical date filters into concrete millisecond windows.
//!
//! All windows are inclusive on both ends and computed in local time: a day
//! starts at 00:00:00.000 and ends at 23:59:59.999.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{ExpenseError, Result};

/// First day of the week for the fixed en-IN locale.
pub const FIRST_WEEKDAY: Weekday = Weekday::Sun;

/// A logical date filter as selected in a front end. The optional parameters
/// mirror UI state where a picker may not have produced a value yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFilter {
    Today,
    Yesterday,
    ThisWeek,
    ThisMonth,
    CustomDate(Option<i64>),
    DateRange { start: Option<i64>, end: Option<i64> },
}

/// An inclusive `[start_ms, end_ms]` window in epoch milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    pub fn new(start_ms: i64, end_ms: i64) -> Result<Self> {
        if end_ms < start_ms {
            return Err(ExpenseError::InvalidInput(
                "window end must not precede start".into(),
            ));
        }
        Ok(Self { start_ms, end_ms })
    }

    pub fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms <= self.end_ms
    }
}

/// Resolves a filter against a reference instant (usually "now").
pub fn resolve(filter: DateFilter, reference_ms: i64) -> Result<TimeWindow> {
    let reference_day = local_day(reference_ms)?;
    match filter {
        DateFilter::Today => day_window(reference_day),
        DateFilter::Yesterday => {
            let yesterday = reference_day - Duration::days(1);
            day_window(yesterday)
        }
        DateFilter::ThisWeek => {
            let week_start = reference_day.week(FIRST_WEEKDAY).first_day();
            let week_end = week_start + Duration::days(6);
            TimeWindow::new(day_start_ms(week_start)?, day_end_ms(week_end)?)
        }
        DateFilter::ThisMonth => {
            let month_start = reference_day
                .with_day(1)
                .expect("day 1 exists in every month");
            let month_end = last_day_of_month(month_start);
            TimeWindow::new(day_start_ms(month_start)?, day_end_ms(month_end)?)
        }
        DateFilter::CustomDate(selected) => {
            let selected =
                selected.ok_or(ExpenseError::MissingDateRangeParameter("custom date"))?;
            day_window(local_day(selected)?)
        }
        DateFilter::DateRange { start, end } => {
            let start_ms = match start {
                Some(ms) => day_start_ms(local_day(ms)?)?,
                None => 0,
            };
            let end_ms = match end {
                Some(ms) => day_end_ms(local_day(ms)?)?,
                None => reference_ms,
            };
            TimeWindow::new(start_ms, end_ms)
        }
    }
}

fn day_window(day: NaiveDate) -> Result<TimeWindow> {
    TimeWindow::new(day_start_ms(day)?, day_end_ms(day)?)
}

fn last_day_of_month(month_start: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if month_start.month() == 12 {
        (month_start.year() + 1, 1)
    } else {
        (month_start.year(), month_start.month() + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).expect("valid month start")
        - Duration::days(1)
}

/// Interprets an epoch-millisecond instant as a local moment.
pub fn local_moment(timestamp_ms: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(timestamp_ms).single()
}

/// The local calendar day containing an instant.
pub fn local_day(timestamp_ms: i64) -> Result<NaiveDate> {
    local_moment(timestamp_ms)
        .map(|moment| moment.date_naive())
        .ok_or_else(|| {
            ExpenseError::InvalidInput(format!(
                "timestamp {timestamp_ms} has no local calendar day"
            ))
        })
}

/// 00:00:00.000 of a local calendar day, in epoch milliseconds.
pub fn day_start_ms(day: NaiveDate) -> Result<i64> {
    let midnight = day.and_hms_milli_opt(0, 0, 0, 0).expect("valid midnight");
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|moment| moment.timestamp_millis())
        .ok_or_else(|| ExpenseError::InvalidInput(format!("{day} has no local midnight")))
}

/// 23:59:59.999 of a local calendar day, in epoch milliseconds.
pub fn day_end_ms(day: NaiveDate) -> Result<i64> {
    let last_instant = day
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("valid end of day");
    Local
        .from_local_datetime(&last_instant)
        .latest()
        .map(|moment| moment.timestamp_millis())
        .ok_or_else(|| ExpenseError::InvalidInput(format!("{day} has no local end of day")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExpenseError;

    fn ms_at(day: NaiveDate, hour: u32, minute: u32) -> i64 {
        Local
            .from_local_datetime(&day.and_hms_opt(hour, minute, 0).unwrap())
            .earliest()
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn today_covers_the_whole_reference_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let window = resolve(DateFilter::Today, ms_at(day, 13, 45)).unwrap();
        assert_eq!(window.start_ms, day_start_ms(day).unwrap());
        assert_eq!(window.end_ms, day_end_ms(day).unwrap());
        assert!(window.contains(day_start_ms(day).unwrap()));
        assert!(window.contains(day_end_ms(day).unwrap()));
    }

    #[test]
    fn last_millisecond_belongs_to_its_day_only() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let next = day + Duration::days(1);
        let boundary = day_end_ms(day).unwrap();

        let today = resolve(DateFilter::Today, ms_at(day, 12, 0)).unwrap();
        assert!(today.contains(boundary));

        let tomorrow = resolve(DateFilter::Today, ms_at(next, 12, 0)).unwrap();
        assert!(!tomorrow.contains(boundary));
        assert!(tomorrow.contains(boundary + 1));
    }

    #[test]
    fn yesterday_is_the_preceding_day() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let window = resolve(DateFilter::Yesterday, ms_at(day, 8, 0)).unwrap();
        let previous = day - Duration::days(1);
        assert_eq!(window.start_ms, day_start_ms(previous).unwrap());
        assert_eq!(window.end_ms, day_end_ms(previous).unwrap());
    }

    #[test]
    fn this_week_starts_on_sunday() {
        // 2024-03-05 is a Tuesday; the containing week starts Sunday 03-03.
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let window = resolve(DateFilter::ThisWeek, ms_at(day, 8, 0)).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(window.start_ms, day_start_ms(sunday).unwrap());
        assert_eq!(window.end_ms, day_end_ms(saturday).unwrap());
    }

    #[test]
    fn this_month_spans_first_to_last_day() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let window = resolve(DateFilter::ThisMonth, ms_at(day, 8, 0)).unwrap();
        let first = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(window.start_ms, day_start_ms(first).unwrap());
        assert_eq!(window.end_ms, day_end_ms(last).unwrap());
    }

    #[test]
    fn custom_date_without_selection_fails() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let err = resolve(DateFilter::CustomDate(None), ms_at(day, 8, 0)).unwrap_err();
        assert!(matches!(err, ExpenseError::MissingDateRangeParameter(_)));
    }

    #[test]
    fn custom_date_covers_the_selected_day() {
        let reference = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let selected = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let window = resolve(
            DateFilter::CustomDate(Some(ms_at(selected, 16, 30))),
            ms_at(reference, 8, 0),
        )
        .unwrap();
        assert_eq!(window.start_ms, day_start_ms(selected).unwrap());
        assert_eq!(window.end_ms, day_end_ms(selected).unwrap());
    }

    #[test]
    fn open_ended_range_defaults_to_epoch_and_reference() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let reference = ms_at(day, 8, 0);
        let window = resolve(
            DateFilter::DateRange {
                start: None,
                end: None,
            },
            reference,
        )
        .unwrap();
        assert_eq!(window.start_ms, 0);
        assert_eq!(window.end_ms, reference);
    }

    #[test]
    fn bounded_range_snaps_to_day_boundaries() {
        let reference_day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let start_day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end_day = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let window = resolve(
            DateFilter::DateRange {
                start: Some(ms_at(start_day, 17, 0)),
                end: Some(ms_at(end_day, 3, 0)),
            },
            ms_at(reference_day, 8, 0),
        )
        .unwrap();
        assert_eq!(window.start_ms, day_start_ms(start_day).unwrap());
        assert_eq!(window.end_ms, day_end_ms(end_day).unwrap());
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert!(TimeWindow::new(10, 5).is_err());
        assert!(TimeWindow::new(5, 5).is_ok());
    }
}
