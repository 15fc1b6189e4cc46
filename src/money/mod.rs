//! Fixed-locale money formatting and human-readable date labels.
//!
//! The application formats every amount in Indian Rupees with the en-IN
//! digit-grouping convention (1,23,45,678.90). Formatting is deterministic:
//! the same amount always renders to the same string.

use chrono::{DateTime, Local, NaiveDate, Timelike};
use once_cell::sync::Lazy;

/// Digit grouping conventions for the integer part of an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitGrouping {
    /// Groups of three throughout (1,234,567).
    Thousands,
    /// Indian convention: last three digits, then groups of two (12,34,567).
    Indian,
}

/// Formats and reverse-parses currency amounts for one fixed locale.
#[derive(Debug, Clone)]
pub struct CurrencyFormatter {
    pub symbol: &'static str,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub grouping: DigitGrouping,
    pub precision: usize,
}

static INR: Lazy<CurrencyFormatter> = Lazy::new(|| CurrencyFormatter {
    symbol: "\u{20b9}",
    decimal_separator: '.',
    grouping_separator: ',',
    grouping: DigitGrouping::Indian,
    precision: 2,
});

/// The application-wide formatter (Indian Rupee).
pub fn formatter() -> &'static CurrencyFormatter {
    &INR
}

impl CurrencyFormatter {
    /// Renders an amount as a currency string, e.g. `₹1,23,456.78`.
    pub fn format(&self, amount: f64) -> String {
        let abs = amount.abs();
        let mut body = format!("{:.*}", self.precision, abs);
        if self.decimal_separator != '.' {
            if let Some(pos) = body.find('.') {
                body.replace_range(pos..=pos, &self.decimal_separator.to_string());
            }
        }
        let split = body
            .find(self.decimal_separator)
            .unwrap_or(body.len());
        let grouped = self.group_digits(&body[..split]);
        body = format!("{}{}", grouped, &body[split..]);
        if amount < 0.0 {
            format!("-{}{}", self.symbol, body)
        } else {
            format!("{}{}", self.symbol, body)
        }
    }

    fn group_digits(&self, digits: &str) -> String {
        let mut grouped = String::new();
        let mut count = 0usize;
        for ch in digits.chars().rev() {
            let boundary = match self.grouping {
                DigitGrouping::Thousands => count != 0 && count % 3 == 0,
                DigitGrouping::Indian => count == 3 || (count > 3 && (count - 3) % 2 == 0),
            };
            if boundary {
                grouped.insert(0, self.grouping_separator);
            }
            grouped.insert(0, ch);
            count += 1;
        }
        grouped
    }

    /// Parses a string produced by [`CurrencyFormatter::format`] back into a
    /// number. Returns `0.0` and logs a diagnostic when the string cannot be
    /// parsed; never fails.
    ///
    /// This exists for callers that only retained a display string. New code
    /// should carry raw amounts and format at the presentation boundary.
    pub fn parse(&self, formatted: &str) -> f64 {
        let mut cleaned = formatted.trim();
        cleaned = cleaned.strip_prefix('-').unwrap_or(cleaned);
        cleaned = cleaned.strip_prefix(self.symbol).unwrap_or(cleaned);
        let negative = formatted.trim_start().starts_with('-');
        let cleaned: String = cleaned
            .chars()
            .filter(|&c| c != self.grouping_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return 0.0;
        }
        match cleaned.parse::<f64>() {
            Ok(value) => {
                if negative {
                    -value
                } else {
                    value
                }
            }
            Err(err) => {
                tracing::warn!(
                    original = formatted,
                    cleaned,
                    %err,
                    "could not parse formatted amount, substituting 0.0"
                );
                0.0
            }
        }
    }
}

/// Time-of-day label, `hh:mm AM/PM`.
pub fn time_label(moment: &DateTime<Local>) -> String {
    moment.format("%I:%M %p").to_string()
}

/// Short calendar-day label, `MMM dd`.
pub fn short_date_label(moment: &DateTime<Local>) -> String {
    moment.format("%b %d").to_string()
}

/// Full calendar-day label, `MMM dd, yyyy`.
pub fn full_date_label(day: NaiveDate) -> String {
    day.format("%b %d, %Y").to_string()
}

/// Weekday abbreviation, used for chart axes.
pub fn weekday_label(day: NaiveDate) -> String {
    day.format("%a").to_string()
}

/// Label for a list row relative to the reference day: today shows the time
/// only, yesterday shows `"Yesterday, hh:mm AM/PM"`, anything older shows the
/// short date.
pub fn relative_date_label(moment: &DateTime<Local>, reference_day: NaiveDate) -> String {
    let day = moment.date_naive();
    if day == reference_day {
        time_label(moment)
    } else if Some(day) == reference_day.pred_opt() {
        format!("Yesterday, {}", time_label(moment))
    } else {
        short_date_label(moment)
    }
}

/// Start-of-day time label for an hour of day, used for time-slot titles.
pub fn hour_label(hour: u32) -> String {
    // Render through a fixed date so %I/%p behave exactly as in time_label.
    let base = NaiveDate::from_ymd_opt(2000, 1, 1)
        .unwrap()
        .and_hms_opt(hour % 24, 0, 0)
        .unwrap();
    debug_assert_eq!(base.hour(), hour % 24);
    base.format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_indian_grouping() {
        let fmt = formatter();
        assert_eq!(fmt.format(0.0), "\u{20b9}0.00");
        assert_eq!(fmt.format(999.0), "\u{20b9}999.00");
        assert_eq!(fmt.format(1234.5), "\u{20b9}1,234.50");
        assert_eq!(fmt.format(123456.78), "\u{20b9}1,23,456.78");
        assert_eq!(fmt.format(12345678.9), "\u{20b9}1,23,45,678.90");
    }

    #[test]
    fn formatting_is_idempotent() {
        let fmt = formatter();
        assert_eq!(fmt.format(0.0), fmt.format(0.0));
        assert_eq!(fmt.format(1234.56), fmt.format(1234.56));
    }

    #[test]
    fn parse_round_trips_formatted_amounts() {
        let fmt = formatter();
        for amount in [0.0, 12.5, 999.99, 123456.78, 12345678.9] {
            let rendered = fmt.format(amount);
            assert!((fmt.parse(&rendered) - amount).abs() < 1e-9, "{rendered}");
        }
    }

    #[test]
    fn parse_recovers_from_garbage_with_zero() {
        let fmt = formatter();
        assert_eq!(fmt.parse("not money"), 0.0);
        assert_eq!(fmt.parse(""), 0.0);
        assert_eq!(fmt.parse("\u{20b9}"), 0.0);
    }

    #[test]
    fn hour_labels_cover_slot_boundaries() {
        assert_eq!(hour_label(0), "12:00 AM");
        assert_eq!(hour_label(3), "03:00 AM");
        assert_eq!(hour_label(12), "12:00 PM");
        assert_eq!(hour_label(21), "09:00 PM");
        assert_eq!(hour_label(24), "12:00 AM");
    }

    #[test]
    fn relative_labels_switch_on_calendar_day() {
        let reference = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let today = Local
            .from_local_datetime(&reference.and_hms_opt(14, 5, 0).unwrap())
            .earliest()
            .unwrap();
        assert_eq!(relative_date_label(&today, reference), "02:05 PM");

        let yesterday = Local
            .from_local_datetime(
                &reference.pred_opt().unwrap().and_hms_opt(9, 30, 0).unwrap(),
            )
            .earliest()
            .unwrap();
        assert_eq!(relative_date_label(&yesterday, reference), "Yesterday, 09:30 AM");

        let older = Local
            .from_local_datetime(
                &NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
            )
            .earliest()
            .unwrap();
        assert_eq!(relative_date_label(&older, reference), "Feb 01");
    }
}
