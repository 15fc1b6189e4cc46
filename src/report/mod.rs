//! The reporting and aggregation engine: date-window resolution, grouped
//! display views, and rollup statistics.

pub mod aggregate;
pub mod builder;
pub mod date_range;

pub use aggregate::{
    aggregate, to_display_item, AggregationResult, ExpenseListItem, GroupedExpenses, Grouping,
    INVALID_TIMESTAMP_GROUP, SLOT_HOURS,
};
pub use builder::{
    build_report, CategoryTotal, ChartDataEntry, DailyTotal, ExpenseReport, REPORT_WINDOW_DAYS,
};
pub use date_range::{
    day_end_ms, day_start_ms, local_day, local_moment, resolve, DateFilter, TimeWindow,
    FIRST_WEEKDAY,
};
