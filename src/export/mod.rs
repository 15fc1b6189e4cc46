//! Export-content generation: CSV serialization plus simulated PDF/TXT
//! payloads. Delivery of the generated text (file share, OS sheet) is a
//! collaborator concern; this module only emits well-formed content.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Expense;
use crate::errors::{ExpenseError, Result};
use crate::report::local_moment;

/// Supported export formats. PDF and TXT are explicitly simulated: they emit
/// a plain-text placeholder, not a rendered document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
    Txt,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Txt => "text/plain",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Txt => "txt",
        }
    }
}

/// Serializes a transaction snapshot to CSV.
///
/// Rows are sorted oldest-first — the opposite of the newest-first flat
/// display list. The asymmetry is intentional and preserved from the
/// original behavior; do not "fix" it.
pub fn to_csv(expenses: &[Expense], report_title: &str, generated_at_ms: i64) -> String {
    let mut rows: Vec<&Expense> = expenses.iter().collect();
    rows.sort_by(|a, b| a.timestamp_ms.cmp(&b.timestamp_ms));

    let mut out = String::new();
    out.push_str(&format!("Report Title:,{}\n", csv_field(report_title)));
    out.push('\n');
    out.push_str(&format!(
        "Exported Date:,{}\n",
        csv_field(&iso_timestamp(generated_at_ms))
    ));
    out.push('\n');
    out.push_str("Date,Title,Amount,Category,Notes\n");

    for expense in rows {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_field(&iso_timestamp(expense.timestamp_ms)),
            csv_field(&expense.title),
            expense.amount,
            csv_field(&expense.category),
            csv_field(expense.notes.as_deref().unwrap_or("")),
        ));
    }
    out
}

/// Quotes a text field, doubling embedded quotes per RFC 4180.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn iso_timestamp(timestamp_ms: i64) -> String {
    match local_moment(timestamp_ms) {
        Some(moment) => moment.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::from("invalid"),
    }
}

/// Placeholder payload for the simulated PDF/TXT exports.
pub fn placeholder_payload(format: ExportFormat, report_title: &str, generated_at_ms: i64) -> String {
    format!(
        "This is a simulated {} report.\nReport Title: {}\nGenerated: {}\n",
        format.extension().to_uppercase(),
        report_title,
        iso_timestamp(generated_at_ms)
    )
}

/// Writes export content to disk, mapping failures to [`ExpenseError::ExportWrite`].
pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .map_err(|err| ExpenseError::ExportWrite(format!("{}: {err}", path.display())))
}
