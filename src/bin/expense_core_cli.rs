use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use colored::Colorize;

use expense_core::config::{default_config_path, Config};
use expense_core::domain::{Category, Expense};
use expense_core::errors::{ExpenseError, Result};
use expense_core::export::{self, ExportFormat};
use expense_core::money;
use expense_core::report::{aggregate, build_report, resolve, DateFilter, Grouping};
use expense_core::store::{ExpenseStore, JsonStore};

const USAGE: &str = "\
usage: expense_core_cli <command> [args]

commands:
  add <title> <amount> [category] [notes]   record an expense
  list [filter] [grouping]                  filter: today|yesterday|week|month
                                            grouping: none|category|time
  report                                    trailing 7-day report
  export <csv|pdf|txt> [path]               export the 7-day report
  delete <id>                               remove an expense
";

fn main() -> ExitCode {
    expense_core::init();
    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<()> {
    let Some(command) = args.first() else {
        print!("{USAGE}");
        return Ok(());
    };

    let config = Config::load_or_default(&default_config_path())?;
    let mut store = JsonStore::open(config.ledger_path())?;
    let now_ms = Local::now().timestamp_millis();

    match command.as_str() {
        "add" => add(&mut store, &args[1..], now_ms),
        "list" => list(&store, &args[1..], now_ms),
        "report" => report(&store, now_ms),
        "export" => export_report(&store, &args[1..], now_ms),
        "delete" => delete(&mut store, &args[1..]),
        "help" | "--help" | "-h" => {
            print!("{USAGE}");
            Ok(())
        }
        other => Err(ExpenseError::InvalidInput(format!(
            "unknown command '{other}', try 'help'"
        ))),
    }
}

fn add(store: &mut dyn ExpenseStore, args: &[String], now_ms: i64) -> Result<()> {
    let (title, amount) = match args {
        [title, amount, ..] => (title.clone(), amount),
        _ => {
            return Err(ExpenseError::InvalidInput(
                "add needs a title and an amount".into(),
            ))
        }
    };
    let amount: f64 = amount
        .parse()
        .map_err(|_| ExpenseError::InvalidInput(format!("'{amount}' is not an amount")))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ExpenseError::InvalidInput(
            "amount must be positive".into(),
        ));
    }
    let category = args
        .get(2)
        .map(|raw| Category::from_stored(raw))
        .unwrap_or(Category::Other);
    let mut expense = Expense::new(title, amount, category, now_ms);
    if let Some(notes) = args.get(3) {
        expense = expense.with_notes(notes.clone());
    }
    let id = store.insert(expense)?;
    println!(
        "{} #{id} {} in {}",
        "recorded".green().bold(),
        money::formatter().format(amount),
        category
    );
    Ok(())
}

fn parse_filter(raw: Option<&String>) -> Result<DateFilter> {
    match raw.map(String::as_str) {
        None | Some("today") => Ok(DateFilter::Today),
        Some("yesterday") => Ok(DateFilter::Yesterday),
        Some("week") => Ok(DateFilter::ThisWeek),
        Some("month") => Ok(DateFilter::ThisMonth),
        Some(other) => Err(ExpenseError::InvalidInput(format!(
            "unknown filter '{other}'"
        ))),
    }
}

fn parse_grouping(raw: Option<&String>) -> Result<Grouping> {
    match raw.map(String::as_str) {
        None | Some("none") => Ok(Grouping::None),
        Some("category") => Ok(Grouping::ByCategory),
        Some("time") => Ok(Grouping::ByTime),
        Some(other) => Err(ExpenseError::InvalidInput(format!(
            "unknown grouping '{other}'"
        ))),
    }
}

fn list(store: &dyn ExpenseStore, args: &[String], now_ms: i64) -> Result<()> {
    let filter = parse_filter(args.first())?;
    let grouping = parse_grouping(args.get(1))?;

    let window = resolve(filter, now_ms)?;
    let snapshot = store.get_by_range(window.start_ms, window.end_ms)?;
    let result = aggregate(&snapshot, grouping, now_ms)?;

    if result.total_count == 0 {
        println!("no expenses in this window");
        return Ok(());
    }

    if result.groups.is_empty() {
        for item in &result.expenses {
            println!(
                "#{:<4} {:<12} {:>12}  {:<16} {}",
                item.id,
                item.date_label,
                item.amount_formatted,
                item.category.to_string(),
                item.title
            );
        }
    } else {
        for group in &result.groups {
            println!(
                "{}  {}",
                group.title.bold(),
                group.total_amount_formatted.bold()
            );
            for item in &group.expenses {
                println!(
                    "  #{:<4} {:<12} {:>12}  {}",
                    item.id, item.date_label, item.amount_formatted, item.title
                );
            }
        }
    }
    println!(
        "{} {} expense(s), total {}",
        "=>".cyan(),
        result.total_count,
        result.total_amount_formatted.bold()
    );
    Ok(())
}

fn report(store: &dyn ExpenseStore, now_ms: i64) -> Result<()> {
    let report = build_report(store, now_ms)?;
    println!("{}", report.title.bold());
    println!();
    for daily in &report.daily_totals {
        println!("  {:<14} {:>14}", daily.date_label, daily.total_amount_formatted);
    }
    println!();
    for category in &report.category_totals {
        println!(
            "  {:<18} {:>14}  {:>5.1}%",
            category.category_display_name,
            category.total_amount_formatted,
            category.percentage_of_total * 100.0
        );
    }
    println!();
    println!(
        "overall total: {}",
        report.overall_total_amount_formatted.green().bold()
    );
    Ok(())
}

fn export_report(store: &dyn ExpenseStore, args: &[String], now_ms: i64) -> Result<()> {
    let format = match args.first().map(String::as_str) {
        Some("csv") => ExportFormat::Csv,
        Some("pdf") => ExportFormat::Pdf,
        Some("txt") => ExportFormat::Txt,
        _ => {
            return Err(ExpenseError::InvalidInput(
                "export needs a format: csv, pdf, or txt".into(),
            ))
        }
    };
    let report = build_report(store, now_ms)?;
    let contents = match format {
        ExportFormat::Csv => export::to_csv(&report.expenses, &report.title, now_ms),
        // PDF/TXT are simulated: plain-text placeholders only.
        _ => export::placeholder_payload(format, &report.title, now_ms),
    };
    let path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("expense_report.{}", format.extension())));
    export::write_export(&path, &contents)?;
    println!(
        "{} {} ({})",
        "wrote".green().bold(),
        path.display(),
        format.mime_type()
    );
    Ok(())
}

fn delete(store: &mut dyn ExpenseStore, args: &[String]) -> Result<()> {
    let id: i64 = args
        .first()
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| ExpenseError::InvalidInput("delete needs a numeric id".into()))?;
    store.delete(id)?;
    println!("{} #{id}", "deleted".yellow().bold());
    Ok(())
}
