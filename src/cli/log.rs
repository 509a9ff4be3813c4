//! stint log command implementation
//!
//! Renders one day per block: a date header, tab-indented entry lines, and a
//! Total line summed from the day's intervals. Days without a ledger render
//! as a `-` placeholder.

use chrono::{Local, NaiveDate};

use crate::daylog::{DayLog, DayReport};
use crate::duration::format_duration;
use crate::error::Result;
use crate::storage::Storage;

/// Options for the log command
pub struct LogOptions {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub fn run(storage: &Storage, options: LogOptions) -> Result<()> {
    let daylog = DayLog::new(storage);
    let today = Local::now().date_naive();

    let Some(from) = options.from else {
        let report = daylog.read_day(today)?;
        print_day(today, report.as_ref());
        return Ok(());
    };

    let from = super::parse_date(&from)?;
    let to = match options.to {
        Some(to) => super::parse_date(&to)?,
        None => today,
    };

    for (day, report) in daylog.read_range(from, to)? {
        print_day(day, report.as_ref());
    }

    Ok(())
}

fn print_day(day: NaiveDate, report: Option<&DayReport>) {
    println!("{}", day.format("%B %-d, %Y"));

    let Some(report) = report else {
        println!("\t-");
        return;
    };

    for entry in &report.entries {
        println!(
            "\t{}\t{}\t{} to {}\t{}",
            entry.identifier,
            entry.formatted_duration,
            entry.start_display(),
            entry.end_display(),
            entry.description
        );
    }
    println!("\tTotal: {}", format_duration(report.total));
}
