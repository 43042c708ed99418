//! CSV export of a usage summary
//!
//! Pure and synchronous: the browser turns the bytes into a download, the
//! CLI writes them to a file or stdout.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use thiserror::Error;

use crate::api::UsagePeriod;

/// Column headers of the report
pub const CSV_HEADER: [&str; 4] = ["Dimension", "Total", "Start Time", "End Time"];

/// MIME type for the download
pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8;";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export")]
    NothingToExport,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output error: {0}")]
    Output(String),
}

/// Render the summary as CSV: a header plus one line per record
pub fn usage_csv(period: &UsagePeriod) -> Result<String, ExportError> {
    if period.usage.is_empty() {
        return Err(ExportError::NothingToExport);
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in &period.usage {
        writer.write_record([
            single_line(&record.dimension),
            record.total.to_string(),
            format_time(record.start_time),
            format_time(record.end_time),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Output(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Output(e.to_string()))
}

/// `usage-report-<YYYY-MM-DD>.csv`, dated by the period start
pub fn file_name(period: &UsagePeriod, today: NaiveDate) -> String {
    let date = period
        .start_time
        .map(|t| t.date_naive())
        .unwrap_or(today);
    format!("usage-report-{}.csv", date.format("%Y-%m-%d"))
}

/// Line breaks become spaces so every record stays on one line
fn single_line(field: &str) -> String {
    field.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
