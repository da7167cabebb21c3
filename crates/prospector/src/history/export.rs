//! History export in the two formats the dashboard offers for download.

use std::io::Write;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::domain::AnalysisRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format '{other}', expected json or csv")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write JSON export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush export: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    history: &'a [AnalysisRecord],
    export_date: DateTime<Utc>,
}

const CSV_HEADER: [&str; 4] = ["id", "url", "overall_score", "timestamp"];

/// JSON carries full records so an export can be loaded back; CSV carries the summary columns.
pub fn export_history<W: Write>(
    format: ExportFormat,
    records: &[AnalysisRecord],
    exported_at: DateTime<Utc>,
    writer: W,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Json => write_json(records, exported_at, writer),
        ExportFormat::Csv => write_csv(records, writer),
    }
}

fn write_json<W: Write>(
    records: &[AnalysisRecord],
    exported_at: DateTime<Utc>,
    mut writer: W,
) -> Result<(), ExportError> {
    let export = JsonExport {
        history: records,
        export_date: exported_at,
    };
    serde_json::to_writer_pretty(&mut writer, &export)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn write_csv<W: Write>(records: &[AnalysisRecord], writer: W) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)?;
    for record in records {
        let score = record.overall_score.to_string();
        let timestamp = record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true);
        out.write_record([
            record.id.0.as_str(),
            record.url.as_str(),
            score.as_str(),
            timestamp.as_str(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_names() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
