//! Audit Reports
//!
//! Flattened violation records and their json/csv/html renderings.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{AuditError, AuditResult, Violation};

/// One offending node of one violation on one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Rule")]
    pub rule: String,
    #[serde(rename = "Impact")]
    pub impact: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Target")]
    pub target: String,
    #[serde(rename = "FailureSummary")]
    pub failure_summary: String,
}

impl ReportRecord {
    const HEADERS: [&'static str; 6] = ["URL", "Rule", "Impact", "Description", "Target", "FailureSummary"];

    fn cells(&self) -> [&str; 6] {
        [
            &self.url,
            &self.rule,
            &self.impact,
            &self.description,
            &self.target,
            &self.failure_summary,
        ]
    }
}

/// Flatten violations found on `url`, one record per node
pub fn flatten(url: &str, violations: &[Violation]) -> Vec<ReportRecord> {
    violations
        .iter()
        .flat_map(|violation| {
            violation.nodes.iter().map(move |node| ReportRecord {
                url: url.to_string(),
                rule: violation.id.clone(),
                impact: violation.impact.map(|i| i.as_str()).unwrap_or_default().to_string(),
                description: violation.description.clone(),
                target: node.target_list(),
                failure_summary: node.failure_summary.clone().unwrap_or_default(),
            })
        })
        .collect()
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Json,
    Csv,
    Html,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "html" | "htm" => Ok(Self::Html),
            _ => Err(AuditError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Render records in `format`
pub fn render(records: &[ReportRecord], format: ReportFormat) -> AuditResult<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        ReportFormat::Csv => render_csv(records),
        ReportFormat::Html => Ok(render_html(records)),
    }
}

fn render_csv(records: &[ReportRecord]) -> AuditResult<String> {
    let mut buf = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(&mut buf);

        // serialize() only emits headers once a record is written
        if records.is_empty() {
            writer.write_record(ReportRecord::HEADERS)?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn render_html(records: &[ReportRecord]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Accessibility Report</title>\n</head>\n<body>\n\
         <h1>Accessibility Report</h1>\n<table>\n<thead>\n<tr>",
    );
    for header in ReportRecord::HEADERS {
        let _ = write!(html, "<th>{header}</th>");
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for record in records {
        html.push_str("<tr>");
        for cell in record.cells() {
            let _ = write!(html, "<td>{}</td>", escape_html(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `ariaease-report-<DD-MM-YYYY HH:MM:SS>.<ext>`
pub fn report_file_name(timestamp: NaiveDateTime, format: ReportFormat) -> String {
    format!(
        "ariaease-report-{}.{}",
        timestamp.format("%d-%m-%Y %H:%M:%S"),
        format.extension()
    )
}

/// Render and write a report into `dir`, returning the file path
pub fn write_report(
    dir: &Path,
    records: &[ReportRecord],
    format: ReportFormat,
    timestamp: NaiveDateTime,
) -> AuditResult<PathBuf> {
    let content = render(records, format)?;
    let path = dir.join(report_file_name(timestamp, format));
    std::fs::write(&path, content)?;
    tracing::info!(path = %path.display(), records = records.len(), %format, "report written");
    Ok(path)
}
