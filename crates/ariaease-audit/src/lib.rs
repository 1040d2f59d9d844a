//! AriaEase Audit
//!
//! Report side of the accessibility audit: scan violations are flattened to
//! one record per offending node and rendered as json, csv or html under a
//! timestamped file name. The scanning engine itself is a trait.

pub mod report;
pub mod runner;
pub mod violation;

pub use report::{ReportFormat, ReportRecord, flatten, render, report_file_name, write_report};
pub use runner::{AuditRun, ScanEngine, run_audit};
pub use violation::{Impact, Target, Violation, ViolationNode};

/// Audit errors
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    #[error("Scan of {url} failed: {message}")]
    Scan { url: String, message: String },
}

pub type AuditResult<T> = Result<T, AuditError>;
