//! Audit Runner
//!
//! Drives a scan engine over a list of pages and collects the flattened
//! records. A page that fails to scan is logged and skipped.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::{AuditResult, ReportFormat, ReportRecord, Violation, flatten, write_report};

/// Source of violations for one page
pub trait ScanEngine {
    fn scan(&mut self, url: &str) -> AuditResult<Vec<Violation>>;
}

/// Outcome of a multi-page audit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditRun {
    pub records: Vec<ReportRecord>,
    pub failed_urls: Vec<String>,
}

impl AuditRun {
    /// Pages that scanned cleanly but produced no records are not tracked
    pub fn is_clean(&self) -> bool {
        self.records.is_empty() && self.failed_urls.is_empty()
    }

    pub fn write(&self, dir: &Path, format: ReportFormat, timestamp: NaiveDateTime) -> AuditResult<PathBuf> {
        write_report(dir, &self.records, format, timestamp)
    }
}

/// Scan every url in order
pub fn run_audit<E, S>(engine: &mut E, urls: &[S]) -> AuditRun
where
    E: ScanEngine,
    S: AsRef<str>,
{
    let mut run = AuditRun::default();
    for url in urls {
        let url = url.as_ref();
        match engine.scan(url) {
            Ok(violations) => {
                let records = flatten(url, &violations);
                tracing::info!(url, violations = violations.len(), records = records.len(), "page scanned");
                run.records.extend(records);
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "scan failed, continuing");
                run.failed_urls.push(url.to_string());
            }
        }
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuditError, Impact, Target, ViolationNode};
    use std::collections::HashMap;

    struct FakeEngine {
        pages: HashMap<&'static str, Vec<Violation>>,
        scanned: Vec<String>,
    }

    impl ScanEngine for FakeEngine {
        fn scan(&mut self, url: &str) -> AuditResult<Vec<Violation>> {
            self.scanned.push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| AuditError::Scan {
                url: url.to_string(),
                message: "timed out".into(),
            })
        }
    }

    fn contrast(nodes: usize) -> Violation {
        Violation {
            id: "color-contrast".into(),
            impact: Some(Impact::Moderate),
            description: "Text must meet contrast minimums".into(),
            help: None,
            help_url: None,
            nodes: (0..nodes)
                .map(|i| ViolationNode {
                    target: vec![Target::Selector(format!("p:nth-child({i})"))],
                    failure_summary: None,
                    html: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_failed_page_does_not_stop_run() {
        let mut engine = FakeEngine {
            pages: HashMap::from([("https://a.test/", vec![contrast(2)]), ("https://c.test/", vec![contrast(1)])]),
            scanned: Vec::new(),
        };

        let run = run_audit(&mut engine, &["https://a.test/", "https://b.test/", "https://c.test/"]);

        assert_eq!(engine.scanned.len(), 3);
        assert_eq!(run.failed_urls, vec!["https://b.test/".to_string()]);
        assert_eq!(run.records.len(), 3);
        assert_eq!(run.records[2].url, "https://c.test/");
        assert!(!run.is_clean());
    }

    #[test]
    fn test_empty_run_is_clean() {
        let mut engine = FakeEngine { pages: HashMap::new(), scanned: Vec::new() };
        let urls: [String; 0] = [];
        assert!(run_audit(&mut engine, &urls).is_clean());
    }
}
