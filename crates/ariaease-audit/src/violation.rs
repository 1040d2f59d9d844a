//! Scan Violations
//!
//! Rule violations as the scanning engine reports them (axe-shaped JSON).

use serde::{Deserialize, Serialize};

/// Violation severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Serious => "serious",
            Self::Critical => "critical",
        }
    }
}

/// Selector for one node. Nodes inside frames or shadow roots come as a
/// path of selectors, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Selector(String),
    Path(Vec<String>),
}

impl Target {
    pub fn to_selector(&self) -> String {
        match self {
            Self::Selector(s) => s.clone(),
            Self::Path(path) => path.join(" > "),
        }
    }
}

/// Node that failed a rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationNode {
    #[serde(default)]
    pub target: Vec<Target>,
    #[serde(default)]
    pub failure_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl ViolationNode {
    /// Selectors joined with `", "`
    pub fn target_list(&self) -> String {
        self.target
            .iter()
            .map(Target::to_selector)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Rule id, e.g. `color-contrast`
    pub id: String,
    #[serde(default)]
    pub impact: Option<Impact>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,
    #[serde(default)]
    pub nodes: Vec<ViolationNode>,
}

impl Violation {
    /// Parse the engine's `violations` array
    pub fn parse_list(json: &str) -> crate::AuditResult<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}
