use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Violation severity, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// All severities in display order
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown severity: {}", s))
    }
}

/// A lint report file as written by the external linter
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportFile {
    pub report: Report,
}

/// Report body: metadata plus the ordered list of violations
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub violations: Vec<Violation>,
}

/// Metadata about the analyzed source file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Name of the analyzed source file
    #[serde(default)]
    pub file_name: String,
    /// Total violation count reported by the linter
    #[serde(default)]
    pub total_violations: usize,
}

/// A single flagged issue within a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Line number (1-indexed)
    #[serde(default)]
    pub line: u32,
    /// Column number (1-indexed)
    #[serde(default)]
    pub column: u32,
    pub severity: Severity,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub rule: String,
    #[serde(default)]
    pub message: String,
    /// Offending source snippet
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub recommended_fix: String,
    /// Link or citation for the rule
    #[serde(default)]
    pub reference: String,
}
