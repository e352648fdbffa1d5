use crate::error::ReportError;
use crate::types::{Severity, Violation};
use serde::Serialize;
use std::str::FromStr;

/// Severity selection in the viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeverityFilter {
    #[default]
    All,
    Only(Severity),
}

impl SeverityFilter {
    fn matches(&self, severity: Severity) -> bool {
        match self {
            Self::All => true,
            Self::Only(s) => *s == severity,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(s) => s.as_str(),
        }
    }
}

impl FromStr for SeverityFilter {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Severity>()
            .map(Self::Only)
            .map_err(ReportError::InvalidFilter)
    }
}

/// Derived view over a report's violations
#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    pub severity: SeverityFilter,
    /// Free-text search, matched case-insensitively
    pub search: String,
}

impl ViewFilter {
    pub fn new(severity: SeverityFilter, search: impl Into<String>) -> Self {
        Self {
            severity,
            search: search.into(),
        }
    }

    /// Violations passing both the severity and the search filter, in original order
    pub fn apply<'a>(&self, violations: &'a [Violation]) -> Vec<&'a Violation> {
        let needle = self.search.to_lowercase();
        violations
            .iter()
            .filter(|v| self.severity.matches(v.severity) && matches_search(v, &needle))
            .collect()
    }
}

fn matches_search(violation: &Violation, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        &violation.message,
        &violation.code,
        &violation.category,
        &violation.rule,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Violation counts by severity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl Summary {
    pub fn from_violations<'a>(violations: impl IntoIterator<Item = &'a Violation>) -> Self {
        let mut summary = Self::default();
        for v in violations {
            summary.total += 1;
            match v.severity {
                Severity::Critical => summary.critical += 1,
                Severity::High => summary.high += 1,
                Severity::Medium => summary.medium += 1,
                Severity::Low => summary.low += 1,
            }
        }
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}
