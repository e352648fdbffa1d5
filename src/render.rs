use crate::filter::Summary;
use crate::store::ReportEntry;
use crate::types::{Severity, Violation};

const BYTES_PER_KB: f64 = 1024.0;

/// One line per severity plus the total
pub fn format_summary(summary: &Summary) -> String {
    let mut output = String::new();
    for severity in Severity::ALL {
        output.push_str(&format!("{:<9} {}\n", severity, summary.count(severity)));
    }
    output.push_str(&format!("{:<9} {}", "total", summary.total));
    output
}

/// Render a report's (filtered) violations as Markdown
pub fn format_violations(report_name: &str, summary: &Summary, violations: &[&Violation]) -> String {
    let mut output = format!("# Report: {}\n\n", report_name);
    output.push_str("## Summary\n\n");
    for line in format_summary(summary).lines() {
        output.push_str(&format!("- {}\n", line.trim_end()));
    }
    output.push('\n');

    if violations.is_empty() {
        output.push_str("No violations match the current filter");
        return output;
    }

    output.push_str(&format!(
        "## Violations ({} of {})\n\n",
        violations.len(),
        summary.total
    ));
    for violation in violations {
        output.push_str(&format!(
            "### {}:{} [{}] {}/{}\n\n{}\n\n",
            violation.line,
            violation.column,
            violation.severity,
            violation.category,
            violation.rule,
            violation.message.trim()
        ));
        if !violation.code.trim().is_empty() {
            let backticks = get_fence_backticks(&violation.code);
            output.push_str(&format!(
                "{}\n{}\n{}\n\n",
                backticks,
                violation.code.trim_end(),
                backticks
            ));
        }
        let fix = violation.recommended_fix.trim();
        if !fix.is_empty() {
            output.push_str(&format!("**Fix:** {}\n\n", fix));
        }
        let reference = violation.reference.trim();
        if !reference.is_empty() {
            output.push_str(&format!("**Reference:** {}\n\n", reference));
        }
    }
    output.trim_end().to_string()
}

/// Plain-text listing of report files
pub fn format_report_list(entries: &[ReportEntry]) -> String {
    if entries.is_empty() {
        return "No reports found".to_string();
    }
    entries
        .iter()
        .map(|e| {
            format!(
                "{}  {:>8}  {}",
                e.modified.format("%Y-%m-%d %H:%M:%S"),
                format_size(e.size),
                e.filename
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} KB", bytes as f64 / BYTES_PER_KB)
    }
}

/// Get appropriate number of backticks for Markdown code fence
/// Returns at least 3 backticks, or more if content contains backtick sequences
fn get_fence_backticks(content: &str) -> String {
    const MIN_BACKTICKS: usize = 3;
    let max_backticks = content
        .as_bytes()
        .split(|&b| b != b'`')
        .filter(|s| !s.is_empty())
        .map(|s| s.len())
        .max()
        .unwrap_or(0);
    "`".repeat((max_backticks + 1).max(MIN_BACKTICKS))
}
