use std::fmt::Write;

use crate::errors::Result;
use crate::types::{Finding, Severity, ValidationReport};

/// Output format for the rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable lines for terminals and CI logs.
    Text,
    /// One JSON object per finding, for machine consumption.
    Json,
    /// GitHub Actions workflow annotations.
    Github,
}

#[allow(clippy::should_implement_trait)]
impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Github => "github",
        }
    }

    pub fn from_str(s: &str) -> Option<ReportFormat> {
        match s {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "github" => Some(ReportFormat::Github),
            _ => None,
        }
    }
}

/// Renders a report to its stable textual form: one line per finding, in
/// the report's canonical order, so identical input always produces
/// byte-identical output.
pub fn render(report: &ValidationReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => render_json(report),
        ReportFormat::Github => Ok(render_github(report)),
    }
}

fn render_text(report: &ValidationReport) -> String {
    let mut out = String::new();
    for finding in report.findings() {
        let _ = writeln!(
            out,
            "{}: {}:{}: {}",
            finding.severity,
            finding.document,
            finding.line,
            finding.message
        );
    }
    if report.is_empty() {
        out.push_str("All references are valid.\n");
    } else {
        let _ = writeln!(
            out,
            "{} error(s), {} warning(s), {} note(s)",
            report.error_count(),
            report.warning_count(),
            report.info_count()
        );
    }
    out
}

fn render_json(report: &ValidationReport) -> Result<String> {
    let mut out = String::new();
    for finding in report.findings() {
        out.push_str(&serde_json::to_string(finding)?);
        out.push('\n');
    }
    Ok(out)
}

fn render_github(report: &ValidationReport) -> String {
    let mut out = String::new();
    for finding in report.findings() {
        let _ = writeln!(
            out,
            "::{} file={},line={}::{}",
            annotation_level(finding),
            finding.document,
            finding.line,
            finding.message
        );
    }
    out
}

fn annotation_level(finding: &Finding) -> &'static str {
    match finding.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "notice",
    }
}
