use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a finding.
///
/// The derived ordering (error < warning < info) is what the report
/// formatter sorts by, so errors always come first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Returns the string representation of this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of findings the validator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    UnresolvedReference,
    DuplicateDefinition,
    MalformedReference,
    IncompleteDefinition,
    OrphanDefinition,
}

#[allow(clippy::should_implement_trait)]
impl FindingKind {
    /// Returns the string representation of this finding kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::UnresolvedReference => "unresolved_reference",
            FindingKind::DuplicateDefinition => "duplicate_definition",
            FindingKind::MalformedReference => "malformed_reference",
            FindingKind::IncompleteDefinition => "incomplete_definition",
            FindingKind::OrphanDefinition => "orphan_definition",
        }
    }

    /// Parses a string into a `FindingKind`, returning `None` for
    /// unrecognized values.
    pub fn from_str(s: &str) -> Option<FindingKind> {
        match s {
            "unresolved_reference" => Some(FindingKind::UnresolvedReference),
            "duplicate_definition" => Some(FindingKind::DuplicateDefinition),
            "malformed_reference" => Some(FindingKind::MalformedReference),
            "incomplete_definition" => Some(FindingKind::IncompleteDefinition),
            "orphan_definition" => Some(FindingKind::OrphanDefinition),
            _ => None,
        }
    }
}

/// Key identifying a definition in the global index.
///
/// The category disambiguates identifier spaces that would otherwise
/// collide (a location id and a person id may share the same string).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DefKey {
    pub category: String,
    pub id: String,
}

impl DefKey {
    pub fn new(category: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category, self.id)
    }
}

/// An element that introduces a citable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub key: DefKey,
    /// Document the definition was extracted from.
    pub document: String,
    /// Tag chain from the root element, e.g. `document/references/personDef`.
    pub element_path: String,
    /// 1-based source line of the defining element.
    pub line: u32,
}

/// An attribute occurrence that points at a definition's identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub document: String,
    pub element_path: String,
    pub line: u32,
    /// Categories the identifier may resolve under; the reference is valid
    /// if any one of them holds a matching definition.
    pub categories: Vec<String>,
    pub id: String,
    /// Soft references downgrade an unresolved target to a warning.
    pub soft: bool,
}

/// One reported outcome of validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub kind: FindingKind,
    pub document: String,
    pub line: u32,
    /// The offending identifier, when one is involved.
    pub identifier: Option<String>,
    pub message: String,
}

/// The accumulated outcome of one validator run.
///
/// Immutable once finalized; finalization imposes the deterministic order
/// the formatter relies on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    /// Builds a report from raw findings, sorting them into the canonical
    /// (severity, document, line, message) order.
    pub fn from_findings(mut findings: Vec<Finding>) -> Self {
        findings.sort_by(|a, b| {
            (a.severity, &a.document, a.line, &a.message).cmp(&(
                b.severity,
                &b.document,
                b.line,
                &b.message,
            ))
        });
        Self { findings }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// True when no error-severity findings exist; warnings and infos never
    /// fail a run.
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }
}
