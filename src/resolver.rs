use std::collections::HashSet;

use tracing::debug;

use crate::config::LintConfig;
use crate::errors::Result;
use crate::index::DefinitionIndex;
use crate::loader::{element_path, line_of, LoadedDocument};
use crate::types::{DefKey, Finding, FindingKind, Reference, Severity};

/// Outcome of the resolution pass.
#[derive(Debug, Default)]
pub struct ResolutionOutcome {
    pub findings: Vec<Finding>,
    /// Every (category, id) key that some reference resolved to; input to
    /// the orphan pass.
    pub resolved_keys: HashSet<DefKey>,
    /// Total references examined, resolved or not.
    pub reference_count: usize,
}

/// Walks every document with the reference rules applicable to its role
/// and checks each extracted reference against the definition index.
///
/// Resolution is a pure hash lookup, so the pass is linear in the total
/// reference count. A reference whose identifier attribute is present but
/// empty is malformed, reported distinctly from unresolved.
pub fn resolve_references(
    docs: &[LoadedDocument],
    config: &LintConfig,
    index: &DefinitionIndex,
) -> Result<ResolutionOutcome> {
    let mut outcome = ResolutionOutcome::default();

    for doc in docs {
        let tree = doc.parse()?;
        for node in tree.descendants().filter(|n| n.is_element()) {
            let tag = node.tag_name().name();
            for rule in config.references_for(doc.role()) {
                if rule.element != tag {
                    continue;
                }
                let Some(raw) = node.attribute(rule.attribute.as_str()) else {
                    // Absent pointer attributes are not references at all.
                    continue;
                };
                let line = line_of(&tree, node);

                if raw.trim().is_empty() {
                    outcome.findings.push(Finding {
                        severity: Severity::Error,
                        kind: FindingKind::MalformedReference,
                        document: doc.name().to_string(),
                        line,
                        identifier: None,
                        message: format!(
                            "<{}> has an empty @{} reference",
                            rule.element, rule.attribute
                        ),
                    });
                    continue;
                }

                let reference = Reference {
                    document: doc.name().to_string(),
                    element_path: element_path(node),
                    line,
                    categories: rule.categories.clone(),
                    id: raw.trim().to_string(),
                    soft: rule.soft,
                };
                check_reference(&reference, index, &mut outcome);
            }
        }
    }

    debug!(
        references = outcome.reference_count,
        unresolved = outcome.findings.len(),
        "reference resolution pass complete"
    );
    Ok(outcome)
}

fn check_reference(reference: &Reference, index: &DefinitionIndex, outcome: &mut ResolutionOutcome) {
    outcome.reference_count += 1;

    for category in &reference.categories {
        if index.contains(category, &reference.id) {
            outcome
                .resolved_keys
                .insert(DefKey::new(category.as_str(), reference.id.as_str()));
            return;
        }
    }

    let severity = if reference.soft {
        Severity::Warning
    } else {
        Severity::Error
    };
    outcome.findings.push(Finding {
        severity,
        kind: FindingKind::UnresolvedReference,
        document: reference.document.clone(),
        line: reference.line,
        identifier: Some(reference.id.clone()),
        message: format!(
            "unresolved {} reference '{}' in <{}>",
            reference.categories.join("|"),
            reference.id,
            reference
                .element_path
                .rsplit('/')
                .next()
                .unwrap_or(reference.element_path.as_str())
        ),
    });
}

/// Definitions never targeted by any resolved reference.
///
/// Informational only: large registers legitimately hold entries that are
/// not yet cross-linked.
pub fn orphan_findings(index: &DefinitionIndex, resolved: &HashSet<DefKey>) -> Vec<Finding> {
    index
        .iter()
        .filter(|def| !resolved.contains(&def.key))
        .map(|def| Finding {
            severity: Severity::Info,
            kind: FindingKind::OrphanDefinition,
            document: def.document.clone(),
            line: def.line,
            identifier: Some(def.key.id.clone()),
            message: format!(
                "{} definition '{}' is never referenced",
                def.key.category, def.key.id
            ),
        })
        .collect()
}
