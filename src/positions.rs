use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::{CompoundRule, PositionConfig};
use crate::errors::Result;
use crate::index::DefinitionIndex;
use crate::loader::{line_of, LoadedDocument};
use crate::types::{Finding, FindingKind, Severity};

/// Letter → page → set of lines, merged across all content documents.
///
/// Pages and lines are declared inline inside letter scopes; a page may
/// continue across scope transitions within one document, so the walk
/// keeps the current page until a new one is declared.
#[derive(Debug, Default)]
pub struct PositionIndex {
    pages: HashMap<String, HashMap<String, HashSet<String>>>,
}

impl PositionIndex {
    /// Walks every document in order and collects the merged index.
    pub fn build(docs: &[LoadedDocument], config: &PositionConfig) -> Result<Self> {
        let mut index = Self::default();

        for doc in docs {
            let tree = doc.parse()?;
            let mut current_letter: Option<String> = None;
            let mut current_page: Option<String> = None;

            for node in tree.descendants().filter(|n| n.is_element()) {
                let tag = node.tag_name().name();

                if let Some(scope) = config.scopes.iter().find(|s| s.element == tag) {
                    current_letter = node
                        .attribute(scope.attribute.as_str())
                        .map(|v| v.to_string());
                    continue;
                }

                if tag == config.page.element {
                    if let Some(page) = node.attribute(config.page.attribute.as_str()) {
                        current_page = Some(page.to_string());
                    }
                    continue;
                }

                if tag == config.line.element {
                    let line = node.attribute(config.line.attribute.as_str());
                    if let (Some(letter), Some(page), Some(line)) =
                        (&current_letter, &current_page, line)
                    {
                        index
                            .pages
                            .entry(letter.clone())
                            .or_default()
                            .entry(page.clone())
                            .or_default()
                            .insert(line.to_string());
                    }
                }
            }
        }

        debug!(letters = index.pages.len(), "position index built");
        Ok(index)
    }

    pub fn has_letter(&self, letter: &str) -> bool {
        self.pages.contains_key(letter)
    }

    pub fn has_page(&self, letter: &str, page: &str) -> bool {
        self.pages
            .get(letter)
            .is_some_and(|pages| pages.contains_key(page))
    }

    pub fn has_line(&self, letter: &str, page: &str, line: &str) -> bool {
        self.pages
            .get(letter)
            .and_then(|pages| pages.get(page))
            .is_some_and(|lines| lines.contains(line))
    }
}

/// Validates every compound position reference coordinate by coordinate.
///
/// The letter must be a known letter definition; a page must exist for
/// that letter; a line must exist on that page; a line without a page is
/// malformed rather than unresolved.
pub fn check_compound_references(
    docs: &[LoadedDocument],
    config: &PositionConfig,
    index: &DefinitionIndex,
    positions: &PositionIndex,
    findings: &mut Vec<Finding>,
) -> Result<()> {
    for doc in docs {
        let tree = doc.parse()?;
        for node in tree.descendants().filter(|n| n.is_element()) {
            let tag = node.tag_name().name();
            for rule in config.compounds.iter().filter(|r| r.element == tag) {
                let line = line_of(&tree, node);
                check_one(doc, node, line, rule, config, index, positions, findings);
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn check_one(
    doc: &LoadedDocument,
    node: roxmltree::Node<'_, '_>,
    line: u32,
    rule: &CompoundRule,
    config: &PositionConfig,
    index: &DefinitionIndex,
    positions: &PositionIndex,
    findings: &mut Vec<Finding>,
) {
    let document = doc.name().to_string();
    let letter = node.attribute(rule.letter_attribute.as_str());
    let page = node.attribute(rule.page_attribute.as_str());
    let line_ref = node.attribute(rule.line_attribute.as_str());

    let Some(letter) = letter.filter(|v| !v.trim().is_empty()) else {
        findings.push(Finding {
            severity: Severity::Error,
            kind: FindingKind::MalformedReference,
            document,
            line,
            identifier: None,
            message: format!(
                "<{}> is missing its @{} coordinate",
                rule.element, rule.letter_attribute
            ),
        });
        return;
    };

    if !index.contains(&config.letter_category, letter) {
        findings.push(Finding {
            severity: Severity::Error,
            kind: FindingKind::UnresolvedReference,
            document,
            line,
            identifier: Some(letter.to_string()),
            message: format!(
                "unresolved {} reference '{}' in <{}>",
                config.letter_category, letter, rule.element
            ),
        });
        return;
    }

    // Line coordinate without a page coordinate cannot be checked.
    if page.is_none() {
        if let Some(line_ref) = line_ref {
            findings.push(Finding {
                severity: Severity::Error,
                kind: FindingKind::MalformedReference,
                document,
                line,
                identifier: Some(line_ref.to_string()),
                message: format!(
                    "<{}> has @{}=\"{}\" but no @{} for letter '{}'",
                    rule.element, rule.line_attribute, line_ref, rule.page_attribute, letter
                ),
            });
        }
        return;
    }

    let page = page.unwrap_or_default();
    if !positions.has_letter(letter) {
        findings.push(Finding {
            severity: Severity::Error,
            kind: FindingKind::UnresolvedReference,
            document,
            line,
            identifier: Some(letter.to_string()),
            message: format!(
                "no pages known for letter '{}' referenced by <{}>",
                letter, rule.element
            ),
        });
        return;
    }
    if !positions.has_page(letter, page) {
        findings.push(Finding {
            severity: Severity::Error,
            kind: FindingKind::UnresolvedReference,
            document,
            line,
            identifier: Some(page.to_string()),
            message: format!(
                "unknown page '{}' for letter '{}' in <{}>",
                page, letter, rule.element
            ),
        });
        return;
    }
    if let Some(line_ref) = line_ref {
        if !positions.has_line(letter, page, line_ref) {
            findings.push(Finding {
                severity: Severity::Error,
                kind: FindingKind::UnresolvedReference,
                document,
                line,
                identifier: Some(line_ref.to_string()),
                message: format!(
                    "unknown line '{}' on page '{}' of letter '{}' in <{}>",
                    line_ref, page, letter, rule.element
                ),
            });
        }
    }
}
