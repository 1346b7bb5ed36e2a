use std::collections::HashMap;

use tracing::debug;

use crate::config::{DefinitionRule, LintConfig};
use crate::errors::Result;
use crate::loader::{element_path, line_of, LoadedDocument};
use crate::types::{DefKey, Definition, Finding, FindingKind, Severity};

/// Global index of every declared identifier, keyed by (category, id).
///
/// Built fresh per run via pure set-union over all documents: no
/// document's definitions override another's, so membership is
/// independent of processing order. On duplicates the first occurrence
/// (in document argument order) is kept and every later one becomes a
/// warning finding.
#[derive(Debug, Default)]
pub struct DefinitionIndex {
    defs: HashMap<DefKey, Definition>,
}

impl DefinitionIndex {
    /// Walks every document with the definition rules applicable to its
    /// role and collects the merged index.
    ///
    /// Non-fatal problems (duplicates, incomplete definitions) are pushed
    /// onto `findings`; only parse failures abort.
    pub fn build(
        docs: &[LoadedDocument],
        config: &LintConfig,
        findings: &mut Vec<Finding>,
    ) -> Result<Self> {
        let mut index = Self::default();

        for doc in docs {
            let tree = doc.parse()?;
            for node in tree.descendants().filter(|n| n.is_element()) {
                let tag = node.tag_name().name();
                for rule in config.definitions_for(doc.role()) {
                    if rule.element != tag {
                        continue;
                    }
                    index.collect_one(doc, &tree, node, rule, findings);
                }
            }
        }

        debug!(definitions = index.len(), "definition index built");
        Ok(index)
    }

    fn collect_one(
        &mut self,
        doc: &LoadedDocument,
        tree: &roxmltree::Document<'_>,
        node: roxmltree::Node<'_, '_>,
        rule: &DefinitionRule,
        findings: &mut Vec<Finding>,
    ) {
        let line = line_of(tree, node);

        let id = match node.attribute(rule.attribute.as_str()) {
            Some(v) if !v.trim().is_empty() => v.trim(),
            _ => {
                findings.push(Finding {
                    severity: Severity::Error,
                    kind: FindingKind::IncompleteDefinition,
                    document: doc.name().to_string(),
                    line,
                    identifier: None,
                    message: format!(
                        "<{}> is missing its @{} identifier",
                        rule.element, rule.attribute
                    ),
                });
                return;
            }
        };

        if let Some(child) = &rule.required_child {
            let has_child = node
                .descendants()
                .any(|n| n.is_element() && n.tag_name().name() == child.as_str());
            if !has_child {
                findings.push(Finding {
                    severity: Severity::Error,
                    kind: FindingKind::IncompleteDefinition,
                    document: doc.name().to_string(),
                    line,
                    identifier: Some(id.to_string()),
                    message: format!(
                        "<{} {}=\"{}\"> is missing its <{}> child",
                        rule.element, rule.attribute, id, child
                    ),
                });
            }
        }

        let key = DefKey::new(rule.category.as_str(), id);
        if let Some(existing) = self.defs.get(&key) {
            findings.push(Finding {
                severity: Severity::Warning,
                kind: FindingKind::DuplicateDefinition,
                document: doc.name().to_string(),
                line,
                identifier: Some(id.to_string()),
                message: format!(
                    "duplicate {} definition '{}' (first defined in {}:{})",
                    key.category, id, existing.document, existing.line
                ),
            });
            return;
        }

        self.defs.insert(
            key.clone(),
            Definition {
                key,
                document: doc.name().to_string(),
                element_path: element_path(node),
                line,
            },
        );
    }

    /// Whether an identifier exists under the given category.
    pub fn contains(&self, category: &str, id: &str) -> bool {
        self.defs.contains_key(&DefKey::new(category, id))
    }

    pub fn get(&self, key: &DefKey) -> Option<&Definition> {
        self.defs.get(key)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.defs.values()
    }
}
