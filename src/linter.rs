use std::path::Path;

use tracing::info;

use crate::config::LintConfig;
use crate::errors::Result;
use crate::index::DefinitionIndex;
use crate::loader::{self, LoadedDocument};
use crate::positions::{self, PositionIndex};
use crate::resolver;
use crate::types::ValidationReport;

/// Options controlling a single lint run.
#[derive(Debug, Clone, Default)]
pub struct LintOptions {
    /// Also report definitions never referenced by any document.
    pub report_orphans: bool,
}

/// The validator pipeline: load → index → resolve → report.
///
/// Phases are strictly ordered and single-threaded; every run builds its
/// indexes fresh from the given inputs.
pub struct Linter {
    config: LintConfig,
}

impl Linter {
    pub fn new(config: LintConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Loads the given content and register files, honoring the configured
    /// file size limit. Any unreadable or ill-formed file is fatal.
    pub fn load(
        &self,
        content: &[impl AsRef<Path>],
        registers: &[impl AsRef<Path>],
    ) -> Result<Vec<LoadedDocument>> {
        loader::load_all(content, registers, self.config.max_file_size)
    }

    /// Runs the full validation pipeline over already-loaded documents.
    pub fn run(&self, docs: &[LoadedDocument], options: &LintOptions) -> Result<ValidationReport> {
        let mut findings = Vec::new();

        let index = DefinitionIndex::build(docs, &self.config, &mut findings)?;
        info!(
            documents = docs.len(),
            definitions = index.len(),
            "definition index built"
        );

        let outcome = resolver::resolve_references(docs, &self.config, &index)?;
        info!(
            references = outcome.reference_count,
            findings = outcome.findings.len(),
            "references resolved"
        );
        findings.extend(outcome.findings);

        if let Some(position_config) = &self.config.positions {
            let position_index = PositionIndex::build(docs, position_config)?;
            positions::check_compound_references(
                docs,
                position_config,
                &index,
                &position_index,
                &mut findings,
            )?;
        }

        if options.report_orphans {
            findings.extend(resolver::orphan_findings(&index, &outcome.resolved_keys));
        }

        Ok(ValidationReport::from_findings(findings))
    }
}
