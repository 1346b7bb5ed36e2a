use std::fs;
use std::path::Path;

use roxmltree::Document;
use tracing::debug;

use crate::config::Role;
use crate::errors::{LintError, Result};

/// One input document: the file's name, role, and raw XML source.
///
/// `roxmltree` trees borrow their input, so the source string is owned
/// here and each pipeline pass parses it on demand. The source is
/// validated once at load time, making ill-formed XML fatal before any
/// finding is produced.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    name: String,
    role: Role,
    text: String,
}

impl LoadedDocument {
    /// Reads and validates a document from disk.
    ///
    /// Files larger than `max_file_size` are rejected before parsing.
    pub fn load(path: &Path, role: Role, max_file_size: u64) -> Result<Self> {
        let name = path.to_string_lossy().to_string();

        let metadata = fs::metadata(path).map_err(|e| LintError::Io {
            document: name.clone(),
            source: e,
        })?;
        if metadata.len() > max_file_size {
            return Err(LintError::FileTooLarge {
                document: name,
                size: metadata.len(),
                limit: max_file_size,
            });
        }

        let text = fs::read_to_string(path).map_err(|e| LintError::Io {
            document: name.clone(),
            source: e,
        })?;

        let doc = Self { name, role, text };
        doc.parse()?;
        debug!(document = %doc.name, role = ?doc.role, "loaded document");
        Ok(doc)
    }

    /// Builds a document from an in-memory source, validating it.
    pub fn from_source(name: &str, role: Role, text: &str) -> Result<Self> {
        let doc = Self {
            name: name.to_string(),
            role,
            text: text.to_string(),
        };
        doc.parse()?;
        Ok(doc)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Parses the stored source into a borrowed tree.
    ///
    /// Comments are retained as tree nodes; editorial commentary in the
    /// corpus lives in XML comments and must survive any tooling pass.
    pub fn parse(&self) -> Result<Document<'_>> {
        let mut options = roxmltree::ParsingOptions::default();
        options.allow_dtd = true;
        Document::parse_with_options(&self.text, options).map_err(|e| LintError::Parse {
            document: self.name.clone(),
            message: e.to_string(),
        })
    }
}

/// Loads content and register files into a single ordered document list.
///
/// The resulting order (content files first, then registers, each in
/// argument order) is what makes duplicate handling deterministic.
pub fn load_all(
    content: &[impl AsRef<Path>],
    registers: &[impl AsRef<Path>],
    max_file_size: u64,
) -> Result<Vec<LoadedDocument>> {
    let mut docs = Vec::with_capacity(content.len() + registers.len());
    for path in content {
        docs.push(LoadedDocument::load(path.as_ref(), Role::Content, max_file_size)?);
    }
    for path in registers {
        docs.push(LoadedDocument::load(path.as_ref(), Role::Register, max_file_size)?);
    }
    Ok(docs)
}

/// Tag chain from the root element down to `node`, e.g.
/// `document/letterText/hand`.
pub fn element_path(node: roxmltree::Node<'_, '_>) -> String {
    let mut parts: Vec<&str> = node
        .ancestors()
        .filter(|n| n.is_element())
        .map(|n| n.tag_name().name())
        .collect();
    parts.reverse();
    parts.join("/")
}

/// 1-based source line of a node.
pub fn line_of(doc: &Document<'_>, node: roxmltree::Node<'_, '_>) -> u32 {
    doc.text_pos_at(node.range().start).row
}
