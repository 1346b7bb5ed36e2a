use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{LintError, Result};

/// Role of an input document.
///
/// Register files declare reusable entries (commentary, subsections)
/// rather than letter content, and a different subset of rules applies to
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Content,
    Register,
}

/// Restricts a rule to documents of a given role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleFilter {
    #[default]
    Any,
    Content,
    Register,
}

impl RoleFilter {
    /// Whether a document of `role` is covered by this filter.
    pub fn matches(&self, role: Role) -> bool {
        match self {
            RoleFilter::Any => true,
            RoleFilter::Content => role == Role::Content,
            RoleFilter::Register => role == Role::Register,
        }
    }
}

/// An element/attribute pair, e.g. `personDef@index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementAttr {
    pub element: String,
    pub attribute: String,
}

impl ElementAttr {
    pub fn new(element: &str, attribute: &str) -> Self {
        Self {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

/// Pattern describing an identifier-bearing element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionRule {
    pub element: String,
    /// Attribute holding the identifier value.
    pub attribute: String,
    /// Category the identifier is registered under.
    pub category: String,
    #[serde(default)]
    pub role: RoleFilter,
    /// Child element that must be present for the definition to count as
    /// complete (the corpus requires a `lemma` under every register entry).
    #[serde(default)]
    pub required_child: Option<String>,
}

/// Pattern describing a pointer attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRule {
    pub element: String,
    pub attribute: String,
    /// Categories the target may live under; resolution succeeds if any
    /// one of them holds the identifier.
    pub categories: Vec<String>,
    #[serde(default)]
    pub role: RoleFilter,
    /// Soft references report unresolved targets as warnings instead of
    /// errors (intentionally dangling placeholders in drafts).
    #[serde(default)]
    pub soft: bool,
}

/// A compound reference carrying letter/page/line coordinates, validated
/// against the position index rather than the definition index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundRule {
    pub element: String,
    #[serde(default = "default_letter_attr")]
    pub letter_attribute: String,
    #[serde(default = "default_page_attr")]
    pub page_attribute: String,
    #[serde(default = "default_line_attr")]
    pub line_attribute: String,
}

fn default_letter_attr() -> String {
    "letter".to_string()
}

fn default_page_attr() -> String {
    "page".to_string()
}

fn default_line_attr() -> String {
    "line".to_string()
}

impl CompoundRule {
    pub fn new(element: &str) -> Self {
        Self {
            element: element.to_string(),
            letter_attribute: default_letter_attr(),
            page_attribute: default_page_attr(),
            line_attribute: default_line_attr(),
        }
    }
}

/// Configuration of the letter→page→line position index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionConfig {
    /// Elements that open a letter scope, e.g. `letterText@letter`.
    pub scopes: Vec<ElementAttr>,
    /// Page declaration pattern, e.g. `page@index`.
    pub page: ElementAttr,
    /// Line declaration pattern, e.g. `line@index`.
    pub line: ElementAttr,
    /// Category whose definitions are the valid letter identifiers.
    pub letter_category: String,
    /// Compound reference patterns checked against the index.
    pub compounds: Vec<CompoundRule>,
}

/// Rule configuration for one lint run.
///
/// The rule tables are kept external to the core logic so new document
/// types can be added without touching the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Maximum input file size in bytes; larger files are rejected before
    /// parsing.
    pub max_file_size: u64,
    pub definitions: Vec<DefinitionRule>,
    pub references: Vec<ReferenceRule>,
    #[serde(default)]
    pub positions: Option<PositionConfig>,
}

impl Default for LintConfig {
    /// The built-in rule set reproducing the correspondence-corpus
    /// conventions: `*Def@index` definitions in the shared reference file,
    /// `kommentar`/`subsection` entries in registers, and the pointer
    /// attributes of the letter content files.
    fn default() -> Self {
        let def = |element: &str, attribute: &str, category: &str| DefinitionRule {
            element: element.to_string(),
            attribute: attribute.to_string(),
            category: category.to_string(),
            role: RoleFilter::Any,
            required_child: None,
        };
        let register_def = |element: &str, category: &str| DefinitionRule {
            element: element.to_string(),
            attribute: "id".to_string(),
            category: category.to_string(),
            role: RoleFilter::Register,
            required_child: Some("lemma".to_string()),
        };
        let reference = |element: &str, attribute: &str, categories: &[&str]| ReferenceRule {
            element: element.to_string(),
            attribute: attribute.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            role: RoleFilter::Any,
            soft: false,
        };

        Self {
            version: 1,
            max_file_size: 33_554_432,
            definitions: vec![
                def("personDef", "index", "person"),
                def("locationDef", "index", "location"),
                def("handDef", "index", "hand"),
                def("appDef", "index", "app"),
                def("editreason", "index", "edit"),
                def("letterDesc", "letter", "letter"),
                register_def("kommentar", "commentary"),
                register_def("subsection", "subsection"),
            ],
            references: vec![
                reference("sender", "ref", &["person"]),
                reference("receiver", "ref", &["person"]),
                reference("location", "ref", &["location"]),
                reference("hand", "ref", &["hand"]),
                reference("edit", "ref", &["edit"]),
                reference("app", "ref", &["app"]),
                reference("letterText", "letter", &["letter"]),
                reference("letterTradition", "letter", &["letter"]),
                reference("link", "ref", &["commentary", "subsection"]),
                reference("link", "subref", &["subsection"]),
            ],
            positions: Some(PositionConfig {
                scopes: vec![
                    ElementAttr::new("letterText", "letter"),
                    ElementAttr::new("letterTradition", "letter"),
                ],
                page: ElementAttr::new("page", "index"),
                line: ElementAttr::new("line", "index"),
                letter_category: "letter".to_string(),
                compounds: vec![CompoundRule::new("intlink"), CompoundRule::new("marginal")],
            }),
        }
    }
}

impl LintConfig {
    /// Definition rules applicable to a document of the given role.
    pub fn definitions_for(&self, role: Role) -> impl Iterator<Item = &DefinitionRule> {
        self.definitions.iter().filter(move |r| r.role.matches(role))
    }

    /// Reference rules applicable to a document of the given role.
    pub fn references_for(&self, role: Role) -> impl Iterator<Item = &ReferenceRule> {
        self.references.iter().filter(move |r| r.role.matches(role))
    }
}

/// Loads the rule configuration from a JSON file, or returns the built-in
/// default rule set when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<LintConfig> {
    let Some(path) = path else {
        return Ok(LintConfig::default());
    };

    let contents = fs::read_to_string(path).map_err(|e| LintError::Config {
        message: format!("failed to read config file '{}': {}", path.display(), e),
    })?;

    let config: LintConfig = serde_json::from_str(&contents).map_err(|e| LintError::Config {
        message: format!("failed to parse config file '{}': {}", path.display(), e),
    })?;

    Ok(config)
}
