use xreflint::config::{LintConfig, Role};
use xreflint::index::DefinitionIndex;
use xreflint::loader::LoadedDocument;
use xreflint::resolver::{orphan_findings, resolve_references};
use xreflint::types::{DefKey, FindingKind, Severity};

fn content(name: &str, xml: &str) -> LoadedDocument {
    LoadedDocument::from_source(name, Role::Content, xml).expect("test document should parse")
}

fn register(name: &str, xml: &str) -> LoadedDocument {
    LoadedDocument::from_source(name, Role::Register, xml).expect("test document should parse")
}

fn build_index(docs: &[LoadedDocument], config: &LintConfig) -> DefinitionIndex {
    let mut findings = Vec::new();
    let index = DefinitionIndex::build(docs, config, &mut findings).unwrap();
    assert!(findings.is_empty(), "index findings: {:?}", findings);
    index
}

#[test]
fn test_resolved_reference_produces_no_finding() {
    let config = LintConfig::default();
    let docs = vec![
        content("references.xml", r#"<references><personDef index="42"/></references>"#),
        content(
            "meta.xml",
            r#"<document><letterDesc letter="1"><sender ref="42"/></letterDesc></document>"#,
        ),
    ];
    let index = build_index(&docs, &config);
    let outcome = resolve_references(&docs, &config, &index).unwrap();

    assert_eq!(outcome.reference_count, 1);
    assert!(outcome.findings.is_empty());
    assert!(outcome.resolved_keys.contains(&DefKey::new("person", "42")));
}

#[test]
fn test_unresolved_reference_cites_document_and_identifier() {
    let config = LintConfig::default();
    let docs = vec![
        content("references.xml", r#"<references><personDef index="42"/></references>"#),
        content(
            "meta.xml",
            r#"<document>
  <letterDesc letter="1">
    <sender ref="42"/>
    <receiver ref="999"/>
  </letterDesc>
</document>"#,
        ),
    ];
    let index = build_index(&docs, &config);
    let outcome = resolve_references(&docs, &config, &index).unwrap();

    assert_eq!(outcome.findings.len(), 1, "exactly one finding expected");
    let finding = &outcome.findings[0];
    assert_eq!(finding.severity, Severity::Error);
    assert_eq!(finding.kind, FindingKind::UnresolvedReference);
    assert_eq!(finding.document, "meta.xml");
    assert_eq!(finding.line, 4);
    assert_eq!(finding.identifier.as_deref(), Some("999"));
    assert!(
        finding.message.contains("receiver"),
        "finding should cite the source element: {}",
        finding.message
    );
}

#[test]
fn test_soft_rule_downgrades_to_warning() {
    let mut config = LintConfig::default();
    for rule in &mut config.references {
        if rule.element == "receiver" {
            rule.soft = true;
        }
    }
    let docs = vec![content(
        "meta.xml",
        r#"<document><letterDesc letter="1"><receiver ref="999"/></letterDesc></document>"#,
    )];
    let index = build_index(&docs, &config);
    let outcome = resolve_references(&docs, &config, &index).unwrap();

    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].severity, Severity::Warning);
    assert_eq!(outcome.findings[0].kind, FindingKind::UnresolvedReference);
}

#[test]
fn test_empty_reference_attribute_is_malformed_not_unresolved() {
    let config = LintConfig::default();
    let docs = vec![content(
        "meta.xml",
        r#"<document><letterDesc letter="1"><sender ref=""/></letterDesc></document>"#,
    )];
    let index = build_index(&docs, &config);
    let outcome = resolve_references(&docs, &config, &index).unwrap();

    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].kind, FindingKind::MalformedReference);
    assert_eq!(outcome.reference_count, 0, "malformed is not counted as a reference");
}

#[test]
fn test_absent_pointer_attribute_is_skipped() {
    let config = LintConfig::default();
    // A <location> element with no @ref declares a place inline; it is not
    // a pointer at all.
    let docs = vec![content(
        "meta.xml",
        r#"<document><letterDesc letter="1"><location>Leipzig</location></letterDesc></document>"#,
    )];
    let index = build_index(&docs, &config);
    let outcome = resolve_references(&docs, &config, &index).unwrap();
    assert!(outcome.findings.is_empty());
    assert_eq!(outcome.reference_count, 0);
}

#[test]
fn test_multi_category_reference_resolves_under_either() {
    let config = LintConfig::default();
    let docs = vec![
        register(
            "Register-Kommentar.xml",
            r#"<register>
  <kommentar id="gen"><lemma>Genesis</lemma>
    <subsection id="gen-1"><lemma>Creation</lemma></subsection>
  </kommentar>
</register>"#,
        ),
        content(
            "briefe.xml",
            r#"<document>
  <link ref="gen"/>
  <link ref="gen-1"/>
  <link ref="exodus"/>
</document>"#,
        ),
    ];
    let index = build_index(&docs, &config);
    let outcome = resolve_references(&docs, &config, &index).unwrap();

    // "gen" hits commentary, "gen-1" hits subsection, "exodus" fails both.
    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].identifier.as_deref(), Some("exodus"));
    assert!(
        outcome.findings[0].message.contains("commentary|subsection"),
        "message should name the candidate categories: {}",
        outcome.findings[0].message
    );
}

#[test]
fn test_subref_must_be_a_subsection() {
    let config = LintConfig::default();
    let docs = vec![
        register(
            "Register-Kommentar.xml",
            r#"<register>
  <kommentar id="gen"><lemma>Genesis</lemma>
    <subsection id="gen-1"><lemma>Creation</lemma></subsection>
  </kommentar>
</register>"#,
        ),
        content("briefe.xml", r#"<document><link ref="gen" subref="gen"/></document>"#),
    ];
    let index = build_index(&docs, &config);
    let outcome = resolve_references(&docs, &config, &index).unwrap();

    // @ref resolves as commentary, but @subref="gen" is not a subsection.
    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].kind, FindingKind::UnresolvedReference);
    assert_eq!(outcome.findings[0].identifier.as_deref(), Some("gen"));
}

#[test]
fn test_category_disambiguates_colliding_ids() {
    let config = LintConfig::default();
    let docs = vec![
        content(
            "references.xml",
            r#"<references><locationDef index="42"/></references>"#,
        ),
        content(
            "meta.xml",
            r#"<document><letterDesc letter="1"><sender ref="42"/></letterDesc></document>"#,
        ),
    ];
    let index = build_index(&docs, &config);
    let outcome = resolve_references(&docs, &config, &index).unwrap();

    // location 42 exists, but sender@ref needs person 42.
    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].kind, FindingKind::UnresolvedReference);
}

#[test]
fn test_orphans_reported_only_for_unreferenced_definitions() {
    let config = LintConfig::default();
    let docs = vec![
        content(
            "references.xml",
            r#"<references>
  <personDef index="42"/>
  <locationDef index="7"/>
</references>"#,
        ),
        content(
            "meta.xml",
            r#"<document><letterDesc letter="1"><sender ref="42"/></letterDesc></document>"#,
        ),
    ];
    let index = build_index(&docs, &config);
    let outcome = resolve_references(&docs, &config, &index).unwrap();
    let orphans = orphan_findings(&index, &outcome.resolved_keys);

    // person 42 is referenced; location 7 and letter 1 are not.
    assert!(orphans.iter().all(|f| f.severity == Severity::Info));
    assert!(orphans.iter().all(|f| f.kind == FindingKind::OrphanDefinition));
    assert!(orphans
        .iter()
        .any(|f| f.identifier.as_deref() == Some("7") && f.message.contains("location")));
    assert!(!orphans
        .iter()
        .any(|f| f.identifier.as_deref() == Some("42") && f.message.contains("person")));
}
