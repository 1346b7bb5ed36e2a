use std::fs;

use tempfile::TempDir;

use xreflint::config::Role;
use xreflint::errors::LintError;
use xreflint::loader::{element_path, line_of, load_all, LoadedDocument};

const META: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<document>
  <!-- editorial note kept in the source -->
  <letterDesc letter="1">
    <sender ref="42"/>
  </letterDesc>
</document>"#;

#[test]
fn test_load_well_formed_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meta.xml");
    fs::write(&path, META).unwrap();

    let doc = LoadedDocument::load(&path, Role::Content, 1_048_576).unwrap();
    assert_eq!(doc.role(), Role::Content);
    assert!(doc.name().ends_with("meta.xml"));
    let tree = doc.parse().unwrap();
    assert_eq!(tree.root_element().tag_name().name(), "document");
}

#[test]
fn test_comments_survive_parsing() {
    let doc = LoadedDocument::from_source("meta.xml", Role::Content, META).unwrap();
    let tree = doc.parse().unwrap();
    let comment = tree
        .descendants()
        .find(|n| n.node_type() == roxmltree::NodeType::Comment);
    assert!(comment.is_some(), "comment nodes must be preserved");
}

#[test]
fn test_ill_formed_document_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.xml");
    fs::write(&path, "<document><unclosed></document>").unwrap();

    let err = LoadedDocument::load(&path, Role::Content, 1_048_576).unwrap_err();
    match err {
        LintError::Parse { document, .. } => {
            assert!(document.ends_with("broken.xml"), "got document {}", document)
        }
        other => panic!("expected Parse error, got {:?}", other),
    }
}

#[test]
fn test_oversized_file_rejected_before_parsing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("big.xml");
    // Content is invalid XML on purpose: the size check must fire first.
    fs::write(&path, "x".repeat(100)).unwrap();

    let err = LoadedDocument::load(&path, Role::Content, 10).unwrap_err();
    match err {
        LintError::FileTooLarge { size, limit, .. } => {
            assert_eq!(size, 100);
            assert_eq!(limit, 10);
        }
        other => panic!("expected FileTooLarge, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.xml");
    let err = LoadedDocument::load(&path, Role::Content, 1024).unwrap_err();
    assert!(matches!(err, LintError::Io { .. }));
}

#[test]
fn test_load_all_orders_content_before_registers() {
    let dir = TempDir::new().unwrap();
    let meta = dir.path().join("meta.xml");
    let register = dir.path().join("register.xml");
    fs::write(&meta, "<document/>").unwrap();
    fs::write(&register, "<register/>").unwrap();

    let docs = load_all(&[&meta], &[&register], 1_048_576).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].role(), Role::Content);
    assert_eq!(docs[1].role(), Role::Register);
}

#[test]
fn test_element_path_and_line() {
    let doc = LoadedDocument::from_source("meta.xml", Role::Content, META).unwrap();
    let tree = doc.parse().unwrap();
    let sender = tree
        .descendants()
        .find(|n| n.has_tag_name("sender"))
        .unwrap();
    assert_eq!(element_path(sender), "document/letterDesc/sender");
    assert_eq!(line_of(&tree, sender), 5);
}
