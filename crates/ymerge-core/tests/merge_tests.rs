/*
 * merge_tests.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Merging fixture files from disk.

use pretty_assertions::assert_eq;
use std::path::PathBuf;
use ymerge_core::{
    Mapping, MergeError, MergeOptions, UndefinedVariables, Value, VariableScope, YamlMerger,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test-fixtures")
        .join(name)
}

fn merger() -> YamlMerger {
    YamlMerger::with_variables(VariableScope::new())
}

fn merge(names: &[&str]) -> Mapping {
    let paths: Vec<PathBuf> = names.iter().map(|name| fixture(name)).collect();
    merger().merge_documents(&paths).unwrap()
}

fn yaml(text: &str) -> Mapping {
    serde_yaml::from_str(text).unwrap()
}

#[test]
fn test_single_source_is_identity() {
    let text = std::fs::read_to_string(fixture("base.yaml")).unwrap();
    assert_eq!(merge(&["base.yaml"]), yaml(&text));
}

#[test]
fn test_merging_source_with_itself_doubles_only_lists() {
    assert_eq!(merge(&["base.yaml", "base.yaml"]), merge(&["base.yaml"]));

    let doubled = Value::Mapping(merge(&["list-merge-2.yaml", "list-merge-2.yaml"]));
    let items = doubled["hashlevel1"]["listlevel2"].as_sequence().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0], items[1]);
}

#[test]
fn test_override_replaces_scalar_and_keeps_siblings() {
    let merged = merge(&["base.yaml", "override.yaml"]);
    assert_eq!(
        merged,
        yaml(
            "database:\n  user: alternate-user\n  password: some-password\n  url: jdbc:mysql://localhost:3306/some-db\n  properties:\n    hibernate.dialect: org.hibernate.dialect.MySQL5InnoDBDialect\n"
        )
    );
}

#[test]
fn test_order_matters() {
    let forward = Value::Mapping(merge(&["base.yaml", "override.yaml"]));
    let reverse = Value::Mapping(merge(&["override.yaml", "base.yaml"]));
    assert_eq!(forward["database"]["user"].as_str(), Some("alternate-user"));
    assert_eq!(reverse["database"]["user"].as_str(), Some("some-user"));
}

#[test]
fn test_lists_concatenate_in_order() {
    let merged = merge(&["list-merge-1.yaml", "list-merge-2.yaml"]);
    assert_eq!(
        merged,
        yaml(
            "hashlevel1:\n  listlevel2:\n    - namespace: ns1\n      option_name: option1\n    - namespace: ns2\n      option_name: option2\n    - namespace: ns3\n      option_name: option3\n"
        )
    );
}

#[test]
fn test_null_values_survive() {
    let merged = merge(&["nulls.yaml"]);
    assert_eq!(merged.get("prop1"), Some(&Value::from("value")));
    assert_eq!(merged.get("prop2"), Some(&Value::Null));
}

#[test]
fn test_substitution_with_colon() {
    let scope: VariableScope = [("ENV_VAR", "localhost")].into_iter().collect();
    let merged = YamlMerger::with_variables(scope)
        .merge_documents(&[fixture("colon.yaml")])
        .unwrap();
    assert_eq!(merged, yaml("memcache:\n  another_key: \"localhost:22133\"\n"));
}

#[test]
fn test_structured_over_scalar_fails_with_key() {
    let paths = [fixture("base.yaml"), fixture("structured-user.yaml")];
    let err = merger().merge_documents(&paths).unwrap_err();

    assert!(matches!(err, MergeError::IncompatibleMerge { .. }));
    assert_eq!(err.key(), Some("database.user"));
    assert!(
        err.to_string()
            .starts_with("cannot merge a structured value into a simple one: database.user")
    );
}

#[test]
fn test_scalar_over_structured_succeeds() {
    let merged = Value::Mapping(merge(&["structured-user.yaml", "base.yaml"]));
    assert_eq!(merged["database"]["user"].as_str(), Some("some-user"));
}

#[test]
fn test_missing_file_aborts_merge() {
    let paths = [fixture("base.yaml"), fixture("does-not-exist.yaml")];
    let err = merger().merge_documents(&paths).unwrap_err();

    assert!(matches!(err, MergeError::NotFound { .. }));
    assert!(err.to_string().starts_with("YAML file to merge not found:"));
    assert!(err.to_string().ends_with("does-not-exist.yaml"));
}

#[test]
fn test_strict_mode_fails_on_unset_variable() {
    let err = merger()
        .with_options(MergeOptions {
            undefined_variables: UndefinedVariables::Error,
        })
        .merge_documents(&[fixture("colon.yaml")])
        .unwrap_err();
    assert!(matches!(err, MergeError::Template { .. }));
    assert!(err.to_string().contains("ENV_VAR"));
}

#[test]
fn test_output_round_trips() {
    let merger = merger();
    let paths = [fixture("base.yaml"), fixture("override.yaml"), fixture("list-merge-1.yaml")];
    let text = merger.merge_to_string(&paths).unwrap();
    assert_eq!(yaml(&text), merger.merge_documents(&paths).unwrap());
}
