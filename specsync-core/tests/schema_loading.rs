//! Schema and config loading from disk: error messages and both schema formats.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use specsync_core::{
    config::DEFAULT_CONFIG_PATH, ConfigError, RecordType, Schema, SchemaError, SchemaFormat,
    SyncConfig,
};

const ORDER_SCHEMA: &str = "\
specifications:
  article-4-direction:
    order:
      - specification
      - name
      - datasets:
          - dataset
          - name
          - fields: [field, description, guidance]
  brownfield-land:
    order: [name, description]
";

const CMS_CONFIG: &str = "\
backend:
  name: github
collections:
  - name: pages
    folder: content/pages
    fields:
      - {name: title}
  - name: specifications
    files:
      - name: conservation-area
        file: data/collections/specifications/conservation-area.yml
        fields:
          - name: data
            widget: object
            fields:
              - {name: specification, widget: string}
              - {name: name, widget: string}
              - name: datasets
                widget: list
                fields:
                  - {name: dataset}
                  - name: fields
                    widget: list
                    fields:
                      - {name: field}
                      - {name: guidance}
";

// ---------------------------------------------------------------------------
// 1. Schema load
// ---------------------------------------------------------------------------

#[test]
fn order_schema_loads_every_record_type() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("schema.yml");
    file.write_str(ORDER_SCHEMA).expect("write");

    let schema = Schema::load(file.path(), SchemaFormat::Order, "data").expect("load");
    assert_eq!(schema.len(), 2);
    let order = schema.get(&RecordType::from("article-4-direction")).expect("type");
    assert_eq!(order.keys().collect::<Vec<_>>(), vec!["specification", "name", "datasets"]);
    assert_eq!(order.depth(), 3);
}

#[test]
fn cms_config_doubles_as_schema() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("config.yml");
    file.write_str(CMS_CONFIG).expect("write");

    let schema = Schema::load(file.path(), SchemaFormat::Cms, "data").expect("load");
    assert_eq!(schema.len(), 1, "folder collections contribute nothing");
    let order = schema.get(&RecordType::from("conservation-area")).expect("type");
    assert_eq!(order.keys().collect::<Vec<_>>(), vec!["specification", "name", "datasets"]);
    let datasets = order.entries()[2].nested.as_ref().expect("nested datasets");
    assert_eq!(datasets.keys().collect::<Vec<_>>(), vec!["dataset", "fields"]);
}

#[test]
fn missing_schema_file_reports_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let missing = dir.path().join("schema.yml");
    let err = Schema::load(&missing, SchemaFormat::Order, "data").unwrap_err();
    assert!(matches!(err, SchemaError::Io { .. }), "got: {err}");
    assert!(err.to_string().contains("schema.yml"));
}

#[test]
fn corrupt_schema_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("schema.yml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed").expect("write");

    let err = Schema::load(file.path(), SchemaFormat::Order, "data").unwrap_err();
    assert!(matches!(err, SchemaError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("schema.yml"));
}

#[test]
fn non_list_nested_order_is_malformed() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("schema.yml");
    file.write_str("specifications:\n  t:\n    order:\n      - datasets: dataset\n")
        .expect("write");

    let err = Schema::load(file.path(), SchemaFormat::Order, "data").unwrap_err();
    assert!(matches!(err, SchemaError::Malformed { .. }), "got: {err}");
    assert!(err.to_string().contains("specifications.t.order.datasets"));
}

#[test]
fn order_document_given_cms_format_is_malformed() {
    let err = Schema::from_value(
        &serde_yaml::from_str(ORDER_SCHEMA).expect("yaml"),
        SchemaFormat::Cms,
        "data",
    )
    .unwrap_err();
    assert!(err.to_string().contains("collections"));
}

// ---------------------------------------------------------------------------
// 2. Config load
// ---------------------------------------------------------------------------

#[test]
fn config_file_overrides_mappings() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child(DEFAULT_CONFIG_PATH)
        .write_str(
            "repository: acme/specs\nenvelope: open\nschema:\n  path: cms/config.yml\n  format: cms\nmappings:\n  - source: in/a.yml\n    destination: out/a.md\n    type: listed-building\n",
        )
        .expect("write");

    let config = SyncConfig::resolve(dir.path(), None).expect("resolve");
    assert_eq!(config.mappings.len(), 1);
    assert_eq!(config.mappings[0].record_type(), RecordType::from("listed-building"));
    assert_eq!(config.schema.format, SchemaFormat::Cms);
}

#[test]
fn unknown_config_key_is_a_parse_error() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child(DEFAULT_CONFIG_PATH);
    file.write_str("repositry: typo/here\n").expect("write");

    let err = SyncConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    file.assert(predicate::str::contains("repositry"));
}

#[test]
fn empty_mappings_fail_validation() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child(DEFAULT_CONFIG_PATH);
    file.write_str("mappings: []\n").expect("write");

    let err = SyncConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)), "got: {err}");
}
