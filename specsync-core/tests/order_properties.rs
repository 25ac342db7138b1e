//! Ordering properties of `resolve_order` and `Schema::order_record`.
//!
//! Each `#[case]` is isolated — no shared state.

use rstest::rstest;
use serde_yaml::{Mapping, Value};
use specsync_core::{resolve_order, OrderEntry, OrderList, RecordType, Schema};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn map(text: &str) -> Mapping {
    serde_yaml::from_str(text).expect("mapping fixture")
}

fn keys(m: &Mapping) -> Vec<String> {
    m.keys().filter_map(Value::as_str).map(str::to_owned).collect()
}

fn spec_order() -> OrderList {
    OrderList::new(vec![
        OrderEntry::field("specification"),
        OrderEntry::field("name"),
        OrderEntry::field("plural"),
        OrderEntry::field("description"),
        OrderEntry::field("version"),
        OrderEntry::nested(
            "datasets",
            OrderList::new(vec![
                OrderEntry::field("dataset"),
                OrderEntry::field("name"),
                OrderEntry::nested("fields", OrderList::flat(["field", "description", "guidance"])),
            ]),
        ),
    ])
}

fn nth<'a>(m: &'a Mapping, key: &str, i: usize) -> &'a Mapping {
    m.get(key)
        .and_then(Value::as_sequence)
        .and_then(|s| s.get(i))
        .and_then(Value::as_mapping)
        .expect("nested mapping")
}

// ---------------------------------------------------------------------------
// 1. Key sequence = [k for k in O if k in R]
// ---------------------------------------------------------------------------

#[rstest]
#[case("version: 1.0.0\nname: Test name\nspecification: test-spec\n", &["specification", "name", "version"])]
#[case("description: d\nplural: p\n", &["plural", "description"])]
#[case("unrelated: 1\nalso: 2\n", &[])]
#[case("{}", &[])]
#[case("datasets: []\nspecification: s\nextra: e\n", &["specification", "datasets"])]
fn output_keys_follow_declared_order(#[case] record: &str, #[case] expected: &[&str]) {
    let out = resolve_order(&map(record), &spec_order());
    assert_eq!(keys(&out), expected);
}

#[test]
fn declared_order_independent_of_input_order() {
    let a = map("name: n\nversion: v\nspecification: s\n");
    let b = map("specification: s\nversion: v\nname: n\n");
    assert_eq!(resolve_order(&a, &spec_order()), resolve_order(&b, &spec_order()));
}

// ---------------------------------------------------------------------------
// 2. Idempotence
// ---------------------------------------------------------------------------

#[rstest]
#[case("version: 1\nname: n\nx: 1\n")]
#[case("datasets:\n  - fields:\n      - guidance: g\n        field: f\n        junk: j\n    dataset: d\n    extra: e\n")]
fn ordering_is_idempotent(#[case] record: &str) {
    let once = resolve_order(&map(record), &spec_order());
    let twice = resolve_order(&once, &spec_order());
    assert_eq!(once, twice);
}

// ---------------------------------------------------------------------------
// 3. Nested ordering
// ---------------------------------------------------------------------------

#[test]
fn nested_datasets_and_fields_are_ordered() {
    let record = map(
        "datasets:\n  - name: Test dataset\n    dataset: test-dataset\n    fields:\n      - description: d1\n        field: field1\n        guidance: g1\n",
    );
    let out = resolve_order(&record, &spec_order());
    let dataset = nth(&out, "datasets", 0);
    assert_eq!(keys(dataset), vec!["dataset", "name", "fields"]);
    let field = nth(dataset, "fields", 0);
    assert_eq!(keys(field), vec!["field", "description", "guidance"]);
}

#[test]
fn list_element_order_is_preserved() {
    let record = map(
        "datasets:\n  - name: B\n    dataset: b\n    fields:\n      - field: z\n      - field: a\n  - name: A\n    dataset: a\n",
    );
    let out = resolve_order(&record, &spec_order());
    let names: Vec<_> = out
        .get("datasets")
        .and_then(Value::as_sequence)
        .expect("datasets")
        .iter()
        .filter_map(|d| d.get("dataset").and_then(Value::as_str))
        .collect();
    assert_eq!(names, vec!["b", "a"]);
    let fields: Vec<_> = nth(&out, "datasets", 0)
        .get("fields")
        .and_then(Value::as_sequence)
        .expect("fields")
        .iter()
        .filter_map(|f| f.get("field").and_then(Value::as_str))
        .collect();
    assert_eq!(fields, vec!["z", "a"]);
}

#[test]
fn undeclared_nested_keys_never_appear() {
    let record = map("datasets:\n  - dataset: d\n    secret: s\n    fields:\n      - field: f\n        secret: s\n");
    let out = resolve_order(&record, &spec_order());
    let rendered = serde_yaml::to_string(&out).expect("serialize");
    assert!(!rendered.contains("secret"), "got: {rendered}");
}

#[rstest]
#[case("datasets: []\n")]
#[case("datasets:\n  - dataset: d\n    fields: []\n")]
fn empty_lists_stay_empty_lists(#[case] record: &str) {
    let out = resolve_order(&map(record), &spec_order());
    let datasets = out.get("datasets").and_then(Value::as_sequence).expect("datasets kept");
    if let Some(first) = datasets.first() {
        let fields = first.get("fields").and_then(Value::as_sequence).expect("fields kept");
        assert!(fields.is_empty());
    }
}

// ---------------------------------------------------------------------------
// 4. Schema lookup
// ---------------------------------------------------------------------------

#[test]
fn unknown_record_type_is_returned_unchanged() {
    let mut schema = Schema::new();
    schema
        .insert(RecordType::from("article-4-direction"), spec_order())
        .expect("insert");
    let record = map("zeta: 1\nalpha: 2\n");
    let out = schema.order_record(&RecordType::from("unknown"), &record);
    assert_eq!(keys(&out), vec!["zeta", "alpha"]);
}

#[test]
fn known_record_type_is_ordered() {
    let mut schema = Schema::new();
    schema
        .insert(RecordType::from("article-4-direction"), spec_order())
        .expect("insert");
    let record = map("name: n\nspecification: s\n");
    let out = schema.order_record(&RecordType::from("article-4-direction"), &record);
    assert_eq!(keys(&out), vec!["specification", "name"]);
}
