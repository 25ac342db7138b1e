//! Ordering schema: record type → declared key order.
//!
//! Two document shapes are accepted (see [`SchemaFormat`]).
//!
//! # `order` format
//!
//! ```yaml
//! specifications:
//!   article-4-direction:
//!     order:
//!       - specification
//!       - name
//!       - datasets:            # inline nested order
//!           - dataset
//!           - name
//!           - fields: [field, description, guidance]
//!   brownfield-land:
//!     order: [specification, name, datasets]
//!     datasets:                # sibling nested order
//!       order: [dataset, name, fields]
//!       fields:
//!         order: [field, description, guidance]
//! ```
//!
//! # `cms` format
//!
//! `collections[*].files[*]` entries name a record type; their `fields[*].name`
//! list is the order and a field's own `fields` list is its nested order. A
//! lone wrapper field named like the payload key is descended into.
//!
//! Any shape problem fails the load; nothing is silently skipped.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::SchemaError;
use crate::types::{RecordType, SchemaFormat};

/// Record → list-of-records → list-of-records.
pub const MAX_DEPTH: usize = 3;

// ---------------------------------------------------------------------------
// Order lists
// ---------------------------------------------------------------------------

/// One declared key, optionally carrying the order of its nested records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEntry {
    pub key: String,
    pub nested: Option<OrderList>,
}

impl OrderEntry {
    pub fn field(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            nested: None,
        }
    }

    pub fn nested(key: impl Into<String>, order: OrderList) -> Self {
        Self {
            key: key.into(),
            nested: Some(order),
        }
    }
}

/// An ordered sequence of declared keys for one nesting level.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderList(Vec<OrderEntry>);

impl OrderList {
    pub fn new(entries: Vec<OrderEntry>) -> Self {
        Self(entries)
    }

    /// A single-level list of plain keys.
    pub fn flat<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(OrderEntry::field).collect())
    }

    pub fn entries(&self) -> &[OrderEntry] {
        &self.0
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of nesting levels, counting this one.
    pub fn depth(&self) -> usize {
        1 + self
            .0
            .iter()
            .filter_map(|e| e.nested.as_ref())
            .map(OrderList::depth)
            .max()
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Immutable record type → [`OrderList`] table, loaded once per run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    types: BTreeMap<RecordType, OrderList>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an order list, validating depth and per-level key uniqueness.
    pub fn insert(&mut self, record_type: RecordType, order: OrderList) -> Result<(), SchemaError> {
        let location = record_type.to_string();
        validate(&order, &location, 1)?;
        if self.types.contains_key(&record_type) {
            return Err(SchemaError::malformed(location, "record type declared twice"));
        }
        self.types.insert(record_type, order);
        Ok(())
    }

    pub fn get(&self, record_type: &RecordType) -> Option<&OrderList> {
        self.types.get(record_type)
    }

    pub fn contains(&self, record_type: &RecordType) -> bool {
        self.types.contains_key(record_type)
    }

    pub fn record_types(&self) -> impl Iterator<Item = &RecordType> {
        self.types.keys()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Read and parse a schema document from disk.
    pub fn load(path: &Path, format: SchemaFormat, payload_key: &str) -> Result<Self, SchemaError> {
        let contents = std::fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let value: Value = serde_yaml::from_str(&contents).map_err(|e| SchemaError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_value(&value, format, payload_key)
    }

    /// Build a schema from an already-parsed document.
    pub fn from_value(
        value: &Value,
        format: SchemaFormat,
        payload_key: &str,
    ) -> Result<Self, SchemaError> {
        match format {
            SchemaFormat::Order => from_order_document(value),
            SchemaFormat::Cms => from_cms_document(value, payload_key),
        }
    }
}

fn validate(order: &OrderList, location: &str, level: usize) -> Result<(), SchemaError> {
    if level > MAX_DEPTH {
        return Err(SchemaError::TooDeep {
            location: location.to_owned(),
            max: MAX_DEPTH,
        });
    }
    let mut seen = HashSet::new();
    for entry in order.entries() {
        if !seen.insert(entry.key.as_str()) {
            return Err(SchemaError::malformed(
                location,
                format!("key '{}' declared twice", entry.key),
            ));
        }
        if let Some(nested) = &entry.nested {
            validate(nested, &format!("{location}.{}", entry.key), level + 1)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// `order` format
// ---------------------------------------------------------------------------

fn from_order_document(root: &Value) -> Result<Schema, SchemaError> {
    let specs = root
        .get("specifications")
        .ok_or_else(|| SchemaError::malformed("<root>", "missing `specifications`"))?;
    let specs = specs
        .as_mapping()
        .ok_or_else(|| SchemaError::malformed("specifications", "expected a mapping"))?;

    let mut schema = Schema::new();
    for (name, block) in specs {
        let name = scalar_key(name, "specifications")?;
        let location = format!("specifications.{name}");
        let block = block
            .as_mapping()
            .ok_or_else(|| SchemaError::malformed(&location, "expected a mapping with `order`"))?;
        let order = parse_block(block, &location)?;
        schema.insert(RecordType::from(name), order)?;
    }
    Ok(schema)
}

/// `{ order: [...], <key>: { order: [...] }, ... }`
fn parse_block(block: &Mapping, location: &str) -> Result<OrderList, SchemaError> {
    let items = block
        .get("order")
        .ok_or_else(|| SchemaError::malformed(location, "missing `order`"))?;
    let items = items
        .as_sequence()
        .ok_or_else(|| SchemaError::malformed(format!("{location}.order"), "expected a list"))?;
    let mut order = parse_items(items, &format!("{location}.order"))?;

    let declared: HashSet<String> = order.keys().map(str::to_owned).collect();
    for (key, sibling) in block {
        let key = scalar_key(key, location)?;
        if key == "order" {
            continue;
        }
        let sibling_location = format!("{location}.{key}");
        if !declared.contains(&key) {
            return Err(SchemaError::malformed(
                sibling_location,
                "nested order for a key missing from `order`",
            ));
        }
        let sibling = sibling.as_mapping().ok_or_else(|| {
            SchemaError::malformed(&sibling_location, "expected a mapping with `order`")
        })?;
        let nested = parse_block(sibling, &sibling_location)?;
        let Some(entry) = order.0.iter_mut().find(|e| e.key == key) else {
            continue;
        };
        if entry.nested.is_some() {
            return Err(SchemaError::malformed(
                sibling_location,
                "nested order declared both inline and as a sibling",
            ));
        }
        entry.nested = Some(nested);
    }
    Ok(order)
}

/// Items are either `key` or `{ key: [ ...nested items... ] }`.
fn parse_items(items: &[Value], location: &str) -> Result<OrderList, SchemaError> {
    let mut entries = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let item_location = format!("{location}[{i}]");
        match item {
            Value::Mapping(map) => {
                if map.len() != 1 {
                    return Err(SchemaError::malformed(
                        item_location,
                        "nested entry must have exactly one key",
                    ));
                }
                let Some((key, nested)) = map.iter().next() else {
                    continue;
                };
                let key = scalar_key(key, &item_location)?;
                let nested_location = format!("{location}.{key}");
                let nested = nested.as_sequence().ok_or_else(|| {
                    SchemaError::malformed(&nested_location, "nested order must be a list")
                })?;
                entries.push(OrderEntry::nested(
                    key,
                    parse_items(nested, &nested_location)?,
                ));
            }
            other => entries.push(OrderEntry::field(scalar_key(other, &item_location)?)),
        }
    }
    Ok(OrderList::new(entries))
}

// ---------------------------------------------------------------------------
// `cms` format
// ---------------------------------------------------------------------------

fn from_cms_document(root: &Value, payload_key: &str) -> Result<Schema, SchemaError> {
    let collections = root
        .get("collections")
        .ok_or_else(|| SchemaError::malformed("<root>", "missing `collections`"))?
        .as_sequence()
        .ok_or_else(|| SchemaError::malformed("collections", "expected a list"))?;

    let mut schema = Schema::new();
    for (ci, collection) in collections.iter().enumerate() {
        let location = format!("collections[{ci}]");
        // Folder collections carry no per-file field list.
        let Some(files) = collection.get("files") else {
            continue;
        };
        let files = files
            .as_sequence()
            .ok_or_else(|| SchemaError::malformed(format!("{location}.files"), "expected a list"))?;
        for (fi, file) in files.iter().enumerate() {
            let file_location = format!("{location}.files[{fi}]");
            let name = file
                .get("name")
                .ok_or_else(|| SchemaError::malformed(&file_location, "missing `name`"))?;
            let name = scalar_key(name, &file_location)?;
            let fields = file
                .get("fields")
                .ok_or_else(|| SchemaError::malformed(&file_location, "missing `fields`"))?;
            let fields = fields.as_sequence().ok_or_else(|| {
                SchemaError::malformed(format!("{file_location}.fields"), "expected a list")
            })?;
            let mut order = parse_cms_fields(fields, &format!("{file_location}.fields"))?;
            if let [only] = order.entries() {
                if only.key == payload_key {
                    if let Some(inner) = &only.nested {
                        order = inner.clone();
                    }
                }
            }
            schema.insert(RecordType::from(name), order)?;
        }
    }
    Ok(schema)
}

fn parse_cms_fields(fields: &[Value], location: &str) -> Result<OrderList, SchemaError> {
    let mut entries = Vec::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        let field_location = format!("{location}[{i}]");
        let name = field
            .get("name")
            .ok_or_else(|| SchemaError::malformed(&field_location, "missing `name`"))?;
        let name = scalar_key(name, &field_location)?;
        match field.get("fields") {
            None => entries.push(OrderEntry::field(name)),
            Some(Value::Sequence(nested)) => {
                let nested = parse_cms_fields(nested, &format!("{field_location}.fields"))?;
                entries.push(OrderEntry::nested(name, nested));
            }
            Some(_) => {
                return Err(SchemaError::malformed(
                    format!("{field_location}.fields"),
                    "expected a list",
                ))
            }
        }
    }
    Ok(OrderList::new(entries))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn scalar_key(value: &Value, location: &str) -> Result<String, SchemaError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(SchemaError::malformed(location, "expected a scalar key")),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
