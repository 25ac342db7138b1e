//! Schema-driven field ordering.
//!
//! [`resolve_order`] is a projection: the output keeps only declared keys, in
//! declared order, and applying it twice gives the same result as once. List
//! element order is never touched; only each element's own keys are reordered.

use serde_yaml::{Mapping, Value};

use crate::schema::{OrderList, Schema};
use crate::types::RecordType;

/// Re-emit `record`'s keys in `order`, dropping every undeclared key.
///
/// Declared keys missing from `record` are skipped, never null-filled. A
/// declared key with a nested order has each mapping element of its list
/// ordered recursively; non-mapping elements are copied as they are.
pub fn resolve_order(record: &Mapping, order: &OrderList) -> Mapping {
    let mut out = Mapping::with_capacity(order.entries().len());
    for entry in order.entries() {
        let Some(value) = record.get(entry.key.as_str()) else {
            continue;
        };
        let value = match &entry.nested {
            Some(nested) => order_nested(value, nested),
            None => value.clone(),
        };
        out.insert(Value::String(entry.key.clone()), value);
    }
    out
}

fn order_nested(value: &Value, nested: &OrderList) -> Value {
    match value {
        Value::Sequence(items) => Value::Sequence(
            items
                .iter()
                .map(|item| match item {
                    Value::Mapping(map) => Value::Mapping(resolve_order(map, nested)),
                    other => other.clone(),
                })
                .collect(),
        ),
        Value::Mapping(map) => Value::Mapping(resolve_order(map, nested)),
        other => other.clone(),
    }
}

impl Schema {
    /// Order `record` by the declared order for `record_type`.
    ///
    /// A record type the schema does not know is returned unchanged, in its
    /// original key order. Callers that must reject unknown types check
    /// [`Schema::contains`] first.
    pub fn order_record(&self, record_type: &RecordType, record: &Mapping) -> Mapping {
        match self.get(record_type) {
            Some(order) => resolve_order(record, order),
            None => record.clone(),
        }
    }
}
