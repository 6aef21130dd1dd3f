//! Category totals. Every figure on the statement is produced here, once.

use serde_json::Value;

use crate::catalog::{CategoryDef, Source};
use crate::money::to_number;
use crate::tree::{FieldMap, LineItemEntry};

/// Left-to-right sum of `field_name` over `entries`. Absent and empty fields
/// both count as zero.
pub fn sum_category<'a, I>(entries: I, field_name: &str) -> f64
where
    I: IntoIterator<Item = &'a LineItemEntry>,
{
    entries
        .into_iter()
        .fold(0.0, |acc, entry| acc + to_number(entry.get(field_name)))
}

/// Sum of a fixed list of scalar fields of one sub-tree.
pub fn sum_scalar_fields(subtree: Option<&FieldMap>, field_names: &[&str]) -> f64 {
    let Some(map) = subtree else {
        return 0.0;
    };
    field_names
        .iter()
        .fold(0.0, |acc, name| acc + to_number(map.get(*name)))
}

/// The entries of a repeatable category.
///
/// An absent key or a non-array value yields no entries. An array holding
/// anything other than objects is malformed and the whole category is read
/// as empty, so the section still renders with a zero total.
pub fn resolve_entries<'a>(subtree: Option<&'a FieldMap>, key: &str) -> Vec<&'a LineItemEntry> {
    let Some(value) = subtree.and_then(|m| m.get(key)) else {
        return Vec::new();
    };
    match value {
        Value::Array(items) => {
            let objects: Vec<&LineItemEntry> = items.iter().filter_map(Value::as_object).collect();
            if objects.len() != items.len() {
                log::warn!(
                    "category '{key}': {} of {} entries are not objects, treating category as empty",
                    items.len() - objects.len(),
                    items.len()
                );
                return Vec::new();
            }
            objects
        }
        Value::Null => Vec::new(),
        other => {
            log::warn!(
                "category '{key}': expected an entry list, found {}, treating category as empty",
                json_kind(other)
            );
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Total of one category over its full, untruncated source.
pub fn category_total(def: &CategoryDef, subtree: Option<&FieldMap>) -> f64 {
    match def.source {
        Source::Entries { key, .. } => {
            let items = resolve_entries(subtree, key);
            def.money_fields()
                .fold(0.0, |acc, f| acc + sum_category(items.iter().copied(), f.key))
        }
        Source::Scalars { .. } => {
            let names: Vec<&str> = def.money_fields().map(|f| f.key).collect();
            sum_scalar_fields(subtree, &names)
        }
    }
}
