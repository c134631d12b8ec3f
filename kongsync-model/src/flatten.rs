//! Leaf-path flattening and lenient value equality.
//!
//! Drift detection and merge analysis both compare entity records
//! field-by-field. The shared rules live here:
//! - nested objects are traversed; a path like `config.timeout` identifies
//!   one scalar leaf
//! - arrays are compared as whole values, never expanded per index
//! - an absent value and an explicit empty/null value are equal

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Flattens an entity record into its leaf field paths.
///
/// Keys are dot-joined (`config.timeout`). Arrays and empty objects are
/// leaves. A non-object root becomes a single leaf under the empty path.
#[must_use]
pub fn flatten(value: &Value) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(key.clone(), child, &mut out);
            }
        }
        other => {
            out.insert(String::new(), other.clone());
        }
    }
    out
}

fn flatten_into(prefix: String, value: &Value, out: &mut BTreeMap<String, Value>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(format!("{prefix}.{key}"), child, out);
            }
        }
        other => {
            out.insert(prefix, other.clone());
        }
    }
}

/// Returns true for `null`, `""`, `[]`, and `{}`.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Structural equality where absent and empty values form one equivalence
/// class: `None`, `null`, `""`, `[]`, and `{}` all compare equal.
#[must_use]
pub fn values_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(only), None) | (None, Some(only)) => is_empty_value(only),
        (Some(a), Some(b)) => a == b || (is_empty_value(a) && is_empty_value(b)),
    }
}

/// Sets one leaf at a dot-joined path, creating intermediate objects as
/// needed. Non-object intermediates are replaced.
pub fn set_path(target: &mut Value, path: &str, new_value: Value) {
    let mut current = target;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Some(map) = current.as_object_mut() else {
            return;
        };
        if segments.peek().is_none() {
            map.insert(segment.to_string(), new_value);
            return;
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// Removes one leaf at a dot-joined path. Missing intermediates are a
/// no-op; empty parent objects are left in place.
pub fn remove_path(target: &mut Value, path: &str) {
    let mut current = target;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let Some(map) = current.as_object_mut() else {
            return;
        };
        if segments.peek().is_none() {
            map.remove(segment);
            return;
        }
        match map.get_mut(segment) {
            Some(next) => current = next,
            None => return,
        }
    }
}
