//! Minimal schema validation of a merged record.

use kongsync_model::{expected_type, flatten, required_fields, values_equal, EntityType};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// The outcome of validating a merged record.
///
/// Warnings never affect validity; they flag things an operator may want
/// to look at before writing the merge anywhere.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeValidationResult {
    /// True iff no errors were found.
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Checks a merged record against the minimal per-entity-type schema.
///
/// Errors: a required field absent or empty, or a well-known field holding
/// the wrong JSON type. Warnings: when both original states are supplied,
/// any field present in the merged record but absent from both originals
/// is flagged as an unknown addition.
#[must_use]
pub fn validate_merged_state(
    merged: &Value,
    entity_type: EntityType,
    source: Option<&Value>,
    target: Option<&Value>,
) -> MergeValidationResult {
    let mut result = MergeValidationResult::default();

    for field in required_fields(entity_type) {
        if values_equal(merged.get(*field), None) {
            result
                .errors
                .push(format!("missing required field: {field}"));
        }
    }

    if let Some(map) = merged.as_object() {
        for (field, value) in map {
            if value.is_null() {
                continue;
            }
            if let Some(expected) = expected_type(field) {
                if !expected.matches(value) {
                    result.errors.push(format!(
                        "field {field}: expected {expected}, got {}",
                        json_type_name(value)
                    ));
                }
            }
        }
    }

    if let (Some(source), Some(target)) = (source, target) {
        let known: BTreeSet<String> = flatten(source)
            .into_keys()
            .chain(flatten(target).into_keys())
            .collect();
        for path in flatten(merged).keys() {
            if !known.contains(path) {
                result.warnings.push(format!("unknown field added: {path}"));
            }
        }
    }

    result.is_valid = result.errors.is_empty();
    result
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
