//! Static schema tables for merge validation.
//!
//! A minimal per-entity-type schema: which fields a merged record must
//! carry, and what JSON type common field names are expected to hold.
//! This is intentionally far short of a full gateway schema; the planes
//! validate writes themselves, and the merge validator only needs to catch
//! records a merge obviously broke.

use crate::EntityType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The JSON type a field is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Integer,
    Number,
    Bool,
    List,
    Object,
}

impl FieldType {
    /// Returns the canonical snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Bool => "boolean",
            FieldType::List => "list",
            FieldType::Object => "object",
        }
    }

    /// Checks whether a JSON value has this type.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::Text => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Bool => value.is_boolean(),
            FieldType::List => value.is_array(),
            FieldType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields a record of the given type must carry to be writable to either
/// plane.
#[must_use]
pub const fn required_fields(entity_type: EntityType) -> &'static [&'static str] {
    match entity_type {
        EntityType::Service => &["name", "host"],
        EntityType::Route => &["name"],
        EntityType::Plugin => &["name"],
        EntityType::Consumer => &["username"],
        EntityType::Upstream => &["name"],
        EntityType::Certificate => &["cert", "key"],
    }
}

/// Expected JSON type for well-known top-level field names, across all
/// entity types. Unknown fields are not type-checked.
#[must_use]
pub fn expected_type(field: &str) -> Option<FieldType> {
    Some(match field {
        "name" | "host" | "protocol" | "path" | "username" | "custom_id" | "cert" | "key"
        | "algorithm" | "hash_on" | "hash_fallback" => FieldType::Text,
        "port" | "retries" | "connect_timeout" | "write_timeout" | "read_timeout"
        | "regex_priority" | "slots" | "weight" => FieldType::Integer,
        "tags" | "paths" | "methods" | "hosts" | "protocols" | "snis" => FieldType::List,
        "enabled" | "strip_path" | "preserve_host" => FieldType::Bool,
        "config" | "healthchecks" | "client_certificate" => FieldType::Object,
        _ => return None,
    })
}
