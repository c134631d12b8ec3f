//! Field-level drift detection between the two planes' copies of an entity.

use kongsync_model::{flatten, values_equal};
use serde_json::Value;
use std::collections::BTreeSet;

/// Metadata fields excluded from comparison.
///
/// Identifiers and write timestamps differ between planes by construction
/// and never count as drift. Plane-specific metadata (revision counters,
/// etc.) can be excluded per call via [`DriftOptions::exclude`].
pub const DEFAULT_EXCLUDED_FIELDS: [&str; 3] = ["id", "created_at", "updated_at"];

/// Tuning knobs for drift detection.
#[derive(Debug, Clone)]
pub struct DriftOptions {
    /// Top-level field names excluded from comparison. Exclusion matches
    /// the first path segment, so `id` excludes the entity's identifier
    /// but not a nested `config.id`.
    pub exclude_fields: Vec<String>,
}

impl Default for DriftOptions {
    fn default() -> Self {
        Self {
            exclude_fields: DEFAULT_EXCLUDED_FIELDS
                .iter()
                .map(|f| (*f).to_string())
                .collect(),
        }
    }
}

impl DriftOptions {
    /// Creates options with the default metadata exclusions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field to the exclusion list.
    #[must_use]
    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.exclude_fields.push(field.into());
        self
    }
}

/// The outcome of comparing two copies of one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriftReport {
    /// True iff at least one compared leaf differs.
    pub has_drift: bool,
    /// The leaf paths that differ, in lexical order, deduplicated.
    pub fields: Vec<String>,
}

impl DriftReport {
    fn clean() -> Self {
        Self::default()
    }
}

/// Compares two copies of one entity field-by-field.
///
/// If either input is absent there is nothing to compare and the report is
/// clean. When `compare_fields` is supplied, only leaf paths under those
/// fields are compared; the metadata exclusions still apply.
#[must_use]
pub fn detect_drift(
    a: Option<&Value>,
    b: Option<&Value>,
    compare_fields: Option<&[String]>,
) -> DriftReport {
    detect_drift_with(a, b, compare_fields, &DriftOptions::default())
}

/// [`detect_drift`] with explicit options.
#[must_use]
pub fn detect_drift_with(
    a: Option<&Value>,
    b: Option<&Value>,
    compare_fields: Option<&[String]>,
    options: &DriftOptions,
) -> DriftReport {
    let (Some(a), Some(b)) = (a, b) else {
        return DriftReport::clean();
    };

    let flat_a = flatten(a);
    let flat_b = flatten(b);
    let paths: BTreeSet<&String> = flat_a.keys().chain(flat_b.keys()).collect();

    let mut fields = Vec::new();
    for path in paths {
        if is_excluded(path, &options.exclude_fields) {
            continue;
        }
        if let Some(filter) = compare_fields {
            if !selected(path, filter) {
                continue;
            }
        }
        if !values_equal(flat_a.get(path.as_str()), flat_b.get(path.as_str())) {
            fields.push(path.clone());
        }
    }

    DriftReport {
        has_drift: !fields.is_empty(),
        fields,
    }
}

fn is_excluded(path: &str, excluded: &[String]) -> bool {
    let root = path.split('.').next().unwrap_or(path);
    excluded.iter().any(|field| field == root)
}

fn selected(path: &str, fields: &[String]) -> bool {
    fields.iter().any(|field| {
        path == field
            || path
                .strip_prefix(field.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    })
}
