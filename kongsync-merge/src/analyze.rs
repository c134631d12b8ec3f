//! Three-way merge analysis and auto-merge computation.

use crate::error::{MergeError, MergeResult};
use kongsync_model::{flatten, remove_path, set_path, values_equal};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Classification of every leaf field across source, target, and baseline.
///
/// The three lists are pairwise disjoint; their union is the set of leaf
/// paths that differ from baseline in at least one of source/target.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeAnalysis {
    /// True iff no field changed on both sides.
    pub can_auto_merge: bool,
    /// Paths changed only in the source state, in lexical order.
    pub source_only: Vec<String>,
    /// Paths changed only in the target state, in lexical order.
    pub target_only: Vec<String>,
    /// Paths changed on both sides, in lexical order.
    pub conflicting: Vec<String>,
}

/// Classifies every leaf field of the three states.
///
/// The baseline defaults to the target state when not supplied, which
/// degenerates to "everything the source changed is source-only" — the
/// right reading when no common ancestor is known.
#[must_use]
pub fn analyze_merge_potential(
    source: &Value,
    target: &Value,
    baseline: Option<&Value>,
) -> MergeAnalysis {
    let baseline = baseline.unwrap_or(target);
    let flat_source = flatten(source);
    let flat_target = flatten(target);
    let flat_baseline = flatten(baseline);

    let paths: BTreeSet<&String> = flat_source
        .keys()
        .chain(flat_target.keys())
        .chain(flat_baseline.keys())
        .collect();

    let mut analysis = MergeAnalysis::default();
    for path in paths {
        let base = flat_baseline.get(path.as_str());
        let source_changed = !values_equal(flat_source.get(path.as_str()), base);
        let target_changed = !values_equal(flat_target.get(path.as_str()), base);
        match (source_changed, target_changed) {
            (true, true) => analysis.conflicting.push(path.clone()),
            (true, false) => analysis.source_only.push(path.clone()),
            (false, true) => analysis.target_only.push(path.clone()),
            (false, false) => {}
        }
    }

    analysis.can_auto_merge = analysis.conflicting.is_empty();
    analysis
}

/// Produces the merged record for a non-conflicting analysis.
///
/// Starts from a deep copy of the target state and overwrites each
/// source-only path with the source's value; a source-only path absent
/// from the source clears that field. Target-only and unchanged paths are
/// left untouched.
///
/// # Errors
///
/// Returns [`MergeError::Unmergeable`] when the analysis has conflicts.
pub fn compute_auto_merge(
    source: &Value,
    target: &Value,
    analysis: &MergeAnalysis,
) -> MergeResult<Value> {
    if !analysis.can_auto_merge {
        return Err(MergeError::Unmergeable {
            conflicts: analysis.conflicting.clone(),
        });
    }

    let flat_source = flatten(source);
    let mut merged = target.clone();
    for path in &analysis.source_only {
        match flat_source.get(path.as_str()) {
            Some(value) => set_path(&mut merged, path, value.clone()),
            None => remove_path(&mut merged, path),
        }
    }
    Ok(merged)
}
