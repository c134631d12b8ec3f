//! Error types for merge computations.

use thiserror::Error;

/// Result type for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors that can occur in merge computations.
///
/// Data-shape problems (absent inputs, mismatched fields) never error —
/// they degrade to "no drift" / "no conflict". Errors are reserved for
/// calls that violate a precondition, like auto-merging a conflicting
/// analysis.
#[derive(Debug, Error)]
pub enum MergeError {
    /// `compute_auto_merge` was called on an analysis with conflicts.
    #[error("cannot auto-merge: conflicting fields: {}", .conflicts.join(", "))]
    Unmergeable { conflicts: Vec<String> },
}
