//! Pure reconciliation computations for kongsync.
//!
//! This crate holds every computation that looks at entity records without
//! touching a store or a network:
//!
//! - [`detect_drift`] — field-by-field comparison of the two planes' copies
//!   of one entity
//! - [`merge_entities`] — unifies two per-plane entity collections into one
//!   [`UnifiedEntityList`], matching by a caller-supplied key field
//! - [`analyze_merge_potential`] — three-way classification of every leaf
//!   field as changed-only-in-source, changed-only-in-target, or conflicting
//! - [`compute_auto_merge`] — produces the merged record for a
//!   non-conflicting analysis
//! - [`validate_merged_state`] — minimal schema check over a merged record
//!
//! Everything here is synchronous and side-effect free: the functions only
//! read their inputs, so independent callers may invoke them concurrently
//! without coordination.
//!
//! Drift detection is symmetric in its field set: `detect_drift(a, b)` and
//! `detect_drift(b, a)` report the same drifted fields. True conflicts
//! (both sides changed the same field) are detected and reported, never
//! resolved — deciding which value wins is the operator's call.

mod analyze;
mod drift;
mod error;
mod unify;
mod validate;

pub use analyze::{analyze_merge_potential, compute_auto_merge, MergeAnalysis};
pub use drift::{detect_drift, detect_drift_with, DriftOptions, DriftReport};
pub use error::{MergeError, MergeResult};
pub use unify::{merge_entities, merge_entities_with, EntitySource, UnifiedEntity, UnifiedEntityList};
pub use validate::{validate_merged_state, MergeValidationResult};
