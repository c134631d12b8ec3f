//! Rollback engine.
//!
//! Reverses a recorded sync run using only the audit log contents: every
//! successful create becomes a delete of the created entity, every
//! successful update becomes a restore of the recorded prior state. The
//! live planes are consulted only to execute the reversing calls, through
//! the [`ManagerRegistry`] seam.
//!
//! A run moves through `preview → (blocked | executable)`: it is blocked
//! when no records exist for the identifier or when the run was a dry run
//! (dry runs never modify live state). Executable actions are applied
//! strictly sequentially in reverse chronological order — later creates
//! may reference earlier entities, so they must be removed first.
//!
//! [`ManagerRegistry`]: kongsync_model::ManagerRegistry

mod action;
mod engine;
mod error;

pub use action::{RollbackAction, RollbackKind, RollbackPreview, RollbackResult};
pub use engine::RollbackEngine;
pub use error::RollbackError;
