//! Error types for the rollback engine.

use kongsync_audit::AuditError;
use kongsync_model::{EntityType, ManagerError, Plane};
use thiserror::Error;

/// Errors that can occur while previewing or executing a rollback.
///
/// Per-action execution failures are not raised; they are collected into
/// the [`RollbackResult`] counts so a caller can judge a partial outcome.
///
/// [`RollbackResult`]: crate::RollbackResult
#[derive(Debug, Error)]
pub enum RollbackError {
    /// The audit store could not be read.
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// No manager is registered for the action's target plane and entity
    /// type.
    #[error("no {entity_type} manager registered for the {plane} plane")]
    NoManager {
        plane: Plane,
        entity_type: EntityType,
    },

    /// A restore action carries no recorded state.
    #[error("restore action for {0} is missing its recorded state")]
    MissingState(String),

    /// The target plane rejected the reversing call.
    #[error(transparent)]
    Manager(#[from] ManagerError),
}
