//! Rollback action types.
//!
//! Derived from audit entries at preview time; never persisted.

use kongsync_audit::SyncAction;
use kongsync_model::{EntityType, Plane, SyncId};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The inverse operation derived from one successful audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackKind {
    /// Delete what a create produced.
    Delete,
    /// Restore the prior state of what an update replaced.
    Restore,
}

impl RollbackKind {
    /// Returns the canonical snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RollbackKind::Delete => "delete",
            RollbackKind::Restore => "restore",
        }
    }
}

impl fmt::Display for RollbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reversing operation, ready to execute against the plane the
/// original write went to.
#[derive(Debug, Clone, Serialize)]
pub struct RollbackAction {
    pub entity_type: EntityType,
    /// Identifier in the target plane.
    pub entity_id: String,
    pub entity_name: String,
    /// The recorded action being reversed.
    pub original_action: SyncAction,
    pub rollback_action: RollbackKind,
    /// The state to restore; present for restore actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    /// The plane the original write went to.
    pub target: Plane,
}

/// What a rollback of one run would do.
#[derive(Debug, Clone, Serialize)]
pub struct RollbackPreview {
    pub sync_id: SyncId,
    /// True iff at least one action can be executed.
    pub can_rollback: bool,
    /// Actions in original record order; execution reverses them.
    pub actions: Vec<RollbackAction>,
    /// Blocked runs and structurally non-reversible entries, explained.
    pub warnings: Vec<String>,
}

impl RollbackPreview {
    pub(crate) fn blocked(sync_id: SyncId, reason: String) -> Self {
        Self {
            sync_id,
            can_rollback: false,
            actions: Vec::new(),
            warnings: vec![reason],
        }
    }
}

/// The outcome of executing a rollback.
#[derive(Debug, Clone, Serialize)]
pub struct RollbackResult {
    pub sync_id: SyncId,
    /// True iff no action failed.
    pub success: bool,
    pub rolled_back: usize,
    pub failed: usize,
    /// Actions not attempted after a halting failure.
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl RollbackResult {
    pub(crate) fn blocked(sync_id: SyncId, errors: Vec<String>) -> Self {
        Self {
            sync_id,
            success: false,
            rolled_back: 0,
            failed: 0,
            skipped: 0,
            errors,
        }
    }
}
