//! Rollback preview and execution.

use crate::action::{RollbackAction, RollbackKind, RollbackPreview, RollbackResult};
use crate::error::RollbackError;
use kongsync_audit::{AuditStore, SyncAction, SyncAuditEntry, SyncStatus};
use kongsync_model::{entity_id, EntityType, ManagerRegistry, SyncId};
use tracing::{info, warn};

/// Derives and executes the inverse of a recorded sync run.
pub struct RollbackEngine {
    store: AuditStore,
    registry: ManagerRegistry,
}

impl RollbackEngine {
    /// Creates an engine over the given audit store and manager registry.
    #[must_use]
    pub fn new(store: AuditStore, registry: ManagerRegistry) -> Self {
        Self { store, registry }
    }

    /// Builds the list of reversing actions for one run without touching
    /// either plane.
    ///
    /// Blocked (no actions, one explanatory warning) when the run has no
    /// records or was a dry run. Successful creates and updates produce
    /// one action each; an entry lacking the state needed to reverse it
    /// produces a warning instead and is skipped. Skip entries never need
    /// reversal.
    ///
    /// # Errors
    ///
    /// Returns an error only when the audit store cannot be read.
    pub fn preview_rollback(
        &self,
        sync_id: &SyncId,
        entity_types: Option<&[EntityType]>,
    ) -> Result<RollbackPreview, RollbackError> {
        let entries = self.store.get_sync_details(sync_id)?;

        if entries.is_empty() {
            return Ok(RollbackPreview::blocked(
                *sync_id,
                format!("no audit records found for sync {sync_id}"),
            ));
        }
        if entries.first().is_some_and(|entry| entry.dry_run) {
            return Ok(RollbackPreview::blocked(
                *sync_id,
                format!("sync {sync_id} was a dry run; no changes were made"),
            ));
        }

        let mut actions = Vec::new();
        let mut warnings = Vec::new();
        for entry in &entries {
            if entry.status != SyncStatus::Success || entry.action == SyncAction::Skip {
                continue;
            }
            if entity_types.is_some_and(|filter| !filter.contains(&entry.entity_type)) {
                continue;
            }
            match entry.action {
                SyncAction::Create => match create_inverse(entry) {
                    Some(action) => actions.push(action),
                    None => warnings.push(format!(
                        "create of {} {:?} has no recorded identifier; cannot roll back",
                        entry.entity_type, entry.entity_name
                    )),
                },
                SyncAction::Update => match update_inverse(entry) {
                    Ok(action) => actions.push(action),
                    Err(reason) => warnings.push(format!(
                        "update of {} {:?} {reason}; cannot roll back",
                        entry.entity_type, entry.entity_name
                    )),
                },
                SyncAction::Skip => {}
            }
        }

        let can_rollback = !actions.is_empty();
        Ok(RollbackPreview {
            sync_id: *sync_id,
            can_rollback,
            actions,
            warnings,
        })
    }

    /// Executes the rollback of one run.
    ///
    /// A blocked preview returns a failed result carrying the preview's
    /// warnings as errors. Actions execute strictly sequentially in
    /// reverse chronological order against the plane each original write
    /// went to. Without `force`, the first failure halts processing and
    /// the remaining actions count as skipped.
    ///
    /// # Errors
    ///
    /// Returns an error only when the audit store cannot be read;
    /// execution failures are reported in the result counts.
    pub fn rollback(
        &self,
        sync_id: &SyncId,
        entity_types: Option<&[EntityType]>,
        force: bool,
    ) -> Result<RollbackResult, RollbackError> {
        let preview = self.preview_rollback(sync_id, entity_types)?;
        if !preview.can_rollback {
            warn!(sync_id = %sync_id, reasons = ?preview.warnings, "rollback blocked");
            return Ok(RollbackResult::blocked(*sync_id, preview.warnings));
        }

        let total = preview.actions.len();
        let mut result = RollbackResult {
            sync_id: *sync_id,
            success: false,
            rolled_back: 0,
            failed: 0,
            skipped: 0,
            errors: Vec::new(),
        };

        // Last original action is undone first, so dependent creates are
        // removed before the entities they depended on.
        for (undone, action) in preview.actions.iter().rev().enumerate() {
            match self.execute(action) {
                Ok(()) => {
                    info!(
                        entity_type = %action.entity_type,
                        entity = %action.entity_name,
                        kind = %action.rollback_action,
                        target = %action.target,
                        "rolled back"
                    );
                    result.rolled_back += 1;
                }
                Err(e) => {
                    warn!(
                        entity_type = %action.entity_type,
                        entity = %action.entity_name,
                        kind = %action.rollback_action,
                        error = %e,
                        "rollback action failed"
                    );
                    result.failed += 1;
                    result.errors.push(format!(
                        "{} {} {:?}: {e}",
                        action.rollback_action, action.entity_type, action.entity_name
                    ));
                    if !force {
                        result.skipped = total - undone - 1;
                        break;
                    }
                }
            }
        }

        result.success = result.failed == 0;
        Ok(result)
    }

    fn execute(&self, action: &RollbackAction) -> Result<(), RollbackError> {
        let manager = self
            .registry
            .get(action.target, action.entity_type)
            .ok_or(RollbackError::NoManager {
                plane: action.target,
                entity_type: action.entity_type,
            })?;

        match action.rollback_action {
            RollbackKind::Delete => manager.delete(&action.entity_id)?,
            RollbackKind::Restore => {
                let state = action
                    .state
                    .as_ref()
                    .ok_or_else(|| RollbackError::MissingState(action.entity_name.clone()))?;
                manager.update(&action.entity_id, state)?;
            }
        }
        Ok(())
    }
}

/// A successful create reverses to a delete of the created entity; the
/// identifier must come from the recorded `after_state`.
fn create_inverse(entry: &SyncAuditEntry) -> Option<RollbackAction> {
    let id = entry
        .after_state
        .as_ref()
        .and_then(|state| entity_id(state))?;
    Some(RollbackAction {
        entity_type: entry.entity_type,
        entity_id: id.to_string(),
        entity_name: entry.entity_name.clone(),
        original_action: SyncAction::Create,
        rollback_action: RollbackKind::Delete,
        state: None,
        target: entry.target,
    })
}

/// A successful update reverses to a restore of the recorded prior state;
/// the identifier comes from `before_state`, falling back to
/// `after_state`.
fn update_inverse(entry: &SyncAuditEntry) -> Result<RollbackAction, &'static str> {
    let before = entry
        .before_state
        .as_ref()
        .ok_or("has no recorded prior state")?;
    let id = entity_id(before)
        .or_else(|| entry.after_state.as_ref().and_then(|state| entity_id(state)))
        .ok_or("has no identifier in its recorded states")?;
    Ok(RollbackAction {
        entity_type: entry.entity_type,
        entity_id: id.to_string(),
        entity_name: entry.entity_name.clone(),
        original_action: SyncAction::Update,
        rollback_action: RollbackKind::Restore,
        state: Some(before.clone()),
        target: entry.target,
    })
}
