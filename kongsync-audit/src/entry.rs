//! Audit record types.

use crate::error::AuditError;
use chrono::{DateTime, Utc};
use kongsync_model::{EntityType, Plane, SyncId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Which plane is the source of truth for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    /// The gateway is the source of truth; writes go to the control plane.
    Push,
    /// The control plane is the source of truth; writes go to the gateway.
    Pull,
}

impl SyncOperation {
    /// Returns the canonical snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SyncOperation::Push => "push",
            SyncOperation::Pull => "pull",
        }
    }

    /// The plane entities are read from.
    #[must_use]
    pub const fn source_plane(&self) -> Plane {
        match self {
            SyncOperation::Push => Plane::Gateway,
            SyncOperation::Pull => Plane::ControlPlane,
        }
    }

    /// The plane writes go to.
    #[must_use]
    pub const fn target_plane(&self) -> Plane {
        self.source_plane().opposite()
    }
}

impl fmt::Display for SyncOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncOperation {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(SyncOperation::Push),
            "pull" => Ok(SyncOperation::Pull),
            other => Err(AuditError::InvalidOperation(other.to_string())),
        }
    }
}

/// What was done (or would have been done) for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Create,
    Update,
    Skip,
}

/// How the operation turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Success,
    Failed,
    /// Dry run: a create would have been performed.
    WouldCreate,
    /// Dry run: an update would have been performed.
    WouldUpdate,
}

impl SyncStatus {
    /// True only for live, successful operations.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, SyncStatus::Success)
    }
}

/// One entity operation within a sync run. Append-only; never mutated.
///
/// Reversibility invariants: a successful create must carry an
/// `after_state` containing the target-plane identifier, and a successful
/// update must carry a `before_state`, or the operation cannot be rolled
/// back (the rollback preview reports such entries as warnings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncAuditEntry {
    pub sync_id: SyncId,
    pub timestamp: DateTime<Utc>,
    pub operation: SyncOperation,
    pub dry_run: bool,
    pub entity_type: EntityType,
    /// Identifier in the source plane, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Human-readable matching key; always present.
    pub entity_name: String,
    pub action: SyncAction,
    pub source: Plane,
    pub target: Plane,
    pub status: SyncStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drift_fields: Option<Vec<String>>,
    /// Full snapshot prior to a successful update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_state: Option<Value>,
    /// Full snapshot after a successful create or update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_state: Option<Value>,
}

impl SyncAuditEntry {
    /// Attaches the source-plane identifier.
    #[must_use]
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Attaches an error message.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Attaches the drifted fields that prompted the operation.
    #[must_use]
    pub fn with_drift_fields(mut self, fields: Vec<String>) -> Self {
        self.drift_fields = Some(fields);
        self
    }

    /// Attaches the entity snapshot prior to an update.
    #[must_use]
    pub fn with_before_state(mut self, state: Value) -> Self {
        self.before_state = Some(state);
        self
    }

    /// Attaches the entity snapshot after a create or update.
    #[must_use]
    pub fn with_after_state(mut self, state: Value) -> Self {
        self.after_state = Some(state);
        self
    }
}

/// Context for one sync run, returned by [`AuditStore::start_sync`].
///
/// Carries the fresh run identifier plus the operation and dry-run flag,
/// and seeds every entry of the run so all its records share them.
/// Creating a run writes nothing.
///
/// [`AuditStore::start_sync`]: crate::AuditStore::start_sync
#[derive(Debug, Clone, Copy)]
pub struct SyncRun {
    sync_id: SyncId,
    operation: SyncOperation,
    dry_run: bool,
}

impl SyncRun {
    /// Starts a new run with a fresh identifier.
    #[must_use]
    pub fn new(operation: SyncOperation, dry_run: bool) -> Self {
        Self {
            sync_id: SyncId::new(),
            operation,
            dry_run,
        }
    }

    /// Returns the run identifier.
    #[must_use]
    pub const fn sync_id(&self) -> SyncId {
        self.sync_id
    }

    /// Returns the run's operation.
    #[must_use]
    pub const fn operation(&self) -> SyncOperation {
        self.operation
    }

    /// Returns whether this is a dry run.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Builds an audit entry seeded with this run's context; the source
    /// and target planes follow from the operation.
    #[must_use]
    pub fn entry(
        &self,
        entity_type: EntityType,
        entity_name: impl Into<String>,
        action: SyncAction,
        status: SyncStatus,
    ) -> SyncAuditEntry {
        SyncAuditEntry {
            sync_id: self.sync_id,
            timestamp: Utc::now(),
            operation: self.operation,
            dry_run: self.dry_run,
            entity_type,
            entity_id: None,
            entity_name: entity_name.into(),
            action,
            source: self.operation.source_plane(),
            target: self.operation.target_plane(),
            status,
            error: None,
            drift_fields: None,
            before_state: None,
            after_state: None,
        }
    }
}

/// Aggregated view of one sync run, derived by grouping audit entries.
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub sync_id: SyncId,
    pub operation: SyncOperation,
    pub dry_run: bool,
    /// Timestamp of the run's first record.
    pub started_at: DateTime<Utc>,
    /// Entity types involved, deduplicated, in lexical order.
    pub entity_types: Vec<String>,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl SyncSummary {
    /// Derives a summary from one run's entries, in record order.
    /// Returns `None` for an empty slice.
    ///
    /// Dry-run statuses count toward `created`/`updated` — they describe
    /// the same intent; `errors` counts failed records only.
    #[must_use]
    pub fn from_entries(entries: &[SyncAuditEntry]) -> Option<Self> {
        let first = entries.first()?;
        let mut summary = Self {
            sync_id: first.sync_id,
            operation: first.operation,
            dry_run: first.dry_run,
            started_at: first.timestamp,
            entity_types: Vec::new(),
            created: 0,
            updated: 0,
            skipped: 0,
            errors: 0,
        };

        let mut types = BTreeSet::new();
        for entry in entries {
            types.insert(entry.entity_type.as_str().to_string());
            match (entry.action, entry.status) {
                (_, SyncStatus::Failed) => summary.errors += 1,
                (SyncAction::Create, SyncStatus::Success | SyncStatus::WouldCreate) => {
                    summary.created += 1;
                }
                (SyncAction::Update, SyncStatus::Success | SyncStatus::WouldUpdate) => {
                    summary.updated += 1;
                }
                (SyncAction::Skip, _) => summary.skipped += 1,
                _ => {}
            }
        }
        summary.entity_types = types.into_iter().collect();
        Some(summary)
    }
}
