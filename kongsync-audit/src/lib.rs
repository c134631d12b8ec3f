//! Append-only sync audit log.
//!
//! Every entity operation performed (or that would be performed, in a dry
//! run) during a synchronization run is appended here as one record tagged
//! with the run's [`SyncId`]. The log is sufficient to reverse any
//! successful change: creates record the stored copy (`after_state`),
//! updates record the prior copy (`before_state`).
//!
//! # Storage
//!
//! One self-describing JSON record per line, UTF-8, newline-terminated,
//! append-only. Appends hold an advisory exclusive lock for the duration
//! of the write so concurrent writers never interleave partial records.
//! Reads take no lock; a line that fails to parse is skipped, so a reader
//! racing a writer degrades to missing the in-flight record rather than
//! crashing.
//!
//! [`SyncId`]: kongsync_model::SyncId

mod entry;
mod error;
mod since;
mod store;

pub use entry::{
    SyncAction, SyncAuditEntry, SyncOperation, SyncRun, SyncStatus, SyncSummary,
};
pub use error::{AuditError, AuditResult};
pub use since::parse_since;
pub use store::{AuditStore, AUDIT_FILE_NAME};
