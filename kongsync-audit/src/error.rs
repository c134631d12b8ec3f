//! Error types for the audit log.

use thiserror::Error;

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;

/// Errors that can occur in audit operations.
///
/// Unparsable individual records are not an error — readers skip them so
/// the log stays queryable even if a writer crashed mid-line.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The store file could not be read or written.
    #[error("audit store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An entry could not be serialized for appending.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The platform state directory could not be determined.
    #[error("state directory unavailable: {0}")]
    StateDir(String),

    /// A `since` string matched none of the accepted formats.
    #[error(
        "invalid since value {0:?}: expected a relative duration like \"7d\", \"24h\" or \"30m\", \
         or an absolute date/time like \"2026-01-31\", \"2026-01-31 12:00:00\" or RFC 3339"
    )]
    InvalidSince(String),

    /// An operation name was neither `push` nor `pull`.
    #[error("invalid sync operation: {0} (expected \"push\" or \"pull\")")]
    InvalidOperation(String),
}
