//! The append-only audit store.

use crate::entry::{SyncAuditEntry, SyncOperation, SyncRun, SyncSummary};
use crate::error::AuditResult;
use chrono::{DateTime, Utc};
use kongsync_model::{EntityType, SyncId};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the audit store inside the per-tool state directory.
pub const AUDIT_FILE_NAME: &str = "kong_sync_audit.jsonl";

/// Append-only store of [`SyncAuditEntry`] records, one JSON object per
/// line.
///
/// The struct only holds the path; every operation opens the file fresh,
/// so cloning a store or sharing it across threads needs no coordination
/// beyond the per-append advisory lock.
#[derive(Debug, Clone)]
pub struct AuditStore {
    path: PathBuf,
}

impl AuditStore {
    /// Creates a store backed by the given file. The file and its parent
    /// directories are created on the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The default store location under the user's per-tool state
    /// directory.
    pub fn default_path() -> AuditResult<PathBuf> {
        let base = dirs::data_local_dir().ok_or_else(|| {
            crate::AuditError::StateDir("could not determine the local data directory".to_string())
        })?;
        Ok(base.join("kongsync").join(AUDIT_FILE_NAME))
    }

    /// Creates a store at the default location.
    pub fn open_default() -> AuditResult<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    /// Returns the store's path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Starts a sync run: generates a fresh identifier and returns the
    /// run context. Writes nothing by itself.
    #[must_use]
    pub fn start_sync(&self, operation: SyncOperation, dry_run: bool) -> SyncRun {
        let run = SyncRun::new(operation, dry_run);
        debug!(sync_id = %run.sync_id(), %operation, dry_run, "started sync run");
        run
    }

    /// Appends one record.
    ///
    /// The advisory exclusive lock is held only for the write and flush,
    /// so concurrent writers (parallel entity workers within one run, or
    /// separate runs) serialize per record and never interleave bytes.
    pub fn record(&self, entry: &SyncAuditEntry) -> AuditResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let line = serde_json::to_string(entry)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        fs2::FileExt::lock_exclusive(&file)?;
        let write_result = append_line(&file, &line);
        let unlock_result = fs2::FileExt::unlock(&file);
        write_result?;
        unlock_result?;

        debug!(
            sync_id = %entry.sync_id,
            entity_type = %entry.entity_type,
            entity = %entry.entity_name,
            status = ?entry.status,
            "recorded audit entry"
        );
        Ok(())
    }

    /// Summaries of the most recent runs, newest first.
    ///
    /// `since` and `operation` filter at the record level before grouping,
    /// so a summary only counts matching records.
    pub fn list_syncs(
        &self,
        limit: usize,
        since: Option<DateTime<Utc>>,
        operation: Option<SyncOperation>,
    ) -> AuditResult<Vec<SyncSummary>> {
        let mut groups: Vec<(SyncId, Vec<SyncAuditEntry>)> = Vec::new();
        let mut index: HashMap<SyncId, usize> = HashMap::new();

        for entry in self.read_entries()? {
            if since.is_some_and(|since| entry.timestamp < since) {
                continue;
            }
            if operation.is_some_and(|op| entry.operation != op) {
                continue;
            }
            match index.get(&entry.sync_id) {
                Some(&at) => groups[at].1.push(entry),
                None => {
                    index.insert(entry.sync_id, groups.len());
                    groups.push((entry.sync_id, vec![entry]));
                }
            }
        }

        let mut summaries: Vec<SyncSummary> = groups
            .iter()
            .filter_map(|(_, entries)| SyncSummary::from_entries(entries))
            .collect();
        summaries.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        summaries.truncate(limit);
        Ok(summaries)
    }

    /// Every record of one run, in append order.
    pub fn get_sync_details(&self, sync_id: &SyncId) -> AuditResult<Vec<SyncAuditEntry>> {
        Ok(self
            .read_entries()?
            .into_iter()
            .filter(|entry| entry.sync_id == *sync_id)
            .collect())
    }

    /// Records for one entity across all runs, most recent first.
    pub fn get_entity_history(
        &self,
        entity_type: EntityType,
        entity_name: &str,
        limit: usize,
    ) -> AuditResult<Vec<SyncAuditEntry>> {
        let mut entries: Vec<SyncAuditEntry> = self
            .read_entries()?
            .into_iter()
            .filter(|entry| entry.entity_type == entity_type && entry.entity_name == entity_name)
            .collect();
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    /// Streams every parseable record in append order. A missing file is
    /// an empty log. Reads take no lock.
    fn read_entries(&self) -> AuditResult<Vec<SyncAuditEntry>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            if let Some(entry) = parse_entry_line(&line?) {
                entries.push(entry);
            }
        }
        Ok(entries)
    }
}

fn append_line(mut file: &File, line: &str) -> std::io::Result<()> {
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;
    file.flush()
}

/// Parses one audit line. Blank and malformed lines yield `None`, so a
/// reader racing a writer misses the in-flight record instead of failing.
fn parse_entry_line(line: &str) -> Option<SyncAuditEntry> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str(trimmed) {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!(error = %e, "skipping malformed audit line");
            None
        }
    }
}
