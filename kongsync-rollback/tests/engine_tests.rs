use kongsync_audit::{AuditStore, SyncAction, SyncOperation, SyncRun, SyncStatus};
use kongsync_model::{
    EntityManager, EntityType, ManagerError, ManagerRegistry, ManagerResult, Plane, SyncId,
};
use kongsync_rollback::{RollbackEngine, RollbackKind};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Records every call; optionally rejects deletes of one identifier.
#[derive(Default)]
struct RecordingManager {
    calls: Mutex<Vec<String>>,
    fail_delete_of: Option<String>,
}

impl RecordingManager {
    fn failing_delete_of(id: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_delete_of: Some(id.to_string()),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl EntityManager for RecordingManager {
    fn create(&self, entity: &Value) -> ManagerResult<Value> {
        self.calls.lock().unwrap().push("create".to_string());
        Ok(entity.clone())
    }

    fn update(&self, id: &str, entity: &Value) -> ManagerResult<Value> {
        let host = entity.get("host").and_then(Value::as_str).unwrap_or("-");
        self.calls.lock().unwrap().push(format!("update {id} host={host}"));
        Ok(entity.clone())
    }

    fn delete(&self, id: &str) -> ManagerResult<()> {
        if self.fail_delete_of.as_deref() == Some(id) {
            return Err(ManagerError::Rejected(format!("{id} is still referenced")));
        }
        self.calls.lock().unwrap().push(format!("delete {id}"));
        Ok(())
    }
}

fn engine_with(manager: Arc<RecordingManager>) -> (TempDir, AuditStore, RollbackEngine) {
    let dir = TempDir::new().unwrap();
    let store = AuditStore::new(dir.path().join("audit.jsonl"));
    let mut registry = ManagerRegistry::new();
    registry.register(Plane::ControlPlane, EntityType::Service, manager);
    let engine = RollbackEngine::new(store.clone(), registry);
    (dir, store, engine)
}

fn record_create(store: &AuditStore, run: &SyncRun, name: &str, id: &str) {
    store
        .record(
            &run.entry(EntityType::Service, name, SyncAction::Create, SyncStatus::Success)
                .with_after_state(json!({"id": id, "name": name})),
        )
        .unwrap();
}

// ── preview: blocked runs ────────────────────────────────────────

#[test]
fn preview_of_unknown_run_is_blocked() {
    let (_dir, _store, engine) = engine_with(Arc::new(RecordingManager::default()));
    let preview = engine.preview_rollback(&SyncId::new(), None).unwrap();
    assert!(!preview.can_rollback);
    assert!(preview.actions.is_empty());
    assert_eq!(preview.warnings.len(), 1);
    assert!(preview.warnings[0].contains("no audit records"));
}

#[test]
fn preview_of_dry_run_is_blocked() {
    let (_dir, store, engine) = engine_with(Arc::new(RecordingManager::default()));
    let run = store.start_sync(SyncOperation::Push, true);
    store
        .record(
            &run.entry(EntityType::Service, "api-svc", SyncAction::Create, SyncStatus::WouldCreate),
        )
        .unwrap();

    let preview = engine.preview_rollback(&run.sync_id(), None).unwrap();
    assert!(!preview.can_rollback);
    assert!(preview.actions.is_empty());
    assert!(preview.warnings[0].contains("dry run"));
}

// ── preview: action derivation ───────────────────────────────────

#[test]
fn create_then_update_previews_delete_then_restore() {
    let (_dir, store, engine) = engine_with(Arc::new(RecordingManager::default()));
    let run = store.start_sync(SyncOperation::Push, false);

    record_create(&store, &run, "api-svc", "x");
    store
        .record(
            &run.entry(EntityType::Service, "api-svc", SyncAction::Update, SyncStatus::Success)
                .with_before_state(json!({"id": "x", "host": "old"}))
                .with_after_state(json!({"id": "x", "host": "new"})),
        )
        .unwrap();

    let preview = engine.preview_rollback(&run.sync_id(), None).unwrap();
    assert!(preview.can_rollback);
    assert!(preview.warnings.is_empty());
    assert_eq!(preview.actions.len(), 2);

    assert_eq!(preview.actions[0].rollback_action, RollbackKind::Delete);
    assert_eq!(preview.actions[0].entity_id, "x");
    assert_eq!(preview.actions[0].original_action, SyncAction::Create);
    assert!(preview.actions[0].state.is_none());

    assert_eq!(preview.actions[1].rollback_action, RollbackKind::Restore);
    assert_eq!(preview.actions[1].entity_id, "x");
    assert_eq!(preview.actions[1].state, Some(json!({"id": "x", "host": "old"})));
    assert_eq!(preview.actions[1].target, Plane::ControlPlane);
}

#[test]
fn skips_and_failures_produce_no_actions() {
    let (_dir, store, engine) = engine_with(Arc::new(RecordingManager::default()));
    let run = store.start_sync(SyncOperation::Push, false);
    store
        .record(&run.entry(EntityType::Service, "a", SyncAction::Skip, SyncStatus::Success))
        .unwrap();
    store
        .record(
            &run.entry(EntityType::Service, "b", SyncAction::Create, SyncStatus::Failed)
                .with_error("boom"),
        )
        .unwrap();

    let preview = engine.preview_rollback(&run.sync_id(), None).unwrap();
    assert!(!preview.can_rollback);
    assert!(preview.actions.is_empty());
    assert!(preview.warnings.is_empty());
}

#[test]
fn create_without_recorded_id_warns_and_is_skipped() {
    let (_dir, store, engine) = engine_with(Arc::new(RecordingManager::default()));
    let run = store.start_sync(SyncOperation::Push, false);
    store
        .record(
            &run.entry(EntityType::Service, "api-svc", SyncAction::Create, SyncStatus::Success)
                .with_after_state(json!({"name": "api-svc"})),
        )
        .unwrap();

    let preview = engine.preview_rollback(&run.sync_id(), None).unwrap();
    assert!(!preview.can_rollback);
    assert!(preview.actions.is_empty());
    assert!(preview.warnings[0].contains("no recorded identifier"));
}

#[test]
fn update_without_before_state_warns_and_is_skipped() {
    let (_dir, store, engine) = engine_with(Arc::new(RecordingManager::default()));
    let run = store.start_sync(SyncOperation::Push, false);
    store
        .record(
            &run.entry(EntityType::Service, "api-svc", SyncAction::Update, SyncStatus::Success)
                .with_after_state(json!({"id": "x", "host": "new"})),
        )
        .unwrap();

    let preview = engine.preview_rollback(&run.sync_id(), None).unwrap();
    assert!(!preview.can_rollback);
    assert!(preview.warnings[0].contains("no recorded prior state"));
}

#[test]
fn update_identifier_falls_back_to_after_state() {
    let (_dir, store, engine) = engine_with(Arc::new(RecordingManager::default()));
    let run = store.start_sync(SyncOperation::Push, false);
    store
        .record(
            &run.entry(EntityType::Service, "api-svc", SyncAction::Update, SyncStatus::Success)
                .with_before_state(json!({"host": "old"}))
                .with_after_state(json!({"id": "x", "host": "new"})),
        )
        .unwrap();

    let preview = engine.preview_rollback(&run.sync_id(), None).unwrap();
    assert!(preview.can_rollback);
    assert_eq!(preview.actions[0].entity_id, "x");
}

#[test]
fn update_with_no_identifier_anywhere_warns() {
    let (_dir, store, engine) = engine_with(Arc::new(RecordingManager::default()));
    let run = store.start_sync(SyncOperation::Push, false);
    store
        .record(
            &run.entry(EntityType::Service, "api-svc", SyncAction::Update, SyncStatus::Success)
                .with_before_state(json!({"host": "old"})),
        )
        .unwrap();

    let preview = engine.preview_rollback(&run.sync_id(), None).unwrap();
    assert!(!preview.can_rollback);
    assert!(preview.warnings[0].contains("no identifier"));
}

#[test]
fn preview_filters_by_entity_type() {
    let (_dir, store, engine) = engine_with(Arc::new(RecordingManager::default()));
    let run = store.start_sync(SyncOperation::Push, false);
    record_create(&store, &run, "api-svc", "s1");
    store
        .record(
            &run.entry(EntityType::Route, "api-route", SyncAction::Create, SyncStatus::Success)
                .with_after_state(json!({"id": "r1"})),
        )
        .unwrap();

    let filter = [EntityType::Route];
    let preview = engine.preview_rollback(&run.sync_id(), Some(&filter)).unwrap();
    assert_eq!(preview.actions.len(), 1);
    assert_eq!(preview.actions[0].entity_type, EntityType::Route);
}

// ── rollback execution ───────────────────────────────────────────

#[test]
fn rollback_restores_before_deleting() {
    let manager = Arc::new(RecordingManager::default());
    let (_dir, store, engine) = engine_with(Arc::clone(&manager));
    let run = store.start_sync(SyncOperation::Push, false);

    record_create(&store, &run, "api-svc", "s1");
    store
        .record(
            &run.entry(EntityType::Service, "api-svc", SyncAction::Update, SyncStatus::Success)
                .with_before_state(json!({"id": "s1", "host": "a.local"}))
                .with_after_state(json!({"id": "s1", "host": "b.local"})),
        )
        .unwrap();

    let result = engine.rollback(&run.sync_id(), None, false).unwrap();
    assert!(result.success);
    assert_eq!(result.rolled_back, 2);
    assert_eq!(result.failed, 0);
    assert_eq!(result.skipped, 0);

    // Reverse chronological order: the update is undone first.
    assert_eq!(manager.calls(), vec!["update s1 host=a.local", "delete s1"]);
}

#[test]
fn blocked_rollback_returns_the_preview_warnings_as_errors() {
    let (_dir, store, engine) = engine_with(Arc::new(RecordingManager::default()));
    let run = store.start_sync(SyncOperation::Push, true);
    store
        .record(
            &run.entry(EntityType::Service, "api-svc", SyncAction::Create, SyncStatus::WouldCreate),
        )
        .unwrap();

    let result = engine.rollback(&run.sync_id(), None, false).unwrap();
    assert!(!result.success);
    assert_eq!(result.rolled_back, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("dry run"));
}

#[test]
fn failure_halts_processing_without_force() {
    let manager = Arc::new(RecordingManager::failing_delete_of("s2"));
    let (_dir, store, engine) = engine_with(Arc::clone(&manager));
    let run = store.start_sync(SyncOperation::Push, false);

    record_create(&store, &run, "svc-1", "s1");
    record_create(&store, &run, "svc-2", "s2");
    record_create(&store, &run, "svc-3", "s3");

    let result = engine.rollback(&run.sync_id(), None, false).unwrap();
    assert!(!result.success);
    assert_eq!(result.rolled_back, 1); // s3 undone first
    assert_eq!(result.failed, 1); // s2 rejected
    assert_eq!(result.skipped, 1); // s1 never attempted
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("still referenced"));
    assert_eq!(manager.calls(), vec!["delete s3"]);
}

#[test]
fn force_continues_past_failures() {
    let manager = Arc::new(RecordingManager::failing_delete_of("s2"));
    let (_dir, store, engine) = engine_with(Arc::clone(&manager));
    let run = store.start_sync(SyncOperation::Push, false);

    record_create(&store, &run, "svc-1", "s1");
    record_create(&store, &run, "svc-2", "s2");
    record_create(&store, &run, "svc-3", "s3");

    let result = engine.rollback(&run.sync_id(), None, true).unwrap();
    assert!(!result.success);
    assert_eq!(result.rolled_back, 2);
    assert_eq!(result.failed, 1);
    assert_eq!(result.skipped, 0);
    assert_eq!(manager.calls(), vec!["delete s3", "delete s1"]);
}

#[test]
fn missing_manager_counts_as_a_failed_action() {
    let dir = TempDir::new().unwrap();
    let store = AuditStore::new(dir.path().join("audit.jsonl"));
    let engine = RollbackEngine::new(store.clone(), ManagerRegistry::new());
    let run = store.start_sync(SyncOperation::Push, false);
    record_create(&store, &run, "api-svc", "s1");

    let result = engine.rollback(&run.sync_id(), None, false).unwrap();
    assert!(!result.success);
    assert_eq!(result.failed, 1);
    assert!(result.errors[0].contains("no service manager"));
}

#[test]
fn pull_run_rolls_back_against_the_gateway() {
    let manager = Arc::new(RecordingManager::default());
    let dir = TempDir::new().unwrap();
    let store = AuditStore::new(dir.path().join("audit.jsonl"));
    let mut registry = ManagerRegistry::new();
    registry.register(Plane::Gateway, EntityType::Service, manager.clone());
    let engine = RollbackEngine::new(store.clone(), registry);

    let run = store.start_sync(SyncOperation::Pull, false);
    record_create(&store, &run, "api-svc", "s1");

    let result = engine.rollback(&run.sync_id(), None, false).unwrap();
    assert!(result.success);
    assert_eq!(manager.calls(), vec!["delete s1"]);
}
