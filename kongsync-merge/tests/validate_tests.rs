use kongsync_merge::validate_merged_state;
use kongsync_model::EntityType;
use pretty_assertions::assert_eq;
use serde_json::json;

// ── required fields ──────────────────────────────────────────────

#[test]
fn complete_service_is_valid() {
    let merged = json!({"name": "api", "host": "a.local", "port": 8080});
    let result = validate_merged_state(&merged, EntityType::Service, None, None);
    assert!(result.is_valid);
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn missing_required_field_is_an_error() {
    let merged = json!({"name": "api"});
    let result = validate_merged_state(&merged, EntityType::Service, None, None);
    assert!(!result.is_valid);
    assert_eq!(result.errors, vec!["missing required field: host"]);
}

#[test]
fn empty_required_field_counts_as_missing() {
    let merged = json!({"name": "api", "host": ""});
    let result = validate_merged_state(&merged, EntityType::Service, None, None);
    assert!(!result.is_valid);
    assert_eq!(result.errors, vec!["missing required field: host"]);
}

#[test]
fn required_fields_differ_per_entity_type() {
    let merged = json!({"name": "basic-auth"});
    assert!(validate_merged_state(&merged, EntityType::Plugin, None, None).is_valid);
    assert!(!validate_merged_state(&merged, EntityType::Consumer, None, None).is_valid);
}

// ── type checks ──────────────────────────────────────────────────

#[test]
fn wrong_type_is_an_error() {
    let merged = json!({"name": "api", "host": "a.local", "port": "8080"});
    let result = validate_merged_state(&merged, EntityType::Service, None, None);
    assert!(!result.is_valid);
    assert_eq!(result.errors, vec!["field port: expected integer, got string"]);
}

#[test]
fn fractional_port_is_an_error() {
    let merged = json!({"name": "api", "host": "a.local", "port": 8080.5});
    let result = validate_merged_state(&merged, EntityType::Service, None, None);
    assert_eq!(result.errors, vec!["field port: expected integer, got number"]);
}

#[test]
fn tags_must_be_a_list() {
    let merged = json!({"name": "api", "host": "a.local", "tags": "prod"});
    let result = validate_merged_state(&merged, EntityType::Service, None, None);
    assert_eq!(result.errors, vec!["field tags: expected list, got string"]);
}

#[test]
fn null_fields_are_not_type_checked() {
    let merged = json!({"name": "api", "host": "a.local", "port": null});
    let result = validate_merged_state(&merged, EntityType::Service, None, None);
    assert!(result.is_valid);
}

#[test]
fn unknown_field_names_are_not_type_checked() {
    let merged = json!({"name": "api", "host": "a.local", "custom_thing": 5});
    let result = validate_merged_state(&merged, EntityType::Service, None, None);
    assert!(result.is_valid);
}

// ── unknown-field warnings ───────────────────────────────────────

#[test]
fn field_absent_from_both_originals_is_a_warning() {
    let source = json!({"name": "api", "host": "a.local"});
    let target = json!({"name": "api", "host": "b.local"});
    let merged = json!({"name": "api", "host": "a.local", "retries": 5});

    let result = validate_merged_state(
        &merged,
        EntityType::Service,
        Some(&source),
        Some(&target),
    );
    assert!(result.is_valid);
    assert_eq!(result.warnings, vec!["unknown field added: retries"]);
}

#[test]
fn fields_from_either_original_are_not_warned() {
    let source = json!({"name": "api", "host": "a.local", "retries": 5});
    let target = json!({"name": "api", "host": "b.local", "port": 8080});
    let merged = json!({"name": "api", "host": "a.local", "retries": 5, "port": 8080});

    let result = validate_merged_state(
        &merged,
        EntityType::Service,
        Some(&source),
        Some(&target),
    );
    assert!(result.warnings.is_empty());
}

#[test]
fn no_warnings_without_both_originals() {
    let merged = json!({"name": "api", "host": "a.local", "retries": 5});
    let source = json!({"name": "api", "host": "a.local"});

    let result = validate_merged_state(&merged, EntityType::Service, Some(&source), None);
    assert!(result.warnings.is_empty());
}

#[test]
fn warnings_never_affect_validity() {
    let source = json!({"name": "api", "host": "a.local"});
    let target = json!({"name": "api", "host": "b.local"});
    let merged = json!({"name": "api", "host": "a.local", "extra": true});

    let result = validate_merged_state(
        &merged,
        EntityType::Service,
        Some(&source),
        Some(&target),
    );
    assert!(result.is_valid);
    assert!(!result.warnings.is_empty());
}

#[test]
fn errors_and_warnings_can_coexist() {
    let source = json!({"name": "api", "host": "a.local"});
    let target = json!({"name": "api", "host": "b.local"});
    let merged = json!({"name": "api", "extra": true});

    let result = validate_merged_state(
        &merged,
        EntityType::Service,
        Some(&source),
        Some(&target),
    );
    assert!(!result.is_valid);
    assert_eq!(result.errors, vec!["missing required field: host"]);
    assert_eq!(result.warnings, vec!["unknown field added: extra"]);
}
