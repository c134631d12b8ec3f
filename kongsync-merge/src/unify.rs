//! Entity unification across the two planes.
//!
//! Merges two per-plane entity collections into one unified view, matching
//! by a caller-supplied key field and classifying each result as
//! gateway-only, control-plane-only, or present in both.

use crate::drift::{detect_drift_with, DriftOptions};
use kongsync_model::{entity_id, entity_key};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Where an entity currently exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySource {
    Gateway,
    ControlPlane,
    Both,
}

impl EntitySource {
    /// Returns the canonical snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntitySource::Gateway => "gateway",
            EntitySource::ControlPlane => "control_plane",
            EntitySource::Both => "both",
        }
    }
}

impl fmt::Display for EntitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical entity in the unified view.
///
/// `entity` is the canonical copy — the gateway's when the entity exists
/// in both planes. The original per-plane copies are kept for deep
/// comparison and for constructing reversing operations.
///
/// Constructed once per sync pass and immutable thereafter; never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct UnifiedEntity {
    /// The cross-plane matching key (commonly the entity name).
    pub name: String,
    /// The canonical entity value.
    pub entity: Value,
    /// Where the entity currently exists.
    pub source: EntitySource,
    /// Identifier in the gateway plane, when present there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_id: Option<String>,
    /// Identifier in the control plane, when present there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_plane_id: Option<String>,
    /// True iff the entity exists in both planes and a compared field
    /// differs.
    pub has_drift: bool,
    /// The differing leaf paths; empty when there is no drift.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub drift_fields: Vec<String>,
    /// The gateway's copy, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_entity: Option<Value>,
    /// The control plane's copy, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_plane_entity: Option<Value>,
}

/// An ordered collection of unified entities with derived read-only views.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UnifiedEntityList {
    entities: Vec<UnifiedEntity>,
}

impl UnifiedEntityList {
    fn new(entities: Vec<UnifiedEntity>) -> Self {
        Self { entities }
    }

    /// Returns the entities in key order.
    #[must_use]
    pub fn entities(&self) -> &[UnifiedEntity] {
        &self.entities
    }

    /// Iterates the entities in key order.
    pub fn iter(&self) -> impl Iterator<Item = &UnifiedEntity> {
        self.entities.iter()
    }

    /// Returns the number of unified entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true when the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Consumes the list, returning the entities.
    #[must_use]
    pub fn into_inner(self) -> Vec<UnifiedEntity> {
        self.entities
    }

    /// Entities present in the requested plane.
    ///
    /// Asking for a single plane includes `both`-sourced entries, since
    /// those entities are present in that plane; asking for `both`
    /// returns only dual-presence entries.
    #[must_use]
    pub fn filter_by_source(&self, source: EntitySource) -> Vec<&UnifiedEntity> {
        self.entities
            .iter()
            .filter(|e| match source {
                EntitySource::Both => e.source == EntitySource::Both,
                single => e.source == single || e.source == EntitySource::Both,
            })
            .collect()
    }

    /// Entities present only in the gateway plane.
    #[must_use]
    pub fn gateway_only(&self) -> Vec<&UnifiedEntity> {
        self.with_source(EntitySource::Gateway)
    }

    /// Entities present only in the control plane.
    #[must_use]
    pub fn control_plane_only(&self) -> Vec<&UnifiedEntity> {
        self.with_source(EntitySource::ControlPlane)
    }

    /// Entities present in both planes.
    #[must_use]
    pub fn in_both(&self) -> Vec<&UnifiedEntity> {
        self.with_source(EntitySource::Both)
    }

    /// Entities present in both planes with at least one differing field.
    #[must_use]
    pub fn with_drift(&self) -> Vec<&UnifiedEntity> {
        self.entities
            .iter()
            .filter(|e| e.source == EntitySource::Both && e.has_drift)
            .collect()
    }

    /// Entities present in both planes with no drift.
    #[must_use]
    pub fn fully_synced(&self) -> Vec<&UnifiedEntity> {
        self.entities
            .iter()
            .filter(|e| e.source == EntitySource::Both && !e.has_drift)
            .collect()
    }

    fn with_source(&self, source: EntitySource) -> Vec<&UnifiedEntity> {
        self.entities.iter().filter(|e| e.source == source).collect()
    }
}

impl<'a> IntoIterator for &'a UnifiedEntityList {
    type Item = &'a UnifiedEntity;
    type IntoIter = std::slice::Iter<'a, UnifiedEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

/// Merges the two planes' entity collections into one unified view.
///
/// Each input list is indexed by `key_field`; entries lacking the field
/// are dropped. Keys are processed in ascending lexical order so the
/// output is deterministic. Entities present on both sides get a drift
/// report; the gateway copy is canonical for those.
#[must_use]
pub fn merge_entities(
    gateway: &[Value],
    control_plane: &[Value],
    key_field: &str,
    compare_fields: Option<&[String]>,
) -> UnifiedEntityList {
    merge_entities_with(
        gateway,
        control_plane,
        key_field,
        compare_fields,
        &DriftOptions::default(),
    )
}

/// [`merge_entities`] with explicit drift options.
#[must_use]
pub fn merge_entities_with(
    gateway: &[Value],
    control_plane: &[Value],
    key_field: &str,
    compare_fields: Option<&[String]>,
    options: &DriftOptions,
) -> UnifiedEntityList {
    let gw = index_by_key(gateway, key_field);
    let cp = index_by_key(control_plane, key_field);
    let keys: BTreeSet<&String> = gw.keys().chain(cp.keys()).collect();

    let mut entities = Vec::with_capacity(keys.len());
    for key in keys {
        let unified = match (gw.get(key), cp.get(key)) {
            (Some(g), None) => UnifiedEntity {
                name: key.clone(),
                entity: (*g).clone(),
                source: EntitySource::Gateway,
                gateway_id: entity_id(g).map(str::to_string),
                control_plane_id: None,
                has_drift: false,
                drift_fields: Vec::new(),
                gateway_entity: Some((*g).clone()),
                control_plane_entity: None,
            },
            (None, Some(c)) => UnifiedEntity {
                name: key.clone(),
                entity: (*c).clone(),
                source: EntitySource::ControlPlane,
                gateway_id: None,
                control_plane_id: entity_id(c).map(str::to_string),
                has_drift: false,
                drift_fields: Vec::new(),
                gateway_entity: None,
                control_plane_entity: Some((*c).clone()),
            },
            (Some(g), Some(c)) => {
                let report = detect_drift_with(Some(g), Some(c), compare_fields, options);
                UnifiedEntity {
                    name: key.clone(),
                    entity: (*g).clone(),
                    source: EntitySource::Both,
                    gateway_id: entity_id(g).map(str::to_string),
                    control_plane_id: entity_id(c).map(str::to_string),
                    has_drift: report.has_drift,
                    drift_fields: report.fields,
                    gateway_entity: Some((*g).clone()),
                    control_plane_entity: Some((*c).clone()),
                }
            }
            (None, None) => continue,
        };
        entities.push(unified);
    }

    UnifiedEntityList::new(entities)
}

fn index_by_key<'a>(entities: &'a [Value], key_field: &str) -> BTreeMap<String, &'a Value> {
    let mut indexed = BTreeMap::new();
    for entity in entities {
        if let Some(key) = entity_key(entity, key_field) {
            indexed.insert(key.to_string(), entity);
        }
    }
    indexed
}
