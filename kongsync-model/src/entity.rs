//! The entity-type catalog and plane tags.
//!
//! Entities are plain `serde_json::Value` records; the catalog is a closed
//! set of tags because the surrounding system only ever syncs a fixed set
//! of gateway configuration types. The flatten/compare utilities still
//! operate on raw JSON so they work across every shape in the catalog.

use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Gateway configuration entity types the sync engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Service,
    Route,
    Plugin,
    Consumer,
    Upstream,
    Certificate,
}

impl EntityType {
    /// All catalog entries, in the order they are synced.
    pub const ALL: [EntityType; 6] = [
        EntityType::Service,
        EntityType::Route,
        EntityType::Plugin,
        EntityType::Consumer,
        EntityType::Upstream,
        EntityType::Certificate,
    ];

    /// Returns the canonical snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntityType::Service => "service",
            EntityType::Route => "route",
            EntityType::Plugin => "plugin",
            EntityType::Consumer => "consumer",
            EntityType::Upstream => "upstream",
            EntityType::Certificate => "certificate",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service" => Ok(EntityType::Service),
            "route" => Ok(EntityType::Route),
            "plugin" => Ok(EntityType::Plugin),
            "consumer" => Ok(EntityType::Consumer),
            "upstream" => Ok(EntityType::Upstream),
            "certificate" => Ok(EntityType::Certificate),
            other => Err(Error::UnknownEntityType(other.to_string())),
        }
    }
}

/// One of the two stores of entity truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plane {
    /// The locally reachable data-plane API.
    Gateway,
    /// The remote management API.
    ControlPlane,
}

impl Plane {
    /// Returns the canonical snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Plane::Gateway => "gateway",
            Plane::ControlPlane => "control_plane",
        }
    }

    /// Returns the other plane.
    #[must_use]
    pub const fn opposite(&self) -> Plane {
        match self {
            Plane::Gateway => Plane::ControlPlane,
            Plane::ControlPlane => Plane::Gateway,
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plane {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gateway" => Ok(Plane::Gateway),
            "control_plane" => Ok(Plane::ControlPlane),
            other => Err(Error::UnknownPlane(other.to_string())),
        }
    }
}

/// Extracts the cross-plane matching key from an entity record.
///
/// Returns `None` when the field is absent or not a string; such entities
/// are excluded from unification entirely.
#[must_use]
pub fn entity_key<'a>(entity: &'a Value, key_field: &str) -> Option<&'a str> {
    entity.get(key_field).and_then(Value::as_str)
}

/// Extracts an entity's plane-assigned identifier, when present.
#[must_use]
pub fn entity_id(entity: &Value) -> Option<&str> {
    entity_key(entity, "id")
}
