//! Core type definitions for the kongsync reconciliation engine.
//!
//! This crate defines the fundamental, plane-agnostic types shared by the
//! merge, audit, and rollback crates:
//! - Sync run identifiers (UUID v7)
//! - The closed catalog of gateway configuration entity types
//! - Plane tags (gateway data plane vs. remote control plane)
//! - JSON field flattening and lenient equality, used for drift detection
//!   and merge analysis
//! - Static per-entity-type schema tables for merge validation
//! - The `EntityManager` seam through which the rollback engine reaches the
//!   HTTP clients that live one layer up
//!
//! Entities themselves are plain `serde_json::Value` objects; this core
//! needs structural equality and field enumeration over them, not domain
//! knowledge of their shape.

mod entity;
mod flatten;
mod ids;
mod manager;
mod schema;

pub use entity::{entity_id, entity_key, EntityType, Plane};
pub use flatten::{flatten, is_empty_value, remove_path, set_path, values_equal};
pub use ids::SyncId;
pub use manager::{EntityManager, ManagerError, ManagerRegistry, ManagerResult};
pub use schema::{expected_type, required_fields, FieldType};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("unknown plane: {0}")]
    UnknownPlane(String),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
