//! The per-plane entity manager seam.
//!
//! The reconciliation core never performs network I/O itself; the HTTP
//! clients for the two planes implement `EntityManager` and are handed in
//! through a `ManagerRegistry`. The rollback engine selects the manager
//! for each recorded action by `(target plane, entity type)`.

use crate::{EntityType, Plane};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors a plane manager can report back to the core.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The plane has no entity with the given identifier.
    #[error("entity not found: {0}")]
    NotFound(String),

    /// The plane rejected the operation (validation, permissions).
    #[error("operation rejected: {0}")]
    Rejected(String),

    /// The plane could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
}

/// CRUD operations on one entity type against one plane.
///
/// Implemented by the HTTP clients one layer up; the core only invokes
/// these when executing rollback actions.
pub trait EntityManager: Send + Sync {
    /// Creates an entity and returns the stored copy, including the
    /// plane-assigned identifier.
    fn create(&self, entity: &Value) -> ManagerResult<Value>;

    /// Replaces the entity with the given identifier and returns the
    /// stored copy.
    fn update(&self, id: &str, entity: &Value) -> ManagerResult<Value>;

    /// Deletes the entity with the given identifier.
    fn delete(&self, id: &str) -> ManagerResult<()>;
}

/// Maps `(plane, entity type)` to the manager that serves it.
#[derive(Default)]
pub struct ManagerRegistry {
    managers: HashMap<(Plane, EntityType), Arc<dyn EntityManager>>,
}

impl ManagerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the manager serving one entity type on one plane,
    /// replacing any previous registration.
    pub fn register(
        &mut self,
        plane: Plane,
        entity_type: EntityType,
        manager: Arc<dyn EntityManager>,
    ) {
        self.managers.insert((plane, entity_type), manager);
    }

    /// Looks up the manager for one entity type on one plane.
    #[must_use]
    pub fn get(&self, plane: Plane, entity_type: EntityType) -> Option<Arc<dyn EntityManager>> {
        self.managers.get(&(plane, entity_type)).cloned()
    }

    /// Returns the number of registered managers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    /// Returns true when no managers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}
