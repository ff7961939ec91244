// 📚 Class Registry
// Maps a class-name string to the kind that knows how to build it.
//
// Two ways to construct:
// - fresh (create): new id + timestamps
// - reconstruct (reload): fields copied from a persisted mapping, nothing regenerated

use crate::entities::{Entity, EntityKind, CLASS_FIELD};
use crate::error::StoreError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

// ============================================================================
// CLASS REGISTRY
// ============================================================================

/// Process-scoped registry, populated at startup
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: BTreeMap<&'static str, EntityKind>,
}

impl ClassRegistry {
    /// Registry with every built-in class
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for kind in EntityKind::ALL {
            registry.register(kind);
        }
        registry
    }

    /// Registry with nothing registered
    pub fn empty() -> Self {
        ClassRegistry {
            classes: BTreeMap::new(),
        }
    }

    /// Register a class under its name (re-registering is a no-op)
    pub fn register(&mut self, kind: EntityKind) {
        self.classes.insert(kind.name(), kind);
    }

    pub fn get(&self, name: &str) -> Option<EntityKind> {
        self.classes.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.classes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Fresh entity of a registered class
    pub fn create(&self, name: &str) -> Option<Entity> {
        self.get(name).map(Entity::new)
    }

    /// Rebuild the entity stored under `key` from its persisted mapping.
    ///
    /// The discriminator routes construction; an unregistered one is a
    /// structural error, not a skipped record.
    pub fn reconstruct(&self, key: &str, dict: &Map<String, Value>) -> Result<Entity, StoreError> {
        let class = dict
            .get(CLASS_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::InvalidEntry {
                key: key.to_string(),
                reason: format!("missing or non-string '{}'", CLASS_FIELD),
            })?;

        let kind = self.get(class).ok_or_else(|| StoreError::UnknownClass {
            key: key.to_string(),
            class: class.to_string(),
        })?;

        Entity::from_dict(kind, dict).map_err(|source| StoreError::BadEntity {
            key: key.to_string(),
            source,
        })
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
