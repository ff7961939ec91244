// 💾 Object Store - in-memory registry + JSON file persistence
//
// Keys are "<ClassName>.<id>". The file is one JSON object with the same
// keys; each value is the entity's to_dict() (attributes + "__class__").

use crate::entities::Entity;
use crate::error::{Result, StoreError};
use crate::registry::ClassRegistry;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ============================================================================
// FILE STORAGE
// ============================================================================

#[derive(Debug)]
pub struct FileStorage {
    file_path: PathBuf,
    objects: BTreeMap<String, Entity>,
}

impl FileStorage {
    /// Empty store bound to a persistence file. Nothing is read until `reload`.
    pub fn open(file_path: impl Into<PathBuf>) -> Self {
        FileStorage {
            file_path: file_path.into(),
            objects: BTreeMap::new(),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// The live key → entity mapping
    pub fn all(&self) -> &BTreeMap<String, Entity> {
        &self.objects
    }

    /// The live mapping, for direct mutation (e.g. deleting a key)
    pub fn all_mut(&mut self) -> &mut BTreeMap<String, Entity> {
        &mut self.objects
    }

    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.objects.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entity> {
        self.objects.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Insert (or overwrite) under "<discriminator>.<id>"
    pub fn insert(&mut self, entity: Entity) {
        self.objects.insert(entity.key(), entity);
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Serialize every entity and replace the file in one atomic rename
    pub fn save(&self) -> Result<()> {
        let document: Map<String, Value> = self
            .objects
            .iter()
            .map(|(key, entity)| (key.clone(), Value::Object(entity.to_dict())))
            .collect();
        let json = serde_json::to_string(&Value::Object(document))?;

        write_atomic(&self.file_path, json.as_bytes())?;

        info!(path = %self.file_path.display(), count = self.objects.len(), "store saved");
        Ok(())
    }

    /// Load the file into the store.
    ///
    /// A missing file is not an error and leaves the store as it is. Every
    /// entry is rebuilt through the registry before any is inserted, so a
    /// bad file changes nothing.
    pub fn reload(&mut self, registry: &ClassRegistry) -> Result<()> {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "no storage file, starting empty");
                return Ok(());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.file_path.clone(),
                    source,
                })
            }
        };

        let document: Map<String, Value> =
            serde_json::from_str(&contents).map_err(|source| StoreError::Malformed {
                path: self.file_path.clone(),
                source,
            })?;

        let mut loaded = Vec::with_capacity(document.len());
        for (key, value) in &document {
            let dict = value.as_object().ok_or_else(|| StoreError::InvalidEntry {
                key: key.clone(),
                reason: "entry is not a JSON object".to_string(),
            })?;

            let entity = registry.reconstruct(key, dict).inspect_err(|err| {
                warn!(key = %key, error = %err, "cannot rebuild stored entity");
            })?;

            if entity.key() != *key {
                return Err(StoreError::InvalidEntry {
                    key: key.clone(),
                    reason: format!("key does not match class and id ({})", entity.key()),
                });
            }
            loaded.push(entity);
        }

        let count = loaded.len();
        for entity in loaded {
            self.insert(entity);
        }

        info!(path = %self.file_path.display(), count, "store reloaded");
        Ok(())
    }
}

/// Write to a sibling temp file, then rename it over the target
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp = temp_path(path);
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    fs::write(&temp, bytes).map_err(write_err)?;
    if let Err(source) = fs::rename(&temp, path) {
        // Best effort; the rename error is the one worth reporting
        let _ = fs::remove_file(&temp);
        return Err(write_err(source));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("storage"));
    name.push(".tmp");
    path.with_file_name(name)
}

// ============================================================================
// TESTS
// ============================================================================
