//! YAML-backed cache: one record file per instance plus a single index.
//!
//! Layout under the cache root:
//! - `instances/<instance-id>.yaml`: self-contained [`SshEntry`] records.
//! - `index.yaml`: `{time, instances, canonical_names}`.
//!
//! The `instances` mapping resolves every known name: a non-empty value is
//! the instance id the alias points at; an empty value means the key itself
//! is the instance id. Aliases always resolve to a canonical record, never
//! chain. All writes are whole-file replacements through a temp file and an
//! atomic rename.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Cache, NamePicker, NoPicker};
use crate::error::CacheError;
use crate::models::{AccountSummary, SshEntry};

const INSTANCES_DIR: &str = "instances";
const INDEX_FILE: &str = "index.yaml";

/// The persisted lookup structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheIndex {
    /// When the index was rebuilt.
    pub time: DateTime<Utc>,
    /// name -> instance id (empty when the name *is* the instance id).
    pub instances: BTreeMap<String, String>,
    /// Canonical names only, sorted, for fuzzy presentation.
    pub canonical_names: Vec<String>,
}

/// YAML-file cache rooted at a base directory.
pub struct YamlCache {
    basedir: PathBuf,
    picker: Box<dyn NamePicker + Send + Sync>,
    index: Mutex<Option<CacheIndex>>,
}

impl YamlCache {
    /// A cache with no interactive fallback; lookup misses fail directly.
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Self::with_picker(basedir, Box::new(NoPicker))
    }

    /// A cache whose lookup misses fall back to the given picker.
    pub fn with_picker(
        basedir: impl Into<PathBuf>,
        picker: Box<dyn NamePicker + Send + Sync>,
    ) -> Self {
        Self {
            basedir: basedir.into(),
            picker,
            index: Mutex::new(None),
        }
    }

    fn index_path(&self) -> PathBuf {
        self.basedir.join(INDEX_FILE)
    }

    fn record_path(&self, instance_id: &str) -> PathBuf {
        self.basedir
            .join(INSTANCES_DIR)
            .join(format!("{instance_id}.yaml"))
    }

    /// Load the index on first use; later calls reuse the in-memory copy.
    fn load_index(&self) -> Result<CacheIndex, CacheError> {
        let mut slot = self.index.lock().expect("index lock poisoned");
        if let Some(index) = slot.as_ref() {
            return Ok(index.clone());
        }

        let path = self.index_path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(CacheError::Missing);
            }
            Err(source) => return Err(CacheError::Read { path, source }),
        };
        let index: CacheIndex =
            serde_yaml::from_str(&raw).map_err(|source| CacheError::Codec { path, source })?;
        *slot = Some(index.clone());
        Ok(index)
    }

    fn write_yaml<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), CacheError> {
        let dir = path.parent().unwrap_or(&self.basedir);
        let persist_err = |source: std::io::Error| CacheError::Persist {
            path: path.to_path_buf(),
            source,
        };

        let encoded = serde_yaml::to_string(value).map_err(|source| CacheError::Codec {
            path: path.to_path_buf(),
            source,
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(persist_err)?;
        tmp.write_all(encoded.as_bytes()).map_err(persist_err)?;
        tmp.persist(path)
            .map_err(|source| persist_err(source.error))?;
        Ok(())
    }

    fn read_record(&self, instance_id: &str) -> Result<SshEntry, CacheError> {
        let path = self.record_path(instance_id);
        let raw = std::fs::read_to_string(&path).map_err(|source| CacheError::Read {
            path: path.clone(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| CacheError::Codec { path, source })
    }
}

impl Cache for YamlCache {
    fn save(&self, summaries: &[AccountSummary]) -> Result<(), CacheError> {
        let instances_dir = self.basedir.join(INSTANCES_DIR);
        std::fs::create_dir_all(&instances_dir).map_err(|source| CacheError::Persist {
            path: instances_dir.clone(),
            source,
        })?;

        let mut instances = BTreeMap::new();
        let mut canonical_names = Vec::new();

        for summary in summaries {
            for entry in &summary.entries {
                self.write_yaml(&self.record_path(&entry.instance_id), entry)?;

                for (n, name) in entry.names.iter().enumerate() {
                    if name == &entry.instance_id {
                        instances.insert(name.clone(), String::new());
                    } else {
                        instances.insert(name.clone(), entry.instance_id.clone());
                        if n == 0 {
                            canonical_names.push(name.clone());
                        }
                    }
                }
            }
        }

        canonical_names.sort();
        let index = CacheIndex {
            time: Utc::now(),
            instances,
            canonical_names,
        };
        self.write_yaml(&self.index_path(), &index)?;
        debug!(
            names = index.instances.len(),
            canonical = index.canonical_names.len(),
            "index rebuilt"
        );

        *self.index.lock().expect("index lock poisoned") = Some(index);
        Ok(())
    }

    fn lookup(&self, name: &str) -> Result<SshEntry, CacheError> {
        let index = self.load_index()?;

        let instance_id = match index.instances.get(name) {
            Some(target) if !name.is_empty() => {
                // An empty value means the key itself is the instance id.
                if target.is_empty() {
                    name.to_string()
                } else {
                    target.clone()
                }
            }
            _ => {
                if index.canonical_names.is_empty() {
                    return Err(CacheError::Missing);
                }
                let picked = self
                    .picker
                    .pick(&index.canonical_names)
                    .ok_or_else(|| CacheError::NotFound(name.to_string()))?;
                let canonical = &index.canonical_names[picked];
                index
                    .instances
                    .get(canonical)
                    .cloned()
                    .ok_or_else(|| CacheError::NotFound(canonical.clone()))?
            }
        };

        self.read_record(&instance_id)
    }

    fn list_canonical_names(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.load_index()?.canonical_names)
    }
}
