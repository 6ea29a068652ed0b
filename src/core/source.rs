/// Profile stores: where profile sources come from and how fresh they are.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

use crate::core::profile::{ConfigurationError, ProfileFormat};

/// An external store of profile sources keyed by identifier.
///
/// Identifiers carry their format extension (`default.json`, `noir.ron`).
pub trait ProfileSource: Send + Sync {
    /// Identifiers currently available, in no particular order.
    fn list(&self) -> Result<Vec<String>, ConfigurationError>;

    /// Read the raw source text of one profile.
    fn read(&self, id: &str) -> Result<String, ConfigurationError>;

    /// Modification stamp of a profile source, if the store tracks one.
    fn modified(&self, id: &str) -> Option<SystemTime>;
}

/// Order identifiers for display: `default_id` first, the rest sorted.
///
/// An empty listing yields `[default_id]` so callers always have a choice.
pub fn discovery_order(mut ids: Vec<String>, default_id: &str) -> Vec<String> {
    ids.sort();
    ids.dedup();
    if let Some(pos) = ids.iter().position(|id| id == default_id) {
        let default = ids.remove(pos);
        ids.insert(0, default);
    }
    if ids.is_empty() {
        ids.push(default_id.to_string());
    }
    ids
}

/// Profiles stored as `.json` / `.ron` files in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path for an identifier, rejecting anything that is not a bare file name.
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let name = Path::new(id);
        if name.file_name().and_then(|s| s.to_str()) != Some(id) {
            return None;
        }
        Some(self.root.join(name))
    }
}

impl ProfileSource for DirectorySource {
    fn list(&self) -> Result<Vec<String>, ConfigurationError> {
        if !self.root.is_dir() {
            debug!(dir = %self.root.display(), "profile directory absent");
            return Ok(Vec::new());
        }

        let dir_id = self.root.display().to_string();
        let entries = std::fs::read_dir(&self.root).map_err(|source| ConfigurationError::Io {
            id: dir_id.clone(),
            source,
        })?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ConfigurationError::Io {
                id: dir_id.clone(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "skipping profile with non UTF-8 name");
                continue;
            };
            if ProfileFormat::from_id(name).is_some() {
                ids.push(name.to_string());
            }
        }
        debug!(dir = %self.root.display(), count = ids.len(), "listed profiles");
        Ok(ids)
    }

    fn read(&self, id: &str) -> Result<String, ConfigurationError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| ConfigurationError::NotFound { id: id.to_string() })?;
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigurationError::NotFound { id: id.to_string() }
            } else {
                ConfigurationError::Io {
                    id: id.to_string(),
                    source,
                }
            }
        })
    }

    fn modified(&self, id: &str) -> Option<SystemTime> {
        let path = self.path_for(id)?;
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }
}

/// A store with nothing in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySource;

impl ProfileSource for EmptySource {
    fn list(&self) -> Result<Vec<String>, ConfigurationError> {
        Ok(Vec::new())
    }

    fn read(&self, id: &str) -> Result<String, ConfigurationError> {
        Err(ConfigurationError::NotFound { id: id.to_string() })
    }

    fn modified(&self, _id: &str) -> Option<SystemTime> {
        None
    }
}
