//! Storage layer for JSON persistence
//!
//! A small key-value store: each key is one JSON file in the data directory.

use crate::config::app::NAME;
use crate::config::storage::KEY_EXTENSION;
use crate::error::{Result, SchemataError};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Get the application config directory path
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir().map(|p| p.join(NAME)).ok_or_else(|| {
        SchemataError::Config(
            "Could not determine config directory. HOME environment variable may not be set."
                .to_string(),
        )
    })
}

/// Get the application cache directory path
pub fn cache_dir() -> Result<PathBuf> {
    dirs::cache_dir().map(|p| p.join(NAME)).ok_or_else(|| {
        SchemataError::Config(
            "Could not determine cache directory. HOME environment variable may not be set."
                .to_string(),
        )
    })
}

// =============================================================================
// Path-based functions
// =============================================================================

/// Create a directory if it doesn't exist, with proper error handling
pub(crate) fn create_dir_if_needed(path: &Path) -> Result<()> {
    match fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) => {
            let msg = match e.kind() {
                ErrorKind::PermissionDenied => {
                    format!("Permission denied: cannot create directory {:?}", path)
                }
                ErrorKind::NotFound => {
                    format!("Cannot create directory {:?}: parent path does not exist", path)
                }
                _ => format!("Failed to create directory {:?}: {}", path, e),
            };
            Err(SchemataError::Storage(msg))
        }
    }
}

/// Read file contents, `None` if the file doesn't exist
fn read_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) => match e.kind() {
            ErrorKind::NotFound => Ok(None),
            ErrorKind::PermissionDenied => Err(SchemataError::Storage(format!(
                "Permission denied: cannot read {:?}",
                path
            ))),
            _ => Err(SchemataError::Storage(format!(
                "Failed to read {:?}: {}",
                path, e
            ))),
        },
    }
}

/// Write file contents, creating parent directories
fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_if_needed(parent)?;
        }
    }

    match fs::write(path, content) {
        Ok(()) => Ok(()),
        Err(e) => {
            let msg = match e.kind() {
                ErrorKind::PermissionDenied => {
                    format!("Permission denied: cannot write to {:?}", path)
                }
                ErrorKind::ReadOnlyFilesystem => {
                    format!("Cannot write to {:?}: filesystem is read-only", path)
                }
                _ => format!("Failed to write to {:?}: {}", path, e),
            };
            Err(SchemataError::Storage(msg))
        }
    }
}

/// Load data from a JSON file at a specific path
///
/// Returns `None` if the file doesn't exist or is empty.
/// Returns an error if the file exists but can't be read or parsed.
pub fn load_from<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match read_file(path)? {
        Some(c) => c,
        None => return Ok(None),
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    let data = serde_json::from_str(&content)
        .map_err(|e| SchemataError::Parse(format!("Failed to parse {:?}: {}", path, e)))?;

    Ok(Some(data))
}

/// Save data to a JSON file at a specific path
pub fn save_to<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| SchemataError::Storage(format!("Failed to serialize data: {}", e)))?;
    write_file(path, &content)
}

/// Delete a file at a specific path (missing is fine)
pub fn delete_at(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) => match e.kind() {
            ErrorKind::NotFound => Ok(()),
            ErrorKind::PermissionDenied => Err(SchemataError::Storage(format!(
                "Permission denied: cannot delete {:?}",
                path
            ))),
            _ => Err(SchemataError::Storage(format!(
                "Failed to delete {:?}: {}",
                path, e
            ))),
        },
    }
}

// =============================================================================
// KeyValueStore
// =============================================================================

/// Persisted key-value store backed by one JSON file per key
#[derive(Debug, Clone)]
pub struct KeyValueStore {
    dir: PathBuf,
}

impl KeyValueStore {
    /// Open the store in the default config directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::with_dir(config_dir()?))
    }

    /// Open the store in a custom directory (created lazily on first write)
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding the store's files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path backing a key
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{KEY_EXTENSION}")))
    }

    /// Read the raw serialized value for a key
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        Ok(read_file(&path)?.filter(|c| !c.trim().is_empty()))
    }

    /// Replace the raw serialized value for a key
    pub fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        write_file(&path, value)
    }

    /// Deserialize the value for a key
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        load_from(&self.path_for(key)?)
    }

    /// Serialize and store a value under a key
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        save_to(&self.path_for(key)?, value)
    }

    /// Remove a key
    pub fn remove(&self, key: &str) -> Result<()> {
        delete_at(&self.path_for(key)?)
    }

    /// Check whether a key holds a value
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.path_for(key)?.exists())
    }
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(SchemataError::Storage(format!("Invalid storage key '{key}'")))
    }
}
