//! Application settings management
//!
//! User preferences persisted next to the favorites.

use crate::config::catalog::SCHEMASTORE_CATALOG_URL;
use crate::config::storage::SETTINGS_KEY;
use crate::data::storage::KeyValueStore;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Settings file format version for migrations
const SETTINGS_VERSION: u32 = 1;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// File format version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Catalog document to fetch
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Show the metadata pane next to the list
    #[serde(default = "default_true")]
    pub show_details: bool,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

fn default_catalog_url() -> String {
    SCHEMASTORE_CATALOG_URL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            catalog_url: default_catalog_url(),
            show_details: true,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when none are stored
    pub fn load(store: &KeyValueStore) -> Result<Self> {
        Ok(store.get::<Settings>(SETTINGS_KEY)?.unwrap_or_default())
    }

    /// Persist settings
    pub fn save(&self, store: &KeyValueStore) -> Result<()> {
        store.set(SETTINGS_KEY, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::storage::test_support::temp_store;
    use std::fs;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.version, 1);
        assert_eq!(settings.catalog_url, SCHEMASTORE_CATALOG_URL);
        assert!(settings.show_details);
    }

    #[test]
    fn test_load_missing_is_default() {
        let store = temp_store("settings_missing");
        assert_eq!(Settings::load(&store).unwrap(), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let store = temp_store("settings_roundtrip");
        let settings = Settings {
            catalog_url: "https://mirror.test/catalog.json".to_string(),
            show_details: false,
            ..Settings::default()
        };
        settings.save(&store).unwrap();
        assert_eq!(Settings::load(&store).unwrap(), settings);
        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let store = temp_store("settings_partial");
        store.set_raw(SETTINGS_KEY, r#"{"show_details": false}"#).unwrap();
        let settings = Settings::load(&store).unwrap();
        assert!(!settings.show_details);
        assert_eq!(settings.catalog_url, SCHEMASTORE_CATALOG_URL);
        let _ = fs::remove_dir_all(store.dir());
    }
}
