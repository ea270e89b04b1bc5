//! Favorites store
//!
//! Favorite schemas are persisted as a single JSON object keyed by schema
//! URL. Every operation reads the blob, modifies it, and writes it back.

use crate::catalog::CatalogEntry;
use crate::config::storage::FAVORITES_KEY;
use crate::data::storage::KeyValueStore;
use crate::error::{Result, SchemataError};
use std::collections::BTreeMap;
use tracing::{debug, error, warn};

/// Favorites by schema URL
pub type FavoritesMap = BTreeMap<String, CatalogEntry>;

/// Reads and writes the persisted favorites map
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    store: KeyValueStore,
}

impl FavoritesStore {
    pub fn new(store: KeyValueStore) -> Self {
        Self { store }
    }

    /// Current favorites
    ///
    /// A missing, unreadable, or corrupt blob yields an empty map.
    pub fn get(&self) -> FavoritesMap {
        let raw = match self.store.get_raw(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return FavoritesMap::new(),
            Err(e) => {
                warn!(error = %e, "could not read favorites");
                return FavoritesMap::new();
            }
        };

        match serde_json::from_str::<FavoritesMap>(&raw) {
            Ok(map) => normalize(map),
            Err(e) => {
                warn!(error = %e, "favorites blob is corrupt, starting empty");
                FavoritesMap::new()
            }
        }
    }

    /// Replace the persisted favorites
    pub fn set(&self, map: &FavoritesMap) -> Result<()> {
        let raw = serde_json::to_string_pretty(map)
            .map_err(|e| SchemataError::Storage(format!("Failed to serialize favorites: {e}")))?;
        self.store.set_raw(FAVORITES_KEY, &raw).inspect_err(|e| {
            error!(error = %e, "could not save favorites");
        })?;
        debug!(count = map.len(), "favorites saved");
        Ok(())
    }

    /// Add the entry if absent, remove it if present
    ///
    /// Returns `true` when the entry is a favorite afterwards.
    pub fn toggle(&self, entry: &CatalogEntry) -> Result<bool> {
        let mut map = self.get();
        let added = if map.remove(&entry.url).is_some() {
            false
        } else {
            map.insert(entry.url.clone(), entry.clone());
            true
        };
        self.set(&map)?;
        Ok(added)
    }

    /// Add or replace a favorite
    pub fn add(&self, entry: &CatalogEntry) -> Result<()> {
        let mut map = self.get();
        map.insert(entry.url.clone(), entry.clone());
        self.set(&map)
    }

    /// Remove a favorite by URL, returning it if it existed
    pub fn remove(&self, url: &str) -> Result<Option<CatalogEntry>> {
        let mut map = self.get();
        let removed = map.remove(url);
        if removed.is_some() {
            self.set(&map)?;
        }
        Ok(removed)
    }

    /// Whether a URL is a favorite
    pub fn contains(&self, url: &str) -> bool {
        self.get().contains_key(url)
    }
}

/// Re-key entries whose key drifted from their own URL
fn normalize(map: FavoritesMap) -> FavoritesMap {
    if map.iter().all(|(url, entry)| *url == entry.url) {
        return map;
    }
    warn!("favorites keys did not match entry urls, re-keying");
    map.into_values().map(|e| (e.url.clone(), e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::storage::test_support::temp_store;
    use std::fs;

    fn temp_favorites(name: &str) -> FavoritesStore {
        FavoritesStore::new(temp_store(name))
    }

    fn cleanup(store: &FavoritesStore) {
        let _ = fs::remove_dir_all(store.store.dir());
    }

    fn eslint() -> CatalogEntry {
        CatalogEntry::new(".eslintrc", "https://json.schemastore.org/eslintrc.json")
            .with_description("ESLint configuration")
            .with_file_match(".eslintrc.json")
    }

    fn cargo() -> CatalogEntry {
        CatalogEntry::new("Cargo.toml", "https://json.schemastore.org/cargo.json")
            .with_version("0.1", "https://json.schemastore.org/cargo-0.1.json")
    }

    #[test]
    fn test_get_empty_when_missing() {
        let favorites = temp_favorites("missing");
        assert!(favorites.get().is_empty());
    }

    #[test]
    fn test_get_empty_when_corrupt() {
        let favorites = temp_favorites("corrupt");
        favorites.store.set_raw(FAVORITES_KEY, "{not json").unwrap();
        assert!(favorites.get().is_empty());
        cleanup(&favorites);
    }

    #[test]
    fn test_get_empty_when_wrong_shape() {
        let favorites = temp_favorites("shape");
        favorites.store.set_raw(FAVORITES_KEY, "[1, 2, 3]").unwrap();
        assert!(favorites.get().is_empty());
        cleanup(&favorites);
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let favorites = temp_favorites("roundtrip");
        let mut map = FavoritesMap::new();
        map.insert(eslint().url.clone(), eslint());
        map.insert(cargo().url.clone(), cargo());

        favorites.set(&map).unwrap();
        assert_eq!(favorites.get(), map);
        cleanup(&favorites);
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let favorites = temp_favorites("toggle");

        assert!(favorites.toggle(&eslint()).unwrap());
        assert!(favorites.contains(&eslint().url));

        assert!(!favorites.toggle(&eslint()).unwrap());
        assert!(!favorites.contains(&eslint().url));
        cleanup(&favorites);
    }

    #[test]
    fn test_toggle_twice_restores_original() {
        let favorites = temp_favorites("restore");
        favorites.add(&cargo()).unwrap();
        let before = favorites.get();

        favorites.toggle(&eslint()).unwrap();
        assert_eq!(favorites.get().len(), 2);
        favorites.toggle(&eslint()).unwrap();

        assert_eq!(favorites.get(), before);
        cleanup(&favorites);
    }

    #[test]
    fn test_key_matches_entry_url() {
        let favorites = temp_favorites("keys");
        favorites.toggle(&cargo()).unwrap();
        for (url, entry) in favorites.get() {
            assert_eq!(url, entry.url);
        }
        cleanup(&favorites);
    }

    #[test]
    fn test_mismatched_keys_are_rekeyed() {
        let favorites = temp_favorites("rekey");
        let blob = format!(
            "{{\"stale-key\": {}}}",
            serde_json::to_string(&cargo()).unwrap()
        );
        favorites.store.set_raw(FAVORITES_KEY, &blob).unwrap();

        let map = favorites.get();
        assert!(map.contains_key(&cargo().url));
        assert!(!map.contains_key("stale-key"));
        cleanup(&favorites);
    }

    #[test]
    fn test_remove() {
        let favorites = temp_favorites("remove");
        favorites.add(&eslint()).unwrap();

        let removed = favorites.remove(&eslint().url).unwrap();
        assert_eq!(removed, Some(eslint()));
        assert_eq!(favorites.remove(&eslint().url).unwrap(), None);
        cleanup(&favorites);
    }

    #[test]
    fn test_persistence_preserves_all_fields() {
        let favorites = temp_favorites("fields");
        favorites.add(&cargo()).unwrap();
        favorites.add(&eslint()).unwrap();

        let reopened = FavoritesStore::new(KeyValueStore::with_dir(favorites.store.dir()));
        let map = reopened.get();
        assert_eq!(map[&cargo().url].version_labels(), vec!["0.1"]);
        assert_eq!(map[&eslint().url].file_patterns(), [".eslintrc.json".to_string()]);
        assert_eq!(map[&eslint().url].description, "ESLint configuration");
        cleanup(&favorites);
    }

    #[test]
    fn test_set_failure_is_reported() {
        let favorites = temp_favorites("readonly");
        // A file where the directory should be makes every write fail
        let dir = favorites.store.dir().to_path_buf();
        fs::write(&dir, "occupied").unwrap();

        let result = favorites.set(&FavoritesMap::new());
        assert!(result.is_err());

        let _ = fs::remove_file(&dir);
    }
}
