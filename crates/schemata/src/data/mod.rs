//! Data persistence
//!
//! Handles favorites, settings, and the key-value storage beneath them.

pub mod favorites;
pub mod settings;
pub mod storage;

// Re-export common types
pub use favorites::{FavoritesMap, FavoritesStore};
pub use settings::Settings;
pub use storage::{cache_dir, config_dir, KeyValueStore};
