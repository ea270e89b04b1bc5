//! Configuration constants for schemata

/// Application metadata
pub mod app {
    /// Application name (used for config and cache directories)
    pub const NAME: &str = "schemata";
}

/// Network-related configuration
pub mod network {
    /// User agent for HTTP requests
    pub const USER_AGENT: &str = concat!("schemata/", env!("CARGO_PKG_VERSION"));

    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Total request timeout in seconds
    pub const READ_TIMEOUT_SECS: u64 = 30;
}

/// Catalog-related configuration
pub mod catalog {
    /// Default SchemaStore catalog endpoint
    pub const SCHEMASTORE_CATALOG_URL: &str = "https://www.schemastore.org/api/json/catalog.json";

    /// Display name of the default catalog
    pub const SCHEMASTORE_NAME: &str = "SchemaStore";
}

/// Persisted storage keys
pub mod storage {
    /// Key holding the serialized favorites map
    pub const FAVORITES_KEY: &str = "favorites";

    /// Key holding user settings
    pub const SETTINGS_KEY: &str = "settings";

    /// File extension appended to every key
    pub const KEY_EXTENSION: &str = "json";
}
