//! Catalog source trait
//!
//! Defines the interface every schema catalog must implement.

use crate::error::Result;

use super::types::CatalogEntry;

/// A source of JSON Schema listings
pub trait CatalogSource: Send + Sync {
    /// Display name for the catalog (e.g., "SchemaStore")
    fn name(&self) -> &str;

    /// Fetch the full list of schemas
    fn fetch(&self) -> Result<Vec<CatalogEntry>>;
}
