//! SchemaStore catalog source
//!
//! Implementation of `CatalogSource` for the SchemaStore catalog
//! (<https://www.schemastore.org/>).

use crate::config::catalog::{SCHEMASTORE_CATALOG_URL, SCHEMASTORE_NAME};
use crate::error::{Result, SchemataError};
use crate::network::HttpClient;

use super::traits::CatalogSource;
use super::types::{CatalogDocument, CatalogEntry};

use tracing::debug;

/// Parse a catalog document and extract its schema list
///
/// Entries that do not parse are skipped; only a document without a
/// `schemas` list is an error.
pub fn parse_catalog(body: &str) -> Result<Vec<CatalogEntry>> {
    let doc: CatalogDocument = serde_json::from_str(body)
        .map_err(|e| SchemataError::Parse(format!("Malformed catalog: {e}")))?;
    Ok(doc.into_entries())
}

/// SchemaStore catalog source
///
/// Fetches the public catalog, or any document with the same shape when
/// given a custom URL.
pub struct SchemaStoreCatalog {
    client: HttpClient,
    url: String,
}

impl SchemaStoreCatalog {
    /// Create a source for the default catalog
    pub fn new() -> Result<Self> {
        Self::with_url(SCHEMASTORE_CATALOG_URL)
    }

    /// Create a source for a custom catalog URL (mirrors, testing)
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new()?,
            url: url.into(),
        })
    }

    /// The catalog URL this source reads
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CatalogSource for SchemaStoreCatalog {
    fn name(&self) -> &str {
        SCHEMASTORE_NAME
    }

    fn fetch(&self) -> Result<Vec<CatalogEntry>> {
        let doc: CatalogDocument = self.client.get_json(&self.url)?;
        let schemas = doc.into_entries();
        debug!(url = %self.url, count = schemas.len(), "catalog fetched");
        Ok(schemas)
    }
}
