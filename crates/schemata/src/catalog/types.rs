//! Catalog data types
//!
//! Mirrors the SchemaStore catalog format (`{ "schemas": [...] }`).

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A single JSON Schema listed in a catalog
///
/// `url` is the unique key. Entries are treated as immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    /// Display name
    pub name: String,
    /// Short description (empty when the catalog has none or `null`)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Schema document URL
    pub url: String,
    /// Alternate versions (label -> url)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions: Option<BTreeMap<String, String>>,
    /// File glob patterns this schema applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_match: Option<Vec<String>>,
}

impl CatalogEntry {
    /// Create an entry with minimal info
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            url: url.into(),
            versions: None,
            file_match: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a version label and its URL
    pub fn with_version(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.versions
            .get_or_insert_with(BTreeMap::new)
            .insert(label.into(), url.into());
        self
    }

    /// Add a file-match pattern
    pub fn with_file_match(mut self, pattern: impl Into<String>) -> Self {
        self.file_match
            .get_or_insert_with(Vec::new)
            .push(pattern.into());
        self
    }

    /// Version labels in display order
    pub fn version_labels(&self) -> Vec<&str> {
        self.versions
            .as_ref()
            .map(|v| v.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// URL for a version label, or the main URL when `None` or unknown
    pub fn url_for(&self, version: Option<&str>) -> &str {
        version
            .and_then(|label| self.versions.as_ref()?.get(label))
            .map(String::as_str)
            .unwrap_or(&self.url)
    }

    /// File-match patterns (empty when the catalog lists none)
    pub fn file_patterns(&self) -> &[String] {
        self.file_match.as_deref().unwrap_or(&[])
    }

    /// Case-insensitive match against name, description, and file patterns
    ///
    /// `query` must already be lowercase. An empty query matches everything.
    pub fn matches_lowercase(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(query)
            || self.description.to_lowercase().contains(query)
            || self
                .file_patterns()
                .iter()
                .any(|p| p.to_lowercase().contains(query))
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The remote catalog document
///
/// Entries stay raw until `into_entries` so one bad entry cannot sink the
/// whole list.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogDocument {
    pub schemas: Vec<serde_json::Value>,
}

impl CatalogDocument {
    /// Convert the entries that parse, skipping the rest
    pub fn into_entries(self) -> Vec<CatalogEntry> {
        let total = self.schemas.len();
        let entries: Vec<CatalogEntry> = self
            .schemas
            .into_iter()
            .filter_map(|raw| match serde_json::from_value(raw) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(error = %e, "skipping catalog entry");
                    None
                }
            })
            .collect();
        if entries.len() < total {
            warn!(skipped = total - entries.len(), total, "catalog entries skipped");
        }
        entries
    }
}
