//! Schema catalogs
//!
//! Sources for discovering JSON Schemas, and the non-fatal fetch used by
//! every frontend.

pub mod schemastore;
pub mod traits;
pub mod types;

// Re-exports
pub use schemastore::{parse_catalog, SchemaStoreCatalog};
pub use traits::CatalogSource;
pub use types::CatalogEntry;

use crate::notice::{Notice, Notifier};
use tracing::warn;

/// Fetch a catalog, degrading to an empty list on failure
///
/// Network and parse failures are reported through `notifier` and never
/// propagate to the caller.
pub fn fetch_or_empty<S, N>(source: &S, notifier: &N) -> Vec<CatalogEntry>
where
    S: CatalogSource + ?Sized,
    N: Notifier + ?Sized,
{
    match source.fetch() {
        Ok(schemas) => schemas,
        Err(e) => {
            warn!(catalog = source.name(), error = %e, "catalog fetch failed");
            notifier.notify(Notice::failure(
                format!("Could not load {}", source.name()),
                e.to_string(),
            ));
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SchemataError};
    use crate::network::client::test_server::{refused_url, serve_once};
    use crate::notice::CollectingNotifier;

    /// A catalog backed by a fixed list
    struct MockCatalog {
        schemas: Vec<CatalogEntry>,
    }

    impl CatalogSource for MockCatalog {
        fn name(&self) -> &str {
            "Mock"
        }

        fn fetch(&self) -> Result<Vec<CatalogEntry>> {
            Ok(self.schemas.clone())
        }
    }

    /// A catalog that always errors
    struct FailingCatalog;

    impl CatalogSource for FailingCatalog {
        fn name(&self) -> &str {
            "Failing"
        }

        fn fetch(&self) -> Result<Vec<CatalogEntry>> {
            Err(SchemataError::Parse("Malformed catalog".into()))
        }
    }

    #[test]
    fn test_fetch_or_empty_success() {
        let source = MockCatalog {
            schemas: vec![CatalogEntry::new("a", "https://a.test")],
        };
        let notifier = CollectingNotifier::new();
        let schemas = fetch_or_empty(&source, &notifier);
        assert_eq!(schemas.len(), 1);
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_fetch_or_empty_reports_failure() {
        let notifier = CollectingNotifier::new();
        let schemas = fetch_or_empty(&FailingCatalog, &notifier);
        assert!(schemas.is_empty());

        let notices = notifier.drain();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].is_failure());
        assert_eq!(notices[0].title, "Could not load Failing");
    }

    #[test]
    fn test_fetch_or_empty_network_failure() {
        let source = SchemaStoreCatalog::with_url(refused_url()).unwrap();
        let notifier = CollectingNotifier::new();
        assert!(fetch_or_empty(&source, &notifier).is_empty());
        assert_eq!(notifier.drain().len(), 1);
    }

    #[test]
    fn test_fetch_or_empty_http_error() {
        let base = serve_once("500 Internal Server Error", String::new());
        let source = SchemaStoreCatalog::with_url(base).unwrap();
        let notifier = CollectingNotifier::new();
        assert!(fetch_or_empty(&source, &notifier).is_empty());
        let notices = notifier.drain();
        assert!(notices[0].line().contains("HTTP 500"));
    }

    #[test]
    fn test_fetch_or_empty_trait_object() {
        let source: Box<dyn CatalogSource> = Box::new(FailingCatalog);
        let notifier = CollectingNotifier::new();
        assert!(fetch_or_empty(source.as_ref(), &notifier).is_empty());
    }
}
