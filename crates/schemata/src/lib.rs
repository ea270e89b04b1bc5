//! Schemata — JSON Schema catalog services
//!
//! Catalog fetching, favorites persistence, and the list model shared by
//! every frontend.
//!
//! ## Quick start
//!
//! ```no_run
//! use schemata::catalog::{fetch_or_empty, SchemaStoreCatalog};
//! use schemata::data::FavoritesStore;
//! use schemata::notice::LogNotifier;
//! ```

pub mod actions;
pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod network;
pub mod notice;
pub mod view;

pub use catalog::CatalogEntry;
pub use error::{Result, SchemataError};
