//! List presentation model
//!
//! Builds the Favorites and Results sections shown by a frontend. Filtering
//! follows what a host list widget offers natively: a case-insensitive
//! substring match on the name, with description and file patterns as
//! keywords.

use crate::catalog::CatalogEntry;
use crate::data::FavoritesMap;

/// Which data source a section comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Favorites,
    Results,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Favorites => "Favorites",
            SectionKind::Results => "Results",
        }
    }
}

/// A single list row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub entry: &'a CatalogEntry,
    pub is_favorite: bool,
}

/// A titled group of rows
#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub kind: SectionKind,
    pub rows: Vec<Row<'a>>,
}

/// Both sections, filtered by the current query
#[derive(Debug, Clone, Default)]
pub struct ListView<'a> {
    sections: Vec<Section<'a>>,
}

impl<'a> ListView<'a> {
    /// Build the view from both data sources
    ///
    /// Favorites are ordered by name; results keep catalog order.
    /// Sections with no matching rows are omitted.
    pub fn build(favorites: &'a FavoritesMap, results: &'a [CatalogEntry], query: &str) -> Self {
        let query = query.trim().to_lowercase();

        let mut favorite_rows: Vec<Row<'a>> = favorites
            .values()
            .filter(|e| e.matches_lowercase(&query))
            .map(|entry| Row {
                entry,
                is_favorite: true,
            })
            .collect();
        favorite_rows.sort_by_cached_key(|r| r.entry.name.to_lowercase());

        let result_rows: Vec<Row<'a>> = results
            .iter()
            .filter(|e| e.matches_lowercase(&query))
            .map(|entry| Row {
                entry,
                is_favorite: favorites.contains_key(&entry.url),
            })
            .collect();

        let sections = [
            (SectionKind::Favorites, favorite_rows),
            (SectionKind::Results, result_rows),
        ]
        .into_iter()
        .filter(|(_, rows)| !rows.is_empty())
        .map(|(kind, rows)| Section { kind, rows })
        .collect();

        Self { sections }
    }

    pub fn sections(&self) -> &[Section<'a>] {
        &self.sections
    }

    /// Total rows across sections
    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Row at a flat index (sections concatenated in order)
    pub fn row(&self, index: usize) -> Option<(SectionKind, Row<'a>)> {
        self.iter().nth(index)
    }

    /// All rows with their section, in display order
    pub fn iter(&self) -> impl Iterator<Item = (SectionKind, Row<'a>)> + '_ {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter().map(move |r| (s.kind, *r)))
    }

    /// Section sizes, for "Results (12)" style headers
    pub fn count(&self, kind: SectionKind) -> usize {
        self.sections
            .iter()
            .find(|s| s.kind == kind)
            .map_or(0, |s| s.rows.len())
    }
}
