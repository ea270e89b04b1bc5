//! Row actions
//!
//! The actions every list row offers. Performing them is up to the
//! frontend, since clipboard and browser access are host concerns.

/// An action available on a schema row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaAction {
    /// Insert a `$schema` reference into the user's document
    PasteSnippet,
    /// Copy the schema URL to the clipboard
    CopyUrl,
    /// Open the schema URL in the default browser
    OpenInBrowser,
    /// Add or remove the schema from favorites
    ToggleFavorite,
}

impl SchemaAction {
    /// All actions in menu order
    pub const ALL: [SchemaAction; 4] = [
        SchemaAction::PasteSnippet,
        SchemaAction::CopyUrl,
        SchemaAction::OpenInBrowser,
        SchemaAction::ToggleFavorite,
    ];

    /// Menu label; the favorite action depends on current state
    pub fn label(self, is_favorite: bool) -> &'static str {
        match self {
            SchemaAction::PasteSnippet => "Paste $schema",
            SchemaAction::CopyUrl => "Copy URL",
            SchemaAction::OpenInBrowser => "Open in Browser",
            SchemaAction::ToggleFavorite if is_favorite => "Remove from Favorites",
            SchemaAction::ToggleFavorite => "Add to Favorites",
        }
    }

    /// Key shown next to the label
    pub fn key_hint(self) -> &'static str {
        match self {
            SchemaAction::PasteSnippet => "enter",
            SchemaAction::CopyUrl => "c",
            SchemaAction::OpenInBrowser => "o",
            SchemaAction::ToggleFavorite => "f",
        }
    }
}

/// The `$schema` property referencing `url`
///
/// The URL is JSON-escaped so the snippet is always valid inside an object.
pub fn schema_snippet(url: &str) -> String {
    let quoted = serde_json::to_string(url).unwrap_or_else(|_| format!("\"{url}\""));
    format!("\"$schema\": {quoted}")
}
