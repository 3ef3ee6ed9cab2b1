use include_dir::{include_dir, Dir};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

static CATALOG_DIR: Dir = include_dir!("src/catalogs");

/// File name of the catalog document embedded in the binary
pub const BUNDLED_FILE: &str = "catalogs.json";

/// Shortest and longest word the board is laid out for
pub const MIN_WORD_GLYPHS: usize = 2;
pub const MAX_WORD_GLYPHS: usize = 8;

pub const THEME_HINT_PLACEHOLDER: &str = "מילה מעניינת!";
pub const DAILY_HINT_PLACEHOLDER: &str = "מילה שימושית!";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bundled catalog file {0} is missing")]
    MissingBundled(String),
    #[error("catalog document is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog document is invalid: {0}")]
    Invalid(String),
}

/// A category of words sharing a topic
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub words: Vec<String>,
    pub hints: HashMap<String, String>,
}

impl Theme {
    /// Icon and name, the way theme pickers show it
    pub fn label(&self) -> String {
        if self.icon.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.icon, self.name)
        }
    }
}

/// A named bundle of themes plus a daily-word pool
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub themes: IndexMap<String, Theme>,
    pub daily_words: Vec<String>,
    pub daily_hints: HashMap<String, String>,
}

impl Catalog {
    pub fn theme(&self, key: &str) -> Option<&Theme> {
        self.themes.get(key)
    }

    pub fn theme_keys(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn first_theme_key(&self) -> Option<&str> {
        self.themes.keys().next().map(String::as_str)
    }

    /// Hint text for a target word.
    ///
    /// Daily words only look at the daily hints. Theme words are searched
    /// across every theme of the catalog, in order.
    pub fn hint_for(&self, word: &str, is_daily: bool) -> &str {
        if is_daily {
            return self
                .daily_hints
                .get(word)
                .map(String::as_str)
                .unwrap_or(DAILY_HINT_PLACEHOLDER);
        }

        self.themes
            .values()
            .find_map(|theme| theme.hints.get(word))
            .map(String::as_str)
            .unwrap_or(THEME_HINT_PLACEHOLDER)
    }
}

/// Every catalog known to the game, in document order
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ContentLibrary {
    #[serde(default)]
    pub version: String,
    pub catalogs: IndexMap<String, Catalog>,
}

impl ContentLibrary {
    /// Parse and validate a catalog document. Nothing is partially applied:
    /// any missing field rejects the whole document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let library: ContentLibrary = serde_json::from_str(json)?;
        library.validate()?;
        Ok(library)
    }

    pub fn bundled() -> Result<Self, CatalogError> {
        let file = CATALOG_DIR
            .get_file(BUNDLED_FILE)
            .ok_or_else(|| CatalogError::MissingBundled(BUNDLED_FILE.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| CatalogError::Invalid("bundled catalog is not utf-8".to_string()))?;

        Self::from_json(contents)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.catalogs.is_empty() {
            return Err(CatalogError::Invalid("no catalogs defined".to_string()));
        }

        for (key, catalog) in &self.catalogs {
            if catalog.themes.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "catalog {key} has no themes"
                )));
            }

            for (theme_key, theme) in &catalog.themes {
                for word in &theme.words {
                    let glyphs = word.chars().count();
                    if !(MIN_WORD_GLYPHS..=MAX_WORD_GLYPHS).contains(&glyphs) {
                        warn!(catalog = %key, theme = %theme_key, %word, glyphs, "word length outside board range");
                    }
                    if !theme.hints.contains_key(word) {
                        warn!(catalog = %key, theme = %theme_key, %word, "word has no hint");
                    }
                }
            }
        }

        Ok(())
    }

    pub fn catalog(&self, key: &str) -> Option<&Catalog> {
        self.catalogs.get(key)
    }

    pub fn catalog_keys(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    pub fn first_catalog_key(&self) -> Option<&str> {
        self.catalogs.keys().next().map(String::as_str)
    }

    /// Find a catalog by its map key, its id, or its slug
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.catalogs
            .iter()
            .find(|(key, catalog)| {
                key.as_str() == name
                    || catalog.id == name
                    || catalog.slug.as_deref() == Some(name)
            })
            .map(|(key, _)| key.as_str())
    }
}

/// Where the content library comes from
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    Bundled,
    File(PathBuf),
}

impl CatalogSource {
    pub fn load(&self) -> Result<ContentLibrary, CatalogError> {
        let library = match self {
            CatalogSource::Bundled => ContentLibrary::bundled()?,
            CatalogSource::File(path) => ContentLibrary::from_path(path)?,
        };
        info!(
            source = ?self,
            version = %library.version,
            catalogs = library.catalogs.len(),
            "content library loaded"
        );
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    const SMALL: &str = r#"
    {
        "version": "test",
        "catalogs": {
            "main": {
                "name": "Main",
                "id": "main-id",
                "slug": "main-slug",
                "themes": {
                    "b": { "name": "B", "icon": "🅱", "words": ["אבג"], "hints": { "אבג": "first" } },
                    "a": { "name": "A", "words": ["דהו", "זחט"], "hints": { "דהו": "second" } }
                },
                "dailyWords": ["יכל"],
                "dailyHints": {}
            }
        }
    }
    "#;

    #[test]
    fn test_bundled_library_loads() {
        let library = ContentLibrary::bundled().unwrap();

        assert_eq!(library.first_catalog_key(), Some("main"));
        let main = library.catalog("main").unwrap();
        assert_eq!(main.id, "teen-staff");
        assert_eq!(main.first_theme_key(), Some("אנימה"));
        assert_eq!(main.daily_words.len(), 34);
        assert!(library.catalog("trash").is_some());
    }

    #[test]
    fn test_theme_order_follows_document() {
        let library = ContentLibrary::from_json(SMALL).unwrap();
        let keys: Vec<&str> = library.catalog("main").unwrap().theme_keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_missing_icon_defaults_to_empty() {
        let library = ContentLibrary::from_json(SMALL).unwrap();
        let theme = library.catalog("main").unwrap().theme("a").unwrap();
        assert_eq!(theme.icon, "");
        assert_eq!(theme.label(), "A");
    }

    #[test]
    fn test_missing_required_field_rejects_document() {
        let json = SMALL.replace(r#""dailyHints": {}"#, r#""unused": {}"#);
        assert_matches!(ContentLibrary::from_json(&json), Err(CatalogError::Parse(_)));

        let json = SMALL.replace(r#""hints": { "אבג": "first" }"#, r#""tips": {}"#);
        assert_matches!(ContentLibrary::from_json(&json), Err(CatalogError::Parse(_)));
    }

    #[test]
    fn test_missing_catalogs_rejects_document() {
        assert_matches!(
            ContentLibrary::from_json(r#"{ "version": "1" }"#),
            Err(CatalogError::Parse(_))
        );
        assert_matches!(
            ContentLibrary::from_json(r#"{ "version": "1", "catalogs": {} }"#),
            Err(CatalogError::Invalid(_))
        );
    }

    #[test]
    fn test_hint_lookup_and_placeholders() {
        let library = ContentLibrary::from_json(SMALL).unwrap();
        let catalog = library.catalog("main").unwrap();

        assert_eq!(catalog.hint_for("אבג", false), "first");
        assert_eq!(catalog.hint_for("דהו", false), "second");
        assert_eq!(catalog.hint_for("זחט", false), THEME_HINT_PLACEHOLDER);
        assert_eq!(catalog.hint_for("יכל", true), DAILY_HINT_PLACEHOLDER);
    }

    #[test]
    fn test_resolve_by_key_id_or_slug() {
        let library = ContentLibrary::from_json(SMALL).unwrap();
        assert_eq!(library.resolve("main"), Some("main"));
        assert_eq!(library.resolve("main-id"), Some("main"));
        assert_eq!(library.resolve("main-slug"), Some("main"));
        assert_eq!(library.resolve("nope"), None);
    }

    #[test]
    fn test_bundled_slugs_resolve() {
        let library = ContentLibrary::bundled().unwrap();
        assert_eq!(library.resolve("israeli-trash-p3n8q"), Some("trash"));
        assert_eq!(library.resolve("teen-staff-x7k9m"), Some("main"));
    }

    #[test]
    fn test_load_from_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SMALL.as_bytes()).unwrap();

        let library = CatalogSource::File(file.path().to_path_buf()).load().unwrap();
        assert_eq!(library.version, "test");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = CatalogSource::File(PathBuf::from("/definitely/not/here.json"));
        assert_matches!(source.load(), Err(CatalogError::Io { .. }));
    }
}
