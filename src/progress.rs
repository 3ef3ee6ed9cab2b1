use crate::catalog::{daily_key, theme_key, Catalog, ContentLibrary, Theme};
use crate::store::{load_json, save_json, KeyValueStore};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const PROGRESS_KEY: &str = "wordelish-progress";
pub const SOLVED_KEY: &str = "wordelish-solved";

/// Raised when recording a play uses up the last word of a theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    CategoryCompleted { catalog: String, theme: String },
}

/// Which words have been played and solved, per theme and per daily pool.
///
/// Theme lists behave as sets. The daily list is ordered, most recent last,
/// and wraps around once the whole pool has been played.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressTracker {
    consumed: BTreeMap<String, Vec<String>>,
    solved: BTreeMap<String, Vec<String>>,
    words_completed: usize,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        let consumed: BTreeMap<String, Vec<String>> =
            load_json(store, PROGRESS_KEY).unwrap_or_default();
        let solved: BTreeMap<String, Vec<String>> =
            load_json(store, SOLVED_KEY).unwrap_or_default();
        debug!(
            consumed_keys = consumed.len(),
            solved_keys = solved.len(),
            "loaded progress"
        );

        Self {
            consumed,
            solved,
            words_completed: 0,
        }
    }

    pub fn persist(&self, store: &dyn KeyValueStore) {
        save_json(store, PROGRESS_KEY, &self.consumed);
        save_json(store, SOLVED_KEY, &self.solved);
    }

    /// Theme words completed in this process; opens the daily-word gate
    pub fn words_completed(&self) -> usize {
        self.words_completed
    }

    pub fn consumed(&self, key: &str) -> &[String] {
        self.consumed.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn solved(&self, key: &str) -> &[String] {
        self.solved.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn solved_count(&self, key: &str) -> usize {
        self.solved(key).len()
    }

    pub fn daily_consumed(&self, catalog_key: &str) -> &[String] {
        self.consumed(&daily_key(catalog_key))
    }

    /// Theme words not yet played, in theme order
    pub fn available_words<'a>(
        &self,
        catalog_key: &str,
        theme_key_str: &str,
        theme: &'a Theme,
    ) -> Vec<&'a str> {
        let used = self.consumed(&theme_key(catalog_key, theme_key_str));
        theme
            .words
            .iter()
            .filter(|word| !used.contains(word))
            .map(String::as_str)
            .collect()
    }

    /// Daily words not yet played in the current cycle, in pool order
    pub fn available_daily<'a>(&self, catalog_key: &str, catalog: &'a Catalog) -> Vec<&'a str> {
        let used = self.daily_consumed(catalog_key);
        catalog
            .daily_words
            .iter()
            .filter(|word| !used.contains(word))
            .map(String::as_str)
            .collect()
    }

    pub fn is_theme_exhausted(&self, catalog_key: &str, theme_key_str: &str, theme: &Theme) -> bool {
        self.available_words(catalog_key, theme_key_str, theme)
            .is_empty()
    }

    /// Every theme exhausted; the daily pool does not count
    pub fn is_catalog_exhausted(&self, catalog_key: &str, catalog: &Catalog) -> bool {
        catalog
            .themes
            .iter()
            .all(|(key, theme)| self.is_theme_exhausted(catalog_key, key, theme))
    }

    /// Record a completed (won or lost) play of `word`
    pub fn record_played(
        &mut self,
        catalog_key: &str,
        catalog: &Catalog,
        theme_key_str: &str,
        word: &str,
        is_daily: bool,
    ) -> Option<ProgressEvent> {
        if is_daily {
            let pool_size = catalog.daily_words.len();
            let used = self.consumed.entry(daily_key(catalog_key)).or_default();
            used.push(word.to_string());
            if used.len() >= pool_size {
                // keep the last word so the next cycle does not open with it
                *used = vec![word.to_string()];
                debug!(catalog = %catalog_key, "daily pool cycled");
            }
            return None;
        }

        let used = self
            .consumed
            .entry(theme_key(catalog_key, theme_key_str))
            .or_default();
        let inserted = !used.iter().any(|w| w == word);
        if inserted {
            used.push(word.to_string());
        }
        self.words_completed += 1;

        let theme = catalog.theme(theme_key_str)?;
        if inserted && self.is_theme_exhausted(catalog_key, theme_key_str, theme) {
            info!(catalog = %catalog_key, theme = %theme_key_str, "category completed");
            return Some(ProgressEvent::CategoryCompleted {
                catalog: catalog_key.to_string(),
                theme: theme_key_str.to_string(),
            });
        }
        None
    }

    pub fn record_solved(&mut self, catalog_key: &str, theme_key_str: &str, word: &str, is_daily: bool) {
        let key = if is_daily {
            daily_key(catalog_key)
        } else {
            theme_key(catalog_key, theme_key_str)
        };
        let solved = self.solved.entry(key).or_default();
        if !solved.iter().any(|w| w == word) {
            solved.push(word.to_string());
        }
    }

    /// Forget everything played and solved in every catalog
    pub fn reset(&mut self, library: &ContentLibrary) {
        self.consumed.clear();
        self.solved.clear();
        for (catalog_key, catalog) in &library.catalogs {
            for theme in catalog.theme_keys() {
                self.consumed.insert(theme_key(catalog_key, theme), Vec::new());
            }
            self.consumed.insert(daily_key(catalog_key), Vec::new());
        }
        self.words_completed = 0;
        info!("progress reset");
    }
}
