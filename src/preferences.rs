use crate::store::{load_json, remove_key, save_json, KeyValueStore};
use tracing::debug;

pub const EASY_MODE_KEY: &str = "wordelish-easy-mode";
pub const DARK_MODE_KEY: &str = "wordelish-dark-mode";
pub const SHOW_HINTS_KEY: &str = "wordelish-show-hints";
pub const CATALOG_KEY: &str = "wordelish-catalog";

/// Player settings. Each one lives under its own store key and is written
/// as soon as it changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub easy_mode: bool,
    pub dark_mode: bool,
    pub show_hints: bool,
    /// `None` means the first catalog in the library
    pub selected_catalog: Option<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            easy_mode: false,
            dark_mode: false,
            show_hints: true,
            selected_catalog: None,
        }
    }
}

impl Preferences {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        let prefs = Self {
            easy_mode: load_json(store, EASY_MODE_KEY).unwrap_or(defaults.easy_mode),
            dark_mode: load_json(store, DARK_MODE_KEY).unwrap_or(defaults.dark_mode),
            show_hints: load_json(store, SHOW_HINTS_KEY).unwrap_or(defaults.show_hints),
            selected_catalog: load_json(store, CATALOG_KEY),
        };
        debug!(?prefs, "loaded preferences");
        prefs
    }

    pub fn set_easy_mode(&mut self, store: &dyn KeyValueStore, on: bool) {
        self.easy_mode = on;
        save_json(store, EASY_MODE_KEY, &on);
    }

    pub fn set_dark_mode(&mut self, store: &dyn KeyValueStore, on: bool) {
        self.dark_mode = on;
        save_json(store, DARK_MODE_KEY, &on);
    }

    pub fn set_show_hints(&mut self, store: &dyn KeyValueStore, on: bool) {
        self.show_hints = on;
        save_json(store, SHOW_HINTS_KEY, &on);
    }

    pub fn set_selected_catalog(&mut self, store: &dyn KeyValueStore, catalog: Option<&str>) {
        self.selected_catalog = catalog.map(str::to_string);
        match catalog {
            Some(key) => save_json(store, CATALOG_KEY, &key),
            None => remove_key(store, CATALOG_KEY),
        }
    }
}
