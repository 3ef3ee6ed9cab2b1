pub mod core;

// Re-export the main types for convenience
pub use self::core::{
    Catalog, CatalogError, CatalogSource, ContentLibrary, Theme, DAILY_HINT_PLACEHOLDER,
    MAX_WORD_GLYPHS, MIN_WORD_GLYPHS, THEME_HINT_PLACEHOLDER,
};

/// Storage key for a theme's consumption and solved lists
pub fn theme_key(catalog: &str, theme: &str) -> String {
    format!("{catalog}_{theme}")
}

/// Storage key for a catalog's daily pool
pub fn daily_key(catalog: &str) -> String {
    format!("{catalog}_daily")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys() {
        assert_eq!(theme_key("main", "אנימה"), "main_אנימה");
        assert_eq!(daily_key("trash"), "trash_daily");
    }
}
