use crate::catalog::Catalog;
use crate::progress::ProgressTracker;
use crate::session::WordSource;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// History that decides whether a daily word is interleaved next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionContext {
    pub words_completed: usize,
    pub last_was_daily: bool,
}

impl SelectionContext {
    /// Context for an explicitly chosen theme: never opens with a daily word
    pub fn theme_only() -> Self {
        Self::default()
    }

    /// A daily word is served after a theme word has been completed, and never twice in a row
    pub fn daily_gate_open(&self) -> bool {
        !self.last_was_daily && self.words_completed > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub word: String,
    pub source: WordSource,
    /// Theme the round belongs to; differs from the requested theme when it was exhausted
    pub theme: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    Word(Selection),
    AllCategoriesComplete,
}

/// Choose the next target word.
///
/// Order of preference: a daily word when the gate is open, the current
/// theme, the first theme in catalog order with words left, then the daily
/// pool regardless of the gate.
pub fn select_next<R: Rng + ?Sized>(
    catalog_key: &str,
    catalog: &Catalog,
    current_theme: &str,
    progress: &ProgressTracker,
    ctx: SelectionContext,
    rng: &mut R,
) -> SelectOutcome {
    if ctx.daily_gate_open() {
        if let Some(word) = pick_daily(catalog_key, catalog, progress, rng) {
            return daily(word, current_theme);
        }
    }

    if let Some(theme) = catalog.theme(current_theme) {
        let available = progress.available_words(catalog_key, current_theme, theme);
        if let Some(word) = available.choose(rng) {
            return themed(word, current_theme);
        }
    }

    for (key, theme) in &catalog.themes {
        let available = progress.available_words(catalog_key, key, theme);
        if let Some(word) = available.choose(rng) {
            debug!(from = %current_theme, to = %key, "switching to next theme with words left");
            return themed(word, key);
        }
    }

    if let Some(word) = pick_daily(catalog_key, catalog, progress, rng) {
        return daily(word, current_theme);
    }

    debug!(catalog = %catalog_key, "no words left anywhere");
    SelectOutcome::AllCategoriesComplete
}

fn pick_daily<'a, R: Rng + ?Sized>(
    catalog_key: &str,
    catalog: &'a Catalog,
    progress: &ProgressTracker,
    rng: &mut R,
) -> Option<&'a str> {
    let mut candidates = progress.available_daily(catalog_key, catalog);
    let used = progress.daily_consumed(catalog_key);

    // a cycle that covers the pool must not reopen with the word just played
    if used.len() == catalog.daily_words.len() && candidates.len() > 1 {
        if let Some(last) = used.last() {
            candidates.retain(|word| *word != last.as_str());
        }
    }

    candidates.choose(rng).copied()
}

fn themed(word: &str, theme: &str) -> SelectOutcome {
    SelectOutcome::Word(Selection {
        word: word.to_string(),
        source: WordSource::Theme,
        theme: theme.to_string(),
    })
}

fn daily(word: &str, theme: &str) -> SelectOutcome {
    SelectOutcome::Word(Selection {
        word: word.to_string(),
        source: WordSource::Daily,
        theme: theme.to_string(),
    })
}
