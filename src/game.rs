use crate::catalog::{Catalog, CatalogError, CatalogSource, ContentLibrary};
use crate::dialog::{DialogSequencer, Modal, NextStep, RoundResult};
use crate::keyboard::Key;
use crate::preferences::Preferences;
use crate::progress::{ProgressEvent, ProgressTracker};
use crate::selector::{select_next, SelectOutcome, SelectionContext};
use crate::session::{GameSession, SubmitOutcome, WordSource};
use crate::stats::{Statistics, StatisticsAggregator};
use crate::store::KeyValueStore;
use rand::rngs::StdRng;
use tracing::{debug, error, info, warn};

pub const REFRESH_OK_MESSAGE: &str = "הקטלוג עודכן";
pub const REFRESH_FAILED_MESSAGE: &str = "טעינת הקטלוג נכשלה";

#[derive(Debug)]
pub enum Phase {
    /// No content library loaded yet; every game operation is inert
    NotReady,
    Playing(GameSession),
    /// The selector found nothing left in the current catalog
    AllComplete,
}

/// Per-theme counts for pickers and the settings overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSummary {
    pub key: String,
    pub label: String,
    pub total: usize,
    pub available: usize,
    pub solved: usize,
}

impl ThemeSummary {
    pub fn is_exhausted(&self) -> bool {
        self.available == 0
    }
}

/// The application context: content, persisted state and the current round.
pub struct Game {
    store: Box<dyn KeyValueStore>,
    source: Option<CatalogSource>,
    library: Option<ContentLibrary>,
    prefs: Preferences,
    progress: ProgressTracker,
    stats: StatisticsAggregator,
    dialogs: DialogSequencer,
    catalog: String,
    theme: String,
    phase: Phase,
    last_was_daily: bool,
    rng: StdRng,
    debug: bool,
    status: Option<String>,
}

impl Game {
    pub fn new(store: Box<dyn KeyValueStore>, rng: StdRng) -> Self {
        let prefs = Preferences::load(store.as_ref());
        let progress = ProgressTracker::load(store.as_ref());
        let stats = StatisticsAggregator::load(store.as_ref());

        Self {
            store,
            source: None,
            library: None,
            prefs,
            progress,
            stats,
            dialogs: DialogSequencer::new(),
            catalog: String::new(),
            theme: String::new(),
            phase: Phase::NotReady,
            last_was_daily: false,
            rng,
            debug: false,
            status: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.library.is_some()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> Option<&GameSession> {
        match &self.phase {
            Phase::Playing(session) => Some(session),
            _ => None,
        }
    }

    pub fn modal(&self) -> &Modal {
        self.dialogs.modal()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn statistics(&self) -> &Statistics {
        self.stats.stats()
    }

    pub fn library(&self) -> Option<&ContentLibrary> {
        self.library.as_ref()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn catalog_key(&self) -> &str {
        &self.catalog
    }

    pub fn theme_key(&self) -> &str {
        &self.theme
    }

    pub fn current_catalog(&self) -> Option<&Catalog> {
        self.library.as_ref()?.catalog(&self.catalog)
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Short message from the last catalog refresh
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Load the content library. On failure the game stays as it was (not
    /// ready at startup) and the source is kept for a later refresh.
    pub fn load_catalog(&mut self, source: CatalogSource) -> Result<(), CatalogError> {
        self.source = Some(source.clone());
        let library = source.load().inspect_err(|err| {
            error!(error = %err, "failed to load content library");
        })?;
        self.install_library(library);
        Ok(())
    }

    /// Reload from the last source. A failure leaves the current library active.
    pub fn refresh_catalog(&mut self) -> Result<(), CatalogError> {
        let source = self.source.clone().unwrap_or(CatalogSource::Bundled);
        match source.load() {
            Ok(library) => {
                self.source = Some(source);
                self.install_library(library);
                self.status = Some(REFRESH_OK_MESSAGE.to_string());
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "catalog refresh failed, keeping current library");
                self.status = Some(REFRESH_FAILED_MESSAGE.to_string());
                Err(err)
            }
        }
    }

    fn install_library(&mut self, library: ContentLibrary) {
        let catalog = if library.catalog(&self.catalog).is_some() {
            Some(self.catalog.clone())
        } else {
            self.prefs
                .selected_catalog
                .as_deref()
                .and_then(|name| library.resolve(name))
                .or_else(|| library.first_catalog_key())
                .map(str::to_string)
        };
        let Some(catalog) = catalog else {
            // validation guarantees at least one catalog
            return;
        };

        let theme_valid = library
            .catalog(&catalog)
            .is_some_and(|c| c.theme(&self.theme).is_some());
        let keep_session = theme_valid
            && catalog == self.catalog
            && matches!(&self.phase, Phase::Playing(s) if s.catalog() == catalog);

        if !theme_valid {
            self.theme = library
                .catalog(&catalog)
                .and_then(Catalog::first_theme_key)
                .unwrap_or_default()
                .to_string();
        }
        self.catalog = catalog;
        self.library = Some(library);

        if !keep_session {
            self.dialogs.clear();
            self.start_next_round();
        }
    }

    /// Pick the next target, interleaving daily words
    pub fn start_next_round(&mut self) {
        let ctx = SelectionContext {
            words_completed: self.progress.words_completed(),
            last_was_daily: self.last_was_daily,
        };
        self.run_selection(ctx);
    }

    /// Start a round in `theme` without a daily word first
    pub fn start_round_for_theme(&mut self, theme: &str) {
        if !self.is_ready() {
            return;
        }
        self.theme = theme.to_string();
        self.run_selection(SelectionContext::theme_only());
    }

    fn run_selection(&mut self, ctx: SelectionContext) {
        let Some(catalog) = self.library.as_ref().and_then(|l| l.catalog(&self.catalog)) else {
            return;
        };

        match select_next(
            &self.catalog,
            catalog,
            &self.theme,
            &self.progress,
            ctx,
            &mut self.rng,
        ) {
            SelectOutcome::Word(selection) => {
                debug!(
                    catalog = %self.catalog,
                    theme = %selection.theme,
                    source = ?selection.source,
                    "round started"
                );
                self.last_was_daily = selection.source == WordSource::Daily;
                self.phase = Phase::Playing(GameSession::new(
                    &self.catalog,
                    &selection.theme,
                    &selection.word,
                    selection.source,
                ));
                self.theme = selection.theme;
            }
            SelectOutcome::AllCategoriesComplete => {
                info!(catalog = %self.catalog, "all categories complete");
                self.phase = Phase::AllComplete;
                self.dialogs.all_completed();
            }
        }
    }

    /// Route one player input to the round. Ignored while a dialog is open.
    pub fn press(&mut self, key: Key) {
        if self.dialogs.is_open() {
            return;
        }
        let Phase::Playing(session) = &mut self.phase else {
            return;
        };

        match key {
            Key::Letter(glyph) => session.append_letter(glyph),
            Key::Backspace => session.backspace(),
            Key::Enter => match session.submit() {
                SubmitOutcome::Won => self.finish_round(true),
                SubmitOutcome::Lost => self.finish_round(false),
                SubmitOutcome::Continue | SubmitOutcome::Ignored => {}
            },
        }
    }

    fn finish_round(&mut self, won: bool) {
        let Phase::Playing(session) = &self.phase else {
            return;
        };
        let result = RoundResult {
            won,
            guess_count: session.guess_count(),
            target: session.target().to_string(),
            theme: session.theme().to_string(),
            is_daily: session.is_daily(),
        };

        self.stats
            .record_result(self.store.as_ref(), won, result.guess_count);

        if won {
            self.progress
                .record_solved(&self.catalog, &result.theme, &result.target, result.is_daily);
        }
        let event = self
            .library
            .as_ref()
            .and_then(|l| l.catalog(&self.catalog))
            .and_then(|catalog| {
                self.progress.record_played(
                    &self.catalog,
                    catalog,
                    &result.theme,
                    &result.target,
                    result.is_daily,
                )
            });
        self.progress.persist(self.store.as_ref());

        self.dialogs.round_ended(result);
        if let Some(ProgressEvent::CategoryCompleted { theme, .. }) = event {
            self.dialogs.category_completed(&theme);
        }
    }

    fn apply(&mut self, step: NextStep) {
        match step {
            NextStep::Stay => {}
            NextStep::StartRound => self.start_next_round(),
            NextStep::ResetAndStartRound => {
                if let Some(library) = &self.library {
                    self.progress.reset(library);
                }
                self.progress.persist(self.store.as_ref());
                self.last_was_daily = false;

                let first = self
                    .current_catalog()
                    .and_then(Catalog::first_theme_key)
                    .unwrap_or_default()
                    .to_string();
                self.start_round_for_theme(&first);
            }
        }
    }

    pub fn dismiss_result(&mut self) {
        let step = self.dialogs.dismiss_result();
        self.apply(step);
    }

    pub fn continue_after_category(&mut self) {
        let step = self.dialogs.continue_after_category();
        self.apply(step);
    }

    pub fn restart_all(&mut self) {
        let step = self.dialogs.restart();
        self.apply(step);
    }

    pub fn dismiss_all_complete(&mut self) {
        let step = self.dialogs.dismiss_all_complete();
        self.apply(step);
    }

    /// Abandon the current round, if any, and play `theme`. Exhausted or
    /// unknown themes are refused.
    pub fn select_theme(&mut self, theme: &str) -> bool {
        let selectable = self
            .theme_summaries()
            .iter()
            .any(|s| s.key == theme && !s.is_exhausted());
        if !selectable {
            return false;
        }

        info!(%theme, "theme selected");
        self.dialogs.clear();
        self.start_round_for_theme(theme);
        true
    }

    /// Move to the next (or previous) theme that still has words
    pub fn cycle_theme(&mut self, forward: bool) -> bool {
        let summaries = self.theme_summaries();
        let Some(current) = summaries.iter().position(|s| s.key == self.theme) else {
            return false;
        };

        let len = summaries.len();
        let next = (1..len)
            .map(|step| {
                if forward {
                    (current + step) % len
                } else {
                    (current + len - step) % len
                }
            })
            .find(|&idx| !summaries[idx].is_exhausted());

        match next {
            Some(idx) => self.select_theme(&summaries[idx].key),
            None => false,
        }
    }

    /// Switch catalog by key, id or slug. Remembers the choice and starts
    /// a round in the catalog's first theme.
    pub fn select_catalog(&mut self, name: &str) -> bool {
        let Some(library) = &self.library else {
            return false;
        };
        let Some(key) = library.resolve(name).map(str::to_string) else {
            warn!(%name, "unknown catalog");
            return false;
        };
        let first = library
            .catalog(&key)
            .and_then(Catalog::first_theme_key)
            .unwrap_or_default()
            .to_string();

        info!(catalog = %key, "catalog selected");
        self.prefs
            .set_selected_catalog(self.store.as_ref(), Some(&key));
        self.catalog = key;
        self.last_was_daily = false;
        self.dialogs.clear();
        self.start_round_for_theme(&first);
        true
    }

    pub fn cycle_catalog(&mut self) -> bool {
        let Some(library) = &self.library else {
            return false;
        };
        let keys: Vec<&str> = library.catalog_keys().collect();
        let next = keys
            .iter()
            .position(|k| *k == self.catalog)
            .map(|idx| keys[(idx + 1) % keys.len()])
            .or_else(|| keys.first().copied())
            .map(str::to_string);

        match next {
            Some(key) => self.select_catalog(&key),
            None => false,
        }
    }

    pub fn toggle_easy_mode(&mut self) {
        let on = !self.prefs.easy_mode;
        self.prefs.set_easy_mode(self.store.as_ref(), on);
    }

    pub fn toggle_dark_mode(&mut self) {
        let on = !self.prefs.dark_mode;
        self.prefs.set_dark_mode(self.store.as_ref(), on);
    }

    pub fn toggle_show_hints(&mut self) {
        let on = !self.prefs.show_hints;
        self.prefs.set_show_hints(self.store.as_ref(), on);
    }

    pub fn reset_statistics(&mut self) {
        self.stats.reset(self.store.as_ref());
    }

    /// Hint for the current target, or `None` when hints are off or no round is active
    pub fn hint(&self) -> Option<&str> {
        if !self.prefs.show_hints {
            return None;
        }
        let session = self.session()?;
        let catalog = self.current_catalog()?;
        Some(catalog.hint_for(session.target(), session.is_daily()))
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
        info!(enabled = self.debug, "debug mode toggled");
    }

    /// Debug only: type the target into the buffer
    pub fn debug_fill_target(&mut self) {
        if !self.debug || self.dialogs.is_open() {
            return;
        }
        if let Phase::Playing(session) = &mut self.phase {
            let target = session.target().to_string();
            session.fill_buffer(&target);
        }
    }

    pub fn theme_summaries(&self) -> Vec<ThemeSummary> {
        let Some(catalog) = self.current_catalog() else {
            return Vec::new();
        };

        catalog
            .themes
            .iter()
            .map(|(key, theme)| ThemeSummary {
                key: key.clone(),
                label: theme.label(),
                total: theme.words.len(),
                available: self.progress.available_words(&self.catalog, key, theme).len(),
                solved: self
                    .progress
                    .solved_count(&crate::catalog::theme_key(&self.catalog, key)),
            })
            .collect()
    }
}
