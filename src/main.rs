use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{info, warn};

use wordelish::{
    app::App,
    app_dirs::AppDirs,
    catalog::CatalogSource,
    config::{Config, ConfigStore, FileConfigStore},
    game::Game,
    logging,
    runtime::{CrosstermEventSource, GameEvent, Runner},
    store::{KeyValueStore, MemoryStore, SqliteStore},
};

const POLL_INTERVAL_MS: u64 = 100;

/// hebrew word-guessing game for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Guess the hidden Hebrew word in six tries. Words come from themed catalogs interleaved with daily practice words, and progress, statistics and preferences are kept between sessions."
)]
pub struct Cli {
    /// catalog to start in, by key, display name or slug
    #[clap(short = 'c', long)]
    catalog: Option<String>,

    /// load the content library from this JSON file instead of the bundled one
    #[clap(long = "catalog-file")]
    catalog_file: Option<PathBuf>,

    /// sqlite file for progress, statistics and preferences
    #[clap(long)]
    store: Option<PathBuf>,

    /// seed word selection for reproducible rounds
    #[clap(long)]
    seed: Option<u64>,

    /// turn on easy mode (coloured keyboard)
    #[clap(long)]
    easy: bool,

    /// turn on the dark palette
    #[clap(long)]
    dark: bool,
}

impl Cli {
    fn catalog_source(&self, config: &Config) -> CatalogSource {
        match self.catalog_file.as_ref().or(config.catalog_path.as_ref()) {
            Some(path) => CatalogSource::File(path.clone()),
            None => CatalogSource::Bundled,
        }
    }

    fn store_path(&self, config: &Config) -> Option<PathBuf> {
        self.store
            .clone()
            .or_else(|| config.store_path.clone())
            .or_else(AppDirs::store_path)
    }

    fn seed(&self, config: &Config) -> Option<u64> {
        self.seed.or(config.seed)
    }
}

fn open_store(path: Option<PathBuf>) -> Box<dyn KeyValueStore> {
    let Some(path) = path else {
        warn!("no state directory available; progress will not be kept");
        return Box::new(MemoryStore::new());
    };

    match SqliteStore::open(&path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to open store; progress will not be kept");
            Box::new(MemoryStore::new())
        }
    }
}

fn build_game(cli: &Cli, config: &Config) -> Game {
    let rng = match cli.seed(config) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::new(open_store(cli.store_path(config)), rng);

    // a failed load leaves the game on the loading screen; Ctrl+R retries
    if game.load_catalog(cli.catalog_source(config)).is_ok() {
        if let Some(name) = cli.catalog.as_deref() {
            if !game.select_catalog(name) {
                warn!(catalog = name, "unknown catalog requested on the command line");
            }
        }
    }

    if cli.easy && !game.preferences().easy_mode {
        game.toggle_easy_mode();
    }
    if cli.dark && !game.preferences().dark_mode {
        game.toggle_dark_mode();
    }

    game
}

/// Install the file logger. The game runs without one, so a failure comes
/// back as a message for stderr instead of an error.
fn start_logging(path: &Path, filter: Option<&str>) -> Option<String> {
    logging::init(path, filter)
        .err()
        .map(|err| format!("wordelish: logging disabled, cannot open {}: {err}", path.display()))
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config = FileConfigStore::new().load();
    if let Some(path) = AppDirs::log_path() {
        // reported before raw mode, while stderr is still readable
        if let Some(warning) = start_logging(&path, config.log_filter.as_deref()) {
            eprintln!("{warning}");
        }
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let mut app = App::new(build_game(&cli, &config));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    info!("exiting");
    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(POLL_INTERVAL_MS),
    );

    while !app.should_quit {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            GameEvent::Key(key) => app.handle_key(key),
            GameEvent::Resize | GameEvent::Tick => {}
            GameEvent::InputClosed => {
                warn!("terminal input closed");
                app.should_quit = true;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["wordelish"]);

        assert_eq!(cli.catalog, None);
        assert_eq!(cli.catalog_file, None);
        assert_eq!(cli.store, None);
        assert_eq!(cli.seed, None);
        assert!(!cli.easy);
        assert!(!cli.dark);
    }

    #[test]
    fn test_cli_catalog() {
        let cli = Cli::parse_from(["wordelish", "-c", "animals"]);
        assert_eq!(cli.catalog.as_deref(), Some("animals"));

        let cli = Cli::parse_from(["wordelish", "--catalog", "main"]);
        assert_eq!(cli.catalog.as_deref(), Some("main"));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["wordelish", "--easy", "--dark", "--seed", "42"]);
        assert!(cli.easy);
        assert!(cli.dark);
        assert_eq!(cli.seed, Some(42));
    }

    #[test]
    fn test_cli_wins_over_config() {
        let config = Config {
            catalog_path: Some(PathBuf::from("/from/config.json")),
            store_path: Some(PathBuf::from("/from/config.db")),
            log_filter: None,
            seed: Some(1),
        };

        let cli = Cli::parse_from(["wordelish"]);
        assert_eq!(
            cli.catalog_source(&config),
            CatalogSource::File(PathBuf::from("/from/config.json"))
        );
        assert_eq!(cli.store_path(&config), Some(PathBuf::from("/from/config.db")));
        assert_eq!(cli.seed(&config), Some(1));

        let cli = Cli::parse_from([
            "wordelish",
            "--catalog-file",
            "/cli.json",
            "--store",
            "/cli.db",
            "--seed",
            "9",
        ]);
        assert_eq!(cli.catalog_source(&config), CatalogSource::File(PathBuf::from("/cli.json")));
        assert_eq!(cli.store_path(&config), Some(PathBuf::from("/cli.db")));
        assert_eq!(cli.seed(&config), Some(9));
    }

    #[test]
    fn test_bundled_catalog_by_default() {
        let cli = Cli::parse_from(["wordelish"]);
        assert_eq!(cli.catalog_source(&Config::default()), CatalogSource::Bundled);
    }

    #[test]
    fn test_build_game_applies_flags() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("state.db");
        let cli = Cli::parse_from([
            "wordelish",
            "--store",
            db.to_str().unwrap(),
            "--seed",
            "3",
            "--easy",
            "--dark",
        ]);

        let game = build_game(&cli, &Config::default());
        assert!(game.is_ready());
        assert!(game.preferences().easy_mode);
        assert!(game.preferences().dark_mode);
        assert!(db.exists());
    }

    #[test]
    fn test_build_game_with_missing_catalog_file_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "wordelish",
            "--catalog-file",
            dir.path().join("missing.json").to_str().unwrap(),
            "--store",
            dir.path().join("state.db").to_str().unwrap(),
        ]);

        let game = build_game(&cli, &Config::default());
        assert!(!game.is_ready());
    }

    #[test]
    fn test_unusable_log_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("wordelish.log");

        let warning = start_logging(&path, None).unwrap();
        assert!(warning.contains("logging disabled"));
        assert!(warning.contains("wordelish.log"));
    }
}
