// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod dialog;
pub mod game;
pub mod keyboard;
pub mod logging;
pub mod preferences;
pub mod progress;
pub mod runtime;
pub mod selector;
pub mod session;
pub mod stats;
pub mod store;
pub mod ui;
