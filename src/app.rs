use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::dialog::Modal;
use crate::game::Game;
use crate::keyboard::{is_debug_chord, key_for_event};

/// Panels drawn over the board; only one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Overlay {
    #[default]
    None,
    Help,
    Hint,
    Statistics,
    Settings,
}

/// Rows of the settings panel, selected with their number key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    EasyMode,
    DarkMode,
    ShowHints,
    ResetStatistics,
}

impl SettingsItem {
    pub const ALL: [SettingsItem; 4] = [
        SettingsItem::EasyMode,
        SettingsItem::DarkMode,
        SettingsItem::ShowHints,
        SettingsItem::ResetStatistics,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsItem::EasyMode => "מצב קל",
            SettingsItem::DarkMode => "מצב כהה",
            SettingsItem::ShowHints => "הצג רמזים",
            SettingsItem::ResetStatistics => "איפוס סטטיסטיקה",
        }
    }
}

/// Terminal front end state around the [`Game`]
pub struct App {
    pub game: Game,
    pub overlay: Overlay,
    pub should_quit: bool,
}

impl App {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            overlay: Overlay::None,
            should_quit: false,
        }
    }

    fn toggle_overlay(&mut self, overlay: Overlay) {
        self.overlay = if self.overlay == overlay {
            Overlay::None
        } else {
            overlay
        };
    }

    fn apply_setting(&mut self, item: SettingsItem) {
        match item {
            SettingsItem::EasyMode => self.game.toggle_easy_mode(),
            SettingsItem::DarkMode => self.game.toggle_dark_mode(),
            SettingsItem::ShowHints => self.game.toggle_show_hints(),
            SettingsItem::ResetStatistics => self.game.reset_statistics(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.game.clear_status();

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if is_debug_chord(&key) {
            self.game.toggle_debug();
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
            // failure is logged and shown as a status line
            let _ = self.game.refresh_catalog();
            return;
        }

        match key.code {
            KeyCode::F(1) => return self.toggle_overlay(Overlay::Help),
            KeyCode::F(2) => return self.toggle_overlay(Overlay::Hint),
            KeyCode::F(3) => return self.toggle_overlay(Overlay::Statistics),
            KeyCode::F(4) => return self.toggle_overlay(Overlay::Settings),
            _ => {}
        }

        if self.overlay != Overlay::None {
            self.handle_overlay_key(key);
            return;
        }

        match self.game.modal() {
            Modal::None => {}
            Modal::Result(_) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.game.dismiss_result();
                }
                return;
            }
            Modal::CategoryComplete { .. } => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.game.continue_after_category();
                }
                return;
            }
            Modal::AllComplete => {
                match key.code {
                    KeyCode::Char('r') | KeyCode::Enter => self.game.restart_all(),
                    KeyCode::Char('c') | KeyCode::Esc => self.game.dismiss_all_complete(),
                    _ => {}
                }
                return;
            }
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Right => {
                self.game.cycle_theme(true);
            }
            KeyCode::Left => {
                self.game.cycle_theme(false);
            }
            KeyCode::Tab => {
                self.game.cycle_catalog();
            }
            KeyCode::F(5) if self.game.is_debug() => self.game.debug_fill_target(),
            _ => match key_for_event(&key) {
                Some(input) => self.game.press(input),
                None => debug!(?key, "unmapped key"),
            },
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.overlay = Overlay::None,
            KeyCode::Char(c) if self.overlay == Overlay::Settings => {
                let item = c
                    .to_digit(10)
                    .and_then(|d| (d as usize).checked_sub(1))
                    .and_then(|idx| SettingsItem::ALL.get(idx).copied());
                if let Some(item) = item {
                    self.apply_setting(item);
                }
            }
            _ => {}
        }
    }
}
