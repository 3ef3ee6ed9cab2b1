pub mod charting;
pub mod screen;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Overlay, SettingsItem};
use crate::dialog::{Modal, RoundResult};
use crate::session::MAX_GUESSES;

const HORIZONTAL_MARGIN: u16 = 2;
const DISTRIBUTION_BAR_WIDTH: u16 = 24;

/// Colours for one of the two display modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub dim: Color,
    pub accent: Color,
    pub correct: Color,
    pub present: Color,
    pub absent: Color,
    pub on_tile: Color,
    pub key: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                fg: Color::White,
                bg: Color::Rgb(17, 24, 39),
                dim: Color::DarkGray,
                accent: Color::LightBlue,
                correct: Color::Rgb(34, 197, 94),
                present: Color::Rgb(250, 204, 21),
                absent: Color::Rgb(75, 85, 99),
                on_tile: Color::Black,
                key: Color::Rgb(55, 65, 81),
                error: Color::LightRed,
            }
        } else {
            Self {
                fg: Color::Black,
                bg: Color::White,
                dim: Color::Gray,
                accent: Color::Blue,
                correct: Color::Green,
                present: Color::Yellow,
                absent: Color::Rgb(148, 163, 184),
                on_tile: Color::Black,
                key: Color::Rgb(226, 232, 240),
                error: Color::Red,
            }
        }
    }
}

/// Praise shown after a win, by number of guesses used
pub fn praise(guess_count: usize) -> &'static str {
    match guess_count {
        1 => "מדהים! ניחוש מושלם בניסיון הראשון! 🏆",
        2 => "מעולה! פתרת במהירות רק בשני ניסיונות! ⚡",
        3 => "כל הכבוד! פתרת בשלושה ניסיונות! 🌟",
        4 => "יפה מאוד! פתרת בארבעה ניסיונות! 👍",
        5 => "טוב מאוד! פתרת בחמישה ניסיונות! 🎯",
        6 => "נהדר! פתרת ברגע האחרון! 😅",
        _ => "כל הכבוד! ניחשת נכון! 🎉",
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = Palette::for_mode(self.game.preferences().dark_mode);
        buf.set_style(area, Style::default().fg(palette.fg).bg(palette.bg));

        let header_height = if self.game.is_debug() { 3 } else { 2 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(header_height),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(area);

        render_header(self, chunks[0], buf, &palette);
        screen::current_screen(self.game.phase()).render(self, chunks[1], buf, &palette);
        render_footer(self, chunks[2], buf, &palette);

        match self.overlay {
            Overlay::None => render_modal(self, area, buf, &palette),
            overlay => render_overlay(self, overlay, area, buf, &palette),
        }
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let game = &app.game;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    let mut title = vec![Span::styled("וורדליש", bold.fg(palette.accent))];
    if let Some(catalog) = game.current_catalog() {
        title.push(Span::raw(format!(" · {}", catalog.name)));
    }
    if game.session().is_some_and(|s| s.is_daily()) {
        title.push(Span::styled(" · מילה יומיומית 📚", Style::default().fg(palette.present)));
    }
    lines.push(Line::from(title));

    let mut themes = Vec::new();
    for (idx, summary) in game.theme_summaries().iter().enumerate() {
        if idx > 0 {
            themes.push(Span::styled(" | ", Style::default().fg(palette.dim)));
        }
        let label = format!("{} {}/{}", summary.label, summary.solved, summary.total);
        let style = if summary.key == game.theme_key() {
            bold.fg(palette.fg).add_modifier(Modifier::UNDERLINED)
        } else if summary.is_exhausted() {
            Style::default()
                .fg(palette.dim)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(palette.dim)
        };
        themes.push(Span::styled(label, style));
    }
    lines.push(Line::from(themes));

    if game.is_debug() {
        let mut parts = vec!["DEBUG".to_string()];
        if let Some(session) = game.session() {
            parts.push(format!("target: {}", session.target()));
        }
        if let Some(catalog) = game.current_catalog() {
            parts.push(format!("catalog: {} ({})", catalog.name, game.catalog_key()));
        }
        parts.push("F5 · fill".to_string());
        lines.push(Line::from(Span::styled(
            parts.iter().join(" | "),
            Style::default().fg(palette.error),
        )));
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_footer(app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let line = match app.game.status() {
        Some(status) => Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        None => Line::from(Span::styled(
            "F1 עזרה · F2 רמז · F3 סטטיסטיקה · F4 הגדרות · ←/→ נושא · Tab קטלוג · Esc יציאה",
            Style::default().fg(palette.dim),
        )),
    };
    Paragraph::new(line)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn result_lines(app: &App, result: &RoundResult, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if result.won {
        lines.push(Line::from(Span::styled(
            praise(result.guess_count),
            Style::default().fg(palette.correct),
        )));
        if result.is_daily {
            lines.push(Line::from("תרגלת מילה יומיומית! 📚"));
        } else if let Some(summary) = app
            .game
            .theme_summaries()
            .into_iter()
            .find(|s| s.key == result.theme)
        {
            lines.push(Line::from(format!(
                "פתרת {} מתוך {} מילים בקטגוריה {}",
                summary.solved, summary.total, summary.label
            )));
        }
    } else {
        lines.push(Line::from("המילה הייתה:"));
        lines.push(Line::from(Span::styled(
            result.target.clone(),
            Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from("נסה שוב במילה הבאה! 💪"));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter · המילה הבאה",
        Style::default().fg(palette.dim),
    )));
    lines
}

fn render_modal(app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
    match app.game.modal() {
        Modal::None => {}
        Modal::Result(result) => {
            let (title, border) = if result.won {
                ("כל הכבוד!", palette.correct)
            } else {
                ("לא הצלחת הפעם", palette.error)
            };
            popup(area, buf, title, result_lines(app, result, palette), border, palette);
        }
        Modal::CategoryComplete { theme } => {
            let label = app
                .game
                .current_catalog()
                .and_then(|c| c.theme(theme))
                .map(|t| t.label())
                .unwrap_or_else(|| theme.clone());
            let lines = vec![
                Line::from(format!("סיימת את כל המילים בקטגוריה {label}!")),
                Line::from(""),
                Line::from(Span::styled("Enter · המשך", Style::default().fg(palette.dim))),
            ];
            popup(area, buf, "מדהים!", lines, Color::Magenta, palette);
        }
        Modal::AllComplete => {
            let lines = vec![
                Line::from("🏆"),
                Line::from("סיימת את כל המילים בכל הקטגוריות!"),
                Line::from(""),
                Line::from(Span::styled(
                    "r · התחל מחדש    c · סגור",
                    Style::default().fg(palette.dim),
                )),
            ];
            popup(area, buf, "כל הכבוד!", lines, palette.present, palette);
        }
    }
}

fn render_overlay(app: &App, overlay: Overlay, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let dim = Style::default().fg(palette.dim);
    let (title, lines) = match overlay {
        Overlay::None => return,
        Overlay::Help => (
            "איך משחקים?",
            vec![
                Line::from(format!("המטרה: לנחש את המילה העברית בתוך {MAX_GUESSES} ניסיונות.")),
                Line::from("הקלד מילה באורך הנכון ולחץ Enter."),
                Line::from(""),
                Line::from(vec![
                    Span::styled("   ", Style::default().bg(palette.correct)),
                    Span::raw(" אות נכונה במקום הנכון"),
                ]),
                Line::from(vec![
                    Span::styled("   ", Style::default().bg(palette.present)),
                    Span::raw(" אות נכונה במקום הלא נכון"),
                ]),
                Line::from(vec![
                    Span::styled("   ", Style::default().bg(palette.absent)),
                    Span::raw(" אות לא קיימת במילה"),
                ]),
                Line::from(""),
                Line::from("מצב קל: המקלדת מראה באילו אותיות כבר השתמשת."),
                Line::from("מילים יומיומיות: מדי פעם תופיע מילה שימושית לשיחות יום-יום."),
                Line::from("אפשר להקליד גם במקלדת אנגלית, לפי הפריסה העברית."),
                Line::from(""),
                Line::from(Span::styled("Ctrl+R · רענון קטלוג    Esc · סגירה", dim)),
            ],
        ),
        Overlay::Hint => {
            let text = match (app.game.preferences().show_hints, app.game.hint()) {
                (_, Some(hint)) => hint.to_string(),
                (false, None) => "הרמזים כבויים (F4)".to_string(),
                (true, None) => "אין מילה פעילה".to_string(),
            };
            ("💡 רמז", vec![Line::from(text)])
        }
        Overlay::Statistics => ("סטטיסטיקה", statistics_lines(app, palette)),
        Overlay::Settings => {
            let prefs = app.game.preferences();
            let mut lines: Vec<Line> = SettingsItem::ALL
                .iter()
                .enumerate()
                .map(|(idx, item)| {
                    let state = match item {
                        SettingsItem::EasyMode => Some(prefs.easy_mode),
                        SettingsItem::DarkMode => Some(prefs.dark_mode),
                        SettingsItem::ShowHints => Some(prefs.show_hints),
                        SettingsItem::ResetStatistics => None,
                    };
                    let mark = match state {
                        Some(true) => "[✓]",
                        Some(false) => "[ ]",
                        None => "   ",
                    };
                    Line::from(format!("{} {mark} {}", idx + 1, item.label()))
                })
                .collect();
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("1-4 · שינוי    Esc · סגירה", dim)));
            ("הגדרות", lines)
        }
    };

    popup(area, buf, title, lines, palette.accent, palette);
}

fn statistics_lines(app: &App, palette: &Palette) -> Vec<Line<'static>> {
    let stats = app.game.statistics();
    let mut lines = vec![
        Line::from(format!(
            "משחקים {} · ניצחונות {} · הפסדים {} · {}%",
            stats.games_played,
            stats.games_won,
            stats.games_lost,
            stats.win_percentage()
        )),
        Line::from(format!(
            "רצף נוכחי {} · רצף שיא {}",
            stats.current_streak, stats.max_streak
        )),
    ];
    if let Some(mean) = charting::mean_guesses(&stats.guess_distribution) {
        lines.push(Line::from(format!(
            "ממוצע ניחושים {}",
            charting::format_label(mean)
        )));
    }
    lines.push(Line::from(""));

    let widths = charting::bar_widths(&stats.guess_distribution, DISTRIBUTION_BAR_WIDTH);
    for (idx, (&count, width)) in stats.guess_distribution.iter().zip(widths).enumerate() {
        let bar = "█".repeat(width as usize);
        let padding = " ".repeat((DISTRIBUTION_BAR_WIDTH - width) as usize);
        lines.push(Line::from(vec![
            Span::raw(format!("{} ", idx + 1)),
            Span::styled(bar, Style::default().fg(palette.correct)),
            Span::raw(padding),
            Span::raw(format!(" {count}")),
        ]));
    }
    lines
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn popup(
    area: Rect,
    buf: &mut Buffer,
    title: &str,
    lines: Vec<Line<'_>>,
    border: Color,
    palette: &Palette,
) {
    let content_width = lines
        .iter()
        .map(Line::width)
        .max()
        .unwrap_or(0)
        .max(title.width());
    let rect = centered(
        area,
        content_width as u16 + 4,
        lines.len() as u16 + 2,
    );

    Clear.render(rect, buf);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(palette.fg).bg(palette.bg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(Line::from(format!(" {title} ")).centered()),
        )
        .render(rect, buf);
}
