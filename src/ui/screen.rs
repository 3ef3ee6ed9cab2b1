use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::App;
use crate::game::Phase;
use crate::keyboard::{BACKSPACE_GLYPH, ENTER_GLYPH, KEYBOARD_ROWS};
use crate::session::{normalize_glyph, GameSession, LetterStatus, MAX_GUESSES};
use crate::ui::Palette;

const EMPTY_CELL: char = '·';

/// A UI Screen boundary: renders the body below the header for one game phase
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer, palette: &Palette);
}

/// Shown until a content library has loaded
pub struct LoadingScreen;

impl Screen for LoadingScreen {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
        let lines = vec![
            Line::from(Span::styled(
                "טוען קטלוג…",
                Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Ctrl+R · ניסיון חוזר", Style::default().fg(palette.dim))),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(vertical_center(area, 3), buf);
    }
}

/// The guess grid and the on-screen keyboard
pub struct BoardScreen;

impl Screen for BoardScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
        let Some(session) = app.game.session() else {
            return;
        };

        let board_height = (MAX_GUESSES * 2) as u16;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(board_height),
                Constraint::Length(KEYBOARD_ROWS.len() as u16 * 2),
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(board_lines(session, palette))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let easy = app.game.preferences().easy_mode;
        Paragraph::new(keyboard_lines(session, easy, palette))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }
}

/// Body left behind after the all-complete dialog is closed
pub struct AllCompleteScreen;

impl Screen for AllCompleteScreen {
    fn render(&self, _app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
        let lines = vec![
            Line::from(Span::styled(
                "🏆 כל הקטגוריות הושלמו",
                Style::default().fg(palette.present).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Tab · קטלוג אחר", Style::default().fg(palette.dim))),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(vertical_center(area, 3), buf);
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: &Phase) -> Box<dyn Screen> {
    match phase {
        Phase::NotReady => Box::new(LoadingScreen),
        Phase::Playing(_) => Box::new(BoardScreen),
        Phase::AllComplete => Box::new(AllCompleteScreen),
    }
}

fn vertical_center(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}

fn status_style(status: LetterStatus, palette: &Palette) -> Style {
    let bg = match status {
        LetterStatus::Correct => palette.correct,
        LetterStatus::CorrectLetterWrongPosition => palette.present,
        LetterStatus::Absent => palette.absent,
    };
    Style::default()
        .bg(bg)
        .fg(palette.on_tile)
        .add_modifier(Modifier::BOLD)
}

/// Cells are listed first letter first and drawn right to left
fn row_line(cells: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = Vec::with_capacity(cells.len() * 2);
    for (idx, cell) in cells.into_iter().rev().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(cell);
    }
    Line::from(spans)
}

pub(crate) fn board_lines(session: &GameSession, palette: &Palette) -> Vec<Line<'static>> {
    let len = session.word_len();
    let mut lines = Vec::with_capacity(MAX_GUESSES * 2);

    for row in 0..MAX_GUESSES {
        let cells: Vec<Span> = if let Some(guess) = session.guesses().get(row) {
            session
                .guess_statuses(row)
                .into_iter()
                .zip(guess.iter())
                .map(|(status, glyph)| Span::styled(format!(" {glyph} "), status_style(status, palette)))
                .collect()
        } else if row == session.guess_count() && session.is_active() {
            let style = if session.is_duplicate_pending() {
                Style::default().fg(palette.error).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.fg).add_modifier(Modifier::BOLD)
            };
            (0..len)
                .map(|pos| match session.buffer().get(pos) {
                    Some(glyph) => Span::styled(format!("[{glyph}]"), style),
                    None => Span::styled(format!("[{EMPTY_CELL}]"), Style::default().fg(palette.dim)),
                })
                .collect()
        } else {
            (0..len)
                .map(|_| Span::styled(format!(" {EMPTY_CELL} "), Style::default().fg(palette.dim)))
                .collect()
        };

        lines.push(row_line(cells));
        lines.push(Line::from(""));
    }

    lines
}

pub(crate) fn keyboard_lines(session: &GameSession, easy: bool, palette: &Palette) -> Vec<Line<'static>> {
    let can_submit = session.is_active()
        && session.buffer().len() == session.word_len()
        && !session.is_duplicate_pending();

    let mut lines = Vec::with_capacity(KEYBOARD_ROWS.len() * 2);
    for row in KEYBOARD_ROWS {
        let cells = row
            .iter()
            .map(|&glyph| {
                let style = match glyph {
                    ENTER_GLYPH if !can_submit => Style::default().fg(palette.dim),
                    ENTER_GLYPH | BACKSPACE_GLYPH => {
                        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
                    }
                    letter => match session.keyboard_status(normalize_glyph(letter)) {
                        Some(status) if easy => status_style(status, palette),
                        _ => Style::default().fg(palette.fg).bg(palette.key),
                    },
                };
                Span::styled(format!(" {glyph} "), style)
            })
            .collect();
        lines.push(row_line(cells));
        lines.push(Line::from(""));
    }
    lines
}
