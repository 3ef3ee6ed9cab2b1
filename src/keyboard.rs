use crate::session::{normalize_glyph, GERESH};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const ENTER_GLYPH: char = '↵';
pub const BACKSPACE_GLYPH: char = '⌫';

/// On-screen keyboard, right to left within each row as displayed
pub const KEYBOARD_ROWS: [[char; 10]; 3] = [
    ['ף', 'פ', 'ם', 'ן', 'ו', 'ט', 'א', 'ר', 'ק', '\''],
    [ENTER_GLYPH, 'ך', 'ל', 'ח', 'י', 'ע', 'כ', 'ג', 'ד', 'ש'],
    [BACKSPACE_GLYPH, 'ץ', 'ת', 'צ', 'מ', 'נ', 'ה', 'ב', 'ס', 'ז'],
];

/// A player input that reaches the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Letter(char),
    Backspace,
    Enter,
}

impl Key {
    /// Map an on-screen key label to an input
    pub fn from_label(label: &str) -> Option<Key> {
        match label {
            "↵" | "שלח" => Some(Key::Enter),
            "⌫" | "מחק" => Some(Key::Backspace),
            _ => {
                let mut chars = label.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => letter(c),
                    _ => None,
                }
            }
        }
    }
}

/// Hebrew letters, final forms included, and the geresh
pub fn is_word_glyph(c: char) -> bool {
    ('\u{05D0}'..='\u{05EA}').contains(&c) || c == GERESH
}

/// Standard Israeli layout position of a Latin key
pub fn qwerty_to_hebrew(c: char) -> Option<char> {
    let mapped = match c {
        'q' => '/',
        'w' => '\'',
        'e' => 'ק',
        'r' => 'ר',
        't' => 'א',
        'y' => 'ט',
        'u' => 'ו',
        'i' => 'ן',
        'o' => 'ם',
        'p' => 'פ',
        'a' => 'ש',
        's' => 'ד',
        'd' => 'ג',
        'f' => 'כ',
        'g' => 'ע',
        'h' => 'י',
        'j' => 'ח',
        'k' => 'ל',
        'l' => 'ך',
        ';' => 'ף',
        'z' => 'ז',
        'x' => 'ס',
        'c' => 'ב',
        'v' => 'ה',
        'b' => 'נ',
        'n' => 'מ',
        'm' => 'צ',
        ',' => 'ת',
        '.' => 'ץ',
        '\'' => GERESH,
        _ => return None,
    };
    Some(mapped)
}

fn letter(c: char) -> Option<Key> {
    let glyph = normalize_glyph(c);
    is_word_glyph(glyph).then_some(Key::Letter(glyph))
}

/// Translate a typed character. Hebrew passes through, Latin keys go through
/// the layout table, anything that is not a word glyph is dropped.
pub fn key_for_char(c: char) -> Option<Key> {
    if is_word_glyph(normalize_glyph(c)) {
        return letter(c);
    }
    qwerty_to_hebrew(c.to_ascii_lowercase()).and_then(letter)
}

/// Translate a terminal key event into a game input, ignoring chords
pub fn key_for_event(event: &KeyEvent) -> Option<Key> {
    if event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
    {
        return None;
    }
    match event.code {
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Char(c) => key_for_char(c),
        _ => None,
    }
}

/// Ctrl+d or Super+d
pub fn is_debug_chord(event: &KeyEvent) -> bool {
    matches!(event.code, KeyCode::Char('d') | KeyCode::Char('D'))
        && event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_letters_are_word_glyphs() {
        for row in KEYBOARD_ROWS {
            for glyph in row {
                if glyph == ENTER_GLYPH || glyph == BACKSPACE_GLYPH {
                    continue;
                }
                assert!(is_word_glyph(normalize_glyph(glyph)), "{glyph}");
            }
        }
    }

    #[test]
    fn test_layout_covers_all_letters() {
        let on_screen: Vec<char> = KEYBOARD_ROWS.iter().flatten().copied().collect();
        for c in '\u{05D0}'..='\u{05EA}' {
            assert!(on_screen.contains(&c), "{c} missing from keyboard");
        }
    }

    #[test]
    fn test_qwerty_mapping() {
        assert_eq!(key_for_char('a'), Some(Key::Letter('ש')));
        assert_eq!(key_for_char('T'), Some(Key::Letter('א')));
        assert_eq!(key_for_char(','), Some(Key::Letter('ת')));
        assert_eq!(key_for_char('\''), Some(Key::Letter(GERESH)));
        assert_eq!(key_for_char('w'), Some(Key::Letter(GERESH)));
    }

    #[test]
    fn test_non_letters_are_dropped() {
        assert_eq!(key_for_char('q'), None);
        assert_eq!(key_for_char('1'), None);
        assert_eq!(key_for_char(' '), None);
    }

    #[test]
    fn test_hebrew_passes_through() {
        assert_eq!(key_for_char('ץ'), Some(Key::Letter('ץ')));
        assert_eq!(key_for_char(GERESH), Some(Key::Letter(GERESH)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Key::from_label("↵"), Some(Key::Enter));
        assert_eq!(Key::from_label("מחק"), Some(Key::Backspace));
        assert_eq!(Key::from_label("'"), Some(Key::Letter(GERESH)));
        assert_eq!(Key::from_label("אב"), None);
    }

    #[test]
    fn test_events() {
        let plain = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE);
        assert_eq!(key_for_event(&plain), Some(Key::Letter('ק')));

        let shifted = KeyEvent::new(KeyCode::Char('E'), KeyModifiers::SHIFT);
        assert_eq!(key_for_event(&shifted), Some(Key::Letter('ק')));

        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(key_for_event(&enter), Some(Key::Enter));

        let chord = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(key_for_event(&chord), None);
        assert!(is_debug_chord(&chord));

        let super_chord = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::SUPER);
        assert!(is_debug_chord(&super_chord));
        assert!(!is_debug_chord(&plain));
    }
}
