use tracing::debug;

/// Guesses allowed per round
pub const MAX_GUESSES: usize = 6;

/// Hebrew punctuation geresh (U+05F3), the canonical form of every apostrophe variant
pub const GERESH: char = '\u{05F3}';

/// Fold apostrophe look-alikes into the geresh so `ג'` and `ג׳` compare equal
pub fn normalize_glyph(c: char) -> char {
    match c {
        '\'' | '\u{2019}' | GERESH => GERESH,
        other => other,
    }
}

pub fn normalize_word(word: &str) -> Vec<char> {
    word.chars().map(normalize_glyph).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordSource {
    Theme,
    Daily,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum RoundState {
    Active,
    Won,
    Lost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LetterStatus {
    Correct,
    CorrectLetterWrongPosition,
    Absent,
}

/// What a call to [`GameSession::submit`] did. Rejected submissions are not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored,
    Continue,
    Won,
    Lost,
}

/// One round of guessing a single target word
#[derive(Debug, Clone)]
pub struct GameSession {
    catalog: String,
    theme: String,
    target: String,
    target_glyphs: Vec<char>,
    source: WordSource,
    guesses: Vec<Vec<char>>,
    buffer: Vec<char>,
    state: RoundState,
}

impl GameSession {
    pub fn new(catalog: &str, theme: &str, target: &str, source: WordSource) -> Self {
        Self {
            catalog: catalog.to_string(),
            theme: theme.to_string(),
            target: target.to_string(),
            target_glyphs: normalize_word(target),
            source,
            guesses: Vec::new(),
            buffer: Vec::new(),
            state: RoundState::Active,
        }
    }

    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn source(&self) -> WordSource {
        self.source
    }

    pub fn is_daily(&self) -> bool {
        self.source == WordSource::Daily
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == RoundState::Active
    }

    /// Number of glyphs in the target, which is also the guess length
    pub fn word_len(&self) -> usize {
        self.target_glyphs.len()
    }

    pub fn guesses(&self) -> &[Vec<char>] {
        &self.guesses
    }

    pub fn guess_count(&self) -> usize {
        self.guesses.len()
    }

    pub fn buffer(&self) -> &[char] {
        &self.buffer
    }

    pub fn append_letter(&mut self, glyph: char) {
        if !self.is_active() || self.buffer.len() >= self.word_len() {
            return;
        }
        self.buffer.push(normalize_glyph(glyph));
    }

    pub fn backspace(&mut self) {
        if self.is_active() {
            self.buffer.pop();
        }
    }

    /// Replace the buffer with `word`, truncated to the target length
    pub fn fill_buffer(&mut self, word: &str) {
        if !self.is_active() {
            return;
        }
        self.buffer.clear();
        for c in word.chars() {
            self.append_letter(c);
        }
    }

    /// Buffer is full and repeats an earlier guess, so submitting would be rejected
    pub fn is_duplicate_pending(&self) -> bool {
        self.buffer.len() == self.word_len() && self.has_guessed(&self.buffer)
    }

    fn has_guessed(&self, glyphs: &[char]) -> bool {
        let normalized: Vec<char> = glyphs.iter().copied().map(normalize_glyph).collect();
        self.guesses.iter().any(|g| *g == normalized)
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.is_active() || self.buffer.len() != self.word_len() {
            return SubmitOutcome::Ignored;
        }
        if self.has_guessed(&self.buffer) {
            debug!("duplicate guess ignored");
            return SubmitOutcome::Ignored;
        }

        let guess: Vec<char> = self.buffer.drain(..).map(normalize_glyph).collect();
        let is_match = guess == self.target_glyphs;
        self.guesses.push(guess);

        if is_match {
            self.state = RoundState::Won;
            SubmitOutcome::Won
        } else if self.guesses.len() >= MAX_GUESSES {
            self.state = RoundState::Lost;
            SubmitOutcome::Lost
        } else {
            SubmitOutcome::Continue
        }
    }

    /// Classify one position of a submitted guess.
    ///
    /// A glyph found anywhere in the target counts as present however many
    /// times it repeats in the guess; there is no duplicate-letter accounting.
    pub fn letter_status(&self, guess_index: usize, position: usize) -> Option<LetterStatus> {
        let glyph = *self.guesses.get(guess_index)?.get(position)?;
        Some(self.classify(glyph, position))
    }

    pub fn guess_statuses(&self, guess_index: usize) -> Vec<LetterStatus> {
        self.guesses
            .get(guess_index)
            .map(|guess| {
                guess
                    .iter()
                    .enumerate()
                    .map(|(pos, &glyph)| self.classify(glyph, pos))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn classify(&self, glyph: char, position: usize) -> LetterStatus {
        if self.target_glyphs.get(position) == Some(&glyph) {
            LetterStatus::Correct
        } else if self.target_glyphs.contains(&glyph) {
            LetterStatus::CorrectLetterWrongPosition
        } else {
            LetterStatus::Absent
        }
    }

    /// Easy-mode keyboard colouring: the status of the first submitted guess
    /// that contains `glyph`, taken at its first occurrence
    pub fn keyboard_status(&self, glyph: char) -> Option<LetterStatus> {
        let glyph = normalize_glyph(glyph);
        self.guesses.iter().find_map(|guess| {
            guess
                .iter()
                .position(|&c| c == glyph)
                .map(|pos| self.classify(glyph, pos))
        })
    }
}
