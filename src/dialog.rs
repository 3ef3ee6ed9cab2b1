use tracing::debug;

/// How a round ended, as shown in the result dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    pub won: bool,
    pub guess_count: usize,
    pub target: String,
    pub theme: String,
    pub is_daily: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    None,
    Result(RoundResult),
    CategoryComplete { theme: String },
    AllComplete,
}

/// What the caller should do after a dialog action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Stay,
    StartRound,
    ResetAndStartRound,
}

/// Orders the post-round dialogs: result, then category complete, then all complete.
///
/// A category completion that arrives while the result dialog is up is
/// latched and surfaced when that dialog is dismissed.
#[derive(Debug, Clone, Default)]
pub struct DialogSequencer {
    modal: Modal,
    deferred_category: Option<String>,
}

impl DialogSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Any modal open; letter input is blocked meanwhile
    pub fn is_open(&self) -> bool {
        self.modal != Modal::None
    }

    pub fn has_deferred_category(&self) -> bool {
        self.deferred_category.is_some()
    }

    pub fn round_ended(&mut self, result: RoundResult) {
        debug!(won = result.won, "showing result dialog");
        self.modal = Modal::Result(result);
    }

    pub fn category_completed(&mut self, theme: &str) {
        match self.modal {
            Modal::Result(_) => {
                debug!(%theme, "category completion deferred behind result dialog");
                self.deferred_category = Some(theme.to_string());
            }
            _ => {
                self.modal = Modal::CategoryComplete {
                    theme: theme.to_string(),
                };
            }
        }
    }

    pub fn all_completed(&mut self) {
        self.deferred_category = None;
        self.modal = Modal::AllComplete;
    }

    pub fn dismiss_result(&mut self) -> NextStep {
        if !matches!(self.modal, Modal::Result(_)) {
            return NextStep::Stay;
        }

        match self.deferred_category.take() {
            Some(theme) => {
                self.modal = Modal::CategoryComplete { theme };
                NextStep::Stay
            }
            None => {
                self.modal = Modal::None;
                NextStep::StartRound
            }
        }
    }

    pub fn continue_after_category(&mut self) -> NextStep {
        if !matches!(self.modal, Modal::CategoryComplete { .. }) {
            return NextStep::Stay;
        }
        self.modal = Modal::None;
        NextStep::StartRound
    }

    pub fn restart(&mut self) -> NextStep {
        if self.modal != Modal::AllComplete {
            return NextStep::Stay;
        }
        self.modal = Modal::None;
        NextStep::ResetAndStartRound
    }

    pub fn dismiss_all_complete(&mut self) -> NextStep {
        if self.modal == Modal::AllComplete {
            self.modal = Modal::None;
        }
        NextStep::Stay
    }

    /// Drop every dialog and the latch, e.g. when the player switches catalog
    pub fn clear(&mut self) {
        self.modal = Modal::None;
        self.deferred_category = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn result(won: bool) -> RoundResult {
        RoundResult {
            won,
            guess_count: 3,
            target: "אבג".to_string(),
            theme: "t1".to_string(),
            is_daily: false,
        }
    }

    #[test]
    fn test_dismiss_result_without_latch_starts_round() {
        let mut dialogs = DialogSequencer::new();
        dialogs.round_ended(result(true));
        assert!(dialogs.is_open());

        assert_eq!(dialogs.dismiss_result(), NextStep::StartRound);
        assert_eq!(dialogs.modal(), &Modal::None);
    }

    #[test]
    fn test_category_completion_during_result_is_surfaced_once() {
        let mut dialogs = DialogSequencer::new();
        dialogs.round_ended(result(false));
        dialogs.category_completed("t1");

        // the result dialog is not replaced
        assert_matches!(dialogs.modal(), Modal::Result(r) if !r.won);
        assert!(dialogs.has_deferred_category());

        assert_eq!(dialogs.dismiss_result(), NextStep::Stay);
        assert_eq!(
            dialogs.modal(),
            &Modal::CategoryComplete {
                theme: "t1".to_string()
            }
        );
        assert!(!dialogs.has_deferred_category());

        assert_eq!(dialogs.continue_after_category(), NextStep::StartRound);
        assert_eq!(dialogs.modal(), &Modal::None);

        // a second result dismissal does not bring the category dialog back
        dialogs.round_ended(result(true));
        assert_eq!(dialogs.dismiss_result(), NextStep::StartRound);
        assert_eq!(dialogs.modal(), &Modal::None);
    }

    #[test]
    fn test_category_completion_without_result_shows_immediately() {
        let mut dialogs = DialogSequencer::new();
        dialogs.category_completed("t2");
        assert_eq!(
            dialogs.modal(),
            &Modal::CategoryComplete {
                theme: "t2".to_string()
            }
        );
    }

    #[test]
    fn test_all_complete_supersedes_latch() {
        let mut dialogs = DialogSequencer::new();
        dialogs.round_ended(result(true));
        dialogs.category_completed("t1");
        dialogs.all_completed();

        assert_eq!(dialogs.modal(), &Modal::AllComplete);
        assert!(!dialogs.has_deferred_category());
    }

    #[test]
    fn test_all_complete_actions() {
        let mut dialogs = DialogSequencer::new();
        dialogs.all_completed();
        assert_eq!(dialogs.restart(), NextStep::ResetAndStartRound);
        assert!(!dialogs.is_open());

        dialogs.all_completed();
        assert_eq!(dialogs.dismiss_all_complete(), NextStep::Stay);
        assert!(!dialogs.is_open());
    }

    #[test]
    fn test_actions_in_wrong_modal_are_noops() {
        let mut dialogs = DialogSequencer::new();
        assert_eq!(dialogs.dismiss_result(), NextStep::Stay);
        assert_eq!(dialogs.continue_after_category(), NextStep::Stay);
        assert_eq!(dialogs.restart(), NextStep::Stay);

        dialogs.round_ended(result(true));
        assert_eq!(dialogs.continue_after_category(), NextStep::Stay);
        assert_eq!(dialogs.restart(), NextStep::Stay);
        assert_eq!(dialogs.dismiss_all_complete(), NextStep::Stay);
        assert_matches!(dialogs.modal(), Modal::Result(_));
    }

    #[test]
    fn test_clear_drops_latch() {
        let mut dialogs = DialogSequencer::new();
        dialogs.round_ended(result(true));
        dialogs.category_completed("t1");
        dialogs.clear();

        assert!(!dialogs.is_open());
        assert!(!dialogs.has_deferred_category());
    }
}
