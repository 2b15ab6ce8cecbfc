use crossterm::event::{Event, KeyCode, KeyEvent};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::gallery::{Notice, Notifier, Query};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchBarOutcome {
    Edited,
    Submitted(Query),
    /// Blank submission; the warning was emitted and the buffer kept.
    Rejected,
    Ignored,
}

/// Owns the text buffer only; knows nothing about results.
#[derive(Debug, Default)]
pub struct SearchBar {
    input: Input,
}

impl SearchBar {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            input: Input::new(value.into()),
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Caret position in chars, not display columns.
    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    pub fn handle_key(&mut self, key: KeyEvent, notifier: &mut dyn Notifier) -> SearchBarOutcome {
        if key.code == KeyCode::Enter {
            return match self.submit(notifier) {
                Some(query) => SearchBarOutcome::Submitted(query),
                None => SearchBarOutcome::Rejected,
            };
        }

        match self.input.handle_event(&Event::Key(key)) {
            Some(_) => SearchBarOutcome::Edited,
            None => SearchBarOutcome::Ignored,
        }
    }

    pub fn submit(&mut self, notifier: &mut dyn Notifier) -> Option<Query> {
        match Query::parse(self.input.value()) {
            Ok(query) => {
                self.input.reset();
                Some(query)
            }
            Err(_) => {
                notifier.notify(Notice::missing_query());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::gallery::{Notice, Query};

    use super::{SearchBar, SearchBarOutcome};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_then_enter_submits_trimmed_query_and_clears_buffer() {
        let mut bar = SearchBar::default();
        let mut notices = Vec::new();
        for ch in " fox ".chars() {
            assert_eq!(
                bar.handle_key(key(KeyCode::Char(ch)), &mut notices),
                SearchBarOutcome::Edited
            );
        }
        assert_eq!(bar.value(), " fox ");

        let outcome = bar.handle_key(key(KeyCode::Enter), &mut notices);
        assert_eq!(
            outcome,
            SearchBarOutcome::Submitted(Query::parse("fox").expect("query"))
        );
        assert_eq!(bar.value(), "");
        assert!(notices.is_empty());
    }

    #[test]
    fn blank_submission_warns_and_keeps_buffer() {
        let mut bar = SearchBar::with_value("   ");
        let mut notices = Vec::new();

        let outcome = bar.handle_key(key(KeyCode::Enter), &mut notices);
        assert_eq!(outcome, SearchBarOutcome::Rejected);
        assert_eq!(notices, vec![Notice::missing_query()]);
        assert_eq!(bar.value(), "   ");
    }

    #[test]
    fn backspace_edits_buffer() {
        let mut bar = SearchBar::with_value("cats");
        let mut notices = Vec::new();
        bar.handle_key(key(KeyCode::Backspace), &mut notices);
        assert_eq!(bar.value(), "cat");
    }

    #[test]
    fn cursor_counts_chars_for_wide_input() {
        let mut bar = SearchBar::with_value("花火");
        assert_eq!(bar.cursor(), 2);

        let mut notices = Vec::new();
        bar.handle_key(key(KeyCode::Left), &mut notices);
        assert_eq!(bar.cursor(), 1);
    }
}
