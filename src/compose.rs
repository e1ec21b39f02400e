//! Message composer with mention, channel and emoji completion

use crate::autocomplete::Autocomplete;
use crate::completion::{CandidateResolver, Grammar};
use crate::directory::SearchClues;
use crate::editor::{EditorAction, InputLine, Key};

/// What the view should do after a composer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeAction {
    None,
    Redraw,
    /// Send the message; the buffer is already cleared
    Send(String),
}

pub struct Composer {
    line: InputLine,
    autocomplete: Autocomplete,
}

impl Composer {
    pub fn new(resolver: CandidateResolver, clues: SearchClues) -> Self {
        Self::with_grammar(resolver, clues, Grammar::compose())
    }

    pub fn with_grammar(resolver: CandidateResolver, clues: SearchClues, grammar: Grammar) -> Self {
        Self {
            line: InputLine::new(),
            autocomplete: Autocomplete::new(resolver, clues, grammar),
        }
    }

    pub fn value(&self) -> &str {
        self.line.value()
    }

    pub fn cursor(&self) -> usize {
        self.line.cursor()
    }

    pub fn autocomplete(&self) -> &Autocomplete {
        &self.autocomplete
    }

    /// Replace the draft, e.g. when restoring it after switching channels
    pub fn set_draft(&mut self, text: &str) {
        self.line.set(text, text.chars().count());
        self.autocomplete.on_text_changed(self.line.value(), self.line.selection());
    }

    pub fn on_focus(&mut self) {
        self.autocomplete.on_focus(&self.line);
    }

    pub fn on_blur(&mut self) {
        self.autocomplete.on_blur();
    }

    pub fn on_pointer_enter(&mut self, index: usize) {
        self.autocomplete.on_pointer_enter(index);
    }

    pub fn on_pointer_leave(&mut self) {
        self.autocomplete.on_pointer_leave();
    }

    pub fn on_click(&mut self, index: usize) -> ComposeAction {
        if self.autocomplete.on_click(index, &mut self.line) {
            ComposeAction::Redraw
        } else {
            ComposeAction::None
        }
    }

    pub fn handle_key(&mut self, key: Key) -> ComposeAction {
        if self.autocomplete.on_key_down(key, &mut self.line) {
            return ComposeAction::Redraw;
        }

        match self.line.handle_event(key) {
            EditorAction::Edited | EditorAction::Moved => {
                self.autocomplete.on_key_up(key, &self.line);
                ComposeAction::Redraw
            }
            EditorAction::Submit => {
                let text = self.line.value().trim().to_string();
                if text.is_empty() {
                    return ComposeAction::None;
                }
                self.line.clear();
                self.autocomplete.on_text_changed("", self.line.selection());
                ComposeAction::Send(text)
            }
            EditorAction::HistoryPrev | EditorAction::HistoryNext | EditorAction::None => {
                ComposeAction::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::Config;
    use crate::directory::{MemoryDirectory, User};
    use crate::emoji::BuiltinEmoji;

    fn composer() -> Composer {
        let mut dir = MemoryDirectory::new();
        dir.add_user(User::new("alice_id", "alice"));
        let resolver = CandidateResolver::new(
            Arc::new(dir),
            Arc::new(BuiltinEmoji::new()),
            &Config::default(),
        );
        let mut composer = Composer::new(resolver, SearchClues::all_users());
        composer.on_focus();
        composer
    }

    fn type_text(composer: &mut Composer, text: &str) {
        for c in text.chars() {
            composer.handle_key(Key::Char(c));
        }
    }

    #[test]
    fn test_enter_commits_then_sends() {
        let mut composer = composer();
        type_text(&mut composer, "hey @al");
        assert!(composer.autocomplete().is_active());

        assert_eq!(composer.handle_key(Key::Enter), ComposeAction::Redraw);
        assert_eq!(composer.value(), "hey <@alice_id> ");

        assert_eq!(
            composer.handle_key(Key::Enter),
            ComposeAction::Send("hey <@alice_id>".to_string())
        );
        assert_eq!(composer.value(), "");
    }

    #[test]
    fn test_emoji_via_tab() {
        let mut composer = composer();
        type_text(&mut composer, "nice :tad");
        composer.handle_key(Key::Tab);
        assert_eq!(composer.value(), "nice :tada: ");
    }

    #[test]
    fn test_blank_not_sent() {
        let mut composer = composer();
        type_text(&mut composer, "   ");
        assert_eq!(composer.handle_key(Key::Enter), ComposeAction::None);
    }

    #[test]
    fn test_draft_restore_resolves() {
        let mut composer = composer();
        composer.set_draft("ping @ali");
        assert!(composer.autocomplete().is_active());
    }
}
