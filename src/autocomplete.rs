//! Autocomplete state machine
//!
//! Owns the suggestion list for one text field. The view feeds it input
//! events; it re-runs the tokenizer and resolver as the text changes and
//! splices the chosen candidate into the buffer.
//!
//! ```text
//! None ──text/focus with matches──▶ Active ──empty/escape/commit──▶ None
//!                                     │ ▲
//!                                     └─┘ arrows, hover, refresh
//! ```
//!
//! While the field is unfocused the visible state is always `None`.

use crate::completion::{locate, Candidate, CandidateKind, CandidateResolver, Grammar, Selection};
use crate::directory::SearchClues;
use crate::editor::{InputLine, Key};
use crate::search::UserIdentifierMapping;
use crate::splice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveState {
    pub kind: CandidateKind,
    /// Never empty
    pub candidates: Vec<Candidate>,
    /// Always a valid index into `candidates`
    pub selected: usize,
    /// Pointer is over the suggestion list
    pub pointer_over: bool,
}

impl ActiveState {
    pub fn selected_candidate(&self) -> &Candidate {
        &self.candidates[self.selected]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AutocompleteState {
    #[default]
    None,
    Active(ActiveState),
}

impl AutocompleteState {
    /// Build a state, collapsing an empty list to `None` and clamping the selection
    pub fn active(kind: CandidateKind, candidates: Vec<Candidate>, selected: usize) -> Self {
        if candidates.is_empty() {
            return AutocompleteState::None;
        }
        let selected = selected.min(candidates.len() - 1);
        AutocompleteState::Active(ActiveState {
            kind,
            candidates,
            selected,
            pointer_over: false,
        })
    }

    pub fn is_active(&self) -> bool {
        matches!(self, AutocompleteState::Active(_))
    }

    pub fn as_active(&self) -> Option<&ActiveState> {
        match self {
            AutocompleteState::Active(active) => Some(active),
            AutocompleteState::None => None,
        }
    }
}

static INACTIVE: AutocompleteState = AutocompleteState::None;

/// Autocomplete session for one text field
pub struct Autocomplete {
    resolver: CandidateResolver,
    clues: SearchClues,
    grammar: Grammar,
    state: AutocompleteState,
    focused: bool,
    /// Blur arrived while the pointer was over the list
    blur_pending: bool,
    identifiers: UserIdentifierMapping,
}

impl Autocomplete {
    pub fn new(resolver: CandidateResolver, clues: SearchClues, grammar: Grammar) -> Self {
        Self {
            resolver,
            clues,
            grammar,
            state: AutocompleteState::None,
            focused: false,
            blur_pending: false,
            identifiers: UserIdentifierMapping::new(),
        }
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// State as the view should render it
    pub fn visible_state(&self) -> &AutocompleteState {
        if self.focused {
            &self.state
        } else {
            &INACTIVE
        }
    }

    pub fn is_active(&self) -> bool {
        self.visible_state().is_active()
    }

    /// Replace the state; empty candidate lists collapse to `None`
    pub fn set_state(&mut self, state: AutocompleteState) {
        self.state = match state {
            AutocompleteState::Active(active) => {
                let pointer_over = active.pointer_over;
                let mut state = AutocompleteState::active(active.kind, active.candidates, active.selected);
                if let AutocompleteState::Active(ref mut active) = state {
                    active.pointer_over = pointer_over;
                }
                state
            }
            AutocompleteState::None => AutocompleteState::None,
        };
    }

    /// Usernames picked through `from:`/`mentions:` completion
    pub fn identifiers(&self) -> &UserIdentifierMapping {
        &self.identifiers
    }

    pub fn identifiers_mut(&mut self) -> &mut UserIdentifierMapping {
        &mut self.identifiers
    }

    /// Re-run tokenizer and resolver for the current text
    pub fn on_text_changed(&mut self, text: &str, selection: Selection) {
        let resolved = locate(text, selection, self.grammar).and_then(|trigger| {
            self.resolver
                .resolve(trigger.kind, &trigger.partial_term, &self.clues)
                .map(|candidates| (CandidateKind::from(trigger.kind), candidates))
        });

        let previous = self.state.as_active().map(|a| a.selected).unwrap_or(0);

        self.state = match resolved {
            Some((kind, candidates)) => AutocompleteState::active(kind, candidates, previous),
            None => AutocompleteState::None,
        };
    }

    /// Handle a key before the editor sees it, returns true if consumed
    pub fn on_key_down(&mut self, key: Key, line: &mut InputLine) -> bool {
        if !self.focused {
            return false;
        }
        let AutocompleteState::Active(active) = &mut self.state else {
            return false;
        };

        match key {
            Key::Up => {
                active.selected = active.selected.saturating_sub(1);
                true
            }
            Key::Down => {
                active.selected = (active.selected + 1).min(active.candidates.len() - 1);
                true
            }
            Key::Enter | Key::Tab => {
                let candidate = active.selected_candidate().clone();
                self.commit(&candidate, line);
                true
            }
            Key::Escape => {
                self.state = AutocompleteState::None;
                true
            }
            _ => false,
        }
    }

    /// Handle a key after the editor applied it
    pub fn on_key_up(&mut self, key: Key, line: &InputLine) {
        match key {
            Key::Up | Key::Down | Key::Enter | Key::Tab | Key::Escape => {}
            _ => self.on_text_changed(line.value(), line.selection()),
        }
    }

    /// Commit the candidate at `index`, returns true if the buffer changed
    pub fn on_click(&mut self, index: usize, line: &mut InputLine) -> bool {
        let Some(candidate) = self
            .state
            .as_active()
            .and_then(|active| active.candidates.get(index))
            .cloned()
        else {
            return false;
        };

        self.blur_pending = false;
        self.focused = true;
        self.commit(&candidate, line)
    }

    pub fn on_focus(&mut self, line: &InputLine) {
        self.focused = true;
        self.blur_pending = false;
        self.on_text_changed(line.value(), line.selection());
    }

    pub fn on_blur(&mut self) {
        match &self.state {
            // a click on a candidate is on its way, don't hide the list under it
            AutocompleteState::Active(active) if active.pointer_over => {
                self.blur_pending = true;
            }
            _ => {
                self.focused = false;
                self.blur_pending = false;
            }
        }
    }

    pub fn on_pointer_enter(&mut self, index: usize) {
        if let AutocompleteState::Active(active) = &mut self.state {
            if index >= active.candidates.len() {
                return;
            }
            if active.selected == index && active.pointer_over {
                return;
            }
            active.selected = index;
            active.pointer_over = true;
        }
    }

    pub fn on_pointer_leave(&mut self) {
        if let AutocompleteState::Active(active) = &mut self.state {
            if active.pointer_over {
                active.pointer_over = false;
            }
        }
        if self.blur_pending {
            self.blur_pending = false;
            self.focused = false;
        }
    }

    fn commit(&mut self, candidate: &Candidate, line: &mut InputLine) -> bool {
        self.state = AutocompleteState::None;

        match splice::commit(
            line.value(),
            line.selection(),
            candidate,
            self.grammar,
            &mut self.identifiers,
        ) {
            Some(spliced) => {
                line.set(spliced.text, spliced.cursor);
                true
            }
            None => false,
        }
    }
}
