//! Search bar session
//!
//! Couples the text buffer with filter-aware autocomplete, the picked date
//! range, the filter options panel and the rejected-query notice.
//!
//! ```text
//! keystroke ──▶ autocomplete (from:/mentions:) ──▶ splice ──▶ buffer
//! Enter     ──▶ compile ──▶ Submit(request) | notice | nothing
//! ```

mod compile;
mod grammar;
mod mapping;
mod request;

use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::autocomplete::Autocomplete;
use crate::completion::tokenizer::is_word_char;
use crate::completion::{CandidateResolver, Grammar};
use crate::config::Config;
use crate::directory::SearchClues;
use crate::editor::{splice_chars, EditorAction, History, InputLine, Key};
use crate::error::QueryError;

pub use compile::{compile, end_of_day, start_of_day};
pub use grammar::{scan, FilterKind, FilterToken, TokenValue};
pub use mapping::UserIdentifierMapping;
pub use request::{ActiveDateRange, AttachmentType, StructuredSearchRequest};

/// Filters offered in the options panel, with descriptions
pub const FILTER_OPTIONS: &[(FilterKind, &str)] = &[
    (FilterKind::From, "Messages sent by a user"),
    (FilterKind::Mentions, "Messages that mention a user"),
    (FilterKind::Has, "Messages with an attachment: video, image, link, audio, file"),
    (FilterKind::Before, "Messages before a date"),
    (FilterKind::After, "Messages after a date"),
    (FilterKind::During, "Messages on a date"),
    (FilterKind::Between, "Messages between two dates"),
    (FilterKind::ServerWide, "Search every channel in the server"),
];

/// What the view should do after a search bar event
#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    None,
    Redraw,
    Submit(StructuredSearchRequest),
}

/// Options panel visibility
///
/// After a completion is committed the panel comes back in two steps, each
/// advanced when the view acknowledges it rendered the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Hidden,
    /// Completion committed, buffer update not rendered yet
    Selecting,
    /// Buffer rendered, options not yet
    Settling,
    OptionsVisible,
}

#[derive(Debug)]
struct OptionsPanel {
    phase: PanelPhase,
    mounted: bool,
}

impl OptionsPanel {
    fn new() -> Self {
        Self {
            phase: PanelPhase::Hidden,
            mounted: true,
        }
    }

    fn set(&mut self, phase: PanelPhase) {
        if self.mounted {
            self.phase = phase;
        }
    }

    fn acknowledge(&mut self) {
        if !self.mounted {
            return;
        }
        self.phase = match self.phase {
            PanelPhase::Selecting => PanelPhase::Settling,
            PanelPhase::Settling => PanelPhase::OptionsVisible,
            phase => phase,
        };
    }

    fn unmount(&mut self) {
        self.mounted = false;
        self.phase = PanelPhase::Hidden;
    }
}

/// A rejected query message that dismisses itself
#[derive(Debug, Clone)]
struct Notice {
    error: QueryError,
    expires_at: Instant,
}

pub struct SearchBar {
    line: InputLine,
    autocomplete: Autocomplete,
    date_range: Option<ActiveDateRange>,
    notice: Option<Notice>,
    notice_duration: Duration,
    panel: OptionsPanel,
    history: History,
}

impl SearchBar {
    pub fn new(resolver: CandidateResolver, clues: SearchClues, config: &Config) -> Self {
        Self {
            line: InputLine::new(),
            autocomplete: Autocomplete::new(resolver, clues, Grammar::Search),
            date_range: None,
            notice: None,
            notice_duration: config.notice_duration(),
            panel: OptionsPanel::new(),
            history: History::new(config.history_size),
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

    pub fn identifiers(&self) -> &UserIdentifierMapping {
        self.autocomplete.identifiers()
    }

    pub fn date_range(&self) -> Option<&ActiveDateRange> {
        self.date_range.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn panel_phase(&self) -> PanelPhase {
        self.panel.phase
    }

    /// Options to render, empty unless the panel is fully visible
    pub fn visible_options(&self) -> &'static [(FilterKind, &'static str)] {
        if self.panel.phase == PanelPhase::OptionsVisible && !self.autocomplete.is_active() {
            FILTER_OPTIONS
        } else {
            &[]
        }
    }

    /// The current notice, if it has not expired
    pub fn notice(&self, now: Instant) -> Option<&QueryError> {
        self.notice
            .as_ref()
            .filter(|n| now < n.expires_at)
            .map(|n| &n.error)
    }

    /// Drop an expired notice, returns true if one was removed
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.notice {
            Some(n) if now >= n.expires_at => {
                self.notice = None;
                true
            }
            _ => false,
        }
    }

    /// The view rendered the last update
    pub fn acknowledge_render(&mut self) {
        self.panel.acknowledge();
    }

    /// The view is gone; pending panel steps are ignored
    pub fn unmount(&mut self) {
        self.panel.unmount();
    }

    pub fn on_focus(&mut self) {
        self.autocomplete.on_focus(&self.line);
        if !self.autocomplete.is_active() {
            self.panel.set(PanelPhase::OptionsVisible);
        }
    }

    pub fn on_blur(&mut self) {
        self.autocomplete.on_blur();
        if !self.autocomplete.is_focused() {
            self.panel.set(PanelPhase::Hidden);
        }
    }

    pub fn on_pointer_enter(&mut self, index: usize) {
        self.autocomplete.on_pointer_enter(index);
    }

    pub fn on_pointer_leave(&mut self) {
        self.autocomplete.on_pointer_leave();
        if !self.autocomplete.is_focused() {
            self.panel.set(PanelPhase::Hidden);
        }
    }

    /// A suggestion was clicked
    pub fn on_click(&mut self, index: usize) -> SearchAction {
        if self.autocomplete.on_click(index, &mut self.line) {
            self.after_commit();
            SearchAction::Redraw
        } else {
            SearchAction::None
        }
    }

    pub fn handle_key(&mut self, key: Key, now: Instant) -> SearchAction {
        let was_active = self.autocomplete.is_active();
        if self.autocomplete.on_key_down(key, &mut self.line) {
            if was_active && matches!(key, Key::Enter | Key::Tab) {
                self.after_commit();
            }
            return SearchAction::Redraw;
        }

        if key == Key::Backspace && self.remove_atomic_before_cursor() {
            self.history.reset();
            self.after_edit();
            return SearchAction::Redraw;
        }

        if key == Key::Escape && self.panel.phase != PanelPhase::Hidden {
            self.panel.set(PanelPhase::Hidden);
            return SearchAction::Redraw;
        }

        match self.line.handle_event(key) {
            EditorAction::Edited => {
                self.history.reset();
                self.after_edit();
                SearchAction::Redraw
            }
            EditorAction::Moved => {
                self.autocomplete.on_key_up(key, &self.line);
                self.sync_panel();
                SearchAction::Redraw
            }
            EditorAction::Submit => self.submit(now),
            EditorAction::HistoryPrev => match self.history.prev(self.line.value()) {
                Some(entry) => self.recall(entry),
                None => SearchAction::None,
            },
            EditorAction::HistoryNext => match self.history.next() {
                Some(entry) => self.recall(entry),
                None => SearchAction::None,
            },
            EditorAction::None => SearchAction::None,
        }
    }

    /// Compile the current text
    pub fn submit(&mut self, now: Instant) -> SearchAction {
        match compile(self.line.value(), self.autocomplete.identifiers(), self.date_range.as_ref()) {
            Ok(request) => {
                tracing::debug!(query = %request.query, "search submitted");
                self.history.push(self.line.value().to_string());
                self.notice = None;
                SearchAction::Submit(request)
            }
            Err(err) if err.is_silent() => {
                tracing::trace!(%err, "search not submitted");
                SearchAction::None
            }
            Err(err) => {
                tracing::debug!(%err, "search rejected");
                self.notice = Some(Notice {
                    error: err,
                    expires_at: now + self.notice_duration,
                });
                SearchAction::Redraw
            }
        }
    }

    /// Insert a filter prefix (or the `server-wide` flag) at the cursor
    pub fn insert_filter(&mut self, kind: FilterKind) {
        if kind == FilterKind::DateRange {
            return;
        }

        let token = if kind == FilterKind::ServerWide {
            format!("{} ", kind.token())
        } else {
            kind.token().to_string()
        };
        self.insert_at_cursor(&token);

        if kind == FilterKind::ServerWide {
            self.panel.set(PanelPhase::Selecting);
        } else {
            self.panel.set(PanelPhase::Hidden);
        }
    }

    /// Fill a `before:`/`after:`/`during:` filter from a date picker
    ///
    /// Completes a bare prefix right before the cursor, replaces the value of
    /// an existing filter of the same kind, or inserts a new one.
    pub fn pick_date(&mut self, kind: FilterKind, date: NaiveDate) -> bool {
        if !matches!(kind, FilterKind::Before | FilterKind::After | FilterKind::During) {
            return false;
        }
        let value = date.format("%Y-%m-%d").to_string();

        let cursor = self.line.cursor();
        let before_cursor: Vec<char> = self.line.value().chars().take(cursor).collect();
        if ends_with_name(&before_cursor, kind) {
            self.line.replace_range(cursor, cursor, &format!("{} ", value));
            self.after_edit();
        } else if let Some(existing) = scan(self.line.value()).into_iter().find(|t| t.kind == kind) {
            let replacement = format!("{}{}", kind.token(), value);
            let (text, spliced) = splice_chars(
                self.line.value(),
                existing.chars.start,
                existing.chars.end,
                &replacement,
            );
            let cursor = if cursor >= existing.chars.end {
                cursor + replacement.chars().count() - existing.chars.len()
            } else {
                spliced
            };
            self.line.set(text, cursor);
            self.after_edit();
        } else {
            self.insert_at_cursor(&format!("{}{} ", kind.token(), value));
        }

        self.panel.set(PanelPhase::Selecting);
        true
    }

    /// Hold a picked range and show it as the `date-range` placeholder
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let has_placeholder = scan(self.line.value())
            .iter()
            .any(|t| t.kind == FilterKind::DateRange);
        if !has_placeholder {
            self.insert_at_cursor(&format!("{} ", FilterKind::DateRange.token()));
        }
        self.date_range = Some(ActiveDateRange::new(start, end));
        self.panel.set(PanelPhase::Selecting);
    }

    /// Remove every token of a kind, keeping the cursor on the same text
    pub fn remove_filter(&mut self, kind: FilterKind) {
        let text = self.line.value().to_string();
        let chars: Vec<char> = text.chars().collect();
        let original = self.line.cursor();

        // tokens separated only by whitespace go as one block
        let mut blocks: Vec<(usize, usize)> = Vec::new();
        for token in scan(&text).into_iter().filter(|t| t.kind == kind) {
            match blocks.last_mut() {
                Some((_, end)) if chars[*end..token.chars.start].iter().all(|c| c.is_whitespace()) => {
                    *end = token.chars.end;
                }
                _ => blocks.push((token.chars.start, token.chars.end)),
            }
        }

        if blocks.is_empty() {
            return;
        }

        // take one separating space with each block
        let ranges = blocks.into_iter().map(|(start, end)| {
            if chars.get(end).is_some_and(|c| c.is_whitespace()) {
                (start, end + 1)
            } else if start > 0 && chars[start - 1].is_whitespace() {
                (start - 1, end)
            } else {
                (start, end)
            }
        });

        let mut out = String::with_capacity(text.len());
        let mut cursor = original;
        let mut pos = 0;
        for (start, end) in ranges {
            out.extend(&chars[pos..start]);
            cursor -= original.min(end).saturating_sub(start);
            pos = end;
        }
        out.extend(&chars[pos..]);

        self.line.set(out, cursor);
        self.after_edit();
    }

    /// Clear the text and everything tied to it
    pub fn reset(&mut self) {
        self.line.clear();
        self.autocomplete.identifiers_mut().clear();
        self.date_range = None;
        self.notice = None;
        self.history.reset();
        self.autocomplete.on_text_changed("", self.line.selection());
    }

    fn insert_at_cursor(&mut self, token: &str) {
        let cursor = self.line.cursor();
        let needs_space = cursor > 0
            && self
                .line
                .value()
                .chars()
                .nth(cursor - 1)
                .is_some_and(|c| !c.is_whitespace());

        let insert = if needs_space {
            format!(" {}", token)
        } else {
            token.to_string()
        };
        self.line.replace_range(cursor, cursor, &insert);
        self.after_edit();
    }

    /// Backspace right after a `has:`, `server-wide` or `date-range` token
    /// removes the whole token
    fn remove_atomic_before_cursor(&mut self) -> bool {
        let cursor = self.line.cursor();
        let Some(token) = scan(self.line.value())
            .into_iter()
            .find(|t| t.kind.is_atomic() && t.chars.end == cursor)
        else {
            return false;
        };

        let (text, cursor) = splice_chars(self.line.value(), token.chars.start, token.chars.end, "");
        self.line.set(text, cursor);
        true
    }

    fn recall(&mut self, entry: String) -> SearchAction {
        let len = entry.chars().count();
        self.line.set(entry, len);
        self.after_edit();
        SearchAction::Redraw
    }

    fn after_commit(&mut self) {
        self.panel.set(PanelPhase::Selecting);
        self.after_edit();
    }

    /// Keep held state consistent with the text and refresh suggestions
    fn after_edit(&mut self) {
        if self.line.is_empty() {
            self.autocomplete.identifiers_mut().clear();
            self.date_range = None;
        } else if self.date_range.is_some()
            && !scan(self.line.value())
                .iter()
                .any(|t| t.kind == FilterKind::DateRange)
        {
            tracing::debug!("date-range placeholder removed, dropping picked range");
            self.date_range = None;
        }

        self.autocomplete
            .on_text_changed(self.line.value(), self.line.selection());
        self.sync_panel();
    }

    fn sync_panel(&mut self) {
        if self.autocomplete.is_active() {
            self.panel.set(PanelPhase::Hidden);
        }
    }
}

/// `kind`'s name ends the text and starts at a word boundary
fn ends_with_name(chars: &[char], kind: FilterKind) -> bool {
    let name: Vec<char> = kind.token().chars().collect();
    let Some(at) = chars.len().checked_sub(name.len()) else {
        return false;
    };
    let boundary = at == 0 || !is_word_char(chars[at - 1]);
    boundary
        && chars[at..]
            .iter()
            .zip(&name)
            .all(|(c, n)| c.to_ascii_lowercase() == *n)
}
