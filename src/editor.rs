//! Single-line text buffer behind the composer and the search bar
//!
//! Provides:
//! - Cursor movement (arrow keys, home/end)
//! - Character insertion and deletion
//! - Whole-range replacement for autocomplete splices
//! - Recent entry history (up/down arrows)

use tui_input::{Input, InputRequest};

use crate::completion::Selection;

/// Key events routed to the composer and the search bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Escape,
}

impl Key {
    /// Keys that only move the cursor
    pub fn is_navigation(&self) -> bool {
        matches!(self, Key::Left | Key::Right | Key::Home | Key::End)
    }
}

/// Result of handling an editor event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    /// Nothing changed
    None,
    /// Cursor moved, text unchanged
    Moved,
    /// Text changed
    Edited,
    /// Enter pressed
    Submit,
    /// Up pressed
    HistoryPrev,
    /// Down pressed
    HistoryNext,
}

/// Text buffer with a character cursor
#[derive(Debug, Clone, Default)]
pub struct InputLine {
    input: Input,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    pub fn selection(&self) -> Selection {
        Selection::collapsed(self.cursor())
    }

    pub fn len(&self) -> usize {
        self.input.value().chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.input.value().is_empty()
    }

    /// Replace the whole buffer
    pub fn set(&mut self, value: impl Into<String>, cursor: usize) {
        let value = value.into();
        let cursor = cursor.min(value.chars().count());
        self.input = Input::new(value).with_cursor(cursor);
    }

    pub fn clear(&mut self) {
        self.input.reset();
    }

    /// Replace characters `start..end` with `text`, cursor after the insert
    pub fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        let (value, cursor) = splice_chars(self.value(), start, end, text);
        self.set(value, cursor);
    }

    /// Handle a key, returns what changed
    pub fn handle_event(&mut self, key: Key) -> EditorAction {
        let request = match key {
            Key::Char(c) => InputRequest::InsertChar(c),
            Key::Backspace => InputRequest::DeletePrevChar,
            Key::Delete => InputRequest::DeleteNextChar,
            Key::Left => InputRequest::GoToPrevChar,
            Key::Right => InputRequest::GoToNextChar,
            Key::Home => InputRequest::GoToStart,
            Key::End => InputRequest::GoToEnd,
            Key::Enter => return EditorAction::Submit,
            Key::Up => return EditorAction::HistoryPrev,
            Key::Down => return EditorAction::HistoryNext,
            Key::Tab | Key::Escape => return EditorAction::None,
        };

        match self.input.handle(request) {
            Some(change) if change.value => EditorAction::Edited,
            Some(change) if change.cursor => EditorAction::Moved,
            _ => EditorAction::None,
        }
    }
}

/// Replace characters `start..end` of `text`; returns the new text and the
/// character position right after the replacement
pub fn splice_chars(text: &str, start: usize, end: usize, replacement: &str) -> (String, usize) {
    let len = text.chars().count();
    let end = end.min(len);
    let start = start.min(end);

    let mut out: String = text.chars().take(start).collect();
    out.push_str(replacement);
    let cursor = out.chars().count();
    out.extend(text.chars().skip(end));

    (out, cursor)
}

/// Recent entries, newest last
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    max_size: usize,
    /// Position while navigating (None = editing new input)
    pos: Option<usize>,
    /// Input saved when navigation started
    saved: String,
}

impl History {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
            pos: None,
            saved: String::new(),
        }
    }

    pub fn push(&mut self, entry: String) {
        self.reset();
        if entry.trim().is_empty() || self.entries.last() == Some(&entry) {
            return;
        }
        self.entries.push(entry);
        if self.entries.len() > self.max_size {
            self.entries.remove(0);
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Stop navigating (user started typing)
    pub fn reset(&mut self) {
        self.pos = None;
        self.saved.clear();
    }

    /// Step to the previous entry, returns the text to show
    pub fn prev(&mut self, current: &str) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        let pos = match self.pos {
            None => {
                self.saved = current.to_string();
                self.entries.len() - 1
            }
            Some(0) => return None,
            Some(pos) => pos - 1,
        };

        self.pos = Some(pos);
        self.entries.get(pos).cloned()
    }

    /// Step to the next entry, returning to the saved input past the newest
    pub fn next(&mut self) -> Option<String> {
        let pos = self.pos?;
        if pos + 1 >= self.entries.len() {
            self.pos = None;
            return Some(std::mem::take(&mut self.saved));
        }

        self.pos = Some(pos + 1);
        self.entries.get(pos + 1).cloned()
    }
}
