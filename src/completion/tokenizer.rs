//! Cursor tokenizer
//!
//! Finds the trigger the cursor is sitting in, if any. Two grammars share
//! the same scanner:
//!
//! - `Compose` reacts to bare markers: `@user`, `#channel`, `:emoji`
//! - `Search` reacts to named filters: `from:user`, `mentions:user`
//!
//! All positions are character offsets into the text.

use std::fmt;

/// Named filters that take a user as their value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterName {
    From,
    Mentions,
}

impl FilterName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterName::From => "from",
            FilterName::Mentions => "mentions",
        }
    }

    fn all() -> [FilterName; 2] {
        [FilterName::From, FilterName::Mentions]
    }
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// `@` in composed messages
    Mention,
    /// `#` in composed messages
    ChannelRef,
    /// `:` in composed messages
    Emoji,
    /// `from:` / `mentions:` in the search bar
    NamedFilter(FilterName),
}

/// Which triggers a text field reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    Compose {
        mentions: bool,
        channels: bool,
        emoji: bool,
    },
    Search,
}

impl Grammar {
    /// Composer grammar with every marker enabled
    pub fn compose() -> Self {
        Grammar::Compose {
            mentions: true,
            channels: true,
            emoji: true,
        }
    }

    fn marker_kind(&self, c: char) -> Option<TriggerKind> {
        let Grammar::Compose {
            mentions,
            channels,
            emoji,
        } = *self
        else {
            return None;
        };

        match c {
            '@' if mentions => Some(TriggerKind::Mention),
            '#' if channels => Some(TriggerKind::ChannelRef),
            ':' if emoji => Some(TriggerKind::Emoji),
            _ => None,
        }
    }
}

/// Selection within the text, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn collapsed(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// The trigger the cursor is inside
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    pub kind: TriggerKind,
    /// Case-folded term typed so far, including any continuation after the cursor
    pub partial_term: String,
    /// First character of the term (right after the marker)
    pub term_start: usize,
    /// One past the last character a completion replaces
    pub span_end: usize,
}

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Locate the trigger under the cursor
pub fn locate(text: &str, selection: Selection, grammar: Grammar) -> Option<TriggerMatch> {
    if !selection.is_collapsed() {
        return None;
    }

    let chars: Vec<char> = text.chars().collect();
    let cursor = selection.end.min(chars.len());

    match grammar {
        Grammar::Compose { .. } => locate_marker(&chars, cursor, grammar),
        Grammar::Search => locate_filter(&chars, cursor),
    }
}

fn locate_marker(chars: &[char], cursor: usize, grammar: Grammar) -> Option<TriggerMatch> {
    let mut start = cursor;
    while start > 0 && is_word_char(chars[start - 1]) {
        start -= 1;
    }

    // run reached the start of the text without a marker
    if start == 0 {
        return None;
    }

    let kind = grammar.marker_kind(chars[start - 1])?;

    let mut end = cursor;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }

    Some(TriggerMatch {
        kind,
        partial_term: fold(&chars[start..end]),
        term_start: start,
        span_end: end,
    })
}

fn locate_filter(chars: &[char], cursor: usize) -> Option<TriggerMatch> {
    // The value runs back to the nearest whitespace; the first filter name
    // inside that run at a word boundary owns the rest of it.
    let mut run_start = cursor;
    while run_start > 0 && !chars[run_start - 1].is_whitespace() {
        run_start -= 1;
    }

    let (name, term_start) = (run_start..cursor).find_map(|at| {
        if at > 0 && is_word_char(chars[at - 1]) {
            return None;
        }
        FilterName::all().into_iter().find_map(|name| {
            let prefix: Vec<char> = name.to_string().chars().collect();
            let end = at + prefix.len();
            let matches = end <= cursor
                && chars[at..end]
                    .iter()
                    .zip(&prefix)
                    .all(|(c, p)| c.to_ascii_lowercase() == *p);
            matches.then_some((name, end))
        })
    })?;

    let mut end = cursor;
    while end < chars.len() && !chars[end].is_whitespace() {
        end += 1;
    }

    let value = &chars[term_start..end];
    let value = value.strip_prefix(&['@']).unwrap_or(value);

    Some(TriggerMatch {
        kind: TriggerKind::NamedFilter(name),
        partial_term: fold(value),
        term_start,
        span_end: end,
    })
}

fn fold(chars: &[char]) -> String {
    chars.iter().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_end(text: &str, grammar: Grammar) -> Option<TriggerMatch> {
        locate(text, Selection::collapsed(text.chars().count()), grammar)
    }

    #[test]
    fn test_mention_at_end() {
        let m = at_end("hello @Al", Grammar::compose()).unwrap();
        assert_eq!(m.kind, TriggerKind::Mention);
        assert_eq!(m.partial_term, "al");
        assert_eq!(m.term_start, 7);
        assert_eq!(m.span_end, 9);
    }

    #[test]
    fn test_bare_marker() {
        let m = at_end("see #", Grammar::compose()).unwrap();
        assert_eq!(m.kind, TriggerKind::ChannelRef);
        assert_eq!(m.partial_term, "");
        assert_eq!(m.term_start, 5);
    }

    #[test]
    fn test_emoji_marker() {
        let m = at_end("nice :thu", Grammar::compose()).unwrap();
        assert_eq!(m.kind, TriggerKind::Emoji);
        assert_eq!(m.partial_term, "thu");
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(at_end("hello", Grammar::compose()), None);
        assert_eq!(at_end("hello world", Grammar::compose()), None);
        assert_eq!(at_end("hello ", Grammar::compose()), None);
    }

    #[test]
    fn test_range_selection_never_triggers() {
        let sel = Selection { start: 6, end: 8 };
        assert_eq!(locate("hello @al", sel, Grammar::compose()), None);
    }

    #[test]
    fn test_forward_continuation() {
        // cursor between "@al" and "ice"
        let m = locate("hi @alice!", Selection::collapsed(6), Grammar::compose()).unwrap();
        assert_eq!(m.partial_term, "alice");
        assert_eq!(m.term_start, 4);
        assert_eq!(m.span_end, 9);
    }

    #[test]
    fn test_disabled_marker() {
        let grammar = Grammar::Compose {
            mentions: true,
            channels: false,
            emoji: false,
        };
        assert_eq!(at_end("see #gen", grammar), None);
        assert_eq!(at_end("ok :smi", grammar), None);
        assert!(at_end("@bo", grammar).is_some());
    }

    #[test]
    fn test_marker_at_start() {
        let m = at_end("@bo", Grammar::compose()).unwrap();
        assert_eq!(m.partial_term, "bo");
        assert_eq!(m.term_start, 1);
    }

    #[test]
    fn test_unicode_positions() {
        let m = at_end("héllo @ré", Grammar::compose()).unwrap();
        assert_eq!(m.term_start, 7);
        assert_eq!(m.span_end, 9);
        assert_eq!(m.partial_term, "ré");
    }

    #[test]
    fn test_filter_prefix() {
        let m = at_end("test from:bo", Grammar::Search).unwrap();
        assert_eq!(m.kind, TriggerKind::NamedFilter(FilterName::From));
        assert_eq!(m.partial_term, "bo");
        assert_eq!(m.term_start, 10);
    }

    #[test]
    fn test_filter_skips_at_sign() {
        let m = at_end("MENTIONS:@Bo", Grammar::Search).unwrap();
        assert_eq!(m.kind, TriggerKind::NamedFilter(FilterName::Mentions));
        assert_eq!(m.partial_term, "bo");
        assert_eq!(m.term_start, 9);
        assert_eq!(m.span_end, 12);
    }

    #[test]
    fn test_filter_empty_value() {
        let m = at_end("from:", Grammar::Search).unwrap();
        assert_eq!(m.partial_term, "");
        assert_eq!(m.term_start, 5);
    }

    #[test]
    fn test_filter_edit_in_place() {
        // cursor inside an already completed value
        let text = "from:@alice hello";
        let m = locate(text, Selection::collapsed(8), Grammar::Search).unwrap();
        assert_eq!(m.partial_term, "alice");
        assert_eq!(m.term_start, 5);
        assert_eq!(m.span_end, 11);
    }

    #[test]
    fn test_filter_needs_boundary() {
        assert_eq!(at_end("xfrom:bo", Grammar::Search), None);
        assert_eq!(at_end("before:2024", Grammar::Search), None);
        assert_eq!(at_end("from:bob ", Grammar::Search), None);
    }

    #[test]
    fn test_filter_after_punctuation() {
        let m = at_end("(from:bo", Grammar::Search).unwrap();
        assert_eq!(m.kind, TriggerKind::NamedFilter(FilterName::From));
        assert_eq!(m.partial_term, "bo");
        assert_eq!(m.term_start, 6);

        let m = at_end("cats,mentions:@Al", Grammar::Search).unwrap();
        assert_eq!(m.kind, TriggerKind::NamedFilter(FilterName::Mentions));
        assert_eq!(m.partial_term, "al");
        assert_eq!(m.term_start, 14);

        // a later name inside the value does not start a new trigger
        let m = at_end("from:a,mentions:b", Grammar::Search).unwrap();
        assert_eq!(m.kind, TriggerKind::NamedFilter(FilterName::From));
        assert_eq!(m.partial_term, "a,mentions:b");
    }

    #[test]
    fn test_search_grammar_ignores_markers() {
        assert_eq!(at_end("hello @al", Grammar::Search), None);
    }
}
