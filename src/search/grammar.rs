//! Filter grammar for the search bar
//!
//! Tokens start at a word boundary: the beginning of the text or after any
//! non-word character. Filter names are case-insensitive.
//!
//! ```text
//! from:@alice  mentions:@bob  has:image  server-wide  date-range
//! before:2024-01-10  after:2024-01-10  during:2024-01-10
//! between:2024-01-01..2024-01-31
//! ```

use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

const DATE: &str = r"\d{4}-\d{2}-\d{2}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    From,
    Mentions,
    Before,
    After,
    During,
    Between,
    Has,
    ServerWide,
    /// Placeholder for a range picked outside the text
    DateRange,
}

impl FilterKind {
    /// Filters that may appear at most once with a value
    pub const SINGLE_VALUED: [FilterKind; 6] = [
        FilterKind::From,
        FilterKind::Mentions,
        FilterKind::Before,
        FilterKind::After,
        FilterKind::During,
        FilterKind::Between,
    ];

    /// Text that starts this token in the query
    pub fn token(&self) -> &'static str {
        match self {
            FilterKind::From => "from:",
            FilterKind::Mentions => "mentions:",
            FilterKind::Before => "before:",
            FilterKind::After => "after:",
            FilterKind::During => "during:",
            FilterKind::Between => "between:",
            FilterKind::Has => "has:",
            FilterKind::ServerWide => "server-wide",
            FilterKind::DateRange => "date-range",
        }
    }

    /// Tokens with no user-typed value, removed whole by backspace
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            FilterKind::Has | FilterKind::ServerWide | FilterKind::DateRange
        )
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_lowercase().as_str() {
            "from" => FilterKind::From,
            "mentions" => FilterKind::Mentions,
            "before" => FilterKind::Before,
            "after" => FilterKind::After,
            "during" => FilterKind::During,
            "between" => FilterKind::Between,
            "has" => FilterKind::Has,
            _ => return None,
        })
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValue {
    None,
    /// Username (without `@`), date, or attachment type
    Text(String),
    /// `between:` bounds
    Range(String, String),
}

/// A complete filter token found in the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterToken {
    pub kind: FilterKind,
    pub value: TokenValue,
    /// Byte range of the token
    pub bytes: Range<usize>,
    /// Character range of the token
    pub chars: Range<usize>,
}

struct Patterns {
    user: Regex,
    date: Regex,
    between: Regex,
    has: Regex,
    flag: Regex,
    has_prefix: Regex,
    date_range: Regex,
    incomplete: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let build = |pattern: &str| Regex::new(pattern).expect("filter pattern compiles");
        Patterns {
            user: build(r"(?i)(?:^|\W)(?P<tok>(?P<name>from|mentions):@?(?P<val>[^\s@]\S*))"),
            date: build(&format!(
                r"(?i)(?:^|\W)(?P<tok>(?P<name>before|after|during):(?P<val>{DATE}))\b"
            )),
            between: build(&format!(
                r"(?i)(?:^|\W)(?P<tok>between:(?P<a>{DATE})\.\.(?P<b>{DATE}))\b"
            )),
            has: build(r"(?i)(?:^|\W)(?P<tok>has:(?P<val>video|image|link|audio|file))\b"),
            flag: build(r"(?i)(?:^|\W)(?P<tok>server-wide|date-range)(?:[^\w-]|$)"),
            has_prefix: build(r"(?i)(?:^|\W)has:"),
            date_range: build(r"(?i)(?P<lead>^|\W)date-range(?P<trail>[^\w-]|$)"),
            incomplete: build(
                r"(?i)(?:^|\W)(?:from|mentions|before|after|during|between|has):@?(?:\s|$)",
            ),
        }
    })
}

/// All complete filter tokens, in text order
pub fn scan(text: &str) -> Vec<FilterToken> {
    let p = patterns();
    let mut tokens = Vec::new();

    for caps in p.user.captures_iter(text) {
        if let Some(kind) = FilterKind::from_name(&caps["name"]) {
            tokens.push(token(text, kind, &caps, TokenValue::Text(caps["val"].to_string())));
        }
    }

    for caps in p.date.captures_iter(text) {
        if let Some(kind) = FilterKind::from_name(&caps["name"]) {
            tokens.push(token(text, kind, &caps, TokenValue::Text(caps["val"].to_string())));
        }
    }

    for caps in p.between.captures_iter(text) {
        let value = TokenValue::Range(caps["a"].to_string(), caps["b"].to_string());
        tokens.push(token(text, FilterKind::Between, &caps, value));
    }

    for caps in p.has.captures_iter(text) {
        let value = TokenValue::Text(caps["val"].to_lowercase());
        tokens.push(token(text, FilterKind::Has, &caps, value));
    }

    // flags share their surrounding separators, so scan them one at a time
    let mut offset = 0;
    while let Some(caps) = p.flag.captures_at(text, offset) {
        let kind = if caps["tok"].eq_ignore_ascii_case("server-wide") {
            FilterKind::ServerWide
        } else {
            FilterKind::DateRange
        };
        let tok = token(text, kind, &caps, TokenValue::None);
        offset = tok.bytes.end;
        tokens.push(tok);
    }

    tokens.sort_by_key(|t| t.bytes.start);

    // a user value runs to the next whitespace and may swallow other names
    let mut end = 0;
    tokens.retain(|t| {
        let keep = t.bytes.start >= end;
        if keep {
            end = t.bytes.end;
        }
        keep
    });
    tokens
}

fn token(text: &str, kind: FilterKind, caps: &regex::Captures<'_>, value: TokenValue) -> FilterToken {
    let m = caps.name("tok").map(|m| m.range()).unwrap_or(0..0);
    let start = text[..m.start].chars().count();
    let len = text[m.clone()].chars().count();
    FilterToken {
        kind,
        value,
        chars: start..start + len,
        bytes: m,
    }
}

/// Number of `has:` prefixes, complete or not
pub fn count_attachment_filters(text: &str) -> usize {
    patterns().has_prefix.find_iter(text).count()
}

/// Number of `date-range` placeholders
pub fn count_date_ranges(text: &str) -> usize {
    scan(text)
        .iter()
        .filter(|t| t.kind == FilterKind::DateRange)
        .count()
}

/// Replace the `date-range` placeholder
pub fn replace_date_range(text: &str, replacement: &str) -> String {
    patterns()
        .date_range
        .replace(text, |caps: &regex::Captures<'_>| {
            format!("{}{}{}", &caps["lead"], replacement, &caps["trail"])
        })
        .into_owned()
}

/// Any filter name still waiting for its value
pub fn has_incomplete(text: &str) -> bool {
    patterns().incomplete.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<FilterKind> {
        scan(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_scan_order() {
        assert_eq!(
            kinds("has:image hello from:@bob before:2024-01-10 server-wide"),
            vec![
                FilterKind::Has,
                FilterKind::From,
                FilterKind::Before,
                FilterKind::ServerWide
            ]
        );
    }

    #[test]
    fn test_user_value() {
        let tokens = scan("x FROM:@Bob y");
        assert_eq!(tokens[0].kind, FilterKind::From);
        assert_eq!(tokens[0].value, TokenValue::Text("Bob".to_string()));
        assert_eq!(tokens[0].chars, 2..11);
        assert_eq!(tokens[0].bytes, 2..11);
    }

    #[test]
    fn test_between_value() {
        let tokens = scan("between:2024-01-01..2024-02-01");
        assert_eq!(
            tokens[0].value,
            TokenValue::Range("2024-01-01".to_string(), "2024-02-01".to_string())
        );
    }

    #[test]
    fn test_requires_boundary() {
        assert!(scan("xfrom:bob").is_empty());
        assert!(scan("nobefore:2024-01-10").is_empty());
        assert!(scan("server-wider").is_empty());
        assert!(scan("has:images").is_empty());
        assert!(scan("before:2024-01-101").is_empty());
    }

    #[test]
    fn test_tokens_after_punctuation() {
        let tokens = scan("(has:image) cats,before:2024-01-10");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![FilterKind::Has, FilterKind::Before]
        );
        assert_eq!(tokens[0].chars, 1..10);
        assert_eq!(tokens[1].chars, 17..34);
        assert_eq!(kinds("[server-wide]"), vec![FilterKind::ServerWide]);
        assert!(has_incomplete("(from:"));
        assert_eq!(count_attachment_filters("x,has:"), 1);
    }

    #[test]
    fn test_user_value_swallows_later_names() {
        let tokens = scan("from:a,has:image cats");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, TokenValue::Text("a,has:image".to_string()));
    }

    #[test]
    fn test_adjacent_flags() {
        assert_eq!(
            kinds("server-wide date-range"),
            vec![FilterKind::ServerWide, FilterKind::DateRange]
        );
    }

    #[test]
    fn test_char_ranges_with_unicode() {
        let tokens = scan("café has:file");
        assert_eq!(tokens[0].chars, 5..13);
        assert_eq!(tokens[0].bytes, 6..14);
    }

    #[test]
    fn test_incomplete() {
        assert!(has_incomplete("from:"));
        assert!(has_incomplete("hello before: world"));
        assert!(has_incomplete("mentions:@"));
        assert!(!has_incomplete("from:bob"));
        assert!(!has_incomplete("hello: world"));
    }

    #[test]
    fn test_counts() {
        assert_eq!(count_attachment_filters("has:image has:"), 2);
        assert_eq!(count_date_ranges("date-range x date-range"), 2);
    }

    #[test]
    fn test_replace_date_range() {
        assert_eq!(
            replace_date_range("cats date-range dogs", "between:a..b"),
            "cats between:a..b dogs"
        );
        assert_eq!(replace_date_range("date-range", ""), "");
        assert_eq!(replace_date_range("(date-range)", "x"), "(x)");
    }
}
