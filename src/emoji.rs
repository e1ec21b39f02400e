//! Emoji shortcode dictionary

use crate::config::EmojiPack;

/// Built-in shortcodes with their codepoints, in suggestion order
const EMOJI: &[(&str, &str)] = &[
    ("smile", "1f604"),
    ("smiley", "1f603"),
    ("grin", "1f601"),
    ("joy", "1f602"),
    ("laughing", "1f606"),
    ("sweat_smile", "1f605"),
    ("wink", "1f609"),
    ("blush", "1f60a"),
    ("innocent", "1f607"),
    ("heart_eyes", "1f60d"),
    ("kissing_heart", "1f618"),
    ("thinking", "1f914"),
    ("neutral_face", "1f610"),
    ("expressionless", "1f611"),
    ("unamused", "1f612"),
    ("roll_eyes", "1f644"),
    ("smirk", "1f60f"),
    ("pensive", "1f614"),
    ("confused", "1f615"),
    ("cry", "1f622"),
    ("sob", "1f62d"),
    ("angry", "1f620"),
    ("rage", "1f621"),
    ("scream", "1f631"),
    ("sleeping", "1f634"),
    ("sunglasses", "1f60e"),
    ("nerd_face", "1f913"),
    ("skull", "1f480"),
    ("ghost", "1f47b"),
    ("alien", "1f47d"),
    ("robot", "1f916"),
    ("cat", "1f431"),
    ("dog", "1f436"),
    ("fox_face", "1f98a"),
    ("frog", "1f438"),
    ("heart", "2764"),
    ("broken_heart", "1f494"),
    ("sparkles", "2728"),
    ("star", "2b50"),
    ("fire", "1f525"),
    ("tada", "1f389"),
    ("rocket", "1f680"),
    ("eyes", "1f440"),
    ("wave", "1f44b"),
    ("clap", "1f44f"),
    ("pray", "1f64f"),
    ("thumbsup", "1f44d"),
    ("thumbsdown", "1f44e"),
    ("ok_hand", "1f44c"),
    ("muscle", "1f4aa"),
    ("100", "1f4af"),
    ("white_check_mark", "2705"),
    ("x", "274c"),
    ("warning", "26a0"),
    ("coffee", "2615"),
    ("pizza", "1f355"),
    ("cake", "1f370"),
];

/// A named emoji that can be suggested after `:`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiEntry {
    pub name: String,
    /// Codepoint (or custom emoji id) used to locate the asset
    pub codepoint: String,
}

impl EmojiEntry {
    pub fn new(name: impl Into<String>, codepoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            codepoint: codepoint.into(),
        }
    }

    /// Asset URL for this emoji in the given icon pack
    pub fn asset_url(&self, base: &str, pack: EmojiPack) -> String {
        format!(
            "{}/{}/{}.svg",
            base.trim_end_matches('/'),
            pack.as_str(),
            self.codepoint
        )
    }
}

/// Ordered name -> codepoint mapping
pub trait EmojiDictionary: Send + Sync {
    fn entries(&self) -> &[EmojiEntry];
}

/// The built-in shortcode table, optionally extended with custom emoji
#[derive(Debug, Clone)]
pub struct BuiltinEmoji {
    entries: Vec<EmojiEntry>,
}

impl BuiltinEmoji {
    pub fn new() -> Self {
        Self {
            entries: EMOJI
                .iter()
                .map(|(name, codepoint)| EmojiEntry::new(*name, *codepoint))
                .collect(),
        }
    }

    /// Append custom emoji after the built-in ones
    pub fn with_custom(mut self, custom: impl IntoIterator<Item = EmojiEntry>) -> Self {
        self.entries.extend(custom);
        self
    }
}

impl Default for BuiltinEmoji {
    fn default() -> Self {
        Self::new()
    }
}

impl EmojiDictionary for BuiltinEmoji {
    fn entries(&self) -> &[EmojiEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let dict = BuiltinEmoji::new();
        assert_eq!(dict.entries()[0].name, "smile");
        assert_eq!(dict.entries().len(), EMOJI.len());
    }

    #[test]
    fn test_custom_appended() {
        let dict = BuiltinEmoji::new().with_custom([EmojiEntry::new("parrot", "01HCUSTOM")]);
        assert_eq!(dict.entries().last().unwrap().name, "parrot");
    }

    #[test]
    fn test_asset_url_uses_pack() {
        let entry = EmojiEntry::new("fire", "1f525");
        assert_eq!(
            entry.asset_url("https://cdn.test/emoji/", EmojiPack::Twemoji),
            "https://cdn.test/emoji/twemoji/1f525.svg"
        );
    }
}
