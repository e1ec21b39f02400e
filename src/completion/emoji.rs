//! Emoji shortcode completion

use crate::emoji::EmojiDictionary;

use super::{matches_term, Candidate};

pub struct EmojiCompleter;

impl EmojiCompleter {
    /// Emoji whose name contains the term, in dictionary order
    pub fn complete(dict: &dyn EmojiDictionary, term: &str, limit: usize) -> Vec<Candidate> {
        dict.entries()
            .iter()
            .filter(|entry| matches_term(&entry.name, term))
            .take(limit)
            .cloned()
            .map(Candidate::Emoji)
            .collect()
    }
}
