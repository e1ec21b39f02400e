//! Autocomplete candidates
//!
//! Provides context-aware completions for:
//! - Users (for `@` mentions and `from:`/`mentions:` filters)
//! - Channels (for `#` references)
//! - Emoji shortcodes (for `:`)

mod channels;
mod emoji;
pub mod tokenizer;
mod users;

use std::sync::Arc;

use crate::config::Config;
use crate::directory::{Channel, Directory, SearchClues, User};
use crate::emoji::{EmojiDictionary, EmojiEntry};

pub use channels::ChannelCompleter;
pub use emoji::EmojiCompleter;
pub use tokenizer::{locate, FilterName, Grammar, Selection, TriggerKind, TriggerMatch};
pub use users::UserCompleter;

/// What kind of candidates a suggestion list holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Emoji,
    User,
    Channel,
}

impl From<TriggerKind> for CandidateKind {
    fn from(kind: TriggerKind) -> Self {
        match kind {
            TriggerKind::Mention | TriggerKind::NamedFilter(_) => CandidateKind::User,
            TriggerKind::ChannelRef => CandidateKind::Channel,
            TriggerKind::Emoji => CandidateKind::Emoji,
        }
    }
}

/// A suggestion offered for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    User(User),
    Channel(Channel),
    Emoji(EmojiEntry),
}

impl Candidate {
    pub fn kind(&self) -> CandidateKind {
        match self {
            Candidate::User(_) => CandidateKind::User,
            Candidate::Channel(_) => CandidateKind::Channel,
            Candidate::Emoji(_) => CandidateKind::Emoji,
        }
    }

    /// Text shown in the suggestion list
    pub fn label(&self) -> String {
        match self {
            Candidate::User(user) => format!("@{}", user.username),
            Candidate::Channel(channel) => format!("#{}", channel.name),
            Candidate::Emoji(entry) => format!(":{}:", entry.name),
        }
    }
}

/// Case-insensitive literal substring match
pub(crate) fn matches_term(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.to_lowercase())
}

/// Resolves a trigger into candidates from the chat client's collections
#[derive(Clone)]
pub struct CandidateResolver {
    directory: Arc<dyn Directory>,
    emoji: Arc<dyn EmojiDictionary>,
    max_results: usize,
    system_user_id: Option<String>,
}

impl CandidateResolver {
    pub fn new(
        directory: Arc<dyn Directory>,
        emoji: Arc<dyn EmojiDictionary>,
        config: &Config,
    ) -> Self {
        Self {
            directory,
            emoji,
            max_results: config.max_results,
            system_user_id: config.system_user_id.clone(),
        }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Candidates for a trigger
    ///
    /// `None` aborts resolution for this keystroke (the scope could not be
    /// resolved); `Some` may still be empty when nothing matches.
    pub fn resolve(
        &self,
        kind: TriggerKind,
        partial_term: &str,
        clues: &SearchClues,
    ) -> Option<Vec<Candidate>> {
        let candidates = match CandidateKind::from(kind) {
            CandidateKind::Emoji => Some(EmojiCompleter::complete(
                self.emoji.as_ref(),
                partial_term,
                self.max_results,
            )),
            CandidateKind::User => UserCompleter::complete(
                self.directory.as_ref(),
                &clues.users,
                self.system_user_id.as_deref(),
                partial_term,
                self.max_results,
            ),
            CandidateKind::Channel => match &clues.channels {
                Some(scope) => ChannelCompleter::complete(
                    self.directory.as_ref(),
                    scope,
                    partial_term,
                    self.max_results,
                ),
                None => None,
            },
        };

        tracing::trace!(
            ?kind,
            term = partial_term,
            found = candidates.as_ref().map(Vec::len),
            "resolved candidates"
        );

        candidates
    }
}
