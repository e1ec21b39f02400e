//! Text splicing for committed completions
//!
//! Replaces the partial token under the cursor with the selected candidate:
//!
//! | Trigger | Replaced span | Inserted |
//! |---------|---------------|----------|
//! | `:smi`  | term only (colon kept) | `smile: ` |
//! | `@al`   | marker + term | `<@user_id> ` |
//! | `#gen`  | marker + term | `<#channel_id> ` |
//! | `from:al` | filter value | `@alice ` |

use crate::completion::{locate, Candidate, Grammar, Selection, TriggerKind};
use crate::editor::splice_chars;
use crate::search::UserIdentifierMapping;

/// Text and cursor after a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub text: String,
    pub cursor: usize,
}

/// Splice `candidate` into the trigger under the cursor
///
/// The trigger is located again on the current text, so a stale match from
/// an earlier keystroke is never used. Returns `None` when the cursor is no
/// longer in a trigger or the candidate does not fit it.
pub fn commit(
    text: &str,
    selection: Selection,
    candidate: &Candidate,
    grammar: Grammar,
    mapping: &mut UserIdentifierMapping,
) -> Option<Splice> {
    let trigger = locate(text, selection, grammar)?;

    let (start, replacement) = match (trigger.kind, candidate) {
        (TriggerKind::Emoji, Candidate::Emoji(entry)) => {
            (trigger.term_start, format!("{}: ", entry.name))
        }
        (TriggerKind::Mention, Candidate::User(user)) => {
            (trigger.term_start - 1, format!("<@{}> ", user.id))
        }
        (TriggerKind::ChannelRef, Candidate::Channel(channel)) => {
            (trigger.term_start - 1, format!("<#{}> ", channel.id))
        }
        (TriggerKind::NamedFilter(filter), Candidate::User(user)) => {
            mapping.insert(filter, user.username.clone(), user.id.clone());
            return Some(splice_filter_value(
                text,
                trigger.term_start,
                trigger.span_end,
                &user.username,
            ));
        }
        (kind, candidate) => {
            tracing::debug!(?kind, candidate = ?candidate.kind(), "candidate does not fit trigger");
            return None;
        }
    };

    let (text, cursor) = splice_chars(text, start, trigger.span_end, &replacement);
    tracing::debug!(kind = ?trigger.kind, cursor, "committed completion");
    Some(Splice { text, cursor })
}

fn splice_filter_value(text: &str, start: usize, end: usize, username: &str) -> Splice {
    let followed_by_space = text.chars().nth(end).is_some_and(char::is_whitespace);

    let (text, cursor) = if followed_by_space {
        let (text, cursor) = splice_chars(text, start, end, &format!("@{}", username));
        (text, cursor + 1)
    } else {
        splice_chars(text, start, end, &format!("@{} ", username))
    };

    Splice { text, cursor }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::FilterName;
    use crate::directory::{Channel, ChannelKind, User};
    use crate::emoji::EmojiEntry;

    fn end(text: &str) -> Selection {
        Selection::collapsed(text.chars().count())
    }

    fn alice() -> Candidate {
        Candidate::User(User::new("alice_id", "alice"))
    }

    #[test]
    fn test_mention() {
        let mut mapping = UserIdentifierMapping::new();
        let text = "hello @al";
        let splice = commit(text, end(text), &alice(), Grammar::compose(), &mut mapping).unwrap();

        assert_eq!(splice.text, "hello <@alice_id> ");
        assert_eq!(splice.cursor, 18);
        assert!(mapping.is_empty());
    }

    #[test]
    fn test_mention_not_retriggered() {
        let mut mapping = UserIdentifierMapping::new();
        let text = "hello @al";
        let splice = commit(text, end(text), &alice(), Grammar::compose(), &mut mapping).unwrap();

        assert_eq!(
            locate(&splice.text, Selection::collapsed(splice.cursor), Grammar::compose()),
            None
        );
    }

    #[test]
    fn test_mention_mid_text_replaces_continuation() {
        let mut mapping = UserIdentifierMapping::new();
        // cursor after "@al" with "ic" still to the right
        let splice = commit(
            "hey @alic, hi",
            Selection::collapsed(7),
            &alice(),
            Grammar::compose(),
            &mut mapping,
        )
        .unwrap();

        assert_eq!(splice.text, "hey <@alice_id> , hi");
        assert_eq!(splice.cursor, 16);
    }

    #[test]
    fn test_channel() {
        let mut mapping = UserIdentifierMapping::new();
        let channel = Candidate::Channel(Channel::server_channel(
            "c1",
            "general",
            ChannelKind::Text,
            "s1",
        ));
        let text = "see #gen";
        let splice = commit(text, end(text), &channel, Grammar::compose(), &mut mapping).unwrap();
        assert_eq!(splice.text, "see <#c1> ");
        assert_eq!(splice.cursor, 10);
    }

    #[test]
    fn test_emoji_keeps_opening_colon() {
        let mut mapping = UserIdentifierMapping::new();
        let emoji = Candidate::Emoji(EmojiEntry::new("smile", "1f604"));
        let text = "ok :smi";
        let splice = commit(text, end(text), &emoji, Grammar::compose(), &mut mapping).unwrap();
        assert_eq!(splice.text, "ok :smile: ");
        assert_eq!(splice.cursor, 11);
    }

    #[test]
    fn test_filter_records_mapping() {
        let mut mapping = UserIdentifierMapping::new();
        let text = "test from:al";
        let splice = commit(text, end(text), &alice(), Grammar::Search, &mut mapping).unwrap();

        assert_eq!(splice.text, "test from:@alice ");
        assert_eq!(splice.cursor, 17);
        assert_eq!(mapping.get(FilterName::From, "alice"), Some("alice_id"));
    }

    #[test]
    fn test_filter_edit_in_place_keeps_single_space() {
        let mut mapping = UserIdentifierMapping::new();
        let text = "mentions:@bob hello";
        let splice = commit(
            text,
            Selection::collapsed(11),
            &alice(),
            Grammar::Search,
            &mut mapping,
        )
        .unwrap();

        assert_eq!(splice.text, "mentions:@alice hello");
        assert_eq!(splice.cursor, 16);
        assert_eq!(mapping.get(FilterName::Mentions, "alice"), Some("alice_id"));
    }

    #[test]
    fn test_mismatched_candidate() {
        let mut mapping = UserIdentifierMapping::new();
        let text = "ok :smi";
        assert_eq!(
            commit(text, end(text), &alice(), Grammar::compose(), &mut mapping),
            None
        );
    }

    #[test]
    fn test_stale_trigger() {
        let mut mapping = UserIdentifierMapping::new();
        assert_eq!(
            commit("hello", Selection::collapsed(5), &alice(), Grammar::compose(), &mut mapping),
            None
        );
    }
}
