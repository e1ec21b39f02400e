//! User completion for mentions and `from:`/`mentions:` filters

use crate::directory::{ChannelKind, Directory, User, UserScope};

use super::{matches_term, Candidate};

pub struct UserCompleter;

impl UserCompleter {
    /// Users matching the term within the scope
    ///
    /// Returns `None` when the scope cannot be resolved: an unknown channel
    /// or server, or a channel kind that has no member list.
    pub fn complete(
        dir: &dyn Directory,
        scope: &UserScope,
        system_user_id: Option<&str>,
        term: &str,
        limit: usize,
    ) -> Option<Vec<Candidate>> {
        let universe = match scope {
            UserScope::AllUsers => dir
                .all_users()
                .into_iter()
                .filter(|user| Some(user.id.as_str()) != system_user_id)
                .collect(),
            UserScope::ChannelMembers(channel_id) => Self::channel_members(dir, channel_id)?,
        };

        Some(
            universe
                .into_iter()
                .filter(|user| term.is_empty() || matches_term(&user.username, term))
                .take(limit)
                .map(Candidate::User)
                .collect(),
        )
    }

    fn channel_members(dir: &dyn Directory, channel_id: &str) -> Option<Vec<User>> {
        let channel = dir.channel_by_id(channel_id)?;

        let ids = match channel.kind {
            ChannelKind::Group | ChannelKind::DirectMessage => channel.recipients,
            ChannelKind::Text => {
                let server = dir.server_by_id(channel.server_id.as_deref()?)?;
                server.member_user_ids
            }
            ChannelKind::Voice | ChannelKind::SavedMessages => {
                tracing::trace!(channel = %channel.id, kind = ?channel.kind, "channel has no member list");
                return None;
            }
        };

        Some(dir.users_by_id(&ids).into_iter().flatten().collect())
    }
}
