//! Users, channels and servers as seen by autocomplete
//!
//! The chat client owns the real collections. Autocomplete only reads them
//! through the directory traits below, so any populated cache can back it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A user that can be mentioned or used in `from:`/`mentions:` filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// Text channel inside a server
    Text,
    /// Voice channel inside a server
    Voice,
    /// Group conversation
    Group,
    /// One-to-one conversation
    DirectMessage,
    /// Personal notes channel
    SavedMessages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub kind: ChannelKind,
    /// Participants of a group or direct message
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Parent server of a server channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
}

impl Channel {
    /// A text or voice channel belonging to a server
    pub fn server_channel(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ChannelKind,
        server_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            recipients: Vec::new(),
            server_id: Some(server_id.into()),
        }
    }

    /// A group or direct message with the given participants
    pub fn private(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ChannelKind,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            recipients,
            server_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Server {
    pub id: String,
    pub channel_ids: Vec<String>,
    pub member_user_ids: Vec<String>,
}

pub trait UserDirectory {
    /// Every known user, in directory order
    fn all_users(&self) -> Vec<User>;
    /// Look up users; unknown ids yield `None` in the same position
    fn users_by_id(&self, ids: &[String]) -> Vec<Option<User>>;
}

pub trait ChannelDirectory {
    fn channel_by_id(&self, id: &str) -> Option<Channel>;
}

pub trait ServerDirectory {
    fn server_by_id(&self, id: &str) -> Option<Server>;
}

/// Everything the candidate resolver reads from the chat client
pub trait Directory: UserDirectory + ChannelDirectory + ServerDirectory + Send + Sync {}

impl<T> Directory for T where T: UserDirectory + ChannelDirectory + ServerDirectory + Send + Sync {}

/// Which user suggestions are offered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserScope {
    AllUsers,
    ChannelMembers(String),
}

/// Which channel suggestions are offered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelScope {
    ServerChannels(String),
}

/// Candidate universes for one autocomplete session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchClues {
    pub users: UserScope,
    pub channels: Option<ChannelScope>,
}

impl SearchClues {
    pub fn all_users() -> Self {
        Self {
            users: UserScope::AllUsers,
            channels: None,
        }
    }

    /// Clues for composing inside a channel: its members, and its server's
    /// channels when it has one
    pub fn for_channel(channel: &Channel) -> Self {
        Self {
            users: UserScope::ChannelMembers(channel.id.clone()),
            channels: channel.server_id.clone().map(ChannelScope::ServerChannels),
        }
    }
}

/// In-memory directory preserving insertion order
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    users: Vec<User>,
    user_index: HashMap<String, usize>,
    channels: HashMap<String, Channel>,
    servers: HashMap<String, Server>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user; replacing keeps the original position
    pub fn add_user(&mut self, user: User) {
        match self.user_index.get(&user.id) {
            Some(&idx) => self.users[idx] = user,
            None => {
                self.user_index.insert(user.id.clone(), self.users.len());
                self.users.push(user);
            }
        }
    }

    pub fn add_channel(&mut self, channel: Channel) {
        self.channels.insert(channel.id.clone(), channel);
    }

    pub fn add_server(&mut self, server: Server) {
        self.servers.insert(server.id.clone(), server);
    }
}

impl UserDirectory for MemoryDirectory {
    fn all_users(&self) -> Vec<User> {
        self.users.clone()
    }

    fn users_by_id(&self, ids: &[String]) -> Vec<Option<User>> {
        ids.iter()
            .map(|id| self.user_index.get(id).map(|&idx| self.users[idx].clone()))
            .collect()
    }
}

impl ChannelDirectory for MemoryDirectory {
    fn channel_by_id(&self, id: &str) -> Option<Channel> {
        self.channels.get(id).cloned()
    }
}

impl ServerDirectory for MemoryDirectory {
    fn server_by_id(&self, id: &str) -> Option<Server> {
        self.servers.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_keep_insertion_order() {
        let mut dir = MemoryDirectory::new();
        dir.add_user(User::new("2", "zed"));
        dir.add_user(User::new("1", "amy"));
        dir.add_user(User::new("2", "zoe"));

        let names: Vec<_> = dir.all_users().into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["zoe", "amy"]);
    }

    #[test]
    fn test_users_by_id_keeps_gaps() {
        let mut dir = MemoryDirectory::new();
        dir.add_user(User::new("1", "amy"));

        let found = dir.users_by_id(&["missing".to_string(), "1".to_string()]);
        assert_eq!(found, vec![None, Some(User::new("1", "amy"))]);
    }

    #[test]
    fn test_clues_for_channel() {
        let text = Channel::server_channel("c1", "general", ChannelKind::Text, "s1");
        let clues = SearchClues::for_channel(&text);
        assert_eq!(clues.users, UserScope::ChannelMembers("c1".to_string()));
        assert_eq!(
            clues.channels,
            Some(ChannelScope::ServerChannels("s1".to_string()))
        );

        let dm = Channel::private("d1", "dm", ChannelKind::DirectMessage, vec![]);
        assert_eq!(SearchClues::for_channel(&dm).channels, None);
    }

    #[test]
    fn test_channel_from_json() {
        let channel: Channel = serde_json::from_str(
            r#"{"id": "g1", "name": "friends", "kind": "group", "recipients": ["1", "2"]}"#,
        )
        .unwrap();
        assert_eq!(channel, Channel::private("g1", "friends", ChannelKind::Group, vec!["1".into(), "2".into()]));

        let server: Server =
            serde_json::from_str(r#"{"id": "s", "channel_ids": [], "member_user_ids": ["1"]}"#).unwrap();
        assert_eq!(server.member_user_ids, vec!["1"]);
    }
}
