//! Channel completion for `#` references

use crate::directory::{ChannelScope, Directory};

use super::{matches_term, Candidate};

pub struct ChannelCompleter;

impl ChannelCompleter {
    /// Channels of the scoped server whose name contains the term
    pub fn complete(
        dir: &dyn Directory,
        scope: &ChannelScope,
        term: &str,
        limit: usize,
    ) -> Option<Vec<Candidate>> {
        let ChannelScope::ServerChannels(server_id) = scope;
        let server = dir.server_by_id(server_id)?;

        Some(
            server
                .channel_ids
                .iter()
                .filter_map(|id| dir.channel_by_id(id))
                .filter(|channel| matches_term(&channel.name, term))
                .take(limit)
                .map(Candidate::Channel)
                .collect(),
        )
    }
}
