//! Username -> user id mapping collected from search bar selections

use std::collections::HashMap;

use crate::completion::FilterName;

/// Session-scoped cache from `(filter, display username)` to user id
///
/// Only autocomplete selections add entries, so a username typed by hand
/// never resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentifierMapping {
    entries: HashMap<(FilterName, String), String>,
}

impl UserIdentifierMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, filter: FilterName, username: impl Into<String>, user_id: impl Into<String>) {
        self.entries.insert((filter, username.into()), user_id.into());
    }

    pub fn get(&self, filter: FilterName, username: &str) -> Option<&str> {
        self.entries
            .get(&(filter, username.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_by_filter() {
        let mut mapping = UserIdentifierMapping::new();
        mapping.insert(FilterName::From, "bob", "bob_id");

        assert_eq!(mapping.get(FilterName::From, "bob"), Some("bob_id"));
        assert_eq!(mapping.get(FilterName::Mentions, "bob"), None);
        assert_eq!(mapping.get(FilterName::From, "Bob"), None);

        mapping.clear();
        assert!(mapping.is_empty());
    }
}
