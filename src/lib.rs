//! chatsearch - autocomplete and search query compiler for chat clients
//!
//! This library provides the text-side engine behind a chat client's
//! message composer and search bar: trigger detection under the cursor,
//! candidate lookup, completion splicing and compiling `from:`/`has:`/date
//! filters into a structured search request. Rendering and the chat
//! protocol client live elsewhere.

pub mod autocomplete;
pub mod completion;
pub mod compose;
pub mod config;
pub mod directory;
pub mod editor;
pub mod emoji;
pub mod error;
pub mod search;
pub mod splice;

pub use autocomplete::{ActiveState, Autocomplete, AutocompleteState};
pub use completion::{Candidate, CandidateKind, CandidateResolver};
pub use compose::{ComposeAction, Composer};
pub use config::Config;
pub use error::QueryError;
pub use search::{SearchAction, SearchBar, StructuredSearchRequest};
