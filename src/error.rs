//! Search query errors
//!
//! Every error here is local to one search bar session. None of them are
//! fatal: the user edits the text and submits again.

use thiserror::Error;

use crate::search::FilterKind;

/// Why a composed query was not turned into a search request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A filter token has no value yet (user is still typing)
    #[error("filter is missing a value")]
    IncompleteFilter,

    /// Nothing to search for
    #[error("nothing to search for")]
    EmptyQuery,

    /// A single-valued filter appears more than once
    #[error("duplicate {0} filter")]
    DuplicateFilter(FilterKind),

    #[error("only one attachment filter allowed")]
    MultipleAttachmentFilters,

    #[error("only one date range allowed")]
    MultipleDateRanges,

    /// `server-wide` with no other criteria would scan a whole server
    #[error("server-wide requires additional criteria")]
    ServerWideRequiresCriteria,

    /// A date filter has the right shape but is not a calendar date
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

impl QueryError {
    /// Silent errors suppress submission without showing a notice
    pub fn is_silent(&self) -> bool {
        matches!(self, QueryError::IncompleteFilter | QueryError::EmptyQuery)
    }
}
