use thiserror::Error;

use crate::records::RecordKind;
use crate::storage::RepositoryError;

/// Errors raised while fetching a page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PagingError {
    /// Page size out of bounds or an offset key that cannot be decoded.
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// Well-formed offset key that does not name an entry of the index,
    /// even after the widened re-query.
    #[error("Invalid offset key: {0}")]
    InvalidCursor(String),
    /// The store returned a record of a different kind than the one queried.
    #[error("Store returned {found} records instead of {expected}")]
    HydrationInconsistency {
        expected: RecordKind,
        found: RecordKind,
    },
    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Result type for paging operations.
pub type Result<T> = std::result::Result<T, PagingError>;
