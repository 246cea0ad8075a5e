//! Pure functions for mapping repository and paging errors to HTTP status codes.
//!
//! Functional Core: no side effects, the shell decides how to render them.

use crate::paging::PagingError;

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Serialization` -> 500 (Internal Server Error)
/// - `InvalidData` -> 500 (Internal Server Error), stored data is malformed
///
/// # Examples
///
/// ```
/// use studystore_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::ConnectionFailed("refused".to_string());
/// assert_eq!(repository_error_to_status_code(&error), 503);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Serialization(_) => 500,
        RepositoryError::InvalidData(_) => 500,
    }
}

/// Maps a [`PagingError`] to an HTTP status code.
///
/// Client errors (bad page size, malformed or unknown offset key) are 400;
/// a hydration kind mismatch is 500.
pub fn paging_error_to_status_code(error: &PagingError) -> u16 {
    match error {
        PagingError::BadRequest(_) => 400,
        PagingError::InvalidCursor(_) => 400,
        PagingError::HydrationInconsistency { .. } => 500,
        PagingError::Storage(inner) => repository_error_to_status_code(inner),
    }
}
