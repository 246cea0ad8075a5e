use thiserror::Error;

/// Errors that can occur when constructing a time or date range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid range: start must be before or equal to end")]
    InvalidRange,
    #[error("Date range cannot exceed {max} days, got {days}")]
    TooLong { days: i64, max: i64 },
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_display() {
        assert_eq!(
            RangeError::InvalidRange.to_string(),
            "Invalid range: start must be before or equal to end"
        );
    }

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 30s");
    }

    #[test]
    fn test_repository_error_query_failed_display() {
        let error = RepositoryError::QueryFailed("unprocessed keys: 3".to_string());
        assert_eq!(error.to_string(), "Query failed: unprocessed keys: 3");
    }

    #[test]
    fn test_repository_error_serialization_display() {
        let error = RepositoryError::Serialization("missing field `guid`".to_string());
        assert_eq!(error.to_string(), "Serialization error: missing field `guid`");
    }

    #[test]
    fn test_repository_error_invalid_data_display() {
        let error = RepositoryError::InvalidData("missing entityType attribute".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid data: missing entityType attribute"
        );
    }
}
