//! Error types for chainql

use thiserror::Error;

/// Result type alias for chainql operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised while building or executing a statement
#[derive(Debug, Error)]
pub enum SqlError {
    /// Builder input was rejected (bad identifier, empty SET list, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Connection setup error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Check constraint violation: {0}")]
    CheckViolation(String),

    /// A value could not be serialized into a bind parameter
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Statement did not finish within the configured timeout
    #[error("Statement timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl SqlError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Classify a `tokio_postgres` error by SQLSTATE.
    pub fn from_db_error(err: tokio_postgres::Error) -> Self {
        if let Some(db_err) = err.as_db_error() {
            let constraint = db_err.constraint().unwrap_or("unknown");
            let detail = format!("{}: {}", constraint, db_err.message());

            match db_err.code().code() {
                "23505" => return Self::UniqueViolation(detail),
                "23503" => return Self::ForeignKeyViolation(detail),
                "23514" => return Self::CheckViolation(detail),
                _ => {}
            }
        }
        Self::Query(err)
    }
}

impl From<serde_json::Error> for SqlError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for SqlError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_prefixed() {
        let err = SqlError::validation("empty SET list");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: empty SET list");
    }

    #[test]
    fn serde_errors_become_serialization() {
        let err: SqlError = serde_json::from_str::<i32>("nope").unwrap_err().into();
        assert!(matches!(err, SqlError::Serialization(_)));
    }

    #[test]
    fn every_variant_has_a_producer() {
        // Exhaustive on purpose: a new variant must name where it comes from.
        fn producer(err: &SqlError) -> &'static str {
            match err {
                SqlError::Validation(_) => "builder validation",
                SqlError::Connection(_) => "pool url parsing",
                SqlError::Query(_) => "tokio_postgres",
                SqlError::NotFound(_) => "GenericClient::query_one",
                SqlError::UniqueViolation(_)
                | SqlError::ForeignKeyViolation(_)
                | SqlError::CheckViolation(_) => "from_db_error",
                SqlError::Serialization(_) => "serde_json",
                SqlError::Timeout(_) => "ExecConfig::timeout",
                #[cfg(feature = "pool")]
                SqlError::Pool(_) => "deadpool",
            }
        }

        let err = SqlError::not_found("Expected one row, got none");
        assert!(err.is_not_found());
        assert_eq!(producer(&err), "GenericClient::query_one");
        assert_eq!(err.to_string(), "Not found: Expected one row, got none");
    }

    #[test]
    fn timeout_reports_duration() {
        let err = SqlError::Timeout(std::time::Duration::from_millis(250));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Statement timeout after 250ms");
    }
}
