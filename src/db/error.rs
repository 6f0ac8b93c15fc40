//! Error types for Warbler database operations

use thiserror::Error;
use tokio_postgres::error::SqlState;

/// Result type for Warbler database operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the data layer
#[derive(Debug, Error)]
pub enum Error {
    /// Constraint violation - null, duplicate or dangling values
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Validation error - input rejected before reaching the database
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found error - user or message doesn't exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Connection error - database unreachable or authentication failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error - connection pool issues
    #[error("Pool error: {0}")]
    Pool(String),

    /// Password hashing failed
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Database error - any other SQL failure
    #[error("Database error: {0}")]
    Database(String),
}

impl Error {
    /// Whether this error came from a violated table constraint
    pub fn is_integrity(&self) -> bool {
        matches!(self, Error::Integrity(_))
    }
}

/// Convert tokio-postgres errors, splitting out constraint violations
impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        if let Some(db_error) = err.as_db_error() {
            let code = db_error.code();

            if *code == SqlState::NOT_NULL_VIOLATION
                || *code == SqlState::UNIQUE_VIOLATION
                || *code == SqlState::FOREIGN_KEY_VIOLATION
                || *code == SqlState::CHECK_VIOLATION
            {
                return Error::Integrity(db_error.message().to_string());
            }

            return Error::Database(format!("{}: {}", code.code(), db_error.message()));
        }

        if err.is_closed() {
            return Error::Connection(err.to_string());
        }

        Error::Database(format!("{:?}", err))
    }
}

impl From<deadpool_postgres::PoolError> for Error {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Error::Pool(err.to_string())
    }
}

impl From<deadpool_postgres::BuildError> for Error {
    fn from(err: deadpool_postgres::BuildError) -> Self {
        Error::Connection(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(err: argon2::password_hash::Error) -> Self {
        Error::PasswordHash(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_error_display() {
        let err = Error::Integrity("null value in column \"username\"".to_string());
        assert!(err.to_string().contains("Integrity error"));
        assert!(err.to_string().contains("username"));
        assert!(err.is_integrity());
    }

    #[test]
    fn test_validation_error_is_not_integrity() {
        let err = Error::Validation("Password must be non-empty".to_string());
        assert!(!err.is_integrity());
        assert_eq!(err.to_string(), "Validation error: Password must be non-empty");
    }

    #[test]
    fn test_from_password_hash_error() {
        let err: Error = argon2::password_hash::Error::Password.into();
        assert!(matches!(err, Error::PasswordHash(_)));
    }
}
