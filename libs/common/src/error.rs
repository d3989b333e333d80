//! Error types shared by the database helpers and the Postgres adapters

use sqlx::Error as SqlxError;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Failure raised while connecting to, migrating or querying PostgreSQL
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred while applying the schema migrations
    #[error("Database migration error: {0}")]
    Migration(#[from] MigrateError),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Whether a query failed on a unique constraint.
///
/// Uniqueness of ratings per (user, media) and of favorites is enforced by the
/// schema; adapters use this to turn a lost insert race into a failed save.
pub fn is_unique_violation(err: &SqlxError) -> bool {
    match err {
        SqlxError::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&SqlxError::RowNotFound));
        assert!(!is_unique_violation(&SqlxError::PoolTimedOut));
    }

    #[test]
    fn test_configuration_error_message() {
        let err = DatabaseError::Configuration("DATABASE_URL is empty".to_string());
        assert_eq!(
            err.to_string(),
            "Database configuration error: DATABASE_URL is empty"
        );
    }
}
