//! Infrastructure error types for the common library
//!
//! These cover pool construction, connectivity checks, and migrations for
//! the backing stores; the service layer wraps them into API-facing errors.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Custom error type for session-store (Redis) operations
#[derive(Error, Debug)]
pub enum CacheError {
    /// Error occurred while connecting to Redis
    #[error("Redis connection error: {0}")]
    Connection(#[source] redis::RedisError),

    /// Error occurred while executing a Redis command
    #[error("Redis command error: {0}")]
    Command(#[source] redis::RedisError),
}

/// Type alias for Result with CacheError
pub type CacheResult<T> = Result<T, CacheError>;
