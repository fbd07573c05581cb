//! Database error types for gpuval-db.

use thiserror::Error;

/// Errors from connecting to or querying the telemetry database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The connection could not be established.
    #[error("Failed to connect to {target}: {reason}")]
    Connect { target: String, reason: String },

    /// The configured backend is not available in this build.
    #[error("Unsupported database: {0}")]
    Unsupported(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A column held a value of an unexpected type.
    #[error("Unexpected column value: {0}")]
    Decode(String),

    /// Underlying PostgreSQL driver error.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Underlying Oracle driver error.
    #[cfg(feature = "oracle")]
    #[error("Oracle error: {0}")]
    Oracle(#[from] oracle::Error),
}
