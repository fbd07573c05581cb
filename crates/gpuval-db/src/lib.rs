//! # gpuval-db
//!
//! Read-only validation of the GPU telemetry tables.
//!
//! A [`MetricsValidator`] runs four independent check groups over one open
//! [`TelemetryStore`]:
//! - integrity: NULL keys, duplicate keys, orphaned device references
//! - accuracy: value ranges, logical contradictions, timestamp sanity
//! - consistency: allocation/device status, MIG bookkeeping, time-series gaps
//! - anomalies: utilization spikes, high temperature, power above rating
//!
//! PostgreSQL is reached through `sqlx`, local SQLite snapshots through
//! `libsql`, and Oracle through the `oracle` crate when the `oracle` feature
//! is enabled. Query text differs only in the fragments [`Dialect`] renders.

mod checks;
pub mod dialect;
pub mod error;
pub mod helpers;
pub mod queries;
pub mod store;

pub use checks::MetricsValidator;
pub use dialect::Dialect;
pub use error::DatabaseError;
pub use store::{AnyStore, KeyCount, LibSqlStore, PgStore, Reading, TelemetryStore, connect};

#[cfg(feature = "oracle")]
pub use store::OracleStore;

use gpuval_config::ValidationRules;
use gpuval_core::DataValidation;

/// Run every check group over `store`, then close it.
///
/// The store is closed whether or not the groups found problems; a failure
/// to close is logged and does not change the result.
pub async fn validate_database<S: TelemetryStore>(
    store: S,
    rules: &ValidationRules,
) -> DataValidation {
    let mut validator = MetricsValidator::new(store, rules.clone());
    let result = validator.validate().await;
    match validator.close().await {
        Ok(()) => tracing::debug!("database connection closed"),
        Err(e) => tracing::warn!(error = %e, "failed to close database connection"),
    }
    result
}
