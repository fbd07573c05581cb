//! The four database check groups.
//!
//! Each group lives in its own file as an `impl MetricsValidator` block. A
//! group runs its queries in order; the first failure stops that group only,
//! is logged, and lands in the group's `error` field next to the counts
//! gathered before it.

mod accuracy;
mod anomalies;
mod consistency;
mod integrity;

use std::fmt;

use gpuval_config::ValidationRules;
use gpuval_core::DataValidation;

use crate::error::DatabaseError;
use crate::queries::{CountQuery, QueryCatalog};
use crate::store::TelemetryStore;

/// Runs every check group over one open store.
pub struct MetricsValidator<S> {
    store: S,
    queries: QueryCatalog,
}

impl<S: TelemetryStore> MetricsValidator<S> {
    #[must_use]
    pub fn new(store: S, rules: ValidationRules) -> Self {
        let queries = QueryCatalog::new(store.dialect(), rules);
        Self { store, queries }
    }

    /// Run integrity, accuracy, consistency, then anomaly detection.
    ///
    /// Never fails: query errors are recorded inside the result.
    pub async fn validate(&mut self) -> DataValidation {
        let data_integrity = self.check_integrity().await;
        let data_accuracy = self.check_accuracy().await;
        let data_consistency = self.check_consistency().await;
        let anomalies = self.detect_anomalies().await;
        DataValidation {
            error: None,
            data_integrity: Some(data_integrity),
            data_accuracy: Some(data_accuracy),
            data_consistency: Some(data_consistency),
            anomalies,
        }
    }

    /// Release the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if the connection did not close cleanly.
    pub async fn close(self) -> Result<(), DatabaseError> {
        self.store.close().await
    }

    /// Run a count query and log it as a finding or a pass.
    async fn count(
        &mut self,
        query: &CountQuery,
        found: fmt::Arguments<'_>,
        clean: fmt::Arguments<'_>,
    ) -> Result<u64, DatabaseError> {
        let count = self.store.fetch_count(&query.sql).await?;
        log_check(count, found, clean);
        Ok(count)
    }
}

fn log_check(count: u64, found: fmt::Arguments<'_>, clean: fmt::Arguments<'_>) {
    if count > 0 {
        tracing::warn!("Found {count} {found}");
    } else {
        tracing::info!("✓ {clean}");
    }
}

/// Keys listed in the log per duplicate or gap finding.
const LOGGED_KEYS: usize = 5;
