use gpuval_core::IntegrityFindings;

use super::{LOGGED_KEYS, MetricsValidator};
use crate::error::DatabaseError;
use crate::queries::CountQuery;
use crate::store::TelemetryStore;

impl<S: TelemetryStore> MetricsValidator<S> {
    /// NULL keys, duplicate keys, and orphaned device references.
    pub async fn check_integrity(&mut self) -> IntegrityFindings {
        tracing::info!("Checking data integrity...");
        let mut findings = IntegrityFindings::default();
        if let Err(e) = self.run_integrity(&mut findings).await {
            tracing::error!("Error in data integrity validation: {e}");
            findings.error = Some(e.to_string());
        }
        findings
    }

    async fn run_integrity(&mut self, findings: &mut IntegrityFindings) -> Result<(), DatabaseError> {
        let [devices, metrics, allocations] = self.queries.null_checks();
        findings.gpu_devices_null_count = Some(self.null_count(&devices).await?);
        findings.gpu_usage_metrics_null_count = Some(self.null_count(&metrics).await?);
        findings.gpu_allocations_null_count = Some(self.null_count(&allocations).await?);

        let [devices, allocations] = self.queries.duplicate_checks();
        findings.gpu_devices_duplicates = Some(self.duplicates(&devices).await?);
        findings.gpu_allocations_duplicates = Some(self.duplicates(&allocations).await?);

        let [metrics, allocations] = self.queries.orphan_checks();
        findings.gpu_usage_metrics_orphaned_records = Some(self.orphans(&metrics).await?);
        findings.gpu_allocations_orphaned_records = Some(self.orphans(&allocations).await?);
        Ok(())
    }

    async fn null_count(&mut self, query: &CountQuery) -> Result<u64, DatabaseError> {
        let table = query.subject;
        self.count(
            query,
            format_args!("NULL values in {table}"),
            format_args!("No NULL values in {table}"),
        )
        .await
    }

    async fn orphans(&mut self, query: &CountQuery) -> Result<u64, DatabaseError> {
        let table = query.subject;
        self.count(
            query,
            format_args!("orphaned records in {table}"),
            format_args!("No orphaned records in {table}"),
        )
        .await
    }

    /// Number of distinct keys that occur more than once.
    async fn duplicates(&mut self, query: &CountQuery) -> Result<u64, DatabaseError> {
        let table = query.subject;
        let keys = self.store.fetch_key_counts(&query.sql).await?;
        if keys.is_empty() {
            tracing::info!("✓ No duplicates in {table}");
        } else {
            tracing::warn!("Found {} duplicate records in {table}", keys.len());
            for dup in keys.iter().take(LOGGED_KEYS) {
                tracing::warn!(
                    "Duplicate in {table}: {} ({} rows)",
                    dup.key.as_deref().unwrap_or("NULL"),
                    dup.count
                );
            }
        }
        Ok(keys.len() as u64)
    }
}
