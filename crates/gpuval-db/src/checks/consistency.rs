use gpuval_core::{ConsistencyFindings, DeviceGaps};

use super::{LOGGED_KEYS, MetricsValidator};
use crate::error::DatabaseError;
use crate::queries::CountQuery;
use crate::store::TelemetryStore;

impl<S: TelemetryStore> MetricsValidator<S> {
    /// Allocation/device status agreement, MIG bookkeeping, and gaps in the
    /// recent time series.
    pub async fn check_consistency(&mut self) -> ConsistencyFindings {
        tracing::info!("Checking data consistency...");
        let mut findings = ConsistencyFindings::default();
        if let Err(e) = self.run_consistency(&mut findings).await {
            tracing::error!("Error in data consistency validation: {e}");
            findings.error = Some(e.to_string());
        }
        findings
    }

    async fn run_consistency(
        &mut self,
        findings: &mut ConsistencyFindings,
    ) -> Result<(), DatabaseError> {
        let allocations = CountQuery {
            subject: "gpu_allocations",
            sql: self.queries.allocation_device_inconsistency(),
        };
        findings.allocation_device_inconsistency = Some(
            self.count(
                &allocations,
                format_args!("allocation-device status inconsistencies"),
                format_args!("Allocation-device status consistency verified"),
            )
            .await?,
        );

        let mig = CountQuery {
            subject: "mig_instances",
            sql: self.queries.mig_allocation_inconsistency(),
        };
        findings.mig_allocation_inconsistency = Some(
            self.count(
                &mig,
                format_args!("MIG allocation inconsistencies"),
                format_args!("MIG allocation consistency verified"),
            )
            .await?,
        );

        let gaps = self.store.fetch_key_counts(&self.queries.time_gaps()).await?;
        if gaps.is_empty() {
            tracing::info!("✓ Metrics time series consistency verified");
        } else {
            tracing::warn!(
                "Found significant time gaps in metrics for {} devices",
                gaps.len()
            );
            for device in gaps.iter().take(LOGGED_KEYS) {
                tracing::warn!(
                    "Device {}: {} time gaps",
                    device.key.as_deref().unwrap_or("NULL"),
                    device.count
                );
            }
        }
        findings.metrics_time_gaps = Some(gaps.len() as u64);
        findings.time_gap_devices = gaps
            .into_iter()
            .map(|row| DeviceGaps {
                device_id: row.key,
                gap_count: row.count,
            })
            .collect();
        Ok(())
    }
}
