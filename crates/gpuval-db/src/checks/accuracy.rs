use gpuval_core::AccuracyFindings;

use super::MetricsValidator;
use crate::error::DatabaseError;
use crate::store::TelemetryStore;

impl<S: TelemetryStore> MetricsValidator<S> {
    /// Value ranges, logical contradictions, and implausible timestamps.
    pub async fn check_accuracy(&mut self) -> AccuracyFindings {
        tracing::info!("Checking data accuracy...");
        let mut findings = AccuracyFindings::default();
        if let Err(e) = self.run_accuracy(&mut findings).await {
            tracing::error!("Error in data accuracy validation: {e}");
            findings.error = Some(e.to_string());
        }
        findings
    }

    async fn run_accuracy(&mut self, findings: &mut AccuracyFindings) -> Result<(), DatabaseError> {
        let ranges = self.queries.range_checks();
        let slots = [
            &mut findings.gpu_utilization_invalid_range,
            &mut findings.memory_utilization_invalid_range,
            &mut findings.temperature_invalid_range,
            &mut findings.power_draw_invalid_range,
        ];
        for (query, slot) in ranges.iter().zip(slots) {
            let metric = query.subject;
            *slot = Some(
                self.count(
                    query,
                    format_args!("out-of-range values for {metric}"),
                    format_args!("All {metric} values are in valid range"),
                )
                .await?,
            );
        }

        let logical = self.queries.logical_checks();
        let slots = [
            &mut findings.memory_usage_logical_inconsistency,
            &mut findings.allocation_memory_logical_inconsistency,
        ];
        for (query, slot) in logical.iter().zip(slots) {
            let check = query.subject;
            *slot = Some(
                self.count(
                    query,
                    format_args!("logical inconsistencies in {check}"),
                    format_args!("No logical inconsistencies in {check}"),
                )
                .await?,
            );
        }

        let temporal = self.queries.timestamp_checks();
        let slots = [&mut findings.future_timestamps, &mut findings.old_timestamps];
        for (query, slot) in temporal.iter().zip(slots) {
            let check = query.subject;
            *slot = Some(
                self.count(
                    query,
                    format_args!("invalid timestamps for {check}"),
                    format_args!("All timestamps are valid for {check}"),
                )
                .await?,
            );
        }
        Ok(())
    }
}
