use gpuval_core::AnomalyRecord;

use super::MetricsValidator;
use crate::error::DatabaseError;
use crate::store::TelemetryStore;

impl<S: TelemetryStore> MetricsValidator<S> {
    /// Utilization spikes, high temperatures, and power draw above the
    /// model's rating, over the lookback window.
    ///
    /// A failing query ends detection with a `detection_error` record
    /// appended after whatever was found so far.
    pub async fn detect_anomalies(&mut self) -> Vec<AnomalyRecord> {
        tracing::info!("Detecting anomalies...");
        let mut anomalies = Vec::new();
        match self.run_anomalies(&mut anomalies).await {
            Ok(()) => tracing::info!("Found {} anomalies", anomalies.len()),
            Err(e) => {
                tracing::error!("Error in anomaly detection: {e}");
                anomalies.push(AnomalyRecord::detection_error(e.to_string()));
            }
        }
        anomalies
    }

    async fn run_anomalies(&mut self, anomalies: &mut Vec<AnomalyRecord>) -> Result<(), DatabaseError> {
        let rules = self.queries.rules();
        let (spike_high, temperature_high, temperature_critical) = (
            rules.utilization_spike_high_pct,
            rules.temperature_high_c,
            rules.temperature_critical_c,
        );

        for reading in self.store.fetch_readings(&self.queries.utilization_spikes()).await? {
            let (current, previous) = (reading.value(0)?, reading.value(1)?);
            let difference = reading.value(2)?;
            anomalies.push(AnomalyRecord::utilization_spike(
                reading.device_id,
                reading.timestamp,
                current,
                previous,
                difference,
                spike_high,
            ));
        }

        for reading in self.store.fetch_readings(&self.queries.high_temperatures()).await? {
            let temperature = reading.value(0)?;
            anomalies.extend(AnomalyRecord::high_temperature(
                reading.device_id,
                reading.timestamp,
                temperature,
                temperature_high,
                temperature_critical,
            ));
        }

        for reading in self.store.fetch_readings(&self.queries.power_anomalies()).await? {
            let (actual, rated) = (reading.value(0)?, reading.value(1)?);
            anomalies.push(AnomalyRecord::power_anomaly(
                reading.device_id,
                reading.timestamp,
                actual,
                rated,
            ));
        }
        Ok(())
    }
}
