//! Anomaly records produced by the detection check group.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::severity::{Severity, spike_severity, temperature_severity};

/// The family an anomaly belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    UtilizationSpike,
    HighTemperature,
    PowerAnomaly,
    DetectionError,
}

impl AnomalyKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UtilizationSpike => "utilization_spike",
            Self::HighTemperature => "high_temperature",
            Self::PowerAnomaly => "power_anomaly",
            Self::DetectionError => "detection_error",
        }
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of an anomaly, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnomalyDetail {
    UtilizationSpike {
        device_id: Option<String>,
        timestamp: NaiveDateTime,
        current_utilization: f64,
        previous_utilization: f64,
        difference: f64,
    },
    HighTemperature {
        device_id: Option<String>,
        timestamp: NaiveDateTime,
        temperature: f64,
    },
    PowerAnomaly {
        device_id: Option<String>,
        timestamp: NaiveDateTime,
        actual_power: f64,
        expected_power: f64,
    },
    DetectionError {
        error: String,
    },
}

/// A flagged telemetry reading (or a failed detection pass).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyRecord {
    #[serde(flatten)]
    pub detail: AnomalyDetail,
    pub severity: Severity,
}

impl AnomalyRecord {
    /// A jump between consecutive utilization readings of one device.
    #[must_use]
    pub fn utilization_spike(
        device_id: Option<String>,
        timestamp: NaiveDateTime,
        current: f64,
        previous: f64,
        difference: f64,
        high_threshold: f64,
    ) -> Self {
        Self {
            detail: AnomalyDetail::UtilizationSpike {
                device_id,
                timestamp,
                current_utilization: current,
                previous_utilization: previous,
                difference,
            },
            severity: spike_severity(difference, high_threshold),
        }
    }

    /// A temperature reading above `high_c`, or `None` if it is not one.
    #[must_use]
    pub fn high_temperature(
        device_id: Option<String>,
        timestamp: NaiveDateTime,
        temperature: f64,
        high_c: f64,
        critical_c: f64,
    ) -> Option<Self> {
        temperature_severity(temperature, high_c, critical_c).map(|severity| Self {
            detail: AnomalyDetail::HighTemperature {
                device_id,
                timestamp,
                temperature,
            },
            severity,
        })
    }

    #[must_use]
    pub const fn power_anomaly(
        device_id: Option<String>,
        timestamp: NaiveDateTime,
        actual_power: f64,
        expected_power: f64,
    ) -> Self {
        Self {
            detail: AnomalyDetail::PowerAnomaly {
                device_id,
                timestamp,
                actual_power,
                expected_power,
            },
            severity: Severity::High,
        }
    }

    /// A detection query failed; always `CRITICAL`.
    #[must_use]
    pub fn detection_error(error: impl Into<String>) -> Self {
        Self {
            detail: AnomalyDetail::DetectionError {
                error: error.into(),
            },
            severity: Severity::Critical,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> AnomalyKind {
        match self.detail {
            AnomalyDetail::UtilizationSpike { .. } => AnomalyKind::UtilizationSpike,
            AnomalyDetail::HighTemperature { .. } => AnomalyKind::HighTemperature,
            AnomalyDetail::PowerAnomaly { .. } => AnomalyKind::PowerAnomaly,
            AnomalyDetail::DetectionError { .. } => AnomalyKind::DetectionError,
        }
    }

    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        match &self.detail {
            AnomalyDetail::UtilizationSpike { device_id, .. }
            | AnomalyDetail::HighTemperature { device_id, .. }
            | AnomalyDetail::PowerAnomaly { device_id, .. } => device_id.as_deref(),
            AnomalyDetail::DetectionError { .. } => None,
        }
    }

    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}
