//! Per-group findings from the database validator.
//!
//! Each check is an `Option<u64>`: `None` means the check never ran (its
//! group aborted earlier), `Some(0)` means it ran and found nothing. Absent
//! checks are omitted from the JSON so the two cases stay distinguishable.

use serde::{Deserialize, Serialize};

use crate::anomaly::AnomalyRecord;

/// NULL keys, duplicate keys, and orphaned foreign keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityFindings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_devices_null_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_usage_metrics_null_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_allocations_null_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_devices_duplicates: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_allocations_duplicates: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_usage_metrics_orphaned_records: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_allocations_orphaned_records: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Out-of-range values, logical contradictions, and implausible timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyFindings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpu_utilization_invalid_range: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_utilization_invalid_range: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_invalid_range: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_draw_invalid_range: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage_logical_inconsistency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_memory_logical_inconsistency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_timestamps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_timestamps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A device whose recent readings contain too many gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGaps {
    pub device_id: Option<String>,
    pub gap_count: u64,
}

/// Cross-table status agreement and time-series continuity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyFindings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_device_inconsistency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mig_allocation_inconsistency: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_time_gaps: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub time_gap_devices: Vec<DeviceGaps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything the database half of a run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataValidation {
    /// Set when the connection could not be opened; no group ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_integrity: Option<IntegrityFindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_accuracy: Option<AccuracyFindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_consistency: Option<ConsistencyFindings>,
    #[serde(default)]
    pub anomalies: Vec<AnomalyRecord>,
}

impl DataValidation {
    /// A run in which the database could not be reached.
    #[must_use]
    pub fn connection_failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Connection error first, then each group error in report order.
    #[must_use]
    pub fn errors(&self) -> Vec<(&'static str, &str)> {
        let mut errors = Vec::new();
        if let Some(error) = &self.error {
            errors.push(("database", error.as_str()));
        }
        if let Some(error) = self.data_integrity.as_ref().and_then(|f| f.error.as_deref()) {
            errors.push(("data_integrity", error));
        }
        if let Some(error) = self.data_accuracy.as_ref().and_then(|f| f.error.as_deref()) {
            errors.push(("data_accuracy", error));
        }
        if let Some(error) = self.data_consistency.as_ref().and_then(|f| f.error.as_deref()) {
            errors.push(("data_consistency", error));
        }
        errors
    }

    pub fn critical_anomalies(&self) -> impl Iterator<Item = &AnomalyRecord> {
        self.anomalies.iter().filter(|a| a.is_critical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn checks_that_did_not_run_are_absent_from_json() {
        let findings = IntegrityFindings {
            gpu_devices_null_count: Some(0),
            gpu_usage_metrics_null_count: Some(4),
            error: Some("permission denied for table gpu_allocations".into()),
            ..IntegrityFindings::default()
        };
        let value = serde_json::to_value(&findings).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "gpu_devices_null_count": 0,
                "gpu_usage_metrics_null_count": 4,
                "error": "permission denied for table gpu_allocations"
            })
        );
    }

    #[test]
    fn json_preserves_declaration_order() {
        let findings = AccuracyFindings {
            gpu_utilization_invalid_range: Some(1),
            old_timestamps: Some(0),
            ..AccuracyFindings::default()
        };
        let json = serde_json::to_string(&findings).unwrap();
        assert_eq!(
            json,
            r#"{"gpu_utilization_invalid_range":1,"old_timestamps":0}"#
        );
    }

    #[test]
    fn errors_collects_connection_and_group_errors() {
        let mut data = DataValidation::connection_failed("connection refused");
        assert_eq!(data.errors(), vec![("database", "connection refused")]);

        data.error = None;
        data.data_accuracy = Some(AccuracyFindings {
            error: Some("timeout".into()),
            ..AccuracyFindings::default()
        });
        data.data_consistency = Some(ConsistencyFindings::default());
        assert_eq!(data.errors(), vec![("data_accuracy", "timeout")]);
    }
}
