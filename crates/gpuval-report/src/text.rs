//! Plain-text report.

use std::fmt::Write as _;

use gpuval_core::{
    AnomalyRecord, DataValidation, DeviceUtilityStatus, EndpointCheckResult, ValidationReport,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::ReportError;

/// Anomalies listed individually before the remainder is summarized.
pub const MAX_LISTED_ANOMALIES: usize = 10;

const NOT_CHECKED: &str = "(not checked)";

/// Render the sectioned text report.
///
/// Sections: header, API endpoints, integrity, accuracy, consistency,
/// anomalies, device utility, footer. A section whose check did not run
/// reads `(not checked)`.
///
/// # Errors
///
/// Returns `ReportError::Serialize` if a findings group cannot be converted
/// to its serde representation.
pub fn render_text(report: &ValidationReport) -> Result<String, ReportError> {
    let mut out = String::new();
    let data = report.data_validation.as_ref();

    let _ = writeln!(out, "\n=== GPU Metrics Validation Report ===");
    let _ = writeln!(out, "Generated: {}", report.timestamp.format("%Y-%m-%d %H:%M:%S"));

    section(&mut out, "API Endpoint Validation");
    match &report.api_validation {
        Some(endpoints) => endpoints.iter().for_each(|e| write_endpoint(&mut out, e)),
        None => line(&mut out, NOT_CHECKED),
    }

    if let Some(error) = data.and_then(|d| d.error.as_deref()) {
        section(&mut out, "Database Connection");
        let _ = writeln!(out, "✗ {error}");
    }

    section(&mut out, "Data Integrity");
    write_group(&mut out, data.and_then(|d| d.data_integrity.as_ref()))?;

    section(&mut out, "Data Accuracy");
    write_group(&mut out, data.and_then(|d| d.data_accuracy.as_ref()))?;

    section(&mut out, "Data Consistency");
    let consistency = data.and_then(|d| d.data_consistency.as_ref());
    write_group(&mut out, consistency)?;
    for device in consistency.into_iter().flat_map(|c| &c.time_gap_devices) {
        let _ = writeln!(
            out,
            "  - {}: {} time gaps",
            device.device_id.as_deref().unwrap_or("N/A"),
            device.gap_count
        );
    }

    section(&mut out, "Anomaly Detection");
    write_anomalies(&mut out, data);

    section(&mut out, "GPU Device Utility");
    write_device_utility(&mut out, report.device_utility.as_ref());

    section(&mut out, "Validation Complete");
    Ok(out)
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n=== {title} ===");
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn write_endpoint(out: &mut String, endpoint: &EndpointCheckResult) {
    let name = &endpoint.endpoint;
    if endpoint.reachable {
        let _ = writeln!(out, "✓ {name}");
    } else if let Some(status) = endpoint.status {
        let _ = writeln!(out, "✗ {name} (HTTP {status})");
    } else {
        let error = endpoint.error.as_deref().unwrap_or("unreachable");
        let _ = writeln!(out, "✗ {name} ({error})");
    }
}

/// One `check: count` line per field that ran, then the group error if any.
fn write_group<T: Serialize>(out: &mut String, findings: Option<&T>) -> Result<(), ReportError> {
    let Some(findings) = findings else {
        line(out, NOT_CHECKED);
        return Ok(());
    };

    let Value::Object(fields) = serde_json::to_value(findings)? else {
        return Ok(());
    };
    let mut error = None;
    for (check, value) in &fields {
        match value {
            Value::Number(count) => {
                let _ = writeln!(out, "{check}: {count}");
            }
            Value::String(message) if check == "error" => error = Some(message),
            _ => {}
        }
    }
    if let Some(message) = error {
        let _ = writeln!(out, "error: {message}");
    }
    Ok(())
}

fn write_anomalies(out: &mut String, data: Option<&DataValidation>) {
    let Some(data) = data.filter(|d| d.error.is_none()) else {
        line(out, NOT_CHECKED);
        return;
    };
    if data.anomalies.is_empty() {
        line(out, "No anomalies detected.");
        return;
    }
    for anomaly in data.anomalies.iter().take(MAX_LISTED_ANOMALIES) {
        write_anomaly(out, anomaly);
    }
    let remaining = data.anomalies.len().saturating_sub(MAX_LISTED_ANOMALIES);
    if remaining > 0 {
        let _ = writeln!(out, "... and {remaining} more");
    }
}

fn write_anomaly(out: &mut String, anomaly: &AnomalyRecord) {
    let _ = writeln!(
        out,
        "- {}: {} (severity: {})",
        anomaly.kind(),
        anomaly.device_id().unwrap_or("N/A"),
        anomaly.severity
    );
}

fn write_device_utility(out: &mut String, utility: Option<&DeviceUtilityStatus>) {
    match utility {
        None => line(out, NOT_CHECKED),
        Some(status) if status.available => {
            let _ = writeln!(out, "✓ available (GPU count: {})", status.gpu_count);
            for name in &status.gpu_names {
                let _ = writeln!(out, "  - {name}");
            }
        }
        Some(status) => {
            let error = status.error.as_deref().unwrap_or("Unknown error");
            let _ = writeln!(out, "✗ unavailable: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use gpuval_core::{AccuracyFindings, ConsistencyFindings, DeviceGaps, IntegrityFindings};
    use pretty_assertions::assert_eq;

    fn report() -> ValidationReport {
        ValidationReport::at(Local.with_ymd_and_hms(2026, 2, 9, 14, 30, 0).unwrap())
    }

    fn spike(device: &str) -> AnomalyRecord {
        AnomalyRecord::utilization_spike(
            Some(device.into()),
            chrono::NaiveDateTime::default(),
            95.0,
            5.0,
            90.0,
            90.0,
        )
    }

    #[test]
    fn api_only_report_marks_database_sections_not_checked() {
        let mut report = report();
        report.api_validation = Some(vec![
            EndpointCheckResult::responded("/gpu/overview", 200),
            EndpointCheckResult::responded("/gpu/allocations", 503),
            EndpointCheckResult::failed("/gpu/cost/analysis", "connection refused"),
        ]);
        report.device_utility = Some(DeviceUtilityStatus::available(vec![
            "NVIDIA A100-SXM4-80GB".into(),
        ]));

        let text = render_text(&report).unwrap();
        assert_eq!(
            text,
            "
=== GPU Metrics Validation Report ===
Generated: 2026-02-09 14:30:00

=== API Endpoint Validation ===
✓ /gpu/overview
✗ /gpu/allocations (HTTP 503)
✗ /gpu/cost/analysis (connection refused)

=== Data Integrity ===
(not checked)

=== Data Accuracy ===
(not checked)

=== Data Consistency ===
(not checked)

=== Anomaly Detection ===
(not checked)

=== GPU Device Utility ===
✓ available (GPU count: 1)
  - NVIDIA A100-SXM4-80GB

=== Validation Complete ===
"
        );
    }

    #[test]
    fn group_lines_follow_field_order_and_error_comes_last() {
        let mut report = report();
        report.data_validation = Some(DataValidation {
            data_integrity: Some(IntegrityFindings {
                gpu_devices_null_count: Some(0),
                gpu_usage_metrics_null_count: Some(3),
                error: Some("relation \"gpu_allocations\" does not exist".into()),
                ..IntegrityFindings::default()
            }),
            data_accuracy: Some(AccuracyFindings::default()),
            data_consistency: Some(ConsistencyFindings {
                metrics_time_gaps: Some(1),
                time_gap_devices: vec![DeviceGaps {
                    device_id: Some("gpu-4".into()),
                    gap_count: 13,
                }],
                ..ConsistencyFindings::default()
            }),
            ..DataValidation::default()
        });

        let text = render_text(&report).unwrap();
        assert!(text.contains(
            "=== Data Integrity ===\n\
             gpu_devices_null_count: 0\n\
             gpu_usage_metrics_null_count: 3\n\
             error: relation \"gpu_allocations\" does not exist\n"
        ));
        assert!(text.contains("=== Data Accuracy ===\n\n=== Data Consistency ==="));
        assert!(text.contains("metrics_time_gaps: 1\n  - gpu-4: 13 time gaps\n"));
        assert!(text.contains("=== Anomaly Detection ===\nNo anomalies detected.\n"));
    }

    #[test]
    fn anomaly_list_is_truncated() {
        let mut report = report();
        report.data_validation = Some(DataValidation {
            anomalies: (0..13).map(|i| spike(&format!("gpu-{i}"))).collect(),
            ..DataValidation::default()
        });

        let text = render_text(&report).unwrap();
        assert_eq!(text.matches("- utilization_spike:").count(), MAX_LISTED_ANOMALIES);
        assert!(text.contains("- utilization_spike: gpu-9 (severity: MEDIUM)\n... and 3 more\n"));
        assert!(!text.contains("gpu-10"));
    }

    #[test]
    fn detection_error_has_no_device() {
        let mut report = report();
        report.data_validation = Some(DataValidation {
            anomalies: vec![AnomalyRecord::detection_error("timeout")],
            ..DataValidation::default()
        });

        let text = render_text(&report).unwrap();
        assert!(text.contains("- detection_error: N/A (severity: CRITICAL)"));
    }

    #[test]
    fn connection_failure_is_reported_once() {
        let mut report = report();
        report.data_validation = Some(DataValidation::connection_failed(
            "Failed to connect to postgresql://gpu_admin@db:5432/gpu_management: refused",
        ));
        report.device_utility = Some(DeviceUtilityStatus::unavailable("nvidia-smi command not found"));

        let text = render_text(&report).unwrap();
        assert!(text.contains(
            "=== Database Connection ===\n✗ Failed to connect to postgresql://gpu_admin@db:5432/gpu_management: refused\n"
        ));
        assert!(text.contains("=== Anomaly Detection ===\n(not checked)\n"));
        assert!(text.contains("✗ unavailable: nvidia-smi command not found"));
    }
}
