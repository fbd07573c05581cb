//! `DeviceProber` with shell commands standing in for `nvidia-smi`.

#![cfg(unix)]

use std::time::Duration;

use gpuval_probe::DeviceProber;
use pretty_assertions::assert_eq;

fn sh(script: &str) -> DeviceProber {
    DeviceProber::new("sh", ["-c", script], Duration::from_secs(5))
}

#[tokio::test]
async fn lists_one_device_per_line() {
    let status = sh("printf 'NVIDIA A100-SXM4-80GB\\n\\nNVIDIA H100 PCIe\\n'")
        .probe()
        .await;

    assert!(status.available);
    assert_eq!(status.gpu_count, 2);
    assert_eq!(
        status.gpu_names,
        vec!["NVIDIA A100-SXM4-80GB", "NVIDIA H100 PCIe"]
    );
    assert_eq!(status.error, None);
}

#[tokio::test]
async fn empty_listing_means_zero_devices() {
    let status = sh("true").probe().await;

    assert!(status.available);
    assert_eq!(status.gpu_count, 0);
    assert!(status.gpu_names.is_empty());
}

#[tokio::test]
async fn nonzero_exit_reports_stderr() {
    let status = sh("echo 'NVIDIA-SMI has failed' >&2; exit 9").probe().await;

    assert!(!status.available);
    assert_eq!(status.gpu_count, 0);
    assert_eq!(status.error.as_deref(), Some("NVIDIA-SMI has failed"));
}

#[tokio::test]
async fn silent_failure_reports_exit_status() {
    let status = sh("exit 4").probe().await;

    assert!(!status.available);
    let error = status.error.unwrap();
    assert!(error.starts_with("sh exited with"), "error: {error}");
}

#[tokio::test]
async fn missing_command_is_not_found() {
    let status = DeviceProber::nvidia_smi("gpuval-no-such-utility", Duration::from_secs(5))
        .probe()
        .await;

    assert!(!status.available);
    assert_eq!(
        status.error.as_deref(),
        Some("gpuval-no-such-utility command not found")
    );
}

#[tokio::test]
async fn hung_command_times_out() {
    let status = DeviceProber::new("sh", ["-c", "sleep 10"], Duration::from_millis(200))
        .probe()
        .await;

    assert!(!status.available);
    assert_eq!(status.error.as_deref(), Some("sh command timed out"));
}
