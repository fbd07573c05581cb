//! GPU enumeration through an external utility.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use gpuval_core::DeviceUtilityStatus;
use tokio::process::Command;
use tokio::time::timeout;

/// Arguments that make `nvidia-smi` print one GPU name per line.
pub const NVIDIA_SMI_QUERY: [&str; 2] = ["--query-gpu=name", "--format=csv,noheader"];

/// Runs a device-listing command and reports the names it printed.
#[derive(Debug, Clone)]
pub struct DeviceProber {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl DeviceProber {
    #[must_use]
    pub fn new<I, A>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    /// `command` queried with [`NVIDIA_SMI_QUERY`].
    #[must_use]
    pub fn nvidia_smi(command: impl Into<String>, timeout: Duration) -> Self {
        Self::new(command, NVIDIA_SMI_QUERY, timeout)
    }

    /// Run the command once. The child is killed if it outlives the timeout.
    ///
    /// Each non-blank stdout line is one device, so an empty listing is an
    /// available utility with zero GPUs.
    pub async fn probe(&self) -> DeviceUtilityStatus {
        let program = &self.program;
        tracing::info!("Validating {program} availability...");

        let output = Command::new(program)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let status = match timeout(self.timeout, output).await {
            Err(_) => DeviceUtilityStatus::unavailable(format!("{program} command timed out")),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                DeviceUtilityStatus::unavailable(format!("{program} command not found"))
            }
            Ok(Err(e)) => DeviceUtilityStatus::unavailable(format!("failed to run {program}: {e}")),
            Ok(Ok(output)) if output.status.success() => {
                let names = String::from_utf8_lossy(&output.stdout)
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(String::from)
                    .collect();
                DeviceUtilityStatus::available(names)
            }
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
                if stderr.is_empty() {
                    DeviceUtilityStatus::unavailable(format!("{program} exited with {}", output.status))
                } else {
                    DeviceUtilityStatus::unavailable(stderr)
                }
            }
        };

        match &status.error {
            None => tracing::info!("✓ {program} available: {} GPU(s)", status.gpu_count),
            Some(error) => tracing::warn!("✗ {program} unavailable: {error}"),
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nvidia_smi_uses_csv_name_query() {
        let prober = DeviceProber::nvidia_smi("nvidia-smi", Duration::from_secs(10));
        assert_eq!(prober.program, "nvidia-smi");
        assert_eq!(prober.args, vec!["--query-gpu=name", "--format=csv,noheader"]);
    }
}
