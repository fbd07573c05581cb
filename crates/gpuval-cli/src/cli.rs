use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/gpu-management/validation.json";
pub const DEFAULT_OUTPUT_PATH: &str = "/var/log/gpu-management/validation-report.txt";
pub const DEFAULT_LOG_PATH: &str = "/var/log/gpu-management/metrics-validation.log";

/// Top-level CLI parser for the `gpu-metrics-validate` binary.
#[derive(Debug, Parser)]
#[command(
    name = "gpu-metrics-validate",
    version,
    about = "Validate GPU telemetry data, monitoring API endpoints, and the GPU device utility"
)]
pub struct Cli {
    /// Configuration file (JSON); built-in defaults are used if it is missing
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Text report path; the JSON report is written next to it
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Only probe the API endpoints and the device utility
    #[arg(long, conflicts_with = "data_only")]
    pub api_only: bool,

    /// Only validate the telemetry database
    #[arg(long)]
    pub data_only: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Log file, appended to alongside stdout
    #[arg(long, default_value = DEFAULT_LOG_PATH)]
    pub log_file: PathBuf,
}

/// Which checks a run performs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunMode {
    All,
    ApiOnly,
    DataOnly,
}

impl RunMode {
    #[must_use]
    pub const fn probes_api(self) -> bool {
        matches!(self, Self::All | Self::ApiOnly)
    }

    #[must_use]
    pub const fn validates_data(self) -> bool {
        matches!(self, Self::All | Self::DataOnly)
    }
}

impl Cli {
    #[must_use]
    pub const fn mode(&self) -> RunMode {
        if self.api_only {
            RunMode::ApiOnly
        } else if self.data_only {
            RunMode::DataOnly
        } else {
            RunMode::All
        }
    }
}
