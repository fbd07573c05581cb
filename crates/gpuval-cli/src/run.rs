//! One validation pass.

use std::time::Duration;

use gpuval_config::{ConfigSource, GpuValConfig};
use gpuval_core::{DataValidation, EndpointCheckResult, ExitStatus, ValidationReport};
use gpuval_probe::{ApiProber, DeviceProber, MONITORED_ENDPOINTS};

use crate::cli::{Cli, RunMode};
use crate::output;

/// Load configuration, run the checks selected by `cli`, write both
/// reports, and decide the exit status.
///
/// # Errors
///
/// Returns an error only for failures outside the checks themselves, such as
/// a report that cannot be rendered.
pub async fn run(cli: &Cli) -> anyhow::Result<ExitStatus> {
    tracing::info!("Starting GPU metrics validation");

    let loaded = GpuValConfig::load(&cli.config);
    match &loaded.source {
        ConfigSource::File(path) => {
            tracing::info!("Loaded configuration from {}", path.display());
        }
        ConfigSource::Defaults { reason } => {
            tracing::warn!("Using default configuration: {reason}");
        }
    }
    let config = loaded.config;
    let mode = cli.mode();
    tracing::debug!(?mode, "validation mode selected");

    let mut report = ValidationReport::new();

    if mode.probes_api() {
        report.api_validation = Some(probe_api(&config).await);

        let utility = &config.device_utility;
        let prober = DeviceProber::nvidia_smi(
            utility.command.as_str(),
            Duration::from_secs(utility.timeout_secs),
        );
        report.device_utility = Some(prober.probe().await);
    }

    if mode.validates_data() {
        match gpuval_db::connect(&config.database).await {
            Ok(store) => {
                tracing::info!("Connected to {} database", config.database.kind);
                let data = gpuval_db::validate_database(store, &config.validation_rules).await;
                report.data_validation = Some(data);
            }
            Err(error) if mode == RunMode::DataOnly => {
                tracing::error!("Database connection failed: {error}");
                return Ok(ExitStatus::Findings);
            }
            Err(error) => {
                tracing::error!("Database connection failed: {error}");
                report.data_validation = Some(DataValidation::connection_failed(error.to_string()));
            }
        }
    }

    output::write_reports(&report, &cli.output)?;

    let findings = report.findings();
    for finding in &findings {
        tracing::warn!("{finding}");
    }
    let status = report.exit_status();
    if status == ExitStatus::Success {
        tracing::info!("Validation completed successfully");
    } else {
        tracing::warn!("Validation completed with {} issue(s)", findings.len());
    }
    Ok(status)
}

async fn probe_api(config: &GpuValConfig) -> Vec<EndpointCheckResult> {
    let timeout = Duration::from_secs(config.http_timeout_secs);
    match ApiProber::new(&config.api_base_url, timeout) {
        Ok(prober) => prober.probe_all().await,
        Err(error) => {
            tracing::error!("Cannot probe API endpoints: {error}");
            MONITORED_ENDPOINTS
                .iter()
                .map(|endpoint| EndpointCheckResult::failed(*endpoint, error.to_string()))
                .collect()
        }
    }
}
