//! The aggregate report of one validation run and the exit-status decision.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::findings::DataValidation;
use crate::probe::{DeviceUtilityStatus, EndpointCheckResult};

/// Version tag written into every report.
pub const VALIDATION_VERSION: &str = "1.0.0";

/// All results of a run. Sections that were not run stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub timestamp: DateTime<Local>,
    pub validation_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_validation: Option<Vec<EndpointCheckResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_utility: Option<DeviceUtilityStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_validation: Option<DataValidation>,
}

impl ValidationReport {
    /// An empty report stamped with the current local time.
    #[must_use]
    pub fn new() -> Self {
        Self::at(Local::now())
    }

    #[must_use]
    pub fn at(timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            validation_version: VALIDATION_VERSION.to_string(),
            api_validation: None,
            device_utility: None,
            data_validation: None,
        }
    }

    /// Problems that make the run unhealthy.
    ///
    /// Nonzero data-quality counts never appear here. A device utility that
    /// was not probed is not a finding.
    #[must_use]
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();

        if let Some(endpoints) = &self.api_validation {
            findings.extend(
                endpoints
                    .iter()
                    .filter(|e| !e.reachable)
                    .map(|e| Finding::EndpointUnreachable(e.endpoint.clone())),
            );
        }

        if let Some(data) = &self.data_validation {
            findings.extend(data.errors().into_iter().map(|(group, error)| {
                Finding::ValidatorError {
                    group,
                    error: error.to_string(),
                }
            }));
            let critical = data.critical_anomalies().count();
            if critical > 0 {
                findings.push(Finding::CriticalAnomalies(critical));
            }
        }

        if let Some(utility) = self.device_utility.as_ref().filter(|u| !u.available) {
            findings.push(Finding::DeviceUtilityUnavailable(
                utility.error.clone().unwrap_or_default(),
            ));
        }

        findings
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.findings().is_empty()
    }

    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        if self.has_errors() {
            ExitStatus::Findings
        } else {
            ExitStatus::Success
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// One reason a run is considered unhealthy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    EndpointUnreachable(String),
    ValidatorError { group: &'static str, error: String },
    DeviceUtilityUnavailable(String),
    CriticalAnomalies(usize),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndpointUnreachable(endpoint) => write!(f, "endpoint unreachable: {endpoint}"),
            Self::ValidatorError { group, error } => write!(f, "{group} failed: {error}"),
            Self::DeviceUtilityUnavailable(error) => {
                write!(f, "device utility unavailable: {error}")
            }
            Self::CriticalAnomalies(count) => write!(f, "{count} critical anomalies"),
        }
    }
}

/// Process exit status of the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Findings,
    UnexpectedError,
    Interrupted,
}

impl ExitStatus {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Findings => 1,
            Self::UnexpectedError => 2,
            Self::Interrupted => 130,
        }
    }
}
