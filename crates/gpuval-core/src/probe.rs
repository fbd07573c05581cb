//! Results of the monitoring-API and device-utility probes.

use serde::{Deserialize, Serialize};

/// One GET against a monitoring endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointCheckResult {
    pub endpoint: String,
    /// `true` only for an HTTP 200 response.
    pub reachable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EndpointCheckResult {
    #[must_use]
    pub fn responded(endpoint: impl Into<String>, status: u16) -> Self {
        Self {
            endpoint: endpoint.into(),
            reachable: status == 200,
            status: Some(status),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(endpoint: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            reachable: false,
            status: None,
            error: Some(error.into()),
        }
    }
}

/// Availability of the GPU enumeration utility and the devices it listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceUtilityStatus {
    pub available: bool,
    pub gpu_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gpu_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeviceUtilityStatus {
    #[must_use]
    pub fn available(gpu_names: Vec<String>) -> Self {
        Self {
            available: true,
            gpu_count: gpu_names.len(),
            gpu_names,
            error: None,
        }
    }

    #[must_use]
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            available: false,
            gpu_count: 0,
            gpu_names: Vec::new(),
            error: Some(error.into()),
        }
    }
}
