//! Monitoring API reachability.

use std::time::Duration;

use gpuval_core::EndpointCheckResult;

use crate::error::ProbeError;

/// Endpoints probed on every run, relative to the API base URL.
pub const MONITORED_ENDPOINTS: [&str; 6] = [
    "/gpu/overview",
    "/gpu/devices",
    "/gpu/metrics/usage-statistics",
    "/gpu/allocations",
    "/gpu/mig/available",
    "/gpu/cost/analysis",
];

/// Issues one GET per endpoint; no retries, no body inspection.
#[derive(Debug, Clone)]
pub struct ApiProber {
    http: reqwest::Client,
    base_url: String,
}

impl ApiProber {
    /// `timeout` bounds each request, connect included.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::InvalidBaseUrl` unless `base_url` starts with
    /// `http://` or `https://`, and `ProbeError::Client` if the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProbeError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ProbeError::InvalidBaseUrl(base_url.to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("gpu-metrics-validate/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }

    /// Probe every entry of [`MONITORED_ENDPOINTS`], in order.
    pub async fn probe_all(&self) -> Vec<EndpointCheckResult> {
        tracing::info!("Validating API endpoints...");
        let mut results = Vec::with_capacity(MONITORED_ENDPOINTS.len());
        for endpoint in MONITORED_ENDPOINTS {
            results.push(self.check_endpoint(endpoint).await);
        }
        results
    }

    /// GET `base_url + endpoint`. Only `200 OK` counts as reachable.
    pub async fn check_endpoint(&self, endpoint: &str) -> EndpointCheckResult {
        let url = format!("{}{endpoint}", self.base_url);
        match self.http.get(&url).send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let result = EndpointCheckResult::responded(endpoint, status);
                if result.reachable {
                    tracing::info!("✓ {endpoint} - OK");
                } else {
                    tracing::warn!("✗ {endpoint} - Status: {status}");
                }
                result
            }
            Err(e) => {
                tracing::error!("✗ {endpoint} - Error: {e}");
                EndpointCheckResult::failed(endpoint, e.to_string())
            }
        }
    }
}
