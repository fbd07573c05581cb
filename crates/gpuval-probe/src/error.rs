//! Prober error types.

use thiserror::Error;

/// Errors raised while setting up a probe.
///
/// Probe outcomes themselves (unreachable endpoints, a missing utility) are
/// results, not errors.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// The API base URL is not an absolute http(s) URL.
    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
}
