//! # gpuval-probe
//!
//! Liveness probes run before (or instead of) the database checks:
//! - [`ApiProber`] issues a GET against each monitored endpoint of the GPU
//!   monitoring API and records whether it answered `200 OK`.
//! - [`DeviceProber`] runs the device-enumeration utility (`nvidia-smi` by
//!   default) and records the GPU names it lists.
//!
//! Probes never fail a run on their own: every outcome is returned as a
//! typed record from `gpuval-core`.

pub mod api;
pub mod device;
mod error;

pub use api::{ApiProber, MONITORED_ENDPOINTS};
pub use device::{DeviceProber, NVIDIA_SMI_QUERY};
pub use error::ProbeError;
