//! # gpuval-core
//!
//! Core types shared by every gpuval crate.
//!
//! This crate holds the typed records a validation run produces:
//! - Endpoint and device-utility probe results
//! - Integrity, accuracy, and consistency findings per check group
//! - Anomaly records with their severity
//! - The aggregate [`ValidationReport`] and the exit-status decision
//!
//! Nothing here performs I/O. Records are built once by the probers and the
//! database validator and are never mutated after the report is assembled.

pub mod anomaly;
pub mod findings;
pub mod probe;
pub mod report;
pub mod severity;

pub use anomaly::{AnomalyDetail, AnomalyKind, AnomalyRecord};
pub use findings::{
    AccuracyFindings, ConsistencyFindings, DataValidation, DeviceGaps, IntegrityFindings,
};
pub use probe::{DeviceUtilityStatus, EndpointCheckResult};
pub use report::{ExitStatus, Finding, VALIDATION_VERSION, ValidationReport};
pub use severity::Severity;
