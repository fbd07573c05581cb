//! Anomaly severity and the threshold rules that assign it.
//!
//! Every comparison against a threshold is strict: a reading sitting exactly
//! on a threshold is not escalated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity attached to an anomaly record.
///
/// Ordered so that `Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a utilization jump of `difference` percentage points.
///
/// `HIGH` only when the jump is strictly above `high_threshold`.
#[must_use]
pub fn spike_severity(difference: f64, high_threshold: f64) -> Severity {
    if difference > high_threshold {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// Severity of a temperature reading, or `None` when it is not anomalous.
#[must_use]
pub fn temperature_severity(celsius: f64, high_c: f64, critical_c: f64) -> Option<Severity> {
    if celsius > critical_c {
        Some(Severity::Critical)
    } else if celsius > high_c {
        Some(Severity::High)
    } else {
        None
    }
}
