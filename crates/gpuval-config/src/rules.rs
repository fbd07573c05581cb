//! Thresholds used by the accuracy, consistency, and anomaly checks.
//!
//! Defaults reproduce the historical fixed thresholds. Range bounds are
//! inclusive; anomaly thresholds are exceeded only by strictly greater values.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_pct_min() -> f64 {
    0.0
}

const fn default_pct_max() -> f64 {
    100.0
}

const fn default_temperature_max_c() -> f64 {
    120.0
}

const fn default_power_draw_max_w() -> f64 {
    1000.0
}

const fn default_retention_days() -> u32 {
    365
}

const fn default_lookback_hours() -> u32 {
    24
}

const fn default_time_gap_seconds() -> u32 {
    300
}

const fn default_max_gaps_per_device() -> u32 {
    10
}

const fn default_utilization_spike_pct() -> f64 {
    70.0
}

const fn default_utilization_spike_high_pct() -> f64 {
    90.0
}

const fn default_temperature_high_c() -> f64 {
    90.0
}

const fn default_temperature_critical_c() -> f64 {
    95.0
}

const fn default_power_ratio() -> f64 {
    1.2
}

const fn default_max_anomalies_per_kind() -> u32 {
    10
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValidationRules {
    /// Bounds for both GPU and memory utilization percentages.
    #[serde(default = "default_pct_min")]
    pub utilization_min_pct: f64,
    #[serde(default = "default_pct_max")]
    pub utilization_max_pct: f64,

    #[serde(default = "default_pct_min")]
    pub temperature_min_c: f64,
    #[serde(default = "default_temperature_max_c")]
    pub temperature_max_c: f64,

    #[serde(default = "default_pct_min")]
    pub power_draw_min_w: f64,
    #[serde(default = "default_power_draw_max_w")]
    pub power_draw_max_w: f64,

    /// Readings older than this many days are flagged.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Window for gap detection and every anomaly query.
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: u32,

    #[serde(default = "default_time_gap_seconds")]
    pub time_gap_seconds: u32,

    /// A device is flagged when it has more gaps than this.
    #[serde(default = "default_max_gaps_per_device")]
    pub max_gaps_per_device: u32,

    #[serde(default = "default_utilization_spike_pct")]
    pub utilization_spike_pct: f64,
    #[serde(default = "default_utilization_spike_high_pct")]
    pub utilization_spike_high_pct: f64,

    #[serde(default = "default_temperature_high_c")]
    pub temperature_high_c: f64,
    #[serde(default = "default_temperature_critical_c")]
    pub temperature_critical_c: f64,

    /// Multiple of the model's rated power above which a reading is anomalous.
    #[serde(default = "default_power_ratio")]
    pub power_ratio: f64,

    #[serde(default = "default_max_anomalies_per_kind")]
    pub max_anomalies_per_kind: u32,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            utilization_min_pct: default_pct_min(),
            utilization_max_pct: default_pct_max(),
            temperature_min_c: default_pct_min(),
            temperature_max_c: default_temperature_max_c(),
            power_draw_min_w: default_pct_min(),
            power_draw_max_w: default_power_draw_max_w(),
            retention_days: default_retention_days(),
            lookback_hours: default_lookback_hours(),
            time_gap_seconds: default_time_gap_seconds(),
            max_gaps_per_device: default_max_gaps_per_device(),
            utilization_spike_pct: default_utilization_spike_pct(),
            utilization_spike_high_pct: default_utilization_spike_high_pct(),
            temperature_high_c: default_temperature_high_c(),
            temperature_critical_c: default_temperature_critical_c(),
            power_ratio: default_power_ratio(),
            max_anomalies_per_kind: default_max_anomalies_per_kind(),
        }
    }
}

impl ValidationRules {
    /// Reject rule sets whose SQL would be meaningless.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ranges = [
            ("utilization", self.utilization_min_pct, self.utilization_max_pct),
            ("temperature", self.temperature_min_c, self.temperature_max_c),
            ("power_draw", self.power_draw_min_w, self.power_draw_max_w),
        ];
        for (name, min, max) in ranges {
            if !min.is_finite() || !max.is_finite() || min > max {
                return Err(invalid(
                    &format!("validation_rules.{name}"),
                    format!("range [{min}, {max}] is empty or not finite"),
                ));
            }
        }

        let thresholds = [
            ("utilization_spike_pct", self.utilization_spike_pct),
            ("utilization_spike_high_pct", self.utilization_spike_high_pct),
            ("temperature_high_c", self.temperature_high_c),
            ("temperature_critical_c", self.temperature_critical_c),
            ("power_ratio", self.power_ratio),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(
                    &format!("validation_rules.{name}"),
                    format!("{value} must be a positive number"),
                ));
            }
        }

        if self.temperature_critical_c < self.temperature_high_c {
            return Err(invalid(
                "validation_rules.temperature_critical_c",
                "must not be below temperature_high_c".into(),
            ));
        }

        let counts = [
            ("lookback_hours", self.lookback_hours),
            ("retention_days", self.retention_days),
            ("time_gap_seconds", self.time_gap_seconds),
            ("max_anomalies_per_kind", self.max_anomalies_per_kind),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(invalid(
                    &format!("validation_rules.{name}"),
                    "must be greater than zero".into(),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason,
    }
}
