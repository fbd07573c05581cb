//! # gpuval-config
//!
//! Layered configuration loading for the GPU metrics validator using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GPUVAL_*` prefix, `__` as separator)
//! 2. The JSON file passed with `--config`
//! 3. Built-in defaults
//!
//! A missing, unreadable, or invalid file never aborts a run: [`GpuValConfig::load`]
//! falls back to defaults and reports why through [`ConfigSource::Defaults`].
//!
//! # Environment Variable Mapping
//!
//! Figment maps `GPUVAL_DATABASE__PASSWORD` -> `database.password`,
//! `GPUVAL_VALIDATION_RULES__POWER_RATIO` -> `validation_rules.power_ratio`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use gpuval_config::{ConfigSource, GpuValConfig};
//!
//! let loaded = GpuValConfig::load("/etc/gpu-management/validation.json");
//! if let ConfigSource::Defaults { reason } = &loaded.source {
//!     eprintln!("using default configuration: {reason}");
//! }
//! println!("probing {}", loaded.config.api_base_url);
//! ```

mod database;
mod device;
mod error;
mod rules;

pub use database::{DatabaseConfig, DatabaseKind};
pub use device::DeviceUtilityConfig;
pub use error::ConfigError;
pub use rules::ValidationRules;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default monitoring API root.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/k8s-monitor/api/v1";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.into()
}

const fn default_http_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GpuValConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout for endpoint probes.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub device_utility: DeviceUtilityConfig,

    #[serde(default)]
    pub validation_rules: ValidationRules,
}

impl Default for GpuValConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            http_timeout_secs: default_http_timeout_secs(),
            database: DatabaseConfig::default(),
            device_utility: DeviceUtilityConfig::default(),
            validation_rules: ValidationRules::default(),
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults { reason: String },
}

/// A configuration together with its provenance.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: GpuValConfig,
    pub source: ConfigSource,
}

impl GpuValConfig {
    /// Load from `path`, falling back to defaults (plus env overrides) when
    /// the file is missing or does not produce a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> LoadedConfig {
        let path = path.as_ref();
        if !path.is_file() {
            return Self::defaults_because(format!("{} not found", path.display()));
        }

        match Self::load_file(path) {
            Ok(config) => LoadedConfig {
                config,
                source: ConfigSource::File(path.to_path_buf()),
            },
            Err(error) => Self::defaults_because(format!(
                "failed to load {}: {error}",
                path.display()
            )),
        }
    }

    /// Load strictly from `path` and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or if the
    /// resulting validation rules are invalid.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(Some(path.as_ref())).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or layer additional
    /// providers on top.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Json::file(path));
        }
        figment.merge(Env::prefixed("GPUVAL_").split("__"))
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty API URL, a zero
    /// timeout, or invalid validation rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http_timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.device_utility.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "device_utility.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        self.validation_rules.validate()
    }

    fn defaults_because(reason: String) -> LoadedConfig {
        let config = Self::figment(None)
            .extract::<Self>()
            .ok()
            .filter(|config| config.validate().is_ok())
            .unwrap_or_default();
        LoadedConfig {
            config,
            source: ConfigSource::Defaults { reason },
        }
    }
}
