//! Connection settings for the monitored telemetry database.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which database engine holds the telemetry tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[default]
    Postgresql,
    Oracle,
    /// Local SQLite/libSQL file, e.g. an exported snapshot.
    Sqlite,
}

impl DatabaseKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
            Self::Oracle => "oracle",
            Self::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_host() -> String {
    "localhost".into()
}

const fn default_port() -> u16 {
    5432
}

fn default_database() -> String {
    "gpu_management".into()
}

fn default_username() -> String {
    "gpu_admin".into()
}

fn default_password() -> String {
    "password".into()
}

#[derive(Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(rename = "type", default)]
    pub kind: DatabaseKind,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name (PostgreSQL).
    #[serde(default = "default_database")]
    pub database: String,

    /// Service name (Oracle).
    #[serde(default)]
    pub service_name: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    /// Database file (SQLite).
    #[serde(default)]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            kind: DatabaseKind::default(),
            host: default_host(),
            port: default_port(),
            database: default_database(),
            service_name: String::new(),
            username: default_username(),
            password: default_password(),
            path: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// Connection target suitable for logs; never includes the password.
    #[must_use]
    pub fn target(&self) -> String {
        match self.kind {
            DatabaseKind::Postgresql => format!(
                "postgresql://{}@{}:{}/{}",
                self.username, self.host, self.port, self.database
            ),
            DatabaseKind::Oracle => format!(
                "oracle://{}@{}:{}/{}",
                self.username, self.host, self.port, self.service_name
            ),
            DatabaseKind::Sqlite => format!("sqlite://{}", self.path),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("service_name", &self.service_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("path", &self.path)
            .finish()
    }
}
