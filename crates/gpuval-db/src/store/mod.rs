//! Backends that execute the check queries.
//!
//! A validation pass needs only three result shapes: a single count, a list
//! of `(key, count)` rows, and a list of timestamped readings. Each backend
//! maps its driver onto those shapes so the check groups stay dialect-free.

mod sqlite;
#[cfg(feature = "oracle")]
mod oracle;
mod postgres;

use chrono::NaiveDateTime;
use gpuval_config::{DatabaseConfig, DatabaseKind};

use crate::dialect::Dialect;
use crate::error::DatabaseError;

pub use self::sqlite::LibSqlStore;
#[cfg(feature = "oracle")]
pub use self::oracle::OracleStore;
pub use self::postgres::PgStore;

/// One `(key, count)` row from a grouped query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCount {
    pub key: Option<String>,
    pub count: u64,
}

/// One anomaly-query row: device, timestamp, then numeric columns in
/// select-list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub device_id: Option<String>,
    pub timestamp: NaiveDateTime,
    pub values: Vec<f64>,
}

impl Reading {
    /// The `index`-th numeric column.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Decode` if the query selected fewer columns.
    pub fn value(&self, index: usize) -> Result<f64, DatabaseError> {
        self.values.get(index).copied().ok_or_else(|| {
            DatabaseError::Decode(format!(
                "reading has {} numeric columns, wanted index {index}",
                self.values.len()
            ))
        })
    }
}

/// A single open connection to the telemetry database.
///
/// Queries run sequentially over `&mut self`; nothing is pooled.
#[allow(async_fn_in_trait)]
pub trait TelemetryStore {
    fn dialect(&self) -> Dialect;

    /// Run a query whose first row's first column is a count.
    async fn fetch_count(&mut self, sql: &str) -> Result<u64, DatabaseError>;

    /// Run a query returning `(key, count)` rows.
    async fn fetch_key_counts(&mut self, sql: &str) -> Result<Vec<KeyCount>, DatabaseError>;

    /// Run a query returning `(device_id, timestamp, f64...)` rows.
    async fn fetch_readings(&mut self, sql: &str) -> Result<Vec<Reading>, DatabaseError>;

    /// Release the connection.
    async fn close(self) -> Result<(), DatabaseError>
    where
        Self: Sized;
}

/// The backend selected by configuration.
pub enum AnyStore {
    Postgres(PgStore),
    LibSql(LibSqlStore),
    #[cfg(feature = "oracle")]
    Oracle(OracleStore),
}

/// Open a connection for the configured database type.
///
/// # Errors
///
/// Returns `DatabaseError::Connect` if the database is unreachable, or
/// `DatabaseError::Unsupported` for Oracle in a build without the `oracle`
/// feature.
pub async fn connect(config: &DatabaseConfig) -> Result<AnyStore, DatabaseError> {
    tracing::debug!(target = %config.target(), "connecting to telemetry database");
    match config.kind {
        DatabaseKind::Postgresql => Ok(AnyStore::Postgres(PgStore::connect(config).await?)),
        DatabaseKind::Sqlite => Ok(AnyStore::LibSql(LibSqlStore::open(&config.path).await?)),
        #[cfg(feature = "oracle")]
        DatabaseKind::Oracle => Ok(AnyStore::Oracle(OracleStore::connect(config)?)),
        #[cfg(not(feature = "oracle"))]
        DatabaseKind::Oracle => Err(DatabaseError::Unsupported(
            "oracle (rebuild with the `oracle` feature)".into(),
        )),
    }
}

impl TelemetryStore for AnyStore {
    fn dialect(&self) -> Dialect {
        match self {
            Self::Postgres(store) => store.dialect(),
            Self::LibSql(store) => store.dialect(),
            #[cfg(feature = "oracle")]
            Self::Oracle(store) => store.dialect(),
        }
    }

    async fn fetch_count(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        match self {
            Self::Postgres(store) => store.fetch_count(sql).await,
            Self::LibSql(store) => store.fetch_count(sql).await,
            #[cfg(feature = "oracle")]
            Self::Oracle(store) => store.fetch_count(sql).await,
        }
    }

    async fn fetch_key_counts(&mut self, sql: &str) -> Result<Vec<KeyCount>, DatabaseError> {
        match self {
            Self::Postgres(store) => store.fetch_key_counts(sql).await,
            Self::LibSql(store) => store.fetch_key_counts(sql).await,
            #[cfg(feature = "oracle")]
            Self::Oracle(store) => store.fetch_key_counts(sql).await,
        }
    }

    async fn fetch_readings(&mut self, sql: &str) -> Result<Vec<Reading>, DatabaseError> {
        match self {
            Self::Postgres(store) => store.fetch_readings(sql).await,
            Self::LibSql(store) => store.fetch_readings(sql).await,
            #[cfg(feature = "oracle")]
            Self::Oracle(store) => store.fetch_readings(sql).await,
        }
    }

    async fn close(self) -> Result<(), DatabaseError> {
        match self {
            Self::Postgres(store) => store.close().await,
            Self::LibSql(store) => store.close().await,
            #[cfg(feature = "oracle")]
            Self::Oracle(store) => store.close().await,
        }
    }
}

/// Convert a driver's signed count.
pub(crate) fn non_negative(count: i64) -> Result<u64, DatabaseError> {
    u64::try_from(count).map_err(|_| DatabaseError::Decode(format!("negative count {count}")))
}
