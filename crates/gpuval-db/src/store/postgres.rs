use chrono::NaiveDateTime;
use gpuval_config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Row};

use super::{KeyCount, Reading, TelemetryStore, non_negative};
use crate::dialect::Dialect;
use crate::error::DatabaseError;

/// A single PostgreSQL connection held for the whole validation pass.
pub struct PgStore {
    conn: PgConnection,
}

impl PgStore {
    /// # Errors
    ///
    /// Returns `DatabaseError::Connect` if the server cannot be reached or
    /// rejects the credentials.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.username)
            .password(&config.password);

        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| DatabaseError::Connect {
                target: config.target(),
                reason: e.to_string(),
            })?;
        Ok(Self { conn })
    }
}

impl TelemetryStore for PgStore {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn fetch_count(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        let count: i64 = sqlx::query_scalar(sql).fetch_one(&mut self.conn).await?;
        non_negative(count)
    }

    async fn fetch_key_counts(&mut self, sql: &str) -> Result<Vec<KeyCount>, DatabaseError> {
        let rows = sqlx::query(sql).fetch_all(&mut self.conn).await?;
        rows.iter()
            .map(|row| -> Result<KeyCount, DatabaseError> {
                Ok(KeyCount {
                    key: row.try_get::<Option<String>, _>(0)?,
                    count: non_negative(row.try_get::<i64, _>(1)?)?,
                })
            })
            .collect()
    }

    async fn fetch_readings(&mut self, sql: &str) -> Result<Vec<Reading>, DatabaseError> {
        let rows = sqlx::query(sql).fetch_all(&mut self.conn).await?;
        rows.iter()
            .map(|row| -> Result<Reading, DatabaseError> {
                let values = (2..row.len())
                    .map(|i| row.try_get::<f64, _>(i))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Reading {
                    device_id: row.try_get::<Option<String>, _>(0)?,
                    timestamp: row.try_get::<NaiveDateTime, _>(1)?,
                    values,
                })
            })
            .collect()
    }

    async fn close(self) -> Result<(), DatabaseError> {
        self.conn.close().await?;
        Ok(())
    }
}
