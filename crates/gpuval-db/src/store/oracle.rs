use chrono::NaiveDateTime;
use gpuval_config::DatabaseConfig;

use super::{KeyCount, Reading, TelemetryStore, non_negative};
use crate::dialect::Dialect;
use crate::error::DatabaseError;

/// A single Oracle connection.
///
/// The driver is blocking. Queries run inline on the calling task, which is
/// acceptable because a validation pass is strictly sequential.
pub struct OracleStore {
    conn: oracle::Connection,
}

impl OracleStore {
    /// Connect with an Easy Connect string `//host:port/service_name`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Connect` if the listener cannot be reached or
    /// rejects the credentials.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let connect_string = format!(
            "//{}:{}/{}",
            config.host, config.port, config.service_name
        );
        let conn = oracle::Connection::connect(&config.username, &config.password, connect_string)
            .map_err(|e| DatabaseError::Connect {
                target: config.target(),
                reason: e.to_string(),
            })?;
        Ok(Self { conn })
    }
}

impl TelemetryStore for OracleStore {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    async fn fetch_count(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        let count = self.conn.query_row_as::<i64>(sql, &[])?;
        non_negative(count)
    }

    async fn fetch_key_counts(&mut self, sql: &str) -> Result<Vec<KeyCount>, DatabaseError> {
        let rows = self.conn.query(sql, &[])?;
        let mut out = Vec::new();
        for row in rows {
            let row = row?;
            out.push(KeyCount {
                key: row.get::<usize, Option<String>>(0)?,
                count: non_negative(row.get::<usize, i64>(1)?)?,
            });
        }
        Ok(out)
    }

    async fn fetch_readings(&mut self, sql: &str) -> Result<Vec<Reading>, DatabaseError> {
        let rows = self.conn.query(sql, &[])?;
        let columns = rows.column_info().len();
        let mut out = Vec::new();
        for row in rows {
            let row = row?;
            let values = (2..columns)
                .map(|i| row.get::<usize, f64>(i))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(Reading {
                device_id: row.get::<usize, Option<String>>(0)?,
                timestamp: row.get::<usize, NaiveDateTime>(1)?,
                values,
            });
        }
        Ok(out)
    }

    async fn close(self) -> Result<(), DatabaseError> {
        self.conn.close()?;
        Ok(())
    }
}
