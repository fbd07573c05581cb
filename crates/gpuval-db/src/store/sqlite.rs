use std::path::Path;

use libsql::Builder;

use super::{KeyCount, Reading, TelemetryStore};
use crate::dialect::Dialect;
use crate::error::DatabaseError;
use crate::helpers::{value_to_count, value_to_datetime, value_to_f64, value_to_opt_string};

/// Local SQLite telemetry (an exported snapshot, or `:memory:` in tests).
pub struct LibSqlStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl LibSqlStore {
    /// Open an existing database file, or a fresh in-memory database for
    /// `":memory:"`.
    ///
    /// The file is never created: validating a path that does not exist is a
    /// connection failure.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Connect` if the file is missing or cannot be
    /// opened.
    pub async fn open(path: &str) -> Result<Self, DatabaseError> {
        let connect_error = |reason: String| DatabaseError::Connect {
            target: format!("sqlite://{path}"),
            reason,
        };

        if path != ":memory:" && !Path::new(path).is_file() {
            return Err(connect_error("database file not found".into()));
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| connect_error(e.to_string()))?;
        let conn = db.connect().map_err(|e| connect_error(e.to_string()))?;
        Ok(Self { db, conn })
    }

    /// Access the underlying connection, e.g. to seed fixtures.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}

impl TelemetryStore for LibSqlStore {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn fetch_count(&mut self, sql: &str) -> Result<u64, DatabaseError> {
        let mut rows = self.conn.query(sql, ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        value_to_count(&row.get_value(0)?)
    }

    async fn fetch_key_counts(&mut self, sql: &str) -> Result<Vec<KeyCount>, DatabaseError> {
        let mut rows = self.conn.query(sql, ()).await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(KeyCount {
                key: value_to_opt_string(&row.get_value(0)?)?,
                count: value_to_count(&row.get_value(1)?)?,
            });
        }
        Ok(out)
    }

    async fn fetch_readings(&mut self, sql: &str) -> Result<Vec<Reading>, DatabaseError> {
        let mut rows = self.conn.query(sql, ()).await?;
        let columns = rows.column_count();
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let values = (2..columns)
                .map(|i| value_to_f64(&row.get_value(i)?))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(Reading {
                device_id: value_to_opt_string(&row.get_value(0)?)?,
                timestamp: value_to_datetime(&row.get_value(1)?)?,
                values,
            });
        }
        Ok(out)
    }

    // libsql closes the connection when it is dropped.
    async fn close(self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
