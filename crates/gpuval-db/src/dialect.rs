//! SQL dialect fragments.
//!
//! The check queries are written once; only time arithmetic, row limiting,
//! and result-column casts differ between engines. Casts normalize result
//! columns so every backend decodes the same Rust types: text ids,
//! timestamps, and double-precision numbers.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Oracle,
    Sqlite,
}

impl Dialect {
    #[must_use]
    pub const fn now(self) -> &'static str {
        match self {
            Self::Postgres | Self::Oracle => "CURRENT_TIMESTAMP",
            Self::Sqlite => "datetime('now')",
        }
    }

    #[must_use]
    pub fn hours_ago(self, hours: u32) -> String {
        match self {
            Self::Postgres => format!("CURRENT_TIMESTAMP - INTERVAL '{hours} hours'"),
            Self::Oracle => format!("CURRENT_TIMESTAMP - NUMTODSINTERVAL({hours}, 'HOUR')"),
            Self::Sqlite => format!("datetime('now', '-{hours} hours')"),
        }
    }

    #[must_use]
    pub fn days_ago(self, days: u32) -> String {
        match self {
            Self::Postgres => format!("CURRENT_TIMESTAMP - INTERVAL '{days} days'"),
            Self::Oracle => format!("CURRENT_TIMESTAMP - NUMTODSINTERVAL({days}, 'DAY')"),
            Self::Sqlite => format!("datetime('now', '-{days} days')"),
        }
    }

    /// A stored timestamp column in a form comparable with [`Self::now`] and
    /// the `*_ago` bounds.
    ///
    /// SQLite text timestamps may use `T` separators, fractional seconds, or
    /// UTC offsets; `datetime()` brings them to UTC `YYYY-MM-DD HH:MM:SS`.
    #[must_use]
    pub fn column_time(self, column: &str) -> String {
        match self {
            Self::Postgres | Self::Oracle => column.to_string(),
            Self::Sqlite => format!("datetime({column})"),
        }
    }

    /// Row-limiting clause appended after `ORDER BY`.
    #[must_use]
    pub fn limit(self, rows: u32) -> String {
        match self {
            Self::Postgres | Self::Sqlite => format!("LIMIT {rows}"),
            Self::Oracle => format!("FETCH FIRST {rows} ROWS ONLY"),
        }
    }

    /// Whole seconds elapsed from `earlier` to `later`.
    #[must_use]
    pub fn seconds_between(self, later: &str, earlier: &str) -> String {
        match self {
            Self::Postgres => format!("EXTRACT(EPOCH FROM ({later} - {earlier}))"),
            Self::Oracle => {
                format!("(CAST({later} AS DATE) - CAST({earlier} AS DATE)) * 86400")
            }
            Self::Sqlite => format!(
                "(CAST(strftime('%s', {later}) AS INTEGER) - CAST(strftime('%s', {earlier}) AS INTEGER))"
            ),
        }
    }

    #[must_use]
    pub fn as_double(self, expr: &str) -> String {
        match self {
            Self::Postgres => format!("CAST({expr} AS DOUBLE PRECISION)"),
            Self::Oracle => format!("CAST({expr} AS BINARY_DOUBLE)"),
            Self::Sqlite => format!("CAST({expr} AS REAL)"),
        }
    }

    #[must_use]
    pub fn as_text(self, expr: &str) -> String {
        match self {
            Self::Postgres | Self::Sqlite => format!("CAST({expr} AS TEXT)"),
            Self::Oracle => format!("TO_CHAR({expr})"),
        }
    }

    /// SQLite keeps timestamps as text and they are parsed client-side.
    #[must_use]
    pub fn as_timestamp(self, expr: &str) -> String {
        match self {
            Self::Postgres | Self::Oracle => format!("CAST({expr} AS TIMESTAMP)"),
            Self::Sqlite => expr.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Dialect::Postgres, "CURRENT_TIMESTAMP - INTERVAL '24 hours'")]
    #[case(Dialect::Oracle, "CURRENT_TIMESTAMP - NUMTODSINTERVAL(24, 'HOUR')")]
    #[case(Dialect::Sqlite, "datetime('now', '-24 hours')")]
    fn lookback_window(#[case] dialect: Dialect, #[case] expected: &str) {
        assert_eq!(dialect.hours_ago(24), expected);
    }

    #[rstest]
    #[case(Dialect::Postgres, "LIMIT 10")]
    #[case(Dialect::Sqlite, "LIMIT 10")]
    #[case(Dialect::Oracle, "FETCH FIRST 10 ROWS ONLY")]
    fn row_limit(#[case] dialect: Dialect, #[case] expected: &str) {
        assert_eq!(dialect.limit(10), expected);
    }

    #[test]
    fn postgres_gap_uses_epoch_extraction() {
        assert_eq!(
            Dialect::Postgres.seconds_between("timestamp", "prev_timestamp"),
            "EXTRACT(EPOCH FROM (timestamp - prev_timestamp))"
        );
    }

    #[rstest]
    #[case(Dialect::Postgres, "gum.timestamp")]
    #[case(Dialect::Oracle, "gum.timestamp")]
    #[case(Dialect::Sqlite, "datetime(gum.timestamp)")]
    fn stored_timestamps_are_normalized_only_on_sqlite(
        #[case] dialect: Dialect,
        #[case] expected: &str,
    ) {
        assert_eq!(dialect.column_time("gum.timestamp"), expected);
    }
}
