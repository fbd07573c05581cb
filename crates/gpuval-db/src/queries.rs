//! The read-only SQL behind every check.
//!
//! Queries are assembled from the active [`Dialect`] and the configured
//! [`ValidationRules`]. Thresholds are numbers from the configuration, never
//! user-controlled text, so they are formatted directly into the statement.
//!
//! Result shapes:
//! - count checks return a single `COUNT(*)` row
//! - duplicate and gap checks return `(key TEXT, count)` rows
//! - anomaly queries return `(device_id TEXT, timestamp, f64...)` rows

use gpuval_config::ValidationRules;

use crate::dialect::Dialect;

/// A named query that yields a single count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountQuery {
    /// Subject used in the finding key and log lines (a table or metric).
    pub subject: &'static str,
    pub sql: String,
}

impl CountQuery {
    fn new(subject: &'static str, sql: impl Into<String>) -> Self {
        Self {
            subject,
            sql: sql.into(),
        }
    }
}

/// Every check statement for one dialect and rule set.
#[derive(Debug, Clone)]
pub struct QueryCatalog {
    dialect: Dialect,
    rules: ValidationRules,
}

#[allow(clippy::unused_self)]
impl QueryCatalog {
    #[must_use]
    pub const fn new(dialect: Dialect, rules: ValidationRules) -> Self {
        Self { dialect, rules }
    }

    #[must_use]
    pub const fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    // ── integrity ───────────────────────────────────────────────────

    /// Rows missing a required key column, per table.
    #[must_use]
    pub fn null_checks(&self) -> [CountQuery; 3] {
        [
            CountQuery::new(
                "gpu_devices",
                "SELECT COUNT(*) FROM gpu_devices WHERE device_id IS NULL OR gpu_uuid IS NULL",
            ),
            CountQuery::new(
                "gpu_usage_metrics",
                "SELECT COUNT(*) FROM gpu_usage_metrics WHERE device_id IS NULL OR timestamp IS NULL",
            ),
            CountQuery::new(
                "gpu_allocations",
                "SELECT COUNT(*) FROM gpu_allocations WHERE allocation_id IS NULL",
            ),
        ]
    }

    /// Keys that occur more than once, as `(key, occurrences)` rows.
    #[must_use]
    pub fn duplicate_checks(&self) -> [CountQuery; 2] {
        let d = self.dialect;
        [
            CountQuery::new(
                "gpu_devices",
                format!(
                    "SELECT {}, COUNT(*) FROM gpu_devices GROUP BY gpu_uuid HAVING COUNT(*) > 1",
                    d.as_text("gpu_uuid")
                ),
            ),
            CountQuery::new(
                "gpu_allocations",
                format!(
                    "SELECT {}, COUNT(*) FROM gpu_allocations GROUP BY allocation_id HAVING COUNT(*) > 1",
                    d.as_text("allocation_id")
                ),
            ),
        ]
    }

    /// Rows whose device reference has no matching device.
    #[must_use]
    pub fn orphan_checks(&self) -> [CountQuery; 2] {
        [
            CountQuery::new(
                "gpu_usage_metrics",
                "SELECT COUNT(*) FROM gpu_usage_metrics gum \
                 LEFT JOIN gpu_devices gd ON gum.device_id = gd.device_id \
                 WHERE gd.device_id IS NULL",
            ),
            CountQuery::new(
                "gpu_allocations",
                "SELECT COUNT(*) FROM gpu_allocations ga \
                 LEFT JOIN gpu_devices gd ON ga.allocated_resource = gd.device_id \
                 WHERE ga.resource_type = 'FULL_GPU' AND gd.device_id IS NULL",
            ),
        ]
    }

    // ── accuracy ────────────────────────────────────────────────────

    /// Readings outside the inclusive valid range of each metric.
    #[must_use]
    pub fn range_checks(&self) -> [CountQuery; 4] {
        let r = &self.rules;
        let out_of_range = |column: &str, min: f64, max: f64| {
            format!(
                "SELECT COUNT(*) FROM gpu_usage_metrics WHERE {column} < {min} OR {column} > {max}"
            )
        };
        [
            CountQuery::new(
                "gpu_utilization",
                out_of_range(
                    "gpu_utilization_pct",
                    r.utilization_min_pct,
                    r.utilization_max_pct,
                ),
            ),
            CountQuery::new(
                "memory_utilization",
                out_of_range(
                    "memory_utilization_pct",
                    r.utilization_min_pct,
                    r.utilization_max_pct,
                ),
            ),
            CountQuery::new(
                "temperature",
                out_of_range("temperature_c", r.temperature_min_c, r.temperature_max_c),
            ),
            CountQuery::new(
                "power_draw",
                out_of_range("power_draw_w", r.power_draw_min_w, r.power_draw_max_w),
            ),
        ]
    }

    /// Values that contradict a related value.
    #[must_use]
    pub fn logical_checks(&self) -> [CountQuery; 2] {
        [
            CountQuery::new(
                "memory_usage",
                "SELECT COUNT(*) FROM gpu_usage_metrics WHERE memory_used_mb > memory_total_mb",
            ),
            CountQuery::new(
                "allocation_memory",
                "SELECT COUNT(*) FROM gpu_allocations ga \
                 JOIN gpu_devices gd ON ga.allocated_resource = gd.device_id \
                 JOIN gpu_models gm ON gd.model_id = gm.model_id \
                 WHERE ga.allocated_memory_gb > gm.memory_gb",
            ),
        ]
    }

    /// Future and past-retention timestamps; subjects are the finding keys.
    #[must_use]
    pub fn timestamp_checks(&self) -> [CountQuery; 2] {
        let d = self.dialect;
        [
            CountQuery::new(
                "future_timestamps",
                format!(
                    "SELECT COUNT(*) FROM gpu_usage_metrics WHERE {} > {}",
                    d.column_time("timestamp"),
                    d.now()
                ),
            ),
            CountQuery::new(
                "old_timestamps",
                format!(
                    "SELECT COUNT(*) FROM gpu_usage_metrics WHERE {} < {}",
                    d.column_time("timestamp"),
                    d.days_ago(self.rules.retention_days)
                ),
            ),
        ]
    }

    // ── consistency ─────────────────────────────────────────────────

    /// Full-GPU allocations pointing at a device that is not ACTIVE.
    #[must_use]
    pub fn allocation_device_inconsistency(&self) -> String {
        "SELECT COUNT(*) FROM gpu_allocations ga \
         WHERE ga.status = 'ALLOCATED' \
         AND ga.resource_type = 'FULL_GPU' \
         AND ga.allocated_resource NOT IN (\
         SELECT device_id FROM gpu_devices WHERE device_status = 'ACTIVE')"
            .to_string()
    }

    /// MIG instances flagged allocated without a live MIG allocation row.
    #[must_use]
    pub fn mig_allocation_inconsistency(&self) -> String {
        "SELECT COUNT(*) FROM mig_instances mi \
         WHERE mi.allocated = 'Y' \
         AND mi.mig_id NOT IN (\
         SELECT DISTINCT allocated_resource FROM gpu_allocations \
         WHERE status = 'ALLOCATED' AND resource_type = 'MIG_INSTANCE')"
            .to_string()
    }

    /// Devices with too many long gaps between consecutive readings,
    /// as `(device_id, gap_count)` rows, worst first.
    #[must_use]
    pub fn time_gaps(&self) -> String {
        let d = self.dialect;
        let r = &self.rules;
        format!(
            "SELECT {device}, COUNT(*) AS gap_count FROM (\
             SELECT device_id, timestamp, \
             LAG(timestamp) OVER (PARTITION BY device_id ORDER BY {ts}) AS prev_timestamp \
             FROM gpu_usage_metrics WHERE {ts} > {since}\
             ) t \
             WHERE {gap} > {gap_seconds} \
             GROUP BY device_id \
             HAVING COUNT(*) > {max_gaps} \
             ORDER BY COUNT(*) DESC",
            device = d.as_text("device_id"),
            ts = d.column_time("timestamp"),
            since = d.hours_ago(r.lookback_hours),
            gap = d.seconds_between("timestamp", "prev_timestamp"),
            gap_seconds = r.time_gap_seconds,
            max_gaps = r.max_gaps_per_device,
        )
    }

    // ── anomalies ───────────────────────────────────────────────────

    /// `(device_id, timestamp, current, previous, difference)`, largest jump first.
    #[must_use]
    pub fn utilization_spikes(&self) -> String {
        let d = self.dialect;
        let r = &self.rules;
        format!(
            "SELECT {device}, {ts}, {current}, {previous}, {diff} AS utilization_diff FROM (\
             SELECT device_id, timestamp, gpu_utilization_pct, \
             LAG(gpu_utilization_pct) OVER (PARTITION BY device_id ORDER BY {order}) AS prev_utilization \
             FROM gpu_usage_metrics \
             WHERE {order} > {since} AND gpu_utilization_pct IS NOT NULL\
             ) t \
             WHERE ABS(gpu_utilization_pct - prev_utilization) > {spike} \
             AND prev_utilization IS NOT NULL \
             ORDER BY utilization_diff DESC {limit}",
            device = d.as_text("device_id"),
            ts = d.as_timestamp("timestamp"),
            current = d.as_double("gpu_utilization_pct"),
            previous = d.as_double("prev_utilization"),
            diff = d.as_double("ABS(gpu_utilization_pct - prev_utilization)"),
            order = d.column_time("timestamp"),
            since = d.hours_ago(r.lookback_hours),
            spike = r.utilization_spike_pct,
            limit = d.limit(r.max_anomalies_per_kind),
        )
    }

    /// `(device_id, timestamp, temperature)`, hottest first.
    #[must_use]
    pub fn high_temperatures(&self) -> String {
        let d = self.dialect;
        let r = &self.rules;
        format!(
            "SELECT {device}, {ts}, {temperature} FROM gpu_usage_metrics \
             WHERE {stored} > {since} AND temperature_c > {high} \
             ORDER BY temperature_c DESC {limit}",
            device = d.as_text("device_id"),
            ts = d.as_timestamp("timestamp"),
            temperature = d.as_double("temperature_c"),
            stored = d.column_time("timestamp"),
            since = d.hours_ago(r.lookback_hours),
            high = r.temperature_high_c,
            limit = d.limit(r.max_anomalies_per_kind),
        )
    }

    /// `(device_id, timestamp, actual, rated)`, highest ratio first.
    ///
    /// Models without a positive rated power are skipped.
    #[must_use]
    pub fn power_anomalies(&self) -> String {
        let d = self.dialect;
        let r = &self.rules;
        format!(
            "SELECT {device}, {ts}, {actual}, {rated} \
             FROM gpu_usage_metrics gum \
             JOIN gpu_devices gd ON gum.device_id = gd.device_id \
             JOIN gpu_models gm ON gd.model_id = gm.model_id \
             WHERE {stored} > {since} \
             AND gm.power_consumption_w > 0 \
             AND gum.power_draw_w > gm.power_consumption_w * {ratio} \
             ORDER BY ({ratio_expr}) DESC {limit}",
            device = d.as_text("gum.device_id"),
            ts = d.as_timestamp("gum.timestamp"),
            actual = d.as_double("gum.power_draw_w"),
            rated = d.as_double("gm.power_consumption_w"),
            stored = d.column_time("gum.timestamp"),
            since = d.hours_ago(r.lookback_hours),
            ratio = r.power_ratio,
            ratio_expr = format!(
                "{} / {}",
                d.as_double("gum.power_draw_w"),
                d.as_double("gm.power_consumption_w")
            ),
            limit = d.limit(r.max_anomalies_per_kind),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog(dialect: Dialect) -> QueryCatalog {
        QueryCatalog::new(dialect, ValidationRules::default())
    }

    #[test]
    fn range_bounds_come_from_rules() {
        let rules = ValidationRules {
            temperature_max_c: 105.0,
            ..ValidationRules::default()
        };
        let queries = QueryCatalog::new(Dialect::Postgres, rules).range_checks();
        assert_eq!(queries[2].subject, "temperature");
        assert_eq!(
            queries[2].sql,
            "SELECT COUNT(*) FROM gpu_usage_metrics WHERE temperature_c < 0 OR temperature_c > 105"
        );
        assert!(queries[3].sql.ends_with("power_draw_w > 1000"));
    }

    #[test]
    fn postgres_gap_query_matches_default_thresholds() {
        let sql = catalog(Dialect::Postgres).time_gaps();
        assert!(sql.contains("timestamp > CURRENT_TIMESTAMP - INTERVAL '24 hours'"));
        assert!(sql.contains("EXTRACT(EPOCH FROM (timestamp - prev_timestamp)) > 300"));
        assert!(sql.contains("HAVING COUNT(*) > 10"));
    }

    #[test]
    fn oracle_queries_use_fetch_first() {
        let catalog = catalog(Dialect::Oracle);
        for sql in [
            catalog.utilization_spikes(),
            catalog.high_temperatures(),
            catalog.power_anomalies(),
        ] {
            assert!(sql.ends_with("FETCH FIRST 10 ROWS ONLY"), "{sql}");
            assert!(!sql.contains("LIMIT"), "{sql}");
        }
    }

    #[test]
    fn anomaly_thresholds_are_strict() {
        let catalog = catalog(Dialect::Sqlite);
        assert!(catalog
            .utilization_spikes()
            .contains("ABS(gpu_utilization_pct - prev_utilization) > 70"));
        assert!(catalog.high_temperatures().contains("temperature_c > 90"));
        assert!(catalog
            .power_anomalies()
            .contains("gum.power_draw_w > gm.power_consumption_w * 1.2"));
    }

    #[test]
    fn power_query_skips_unrated_models() {
        let sql = catalog(Dialect::Postgres).power_anomalies();
        assert!(sql.contains("gm.power_consumption_w > 0"));
    }

    #[test]
    fn retention_window_uses_days() {
        let [future, old] = catalog(Dialect::Postgres).timestamp_checks();
        assert_eq!(
            future.sql,
            "SELECT COUNT(*) FROM gpu_usage_metrics WHERE timestamp > CURRENT_TIMESTAMP"
        );
        assert_eq!(
            old.sql,
            "SELECT COUNT(*) FROM gpu_usage_metrics WHERE timestamp < CURRENT_TIMESTAMP - INTERVAL '365 days'"
        );
    }

    #[test]
    fn sqlite_compares_normalized_timestamps() {
        let catalog = catalog(Dialect::Sqlite);
        let [future, old] = catalog.timestamp_checks();
        assert_eq!(
            future.sql,
            "SELECT COUNT(*) FROM gpu_usage_metrics WHERE datetime(timestamp) > datetime('now')"
        );
        assert!(old.sql.contains("datetime(timestamp) < datetime('now', '-365 days')"));

        for sql in [catalog.time_gaps(), catalog.utilization_spikes()] {
            assert!(sql.contains("ORDER BY datetime(timestamp)"), "{sql}");
            assert!(sql.contains("WHERE datetime(timestamp) > datetime('now', '-24 hours')"), "{sql}");
        }
        assert!(catalog
            .high_temperatures()
            .contains("WHERE datetime(timestamp) > datetime('now', '-24 hours')"));
        assert!(catalog
            .power_anomalies()
            .contains("WHERE datetime(gum.timestamp) > datetime('now', '-24 hours')"));
    }

    #[test]
    fn anomaly_cap_is_configurable() {
        let rules = ValidationRules {
            max_anomalies_per_kind: 3,
            ..ValidationRules::default()
        };
        let sql = QueryCatalog::new(Dialect::Sqlite, rules).high_temperatures();
        assert!(sql.ends_with("LIMIT 3"));
    }
}
