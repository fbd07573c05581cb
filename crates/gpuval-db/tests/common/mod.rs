//! Shared fixtures for the libSQL-backed check tests.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use gpuval_db::LibSqlStore;

pub const SCHEMA: &str = include_str!("../fixtures/telemetry_schema.sql");

/// An in-memory store with the telemetry schema applied.
pub async fn fixture_store() -> LibSqlStore {
    let store = LibSqlStore::open(":memory:").await.unwrap();
    store.conn().execute_batch(SCHEMA).await.unwrap();
    store
}

pub async fn exec(store: &LibSqlStore, sql: &str) {
    store
        .conn()
        .execute(sql, ())
        .await
        .unwrap_or_else(|e| panic!("fixture statement failed: {e}\n{sql}"));
}

/// UTC timestamp in SQLite's `datetime('now')` format, offset from now.
pub fn seconds_ago(seconds: i64) -> String {
    (Utc::now() - Duration::seconds(seconds))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Same instant as [`seconds_ago`], written with a `T` separator.
pub fn iso_seconds_ago(seconds: i64) -> String {
    (Utc::now() - Duration::seconds(seconds))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

/// RFC 3339 with fractional seconds and a `+00:00` offset.
pub fn rfc3339_seconds_ago(seconds: i64) -> String {
    (Utc::now() - Duration::seconds(seconds)).to_rfc3339()
}

pub fn days_ago(days: i64) -> String {
    seconds_ago(days * 86_400)
}

pub async fn add_model(store: &LibSqlStore, model_id: &str, memory_gb: f64, power_w: f64) {
    exec(
        store,
        &format!(
            "INSERT INTO gpu_models (model_id, model_name, memory_gb, power_consumption_w) \
             VALUES ('{model_id}', '{model_id}', {memory_gb}, {power_w})"
        ),
    )
    .await;
}

pub async fn add_device(store: &LibSqlStore, device_id: &str, model_id: &str, status: &str) {
    exec(
        store,
        &format!(
            "INSERT INTO gpu_devices (device_id, gpu_uuid, model_id, device_status) \
             VALUES ('{device_id}', 'GPU-{device_id}', '{model_id}', '{status}')"
        ),
    )
    .await;
}

/// One usage reading; unspecified fields hold unremarkable values.
#[derive(Debug, Clone)]
pub struct Metric {
    pub device_id: &'static str,
    pub timestamp: String,
    pub utilization: f64,
    pub memory_used_mb: f64,
    pub memory_total_mb: f64,
    pub memory_utilization: f64,
    pub temperature: f64,
    pub power: f64,
}

impl Metric {
    pub fn at(device_id: &'static str, timestamp: String) -> Self {
        Self {
            device_id,
            timestamp,
            utilization: 50.0,
            memory_used_mb: 20_000.0,
            memory_total_mb: 40_000.0,
            memory_utilization: 50.0,
            temperature: 60.0,
            power: 50.0,
        }
    }

    pub fn recent(device_id: &'static str) -> Self {
        Self::at(device_id, seconds_ago(60))
    }
}

pub async fn add_metric(store: &LibSqlStore, m: &Metric) {
    exec(
        store,
        &format!(
            "INSERT INTO gpu_usage_metrics (device_id, timestamp, gpu_utilization_pct, \
             memory_used_mb, memory_total_mb, memory_utilization_pct, temperature_c, power_draw_w) \
             VALUES ('{}', '{}', {}, {}, {}, {}, {}, {})",
            m.device_id,
            m.timestamp,
            m.utilization,
            m.memory_used_mb,
            m.memory_total_mb,
            m.memory_utilization,
            m.temperature,
            m.power
        ),
    )
    .await;
}

pub async fn add_allocation(
    store: &LibSqlStore,
    allocation_id: &str,
    resource_type: &str,
    resource: &str,
    memory_gb: f64,
    status: &str,
) {
    exec(
        store,
        &format!(
            "INSERT INTO gpu_allocations (allocation_id, resource_type, allocated_resource, \
             allocated_memory_gb, status) \
             VALUES ('{allocation_id}', '{resource_type}', '{resource}', {memory_gb}, '{status}')"
        ),
    )
    .await;
}

/// A healthy A100 device `gpu-0` with a 400 W, 80 GB model.
pub async fn healthy_fleet(store: &LibSqlStore) {
    add_model(store, "a100", 80.0, 400.0).await;
    add_device(store, "gpu-0", "a100", "ACTIVE").await;
}
