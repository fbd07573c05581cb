//! Integration tests for JSON configuration loading and default fallback.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use figment::Jail;
use gpuval_config::{ConfigSource, DatabaseKind, GpuValConfig};
use pretty_assertions::assert_eq;

#[test]
fn loads_full_config_from_json() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "validation.json",
            r#"{
                "api_base_url": "http://monitor.internal:9090/k8s-monitor/api/v1",
                "database": {
                    "type": "oracle",
                    "host": "oracle.internal",
                    "port": 1521,
                    "service_name": "GPUDB",
                    "username": "gpu_ro",
                    "password": "ro-secret"
                },
                "validation_rules": {
                    "temperature_high_c": 85,
                    "power_ratio": 1.5
                }
            }"#,
        )?;

        let loaded = GpuValConfig::load("validation.json");
        assert_eq!(
            loaded.source,
            ConfigSource::File("validation.json".into())
        );

        let config = loaded.config;
        assert_eq!(
            config.api_base_url,
            "http://monitor.internal:9090/k8s-monitor/api/v1"
        );
        assert_eq!(config.database.kind, DatabaseKind::Oracle);
        assert_eq!(config.database.host, "oracle.internal");
        assert_eq!(config.database.port, 1521);
        assert_eq!(config.database.service_name, "GPUDB");
        assert_eq!(config.database.username, "gpu_ro");
        assert_eq!(config.database.password, "ro-secret");
        assert_eq!(config.validation_rules.temperature_high_c, 85.0);
        assert_eq!(config.validation_rules.power_ratio, 1.5);
        // untouched rules keep their defaults
        assert_eq!(config.validation_rules.temperature_critical_c, 95.0);
        assert_eq!(config.http_timeout_secs, 10);
        Ok(())
    });
}

#[test]
fn partial_database_section_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "validation.json",
            r#"{ "database": { "host": "db.internal" } }"#,
        )?;

        let config = GpuValConfig::load("validation.json").config;
        assert_eq!(config.database.kind, DatabaseKind::Postgresql);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.database, "gpu_management");
        Ok(())
    });
}

#[test]
fn malformed_json_falls_back_to_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("validation.json", "{ \"api_base_url\": ")?;

        let loaded = GpuValConfig::load("validation.json");
        match &loaded.source {
            ConfigSource::Defaults { reason } => {
                assert!(reason.contains("validation.json"), "reason: {reason}");
            }
            ConfigSource::File(_) => panic!("malformed file must not be used"),
        }
        assert_eq!(
            loaded.config.api_base_url,
            "http://localhost:8080/k8s-monitor/api/v1"
        );
        Ok(())
    });
}

#[test]
fn unknown_database_type_falls_back_to_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "validation.json",
            r#"{ "database": { "type": "mysql" } }"#,
        )?;

        let loaded = GpuValConfig::load("validation.json");
        assert!(matches!(loaded.source, ConfigSource::Defaults { .. }));
        assert_eq!(loaded.config.database.kind, DatabaseKind::Postgresql);
        Ok(())
    });
}

#[test]
fn invalid_rules_fall_back_to_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "validation.json",
            r#"{ "validation_rules": { "utilization_min_pct": 50, "utilization_max_pct": 10 } }"#,
        )?;

        let loaded = GpuValConfig::load("validation.json");
        assert!(matches!(loaded.source, ConfigSource::Defaults { .. }));
        assert_eq!(loaded.config.validation_rules.utilization_max_pct, 100.0);
        Ok(())
    });
}

#[test]
fn unused_keys_are_ignored() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "validation.json",
            r#"{ "api_base_url": "http://a/b", "notes": "owned by infra", "validation_rules": { "legacy": true } }"#,
        )?;

        let loaded = GpuValConfig::load("validation.json");
        assert!(matches!(loaded.source, ConfigSource::File(_)));
        assert_eq!(loaded.config.api_base_url, "http://a/b");
        Ok(())
    });
}

#[test]
fn load_file_reports_strict_errors() {
    Jail::expect_with(|jail| {
        jail.create_file("validation.json", r#"{ "http_timeout_secs": "soon" }"#)?;

        let result = GpuValConfig::load_file("validation.json");
        assert!(result.is_err());
        Ok(())
    });
}
