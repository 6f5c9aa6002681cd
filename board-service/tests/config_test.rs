//! `BoardConfig::load` reads process-wide environment variables, so every test
//! here holds `ENV_LOCK` while it touches them.

use board_service::config::{BoardConfig, Endpoint, ShowDetails};
use service_core::error::AppError;
use std::env;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

const KEYS: [&str; 8] = [
    "ENVIRONMENT",
    "MONGODB_URI",
    "MONGODB_DATABASE",
    "MANAGEMENT_BASE_PATH",
    "MANAGEMENT_EXPOSURE",
    "MANAGEMENT_HEALTH_SHOW_DETAILS",
    "LOG_LEVEL",
    "OTLP_ENDPOINT",
];

/// Clears every key on creation and again on drop.
struct EnvGuard {
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    fn new() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear();
        Self { _lock: lock }
    }

    fn set(&self, key: &str, value: &str) {
        env::set_var(key, value);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        clear();
    }
}

fn clear() {
    for key in KEYS {
        env::remove_var(key);
    }
}

#[test]
fn defaults_apply_outside_production() {
    let _env = EnvGuard::new();

    let config = BoardConfig::load().expect("Failed to load configuration");

    assert_eq!(config.mongodb.uri, "mongodb://localhost:27017");
    assert_eq!(config.mongodb.database, "test");
    assert_eq!(config.management.base_path, "/actuator");
    assert_eq!(config.management.show_details, ShowDetails::Never);
    for endpoint in Endpoint::ALL {
        assert!(config.management.is_exposed(endpoint), "{} not exposed", endpoint);
    }
    assert_eq!(config.observability.log_level, "info");
    assert!(config.observability.otlp_endpoint.is_none());
}

#[test]
fn production_requires_mongodb_uri() {
    let env = EnvGuard::new();
    env.set("ENVIRONMENT", "prod");

    let err = BoardConfig::load().unwrap_err();
    assert!(matches!(err, AppError::ConfigError(_)));
    assert!(err.to_string().contains("MONGODB_URI"));
}

#[test]
fn production_defaults_database_name() {
    let env = EnvGuard::new();
    env.set("ENVIRONMENT", "prod");
    env.set("MONGODB_URI", "mongodb://mongo:27017");

    let config = BoardConfig::load().expect("Failed to load configuration");

    assert!(config.common.is_production());
    assert_eq!(config.mongodb.uri, "mongodb://mongo:27017");
    assert_eq!(config.mongodb.database, "test");
}

#[test]
fn exposure_and_details_are_read_from_env() {
    let env = EnvGuard::new();
    env.set("MANAGEMENT_EXPOSURE", "health");
    env.set("MANAGEMENT_HEALTH_SHOW_DETAILS", "always");
    env.set("MANAGEMENT_BASE_PATH", "/manage/");
    env.set("OTLP_ENDPOINT", "");

    let config = BoardConfig::load().expect("Failed to load configuration");

    assert!(config.management.is_exposed(Endpoint::Health));
    assert!(!config.management.is_exposed(Endpoint::Info));
    assert!(!config.management.is_exposed(Endpoint::Prometheus));
    assert_eq!(config.management.show_details, ShowDetails::Always);
    assert_eq!(config.management.base_path, "/manage");
    assert!(config.observability.otlp_endpoint.is_none());
}

#[test]
fn unknown_exposed_endpoint_is_rejected() {
    let env = EnvGuard::new();
    env.set("MANAGEMENT_EXPOSURE", "health,shutdown");

    let err = BoardConfig::load().unwrap_err();
    assert!(matches!(err, AppError::ConfigError(_)));
    assert!(err.to_string().contains("shutdown"));
}

#[test]
fn parameterised_base_path_is_rejected() {
    let env = EnvGuard::new();
    env.set("MANAGEMENT_BASE_PATH", "/:tenant");

    assert!(matches!(
        BoardConfig::load().unwrap_err(),
        AppError::ConfigError(_)
    ));
}
