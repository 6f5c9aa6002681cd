use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Settings shared by every service binary.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Layers `.env`, an optional `configuration.*` file and `APP__*` variables.
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            // ENVIRONMENT is read unprefixed so deploy tooling can share it across services
            .set_override_option("environment", std::env::var("ENVIRONMENT").ok())?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Prod
    }

    /// Reads `key`, falling back to `default` outside production.
    ///
    /// In production every key must be set explicitly.
    pub fn require_env(&self, key: &str, default: Option<&str>) -> Result<String, AppError> {
        match std::env::var(key) {
            Ok(val) => Ok(val),
            Err(_) if self.is_production() => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is required in production but not set",
                key
            ))),
            Err(_) => default.map(str::to_string).ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("{} is required but not set", key))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_env_uses_default_in_dev() {
        let config = Config {
            port: 8080,
            environment: Environment::Dev,
        };
        let value = config
            .require_env("SERVICE_CORE_TEST_UNSET_KEY", Some("fallback"))
            .unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_require_env_rejects_missing_in_prod() {
        let config = Config {
            port: 8080,
            environment: Environment::Prod,
        };
        let err = config
            .require_env("SERVICE_CORE_TEST_UNSET_KEY", Some("fallback"))
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_require_env_without_default_fails() {
        let config = Config {
            port: 8080,
            environment: Environment::Dev,
        };
        assert!(config
            .require_env("SERVICE_CORE_TEST_UNSET_KEY", None)
            .is_err());
    }
}
