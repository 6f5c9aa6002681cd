use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::collections::BTreeSet;
use std::env;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub management: ManagementConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManagementConfig {
    pub base_path: String,
    pub exposure: BTreeSet<Endpoint>,
    pub show_details: ShowDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

/// Management endpoints that can be exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Health,
    Info,
    Prometheus,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Health, Endpoint::Info, Endpoint::Prometheus];

    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Health => "health",
            Endpoint::Info => "info",
            Endpoint::Prometheus => "prometheus",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "health" => Ok(Endpoint::Health),
            "info" => Ok(Endpoint::Info),
            "prometheus" => Ok(Endpoint::Prometheus),
            other => Err(format!("Unknown management endpoint: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowDetails {
    #[default]
    Never,
    Always,
}

impl FromStr for ShowDetails {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "never" => Ok(ShowDetails::Never),
            "always" => Ok(ShowDetails::Always),
            other => Err(format!("Invalid health show-details value: {}", other)),
        }
    }
}

impl ManagementConfig {
    pub fn is_exposed(&self, endpoint: Endpoint) -> bool {
        self.exposure.contains(&endpoint)
    }

    /// Joins `suffix` onto the base path without doubling slashes.
    pub fn path(&self, suffix: &str) -> String {
        match (self.base_path.as_str(), suffix) {
            (base, "") => base.to_string(),
            ("/", s) => format!("/{}", s),
            (base, s) => format!("{}/{}", base, s),
        }
    }
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            base_path: "/actuator".to_string(),
            exposure: Endpoint::ALL.into_iter().collect(),
            show_details: ShowDetails::Never,
        }
    }
}

impl BoardConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env, APP__ prefix and ENVIRONMENT)
        let common = core_config::Config::load()?;

        let mongodb = MongoConfig {
            uri: common.require_env("MONGODB_URI", Some("mongodb://localhost:27017"))?,
            database: env::var("MONGODB_DATABASE").unwrap_or_else(|_| "test".to_string()),
        };

        let management = ManagementConfig {
            base_path: parse_base_path(
                &env::var("MANAGEMENT_BASE_PATH").unwrap_or_else(|_| "/actuator".to_string()),
            )?,
            exposure: parse_exposure(
                &env::var("MANAGEMENT_EXPOSURE")
                    .unwrap_or_else(|_| "health,info,prometheus".to_string()),
            )?,
            show_details: env::var("MANAGEMENT_HEALTH_SHOW_DETAILS")
                .unwrap_or_else(|_| "never".to_string())
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
        };

        let observability = ObservabilityConfig {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
        };

        Ok(BoardConfig {
            common,
            mongodb,
            management,
            observability,
        })
    }
}

/// Parses a comma-separated exposure list; `*` selects every endpoint.
pub fn parse_exposure(raw: &str) -> Result<BTreeSet<Endpoint>, AppError> {
    let mut exposure = BTreeSet::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if name == "*" {
            exposure.extend(Endpoint::ALL);
            continue;
        }
        let endpoint = name
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        exposure.insert(endpoint);
    }
    Ok(exposure)
}

pub fn parse_base_path(raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    if !raw.starts_with('/') {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "Management base path must start with '/': {}",
            raw
        )));
    }
    // ':' and '*' would be captured as route parameters
    if raw.contains([':', '*']) {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "Management base path must be a literal path: {}",
            raw
        )));
    }

    let trimmed = raw.trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok("/".to_string());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exposure_list() {
        let exposure = parse_exposure("health, info").unwrap();
        assert!(exposure.contains(&Endpoint::Health));
        assert!(exposure.contains(&Endpoint::Info));
        assert!(!exposure.contains(&Endpoint::Prometheus));
    }

    #[test]
    fn test_parse_exposure_wildcard() {
        let exposure = parse_exposure("*").unwrap();
        assert_eq!(exposure.len(), Endpoint::ALL.len());
    }

    #[test]
    fn test_parse_exposure_rejects_unknown() {
        assert!(parse_exposure("health,shutdown").is_err());
    }

    #[test]
    fn test_parse_exposure_empty_exposes_nothing() {
        assert!(parse_exposure("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_base_path() {
        assert_eq!(parse_base_path("/manage/").unwrap(), "/manage");
        assert_eq!(parse_base_path("/").unwrap(), "/");
        assert!(parse_base_path("actuator").is_err());
    }

    #[test]
    fn test_parse_base_path_only_slashes_is_root() {
        assert_eq!(parse_base_path("//").unwrap(), "/");
        assert_eq!(parse_base_path(" /// ").unwrap(), "/");
    }

    #[test]
    fn test_parse_base_path_rejects_route_parameters() {
        assert!(parse_base_path("/:tenant/actuator").is_err());
        assert!(parse_base_path("/manage/*rest").is_err());
        assert!(parse_base_path("/a:b").is_err());
    }

    #[test]
    fn test_management_path_join() {
        let mut management = ManagementConfig::default();
        assert_eq!(management.path("health"), "/actuator/health");
        assert_eq!(management.path(""), "/actuator");

        management.base_path = "/".to_string();
        assert_eq!(management.path("health"), "/health");
        assert_eq!(management.path(""), "/");
    }

    #[test]
    fn test_show_details_parse() {
        assert_eq!("ALWAYS".parse::<ShowDetails>().unwrap(), ShowDetails::Always);
        assert!("sometimes".parse::<ShowDetails>().is_err());
    }
}
