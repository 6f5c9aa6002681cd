use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Up,
    Down,
    OutOfService,
    Unknown,
}

impl Status {
    /// Lower is more severe.
    fn severity(self) -> u8 {
        match self {
            Status::Down => 0,
            Status::OutOfService => 1,
            Status::Up => 2,
            Status::Unknown => 3,
        }
    }

    /// Picks the most severe status; no members means `Unknown`.
    pub fn aggregate<I: IntoIterator<Item = Status>>(statuses: I) -> Status {
        statuses
            .into_iter()
            .min_by_key(|s| s.severity())
            .unwrap_or(Status::Unknown)
    }

    pub fn http_status(self) -> StatusCode {
        match self {
            Status::Down | Status::OutOfService => StatusCode::SERVICE_UNAVAILABLE,
            Status::Up | Status::Unknown => StatusCode::OK,
        }
    }
}

/// Result of a single health indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Health {
    pub status: Status,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

impl Health {
    pub fn status(status: Status) -> Self {
        Self {
            status,
            details: Map::new(),
        }
    }

    pub fn up() -> Self {
        Self::status(Status::Up)
    }

    pub fn down() -> Self {
        Self::status(Status::Down)
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Aggregate over named indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeHealth {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<BTreeMap<String, Health>>,
}

impl CompositeHealth {
    pub fn from_components(components: BTreeMap<String, Health>) -> Self {
        Self {
            status: Status::aggregate(components.values().map(|h| h.status)),
            components: Some(components),
        }
    }

    /// Drops per-component details, keeping only the aggregate status.
    pub fn without_details(self) -> Self {
        Self {
            status: self.status,
            components: None,
        }
    }
}
