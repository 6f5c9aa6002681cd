use super::availability::{Availability, LivenessState, ReadinessState};
use super::status::{Health, Status};
use crate::services::MongoDb;
use async_trait::async_trait;
use std::time::Duration;

/// A named probe contributing to the aggregate health.
///
/// Failures are reported as `Down` with an `error` detail rather than as errors.
#[async_trait]
pub trait HealthIndicator: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> Health;
}

pub struct PingHealthIndicator;

#[async_trait]
impl HealthIndicator for PingHealthIndicator {
    fn name(&self) -> &str {
        "ping"
    }

    async fn check(&self) -> Health {
        Health::up()
    }
}

/// Reports `Up` with the server's `maxWireVersion` when `hello` succeeds.
pub struct MongoHealthIndicator {
    db: MongoDb,
    timeout: Duration,
}

impl MongoHealthIndicator {
    pub fn new(db: MongoDb) -> Self {
        Self {
            db,
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl HealthIndicator for MongoHealthIndicator {
    fn name(&self) -> &str {
        "mongo"
    }

    async fn check(&self) -> Health {
        match tokio::time::timeout(self.timeout, self.db.hello()).await {
            Ok(Ok(reply)) => {
                let health = Health::up();
                match reply.get_i32("maxWireVersion") {
                    Ok(version) => health.with_detail("maxWireVersion", version),
                    Err(_) => health,
                }
            }
            Ok(Err(e)) => {
                tracing::warn!("MongoDB health check failed: {}", e);
                Health::down().with_detail("error", e.to_string())
            }
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "MongoDB health check timed out"
                );
                Health::down().with_detail(
                    "error",
                    format!("hello timed out after {}ms", self.timeout.as_millis()),
                )
            }
        }
    }
}

pub struct LivenessStateHealthIndicator {
    availability: Availability,
}

impl LivenessStateHealthIndicator {
    pub fn new(availability: Availability) -> Self {
        Self { availability }
    }
}

#[async_trait]
impl HealthIndicator for LivenessStateHealthIndicator {
    fn name(&self) -> &str {
        "livenessState"
    }

    async fn check(&self) -> Health {
        match self.availability.liveness() {
            LivenessState::Correct => Health::up(),
            LivenessState::Broken => Health::down(),
        }
    }
}

pub struct ReadinessStateHealthIndicator {
    availability: Availability,
}

impl ReadinessStateHealthIndicator {
    pub fn new(availability: Availability) -> Self {
        Self { availability }
    }
}

#[async_trait]
impl HealthIndicator for ReadinessStateHealthIndicator {
    fn name(&self) -> &str {
        "readinessState"
    }

    async fn check(&self) -> Health {
        match self.availability.readiness() {
            ReadinessState::AcceptingTraffic => Health::up(),
            ReadinessState::RefusingTraffic => Health::status(Status::OutOfService),
        }
    }
}
