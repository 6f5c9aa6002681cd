use super::availability::Availability;
use super::indicator::{
    HealthIndicator, LivenessStateHealthIndicator, PingHealthIndicator,
    ReadinessStateHealthIndicator,
};
use super::status::{CompositeHealth, Health};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const LIVENESS_GROUP: &str = "liveness";
pub const READINESS_GROUP: &str = "readiness";

/// A named subset of indicators served under `health/{group}`.
#[derive(Clone)]
pub struct HealthGroup {
    members: Vec<Arc<dyn HealthIndicator>>,
}

impl HealthGroup {
    pub fn new(members: Vec<Arc<dyn HealthIndicator>>) -> Self {
        Self { members }
    }

    pub async fn check(&self) -> CompositeHealth {
        run(&self.members).await
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|i| i.name()).collect()
    }
}

#[derive(Clone, Default)]
pub struct HealthRegistry {
    indicators: Vec<Arc<dyn HealthIndicator>>,
    groups: BTreeMap<String, HealthGroup>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with `ping` plus `database`, and the liveness and readiness groups.
    pub fn standard(availability: Availability, database: Arc<dyn HealthIndicator>) -> Self {
        let ping: Arc<dyn HealthIndicator> = Arc::new(PingHealthIndicator);
        let liveness_state: Arc<dyn HealthIndicator> =
            Arc::new(LivenessStateHealthIndicator::new(availability.clone()));
        let readiness_state: Arc<dyn HealthIndicator> =
            Arc::new(ReadinessStateHealthIndicator::new(availability));

        Self::new()
            .with_indicator(ping.clone())
            .with_indicator(database.clone())
            .with_group(LIVENESS_GROUP, vec![liveness_state, ping])
            .with_group(READINESS_GROUP, vec![readiness_state, database])
    }

    pub fn with_indicator(mut self, indicator: Arc<dyn HealthIndicator>) -> Self {
        self.indicators.push(indicator);
        self
    }

    pub fn with_group(
        mut self,
        name: impl Into<String>,
        members: Vec<Arc<dyn HealthIndicator>>,
    ) -> Self {
        self.groups.insert(name.into(), HealthGroup::new(members));
        self
    }

    /// Runs every registered indicator concurrently.
    pub async fn check_all(&self) -> CompositeHealth {
        run(&self.indicators).await
    }

    /// Runs the indicators of `group`; `None` if no such group exists.
    pub async fn check_group(&self, group: &str) -> Option<CompositeHealth> {
        match self.groups.get(group) {
            Some(g) => Some(g.check().await),
            None => None,
        }
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

async fn run(indicators: &[Arc<dyn HealthIndicator>]) -> CompositeHealth {
    let results = join_all(indicators.iter().map(|indicator| async move {
        let health = indicator.check().await;
        (indicator.name().to_string(), health)
    }))
    .await;

    let components: BTreeMap<String, Health> = results.into_iter().collect();
    let composite = CompositeHealth::from_components(components);
    tracing::debug!(status = ?composite.status, "Health checked");
    composite
}
