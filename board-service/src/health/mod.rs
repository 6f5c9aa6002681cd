//! Health reporting for the management endpoints.

pub mod availability;
pub mod indicator;
pub mod registry;
pub mod status;

pub use availability::{Availability, LivenessState, ReadinessState};
pub use indicator::{
    HealthIndicator, LivenessStateHealthIndicator, MongoHealthIndicator, PingHealthIndicator,
    ReadinessStateHealthIndicator,
};
pub use registry::{HealthGroup, HealthRegistry, LIVENESS_GROUP, READINESS_GROUP};
pub use status::{CompositeHealth, Health, Status};
