use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LivenessState {
    Correct,
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadinessState {
    AcceptingTraffic,
    RefusingTraffic,
}

/// Process availability as seen by orchestrator probes.
///
/// Cloning shares the underlying state. Readiness starts out refusing traffic
/// until startup completes.
#[derive(Debug, Clone)]
pub struct Availability {
    live: Arc<AtomicBool>,
    ready: Arc<AtomicBool>,
}

impl Availability {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn liveness(&self) -> LivenessState {
        if self.live.load(Ordering::Acquire) {
            LivenessState::Correct
        } else {
            LivenessState::Broken
        }
    }

    pub fn readiness(&self) -> ReadinessState {
        if self.ready.load(Ordering::Acquire) {
            ReadinessState::AcceptingTraffic
        } else {
            ReadinessState::RefusingTraffic
        }
    }

    pub fn set_liveness(&self, state: LivenessState) {
        let previous = self
            .live
            .swap(state == LivenessState::Correct, Ordering::AcqRel);
        if previous != (state == LivenessState::Correct) {
            tracing::info!(state = ?state, "Liveness state changed");
        }
    }

    pub fn set_readiness(&self, state: ReadinessState) {
        let previous = self
            .ready
            .swap(state == ReadinessState::AcceptingTraffic, Ordering::AcqRel);
        if previous != (state == ReadinessState::AcceptingTraffic) {
            tracing::info!(state = ?state, "Readiness state changed");
        }
    }
}

impl Default for Availability {
    fn default() -> Self {
        Self::new()
    }
}
