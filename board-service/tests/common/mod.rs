use async_trait::async_trait;
use board_service::config::{BoardConfig, ManagementConfig, MongoConfig, ObservabilityConfig};
use board_service::health::{Availability, Health, HealthIndicator};
use board_service::models::{ScrabbleBoard, WordPlayBoard};
use board_service::services::{init_metrics, InMemoryBoardRepository};
use board_service::startup::{Application, ApplicationParts};
use service_core::config::{Config as CoreConfig, Environment};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

/// Database probe whose outcome the test controls.
#[derive(Clone)]
pub struct SwitchableIndicator {
    up: Arc<AtomicBool>,
}

impl SwitchableIndicator {
    pub fn new(up: bool) -> Self {
        Self {
            up: Arc::new(AtomicBool::new(up)),
        }
    }

    pub fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }
}

#[async_trait]
impl HealthIndicator for SwitchableIndicator {
    fn name(&self) -> &str {
        "mongo"
    }

    async fn check(&self) -> Health {
        if self.up.load(Ordering::SeqCst) {
            Health::up().with_detail("maxWireVersion", 21)
        } else {
            Health::down().with_detail("error", "connection refused")
        }
    }
}

pub fn test_config(management: ManagementConfig) -> BoardConfig {
    BoardConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            environment: Environment::Dev,
        },
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "test".to_string(),
        },
        management,
        observability: ObservabilityConfig {
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub availability: Availability,
    pub database: SwitchableIndicator,
    shutdown: Option<oneshot::Sender<()>>,
    server: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(ManagementConfig::default()).await
    }

    pub async fn spawn_with(management: ManagementConfig) -> Self {
        init_metrics();

        let database = SwitchableIndicator::new(true);
        let parts = ApplicationParts {
            scrabble_boards: Arc::new(InMemoryBoardRepository::<ScrabbleBoard>::new()),
            word_play_boards: Arc::new(InMemoryBoardRepository::<WordPlayBoard>::new()),
            database_health: Arc::new(database.clone()),
        };

        let app = Application::build_with(test_config(management), parts)
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());
        let availability = app.availability().clone();

        let (tx, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(app.run_until(async move {
            let _ = rx.await;
        }));

        TestApp {
            address,
            availability,
            database,
            shutdown: Some(tx),
            server,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Triggers graceful shutdown and waits for the server to drain.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        (&mut self.server)
            .await
            .expect("Server task panicked")
            .expect("Server returned an error");
    }
}
