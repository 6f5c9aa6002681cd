//! Application startup and lifecycle management.
//!
//! Wires the board repositories and health indicators together and serves the
//! management HTTP surface.

use crate::config::{BoardConfig, Endpoint};
use crate::handlers;
use crate::health::{
    Availability, HealthIndicator, HealthRegistry, MongoHealthIndicator, ReadinessState,
};
use crate::models::{ScrabbleBoard, WordPlayBoard};
use crate::services::{BoardStore, MongoBoardRepository, MongoDb};
use axum::{middleware, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: BoardConfig,
    pub health: Arc<HealthRegistry>,
    pub availability: Availability,
    pub scrabble_boards: Arc<dyn BoardStore<ScrabbleBoard>>,
    pub word_play_boards: Arc<dyn BoardStore<WordPlayBoard>>,
}

/// Storage and database probe the application runs against.
pub struct ApplicationParts {
    pub scrabble_boards: Arc<dyn BoardStore<ScrabbleBoard>>,
    pub word_play_boards: Arc<dyn BoardStore<WordPlayBoard>>,
    pub database_health: Arc<dyn HealthIndicator>,
}

impl ApplicationParts {
    pub fn mongo(db: MongoDb) -> Self {
        Self {
            scrabble_boards: Arc::new(MongoBoardRepository::new(db.scrabble_boards())),
            word_play_boards: Arc::new(MongoBoardRepository::new(db.word_play_boards())),
            database_health: Arc::new(MongoHealthIndicator::new(db)),
        }
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    state: AppState,
}

impl Application {
    /// Build the application against the configured MongoDB.
    pub async fn build(config: BoardConfig) -> Result<Self, AppError> {
        let db = MongoDb::connect(&config.mongodb.uri, &config.mongodb.database)
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to MongoDB: {}", e);
                e
            })?;

        db.initialize_collections().await.map_err(|e| {
            tracing::error!("Failed to initialize database collections: {}", e);
            e
        })?;

        Self::build_with(config, ApplicationParts::mongo(db)).await
    }

    /// Build the application from already constructed parts.
    pub async fn build_with(
        config: BoardConfig,
        parts: ApplicationParts,
    ) -> Result<Self, AppError> {
        let availability = Availability::new();
        let health = HealthRegistry::standard(availability.clone(), parts.database_health);

        let state = AppState {
            config: config.clone(),
            health: Arc::new(health),
            availability,
            scrabble_boards: parts.scrabble_boards,
            word_play_boards: parts.word_play_boards,
        };

        // Bind HTTP listener (port 0 = random port for testing)
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = router(state.clone());
        state.availability.set_readiness(ReadinessState::AcceptingTraffic);

        tracing::info!(
            port,
            base_path = %config.management.base_path,
            "Board service listening"
        );

        Ok(Self {
            port,
            listener,
            router,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn availability(&self) -> &Availability {
        &self.state.availability
    }

    pub fn scrabble_boards(&self) -> Arc<dyn BoardStore<ScrabbleBoard>> {
        self.state.scrabble_boards.clone()
    }

    pub fn word_play_boards(&self) -> Arc<dyn BoardStore<WordPlayBoard>> {
        self.state.word_play_boards.clone()
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves, then refuse traffic and drain.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let availability = self.state.availability.clone();
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                tracing::info!("Shutdown signal received");
                availability.set_readiness(ReadinessState::RefusingTraffic);
            })
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

/// Management router; endpoints that are not exposed fall through to 404.
pub fn router(state: AppState) -> Router {
    let management = &state.config.management;
    let mut app = Router::new();

    // A root base path would shadow every other route with the discovery page
    if management.base_path != "/" {
        app = app.route(&management.path(""), get(handlers::links));
    }
    if management.is_exposed(Endpoint::Health) {
        app = app
            .route(&management.path("health"), get(handlers::health))
            .route(&management.path("health/:group"), get(handlers::health_group));
    }
    if management.is_exposed(Endpoint::Info) {
        app = app.route(&management.path("info"), get(handlers::info));
    }
    if management.is_exposed(Endpoint::Prometheus) {
        app = app.route(&management.path("prometheus"), get(handlers::prometheus));
    }

    app.fallback(handlers::not_found)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
