use crate::config::ShowDetails;
use crate::health::CompositeHealth;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

pub async fn health(State(state): State<AppState>) -> Response {
    let health = state.health.check_all().await;
    respond(health, state.config.management.show_details)
}

pub async fn health_group(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Response, AppError> {
    let health = state
        .health
        .check_group(&group)
        .await
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Unknown health group: {}", group)))?;

    Ok(respond(health, state.config.management.show_details))
}

fn respond(health: CompositeHealth, show_details: ShowDetails) -> Response {
    if health.status.http_status().is_server_error() {
        tracing::warn!(status = ?health.status, "Health check reported unavailable");
    }

    let health = match show_details {
        ShowDetails::Always => health,
        ShowDetails::Never => health.without_details(),
    };

    (health.status.http_status(), Json(health)).into_response()
}
