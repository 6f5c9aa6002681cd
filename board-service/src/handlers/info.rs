use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Coordinates group the service is published under.
pub const GROUP: &str = "org.example";

pub async fn info() -> impl IntoResponse {
    Json(json!({
        "app": {
            "name": env!("CARGO_PKG_NAME"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "version": env!("CARGO_PKG_VERSION"),
        },
        "build": {
            "group": GROUP,
            "artifact": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}
