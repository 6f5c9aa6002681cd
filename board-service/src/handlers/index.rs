use crate::config::Endpoint;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct Link {
    pub href: String,
    pub templated: bool,
}

#[derive(Debug, Serialize)]
pub struct Links {
    #[serde(rename = "_links")]
    pub links: BTreeMap<String, Link>,
}

/// Discovery page listing every exposed management endpoint.
pub async fn links(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let management = &state.config.management;
    let origin = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|host| format!("http://{}", host))
        .unwrap_or_default();

    let href = |suffix: &str| format!("{}{}", origin, management.path(suffix));

    let mut links = BTreeMap::new();
    links.insert(
        "self".to_string(),
        Link {
            href: href(""),
            templated: false,
        },
    );

    for endpoint in &management.exposure {
        links.insert(
            endpoint.to_string(),
            Link {
                href: href(endpoint.as_str()),
                templated: false,
            },
        );
        if *endpoint == Endpoint::Health {
            links.insert(
                "health-path".to_string(),
                Link {
                    href: href("health/{*path}"),
                    templated: true,
                },
            );
        }
    }

    Json(Links { links })
}
