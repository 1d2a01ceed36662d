// ABOUTME: Library root for comparedb: application state, router and module wiring
// ABOUTME: The binary and the integration tests both build the app through build_router

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    response::{Html, Json},
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod client;
pub mod compare;
pub mod config;
pub mod error;
pub mod middleware;
pub mod prompt;
pub mod provider;
pub mod types;
pub mod workbench;


pub use provider::Provider;

#[derive(Clone)]
pub struct AppState {
    pub provider: Provider,
    pub default_model: Option<String>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route(
            "/api/compare",
            post(compare::compare).layer(DefaultBodyLimit::disable()),
        )
        .layer(axum_middleware::from_fn(middleware::security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
