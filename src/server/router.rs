//! Top-level router

use super::auth;
use super::resources::ResourceDescriptor;
use super::state::AppState;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router
///
/// - GET /health
/// - /api/v1/auth/...
/// - /api/v1/{table}[/{id}] for every entity type
pub fn build_router(state: AppState) -> Router {
    build_router_with(state, ResourceDescriptor::standard())
}

/// Build the router for a custom set of resources
pub fn build_router_with(state: AppState, descriptors: Vec<ResourceDescriptor>) -> Router {
    let api = descriptors
        .into_iter()
        .fold(auth::build_routes(state.clone()), |api, descriptor| {
            api.merge(descriptor.build_routes(state.clone()))
        });

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
