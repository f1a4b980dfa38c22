use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::RecommendationService,
};

pub mod games;
pub mod recommendations;

/// Shared application state
///
/// The catalog never changes after startup, so handlers read it without
/// locking.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(service: RecommendationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            // Outermost first: the request ID must exist before the trace span
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/games", get(games::search))
        .route("/games/:name", get(games::details))
        .route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "games": state.service.catalog().len(),
        })),
    )
}
