use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::RecommendationRecord,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub name: String,
    pub n_recommendations: Option<usize>,
    pub min_tags: Option<usize>,
    pub min_genres: Option<usize>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<RecommendationRecord>>> {
    tracing::info!(
        request_id = %request_id,
        game = %request.name,
        "Processing recommendation request"
    );

    let params = state.service.params(
        request.n_recommendations,
        request.min_tags,
        request.min_genres,
    )?;
    // The tier search is CPU-bound; keep it off the async worker threads
    let service = state.service.clone();
    let records = tokio::task::spawn_blocking(move || service.recommend(&request.name, params))
        .await
        .map_err(|e| AppError::Internal(format!("Recommendation task failed: {}", e)))??;

    tracing::info!(
        request_id = %request_id,
        count = records.len(),
        "Recommendations completed"
    );

    Ok(Json(records))
}
