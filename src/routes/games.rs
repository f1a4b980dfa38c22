use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{error::AppResult, models::GameDetails, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
}

/// Handler for game name search
///
/// With `q`, returns up to three names containing it (case-insensitive).
/// Without it, returns every name sorted.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Json<Vec<String>> {
    let catalog = state.service.catalog();
    let names = match params.q {
        Some(q) => state.service.suggest(&q),
        None => catalog
            .sorted_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };
    Json(names)
}

/// Handler for a single game's details
pub async fn details(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<GameDetails>> {
    let details = state.service.details(&name)?;
    Ok(Json(details))
}
