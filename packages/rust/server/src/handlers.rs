//! Route handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use biosearch_shared::EntryView;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct TitleParams {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct IndexedResponse {
    pub indexed: bool,
}

pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// All catalog titles, enriched or not.
pub async fn list_titles(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let titles = state.enricher.storage().list_titles().await?;
    Ok(Json(titles))
}

/// The entry for `title`, enriching it on first access.
pub async fn get_entry(
    State(state): State<AppState>,
    Query(params): Query<TitleParams>,
) -> Result<Json<EntryView>, ApiError> {
    let entry = state.enricher.ensure_enriched(&params.title).await?;
    Ok(Json(entry.into()))
}

pub async fn is_indexed(
    State(state): State<AppState>,
    Query(params): Query<TitleParams>,
) -> Result<Json<IndexedResponse>, ApiError> {
    let indexed = state.enricher.is_indexed(&params.title).await?;
    Ok(Json(IndexedResponse { indexed }))
}
