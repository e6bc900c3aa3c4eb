use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State as AxumState,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use roster::{RefreshError, UpstreamError, get_dataset, refresh_dataset};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    courses::build_index,
    error::AppError,
    search::{SearchQuery, SearchResult, find_match},
    state::State,
    utils::{authorized, parse_payload},
};

pub async fn courses_handler(
    AxumState(state): AxumState<Arc<State>>,
) -> Result<impl IntoResponse, AppError> {
    let dataset = get_dataset(&state.config.data_file)
        .await
        .map_err(|e| AppError::internal("Failed to fetch courses and classes", e))?;

    Ok(Json(build_index(&dataset)))
}

pub async fn search_handler(
    AxumState(state): AxumState<Arc<State>>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let query: SearchQuery = parse_payload(&body)
        .map_err(|e| AppError::internal("Failed to search for student", e))?;

    let dataset = get_dataset(&state.config.data_file)
        .await
        .map_err(|e| AppError::internal("Failed to search for student", e))?;

    let record = find_match(&dataset, &query).ok_or(AppError::StudentNotFound)?;

    Ok(Json(SearchResult::from(record)))
}

pub async fn update_handler(
    AxumState(state): AxumState<Arc<State>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if !authorized(&headers, state.config.api_key.as_deref()) {
        warn!("Rejected update with missing or invalid API key");
        return Err(AppError::Unauthorized);
    }

    let refresh_error = |e: RefreshError| AppError::internal("Failed to update data", e);

    let source = state
        .source
        .as_deref()
        .ok_or_else(|| refresh_error(UpstreamError::NotConfigured.into()))?;

    let dataset = refresh_dataset(source, &state.mapping, &state.config.data_file)
        .await
        .map_err(refresh_error)?;

    info!("Dataset refreshed with {} records", dataset.len());

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Data updated successfully" })),
    ))
}
