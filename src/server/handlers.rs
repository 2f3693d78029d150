//! HTTP handlers for the extension-facing API.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::AppState;
use crate::models::{ClassifyRequest, ClassifyResponse, HistoryEntry};
use crate::pipeline::PipelineError;

/// Errors surfaced to HTTP callers as `{"error": ...}` with status 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub async fn status() -> Json<serde_json::Value> {
    Json(json!({ "status": "running", "database": "sqlite" }))
}

pub async fn classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let response = state.pipeline.classify(request.history).await?;
    Ok(Json(response))
}

pub async fn history(State(state): State<AppState>) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    let rows = state.pipeline.history().await.map_err(|e| {
        error!("Failed to read history: {:#}", e);
        ApiError::from(e)
    })?;
    Ok(Json(rows))
}

pub async fn clear(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = state.pipeline.wipe().await.map_err(|e| {
        error!("Failed to wipe history: {:#}", e);
        ApiError::from(e)
    })?;
    Ok(Json(json!({ "message": "History wiped", "deleted": deleted })))
}
