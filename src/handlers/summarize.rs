use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{SummarizeRequest, SummaryResponse, field_error};
use crate::state::AppState;

// POST /api/summarize/
// Admission already happened in the rate limit middleware.
pub async fn summarize_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(body) = payload
        .map_err(|rejection| ApiError::Validation(field_error("non_field_errors", &rejection.body_text())))?;

    let request = SummarizeRequest::from_json(&body).map_err(ApiError::Validation)?;

    let summary = state.inference.summarize(&request.text).await?;

    Ok(Json(SummaryResponse::new(summary)))
}
