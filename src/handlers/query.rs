//! Backend pass-through handlers
//!
//! `POST /query` forwards one question to the backend; `POST /improve-prompt`
//! asks the backend to rewrite a prompt.

use crate::handlers::AppState;
use crate::models::backend::{BackendQueryResponse, ImprovePromptRequest, ImprovePromptResponse, QueryRequest};
use crate::utils::error::{json_body, AppError, AppResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use tracing::debug;

/// POST /query
pub async fn forward_query(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> AppResult<Json<BackendQueryResponse>> {
    let request = json_body(payload, "Invalid query body")?;

    if request.model.trim().is_empty() {
        return Err(AppError::Validation("Model cannot be empty".to_string()));
    }
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("Question cannot be empty".to_string()));
    }

    debug!("Forwarding query for model {}", request.model);
    let response = state.client.forward_query(&request).await?;
    Ok(Json(response))
}

/// POST /improve-prompt
///
/// Always answers 200 for a well-formed body; backend failures return the
/// prompt unchanged.
pub async fn improve_prompt(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ImprovePromptRequest>, JsonRejection>,
) -> AppResult<Json<ImprovePromptResponse>> {
    let request = json_body(payload, "Invalid prompt body")?;

    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("Prompt cannot be empty".to_string()));
    }

    let improved_prompt = state.client.improve_prompt(&request.prompt).await;
    Ok(Json(ImprovePromptResponse { improved_prompt }))
}
