//! Model catalog and comparison handlers

use crate::handlers::AppState;
use crate::models::catalog::ModelInfo;
use crate::models::comparison::ComparisonResult;
use crate::services::formatter::render_response;
use crate::utils::error::{json_body, AppResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// GET /models response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub max_selection: usize,
}

/// POST /compare request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    pub question: String,
    pub models: Vec<String>,
}

/// One model's outcome, with its answer rendered as safe HTML
#[derive(Debug, Serialize, Deserialize)]
pub struct ComparedModel {
    #[serde(flatten)]
    pub result: ComparisonResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_html: Option<String>,
}

/// POST /compare response body
#[derive(Debug, Serialize, Deserialize)]
pub struct CompareResponse {
    pub question: String,
    pub results: Vec<ComparedModel>,
    pub total_estimated_cost: f64,
    pub total_estimated_tokens: u64,
}

/// GET /models
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.catalog.models.clone(),
        max_selection: state.comparator.max_models(),
    })
}

/// POST /compare
pub async fn compare_models(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> AppResult<Json<CompareResponse>> {
    let request = json_body(payload, "Invalid comparison body")?;

    debug!("Comparison requested for {:?}", request.models);

    let results = state
        .comparator
        .compare(&request.question, &request.models)
        .await?;

    let total_estimated_cost: f64 = results.iter().filter_map(|r| r.estimated_cost).sum();
    let total_estimated_tokens: u64 = results.iter().filter_map(|r| r.estimated_tokens).sum();

    let results: Vec<ComparedModel> = results
        .into_iter()
        .map(|result| {
            let formatted_html = result
                .is_success()
                .then(|| render_response(&result.response_text));
            ComparedModel {
                result,
                formatted_html,
            }
        })
        .collect();

    Ok(Json(CompareResponse {
        question: request.question,
        results,
        total_estimated_cost,
        total_estimated_tokens,
    }))
}
