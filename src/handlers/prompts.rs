//! Prompt workshop handlers

use crate::handlers::AppState;
use crate::services::prompts::{self, PromptTemplate, TemplateValues};
use crate::utils::error::{json_body, AppError, AppResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// GET /prompts/templates response body
#[derive(Debug, Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<PromptTemplate>,
}

/// POST /prompts/optimize request body
///
/// Either a ready prompt, or a template id with values to fill it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub values: TemplateValues,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub original_prompt: String,
    pub optimized_prompt: String,
    pub model: String,
    pub file_name: String,
}

/// GET /prompts/templates
pub async fn list_templates() -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        templates: prompts::templates().to_vec(),
    })
}

/// POST /prompts/optimize
pub async fn optimize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<OptimizeRequest>, JsonRejection>,
) -> AppResult<Json<OptimizeResponse>> {
    let request = json_body(payload, "Invalid optimize body")?;

    let original_prompt = match (request.prompt, request.template_id) {
        (Some(prompt), _) if !prompt.trim().is_empty() => prompt,
        (_, Some(id)) => prompts::find_template(&id)
            .map(|template| template.render(&request.values))
            .ok_or_else(|| AppError::Validation(format!("Unknown template: {}", id)))?,
        _ => return Err(AppError::Validation("Prompt cannot be empty".to_string())),
    };

    let model = state.catalog.optimizer_model.clone();
    let optimized_prompt = prompts::optimize_prompt(&state.client, &model, &original_prompt).await;

    Ok(Json(OptimizeResponse {
        original_prompt,
        optimized_prompt,
        model,
        file_name: prompts::optimized_prompt_file_name(),
    }))
}
