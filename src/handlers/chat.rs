//! Chat handler
//!
//! Sessions are not kept on the server: each request carries the documents
//! it wants the answer grounded in.

use crate::handlers::AppState;
use crate::services::chat::{ChatMessage, ChatSession, DEFAULT_CHAT_MODEL};
use crate::utils::error::{json_body, AppError, AppResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Document text extracted on the client side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatDocumentInput {
    pub name: String,
    #[serde(default)]
    pub text: Option<String>,
    /// Extraction error reported by the client
    #[serde(default)]
    pub error: Option<String>,
}

/// POST /chat request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub model: Option<String>,
    pub message: String,
    #[serde(default)]
    pub documents: Vec<ChatDocumentInput>,
}

/// POST /chat response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub model: String,
    pub reply: ChatMessage,
    /// Number of documents the prompt was grounded in
    pub grounded_documents: usize,
}

/// POST /chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> AppResult<Json<ChatResponse>> {
    let request = json_body(payload, "Invalid chat body")?;

    if request.message.trim().is_empty() {
        return Err(AppError::Validation("Message cannot be empty".to_string()));
    }

    let model = request
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
    let mut session = ChatSession::new(model);

    for document in &request.documents {
        match (&document.text, &document.error) {
            (Some(text), None) => {
                session.attach_document(document.name.as_str(), text);
            }
            (_, Some(reason)) => {
                session.mark_failed(document.name.as_str(), reason.as_str());
            }
            (None, None) => {
                session.mark_failed(document.name.as_str(), "No text extracted");
            }
        }
    }
    let grounded_documents = session.grounded_document_count();

    let reply = session
        .send(&state.client, &request.message)
        .await
        .cloned()
        .ok_or_else(|| AppError::Internal("Chat produced no reply".to_string()))?;

    Ok(Json(ChatResponse {
        model: session.model().to_string(),
        reply,
        grounded_documents,
    }))
}
