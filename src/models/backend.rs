//! Inference backend wire format
//!
//! Request and response bodies exchanged with the remote model-inference service

use serde::{Deserialize, Serialize};

/// `POST /query` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Model display identifier (e.g. "Claude 3 Haiku")
    pub model: String,
    /// Question or prompt text
    pub question: String,
}

impl QueryRequest {
    pub fn new(model: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            question: question.into(),
        }
    }
}

/// `POST /query` response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendQueryResponse {
    /// Generated text
    #[serde(default)]
    pub response: String,
    /// Whether the backend used live internet data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_internet: Option<bool>,
    /// Model echoed back by some backend versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Backend-side cost figure, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    /// Backend-side token count, when provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
}

/// `POST /improve-prompt` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovePromptRequest {
    pub prompt: String,
}

/// `POST /improve-prompt` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovePromptResponse {
    #[serde(default)]
    pub improved_prompt: String,
}
