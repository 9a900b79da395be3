//! HTTP client service
//!
//! Encapsulates HTTP communication with the model-inference backend

use crate::config::BackendConfig;
use crate::models::backend::*;
use crate::models::comparison::QueryResponse;
use crate::services::estimator::PriceTable;
use crate::utils::error::QueryError;
use crate::utils::logging::{truncate_for_log, LOG_EXCERPT_CHARS};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Text reported when the backend answers successfully with nothing
pub const EMPTY_RESPONSE_PLACEHOLDER: &str = "Empty response";

/// Something that can answer a prompt with a given model
///
/// The comparison orchestrator and the chat session only see this trait.
#[async_trait]
pub trait ModelQuery: Send + Sync {
    async fn query_model(&self, model: &str, prompt: &str) -> Result<QueryResponse, QueryError>;
}

/// Inference backend client
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    config: BackendConfig,
    prices: Arc<PriceTable>,
}

impl BackendClient {
    /// Create a new client instance
    pub fn new(config: BackendConfig, prices: Arc<PriceTable>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("llm-comparator/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config, prices })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Probe `GET /health`; only a 200 counts as healthy
    pub async fn health_check(&self) -> bool {
        debug!("Performing backend health check");

        match self
            .client
            .get(self.url("/health"))
            .timeout(self.config.health_timeout())
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                warn!("Backend health check failed with status {}", response.status());
                false
            }
            Err(e) => {
                warn!("Backend health check failed: {}", e);
                false
            }
        }
    }

    /// Send `POST /query` without the health probe
    ///
    /// Returns the backend body untouched; used for pass-through forwarding.
    pub async fn forward_query(&self, request: &QueryRequest) -> Result<BackendQueryResponse, QueryError> {
        debug!(
            "Sending query to {} for model {}: {}",
            self.config.base_url,
            request.model,
            truncate_for_log(&request.question, LOG_EXCERPT_CHARS)
        );

        let response = self
            .client
            .post(self.url("/query"))
            .timeout(self.config.query_timeout())
            .json(request)
            .send()
            .await
            .map_err(|e| QueryError::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "Backend query for {} failed: {} - {}",
                request.model,
                status,
                truncate_for_log(&body, LOG_EXCERPT_CHARS)
            );
            return Err(QueryError::from_status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| QueryError::from_transport(&e))?;
        serde_json::from_str::<BackendQueryResponse>(&body)
            .map_err(|e| QueryError::UnknownError(format!("Failed to parse backend response: {}", e)))
    }

    /// Ask the backend to rewrite a prompt
    ///
    /// Advisory only: every failure is logged and the input comes back unchanged.
    pub async fn improve_prompt(&self, prompt: &str) -> String {
        debug!("Requesting prompt improvement");

        let result: Result<ImprovePromptResponse, QueryError> = async {
            let response = self
                .client
                .post(self.url("/improve-prompt"))
                .timeout(self.config.improve_timeout())
                .json(&ImprovePromptRequest {
                    prompt: prompt.to_string(),
                })
                .send()
                .await
                .map_err(|e| QueryError::from_transport(&e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(QueryError::from_status(status.as_u16()));
            }

            response
                .json::<ImprovePromptResponse>()
                .await
                .map_err(|e| QueryError::UnknownError(e.to_string()))
        }
        .await;

        match result {
            Ok(body) if !body.improved_prompt.trim().is_empty() => body.improved_prompt,
            Ok(_) => {
                warn!("Prompt improvement returned an empty prompt, keeping the original");
                prompt.to_string()
            }
            Err(e) => {
                warn!("Prompt improvement failed, keeping the original: {}", e);
                prompt.to_string()
            }
        }
    }
}

#[async_trait]
impl ModelQuery for BackendClient {
    /// Health probe, then query; a failed probe skips the query entirely
    async fn query_model(&self, model: &str, prompt: &str) -> Result<QueryResponse, QueryError> {
        if !self.health_check().await {
            return Err(QueryError::HealthCheckFailed);
        }

        let body = self.forward_query(&QueryRequest::new(model, prompt)).await?;

        if !self.prices.contains(model) {
            debug!("No price entry for {}, using default pricing", model);
        }
        let usage = self.prices.estimate_usage(model, prompt, &body.response);
        let response_text = if body.response.is_empty() {
            EMPTY_RESPONSE_PLACEHOLDER.to_string()
        } else {
            body.response
        };

        info!(
            "Model {} answered ({} estimated tokens, estimated cost {:.6})",
            model, usage.total_tokens, usage.cost
        );

        Ok(QueryResponse {
            estimated_tokens: usage.total_tokens,
            estimated_cost: usage.cost,
            has_internet: body.has_internet.unwrap_or(false),
            response_text,
        })
    }
}
