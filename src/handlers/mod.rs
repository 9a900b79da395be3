//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod chat;
pub mod compare;
pub mod health;
pub mod prompts;
pub mod query;

use crate::config::{CatalogConfig, SecurityConfig, Settings};
use crate::middleware::logging::request_logging_middleware;
use crate::services::{BackendClient, Comparator, ModelQuery, PriceTable};
use crate::utils::error::AppError;
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header::HeaderValue, Method, Uri},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any as CorsAny, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::warn;

/// Largest accepted request body (chat requests carry document text)
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Application state
///
/// Immutable after startup; shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub catalog: CatalogConfig,
    pub client: BackendClient,
    pub comparator: Comparator,
}

impl AppState {
    pub fn new(settings: Settings, catalog: CatalogConfig) -> Result<Self> {
        let prices = Arc::new(PriceTable::from_catalog(&catalog));
        let client = BackendClient::new(settings.backend.clone(), prices)
            .context("Failed to create backend client")?;
        let comparator = Comparator::new(
            Arc::new(client.clone()) as Arc<dyn ModelQuery>,
            settings.comparison.clone(),
        );

        Ok(Self {
            settings,
            catalog,
            client,
            comparator,
        })
    }
}

/// Create application router
pub async fn create_router(settings: Settings, catalog: CatalogConfig) -> Result<Router> {
    let cors = cors_layer(&settings.security);
    let app_state = Arc::new(AppState::new(settings, catalog)?);

    let router = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/query", post(query::forward_query))
        .route("/improve-prompt", post(query::improve_prompt))
        .route("/models", get(compare::list_models))
        .route("/compare", post(compare::compare_models))
        .route("/chat", post(chat::chat))
        .route("/prompts/templates", get(prompts::list_templates))
        .route("/prompts/optimize", post(prompts::optimize))
        .fallback(route_not_found)
        .layer(from_fn_with_state(app_state.clone(), request_logging_middleware))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CatchPanicLayer::custom(handle_panic));

    Ok(router)
}

/// CORS layer from the security settings
///
/// A disabled layer allows no origin, so browsers get no CORS headers.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.cors_enabled {
        return CorsLayer::new();
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(CorsAny);

    if security.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(CorsAny);
    }

    let origins: Vec<HeaderValue> = security
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    AppError::Internal(detail).into_response()
}
