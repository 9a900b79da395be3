//! LLM Comparator Server
//!
//! HTTP gateway that fans a question out to several models on a remote
//! inference backend and returns the answers side by side

use anyhow::{Context, Result};
use llm_comparator::config::{CatalogConfig, Settings};
use llm_comparator::handlers::create_router;
use llm_comparator::utils::logging::init_logging;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Settings first: the log format and level come from them
    let settings = Settings::new().context("Failed to load server settings")?;
    init_logging(&settings.logging)?;
    info!("{}", llm_comparator::version_info());

    let catalog = CatalogConfig::load_default().context("Failed to load model catalog")?;
    info!("Model catalog loaded: {}", catalog.model_names().join(", "));
    if catalog.get_model(&catalog.optimizer_model).is_none() {
        warn!(
            "Optimizer model '{}' is not in the catalog, its cost uses default pricing",
            catalog.optimizer_model
        );
    }

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let backend_url = settings.backend.base_url.clone();

    let app = create_router(settings, catalog).await?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("LLM comparator started on http://{}", addr);
    info!("Forwarding to backend: {}", backend_url);
    info!("Comparison endpoint: http://{}/compare", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}
