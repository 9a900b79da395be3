//! LLM Comparator Library
//!
//! Sends one question to several LLM backends and compares the answers,
//! with client-side cost estimation and safe rendering of model output

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::{CatalogConfig, Settings};
pub use handlers::{create_router, AppState};
pub use models::{ComparisonResult, ModelSelection, QueryResponse};
pub use services::{BackendClient, Comparator, ModelQuery, PriceTable};
pub use utils::error::{AppError, AppResult, QueryError};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
