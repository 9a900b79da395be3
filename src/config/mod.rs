//! Configuration management module
//!
//! Responsible for loading and managing application configuration, including environment variables and the model catalog file.

pub mod file;
pub mod settings;

pub use file::{CatalogConfig, DEFAULT_OPTIMIZER_MODEL};
pub use settings::{
    BackendConfig, ComparisonConfig, LoggingConfig, SecurityConfig, ServerConfig, Settings,
};
