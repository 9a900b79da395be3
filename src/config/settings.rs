//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fallback backend URL used when `BACKEND_API_URL` is not set
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Longest accepted backend timeout, in seconds
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Longest accepted pause between two models of a batch, in milliseconds
pub const MAX_REQUEST_DELAY_MS: u64 = 60_000;

/// Largest accepted comparison batch
pub const MAX_BATCH_MODELS: usize = 16;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Inference backend configuration
    pub backend: BackendConfig,
    /// Comparison batch configuration
    pub comparison: ComparisonConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

/// Inference backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend base URL (no trailing slash)
    pub base_url: String,
    /// Health probe timeout in seconds
    pub health_timeout: u64,
    /// Model query timeout in seconds
    pub query_timeout: u64,
    /// Prompt improvement timeout in seconds
    pub improve_timeout: u64,
}

/// Comparison batch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Maximum number of models in one batch
    pub max_models: usize,
    /// Pause between two consecutive model queries, in milliseconds
    pub request_delay_ms: u64,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Allowed origins for CORS
    pub allowed_origins: Vec<String>,
    /// Whether CORS is enabled
    pub cors_enabled: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            health_timeout: 5,
            query_timeout: 120,
            improve_timeout: 30,
        }
    }
}

impl BackendConfig {
    /// Backend config pointing at `base_url` with default timeouts
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            ..Default::default()
        }
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout)
    }

    pub fn improve_timeout(&self) -> Duration {
        Duration::from_secs(self.improve_timeout)
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            max_models: 3,
            request_delay_ms: 500,
        }
    }
}

impl ComparisonConfig {
    /// Pause between two models, capped at `MAX_REQUEST_DELAY_MS`
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms.min(MAX_REQUEST_DELAY_MS))
    }
}

impl Settings {
    /// Create a new configuration instance
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let settings = Self {
            server: ServerConfig {
                host: get_env_or_default("SERVER_HOST", "0.0.0.0"),
                port: get_env_or_default("SERVER_PORT", "8082")
                    .parse()
                    .context("Invalid port number")?,
            },
            backend: BackendConfig {
                base_url: normalize_base_url(&get_env_or_default("BACKEND_API_URL", DEFAULT_BACKEND_URL)),
                health_timeout: get_env_or_default("HEALTH_TIMEOUT_SECS", "5")
                    .parse()
                    .context("Invalid health timeout value")?,
                query_timeout: get_env_or_default("QUERY_TIMEOUT_SECS", "120")
                    .parse()
                    .context("Invalid query timeout value")?,
                improve_timeout: get_env_or_default("IMPROVE_TIMEOUT_SECS", "30")
                    .parse()
                    .context("Invalid prompt improvement timeout value")?,
            },
            comparison: ComparisonConfig {
                max_models: get_env_or_default("MAX_MODELS", "3")
                    .parse()
                    .context("Invalid maximum model count")?,
                request_delay_ms: get_env_or_default("REQUEST_DELAY_MS", "500")
                    .parse()
                    .context("Invalid request delay")?,
            },
            security: SecurityConfig {
                allowed_origins: get_env_or_default("ALLOWED_ORIGINS", "*")
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
                cors_enabled: get_env_or_default("CORS_ENABLED", "true")
                    .parse()
                    .context("Invalid CORS enabled flag")?,
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "info"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        // Validate port range
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        // Validate URL format
        if !self.backend.base_url.starts_with("http") {
            anyhow::bail!("Invalid backend URL format, should start with 'http'");
        }

        // Validate timeout values
        if self.backend.health_timeout == 0
            || self.backend.query_timeout == 0
            || self.backend.improve_timeout == 0
        {
            anyhow::bail!("Timeout values cannot be 0");
        }

        if self.backend.health_timeout > MAX_TIMEOUT_SECS
            || self.backend.query_timeout > MAX_TIMEOUT_SECS
            || self.backend.improve_timeout > MAX_TIMEOUT_SECS
        {
            anyhow::bail!("Timeout values cannot exceed {} seconds", MAX_TIMEOUT_SECS);
        }

        if self.comparison.max_models == 0 {
            anyhow::bail!("Maximum model count cannot be 0");
        }

        if self.comparison.max_models > MAX_BATCH_MODELS {
            anyhow::bail!("Maximum model count cannot exceed {}", MAX_BATCH_MODELS);
        }

        if self.comparison.request_delay_ms > MAX_REQUEST_DELAY_MS {
            anyhow::bail!("Request delay cannot exceed {} ms", MAX_REQUEST_DELAY_MS);
        }

        // Validate log level (full filter directives are left to the subscriber)
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let is_directive = self.logging.level.contains('=') || self.logging.level.contains(',');
        if !is_directive && !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        // Validate log format
        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8082,
            },
            backend: BackendConfig::default(),
            comparison: ComparisonConfig::default(),
            security: SecurityConfig {
                allowed_origins: vec!["*".to_string()],
                cors_enabled: true,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "text".to_string(),
            },
        }
    }
}

/// Get environment variable or default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
