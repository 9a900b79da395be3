//! Logging utilities
//!
//! Shared logging configuration and helper functions

use crate::config::LoggingConfig;
use anyhow::Result;
use tracing::info;

/// Longest prompt/response excerpt written to debug logs
pub const LOG_EXCERPT_CHARS: usize = 120;

/// Initialize logging system
///
/// `RUST_LOG` directives take precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());

    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if config.format == "json" {
        // JSON format logs (production environment)
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .finish(),
        )
    } else {
        // Human readable format (development environment)
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    };

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    info!("Logging system initialized");
    Ok(())
}

/// Truncate a string with a note about original length
pub fn truncate_for_log(s: &str, max_chars: usize) -> String {
    let total = s.chars().count();
    if total > max_chars {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}... ({} chars truncated)", head, total - max_chars)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_for_log("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "éééééééééé";
        let truncated = truncate_for_log(text, 3);
        assert_eq!(truncated, "ééé... (7 chars truncated)");
    }
}
