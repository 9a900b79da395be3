//! File-based catalog loading
//!
//! Loads the model catalog and pricing table from a JSON file

use crate::models::catalog::{builtin_models, ModelInfo, PriceEntry};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Model used by the prompt workshop when the catalog does not name one
pub const DEFAULT_OPTIMIZER_MODEL: &str = "Claude 3.7 Sonnet";

/// Model catalog loaded from JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Rates for models missing from `models`
    #[serde(rename = "defaultPricing", default)]
    pub default_pricing: PriceEntry,

    /// Selectable models, in display order
    pub models: Vec<ModelInfo>,

    /// Model asked to optimize prompts
    #[serde(rename = "optimizerModel", default = "default_optimizer_model")]
    pub optimizer_model: String,
}

fn default_optimizer_model() -> String {
    DEFAULT_OPTIMIZER_MODEL.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_pricing: PriceEntry::fallback(),
            models: builtin_models(),
            optimizer_model: default_optimizer_model(),
        }
    }
}

impl CatalogConfig {
    /// Load catalog from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading model catalog from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {:?}", path))?;

        let catalog: CatalogConfig =
            serde_json::from_str(&content).with_context(|| "Failed to parse catalog JSON")?;

        catalog.validate()?;

        debug!("Loaded {} models", catalog.models.len());
        Ok(catalog)
    }

    /// Load catalog from default locations
    /// Searches in order:
    /// 1. `CATALOG_PATH` environment variable
    /// 2. ~/.config/llm-comparator/catalog.json
    /// 3. ./catalog.json
    ///
    /// Falls back to the built-in catalog when no file exists.
    /// An explicit `CATALOG_PATH` that cannot be loaded is an error.
    pub fn load_default() -> Result<Self> {
        if let Ok(path) = std::env::var("CATALOG_PATH") {
            return Self::load(Path::new(&path));
        }

        for candidate in Self::candidate_paths() {
            if candidate.exists() {
                return Self::load(&candidate);
            }
        }

        info!("No catalog file found, using built-in model catalog");
        Ok(Self::default())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("llm-comparator").join("catalog.json"));
        }
        paths.push(PathBuf::from("catalog.json"));
        paths
    }

    /// Validate catalog
    pub fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            anyhow::bail!("At least one model must be configured");
        }

        if !self.default_pricing.is_valid() {
            anyhow::bail!("Default pricing must be finite and non-negative");
        }

        let mut seen = HashSet::new();
        for model in &self.models {
            if model.name.trim().is_empty() {
                anyhow::bail!("Model names cannot be empty");
            }
            if !seen.insert(model.name.as_str()) {
                anyhow::bail!("Duplicate model '{}' in catalog", model.name);
            }
            if !model.pricing.is_valid() {
                anyhow::bail!("Invalid pricing for model '{}'", model.name);
            }
        }

        if self.optimizer_model.trim().is_empty() {
            anyhow::bail!("Optimizer model cannot be empty");
        }

        Ok(())
    }

    /// Look up a model by its display identifier
    pub fn get_model(&self, name: &str) -> Option<&ModelInfo> {
        self.models.iter().find(|m| m.name == name)
    }

    /// List all model identifiers
    pub fn model_names(&self) -> Vec<String> {
        self.models.iter().map(|m| m.name.clone()).collect()
    }
}
