//! Model catalog entries
//!
//! Describes the models offered for comparison and their per-thousand-token rates

use serde::{Deserialize, Serialize};

/// Per-thousand-token rates for one model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Cost of 1000 input tokens
    #[serde(rename = "input")]
    pub input_per_thousand: f64,
    /// Cost of 1000 output tokens
    #[serde(rename = "output")]
    pub output_per_thousand: f64,
}

impl PriceEntry {
    pub const fn new(input_per_thousand: f64, output_per_thousand: f64) -> Self {
        Self {
            input_per_thousand,
            output_per_thousand,
        }
    }

    /// Rate used for models missing from the table
    pub const fn fallback() -> Self {
        Self::new(0.001, 0.002)
    }

    /// Both rates are finite and non-negative
    pub fn is_valid(&self) -> bool {
        self.input_per_thousand.is_finite()
            && self.output_per_thousand.is_finite()
            && self.input_per_thousand >= 0.0
            && self.output_per_thousand >= 0.0
    }
}

impl Default for PriceEntry {
    fn default() -> Self {
        Self::fallback()
    }
}

/// A model that can be selected for comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Display identifier sent to the backend
    pub name: String,
    /// Hosting provider
    #[serde(default)]
    pub provider: String,
    /// Short description shown next to the selector
    #[serde(default)]
    pub description: String,
    /// Rates used for client-side cost estimation
    pub pricing: PriceEntry,
}

impl ModelInfo {
    pub fn new(
        name: impl Into<String>,
        provider: impl Into<String>,
        description: impl Into<String>,
        pricing: PriceEntry,
    ) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            description: description.into(),
            pricing,
        }
    }
}

/// Models shipped with the gateway
pub fn builtin_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo::new(
            "Claude 3 Sonnet",
            "AWS Bedrock",
            "Anthropic's advanced model, strong at analysis and content creation",
            PriceEntry::new(0.003, 0.015),
        ),
        ModelInfo::new(
            "Claude 3 Haiku",
            "AWS Bedrock",
            "Fast and efficient Claude, suited to everyday tasks",
            PriceEntry::new(0.00025, 0.00125),
        ),
        ModelInfo::new(
            "Claude 3.7 Sonnet",
            "AWS Bedrock",
            "Latest Claude release with improved capabilities",
            PriceEntry::new(0.003, 0.015),
        ),
        ModelInfo::new(
            "Mixtral 8x7B Instruct",
            "AWS Bedrock",
            "Open-weight model with strong reasoning",
            PriceEntry::new(0.0007, 0.0007),
        ),
        ModelInfo::new(
            "Pixtral Large",
            "AWS Bedrock",
            "Open-weight model for a wide range of tasks",
            PriceEntry::new(0.002, 0.006),
        ),
        ModelInfo::new(
            "GPT-4o (Azure)",
            "Azure OpenAI",
            "GPT-4o served through Azure OpenAI",
            PriceEntry::new(0.005, 0.015),
        ),
        ModelInfo::new(
            "GPT-4o Mini (Azure)",
            "Azure OpenAI",
            "Smaller, cheaper GPT-4o served through Azure OpenAI",
            PriceEntry::new(0.00015, 0.0006),
        ),
    ]
}
