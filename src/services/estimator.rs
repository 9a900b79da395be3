//! Cost and usage estimation
//!
//! Client-side token and cost heuristics. Token counts here are not the
//! backend's real tokenization: one token is assumed per four characters.

use crate::config::CatalogConfig;
use crate::models::catalog::PriceEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Characters assumed per token
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimated token count of `text`: `ceil(chars / 4)`
pub fn estimate_tokens(text: &str) -> u64 {
    text.chars().count().div_ceil(CHARS_PER_TOKEN) as u64
}

/// Token and cost estimate for one call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageEstimate {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
    pub cost: f64,
}

/// Immutable model → rate mapping with a fallback entry
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    entries: HashMap<String, PriceEntry>,
    fallback: PriceEntry,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::from_catalog(&CatalogConfig::default())
    }
}

impl PriceTable {
    pub fn new<I, S>(entries: I, fallback: PriceEntry) -> Self
    where
        I: IntoIterator<Item = (S, PriceEntry)>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            fallback,
        }
    }

    pub fn from_catalog(catalog: &CatalogConfig) -> Self {
        Self::new(
            catalog.models.iter().map(|m| (m.name.clone(), m.pricing)),
            catalog.default_pricing,
        )
    }

    /// Rates for `model`, or the fallback entry for unknown models
    pub fn lookup(&self, model: &str) -> PriceEntry {
        self.entries.get(model).copied().unwrap_or(self.fallback)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.entries.contains_key(model)
    }

    /// Estimated cost of sending `input` and receiving `output`
    pub fn estimate_cost(&self, model: &str, input: &str, output: &str) -> f64 {
        self.estimate_usage(model, input, output).cost
    }

    pub fn estimate_usage(&self, model: &str, input: &str, output: &str) -> UsageEstimate {
        let pricing = self.lookup(model);
        let input_tokens = estimate_tokens(input);
        let output_tokens = estimate_tokens(output);
        let cost = input_tokens as f64 * pricing.input_per_thousand / 1000.0
            + output_tokens as f64 * pricing.output_per_thousand / 1000.0;

        UsageEstimate {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            cost,
        }
    }
}
