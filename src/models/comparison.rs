//! Comparison data structures
//!
//! Per-call query results, per-model comparison outcomes and the bounded model selection

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default upper bound on the number of models compared at once
pub const DEFAULT_MAX_MODELS: usize = 3;

/// Result of one successful model query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Text returned by the model (never empty)
    pub response_text: String,
    /// Estimated cost of the call
    pub estimated_cost: f64,
    /// Estimated prompt + response tokens
    pub estimated_tokens: u64,
    /// Whether the backend signalled live internet access
    pub has_internet: bool,
}

/// Outcome of one model within a comparison batch
///
/// Built only through [`ComparisonResult::success`] and [`ComparisonResult::failure`],
/// so a failed model never carries response text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub model: String,
    pub response_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_tokens: Option<u64>,
}

impl ComparisonResult {
    pub fn success(model: impl Into<String>, response: QueryResponse) -> Self {
        Self {
            model: model.into(),
            response_text: response.response_text,
            error_message: None,
            estimated_cost: Some(response.estimated_cost),
            estimated_tokens: Some(response.estimated_tokens),
        }
    }

    pub fn failure(model: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            response_text: String::new(),
            error_message: Some(error_message.into()),
            estimated_cost: None,
            estimated_tokens: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_message.is_none()
    }
}

/// Selection rejections
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// Selection already holds the maximum number of models
    #[error("Limit reached: you can compare at most {limit} models at a time. Deselect a model before adding another one.")]
    LimitReached { limit: usize },

    /// Model already selected
    #[error("Model already selected: {0}")]
    Duplicate(String),

    /// Blank model identifier
    #[error("Model identifier cannot be empty")]
    EmptyModel,
}

/// Ordered, bounded set of selected models
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSelection {
    models: Vec<String>,
    limit: usize,
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_MODELS)
    }
}

impl ModelSelection {
    /// Empty selection holding at most `limit` models
    pub fn with_limit(limit: usize) -> Self {
        Self {
            models: Vec::with_capacity(limit),
            limit,
        }
    }

    /// Validate a whole list at once, preserving its order
    ///
    /// Fails on the first model that would break the bound; nothing is truncated.
    pub fn from_models<I, S>(models: I, limit: usize) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::with_limit(limit);
        for model in models {
            selection.add(model)?;
        }
        Ok(selection)
    }

    /// Append a model; rejected when full or already present
    pub fn add(&mut self, model: impl Into<String>) -> Result<(), SelectionError> {
        let model = model.into();
        let model = model.trim();
        if model.is_empty() {
            return Err(SelectionError::EmptyModel);
        }
        if self.contains(model) {
            return Err(SelectionError::Duplicate(model.to_string()));
        }
        if self.is_full() {
            return Err(SelectionError::LimitReached { limit: self.limit });
        }
        self.models.push(model.to_string());
        Ok(())
    }

    /// Remove a model, returning whether it was selected
    pub fn remove(&mut self, model: &str) -> bool {
        let model = model.trim();
        let before = self.models.len();
        self.models.retain(|m| m != model);
        self.models.len() != before
    }

    /// Select an unselected model or deselect a selected one
    ///
    /// Returns `true` when the model is selected afterwards.
    pub fn toggle(&mut self, model: &str) -> Result<bool, SelectionError> {
        let model = model.trim();
        if self.remove(model) {
            return Ok(false);
        }
        self.add(model)?;
        Ok(true)
    }

    /// Identifiers are compared with surrounding whitespace trimmed
    pub fn contains(&self, model: &str) -> bool {
        let model = model.trim();
        self.models.iter().any(|m| m == model)
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.models.len() >= self.limit
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// How many more models can be added
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.models.len())
    }

    /// Hint shown next to the selector
    pub fn encouragement(&self) -> String {
        match self.remaining() {
            _ if self.is_empty() => {
                format!("Select 1 to {} models for a meaningful comparison!", self.limit)
            }
            0 => format!(
                "Perfect! {} models give a good balance between diversity and speed. Maximum reached.",
                self.len()
            ),
            1 => format!("Focused comparison! You can still add 1 model (max {}).", self.limit),
            n => format!("Good start! You can still add {} models (max {}).", n, self.limit),
        }
    }

    pub fn into_models(self) -> Vec<String> {
        self.models
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_response(text: &str) -> QueryResponse {
        QueryResponse {
            response_text: text.to_string(),
            estimated_cost: 0.001,
            estimated_tokens: 10,
            has_internet: false,
        }
    }

    #[test]
    fn test_result_constructors_keep_invariant() {
        let ok = ComparisonResult::success("A", sample_response("hello"));
        assert!(ok.is_success());
        assert_eq!(ok.response_text, "hello");
        assert_eq!(ok.estimated_tokens, Some(10));

        let failed = ComparisonResult::failure("B", "boom");
        assert!(!failed.is_success());
        assert!(failed.response_text.is_empty());
        assert_eq!(failed.estimated_cost, None);
    }

    #[test]
    fn test_fourth_model_rejected() {
        let mut selection = ModelSelection::from_models(["A", "B", "C"], 3).unwrap();
        let err = selection.add("D").unwrap_err();
        assert_eq!(err, SelectionError::LimitReached { limit: 3 });
        assert_eq!(selection.models(), ["A", "B", "C"]);

        let err = selection.toggle("D").unwrap_err();
        assert_eq!(err, SelectionError::LimitReached { limit: 3 });
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_toggle_deselects_and_reselects() {
        let mut selection = ModelSelection::default();
        assert!(selection.toggle("A").unwrap());
        assert!(selection.toggle("B").unwrap());
        assert!(!selection.toggle("A").unwrap());
        assert_eq!(selection.models(), ["B"]);
        assert!(selection.toggle("A").unwrap());
        assert_eq!(selection.models(), ["B", "A"]);
    }

    #[test]
    fn test_identifiers_are_trimmed_consistently() {
        let mut selection = ModelSelection::from_models([" A "], 3).unwrap();
        assert_eq!(selection.models(), ["A"]);
        assert!(selection.contains(" A"));

        assert!(!selection.toggle(" A ").unwrap());
        assert!(selection.is_empty());

        selection.add("B").unwrap();
        assert!(selection.remove("B  "));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_from_models_rejects_oversized_list() {
        let err = ModelSelection::from_models(["A", "B", "C", "D"], 3).unwrap_err();
        assert!(matches!(err, SelectionError::LimitReached { limit: 3 }));

        let err = ModelSelection::from_models(["A", "A"], 3).unwrap_err();
        assert!(matches!(err, SelectionError::Duplicate(_)));

        let err = ModelSelection::from_models(["  "], 3).unwrap_err();
        assert_eq!(err, SelectionError::EmptyModel);
    }

    #[test]
    fn test_encouragement_messages() {
        let mut selection = ModelSelection::default();
        assert!(selection.encouragement().starts_with("Select 1 to 3"));
        selection.add("A").unwrap();
        assert!(selection.encouragement().contains("add 2 models"));
        selection.add("B").unwrap();
        assert!(selection.encouragement().contains("add 1 model"));
        selection.add("C").unwrap();
        assert!(selection.encouragement().contains("Maximum reached"));
    }
}
