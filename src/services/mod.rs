//! Service layer module
//!
//! Contains the backend client, cost estimation, response formatting,
//! comparison orchestration, chat sessions and the prompt workshop

pub mod chat;
pub mod client;
pub mod comparator;
pub mod estimator;
pub mod formatter;
pub mod prompts;

pub use chat::{format_file_size, ChatDocument, ChatMessage, ChatRole, ChatSession, DocumentStatus};
pub use client::{BackendClient, ModelQuery, EMPTY_RESPONSE_PLACEHOLDER};
pub use comparator::Comparator;
pub use estimator::{estimate_tokens, PriceTable, UsageEstimate};
pub use formatter::{format_response, render_response};
pub use prompts::{optimize_prompt, optimization_prompt, PromptTemplate, TemplateValues};
