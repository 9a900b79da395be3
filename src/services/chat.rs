//! Single-model chat session
//!
//! Keeps a transcript and a set of attached documents. When documents are
//! attached, every question is wrapped in a prompt that tells the model to
//! answer from those documents only. Text extraction happens elsewhere; this
//! module only receives plain text.

use crate::services::client::ModelQuery;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Opening assistant message of every session
pub const GREETING: &str = "Hello! I am your AI assistant. Ask me anything, or attach PDF/DOCX documents and ask specific questions about them.";

/// Longest document text kept in a grounded prompt
pub const MAX_DOCUMENT_CHARS: usize = 10_000;

/// Default chat model
pub const DEFAULT_CHAT_MODEL: &str = "Claude 3 Sonnet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    fn label(self) -> &'static str {
        match self {
            ChatRole::User => "You",
            ChatRole::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Extraction outcome of an attached document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum DocumentStatus {
    Success,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatDocument {
    pub id: Uuid,
    pub name: String,
    /// Size of the extracted text in bytes
    pub size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub status: DocumentStatus,
}

impl ChatDocument {
    fn usable_text(&self) -> Option<&str> {
        match (&self.status, self.text.as_deref()) {
            (DocumentStatus::Success, Some(text)) if !text.trim().is_empty() => Some(text),
            _ => None,
        }
    }
}

/// One conversation with one model
#[derive(Debug, Clone)]
pub struct ChatSession {
    model: String,
    messages: Vec<ChatMessage>,
    documents: Vec<ChatDocument>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_MODEL)
    }
}

impl ChatSession {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::new(ChatRole::Assistant, GREETING)],
            documents: Vec::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn documents(&self) -> &[ChatDocument] {
        &self.documents
    }

    /// Attach extracted document text, truncated to [`MAX_DOCUMENT_CHARS`]
    pub fn attach_document(&mut self, name: impl Into<String>, text: &str) -> Uuid {
        let name = name.into();
        let total = text.chars().count();
        let text = if total > MAX_DOCUMENT_CHARS {
            let head: String = text.chars().take(MAX_DOCUMENT_CHARS).collect();
            format!(
                "{}\n\n[Content truncated. The original document has {} characters]",
                head, total
            )
        } else {
            text.to_string()
        };

        debug!("Attached document {} ({} chars)", name, total);
        let document = ChatDocument {
            id: Uuid::new_v4(),
            name,
            size: text.len(),
            text: Some(text),
            status: DocumentStatus::Success,
        };
        let id = document.id;
        self.documents.push(document);
        id
    }

    /// Record a document whose extraction failed
    pub fn mark_failed(&mut self, name: impl Into<String>, reason: impl Into<String>) -> Uuid {
        let name = name.into();
        let reason = reason.into();
        warn!("Document {} could not be read: {}", name, reason);

        let document = ChatDocument {
            id: Uuid::new_v4(),
            name,
            size: 0,
            text: None,
            status: DocumentStatus::Error(reason),
        };
        let id = document.id;
        self.documents.push(document);
        id
    }

    pub fn remove_document(&mut self, id: Uuid) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.id != id);
        self.documents.len() != before
    }

    pub fn has_failed_documents(&self) -> bool {
        self.documents
            .iter()
            .any(|d| matches!(d.status, DocumentStatus::Error(_)))
    }

    /// Number of documents that make it into the prompt
    pub fn grounded_document_count(&self) -> usize {
        self.documents.iter().filter(|d| d.usable_text().is_some()).count()
    }

    /// Prompt actually sent for `input`
    pub fn grounded_prompt(&self, input: &str) -> String {
        let usable: Vec<(&str, &str)> = self
            .documents
            .iter()
            .filter_map(|d| d.usable_text().map(|text| (d.name.as_str(), text)))
            .collect();

        if usable.is_empty() {
            return input.to_string();
        }

        let context = usable
            .iter()
            .map(|(name, text)| {
                format!("=== DOCUMENT: {} ===\n{}\n=== END OF DOCUMENT ===", name, text)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "CONTEXT: The user attached {} document(s). Their content follows:\n\n\
             {}\n\n\
             INSTRUCTION: Answer ONLY from the documents above. If the answer is not in the documents, say so clearly.\n\n\
             USER QUESTION: {}",
            usable.len(),
            context,
            input
        )
    }

    /// Ask the model and record both sides of the exchange
    ///
    /// Blank input is ignored and returns `None`. A failed query is recorded
    /// as an assistant message explaining the failure.
    pub async fn send(&mut self, client: &dyn ModelQuery, input: &str) -> Option<&ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }

        let prompt = self.grounded_prompt(input);
        self.messages.push(ChatMessage::new(ChatRole::User, input));

        let reply = match client.query_model(&self.model, &prompt).await {
            Ok(response) => {
                info!("Chat reply from {} ({} estimated tokens)", self.model, response.estimated_tokens);
                response.response_text
            }
            Err(err) => {
                warn!("Chat query to {} failed: {}", self.model, err);
                err.user_message(&self.model)
            }
        };

        self.messages.push(ChatMessage::new(ChatRole::Assistant, reply));
        self.messages.last()
    }

    /// Drop the conversation, keeping the model and the documents
    pub fn clear(&mut self) {
        self.messages = vec![ChatMessage::new(ChatRole::Assistant, GREETING)];
    }

    pub fn export_transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| {
                format!(
                    "{} ({}):\n{}\n\n",
                    m.role.label(),
                    m.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    m.content
                )
            })
            .collect()
    }

    pub fn transcript_file_name(&self) -> String {
        Utc::now().format("conversation-%Y-%m-%d.txt").to_string()
    }
}

/// Human-readable byte count: `0 Bytes`, `1.5 KB`, `2 MB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
