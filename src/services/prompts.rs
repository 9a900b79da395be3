//! Prompt workshop
//!
//! Built-in prompt templates with placeholders, and a model-assisted
//! optimization pass over a user-written prompt.

use crate::services::client::ModelQuery;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Returned when the optimizer model answers with nothing usable
pub const OPTIMIZE_EMPTY_FALLBACK: &str = "Sorry, I could not optimize your prompt.";

/// Returned when the optimizer model could not be queried
pub const OPTIMIZE_ERROR_FALLBACK: &str = "An error occurred while optimizing the prompt.";

/// Style used when none is given
pub const DEFAULT_STYLE: &str = "professional";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub template: &'static str,
}

static TEMPLATES: [PromptTemplate; 4] = [
    PromptTemplate {
        id: "detailed",
        title: "Detailed answer",
        category: "explanation",
        description: "Get a complete, in-depth answer with examples",
        template: "I want you to act as an expert on the following subject: {subject}.

Provide a detailed answer covering:
1. A clear and complete explanation of the subject
2. The key points to understand
3. Concrete and relevant examples
4. Practical applications
5. Current trends or recent developments

Your goal is to help me gain a deep understanding of this subject. Use a {style} tone and structure your answer logically with clearly defined sections.",
    },
    PromptTemplate {
        id: "creative",
        title: "Creative content",
        category: "creative",
        description: "Generate original creative content on a subject",
        template: "I want you to write creative content on the following subject: {subject}.

Be original and inventive, with:
- A unique and captivating angle
- A {style} and engaging writing style
- Relevant metaphors or analogies
- A fluid narrative structure
- A memorable conclusion

The content should be designed to {goal} and speak to an audience that {audience}.",
    },
    PromptTemplate {
        id: "analysis",
        title: "Critical analysis",
        category: "analysis",
        description: "Get an objective critical analysis of a subject",
        template: "I am asking you for an in-depth critical analysis of the following subject: {subject}.

Make sure your analysis includes:
1. An objective summary of the main arguments or characteristics
2. An evaluation of strengths and weaknesses
3. Historical or theoretical context
4. A comparison with other approaches or perspectives
5. Critical questions that deserve further exploration

Adopt a {style}, balanced tone and present different points of view impartially.",
    },
    PromptTemplate {
        id: "technical",
        title: "Technical documentation",
        category: "documentation",
        description: "Write clear and precise technical documentation",
        template: "I want you to write technical documentation about: {subject}.

The documentation must include:
- A clear introduction explaining purpose and context
- Precise technical specifications
- Step-by-step instructions
- Usage or implementation examples
- Solutions to common problems
- References or further resources

Use {style}, precise language suited to {audience}. Structure the document with headings, subheadings and lists so it is easy to read.",
    },
];

/// All built-in templates, in display order
pub fn templates() -> &'static [PromptTemplate] {
    &TEMPLATES
}

pub fn find_template(id: &str) -> Option<&'static PromptTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

/// Values substituted into a template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateValues {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
}

fn value_or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
}

impl PromptTemplate {
    /// Fill every placeholder; missing values become bracketed markers
    pub fn render(&self, values: &TemplateValues) -> String {
        self.template
            .replace("{subject}", value_or(&values.subject, "[SUBJECT]"))
            .replace("{style}", value_or(&values.style, DEFAULT_STYLE))
            .replace("{goal}", value_or(&values.goal, "[GOAL]"))
            .replace("{audience}", value_or(&values.audience, "[AUDIENCE]"))
    }
}

/// Meta-prompt asking a model to rewrite `custom`
pub fn optimization_prompt(custom: &str) -> String {
    format!(
        "I want to optimize this prompt to get the best possible results from an advanced language model.

Original prompt:
\"\"\"
{}
\"\"\"

Can you improve this prompt by:
1. Clarifying the instructions
2. Adding more detail and context
3. Structuring the requests better
4. Making the objectives more explicit
5. Adding specific constraints or guidelines

Provide only the optimized prompt, without explanations or comments.",
        custom
    )
}

/// Ask `optimizer_model` to rewrite `custom`
///
/// Never fails: problems yield one of the fixed fallback messages.
pub async fn optimize_prompt(client: &dyn ModelQuery, optimizer_model: &str, custom: &str) -> String {
    match client
        .query_model(optimizer_model, &optimization_prompt(custom))
        .await
    {
        Ok(response) if !response.response_text.trim().is_empty() => {
            info!("Prompt optimized by {}", optimizer_model);
            response.response_text
        }
        Ok(_) => OPTIMIZE_EMPTY_FALLBACK.to_string(),
        Err(err) => {
            warn!("Prompt optimization with {} failed: {}", optimizer_model, err);
            OPTIMIZE_ERROR_FALLBACK.to_string()
        }
    }
}

/// Download name for an optimized prompt
pub fn optimized_prompt_file_name() -> String {
    Utc::now().format("optimized-prompt-%Y-%m-%d.txt").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comparison::QueryResponse;
    use crate::utils::error::QueryError;
    use async_trait::async_trait;

    struct Fixed(Result<&'static str, QueryError>);

    #[async_trait]
    impl ModelQuery for Fixed {
        async fn query_model(&self, _model: &str, _prompt: &str) -> Result<QueryResponse, QueryError> {
            self.0.clone().map(|text| QueryResponse {
                response_text: text.to_string(),
                estimated_cost: 0.0,
                estimated_tokens: 0,
                has_internet: false,
            })
        }
    }

    #[test]
    fn test_builtin_templates() {
        let ids: Vec<&str> = templates().iter().map(|t| t.id).collect();
        assert_eq!(ids, ["detailed", "creative", "analysis", "technical"]);
        assert!(find_template("creative").is_some());
        assert!(find_template("missing").is_none());
    }

    #[test]
    fn test_render_fills_values() {
        let values = TemplateValues {
            subject: Some("Rust lifetimes".to_string()),
            style: Some("friendly".to_string()),
            goal: Some("teach beginners".to_string()),
            audience: Some("is new to systems programming".to_string()),
        };
        let out = find_template("creative").unwrap().render(&values);
        assert!(out.contains("subject: Rust lifetimes."));
        assert!(out.contains("A friendly and engaging"));
        assert!(out.contains("designed to teach beginners"));
        assert!(!out.contains('{'));
    }

    #[test]
    fn test_render_marks_missing_values() {
        let out = find_template("technical").unwrap().render(&TemplateValues::default());
        assert!(out.contains("[SUBJECT]"));
        assert!(out.contains("[AUDIENCE]"));
        assert!(out.contains("Use professional, precise language"));
    }

    #[test]
    fn test_optimization_prompt_embeds_custom_text() {
        let prompt = optimization_prompt("Explain monads");
        assert!(prompt.contains("\"\"\"\nExplain monads\n\"\"\""));
        assert!(prompt.ends_with("without explanations or comments."));
    }

    #[tokio::test]
    async fn test_optimize_prompt_outcomes() {
        let ok = Fixed(Ok("Better prompt"));
        assert_eq!(optimize_prompt(&ok, "Claude 3.7 Sonnet", "p").await, "Better prompt");

        let empty = Fixed(Ok("  "));
        assert_eq!(optimize_prompt(&empty, "Claude 3.7 Sonnet", "p").await, OPTIMIZE_EMPTY_FALLBACK);

        let failing = Fixed(Err(QueryError::Timeout));
        assert_eq!(optimize_prompt(&failing, "Claude 3.7 Sonnet", "p").await, OPTIMIZE_ERROR_FALLBACK);
    }

    #[test]
    fn test_file_name() {
        let name = optimized_prompt_file_name();
        assert!(name.starts_with("optimized-prompt-"));
        assert!(name.ends_with(".txt"));
    }
}
