//! Mock LLM client for testing.
//!
//! Returns deterministic canned responses. The task is recognized from the
//! system prompt, so the same mock serves intent classification, SQL
//! generation, and analysis without making real API calls.

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::types::{Message, Role};
use crate::llm::LlmClient;

/// Mock LLM client with optional custom response mappings.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (user-message pattern -> response).
    custom_responses: Vec<(String, String)>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the user message contains `pattern`, the mock returns `response`
    /// regardless of the task.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    fn system_content(messages: &[Message]) -> &str {
        messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

    fn user_content(messages: &[Message]) -> &str {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

    fn mock_intent(user: &str) -> String {
        let lower = user.to_lowercase();
        let off_topic = ["weather", "joke", "poem", "recipe"]
            .iter()
            .any(|w| lower.contains(w));

        if off_topic {
            r#"{"is_database_related": false, "confidence": 0.9, "reasoning": "The question is not about the available tables.", "suggested_response": "I can only answer questions about the connected database."}"#
                .to_string()
        } else {
            r#"{"is_database_related": true, "confidence": 0.95, "reasoning": "The question maps to the available tables."}"#
                .to_string()
        }
    }

    fn mock_sql(user: &str) -> String {
        let lower = user.to_lowercase();

        if lower.contains("count") && lower.contains("user") {
            return "```sql\nSELECT COUNT(*) FROM users;\n```".to_string();
        }
        if lower.contains("revenue") || lower.contains("total") {
            return "```sql\nSELECT SUM(total) AS total_revenue FROM orders;\n```".to_string();
        }

        "```sql\nSELECT * FROM users LIMIT 100;\n```".to_string()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let user = Self::user_content(messages);
        let user_lower = user.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if user_lower.contains(&pattern.to_lowercase()) {
                return Ok(response.clone());
            }
        }

        let system = Self::system_content(messages);
        if system.contains("is_database_related") {
            return Ok(Self::mock_intent(user));
        }
        if system.contains("SQL analyst") {
            return Ok(Self::mock_sql(user));
        }
        if system.contains("data analyst") {
            return Ok(
                "The data shows a small set of rows with no unusual outliers.".to_string(),
            );
        }

        Ok("I don't understand that request.".to_string())
    }
}
