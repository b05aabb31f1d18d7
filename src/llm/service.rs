//! LLM service backing the question pipeline.
//!
//! Wraps a raw [`LlmClient`] and implements the pipeline's three LLM-backed
//! collaborators: intent classification, SQL generation, and result
//! analysis. Prompt construction and response parsing live in the sibling
//! `prompt` and `parser` modules; this layer adds timing logs and the
//! data-size guard for analysis.

use std::time::Instant;

use async_trait::async_trait;

use crate::db::SchemaInfo;
use crate::error::Result;
use crate::llm::{parser, prompt, LlmClient};
use crate::pipeline::{IntentClassifier, QueryGenerator, QuestionIntent, ResultAnalyzer};

/// Character budget for rendered results in the analysis prompt.
/// Roughly 8k tokens at ~3 characters per token.
const ANALYSIS_MAX_CHARS: usize = 24_000;

/// LLM service that fulfills the pipeline's language-model stages.
pub struct LlmService {
    client: Box<dyn LlmClient>,
}

impl LlmService {
    /// Creates a new LLM service over the given client.
    pub fn new(client: Box<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IntentClassifier for LlmService {
    async fn classify_question_intent(
        &self,
        question: &str,
        schema: &SchemaInfo,
    ) -> Result<QuestionIntent> {
        let start = Instant::now();
        let messages = prompt::intent_messages(question, schema);
        let response = self.client.complete(&messages).await?;
        let intent = parser::parse_intent(&response)?;

        tracing::debug!(
            duration_ms = start.elapsed().as_millis(),
            is_database_related = intent.is_database_related,
            confidence = intent.confidence,
            "Intent classified"
        );
        Ok(intent)
    }
}

#[async_trait]
impl QueryGenerator for LlmService {
    async fn generate_sql_query(&self, question: &str, schema: &SchemaInfo) -> Result<String> {
        let start = Instant::now();
        let messages = prompt::sql_generation_messages(question, schema);
        let response = self.client.complete(&messages).await?;
        let sql = parser::extract_sql(&response);

        tracing::debug!(
            duration_ms = start.elapsed().as_millis(),
            sql_len = sql.len(),
            "SQL generated"
        );
        Ok(sql)
    }
}

#[async_trait]
impl ResultAnalyzer for LlmService {
    async fn analyze_data(&self, data: &str, question: &str) -> Result<String> {
        let start = Instant::now();
        let truncated = prompt::truncate_for_analysis(data, ANALYSIS_MAX_CHARS);
        let messages = prompt::analysis_messages(question, &truncated);
        let analysis = self.client.complete(&messages).await?;

        tracing::debug!(
            duration_ms = start.elapsed().as_millis(),
            analysis_len = analysis.len(),
            "Results analyzed"
        );
        Ok(analysis.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ColumnMeta, TableInfo};
    use crate::llm::MockLlmClient;

    fn sample_schema() -> SchemaInfo {
        let mut schema = SchemaInfo::new();
        schema.insert_table(
            "users",
            TableInfo::new(vec![ColumnMeta::new("id", "integer").primary_key()]),
        );
        schema
    }

    #[tokio::test]
    async fn test_generate_sql_strips_fences() {
        let service = LlmService::new(Box::new(MockLlmClient::new()));
        let sql = service
            .generate_sql_query("How many users are there? (count)", &sample_schema())
            .await
            .unwrap();

        assert!(sql.starts_with("SELECT"));
        assert!(!sql.contains("```"));
    }

    #[tokio::test]
    async fn test_classify_intent_parses_verdict() {
        let service = LlmService::new(Box::new(MockLlmClient::new()));
        let intent = service
            .classify_question_intent("What is the total revenue?", &sample_schema())
            .await
            .unwrap();

        assert!(intent.is_database_related);
        assert!(intent.confidence > 0.5);
    }

    #[tokio::test]
    async fn test_classify_intent_off_topic_has_suggestion() {
        let service = LlmService::new(Box::new(MockLlmClient::new()));
        let intent = service
            .classify_question_intent("Tell me a joke", &sample_schema())
            .await
            .unwrap();

        assert!(!intent.is_database_related);
        assert!(intent.suggested_response.is_some());
    }

    #[tokio::test]
    async fn test_analyze_data_returns_narrative() {
        let service = LlmService::new(Box::new(MockLlmClient::new()));
        let analysis = service
            .analyze_data("name | total\nAlice | 3", "totals?")
            .await
            .unwrap();

        assert!(!analysis.is_empty());
    }

    #[tokio::test]
    async fn test_classify_intent_rejects_malformed_verdict() {
        let client = MockLlmClient::new().with_response("question:", "not json at all");
        let service = LlmService::new(Box::new(client));
        let result = service
            .classify_question_intent("Question: anything", &sample_schema())
            .await;

        assert!(result.is_err());
    }
}
