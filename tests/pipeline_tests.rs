//! End-to-end pipeline tests using the mock database and test doubles.
//!
//! These exercise the full stage ordering, the intent branch, and the
//! error-lock behavior without touching PostgreSQL or the OpenAI API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use askdb::db::{DatabaseClient, MockDatabaseClient, QueryResult, SchemaInfo};
use askdb::error::{AskdbError, Result};
use askdb::llm::{LlmService, MockLlmClient};
use askdb::pipeline::{
    IntentClassifier, Pipeline, QueryGenerator, QuestionIntent, ResultAnalyzer,
};
use askdb::viz::HeuristicVisualizer;

/// Database client that counts schema introspections, delegating to the mock.
struct CountingDatabaseClient {
    inner: MockDatabaseClient,
    introspections: Arc<AtomicUsize>,
}

#[async_trait]
impl DatabaseClient for CountingDatabaseClient {
    async fn introspect_schema(&self) -> Result<SchemaInfo> {
        self.introspections.fetch_add(1, Ordering::SeqCst);
        self.inner.introspect_schema().await
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        self.inner.execute_query(sql).await
    }

    async fn close(&self) -> Result<()> {
        self.inner.close().await
    }
}

/// Database client whose introspection always fails.
struct BrokenSchemaClient;

#[async_trait]
impl DatabaseClient for BrokenSchemaClient {
    async fn introspect_schema(&self) -> Result<SchemaInfo> {
        Err(AskdbError::connection("server closed the connection"))
    }

    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        panic!("execute_query must not run after a schema failure");
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

struct FixedClassifier(QuestionIntent);

#[async_trait]
impl IntentClassifier for FixedClassifier {
    async fn classify_question_intent(
        &self,
        _question: &str,
        _schema: &SchemaInfo,
    ) -> Result<QuestionIntent> {
        Ok(self.0.clone())
    }
}

struct FixedGenerator(&'static str);

#[async_trait]
impl QueryGenerator for FixedGenerator {
    async fn generate_sql_query(&self, _q: &str, _s: &SchemaInfo) -> Result<String> {
        Ok(self.0.to_string())
    }
}

struct FixedAnalyzer(&'static str);

#[async_trait]
impl ResultAnalyzer for FixedAnalyzer {
    async fn analyze_data(&self, _data: &str, _q: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Pipeline with a mock database and the full mock-LLM service stack.
fn mock_llm_pipeline(db: Arc<dyn DatabaseClient>, client: MockLlmClient) -> Pipeline {
    let service = Arc::new(LlmService::new(Box::new(client)));
    Pipeline::new(
        db,
        service.clone(),
        service.clone(),
        service,
        Arc::new(HeuristicVisualizer::new()),
    )
}

/// Pipeline with fixed collaborators for branch/error tests.
fn fixed_pipeline(db: Arc<dyn DatabaseClient>, intent: QuestionIntent) -> Pipeline {
    Pipeline::new(
        db,
        Arc::new(FixedClassifier(intent)),
        Arc::new(FixedGenerator("SELECT name, total FROM orders")),
        Arc::new(FixedAnalyzer("Two users account for all revenue.")),
        Arc::new(HeuristicVisualizer::new()),
    )
}

#[tokio::test]
async fn test_database_question_runs_all_stages() {
    let pipeline = mock_llm_pipeline(Arc::new(MockDatabaseClient::new()), MockLlmClient::new());

    let state = pipeline.process("What is the total revenue?").await;

    assert!(!state.has_error(), "unexpected error: {:?}", state.error);
    let intent = state.intent.expect("intent must be recorded");
    assert!(intent.is_database_related);
    assert!(intent.confidence > 0.7);
    assert!(!state.sql_query.is_empty());
    assert!(state.sql_query.to_uppercase().contains("SELECT"));
    assert!(!state.query_results.is_empty());
    assert!(!state.analysis.is_empty());
}

#[tokio::test]
async fn test_off_topic_question_short_circuits() {
    let pipeline = mock_llm_pipeline(Arc::new(MockDatabaseClient::new()), MockLlmClient::new());

    let state = pipeline.process("What's the weather today?").await;

    assert!(!state.has_error());
    let intent = state.intent.expect("intent must be recorded");
    assert!(!intent.is_database_related);
    // Query stages never ran.
    assert!(state.sql_query.is_empty());
    assert!(state.query_results.is_empty());
    assert!(state.visualization.is_none());
    // The user still gets a reply.
    assert!(!state.analysis.is_empty());
}

#[tokio::test]
async fn test_off_topic_uses_classifier_suggested_response() {
    let client = MockLlmClient::new().with_response(
        "weather",
        r#"{"is_database_related": false, "confidence": 0.9, "reasoning": "not about the data", "suggested_response": "I can't answer weather questions."}"#,
    );
    let pipeline = mock_llm_pipeline(Arc::new(MockDatabaseClient::new()), client);

    let state = pipeline.process("What's the weather today?").await;

    assert!(!state.has_error());
    assert_eq!(state.analysis, "I can't answer weather questions.");
    assert!(state.sql_query.is_empty());
}

#[tokio::test]
async fn test_low_confidence_off_topic_still_queries() {
    // Below-threshold off-topic verdicts proceed to SQL rather than guessing.
    let pipeline = fixed_pipeline(
        Arc::new(MockDatabaseClient::new()),
        QuestionIntent::off_topic(0.5),
    );

    let state = pipeline.process("hmm, sales I guess?").await;

    assert!(!state.has_error());
    assert_eq!(state.sql_query, "SELECT name, total FROM orders");
    assert!(!state.query_results.is_empty());
}

#[tokio::test]
async fn test_threshold_confidence_off_topic_still_queries() {
    // Exactly 0.7 is not enough to short-circuit.
    let pipeline = fixed_pipeline(
        Arc::new(MockDatabaseClient::new()),
        QuestionIntent::off_topic(0.7),
    );

    let state = pipeline.process("maybe about users?").await;

    assert!(!state.has_error());
    assert!(!state.sql_query.is_empty());
}

#[tokio::test]
async fn test_schema_failure_locks_pipeline() {
    let pipeline = fixed_pipeline(
        Arc::new(BrokenSchemaClient),
        QuestionIntent::database_related(0.95),
    );

    let state = pipeline.process("What is the total revenue?").await;

    let error = state.error.expect("expected a schema error");
    assert!(
        error.starts_with("Schema retrieval failed: "),
        "unexpected error: {error}"
    );
    // No later stage produced output.
    assert!(state.schema_info.is_empty());
    assert!(state.intent.is_none());
    assert!(state.sql_query.is_empty());
    assert!(state.query_results.is_empty());
    assert!(state.analysis.is_empty());
    assert!(state.visualization.is_none());
}

#[tokio::test]
async fn test_query_failure_reports_execution_stage() {
    // The mock database rejects non-SELECT statements.
    let pipeline = Pipeline::new(
        Arc::new(MockDatabaseClient::new()),
        Arc::new(FixedClassifier(QuestionIntent::database_related(0.95))),
        Arc::new(FixedGenerator("DROP TABLE users")),
        Arc::new(FixedAnalyzer("unused")),
        Arc::new(HeuristicVisualizer::new()),
    );

    let state = pipeline.process("delete everything").await;

    let error = state.error.expect("expected an execution error");
    assert!(
        error.starts_with("Query execution failed: "),
        "unexpected error: {error}"
    );
    // SQL generation succeeded before the failure.
    assert_eq!(state.sql_query, "DROP TABLE users");
    assert!(state.analysis.is_empty());
    assert!(state.visualization.is_none());
}

#[tokio::test]
async fn test_schema_is_fetched_on_every_run() {
    let introspections = Arc::new(AtomicUsize::new(0));
    let db = Arc::new(CountingDatabaseClient {
        inner: MockDatabaseClient::new(),
        introspections: introspections.clone(),
    });
    let pipeline = mock_llm_pipeline(db, MockLlmClient::new());

    pipeline.process("How many users are there?").await;
    pipeline.process("How many users are there?").await;
    pipeline.process("What is the total revenue?").await;

    assert_eq!(introspections.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_successful_run_suggests_chart() {
    // The mock database returns (name varchar, total numeric) rows, which
    // the heuristics map to a bar chart.
    let pipeline = mock_llm_pipeline(Arc::new(MockDatabaseClient::new()), MockLlmClient::new());

    let state = pipeline.process("What is the total revenue per user?").await;

    assert!(!state.has_error());
    let chart = state.visualization.expect("expected a chart suggestion");
    assert_eq!(chart.kind.as_str(), "bar");
    assert_eq!(chart.x, "name");
    assert_eq!(chart.y.as_deref(), Some("total"));
}

#[tokio::test]
async fn test_state_serializes_to_json() {
    let pipeline = mock_llm_pipeline(Arc::new(MockDatabaseClient::new()), MockLlmClient::new());

    let state = pipeline.process("What is the total revenue?").await;
    let json = serde_json::to_string(&state).unwrap();

    assert!(json.contains("\"question\""));
    assert!(json.contains("\"sql_query\""));
    assert!(json.contains("\"analysis\""));
    assert!(json.contains("\"error\":null"));
}
