//! The question-processing pipeline.
//!
//! A fixed-stage workflow: FetchSchema -> ClassifyIntent -> (branch) ->
//! GenerateSql -> ExecuteQuery -> AnalyzeResults -> Visualize. One shared
//! [`PipelineState`] is threaded through the stages; the first failure is
//! recorded in the state and every later stage becomes a pass-through.
//!
//! Collaborators are injected as trait objects so the pipeline can run
//! against the real PostgreSQL/OpenAI backends or test doubles.

mod branch;
mod error;
mod state;

pub use branch::{decide_after_intent, BranchState, SHORT_CIRCUIT_CONFIDENCE};
pub use error::StageError;
pub use state::{PipelineState, QuestionIntent};

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::db::{DatabaseClient, SchemaInfo};
use crate::error::Result;
use crate::viz::Visualizer;

/// Decides whether a question needs database access.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classifies the question against the available schema.
    async fn classify_question_intent(
        &self,
        question: &str,
        schema: &SchemaInfo,
    ) -> Result<QuestionIntent>;
}

/// Turns a question plus schema into SQL text.
#[async_trait]
pub trait QueryGenerator: Send + Sync {
    /// Generates a SELECT statement answering the question.
    async fn generate_sql_query(&self, question: &str, schema: &SchemaInfo) -> Result<String>;
}

/// Turns rendered query results into a narrative.
#[async_trait]
pub trait ResultAnalyzer: Send + Sync {
    /// Analyzes the rendered result table in the context of the question.
    async fn analyze_data(&self, data: &str, question: &str) -> Result<String>;
}

/// The pipeline orchestrator.
///
/// Owns references to the external collaborators; stateless between calls.
/// Each invocation of [`Pipeline::process`] builds a fresh state, runs the
/// stages strictly in order, and returns the final state. Failures never
/// surface as `Err`; callers inspect `PipelineState::error`.
pub struct Pipeline {
    db: Arc<dyn DatabaseClient>,
    classifier: Arc<dyn IntentClassifier>,
    generator: Arc<dyn QueryGenerator>,
    analyzer: Arc<dyn ResultAnalyzer>,
    visualizer: Arc<dyn Visualizer>,
}

impl Pipeline {
    /// Creates a pipeline from already-resolved collaborators.
    pub fn new(
        db: Arc<dyn DatabaseClient>,
        classifier: Arc<dyn IntentClassifier>,
        generator: Arc<dyn QueryGenerator>,
        analyzer: Arc<dyn ResultAnalyzer>,
        visualizer: Arc<dyn Visualizer>,
    ) -> Self {
        Self {
            db,
            classifier,
            generator,
            analyzer,
            visualizer,
        }
    }

    /// Processes a natural-language question to completion.
    pub async fn process(&self, question: &str) -> PipelineState {
        let start = Instant::now();
        info!(question_len = question.len(), "Processing question");

        let mut state = PipelineState::new(question);

        self.fetch_schema(&mut state).await;
        self.classify_intent(&mut state).await;

        match decide_after_intent(&state) {
            BranchState::ShortCircuitEnd => {
                info!(
                    duration_ms = start.elapsed().as_millis(),
                    "Question classified as off-topic, skipping query stages"
                );
                return state;
            }
            BranchState::Failed => return state,
            BranchState::Pending | BranchState::ProceedToSql => {}
        }

        self.generate_sql(&mut state).await;
        self.execute_query(&mut state).await;
        self.analyze_results(&mut state).await;
        self.visualize(&mut state).await;

        info!(
            duration_ms = start.elapsed().as_millis(),
            failed = state.has_error(),
            "Pipeline complete"
        );
        state
    }

    async fn fetch_schema(&self, state: &mut PipelineState) {
        if state.has_error() {
            return;
        }
        debug!(stage = "fetch_schema", "Introspecting schema");
        match self.db.introspect_schema().await {
            Ok(schema) => state.schema_info = schema,
            Err(e) => state.error = Some(StageError::Schema(e.to_string()).to_string()),
        }
    }

    async fn classify_intent(&self, state: &mut PipelineState) {
        if state.has_error() {
            return;
        }
        debug!(stage = "classify_intent", "Classifying question intent");
        match self
            .classifier
            .classify_question_intent(&state.question, &state.schema_info)
            .await
        {
            Ok(intent) => {
                if !intent.is_database_related {
                    state.analysis = intent
                        .suggested_response
                        .clone()
                        .unwrap_or_else(|| off_topic_reply(&state.schema_info));
                }
                state.intent = Some(intent);
            }
            Err(e) => state.error = Some(StageError::Intent(e.to_string()).to_string()),
        }
    }

    async fn generate_sql(&self, state: &mut PipelineState) {
        if state.has_error() {
            return;
        }
        debug!(stage = "generate_sql", "Generating SQL");
        match self
            .generator
            .generate_sql_query(&state.question, &state.schema_info)
            .await
        {
            Ok(sql) => state.sql_query = sql,
            Err(e) => state.error = Some(StageError::SqlGeneration(e.to_string()).to_string()),
        }
    }

    async fn execute_query(&self, state: &mut PipelineState) {
        if state.has_error() {
            return;
        }
        debug!(stage = "execute_query", sql = %state.sql_query, "Executing query");
        match self.db.execute_query(&state.sql_query).await {
            Ok(results) => state.query_results = results,
            Err(e) => state.error = Some(StageError::QueryExecution(e.to_string()).to_string()),
        }
    }

    async fn analyze_results(&self, state: &mut PipelineState) {
        if state.has_error() {
            return;
        }
        debug!(
            stage = "analyze_results",
            rows = state.query_results.row_count,
            "Analyzing results"
        );
        let rendered = state.query_results.render_table();
        match self.analyzer.analyze_data(&rendered, &state.question).await {
            Ok(analysis) => state.analysis = analysis,
            Err(e) => state.error = Some(StageError::Analysis(e.to_string()).to_string()),
        }
    }

    async fn visualize(&self, state: &mut PipelineState) {
        if state.has_error() {
            return;
        }
        debug!(stage = "visualize", "Selecting chart");
        match self
            .visualizer
            .auto_visualize(&state.query_results, &state.question)
        {
            Ok(chart) => state.visualization = chart,
            Err(e) => state.error = Some(StageError::Visualization(e.to_string()).to_string()),
        }
    }
}

/// Fallback reply for off-topic questions when the classifier did not
/// supply its own, pointing the user at what the database can answer.
fn off_topic_reply(schema: &SchemaInfo) -> String {
    let tables = schema.table_names();
    if tables.is_empty() {
        "This question doesn't appear to be about the connected database.".to_string()
    } else {
        format!(
            "This question doesn't appear to be about the connected database. \
             I can answer questions about these tables: {}.",
            tables.join(", ")
        )
    }
}
