//! Shared pipeline state.
//!
//! A single [`PipelineState`] record is constructed per incoming question,
//! threaded through every stage, and returned to the caller. Fields are
//! written at most once by their owning stage. `error` is monotonic: once
//! set it is never cleared and every downstream stage becomes a no-op.

use serde::{Deserialize, Serialize};

use crate::db::{QueryResult, SchemaInfo};
use crate::viz::ChartSpec;

/// Intent classification verdict for a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionIntent {
    /// Whether the question can be answered by querying the database.
    pub is_database_related: bool,

    /// Classifier confidence in [0, 1].
    pub confidence: f64,

    /// Short explanation of the verdict.
    #[serde(default)]
    pub reasoning: String,

    /// Optional direct answer for non-database questions.
    #[serde(default)]
    pub suggested_response: Option<String>,
}

impl QuestionIntent {
    /// Creates a database-related verdict with the given confidence.
    pub fn database_related(confidence: f64) -> Self {
        Self {
            is_database_related: true,
            confidence,
            reasoning: String::new(),
            suggested_response: None,
        }
    }

    /// Creates an off-topic verdict with the given confidence.
    pub fn off_topic(confidence: f64) -> Self {
        Self {
            is_database_related: false,
            confidence,
            reasoning: String::new(),
            suggested_response: None,
        }
    }

    /// Sets the suggested response.
    pub fn with_suggested_response(mut self, response: impl Into<String>) -> Self {
        self.suggested_response = Some(response.into());
        self
    }
}

/// The mutable record threaded through every pipeline stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineState {
    /// The natural-language question. Set once at pipeline start.
    pub question: String,

    /// Table/column metadata. Written by the FetchSchema stage.
    pub schema_info: SchemaInfo,

    /// Intent verdict. Written by the ClassifyIntent stage.
    pub intent: Option<QuestionIntent>,

    /// Generated SQL. Written by the GenerateSql stage; empty until then.
    pub sql_query: String,

    /// Tabular results. Written by the ExecuteQuery stage; empty until then.
    pub query_results: QueryResult,

    /// Narrative analysis. Written by the AnalyzeResults stage, or by the
    /// ClassifyIntent stage when the question is off-topic.
    pub analysis: String,

    /// Chart suggestion. Written by the Visualize stage.
    pub visualization: Option<ChartSpec>,

    /// Stage-prefixed failure message. Once set, downstream stages no-op.
    pub error: Option<String>,
}

impl PipelineState {
    /// Creates a fresh state for the given question.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    /// Returns true if a stage has recorded a failure.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
