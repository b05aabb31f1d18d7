//! Stage-scoped pipeline failures.
//!
//! Every collaborator fault is caught at its stage boundary and converted
//! into one of these variants; the rendered message is stored in
//! `PipelineState.error` and never re-raised to the caller.

use thiserror::Error;

/// A failure attributed to a specific pipeline stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// The schema provider could not be reached or introspection failed.
    #[error("Schema retrieval failed: {0}")]
    Schema(String),

    /// The intent classifier call or verdict parsing failed.
    #[error("Intent classification failed: {0}")]
    Intent(String),

    /// The query generator call failed.
    #[error("SQL generation failed: {0}")]
    SqlGeneration(String),

    /// The database rejected or failed to run the generated SQL.
    #[error("Query execution failed: {0}")]
    QueryExecution(String),

    /// The result analyzer call failed.
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// Chart selection raised a fault (distinct from "no chart fits").
    #[error("Visualization failed: {0}")]
    Visualization(String),
}

impl StageError {
    /// Returns the name of the failing stage.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Schema(_) => "fetch_schema",
            Self::Intent(_) => "classify_intent",
            Self::SqlGeneration(_) => "generate_sql",
            Self::QueryExecution(_) => "execute_query",
            Self::Analysis(_) => "analyze_results",
            Self::Visualization(_) => "visualize",
        }
    }
}
