//! askdb - Ask questions about a PostgreSQL database in plain English.
//!
//! A natural-language question is run through a fixed pipeline: introspect
//! the schema, classify the question's intent, generate SQL with an LLM,
//! execute the query, summarize the results, and suggest a chart. Questions
//! unrelated to the database short-circuit to a direct reply.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod viz;
