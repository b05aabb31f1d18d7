//! Mock database clients for testing.
//!
//! Provides in-memory implementations of `DatabaseClient` so the pipeline
//! can be exercised without a running PostgreSQL server.

use super::{ColumnInfo, ColumnMeta, DatabaseClient, QueryResult, SchemaInfo, TableInfo, Value};
use crate::error::{AskdbError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// A mock database client that returns predefined results.
pub struct MockDatabaseClient {
    schema: SchemaInfo,
}

impl MockDatabaseClient {
    /// Creates a mock client with a small sample schema (users + orders).
    pub fn new() -> Self {
        let mut schema = SchemaInfo::new();
        schema.insert_table(
            "users",
            TableInfo::new(vec![
                ColumnMeta::new("id", "integer").primary_key(),
                ColumnMeta::new("email", "varchar"),
                ColumnMeta::new("name", "varchar"),
            ]),
        );
        schema.insert_table(
            "orders",
            TableInfo::new(vec![
                ColumnMeta::new("id", "integer").primary_key(),
                ColumnMeta::new("user_id", "integer"),
                ColumnMeta::new("total", "numeric"),
            ]),
        );
        Self { schema }
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn introspect_schema(&self) -> Result<SchemaInfo> {
        Ok(self.schema.clone())
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if sql.trim_start().to_uppercase().starts_with("SELECT") {
            let columns = vec![
                ColumnInfo::new("name", "varchar"),
                ColumnInfo::new("total", "numeric"),
            ];
            let rows = vec![
                vec![Value::String("Alice".to_string()), Value::Float(120.0)],
                vec![Value::String("Bob".to_string()), Value::Float(87.5)],
            ];
            let mut result = QueryResult::with_data(columns, rows);
            result.execution_time = Duration::from_millis(1);
            Ok(result)
        } else {
            Err(AskdbError::query(format!(
                "Only SELECT statements are supported, got: {sql}"
            )))
        }
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A database client where every operation fails.
///
/// Used to exercise the pipeline's error short-circuiting.
pub struct FailingDatabaseClient {
    message: String,
}

impl FailingDatabaseClient {
    /// Creates a failing client with the given error message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DatabaseClient for FailingDatabaseClient {
    async fn introspect_schema(&self) -> Result<SchemaInfo> {
        Err(AskdbError::connection(self.message.clone()))
    }

    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(AskdbError::query(self.message.clone()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
