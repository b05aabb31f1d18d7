//! Database schema types for askdb.
//!
//! Represents the structural metadata handed to the LLM-backed stages:
//! tables, their columns, and primary-key membership.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structural metadata for all queryable tables.
///
/// Tables are kept in a sorted map so prompt rendering is deterministic
/// across invocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaInfo {
    /// Table name -> table metadata.
    pub tables: BTreeMap<String, TableInfo>,
}

impl SchemaInfo {
    /// Creates a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no tables were discovered.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Returns the table names in sorted order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    /// Adds a table to the schema.
    pub fn insert_table(&mut self, name: impl Into<String>, table: TableInfo) {
        self.tables.insert(name.into(), table);
    }

    /// Formats the schema for inclusion in an LLM prompt.
    ///
    /// Primary-key columns are marked with a trailing asterisk:
    ///
    /// ```text
    /// Table: users
    /// Columns: id (integer*), email (varchar)
    /// ```
    pub fn format_for_prompt(&self) -> String {
        self.tables
            .iter()
            .map(|(name, table)| {
                let columns = table
                    .columns
                    .iter()
                    .map(|col| {
                        format!(
                            "{} ({}{})",
                            col.name,
                            col.data_type,
                            if col.primary_key { "*" } else { "" }
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Table: {name}\nColumns: {columns}\n")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Metadata for a single table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableInfo {
    /// Columns in ordinal order.
    pub columns: Vec<ColumnMeta>,
}

impl TableInfo {
    /// Creates a table description from its columns.
    pub fn new(columns: Vec<ColumnMeta>) -> Self {
        Self { columns }
    }
}

/// Metadata for a single column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name.
    pub name: String,

    /// Data type as reported by the database (e.g., "integer", "varchar").
    pub data_type: String,

    /// Whether the column is part of the table's primary key.
    pub primary_key: bool,
}

impl ColumnMeta {
    /// Creates a non-key column with the given name and data type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            primary_key: false,
        }
    }

    /// Marks the column as part of the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
}
