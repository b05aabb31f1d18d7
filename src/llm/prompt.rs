//! Prompt construction for the LLM-backed stages.
//!
//! Three tasks share the same shape: a task-specific system prompt plus a
//! user message carrying the question and whatever context the task needs
//! (schema or rendered results).

use crate::db::SchemaInfo;
use crate::llm::types::Message;

/// System prompt for SQL generation.
const SQL_SYSTEM_PROMPT: &str = "\
You are an expert SQL analyst. Convert natural language questions to PostgreSQL queries.

Rules:
- Generate ONLY valid PostgreSQL syntax
- Limit results to 1000 rows maximum
- Only use SELECT statements (no INSERT, UPDATE, DELETE)
- Use table and column names exactly as shown in the schema
- Do NOT use schema prefixes in table names
- Return ONLY the SQL query, wrapped in a ```sql code block";

/// System prompt for intent classification.
const INTENT_SYSTEM_PROMPT: &str = "\
You decide whether a user question can be answered by querying a SQL database.

Respond with a single JSON object, no other text:
{
  \"is_database_related\": true or false,
  \"confidence\": number between 0 and 1,
  \"reasoning\": \"one sentence explaining the verdict\",
  \"suggested_response\": \"only for non-database questions: a short reply to show the user, or null\"
}

A question is database-related when the listed tables could plausibly answer it.";

/// System prompt for result analysis.
const ANALYSIS_SYSTEM_PROMPT: &str = "\
You are a data analyst providing insights from query results.

Analyze the data and provide:
1. Key findings
2. Patterns or trends
3. Notable insights
4. Summary statistics if relevant

Keep the response concise but informative.";

/// Builds the message pair for SQL generation.
pub fn sql_generation_messages(question: &str, schema: &SchemaInfo) -> Vec<Message> {
    let user = format!(
        "Question: {question}\n\nDatabase Schema:\n{}\n\nConvert this to a PostgreSQL query.",
        schema.format_for_prompt()
    );
    vec![Message::system(SQL_SYSTEM_PROMPT), Message::user(user)]
}

/// Builds the message pair for intent classification.
pub fn intent_messages(question: &str, schema: &SchemaInfo) -> Vec<Message> {
    let user = format!(
        "Question: {question}\n\nAvailable tables:\n{}",
        schema.format_for_prompt()
    );
    vec![Message::system(INTENT_SYSTEM_PROMPT), Message::user(user)]
}

/// Builds the message pair for result analysis.
pub fn analysis_messages(question: &str, data: &str) -> Vec<Message> {
    let user = format!(
        "Question: {question}\n\nData Results:\n{data}\n\nAnalyze this data and provide comprehensive insights."
    );
    vec![Message::system(ANALYSIS_SYSTEM_PROMPT), Message::user(user)]
}

/// Truncates rendered result data so the analysis prompt stays within the
/// model's context budget.
///
/// Prefers cutting at a line break so no row is split mid-way, and appends
/// a note describing the truncation.
pub fn truncate_for_analysis(data: &str, max_chars: usize) -> String {
    if data.len() <= max_chars {
        return data.to_string();
    }

    let mut cut = max_chars;
    while !data.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut truncated = &data[..cut];

    // Only back up to the previous newline if it doesn't cost too much.
    if let Some(last_newline) = truncated.rfind('\n') {
        if last_newline as f64 > max_chars as f64 * 0.8 {
            truncated = &truncated[..last_newline];
        }
    }

    format!(
        "{truncated}\n\n[Note: Data truncated for analysis. Showing first {} characters of {} total characters.]",
        truncated.len(),
        data.len()
    )
}
