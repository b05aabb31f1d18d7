//! Response parsing for LLM outputs.
//!
//! The SQL generator answers in markdown code fences; the intent classifier
//! answers in JSON (sometimes fenced anyway). Both are normalized here.

use crate::error::{AskdbError, Result};
use crate::pipeline::QuestionIntent;

/// Extracts the SQL statement from a generation response.
///
/// Accepts ```sql fences, plain ``` fences, or bare SQL, and returns the
/// trimmed statement text.
pub fn extract_sql(response: &str) -> String {
    if let Some(block) = extract_code_block(response, "sql") {
        return block.trim().to_string();
    }
    if let Some(block) = extract_code_block(response, "") {
        return block.trim().to_string();
    }
    response.trim().to_string()
}

/// Parses the intent classifier's JSON verdict.
///
/// Tolerates fenced JSON and clamps the confidence into [0, 1].
pub fn parse_intent(response: &str) -> Result<QuestionIntent> {
    let body = extract_code_block(response, "json")
        .or_else(|| extract_code_block(response, ""))
        .unwrap_or_else(|| response.to_string());

    let mut intent: QuestionIntent = serde_json::from_str(body.trim())
        .map_err(|e| AskdbError::llm(format!("Malformed intent verdict: {e}")))?;

    intent.confidence = intent.confidence.clamp(0.0, 1.0);
    Ok(intent)
}

/// Extracts content from a markdown code block with the specified language.
///
/// Pass an empty string for `lang` to match blocks without a language
/// specifier.
fn extract_code_block(text: &str, lang: &str) -> Option<String> {
    let start_pattern = if lang.is_empty() {
        "```".to_string()
    } else {
        format!("```{}", lang)
    };

    let start_idx = text.find(&start_pattern)?;

    // Content begins after the newline that ends the opening fence.
    let content_start = text[start_idx + start_pattern.len()..]
        .find('\n')
        .map(|i| start_idx + start_pattern.len() + i + 1)?;

    // A bare ``` followed by text before the newline is a language-specific
    // block, not a generic one.
    if lang.is_empty() {
        let after_fence = &text[start_idx + 3..content_start - 1];
        if !after_fence.trim().is_empty() {
            return None;
        }
    }

    let end_idx = text[content_start..].find("```")?;
    Some(text[content_start..content_start + end_idx].to_string())
}
