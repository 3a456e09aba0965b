//! Utilities for extracting structured data from oracle responses.
//!
//! Model responses often contain JSON wrapped in markdown code blocks or
//! mixed with explanatory text. This module provides robust extraction
//! utilities that handle the common response patterns.

use fresco_error::{FrescoResult, JsonError};
use serde::de::DeserializeOwned;

/// Extract JSON from a response that may contain markdown or extra text.
///
/// Tries multiple extraction strategies:
/// 1. Markdown code blocks: ```json ... ```
/// 2. Balanced braces: { ... }
/// 3. Balanced brackets: [ ... ]
///
/// # Errors
///
/// Returns an error if no valid JSON is found in the response.
///
/// # Examples
///
/// ```
/// use fresco_engine::extract_json;
///
/// let response = "Here's the data you requested:\n\
///     \n\
///     ```json\n\
///     {\"match_id\": 7, \"reason\": \"same person\"}\n\
///     ```\n";
///
/// let json = extract_json(response).unwrap();
/// assert!(json.contains("7"));
/// ```
pub fn extract_json(response: &str) -> FrescoResult<String> {
    if let Some(json) = extract_from_code_block(response, "json") {
        return Ok(json);
    }

    // Prefer whichever balanced structure appears first in the response.
    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');

    match (bracket_pos, brace_pos) {
        (Some(b_pos), Some(c_pos)) if b_pos < c_pos => {
            if let Some(json) = extract_balanced(response, '[', ']') {
                return Ok(json);
            }
            if let Some(json) = extract_balanced(response, '{', '}') {
                return Ok(json);
            }
        }
        (Some(_), None) => {
            if let Some(json) = extract_balanced(response, '[', ']') {
                return Ok(json);
            }
        }
        _ => {
            if let Some(json) = extract_balanced(response, '{', '}') {
                return Ok(json);
            }
            if let Some(json) = extract_balanced(response, '[', ']') {
                return Ok(json);
            }
        }
    }

    tracing::error!(
        response_length = response.len(),
        "No JSON found in oracle response"
    );

    Err(JsonError::new(format!(
        "No JSON found in response (length: {})",
        response.len()
    ))
    .into())
}

/// Extract and deserialize JSON from an oracle response in one step.
///
/// # Errors
///
/// Returns an error if no JSON is found or deserialization fails.
///
/// # Examples
///
/// ```
/// use fresco_engine::parse_json;
///
/// let reply = "```json\n[1, 2, 3]\n```";
/// let values: Vec<u32> = parse_json(reply).unwrap();
/// assert_eq!(values, vec![1, 2, 3]);
/// ```
pub fn parse_json<T: DeserializeOwned>(response: &str) -> FrescoResult<T> {
    let json = extract_json(response)?;
    serde_json::from_str(&json).map_err(|e| JsonError::new(e.to_string()).into())
}

/// Extract content from a markdown code block with the given language tag,
/// falling back to an untagged block.
fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let tagged = format!("```{}", language);
    let start = if let Some(pos) = response.find(&tagged) {
        pos + tagged.len()
    } else if let Some(pos) = response.find("```") {
        pos + 3
    } else {
        return None;
    };

    let rest = &response[start..];
    let end = rest.find("```")?;
    let content = rest[..end].trim();
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

/// Extract a balanced delimiter structure, respecting string literals.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in response[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + c.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}
