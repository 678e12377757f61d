//! Recovers a JSON object from model output that may be wrapped in prose or
//! markdown code fences.

use serde_json::Value;

/// Strips a leading ```` ``` ```` fence (with or without a language tag, any
/// case) and a trailing ```` ``` ```` fence.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
            .unwrap_or(rest.len());
        text = rest[tag_len..].trim_start();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text
}

/// Slices from the first `{` to the last `}` (inclusive) after fence removal.
/// Returns `None` when there is no such pair.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let text = strip_code_fences(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// Extracts and parses the embedded object. Errors carry a short reason.
pub fn parse_json_object(text: &str) -> Result<Value, String> {
    let candidate = extract_json_object(text).ok_or_else(|| "no JSON object found".to_string())?;
    let value: Value = serde_json::from_str(candidate).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("top-level JSON value is not an object".to_string());
    }
    Ok(value)
}
