//! JSON extraction from free-form provider output.
//!
//! Providers wrap results in markdown fences or prose. Extraction tries a
//! fenced code block first; otherwise it scans from the first opening
//! delimiter, tracking bracket/brace depth with string and escape
//! awareness, until the value balances.

use thiserror::Error;

/// Errors from JSON extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No JSON found in text")]
    NoJsonFound,

    #[error("Unbalanced JSON delimiters")]
    Unbalanced,

    #[error("Candidate is not valid JSON: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Locate and parse a single JSON value inside possibly fenced or
/// prose-wrapped text.
pub fn extract_json(text: &str) -> Result<serde_json::Value, ExtractionError> {
    if let Some(inner) = fenced_block(text) {
        if let Ok(value) = scan_balanced(inner) {
            return Ok(value);
        }
    }
    scan_balanced(text)
}

/// Content of the first fenced code block, if any. The language tag on the
/// opening fence (e.g. ```json) is skipped.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    let body_start = after_fence.find('\n').map_or(after_fence.len(), |i| i + 1);
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// Scan from the first `{` or `[` until the delimiters balance, then parse
/// the slice.
fn scan_balanced(text: &str) -> Result<serde_json::Value, ExtractionError> {
    let start = text
        .find(['{', '['])
        .ok_or(ExtractionError::NoJsonFound)?;

    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.checked_sub(1).ok_or(ExtractionError::Unbalanced)?;
                if depth == 0 {
                    let candidate = &text[start..=i];
                    return Ok(serde_json::from_str(candidate)?);
                }
            }
            _ => {}
        }
    }

    Err(ExtractionError::Unbalanced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fenced_json_block() {
        let text = "Here is the result:\n```json\n{\"a\":1}\n```\nDone.";
        assert_eq!(extract_json(text).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_fence_without_language_tag() {
        let text = "```\n[1, 2, 3]\n```";
        assert_eq!(extract_json(text).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_unfenced_array_after_prose() {
        let text = "The counts came out as [1,2,3] in the end.";
        assert_eq!(extract_json(text).unwrap(), json!([1, 2, 3]));
    }

    #[test]
    fn test_no_json_found() {
        let err = extract_json("nothing to see here").unwrap_err();
        assert!(matches!(err, ExtractionError::NoJsonFound));
    }

    #[test]
    fn test_unbalanced_brace() {
        let err = extract_json("partial output: {\"a\": 1").unwrap_err();
        assert!(matches!(err, ExtractionError::Unbalanced));
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let text = "{\"text\": \"uses } and { inside\", \"n\": 2}";
        let value = extract_json(text).unwrap();
        assert_eq!(value["n"], 2);
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let text = "prefix {\"quote\": \"she said \\\"hi\\\"\"} suffix";
        let value = extract_json(text).unwrap();
        assert_eq!(value["quote"], "she said \"hi\"");
    }

    #[test]
    fn test_nested_structures() {
        let text = "result: {\"outer\": {\"inner\": [1, {\"deep\": true}]}}";
        let value = extract_json(text).unwrap();
        assert_eq!(value["outer"]["inner"][1]["deep"], true);
    }

    #[test]
    fn test_invalid_candidate() {
        // Balances but is not valid JSON.
        let err = extract_json("{'a': 1}").unwrap_err();
        assert!(matches!(err, ExtractionError::Invalid(_)));
    }

    #[test]
    fn test_fence_with_prose_falls_back_to_scan() {
        // The fenced block has no JSON; the scan over the whole text
        // still finds the unfenced value.
        let text = "```\nplain text\n```\nbut also {\"b\": 2}";
        assert_eq!(extract_json(text).unwrap(), json!({"b": 2}));
    }
}
