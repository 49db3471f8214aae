//! Turns raw model text into an advice object

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// Remove a surrounding markdown code fence, with or without a language tag
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Language tag such as `json` runs up to the first non-alphanumeric
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        text = rest[tag_len..].trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text
}

/// Parse model output into a JSON object. The raw text is logged on failure
/// and never returned to the caller.
pub fn normalize(raw: &str) -> AppResult<Map<String, Value>> {
    let text = strip_code_fences(raw);

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(advice)) => Ok(advice),
        Ok(other) => {
            tracing::error!("Model returned JSON that is not an object: {}", other);
            Err(AppError::InvalidAiResponse)
        }
        Err(e) => {
            tracing::error!("Failed to parse AI response ({}): {}", e, raw);
            Err(AppError::InvalidAiResponse)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fenced_and_bare_parse_equal() {
        let bare = r#"{"recommendations": [], "generalAdvice": "Test soil yearly"}"#;
        let fenced = format!("```json\n{}\n```", bare);
        let untagged = format!("```\n{}\n```\n", bare);

        let expected = normalize(bare).unwrap();
        assert_eq!(normalize(&fenced).unwrap(), expected);
        assert_eq!(normalize(&untagged).unwrap(), expected);
    }

    #[test]
    fn test_fence_without_newline() {
        assert_eq!(strip_code_fences("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_prose_is_invalid() {
        assert!(matches!(
            normalize("Here are my recommendations: grow wheat."),
            Err(AppError::InvalidAiResponse)
        ));
    }

    #[test]
    fn test_non_object_json_is_invalid() {
        assert!(matches!(normalize("[1, 2, 3]"), Err(AppError::InvalidAiResponse)));
        assert!(matches!(normalize("\"text\""), Err(AppError::InvalidAiResponse)));
    }

    proptest! {
        #[test]
        fn prop_fencing_does_not_change_advice(
            advice in proptest::collection::btree_map("[a-zA-Z]{1,8}", "[ -~]{0,20}", 0..6),
        ) {
            let bare = serde_json::to_string(&advice).unwrap();
            let fenced = format!("```json\n{}\n```", bare);

            let parsed = normalize(&bare).unwrap();
            prop_assert_eq!(&normalize(&fenced).unwrap(), &parsed);
            prop_assert_eq!(parsed.len(), advice.len());
        }
    }
}
