//! Reply text extraction from the remote payload.
//!
//! The remote service has answered in several shapes over time, so each
//! known shape gets an accessor and the first non-empty result wins.

use serde_json::Value;

type Accessor = fn(&Value) -> Option<String>;

/// Accessors in priority order.
const SHAPES: &[(&str, Accessor)] = &[
    ("candidates", gemini_candidates),
    ("choices", openai_choices),
    ("response", response_field),
    ("reply", reply_field),
    ("content", content_field),
    ("text", text_field),
    ("bare", bare_string),
];

pub fn extract_reply_text(payload: &Value) -> Option<String> {
    SHAPES.iter().find_map(|(name, accessor)| {
        let text = accessor(payload)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        tracing::trace!(shape = name, "extracted reply text");
        Some(trimmed.to_string())
    })
}

fn gemini_candidates(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    Some(text)
}

fn openai_choices(payload: &Value) -> Option<String> {
    payload
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

fn response_field(payload: &Value) -> Option<String> {
    string_field(payload, "response")
}

fn reply_field(payload: &Value) -> Option<String> {
    string_field(payload, "reply")
}

fn content_field(payload: &Value) -> Option<String> {
    string_field(payload, "content")
}

fn text_field(payload: &Value) -> Option<String> {
    string_field(payload, "text")
}

fn bare_string(payload: &Value) -> Option<String> {
    payload.as_str().map(str::to_string)
}

fn string_field(payload: &Value, field: &str) -> Option<String> {
    payload.get(field)?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gemini_parts_are_joined_and_trimmed() {
        let payload = json!({
            "candidates": [{"content": {"parts": [{"text": " Sure, "}, {"text": "how can I help? \n"}]}}]
        });
        assert_eq!(
            extract_reply_text(&payload).as_deref(),
            Some("Sure, how can I help?")
        );
    }

    #[test]
    fn alternate_shapes_are_recognized() {
        let cases = [
            json!({"choices": [{"message": {"content": "openai"}}]}),
            json!({"response": "route"}),
            json!({"reply": "widget"}),
            json!({"content": "content-only"}),
            json!({"text": "text-only"}),
            json!("bare string"),
        ];
        let expected = ["openai", "route", "widget", "content-only", "text-only", "bare string"];
        for (payload, want) in cases.iter().zip(expected) {
            assert_eq!(extract_reply_text(payload).as_deref(), Some(want));
        }
    }

    #[test]
    fn empty_candidate_falls_through_to_later_shape() {
        let payload = json!({
            "candidates": [{"content": {"parts": [{"text": "  "}]}}],
            "response": "from response field"
        });
        assert_eq!(
            extract_reply_text(&payload).as_deref(),
            Some("from response field")
        );
    }

    #[test]
    fn unknown_or_empty_shapes_yield_none() {
        assert_eq!(extract_reply_text(&json!({"candidates": []})), None);
        assert_eq!(extract_reply_text(&json!({"promptFeedback": {"blockReason": "SAFETY"}})), None);
        assert_eq!(extract_reply_text(&json!({"reply": 42})), None);
        assert_eq!(extract_reply_text(&Value::Null), None);
    }
}
