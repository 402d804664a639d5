//! Chat-completions request payload and response extraction

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::message::Message;
use crate::Result;

/// Body of a `POST /chat/completions` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<Message>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, temperature: f32, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            temperature,
            messages,
        }
    }
}

/// Pull the first choice's message content out of a raw response body.
///
/// Missing `choices`, an empty or non-array `choices`, a missing `message`
/// or a missing `content` all yield an empty string. A blank body does too.
/// Scalar `content` (number, boolean) is rendered as its JSON text; `null`,
/// arrays and objects yield an empty string. Only a body that is not JSON
/// is an error.
pub fn extract_content(body: &str) -> Result<String> {
    if body.trim().is_empty() {
        return Ok(String::new());
    }

    let root: Value = serde_json::from_str(body)?;
    let content = root
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"));

    Ok(match content {
        Some(Value::String(text)) => text.clone(),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => scalar.to_string(),
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TonepickerError;

    #[test]
    fn request_serializes_in_wire_shape() {
        let request = ChatRequest::new(
            "mistral-small",
            0.3,
            vec![Message::system("sys"), Message::user("usr")],
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "mistral-small");
        assert!((json["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "usr");
    }

    #[test]
    fn extracts_first_choice() {
        let body = r#"{"choices":[{"message":{"content":"Hello there"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "Hello there");
    }

    #[test]
    fn missing_pieces_degrade_to_empty() {
        assert_eq!(extract_content(r#"{"id":"x"}"#).unwrap(), "");
        assert_eq!(extract_content(r#"{"choices":[]}"#).unwrap(), "");
        assert_eq!(extract_content(r#"{"choices":"nope"}"#).unwrap(), "");
        assert_eq!(extract_content(r#"{"choices":[{"index":0}]}"#).unwrap(), "");
        assert_eq!(extract_content(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap(), "");
        assert_eq!(extract_content(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap(), "");
        assert_eq!(extract_content("").unwrap(), "");
    }

    #[test]
    fn scalar_content_is_rendered_as_text() {
        assert_eq!(extract_content(r#"{"choices":[{"message":{"content":42}}]}"#).unwrap(), "42");
        assert_eq!(extract_content(r#"{"choices":[{"message":{"content":1.5}}]}"#).unwrap(), "1.5");
        assert_eq!(extract_content(r#"{"choices":[{"message":{"content":true}}]}"#).unwrap(), "true");
        assert_eq!(extract_content(r#"{"choices":[{"message":{"content":["a"]}}]}"#).unwrap(), "");
        assert_eq!(extract_content(r#"{"choices":[{"message":{"content":{"a":1}}}]}"#).unwrap(), "");
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = extract_content("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, TonepickerError::Parse(_)));
        assert!(err.is_upstream());
    }
}
