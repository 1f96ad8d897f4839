//! Response normalizer: HTTP outcome -> payload or a single `ApiError`.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::ApiError;

const NOT_FOUND_MESSAGE: &str = "Resource not found. This could be due to an invalid UID, \
     non-existent environment, or missing permissions.";

/// Decode raw response text. Non-JSON bodies are kept as a string value.
pub fn read_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

/// Turn a completed exchange into the decoded payload or a normalized error.
pub fn normalize(status: u16, body: Option<Value>) -> Result<Value, ApiError> {
    if (200..400).contains(&status) {
        return Ok(body.unwrap_or(Value::Null));
    }

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = error_message(status, body.as_ref());
    Err(ApiError::Remote {
        status,
        message,
        body,
    })
}

/// Derive the user-facing message for a failed response.
pub fn error_message(status: StatusCode, body: Option<&Value>) -> String {
    let generic = format!("Request failed with status {}", status.as_u16());
    let derived = body.and_then(extract_message);
    let is_generic = derived.is_none();
    let message = derived.unwrap_or(generic);

    match status {
        StatusCode::UNAUTHORIZED => format!(
            "Authentication failed: {}. Please check your API key and management token.",
            message
        ),
        StatusCode::FORBIDDEN => format!(
            "Access forbidden: {}. Please check your management token permissions.",
            message
        ),
        StatusCode::UNPROCESSABLE_ENTITY => format!("Validation error: {}", message),
        StatusCode::NOT_FOUND if is_generic => NOT_FOUND_MESSAGE.to_string(),
        _ => message,
    }
}

/// First match wins: `error_message`, `error`, `errors[]`, `message`.
fn extract_message(body: &Value) -> Option<String> {
    let object = body.as_object()?;

    if let Some(msg) = object.get("error_message").and_then(non_empty_text) {
        return Some(msg);
    }
    if let Some(msg) = object.get("error").and_then(non_empty_text) {
        return Some(msg);
    }
    if let Some(errors) = object.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(|e| {
                    e.get("message")
                        .or_else(|| e.get("error_message"))
                        .and_then(non_empty_text)
                        .unwrap_or_else(|| text_of(e))
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Some(joined);
        }
    }
    object.get("message").and_then(non_empty_text)
}

fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(text_of(other)),
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message_for(status: u16, body: Value) -> String {
        normalize(status, Some(body)).unwrap_err().to_string()
    }

    #[test]
    fn test_success_passes_body_through() {
        let body = json!({"entries": [{"uid": "e1"}]});
        assert_eq!(normalize(200, Some(body.clone())).unwrap(), body);
        assert_eq!(normalize(304, None).unwrap(), Value::Null);
    }

    #[test]
    fn test_specific_404_message_is_kept() {
        assert_eq!(message_for(404, json!({"error_message": "X"})), "X");
    }

    #[test]
    fn test_generic_404_is_replaced() {
        assert_eq!(message_for(404, json!({})), NOT_FOUND_MESSAGE);
        assert_eq!(
            normalize(404, None).unwrap_err().to_string(),
            NOT_FOUND_MESSAGE
        );
    }

    #[test]
    fn test_401_is_augmented() {
        assert_eq!(
            message_for(401, json!({"error": "bad key"})),
            "Authentication failed: bad key. Please check your API key and management token."
        );
    }

    #[test]
    fn test_403_and_422_prefixes() {
        assert!(message_for(403, json!({"error_message": "nope"})).starts_with("Access forbidden: nope"));
        assert_eq!(
            message_for(422, json!({"error_message": "title is required"})),
            "Validation error: title is required"
        );
    }

    #[test]
    fn test_derivation_priority() {
        assert_eq!(
            message_for(400, json!({"error_message": "a", "error": "b", "message": "c"})),
            "a"
        );
        assert_eq!(message_for(400, json!({"error": "b", "message": "c"})), "b");
        assert_eq!(message_for(400, json!({"message": "c"})), "c");
        assert_eq!(
            message_for(500, json!({"unrelated": true})),
            "Request failed with status 500"
        );
    }

    #[test]
    fn test_errors_array_is_joined() {
        let body = json!({
            "errors": [
                {"message": "first"},
                {"error_message": "second"},
                "third",
                {"code": 7}
            ]
        });
        assert_eq!(message_for(400, body), r#"first; second; third; {"code":7}"#);
    }

    #[test]
    fn test_remote_error_keeps_status_and_body() {
        let body = json!({"error_message": "X", "error_code": 118});
        let err = normalize(404, Some(body.clone())).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.body(), Some(&body));
    }

    #[test]
    fn test_read_body() {
        assert_eq!(read_body(""), None);
        assert_eq!(read_body("  \n"), None);
        assert_eq!(read_body(r#"{"a":1}"#), Some(json!({"a": 1})));
        assert_eq!(
            read_body("<html>Bad Gateway</html>"),
            Some(Value::String("<html>Bad Gateway</html>".to_string()))
        );
    }

    #[test]
    fn test_non_json_error_body_falls_back_to_generic() {
        let body = read_body("<html>Bad Gateway</html>");
        assert_eq!(
            normalize(502, body).unwrap_err().to_string(),
            "Request failed with status 502"
        );
    }
}
