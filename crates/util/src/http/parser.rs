//! Response body helpers: lenient and strict JSON parsing plus the stable
//! pretty-printed rendering used for presentation.

use serde_json::Value;
use thiserror::Error;

/// Parse response text as JSON, returning `None` when the body is not JSON.
///
/// # Example
/// ```rust
/// use hllrcon_util::http::parse_response_json;
///
/// assert!(parse_response_json(r#"{"name": "Carentan"}"#).is_some());
/// assert!(parse_response_json("OK").is_none());
/// ```
pub fn parse_response_json(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text).ok()
}

/// Re-serialize a JSON body with two-space indentation, or `None` when the
/// body is not JSON.
///
/// # Example
/// ```rust
/// use hllrcon_util::http::pretty_json;
///
/// assert_eq!(pretty_json(r#"{"a":1}"#).as_deref(), Some("{\n  \"a\": 1\n}"));
/// assert_eq!(pretty_json("OK"), None);
/// ```
pub fn pretty_json(text: &str) -> Option<String> {
    parse_response_json(text).and_then(|value| serde_json::to_string_pretty(&value).ok())
}

/// Parse HTTP response text into a typed value, providing detailed errors on
/// failure.
///
/// The error carries the status code and up to 200 characters of the body
/// (whitespace collapsed).
pub fn parse_response_json_strict<T: serde::de::DeserializeOwned>(text: &str, status: Option<u16>) -> Result<T, JsonParseError> {
    serde_json::from_str::<T>(text).map_err(|error| {
        let status_note = status
            .map(|code| format!("status {code}"))
            .unwrap_or_else(|| "unknown status".to_string());
        let preview = truncate_response_preview(text, 200);

        JsonParseError::new(status_note, error, preview)
    })
}

fn truncate_response_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

/// Error returned when strict JSON parsing of an HTTP response fails.
#[derive(Debug, Error)]
#[error("failed to parse JSON response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hllrcon_types::ConnectionStatus;

    #[test]
    fn pretty_json_uses_two_space_indentation() {
        let pretty = pretty_json(r#"{"players":[{"name":"Able","team":"Allies"}]}"#).expect("json body");
        assert_eq!(
            pretty,
            "{\n  \"players\": [\n    {\n      \"name\": \"Able\",\n      \"team\": \"Allies\"\n    }\n  ]\n}"
        );
    }

    #[test]
    fn non_json_bodies_are_not_parsed() {
        assert_eq!(pretty_json("OK"), None);
        assert_eq!(pretty_json(""), None);
    }

    #[test]
    fn strict_parse_reports_status_and_preview() {
        let error = parse_response_json_strict::<ConnectionStatus>("<html>\n<body>bad gateway</body>", Some(502)).expect_err("html is not json");
        let message = error.to_string();
        assert!(message.contains("status 502"), "{message}");
        assert_eq!(error.body_preview(), "<html> <body>bad gateway</body>");
    }

    #[test]
    fn strict_parse_decodes_typed_values() {
        let status: ConnectionStatus = parse_response_json_strict(r#"{"connected":true,"host":"h","port":1}"#, Some(200)).expect("parse");
        assert!(status.connected);
    }

    #[test]
    fn long_previews_are_truncated() {
        let body = "x".repeat(500);
        assert!(truncate_response_preview(&body, 200).ends_with("..."));
        assert_eq!(truncate_response_preview("   ", 200), "<empty>");
    }
}
