use hllrcon_types::CollectedValues;
use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// `:identifier` tokens inside a route template.
static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder pattern compiles"));

/// Everything except RFC 3986 unreserved bytes is percent-encoded.
const PATH_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Placeholder names that are filled from a differently named field.
const PLACEHOLDER_ALIASES: &[(&str, &str)] = &[("id", "player_id")];

/// A route placeholder had no usable value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing value for path parameter ':{placeholder}' in {template}")]
pub struct PathResolutionError {
    pub placeholder: String,
    pub template: String,
}

/// Names of the `:identifier` placeholders in `template`, in order.
pub fn route_placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER_PATTERN
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Field names that can satisfy a placeholder: the alias target first, then
/// the placeholder's own name.
pub fn placeholder_candidates(placeholder: &str) -> Vec<&str> {
    let mut candidates: Vec<&str> = PLACEHOLDER_ALIASES
        .iter()
        .filter(|(alias, _)| *alias == placeholder)
        .map(|(_, field)| *field)
        .collect();
    candidates.push(placeholder);
    candidates
}

/// Resolves a route template against collected values.
///
/// Each `:identifier` token is replaced by the percent-encoded string form of
/// the matching value and that value is removed from `values`, so it is not
/// serialized again as a query parameter or body member. A value that is
/// missing, `null` or an empty string leaves the token unresolved, which is an
/// error.
///
/// # Examples
/// ```ignore
/// let mut values: CollectedValues = [
///     ("player_id".to_string(), json!("76561198123456789")),
///     ("message".to_string(), json!("hi")),
/// ].into_iter().collect();
///
/// let path = resolve_route("/api/v2/players/:id/message", &mut values)?;
/// assert_eq!(path, "/api/v2/players/76561198123456789/message");
/// assert!(!values.contains("player_id"));
/// ```
pub fn resolve_route(template: &str, values: &mut CollectedValues) -> Result<String, PathResolutionError> {
    let mut resolved = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER_PATTERN.captures_iter(template) {
        let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        resolved.push_str(&template[last..token.start()]);

        let key = placeholder_candidates(name.as_str())
            .into_iter()
            .find(|candidate| values.get(candidate).and_then(path_value_text).is_some())
            .ok_or_else(|| PathResolutionError {
                placeholder: name.as_str().to_string(),
                template: template.to_string(),
            })?;
        let text = values.take(key).as_ref().and_then(path_value_text).unwrap_or_default();
        resolved.push_str(&utf8_percent_encode(&text, PATH_VALUE).to_string());

        last = token.end();
    }

    resolved.push_str(&template[last..]);
    Ok(resolved)
}

fn path_value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
