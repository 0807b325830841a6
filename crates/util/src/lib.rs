//! Shared helpers for the hllrcon console: path-parameter resolution,
//! request execution, response parsing, configuration loading and log
//! scrubbing.

pub mod config;
pub mod http;
mod path_processing;

use once_cell::sync::Lazy;
use regex::Regex;

pub use config::{ConfigError, ConsoleConfig};
pub use http::*;
pub use path_processing::{config_root, expand_tilde};

static SENSITIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization: )([\w\-\.=:/+]+)",
        r"(?i)(cookie: )([^\s;]+)",
        r"(?i)(hll_session=)([^\s;]+)",
        r#"(?i)("(?:password|session_id)"\s*:\s*)("[^"]*")"#,
        r"(?i)([A-Z0-9_]*?(KEY|TOKEN|SECRET|PASSWORD|SESSION)=)([^\s]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for re in SENSITIVE_PATTERNS.iter() {
        redacted = re
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}
