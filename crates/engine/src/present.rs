use hllrcon_types::DispatchOutcome;
use hllrcon_util::pretty_json;

use crate::dispatch::DispatchError;

/// What the response pane shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// A request is outstanding.
    Pending(String),
    Info(String),
    /// Rendered as plain text, marked as an error.
    Error(String),
    /// Successful JSON body, re-indented.
    Json(String),
    /// Successful non-JSON body, verbatim.
    Text(String),
}

impl Presentation {
    pub fn pending(label: &str) -> Self {
        Self::Pending(format!("Executing {label}..."))
    }

    pub fn from_outcome(outcome: &DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::Success { body, .. } => match pretty_json(body) {
                Some(pretty) => Self::Json(pretty),
                None => Self::Text(body.clone()),
            },
            DispatchOutcome::HttpError { status, body } => {
                let rendered = pretty_json(body).unwrap_or_else(|| body.clone());
                Self::Error(format!("Error {status}:\n{rendered}"))
            }
            DispatchOutcome::TransportError { message } => Self::Error(format!("Request failed: {message}")),
        }
    }

    pub fn from_error(error: &DispatchError) -> Self {
        Self::Error(error.to_string())
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Pending(text) | Self::Info(text) | Self::Error(text) | Self::Json(text) | Self::Text(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl Default for Presentation {
    fn default() -> Self {
        Self::Info("Connect to your server to start executing commands".to_string())
    }
}
