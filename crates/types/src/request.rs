use serde::{Deserialize, Serialize};

use crate::{CollectedValues, HttpMethod};

/// A fully shaped request ready to be handed to a transport.
///
/// `path` is relative to the API base URL and already carries any query
/// string. `body` is present only for non-GET methods with remaining values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<CollectedValues>,
}

impl OutboundRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: CollectedValues) -> Self {
        self.body = Some(body);
        self
    }
}

/// Classified result of exactly one issued request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// 2xx response.
    Success { status: u16, body: String },
    /// Non-2xx response; status and body are surfaced verbatim.
    HttpError { status: u16, body: String },
    /// The request never produced a response (refused, DNS, timeout, ...).
    TransportError { message: String },
}

impl DispatchOutcome {
    pub fn from_status(status: u16, body: String) -> Self {
        if (200..300).contains(&status) {
            Self::Success { status, body }
        } else {
            Self::HttpError { status, body }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status, .. } | Self::HttpError { status, .. } => Some(*status),
            Self::TransportError { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_status_classifies_by_range() {
        assert!(DispatchOutcome::from_status(200, "{}".into()).is_success());
        assert!(DispatchOutcome::from_status(204, String::new()).is_success());
        assert_eq!(
            DispatchOutcome::from_status(401, "{}".into()),
            DispatchOutcome::HttpError {
                status: 401,
                body: "{}".into()
            }
        );
        assert!(!DispatchOutcome::from_status(302, String::new()).is_success());
    }
}
