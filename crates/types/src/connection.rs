use serde::{Deserialize, Serialize};

/// Process-wide connection state as reported by the remote API.
///
/// Shape of `GET /api/v2/connection/status`:
/// `{"connected": bool, "host"?: string, "port"?: number}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl ConnectionStatus {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(host: impl Into<String>, port: u16) -> Self {
        Self {
            connected: true,
            host: Some(host.into()),
            port: Some(port),
        }
    }
}

/// Result of a successful `POST /api/v2/connect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectReceipt {
    pub status: ConnectionStatus,
    /// Session identifier echoed by the server; the credential itself travels
    /// in the `hll_session` cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Raw response body for presentation.
    pub body: String,
}
