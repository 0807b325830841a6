//! Connect, disconnect and status refresh.
//!
//! These are the only operations that replace the [`ConnectionGate`] state.
//! The session credential itself lives in the client's cookie jar.

use std::fmt;
use std::sync::Arc;

use hllrcon_types::{CollectedValues, ConnectReceipt, ConnectionStatus, DispatchOutcome, HttpMethod, OutboundRequest};
use hllrcon_util::{parse_response_json, parse_response_json_strict, pretty_json};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::gate::{ConnectionGate, GateReader};
use crate::transport::RequestTransport;

pub const CONNECT_PATH: &str = "/api/v2/connect";
pub const DISCONNECT_PATH: &str = "/api/v2/disconnect";
pub const STATUS_PATH: &str = "/api/v2/connection/status";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectInputError {
    #[error("Please enter the server host")]
    MissingHost,
    #[error("Invalid port '{0}': expected a number between 1 and 65535")]
    InvalidPort(String),
    #[error("Please enter the RCON password")]
    MissingPassword,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Error {status}:\n{body}")]
    Rejected { status: u16, body: String },
    #[error("Request failed: {0}")]
    Transport(String),
}

impl SessionError {
    /// Body of a 2xx outcome, or the error describing why there is none.
    fn check(outcome: DispatchOutcome) -> Result<String, Self> {
        match outcome {
            DispatchOutcome::Success { body, .. } => Ok(body),
            DispatchOutcome::HttpError { status, body } => Err(Self::Rejected {
                status,
                body: pretty_json(&body).unwrap_or(body),
            }),
            DispatchOutcome::TransportError { message } => Err(Self::Transport(message)),
        }
    }
}

/// Validated connect form input.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectParams {
    pub host: String,
    pub port: u16,
    pub password: String,
}

impl fmt::Debug for ConnectParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ConnectParams {
    pub fn parse(host: &str, port: &str, password: &str) -> Result<Self, ConnectInputError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ConnectInputError::MissingHost);
        }
        let port = port
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|port| *port > 0)
            .ok_or_else(|| ConnectInputError::InvalidPort(port.to_string()))?;
        if password.is_empty() {
            return Err(ConnectInputError::MissingPassword);
        }
        Ok(Self {
            host: host.to_string(),
            port,
            password: password.to_string(),
        })
    }
}

#[derive(Clone)]
pub struct SessionManager {
    transport: Arc<dyn RequestTransport>,
    gate: ConnectionGate,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn RequestTransport>, gate: ConnectionGate) -> Self {
        Self { transport, gate }
    }

    pub fn gate_reader(&self) -> GateReader {
        self.gate.reader()
    }

    /// `POST /api/v2/connect`. On success the gate becomes connected to
    /// `host:port`; on failure it is left as it was.
    pub async fn connect(&self, params: &ConnectParams) -> Result<ConnectReceipt, SessionError> {
        let body: CollectedValues = [
            ("host".to_string(), Value::from(params.host.clone())),
            ("port".to_string(), Value::from(params.port)),
            ("password".to_string(), Value::from(params.password.clone())),
        ]
        .into_iter()
        .collect();
        let request = OutboundRequest::new(HttpMethod::Post, CONNECT_PATH).with_body(body);

        debug!(host = %params.host, port = params.port, "connecting");
        let body = SessionError::check(self.transport.send(&request).await).inspect_err(|error| {
            warn!(host = %params.host, port = params.port, error = %error, "connect failed");
        })?;

        let session_id = parse_response_json(&body)
            .as_ref()
            .and_then(|value| value.get("session_id"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let status = ConnectionStatus::connected(params.host.clone(), params.port);
        self.gate.replace(status.clone());
        info!(host = %params.host, port = params.port, "connected");

        Ok(ConnectReceipt { status, session_id, body })
    }

    /// `POST /api/v2/disconnect`. The gate becomes disconnected on success.
    pub async fn disconnect(&self) -> Result<(), SessionError> {
        let outcome = self.transport.send(&OutboundRequest::new(HttpMethod::Post, DISCONNECT_PATH)).await;
        SessionError::check(outcome).inspect_err(|error| warn!(error = %error, "disconnect failed"))?;
        self.gate.replace(ConnectionStatus::disconnected());
        info!("disconnected");
        Ok(())
    }

    /// `GET /api/v2/connection/status`. Anything other than a well-formed 2xx
    /// status document counts as disconnected.
    pub async fn refresh_status(&self) -> ConnectionStatus {
        let outcome = self.transport.send(&OutboundRequest::new(HttpMethod::Get, STATUS_PATH)).await;
        let status = match outcome {
            DispatchOutcome::Success { status, body } => parse_response_json_strict::<ConnectionStatus>(&body, Some(status))
                .unwrap_or_else(|error| {
                    warn!(error = %error, "unreadable connection status");
                    ConnectionStatus::disconnected()
                }),
            DispatchOutcome::HttpError { status, .. } => {
                warn!(status, "connection status request rejected");
                ConnectionStatus::disconnected()
            }
            DispatchOutcome::TransportError { message } => {
                warn!(error = %message, "connection status unavailable");
                ConnectionStatus::disconnected()
            }
        };
        self.gate.replace(status.clone());
        status
    }
}
