//! Shared type definitions for the hllrcon console.
//!
//! Command descriptors, collected values, outbound requests and their
//! outcomes, plus the message and effect vocabulary exchanged between the
//! interactive console and its command layer.

mod command;
mod connection;
mod request;
mod values;

pub use command::{Command, CommandId, Field, FieldKind, HttpMethod, Section, SelectOption, VisibilityRule};
pub use connection::{ConnectReceipt, ConnectionStatus};
pub use request::{DispatchOutcome, OutboundRequest};
pub use values::{CollectedValues, is_blank_value};

/// Result of an asynchronous operation started from the console.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    /// A command request completed (successfully or not).
    Dispatched {
        command: CommandId,
        label: String,
        outcome: DispatchOutcome,
    },
    /// Connect attempt finished; `Err` carries the user-facing failure text.
    Connected(Result<ConnectReceipt, String>),
    /// Disconnect attempt finished.
    Disconnected(Result<(), String>),
    /// Fresh connection status from the server.
    StatusRefreshed(ConnectionStatus),
    /// Map-name list loaded (or failed to load).
    MapsLoaded(Result<Vec<String>, String>),
    /// Free-form status line.
    Log(String),
}

/// Messages that can be sent to update the application state.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic UI tick (throbber)
    Tick,
    /// Terminal resized
    Resize(u16, u16),
    /// Background execution completed with outcome
    ExecCompleted(Box<ExecOutcome>),
}

/// Side effects requested by state changes and carried out by the command
/// layer.
#[derive(Clone, PartialEq)]
pub enum Effect {
    /// Issue a prepared command request.
    Dispatch {
        command: CommandId,
        label: String,
        request: OutboundRequest,
    },
    /// Establish a session with the remote server.
    Connect { host: String, port: u16, password: String },
    /// Tear down the current session.
    Disconnect,
    /// Re-read the connection status.
    RefreshStatus,
    /// Fetch the map-name catalog.
    LoadMaps,
    /// Put text on the system clipboard.
    CopyToClipboard(String),
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dispatch { command, label, request } => f
                .debug_struct("Dispatch")
                .field("command", command)
                .field("label", label)
                .field("request", request)
                .finish(),
            Self::Connect { host, port, .. } => f
                .debug_struct("Connect")
                .field("host", host)
                .field("port", port)
                .field("password", &"<redacted>")
                .finish(),
            Self::Disconnect => f.write_str("Disconnect"),
            Self::RefreshStatus => f.write_str("RefreshStatus"),
            Self::LoadMaps => f.write_str("LoadMaps"),
            Self::CopyToClipboard(text) => f.debug_tuple("CopyToClipboard").field(&text.len()).finish(),
        }
    }
}
