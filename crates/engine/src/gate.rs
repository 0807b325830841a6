//! Process-wide connection state.
//!
//! [`ConnectionGate`] is the single producer: only the session operations
//! replace the state. Everything else receives a [`GateReader`].

use std::sync::{Arc, RwLock};

use hllrcon_types::ConnectionStatus;

#[derive(Debug, Clone, Default)]
pub struct ConnectionGate {
    state: Arc<RwLock<ConnectionStatus>>,
}

impl ConnectionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, status: ConnectionStatus) {
        match self.state.write() {
            Ok(mut guard) => *guard = status,
            Err(poisoned) => *poisoned.into_inner() = status,
        }
    }

    pub fn reader(&self) -> GateReader {
        GateReader {
            state: Arc::clone(&self.state),
        }
    }
}

/// Read-only view of the connection state.
#[derive(Debug, Clone)]
pub struct GateReader {
    state: Arc<RwLock<ConnectionStatus>>,
}

impl GateReader {
    pub fn status(&self) -> ConnectionStatus {
        match self.state.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status().connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readers_observe_replacements() {
        let gate = ConnectionGate::new();
        let reader = gate.reader();
        assert!(!reader.is_connected());

        gate.replace(ConnectionStatus::connected("10.0.0.5", 7779));
        assert!(reader.is_connected());
        assert_eq!(reader.status().port, Some(7779));

        gate.replace(ConnectionStatus::disconnected());
        assert_eq!(reader.status(), ConnectionStatus::disconnected());
    }
}
