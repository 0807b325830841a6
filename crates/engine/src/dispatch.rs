//! Request dispatch pipeline.
//!
//! gate check → collect → resolve route → place values → send
//!
//! GET requests carry the remaining values as a query string (declaration
//! order, empty and `null` values skipped); every other method carries them
//! as a JSON body. Exactly one request is issued per dispatch and nothing is
//! retried.

use std::sync::Arc;

use hllrcon_types::{CollectedValues, Command, DispatchOutcome, HttpMethod, OutboundRequest, is_blank_value};
use hllrcon_util::{PathResolutionError, resolve_route};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use url::form_urlencoded;

use crate::collect::{ValidationError, ValueSource, collect_values};
use crate::gate::GateReader;
use crate::transport::RequestTransport;

/// Reasons a dispatch stops before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Error: Not connected to server")]
    NotConnected,
    #[error("Error: {0}")]
    UnresolvedPathParameter(#[from] PathResolutionError),
}

#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn RequestTransport>,
    gate: GateReader,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn RequestTransport>, gate: GateReader) -> Self {
        Self { transport, gate }
    }

    pub fn gate(&self) -> &GateReader {
        &self.gate
    }

    /// Run every pre-network step and return the request that would be sent.
    pub fn prepare(&self, command: &Command, source: &impl ValueSource) -> Result<OutboundRequest, DispatchError> {
        if !self.gate.is_connected() {
            return Err(DispatchError::NotConnected);
        }
        let values = collect_values(command, source)?;
        Ok(build_request(command, values)?)
    }

    /// Send a prepared request.
    pub async fn send(&self, request: &OutboundRequest) -> DispatchOutcome {
        debug!(method = %request.method, path = %request.path, has_body = request.body.is_some(), "dispatching");
        let outcome = self.transport.send(request).await;
        info!(method = %request.method, path = %request.path, status = ?outcome.status(), success = outcome.is_success(), "dispatch finished");
        outcome
    }

    pub async fn dispatch(&self, command: &Command, source: &impl ValueSource) -> Result<DispatchOutcome, DispatchError> {
        let request = self.prepare(command, source)?;
        Ok(self.send(&request).await)
    }
}

/// Resolve the route and place the remaining values by method.
pub fn build_request(command: &Command, mut values: CollectedValues) -> Result<OutboundRequest, PathResolutionError> {
    let path = resolve_route(&command.path, &mut values)?;

    if values.is_empty() {
        return Ok(OutboundRequest::new(command.method, path));
    }

    match command.method {
        HttpMethod::Get => Ok(OutboundRequest::new(command.method, append_query(path, &values))),
        _ => Ok(OutboundRequest::new(command.method, path).with_body(values)),
    }
}

fn append_query(path: String, values: &CollectedValues) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in values.iter().filter(|(_, value)| !is_blank_value(value)) {
        serializer.append_pair(name, &query_text(value));
    }
    let query = serializer.finish();
    if query.is_empty() {
        return path;
    }
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{query}")
}

fn query_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::ProvidedValues;
    use crate::form::ControlSet;
    use crate::gate::ConnectionGate;
    use crate::transport::testing::RecordingTransport;
    use hllrcon_registry::CommandRegistry;
    use hllrcon_types::{ConnectionStatus, Field};
    use serde_json::json;

    fn builtin(name: &str) -> Command {
        CommandRegistry::builtin()
            .find_by_name(name)
            .map(|(_, command)| command.clone())
            .expect("command in catalog")
    }

    fn provided(pairs: &[(&str, &str)]) -> ProvidedValues {
        pairs.iter().map(|(name, value)| (name.to_string(), value.to_string())).collect()
    }

    fn connected_dispatcher(transport: Arc<RecordingTransport>) -> Dispatcher {
        let gate = ConnectionGate::new();
        gate.replace(ConnectionStatus::connected("10.0.0.5", 7779));
        Dispatcher::new(transport, gate.reader())
    }

    #[test]
    fn get_values_become_query_in_declaration_order() {
        let command = builtin("GetServerInformation");
        let mut set = ControlSet::render(&command, None);
        set.select_value("type", "player").expect("select");
        set.set_text("value", "76561198123456789").expect("type");

        let dispatcher = connected_dispatcher(Arc::new(RecordingTransport::default()));
        let request = dispatcher.prepare(&command, &set).expect("prepare");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/api/v2/server?type=player&value=76561198123456789");
        assert_eq!(request.body, None);
    }

    #[test]
    fn get_skips_blank_values_and_extends_existing_query() {
        let command = builtin("GetServerInformation");
        let request = build_request(
            &command,
            [("type".to_string(), json!("session")), ("value".to_string(), json!(""))]
                .into_iter()
                .collect(),
        )
        .expect("build");
        assert_eq!(request.path, "/api/v2/server?type=session");

        let command = Command::new("Sample", HttpMethod::Get, "/api/v2/bans?type=temp", "").with_fields(vec![Field::number("limit")]);
        let request = build_request(&command, [("limit".to_string(), json!(5))].into_iter().collect()).expect("build");
        assert_eq!(request.path, "/api/v2/bans?type=temp&limit=5");

        let request = build_request(&command, [("limit".to_string(), Value::Null)].into_iter().collect()).expect("build");
        assert_eq!(request.path, "/api/v2/bans?type=temp");
    }

    #[test]
    fn query_values_are_form_encoded() {
        let command = Command::new("Sample", HttpMethod::Get, "/api/v2/command-reference", "").with_fields(vec![Field::text("command")]);
        let request = build_request(&command, [("command".to_string(), json!("Add Admin&x"))].into_iter().collect()).expect("build");
        assert_eq!(request.path, "/api/v2/command-reference?command=Add+Admin%26x");
    }

    #[test]
    fn post_values_become_json_body_and_path_is_unchanged() {
        let command = builtin("PunishPlayer");
        let dispatcher = connected_dispatcher(Arc::new(RecordingTransport::default()));
        let request = dispatcher
            .prepare(&command, &provided(&[("player_id", "76561198123456789"), ("reason", "Team killing")]))
            .expect("prepare");

        assert_eq!(request.path, "/api/v2/punish");
        let body = serde_json::to_string(&request.body.expect("body")).expect("serialize");
        assert_eq!(body, r#"{"player_id":"76561198123456789","reason":"Team killing"}"#);
    }

    #[test]
    fn id_placeholder_consumes_player_id() {
        let command = builtin("MessagePlayer");
        let dispatcher = connected_dispatcher(Arc::new(RecordingTransport::default()));
        let request = dispatcher
            .prepare(&command, &provided(&[("player_id", "76561198123456789"), ("message", "Hello")]))
            .expect("prepare");

        assert_eq!(request.path, "/api/v2/players/76561198123456789/message");
        let body = request.body.expect("body");
        assert!(!body.contains("player_id"));
        assert_eq!(body.get("message"), Some(&json!("Hello")));
    }

    #[test]
    fn commands_without_fields_send_no_body() {
        let command = builtin("GetAdminUsers");
        let request = build_request(&command, CollectedValues::new()).expect("build");
        assert_eq!(request, OutboundRequest::new(HttpMethod::Get, "/api/v2/admins"));

        let command = builtin("ResetVoteKickThreshold");
        let request = build_request(&command, CollectedValues::new()).expect("build");
        assert_eq!(request.body, None);
    }

    #[test]
    fn delete_sends_json_body() {
        let command = builtin("RemoveVip");
        let request = build_request(&command, [("player_id".to_string(), json!("1"))].into_iter().collect()).expect("build");
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.path, "/api/v2/vips");
        assert!(request.body.is_some());
    }

    #[tokio::test]
    async fn invalid_number_blocks_dispatch_without_network() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = connected_dispatcher(Arc::clone(&transport));

        let result = dispatcher.dispatch(&builtin("SetVipSlotCount"), &provided(&[("vip_slot_count", "abc")])).await;

        assert!(matches!(result, Err(DispatchError::Validation(_))), "{result:?}");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn disconnected_gate_blocks_dispatch_without_network() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = Dispatcher::new(transport.clone(), ConnectionGate::new().reader());

        let result = dispatcher.dispatch(&builtin("GetAdminUsers"), &provided(&[])).await;

        assert_eq!(result, Err(DispatchError::NotConnected));
        assert_eq!(DispatchError::NotConnected.to_string(), "Error: Not connected to server");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn unresolved_placeholder_blocks_dispatch_without_network() {
        let transport = Arc::new(RecordingTransport::default());
        let dispatcher = connected_dispatcher(Arc::clone(&transport));

        let result = dispatcher.dispatch(&builtin("MessagePlayer"), &provided(&[("message", "Hello")])).await;

        assert!(matches!(result, Err(DispatchError::UnresolvedPathParameter(_))), "{result:?}");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn issues_exactly_one_request_and_returns_outcome() {
        let transport = Arc::new(RecordingTransport::replying([DispatchOutcome::from_status(500, r#"{"error":"boom"}"#.into())]));
        let dispatcher = connected_dispatcher(Arc::clone(&transport));

        let outcome = dispatcher
            .dispatch(&builtin("KickPlayer"), &provided(&[("player_id", "1"), ("reason", "Griefing")]))
            .await
            .expect("dispatch");

        assert_eq!(outcome.status(), Some(500));
        assert!(!outcome.is_success());
        let requests = transport.requests();
        assert_eq!(requests.len(), 1, "no retries");
        assert_eq!(requests[0].path, "/api/v2/kick");
    }
}
