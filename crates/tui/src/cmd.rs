//! # Command Execution Layer
//!
//! Translates [`Effect`]s requested by state changes into side effects:
//! HTTP calls through the engine, and clipboard writes. Network work is
//! spawned onto the Tokio runtime and reported back as [`ExecOutcome`]s; the
//! runtime feeds those into `App::update`.
//!
//! State updates stay pure; everything effectful happens here.

use arboard::Clipboard;
use hllrcon_engine::{ConnectParams, load_maps};
use hllrcon_types::{DispatchOutcome, Effect, ExecOutcome};
use tokio::task::{JoinHandle, spawn};
use tracing::{debug, warn};

use crate::app::App;

/// Outcomes produced while handling a batch of effects.
#[derive(Default)]
pub struct CommandBatch {
    /// Finished synchronously.
    pub immediate: Vec<ExecOutcome>,
    /// Spawned background work.
    pub pending: Vec<JoinHandle<ExecOutcome>>,
}

/// Carry out `effects`, spawning network work and running the rest inline.
pub fn run_from_effects(app: &mut App, effects: Vec<Effect>) -> CommandBatch {
    let mut batch = CommandBatch::default();

    for effect in effects {
        debug!(?effect, "running effect");
        match effect {
            Effect::Dispatch { command, label, request } => {
                let dispatcher = app.ctx.dispatcher.clone();
                // The inner task may fail; the outer one always reports the
                // command so its in-flight guard is released.
                batch.pending.push(spawn(async move {
                    let outcome = match spawn(async move { dispatcher.send(&request).await }).await {
                        Ok(outcome) => outcome,
                        Err(error) => {
                            warn!(command = %label, error = %error, "dispatch task failed");
                            DispatchOutcome::TransportError {
                                message: format!("request task failed: {error}"),
                            }
                        }
                    };
                    ExecOutcome::Dispatched { command, label, outcome }
                }));
            }
            Effect::Connect { host, port, password } => {
                let sessions = app.ctx.sessions.clone();
                let client = app.ctx.client.clone();
                let params = ConnectParams { host, port, password };
                batch.pending.push(spawn(async move {
                    let result = sessions.connect(&params).await;
                    if let Ok(receipt) = &result
                        && let Some(session_id) = receipt.session_id.as_deref()
                    {
                        // Some proxies strip Set-Cookie; the body carries the id too.
                        client.remember_session(session_id);
                    }
                    ExecOutcome::Connected(result.map_err(|error| error.to_string()))
                }));
            }
            Effect::Disconnect => {
                let sessions = app.ctx.sessions.clone();
                batch.pending.push(spawn(async move {
                    ExecOutcome::Disconnected(sessions.disconnect().await.map_err(|error| error.to_string()))
                }));
            }
            Effect::RefreshStatus => {
                let sessions = app.ctx.sessions.clone();
                batch
                    .pending
                    .push(spawn(async move { ExecOutcome::StatusRefreshed(sessions.refresh_status().await) }));
            }
            Effect::LoadMaps => {
                let client = app.ctx.client.clone();
                let maps = app.ctx.maps.clone();
                batch
                    .pending
                    .push(spawn(async move { ExecOutcome::MapsLoaded(load_maps(&client, &maps).await) }));
            }
            Effect::CopyToClipboard(text) => batch.immediate.push(copy_to_clipboard(text)),
        }
    }

    batch
}

fn copy_to_clipboard(text: String) -> ExecOutcome {
    match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => ExecOutcome::Log("Copied response to clipboard".to_string()),
        Err(error) => {
            warn!(error = %error, "clipboard write failed");
            ExecOutcome::Log(format!("Copy failed: {error}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use hllrcon_engine::{Dispatcher, RequestTransport};
    use hllrcon_types::{ConnectionStatus, HttpMethod, Msg, OutboundRequest};

    use super::*;
    use crate::app::tests_support::test_app_with_gate;

    struct FailingTransport;

    #[async_trait]
    impl RequestTransport for FailingTransport {
        async fn send(&self, _request: &OutboundRequest) -> DispatchOutcome {
            panic!("transport blew up");
        }
    }

    #[tokio::test]
    async fn failed_dispatch_task_releases_the_in_flight_guard() {
        let (mut app, gate) = test_app_with_gate();
        gate.replace(ConnectionStatus::connected("10.0.0.5", 7779));
        app.ctx.dispatcher = Dispatcher::new(Arc::new(FailingTransport), gate.reader());
        let (admins, _) = app.console.registry().find_by_name("GetAdminUsers").expect("command");
        app.in_flight.insert(admins);

        let batch = run_from_effects(
            &mut app,
            vec![Effect::Dispatch {
                command: admins,
                label: "GetAdminUsers".into(),
                request: OutboundRequest::new(HttpMethod::Get, "/api/v2/admins"),
            }],
        );
        let mut pending = batch.pending;
        assert_eq!(pending.len(), 1);
        let outcome = pending.remove(0).await.expect("reporting task completes");

        assert!(
            matches!(&outcome, ExecOutcome::Dispatched { command, outcome: DispatchOutcome::TransportError { .. }, .. } if *command == admins),
            "{outcome:?}"
        );
        app.update(&Msg::ExecCompleted(Box::new(outcome)));
        assert!(app.in_flight.is_empty());
    }
}
