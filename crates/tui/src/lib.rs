//! # hllrcon TUI
//!
//! Interactive console for the HLL RCON admin API. The screen has three
//! panes: a connection bar, the command accordion with its inline form, and
//! the response pane. Forms are rendered from the command registry and
//! requests go out through the engine's dispatcher, which refuses to send
//! while the connection gate is closed.

mod app;
mod cmd;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use hllrcon_api::ConsoleClient;
use hllrcon_engine::{ConnectionGate, Dispatcher, RequestTransport, SessionManager};
use hllrcon_registry::{CommandRegistry, MapCatalog};

use crate::app::{App, SharedCtx};

/// What the TUI needs from the caller.
pub struct TuiOptions {
    pub client: ConsoleClient,
    pub registry: Arc<CommandRegistry>,
    /// Prefill for the connect form.
    pub default_host: Option<String>,
    pub default_port: Option<u16>,
}

/// Run the TUI until the operator quits.
///
/// # Errors
///
/// Fails when the terminal cannot be put into (or restored from) raw mode
/// and the alternate screen.
pub async fn run(options: TuiOptions) -> Result<()> {
    let TuiOptions {
        client,
        registry,
        default_host,
        default_port,
    } = options;

    let gate = ConnectionGate::new();
    let transport: Arc<dyn RequestTransport> = Arc::new(client.clone());
    let ctx = SharedCtx {
        client,
        maps: MapCatalog::new(),
        dispatcher: Dispatcher::new(Arc::clone(&transport), gate.reader()),
        sessions: SessionManager::new(transport, gate),
    };
    let app = App::new(ctx, registry, default_host.as_deref(), default_port);
    ui::runtime::run_app(app).await
}
