//! Application state for the hllrcon TUI.
//!
//! `App` owns the engine [`Console`] (registry, accordion and the live form),
//! the connect form, the connection mirror and the response pane state. Key
//! handlers in the components mutate it and return [`Effect`]s; completed
//! background work comes back through [`App::update`].

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Local};
use hllrcon_api::ConsoleClient;
use hllrcon_engine::{ConnectParams, Console, Dispatcher, Presentation, SessionManager};
use hllrcon_registry::{CommandRegistry, MapCatalog};
use hllrcon_types::{CommandId, ConnectionStatus, Effect, ExecOutcome, Msg};
use hllrcon_util::{pretty_json, redact_sensitive};
use tracing::debug;

use crate::ui::components::common::TextInputState;
use crate::ui::theme::{self, Theme};

/// Shown in place of the host until the operator reveals it.
pub const MASKED_HOST: &str = "•••.•••.•••.•••";

const THROBBER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Runtime-wide handles shared by the command layer.
#[derive(Clone)]
pub struct SharedCtx {
    pub client: ConsoleClient,
    pub maps: MapCatalog,
    pub dispatcher: Dispatcher,
    pub sessions: SessionManager,
}

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Connection,
    Commands,
    Response,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Self::Connection => Self::Commands,
            Self::Commands => Self::Response,
            Self::Response => Self::Connection,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Connection => Self::Response,
            Self::Commands => Self::Connection,
            Self::Response => Self::Commands,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectField {
    #[default]
    Host,
    Port,
    Password,
    Submit,
}

impl ConnectField {
    pub fn next(self) -> Self {
        match self {
            Self::Host => Self::Port,
            Self::Port => Self::Password,
            Self::Password | Self::Submit => Self::Submit,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Host | Self::Port => Self::Host,
            Self::Password => Self::Port,
            Self::Submit => Self::Password,
        }
    }
}

#[derive(Debug, Default)]
pub struct ConnectForm {
    pub host: TextInputState,
    pub port: TextInputState,
    pub password: TextInputState,
    pub field: ConnectField,
    /// Input problem shown under the form.
    pub notice: Option<String>,
    pub in_flight: bool,
}

impl ConnectForm {
    pub fn new(default_host: Option<&str>, default_port: Option<u16>) -> Self {
        Self {
            host: TextInputState::with_text(default_host.unwrap_or_default()),
            port: TextInputState::with_text(default_port.map(|port| port.to_string()).unwrap_or_default()),
            ..Default::default()
        }
    }

    pub fn active_input(&mut self) -> Option<&mut TextInputState> {
        match self.field {
            ConnectField::Host => Some(&mut self.host),
            ConnectField::Port => Some(&mut self.port),
            ConnectField::Password => Some(&mut self.password),
            ConnectField::Submit => None,
        }
    }
}

/// Cursor inside the expanded command's form.
#[derive(Debug, Clone, Default)]
pub struct FormCursor {
    /// Index into the visible controls; one past the end is the Execute button.
    pub position: usize,
    /// Editing buffer for the text control under the cursor.
    pub editor: Option<TextInputState>,
}

#[derive(Debug)]
pub struct CommandListState {
    /// Every command in registry order.
    pub ids: Vec<CommandId>,
    pub cursor: usize,
    /// `Some` while keys go to the expanded form rather than the list.
    pub form: Option<FormCursor>,
}

impl CommandListState {
    fn new(registry: &CommandRegistry) -> Self {
        Self {
            ids: registry.iter().map(|(id, _)| id).collect(),
            cursor: 0,
            form: None,
        }
    }

    pub fn selected(&self) -> Option<CommandId> {
        self.ids.get(self.cursor).copied()
    }

    pub fn move_by(&mut self, delta: isize) {
        if self.ids.is_empty() {
            return;
        }
        let last = self.ids.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }
}

#[derive(Debug, Default)]
pub struct ResponseState {
    pub presentation: Presentation,
    pub updated_at: Option<DateTime<Local>>,
    pub scroll: u16,
    /// Transient status line (clipboard result, in-flight refusal).
    pub notice: Option<String>,
}

impl ResponseState {
    pub fn show(&mut self, presentation: Presentation) {
        self.presentation = presentation;
        self.updated_at = Some(Local::now());
        self.scroll = 0;
    }
}

pub struct App {
    pub ctx: SharedCtx,
    pub theme: Box<dyn Theme>,
    pub console: Console,
    pub focus: Focus,
    pub connect_form: ConnectForm,
    /// Last connection state reported by the session layer.
    pub connection: ConnectionStatus,
    pub host_visible: bool,
    pub commands: CommandListState,
    pub response: ResponseState,
    /// Commands whose request is outstanding.
    pub in_flight: HashSet<CommandId>,
    pub executing: bool,
    pub throbber_idx: usize,
}

impl App {
    pub fn new(ctx: SharedCtx, registry: Arc<CommandRegistry>, default_host: Option<&str>, default_port: Option<u16>) -> Self {
        let commands = CommandListState::new(&registry);
        let console = Console::new(registry, ctx.maps.clone());
        Self {
            ctx,
            theme: theme::load(),
            console,
            focus: Focus::default(),
            connect_form: ConnectForm::new(default_host, default_port),
            connection: ConnectionStatus::disconnected(),
            host_visible: false,
            commands,
            response: ResponseState::default(),
            in_flight: HashSet::new(),
            executing: false,
            throbber_idx: 0,
        }
    }

    pub fn throbber(&self) -> &'static str {
        THROBBER_FRAMES[self.throbber_idx % THROBBER_FRAMES.len()]
    }

    /// Host as it should appear on screen.
    pub fn display_host<'a>(&self, host: &'a str) -> &'a str {
        if self.host_visible { host } else { MASKED_HOST }
    }

    pub fn toggle_host_visibility(&mut self) {
        self.host_visible = !self.host_visible;
    }

    /// Expand or collapse a command; moves keys into the form on expand.
    pub fn activate_command(&mut self, id: CommandId) {
        let transition = self.console.activate(id);
        self.commands.form = transition.expanded.map(|_| FormCursor::default());
        self.sync_form_editor();
    }

    /// Validate the connect form and request a connection.
    pub fn submit_connect(&mut self) -> Vec<Effect> {
        if self.connect_form.in_flight {
            return Vec::new();
        }
        let form = &self.connect_form;
        match ConnectParams::parse(form.host.input(), form.port.input(), form.password.input()) {
            Ok(params) => {
                self.connect_form.notice = None;
                self.connect_form.in_flight = true;
                let host = self.display_host(&params.host).to_string();
                self.response
                    .show(Presentation::Pending(format!("Connecting to {host}:{}...", params.port)));
                vec![Effect::Connect {
                    host: params.host,
                    port: params.port,
                    password: params.password,
                }]
            }
            Err(error) => {
                self.connect_form.notice = Some(error.to_string());
                Vec::new()
            }
        }
    }

    /// Prepare the expanded command and hand it to the command layer.
    ///
    /// A command whose previous request is still outstanding is refused.
    pub fn execute_expanded(&mut self) -> Vec<Effect> {
        let Some(id) = self.console.expanded() else {
            return Vec::new();
        };
        let label = self
            .console
            .expanded_command()
            .map(|command| command.name.clone())
            .unwrap_or_default();
        if self.in_flight.contains(&id) {
            self.response.notice = Some(format!("{label} is still running"));
            return Vec::new();
        }

        match self.console.prepare(&self.ctx.dispatcher) {
            Some((command, Ok(request))) => {
                debug!(command = %label, method = %request.method, path = %request.path, "command prepared");
                self.in_flight.insert(command);
                self.response.notice = None;
                self.response.show(Presentation::pending(&label));
                vec![Effect::Dispatch { command, label, request }]
            }
            Some((_, Err(error))) => {
                self.response.show(Presentation::from_error(&error));
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    pub fn copy_response(&self) -> Vec<Effect> {
        vec![Effect::CopyToClipboard(self.response.presentation.text().to_string())]
    }

    /// Reload the editing buffer for the control under the form cursor.
    pub fn sync_form_editor(&mut self) {
        let Some(set) = self.console.controls() else {
            self.commands.form = None;
            return;
        };
        let Some(cursor) = self.commands.form.as_mut() else {
            return;
        };
        let visible = set.visible_indices();
        cursor.position = cursor.position.min(visible.len());
        cursor.editor = visible
            .get(cursor.position)
            .map(|index| &set.controls()[*index])
            .filter(|control| control.widget.is_text_entry())
            .map(|control| TextInputState::with_text(control.widget.raw_value()));
    }

    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.executing {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER_FRAMES.len();
                }
                Vec::new()
            }
            Msg::Resize(..) => Vec::new(),
            Msg::ExecCompleted(outcome) => self.apply_outcome(outcome),
        }
    }

    fn apply_outcome(&mut self, outcome: &ExecOutcome) -> Vec<Effect> {
        match outcome {
            ExecOutcome::Dispatched { command, outcome, .. } => {
                self.in_flight.remove(command);
                self.response.show(Presentation::from_outcome(outcome));
                Vec::new()
            }
            ExecOutcome::Connected(Ok(receipt)) => {
                self.connect_form.in_flight = false;
                self.connect_form.password.clear();
                self.connection = receipt.status.clone();
                let body = redact_sensitive(&pretty_json(&receipt.body).unwrap_or_else(|| receipt.body.clone()));
                self.response
                    .show(Presentation::Info(format!("Connected successfully!\n\n{body}")));
                self.focus = Focus::Commands;
                if self.ctx.maps.is_loaded() {
                    Vec::new()
                } else {
                    vec![Effect::LoadMaps]
                }
            }
            ExecOutcome::Connected(Err(message)) => {
                self.connect_form.in_flight = false;
                self.response
                    .show(Presentation::Error(format!("Connection failed:\n{message}")));
                Vec::new()
            }
            ExecOutcome::Disconnected(Ok(())) => {
                self.connection = ConnectionStatus::disconnected();
                self.focus = Focus::Connection;
                self.response.show(Presentation::Info("Disconnected successfully".to_string()));
                Vec::new()
            }
            ExecOutcome::Disconnected(Err(message)) => {
                self.response.show(Presentation::Error(format!("Disconnect failed: {message}")));
                Vec::new()
            }
            ExecOutcome::StatusRefreshed(status) => {
                self.connection = status.clone();
                if status.connected && self.focus == Focus::Connection {
                    self.focus = Focus::Commands;
                }
                Vec::new()
            }
            ExecOutcome::MapsLoaded(Ok(_)) => {
                if self.console.apply_maps() > 0 {
                    self.sync_form_editor();
                }
                Vec::new()
            }
            // The loader already logged the failure; map selectors stay pending.
            ExecOutcome::MapsLoaded(Err(_)) => Vec::new(),
            ExecOutcome::Log(message) => {
                self.response.notice = Some(message.clone());
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use hllrcon_api::ClientOptions;
    use hllrcon_engine::{ConnectionGate, RequestTransport};

    /// App over the builtin registry, with a client that is never reached.
    pub(crate) fn test_app_with_gate() -> (App, ConnectionGate) {
        let client = ConsoleClient::new(&ClientOptions::new("http://localhost:8080")).expect("client");
        let gate = ConnectionGate::new();
        let transport: Arc<dyn RequestTransport> = Arc::new(client.clone());
        let ctx = SharedCtx {
            client,
            maps: MapCatalog::new(),
            dispatcher: Dispatcher::new(Arc::clone(&transport), gate.reader()),
            sessions: SessionManager::new(transport, gate.clone()),
        };
        (App::new(ctx, Arc::new(CommandRegistry::builtin()), Some("10.0.0.5"), Some(7779)), gate)
    }

    pub(crate) fn test_app() -> App {
        test_app_with_gate().0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::tests_support::{test_app, test_app_with_gate as app};
    use hllrcon_types::{ConnectReceipt, DispatchOutcome, HttpMethod};

    fn id_of(app: &App, name: &str) -> CommandId {
        app.console.registry().find_by_name(name).map(|(id, _)| id).expect("command")
    }

    #[test]
    fn connect_form_validates_before_requesting() {
        let (mut app, _) = app();
        assert_eq!(app.connect_form.host.input(), "10.0.0.5");

        assert!(app.submit_connect().is_empty());
        assert_eq!(app.connect_form.notice.as_deref(), Some("Please enter the RCON password"));

        app.connect_form.password = TextInputState::with_text("secret");
        let effects = app.submit_connect();
        assert_eq!(
            effects,
            vec![Effect::Connect {
                host: "10.0.0.5".into(),
                port: 7779,
                password: "secret".into()
            }]
        );
        assert_eq!(app.response.presentation.text(), format!("Connecting to {MASKED_HOST}:7779..."));
        assert!(app.submit_connect().is_empty(), "second submit while connecting");
    }

    #[test]
    fn execute_while_disconnected_shows_gate_error() {
        let (mut app, _) = app();
        app.activate_command(id_of(&app, "GetAdminUsers"));

        assert!(app.execute_expanded().is_empty());
        assert_eq!(app.response.presentation, Presentation::Error("Error: Not connected to server".into()));
    }

    #[test]
    fn same_command_is_not_dispatched_twice() {
        let (mut app, gate) = app();
        gate.replace(ConnectionStatus::connected("10.0.0.5", 7779));
        let admins = id_of(&app, "GetAdminUsers");
        app.activate_command(admins);

        let effects = app.execute_expanded();
        assert!(matches!(&effects[..], [Effect::Dispatch { request, .. }] if request.method == HttpMethod::Get));
        assert_eq!(app.response.presentation.text(), "Executing GetAdminUsers...");

        assert!(app.execute_expanded().is_empty());
        assert_eq!(app.response.notice.as_deref(), Some("GetAdminUsers is still running"));

        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::Dispatched {
            command: admins,
            label: "GetAdminUsers".into(),
            outcome: DispatchOutcome::from_status(200, "[]".into()),
        })));
        assert!(app.in_flight.is_empty());
        assert_eq!(app.response.presentation, Presentation::Json("[]".into()));
        assert_eq!(app.execute_expanded().len(), 1);
    }

    #[test]
    fn connected_outcome_requests_maps_and_hides_session() {
        let (mut app, _) = app();
        let effects = app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::Connected(Ok(ConnectReceipt {
            status: ConnectionStatus::connected("10.0.0.5", 7779),
            session_id: Some("abc123".into()),
            body: r#"{"status":"connected","session_id":"abc123"}"#.into(),
        })))));

        assert_eq!(effects, vec![Effect::LoadMaps]);
        assert!(app.connection.connected);
        assert_eq!(app.focus, Focus::Commands);
        assert!(!app.response.presentation.text().contains("abc123"));
    }

    #[test]
    fn host_is_masked_until_revealed() {
        let mut app = test_app();
        assert_eq!(app.display_host("10.0.0.5"), MASKED_HOST);
        app.toggle_host_visibility();
        assert_eq!(app.display_host("10.0.0.5"), "10.0.0.5");
    }

    #[test]
    fn loaded_maps_fill_open_form() {
        let (mut app, _) = app();
        app.activate_command(id_of(&app, "ChangeMap"));
        assert!(app.console.controls().expect("form").has_pending_maps());

        app.ctx.maps.replace(vec!["foy_warfare".into()]);
        app.update(&Msg::ExecCompleted(Box::new(ExecOutcome::MapsLoaded(Ok(vec!["foy_warfare".into()])))));

        assert!(!app.console.controls().expect("form").has_pending_maps());
    }
}
