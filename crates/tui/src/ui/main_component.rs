//! Top-level view: lays out the panes, owns global key bindings and routes
//! input to the focused component.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use hllrcon_types::{Effect, Msg};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::Style,
    widgets::Paragraph,
};

use super::components::{CommandsComponent, Component, ConnectionComponent, HintBarComponent, ResponseComponent};
use crate::app::{App, Focus};

/// Screen rectangles from the last render, used for mouse hit-testing.
#[derive(Debug, Default, Clone, Copy)]
struct PaneAreas {
    connection: Rect,
    commands: Rect,
    response: Rect,
}

impl PaneAreas {
    fn focus_at(&self, column: u16, row: u16) -> Option<Focus> {
        let position = Position::new(column, row);
        [
            (self.connection, Focus::Connection),
            (self.commands, Focus::Commands),
            (self.response, Focus::Response),
        ]
        .into_iter()
        .find(|(area, _)| area.contains(position))
        .map(|(_, focus)| focus)
    }
}

#[derive(Debug, Default)]
pub struct MainView {
    connection_view: ConnectionComponent,
    commands_view: CommandsComponent,
    response_view: ResponseComponent,
    hint_bar: HintBarComponent,
    areas: PaneAreas,
}

impl MainView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a runtime message into application state.
    pub fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        app.update(&msg)
    }

    fn focused_component(&mut self, focus: Focus) -> &mut dyn Component {
        match focus {
            Focus::Connection => &mut self.connection_view,
            Focus::Commands => &mut self.commands_view,
            Focus::Response => &mut self.response_view,
        }
    }

    fn layout(area: Rect) -> [Rect; 4] {
        let [connection, body, hints] =
            Layout::vertical([Constraint::Length(5), Constraint::Min(6), Constraint::Length(1)]).areas(area);
        let [commands, response] = if body.width >= 110 {
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(body)
        } else {
            Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body)
        };
        [connection, commands, response, hints]
    }
}

impl Component for MainView {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Tab => {
                app.focus = app.focus.next();
                return Vec::new();
            }
            KeyCode::BackTab => {
                app.focus = app.focus.previous();
                return Vec::new();
            }
            KeyCode::F(2) => {
                app.toggle_host_visibility();
                return Vec::new();
            }
            KeyCode::F(5) => return vec![Effect::RefreshStatus],
            KeyCode::Char('y') if control => return app.copy_response(),
            _ => {}
        }
        self.focused_component(app.focus).handle_key_events(app, key)
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        let Some(target) = self.areas.focus_at(mouse.column, mouse.row) else {
            return Vec::new();
        };
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
            app.focus = target;
        }
        self.focused_component(target).handle_mouse_events(app, mouse)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &mut App) {
        frame.render_widget(
            Paragraph::new("").style(Style::default().bg(app.theme.roles().background)),
            area,
        );

        let [connection, commands, response, hints] = Self::layout(area);
        self.areas = PaneAreas {
            connection,
            commands,
            response,
        };
        self.connection_view.render(frame, connection, app);
        self.commands_view.render(frame, commands, app);
        self.response_view.render(frame, response, app);
        self.hint_bar.render(frame, hints, app);
    }
}
