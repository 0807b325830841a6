//! Connection bar: the connect form while disconnected, the endpoint badge and
//! a Disconnect button while connected.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hllrcon_types::Effect;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{App, ConnectField, Focus};
use crate::ui::components::common::TextInputState;
use crate::ui::components::component::Component;
use crate::ui::theme::theme_helpers::{block, input_style, render_button};

#[derive(Debug, Default)]
pub struct ConnectionComponent;

impl ConnectionComponent {
    fn handle_form_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let form = &mut app.connect_form;
        match key.code {
            KeyCode::Enter => {
                if matches!(form.field, ConnectField::Password | ConnectField::Submit) {
                    return app.submit_connect();
                }
                form.field = form.field.next();
            }
            KeyCode::Down => form.field = form.field.next(),
            KeyCode::Up => form.field = form.field.previous(),
            _ => {
                let Some(input) = form.active_input() else {
                    return Vec::new();
                };
                if edit_text(input, key) {
                    form.notice = None;
                }
            }
        }
        Vec::new()
    }

    fn render_form(frame: &mut Frame, inner: Rect, app: &App, focused: bool) {
        let theme = &*app.theme;
        let form = &app.connect_form;
        let [host_area, port_area, password_area, button_area] = Layout::horizontal([
            Constraint::Percentage(40),
            Constraint::Length(12),
            Constraint::Percentage(35),
            Constraint::Min(13),
        ])
        .spacing(1)
        .areas(inner);

        let masked_password = "•".repeat(form.password.input().chars().count());
        let inputs = [
            (host_area, "Host", ConnectField::Host, &form.host, form.host.input().to_string()),
            (port_area, "Port", ConnectField::Port, &form.port, form.port.input().to_string()),
            (password_area, "Password", ConnectField::Password, &form.password, masked_password),
        ];
        for (area, label, field, state, shown) in inputs {
            let active = focused && form.field == field;
            let input_block = Block::bordered()
                .title(Span::styled(label, theme.text_secondary_style()))
                .border_style(theme.border_style(active));
            frame.render_widget(
                Paragraph::new(shown).style(input_style(theme, true, active)).block(input_block),
                area,
            );
            if active {
                place_cursor(frame, area, state, field == ConnectField::Password);
            }
        }

        let label = if form.in_flight { "Connecting…" } else { "Connect" };
        render_button(
            frame,
            button_area,
            label,
            !form.in_flight,
            focused && form.field == ConnectField::Submit,
            theme,
        );
    }

    fn render_connected(frame: &mut Frame, inner: Rect, app: &App, focused: bool) {
        let theme = &*app.theme;
        let [badge_area, button_area] = Layout::horizontal([Constraint::Min(10), Constraint::Length(16)]).areas(inner);

        let host = app.connection.host.as_deref().unwrap_or_default();
        let port = app.connection.port.map(|port| port.to_string()).unwrap_or_default();
        let toggle_hint = if app.host_visible { "F2 hide" } else { "F2 show" };
        let badge = Line::from(vec![
            Span::styled("● ", theme.status_success()),
            Span::styled("Connected to ", theme.text_primary_style()),
            Span::styled(app.display_host(host), theme.accent_emphasis_style()),
            Span::styled(format!(":{port}"), theme.text_primary_style()),
            Span::styled(format!("  ({toggle_hint})"), theme.text_muted_style()),
        ]);
        let [_, badge_line, _] = Layout::vertical([Constraint::Length(1); 3]).areas(badge_area);
        frame.render_widget(Paragraph::new(badge), badge_line);
        render_button(frame, button_area, "Disconnect", true, focused, theme);
    }
}

impl Component for ConnectionComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.connection.connected {
            return match key.code {
                KeyCode::Enter | KeyCode::Char('d') => vec![Effect::Disconnect],
                _ => Vec::new(),
            };
        }
        Self::handle_form_key(app, key)
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let focused = app.focus == Focus::Connection;
        let mut outer = block(&*app.theme, Some(" Connection "), focused);
        if let Some(notice) = app.connect_form.notice.as_deref() {
            outer = outer.title_bottom(Span::styled(format!(" {notice} "), app.theme.status_error()));
        }
        let inner = outer.inner(rect);
        frame.render_widget(outer, rect);

        if app.connection.connected {
            Self::render_connected(frame, inner, app, focused);
        } else {
            Self::render_form(frame, inner, app, focused);
        }
    }
}

/// Apply a plain editing key to `input`. Returns whether it was consumed.
pub(crate) fn edit_text(input: &mut TextInputState, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => input.insert_char(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_home(),
        KeyCode::End => input.move_end(),
        _ => return false,
    }
    true
}

fn place_cursor(frame: &mut Frame, area: Rect, state: &TextInputState, masked: bool) {
    let column = if masked {
        state.input()[..state.cursor()].chars().count()
    } else {
        state.cursor_column()
    };
    let x = area.x.saturating_add(1).saturating_add(column as u16);
    let max_x = area.right().saturating_sub(2);
    frame.set_cursor_position(Position::new(x.min(max_x), area.y.saturating_add(1)));
}
