//! Command accordion: every registry section with its commands, and the
//! inline form of the single expanded command.
//!
//! In list mode the arrow keys move between commands and Enter expands or
//! collapses. Expanding moves keys into the form; Esc returns to the list
//! while leaving the form open.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use hllrcon_engine::{Control, Widget};
use hllrcon_types::{CommandId, Effect, HttpMethod};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tracing::warn;

use crate::app::{App, Focus, FormCursor};
use crate::ui::components::common::TextInputState;
use crate::ui::components::component::Component;
use crate::ui::components::connection::edit_text;
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers::{block, render_vertical_scrollbar};

const INDENT: &str = "      ";
const VALUE_PREFIX: &str = "      › ";
const MULTILINE_PREFIX: &str = "      │ ";

/// What the form cursor is on, detached from the borrow of the control set.
enum FormTarget {
    Execute,
    Text { field: String, multiline: bool },
    Toggle { field: String },
    Choice { field: String },
}

#[derive(Debug, Default)]
pub struct CommandsComponent {
    scroll: usize,
}

impl CommandsComponent {
    fn handle_list_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let commands = &mut app.commands;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => commands.move_by(-1),
            KeyCode::Down | KeyCode::Char('j') => commands.move_by(1),
            KeyCode::PageUp => commands.move_by(-10),
            KeyCode::PageDown => commands.move_by(10),
            KeyCode::Home => commands.cursor = 0,
            KeyCode::End => commands.cursor = commands.ids.len().saturating_sub(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = commands.selected() {
                    app.activate_command(id);
                }
            }
            KeyCode::Right => {
                let Some(id) = commands.selected() else {
                    return Vec::new();
                };
                if app.console.expanded() == Some(id) {
                    app.commands.form = Some(FormCursor::default());
                    app.sync_form_editor();
                } else {
                    app.activate_command(id);
                }
            }
            KeyCode::Left => {
                app.console.collapse_all();
                app.commands.form = None;
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_form_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if key.code == KeyCode::Esc {
            app.commands.form = None;
            return Vec::new();
        }
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return app.execute_expanded();
        }

        let Some((position, visible_len, target)) = form_target(app) else {
            app.commands.form = None;
            return Vec::new();
        };
        match key.code {
            KeyCode::Up => {
                if position == 0 {
                    app.commands.form = None;
                } else {
                    move_form_cursor(app, position - 1);
                }
                return Vec::new();
            }
            KeyCode::Down => {
                move_form_cursor(app, (position + 1).min(visible_len));
                return Vec::new();
            }
            _ => {}
        }

        let (field, result) = match target {
            FormTarget::Execute => {
                return match key.code {
                    KeyCode::Enter | KeyCode::Char(' ') => app.execute_expanded(),
                    _ => Vec::new(),
                };
            }
            FormTarget::Toggle { field } => match key.code {
                KeyCode::Enter => return app.execute_expanded(),
                KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    let result = app.console.controls_mut().map(|set| set.toggle(&field));
                    (field, result)
                }
                _ => return Vec::new(),
            },
            FormTarget::Choice { field } => {
                let forward = match key.code {
                    KeyCode::Enter => return app.execute_expanded(),
                    KeyCode::Char(' ') | KeyCode::Right => true,
                    KeyCode::Left => false,
                    _ => return Vec::new(),
                };
                let result = app.console.controls_mut().map(|set| set.cycle_choice(&field, forward));
                (field, result)
            }
            FormTarget::Text { field, multiline } => {
                if key.code == KeyCode::Enter && !multiline {
                    return app.execute_expanded();
                }
                let Some(editor) = app.commands.form.as_mut().and_then(|cursor| cursor.editor.as_mut()) else {
                    return Vec::new();
                };
                let consumed = if key.code == KeyCode::Enter {
                    editor.insert_char('\n');
                    true
                } else {
                    edit_text(editor, key)
                };
                if !consumed {
                    return Vec::new();
                }
                let text = editor.input().to_string();
                let result = app.console.controls_mut().map(|set| set.set_text(&field, text));
                (field, result)
            }
        };

        if let Some(Err(error)) = result {
            warn!(error = %error, "form edit rejected");
        }
        follow_field(app, &field);
        Vec::new()
    }

    /// Build every line of the accordion. Returns the lines, the line to
    /// keep in view and the text cursor (line, column) when editing.
    fn build_lines(app: &App, focused: bool) -> (Vec<Line<'static>>, usize, Option<(usize, usize)>) {
        let theme = &*app.theme;
        let registry = app.console.registry();
        let selected = app.commands.selected();
        let expanded = app.console.expanded();
        let form_cursor = app.commands.form.as_ref();

        let mut lines = Vec::new();
        let mut focus_line = 0;
        let mut text_cursor = None;

        for (section_index, section) in registry.sections.iter().enumerate() {
            if section_index > 0 {
                lines.push(Line::default());
            }
            lines.push(Line::from(Span::styled(
                section.title.clone(),
                theme.text_secondary_style().add_modifier(Modifier::BOLD),
            )));

            for (index, command) in section.commands.iter().enumerate() {
                let id = CommandId::new(section_index, index);
                let is_selected = selected == Some(id);
                let is_expanded = expanded == Some(id);
                if is_selected {
                    focus_line = lines.len();
                }

                let marker = if is_expanded { "▾" } else { "▸" };
                let name_style = if is_selected {
                    theme.accent_emphasis_style()
                } else {
                    theme.text_primary_style()
                };
                let mut spans = vec![
                    Span::styled(format!("  {marker} "), theme.text_muted_style()),
                    Span::styled(command.name.clone(), name_style),
                    Span::raw("  "),
                    Span::styled(format!("{:<6}", command.method.as_str()), method_style(theme, command.method)),
                    Span::styled(command.path.clone(), theme.text_muted_style()),
                ];
                if app.in_flight.contains(&id) {
                    spans.push(Span::styled(format!("  {}", app.throbber()), theme.status_info()));
                }
                let mut line = Line::from(spans);
                if is_selected && focused && form_cursor.is_none() {
                    line = line.style(theme.selection_style());
                }
                lines.push(line);

                if !is_expanded {
                    continue;
                }
                lines.push(Line::from(Span::styled(
                    format!("{INDENT}{}", command.description),
                    theme.text_muted_style(),
                )));

                let Some(set) = app.console.controls() else {
                    continue;
                };
                let visible = set.visible_indices();
                let cursor_position = form_cursor.filter(|_| focused).map(|cursor| cursor.position);
                for (position, control_index) in visible.iter().enumerate() {
                    let control = &set.controls()[*control_index];
                    let active = cursor_position == Some(position);
                    if active {
                        focus_line = lines.len();
                    }
                    let editor = form_cursor.and_then(|cursor| cursor.editor.as_ref()).filter(|_| active);
                    if let Some(cursor) = push_control_lines(&mut lines, control, active, editor, theme) {
                        text_cursor = Some(cursor);
                    }
                }

                let execute_active = cursor_position == Some(visible.len());
                if execute_active {
                    focus_line = lines.len();
                }
                let label = if app.in_flight.contains(&id) {
                    format!("[ Running {} ]", app.throbber())
                } else {
                    "[ Execute ]".to_string()
                };
                let button_style = if execute_active {
                    theme.selection_style().add_modifier(Modifier::BOLD)
                } else {
                    theme.accent_primary_style()
                };
                lines.push(Line::from(vec![Span::raw(INDENT), Span::styled(label, button_style)]));
            }
        }

        (lines, focus_line, text_cursor)
    }
}

impl Component for CommandsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        if app.commands.form.is_some() && app.console.expanded().is_some() {
            Self::handle_form_key(app, key)
        } else {
            app.commands.form = None;
            Self::handle_list_key(app, key)
        }
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if app.commands.form.is_some() {
            return Vec::new();
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => app.commands.move_by(-1),
            MouseEventKind::ScrollDown => app.commands.move_by(1),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let focused = app.focus == Focus::Commands;
        let outer = block(&*app.theme, Some(" Commands "), focused);
        let inner = outer.inner(rect);
        frame.render_widget(outer, rect);

        let (lines, focus_line, text_cursor) = Self::build_lines(app, focused);
        let height = inner.height as usize;
        if height == 0 {
            return;
        }
        if focus_line < self.scroll {
            self.scroll = focus_line;
        } else if focus_line >= self.scroll + height {
            self.scroll = focus_line + 1 - height;
        }
        self.scroll = self.scroll.min(lines.len().saturating_sub(height));

        let total = lines.len();
        frame.render_widget(Paragraph::new(lines).scroll((self.scroll as u16, 0)), inner);
        if total > height {
            render_vertical_scrollbar(frame, inner, total.saturating_sub(height), self.scroll, &*app.theme);
        }

        if let Some((line, column)) = text_cursor
            && line >= self.scroll
            && line < self.scroll + height
        {
            let x = inner.x.saturating_add(column as u16).min(inner.right().saturating_sub(1));
            let y = inner.y + (line - self.scroll) as u16;
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

fn method_style(theme: &dyn Theme, method: HttpMethod) -> Style {
    match method {
        HttpMethod::Get => theme.status_info(),
        HttpMethod::Post => theme.status_success(),
        HttpMethod::Put => theme.status_warning(),
        HttpMethod::Delete => theme.status_error(),
    }
}

/// Append the label and widget lines of one control. Returns the text cursor
/// position when `editor` is set.
fn push_control_lines(
    lines: &mut Vec<Line<'static>>,
    control: &Control,
    active: bool,
    editor: Option<&TextInputState>,
    theme: &dyn Theme,
) -> Option<(usize, usize)> {
    let label_style = if active {
        theme.accent_emphasis_style()
    } else {
        theme.text_secondary_style()
    };
    let mut label = vec![Span::raw(INDENT), Span::styled(control.label.clone(), label_style)];
    if let Some(description) = control.description.as_deref() {
        label.push(Span::styled(format!("  {description}"), theme.text_muted_style()));
    }
    lines.push(Line::from(label));

    let value_style = if active {
        theme.selection_style()
    } else {
        theme.text_primary_style()
    };
    let text = editor.map(|state| state.input().to_string());
    match &control.widget {
        Widget::SingleLine { value } | Widget::Numeric { value } => {
            let cursor = editor.map(|state| (lines.len(), VALUE_PREFIX.chars().count() + state.cursor_column()));
            let shown = text.unwrap_or_else(|| value.clone());
            lines.push(value_line(VALUE_PREFIX, &shown, control.placeholder.as_deref(), value_style, theme));
            cursor
        }
        Widget::MultiLine { value, rows } => {
            let first_line = lines.len();
            let shown = text.unwrap_or_else(|| value.clone());
            let mut row_count = 0;
            if shown.is_empty() {
                lines.push(value_line(MULTILINE_PREFIX, "", control.placeholder.as_deref(), value_style, theme));
                row_count += 1;
            } else {
                for row in shown.split('\n') {
                    lines.push(value_line(MULTILINE_PREFIX, row, None, value_style, theme));
                    row_count += 1;
                }
            }
            for _ in row_count..usize::from(*rows) {
                lines.push(Line::from(Span::styled(MULTILINE_PREFIX, theme.text_muted_style())));
            }
            editor.map(|state| (first_line + state.cursor_line(), MULTILINE_PREFIX.chars().count() + state.cursor_column()))
        }
        Widget::Toggle { checked } => {
            let (mark, word) = if *checked { ("[x]", "enabled") } else { ("[ ]", "disabled") };
            lines.push(Line::from(vec![
                Span::raw(INDENT),
                Span::styled(format!("{mark} {word}"), value_style),
            ]));
            None
        }
        Widget::Choice(choice) => {
            let entry = choice.selected_entry();
            let mut spans = vec![Span::raw(INDENT), Span::styled("◂ ", theme.text_muted_style())];
            let entry_style = if entry.disabled {
                theme.text_muted_style()
            } else {
                value_style
            };
            spans.push(Span::styled(entry.label.clone(), entry_style));
            spans.push(Span::styled(" ▸", theme.text_muted_style()));
            if choice.pending {
                spans.push(Span::styled("  loading maps…", theme.status_warning()));
            }
            lines.push(Line::from(spans));
            None
        }
    }
}

fn value_line(prefix: &'static str, value: &str, placeholder: Option<&str>, style: Style, theme: &dyn Theme) -> Line<'static> {
    let body = if value.is_empty() {
        Span::styled(placeholder.unwrap_or_default().to_string(), theme.text_muted_style())
    } else {
        Span::styled(value.to_string(), style)
    };
    Line::from(vec![Span::styled(prefix, theme.text_muted_style()), body])
}

/// Resolve the form cursor against the live control set.
fn form_target(app: &App) -> Option<(usize, usize, FormTarget)> {
    let set = app.console.controls()?;
    let cursor = app.commands.form.as_ref()?;
    let visible = set.visible_indices();
    let position = cursor.position.min(visible.len());
    let target = match visible.get(position).map(|index| &set.controls()[*index]) {
        None => FormTarget::Execute,
        Some(control) => {
            let field = control.field_name.clone();
            match &control.widget {
                Widget::Toggle { .. } => FormTarget::Toggle { field },
                Widget::Choice(_) => FormTarget::Choice { field },
                Widget::MultiLine { .. } => FormTarget::Text { field, multiline: true },
                Widget::SingleLine { .. } | Widget::Numeric { .. } => FormTarget::Text { field, multiline: false },
            }
        }
    };
    Some((position, visible.len(), target))
}

fn move_form_cursor(app: &mut App, position: usize) {
    if let Some(cursor) = app.commands.form.as_mut() {
        cursor.position = position;
    }
    app.sync_form_editor();
}

/// Keep the cursor on `field` after an edit that may have shown or hidden
/// other controls.
fn follow_field(app: &mut App, field: &str) {
    let Some(set) = app.console.controls() else {
        return;
    };
    let position = set
        .visible_indices()
        .iter()
        .position(|index| set.controls()[*index].field_name == field);
    if let (Some(position), Some(cursor)) = (position, app.commands.form.as_mut()) {
        cursor.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests_support::test_app;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(component: &mut CommandsComponent, app: &mut App, text: &str) {
        for c in text.chars() {
            component.handle_key_events(app, key(KeyCode::Char(c)));
        }
    }

    fn select(app: &mut App, name: &str) {
        let id = app.console.registry().find_by_name(name).map(|(id, _)| id).expect("command");
        app.commands.cursor = app.commands.ids.iter().position(|candidate| *candidate == id).expect("listed");
    }

    #[test]
    fn enter_expands_and_typing_fills_fields() {
        let mut app = test_app();
        let mut component = CommandsComponent::default();
        select(&mut app, "KickPlayer");

        component.handle_key_events(&mut app, key(KeyCode::Enter));
        assert!(app.commands.form.is_some());

        type_text(&mut component, &mut app, "7656");
        component.handle_key_events(&mut app, key(KeyCode::Down));
        type_text(&mut component, &mut app, "afk");

        let set = app.console.controls().expect("form");
        assert_eq!(set.raw_value("player_id").as_deref(), Some("7656"));
        assert_eq!(set.raw_value("reason").as_deref(), Some("afk"));
    }

    #[test]
    fn choosing_a_controller_reveals_and_follows_fields() {
        let mut app = test_app();
        let mut component = CommandsComponent::default();
        select(&mut app, "GetServerInformation");
        component.handle_key_events(&mut app, key(KeyCode::Enter));
        assert!(!app.console.controls().expect("form").is_visible("value"));

        // Cycle the type selector until "player" is chosen.
        for _ in 0..10 {
            if app.console.controls().and_then(|set| set.raw_value("type")).as_deref() == Some("player") {
                break;
            }
            component.handle_key_events(&mut app, key(KeyCode::Right));
        }
        assert!(app.console.controls().expect("form").is_visible("value"));
        assert_eq!(app.commands.form.as_ref().map(|cursor| cursor.position), Some(0));

        component.handle_key_events(&mut app, key(KeyCode::Down));
        type_text(&mut component, &mut app, "abc");
        assert_eq!(app.console.controls().and_then(|set| set.raw_value("value")).as_deref(), Some("abc"));
    }

    #[test]
    fn multiline_enter_inserts_newline() {
        let mut app = test_app();
        let mut component = CommandsComponent::default();
        select(&mut app, "ServerBroadcast");
        component.handle_key_events(&mut app, key(KeyCode::Enter));

        type_text(&mut component, &mut app, "one");
        component.handle_key_events(&mut app, key(KeyCode::Enter));
        type_text(&mut component, &mut app, "two");

        assert_eq!(
            app.console.controls().and_then(|set| set.raw_value("message")).as_deref(),
            Some("one\ntwo")
        );
    }

    #[test]
    fn escape_returns_to_list_and_left_collapses() {
        let mut app = test_app();
        let mut component = CommandsComponent::default();
        select(&mut app, "KickPlayer");
        component.handle_key_events(&mut app, key(KeyCode::Enter));

        component.handle_key_events(&mut app, key(KeyCode::Esc));
        assert!(app.commands.form.is_none());
        assert!(app.console.expanded().is_some());

        component.handle_key_events(&mut app, key(KeyCode::Left));
        assert!(app.console.expanded().is_none());
    }
}
