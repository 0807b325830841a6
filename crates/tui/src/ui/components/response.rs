//! Response pane: the presentation of the latest outcome, scrollable and
//! copyable.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use hllrcon_engine::Presentation;
use hllrcon_types::Effect;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Paragraph, Wrap},
};

use crate::app::{App, Focus};
use crate::ui::components::common::highlight_pretty_json_lines;
use crate::ui::components::component::Component;
use crate::ui::theme::theme_helpers::{block, render_vertical_scrollbar};

#[derive(Debug, Default)]
pub struct ResponseComponent {
    /// Largest useful scroll offset as of the last render.
    max_scroll: u16,
}

impl ResponseComponent {
    fn scroll_by(&self, app: &mut App, delta: i32) {
        let next = i32::from(app.response.scroll).saturating_add(delta).clamp(0, i32::from(self.max_scroll));
        app.response.scroll = next as u16;
    }
}

impl Component for ResponseComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(app, -1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(app, 1),
            KeyCode::PageUp => self.scroll_by(app, -10),
            KeyCode::PageDown => self.scroll_by(app, 10),
            KeyCode::Home => app.response.scroll = 0,
            KeyCode::End => app.response.scroll = self.max_scroll,
            KeyCode::Char('c') | KeyCode::Char('y') => return app.copy_response(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_by(app, -3),
            MouseEventKind::ScrollDown => self.scroll_by(app, 3),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let focused = app.focus == Focus::Response;
        let mut outer = block(theme, Some(" Response "), focused);
        if let Some(updated_at) = app.response.updated_at {
            outer = outer.title_top(
                Line::from(Span::styled(format!(" {} ", updated_at.format("%H:%M:%S")), theme.text_muted_style())).right_aligned(),
            );
        }
        if let Some(notice) = app.response.notice.as_deref() {
            outer = outer.title_bottom(Span::styled(format!(" {notice} "), theme.status_info()));
        }
        let inner = outer.inner(rect);
        frame.render_widget(outer, rect);

        let text = match &app.response.presentation {
            Presentation::Json(pretty) => Text::from(highlight_pretty_json_lines(pretty, theme)),
            Presentation::Error(message) => Text::styled(message.as_str(), theme.status_error()),
            Presentation::Pending(message) => Text::styled(format!("{} {message}", app.throbber()), theme.status_info()),
            Presentation::Info(message) | Presentation::Text(message) => Text::styled(message.as_str(), theme.text_primary_style()),
        };
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });

        let content_height = paragraph.line_count(inner.width.saturating_sub(1));
        let viewport = usize::from(inner.height);
        self.max_scroll = u16::try_from(content_height.saturating_sub(viewport)).unwrap_or(u16::MAX);
        app.response.scroll = app.response.scroll.min(self.max_scroll);

        let mut text_area = inner;
        text_area.width = inner.width.saturating_sub(1);
        frame.render_widget(paragraph.scroll((app.response.scroll, 0)), text_area);
        if self.max_scroll > 0 {
            render_vertical_scrollbar(frame, inner, usize::from(self.max_scroll), usize::from(app.response.scroll), theme);
        }
    }
}
