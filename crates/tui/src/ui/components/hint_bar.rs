//! Single-line strip of key bindings for the focused pane.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, Focus};
use crate::ui::components::component::Component;
use crate::ui::theme::theme_helpers::build_hint_spans;

#[derive(Debug, Default)]
pub struct HintBarComponent;

impl HintBarComponent {
    fn pane_hints(app: &App) -> &'static [(&'static str, &'static str)] {
        match app.focus {
            Focus::Connection if app.connection.connected => &[(" Enter/d", " Disconnect ")],
            Focus::Connection => &[(" ↑/↓", " Field "), ("Enter", " Next/Connect ")],
            Focus::Commands if app.commands.form.is_some() => &[
                (" ↑/↓", " Field "),
                ("Space/←/→", " Toggle/Cycle "),
                ("Enter/Ctrl+S", " Execute "),
                ("Esc", " Back "),
            ],
            Focus::Commands => &[(" ↑/↓", " Select "), ("Enter", " Expand/Collapse "), ("←", " Collapse ")],
            Focus::Response => &[(" ↑/↓/PgUp/PgDn", " Scroll "), ("c", " Copy ")],
        }
    }
}

impl Component for HintBarComponent {
    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let mut spans = vec![Span::styled("Hints:", theme.text_muted_style())];
        spans.extend(build_hint_spans(theme, Self::pane_hints(app)));
        spans.extend(build_hint_spans(
            theme,
            &[
                (" Tab", " Pane "),
                ("F2", " Host "),
                ("F5", " Status "),
                ("Ctrl+Y", " Copy "),
                ("Ctrl+C", " Quit "),
            ],
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.text_muted_style()), rect);
    }
}
