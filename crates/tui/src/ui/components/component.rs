//! Component system for the TUI.
//!
//! Components are self-contained panes that handle their own input and
//! render themselves into a provided `Rect`, reporting side effects back to
//! the runtime as [`Effect`]s.

use crossterm::event::{KeyEvent, MouseEvent};
use hllrcon_types::Effect;
use ratatui::{Frame, layout::Rect};

use crate::app::App;

/// A UI pane with its own key handling and rendering.
///
/// Handlers mutate `App` and return the effects they need carried out;
/// `render` draws and may record layout needed for later hit-testing.
pub(crate) trait Component {
    /// Handle key events when this component has focus.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    /// Handle mouse events inside this component's area.
    fn handle_mouse_events(&mut self, _app: &mut App, _mouse: MouseEvent) -> Vec<Effect> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);
}
