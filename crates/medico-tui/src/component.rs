//! Component trait shared by every screen.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

/// Lifecycle: (`handle_key_event` | `update` | `render`)*
pub trait Component {
    /// Handle a key press. Return an action to dispatch, or `None`.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// React to a broadcast action (ticks). May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Whether printable keys belong to this component (text entry).
    /// Global single-letter shortcuts are suspended while this is true.
    fn captures_input(&self) -> bool {
        false
    }

    /// Identifier used in logs.
    fn id(&self) -> &'static str;
}
