//! The trait every parkdesk screen implements.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

/// A screen owned by `App`. Keys go to the focused screen only; every
/// dispatched action is broadcast to all screens.
pub trait Component: Send {
    /// Runs once before the first frame. Screens that post actions from
    /// their own tasks keep a clone of the sender.
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// A returned action is queued behind the one being processed.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    /// While true, global shortcuts (`q`, `?`, `1`-`4`) are not intercepted.
    fn captures_input(&self) -> bool {
        false
    }

    /// Flipped on screen switches.
    fn set_focused(&mut self, _focused: bool) {}
}
