// The callback surface a sketch implements.

use crate::canvas::Canvas;
use crate::config::Settings;
use crate::error::Result;
use crate::input::{InputEvent, InputState};

/// An application driven by the render loop.
///
/// `on_create`, `on_render` and `on_quit` are required. Every input event
/// has a pair of optional callbacks: the `_event` variant receives the full
/// event payload and runs first, the short variant runs second. By the time
/// either runs, [`InputState`] already reflects the event.
pub trait Sketch {
    /// Runs once before the window exists; configure it through `settings`.
    fn on_create(&mut self, settings: &mut Settings) -> Result<()>;

    /// Draws one frame. An error stops the loop and is returned from `run`.
    fn on_render(&mut self, canvas: &mut Canvas<'_>) -> Result<()>;

    /// Last chance to release resources. Cannot prevent termination.
    fn on_quit(&mut self);

    fn on_pointer_down_event(&mut self, _event: &InputEvent, _input: &InputState) {}
    fn on_pointer_down(&mut self, _input: &InputState) {}

    fn on_pointer_up_event(&mut self, _event: &InputEvent, _input: &InputState) {}
    fn on_pointer_up(&mut self, _input: &InputState) {}

    fn on_pointer_click_event(&mut self, _event: &InputEvent, _input: &InputState) {}
    fn on_pointer_click(&mut self, _input: &InputState) {}

    fn on_pointer_move_event(&mut self, _event: &InputEvent, _input: &InputState) {}
    fn on_pointer_move(&mut self, _input: &InputState) {}

    fn on_pointer_drag_event(&mut self, _event: &InputEvent, _input: &InputState) {}
    fn on_pointer_drag(&mut self, _input: &InputState) {}

    fn on_pointer_scroll_event(&mut self, _event: &InputEvent, _input: &InputState) {}
    fn on_pointer_scroll(&mut self, _input: &InputState) {}

    fn on_key_down_event(&mut self, _event: &InputEvent, _input: &InputState) {}
    fn on_key_down(&mut self, _input: &InputState) {}

    fn on_key_up_event(&mut self, _event: &InputEvent, _input: &InputState) {}
    fn on_key_up(&mut self, _input: &InputState) {}

    fn on_key_typed_event(&mut self, _event: &InputEvent, _input: &InputState) {}
    fn on_key_typed(&mut self, _input: &InputState) {}
}
