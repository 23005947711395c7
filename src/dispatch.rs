// Event dispatch: canonical event in, input state updated, callbacks out.

use tracing::{debug, info};

use crate::input::{InputEvent, InputState, Key};
use crate::sketch::Sketch;

/// Outcome of dispatching one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Continue,
    /// Termination was triggered; `on_quit` has already run.
    Quit,
}

#[derive(Debug)]
pub struct EventDispatcher {
    cancel_key: Key,
    quit_fired: bool,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::with_cancel_key(Key::Escape)
    }

    pub fn with_cancel_key(cancel_key: Key) -> Self {
        Self { cancel_key, quit_fired: false }
    }

    pub fn cancel_key(&self) -> Key {
        self.cancel_key
    }

    /// True once `on_quit` has been invoked.
    pub fn has_quit(&self) -> bool {
        self.quit_fired
    }

    /// Apply `event` to `input`, then run the sketch's callbacks for it.
    pub fn dispatch(
        &mut self,
        event: &InputEvent,
        input: &mut InputState,
        sketch: &mut dyn Sketch,
    ) -> Dispatch {
        if self.quit_fired {
            return Dispatch::Quit;
        }

        match *event {
            InputEvent::PointerDown { x, y, button } => {
                input.pointer_x = x;
                input.pointer_y = y;
                input.pointer_pressed = true;
                input.last_pointer_button = Some(button);
                sketch.on_pointer_down_event(event, input);
                sketch.on_pointer_down(input);
            }
            InputEvent::PointerUp { x, y, button } => {
                input.pointer_x = x;
                input.pointer_y = y;
                input.pointer_pressed = false;
                input.last_pointer_button = Some(button);
                sketch.on_pointer_up_event(event, input);
                sketch.on_pointer_up(input);
            }
            InputEvent::PointerClick { x, y, .. } => {
                input.pointer_x = x;
                input.pointer_y = y;
                sketch.on_pointer_click_event(event, input);
                sketch.on_pointer_click(input);
            }
            InputEvent::PointerMove { x, y } => {
                input.pointer_x = x;
                input.pointer_y = y;
                sketch.on_pointer_move_event(event, input);
                sketch.on_pointer_move(input);
            }
            InputEvent::PointerDrag { x, y } => {
                input.pointer_x = x;
                input.pointer_y = y;
                sketch.on_pointer_drag_event(event, input);
                sketch.on_pointer_drag(input);
            }
            InputEvent::PointerScroll { x, y, .. } => {
                input.pointer_x = x;
                input.pointer_y = y;
                sketch.on_pointer_scroll_event(event, input);
                sketch.on_pointer_scroll(input);
            }
            InputEvent::KeyDown { key, .. } if key == self.cancel_key => {
                info!(?key, "cancel key pressed");
                return self.quit(sketch);
            }
            InputEvent::KeyDown { key, ch } => {
                input.last_key = Some(key);
                input.last_key_char = ch;
                sketch.on_key_down_event(event, input);
                sketch.on_key_down(input);
            }
            InputEvent::KeyUp { .. } => {
                sketch.on_key_up_event(event, input);
                sketch.on_key_up(input);
            }
            InputEvent::KeyTyped { .. } => {
                sketch.on_key_typed_event(event, input);
                sketch.on_key_typed(input);
            }
            InputEvent::WindowCloseRequested => {
                info!("window close requested");
                return self.quit(sketch);
            }
        }

        Dispatch::Continue
    }

    /// Run `on_quit` (at most once per dispatcher) and report termination.
    pub fn quit(&mut self, sketch: &mut dyn Sketch) -> Dispatch {
        if !self.quit_fired {
            self.quit_fired = true;
            sketch.on_quit();
        } else {
            debug!("quit already in progress");
        }
        Dispatch::Quit
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
