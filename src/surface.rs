// The windowing collaborator as seen by the render loop.

use crate::error::Result;
use crate::input::InputEvent;
use crate::raster::Painter;

/// Space taken by window decorations around the drawing area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insets {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

/// A window (or anything standing in for one) with a double-buffered
/// drawing area and a source of input events.
pub trait Surface {
    /// Drawing target for the next frame, `None` while the surface is not ready.
    fn back_buffer(&mut self) -> Option<&mut dyn Painter>;

    /// Make the back buffer visible.
    fn present(&mut self) -> Result<()>;

    /// Pump the native event source and append canonical events to `out`.
    fn poll_events(&mut self, out: &mut Vec<InputEvent>);

    /// True once the native window started going away; present errors are
    /// expected from then on.
    fn is_closing(&self) -> bool;

    /// Release the native window. Calling it twice is harmless.
    fn dispose(&mut self);

    /// Drawing area size in pixels.
    fn size(&self) -> (usize, usize);

    fn insets(&self) -> Insets {
        Insets::default()
    }

    fn set_undecorated(&mut self, _undecorated: bool) {}
}
