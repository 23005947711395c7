// microframe: a minimal immediate-mode 2D drawing framework.
//
// Implement `Sketch`, hand it to `run`, and the framework opens a
// window, calls `on_render` at the configured frame rate with a `Canvas`
// bound to the back buffer, presents the result and dispatches input to
// the sketch's callbacks. Escape or closing the window ends the run.

pub mod canvas;
pub mod clock;
pub mod color;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod image;
pub mod input;
pub mod math;
pub mod raster;
pub mod sketch;
pub mod style;
pub mod surface;
pub mod types;
pub mod window;

pub use canvas::Canvas;
pub use clock::{Clock, FrameClock, ManualClock, SystemClock};
pub use color::{Color, ColorCache, ColorHandle};
pub use config::{Settings, WindowConfig};
pub use dispatch::{Dispatch, EventDispatcher};
pub use engine::{LoopState, RenderLoop, Step};
pub use error::{Error, Result};
pub use crate::image::Image;
pub use input::{InputEvent, InputState, Key, MouseButton};
pub use raster::Painter;
pub use sketch::Sketch;
pub use style::StyleState;
pub use surface::{Insets, Surface};
pub use types::FrameBuffer;
pub use window::MinifbSurface;

use tracing::info;

/// Run a sketch to completion.
///
/// `on_create` configures the window, which is then opened and shown; the
/// render loop runs on the calling thread until Escape, a window close, a
/// `Canvas::quit` or a render error stops it.
pub fn run<S: Sketch>(mut sketch: S) -> Result<()> {
    // minifb cannot query the screen, so fullscreen keeps the configured size.
    let mut settings = Settings::new(None);
    sketch.on_create(&mut settings)?;
    let config = settings.into_config();
    config.validate()?;

    let surface = MinifbSurface::open(&config)?;
    let mut render_loop = RenderLoop::new(surface, SystemClock::new(), &config)?;
    render_loop.run(&mut sketch)?;

    info!("sketch finished");
    Ok(())
}
