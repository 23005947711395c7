// minifb-backed Surface: the on-screen window, its two framebuffers, and the
// translation of minifb's polled input state into canonical events.

use std::cell::RefCell;
use std::rc::Rc;

use minifb::{InputCallback, KeyRepeat, MouseMode, Window, WindowOptions};
use tracing::{debug, info, warn};

use crate::config::WindowConfig;
use crate::error::{Error, Result};
use crate::input::{key_to_char, InputEvent, Key, MouseButton};
use crate::raster::Painter;
use crate::surface::Surface;
use crate::types::FrameBuffer;

const BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Middle, MouseButton::Right];

/// Collects characters minifb reports through its input callback.
struct TypedChars(Rc<RefCell<Vec<char>>>);

impl InputCallback for TypedChars {
    fn add_char(&mut self, uni_char: u32) {
        if let Some(ch) = char::from_u32(uni_char) {
            self.0.borrow_mut().push(ch);
        }
    }
}

/// Turns successive pointer samples into down/up/click/move/drag events.
#[derive(Debug, Default)]
pub(crate) struct PointerTracker {
    pos: Option<(i32, i32)>,
    down: [bool; 3],
    moved_while_down: [bool; 3],
}

impl PointerTracker {
    /// Compare one sample with the previous one. `pos` is `None` when the
    /// pointer is outside the drawing area.
    pub(crate) fn update(&mut self, pos: Option<(i32, i32)>, down: [bool; 3], out: &mut Vec<InputEvent>) {
        let (x, y) = match pos.or(self.pos) {
            Some(p) => p,
            None => return,
        };

        if pos.is_some() && self.pos.is_some() && pos != self.pos {
            if self.down.iter().any(|&d| d) {
                out.push(InputEvent::PointerDrag { x, y });
                for (moved, &held) in self.moved_while_down.iter_mut().zip(&self.down) {
                    *moved |= held;
                }
            } else {
                out.push(InputEvent::PointerMove { x, y });
            }
        }
        if pos.is_some() {
            self.pos = pos;
        }

        for (i, &button) in BUTTONS.iter().enumerate() {
            match (self.down[i], down[i]) {
                (false, true) => {
                    self.moved_while_down[i] = false;
                    out.push(InputEvent::PointerDown { x, y, button });
                }
                (true, false) => {
                    out.push(InputEvent::PointerUp { x, y, button });
                    if !self.moved_while_down[i] {
                        out.push(InputEvent::PointerClick { x, y, button });
                    }
                }
                _ => {}
            }
            self.down[i] = down[i];
        }
    }

    pub(crate) fn position(&self) -> Option<(i32, i32)> {
        self.pos
    }
}

pub struct MinifbSurface {
    window: Option<Window>, // the on-screen window you see; None once disposed
    back: FrameBuffer,      // what the current frame draws into
    front: FrameBuffer,     // what the window currently shows
    title: String,
    resizable: bool,
    undecorated: bool,
    closing: bool,
    pointer: PointerTracker,
    typed: Rc<RefCell<Vec<char>>>,
}

fn create_window(
    title: &str,
    width: usize,
    height: usize,
    resizable: bool,
    borderless: bool,
    typed: &Rc<RefCell<Vec<char>>>,
) -> Result<Window> {
    let options = WindowOptions {
        resize: resizable,
        borderless,
        ..WindowOptions::default()
    };
    let mut window =
        Window::new(title, width, height, options).map_err(|e| Error::WindowInit(e.to_string()))?;

    // Pacing belongs to the FrameClock, not to minifb.
    window.set_target_fps(0);
    window.set_input_callback(Box::new(TypedChars(Rc::clone(typed))));
    Ok(window)
}

impl MinifbSurface {
    /// Create and show a window for `config`.
    pub fn open(config: &WindowConfig) -> Result<Self> {
        config.validate()?;

        let typed = Rc::new(RefCell::new(Vec::new()));
        let window = create_window(
            &config.title,
            config.width,
            config.height,
            config.resizable,
            config.fullscreen,
            &typed,
        )?;

        info!(
            title = %config.title,
            width = config.width,
            height = config.height,
            resizable = config.resizable,
            fullscreen = config.fullscreen,
            "window opened"
        );

        Ok(Self {
            window: Some(window),
            back: FrameBuffer::new(config.width, config.height),
            front: FrameBuffer::new(config.width, config.height),
            title: config.title.clone(),
            resizable: config.resizable,
            undecorated: config.fullscreen,
            closing: false,
            pointer: PointerTracker::default(),
            typed,
        })
    }

    /// Follow user resizes of a resizable window.
    fn sync_size(&mut self) {
        let Some(window) = self.window.as_ref() else { return };
        if !self.resizable {
            return;
        }
        let (w, h) = window.get_size();
        if w > 0 && h > 0 && (w, h) != (self.back.width, self.back.height) {
            debug!(width = w, height = h, "window resized");
            self.back.resize(w, h);
            self.front.resize(w, h);
        }
    }
}

impl Surface for MinifbSurface {
    fn back_buffer(&mut self) -> Option<&mut dyn Painter> {
        if self.closing || self.window.is_none() {
            return None;
        }
        self.sync_size();
        Some(&mut self.back)
    }

    /// Visual: the window immediately shows everything drawn this frame.
    fn present(&mut self) -> Result<()> {
        let Some(window) = self.window.as_mut() else {
            return Err(Error::WindowUpdate("window already disposed".into()));
        };
        self.front.copy_from(&self.back);
        window
            .update_with_buffer(&self.front.pixels, self.front.width, self.front.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    fn poll_events(&mut self, out: &mut Vec<InputEvent>) {
        let Some(window) = self.window.as_mut() else { return };

        window.update();
        if !window.is_open() {
            self.closing = true;
            out.push(InputEvent::WindowCloseRequested);
            return;
        }

        let pos = window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x as i32, y as i32));
        let down = BUTTONS.map(|b| window.get_mouse_down(b));
        self.pointer.update(pos, down, out);

        if let Some((dx, dy)) = window.get_scroll_wheel() {
            if dx != 0.0 || dy != 0.0 {
                let (x, y) = self.pointer.position().unwrap_or((0, 0));
                out.push(InputEvent::PointerScroll { x, y, dx, dy });
            }
        }

        let shift = window.is_key_down(Key::LeftShift) || window.is_key_down(Key::RightShift);
        for key in window.get_keys_pressed(KeyRepeat::No) {
            out.push(InputEvent::KeyDown { key, ch: key_to_char(key, shift) });
        }
        for ch in self.typed.borrow_mut().drain(..) {
            out.push(InputEvent::KeyTyped { ch });
        }
        for key in window.get_keys_released() {
            out.push(InputEvent::KeyUp { key, ch: key_to_char(key, shift) });
        }
    }

    fn is_closing(&self) -> bool {
        self.closing || self.window.as_ref().is_none_or(|w| !w.is_open())
    }

    fn dispose(&mut self) {
        if self.window.take().is_some() {
            self.closing = true;
            info!("window closed");
        }
    }

    fn size(&self) -> (usize, usize) {
        (self.back.width, self.back.height)
    }

    /// minifb fixes decorations at creation, so toggling them reopens the
    /// window at the current size.
    fn set_undecorated(&mut self, undecorated: bool) {
        if self.undecorated == undecorated || self.window.is_none() {
            return;
        }
        let (width, height) = (self.back.width, self.back.height);
        match create_window(&self.title, width, height, self.resizable, undecorated, &self.typed) {
            Ok(window) => {
                self.window = Some(window);
                self.undecorated = undecorated;
                self.pointer = PointerTracker::default();
                debug!(undecorated, "window reopened");
            }
            Err(e) => warn!("could not change window decorations: {e}"),
        }
    }
}
