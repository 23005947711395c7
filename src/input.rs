// Canonical input events and the latest captured input state.

pub use minifb::{Key, MouseButton};

/// Input notifications, as translated from the windowing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: i32, y: i32, button: MouseButton },
    PointerUp { x: i32, y: i32, button: MouseButton },
    /// Press and release of the same button without moving in between.
    PointerClick { x: i32, y: i32, button: MouseButton },
    PointerMove { x: i32, y: i32 },
    /// Movement while any button is held.
    PointerDrag { x: i32, y: i32 },
    PointerScroll { x: i32, y: i32, dx: f32, dy: f32 },
    KeyDown { key: Key, ch: Option<char> },
    KeyUp { key: Key, ch: Option<char> },
    KeyTyped { ch: char },
    WindowCloseRequested,
}

impl InputEvent {
    /// Pointer coordinates carried by the event, if any.
    pub fn position(&self) -> Option<(i32, i32)> {
        match *self {
            InputEvent::PointerDown { x, y, .. }
            | InputEvent::PointerUp { x, y, .. }
            | InputEvent::PointerClick { x, y, .. }
            | InputEvent::PointerMove { x, y }
            | InputEvent::PointerDrag { x, y }
            | InputEvent::PointerScroll { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }
}

/// What user code sees when it asks "where is the mouse" or "what was typed".
///
/// Only the dispatcher writes this, right before it calls the matching
/// callbacks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub(crate) pointer_x: i32,
    pub(crate) pointer_y: i32,
    pub(crate) pointer_pressed: bool,
    pub(crate) last_pointer_button: Option<MouseButton>,
    pub(crate) last_key: Option<Key>,
    pub(crate) last_key_char: Option<char>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer_x(&self) -> i32 {
        self.pointer_x
    }

    pub fn pointer_y(&self) -> i32 {
        self.pointer_y
    }

    pub fn pointer(&self) -> (i32, i32) {
        (self.pointer_x, self.pointer_y)
    }

    pub fn is_pointer_pressed(&self) -> bool {
        self.pointer_pressed
    }

    pub fn last_pointer_button(&self) -> Option<MouseButton> {
        self.last_pointer_button
    }

    pub fn last_key(&self) -> Option<Key> {
        self.last_key
    }

    pub fn last_key_char(&self) -> Option<char> {
        self.last_key_char
    }
}

/// Best-effort character for a key, used when the platform gives none.
pub fn key_to_char(key: Key, shift: bool) -> Option<char> {
    let ch = match key {
        Key::A => 'a',
        Key::B => 'b',
        Key::C => 'c',
        Key::D => 'd',
        Key::E => 'e',
        Key::F => 'f',
        Key::G => 'g',
        Key::H => 'h',
        Key::I => 'i',
        Key::J => 'j',
        Key::K => 'k',
        Key::L => 'l',
        Key::M => 'm',
        Key::N => 'n',
        Key::O => 'o',
        Key::P => 'p',
        Key::Q => 'q',
        Key::R => 'r',
        Key::S => 's',
        Key::T => 't',
        Key::U => 'u',
        Key::V => 'v',
        Key::W => 'w',
        Key::X => 'x',
        Key::Y => 'y',
        Key::Z => 'z',
        Key::Key0 | Key::NumPad0 => '0',
        Key::Key1 | Key::NumPad1 => '1',
        Key::Key2 | Key::NumPad2 => '2',
        Key::Key3 | Key::NumPad3 => '3',
        Key::Key4 | Key::NumPad4 => '4',
        Key::Key5 | Key::NumPad5 => '5',
        Key::Key6 | Key::NumPad6 => '6',
        Key::Key7 | Key::NumPad7 => '7',
        Key::Key8 | Key::NumPad8 => '8',
        Key::Key9 | Key::NumPad9 => '9',
        Key::Space => ' ',
        Key::Enter | Key::NumPadEnter => '\n',
        Key::Tab => '\t',
        Key::Escape => '\u{1b}',
        Key::Backspace => '\u{8}',
        Key::Comma => ',',
        Key::Period | Key::NumPadDot => '.',
        Key::Minus | Key::NumPadMinus => '-',
        Key::Equal => '=',
        Key::Slash | Key::NumPadSlash => '/',
        Key::Semicolon => ';',
        Key::Apostrophe => '\'',
        Key::NumPadPlus => '+',
        Key::NumPadAsterisk => '*',
        _ => return None,
    };
    Some(if shift { ch.to_ascii_uppercase() } else { ch })
}
