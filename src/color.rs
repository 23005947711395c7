// Colors and the color cache.
//
// Every color a sketch asks for is clamped to 0..=255 per channel and handed
// out as a shared `ColorHandle`. Equal requests share one handle until the
// cache overflows and starts over.

use std::collections::HashMap;
use std::rc::Rc;

/// Immutable RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Canonical, shared color as returned by [`ColorCache::acquire`].
pub type ColorHandle = Rc<Color>;

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const LIGHT_GRAY: Color = Color::rgb(200, 200, 200);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from unchecked channels, clamping each to 0..=255.
    pub fn clamped(r: i32, g: i32, b: i32, a: i32) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_channel(a),
        }
    }

    /// Fully transparent colors mean "skip this pass" to every primitive.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.a != 0
    }

    /// Cache key: 0xRRGGBBAA.
    #[inline]
    pub fn packed(&self) -> u32 {
        (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
    }

    /// Pixel value for a 0x00RRGGBB framebuffer (alpha dropped).
    #[inline]
    pub fn to_rgb_u32(&self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

#[inline]
fn clamp_channel(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Bounded color deduplication table.
///
/// Eviction is all-or-nothing: when an insert would exceed `capacity` the
/// table is emptied first. Handles already given out keep their values.
#[derive(Debug)]
pub struct ColorCache {
    entries: HashMap<u32, ColorHandle>,
    capacity: usize,
}

impl ColorCache {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    /// Canonical handle for the clamped channels.
    pub fn acquire(&mut self, r: i32, g: i32, b: i32, a: i32) -> ColorHandle {
        let color = Color::clamped(r, g, b, a);
        let key = color.packed();

        if let Some(handle) = self.entries.get(&key) {
            return Rc::clone(handle);
        }

        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }

        let handle = Rc::new(color);
        self.entries.insert(key, Rc::clone(&handle));
        handle
    }

    pub fn acquire_color(&mut self, color: Color) -> ColorHandle {
        self.acquire(color.r as i32, color.g as i32, color.b as i32, color.a as i32)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ColorCache {
    fn default() -> Self {
        Self::new()
    }
}
