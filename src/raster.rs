// Software drawing into a FrameBuffer: the draw calls the Canvas issues.
// Visual effects provided here:
// 1) Filled and outlined rectangles and ovals, alpha-blended over the frame.
// 2) Lines of any stroke weight with square ends.
// 3) A tiny 5x7 bitmap font for HUD text, and scaled image blits.

use crate::color::Color;
use crate::image::Image;
use crate::types::FrameBuffer;

/// Draw-call boundary between the Canvas and whatever holds the pixels.
///
/// Style decisions (visibility, which color, which weight) are already made
/// by the caller; a painter only rasterizes.
pub trait Painter {
    /// (width, height) in pixels.
    fn size(&self) -> (usize, usize);
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);
    fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, weight: f32);
    fn fill_oval(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color);
    fn stroke_oval(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, weight: f32);
    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color, weight: f32);
    /// `y` is the text baseline.
    fn text(&mut self, text: &str, x: i32, y: i32, size: u32, color: Color);
    fn blit(&mut self, image: &Image, x: i32, y: i32, w: i32, h: i32);
}

/* ---------- pixel helpers ---------- */

// Coordinates arrive as i32 from the Canvas; all edge math happens in i64
// so that sums like `x + w + t` cannot overflow, and every loop walks only
// the part of a shape that overlaps the buffer.

/// Widest pen the rasterizer honours.
const MAX_THICKNESS: i64 = i32::MAX as i64;

/// Blend `color` over the pixel at (x,y) if it is inside bounds.
/// Visual: the exact pixel at (x,y) takes on the color (or a mix, if translucent).
#[inline]
fn blend_pixel(fb: &mut FrameBuffer, x: i64, y: i64, color: Color) {
    if x < 0 || y < 0 || x >= fb.width as i64 || y >= fb.height as i64 {
        return;
    }
    let idx = y as usize * fb.width + x as usize;
    fb.pixels[idx] = blend(fb.pixels[idx], color.r, color.g, color.b, color.a);
}

/// Source-over blend of one RGBA sample onto a 0x00RRGGBB pixel.
#[inline]
fn blend(dst: u32, r: u8, g: u8, b: u8, a: u8) -> u32 {
    match a {
        0 => dst,
        255 => (r as u32) << 16 | (g as u32) << 8 | b as u32,
        _ => {
            let a = a as u32;
            let inv = 255 - a;
            let mix = |s: u8, d: u32| (s as u32 * a + d * inv + 127) / 255;
            let nr = mix(r, (dst >> 16) & 0xFF);
            let ng = mix(g, (dst >> 8) & 0xFF);
            let nb = mix(b, dst & 0xFF);
            nr << 16 | ng << 8 | nb
        }
    }
}

/// Clip `[start, start + len)` to `[0, limit)`.
#[inline]
fn clip_span(start: i64, len: i64, limit: usize) -> Option<(i64, i64)> {
    let lo = start.max(0);
    let hi = start.saturating_add(len).min(limit as i64);
    (lo < hi).then_some((lo, hi))
}

/// Fill an axis-aligned rectangle, clipped to the buffer.
fn fill_clipped(fb: &mut FrameBuffer, x: i64, y: i64, w: i64, h: i64, color: Color) {
    if w <= 0 || h <= 0 {
        return;
    }
    let (Some((x0, x1)), Some((y0, y1))) = (clip_span(x, w, fb.width), clip_span(y, h, fb.height))
    else {
        return;
    };
    for py in y0..y1 {
        let row = py as usize * fb.width;
        for px in x0..x1 {
            let idx = row + px as usize;
            fb.pixels[idx] = blend(fb.pixels[idx], color.r, color.g, color.b, color.a);
        }
    }
}

/// Pen side in whole pixels. NaN and sub-pixel weights still draw one pixel.
#[inline]
fn thickness(weight: f32) -> i64 {
    (weight.round() as i64).clamp(1, MAX_THICKNESS)
}

/// Liang-Barsky: the part of a segment inside the box `[min, max]`, or
/// `None` when the segment misses it.
fn clip_segment(
    (x0, y0): (i64, i64),
    (x1, y1): (i64, i64),
    (min_x, min_y): (i64, i64),
    (max_x, max_y): (i64, i64),
) -> Option<((i64, i64), (i64, i64))> {
    let inside = |x: i64, y: i64| (min_x..=max_x).contains(&x) && (min_y..=max_y).contains(&y);
    if inside(x0, y0) && inside(x1, y1) {
        return Some(((x0, y0), (x1, y1)));
    }

    let (fx, fy) = (x0 as f64, y0 as f64);
    let (dx, dy) = ((x1 - x0) as f64, (y1 - y0) as f64);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    let edges = [
        (-dx, fx - min_x as f64),
        (dx, max_x as f64 - fx),
        (-dy, fy - min_y as f64),
        (dy, max_y as f64 - fy),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None; // parallel and outside
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
        if t0 > t1 {
            return None;
        }
    }
    let at = |t: f64| ((fx + t * dx).round() as i64, (fy + t * dy).round() as i64);
    Some((at(t0), at(t1)))
}

/// One-pixel Bresenham line, clipped to the buffer first so the walk is
/// never longer than the buffer's diagonal.
fn draw_line(fb: &mut FrameBuffer, from: (i64, i64), to: (i64, i64), color: Color) {
    if fb.width == 0 || fb.height == 0 {
        return;
    }
    let max = (fb.width as i64 - 1, fb.height as i64 - 1);
    let Some(((mut x0, mut y0), (x1, y1))) = clip_segment(from, to, (0, 0), max) else {
        return;
    };
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        blend_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Line drawn with a square pen of side `t`, as the union of the pens
/// stamped along it. Walks the buffer one column (mostly horizontal lines)
/// or one row (mostly vertical lines) at a time and fills the single span
/// the pens cover there, so every pixel is blended once.
/// Visual: a solid band `t` pixels thick with square ends.
fn draw_thick_line(fb: &mut FrameBuffer, from: (i64, i64), to: (i64, i64), t: i64, color: Color) {
    let half = t / 2;
    let x_major = (to.0 - from.0).abs() >= (to.1 - from.1).abs();

    // (major, minor) coordinates, ordered along the major axis.
    let swap = |(x, y): (i64, i64)| if x_major { (x, y) } else { (y, x) };
    let (a, b) = (swap(from), swap(to));
    let ((a0, b0), (a1, b1)) = if a.0 <= b.0 { (a, b) } else { (b, a) };
    let extent = (if x_major { fb.width } else { fb.height }) as i64;

    // Pen center on the minor axis at major position `a`, rounded.
    let minor_at = |a: i64| -> i64 {
        if a1 == a0 {
            return b0;
        }
        let num = (a - a0) as i128 * (b1 - b0) as i128;
        let den = (a1 - a0) as i128;
        b0 + (2 * num + den).div_euclid(2 * den) as i64
    };

    for major in 0..extent {
        // Pens centered on [lo, hi] reach this column/row.
        let lo = (major + half - t + 1).max(a0);
        let hi = (major + half).min(a1);
        if lo > hi {
            continue;
        }
        let (m_lo, m_hi) = (minor_at(lo), minor_at(hi));
        let start = m_lo.min(m_hi) - half;
        let len = (m_lo - m_hi).abs() + t;
        if x_major {
            fill_clipped(fb, major, start, 1, len, color);
        } else {
            fill_clipped(fb, start, major, len, 1, color);
        }
    }
}

/// Normalized distance of a pixel center from the ellipse center; 1.0 is on the ellipse.
#[inline]
fn ellipse_dist(px: i64, py: i64, cx: f64, cy: f64, rx: f64, ry: f64) -> f64 {
    let dx = (px as f64 + 0.5 - cx) / rx;
    let dy = (py as f64 + 0.5 - cy) / ry;
    dx * dx + dy * dy
}

/* ---------- 5x7 bitmap font ---------- */

/// Return a 5x7 glyph bitmap. Lowercase letters use the uppercase shapes.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        ',' => g!(0b00000,0b00000,0b00000,0b00000,0b00110,0b00100,0b01000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '+' => g!(0b00000,0b00100,0b00100,0b11111,0b00100,0b00100,0b00000),
        '=' => g!(0b00000,0b00000,0b11111,0b00000,0b11111,0b00000,0b00000),
        '_' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b11111),
        '!' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00000,0b00100),
        '?' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b00000,0b00100),
        '/' => g!(0b00001,0b00010,0b00010,0b00100,0b01000,0b01000,0b10000),
        '(' => g!(0b00010,0b00100,0b01000,0b01000,0b01000,0b00100,0b00010),
        ')' => g!(0b01000,0b00100,0b00010,0b00010,0b00010,0b00100,0b01000),
        '%' => g!(0b11000,0b11001,0b00010,0b00100,0b01000,0b10011,0b00011),
        '*' => g!(0b00000,0b10101,0b01110,0b11111,0b01110,0b10101,0b00000),
        '\'' => g!(0b00100,0b00100,0b01000,0b00000,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Glyph scale for a text size: 5x7 cells grow in whole-pixel steps.
#[inline]
pub(crate) fn glyph_scale(size: u32) -> i64 {
    (size as i64 / 8).max(1)
}

/// Width in pixels of `text` at `size`.
pub fn text_width(text: &str, size: u32) -> i64 {
    text.chars().count() as i64 * 6 * glyph_scale(size)
}

/// Visual: one character appears with its top-left corner at (x, top),
/// each font pixel blown up to a `scale`x`scale` block.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i64, top: i64, scale: i64, ch: char, color: Color) {
    if let Some(rows) = glyph5x7(ch) {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) != 0 {
                    fill_clipped(fb, x + rx * scale, top + ry as i64 * scale, scale, scale, color);
                }
            }
        }
    }
}

/* ---------- Painter for the software framebuffer ---------- */

impl Painter for FrameBuffer {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        fill_clipped(self, x as i64, y as i64, w as i64, h as i64, color);
    }

    fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, weight: f32) {
        if w < 0 || h < 0 {
            return;
        }
        // Outline is centered on the edges and covers x..=x+w like a drawn rect.
        let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
        let t = thickness(weight);
        let (left, top) = (x - t / 2, y - t / 2);
        fill_clipped(self, left, top, w + t, t, color);                  // top
        fill_clipped(self, left, top + h, w + t, t, color);              // bottom
        fill_clipped(self, left, top + t, t, h - t, color);              // left
        fill_clipped(self, left + w, top + t, t, h - t, color);          // right
    }

    fn fill_oval(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
        let (Some((x0, x1)), Some((y0, y1))) = (clip_span(x, w, self.width), clip_span(y, h, self.height))
        else {
            return;
        };
        let (rx, ry) = (w as f64 / 2.0, h as f64 / 2.0);
        let (cx, cy) = (x as f64 + rx, y as f64 + ry);
        for py in y0..y1 {
            for px in x0..x1 {
                if ellipse_dist(px, py, cx, cy, rx, ry) <= 1.0 {
                    blend_pixel(self, px, py, color);
                }
            }
        }
    }

    fn stroke_oval(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, weight: f32) {
        if w < 0 || h < 0 {
            return;
        }
        let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
        let t = thickness(weight);
        let (rx, ry) = (w as f64 / 2.0, h as f64 / 2.0);
        let (cx, cy) = (x as f64 + rx, y as f64 + ry);
        let half = t as f64 / 2.0;
        let (orx, ory) = (rx + half, ry + half);
        let (irx, iry) = (rx - half, ry - half);

        // The ring's bounding box, padded by the pen, clipped to the buffer.
        let (Some((x0, x1)), Some((y0, y1))) = (
            clip_span(x - t, w + 2 * t + 1, self.width),
            clip_span(y - t, h + 2 * t + 1, self.height),
        ) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                if ellipse_dist(px, py, cx, cy, orx, ory) > 1.0 {
                    continue; // outside the outer edge
                }
                if irx > 0.0 && iry > 0.0 && ellipse_dist(px, py, cx, cy, irx, iry) < 1.0 {
                    continue; // inside the hole
                }
                blend_pixel(self, px, py, color);
            }
        }
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color, weight: f32) {
        let (from, to) = ((x0 as i64, y0 as i64), (x1 as i64, y1 as i64));
        match thickness(weight) {
            1 => draw_line(self, from, to, color),
            t => draw_thick_line(self, from, to, t, color),
        }
    }

    fn text(&mut self, text: &str, x: i32, y: i32, size: u32, color: Color) {
        let scale = glyph_scale(size);
        let top = y as i64 - 7 * scale;
        let mut x = x as i64;
        for ch in text.chars() {
            if x >= self.width as i64 {
                break; // the rest is off the right edge
            }
            draw_char_5x7(self, x, top, scale, ch, color);
            x += 6 * scale; // 5 pixels glyph width + 1 pixel spacing
        }
    }

    fn blit(&mut self, image: &Image, x: i32, y: i32, w: i32, h: i32) {
        if image.is_empty() || w <= 0 || h <= 0 {
            return;
        }
        let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
        // Only destination pixels that land inside the buffer.
        let (Some((x0, x1)), Some((y0, y1))) = (clip_span(x, w, self.width), clip_span(y, h, self.height))
        else {
            return;
        };
        // Nearest-neighbour sampling from destination space back into the image.
        for py in y0..y1 {
            let sy = ((py - y) as u64 * image.height() as u64 / h as u64) as usize;
            for px in x0..x1 {
                let sx = ((px - x) as u64 * image.width() as u64 / w as u64) as usize;
                let argb = image.argb_at(sx, sy);
                let color = Color::rgba(
                    (argb >> 16) as u8,
                    (argb >> 8) as u8,
                    argb as u8,
                    (argb >> 24) as u8,
                );
                blend_pixel(self, px, py, color);
            }
        }
    }
}
