// Drawing style: stroke, fill, stroke weight and text size.
//
// The style persists across frames until a sketch changes it. All colors go
// through the `ColorCache`.

use crate::color::{Color, ColorCache, ColorHandle};
use crate::error::{Error, Result};

pub const DEFAULT_STROKE_WEIGHT: f32 = 1.0;
pub const DEFAULT_TEXT_SIZE: u32 = 12;

#[derive(Debug)]
pub struct StyleState {
    stroke: ColorHandle,
    fill: ColorHandle,
    stroke_weight: f32,
    text_size: u32,
    cache: ColorCache,
}

impl StyleState {
    pub fn new() -> Self {
        Self::with_cache(ColorCache::new())
    }

    pub fn with_cache(mut cache: ColorCache) -> Self {
        let stroke = cache.acquire_color(Color::BLACK);
        let fill = cache.acquire_color(Color::LIGHT_GRAY);
        Self {
            stroke,
            fill,
            stroke_weight: DEFAULT_STROKE_WEIGHT,
            text_size: DEFAULT_TEXT_SIZE,
            cache,
        }
    }

    pub fn stroke_color(&self) -> Color {
        *self.stroke
    }

    pub fn fill_color(&self) -> Color {
        *self.fill
    }

    /// Shared handle of the current stroke color.
    pub fn stroke_handle(&self) -> &ColorHandle {
        &self.stroke
    }

    pub fn fill_handle(&self) -> &ColorHandle {
        &self.fill
    }

    pub fn stroke_weight(&self) -> f32 {
        self.stroke_weight
    }

    pub fn text_size(&self) -> u32 {
        self.text_size
    }

    pub fn is_stroke_visible(&self) -> bool {
        self.stroke.is_visible()
    }

    pub fn is_fill_visible(&self) -> bool {
        self.fill.is_visible()
    }

    pub fn cache(&self) -> &ColorCache {
        &self.cache
    }

    /* ---------- stroke ---------- */

    pub fn stroke(&mut self, r: i32, g: i32, b: i32, a: i32) {
        self.stroke = self.cache.acquire(r, g, b, a);
    }

    pub fn stroke_rgb(&mut self, r: i32, g: i32, b: i32) {
        self.stroke(r, g, b, 255);
    }

    pub fn stroke_gray_alpha(&mut self, gray: i32, alpha: i32) {
        self.stroke(gray, gray, gray, alpha);
    }

    pub fn stroke_gray(&mut self, gray: i32) {
        self.stroke_gray_alpha(gray, 255);
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke = self.cache.acquire_color(color);
    }

    pub fn stroke_off(&mut self) {
        self.stroke_gray_alpha(0, 0);
    }

    /* ---------- fill ---------- */

    pub fn fill(&mut self, r: i32, g: i32, b: i32, a: i32) {
        self.fill = self.cache.acquire(r, g, b, a);
    }

    pub fn fill_rgb(&mut self, r: i32, g: i32, b: i32) {
        self.fill(r, g, b, 255);
    }

    pub fn fill_gray_alpha(&mut self, gray: i32, alpha: i32) {
        self.fill(gray, gray, gray, alpha);
    }

    pub fn fill_gray(&mut self, gray: i32) {
        self.fill_gray_alpha(gray, 255);
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill = self.cache.acquire_color(color);
    }

    pub fn fill_off(&mut self) {
        self.fill_gray_alpha(0, 0);
    }

    /* ---------- weight / text ---------- */

    pub fn set_stroke_weight(&mut self, weight: f32) -> Result<()> {
        // `!(w >= 1)` also rejects NaN.
        if !(weight >= 1.0) || !weight.is_finite() {
            return Err(Error::invalid(format!(
                "stroke weight must be finite and at least 1 (got {weight})"
            )));
        }
        self.stroke_weight = weight;
        Ok(())
    }

    pub fn set_text_size(&mut self, size: i32) -> Result<()> {
        if size < 1 {
            return Err(Error::invalid(format!(
                "text size cannot be less than 1 (got {size})"
            )));
        }
        self.text_size = size as u32;
        Ok(())
    }

    /// Swap in a stroke/fill pair, returning the previous one.
    pub(crate) fn replace_colors(
        &mut self,
        stroke: ColorHandle,
        fill: ColorHandle,
    ) -> (ColorHandle, ColorHandle) {
        let old_stroke = std::mem::replace(&mut self.stroke, stroke);
        let old_fill = std::mem::replace(&mut self.fill, fill);
        (old_stroke, old_fill)
    }
}

impl Default for StyleState {
    fn default() -> Self {
        Self::new()
    }
}
