// The render context handed to `Sketch::on_render`.
//
// A `Canvas` binds the current back buffer to the style, input and clock
// state for the duration of one frame. Every primitive consults the style
// first: an invisible (alpha 0) fill or stroke skips that pass entirely.

use std::fmt::Display;
use std::rc::Rc;

use crate::clock::FrameClock;
use crate::color::Color;
use crate::error::{Error, Result};
use crate::image::Image;
use crate::input::{InputState, Key, MouseButton};
use crate::raster::Painter;
use crate::style::StyleState;

pub struct Canvas<'a> {
    painter: &'a mut dyn Painter,
    style: &'a mut StyleState,
    input: &'a InputState,
    clock: &'a mut FrameClock,
    quit_requested: &'a mut bool,
}

impl<'a> Canvas<'a> {
    pub fn new(
        painter: &'a mut dyn Painter,
        style: &'a mut StyleState,
        input: &'a InputState,
        clock: &'a mut FrameClock,
        quit_requested: &'a mut bool,
    ) -> Self {
        Self { painter, style, input, clock, quit_requested }
    }

    /* ---------- surface / frame info ---------- */

    pub fn width(&self) -> usize {
        self.painter.size().0
    }

    pub fn height(&self) -> usize {
        self.painter.size().1
    }

    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    pub fn frame_rate(&self) -> u32 {
        self.clock.frame_rate()
    }

    /// Frames presented during the last full second.
    pub fn measured_fps(&self) -> u32 {
        self.clock.measured_fps()
    }

    pub fn set_frame_rate(&mut self, frame_rate: i32) -> Result<()> {
        self.clock.set_frame_rate(frame_rate)
    }

    /// Ask the loop to terminate before the next frame.
    pub fn quit(&mut self) {
        *self.quit_requested = true;
    }

    /* ---------- input ---------- */

    pub fn input(&self) -> &InputState {
        self.input
    }

    pub fn mouse_x(&self) -> i32 {
        self.input.pointer_x()
    }

    pub fn mouse_y(&self) -> i32 {
        self.input.pointer_y()
    }

    pub fn is_mouse_pressed(&self) -> bool {
        self.input.is_pointer_pressed()
    }

    pub fn last_pointer_button(&self) -> Option<MouseButton> {
        self.input.last_pointer_button()
    }

    pub fn last_key(&self) -> Option<Key> {
        self.input.last_key()
    }

    pub fn last_key_char(&self) -> Option<char> {
        self.input.last_key_char()
    }

    /* ---------- style ---------- */

    pub fn style(&self) -> &StyleState {
        self.style
    }

    pub fn stroke(&mut self, r: i32, g: i32, b: i32, a: i32) {
        self.style.stroke(r, g, b, a);
    }

    pub fn stroke_rgb(&mut self, r: i32, g: i32, b: i32) {
        self.style.stroke_rgb(r, g, b);
    }

    pub fn stroke_gray(&mut self, gray: i32) {
        self.style.stroke_gray(gray);
    }

    pub fn stroke_gray_alpha(&mut self, gray: i32, alpha: i32) {
        self.style.stroke_gray_alpha(gray, alpha);
    }

    pub fn stroke_color(&mut self, color: Color) {
        self.style.set_stroke_color(color);
    }

    pub fn stroke_off(&mut self) {
        self.style.stroke_off();
    }

    pub fn fill(&mut self, r: i32, g: i32, b: i32, a: i32) {
        self.style.fill(r, g, b, a);
    }

    pub fn fill_rgb(&mut self, r: i32, g: i32, b: i32) {
        self.style.fill_rgb(r, g, b);
    }

    pub fn fill_gray(&mut self, gray: i32) {
        self.style.fill_gray(gray);
    }

    pub fn fill_gray_alpha(&mut self, gray: i32, alpha: i32) {
        self.style.fill_gray_alpha(gray, alpha);
    }

    pub fn fill_color(&mut self, color: Color) {
        self.style.set_fill_color(color);
    }

    pub fn fill_off(&mut self) {
        self.style.fill_off();
    }

    pub fn stroke_weight(&self) -> f32 {
        self.style.stroke_weight()
    }

    pub fn set_stroke_weight(&mut self, weight: f32) -> Result<()> {
        self.style.set_stroke_weight(weight)
    }

    pub fn text_size(&self) -> u32 {
        self.style.text_size()
    }

    pub fn set_text_size(&mut self, size: i32) -> Result<()> {
        self.style.set_text_size(size)
    }

    /* ---------- primitives ---------- */

    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let stroke = self.style.stroke_color();
        if stroke.is_visible() {
            self.painter.line(x0, y0, x1, y1, stroke, self.style.stroke_weight());
        }
    }

    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let fill = self.style.fill_color();
        if fill.is_visible() {
            self.painter.fill_rect(x, y, w, h, fill);
        }
        let stroke = self.style.stroke_color();
        if stroke.is_visible() {
            self.painter.stroke_rect(x, y, w, h, stroke, self.style.stroke_weight());
        }
    }

    pub fn oval(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let fill = self.style.fill_color();
        if fill.is_visible() {
            self.painter.fill_oval(x, y, w, h, fill);
        }
        let stroke = self.style.stroke_color();
        if stroke.is_visible() {
            self.painter.stroke_oval(x, y, w, h, stroke, self.style.stroke_weight());
        }
    }

    /// A filled square as wide as the stroke weight, in the stroke color.
    pub fn point(&mut self, x: i32, y: i32) {
        let stroke = self.style.stroke_color();
        if stroke.is_visible() {
            let size = self.style.stroke_weight() as i32;
            self.painter.fill_rect(x, y, size, size, stroke);
        }
    }

    /// Text in the fill color, baseline at `y`. Numbers work too.
    /// Visual: letters sit on the line `y`, like handwriting on ruled paper.
    pub fn text(&mut self, value: impl Display, x: i32, y: i32) {
        let fill = self.style.fill_color();
        if fill.is_visible() {
            let text = value.to_string();
            self.painter.text(&text, x, y, self.style.text_size(), fill);
        }
    }

    pub fn image(&mut self, image: &Image, x: i32, y: i32) {
        self.painter
            .blit(image, x, y, image.width() as i32, image.height() as i32);
    }

    pub fn image_scaled(&mut self, image: &Image, x: i32, y: i32, w: i32, h: i32) -> Result<()> {
        if w < 1 || h < 1 {
            return Err(Error::invalid(format!(
                "image size must be at least 1x1 (got {w}x{h})"
            )));
        }
        self.painter.blit(image, x, y, w, h);
        Ok(())
    }

    /// Paint the whole surface without disturbing the current stroke/fill.
    /// Visual: the previous frame is wiped; shapes drawn next keep their colors.
    pub fn background(&mut self, r: i32, g: i32, b: i32, a: i32) {
        let saved_stroke = Rc::clone(self.style.stroke_handle());
        let saved_fill = Rc::clone(self.style.fill_handle());

        self.style.stroke_off();
        self.style.fill(r, g, b, a);
        let (w, h) = self.painter.size();
        self.rect(0, 0, w as i32, h as i32);

        self.style.replace_colors(saved_stroke, saved_fill);
    }

    pub fn background_rgb(&mut self, r: i32, g: i32, b: i32) {
        self.background(r, g, b, 255);
    }

    pub fn background_gray(&mut self, gray: i32) {
        self.background(gray, gray, gray, 255);
    }

    pub fn background_gray_alpha(&mut self, gray: i32, alpha: i32) {
        self.background(gray, gray, gray, alpha);
    }

    pub fn background_color(&mut self, color: Color) {
        self.background(color.r as i32, color.g as i32, color.b as i32, color.a as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FrameBuffer;

    /// Painter that only records which draw calls were issued.
    #[derive(Default)]
    struct RecordingPainter {
        calls: Vec<String>,
        last_color: Option<Color>,
        last_weight: Option<f32>,
    }

    impl Painter for RecordingPainter {
        fn size(&self) -> (usize, usize) {
            (200, 100)
        }
        fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
            self.calls.push(format!("fill_rect {x} {y} {w} {h}"));
            self.last_color = Some(color);
        }
        fn stroke_rect(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, color: Color, weight: f32) {
            self.calls.push("stroke_rect".into());
            self.last_color = Some(color);
            self.last_weight = Some(weight);
        }
        fn fill_oval(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, color: Color) {
            self.calls.push("fill_oval".into());
            self.last_color = Some(color);
        }
        fn stroke_oval(&mut self, _x: i32, _y: i32, _w: i32, _h: i32, color: Color, _weight: f32) {
            self.calls.push("stroke_oval".into());
            self.last_color = Some(color);
        }
        fn line(&mut self, _x0: i32, _y0: i32, _x1: i32, _y1: i32, color: Color, _weight: f32) {
            self.calls.push("line".into());
            self.last_color = Some(color);
        }
        fn text(&mut self, text: &str, _x: i32, _y: i32, size: u32, color: Color) {
            self.calls.push(format!("text {text} {size}"));
            self.last_color = Some(color);
        }
        fn blit(&mut self, _image: &Image, x: i32, y: i32, w: i32, h: i32) {
            self.calls.push(format!("blit {x} {y} {w} {h}"));
        }
    }

    struct Fixture {
        painter: RecordingPainter,
        style: StyleState,
        input: InputState,
        clock: FrameClock,
        quit: bool,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                painter: RecordingPainter::default(),
                style: StyleState::new(),
                input: InputState::new(),
                clock: FrameClock::new(60, 0).unwrap(),
                quit: false,
            }
        }

        fn canvas(&mut self) -> Canvas<'_> {
            Canvas::new(
                &mut self.painter,
                &mut self.style,
                &self.input,
                &mut self.clock,
                &mut self.quit,
            )
        }
    }

    #[test]
    fn test_invisible_style_issues_no_draw_calls() {
        let mut fx = Fixture::new();
        {
            let mut canvas = fx.canvas();
            canvas.fill_off();
            canvas.stroke_off();
            canvas.rect(0, 0, 10, 10);
            canvas.oval(0, 0, 10, 10);
            canvas.point(3, 3);
            canvas.line(0, 0, 5, 5);
            canvas.text("hidden", 0, 10);
        }
        assert!(fx.painter.calls.is_empty());
    }

    #[test]
    fn test_rect_fill_and_stroke_passes() {
        let mut fx = Fixture::new();
        fx.canvas().rect(1, 2, 3, 4);
        assert_eq!(fx.painter.calls, vec!["fill_rect 1 2 3 4", "stroke_rect"]);

        fx.painter.calls.clear();
        {
            let mut canvas = fx.canvas();
            canvas.fill_off();
            canvas.oval(0, 0, 5, 5);
        }
        assert_eq!(fx.painter.calls, vec!["stroke_oval"]);
    }

    #[test]
    fn test_point_uses_stroke_weight_and_color() {
        let mut fx = Fixture::new();
        {
            let mut canvas = fx.canvas();
            canvas.stroke_rgb(255, 0, 0);
            canvas.set_stroke_weight(4.0).unwrap();
            canvas.point(10, 20);
        }
        assert_eq!(fx.painter.calls, vec!["fill_rect 10 20 4 4"]);
        assert_eq!(fx.painter.last_color, Some(Color::RED));
    }

    #[test]
    fn test_text_accepts_numbers() {
        let mut fx = Fixture::new();
        {
            let mut canvas = fx.canvas();
            canvas.text(42, 0, 10);
            canvas.text(1.5f32, 0, 10);
            canvas.set_text_size(16).unwrap();
            canvas.text("hi", 0, 10);
        }
        assert_eq!(fx.painter.calls, vec!["text 42 12", "text 1.5 12", "text hi 16"]);
    }

    #[test]
    fn test_background_restores_style() {
        let mut fx = Fixture::new();
        {
            let mut canvas = fx.canvas();
            canvas.stroke_color(Color::RED);
            canvas.fill_color(Color::BLUE);
            canvas.background_color(Color::BLACK);
        }
        assert_eq!(fx.painter.calls, vec!["fill_rect 0 0 200 100"]);
        assert_eq!(fx.painter.last_color, Some(Color::BLACK));
        assert_eq!(fx.style.stroke_color(), Color::RED);
        assert_eq!(fx.style.fill_color(), Color::BLUE);
    }

    #[test]
    fn test_image_scaled_rejects_degenerate_size() {
        let mut fx = Fixture::new();
        let image = Image::from_argb(1, 1, vec![0xFFFF_FFFF]).unwrap();
        {
            let mut canvas = fx.canvas();
            assert!(matches!(
                canvas.image_scaled(&image, 0, 0, 0, 5),
                Err(Error::InvalidArgument(_))
            ));
            canvas.image_scaled(&image, 1, 2, 8, 9).unwrap();
            canvas.image(&image, 3, 4);
        }
        assert_eq!(fx.painter.calls, vec!["blit 1 2 8 9", "blit 3 4 1 1"]);
    }

    #[test]
    fn test_quit_and_frame_rate() {
        let mut fx = Fixture::new();
        {
            let mut canvas = fx.canvas();
            assert!(canvas.set_frame_rate(0).is_err());
            canvas.set_frame_rate(30).unwrap();
            assert_eq!(canvas.frame_rate(), 30);
            canvas.quit();
        }
        assert!(fx.quit);
        assert_eq!(fx.clock.frame_rate(), 30);
    }

    #[test]
    fn test_background_on_framebuffer() {
        let mut fb = FrameBuffer::new(4, 3);
        let mut style = StyleState::new();
        let input = InputState::new();
        let mut clock = FrameClock::new(60, 0).unwrap();
        let mut quit = false;
        let mut canvas = Canvas::new(&mut fb, &mut style, &input, &mut clock, &mut quit);

        canvas.background_rgb(10, 20, 30);
        assert_eq!(canvas.width(), 4);
        drop(canvas);
        assert!(fb.pixels.iter().all(|&p| p == 0x0A141E));
    }
}
