// The render loop: Created → Running → Stopped.
//
// Each iteration pumps input through the dispatcher, then either presents
// a frame (when the `FrameClock` says one is due) or reports how long to
// idle. Time comes from an injected `Clock`, so a loop can be stepped
// deterministically.

use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::canvas::Canvas;
use crate::clock::{Clock, FrameClock};
use crate::config::WindowConfig;
use crate::dispatch::{Dispatch, EventDispatcher};
use crate::error::{Error, Result};
use crate::input::{InputEvent, InputState};
use crate::sketch::Sketch;
use crate::style::StyleState;
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Created,
    Running,
    Stopped,
}

/// What one call to [`RenderLoop::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A frame was rendered and presented.
    Presented,
    /// A frame was due but the surface had no back buffer.
    Skipped,
    /// Nothing due yet; sleep this long before the next step.
    Idle(Duration),
    /// The loop terminated (now or earlier).
    Stopped,
}

pub struct RenderLoop<S: Surface, C: Clock> {
    surface: S,
    clock: C,
    frame_clock: FrameClock,
    style: StyleState,
    input: InputState,
    dispatcher: EventDispatcher,
    state: LoopState,
    quit_requested: bool,
    fullscreen: bool,
    events: Vec<InputEvent>,
}

impl<S: Surface, C: Clock> RenderLoop<S, C> {
    pub fn new(surface: S, clock: C, config: &WindowConfig) -> Result<Self> {
        let frame_rate = i32::try_from(config.frame_rate)
            .map_err(|_| Error::invalid(format!("frame rate too large: {}", config.frame_rate)))?;
        let frame_clock = FrameClock::new(frame_rate, clock.now_nanos())?;

        Ok(Self {
            surface,
            clock,
            frame_clock,
            style: StyleState::new(),
            input: InputState::new(),
            dispatcher: EventDispatcher::new(),
            state: LoopState::Created,
            quit_requested: false,
            fullscreen: config.fullscreen,
            events: Vec::new(),
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frame_clock(&self) -> &FrameClock {
        &self.frame_clock
    }

    pub fn style(&self) -> &StyleState {
        &self.style
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Created → Running. The first frame is due one interval from now.
    pub fn start(&mut self) -> Result<()> {
        if self.state != LoopState::Created {
            return Err(Error::illegal(format!("cannot start a loop in state {:?}", self.state)));
        }
        if self.fullscreen {
            self.surface.set_undecorated(true);
        }
        let insets = self.surface.insets();
        let (width, height) = self.surface.size();
        debug!(width, height, ?insets, "drawing area");

        let now = self.clock.now_nanos();
        self.frame_clock = FrameClock::new(self.frame_clock.frame_rate() as i32, now)?;
        self.state = LoopState::Running;
        info!(frame_rate = self.frame_clock.frame_rate(), "render loop running");
        Ok(())
    }

    /// One iteration of the loop.
    pub fn step(&mut self, sketch: &mut dyn Sketch) -> Result<Step> {
        match self.state {
            LoopState::Stopped => return Ok(Step::Stopped),
            LoopState::Created => return Err(Error::illegal("render loop not started")),
            LoopState::Running => {}
        }

        // A quit requested during the last render wins over any pending input.
        if self.quit_requested || self.pump_events(sketch) == Dispatch::Quit {
            self.terminate(sketch);
            return Ok(Step::Stopped);
        }

        let now = self.clock.now_nanos();
        if !self.frame_clock.is_frame_due(now) {
            return Ok(Step::Idle(self.frame_clock.idle_wait(now)));
        }

        self.frame_clock.record_frame(now);
        self.frame_clock.tick_fps_meter(now);

        match self.present_frame(sketch) {
            Ok(step) => Ok(step),
            Err(e) => {
                error!("render failed: {e}");
                self.terminate(sketch);
                Err(e)
            }
        }
    }

    /// Start, then step until stopped, sleeping whenever no frame is due.
    pub fn run(&mut self, sketch: &mut dyn Sketch) -> Result<()> {
        self.start()?;
        loop {
            match self.step(sketch)? {
                Step::Stopped => return Ok(()),
                Step::Idle(wait) => thread::sleep(wait),
                Step::Presented | Step::Skipped => {}
            }
        }
    }

    fn pump_events(&mut self, sketch: &mut dyn Sketch) -> Dispatch {
        self.events.clear();
        self.surface.poll_events(&mut self.events);

        for event in &self.events {
            if self.dispatcher.dispatch(event, &mut self.input, sketch) == Dispatch::Quit {
                return Dispatch::Quit;
            }
        }
        Dispatch::Continue
    }

    /// Visual: one new picture per call, or the previous one stays up when skipped.
    fn present_frame(&mut self, sketch: &mut dyn Sketch) -> Result<Step> {
        let Some(painter) = self.surface.back_buffer() else {
            debug!("back buffer not ready, frame skipped");
            return Ok(Step::Skipped);
        };

        {
            let mut canvas = Canvas::new(
                painter,
                &mut self.style,
                &self.input,
                &mut self.frame_clock,
                &mut self.quit_requested,
            );
            sketch.on_render(&mut canvas)?;
        }

        if let Err(e) = self.surface.present() {
            if self.surface.is_closing() {
                debug!("present during shutdown ignored: {e}");
            } else {
                warn!("present failed, frame dropped: {e}");
            }
        }
        Ok(Step::Presented)
    }

    /// Running → Stopped. `on_quit` runs once, the surface is released.
    fn terminate(&mut self, sketch: &mut dyn Sketch) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.dispatcher.quit(sketch);
        self.state = LoopState::Stopped;
        self.surface.dispose();
        info!(frames = self.frame_clock.frame_count(), "render loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::Settings;
    use crate::input::{Key, MouseButton};
    use crate::raster::Painter;
    use crate::types::FrameBuffer;
    use std::collections::VecDeque;

    /// Scripted surface: hands out queued event batches, counts presents.
    struct FakeSurface {
        buffer: FrameBuffer,
        ready: bool,
        batches: VecDeque<Vec<InputEvent>>,
        presents: u32,
        fail_present: bool,
        closing: bool,
        disposed: u32,
        undecorated: bool,
    }

    impl FakeSurface {
        fn new() -> Self {
            Self {
                buffer: FrameBuffer::new(100, 100),
                ready: true,
                batches: VecDeque::new(),
                presents: 0,
                fail_present: false,
                closing: false,
                disposed: 0,
                undecorated: false,
            }
        }
    }

    impl Surface for FakeSurface {
        fn back_buffer(&mut self) -> Option<&mut dyn Painter> {
            if self.ready { Some(&mut self.buffer) } else { None }
        }
        fn present(&mut self) -> Result<()> {
            if self.fail_present {
                return Err(Error::WindowUpdate("gone".into()));
            }
            self.presents += 1;
            Ok(())
        }
        fn poll_events(&mut self, out: &mut Vec<InputEvent>) {
            if let Some(batch) = self.batches.pop_front() {
                if batch.contains(&InputEvent::WindowCloseRequested) {
                    self.closing = true;
                }
                out.extend(batch);
            }
        }
        fn is_closing(&self) -> bool {
            self.closing
        }
        fn dispose(&mut self) {
            self.disposed += 1;
        }
        fn size(&self) -> (usize, usize) {
            (self.buffer.width, self.buffer.height)
        }
        fn set_undecorated(&mut self, undecorated: bool) {
            self.undecorated = undecorated;
        }
    }

    #[derive(Default)]
    struct TestSketch {
        renders: u32,
        quits: u32,
        pointer_seen_in_render: Vec<(i32, i32)>,
        quit_after: Option<u32>,
        fail_render: bool,
        moves: u32,
    }

    impl Sketch for TestSketch {
        fn on_create(&mut self, _settings: &mut Settings) -> Result<()> {
            Ok(())
        }
        fn on_render(&mut self, canvas: &mut Canvas<'_>) -> Result<()> {
            self.renders += 1;
            self.pointer_seen_in_render.push((canvas.mouse_x(), canvas.mouse_y()));
            canvas.background_gray(0);
            canvas.rect(canvas.mouse_x(), canvas.mouse_y(), 10, 10);
            if self.fail_render {
                canvas.set_stroke_weight(0.0)?;
            }
            if Some(self.renders) == self.quit_after {
                canvas.quit();
            }
            Ok(())
        }
        fn on_quit(&mut self) {
            self.quits += 1;
        }
        fn on_pointer_move(&mut self, _input: &InputState) {
            self.moves += 1;
        }
    }

    const FRAME: Duration = Duration::from_millis(10); // 100 fps

    fn config() -> WindowConfig {
        WindowConfig { frame_rate: 100, ..WindowConfig::default() }
    }

    #[test]
    fn test_step_requires_start() {
        let time = ManualClock::new(0);
        let mut rl = RenderLoop::new(FakeSurface::new(), &time, &config()).unwrap();
        let mut sketch = TestSketch::default();

        assert_eq!(rl.state(), LoopState::Created);
        assert!(matches!(rl.step(&mut sketch), Err(Error::IllegalState(_))));
        rl.start().unwrap();
        assert_eq!(rl.state(), LoopState::Running);
        assert!(matches!(rl.start(), Err(Error::IllegalState(_))));
    }

    #[test]
    fn test_fullscreen_start_removes_decorations() {
        let time = ManualClock::new(0);
        let windowed = RenderLoop::new(FakeSurface::new(), &time, &config()).unwrap();
        let fullscreen = WindowConfig { fullscreen: true, ..config() };
        let mut rl = RenderLoop::new(FakeSurface::new(), &time, &fullscreen).unwrap();

        rl.start().unwrap();
        assert!(rl.surface().undecorated);
        assert!(!windowed.surface().undecorated);
    }

    #[test]
    fn test_frames_are_gated_by_clock() {
        let time = ManualClock::new(0);
        let mut rl = RenderLoop::new(FakeSurface::new(), &time, &config()).unwrap();
        let mut sketch = TestSketch::default();
        rl.start().unwrap();

        assert!(matches!(rl.step(&mut sketch).unwrap(), Step::Idle(_)));
        assert_eq!(sketch.renders, 0);

        time.advance(FRAME);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Presented);
        assert!(matches!(rl.step(&mut sketch).unwrap(), Step::Idle(_)));

        time.advance(FRAME);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Presented);

        assert_eq!(sketch.renders, 2);
        assert_eq!(rl.frame_clock().frame_count(), 2);
        assert_eq!(rl.surface().presents, 2);
    }

    #[test]
    fn test_missing_back_buffer_skips_frame() {
        let time = ManualClock::new(0);
        let mut surface = FakeSurface::new();
        surface.ready = false;
        let mut rl = RenderLoop::new(surface, &time, &config()).unwrap();
        let mut sketch = TestSketch::default();
        rl.start().unwrap();

        time.advance(FRAME);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Skipped);
        assert_eq!(sketch.renders, 0);
        assert_eq!(rl.surface().presents, 0);
        assert_eq!(rl.state(), LoopState::Running);
    }

    #[test]
    fn test_present_failure_while_closing_is_ignored() {
        let time = ManualClock::new(0);
        let mut surface = FakeSurface::new();
        surface.fail_present = true;
        surface.closing = true;
        let mut rl = RenderLoop::new(surface, &time, &config()).unwrap();
        let mut sketch = TestSketch::default();
        rl.start().unwrap();

        time.advance(FRAME);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Presented);
        assert_eq!(sketch.renders, 1);
    }

    #[test]
    fn test_input_reaches_render() {
        let time = ManualClock::new(0);
        let mut surface = FakeSurface::new();
        surface.batches.push_back(vec![InputEvent::PointerDown {
            x: 30,
            y: 40,
            button: MouseButton::Left,
        }]);
        let mut rl = RenderLoop::new(surface, &time, &config()).unwrap();
        let mut sketch = TestSketch::default();
        rl.start().unwrap();

        time.advance(FRAME);
        rl.step(&mut sketch).unwrap();

        assert_eq!(sketch.pointer_seen_in_render, vec![(30, 40)]);
        assert!(rl.input().is_pointer_pressed());
        // Default stroke is black, default fill light gray: the rect fill shows.
        assert_eq!(rl.surface().buffer.pixel(35, 45), Some(0xC8C8C8));
    }

    #[test]
    fn test_escape_stops_loop_once() {
        let time = ManualClock::new(0);
        let mut surface = FakeSurface::new();
        surface.batches.push_back(vec![
            InputEvent::KeyDown { key: Key::Escape, ch: None },
            InputEvent::WindowCloseRequested,
        ]);
        let mut rl = RenderLoop::new(surface, &time, &config()).unwrap();
        let mut sketch = TestSketch::default();
        rl.start().unwrap();

        time.advance(FRAME);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Stopped);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Stopped);

        assert_eq!(sketch.quits, 1);
        assert_eq!(sketch.renders, 0);
        assert_eq!(rl.state(), LoopState::Stopped);
        assert_eq!(rl.surface().disposed, 1);
        assert!(matches!(rl.start(), Err(Error::IllegalState(_))));
    }

    #[test]
    fn test_window_close_stops_loop() {
        let time = ManualClock::new(0);
        let mut surface = FakeSurface::new();
        surface.batches.push_back(vec![]);
        surface.batches.push_back(vec![InputEvent::WindowCloseRequested]);
        let mut rl = RenderLoop::new(surface, &time, &config()).unwrap();
        let mut sketch = TestSketch::default();
        rl.start().unwrap();

        time.advance(FRAME);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Presented);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Stopped);
        assert_eq!(sketch.quits, 1);
    }

    #[test]
    fn test_quit_from_render_stops_next_step() {
        let time = ManualClock::new(0);
        let mut rl = RenderLoop::new(FakeSurface::new(), &time, &config()).unwrap();
        let mut sketch = TestSketch { quit_after: Some(1), ..Default::default() };
        rl.start().unwrap();

        time.advance(FRAME);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Presented);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Stopped);
        assert_eq!(sketch.quits, 1);
    }

    #[test]
    fn test_no_input_dispatched_after_quit_from_render() {
        let time = ManualClock::new(0);
        let mut surface = FakeSurface::new();
        surface.batches.push_back(vec![]);
        surface.batches.push_back(vec![InputEvent::PointerMove { x: 3, y: 4 }]);
        let mut rl = RenderLoop::new(surface, &time, &config()).unwrap();
        let mut sketch = TestSketch { quit_after: Some(1), ..Default::default() };
        rl.start().unwrap();

        time.advance(FRAME);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Presented);
        assert_eq!(rl.step(&mut sketch).unwrap(), Step::Stopped);

        assert_eq!(sketch.moves, 0);
        assert_eq!(sketch.quits, 1);
        assert_eq!(rl.input().pointer(), (0, 0));
    }

    #[test]
    fn test_render_error_stops_loop() {
        let time = ManualClock::new(0);
        let mut rl = RenderLoop::new(FakeSurface::new(), &time, &config()).unwrap();
        let mut sketch = TestSketch { fail_render: true, ..Default::default() };
        rl.start().unwrap();

        time.advance(FRAME);
        assert!(matches!(rl.step(&mut sketch), Err(Error::InvalidArgument(_))));
        assert_eq!(rl.state(), LoopState::Stopped);
        assert_eq!(sketch.quits, 1);
    }

    #[test]
    fn test_style_persists_across_frames() {
        struct Styler;
        impl Sketch for Styler {
            fn on_create(&mut self, _settings: &mut Settings) -> Result<()> {
                Ok(())
            }
            fn on_render(&mut self, canvas: &mut Canvas<'_>) -> Result<()> {
                if canvas.frame_count() == 1 {
                    canvas.fill_rgb(1, 2, 3);
                    canvas.set_stroke_weight(3.0)?;
                }
                Ok(())
            }
            fn on_quit(&mut self) {}
        }

        let time = ManualClock::new(0);
        let mut rl = RenderLoop::new(FakeSurface::new(), &time, &config()).unwrap();
        rl.start().unwrap();
        for _ in 0..3 {
            time.advance(FRAME);
            rl.step(&mut Styler).unwrap();
        }
        assert_eq!(rl.style().fill_color(), crate::color::Color::rgb(1, 2, 3));
        assert_eq!(rl.style().stroke_weight(), 3.0);
        assert_eq!(rl.frame_clock().frame_count(), 3);
    }
}
