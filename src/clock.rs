// Frame pacing.
//
// `FrameClock` never reads the wall clock itself: every call takes `now`
// in nanoseconds from a `Clock`, so the timing logic can be driven by a
// `ManualClock` in tests.

use std::cell::Cell;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Error, Result};

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Longest idle sleep between two loop iterations.
pub const MAX_IDLE_WAIT: Duration = Duration::from_millis(1);
/// Shortest idle sleep, so an almost-due frame never turns into a busy spin.
pub const MIN_IDLE_WAIT: Duration = Duration::from_micros(100);

/// Monotonic time source, in nanoseconds since an arbitrary origin.
pub trait Clock {
    fn now_nanos(&self) -> u64;
}

/// Real time, measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }
}

/// Hand-driven clock for deterministic runs.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_nanos: u64) -> Self {
        Self { now: Cell::new(start_nanos) }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by.as_nanos() as u64);
    }
}

impl Clock for ManualClock {
    fn now_nanos(&self) -> u64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_nanos(&self) -> u64 {
        (**self).now_nanos()
    }
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_rate: u32,
    target_interval_nanos: u64,
    last_frame_nanos: u64,
    frame_count: u64,
    measured_fps: u32,
    fps_counter: u32,
    fps_window_start: u64,
}

impl FrameClock {
    pub const DEFAULT_FRAME_RATE: u32 = 60;

    /// Start a clock at `now`; the first frame is due one interval later.
    pub fn new(frame_rate: i32, now: u64) -> Result<Self> {
        let mut clock = Self {
            frame_rate: Self::DEFAULT_FRAME_RATE,
            target_interval_nanos: NANOS_PER_SECOND / Self::DEFAULT_FRAME_RATE as u64,
            last_frame_nanos: now,
            frame_count: 0,
            measured_fps: 0,
            fps_counter: 0,
            fps_window_start: now,
        };
        clock.set_frame_rate(frame_rate)?;
        Ok(clock)
    }

    pub fn set_frame_rate(&mut self, frame_rate: i32) -> Result<()> {
        if frame_rate < 1 {
            return Err(Error::invalid(format!(
                "frame rate cannot be less than 1 (got {frame_rate})"
            )));
        }
        self.frame_rate = frame_rate as u32;
        self.target_interval_nanos = NANOS_PER_SECOND / self.frame_rate as u64;
        Ok(())
    }

    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn target_interval(&self) -> Duration {
        Duration::from_nanos(self.target_interval_nanos)
    }

    pub fn is_frame_due(&self, now: u64) -> bool {
        now.saturating_sub(self.last_frame_nanos) >= self.target_interval_nanos
    }

    /// Mark a frame as presented at `now`.
    pub fn record_frame(&mut self, now: u64) {
        self.last_frame_nanos = now;
        self.frame_count += 1;
    }

    /// Count one presented frame; publishes a new sample once per second.
    pub fn tick_fps_meter(&mut self, now: u64) {
        self.fps_counter += 1;

        if now.saturating_sub(self.fps_window_start) >= NANOS_PER_SECOND {
            self.measured_fps = self.fps_counter;
            self.fps_counter = 0;
            self.fps_window_start = now;
            debug!(fps = self.measured_fps, "fps sample");
        }
    }

    /// Frames presented during the last full second, 0 before the first one.
    pub fn measured_fps(&self) -> u32 {
        self.measured_fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// How long to sleep when no frame is due at `now`.
    pub fn idle_wait(&self, now: u64) -> Duration {
        let due_at = self.last_frame_nanos + self.target_interval_nanos;
        let remaining = Duration::from_nanos(due_at.saturating_sub(now));
        remaining.clamp(MIN_IDLE_WAIT, MAX_IDLE_WAIT)
    }
}
