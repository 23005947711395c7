// Window configuration.
//
// `Settings` is what `Sketch::on_create` receives; it validates every call
// and produces the final `WindowConfig` the window is opened with.

use tracing::warn;

use crate::clock::FrameClock;
use crate::error::{Error, Result};

pub const DEFAULT_TITLE: &str = "MicroFrameWindow";
pub const DEFAULT_WIDTH: usize = 400;
pub const DEFAULT_HEIGHT: usize = 400;
/// Smallest accepted drawing area, per side.
pub const MIN_WINDOW_SIDE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,
    /// Drawing area width in pixels (window chrome not included).
    pub width: usize,
    pub height: usize,
    pub frame_rate: u32,
    pub resizable: bool,
    /// Borderless window covering the screen.
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            frame_rate: FrameClock::DEFAULT_FRAME_RATE,
            resizable: false,
            fullscreen: false,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_size(self.width as i64, self.height as i64)?;
        if self.frame_rate < 1 {
            return Err(Error::invalid("frame rate cannot be less than 1"));
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::invalid("window title cannot be empty"));
    }
    Ok(())
}

fn validate_size(width: i64, height: i64) -> Result<()> {
    let min = MIN_WINDOW_SIDE as i64;
    if width < min {
        return Err(Error::invalid(format!("width cannot be less than {min} (got {width})")));
    }
    if height < min {
        return Err(Error::invalid(format!("height cannot be less than {min} (got {height})")));
    }
    Ok(())
}

/// Configuration handed to `Sketch::on_create`.
///
/// The window size can be set once. Later changes are rejected unless the
/// window was marked resizable first.
#[derive(Debug, Clone)]
pub struct Settings {
    config: WindowConfig,
    size_was_set: bool,
    screen_size: Option<(usize, usize)>,
}

impl Settings {
    pub fn new(screen_size: Option<(usize, usize)>) -> Self {
        Self {
            config: WindowConfig::default(),
            size_was_set: false,
            screen_size,
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn into_config(self) -> WindowConfig {
        self.config
    }

    pub fn window_title(&self) -> &str {
        &self.config.title
    }

    pub fn set_window_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        validate_title(&title)?;
        self.config.title = title;
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.config.width
    }

    pub fn height(&self) -> usize {
        self.config.height
    }

    pub fn set_window_size(&mut self, width: i32, height: i32) -> Result<()> {
        if self.size_was_set && !self.config.resizable {
            return Err(Error::illegal("window is not resizable"));
        }
        if self.config.width as i64 == width as i64 && self.config.height as i64 == height as i64 {
            self.size_was_set = true;
            return Ok(());
        }
        validate_size(width as i64, height as i64)?;

        self.config.width = width as usize;
        self.config.height = height as usize;
        self.size_was_set = true;
        Ok(())
    }

    pub fn is_resizable(&self) -> bool {
        self.config.resizable
    }

    pub fn set_resize_enabled(&mut self, enabled: bool) {
        self.config.resizable = enabled;
    }

    pub fn frame_rate(&self) -> u32 {
        self.config.frame_rate
    }

    pub fn set_frame_rate(&mut self, frame_rate: i32) -> Result<()> {
        if frame_rate < 1 {
            return Err(Error::invalid(format!(
                "frame rate cannot be less than 1 (got {frame_rate})"
            )));
        }
        self.config.frame_rate = frame_rate as u32;
        Ok(())
    }

    /// Borderless window at screen size. Falls back to the current size when
    /// the backend cannot report the screen dimensions.
    pub fn set_full_screen(&mut self) -> Result<()> {
        match self.screen_size {
            Some((w, h)) => self.set_window_size(w as i32, h as i32)?,
            None => warn!("screen size unknown, fullscreen keeps the configured size"),
        }
        self.config.fullscreen = true;
        Ok(())
    }

    pub fn is_full_screen(&self) -> bool {
        self.config.fullscreen
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        let config = settings.config();
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!((config.width, config.height), (400, 400));
        assert_eq!(config.frame_rate, 60);
        assert!(!config.resizable);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_size_is_fixed_after_first_set() {
        let mut settings = Settings::default();
        settings.set_window_size(640, 480).unwrap();
        assert!(matches!(
            settings.set_window_size(800, 600),
            Err(Error::IllegalState(_))
        ));
        assert_eq!((settings.width(), settings.height()), (640, 480));
    }

    #[test]
    fn test_resizable_allows_changes() {
        let mut settings = Settings::default();
        settings.set_resize_enabled(true);
        settings.set_window_size(640, 480).unwrap();
        settings.set_window_size(800, 600).unwrap();
        assert_eq!((settings.width(), settings.height()), (800, 600));
    }

    #[test]
    fn test_undersized_window_rejected() {
        let mut settings = Settings::default();
        assert!(matches!(settings.set_window_size(99, 200), Err(Error::InvalidArgument(_))));
        assert!(matches!(settings.set_window_size(200, -1), Err(Error::InvalidArgument(_))));
        settings.set_window_size(100, 100).unwrap();
    }

    #[test]
    fn test_title_and_frame_rate_validation() {
        let mut settings = Settings::default();
        assert!(settings.set_window_title("").is_err());
        assert!(settings.set_window_title("   ").is_err());
        settings.set_window_title("Launcher").unwrap();
        assert_eq!(settings.window_title(), "Launcher");

        assert!(settings.set_frame_rate(0).is_err());
        settings.set_frame_rate(30).unwrap();
        assert_eq!(settings.frame_rate(), 30);
    }

    #[test]
    fn test_full_screen_uses_screen_size() {
        let mut settings = Settings::new(Some((1920, 1080)));
        settings.set_full_screen().unwrap();
        assert!(settings.is_full_screen());
        assert_eq!((settings.width(), settings.height()), (1920, 1080));

        let mut unknown = Settings::new(None);
        unknown.set_full_screen().unwrap();
        assert_eq!((unknown.width(), unknown.height()), (400, 400));
    }

    #[test]
    fn test_failed_full_screen_leaves_settings_untouched() {
        let mut settings = Settings::new(Some((1920, 1080)));
        settings.set_window_size(640, 480).unwrap();
        assert!(matches!(settings.set_full_screen(), Err(Error::IllegalState(_))));
        assert!(!settings.is_full_screen());
        assert_eq!((settings.width(), settings.height()), (640, 480));
        assert!(!settings.into_config().fullscreen);
    }
}
