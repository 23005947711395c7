// Decoded images for `Canvas::image`.

use std::path::Path;

use tracing::{debug, error};

use crate::error::{Error, Result};

/// Decoded pixels, 0xAARRGGBB, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Image {
    /// 0x0 image, what a failed load degrades to.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_argb(width: usize, height: usize, pixels: Vec<u32>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(Error::invalid(format!(
                "expected {} pixels for {width}x{height}, got {}",
                width * height,
                pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// Decode an image file.
    ///
    /// An empty path is rejected. Any I/O or decode failure is logged and an
    /// empty image is returned instead, so check [`Image::is_empty`] if it
    /// matters.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::invalid("image path cannot be empty"));
        }

        match decode(path) {
            Ok(image) => {
                debug!(path = %path.display(), width = image.width, height = image.height, "image loaded");
                Ok(image)
            }
            Err(e) => {
                error!(path = %path.display(), "{e}");
                Ok(Self::empty())
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel at (x, y); callers keep coordinates in range.
    #[inline]
    pub(crate) fn argb_at(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }
}

fn decode(path: &Path) -> Result<Image> {
    let decoded = ::image::open(path).map_err(|e| Error::Decode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (w, h) = rgba.dimensions();

    let pixels = rgba
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
        })
        .collect();

    Image::from_argb(w as usize, h as usize, pixels)
}
