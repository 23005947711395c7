// Pixel storage shared by the window and the software rasterizer.

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // drawing area width (pixels)
    pub height: usize,     // drawing area height (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u32; width * height],
        }
    }

    /// Pixel at (x, y), `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Reallocate for a new size. Contents are reset to black.
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }

    /// Copy another buffer of the same size into this one.
    pub fn copy_from(&mut self, other: &FrameBuffer) {
        if self.width != other.width || self.height != other.height {
            self.resize(other.width, other.height);
        }
        self.pixels.copy_from_slice(&other.pixels);
    }
}
