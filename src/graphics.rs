//! The 64x32 monochrome display. Pixels are drawn by XOR-ing sprite bits into the buffer, which
//! is also how collisions get detected.
use std::ops::Index;

pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

pub struct Framebuffer {
    // one byte per pixel, always 0 or 1
    buffer: [u8; WIDTH * HEIGHT],
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            buffer: [0; WIDTH * HEIGHT],
        }
    }

    pub fn len(&self) -> usize {
        WIDTH * HEIGHT
    }

    /// Given x and y coordinate for a pixel in the buffer, return the corresponding
    /// index of that pixel in the buffer
    pub fn get_graphics_idx(x: usize, y: usize) -> usize {
        x + y * WIDTH
    }

    /// XOR `value` (only its lowest bit counts) into the pixel at (x, y). Returns true when the
    /// pixel was lit and got turned off, which is what the draw instruction reports in VF.
    ///
    /// The caller keeps x and y inside the display; sprites are clipped before they get here.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: u8) -> bool {
        debug_assert!(x < WIDTH && y < HEIGHT, "pixel ({}, {}) off screen", x, y);

        let idx = Self::get_graphics_idx(x, y);
        let bit = value & 1;
        let prev = self.buffer[idx];
        self.buffer[idx] = prev ^ bit;

        prev == 1 && bit == 1
    }

    pub fn clear(&mut self) {
        self.buffer = [0; WIDTH * HEIGHT];
    }

    /// Row-major view of every pixel, for presenting a frame
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for Framebuffer {
    type Output = u8;

    #[inline]
    fn index(&self, idx: usize) -> &Self::Output {
        &self.buffer[idx]
    }
}
