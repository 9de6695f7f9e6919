//! Pixel buffers
//!
//! [`PixelBuffer`] is the contract the compositing engine draws through.
//! [`Canvas`] is the in-memory implementation every core operation returns;
//! other backends (see [`crate::output`]) are thin adapters.
//!
//! Coordinates are `(x, y)` with `x` growing rightwards and row 0 at the
//! bottom.

use crate::color::{Color, TRANSPARENT};

/// Opaque black, the fill of a non-transparent buffer.
const OPAQUE_BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

pub trait PixelBuffer {
    /// New buffer filled with transparent black, or opaque black when
    /// `transparent` is false.
    fn create(width: u32, height: u32, transparent: bool) -> Self
    where
        Self: Sized;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn name(&self) -> &str;

    fn set_name(&mut self, name: String);

    /// Discard the contents and reallocate at a new size.
    fn resize(&mut self, width: u32, height: u32);

    /// Out-of-range reads return transparent black.
    fn get_pixel(&self, x: u32, y: u32) -> Color;

    /// Out-of-range writes are ignored.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);

    /// Write a `w` by `h` block at `(x0, y0)` from `colors`, row by row
    /// starting at the bottom row of the block.
    fn set_pixel_region(&mut self, x0: u32, y0: u32, w: u32, h: u32, colors: &[Color]) {
        for (i, color) in colors.iter().take((w * h) as usize).enumerate() {
            let i = i as u32;
            self.set_pixel(x0 + i % w, y0 + i / w, *color);
        }
    }

    /// Commit pending writes. No-op for in-memory buffers.
    fn apply(&mut self) {}
}

/// Dense row-major buffer of normalized colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    name: String,
    pixels: Vec<Color>,
}

impl Canvas {
    /// Transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            name: String::new(),
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut Color> {
        self.index(x, y).map(move |i| &mut self.pixels[i])
    }

    /// All pixels, bottom row first.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Copy `src` into this canvas with its bottom-left corner at `(x, y)`,
    /// clipping at the edges.
    pub fn blit(&mut self, src: &Canvas, x: u32, y: u32) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                if let (Some(color), Some(dst)) = (src.get(sx, sy), self.get_mut(x + sx, y + sy)) {
                    *dst = color;
                }
            }
        }
    }

    /// Whether every pixel is fully transparent.
    pub fn is_clear(&self) -> bool {
        self.pixels.iter().all(|c| c.a == 0.0)
    }
}

impl PixelBuffer for Canvas {
    fn create(width: u32, height: u32, transparent: bool) -> Self {
        if transparent {
            Canvas::new(width, height)
        } else {
            Canvas::filled(width, height, OPAQUE_BLACK)
        }
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![TRANSPARENT; width as usize * height as usize];
    }

    fn get_pixel(&self, x: u32, y: u32) -> Color {
        self.get(x, y).unwrap_or(TRANSPARENT)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(dst) = self.get_mut(x, y) {
            *dst = color;
        }
    }
}
