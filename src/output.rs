//! PNG output and file path generation
//!
//! Canvases are bottom-origin; PNG rows run top-down. [`canvas_to_image`]
//! does the flip, and [`ImageTexture`] adapts an `RgbaImage` to the
//! [`PixelBuffer`] contract so the compositing engine can draw into it
//! directly.

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::canvas::{Canvas, PixelBuffer};
use crate::color::Color;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    /// JSON encoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convert a canvas to an 8-bit image, flipping rows to top-down order.
pub fn canvas_to_image(canvas: &Canvas) -> RgbaImage {
    let (w, h) = (canvas.width(), canvas.height());
    RgbaImage::from_fn(w, h, |x, y| canvas.get_pixel(x, h - 1 - y).to_rgba8())
}

/// Convert an 8-bit image back to a bottom-origin canvas.
pub fn image_to_canvas(image: &RgbaImage) -> Canvas {
    let (w, h) = image.dimensions();
    let mut canvas = Canvas::new(w, h);
    for (x, y, pixel) in image.enumerate_pixels() {
        canvas.set_pixel(x, h - 1 - y, Color::from(*pixel));
    }
    canvas
}

/// A named `RgbaImage` seen through the [`PixelBuffer`] contract.
///
/// Reads and writes use bottom-origin rows like [`Canvas`]; storage stays
/// top-down so the image can be saved as is. Colors are quantized to 8 bits
/// on every write.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    pub name: String,
    pub image: RgbaImage,
}

impl ImageTexture {
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl PixelBuffer for ImageTexture {
    fn create(width: u32, height: u32, transparent: bool) -> Self {
        let fill = if transparent {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([0, 0, 0, 255])
        };
        Self::new("", RgbaImage::from_pixel(width, height, fill))
    }

    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x >= self.width() || y >= self.height() {
            return crate::color::TRANSPARENT;
        }
        Color::from(*self.image.get_pixel(x, self.height() - 1 - y))
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width() && y < self.height() {
            let row = self.height() - 1 - y;
            self.image.put_pixel(x, row, color.to_rgba8());
        }
    }
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}

/// Save a canvas as PNG, upscaled by `scale`.
pub fn save_canvas(canvas: &Canvas, path: &Path, scale: u8) -> Result<(), OutputError> {
    save_png(&scale_image(canvas_to_image(canvas), scale), path)
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges for pixel art.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    let new_w = w * factor as u32;
    let new_h = h * factor as u32;
    image::imageops::resize(&image, new_w, new_h, FilterType::Nearest)
}

/// Path for an output image named `name` derived from `input`.
///
/// | Scenario | Output |
/// |----------|--------|
/// | no output dir | `{input_dir}/{input_stem}_{name}.png` |
/// | `-o dir` | `dir/{input_stem}_{name}.png` |
pub fn generate_output_path(input: &Path, name: &str, output_dir: Option<&Path>) -> PathBuf {
    let input_stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let file_name = format!("{}_{}.png", input_stem, sanitize(name));

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => {
            let parent = input.parent().unwrap_or(Path::new(""));
            if parent.as_os_str().is_empty() {
                PathBuf::from(file_name)
            } else {
                parent.join(file_name)
            }
        }
    }
}

/// Replace characters that are awkward in file names (layer names may
/// contain anything).
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
