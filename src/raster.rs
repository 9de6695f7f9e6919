//! Cel rasterization
//!
//! Projects one cel onto a canvas-sized buffer. Cel rows are stored top
//! first, canvases are bottom-origin, so cel-space row `y` lands on canvas
//! row `height - 1 - y`.

use crate::canvas::{Canvas, PixelBuffer};
use crate::chunks::{CelImage, PaletteChunk};

/// Draw `image` positioned at `(x, y)` (editor space, top-left origin) into
/// `buffer`, clipping to its bounds.
pub fn rasterize_into<B: PixelBuffer>(
    buffer: &mut B,
    x: i32,
    y: i32,
    image: &CelImage,
    palette: Option<&PaletteChunk>,
) {
    let width = buffer.width() as i64;
    let height = buffer.height() as i64;
    let (x, y) = (x as i64, y as i64);

    // cel-local window that lands on the buffer
    let cols = (-x).max(0)..(width - x).min(image.width as i64);
    let rows = (-y).max(0)..(height - y).min(image.height as i64);

    for row in rows {
        for col in cols.clone() {
            let Some(pixel) = image.pixel(col as usize, row as usize) else {
                continue;
            };
            let cy = y + row;
            buffer.set_pixel((x + col) as u32, (height - 1 - cy) as u32, pixel.color(palette));
        }
    }
    buffer.apply();
}

/// Rasterize a cel onto a fresh transparent `width` by `height` canvas.
pub fn rasterize(
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    image: &CelImage,
    palette: Option<&PaletteChunk>,
) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    rasterize_into(&mut canvas, x, y, image, palette);
    canvas
}
