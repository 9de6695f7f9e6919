//! Rim-light outline

use crate::canvas::{Canvas, PixelBuffer};
use crate::color::{TRANSPARENT, WHITE};

/// Mark the rim of every shape in `canvas`.
///
/// A pixel is on the rim when it has any alpha and at least one of its four
/// neighbours inside the canvas is fully transparent. Rim pixels become
/// white, everything else transparent. The canvas border is not treated as
/// transparent.
pub fn rim_light(canvas: &Canvas) -> Canvas {
    let (width, height) = (canvas.width(), canvas.height());
    let clear = |x: u32, y: u32| canvas.get(x, y).is_some_and(|c| c.a == 0.0);

    let mut out = Canvas::new(width, height).with_name(format!("{}_rim", canvas.name()));
    for y in 0..height {
        for x in 0..width {
            if canvas.get_pixel(x, y).a <= 0.0 {
                continue;
            }
            let on_rim = (x > 0 && clear(x - 1, y))
                || clear(x + 1, y)
                || (y > 0 && clear(x, y - 1))
                || clear(x, y + 1);
            out.set_pixel(x, y, if on_rim { WHITE } else { TRANSPARENT });
        }
    }
    out
}
