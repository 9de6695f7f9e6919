//! Per-format pixel samples
//!
//! Cels keep their pixels in the document's native encoding. Colors are
//! produced on demand because indexed samples need the document palette,
//! which may be declared after the cel that uses it.

use crate::chunks::PaletteChunk;
use crate::color::{Color, MAGENTA};
use crate::header::ColorDepth;
use crate::reader::Reader;

/// One stored pixel sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    Rgba([u8; 4]),
    Grayscale { value: u8, alpha: u8 },
    Indexed(u8),
    /// Fewer bytes were available than the format needs
    Truncated,
}

impl Pixel {
    /// Decode one sample of `depth` from raw bytes.
    ///
    /// A slice shorter than the format's sample size yields
    /// [`Pixel::Truncated`] instead of failing.
    pub fn from_bytes(depth: ColorDepth, raw: &[u8]) -> Self {
        match (depth, raw) {
            (ColorDepth::Rgba, &[r, g, b, a]) => Pixel::Rgba([r, g, b, a]),
            (ColorDepth::Grayscale, &[value, alpha]) => Pixel::Grayscale { value, alpha },
            (ColorDepth::Indexed, &[index]) => Pixel::Indexed(index),
            _ => Pixel::Truncated,
        }
    }

    /// Resolve the sample to a normalized color.
    ///
    /// Indexed samples look up `palette`; a missing palette or index gives
    /// [`MAGENTA`].
    pub fn color(self, palette: Option<&PaletteChunk>) -> Color {
        match self {
            Pixel::Rgba([r, g, b, a]) => Color::from_rgba8(r, g, b, a),
            Pixel::Grayscale { value, alpha } => {
                let v = value as f32 / 255.0;
                Color::new(v, v, v, alpha as f32 / 255.0)
            }
            Pixel::Indexed(index) => match palette {
                Some(palette) => palette.color(index as usize),
                None => {
                    tracing::trace!(index, "indexed pixel without a palette");
                    MAGENTA
                }
            },
            Pixel::Truncated => MAGENTA,
        }
    }
}

/// Read up to `count` samples of `depth` from `r`.
///
/// Decoding stops at the end of the reader: a trailing partial sample is
/// [`Pixel::Truncated`] and samples with no bytes at all are not stored, so
/// a bogus declared size never allocates more than the data provides.
pub fn read_pixels(r: &mut Reader<'_>, depth: ColorDepth, count: usize) -> Vec<Pixel> {
    let size = depth.bytes_per_pixel().max(1);
    let available = count.min(r.remaining().div_ceil(size));
    (0..available)
        .map(|_| Pixel::from_bytes(depth, r.bytes_lossy(size)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::PaletteEntry;

    fn palette() -> PaletteChunk {
        PaletteChunk::from_entries(
            0,
            vec![
                PaletteEntry::new(255, 0, 0, 255),
                PaletteEntry::new(0, 255, 0, 128),
            ],
        )
    }

    #[test]
    fn test_rgba_decode() {
        let p = Pixel::from_bytes(ColorDepth::Rgba, &[255, 0, 51, 255]);
        assert_eq!(p.color(None), Color::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn test_short_rgba_sample_is_magenta() {
        let p = Pixel::from_bytes(ColorDepth::Rgba, &[255, 0, 51]);
        assert_eq!(p, Pixel::Truncated);
        assert_eq!(p.color(None), MAGENTA);
    }

    #[test]
    fn test_grayscale_decode() {
        let p = Pixel::from_bytes(ColorDepth::Grayscale, &[51, 255]);
        assert_eq!(p.color(None), Color::new(0.2, 0.2, 0.2, 1.0));
    }

    #[test]
    fn test_indexed_resolves_through_palette() {
        let pal = palette();
        assert_eq!(Pixel::Indexed(0).color(Some(&pal)), Color::new(1.0, 0.0, 0.0, 1.0));
        let green = Pixel::Indexed(1).color(Some(&pal));
        assert!(green.approx_eq(Color::new(0.0, 1.0, 0.0, 128.0 / 255.0), 1e-6));
    }

    #[test]
    fn test_indexed_out_of_range_or_missing_palette_is_magenta() {
        let pal = palette();
        assert_eq!(Pixel::Indexed(2).color(Some(&pal)), MAGENTA);
        assert_eq!(Pixel::Indexed(255).color(Some(&pal)), MAGENTA);
        assert_eq!(Pixel::Indexed(0).color(None), MAGENTA);
    }

    #[test]
    fn test_read_pixels_stops_at_end_of_data() {
        let data = [1, 2, 3, 4, 5, 6];
        let mut r = Reader::new(&data);
        let pixels = read_pixels(&mut r, ColorDepth::Rgba, 3);
        assert_eq!(pixels, vec![Pixel::Rgba([1, 2, 3, 4]), Pixel::Truncated]);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_read_pixels_ignores_huge_count() {
        let data = [7, 8];
        let mut r = Reader::new(&data);
        let pixels = read_pixels(&mut r, ColorDepth::Indexed, usize::MAX);
        assert_eq!(pixels, vec![Pixel::Indexed(7), Pixel::Indexed(8)]);
    }
}
