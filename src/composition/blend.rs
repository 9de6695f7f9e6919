//! Blend modes and per-pixel compositing

use serde::Serialize;

use crate::canvas::PixelBuffer;
use crate::color::Color;

use super::nonseparable::{lum, sat, set_lum, set_sat};

/// Layer blend modes, in file order (the stored u16 is the variant index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Overlay replaces base, weighted by alpha
    #[default]
    Normal,
    Multiply,
    Screen,
    /// Hard light with base and overlay swapped
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    /// Unclamped sum
    Addition,
    Subtract,
    Divide,
}

impl BlendMode {
    pub const ALL: [BlendMode; 19] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
        BlendMode::Addition,
        BlendMode::Subtract,
        BlendMode::Divide,
    ];

    /// Decode the stored mode. Unknown values fall back to Normal.
    pub fn from_u16(value: u16) -> BlendMode {
        match Self::ALL.get(value as usize) {
            Some(mode) => *mode,
            None => {
                tracing::debug!("unknown blend mode {}, using normal", value);
                BlendMode::Normal
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::ColorDodge => "color_dodge",
            BlendMode::ColorBurn => "color_burn",
            BlendMode::HardLight => "hard_light",
            BlendMode::SoftLight => "soft_light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
            BlendMode::Addition => "addition",
            BlendMode::Subtract => "subtract",
            BlendMode::Divide => "divide",
        }
    }

    /// Whether the mode works channel by channel.
    pub fn is_separable(&self) -> bool {
        !matches!(
            self,
            BlendMode::Hue | BlendMode::Saturation | BlendMode::Color | BlendMode::Luminosity
        )
    }

    /// Whether layer and cel opacity reach this mode. Every other mode
    /// composites by overlay alpha alone.
    pub fn takes_opacity(&self) -> bool {
        matches!(self, BlendMode::Multiply)
    }

    /// Blend one channel of `base` with one channel of `overlay`.
    ///
    /// Non-separable modes have no channel form and return `overlay`.
    pub fn blend_channel(&self, base: f32, overlay: f32) -> f32 {
        match self {
            BlendMode::Normal => overlay,
            BlendMode::Multiply => multiply(base, overlay),
            BlendMode::Screen => screen(base, overlay),
            BlendMode::Overlay => hard_light(overlay, base),
            BlendMode::Darken => base.min(overlay),
            BlendMode::Lighten => base.max(overlay),
            BlendMode::ColorDodge => color_dodge(base, overlay),
            BlendMode::ColorBurn => color_burn(base, overlay),
            BlendMode::HardLight => hard_light(base, overlay),
            BlendMode::SoftLight => soft_light(base, overlay),
            BlendMode::Difference => (base - overlay).abs(),
            BlendMode::Exclusion => base + overlay - 2.0 * base * overlay,
            BlendMode::Addition => base + overlay,
            BlendMode::Subtract => base - overlay,
            BlendMode::Divide => divide(base, overlay),
            BlendMode::Hue | BlendMode::Saturation | BlendMode::Color | BlendMode::Luminosity => {
                overlay
            }
        }
    }

    /// Blended color of `base` and `overlay`, before alpha compositing.
    /// Alpha of the result is the overlay's.
    pub fn blend_color(&self, base: Color, overlay: Color) -> Color {
        let blended = match self {
            BlendMode::Hue => set_lum(set_sat(overlay, sat(base)), lum(base)),
            BlendMode::Saturation => set_lum(set_sat(base, sat(overlay)), lum(base)),
            BlendMode::Color => set_lum(overlay, lum(base)),
            BlendMode::Luminosity => set_lum(base, lum(overlay)),
            mode => base.zip_rgb(overlay, |b, s| mode.blend_channel(b, s)),
        };
        blended.with_alpha(overlay.a)
    }
}

fn multiply(b: f32, s: f32) -> f32 {
    b * s
}

fn screen(b: f32, s: f32) -> f32 {
    b + s - b * s
}

fn color_dodge(b: f32, s: f32) -> f32 {
    if b == 0.0 {
        0.0
    } else if b >= 1.0 - s {
        1.0
    } else {
        b / (1.0 - s)
    }
}

fn color_burn(b: f32, s: f32) -> f32 {
    if b == 1.0 {
        1.0
    } else if 1.0 - b >= s {
        0.0
    } else {
        1.0 - (1.0 - b) / s
    }
}

fn hard_light(b: f32, s: f32) -> f32 {
    if s <= 0.5 {
        multiply(b, 2.0 * s)
    } else {
        screen(b, 2.0 * s - 1.0)
    }
}

fn soft_light(b: f32, s: f32) -> f32 {
    if s <= 0.5 {
        b - (1.0 - 2.0 * s) * b * (1.0 - b)
    } else {
        let d = if b <= 0.25 {
            ((16.0 * b - 12.0) * b + 4.0) * b
        } else {
            b.sqrt()
        };
        b + (2.0 * s - 1.0) * (d - b)
    }
}

/// Ceiling value of [`BlendMode::Divide`] when `b >= s`. Kept at 255 even
/// though channels are normalized; the result clamps to white on output.
pub const DIVIDE_CEILING: f32 = 255.0;

fn divide(b: f32, s: f32) -> f32 {
    if b == 0.0 {
        0.0
    } else if b >= s {
        DIVIDE_CEILING
    } else {
        b / s
    }
}

/// Composite `overlay` onto `base` with `mode` at `opacity` (0.0-1.0).
///
/// Opacity scales the overlay's alpha. Where the base is opaque the blended
/// color is mixed in by overlay alpha alone; over transparent base the
/// overlay's own color is used, so a transparent overlay leaves the base
/// untouched and an opaque overlay on empty canvas reproduces itself.
pub fn blend_pixel(base: Color, overlay: Color, mode: BlendMode, opacity: f32) -> Color {
    let sa = overlay.a * opacity.clamp(0.0, 1.0);
    let ba = base.a;
    let blended = mode.blend_color(base, overlay);

    let source = overlay.zip_rgb(blended, |s, mixed| (1.0 - ba) * s + ba * mixed);
    let out = base.zip_rgb(source, |b, src| (1.0 - sa) * b + sa * src);
    out.with_alpha(ba + sa * (1.0 - ba))
}

/// Composite every pixel of `layer` onto `base`. Both buffers must share
/// the same size; pixels outside `base` are ignored.
pub fn blend_buffers<B, L>(base: &mut B, layer: &L, mode: BlendMode, opacity: f32)
where
    B: PixelBuffer,
    L: PixelBuffer,
{
    let width = base.width().min(layer.width());
    let height = base.height().min(layer.height());
    for y in 0..height {
        for x in 0..width {
            let overlay = layer.get_pixel(x, y);
            if overlay.a == 0.0 {
                continue;
            }
            let out = blend_pixel(base.get_pixel(x, y), overlay, mode, opacity);
            base.set_pixel(x, y, out);
        }
    }
    base.apply();
}
