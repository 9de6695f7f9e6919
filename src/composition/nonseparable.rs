//! Non-separable blend helpers
//!
//! Luminosity and saturation operations behind the Hue, Saturation, Color
//! and Luminosity modes, after the PDF transparency model. They act on the
//! color channels only; alpha passes through untouched.

use crate::color::Color;

/// Weighted luminosity.
pub fn lum(c: Color) -> f32 {
    0.3 * c.r + 0.59 * c.g + 0.11 * c.b
}

/// Spread between the largest and smallest channel.
pub fn sat(c: Color) -> f32 {
    c.r.max(c.g).max(c.b) - c.r.min(c.g).min(c.b)
}

/// Pull out-of-gamut channels back into `[0, 1]` while keeping luminosity.
pub fn clip_color(c: Color) -> Color {
    let l = lum(c);
    let n = c.r.min(c.g).min(c.b);
    let x = c.r.max(c.g).max(c.b);

    let mut out = c;
    if n < 0.0 && l > n {
        out = out.map_rgb(|v| l + (v - l) * l / (l - n));
    }
    if x > 1.0 && x > l {
        out = out.map_rgb(|v| l + (v - l) * (1.0 - l) / (x - l));
    }
    out
}

/// Shift `c` to luminosity `l`, then clip.
pub fn set_lum(c: Color, l: f32) -> Color {
    let d = l - lum(c);
    clip_color(c.map_rgb(|v| v + d))
}

/// Rescale `c` so its saturation becomes `s`, keeping channel order.
pub fn set_sat(c: Color, s: f32) -> Color {
    let mut channels = [c.r, c.g, c.b];
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| channels[a].total_cmp(&channels[b]));
    let [min, mid, max] = order;

    if channels[max] > channels[min] {
        channels[mid] = (channels[mid] - channels[min]) * s / (channels[max] - channels[min]);
        channels[max] = s;
    } else {
        channels[mid] = 0.0;
        channels[max] = 0.0;
    }
    channels[min] = 0.0;

    Color::new(channels[0], channels[1], channels[2], c.a)
}
