//! Normalized floating-point RGBA color
//!
//! Channels are nominally in `[0, 1]`, but blend math is allowed to push them
//! outside that range while a frame is being accumulated. Conversion to 8-bit
//! clamps.

use image::Rgba;
use serde::Serialize;
use std::ops::{Add, Mul, Sub};

/// An RGBA color with `f32` channels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Fully transparent black, the initial state of every canvas.
pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

/// Sentinel for colors that could not be decoded (missing palette entry,
/// truncated sample).
pub const MAGENTA: Color = Color::new(1.0, 0.0, 1.0, 1.0);

pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from 8-bit channels, dividing each by 255.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Quantize to 8-bit channels, clamping out-of-range values.
    pub fn to_rgba8(self) -> Rgba<u8> {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba([q(self.r), q(self.g), q(self.b), q(self.a)])
    }

    /// Same color with a replaced alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Apply `f` to the three color channels, keeping alpha.
    pub fn map_rgb(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b), self.a)
    }

    /// Combine the color channels of two colors channel by channel; alpha
    /// comes from `self`.
    pub fn zip_rgb(self, other: Color, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(
            f(self.r, other.r),
            f(self.g, other.g),
            f(self.b, other.b),
            self.a,
        )
    }

    /// Approximate equality on all four channels.
    pub fn approx_eq(self, other: Color, epsilon: f32) -> bool {
        (self.r - other.r).abs() <= epsilon
            && (self.g - other.g).abs() <= epsilon
            && (self.b - other.b).abs() <= epsilon
            && (self.a - other.a).abs() <= epsilon
    }
}

impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Self {
        Color::from_rgba8(p[0], p[1], p[2], p[3])
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, o: Color) -> Color {
        Color::new(self.r + o.r, self.g + o.g, self.b + o.b, self.a + o.a)
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, o: Color) -> Color {
        Color::new(self.r - o.r, self.g - o.g, self.b - o.b, self.a - o.a)
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, k: f32) -> Color {
        Color::new(self.r * k, self.g * k, self.b * k, self.a * k)
    }
}

impl Mul<Color> for f32 {
    type Output = Color;

    fn mul(self, c: Color) -> Color {
        c * self
    }
}
