//! Compositing engine
//!
//! Per-pixel blend formulas ([`blend`]), the luminosity and saturation
//! helpers of the non-separable modes ([`nonseparable`]), and frame
//! flattening ([`render`]).

pub mod blend;
pub mod nonseparable;
mod render;

pub use blend::{blend_buffers, blend_pixel, BlendMode, DIVIDE_CEILING};
pub use render::render_frame;
