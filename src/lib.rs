//! Asepix - Library for decoding Aseprite documents and flattening them
//!
//! This library provides functionality to:
//! - Decode `.ase`/`.aseprite` files: header, frames, layers, cels, palettes,
//!   tags and slices
//! - Resolve the layer tree and linked cels
//! - Composite frames with the 19 layer blend modes
//! - Extract per-layer images, pivot metadata, atlases and rim-light outlines
//! - Write PNG output

pub mod canvas;
pub mod chunks;
pub mod cli;
pub mod color;
pub mod composition;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod frame;
pub mod header;
pub mod hierarchy;
pub mod output;
pub mod pixel;
pub mod raster;
pub mod reader;

#[cfg(test)]
mod test_support;

pub use canvas::{Canvas, PixelBuffer};
pub use color::Color;
pub use composition::BlendMode;
pub use document::Document;
pub use error::{AseError, AseError as Error, Result};
