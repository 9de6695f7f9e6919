//! Cel chunk (0x2005)
//!
//! A cel is one layer's content in one frame. Raw and compressed cels carry
//! their own pixels; linked cels only name an earlier frame whose cel on the
//! same layer they reuse.

use flate2::read::ZlibDecoder;
use std::io::Read;
use std::sync::OnceLock;

use crate::error::{AseError, Result};
use crate::header::ColorDepth;
use crate::pixel::{read_pixels, Pixel};
use crate::reader::Reader;

use super::ChunkRef;

/// Cel sub-type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CelType {
    Raw,
    Linked,
    Compressed,
    CompressedTilemap,
    Unknown(u16),
}

impl CelType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => CelType::Raw,
            1 => CelType::Linked,
            2 => CelType::Compressed,
            3 => CelType::CompressedTilemap,
            other => CelType::Unknown(other),
        }
    }
}

/// Decoded cel pixels in row-major order, top row first.
///
/// `pixels` may hold fewer than `width * height` samples when the data ran
/// short; [`CelImage::pixel`] reports the missing ones as truncated.
#[derive(Debug, Clone, PartialEq)]
pub struct CelImage {
    pub width: u16,
    pub height: u16,
    pub pixels: Vec<Pixel>,
}

impl CelImage {
    fn read(r: &mut Reader<'_>, depth: ColorDepth) -> Result<Self> {
        let width = r.u16()?;
        let height = r.u16()?;
        let pixels = read_pixels(r, depth, width as usize * height as usize);
        Ok(CelImage {
            width,
            height,
            pixels,
        })
    }

    fn read_compressed(r: &mut Reader<'_>, depth: ColorDepth) -> Result<Self> {
        let width = r.u16()?;
        let height = r.u16()?;

        // never inflate past what the declared size can use
        let expected = width as u64 * height as u64 * depth.bytes_per_pixel() as u64;
        let mut inflated = Vec::new();
        ZlibDecoder::new(r.rest())
            .take(expected)
            .read_to_end(&mut inflated)
            .map_err(AseError::Decompress)?;

        let pixels = read_pixels(
            &mut Reader::new(&inflated),
            depth,
            width as usize * height as usize,
        );
        Ok(CelImage {
            width,
            height,
            pixels,
        })
    }

    /// Sample at cel-local `(x, y)`, top-left origin. `None` outside the
    /// cel; samples the data never provided are [`Pixel::Truncated`].
    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        if x >= self.width as usize || y >= self.height as usize {
            return None;
        }
        let sample = self.pixels.get(y * self.width as usize + x).copied();
        Some(sample.unwrap_or(Pixel::Truncated))
    }
}

/// Back-reference to the frame whose cel a linked cel reuses.
#[derive(Debug)]
pub struct LinkedCel {
    pub frame_position: u16,
    /// Target of the first successful lookup
    pub(crate) resolved: OnceLock<ChunkRef>,
}

impl LinkedCel {
    pub fn new(frame_position: u16) -> Self {
        Self {
            frame_position,
            resolved: OnceLock::new(),
        }
    }
}

#[derive(Debug)]
pub enum CelContent {
    Raw(CelImage),
    Linked(LinkedCel),
    Compressed(CelImage),
}

#[derive(Debug)]
pub struct CelChunk {
    pub layer_index: u16,
    pub x: i16,
    pub y: i16,
    pub opacity: u8,
    pub content: CelContent,
}

impl CelChunk {
    /// Decode a cel payload. Sub-types without pixel data (tilemaps, unknown
    /// tags) yield `Ok(None)`.
    pub(crate) fn parse(r: &mut Reader<'_>, depth: ColorDepth) -> Result<Option<Self>> {
        let layer_index = r.u16()?;
        let x = r.i16()?;
        let y = r.i16()?;
        let opacity = r.u8()?;
        let cel_type = CelType::from_u16(r.u16()?);
        r.skip(7)?;

        let content = match cel_type {
            CelType::Raw => CelContent::Raw(CelImage::read(r, depth)?),
            CelType::Linked => CelContent::Linked(LinkedCel::new(r.u16()?)),
            CelType::Compressed => CelContent::Compressed(CelImage::read_compressed(r, depth)?),
            CelType::CompressedTilemap | CelType::Unknown(_) => {
                tracing::debug!("dropping cel of type {:?} on layer {}", cel_type, layer_index);
                return Ok(None);
            }
        };

        Ok(Some(CelChunk {
            layer_index,
            x,
            y,
            opacity,
            content,
        }))
    }

    pub fn cel_type(&self) -> CelType {
        match self.content {
            CelContent::Raw(_) => CelType::Raw,
            CelContent::Linked(_) => CelType::Linked,
            CelContent::Compressed(_) => CelType::Compressed,
        }
    }

    /// Own pixel data, `None` for linked cels.
    pub fn image(&self) -> Option<&CelImage> {
        match &self.content {
            CelContent::Raw(image) | CelContent::Compressed(image) => Some(image),
            CelContent::Linked(_) => None,
        }
    }

    pub fn layer(&self) -> usize {
        self.layer_index as usize
    }
}
