//! The fixed 128-byte document header

use serde::Serialize;

use crate::error::{AseError, Result};
use crate::reader::Reader;

/// Size of the header block in bytes.
pub const HEADER_SIZE: usize = 128;

/// Magic number stored at offset 4.
pub const HEADER_MAGIC: u16 = 0xA5E0;

/// Header flag: layer opacity fields hold valid values.
pub const FLAG_LAYER_OPACITY_VALID: u32 = 1;

/// Bits per pixel of every cel in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorDepth {
    /// 4 bytes per pixel: r, g, b, a
    #[default]
    Rgba,
    /// 2 bytes per pixel: value, alpha
    Grayscale,
    /// 1 byte per pixel: palette index
    Indexed,
    /// Any other declared depth; every sample decodes to magenta
    Unknown(u16),
}

impl ColorDepth {
    pub fn from_bits(bits: u16) -> Self {
        match bits {
            32 => ColorDepth::Rgba,
            16 => ColorDepth::Grayscale,
            8 => ColorDepth::Indexed,
            other => ColorDepth::Unknown(other),
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            ColorDepth::Rgba => 32,
            ColorDepth::Grayscale => 16,
            ColorDepth::Indexed => 8,
            ColorDepth::Unknown(bits) => bits,
        }
    }

    /// Bytes one pixel sample occupies.
    pub fn bytes_per_pixel(self) -> usize {
        (self.bits() as usize).div_ceil(8)
    }
}

/// Parsed document header. Immutable once decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Header {
    pub file_size: u32,
    pub magic: u16,
    pub frames: u16,
    pub width: u16,
    pub height: u16,
    pub color_depth: ColorDepth,
    pub flags: u32,
    /// Milliseconds between frames. Superseded by per-frame durations.
    pub speed: u16,
    /// Palette entry that is transparent in non-background layers (indexed only)
    pub transparent_index: u8,
    /// Declared number of colors; 0 means 256
    pub color_count: u16,
    pub pixel_width: u8,
    pub pixel_height: u8,
}

impl Header {
    /// Decode a header from exactly [`HEADER_SIZE`] bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != HEADER_SIZE {
            return Err(AseError::MalformedHeader { len: bytes.len() });
        }

        let mut r = Reader::new(bytes);
        let file_size = r.u32()?;
        let magic = r.u16()?;
        let frames = r.u16()?;
        let width = r.u16()?;
        let height = r.u16()?;
        let color_depth = ColorDepth::from_bits(r.u16()?);
        let flags = r.u32()?;
        let speed = r.u16()?;
        r.skip(8)?;
        let transparent_index = r.u8()?;
        r.skip(3)?;
        let color_count = r.u16()?;
        let pixel_width = r.u8()?;
        let pixel_height = r.u8()?;

        if magic != HEADER_MAGIC {
            tracing::warn!("unexpected header magic {:#06x}", magic);
        }

        Ok(Header {
            file_size,
            magic,
            frames,
            width,
            height,
            color_depth,
            flags,
            speed,
            transparent_index,
            color_count,
            pixel_width,
            pixel_height,
        })
    }

    /// Number of palette colors, resolving the legacy `0 == 256` encoding.
    pub fn effective_color_count(&self) -> usize {
        if self.color_count == 0 {
            256
        } else {
            self.color_count as usize
        }
    }

    /// Whether layer opacity bytes should be honored.
    pub fn layer_opacity_valid(&self) -> bool {
        self.flags & FLAG_LAYER_OPACITY_VALID != 0
    }

    /// Pixel aspect ratio (width / height); 1.0 when either side is zero.
    pub fn pixel_ratio(&self) -> f32 {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            1.0
        } else {
            self.pixel_width as f32 / self.pixel_height as f32
        }
    }
}
