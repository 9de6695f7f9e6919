//! Typed frame chunks and the chunk dispatcher
//!
//! Every chunk starts with a 6-byte header: a u32 size (header included) and
//! a u16 kind tag. Known kinds are decoded from a reader bounded to the
//! declared size; anything else is skipped by that size, so a bad or unknown
//! payload never desynchronizes the stream.

mod cel;
mod layer;
mod palette;
mod slice;
mod tags;

pub use cel::{CelChunk, CelContent, CelImage, CelType, LinkedCel};
pub use layer::{LayerChunk, LayerFlags, LayerType, DEFAULT_METADATA_MARKER};
pub use palette::{PaletteChunk, PaletteEntry};
pub use slice::{SliceCenter, SliceChunk, SliceKey};
pub use tags::{AnimationDirection, FrameTag, FrameTagsChunk};

use crate::error::Result;
use crate::header::ColorDepth;
use crate::reader::Reader;

/// Size of the chunk header (u32 size + u16 kind).
pub const CHUNK_HEADER_SIZE: usize = 6;

/// Chunk kinds the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkKind {
    Layer,
    Cel,
    Palette,
    FrameTags,
    Slice,
}

impl ChunkKind {
    pub const LAYER_TAG: u16 = 0x2004;
    pub const CEL_TAG: u16 = 0x2005;
    pub const FRAME_TAGS_TAG: u16 = 0x2018;
    pub const PALETTE_TAG: u16 = 0x2019;
    pub const SLICE_TAG: u16 = 0x2022;

    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            Self::LAYER_TAG => Some(ChunkKind::Layer),
            Self::CEL_TAG => Some(ChunkKind::Cel),
            Self::FRAME_TAGS_TAG => Some(ChunkKind::FrameTags),
            Self::PALETTE_TAG => Some(ChunkKind::Palette),
            Self::SLICE_TAG => Some(ChunkKind::Slice),
            _ => None,
        }
    }

    pub fn tag(self) -> u16 {
        match self {
            ChunkKind::Layer => Self::LAYER_TAG,
            ChunkKind::Cel => Self::CEL_TAG,
            ChunkKind::FrameTags => Self::FRAME_TAGS_TAG,
            ChunkKind::Palette => Self::PALETTE_TAG,
            ChunkKind::Slice => Self::SLICE_TAG,
        }
    }
}

/// Location of a chunk inside a document: frame index, then position in
/// that frame's chunk list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkRef {
    pub frame: usize,
    pub chunk: usize,
}

/// Decoded payload of a chunk.
#[derive(Debug)]
pub enum ChunkData {
    Layer(LayerChunk),
    Cel(CelChunk),
    Palette(PaletteChunk),
    FrameTags(FrameTagsChunk),
    Slice(SliceChunk),
}

/// One decoded chunk together with its declared size.
#[derive(Debug)]
pub struct Chunk {
    /// Declared size in bytes, including the 6-byte chunk header
    pub length: u32,
    pub data: ChunkData,
}

impl Chunk {
    pub fn kind(&self) -> ChunkKind {
        match self.data {
            ChunkData::Layer(_) => ChunkKind::Layer,
            ChunkData::Cel(_) => ChunkKind::Cel,
            ChunkData::Palette(_) => ChunkKind::Palette,
            ChunkData::FrameTags(_) => ChunkKind::FrameTags,
            ChunkData::Slice(_) => ChunkKind::Slice,
        }
    }

    /// Borrow the payload as a concrete chunk type.
    pub fn get<T: ChunkType>(&self) -> Option<&T> {
        T::from_chunk(self)
    }
}

/// Concrete chunk payload types, for typed queries such as
/// [`crate::Document::chunks`].
pub trait ChunkType: Sized + 'static {
    const KIND: ChunkKind;

    fn from_chunk(chunk: &Chunk) -> Option<&Self>;
}

macro_rules! impl_chunk_type {
    ($ty:ty, $variant:ident) => {
        impl ChunkType for $ty {
            const KIND: ChunkKind = ChunkKind::$variant;

            fn from_chunk(chunk: &Chunk) -> Option<&Self> {
                match &chunk.data {
                    ChunkData::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_chunk_type!(LayerChunk, Layer);
impl_chunk_type!(CelChunk, Cel);
impl_chunk_type!(PaletteChunk, Palette);
impl_chunk_type!(FrameTagsChunk, FrameTags);
impl_chunk_type!(SliceChunk, Slice);

/// Read one chunk from `r`.
///
/// Returns `Ok(None)` for chunks that are skipped: unknown kinds, cel
/// sub-types without pixel data, and payloads that fail to decode. In every
/// case `r` ends up exactly past the declared chunk size (or at the end of
/// the buffer if the size overruns it). Only a short chunk header is an
/// error.
pub fn read_chunk(r: &mut Reader<'_>, depth: ColorDepth) -> Result<Option<Chunk>> {
    let length = r.u32()?;
    let tag = r.u16()?;
    let mut payload = r.take((length as usize).saturating_sub(CHUNK_HEADER_SIZE));

    let Some(kind) = ChunkKind::from_tag(tag) else {
        tracing::debug!("skipping chunk {:#06x} ({} bytes)", tag, length);
        return Ok(None);
    };

    let decoded = decode_payload(kind, &mut payload, depth);

    match decoded {
        Ok(data) => Ok(data.map(|data| Chunk { length, data })),
        Err(e) => {
            tracing::warn!("dropping malformed {:?} chunk: {}", kind, e);
            Ok(None)
        }
    }
}

fn decode_payload(kind: ChunkKind, r: &mut Reader<'_>, depth: ColorDepth) -> Result<Option<ChunkData>> {
    let data = match kind {
        ChunkKind::Layer => ChunkData::Layer(LayerChunk::parse(r)?),
        ChunkKind::Cel => match CelChunk::parse(r, depth)? {
            Some(cel) => ChunkData::Cel(cel),
            None => return Ok(None),
        },
        ChunkKind::Palette => ChunkData::Palette(PaletteChunk::parse(r)?),
        ChunkKind::FrameTags => ChunkData::FrameTags(FrameTagsChunk::parse(r)?),
        ChunkKind::Slice => ChunkData::Slice(SliceChunk::parse(r)?),
    };
    Ok(Some(data))
}
