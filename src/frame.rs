//! Frame decoder
//!
//! A frame is a 16-byte header followed by its chunks. The header's declared
//! length bounds the chunk stream, so a frame can never read into the next.

use crate::chunks::{read_chunk, Chunk, ChunkType, CHUNK_HEADER_SIZE};
use crate::error::Result;
use crate::header::ColorDepth;
use crate::reader::Reader;

/// Size of the frame header in bytes.
pub const FRAME_HEADER_SIZE: usize = 16;

/// Magic number of every frame header.
pub const FRAME_MAGIC: u16 = 0xF1FA;

#[derive(Debug)]
pub struct Frame {
    /// Declared size in bytes, frame header included
    pub length: u32,
    pub magic: u16,
    /// Number of chunks the frame declares. Dropped chunks still count.
    pub chunk_count: u32,
    /// Display time in milliseconds
    pub duration: u16,
    pub chunks: Vec<Chunk>,
}

impl Frame {
    /// Decode one frame, leaving `r` past its declared length.
    pub fn read(r: &mut Reader<'_>, depth: ColorDepth) -> Result<Self> {
        let length = r.u32()?;
        let magic = r.u16()?;
        let old_count = r.u16()?;
        let duration = r.u16()?;
        r.skip(2)?;
        let new_count = r.u32()?;

        if magic != FRAME_MAGIC {
            tracing::warn!("unexpected frame magic {:#06x}", magic);
        }

        let chunk_count = if new_count != 0 {
            new_count
        } else {
            old_count as u32
        };

        let mut body = r.take((length as usize).saturating_sub(FRAME_HEADER_SIZE));
        let mut chunks = Vec::with_capacity((chunk_count as usize).min(1024));
        for index in 0..chunk_count {
            if body.remaining() < CHUNK_HEADER_SIZE {
                tracing::warn!(
                    "frame declares {} chunks but its data ends after {}",
                    chunk_count,
                    index
                );
                break;
            }
            if let Some(chunk) = read_chunk(&mut body, depth)? {
                chunks.push(chunk);
            }
        }

        Ok(Frame {
            length,
            magic,
            chunk_count,
            duration,
            chunks,
        })
    }

    /// Every chunk of type `T` in this frame, in stream order.
    pub fn chunks<T: ChunkType>(&self) -> impl Iterator<Item = &T> + '_ {
        self.chunks.iter().filter_map(|c| c.get::<T>())
    }
}
