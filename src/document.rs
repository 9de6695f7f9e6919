//! Parsed document
//!
//! A [`Document`] owns the header and every frame. It is immutable once
//! parsed: the first-chunk index is built during parsing, and linked cels
//! memoize their target in a thread-safe slot, so a document can be shared
//! across threads freely.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::chunks::{
    CelChunk, CelContent, CelImage, Chunk, ChunkKind, ChunkRef, ChunkType, LayerChunk,
    PaletteChunk,
};
use crate::error::{AseError, Result};
use crate::frame::{Frame, FRAME_HEADER_SIZE};
use crate::header::{Header, HEADER_SIZE};
use crate::hierarchy::Hierarchy;
use crate::reader::Reader;

#[derive(Debug)]
pub struct Document {
    header: Header,
    frames: Vec<Frame>,
    /// First occurrence of each chunk kind across all frames
    first_chunks: HashMap<ChunkKind, ChunkRef>,
}

impl Document {
    /// Decode a complete document from memory.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(AseError::MalformedHeader { len: bytes.len() });
        }
        let header = Header::parse(&bytes[..HEADER_SIZE])?;

        let mut r = Reader::new(&bytes[HEADER_SIZE..]);
        let mut frames = Vec::with_capacity(header.frames as usize);
        while r.remaining() >= FRAME_HEADER_SIZE {
            frames.push(Frame::read(&mut r, header.color_depth)?);
        }
        if r.remaining() > 0 {
            tracing::warn!("ignoring {} trailing bytes", r.remaining());
        }
        if frames.len() != header.frames as usize {
            tracing::warn!(
                "header declares {} frames, parsed {}",
                header.frames,
                frames.len()
            );
        }

        let mut first_chunks = HashMap::new();
        for (frame, f) in frames.iter().enumerate() {
            for (chunk, c) in f.chunks.iter().enumerate() {
                first_chunks
                    .entry(c.kind())
                    .or_insert(ChunkRef { frame, chunk });
            }
        }

        tracing::debug!(
            "parsed {}x{} document with {} frames",
            header.width,
            header.height,
            frames.len()
        );

        Ok(Document {
            header,
            frames,
            first_chunks,
        })
    }

    /// Read the whole stream, then parse it.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::parse(&bytes)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Canvas size as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.header.width as u32, self.header.height as u32)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Result<&Frame> {
        self.frames.get(index).ok_or(AseError::FrameOutOfRange {
            index,
            frame_count: self.frames.len(),
        })
    }

    pub fn chunk_at(&self, at: ChunkRef) -> Option<&Chunk> {
        self.frames.get(at.frame)?.chunks.get(at.chunk)
    }

    /// Every chunk of type `T`, frame by frame in stream order.
    pub fn chunks<T: ChunkType>(&self) -> impl Iterator<Item = &T> + '_ {
        self.frames.iter().flat_map(|f| f.chunks::<T>())
    }

    /// First chunk of type `T` in the document.
    pub fn chunk<T: ChunkType>(&self) -> Option<&T> {
        let at = self.first_chunks.get(&T::KIND)?;
        self.chunk_at(*at)?.get::<T>()
    }

    /// All layers, in declaration order. Cel layer indices refer to this list.
    pub fn layers(&self) -> Vec<&LayerChunk> {
        self.chunks::<LayerChunk>().collect()
    }

    pub fn layer(&self, index: usize) -> Option<&LayerChunk> {
        self.chunks::<LayerChunk>().nth(index)
    }

    pub fn layer_by_name(&self, name: &str) -> Option<(usize, &LayerChunk)> {
        self.chunks::<LayerChunk>()
            .enumerate()
            .find(|(_, l)| l.name == name)
    }

    pub fn hierarchy(&self) -> Hierarchy<'_> {
        Hierarchy::new(self.layers())
    }

    /// The palette indexed pixels resolve through.
    pub fn palette(&self) -> Option<&PaletteChunk> {
        self.chunk::<PaletteChunk>()
    }

    fn find_cel(&self, frame: usize, layer: usize) -> Option<ChunkRef> {
        let chunk = self.frames.get(frame)?.chunks.iter().position(|c| {
            c.get::<CelChunk>()
                .is_some_and(|cel| cel.layer() == layer)
        })?;
        Some(ChunkRef { frame, chunk })
    }

    /// The cel on `layer` in `frame`, if any.
    pub fn cel(&self, frame: usize, layer: usize) -> Option<&CelChunk> {
        let at = self.find_cel(frame, layer)?;
        self.chunk_at(at)?.get::<CelChunk>()
    }

    /// The layer a cel in `frame` belongs to.
    pub fn cel_layer(&self, frame: usize, cel: &CelChunk) -> Result<&LayerChunk> {
        self.layer(cel.layer()).ok_or_else(|| AseError::InvalidLayerIndex {
            frame,
            layer: cel.layer(),
            layer_count: self.layers().len(),
        })
    }

    /// Pixel data of `cel` (found in `frame`), following links to the cel
    /// on the same layer in the referenced frame.
    ///
    /// Each link hop is memoized on the linked cel. A chain longer than the
    /// frame count is a cycle and reported as unresolved.
    pub fn cel_image<'a>(&'a self, frame: usize, cel: &'a CelChunk) -> Result<&'a CelImage> {
        let mut current = cel;
        let mut current_frame = frame;

        for _ in 0..=self.frames.len() {
            let link = match &current.content {
                CelContent::Raw(image) | CelContent::Compressed(image) => return Ok(image),
                CelContent::Linked(link) => link,
            };
            let (layer, target_frame) = (current.layer(), link.frame_position as usize);
            let from_frame = current_frame;
            let unresolved = move || AseError::UnresolvedLinkedCel {
                frame: from_frame,
                layer,
                target_frame,
            };

            let target = match link.resolved.get() {
                Some(target) => *target,
                None => {
                    let target = self
                        .find_cel(target_frame, layer)
                        .ok_or_else(unresolved)?;
                    *link.resolved.get_or_init(|| target)
                }
            };

            current = self
                .chunk_at(target)
                .and_then(|c| c.get::<CelChunk>())
                .ok_or_else(unresolved)?;
            current_frame = target.frame;
        }

        tracing::warn!("linked cel chain starting in frame {} does not terminate", frame);
        Err(AseError::UnresolvedLinkedCel {
            frame,
            layer: cel.layer(),
            target_frame: current_frame,
        })
    }

    /// Opacity a cel is composited with: the smaller of its layer's and its
    /// own, normalized. Layer opacity counts as opaque when the header says
    /// layer opacity bytes are not valid.
    pub fn effective_opacity(&self, layer: &LayerChunk, cel: &CelChunk) -> f32 {
        let layer_opacity = if self.header.layer_opacity_valid() {
            layer.opacity
        } else {
            u8::MAX
        };
        layer_opacity.min(cel.opacity) as f32 / 255.0
    }

    /// Display time of a frame in milliseconds.
    pub fn duration(&self, index: usize) -> Result<u16> {
        self.frame(index).map(|f| f.duration)
    }
}
