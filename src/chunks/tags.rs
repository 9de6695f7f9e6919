//! Frame tags chunk (0x2018)

use serde::Serialize;

use crate::reader::{ReadResult, Reader};

/// Playback direction of a tagged frame range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationDirection {
    Forward,
    Reverse,
    PingPong,
    PingPongReverse,
    Unknown(u8),
}

impl AnimationDirection {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => AnimationDirection::Forward,
            1 => AnimationDirection::Reverse,
            2 => AnimationDirection::PingPong,
            3 => AnimationDirection::PingPongReverse,
            other => AnimationDirection::Unknown(other),
        }
    }
}

/// A named, inclusive range of frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameTag {
    pub name: String,
    pub from: u16,
    pub to: u16,
    pub direction: AnimationDirection,
    /// Times to play the range; 0 means forever
    pub repeat: u16,
    pub color: [u8; 3],
}

impl FrameTag {
    /// Number of frames covered by the tag.
    pub fn len(&self) -> usize {
        (self.to as usize + 1).saturating_sub(self.from as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, frame: usize) -> bool {
        frame >= self.from as usize && frame <= self.to as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameTagsChunk {
    pub tags: Vec<FrameTag>,
}

impl FrameTagsChunk {
    pub(crate) fn parse(r: &mut Reader<'_>) -> ReadResult<Self> {
        let count = r.u16()?;
        r.skip(8)?;

        let mut tags = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let from = r.u16()?;
            let to = r.u16()?;
            let direction = AnimationDirection::from_u8(r.u8()?);
            let repeat = r.u16()?;
            r.skip(6)?;
            let rgb = r.bytes(3)?;
            r.skip(1)?;
            let name = r.string()?;
            tags.push(FrameTag {
                name,
                from,
                to,
                direction,
                repeat,
                color: [rgb[0], rgb[1], rgb[2]],
            });
        }

        Ok(FrameTagsChunk { tags })
    }
}
