//! Slice chunk (0x2022)

use serde::Serialize;

use crate::reader::{ReadResult, Reader};

const SLICE_NINE_PATCH: u32 = 1;
const SLICE_HAS_PIVOT: u32 = 2;

/// Inner rectangle of a 9-patch slice, relative to the slice bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SliceCenter {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Slice geometry from `frame` onwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceKey {
    pub frame: u32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center: Option<SliceCenter>,
    /// Pivot relative to the slice origin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivot: Option<(i32, i32)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceChunk {
    pub name: String,
    pub flags: u32,
    pub keys: Vec<SliceKey>,
}

impl SliceChunk {
    pub(crate) fn parse(r: &mut Reader<'_>) -> ReadResult<Self> {
        let key_count = r.u32()?;
        let flags = r.u32()?;
        r.skip(4)?;
        let name = r.string()?;

        let mut keys = Vec::with_capacity((key_count as usize).min(1024));
        for _ in 0..key_count {
            let frame = r.u32()?;
            let x = r.i32()?;
            let y = r.i32()?;
            let width = r.u32()?;
            let height = r.u32()?;
            let center = if flags & SLICE_NINE_PATCH != 0 {
                Some(SliceCenter {
                    x: r.i32()?,
                    y: r.i32()?,
                    width: r.u32()?,
                    height: r.u32()?,
                })
            } else {
                None
            };
            let pivot = if flags & SLICE_HAS_PIVOT != 0 {
                Some((r.i32()?, r.i32()?))
            } else {
                None
            };
            keys.push(SliceKey {
                frame,
                x,
                y,
                width,
                height,
                center,
                pivot,
            });
        }

        Ok(SliceChunk { name, flags, keys })
    }

    pub fn is_nine_patch(&self) -> bool {
        self.flags & SLICE_NINE_PATCH != 0
    }

    pub fn has_pivot(&self) -> bool {
        self.flags & SLICE_HAS_PIVOT != 0
    }

    /// The key in effect at `frame`: the one with the greatest starting
    /// frame not after it.
    pub fn key_at(&self, frame: usize) -> Option<&SliceKey> {
        self.keys
            .iter()
            .filter(|k| k.frame as usize <= frame)
            .max_by_key(|k| k.frame)
    }
}
