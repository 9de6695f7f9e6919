//! Palette chunk (0x2019)

use serde::Serialize;

use crate::color::{Color, MAGENTA};
use crate::reader::{ReadResult, Reader};

const ENTRY_HAS_NAME: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PaletteEntry {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a,
            name: None,
        }
    }

    pub fn color(&self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// A run of palette entries starting at `first_index`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteChunk {
    /// Total palette size after this chunk is applied
    pub size: u32,
    pub first_index: u32,
    pub entries: Vec<PaletteEntry>,
}

impl PaletteChunk {
    pub fn from_entries(first_index: u32, entries: Vec<PaletteEntry>) -> Self {
        Self {
            size: first_index + entries.len() as u32,
            first_index,
            entries,
        }
    }

    pub(crate) fn parse(r: &mut Reader<'_>) -> ReadResult<Self> {
        let size = r.u32()?;
        let first_index = r.u32()?;
        let last_index = r.u32()?;
        r.skip(8)?;

        let count = last_index.saturating_sub(first_index) as usize + 1;
        let mut entries = Vec::with_capacity(count.min(256));
        for _ in 0..count {
            let flags = r.u16()?;
            let rgba = r.bytes(4)?;
            let name = if flags & ENTRY_HAS_NAME != 0 {
                Some(r.string()?)
            } else {
                None
            };
            entries.push(PaletteEntry {
                r: rgba[0],
                g: rgba[1],
                b: rgba[2],
                a: rgba[3],
                name,
            });
        }

        Ok(PaletteChunk {
            size,
            first_index,
            entries,
        })
    }

    pub fn entry(&self, index: usize) -> Option<&PaletteEntry> {
        let offset = index.checked_sub(self.first_index as usize)?;
        self.entries.get(offset)
    }

    /// Normalized color at `index`, or [`MAGENTA`] if the palette has no such
    /// entry.
    pub fn color(&self, index: usize) -> Color {
        match self.entry(index) {
            Some(entry) => entry.color(),
            None => {
                tracing::trace!(index, "palette index out of range");
                MAGENTA
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
