//! Layer chunk (0x2004)

use serde::Serialize;

use crate::composition::BlendMode;
use crate::reader::{ReadResult, Reader};

/// Name prefix of layers that carry metadata instead of artwork.
pub const DEFAULT_METADATA_MARKER: &str = "@";

/// Layer flag bits as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct LayerFlags(pub u16);

impl LayerFlags {
    pub const VISIBLE: u16 = 1;
    pub const EDITABLE: u16 = 2;
    pub const LOCK_MOVEMENT: u16 = 4;
    pub const BACKGROUND: u16 = 8;
    pub const PREFER_LINKED_CELS: u16 = 16;
    pub const COLLAPSED: u16 = 32;
    pub const REFERENCE: u16 = 64;

    pub fn contains(self, bit: u16) -> bool {
        self.0 & bit != 0
    }
}

/// Kind of layer in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Normal,
    /// Hosts child layers, never rasterized itself
    Group,
    /// Tile-based layer; its cels carry tile indices, not pixels
    Tilemap,
    Unknown(u16),
}

impl LayerType {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => LayerType::Normal,
            1 => LayerType::Group,
            2 => LayerType::Tilemap,
            other => LayerType::Unknown(other),
        }
    }
}

/// A layer declaration. Layers appear depth-first; `child_level` encodes
/// nesting (see [`crate::hierarchy`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerChunk {
    pub flags: LayerFlags,
    pub layer_type: LayerType,
    pub child_level: u16,
    pub default_width: u16,
    pub default_height: u16,
    pub blend_mode: BlendMode,
    pub opacity: u8,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tileset_index: Option<u32>,
}

impl LayerChunk {
    pub(crate) fn parse(r: &mut Reader<'_>) -> ReadResult<Self> {
        let flags = LayerFlags(r.u16()?);
        let layer_type = LayerType::from_u16(r.u16()?);
        let child_level = r.u16()?;
        let default_width = r.u16()?;
        let default_height = r.u16()?;
        let blend_mode = BlendMode::from_u16(r.u16()?);
        let opacity = r.u8()?;
        r.skip(3)?;
        let name = r.string()?;
        let tileset_index = if layer_type == LayerType::Tilemap {
            Some(r.u32()?)
        } else {
            None
        };

        Ok(LayerChunk {
            flags,
            layer_type,
            child_level,
            default_width,
            default_height,
            blend_mode,
            opacity,
            name,
            tileset_index,
        })
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(LayerFlags::VISIBLE)
    }

    pub fn is_group(&self) -> bool {
        self.layer_type == LayerType::Group
    }

    pub fn is_background(&self) -> bool {
        self.flags.contains(LayerFlags::BACKGROUND)
    }

    /// Whether the layer name starts with the metadata `marker`.
    pub fn is_metadata(&self, marker: &str) -> bool {
        self.name.starts_with(marker)
    }
}
