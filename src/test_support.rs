//! Byte-level document builder for unit tests.

use crate::chunks::{ChunkKind, LayerFlags, CHUNK_HEADER_SIZE};
use crate::frame::{FRAME_HEADER_SIZE, FRAME_MAGIC};
use crate::header::{HEADER_MAGIC, HEADER_SIZE};

pub(crate) struct LayerDef {
    pub name: &'static str,
    pub level: u16,
    pub visible: bool,
    pub group: bool,
    pub blend: u16,
    pub opacity: u8,
}

impl LayerDef {
    pub fn normal(name: &'static str) -> Self {
        Self {
            name,
            level: 0,
            visible: true,
            group: false,
            blend: 0,
            opacity: 255,
        }
    }

    pub fn group(name: &'static str) -> Self {
        Self {
            group: true,
            ..Self::normal(name)
        }
    }

    pub fn level(mut self, level: u16) -> Self {
        self.level = level;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn blend(mut self, blend: u16) -> Self {
        self.blend = blend;
        self
    }

    pub fn opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }
}

pub(crate) struct DocBuilder {
    width: u16,
    height: u16,
    frames: Vec<Vec<Vec<u8>>>,
}

impl DocBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            frames: vec![Vec::new()],
        }
    }

    pub fn frame(mut self) -> Self {
        self.frames.push(Vec::new());
        self
    }

    pub fn chunk(mut self, tag: u16, payload: &[u8]) -> Self {
        let mut out = Vec::new();
        out.extend_from_slice(&((payload.len() + CHUNK_HEADER_SIZE) as u32).to_le_bytes());
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(payload);
        if let Some(frame) = self.frames.last_mut() {
            frame.push(out);
        }
        self
    }

    pub fn layer(self, def: LayerDef) -> Self {
        let mut p = Vec::new();
        let flags = if def.visible { LayerFlags::VISIBLE } else { 0 };
        p.extend_from_slice(&flags.to_le_bytes());
        p.extend_from_slice(&(def.group as u16).to_le_bytes());
        p.extend_from_slice(&def.level.to_le_bytes());
        p.extend_from_slice(&[0; 4]);
        p.extend_from_slice(&def.blend.to_le_bytes());
        p.push(def.opacity);
        p.extend_from_slice(&[0; 3]);
        p.extend_from_slice(&(def.name.len() as u16).to_le_bytes());
        p.extend_from_slice(def.name.as_bytes());
        self.chunk(ChunkKind::LAYER_TAG, &p)
    }

    fn cel_preamble(layer: u16, x: i16, y: i16, opacity: u8, cel_type: u16) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend_from_slice(&layer.to_le_bytes());
        p.extend_from_slice(&x.to_le_bytes());
        p.extend_from_slice(&y.to_le_bytes());
        p.push(opacity);
        p.extend_from_slice(&cel_type.to_le_bytes());
        p.extend_from_slice(&[0; 7]);
        p
    }

    pub fn raw_cel(self, layer: u16, x: i16, y: i16, w: u16, h: u16, pixels: &[u8]) -> Self {
        self.raw_cel_with_opacity(layer, x, y, 255, w, h, pixels)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn raw_cel_with_opacity(
        self,
        layer: u16,
        x: i16,
        y: i16,
        opacity: u8,
        w: u16,
        h: u16,
        pixels: &[u8],
    ) -> Self {
        let mut p = Self::cel_preamble(layer, x, y, opacity, 0);
        p.extend_from_slice(&w.to_le_bytes());
        p.extend_from_slice(&h.to_le_bytes());
        p.extend_from_slice(pixels);
        self.chunk(ChunkKind::CEL_TAG, &p)
    }

    pub fn linked_cel(self, layer: u16, frame_position: u16) -> Self {
        let mut p = Self::cel_preamble(layer, 0, 0, 255, 1);
        p.extend_from_slice(&frame_position.to_le_bytes());
        self.chunk(ChunkKind::CEL_TAG, &p)
    }

    /// Fill a `w` by `h` cel with one RGBA color.
    pub fn solid_cel(self, layer: u16, w: u16, h: u16, rgba: [u8; 4]) -> Self {
        let pixels = rgba.repeat(w as usize * h as usize);
        self.raw_cel(layer, 0, 0, w, h, &pixels)
    }

    pub fn build(self) -> Vec<u8> {
        let mut body = Vec::new();
        for chunks in &self.frames {
            let data: Vec<u8> = chunks.concat();
            body.extend_from_slice(&((data.len() + FRAME_HEADER_SIZE) as u32).to_le_bytes());
            body.extend_from_slice(&FRAME_MAGIC.to_le_bytes());
            body.extend_from_slice(&(chunks.len() as u16).to_le_bytes());
            body.extend_from_slice(&100u16.to_le_bytes());
            body.extend_from_slice(&[0; 2]);
            body.extend_from_slice(&(chunks.len() as u32).to_le_bytes());
            body.extend(data);
        }

        let mut header = vec![0u8; HEADER_SIZE];
        header[0..4].copy_from_slice(&((HEADER_SIZE + body.len()) as u32).to_le_bytes());
        header[4..6].copy_from_slice(&HEADER_MAGIC.to_le_bytes());
        header[6..8].copy_from_slice(&(self.frames.len() as u16).to_le_bytes());
        header[8..10].copy_from_slice(&self.width.to_le_bytes());
        header[10..12].copy_from_slice(&self.height.to_le_bytes());
        header[12..14].copy_from_slice(&32u16.to_le_bytes());
        header[14..18].copy_from_slice(&1u32.to_le_bytes());
        header.extend(body);
        header
    }
}
