//! Shared byte-level document writer for integration tests
//!
//! Builds `.aseprite` streams chunk by chunk so each test states exactly
//! what the decoder sees.

#![allow(dead_code)]

use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

pub const LAYER: u16 = 0x2004;
pub const CEL: u16 = 0x2005;
pub const TAGS: u16 = 0x2018;
pub const PALETTE: u16 = 0x2019;
pub const SLICE: u16 = 0x2022;

pub const RED: [u8; 4] = [255, 0, 0, 255];
pub const BLUE: [u8; 4] = [0, 0, 255, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const GRAY: [u8; 4] = [128, 128, 128, 255];

/// Blend mode ids as stored in layer chunks
pub mod blend {
    pub const NORMAL: u16 = 0;
    pub const MULTIPLY: u16 = 1;
    pub const SCREEN: u16 = 2;
    pub const DIFFERENCE: u16 = 10;
}

/// A layer chunk description
#[derive(Clone)]
pub struct Layer {
    pub name: String,
    pub level: u16,
    pub visible: bool,
    pub layer_type: u16,
    pub blend: u16,
    pub opacity: u8,
}

impl Layer {
    pub fn normal(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: 0,
            visible: true,
            layer_type: 0,
            blend: blend::NORMAL,
            opacity: 255,
        }
    }

    pub fn group(name: &str) -> Self {
        Self { layer_type: 1, ..Self::normal(name) }
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

pub struct AseWriter {
    width: u16,
    height: u16,
    depth: u16,
    header_frames: Option<u16>,
    durations: Vec<u16>,
    frames: Vec<Vec<Vec<u8>>>,
}

impl AseWriter {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            depth: 32,
            header_frames: None,
            durations: vec![100],
            frames: vec![Vec::new()],
        }
    }

    /// Color depth in bits per pixel (32, 16 or 8)
    pub fn depth(mut self, depth: u16) -> Self {
        self.depth = depth;
        self
    }

    /// Declare a frame count in the header that differs from the real one
    pub fn header_frames(mut self, frames: u16) -> Self {
        self.header_frames = Some(frames);
        self
    }

    /// Start a new frame
    pub fn frame(mut self) -> Self {
        self.frames.push(Vec::new());
        self.durations.push(100);
        self
    }

    /// Set the current frame's duration
    pub fn duration(mut self, ms: u16) -> Self {
        if let Some(d) = self.durations.last_mut() {
            *d = ms;
        }
        self
    }

    pub fn chunk(mut self, tag: u16, payload: &[u8]) -> Self {
        let mut out = Vec::new();
        out.extend_from_slice(&((payload.len() + 6) as u32).to_le_bytes());
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(payload);
        if let Some(frame) = self.frames.last_mut() {
            frame.push(out);
        }
        self
    }

    pub fn layer(self, layer: Layer) -> Self {
        let mut p = Vec::new();
        let flags: u16 = if layer.visible { 1 } else { 0 };
        p.extend_from_slice(&flags.to_le_bytes());
        p.extend_from_slice(&layer.layer_type.to_le_bytes());
        p.extend_from_slice(&layer.level.to_le_bytes());
        p.extend_from_slice(&[0; 4]);
        p.extend_from_slice(&layer.blend.to_le_bytes());
        p.push(layer.opacity);
        p.extend_from_slice(&[0; 3]);
        push_string(&mut p, &layer.name);
        self.chunk(LAYER, &p)
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

    /// Raw cel with samples already encoded for the document depth
    pub fn raw_cel(self, layer: u16, x: i16, y: i16, w: u16, h: u16, samples: &[u8]) -> Self {
        let mut p = Self::cel_preamble(layer, x, y, 255, 0);
        p.extend_from_slice(&w.to_le_bytes());
        p.extend_from_slice(&h.to_le_bytes());
        p.extend_from_slice(samples);
        self.chunk(CEL, &p)
    }

    /// Zlib-compressed cel
    pub fn compressed_cel(self, layer: u16, x: i16, y: i16, w: u16, h: u16, samples: &[u8]) -> Self {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(samples).expect("in-memory write");
        let compressed = encoder.finish().expect("in-memory finish");

        let mut p = Self::cel_preamble(layer, x, y, 255, 2);
        p.extend_from_slice(&w.to_le_bytes());
        p.extend_from_slice(&h.to_le_bytes());
        p.extend_from_slice(&compressed);
        self.chunk(CEL, &p)
    }

    pub fn linked_cel(self, layer: u16, frame_position: u16) -> Self {
        let mut p = Self::cel_preamble(layer, 0, 0, 255, 1);
        p.extend_from_slice(&frame_position.to_le_bytes());
        self.chunk(CEL, &p)
    }

    /// Tilemap cel (type 3); the decoder drops it
    pub fn tilemap_cel(self, layer: u16) -> Self {
        let mut p = Self::cel_preamble(layer, 0, 0, 255, 3);
        p.extend_from_slice(&[1, 0, 1, 0, 32, 0]);
        p.extend_from_slice(&[0; 20]);
        self.chunk(CEL, &p)
    }

    /// `w` by `h` cel at the origin filled with one RGBA color
    pub fn solid_cel(self, layer: u16, w: u16, h: u16, rgba: [u8; 4]) -> Self {
        let samples = rgba.repeat(w as usize * h as usize);
        self.raw_cel(layer, 0, 0, w, h, &samples)
    }

    pub fn palette(self, first: u32, colors: &[[u8; 4]]) -> Self {
        let mut p = Vec::new();
        p.extend_from_slice(&(first + colors.len() as u32).to_le_bytes());
        p.extend_from_slice(&first.to_le_bytes());
        p.extend_from_slice(&(first + colors.len() as u32 - 1).to_le_bytes());
        p.extend_from_slice(&[0; 8]);
        for c in colors {
            p.extend_from_slice(&0u16.to_le_bytes());
            p.extend_from_slice(c);
        }
        self.chunk(PALETTE, &p)
    }

    /// Tags as (name, from, to, direction)
    pub fn tags(self, tags: &[(&str, u16, u16, u8)]) -> Self {
        let mut p = Vec::new();
        p.extend_from_slice(&(tags.len() as u16).to_le_bytes());
        p.extend_from_slice(&[0; 8]);
        for (name, from, to, direction) in tags {
            p.extend_from_slice(&from.to_le_bytes());
            p.extend_from_slice(&to.to_le_bytes());
            p.push(*direction);
            p.extend_from_slice(&0u16.to_le_bytes());
            p.extend_from_slice(&[0; 6]);
            p.extend_from_slice(&[255, 0, 0]);
            p.push(0);
            push_string(&mut p, name);
        }
        self.chunk(TAGS, &p)
    }

    /// Plain slice with keys as (frame, x, y, w, h)
    pub fn slice(self, name: &str, keys: &[(u32, i32, i32, u32, u32)]) -> Self {
        let mut p = Vec::new();
        p.extend_from_slice(&(keys.len() as u32).to_le_bytes());
        p.extend_from_slice(&0u32.to_le_bytes());
        p.extend_from_slice(&[0; 4]);
        push_string(&mut p, name);
        for (frame, x, y, w, h) in keys {
            p.extend_from_slice(&frame.to_le_bytes());
            p.extend_from_slice(&x.to_le_bytes());
            p.extend_from_slice(&y.to_le_bytes());
            p.extend_from_slice(&w.to_le_bytes());
            p.extend_from_slice(&h.to_le_bytes());
        }
        self.chunk(SLICE, &p)
    }

    pub fn build(self) -> Vec<u8> {
        let mut body = Vec::new();
        for (chunks, duration) in self.frames.iter().zip(&self.durations) {
            let data: Vec<u8> = chunks.concat();
            body.extend_from_slice(&((data.len() + 16) as u32).to_le_bytes());
            body.extend_from_slice(&0xF1FAu16.to_le_bytes());
            body.extend_from_slice(&(chunks.len() as u16).to_le_bytes());
            body.extend_from_slice(&duration.to_le_bytes());
            body.extend_from_slice(&[0; 2]);
            body.extend_from_slice(&(chunks.len() as u32).to_le_bytes());
            body.extend(data);
        }

        let frames = self.header_frames.unwrap_or(self.frames.len() as u16);
        let mut header = vec![0u8; 128];
        header[0..4].copy_from_slice(&((128 + body.len()) as u32).to_le_bytes());
        header[4..6].copy_from_slice(&0xA5E0u16.to_le_bytes());
        header[6..8].copy_from_slice(&frames.to_le_bytes());
        header[8..10].copy_from_slice(&self.width.to_le_bytes());
        header[10..12].copy_from_slice(&self.height.to_le_bytes());
        header[12..14].copy_from_slice(&self.depth.to_le_bytes());
        header[14..18].copy_from_slice(&1u32.to_le_bytes());
        header.extend(body);
        header
    }
}

fn push_string(p: &mut Vec<u8>, s: &str) {
    p.extend_from_slice(&(s.len() as u16).to_le_bytes());
    p.extend_from_slice(s.as_bytes());
}

/// Assert two colors are equal within `eps` per channel
pub fn assert_color(actual: asepix::Color, expected: (f32, f32, f32, f32), eps: f32) {
    let (r, g, b, a) = expected;
    assert!(
        actual.approx_eq(asepix::Color::new(r, g, b, a), eps),
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}
