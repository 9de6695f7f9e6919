//! Frame atlas and its JSON description
//!
//! Frames are tiled left to right on one row, frame `k` at column offset
//! `k * width`.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::canvas::{Canvas, PixelBuffer};
use crate::chunks::AnimationDirection;
use crate::document::Document;
use crate::error::{AseError, Result};

/// A frame's rectangle within the atlas image, top-left origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtlasFrame {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Milliseconds
    pub duration: u16,
}

/// A tagged frame range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtlasAnimation {
    pub from: u16,
    pub to: u16,
    pub direction: AnimationDirection,
    #[serde(skip_serializing_if = "is_zero")]
    pub repeat: u16,
}

fn is_zero(v: &u16) -> bool {
    *v == 0
}

/// Complete atlas metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AtlasMetadata {
    pub image: String,
    pub size: [u32; 2],
    pub frames: BTreeMap<String, AtlasFrame>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub animations: BTreeMap<String, AtlasAnimation>,
}

/// Total width of `frames` tiles of `width` pixels.
fn atlas_width(width: u32, frames: usize) -> Result<u32> {
    u32::try_from(frames)
        .ok()
        .and_then(|n| width.checked_mul(n))
        .ok_or(AseError::AtlasTooLarge { width, frames })
}

/// Tile `frames`, each `width` by `height`, into one row.
pub fn tile_frames(frames: &[Canvas], width: u32, height: u32) -> Result<Canvas> {
    let mut atlas = Canvas::new(atlas_width(width, frames.len())?, height).with_name("atlas");
    for (k, frame) in frames.iter().enumerate() {
        atlas.blit(frame, k as u32 * width, 0);
    }
    atlas.apply();
    Ok(atlas)
}

/// Describe the atlas of `doc` stored as `image_name`.
pub fn atlas_metadata(doc: &Document, image_name: &str) -> Result<AtlasMetadata> {
    let (width, height) = doc.size();
    let total = atlas_width(width, doc.frame_count())?;

    let frames = doc
        .frames()
        .iter()
        .enumerate()
        .map(|(k, frame)| {
            let rect = AtlasFrame {
                x: k as u32 * width,
                y: 0,
                w: width,
                h: height,
                duration: frame.duration,
            };
            (k.to_string(), rect)
        })
        .collect();

    let animations = doc
        .animations()
        .into_iter()
        .map(|tag| {
            let anim = AtlasAnimation {
                from: tag.from,
                to: tag.to,
                direction: tag.direction,
                repeat: tag.repeat,
            };
            (tag.name.clone(), anim)
        })
        .collect();

    Ok(AtlasMetadata {
        image: image_name.to_string(),
        size: [total, height],
        frames,
        animations,
    })
}
