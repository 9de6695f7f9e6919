//! Document-level extraction
//!
//! Whole-document queries built on the compositing engine: flattened
//! frames, per-layer images, animation tags, slices, pivot metadata and the
//! frame atlas.

pub mod atlas;
pub mod metadata;
pub mod outline;

use serde::Serialize;

use crate::canvas::Canvas;
use crate::chunks::{CelChunk, FrameTag, FrameTagsChunk, SliceChunk, SliceKey, DEFAULT_METADATA_MARKER};
use crate::composition::render_frame;
use crate::document::Document;
use crate::error::Result;
use crate::raster::rasterize;

pub use atlas::{atlas_metadata, tile_frames, AtlasMetadata};
pub use metadata::{extract_metadata, LayerMetadata, MetadataParams};
pub use outline::rim_light;

/// A slice as it applies to one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSlice<'a> {
    pub name: &'a str,
    #[serde(flatten)]
    pub key: &'a SliceKey,
}

impl Document {
    /// Flatten one frame (see [`render_frame`]).
    pub fn frame_image(&self, index: usize) -> Result<Canvas> {
        render_frame(self, index, DEFAULT_METADATA_MARKER)
    }

    /// Flatten every frame, in playback order.
    pub fn frame_images(&self) -> Result<Vec<Canvas>> {
        frame_images(self, DEFAULT_METADATA_MARKER)
    }

    /// Every cel of every effectively visible pixel layer as its own canvas,
    /// named `<layer>_<frame>`. No blending: each cel stands alone.
    pub fn layer_images(&self) -> Result<Vec<Canvas>> {
        let (width, height) = self.size();
        let hierarchy = self.hierarchy();
        let palette = self.palette();

        let mut images = Vec::new();
        for (layer_index, layer) in hierarchy.layers().iter().enumerate() {
            if !hierarchy.is_renderable(layer_index) {
                continue;
            }
            for (frame_index, frame) in self.frames().iter().enumerate() {
                for cel in frame.chunks::<CelChunk>().filter(|c| c.layer() == layer_index) {
                    let image = self.cel_image(frame_index, cel)?;
                    let canvas = rasterize(width, height, cel.x as i32, cel.y as i32, image, palette)
                        .with_name(format!("{}_{}", layer.name, frame_index));
                    images.push(canvas);
                }
            }
        }
        Ok(images)
    }

    /// Tags of every tags chunk, concatenated in document order.
    pub fn animations(&self) -> Vec<&FrameTag> {
        self.chunks::<FrameTagsChunk>()
            .flat_map(|chunk| chunk.tags.iter())
            .collect()
    }

    pub fn slices(&self) -> Vec<&SliceChunk> {
        self.chunks::<SliceChunk>().collect()
    }

    /// Slices in effect at `frame`, each with the key that applies there.
    pub fn slices_at(&self, frame: usize) -> Vec<FrameSlice<'_>> {
        self.chunks::<SliceChunk>()
            .filter_map(|slice| {
                slice.key_at(frame).map(|key| FrameSlice {
                    name: &slice.name,
                    key,
                })
            })
            .collect()
    }

    /// Pivot metadata with the default marker.
    pub fn metadata(&self, pivot: [f32; 2], pixels_per_unit: f32) -> Result<Vec<LayerMetadata>> {
        let params = MetadataParams {
            pivot,
            pixels_per_unit,
            ..MetadataParams::default()
        };
        extract_metadata(self, &params)
    }

    /// Every frame tiled left to right on one canvas.
    pub fn atlas(&self) -> Result<Canvas> {
        let (width, height) = self.size();
        tile_frames(&self.frame_images()?, width, height)
    }
}

/// Flatten every frame of `doc`, skipping layers that start with `marker`.
pub fn frame_images(doc: &Document, marker: &str) -> Result<Vec<Canvas>> {
    (0..doc.frame_count())
        .map(|index| render_frame(doc, index, marker))
        .collect()
}
