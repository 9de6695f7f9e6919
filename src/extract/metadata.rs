//! Pivot/anchor metadata from marker layers
//!
//! A layer named `<marker>transform("<arg>")` marks a point of interest,
//! e.g. where a hand holds an item. For each frame the centroid of the
//! layer's opaque pixels is converted into world units relative to the
//! sprite pivot.

use regex::Regex;
use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::chunks::{CelChunk, DEFAULT_METADATA_MARKER};
use crate::document::Document;
use crate::error::{AseError, Result};

/// Pixels at or below this alpha do not count towards the centroid.
const ALPHA_THRESHOLD: f32 = 0.1;

/// Conversion parameters for metadata extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataParams {
    pub marker: String,
    /// Pivot as a fraction of the canvas size, `(0, 0)` = bottom-left
    pub pivot: [f32; 2],
    pub pixels_per_unit: f32,
}

impl Default for MetadataParams {
    fn default() -> Self {
        Self {
            marker: DEFAULT_METADATA_MARKER.to_string(),
            pivot: [0.5, 0.0],
            pixels_per_unit: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataKind {
    Transform,
}

/// Metadata carried by one marker layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerMetadata {
    pub kind: MetadataKind,
    pub layer: usize,
    pub layer_name: String,
    pub args: Vec<String>,
    /// World position per frame; frames with no qualifying pixel are absent
    pub transforms: BTreeMap<usize, (f32, f32)>,
}

fn transform_pattern(marker: &str) -> Result<Regex> {
    let pattern = format!(r#"{}transform\("(.*)"\)"#, regex::escape(marker));
    Regex::new(&pattern).map_err(|_| AseError::UnsupportedMetadataLayerName(marker.to_string()))
}

/// Parse a marker layer name into its metadata shell.
pub fn parse_layer_name(name: &str, layer: usize, marker: &str) -> Result<LayerMetadata> {
    let captures = transform_pattern(marker)?
        .captures(name)
        .ok_or_else(|| AseError::UnsupportedMetadataLayerName(name.to_string()))?;
    Ok(LayerMetadata {
        kind: MetadataKind::Transform,
        layer,
        layer_name: name.to_string(),
        args: vec![captures[1].to_string()],
        transforms: BTreeMap::new(),
    })
}

/// Mean canvas position (bottom-origin) of the cel's pixels with alpha
/// above the threshold. Pixels outside the canvas count too; samples a
/// short cel never stored do not.
fn centroid(doc: &Document, frame: usize, cel: &CelChunk) -> Result<Option<(f32, f32)>> {
    let image = doc.cel_image(frame, cel)?;
    let palette = doc.palette();
    let height = doc.size().1 as f32;
    let width = image.width.max(1) as usize;

    let (mut sum_x, mut sum_y, mut count) = (0.0f32, 0.0f32, 0usize);
    for (i, pixel) in image.pixels.iter().enumerate() {
        if pixel.color(palette).a <= ALPHA_THRESHOLD {
            continue;
        }
        let x = cel.x as f32 + (i % width) as f32;
        let y = cel.y as f32 + (i / width) as f32;
        sum_x += x;
        sum_y += height - 1.0 - y;
        count += 1;
    }

    Ok((count > 0).then(|| (sum_x / count as f32, sum_y / count as f32)))
}

/// Collect metadata from every marker layer of `doc`, keyed by layer index.
pub fn extract_metadata(doc: &Document, params: &MetadataParams) -> Result<Vec<LayerMetadata>> {
    let (width, height) = doc.size();
    let pivot_x = params.pivot[0] * width as f32;
    let pivot_y = params.pivot[1] * height as f32;
    let ppu = params.pixels_per_unit;

    let mut found: BTreeMap<usize, LayerMetadata> = BTreeMap::new();
    for (index, frame) in doc.frames().iter().enumerate() {
        let mut cels: Vec<&CelChunk> = frame.chunks::<CelChunk>().collect();
        cels.sort_by_key(|cel| cel.layer_index);

        for cel in cels {
            let layer = doc.cel_layer(index, cel)?;
            if !layer.is_metadata(&params.marker) {
                continue;
            }
            let entry = match found.entry(cel.layer()) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => {
                    e.insert(parse_layer_name(&layer.name, cel.layer(), &params.marker)?)
                }
            };

            if let Some((cx, cy)) = centroid(doc, index, cel)? {
                let world_x = (cx - pivot_x) / ppu + 0.5 / ppu;
                let world_y = (cy - pivot_y) / ppu + 0.5 / ppu;
                entry.transforms.insert(index, (world_x, world_y));
            }
        }
    }

    Ok(found.into_values().collect())
}
