//! Frame flattening

use crate::canvas::Canvas;
use crate::chunks::CelChunk;
use crate::document::Document;
use crate::error::Result;
use crate::raster::rasterize;

use super::blend::blend_buffers;

/// Flatten frame `index` of `doc` into one canvas named after the index.
///
/// Cels are drawn in ascending layer order, each on top of the running
/// result with its layer's blend mode. Layers whose name starts with
/// `marker` carry metadata and are skipped, as are groups, tilemaps and
/// layers hidden directly or through an ancestor. Layer and cel opacity
/// only apply to Multiply layers.
pub fn render_frame(doc: &Document, index: usize, marker: &str) -> Result<Canvas> {
    let frame = doc.frame(index)?;
    let (width, height) = doc.size();
    let hierarchy = doc.hierarchy();
    let palette = doc.palette();

    let mut cels: Vec<&CelChunk> = frame.chunks::<CelChunk>().collect();
    cels.sort_by_key(|cel| cel.layer_index);

    let mut canvas = Canvas::new(width, height).with_name(index.to_string());
    for cel in cels {
        let layer = doc.cel_layer(index, cel)?;
        if layer.is_metadata(marker) || !hierarchy.is_renderable(cel.layer()) {
            continue;
        }

        let image = doc.cel_image(index, cel)?;
        let layer_canvas = rasterize(width, height, cel.x as i32, cel.y as i32, image, palette);
        let opacity = if layer.blend_mode.takes_opacity() {
            doc.effective_opacity(layer, cel)
        } else {
            1.0
        };
        tracing::trace!(
            "frame {}: layer '{}' ({}) at {:.3}",
            index,
            layer.name,
            layer.blend_mode.name(),
            opacity
        );
        blend_buffers(&mut canvas, &layer_canvas, layer.blend_mode, opacity);
    }

    Ok(canvas)
}
