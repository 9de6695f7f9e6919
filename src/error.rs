//! Crate-wide error type

use thiserror::Error;

use crate::reader::ReadError;

/// Errors surfaced while decoding or flattening a document.
///
/// Palette misses and short pixel samples are not errors: they decode to
/// [`crate::color::MAGENTA`] so rendering stays best-effort.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AseError {
    /// The header was not exactly 128 bytes
    #[error("malformed header: expected 128 bytes, got {len}")]
    MalformedHeader { len: usize },

    /// A structural field ran past the end of the stream
    #[error(transparent)]
    UnexpectedEof(#[from] ReadError),

    /// A linked cel points at a frame with no cel for its layer
    #[error(
        "linked cel on layer {layer} in frame {frame} points at frame {target_frame}, which has no cel for that layer"
    )]
    UnresolvedLinkedCel {
        frame: usize,
        layer: usize,
        target_frame: usize,
    },

    /// A cel references a layer that does not exist
    #[error("cel in frame {frame} references layer {layer}, but the document has {layer_count} layers")]
    InvalidLayerIndex {
        frame: usize,
        layer: usize,
        layer_count: usize,
    },

    /// A frame index past the end of the document
    #[error("frame {index} out of range ({frame_count} frames)")]
    FrameOutOfRange { index: usize, frame_count: usize },

    /// Tiling every frame on one row would not fit a `u32` width
    #[error("atlas of {frames} frames at {width}px each is too wide")]
    AtlasTooLarge { width: u32, frames: usize },

    /// A metadata layer whose name is not `@transform("...")`
    #[error("unsupported metadata layer '{0}'")]
    UnsupportedMetadataLayerName(String),

    /// Reading the document from disk or a stream failed
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// Inflating a compressed cel failed
    #[error("failed to decompress cel data: {0}")]
    Decompress(#[source] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AseError>;
