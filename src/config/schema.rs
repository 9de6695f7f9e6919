//! Configuration schema types for `asepix.toml`
//!
//! Every section and field is optional; a missing file and an empty file
//! produce the same defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::chunks::DEFAULT_METADATA_MARKER;
use crate::extract::MetadataParams;

/// Largest accepted output scale factor
pub const MAX_SCALE: u8 = 16;

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output directory; next to the input file when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Nearest-neighbour upscale factor
    #[serde(default = "default_scale")]
    pub scale: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            scale: default_scale(),
        }
    }
}

fn default_scale() -> u8 {
    1
}

/// Metadata-layer extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Layer-name prefix that marks a metadata layer
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Pivot as a fraction of the canvas size
    #[serde(default = "default_pivot")]
    pub pivot: [f32; 2],
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f32,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            pivot: default_pivot(),
            pixels_per_unit: default_pixels_per_unit(),
        }
    }
}

impl MetadataConfig {
    pub fn params(&self) -> MetadataParams {
        MetadataParams {
            marker: self.marker.clone(),
            pivot: self.pivot,
            pixels_per_unit: self.pixels_per_unit,
        }
    }
}

fn default_marker() -> String {
    DEFAULT_METADATA_MARKER.to_string()
}

fn default_pivot() -> [f32; 2] {
    [0.5, 0.0]
}

fn default_pixels_per_unit() -> f32 {
    16.0
}

/// Atlas output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Write a JSON sidecar next to the atlas PNG
    #[serde(default = "default_true")]
    pub json: bool,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self { json: true }
    }
}

fn default_true() -> bool {
    true
}

/// Complete asepix.toml configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AsepixConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub atlas: AtlasConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "output.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "asepix.toml: '{}' {}", self.field, self.message)
    }
}

impl AsepixConfig {
    /// Validate the configuration and return every problem found
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.output.scale == 0 || self.output.scale > MAX_SCALE {
            errors.push(ConfigValidationError {
                field: "output.scale".to_string(),
                message: format!("must be between 1 and {}", MAX_SCALE),
            });
        }

        if self.metadata.marker.is_empty() {
            errors.push(ConfigValidationError {
                field: "metadata.marker".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let ppu = self.metadata.pixels_per_unit;
        if ppu.is_nan() || ppu <= 0.0 {
            errors.push(ConfigValidationError {
                field: "metadata.pixels_per_unit".to_string(),
                message: "must be positive".to_string(),
            });
        }

        if self.metadata.pivot.iter().any(|v| !v.is_finite()) {
            errors.push(ConfigValidationError {
                field: "metadata.pivot".to_string(),
                message: "must be finite".to_string(),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
