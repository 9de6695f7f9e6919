//! Configuration loading and discovery for `asepix.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::AsepixConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "asepix.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse asepix.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override scale factor
    pub scale: Option<u8>,
    /// Override metadata marker
    pub marker: Option<String>,
    /// Override pivot fraction
    pub pivot: Option<[f32; 2]>,
    /// Override pixels per unit
    pub pixels_per_unit: Option<f32>,
    /// Disable the atlas JSON sidecar
    pub no_json: bool,
}

/// Find asepix.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find asepix.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from an asepix.toml file.
///
/// If a path is provided, loads from that file (a missing file is an error).
/// Otherwise uses [`find_config`]; when nothing is found the defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<AsepixConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            tracing::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(AsepixConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<AsepixConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: AsepixConfig = toml::from_str(&contents)?;
    check(&config)?;
    Ok(config)
}

fn check(config: &AsepixConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()))
    }
}

/// Merge CLI overrides into a configuration and re-validate it.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(
    config: &mut AsepixConfig,
    overrides: &CliOverrides,
) -> Result<(), ConfigError> {
    if let Some(ref out) = overrides.out {
        config.output.dir = Some(out.clone());
    }
    if let Some(scale) = overrides.scale {
        config.output.scale = scale;
    }
    if let Some(ref marker) = overrides.marker {
        config.metadata.marker = marker.clone();
    }
    if let Some(pivot) = overrides.pivot {
        config.metadata.pivot = pivot;
    }
    if let Some(ppu) = overrides.pixels_per_unit {
        config.metadata.pixels_per_unit = ppu;
    }
    if overrides.no_json {
        config.atlas.json = false;
    }
    check(config)
}
