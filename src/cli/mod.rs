//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod info;
mod render;

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, merge_cli_overrides, AsepixConfig, CliOverrides, ConfigError};

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Check if a path has an Aseprite file extension (.ase or .aseprite).
pub fn is_aseprite_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ase") | Some("aseprite")
    )
}

/// Find all Aseprite files in a directory (recursively).
pub fn find_aseprite_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let dir_str = dir.display().to_string();

    for ext in ["ase", "aseprite"] {
        if let Ok(paths) = glob(&format!("{}/**/*.{}", dir_str, ext)) {
            files.extend(paths.filter_map(Result::ok));
        }
    }

    files.sort();
    files
}

/// Expand command-line inputs: directories are searched recursively, glob
/// patterns are expanded, and plain paths pass through unchanged.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(find_aseprite_files(input));
            continue;
        }
        let pattern = input.display().to_string();
        let is_pattern = pattern.contains(['*', '?', '[']);
        match glob(&pattern) {
            Ok(paths) if is_pattern => files.extend(paths.filter_map(Result::ok)),
            _ => files.push(input.clone()),
        }
    }
    files
}

/// Asepix - Decode Aseprite documents and flatten them to PNG
#[derive(Parser)]
#[command(name = "asepix")]
#[command(about = "Asepix - Decode Aseprite documents (.ase, .aseprite) and flatten them to PNG")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG applies otherwise
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to asepix.toml (default: searched upward from the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Flatten frames to PNG, one file per frame ({stem}_{frame}.png)
    Render {
        /// Input documents, directories or glob patterns
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory (default: next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-16)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: Option<u8>,

        /// Only render this frame
        #[arg(long)]
        frame: Option<usize>,
    },
    /// Write every visible layer cel as its own PNG ({stem}_{layer}_{frame}.png)
    Layers {
        /// Input document
        input: PathBuf,

        /// Output directory (default: next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale output by integer factor (1-16)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: Option<u8>,
    },
    /// Tile all frames into one atlas PNG with a JSON description
    Atlas {
        /// Input document
        input: PathBuf,

        /// Atlas PNG path (default: {stem}_atlas.png next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip the JSON sidecar
        #[arg(long)]
        no_json: bool,

        /// Scale output by integer factor (1-16)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: Option<u8>,
    },
    /// Show header, layers, tags, slices and frame durations
    Info {
        /// Input document
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract pivot metadata from marker layers as JSON
    Metadata {
        /// Input document
        input: PathBuf,

        /// Pivot as a fraction of the canvas, e.g. 0.5,0
        #[arg(long, value_name = "X,Y")]
        pivot: Option<String>,

        /// Pixels per world unit
        #[arg(long)]
        ppu: Option<f32>,

        /// Layer-name prefix marking metadata layers
        #[arg(long)]
        marker: Option<String>,
    },
    /// Write rim-light outlines of flattened frames
    Outline {
        /// Input document
        input: PathBuf,

        /// Output directory (default: next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only outline this frame
        #[arg(long)]
        frame: Option<usize>,

        /// Scale output by integer factor (1-16)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: Option<u8>,
    },
}

/// Parse a pivot argument of the form `x,y`.
pub(crate) fn parse_pivot(s: &str) -> Option<[f32; 2]> {
    let (x, y) = s.split_once(',')?;
    let x = x.trim().parse::<f32>().ok()?;
    let y = y.trim().parse::<f32>().ok()?;
    Some([x, y])
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load asepix.toml and apply command-line overrides.
fn load_settings(path: Option<&Path>, overrides: &CliOverrides) -> Result<AsepixConfig, ExitCode> {
    let mut config = match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Err(ExitCode::from(EXIT_ERROR));
        }
    };
    match merge_cli_overrides(&mut config, overrides) {
        Ok(()) => Ok(config),
        Err(e @ ConfigError::Validation(_)) => {
            eprintln!("Error: {}", e);
            Err(ExitCode::from(EXIT_INVALID_ARGS))
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Err(ExitCode::from(EXIT_ERROR))
        }
    }
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Render { files, output, scale, frame } => {
            let overrides = CliOverrides { out: output, scale, ..Default::default() };
            match load_settings(config_path, &overrides) {
                Ok(config) => render::run_render(&files, &config, frame),
                Err(code) => code,
            }
        }
        Commands::Layers { input, output, scale } => {
            let overrides = CliOverrides { out: output, scale, ..Default::default() };
            match load_settings(config_path, &overrides) {
                Ok(config) => render::run_layers(&input, &config),
                Err(code) => code,
            }
        }
        Commands::Atlas { input, output, no_json, scale } => {
            let overrides = CliOverrides { scale, no_json, ..Default::default() };
            match load_settings(config_path, &overrides) {
                Ok(config) => render::run_atlas(&input, output.as_deref(), &config),
                Err(code) => code,
            }
        }
        Commands::Info { input, json } => info::run_info(&input, json),
        Commands::Metadata { input, pivot, ppu, marker } => {
            let pivot = match pivot {
                Some(arg) => match parse_pivot(&arg) {
                    Some(p) => Some(p),
                    None => {
                        eprintln!("Error: Invalid pivot '{}'. Use X,Y (e.g. 0.5,0)", arg);
                        return ExitCode::from(EXIT_INVALID_ARGS);
                    }
                },
                None => None,
            };
            let overrides =
                CliOverrides { pivot, pixels_per_unit: ppu, marker, ..Default::default() };
            match load_settings(config_path, &overrides) {
                Ok(config) => info::run_metadata(&input, &config),
                Err(code) => code,
            }
        }
        Commands::Outline { input, output, frame, scale } => {
            let overrides = CliOverrides { out: output, scale, ..Default::default() };
            match load_settings(config_path, &overrides) {
                Ok(config) => render::run_outline(&input, &config, frame),
                Err(code) => code,
            }
        }
    }
}
