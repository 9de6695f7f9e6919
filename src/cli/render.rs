//! Render, layers, atlas and outline command implementations

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::canvas::{Canvas, PixelBuffer};
use crate::composition::render_frame;
use crate::config::AsepixConfig;
use crate::document::Document;
use crate::error::AseError;
use crate::extract::{atlas_metadata, frame_images, rim_light, tile_frames};
use crate::output::{generate_output_path, save_canvas, OutputError};

use super::{expand_inputs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Failure of one input file
#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error(transparent)]
    Document(#[from] AseError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

fn open(input: &Path) -> Result<Document, ExitCode> {
    Document::open(input).map_err(|e| {
        eprintln!("Error: Cannot read '{}': {}", input.display(), e);
        match e {
            AseError::Io(_) => ExitCode::from(EXIT_INVALID_ARGS),
            _ => ExitCode::from(EXIT_ERROR),
        }
    })
}

fn write_all(input: &Path, canvases: &[Canvas], config: &AsepixConfig) -> Result<usize, OutputError> {
    let dir = config.output.dir.as_deref();
    for canvas in canvases {
        let path = generate_output_path(input, canvas.name(), dir);
        save_canvas(canvas, &path, config.output.scale)?;
    }
    Ok(canvases.len())
}

/// Flatten the requested frames of one document.
fn render_file(input: &Path, config: &AsepixConfig, frame: Option<usize>) -> Result<usize, CommandError> {
    let doc = Document::open(input)?;
    let marker = &config.metadata.marker;
    let canvases = match frame {
        Some(index) => vec![render_frame(&doc, index, marker)?],
        None => frame_images(&doc, marker)?,
    };
    Ok(write_all(input, &canvases, config)?)
}

/// Execute the render command. Files are processed in parallel; a failure
/// on one file does not stop the others. A `--frame` past the end of any
/// document is reported as invalid arguments.
pub fn run_render(inputs: &[PathBuf], config: &AsepixConfig, frame: Option<usize>) -> ExitCode {
    let files = expand_inputs(inputs);
    if files.is_empty() {
        eprintln!("Error: No input files matched");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let results: Vec<(&PathBuf, Result<usize, CommandError>)> = files
        .par_iter()
        .map(|input| (input, render_file(input, config, frame)))
        .collect();

    let mut failed = 0;
    let mut bad_frame = false;
    for (input, result) in results {
        match result {
            Ok(count) => tracing::info!("{}: rendered {} frame(s)", input.display(), count),
            Err(e) => {
                eprintln!("Error: {}: {}", input.display(), e);
                bad_frame |= matches!(e, CommandError::Document(AseError::FrameOutOfRange { .. }));
                failed += 1;
            }
        }
    }

    if bad_frame {
        ExitCode::from(EXIT_INVALID_ARGS)
    } else if failed == 0 {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// Execute the layers command
pub fn run_layers(input: &Path, config: &AsepixConfig) -> ExitCode {
    let doc = match open(input) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let canvases = match doc.layer_images() {
        Ok(canvases) => canvases,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match write_all(input, &canvases, config) {
        Ok(count) => {
            tracing::info!("{}: wrote {} layer image(s)", input.display(), count);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn write_atlas(doc: &Document, png: &Path, config: &AsepixConfig) -> Result<(), CommandError> {
    let (width, height) = doc.size();
    let frames = frame_images(doc, &config.metadata.marker)?;
    let atlas = tile_frames(&frames, width, height)?;
    save_canvas(&atlas, png, config.output.scale)?;

    if config.atlas.json {
        let image_name = png
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let meta = atlas_metadata(doc, &image_name)?;
        let json = serde_json::to_string_pretty(&meta).map_err(OutputError::from)?;
        let json_path = png.with_extension("json");
        std::fs::write(&json_path, json).map_err(OutputError::from)?;
        tracing::info!("wrote {}", json_path.display());
    }
    Ok(())
}

/// Execute the atlas command
pub fn run_atlas(input: &Path, output: Option<&Path>, config: &AsepixConfig) -> ExitCode {
    let doc = match open(input) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let png = match output {
        Some(path) => path.to_path_buf(),
        None => generate_output_path(input, "atlas", config.output.dir.as_deref()),
    };

    match write_atlas(&doc, &png, config) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the outline command
pub fn run_outline(input: &Path, config: &AsepixConfig, frame: Option<usize>) -> ExitCode {
    let doc = match open(input) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let marker = &config.metadata.marker;
    let frames = match frame {
        Some(index) => render_frame(&doc, index, marker).map(|f| vec![f]),
        None => frame_images(&doc, marker),
    };
    let outlines: Vec<Canvas> = match frames {
        Ok(frames) => frames.iter().map(rim_light).collect(),
        Err(e @ AseError::FrameOutOfRange { .. }) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match write_all(input, &outlines, config) {
        Ok(_) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
