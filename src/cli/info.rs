//! Info and metadata command implementations

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::chunks::{FrameTag, LayerChunk, SliceChunk};
use crate::config::AsepixConfig;
use crate::document::Document;
use crate::extract::extract_metadata;
use crate::header::Header;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// One layer as listed by `info`
#[derive(Debug, Serialize)]
struct LayerInfo<'a> {
    index: usize,
    depth: usize,
    visible: bool,
    #[serde(flatten)]
    layer: &'a LayerChunk,
}

/// Everything `info --json` prints
#[derive(Debug, Serialize)]
struct DocumentInfo<'a> {
    header: &'a Header,
    frame_count: usize,
    durations: Vec<u16>,
    layers: Vec<LayerInfo<'a>>,
    tags: Vec<&'a FrameTag>,
    slices: Vec<&'a SliceChunk>,
}

fn describe(doc: &Document) -> DocumentInfo<'_> {
    let hierarchy = doc.hierarchy();
    let layers = hierarchy
        .layers()
        .iter()
        .enumerate()
        .map(|(index, &layer)| LayerInfo {
            index,
            depth: hierarchy.ancestors(index).count(),
            visible: hierarchy.is_visible(index),
            layer,
        })
        .collect();

    DocumentInfo {
        header: doc.header(),
        frame_count: doc.frame_count(),
        durations: doc.frames().iter().map(|f| f.duration).collect(),
        layers,
        tags: doc.animations(),
        slices: doc.slices(),
    }
}

fn print_text(info: &DocumentInfo<'_>) {
    let header = info.header;
    println!("Size:     {}x{}", header.width, header.height);
    println!("Depth:    {} bpp", header.color_depth.bits());
    println!("Frames:   {}", info.frame_count);

    if !info.durations.is_empty() {
        let durations: Vec<String> = info.durations.iter().map(|d| format!("{}ms", d)).collect();
        println!("Timing:   {}", durations.join(", "));
    }

    println!();
    println!("Layers ({}):", info.layers.len());
    for entry in &info.layers {
        let layer = entry.layer;
        let hidden = if entry.visible { "" } else { " (hidden)" };
        println!(
            "  {:>3}  {}{} [{:?}, {}, opacity {}]{}",
            entry.index,
            "  ".repeat(entry.depth),
            layer.name,
            layer.layer_type,
            layer.blend_mode.name(),
            layer.opacity,
            hidden
        );
    }

    if !info.tags.is_empty() {
        println!();
        println!("Tags ({}):", info.tags.len());
        for tag in &info.tags {
            println!("  {} {}..={} {:?}", tag.name, tag.from, tag.to, tag.direction);
        }
    }

    if !info.slices.is_empty() {
        println!();
        println!("Slices ({}):", info.slices.len());
        for slice in &info.slices {
            println!("  {} ({} key(s))", slice.name, slice.keys.len());
        }
    }
}

/// Execute the info command
pub fn run_info(input: &Path, json: bool) -> ExitCode {
    let doc = match Document::open(input) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let info = describe(&doc);
    if json {
        match serde_json::to_string_pretty(&info) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        print_text(&info);
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the metadata command
pub fn run_metadata(input: &Path, config: &AsepixConfig) -> ExitCode {
    let doc = match Document::open(input) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let metadata = match extract_metadata(&doc, &config.metadata.params()) {
        Ok(metadata) => metadata,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match serde_json::to_string_pretty(&metadata) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
