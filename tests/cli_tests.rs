//! Integration tests for the asepix CLI
//!
//! These tests run the built binary against synthetic documents in
//! temporary directories and check exit codes and written files.

mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use common::{AseWriter, Layer, BLUE, RED};

fn asepix() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_asepix"));
    // keep the user's config and log settings out of the run
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run(cmd: &mut Command, cwd: &Path) -> Output {
    cmd.current_dir(cwd).output().expect("Failed to execute asepix")
}

fn write_doc(dir: &Path, name: &str) -> PathBuf {
    let bytes = AseWriter::new(4, 4)
        .layer(Layer::normal("body"))
        .layer(Layer::normal("@transform(\"hand\")"))
        .solid_cel(0, 4, 4, RED)
        .raw_cel(1, 1, 1, 1, 1, &[255, 255, 255, 255])
        .tags(&[("idle", 0, 1, 0)])
        .frame()
        .solid_cel(0, 4, 4, BLUE)
        .build();
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_render_writes_one_png_per_frame() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.aseprite");

    let out = run(asepix().args(["render", "hero.aseprite", "-o", "out"]), temp.path());
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let frame0 = image::open(temp.path().join("out/hero_0.png")).unwrap().to_rgba8();
    let frame1 = image::open(temp.path().join("out/hero_1.png")).unwrap().to_rgba8();
    assert_eq!(frame0.dimensions(), (4, 4));
    // metadata layer is not drawn
    assert_eq!(frame0.get_pixel(1, 1).0, RED);
    assert_eq!(frame1.get_pixel(0, 0).0, BLUE);
}

#[test]
fn test_render_scale_and_single_frame() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.ase");

    let out = run(
        asepix().args(["render", "hero.ase", "--scale", "3", "--frame", "1"]),
        temp.path(),
    );
    assert!(out.status.success());
    assert!(!temp.path().join("hero_0.png").exists());
    let frame1 = image::open(temp.path().join("hero_1.png")).unwrap().to_rgba8();
    assert_eq!(frame1.dimensions(), (12, 12));
}

#[test]
fn test_render_frame_out_of_range_is_usage_error() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.ase");
    let out = run(asepix().args(["render", "hero.ase", "--frame", "9"]), temp.path());
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("out of range"));
}

#[test]
fn test_render_many_files_in_parallel() {
    let temp = TempDir::new().unwrap();
    for name in ["a.ase", "b.ase", "c.aseprite"] {
        write_doc(temp.path(), name);
    }

    let out = run(asepix().args(["render", ".", "-o", "out"]), temp.path());
    assert!(out.status.success());
    for stem in ["a", "b", "c"] {
        assert!(temp.path().join(format!("out/{}_1.png", stem)).exists());
    }
}

#[test]
fn test_render_reports_bad_files_but_finishes_others() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "good.ase");
    fs::write(temp.path().join("bad.ase"), b"too short").unwrap();

    let out = run(asepix().args(["render", "good.ase", "bad.ase"]), temp.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("malformed header"));
    assert!(temp.path().join("good_0.png").exists());
}

#[test]
fn test_invalid_scale_is_usage_error() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.ase");
    let out = run(asepix().args(["render", "hero.ase", "--scale", "0"]), temp.path());
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_missing_input_exit_codes() {
    let temp = TempDir::new().unwrap();
    let out = run(asepix().args(["info", "nope.ase"]), temp.path());
    assert_eq!(out.status.code(), Some(1));
    let out = run(asepix().args(["layers", "nope.ase"]), temp.path());
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_layers_command() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.ase");

    let out = run(asepix().args(["layers", "hero.ase", "-o", "layers"]), temp.path());
    assert!(out.status.success());
    for name in ["hero_body_0.png", "hero_body_1.png", "hero_@transform(_hand_)_0.png"] {
        assert!(temp.path().join("layers").join(name).exists(), "missing {}", name);
    }
}

#[test]
fn test_atlas_command_writes_json_sidecar() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.ase");

    let out = run(asepix().args(["atlas", "hero.ase"]), temp.path());
    assert!(out.status.success());

    let atlas = image::open(temp.path().join("hero_atlas.png")).unwrap().to_rgba8();
    assert_eq!(atlas.dimensions(), (8, 4));

    let json = fs::read_to_string(temp.path().join("hero_atlas.json")).unwrap();
    let meta: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(meta["image"], "hero_atlas.png");
    assert_eq!(meta["frames"]["1"]["x"], 4);
    assert_eq!(meta["animations"]["idle"]["to"], 1);

    let out = run(
        asepix().args(["atlas", "hero.ase", "-o", "sheet.png", "--no-json"]),
        temp.path(),
    );
    assert!(out.status.success());
    assert!(temp.path().join("sheet.png").exists());
    assert!(!temp.path().join("sheet.json").exists());
}

#[test]
fn test_info_json() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.ase");

    let out = run(asepix().args(["info", "hero.ase", "--json"]), temp.path());
    assert!(out.status.success());
    let info: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(info["header"]["width"], 4);
    assert_eq!(info["frame_count"], 2);
    assert_eq!(info["layers"][0]["name"], "body");
    assert_eq!(info["layers"][0]["blend_mode"], "normal");
    assert_eq!(info["tags"][0]["name"], "idle");
    assert_eq!(info["durations"], serde_json::json!([100, 100]));
}

#[test]
fn test_info_text() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.ase");

    let out = run(asepix().args(["info", "hero.ase"]), temp.path());
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("Size:     4x4"));
    assert!(text.contains("body"));
    assert!(text.contains("idle"));
}

#[test]
fn test_metadata_command() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.ase");

    let out = run(
        asepix().args(["metadata", "hero.ase", "--pivot", "0,0", "--ppu", "1"]),
        temp.path(),
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let meta: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(meta[0]["args"][0], "hand");
    // editor (1, 1) on a 4-high canvas is canvas (1, 2), plus half a pixel
    assert_eq!(meta[0]["transforms"]["0"], serde_json::json!([1.5, 2.5]));

    let out = run(asepix().args(["metadata", "hero.ase", "--pivot", "zero"]), temp.path());
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_outline_command() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.ase");

    let out = run(asepix().args(["outline", "hero.ase", "--frame", "0"]), temp.path());
    assert!(out.status.success());
    assert!(temp.path().join("hero_0_rim.png").exists());
    assert!(!temp.path().join("hero_1_rim.png").exists());

    let out = run(asepix().args(["outline", "hero.ase", "--frame", "9"]), temp.path());
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_config_file_sets_defaults() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.ase");
    fs::write(
        temp.path().join("asepix.toml"),
        "[output]\ndir = \"build\"\nscale = 2\n",
    )
    .unwrap();

    let out = run(asepix().args(["render", "hero.ase"]), temp.path());
    assert!(out.status.success());
    let frame = image::open(temp.path().join("build/hero_0.png")).unwrap().to_rgba8();
    assert_eq!(frame.dimensions(), (8, 8));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    write_doc(temp.path(), "hero.ase");
    let config = temp.path().join("custom.toml");
    fs::write(&config, "[metadata]\nmarker = \"\"\n").unwrap();

    let out = run(
        asepix().args(["--config", "custom.toml", "metadata", "hero.ase"]),
        temp.path(),
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("metadata.marker"));
}
