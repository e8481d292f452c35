//! Integration tests for md3-export
//!
//! Tests the full pipeline: write OBJ keyframes -> build MD3 -> inspect output

use nether_md3::{MD3_MAX_TAGS, Md3Model, Tag, parse_md3};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const FRAME_0: &str = "\
o Crate
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
usemtl wood
f 1/1 2/2 3/3 4/4
usemtl metal
f 1/1 2/2 5/3
";

const FRAME_1: &str = "\
o Crate
v 0 0 0.5
v 1 0 0.5
v 1 1 0.5
v 0 1 0.5
v 0 0 1.5
";

fn md3_export(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_md3-export"))
        .args(args)
        .output()
        .expect("Failed to run md3-export")
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn read(path: &Path) -> Md3Model {
    let data = std::fs::read(path).expect("Failed to read MD3 file");
    parse_md3(&data).expect("Failed to parse MD3 file")
}

/// Test OBJ keyframes -> MD3
#[test]
fn test_obj_keyframes_to_md3() {
    let dir = tempdir().expect("Failed to create temp dir");
    let frame0 = dir.path().join("crate_0.obj");
    let frame1 = dir.path().join("crate_1.obj");
    let output = dir.path().join("crate.md3");
    std::fs::write(&frame0, FRAME_0).unwrap();
    std::fs::write(&frame1, FRAME_1).unwrap();

    let result = md3_export(&[
        "obj",
        path_str(&frame0),
        path_str(&frame1),
        "-o",
        path_str(&output),
        "--texture",
        "wood=textures/wood.tga",
    ]);
    assert!(result.status.success(), "obj command failed: {:?}", result);

    let model = read(&output);
    assert_eq!(model.name, "Crate.md3");
    assert_eq!(model.num_frames(), 2);
    assert_eq!(model.frames[1].name, "crate_1");
    assert_eq!(model.num_surfaces(), 2);

    let wood = model.surface("wood").expect("wood surface");
    assert_eq!(wood.num_verts(), 4);
    assert_eq!(wood.num_triangles(), 2);
    assert_eq!(wood.num_frames(), 2);
    assert_eq!(wood.shaders[0].name, "wood.tga");

    let metal = model.surface("metal").expect("metal surface");
    assert_eq!(metal.num_verts(), 3);
    assert!(metal.shaders.is_empty());

    let data = std::fs::read(&output).unwrap();
    assert_eq!(model.offsets().eof as usize, data.len());
}

/// Test MD3 -> OBJ export of a later frame
#[test]
fn test_export_obj_frame() {
    let dir = tempdir().expect("Failed to create temp dir");
    let frame0 = dir.path().join("crate_0.obj");
    let frame1 = dir.path().join("crate_1.obj");
    let md3 = dir.path().join("crate.md3");
    let obj = dir.path().join("out.obj");
    std::fs::write(&frame0, FRAME_0).unwrap();
    std::fs::write(&frame1, FRAME_1).unwrap();

    let result = md3_export(&[
        "obj",
        path_str(&frame0),
        path_str(&frame1),
        "-o",
        path_str(&md3),
    ]);
    assert!(result.status.success(), "obj command failed: {:?}", result);

    let result = md3_export(&[
        "export-obj",
        path_str(&md3),
        "-o",
        path_str(&obj),
        "--frame",
        "1",
    ]);
    assert!(result.status.success(), "export-obj failed: {:?}", result);

    let text = std::fs::read_to_string(&obj).unwrap();
    let mesh = md3_export::parse_obj(text.as_bytes()).unwrap();
    // wood (4 verts) then metal (3 verts), each surface keeps its own copy
    assert_eq!(mesh.positions.len(), 7);
    assert_eq!(mesh.triangles.len(), 3);
    assert!(mesh.positions.iter().all(|p| p.z >= 0.5));
    assert_eq!(mesh.materials, vec!["wood".to_string(), "metal".to_string()]);

    let result = md3_export(&["export-obj", path_str(&md3), "--frame", "5"]);
    assert!(!result.status.success());
}

/// Test manifest builds
#[test]
fn test_build_manifest() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::create_dir(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/crate_0.obj"), FRAME_0).unwrap();
    std::fs::write(dir.path().join("src/crate_1.obj"), FRAME_1).unwrap();
    let manifest = dir.path().join("md3.toml");
    std::fs::write(
        &manifest,
        r#"
output_dir = "build"

[[models]]
name = "crate"
frames = ["src/crate_0.obj", "src/crate_1.obj"]

[models.textures]
metal = "textures/metal.tga"

[[models]]
name = "crate_still"
frames = ["src/crate_0.obj"]
"#,
    )
    .unwrap();

    let result = md3_export(&["build", path_str(&manifest)]);
    assert!(result.status.success(), "build failed: {:?}", result);

    let animated = read(&dir.path().join("build/crate.md3"));
    assert_eq!(animated.name, "crate.md3");
    assert_eq!(animated.num_frames(), 2);
    assert_eq!(
        animated.surface("metal").unwrap().shaders[0].name,
        "metal.tga"
    );

    let still = read(&dir.path().join("build/crate_still.md3"));
    assert_eq!(still.num_frames(), 1);
}

/// Test rewrite and the strict count policy
#[test]
fn test_rewrite_and_strict() {
    let dir = tempdir().expect("Failed to create temp dir");
    let frame0 = dir.path().join("crate.obj");
    let built = dir.path().join("crate.md3");
    let tagged = dir.path().join("tagged.md3");
    let rewritten = dir.path().join("rewritten.md3");
    std::fs::write(&frame0, FRAME_0).unwrap();

    let result = md3_export(&["obj", path_str(&frame0)]);
    assert!(result.status.success(), "obj command failed: {:?}", result);
    assert!(built.exists(), "default output should sit next to the OBJ");

    // Too many tags for the format
    let mut model = read(&built);
    model.tags = (0..MD3_MAX_TAGS + 2)
        .map(|i| Tag {
            name: format!("tag_{i}"),
            ..Default::default()
        })
        .collect();
    std::fs::write(&tagged, model.to_bytes().unwrap()).unwrap();

    let result = md3_export(&["--strict", "info", path_str(&tagged)]);
    assert!(!result.status.success(), "strict read should reject tag count");

    let result = md3_export(&["rewrite", path_str(&tagged), "-o", path_str(&rewritten)]);
    assert!(result.status.success(), "rewrite failed: {:?}", result);
    assert_eq!(read(&rewritten).num_tags(), MD3_MAX_TAGS);
}

/// Test JSON dump to stdout
#[test]
fn test_dump_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let frame0 = dir.path().join("crate.obj");
    std::fs::write(&frame0, FRAME_0).unwrap();
    let md3 = dir.path().join("crate.md3");

    let result = md3_export(&["obj", path_str(&frame0), "-n", "box"]);
    assert!(result.status.success(), "obj command failed: {:?}", result);

    let result = md3_export(&["dump", path_str(&md3)]);
    assert!(result.status.success(), "dump failed: {:?}", result);
    let value: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(value["name"], "box.md3");
    assert_eq!(value["surfaces"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_bad_texture_argument() {
    let dir = tempdir().expect("Failed to create temp dir");
    let frame0 = dir.path().join("crate.obj");
    std::fs::write(&frame0, FRAME_0).unwrap();

    let result = md3_export(&["obj", path_str(&frame0), "--texture", "wood"]);
    assert!(!result.status.success());
}
