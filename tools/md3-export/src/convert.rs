//! File-level conversions between MD3, OBJ and the model tree

use anyhow::{Context, Result};
use hashbrown::HashMap;
use nether_md3::{Md3Model, ReadOptions, build_model, extract_mesh, read_md3_with, write_md3};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::obj;

/// Read and decode an MD3 file
pub fn read_model(path: &Path, options: &ReadOptions) -> Result<Md3Model> {
    let file = File::open(path).with_context(|| format!("Failed to open MD3: {:?}", path))?;
    let mut reader = BufReader::new(file);
    read_md3_with(&mut reader, options).with_context(|| format!("Failed to read MD3: {:?}", path))
}

/// Encode a model to a file, computing every offset
pub fn write_model(path: &Path, model: &Md3Model) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    let offsets = write_md3(model, &mut writer)
        .with_context(|| format!("Failed to write MD3: {:?}", path))?;
    writer.flush()?;

    tracing::info!(
        "Wrote {:?}: {} frames, {} surfaces, {} bytes",
        path,
        model.num_frames(),
        model.num_surfaces(),
        offsets.eof
    );
    Ok(())
}

/// Decode a model and encode it again with fresh offsets
pub fn rewrite(input: &Path, output: &Path, options: &ReadOptions) -> Result<()> {
    let model = read_model(input, options)?;
    write_model(output, &model)
}

/// Build an MD3 file from OBJ keyframes
pub fn obj_to_md3(
    frames: &[PathBuf],
    output: &Path,
    name: Option<&str>,
    textures: &HashMap<String, String>,
) -> Result<Md3Model> {
    let source = obj::load_keyframes(frames, name, textures)?;
    let model = build_model(&source).context("Failed to build model from OBJ keyframes")?;
    write_model(output, &model)?;
    Ok(model)
}

/// Export one frame of an MD3 file as OBJ
pub fn md3_to_obj(input: &Path, output: &Path, frame: usize, options: &ReadOptions) -> Result<()> {
    let model = read_model(input, options)?;
    let mesh = extract_mesh(&model);
    obj::export_obj(&mesh, frame, output)
}
