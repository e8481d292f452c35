//! md3.toml manifest parsing and batch builds

use anyhow::{Context, Result};
use hashbrown::HashMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::convert;

/// md3.toml manifest structure
#[derive(Debug, Deserialize)]
pub struct Md3Manifest {
    /// Where built models go, relative to the manifest
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// One model to build
#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    /// Output file stem; also the model name
    pub name: String,
    /// OBJ keyframes, in frame order
    pub frames: Vec<PathBuf>,
    /// Material name -> texture path
    #[serde(default)]
    pub textures: HashMap<String, String>,
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<Md3Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    parse_manifest(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Parse manifest text
pub fn parse_manifest(content: &str) -> Result<Md3Manifest> {
    Ok(toml::from_str(content)?)
}

/// Build every model in the manifest
///
/// Frame paths and the output directory are resolved against `base_dir`
/// (the manifest's directory). `output_override` replaces the manifest's
/// output directory. Returns the written files.
pub fn build_all(
    manifest: &Md3Manifest,
    base_dir: &Path,
    output_override: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => base_dir.join(&manifest.output_dir),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    let mut written = Vec::with_capacity(manifest.models.len());
    for entry in &manifest.models {
        let frames: Vec<PathBuf> = entry.frames.iter().map(|f| base_dir.join(f)).collect();
        let output = output_dir.join(format!("{}.md3", entry.name));

        tracing::info!("Building {} ({} frames)", entry.name, frames.len());
        convert::obj_to_md3(&frames, &output, Some(&entry.name), &entry.textures)
            .with_context(|| format!("Failed to build model '{}'", entry.name))?;
        written.push(output);
    }

    Ok(written)
}
