//! Human- and machine-readable model summaries

use anyhow::Result;
use nether_md3::{MD3_IDENT, Md3Model};

/// Log the header, frames, tags and per-surface layout
pub fn log_model_info(model: &Md3Model) {
    if model.ident != MD3_IDENT {
        tracing::warn!("Unexpected ident {:#010x}", model.ident);
    }
    tracing::info!("Model: {} (version {})", model.name, model.version);
    tracing::info!(
        "  {} frames, {} tags, {} surfaces, flags={}",
        model.num_frames(),
        model.num_tags(),
        model.num_surfaces(),
        model.flags
    );
    let offsets = model.offsets();
    tracing::info!(
        "  offsets: frames={} tags={} surfaces={} eof={}",
        offsets.frames,
        offsets.tags,
        offsets.surfaces,
        offsets.eof
    );

    for (i, frame) in model.frames.iter().enumerate() {
        tracing::info!(
            "  frame {}: {:?} min={} max={} radius={}",
            i,
            frame.name,
            frame.min_bounds,
            frame.max_bounds,
            frame.radius
        );
    }

    for tag in &model.tags {
        tracing::info!("  tag {:?}: origin={}", tag.name, tag.origin);
    }

    for surface in &model.surfaces {
        tracing::info!(
            "  surface {:?}: {} frames, {} verts, {} triangles, {} shaders",
            surface.name,
            surface.num_frames(),
            surface.num_verts(),
            surface.num_triangles(),
            surface.num_shaders()
        );
        for shader in &surface.shaders {
            tracing::info!("    shader {:?} ({})", shader.name, shader.index);
        }
        tracing::debug!("    offsets: {:?}", surface.offsets);
    }
}

/// Serialize the decoded model tree as pretty JSON
pub fn to_json(model: &Md3Model) -> Result<String> {
    Ok(serde_json::to_string_pretty(model)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nether_md3::{Shader, Surface};

    #[test]
    fn test_json_dump() {
        let mut model = Md3Model::new("crate.md3");
        let mut surface = Surface::new("wood");
        surface.shaders.push(Shader::new("wood.tga", 0));
        model.surfaces.push(surface);

        let json = to_json(&model).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "crate.md3");
        assert_eq!(value["ident"], MD3_IDENT);
        assert_eq!(value["surfaces"][0]["shaders"][0]["name"], "wood.tga");

        let back: Md3Model = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_json_rejects_mismatched_grid() {
        let mut model = Md3Model::new("crate.md3");
        model.surfaces.push(Surface::new("wood"));
        let mut value = serde_json::to_value(&model).unwrap();
        value["surfaces"][0]["vertices"] = serde_json::json!({
            "num_frames": 2,
            "num_verts": 3,
            "vertices": [],
        });

        assert!(serde_json::from_value::<Md3Model>(value).is_err());
    }
}
