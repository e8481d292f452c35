//! MeshSource -> Md3Model

use hashbrown::HashMap;

use super::strip_suffix;
use super::types::{MeshMaterial, MeshSource, MeshTriangle};
use crate::error::{Md3Error, Result};
use crate::geometry::{TexCoord, Triangle, Vertex};
use crate::grid::VertexGrid;
use crate::model::Md3Model;
use crate::records::{Frame, Shader};
use crate::surface::Surface;

/// Build a model from host mesh data
///
/// Produces one frame record per source frame and one surface per material.
/// Each surface carries only the vertices its triangles use, in ascending
/// source index order.
pub fn build_model(source: &MeshSource) -> Result<Md3Model> {
    validate(source)?;

    let mut model = Md3Model::new(format!("{}.md3", strip_suffix(&source.name)));
    model.frames = source
        .frames
        .iter()
        .map(|frame| Frame::from_positions(&frame.name, &frame.positions))
        .collect();

    for (index, material) in source.materials.iter().enumerate() {
        let triangles: Vec<&MeshTriangle> = source
            .triangles
            .iter()
            .filter(|t| t.material == index)
            .collect();
        model.surfaces.push(build_surface(source, material, &triangles)?);
    }

    tracing::debug!(
        name = %model.name,
        frames = model.num_frames(),
        surfaces = model.num_surfaces(),
        "built model from mesh"
    );

    Ok(model)
}

fn build_surface(
    source: &MeshSource,
    material: &MeshMaterial,
    triangles: &[&MeshTriangle],
) -> Result<Surface> {
    let mut used: Vec<u32> = triangles.iter().flat_map(|t| t.vertices).collect();
    used.sort_unstable();
    used.dedup();

    let remap = used
        .iter()
        .enumerate()
        .map(|(local, &global)| {
            i32::try_from(local)
                .map(|local| (global, local))
                .map_err(|_| Md3Error::CountOverflow {
                    what: "vertex",
                    count: used.len(),
                })
        })
        .collect::<Result<HashMap<u32, i32>>>()?;

    let mut surface = Surface::new(strip_suffix(&material.name));

    if let Some(texture) = &material.texture {
        surface.shaders.push(Shader::new(file_name(texture), 0));
    }
    for (name, value) in &material.params {
        surface.shaders.push(Shader::new(name.as_str(), *value));
    }

    // Corners visited later overwrite earlier ones
    surface.tex_coords = vec![TexCoord::UNSET; used.len()];
    for triangle in triangles {
        let indices = triangle.vertices.map(|v| remap[&v]);
        for (&local, &uv) in indices.iter().zip(&triangle.uvs) {
            surface.tex_coords[local as usize] = TexCoord::from(uv);
        }
        surface.triangles.push(Triangle { indices });
    }

    let rows: Vec<Vec<Vertex>> = source
        .frames
        .iter()
        .map(|frame| {
            used.iter()
                .map(|&v| {
                    let v = v as usize;
                    Vertex::from_world(frame.positions[v], source.normals[v])
                })
                .collect()
        })
        .collect();
    surface.vertices = VertexGrid::from_rows(rows)?;

    Ok(surface)
}

/// Last path component, accepting either separator
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn validate(source: &MeshSource) -> Result<()> {
    let Some(first) = source.frames.first() else {
        return Err(Md3Error::InvalidMesh("mesh has no frames".to_string()));
    };
    let num_verts = first.positions.len();

    for (i, frame) in source.frames.iter().enumerate() {
        if frame.positions.len() != num_verts {
            return Err(Md3Error::InvalidMesh(format!(
                "frame {i} ({}) has {} vertices, expected {num_verts}",
                frame.name,
                frame.positions.len()
            )));
        }
    }

    if source.normals.len() != num_verts {
        return Err(Md3Error::InvalidMesh(format!(
            "{} normals for {num_verts} vertices",
            source.normals.len()
        )));
    }

    for (i, triangle) in source.triangles.iter().enumerate() {
        if let Some(&v) = triangle.vertices.iter().find(|&&v| v as usize >= num_verts) {
            return Err(Md3Error::InvalidMesh(format!(
                "triangle {i} references vertex {v}, mesh has {num_verts}"
            )));
        }
        if triangle.material >= source.materials.len() {
            return Err(Md3Error::InvalidMesh(format!(
                "triangle {i} references material {}, mesh has {}",
                triangle.material,
                source.materials.len()
            )));
        }
    }

    Ok(())
}
