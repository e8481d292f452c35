//! Md3Model -> ImportedMesh

use glam::{Vec2, Vec3};

use super::strip_suffix;
use super::types::{ImportedFrame, ImportedMaterial, ImportedMesh};
use crate::model::Md3Model;
use crate::surface::Surface;

/// Flatten a decoded model into host-friendly arrays
///
/// Surfaces are concatenated: each surface's vertices follow the previous
/// surface's, and its faces are offset by that vertex base. Triangles that
/// reference vertices outside their surface are skipped.
pub fn extract_mesh(model: &Md3Model) -> ImportedMesh {
    let num_frames = model
        .surfaces
        .iter()
        .map(Surface::num_frames)
        .max()
        .unwrap_or(0);

    let mut mesh = ImportedMesh {
        name: strip_suffix(&model.name).to_string(),
        frames: (0..num_frames)
            .map(|i| ImportedFrame {
                name: model
                    .frames
                    .get(i)
                    .map_or_else(|| format!("frame{i}"), |f| f.name.clone()),
                positions: Vec::new(),
            })
            .collect(),
        ..Default::default()
    };

    for surface in &model.surfaces {
        let base = mesh.positions.len();
        let num_verts = surface.num_verts();

        for (i, frame) in mesh.frames.iter_mut().enumerate() {
            frame.positions.extend(frame_positions(surface, i));
        }
        mesh.positions.extend(frame_positions(surface, 0));
        mesh.normals.extend(match surface.vertices.row(0) {
            Some(row) => row.iter().map(|v| v.normal).collect(),
            None => vec![Vec3::ZERO; num_verts],
        });

        let first_face = mesh.faces.len();
        for triangle in &surface.triangles {
            let Some(local) = local_indices(triangle.indices, num_verts) else {
                tracing::warn!(
                    surface = %surface.name,
                    indices = ?triangle.indices,
                    "skipping triangle with out-of-range vertex"
                );
                continue;
            };

            mesh.faces.push(local.map(|v| (base + v) as u32));
            mesh.corner_uvs.push(local.map(|v| {
                surface
                    .tex_coords
                    .get(v)
                    .map_or(Vec2::ZERO, |st| st.as_vec2())
            }));
        }

        let mut shaders = surface.shaders.iter();
        mesh.materials.push(ImportedMaterial {
            name: surface.name.clone(),
            texture: shaders.next().map(|s| s.name.clone()),
            params: shaders.map(|s| (s.name.clone(), s.index)).collect(),
            faces: first_face..mesh.faces.len(),
        });
    }

    mesh
}

/// World positions of one frame of a surface, falling back to frame 0
fn frame_positions(surface: &Surface, frame: usize) -> Vec<Vec3> {
    match surface.vertices.row(frame).or_else(|| surface.vertices.row(0)) {
        Some(row) => row.iter().map(|v| v.world_position()).collect(),
        None => vec![Vec3::ZERO; surface.num_verts()],
    }
}

fn local_indices(indices: [i32; 3], num_verts: usize) -> Option<[usize; 3]> {
    let mut local = [0; 3];
    for (slot, index) in local.iter_mut().zip(indices) {
        *slot = usize::try_from(index).ok().filter(|&i| i < num_verts)?;
    }
    Some(local)
}
