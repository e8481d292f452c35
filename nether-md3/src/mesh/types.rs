//! Mesh interface types

use std::ops::Range;
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3};

/// A material as seen by the exporter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshMaterial {
    /// Becomes the surface name (last `.suffix` removed)
    pub name: String,
    /// Texture path; only its file name is stored, as shader index 0
    pub texture: Option<String>,
    /// Extra `(name, value)` shader entries
    pub params: Vec<(String, i32)>,
}

/// One triangle of the source mesh
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshTriangle {
    /// Indices into the frame position lists
    pub vertices: [u32; 3],
    /// Index into [`MeshSource::materials`]
    pub material: usize,
    /// UV per corner, `t` growing upward
    pub uvs: [Vec2; 3],
}

/// Vertex positions of one keyframe, in world units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshFrame {
    pub name: String,
    pub positions: Vec<Vec3>,
}

/// Everything needed to build a model
///
/// All frames share one topology: every frame lists the same number of
/// positions, and `normals` holds one reference normal per position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshSource {
    /// Object or file name; the last extension is replaced with `.md3`
    pub name: String,
    pub materials: Vec<MeshMaterial>,
    pub triangles: Vec<MeshTriangle>,
    pub frames: Vec<MeshFrame>,
    pub normals: Vec<Vec3>,
}

impl MeshSource {
    /// Number of vertices per frame
    pub fn num_verts(&self) -> usize {
        self.frames.first().map_or(0, |f| f.positions.len())
    }
}

/// One decoded keyframe
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedFrame {
    pub name: String,
    pub positions: Vec<Vec3>,
}

impl ImportedFrame {
    /// Offsets of this frame from `base`, for hosts that store morph deltas
    pub fn deltas(&self, base: &[Vec3]) -> Vec<Vec3> {
        self.positions
            .iter()
            .zip(base)
            .map(|(&p, &b)| p - b)
            .collect()
    }
}

/// One decoded surface, as a material over a range of faces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMaterial {
    pub name: String,
    /// Name of the first shader, if the surface has one
    pub texture: Option<String>,
    /// Remaining shaders as `(name, index)`
    pub params: Vec<(String, i32)>,
    /// Faces of [`ImportedMesh::faces`] drawn with this material
    pub faces: Range<usize>,
}

impl ImportedMaterial {
    /// Resolve the texture name against the directory the model was read from
    pub fn texture_path(&self, model_dir: &Path) -> Option<PathBuf> {
        self.texture.as_ref().map(|texture| model_dir.join(texture))
    }
}

/// A decoded model, flattened across surfaces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedMesh {
    /// Model name without its extension
    pub name: String,
    /// Frame 0 positions of every surface, concatenated
    pub positions: Vec<Vec3>,
    /// Triangles indexing into `positions`
    pub faces: Vec<[u32; 3]>,
    /// Every frame, including frame 0
    pub frames: Vec<ImportedFrame>,
    /// UV per face corner
    pub corner_uvs: Vec<[Vec2; 3]>,
    /// Frame 0 normal per position
    pub normals: Vec<Vec3>,
    pub materials: Vec<ImportedMaterial>,
}
