//! Nether-MD3: MD3 model format reader and writer for Nethercore
//!
//! This crate provides a pure Rust codec for the MD3 vertex-animated triangle
//! mesh format. It parses a byte stream into an [`Md3Model`] tree and writes a
//! model tree back into the exact on-disk layout, computing and backpatching
//! the self-referential byte offsets the format requires.
//!
//! # Key Features
//!
//! - **Byte-exact**: Fixed-size records, offset-relative surface sub-blocks
//! - **Two write modes**: Trust the stored surface offsets, or compute them
//! - **Host neutral**: [`MeshSource`] in, [`ImportedMesh`] out, no scene graph
//!
//! # MD3 Format Overview
//!
//! ```text
//! Model header (108 bytes)
//! Frames       (56 bytes each)
//! Tags         (112 bytes each)
//! Surfaces     (variable):
//!   Surface header (108 bytes)
//!   Triangles      (12 bytes each)
//!   Shaders        (68 bytes each)
//!   UVs            (8 bytes each)
//!   Vertices       (8 bytes each, frame-major)
//! ```
//!
//! Model offsets are relative to the file start, surface offsets to the start
//! of their surface. Readers always seek; nothing depends on block order.
//!
//! # Usage
//!
//! ```ignore
//! use nether_md3::{parse_md3, Md3Model};
//!
//! let data = std::fs::read("crate.md3")?;
//! let model = parse_md3(&data)?;
//!
//! println!("Model: {}", model.name);
//! for surface in &model.surfaces {
//!     println!("  {}: {} verts", surface.name, surface.num_verts());
//! }
//!
//! let bytes = model.to_bytes()?;
//! ```

mod codec;
mod error;
mod geometry;
mod grid;
mod mesh;
mod model;
mod normal;
mod primitives;
mod records;
mod surface;

pub use codec::{parse_md3, read_md3, read_md3_with, write_md3};
pub use error::{Md3Error, Result};
pub use geometry::{
    TexCoord, Triangle, Vertex, dequantize_coord, quantize_bound, quantize_coord,
};
pub use grid::VertexGrid;
pub use mesh::{
    ImportedFrame, ImportedMaterial, ImportedMesh, MeshFrame, MeshMaterial, MeshSource,
    MeshTriangle, build_model, extract_mesh,
};
pub use model::{CountPolicy, Md3Model, ModelHeader, ModelOffsets, ReadOptions};
pub use normal::{pack_normal, unpack_normal};
pub use primitives::{read_fixed_string, write_fixed_string};
pub use records::{Frame, Shader, Tag};
pub use surface::{Surface, SurfaceHeader, SurfaceOffsets};

// =============================================================================
// Constants
// =============================================================================

/// MD3 magic number ("IDP3" read as a little-endian i32)
pub const MD3_IDENT: i32 = 860_898_377;

/// MD3 format version we write
pub const MD3_VERSION: i32 = 15;

/// Width of model, surface, shader and tag name fields
pub const MAX_QPATH: usize = 64;

/// Width of the frame name field
pub const FRAME_NAME_LEN: usize = 16;

/// Maximum frames read from one file
pub const MD3_MAX_FRAMES: usize = 1024;

/// Maximum tags read from one file
pub const MD3_MAX_TAGS: usize = 16;

/// Maximum surfaces read from one file
pub const MD3_MAX_SURFACES: usize = 32;

/// World units per stored coordinate unit (vertex xyz and frame bounds)
pub const MD3_XYZ_SCALE: f32 = 1.0 / 64.0;

// =============================================================================
// Tests
// =============================================================================
