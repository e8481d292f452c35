//! Host-neutral mesh interface
//!
//! Exporters describe their geometry as a [`MeshSource`] and call
//! [`build_model`]; importers call [`extract_mesh`] and rebuild their own
//! scene objects from the returned [`ImportedMesh`].

mod build;
mod extract;
mod types;

// Re-export public API
pub use build::build_model;
pub use extract::extract_mesh;
pub use types::{
    ImportedFrame, ImportedMaterial, ImportedMesh, MeshFrame, MeshMaterial, MeshSource,
    MeshTriangle,
};

/// Drop the last `.suffix` of a name, if any
pub(crate) fn strip_suffix(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(stem, _)| stem)
}
