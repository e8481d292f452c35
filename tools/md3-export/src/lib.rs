//! md3-export library
//!
//! Provides the OBJ bridge, manifest builds and file conversions behind the
//! `md3-export` binary.

pub mod convert;
pub mod inspect;
pub mod manifest;
pub mod obj;

pub use convert::{md3_to_obj, obj_to_md3, read_model, rewrite, write_model};
pub use obj::{ObjMesh, ObjTriangle, load_keyframes, parse_obj, parse_obj_file, write_obj};
