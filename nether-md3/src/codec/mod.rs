//! MD3 codec
//!
//! This module turns byte streams into [`crate::Md3Model`] trees and back.
//! It consists of:
//!
//! - `read` - Parsing MD3 files, seeking through every stored offset
//! - `write` - Writing MD3 files in either surface write mode
//! - `patch` - Placeholder offsets that are backpatched after the fact
//! - `tests` - Whole-file scenarios across read and write

mod patch;
mod read;
mod write;


// Re-export public API
pub use read::{parse_md3, read_md3, read_md3_with};
pub use write::write_md3;
