//! MD3 model data structures
//!
//! # Layout
//! ```text
//! 0x00: ident i32 ("IDP3")
//! 0x04: version i32
//! 0x08: name [u8; 64]
//! 0x48: flags i32
//! 0x4C: num_frames, num_tags, num_surfaces, num_skins (i32 each)
//! 0x5C: ofs_frames, ofs_tags, ofs_surfaces, ofs_eof (i32 each)
//! 0x6C: frames, tags, surfaces
//! ```

use std::io::{Read, Write};

use crate::error::Result;
use crate::primitives::{read_fixed_string, read_i32, write_fixed_string, write_i32};
use crate::records::{Frame, Tag};
use crate::surface::{Surface, count_i32};
use crate::{MAX_QPATH, MD3_IDENT, MD3_VERSION};

/// Section offsets, relative to the start of the file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelOffsets {
    pub frames: i32,
    pub tags: i32,
    pub surfaces: i32,
    pub eof: i32,
}

/// Fixed 108-byte model header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelHeader {
    pub ident: i32,
    pub version: i32,
    pub name: String,
    pub flags: i32,
    pub num_frames: i32,
    pub num_tags: i32,
    pub num_surfaces: i32,
    pub num_skins: i32,
    pub offsets: ModelOffsets,
}

impl ModelHeader {
    pub const SIZE: usize = 4 + 4 + MAX_QPATH + 4 + 4 * 4 + 4 * 4;

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            ident: read_i32(r)?,
            version: read_i32(r)?,
            name: read_fixed_string(r, MAX_QPATH)?,
            flags: read_i32(r)?,
            num_frames: read_i32(r)?,
            num_tags: read_i32(r)?,
            num_surfaces: read_i32(r)?,
            num_skins: read_i32(r)?,
            offsets: ModelOffsets {
                frames: read_i32(r)?,
                tags: read_i32(r)?,
                surfaces: read_i32(r)?,
                eof: read_i32(r)?,
            },
        })
    }

    /// Write everything up to (not including) the offset fields
    pub(crate) fn write_fields<W: Write>(&self, w: &mut W) -> Result<()> {
        write_i32(w, self.ident)?;
        write_i32(w, self.version)?;
        write_fixed_string(w, &self.name, MAX_QPATH)?;
        write_i32(w, self.flags)?;
        write_i32(w, self.num_frames)?;
        write_i32(w, self.num_tags)?;
        write_i32(w, self.num_surfaces)?;
        write_i32(w, self.num_skins)
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        self.write_fields(w)?;
        write_i32(w, self.offsets.frames)?;
        write_i32(w, self.offsets.tags)?;
        write_i32(w, self.offsets.surfaces)?;
        write_i32(w, self.offsets.eof)
    }
}

/// A complete MD3 model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Md3Model {
    pub ident: i32,
    pub version: i32,
    /// Model name (max 64 bytes, usually the file name)
    pub name: String,
    pub flags: i32,
    /// Unused by the format; preserved as read
    pub num_skins: i32,
    pub frames: Vec<Frame>,
    pub tags: Vec<Tag>,
    pub surfaces: Vec<Surface>,
    /// Offsets as read from disk; writing recomputes them
    pub(crate) offsets: ModelOffsets,
}

impl Default for Md3Model {
    fn default() -> Self {
        Self {
            ident: MD3_IDENT,
            version: MD3_VERSION,
            name: String::new(),
            flags: 0,
            num_skins: 0,
            frames: Vec::new(),
            tags: Vec::new(),
            surfaces: Vec::new(),
            offsets: ModelOffsets::default(),
        }
    }
}

impl Md3Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    pub fn num_surfaces(&self) -> usize {
        self.surfaces.len()
    }

    /// Section offsets found when this model was read
    ///
    /// Derived from the layout, so there is no setter: `write_md3` returns
    /// the offsets it actually wrote. Zero for models built in memory.
    pub fn offsets(&self) -> ModelOffsets {
        self.offsets
    }

    /// Get a surface by name
    pub fn surface(&self, name: &str) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.name == name)
    }

    /// Header describing this model with the given offsets
    pub fn header(&self, offsets: ModelOffsets) -> Result<ModelHeader> {
        Ok(ModelHeader {
            ident: self.ident,
            version: self.version,
            name: self.name.clone(),
            flags: self.flags,
            num_frames: count_i32("frame", self.num_frames())?,
            num_tags: count_i32("tag", self.num_tags())?,
            num_surfaces: count_i32("surface", self.num_surfaces())?,
            num_skins: self.num_skins,
            offsets,
        })
    }

    /// Serialize into a fresh buffer, computing every offset
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        crate::codec::write_md3(self, &mut cursor)?;
        Ok(cursor.into_inner())
    }
}

/// What to do when a header count exceeds the format maximum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CountPolicy {
    /// Read up to the maximum and log a warning
    #[default]
    Clamp,
    /// Fail with [`crate::Md3Error::CountExceedsLimit`]
    Reject,
}

/// Reader configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub count_policy: CountPolicy,
}

impl ReadOptions {
    /// Options that reject out-of-range counts instead of clamping them
    pub fn strict() -> Self {
        Self {
            count_policy: CountPolicy::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_size() {
        assert_eq!(ModelHeader::SIZE, 108);
    }

    #[test]
    fn test_header_round_trip() {
        let header = ModelHeader {
            ident: MD3_IDENT,
            version: MD3_VERSION,
            name: "models/crate.md3".to_string(),
            flags: 0,
            num_frames: 2,
            num_tags: 0,
            num_surfaces: 1,
            num_skins: 0,
            offsets: ModelOffsets {
                frames: 108,
                tags: 220,
                surfaces: 220,
                eof: 480,
            },
        };
        let mut out = Vec::new();
        header.write(&mut out).unwrap();
        assert_eq!(out.len(), ModelHeader::SIZE);
        assert_eq!(&out[0..4], b"IDP3");
        assert_eq!(ModelHeader::read(&mut Cursor::new(&out[..])).unwrap(), header);
    }

    #[test]
    fn test_default_model() {
        let model = Md3Model::new("empty.md3");
        assert_eq!(model.ident, MD3_IDENT);
        assert_eq!(model.version, MD3_VERSION);
        assert_eq!(model.num_surfaces(), 0);
        assert!(model.surface("missing").is_none());
        assert_eq!(model.offsets(), ModelOffsets::default());
    }

    #[test]
    fn test_read_options() {
        assert_eq!(ReadOptions::default().count_policy, CountPolicy::Clamp);
        assert_eq!(ReadOptions::strict().count_policy, CountPolicy::Reject);
    }
}
