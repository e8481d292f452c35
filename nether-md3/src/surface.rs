//! Surface data structures
//!
//! # Layout
//! ```text
//! 0x00: ident i32
//! 0x04: name [u8; 64]
//! 0x44: flags i32
//! 0x48: num_frames, num_shaders, num_verts, num_triangles (i32 each)
//! 0x58: ofs_triangles, ofs_shaders, ofs_st, ofs_xyznormal, ofs_end (i32 each)
//! 0x6C: sub-blocks, located through the offsets above
//! ```
//!
//! All offsets are relative to the first byte of the surface header.

use std::io::{Read, Write};

use crate::error::{Md3Error, Result};
use crate::geometry::{TexCoord, Triangle, Vertex};
use crate::grid::VertexGrid;
use crate::primitives::{read_fixed_string, read_i32, write_fixed_string, write_i32};
use crate::records::Shader;
use crate::{MAX_QPATH, MD3_IDENT};

/// Offsets of a surface's sub-blocks, relative to the surface start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceOffsets {
    pub triangles: i32,
    pub shaders: i32,
    pub tex_coords: i32,
    pub vertices: i32,
    /// Surface length; the next surface starts here
    pub end: i32,
}

impl SurfaceOffsets {
    /// Offsets for the sequential layout written by the offsets-computed mode
    pub fn sequential(
        num_triangles: usize,
        num_shaders: usize,
        num_verts: usize,
        num_frames: usize,
    ) -> Result<Self> {
        let triangles = SurfaceHeader::SIZE;
        let shaders = triangles + num_triangles * Triangle::SIZE;
        let tex_coords = shaders + num_shaders * Shader::SIZE;
        let vertices = tex_coords + num_verts * TexCoord::SIZE;
        let end = vertices + num_frames * num_verts * Vertex::SIZE;

        Ok(Self {
            triangles: offset_i32(triangles)?,
            shaders: offset_i32(shaders)?,
            tex_coords: offset_i32(tex_coords)?,
            vertices: offset_i32(vertices)?,
            end: offset_i32(end)?,
        })
    }
}

fn offset_i32(offset: usize) -> Result<i32> {
    i32::try_from(offset).map_err(|_| Md3Error::OffsetOverflow(offset as u64))
}

/// Convert a list length into an i32 count field
pub(crate) fn count_i32(what: &'static str, count: usize) -> Result<i32> {
    i32::try_from(count).map_err(|_| Md3Error::CountOverflow { what, count })
}

/// Fixed 108-byte surface header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurfaceHeader {
    pub ident: i32,
    pub name: String,
    pub flags: i32,
    pub num_frames: i32,
    pub num_shaders: i32,
    pub num_verts: i32,
    pub num_triangles: i32,
    pub offsets: SurfaceOffsets,
}

impl SurfaceHeader {
    pub const SIZE: usize = 4 + MAX_QPATH + 4 + 4 * 4 + 5 * 4;

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            ident: read_i32(r)?,
            name: read_fixed_string(r, MAX_QPATH)?,
            flags: read_i32(r)?,
            num_frames: read_i32(r)?,
            num_shaders: read_i32(r)?,
            num_verts: read_i32(r)?,
            num_triangles: read_i32(r)?,
            offsets: SurfaceOffsets {
                triangles: read_i32(r)?,
                shaders: read_i32(r)?,
                tex_coords: read_i32(r)?,
                vertices: read_i32(r)?,
                end: read_i32(r)?,
            },
        })
    }

    /// Write everything up to (not including) the offset fields
    pub(crate) fn write_fields<W: Write>(&self, w: &mut W) -> Result<()> {
        write_i32(w, self.ident)?;
        write_fixed_string(w, &self.name, MAX_QPATH)?;
        write_i32(w, self.flags)?;
        write_i32(w, self.num_frames)?;
        write_i32(w, self.num_shaders)?;
        write_i32(w, self.num_verts)?;
        write_i32(w, self.num_triangles)
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        self.write_fields(w)?;
        write_i32(w, self.offsets.triangles)?;
        write_i32(w, self.offsets.shaders)?;
        write_i32(w, self.offsets.tex_coords)?;
        write_i32(w, self.offsets.vertices)?;
        write_i32(w, self.offsets.end)
    }
}

/// One material group of a model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Surface {
    /// Echo of the model ident
    pub ident: i32,
    pub name: String,
    pub flags: i32,
    pub shaders: Vec<Shader>,
    pub triangles: Vec<Triangle>,
    /// One per vertex; missing trailing entries are written zero-filled
    pub tex_coords: Vec<TexCoord>,
    pub vertices: VertexGrid,
    /// Offsets as read from disk, used verbatim by `write_with_offsets`
    pub offsets: SurfaceOffsets,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            ident: MD3_IDENT,
            name: String::new(),
            flags: 0,
            shaders: Vec::new(),
            triangles: Vec::new(),
            tex_coords: Vec::new(),
            vertices: VertexGrid::default(),
            offsets: SurfaceOffsets::default(),
        }
    }
}

impl Surface {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn num_frames(&self) -> usize {
        self.vertices.num_frames()
    }

    pub fn num_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub fn num_verts(&self) -> usize {
        self.vertices.num_verts()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Header describing this surface with the given offsets
    pub fn header(&self, offsets: SurfaceOffsets) -> Result<SurfaceHeader> {
        Ok(SurfaceHeader {
            ident: self.ident,
            name: self.name.clone(),
            flags: self.flags,
            num_frames: count_i32("surface frame", self.num_frames())?,
            num_shaders: count_i32("shader", self.num_shaders())?,
            num_verts: count_i32("vertex", self.num_verts())?,
            num_triangles: count_i32("triangle", self.num_triangles())?,
            offsets,
        })
    }

    /// Recompute `offsets` for the sequential layout without writing
    pub fn layout(&self) -> Result<SurfaceOffsets> {
        SurfaceOffsets::sequential(
            self.num_triangles(),
            self.num_shaders(),
            self.num_verts(),
            self.num_frames(),
        )
    }
}
