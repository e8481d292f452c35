//! MD3 writing functions
//!
//! Fresh exports use the offsets-computed mode: headers go out with
//! placeholder offsets that are patched once the block they point at has been
//! written. The stream must therefore support seeking.

use std::io::{Seek, SeekFrom, Write};

use super::patch::reserve_slots;
use crate::error::Result;
use crate::geometry::TexCoord;
use crate::model::{Md3Model, ModelOffsets};
use crate::surface::{Surface, SurfaceOffsets};
use crate::{MD3_MAX_FRAMES, MD3_MAX_SURFACES, MD3_MAX_TAGS};

/// Write a model, computing every section and surface offset
///
/// Offsets are relative to the stream position at entry (the file start for
/// standalone files). Returns the offsets that were written.
pub fn write_md3<W: Write + Seek>(model: &Md3Model, w: &mut W) -> Result<ModelOffsets> {
    let base = w.stream_position()?;

    for (what, count, max) in over_limits(model) {
        tracing::warn!(count, max, "model has more {what}s than readers will load");
    }

    model.header(ModelOffsets::default())?.write_fields(w)?;
    let [frames_slot, tags_slot, surfaces_slot, eof_slot] = reserve_slots(w)?;

    let frames = frames_slot.patch_here(w, base)?;
    for frame in &model.frames {
        frame.write(w)?;
    }

    let tags = tags_slot.patch_here(w, base)?;
    for tag in &model.tags {
        tag.write(w)?;
    }

    let surfaces = surfaces_slot.patch_here(w, base)?;
    let mut surface_base = w.stream_position()?;
    for surface in &model.surfaces {
        w.seek(SeekFrom::Start(surface_base))?;
        let offsets = surface.write(w)?;
        surface_base += offsets.end as u64;
    }

    let eof = eof_slot.patch_here(w, base)?;

    tracing::debug!(
        name = %model.name,
        frames,
        tags,
        surfaces,
        eof,
        "wrote MD3 model"
    );

    Ok(ModelOffsets {
        frames,
        tags,
        surfaces,
        eof,
    })
}

/// Sections whose counts exceed what a reader loads, as (name, count, max)
pub(super) fn over_limits(
    model: &Md3Model,
) -> impl Iterator<Item = (&'static str, usize, usize)> {
    [
        ("frame", model.num_frames(), MD3_MAX_FRAMES),
        ("tag", model.num_tags(), MD3_MAX_TAGS),
        ("surface", model.num_surfaces(), MD3_MAX_SURFACES),
    ]
    .into_iter()
    .filter(|&(_, count, max)| count > max)
}

impl Surface {
    /// Write this surface, computing and backpatching its offsets
    ///
    /// Blocks are written in the order triangles, shaders, UVs, vertices.
    /// Offsets are relative to the first byte of the surface header.
    pub fn write<W: Write + Seek>(&self, w: &mut W) -> Result<SurfaceOffsets> {
        let start = w.stream_position()?;

        self.header(SurfaceOffsets::default())?.write_fields(w)?;
        let [triangles_slot, shaders_slot, st_slot, xyz_slot, end_slot] = reserve_slots(w)?;

        let triangles = triangles_slot.patch_here(w, start)?;
        for triangle in &self.triangles {
            triangle.write(w)?;
        }

        let shaders = shaders_slot.patch_here(w, start)?;
        for shader in &self.shaders {
            shader.write(w)?;
        }

        let tex_coords = st_slot.patch_here(w, start)?;
        self.write_tex_coords(w)?;

        let vertices = xyz_slot.patch_here(w, start)?;
        for vertex in self.vertices.as_slice() {
            vertex.write(w)?;
        }

        let end = end_slot.patch_here(w, start)?;

        tracing::trace!(name = %self.name, start, end, "wrote surface");

        Ok(SurfaceOffsets {
            triangles,
            shaders,
            tex_coords,
            vertices,
            end,
        })
    }

    /// Write this surface trusting the offsets stored in `self.offsets`
    ///
    /// The header carries the stored offsets verbatim and the blocks follow
    /// in the order triangles, shaders, UVs, vertices. Nothing is checked:
    /// the caller is responsible for offsets that match this layout.
    pub fn write_with_offsets<W: Write>(&self, w: &mut W) -> Result<()> {
        self.header(self.offsets)?.write(w)?;
        for triangle in &self.triangles {
            triangle.write(w)?;
        }
        for shader in &self.shaders {
            shader.write(w)?;
        }
        self.write_tex_coords(w)?;
        for vertex in self.vertices.as_slice() {
            vertex.write(w)?;
        }
        Ok(())
    }

    /// Exactly one UV per vertex; missing entries are written zero-filled
    fn write_tex_coords<W: Write>(&self, w: &mut W) -> Result<()> {
        let num_verts = self.num_verts();
        if self.tex_coords.len() < num_verts {
            tracing::warn!(
                surface = %self.name,
                missing = num_verts - self.tex_coords.len(),
                "missing texture coordinates written as zero"
            );
        } else if self.tex_coords.len() > num_verts {
            tracing::warn!(
                surface = %self.name,
                extra = self.tex_coords.len() - num_verts,
                "texture coordinates beyond vertex count dropped"
            );
        }

        for i in 0..num_verts {
            let st = self.tex_coords.get(i).copied().unwrap_or(TexCoord::UNSET);
            st.write(w)?;
        }
        Ok(())
    }
}
