//! MD3 parsing and reading functions

use std::io::{Cursor, Read, Seek, SeekFrom};

use crate::error::{Md3Error, Result};
use crate::geometry::{TexCoord, Triangle, Vertex};
use crate::grid::VertexGrid;
use crate::model::{CountPolicy, Md3Model, ModelHeader, ReadOptions};
use crate::records::{Frame, Shader, Tag};
use crate::surface::{Surface, SurfaceHeader};
use crate::{MD3_IDENT, MD3_MAX_FRAMES, MD3_MAX_SURFACES, MD3_MAX_TAGS, MD3_VERSION};

/// Upper bound on up-front allocation for counts read from a file
const MAX_PREALLOC: usize = 4096;

/// Parse an in-memory MD3 file
///
/// # Example
/// ```ignore
/// let data = std::fs::read("crate.md3")?;
/// let model = parse_md3(&data)?;
/// println!("Loaded: {}", model.name);
/// ```
pub fn parse_md3(data: &[u8]) -> Result<Md3Model> {
    read_md3(&mut Cursor::new(data))
}

/// Read an MD3 model starting at the stream's current position
pub fn read_md3<R: Read + Seek>(r: &mut R) -> Result<Md3Model> {
    read_md3_with(r, &ReadOptions::default())
}

/// Read an MD3 model with explicit reader options
///
/// Section offsets are resolved against the position the model header starts
/// at, which is the file start for standalone `.md3` files.
pub fn read_md3_with<R: Read + Seek>(r: &mut R, options: &ReadOptions) -> Result<Md3Model> {
    let base = r.stream_position()?;
    let header = ModelHeader::read(r)?;

    if header.ident != MD3_IDENT {
        tracing::warn!(ident = header.ident, "unexpected MD3 ident");
    }
    if header.version != MD3_VERSION {
        tracing::debug!(version = header.version, "non-standard MD3 version");
    }

    let num_frames = limit_count("frame", header.num_frames, MD3_MAX_FRAMES, options)?;
    let num_tags = limit_count("tag", header.num_tags, MD3_MAX_TAGS, options)?;
    let num_surfaces = limit_count("surface", header.num_surfaces, MD3_MAX_SURFACES, options)?;

    tracing::debug!(
        name = %header.name,
        num_frames,
        num_tags,
        num_surfaces,
        "reading MD3 model"
    );

    // Frames
    r.seek(SeekFrom::Start(resolve(base, header.offsets.frames)?))?;
    let mut frames = Vec::with_capacity(num_frames);
    for _ in 0..num_frames {
        frames.push(Frame::read(r)?);
    }

    // Tags
    r.seek(SeekFrom::Start(resolve(base, header.offsets.tags)?))?;
    let mut tags = Vec::with_capacity(num_tags);
    for _ in 0..num_tags {
        tags.push(Tag::read(r)?);
    }

    // Surfaces are variable length; each one's end offset locates the next
    let mut surface_base = resolve(base, header.offsets.surfaces)?;
    let mut surfaces = Vec::with_capacity(num_surfaces);
    for _ in 0..num_surfaces {
        let surface = Surface::read(r, surface_base)?;
        surface_base = resolve(surface_base, surface.offsets.end)?;
        surfaces.push(surface);
    }

    Ok(Md3Model {
        ident: header.ident,
        version: header.version,
        name: header.name,
        flags: header.flags,
        num_skins: header.num_skins,
        frames,
        tags,
        surfaces,
        offsets: header.offsets,
    })
}

impl Surface {
    /// Read a surface whose header starts at the absolute position `base`
    ///
    /// Every sub-block is located by seeking to `base + offset`, so the order
    /// of blocks in the file does not matter. Counts are trusted as stored.
    pub fn read<R: Read + Seek>(r: &mut R, base: u64) -> Result<Self> {
        r.seek(SeekFrom::Start(base))?;
        let header = SurfaceHeader::read(r)?;

        let num_frames = non_negative("surface frame", header.num_frames);
        let num_shaders = non_negative("shader", header.num_shaders);
        let num_verts = non_negative("vertex", header.num_verts);
        let num_triangles = non_negative("triangle", header.num_triangles);

        tracing::trace!(
            name = %header.name,
            base,
            num_frames,
            num_shaders,
            num_verts,
            num_triangles,
            "reading surface"
        );

        r.seek(SeekFrom::Start(resolve(base, header.offsets.shaders)?))?;
        let mut shaders = Vec::with_capacity(num_shaders.min(MAX_PREALLOC));
        for _ in 0..num_shaders {
            shaders.push(Shader::read(r)?);
        }

        r.seek(SeekFrom::Start(resolve(base, header.offsets.triangles)?))?;
        let mut triangles = Vec::with_capacity(num_triangles.min(MAX_PREALLOC));
        for _ in 0..num_triangles {
            triangles.push(Triangle::read(r)?);
        }

        r.seek(SeekFrom::Start(resolve(base, header.offsets.tex_coords)?))?;
        let mut tex_coords = Vec::with_capacity(num_verts.min(MAX_PREALLOC));
        for _ in 0..num_verts {
            tex_coords.push(TexCoord::read(r)?);
        }

        r.seek(SeekFrom::Start(resolve(base, header.offsets.vertices)?))?;
        let total = num_frames
            .checked_mul(num_verts)
            .ok_or(Md3Error::UnexpectedEof)?;
        let mut vertices = Vec::with_capacity(total.min(MAX_PREALLOC));
        for _ in 0..total {
            vertices.push(Vertex::read(r)?);
        }

        Ok(Self {
            ident: header.ident,
            name: header.name,
            flags: header.flags,
            shaders,
            triangles,
            tex_coords,
            vertices: VertexGrid::from_flat(num_frames, num_verts, vertices)?,
            offsets: header.offsets,
        })
    }
}

/// Absolute position of `offset` bytes past `base`
fn resolve(base: u64, offset: i32) -> Result<u64> {
    base.checked_add_signed(i64::from(offset))
        .ok_or(Md3Error::InvalidOffset(base as i64 + i64::from(offset)))
}

/// Apply the model-level count limit
fn limit_count(what: &'static str, count: i32, max: usize, options: &ReadOptions) -> Result<usize> {
    let count_usize = non_negative(what, count);
    if count_usize <= max {
        return Ok(count_usize);
    }

    match options.count_policy {
        CountPolicy::Clamp => {
            tracing::warn!(count, max, "{what} count exceeds maximum, clamping");
            Ok(max)
        }
        CountPolicy::Reject => Err(Md3Error::CountExceedsLimit { what, count, max }),
    }
}

/// Negative counts are read as zero
fn non_negative(what: &'static str, count: i32) -> usize {
    usize::try_from(count).unwrap_or_else(|_| {
        tracing::warn!(count, "negative {what} count, reading none");
        0
    })
}
