//! Geometry value types shared by surfaces and frames

use std::io::{Read, Write};

use glam::{I16Vec3, IVec3, Vec2, Vec3};

use crate::MD3_XYZ_SCALE;
use crate::error::Result;
use crate::normal::{pack_normal, unpack_normal};
use crate::primitives::{
    read_f32, read_i16, read_i32, read_u16, write_f32, write_i16, write_i32, write_u16,
};

/// Quantize a world coordinate to a vertex coordinate
///
/// Truncates toward zero; values outside the i16 range saturate.
#[inline]
pub fn quantize_coord(value: f32) -> i16 {
    (value / MD3_XYZ_SCALE).trunc() as i16
}

/// Quantize a world coordinate to a frame bound
#[inline]
pub fn quantize_bound(value: f32) -> i32 {
    (value / MD3_XYZ_SCALE).trunc() as i32
}

/// Convert a stored coordinate back to world units
#[inline]
pub fn dequantize_coord(stored: i32) -> f32 {
    stored as f32 * MD3_XYZ_SCALE
}

/// Texture coordinate, in memory with `t` growing upward
///
/// On disk the second component is stored as `1 - t`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TexCoord {
    pub s: f32,
    pub t: f32,
}

impl TexCoord {
    pub const SIZE: usize = 8;

    /// Placeholder for vertices without a UV; stored as all-zero bytes
    pub const UNSET: Self = Self { s: 0.0, t: 1.0 };

    pub fn new(s: f32, t: f32) -> Self {
        Self { s, t }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.s, self.t)
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let s = read_f32(r)?;
        let t = 1.0 - read_f32(r)?;
        Ok(Self { s, t })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_f32(w, self.s)?;
        write_f32(w, 1.0 - self.t)
    }
}

impl From<Vec2> for TexCoord {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Triangle referencing three vertices of its surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub indices: [i32; 3],
}

impl Triangle {
    pub const SIZE: usize = 12;

    pub fn new(a: i32, b: i32, c: i32) -> Self {
        Self { indices: [a, b, c] }
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self::new(read_i32(r)?, read_i32(r)?, read_i32(r)?))
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        for index in self.indices {
            write_i32(w, index)?;
        }
        Ok(())
    }
}

/// Compressed vertex: quantized position plus a normal
///
/// The normal is kept as a float vector in memory and packed into 16 bits
/// on write, so it only survives to within the angle quantization.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    /// Position in stored units (world / [`MD3_XYZ_SCALE`])
    pub position: I16Vec3,
    /// Unit normal
    pub normal: Vec3,
}

impl Vertex {
    pub const SIZE: usize = 8;

    pub fn new(position: I16Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }

    /// Build a vertex from a world-space position
    pub fn from_world(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: I16Vec3::new(
                quantize_coord(position.x),
                quantize_coord(position.y),
                quantize_coord(position.z),
            ),
            normal,
        }
    }

    /// Position in world units
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(
            dequantize_coord(self.position.x.into()),
            dequantize_coord(self.position.y.into()),
            dequantize_coord(self.position.z.into()),
        )
    }

    /// The normal as it will be stored
    pub fn packed_normal(&self) -> u16 {
        pack_normal(self.normal)
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let position = I16Vec3::new(read_i16(r)?, read_i16(r)?, read_i16(r)?);
        let normal = unpack_normal(read_u16(r)?);
        Ok(Self { position, normal })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_i16(w, self.position.x)?;
        write_i16(w, self.position.y)?;
        write_i16(w, self.position.z)?;
        write_u16(w, self.packed_normal())
    }
}

/// Quantize a world-space vector to frame bound units
pub(crate) fn quantize_bounds(v: Vec3) -> IVec3 {
    IVec3::new(quantize_bound(v.x), quantize_bound(v.y), quantize_bound(v.z))
}
