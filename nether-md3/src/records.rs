//! Fixed-size records: shaders, frames and tags

use std::io::{Read, Write};

use glam::{IVec3, Vec3};

use crate::error::Result;
use crate::geometry::quantize_bounds;
use crate::primitives::{
    read_f32, read_fixed_string, read_i32, read_ivec3, write_f32, write_fixed_string, write_i32,
    write_ivec3,
};
use crate::{FRAME_NAME_LEN, MAX_QPATH};

/// Surface shader reference (68 bytes)
///
/// For texture shaders `index` is the shader slot. Material parameters reuse
/// the record with `name` as the parameter name and `index` as its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shader {
    pub name: String,
    pub index: i32,
}

impl Shader {
    pub const SIZE: usize = MAX_QPATH + 4;

    pub fn new(name: impl Into<String>, index: i32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        let name = read_fixed_string(r, MAX_QPATH)?;
        let index = read_i32(r)?;
        Ok(Self { name, index })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_fixed_string(w, &self.name, MAX_QPATH)?;
        write_i32(w, self.index)
    }
}

/// Animation frame with its bounding volume (56 bytes)
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub min_bounds: IVec3,
    pub max_bounds: IVec3,
    pub local_origin: IVec3,
    /// Bounding radius in world units
    pub radius: f32,
    pub name: String,
}

impl Frame {
    pub const SIZE: usize = 3 * 12 + 4 + FRAME_NAME_LEN;

    /// Build a frame from the world-space positions of one keyframe
    ///
    /// The box corners and center are quantized; the radius is half the box
    /// diagonal and stays in world units. An empty keyframe yields a zero box.
    pub fn from_positions(name: impl Into<String>, positions: &[Vec3]) -> Self {
        let name = name.into();
        let Some(&first) = positions.first() else {
            return Self {
                name,
                ..Default::default()
            };
        };

        let (min, max) = positions
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        let center = (min + max) / 2.0;

        Self {
            min_bounds: quantize_bounds(min),
            max_bounds: quantize_bounds(max),
            local_origin: quantize_bounds(center),
            radius: min.distance(max) / 2.0,
            name,
        }
    }

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            min_bounds: read_ivec3(r)?,
            max_bounds: read_ivec3(r)?,
            local_origin: read_ivec3(r)?,
            radius: read_f32(r)?,
            name: read_fixed_string(r, FRAME_NAME_LEN)?,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_ivec3(w, self.min_bounds)?;
        write_ivec3(w, self.max_bounds)?;
        write_ivec3(w, self.local_origin)?;
        write_f32(w, self.radius)?;
        write_fixed_string(w, &self.name, FRAME_NAME_LEN)
    }
}

/// Named attachment point (112 bytes)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    pub name: String,
    pub origin: IVec3,
    pub axis: [IVec3; 3],
}

impl Tag {
    pub const SIZE: usize = MAX_QPATH + 4 * 12;

    pub fn read<R: Read>(r: &mut R) -> Result<Self> {
        Ok(Self {
            name: read_fixed_string(r, MAX_QPATH)?,
            origin: read_ivec3(r)?,
            axis: [read_ivec3(r)?, read_ivec3(r)?, read_ivec3(r)?],
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        write_fixed_string(w, &self.name, MAX_QPATH)?;
        write_ivec3(w, self.origin)?;
        for axis in self.axis {
            write_ivec3(w, axis)?;
        }
        Ok(())
    }
}
