//! Frame-major vertex grid

use crate::error::{Md3Error, Result};
use crate::geometry::Vertex;

/// Vertices of one surface for every frame, stored frame-major
///
/// The shape (frames x vertices) is fixed at construction, so every row has
/// the same length. `vertices[frame * num_verts + vert]` is the layout used on
/// disk.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawVertexGrid"))]
pub struct VertexGrid {
    num_frames: usize,
    num_verts: usize,
    vertices: Vec<Vertex>,
}

impl VertexGrid {
    /// Create a grid of default (zeroed) vertices
    pub fn new(num_frames: usize, num_verts: usize) -> Self {
        Self {
            num_frames,
            num_verts,
            vertices: vec![Vertex::default(); num_frames * num_verts],
        }
    }

    /// Build a grid from per-frame rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<Vertex>>) -> Result<Self> {
        let num_frames = rows.len();
        let num_verts = rows.first().map_or(0, Vec::len);

        let mut vertices = Vec::with_capacity(num_frames * num_verts);
        for (row, frame) in rows.into_iter().enumerate() {
            if frame.len() != num_verts {
                return Err(Md3Error::RaggedVertexGrid {
                    row,
                    expected: num_verts,
                    found: frame.len(),
                });
            }
            vertices.extend(frame);
        }

        Ok(Self {
            num_frames,
            num_verts,
            vertices,
        })
    }

    /// Build a grid from a flat frame-major vertex list
    pub fn from_flat(num_frames: usize, num_verts: usize, vertices: Vec<Vertex>) -> Result<Self> {
        if vertices.len() != num_frames * num_verts {
            return Err(Md3Error::RaggedVertexGrid {
                row: vertices.len() / num_verts.max(1),
                expected: num_verts,
                found: vertices.len() % num_verts.max(1),
            });
        }
        Ok(Self {
            num_frames,
            num_verts,
            vertices,
        })
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn num_verts(&self) -> usize {
        self.num_verts
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All vertices of one frame
    pub fn row(&self, frame: usize) -> Option<&[Vertex]> {
        if frame >= self.num_frames {
            return None;
        }
        let start = frame * self.num_verts;
        self.vertices.get(start..start + self.num_verts)
    }

    pub fn row_mut(&mut self, frame: usize) -> Option<&mut [Vertex]> {
        if frame >= self.num_frames {
            return None;
        }
        let start = frame * self.num_verts;
        self.vertices.get_mut(start..start + self.num_verts)
    }

    pub fn get(&self, frame: usize, vert: usize) -> Option<&Vertex> {
        if vert >= self.num_verts {
            return None;
        }
        self.row(frame)?.get(vert)
    }

    pub fn get_mut(&mut self, frame: usize, vert: usize) -> Option<&mut Vertex> {
        if vert >= self.num_verts {
            return None;
        }
        self.row_mut(frame)?.get_mut(vert)
    }

    /// Iterate rows in frame order
    pub fn rows(&self) -> impl Iterator<Item = &[Vertex]> {
        (0..self.num_frames).filter_map(|frame| self.row(frame))
    }

    /// Flat frame-major view, in on-disk order
    pub fn as_slice(&self) -> &[Vertex] {
        &self.vertices
    }
}

/// Unchecked serde form; deserializing goes through [`VertexGrid::from_flat`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawVertexGrid {
    num_frames: usize,
    num_verts: usize,
    vertices: Vec<Vertex>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawVertexGrid> for VertexGrid {
    type Error = Md3Error;

    fn try_from(raw: RawVertexGrid) -> Result<Self> {
        Self::from_flat(raw.num_frames, raw.num_verts, raw.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{I16Vec3, Vec3};

    fn vertex(x: i16) -> Vertex {
        Vertex::new(I16Vec3::new(x, 0, 0), Vec3::Z)
    }

    #[test]
    fn test_from_rows() {
        let grid = VertexGrid::from_rows(vec![
            vec![vertex(1), vertex(2)],
            vec![vertex(3), vertex(4)],
            vec![vertex(5), vertex(6)],
        ])
        .unwrap();

        assert_eq!(grid.num_frames(), 3);
        assert_eq!(grid.num_verts(), 2);
        assert_eq!(grid.get(1, 1).unwrap().position.x, 4);
        assert_eq!(grid.row(2).unwrap()[0].position.x, 5);
        let flat: Vec<i16> = grid.as_slice().iter().map(|v| v.position.x).collect();
        assert_eq!(flat, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = VertexGrid::from_rows(vec![vec![vertex(1), vertex(2)], vec![vertex(3)]])
            .unwrap_err();
        assert!(matches!(
            err,
            Md3Error::RaggedVertexGrid {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_out_of_range_access() {
        let mut grid = VertexGrid::new(2, 3);
        assert!(grid.get(2, 0).is_none());
        assert!(grid.get(0, 3).is_none());
        assert!(grid.row(2).is_none());

        grid.get_mut(1, 2).unwrap().position.z = 9;
        assert_eq!(grid.row(1).unwrap()[2].position.z, 9);
        assert_eq!(grid.rows().count(), 2);
    }

    #[test]
    fn test_from_flat_checks_shape() {
        assert!(VertexGrid::from_flat(2, 2, vec![vertex(0); 4]).is_ok());
        assert!(VertexGrid::from_flat(2, 2, vec![vertex(0); 3]).is_err());
    }

    #[test]
    fn test_zero_verts_keeps_frame_count() {
        let grid = VertexGrid::new(4, 0);
        assert_eq!(grid.num_frames(), 4);
        assert!(grid.is_empty());
        assert_eq!(grid.rows().count(), 4);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_shape() {
        let err = serde_json::from_str::<VertexGrid>(
            r#"{"num_frames":2,"num_verts":3,"vertices":[]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("row 0"), "{err}");

        let grid = VertexGrid::from_rows(vec![vec![vertex(1), vertex(2)]; 3]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<VertexGrid>(&json).unwrap(), grid);
    }
}
