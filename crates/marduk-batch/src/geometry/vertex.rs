use crate::coords::{Transform, Vec2};
use crate::paint::Color;

/// A single vertex: position, color and texture coordinates.
///
/// `tex_coords` are in texels of the bound texture and are ignored when the
/// chunk has no texture.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec2,
    pub color: Color,
    pub tex_coords: Vec2,
}

impl Vertex {
    #[inline]
    pub const fn new(position: Vec2, color: Color, tex_coords: Vec2) -> Self {
        Self { position, color, tex_coords }
    }

    /// Untextured vertex.
    #[inline]
    pub const fn colored(position: Vec2, color: Color) -> Self {
        Self::new(position, color, Vec2::zero())
    }

    #[inline]
    pub fn transformed(self, t: &Transform) -> Self {
        Self { position: t.transform_point(self.position), ..self }
    }
}

/// Topology of a vertex sequence as a drawable pushes it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveType {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// List topology of captured geometry.
///
/// Strips and fans are expanded at capture time, so any two chunks of the same
/// kind can be concatenated into one draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
    Points,
    Lines,
    Triangles,
}

impl PrimitiveType {
    #[inline]
    pub const fn kind(self) -> PrimitiveKind {
        match self {
            PrimitiveType::Points => PrimitiveKind::Points,
            PrimitiveType::Lines | PrimitiveType::LineStrip => PrimitiveKind::Lines,
            PrimitiveType::Triangles | PrimitiveType::TriangleStrip | PrimitiveType::TriangleFan => {
                PrimitiveKind::Triangles
            }
        }
    }

    /// Appends list indices for `count` vertices to `out`, offset by `base`.
    ///
    /// Trailing vertices that do not complete a primitive are skipped.
    /// Returns the number of indices written.
    pub fn write_list_indices(self, count: u32, base: u32, out: &mut Vec<u32>) -> usize {
        let start = out.len();

        match self {
            PrimitiveType::Points => out.extend((0..count).map(|i| base + i)),
            PrimitiveType::Lines => out.extend((0..count / 2 * 2).map(|i| base + i)),
            PrimitiveType::Triangles => out.extend((0..count / 3 * 3).map(|i| base + i)),
            PrimitiveType::LineStrip => {
                for i in 1..count {
                    out.extend_from_slice(&[base + i - 1, base + i]);
                }
            }
            PrimitiveType::TriangleStrip => {
                for i in 2..count {
                    out.extend_from_slice(&[base + i - 2, base + i - 1, base + i]);
                }
            }
            PrimitiveType::TriangleFan => {
                for i in 2..count {
                    out.extend_from_slice(&[base, base + i - 1, base + i]);
                }
            }
        }

        out.len() - start
    }
}

impl PrimitiveKind {
    /// Indices per primitive.
    #[inline]
    pub const fn arity(self) -> usize {
        match self {
            PrimitiveKind::Points => 1,
            PrimitiveKind::Lines => 2,
            PrimitiveKind::Triangles => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(p: PrimitiveType, count: u32, base: u32) -> Vec<u32> {
        let mut out = Vec::new();
        p.write_list_indices(count, base, &mut out);
        out
    }

    #[test]
    fn triangle_list_drops_incomplete_tail() {
        assert_eq!(indices(PrimitiveType::Triangles, 7, 0), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn strip_expands_to_overlapping_triangles() {
        assert_eq!(
            indices(PrimitiveType::TriangleStrip, 5, 10),
            vec![10, 11, 12, 11, 12, 13, 12, 13, 14]
        );
    }

    #[test]
    fn fan_pivots_on_first_vertex() {
        assert_eq!(indices(PrimitiveType::TriangleFan, 5, 0), vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn line_strip_expands_to_segments() {
        assert_eq!(indices(PrimitiveType::LineStrip, 3, 0), vec![0, 1, 1, 2]);
    }

    #[test]
    fn too_few_vertices_yield_nothing() {
        assert!(indices(PrimitiveType::TriangleFan, 2, 0).is_empty());
        assert!(indices(PrimitiveType::Lines, 1, 0).is_empty());
        assert!(indices(PrimitiveType::Points, 0, 0).is_empty());
    }

    #[test]
    fn kinds_group_strips_with_lists() {
        assert_eq!(PrimitiveType::TriangleStrip.kind(), PrimitiveType::Triangles.kind());
        assert_eq!(PrimitiveType::LineStrip.kind(), PrimitiveKind::Lines);
        assert_eq!(PrimitiveKind::Triangles.arity(), 3);
    }
}
