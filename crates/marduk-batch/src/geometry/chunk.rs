use core::ops::Range;

use super::{ChunkKey, PrimitiveKind, TextureId};

/// A captured piece of geometry: one texture, one list topology.
///
/// Vertex and index data live in the owning batch's arenas; a chunk only holds
/// ranges into them. Indices are local to the chunk (0 is its first vertex).
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub key: ChunkKey,
    pub kind: PrimitiveKind,
    pub texture: Option<TextureId>,
    pub(crate) vertices: Range<u32>,
    pub(crate) indices: Range<u32>,
}

impl Chunk {
    #[inline]
    pub fn vertex_range(&self) -> Range<usize> {
        self.vertices.start as usize..self.vertices.end as usize
    }

    #[inline]
    pub fn index_range(&self) -> Range<usize> {
        self.indices.start as usize..self.indices.end as usize
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if both chunks can share one draw call.
    #[inline]
    pub fn mergeable_with(&self, other: &Chunk) -> bool {
        self.texture == other.texture && self.kind == other.kind
    }
}
