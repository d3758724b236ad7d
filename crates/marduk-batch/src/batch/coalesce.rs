use core::ops::Range;

use anyhow::Result;

use crate::geometry::{Chunk, PrimitiveKind, TextureId, Vertex};
use crate::render::{DrawCall, RenderStates, RenderTarget};

/// A maximal run of adjacent, mergeable chunks in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub texture: Option<TextureId>,
    pub kind: PrimitiveKind,
    /// Range into the merged vertex buffer.
    pub vertices: Range<usize>,
    /// Range into the merged index buffer; values are relative to `vertices.start`.
    pub indices: Range<usize>,
    /// Number of chunks merged into this run.
    pub chunks: usize,
}

/// Counters describing one flush.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FlushStats {
    pub draw_calls: usize,
    pub chunks: usize,
    pub vertices: usize,
    pub indices: usize,
}

/// Merges ordered chunks into runs and emits one draw call per run.
///
/// Buffers are reused across flushes; no state carries meaning between them.
#[derive(Debug, Default)]
pub(crate) struct Coalescer {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    runs: Vec<Run>,
    /// Texture of each run, in run order.
    textures: Vec<Option<TextureId>>,
}

impl Coalescer {
    /// Builds merged buffers and runs for `order`.
    ///
    /// Only strictly adjacent chunks merge; no regrouping happens here.
    pub(crate) fn prepare(
        &mut self,
        chunks: &[Chunk],
        order: &[usize],
        vertices: &[Vertex],
        indices: &[u32],
    ) {
        self.vertices.clear();
        self.indices.clear();
        self.runs.clear();
        self.textures.clear();

        let mut prev: Option<&Chunk> = None;
        for &i in order {
            let chunk = &chunks[i];

            let extend = prev.is_some_and(|p| p.mergeable_with(chunk));
            prev = Some(chunk);
            if !extend {
                self.textures.push(chunk.texture);
                self.runs.push(Run {
                    texture: chunk.texture,
                    kind: chunk.kind,
                    vertices: self.vertices.len()..self.vertices.len(),
                    indices: self.indices.len()..self.indices.len(),
                    chunks: 0,
                });
            }

            // Offset of this chunk's first vertex inside the run.
            let Some(run) = self.runs.last_mut() else { continue };
            let offset = (self.vertices.len() - run.vertices.start) as u32;

            self.vertices.extend_from_slice(&vertices[chunk.vertex_range()]);
            self.indices
                .extend(indices[chunk.index_range()].iter().map(|&ix| ix + offset));

            run.vertices.end = self.vertices.len();
            run.indices.end = self.indices.len();
            run.chunks += 1;
        }
    }

    #[inline]
    pub(crate) fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Textures the prepared runs will bind, one per run.
    #[inline]
    pub(crate) fn textures(&self) -> &[Option<TextureId>] {
        &self.textures
    }

    /// Issues one draw call per prepared run.
    pub(crate) fn emit<T: RenderTarget + ?Sized>(
        &self,
        target: &mut T,
        states: &RenderStates,
    ) -> Result<FlushStats> {
        let mut stats = FlushStats::default();

        for run in &self.runs {
            target.draw(&DrawCall {
                vertices: &self.vertices[run.vertices.clone()],
                indices: &self.indices[run.indices.clone()],
                kind: run.kind,
                texture: run.texture,
                states,
            })?;

            stats.draw_calls += 1;
            stats.chunks += run.chunks;
            stats.vertices += run.vertices.len();
            stats.indices += run.indices.len();
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::geometry::{ChunkKey, Depth};
    use crate::paint::Color;

    fn chunk(order: u32, texture: Option<TextureId>, kind: PrimitiveKind, v: Range<u32>, i: Range<u32>) -> Chunk {
        Chunk {
            key: ChunkKey::new(Depth::ZERO, order, 0),
            kind,
            texture,
            vertices: v,
            indices: i,
        }
    }

    fn verts(n: usize) -> Vec<Vertex> {
        (0..n)
            .map(|i| Vertex::colored(Vec2::new(i as f32, 0.0), Color::WHITE))
            .collect()
    }

    #[test]
    fn adjacent_same_texture_chunks_share_a_run_with_rebased_indices() {
        let t = Some(TextureId::allocate());
        let vertices = verts(6);
        let indices = vec![0, 1, 2, 0, 1, 2];
        let chunks = vec![
            chunk(0, t, PrimitiveKind::Triangles, 0..3, 0..3),
            chunk(1, t, PrimitiveKind::Triangles, 3..6, 3..6),
        ];

        let mut c = Coalescer::default();
        c.prepare(&chunks, &[0, 1], &vertices, &indices);

        assert_eq!(c.runs().len(), 1);
        assert_eq!(c.runs()[0].chunks, 2);
        assert_eq!(c.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn texture_or_kind_change_starts_a_new_run() {
        let a = Some(TextureId::allocate());
        let vertices = verts(9);
        let indices = vec![0, 1, 2, 0, 1, 2, 0, 1];
        let chunks = vec![
            chunk(0, a, PrimitiveKind::Triangles, 0..3, 0..3),
            chunk(1, None, PrimitiveKind::Triangles, 3..6, 3..6),
            chunk(2, None, PrimitiveKind::Lines, 6..8, 6..8),
        ];

        let mut c = Coalescer::default();
        c.prepare(&chunks, &[0, 1, 2], &vertices, &indices);

        let runs = c.runs();
        assert_eq!(runs.len(), 3);
        assert_eq!(c.textures(), &[a, None, None]);
        // Each run's indices are relative to its own vertex slice.
        assert_eq!(&c.indices[runs[1].indices.clone()], &[0, 1, 2]);
        assert_eq!(&c.indices[runs[2].indices.clone()], &[0, 1]);
    }

    #[test]
    fn non_adjacent_equal_textures_do_not_merge() {
        let a = Some(TextureId::allocate());
        let b = Some(TextureId::allocate());
        let vertices = verts(9);
        let indices = vec![0, 1, 2, 0, 1, 2, 0, 1, 2];
        let chunks = vec![
            chunk(0, a, PrimitiveKind::Triangles, 0..3, 0..3),
            chunk(1, b, PrimitiveKind::Triangles, 3..6, 3..6),
            chunk(2, a, PrimitiveKind::Triangles, 6..9, 6..9),
        ];

        let mut c = Coalescer::default();
        c.prepare(&chunks, &[0, 1, 2], &vertices, &indices);
        assert_eq!(c.runs().len(), 3);

        // A different order makes them adjacent.
        c.prepare(&chunks, &[0, 2, 1], &vertices, &indices);
        assert_eq!(c.runs().len(), 2);
        assert_eq!(c.runs()[0].chunks, 2);
    }

    #[test]
    fn empty_order_prepares_nothing() {
        let mut c = Coalescer::default();
        c.prepare(&[], &[], &[], &[]);
        assert!(c.runs().is_empty());
    }
}
