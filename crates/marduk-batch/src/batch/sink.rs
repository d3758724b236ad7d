use core::ops::Range;

use crate::coords::Transform;
use crate::geometry::{Chunk, ChunkKey, Depth, PrimitiveType, TextureId, Vertex};

/// Receiver for the geometry of one drawable.
///
/// A drawable pushes one chunk per texture/topology it would otherwise render
/// with (e.g. a filled body, then an untextured outline). `transform` is baked
/// into the positions by the sink.
pub trait GeometrySink {
    fn push(
        &mut self,
        vertices: &[Vertex],
        primitive: PrimitiveType,
        texture: Option<TextureId>,
        transform: &Transform,
    );
}

/// Something that can describe itself as geometry chunks.
///
/// The same implementation serves both the batched path
/// ([`SpriteBatch::batch`](super::SpriteBatch::batch)) and the immediate path
/// ([`draw_immediate`](crate::render::draw_immediate)).
pub trait Batchable {
    fn batch(&self, sink: &mut dyn GeometrySink);
}

impl<F> Batchable for F
where
    F: Fn(&mut dyn GeometrySink),
{
    #[inline]
    fn batch(&self, sink: &mut dyn GeometrySink) {
        self(sink)
    }
}

/// Sink bound to a single entry of a [`SpriteBatch`](super::SpriteBatch).
///
/// Copies every pushed vertex into the batch arenas; nothing is borrowed from
/// the drawable past the call.
pub(crate) struct EntrySink<'a> {
    pub(crate) vertices: &'a mut Vec<Vertex>,
    pub(crate) indices: &'a mut Vec<u32>,
    pub(crate) chunks: &'a mut Vec<Chunk>,
    pub(crate) depth: Depth,
    pub(crate) order: u32,
    pub(crate) next_sub: u32,
}

impl GeometrySink for EntrySink<'_> {
    fn push(
        &mut self,
        vertices: &[Vertex],
        primitive: PrimitiveType,
        texture: Option<TextureId>,
        transform: &Transform,
    ) {
        let Ok(count) = u32::try_from(vertices.len()) else {
            log::warn!("EntrySink: chunk of {} vertices exceeds u32 range; dropped", vertices.len());
            return;
        };

        let index_start = self.indices.len();
        let written = primitive.write_list_indices(count, 0, self.indices);
        if written == 0 {
            log::debug!("EntrySink: {primitive:?} chunk with {count} vertices forms no primitive; dropped");
            return;
        }

        let vertex_start = self.vertices.len();
        if transform.is_identity() {
            self.vertices.extend_from_slice(vertices);
        } else {
            self.vertices.extend(vertices.iter().map(|v| v.transformed(transform)));
        }

        let (Some(vertex_range), Some(index_range)) = (
            arena_range(vertex_start, self.vertices.len()),
            arena_range(index_start, self.indices.len()),
        ) else {
            log::warn!("EntrySink: batch arenas exceed u32 range; chunk dropped");
            self.vertices.truncate(vertex_start);
            self.indices.truncate(index_start);
            return;
        };

        self.chunks.push(Chunk {
            key: ChunkKey::new(self.depth, self.order, self.next_sub),
            kind: primitive.kind(),
            texture,
            vertices: vertex_range,
            indices: index_range,
        });
        self.next_sub = self.next_sub.saturating_add(1);
    }
}

/// `start..end` as `u32` offsets, or `None` once the arena outgrows them.
#[inline]
fn arena_range(start: usize, end: usize) -> Option<Range<u32>> {
    Some(u32::try_from(start).ok()?..u32::try_from(end).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_range_fits_u32() {
        assert_eq!(arena_range(3, 9), Some(3..9));
        assert_eq!(arena_range(0, u32::MAX as usize), Some(0..u32::MAX));
    }

    #[test]
    fn arena_range_past_u32_is_rejected() {
        let past = u32::MAX as usize + 1;
        assert_eq!(arena_range(0, past), None);
        assert_eq!(arena_range(past, past + 3), None);
    }
}
