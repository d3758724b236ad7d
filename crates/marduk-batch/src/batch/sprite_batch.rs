use anyhow::Result;

use crate::coords::Transform;
use crate::geometry::{Chunk, Depth, PrimitiveType, TextureId, Vertex};
use crate::render::{RenderStates, RenderTarget};

use super::coalesce::{Coalescer, FlushStats, Run};
use super::sink::{Batchable, EntrySink, GeometrySink};
use super::BatchMode;

/// Construction parameters for [`SpriteBatch`].
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Mode used by flushes until [`SpriteBatch::set_mode`] changes it.
    pub mode: BatchMode,
    /// Vertices to reserve up front.
    pub vertex_capacity: usize,
    /// Chunks to reserve up front.
    pub chunk_capacity: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            mode: BatchMode::Deferred,
            vertex_capacity: 0,
            chunk_capacity: 0,
        }
    }
}

/// Accumulates drawable geometry and renders it with as few draw calls as the
/// active [`BatchMode`] allows.
///
/// Lifecycle:
/// - `batch*()` appends one entry per call (O(vertices))
/// - `flush()` sorts, merges and draws; the batch is left untouched, so a second
///   flush renders the same content again
/// - `clear()` empties the batch and restarts insertion numbering
///
/// Sort and merge buffers are owned by the batch and reused across frames; no
/// per-frame allocation once warmed.
#[derive(Debug, Default)]
pub struct SpriteBatch {
    mode: BatchMode,

    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    chunks: Vec<Chunk>,
    next_order: u32,

    draw_order: Vec<usize>,
    order_dirty: bool,

    coalescer: Coalescer,
}

impl SpriteBatch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BatchConfig) -> Self {
        Self {
            mode: config.mode,
            vertices: Vec::with_capacity(config.vertex_capacity),
            chunks: Vec::with_capacity(config.chunk_capacity),
            draw_order: Vec::with_capacity(config.chunk_capacity),
            ..Self::default()
        }
    }

    #[inline]
    pub fn mode(&self) -> BatchMode {
        self.mode
    }

    /// Sets the mode used by the next flush. Stored entries are not touched.
    #[inline]
    pub fn set_mode(&mut self, mode: BatchMode) {
        if self.mode != mode {
            self.mode = mode;
            self.order_dirty = true;
        }
    }

    /// Batches `drawable` at depth 0.
    #[inline]
    pub fn batch<B: Batchable + ?Sized>(&mut self, drawable: &B) {
        self.batch_at(drawable, 0.0);
    }

    /// Batches `drawable` at `depth` (only meaningful for [`BatchMode::DepthSort`]).
    pub fn batch_at<B: Batchable + ?Sized>(&mut self, drawable: &B, depth: f32) {
        let order = self.next_entry();
        let mut sink = self.entry_sink(Depth::new(depth), order);
        drawable.batch(&mut sink);
    }

    /// Batches raw geometry as its own entry.
    ///
    /// `transform` is applied to the positions now; later changes to the
    /// caller's data have no effect on the batch.
    pub fn batch_vertices(
        &mut self,
        vertices: &[Vertex],
        primitive: PrimitiveType,
        texture: Option<TextureId>,
        transform: &Transform,
        depth: f32,
    ) {
        let order = self.next_entry();
        self.entry_sink(Depth::new(depth), order)
            .push(vertices, primitive, texture, transform);
    }

    /// Removes every entry and restarts insertion numbering at zero.
    ///
    /// Keeps allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.chunks.clear();
        self.next_order = 0;
        self.draw_order.clear();
        self.order_dirty = true;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of submissions since the last clear, including ones that
    /// produced no geometry.
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.next_order as usize
    }

    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Chunks in submission order.
    #[inline]
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Captured vertices of `chunk` (positions already transformed).
    #[inline]
    pub fn chunk_vertices(&self, chunk: &Chunk) -> &[Vertex] {
        &self.vertices[chunk.vertex_range()]
    }

    /// Returns indices into [`chunks`](Self::chunks) in draw order for the
    /// current mode.
    pub fn draw_order(&mut self) -> &[usize] {
        if self.order_dirty {
            self.rebuild_draw_order();
        }
        &self.draw_order
    }

    /// Iterates chunks in draw order without copying geometry.
    pub fn iter_in_draw_order(&mut self) -> impl Iterator<Item = &Chunk> {
        if self.order_dirty {
            self.rebuild_draw_order();
        }

        self.draw_order.iter().map(|&i| &self.chunks[i])
    }

    /// Merged runs the next flush would emit, in order.
    pub fn runs(&mut self) -> &[Run] {
        self.prepare();
        self.coalescer.runs()
    }

    /// Renders every batched chunk to `target`.
    ///
    /// All merging happens before the target is touched. The target then sees
    /// every texture the flush will bind through [`RenderTarget::begin`]; if
    /// that fails, no draw call is issued and the error is returned as is. An empty batch does not touch the target at all.
    pub fn flush<T: RenderTarget + ?Sized>(
        &mut self,
        target: &mut T,
        states: &RenderStates,
    ) -> Result<FlushStats> {
        if self.chunks.is_empty() {
            return Ok(FlushStats::default());
        }

        self.prepare();
        target.begin(self.coalescer.textures())?;
        let stats = self.coalescer.emit(target, states)?;

        log::trace!(
            "SpriteBatch flush: mode={} chunks={} draw_calls={} vertices={}",
            self.mode,
            stats.chunks,
            stats.draw_calls,
            stats.vertices
        );

        Ok(stats)
    }

    fn prepare(&mut self) {
        if self.order_dirty {
            self.rebuild_draw_order();
        }
        self.coalescer
            .prepare(&self.chunks, &self.draw_order, &self.vertices, &self.indices);
    }

    fn next_entry(&mut self) -> u32 {
        let order = self.next_order;
        match self.next_order.checked_add(1) {
            Some(next) => self.next_order = next,
            // Sorting is stable over submission order, so entries sharing the
            // last order value still draw in the order they were batched.
            None => log::warn!("SpriteBatch: entry counter saturated at {order}"),
        }
        self.order_dirty = true;
        order
    }

    fn entry_sink(&mut self, depth: Depth, order: u32) -> EntrySink<'_> {
        EntrySink {
            vertices: &mut self.vertices,
            indices: &mut self.indices,
            chunks: &mut self.chunks,
            depth,
            order,
            next_sub: 0,
        }
    }

    fn rebuild_draw_order(&mut self) {
        self.draw_order.clear();
        self.draw_order.extend(0..self.chunks.len());

        self.mode.strategy().sort(&self.chunks, &mut self.draw_order);

        self.order_dirty = false;
    }
}
