use core::fmt;

use crate::geometry::Chunk;

/// Reordering policy applied when a batch is flushed.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BatchMode {
    /// Submission order. Adjacent chunks sharing a texture still merge.
    ///
    /// Renders exactly like drawing every drawable directly, in order.
    #[default]
    Deferred,

    /// Groups chunks by texture, keeping submission order within a group.
    ///
    /// Correct when differently-textured drawables do not overlap.
    TextureSort,

    /// Draws larger depths first (back to front), submission order on ties.
    ///
    /// With every depth left at 0 this is identical to `Deferred`.
    DepthSort,
}

impl BatchMode {
    pub const ALL: [BatchMode; 3] = [BatchMode::Deferred, BatchMode::TextureSort, BatchMode::DepthSort];

    /// Strategy implementing this mode.
    pub fn strategy(self) -> &'static dyn SortStrategy {
        match self {
            BatchMode::Deferred => &Deferred,
            BatchMode::TextureSort => &TextureSort,
            BatchMode::DepthSort => &DepthSort,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BatchMode::Deferred => "Deferred",
            BatchMode::TextureSort => "TextureSort",
            BatchMode::DepthSort => "DepthSort",
        }
    }
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Computes a draw order over captured chunks.
///
/// `order` arrives holding `0..chunks.len()` (submission order) and must leave
/// holding a permutation of it. Chunks themselves are never touched.
pub trait SortStrategy {
    fn sort(&self, chunks: &[Chunk], order: &mut [usize]);
}

/// Identity order.
#[derive(Debug, Copy, Clone, Default)]
pub struct Deferred;

/// Stable grouping by texture identity, untextured chunks first.
#[derive(Debug, Copy, Clone, Default)]
pub struct TextureSort;

/// Stable ordering by descending depth.
#[derive(Debug, Copy, Clone, Default)]
pub struct DepthSort;

impl SortStrategy for Deferred {
    #[inline]
    fn sort(&self, _chunks: &[Chunk], _order: &mut [usize]) {}
}

impl SortStrategy for TextureSort {
    fn sort(&self, chunks: &[Chunk], order: &mut [usize]) {
        order.sort_by(|&a, &b| {
            let (a, b) = (&chunks[a], &chunks[b]);
            a.texture
                .cmp(&b.texture)
                .then_with(|| a.key.cmp_submission(&b.key))
        });
    }
}

impl SortStrategy for DepthSort {
    fn sort(&self, chunks: &[Chunk], order: &mut [usize]) {
        order.sort_by(|&a, &b| {
            let (a, b) = (&chunks[a], &chunks[b]);
            b.key
                .depth
                .cmp(&a.key.depth)
                .then_with(|| a.key.cmp_submission(&b.key))
        });
    }
}
