use core::cmp::Ordering;

use super::Depth;

/// Identity and placement of a captured chunk.
///
/// Submission order (see [`ChunkKey::cmp_submission`]):
/// 1) `order`: ascending (one value per submitted entry)
/// 2) `sub`: ascending (push order within the entry)
///
/// Every sort strategy falls back to this order on ties, so chunks of the
/// same entry never swap.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ChunkKey {
    /// Depth of the owning entry.
    pub depth: Depth,
    /// Insertion index of the owning entry.
    pub order: u32,
    /// Position among the chunks pushed by the same entry.
    pub sub: u32,
}

impl ChunkKey {
    #[inline]
    pub const fn new(depth: Depth, order: u32, sub: u32) -> Self {
        Self { depth, order, sub }
    }

    /// Compares by submission order only, ignoring depth.
    #[inline]
    pub fn cmp_submission(&self, other: &Self) -> Ordering {
        match self.order.cmp(&other.order) {
            Ordering::Equal => self.sub.cmp(&other.sub),
            o => o,
        }
    }
}
