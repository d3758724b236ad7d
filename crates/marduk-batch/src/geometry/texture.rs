use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity of a texture.
///
/// Two chunks are texture-equal iff both have no texture or both carry the same
/// `TextureId`. Ids are unique per process, so textures owned by different
/// stores never alias. The numeric order carries no meaning beyond giving
/// texture sorting a fixed total order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TextureId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl TextureId {
    /// Allocates a fresh id.
    ///
    /// Texture owners (`TextureStore`, `GpuTextures`) call this once per texture.
    pub fn allocate() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocated_ids_are_distinct_and_increasing() {
        let a = TextureId::allocate();
        let b = TextureId::allocate();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn none_sorts_before_any_texture() {
        let t = Some(TextureId::allocate());
        assert!(None < t);
    }
}
