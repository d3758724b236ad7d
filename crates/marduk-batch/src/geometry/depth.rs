use core::cmp::Ordering;

/// Depth of a submission, used by [`BatchMode::DepthSort`](crate::batch::BatchMode).
///
/// Larger values are further from the viewer and are drawn first.
/// Numerically equal depths compare equal (`-0.0 == 0.0`); NaN falls back to
/// `f32::total_cmp` so it sorts deterministically instead of poisoning the sort.
#[derive(Debug, Copy, Clone, Default)]
pub struct Depth(pub f32);

impl Depth {
    pub const ZERO: Depth = Depth(0.0);

    #[inline]
    pub const fn new(v: f32) -> Self {
        Self(v)
    }
}

impl PartialEq for Depth {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Depth {}

impl Ord for Depth {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .partial_cmp(&other.0)
            .unwrap_or_else(|| self.0.total_cmp(&other.0))
    }
}

impl PartialOrd for Depth {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
