use super::Vec2;

/// Axis-aligned rectangle (top-left origin).
///
/// Used both in target pixels (shape bounds) and in texels (texture sub-rects).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Smallest rect enclosing all `points`. Empty input yields `Rect::default()`.
    pub fn bounding<I: IntoIterator<Item = Vec2>>(points: I) -> Self {
        let mut it = points.into_iter();
        let Some(first) = it.next() else {
            return Rect::default();
        };

        let (mut min, mut max) = (first, first);
        for p in it {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        Rect::from_origin_size(min, max - min)
    }

    /// Normalizes the rectangle so width/height are non-negative.
    ///
    /// Texture rects may be flipped on purpose (negative size); geometry uses
    /// the normalized form.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_positive_is_identity() {
        let rect = r(1.0, 2.0, 10.0, 20.0);
        assert_eq!(rect.normalized(), rect);
    }

    #[test]
    fn normalized_flipped_texture_rect() {
        let n = r(10.0, 10.0, -4.0, -3.0).normalized();
        assert_eq!(n, r(6.0, 7.0, 4.0, 3.0));
    }

    // ── bounding ──────────────────────────────────────────────────────────

    #[test]
    fn bounding_of_points() {
        let b = Rect::bounding([
            Vec2::new(3.0, 1.0),
            Vec2::new(-2.0, 4.0),
            Vec2::new(5.0, -1.0),
        ]);
        assert_eq!(b, r(-2.0, -1.0, 7.0, 5.0));
    }

    #[test]
    fn bounding_of_nothing_is_default() {
        assert_eq!(Rect::bounding(std::iter::empty()), Rect::default());
    }
}
