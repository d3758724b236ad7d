use core::ops::Mul;

use super::Vec2;

/// 2D affine transform.
///
/// Stored column-major as the upper two rows of a 3×3 matrix:
///
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// | 0  0  1  |
/// ```
///
/// `lhs * rhs` applies `rhs` first, then `lhs`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 };

    #[inline]
    pub const fn translation(offset: Vec2) -> Self {
        Transform { tx: offset.x, ty: offset.y, ..Self::IDENTITY }
    }

    #[inline]
    pub const fn scaling(factors: Vec2) -> Self {
        Transform { a: factors.x, d: factors.y, ..Self::IDENTITY }
    }

    /// Clockwise rotation in degrees (+Y down).
    #[inline]
    pub fn rotation(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Transform { a: cos, b: sin, c: -sin, d: cos, tx: 0.0, ty: 0.0 }
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform {
            a: self.a * rhs.a + self.c * rhs.b,
            b: self.b * rhs.a + self.d * rhs.b,
            c: self.a * rhs.c + self.c * rhs.d,
            d: self.b * rhs.c + self.d * rhs.d,
            tx: self.a * rhs.tx + self.c * rhs.ty + self.tx,
            ty: self.b * rhs.tx + self.d * rhs.ty + self.ty,
        }
    }
}

impl Mul<Vec2> for Transform {
    type Output = Vec2;

    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        self.transform_point(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn identity_leaves_points_alone() {
        let p = Vec2::new(3.0, -7.5);
        assert_eq!(Transform::IDENTITY * p, p);
        assert!(Transform::default().is_identity());
    }

    #[test]
    fn rhs_is_applied_first() {
        let t = Transform::translation(Vec2::new(10.0, 0.0)) * Transform::scaling(Vec2::new(2.0, 2.0));
        assert!(close(t * Vec2::new(1.0, 1.0), Vec2::new(12.0, 2.0)));

        let t = Transform::scaling(Vec2::new(2.0, 2.0)) * Transform::translation(Vec2::new(10.0, 0.0));
        assert!(close(t * Vec2::new(1.0, 1.0), Vec2::new(22.0, 2.0)));
    }

    #[test]
    fn rotation_is_clockwise_on_screen() {
        let t = Transform::rotation(90.0);
        assert!(close(t * Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)));
    }
}
