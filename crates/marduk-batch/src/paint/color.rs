/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
///
/// Vertex colors and texels are combined by component-wise multiplication,
/// which keeps the result premultiplied.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color = Color::from_premul(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::from_premul(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::from_premul(0.0, 0.0, 1.0, 1.0);

    /// Creates a premultiplied color from straight bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: (r.clamp(0.0, 1.0)) * a,
            g: (g.clamp(0.0, 1.0)) * a,
            b: (b.clamp(0.0, 1.0)) * a,
            a,
        }
    }

    /// Reads a premultiplied texel stored as RGBA8 bytes.
    #[inline]
    pub fn from_premul_u8(px: [u8; 4]) -> Self {
        Self::from_premul(
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        )
    }

    /// Encodes to premultiplied RGBA8 bytes (round to nearest).
    #[inline]
    pub fn to_premul_u8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Component-wise product (vertex color × texel).
    #[inline]
    pub fn modulate(self, other: Color) -> Self {
        Self::from_premul(self.r * other.r, self.g * other.g, self.b * other.b, self.a * other.a)
    }

    /// Returns a straight-alpha representation.
    ///
    /// For `a == 0`, RGB is returned as 0.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_is_premultiplied() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 0.5);
        assert_eq!(c, Color::from_premul(0.5, 0.25, 0.0, 0.5));
        assert_eq!(c.to_straight(), (1.0, 0.5, 0.0, 0.5));
    }

    #[test]
    fn bytes_round_trip_for_opaque_primaries() {
        for c in [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE, Color::BLACK] {
            assert_eq!(Color::from_premul_u8(c.to_premul_u8()), c);
        }
    }

    #[test]
    fn modulate_with_white_is_identity() {
        let c = Color::from_srgb_u8(10, 20, 30, 255);
        assert_eq!(c.modulate(Color::WHITE), c);
    }
}
