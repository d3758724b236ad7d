use crate::coords::{Transform, Vec2};

/// Position, rotation, scale and origin of a drawable.
///
/// The origin is the local point that `position` refers to and that rotation
/// and scale pivot around.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transformable {
    pub position: Vec2,
    /// Degrees, clockwise on screen.
    pub rotation: f32,
    pub scale: Vec2,
    pub origin: Vec2,
}

impl Default for Transformable {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            origin: Vec2::zero(),
        }
    }
}

impl Transformable {
    #[inline]
    pub fn at(position: Vec2) -> Self {
        Self { position, ..Self::default() }
    }

    #[inline]
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    #[inline]
    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    #[inline]
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    /// Moves the drawable by `offset`.
    #[inline]
    pub fn translate(&mut self, offset: Vec2) {
        self.position = self.position + offset;
    }

    /// Local-to-target transform: `-origin`, then scale, rotation, `position`.
    pub fn transform(&self) -> Transform {
        Transform::translation(self.position)
            * Transform::rotation(self.rotation)
            * Transform::scaling(self.scale)
            * Transform::translation(-self.origin)
    }
}
