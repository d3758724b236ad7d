use crate::batch::{Batchable, GeometrySink};
use crate::coords::{Rect, Vec2};
use crate::geometry::{PrimitiveType, TextureId, Vertex};
use crate::paint::Color;

use super::Transformable;

/// Textured quad showing `texture_rect` (texels) of `texture`.
///
/// The local size of the quad is the absolute size of the texture rect; a
/// negative width or height flips the image.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub texture: TextureId,
    pub texture_rect: Rect,
    pub color: Color,
    pub transform: Transformable,
}

impl Sprite {
    pub fn new(texture: TextureId, texture_rect: Rect) -> Self {
        Self {
            texture,
            texture_rect,
            color: Color::WHITE,
            transform: Transformable::default(),
        }
    }

    #[inline]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn with_transform(mut self, transform: Transformable) -> Self {
        self.transform = transform;
        self
    }

    /// Bounds before the transform is applied.
    pub fn local_bounds(&self) -> Rect {
        Rect::from_origin_size(Vec2::zero(), self.texture_rect.normalized().size)
    }

    /// Four vertices in strip order: top-left, bottom-left, top-right, bottom-right.
    fn vertices(&self) -> [Vertex; 4] {
        let Vec2 { x: w, y: h } = self.local_bounds().size;
        let r = self.texture_rect;
        let (left, top) = (r.origin.x, r.origin.y);
        let (right, bottom) = (left + r.size.x, top + r.size.y);

        [
            Vertex::new(Vec2::new(0.0, 0.0), self.color, Vec2::new(left, top)),
            Vertex::new(Vec2::new(0.0, h), self.color, Vec2::new(left, bottom)),
            Vertex::new(Vec2::new(w, 0.0), self.color, Vec2::new(right, top)),
            Vertex::new(Vec2::new(w, h), self.color, Vec2::new(right, bottom)),
        ]
    }
}

impl Batchable for Sprite {
    fn batch(&self, sink: &mut dyn GeometrySink) {
        sink.push(
            &self.vertices(),
            PrimitiveType::TriangleStrip,
            Some(self.texture),
            &self.transform.transform(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::SpriteBatch;

    #[test]
    fn sprite_is_one_textured_quad() {
        let tex = TextureId::allocate();
        let sprite = Sprite::new(tex, Rect::new(0.0, 0.0, 16.0, 8.0))
            .with_transform(Transformable::at(Vec2::new(10.0, 20.0)));

        let mut batch = SpriteBatch::new();
        batch.batch(&sprite);

        assert_eq!(batch.chunk_count(), 1);
        assert_eq!(batch.vertex_count(), 4);
        let chunk = &batch.chunks()[0];
        assert_eq!(chunk.texture, Some(tex));
        assert_eq!(chunk.index_count(), 6);

        let positions: Vec<Vec2> = batch.chunk_vertices(chunk).iter().map(|v| v.position).collect();
        assert_eq!(positions[0], Vec2::new(10.0, 20.0));
        assert_eq!(positions[3], Vec2::new(26.0, 28.0));
    }

    #[test]
    fn flipped_texture_rect_keeps_positive_size() {
        let sprite = Sprite::new(TextureId::allocate(), Rect::new(16.0, 0.0, -16.0, 8.0));
        assert_eq!(sprite.local_bounds(), Rect::new(0.0, 0.0, 16.0, 8.0));
        let v = sprite.vertices();
        assert_eq!(v[0].tex_coords, Vec2::new(16.0, 0.0));
        assert_eq!(v[3].tex_coords, Vec2::new(0.0, 8.0));
    }
}
