//! Convex outline shapes: a filled fan plus an optional outline strip.

use crate::batch::GeometrySink;
use crate::coords::{Rect, Vec2};
use crate::geometry::{PrimitiveType, TextureId, Vertex};
use crate::paint::Color;

use super::Transformable;

/// Appearance shared by every [`Shape`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    /// Texture of the fill. The outline is never textured.
    pub texture: Option<TextureId>,
    /// Region of the texture (texels) stretched over the local bounds.
    pub texture_rect: Rect,
    pub fill_color: Color,
    pub outline_color: Color,
    /// Outline width in local units; `0` disables the outline. Positive
    /// values grow the shape outwards.
    pub outline_thickness: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            texture: None,
            texture_rect: Rect::default(),
            fill_color: Color::WHITE,
            outline_color: Color::WHITE,
            outline_thickness: 0.0,
        }
    }
}

/// A convex polygon described by its points in local coordinates.
///
/// Implementors get their geometry from [`push_shape`].
pub trait Shape {
    fn point_count(&self) -> usize;

    fn point(&self, index: usize) -> Vec2;

    fn style(&self) -> &ShapeStyle;

    fn transformable(&self) -> &Transformable;

    /// Bounds of the points, outline excluded.
    fn local_bounds(&self) -> Rect {
        Rect::bounding((0..self.point_count()).map(|i| self.point(i)))
    }
}

/// Pushes the fill (triangle fan) and, if any, the outline (triangle strip).
pub fn push_shape<S: Shape + ?Sized>(shape: &S, sink: &mut dyn GeometrySink) {
    let count = shape.point_count();
    if count < 3 {
        return;
    }

    let points: Vec<Vec2> = (0..count).map(|i| shape.point(i)).collect();
    let style = shape.style();
    let transform = shape.transformable().transform();

    let fill = fill_vertices(&points, style);
    sink.push(&fill, PrimitiveType::TriangleFan, style.texture, &transform);

    if style.outline_thickness != 0.0 {
        let center = fill[0].position;
        let outline = outline_vertices(&points, center, style);
        sink.push(&outline, PrimitiveType::TriangleStrip, None, &transform);
    }
}

/// Center, every point, then the first point again to close the fan.
fn fill_vertices(points: &[Vec2], style: &ShapeStyle) -> Vec<Vertex> {
    let bounds = Rect::bounding(points.iter().copied());
    let center = Vec2::new(
        bounds.origin.x + bounds.size.x / 2.0,
        bounds.origin.y + bounds.size.y / 2.0,
    );

    let tex = style.texture_rect;
    let tex_coords = |p: Vec2| {
        let rx = if bounds.size.x > 0.0 { (p.x - bounds.origin.x) / bounds.size.x } else { 0.0 };
        let ry = if bounds.size.y > 0.0 { (p.y - bounds.origin.y) / bounds.size.y } else { 0.0 };
        Vec2::new(tex.origin.x + tex.size.x * rx, tex.origin.y + tex.size.y * ry)
    };
    let vertex = |p: Vec2| Vertex::new(p, style.fill_color, tex_coords(p));

    let mut out = Vec::with_capacity(points.len() + 2);
    out.push(vertex(center));
    out.extend(points.iter().map(|&p| vertex(p)));
    out.push(vertex(points[0]));
    out
}

/// Inner/outer pairs around the polygon, closed by repeating the first pair.
fn outline_vertices(points: &[Vec2], center: Vec2, style: &ShapeStyle) -> Vec<Vertex> {
    let n = points.len();
    let mut out = Vec::with_capacity((n + 1) * 2);

    for i in 0..n {
        let p0 = points[(i + n - 1) % n];
        let p1 = points[i];
        let p2 = points[(i + 1) % n];

        let mut n1 = (p1 - p0).perp().normalized();
        let mut n2 = (p2 - p1).perp().normalized();

        // Face outwards whatever the winding.
        if n1.dot(center - p1) > 0.0 {
            n1 = -n1;
        }
        if n2.dot(center - p1) > 0.0 {
            n2 = -n2;
        }

        // Miter: offset along the averaged normal, lengthened at sharp corners.
        let factor = 1.0 + n1.dot(n2);
        let normal = if factor.abs() > f32::EPSILON { (n1 + n2) * (1.0 / factor) } else { n1 };

        out.push(Vertex::colored(p1, style.outline_color));
        out.push(Vertex::colored(p1 + normal * style.outline_thickness, style.outline_color));
    }

    out.push(out[0]);
    out.push(out[1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn fill_is_a_closed_fan_around_the_center() {
        let v = fill_vertices(&square(), &ShapeStyle::default());
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, Vec2::new(5.0, 5.0));
        assert_eq!(v[5].position, v[1].position);
    }

    #[test]
    fn fill_tex_coords_span_the_texture_rect() {
        let style = ShapeStyle {
            texture_rect: Rect::new(0.0, 0.0, 100.0, 50.0),
            ..ShapeStyle::default()
        };
        let v = fill_vertices(&square(), &style);
        assert_eq!(v[0].tex_coords, Vec2::new(50.0, 25.0));
        assert_eq!(v[3].tex_coords, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn outline_grows_outwards_with_miter() {
        let style = ShapeStyle { outline_thickness: 2.0, ..ShapeStyle::default() };
        let v = outline_vertices(&square(), Vec2::new(5.0, 5.0), &style);

        assert_eq!(v.len(), 10);
        assert_eq!(v[0].position, Vec2::new(0.0, 0.0));
        // Square corner: the miter reaches (-t, -t).
        assert!((v[1].position.x + 2.0).abs() < 1e-4);
        assert!((v[1].position.y + 2.0).abs() < 1e-4);
        assert_eq!(v[8], v[0]);
        assert_eq!(v[9], v[1]);
    }

    #[test]
    fn winding_does_not_flip_the_outline() {
        let style = ShapeStyle { outline_thickness: 1.0, ..ShapeStyle::default() };
        let mut reversed = square();
        reversed.reverse();
        let v = outline_vertices(&reversed, Vec2::new(5.0, 5.0), &style);
        // reversed[0] is (0, 10); its outer vertex sits below-left.
        assert!(v[1].position.x < 0.0);
        assert!(v[1].position.y > 10.0);
    }
}
