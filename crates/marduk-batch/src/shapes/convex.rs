use crate::batch::{Batchable, GeometrySink};
use crate::coords::Vec2;

use super::{Shape, ShapeStyle, Transformable, push_shape};

/// Convex polygon with caller-provided points.
///
/// Points must describe a convex polygon in order (either winding); concave
/// input renders with artifacts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvexShape {
    pub points: Vec<Vec2>,
    pub style: ShapeStyle,
    pub transform: Transformable,
}

impl ConvexShape {
    pub fn new(points: impl IntoIterator<Item = Vec2>) -> Self {
        Self {
            points: points.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Shape for ConvexShape {
    #[inline]
    fn point_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    fn point(&self, index: usize) -> Vec2 {
        self.points[index]
    }

    #[inline]
    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    #[inline]
    fn transformable(&self) -> &Transformable {
        &self.transform
    }
}

impl Batchable for ConvexShape {
    fn batch(&self, sink: &mut dyn GeometrySink) {
        push_shape(self, sink);
    }
}
