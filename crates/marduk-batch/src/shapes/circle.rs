use core::f32::consts::PI;

use crate::batch::{Batchable, GeometrySink};
use crate::coords::Vec2;

use super::{Shape, ShapeStyle, Transformable, push_shape};

/// Regular polygon inscribed in a circle.
///
/// Local bounds are `[0, 2r]²`; the first point is at the top. Three points
/// make a triangle, five a pentagon.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub radius: f32,
    pub point_count: usize,
    pub style: ShapeStyle,
    pub transform: Transformable,
}

impl CircleShape {
    pub const DEFAULT_POINT_COUNT: usize = 30;

    pub fn new(radius: f32) -> Self {
        Self::with_points(radius, Self::DEFAULT_POINT_COUNT)
    }

    pub fn with_points(radius: f32, point_count: usize) -> Self {
        Self {
            radius,
            point_count,
            style: ShapeStyle::default(),
            transform: Transformable::default(),
        }
    }
}

impl Shape for CircleShape {
    #[inline]
    fn point_count(&self) -> usize {
        self.point_count
    }

    fn point(&self, index: usize) -> Vec2 {
        let angle = index as f32 * 2.0 * PI / self.point_count as f32 - PI / 2.0;
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.radius + cos * self.radius, self.radius + sin * self.radius)
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

impl Batchable for CircleShape {
    fn batch(&self, sink: &mut dyn GeometrySink) {
        push_shape(self, sink);
    }
}
