//! Ready-made drawables.
//!
//! Each implements [`Batchable`](crate::batch::Batchable), so it can be
//! batched or drawn immediately.

mod circle;
mod convex;
mod shape;
mod sprite;
mod transformable;

pub use circle::CircleShape;
pub use convex::ConvexShape;
pub use shape::{Shape, ShapeStyle, push_shape};
pub use sprite::Sprite;
pub use transformable::Transformable;
