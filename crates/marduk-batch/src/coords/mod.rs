//! Coordinate and geometry types shared by the batch, its targets and shapes.
//!
//! Canonical CPU space:
//! - target pixels, origin top-left
//! - +X right, +Y down
//!
//! Transforms are baked into vertex positions when geometry is captured.

mod rect;
mod transform;
mod vec2;

pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
