//! Paint model shared by vertices and render targets.
//!
//! Colors are linear premultiplied RGBA. Targets blend with premultiplied
//! "source over" unless the render states ask otherwise.

pub mod color;

pub use color::Color;
