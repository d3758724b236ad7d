//! Draw-call batching for 2D geometry.
//!
//! Drawables push their geometry into a [`SpriteBatch`](batch::SpriteBatch)
//! as chunks. On flush the batch orders the chunks according to its
//! [`BatchMode`](batch::BatchMode), merges adjacent chunks that share a
//! texture and primitive kind, and issues one draw call per merged run to a
//! [`RenderTarget`](render::RenderTarget).

pub mod batch;
pub mod coords;
pub mod geometry;
pub mod logging;
pub mod paint;
pub mod render;
pub mod shapes;
