//! Render targets.
//!
//! A flush hands [`DrawCall`]s to a [`RenderTarget`]. Two targets ship with the
//! crate: the software [`Canvas`] and the wgpu-backed [`GpuTarget`].
//! [`draw_immediate`] is the unbatched path, one draw call per chunk.

pub mod canvas;
pub mod gpu;
mod immediate;
mod target;

pub use canvas::{Canvas, TextureStore};
pub use gpu::{GpuBatchRenderer, GpuContext, GpuInit, GpuTarget, GpuTextures};
pub use immediate::draw_immediate;
pub use target::{BlendMode, DrawCall, RenderStates, RenderTarget};
