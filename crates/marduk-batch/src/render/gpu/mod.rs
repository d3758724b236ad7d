//! wgpu render target.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.
//! - Texture coordinates are in texels and normalized in the fragment shader.
//! - Colors are linear premultiplied RGBA.

mod common;
mod context;
mod renderer;
mod target;
mod textures;

pub use context::{GpuContext, GpuInit};
pub use renderer::GpuBatchRenderer;
pub use target::GpuTarget;
pub use textures::GpuTextures;
