use anyhow::Result;

use crate::geometry::TextureId;
use crate::paint::Color;
use crate::render::{DrawCall, RenderTarget};

use super::common::GpuVertex;
use super::renderer::{Frame, StagedCall};
use super::{GpuBatchRenderer, GpuContext, GpuTextures};

/// `RenderTarget` that renders into a wgpu texture view.
///
/// `draw` only stages geometry on the CPU; [`finish`](Self::finish) uploads
/// everything in one go and records one `draw_indexed` per staged call, in
/// staging order.
pub struct GpuTarget<'a> {
    ctx: &'a GpuContext,
    renderer: &'a mut GpuBatchRenderer,
    textures: &'a GpuTextures,
    view: &'a wgpu::TextureView,
    size: (u32, u32),
    clear: Option<Color>,

    vertices: Vec<GpuVertex>,
    indices: Vec<u32>,
    calls: Vec<StagedCall>,
}

impl<'a> GpuTarget<'a> {
    pub fn new(
        ctx: &'a GpuContext,
        renderer: &'a mut GpuBatchRenderer,
        textures: &'a GpuTextures,
        view: &'a wgpu::TextureView,
        size: (u32, u32),
    ) -> Self {
        Self {
            ctx,
            renderer,
            textures,
            view,
            size,
            clear: None,
            vertices: Vec::new(),
            indices: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// Clears the view to `color` at the start of the render pass.
    pub fn with_clear(mut self, color: Color) -> Self {
        self.clear = Some(color);
        self
    }

    /// Draw calls staged so far.
    #[inline]
    pub fn staged_calls(&self) -> usize {
        self.calls.len()
    }

    /// Submits the staged calls; returns how many draw calls were recorded.
    pub fn finish(self) -> Result<usize> {
        if self.calls.is_empty() && self.clear.is_none() {
            return Ok(0);
        }

        let frame = Frame {
            view: self.view,
            size: self.size,
            clear: self.clear,
            vertices: &self.vertices,
            indices: &self.indices,
            calls: &self.calls,
        };
        let draws = self.renderer.render(self.ctx, self.textures, &frame)?;
        log::trace!(
            "gpu frame: {} draw calls, {} vertices, {} indices",
            draws,
            self.vertices.len(),
            self.indices.len()
        );
        Ok(draws)
    }
}

impl RenderTarget for GpuTarget<'_> {
    fn begin(&mut self, textures: &[Option<TextureId>]) -> Result<()> {
        anyhow::ensure!(self.size.0 > 0 && self.size.1 > 0, "gpu target has zero size");
        for &id in textures.iter().flatten() {
            anyhow::ensure!(self.textures.contains(id), "texture {} was not uploaded", id.raw());
        }
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall<'_>) -> Result<()> {
        if let Some(id) = call.texture {
            anyhow::ensure!(self.textures.contains(id), "texture {} was not uploaded", id.raw());
        }

        let base_vertex = i32::try_from(self.vertices.len())?;
        let first = u32::try_from(self.indices.len())?;
        let t = &call.states.transform;
        self.vertices
            .extend(call.vertices.iter().map(|v| GpuVertex::from(v.transformed(t))));
        self.indices.extend_from_slice(call.indices);
        let last = u32::try_from(self.indices.len())?;

        self.calls.push(StagedCall {
            kind: call.kind,
            blend: call.states.blend,
            texture: call.texture,
            indices: first..last,
            base_vertex,
        });
        Ok(())
    }
}
