//! GPU-side vertex layout, uniforms and blend states.

use bytemuck::{Pod, Zeroable};

use crate::geometry::{PrimitiveKind, Vertex};
use crate::render::BlendMode;

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn blend_state(mode: BlendMode) -> Option<wgpu::BlendState> {
    let over = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    let add = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    };

    match mode {
        BlendMode::Alpha => Some(wgpu::BlendState { color: over, alpha: over }),
        BlendMode::Add => Some(wgpu::BlendState { color: add, alpha: add }),
        BlendMode::None => None,
    }
}

// ── topology ──────────────────────────────────────────────────────────────

pub(super) fn topology(kind: PrimitiveKind) -> wgpu::PrimitiveTopology {
    match kind {
        PrimitiveKind::Points => wgpu::PrimitiveTopology::PointList,
        PrimitiveKind::Lines => wgpu::PrimitiveTopology::LineList,
        PrimitiveKind::Triangles => wgpu::PrimitiveTopology::TriangleList,
    }
}

// ── viewport uniform ──────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ViewportUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
}

pub(super) fn viewport_ubo_min_binding_size() -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(std::mem::size_of::<ViewportUniform>() as u64)
}

// ── vertex ────────────────────────────────────────────────────────────────

/// `Vertex` as uploaded: position in logical pixels, premultiplied color,
/// texture coordinates in texels.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct GpuVertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl From<Vertex> for GpuVertex {
    #[inline]
    fn from(v: Vertex) -> Self {
        Self {
            pos: [v.position.x, v.position.y],
            color: v.color.to_array(),
            uv: [v.tex_coords.x, v.tex_coords.y],
        }
    }
}

impl GpuVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // pos
        1 => Float32x4, // color
        2 => Float32x2  // uv
    ];

    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::Color;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<GpuVertex>(), 32);
        assert_eq!(std::mem::size_of::<ViewportUniform>(), 16);
    }

    #[test]
    fn vertex_conversion_keeps_premultiplied_color() {
        let v = Vertex::new(Vec2::new(1.0, 2.0), Color::from_straight(1.0, 0.0, 0.0, 0.5), Vec2::new(3.0, 4.0));
        let g = GpuVertex::from(v);
        assert_eq!(g.pos, [1.0, 2.0]);
        assert_eq!(g.color, [0.5, 0.0, 0.0, 0.5]);
        assert_eq!(g.uv, [3.0, 4.0]);
    }

    #[test]
    fn opaque_blend_disables_blending() {
        assert!(blend_state(BlendMode::None).is_none());
        assert!(blend_state(BlendMode::Alpha).is_some());
    }
}
