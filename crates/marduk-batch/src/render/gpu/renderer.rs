use std::collections::HashMap;
use std::ops::Range;

use anyhow::{Context, Result};

use crate::geometry::{PrimitiveKind, TextureId};
use crate::paint::Color;
use crate::render::BlendMode;

use super::common::{GpuVertex, ViewportUniform, blend_state, topology, viewport_ubo_min_binding_size};
use super::{GpuContext, GpuTextures};

/// One staged draw: an index range into the frame's index buffer.
#[derive(Debug, Clone)]
pub(super) struct StagedCall {
    pub kind: PrimitiveKind,
    pub blend: BlendMode,
    pub texture: Option<TextureId>,
    pub indices: Range<u32>,
    pub base_vertex: i32,
}

/// Everything one render pass needs.
pub(super) struct Frame<'a> {
    pub view: &'a wgpu::TextureView,
    pub size: (u32, u32),
    pub clear: Option<Color>,
    pub vertices: &'a [GpuVertex],
    pub indices: &'a [u32],
    pub calls: &'a [StagedCall],
}

/// Records batched geometry into a render pass.
///
/// Pipelines are created lazily per (primitive kind, blend mode). Vertex and
/// index buffers grow to the largest frame seen and are reused.
#[derive(Default)]
pub struct GpuBatchRenderer {
    pipelines: HashMap<(PrimitiveKind, BlendMode), wgpu::RenderPipeline>,
    pipeline_layout: Option<wgpu::PipelineLayout>,
    shader: Option<wgpu::ShaderModule>,

    viewport_ubo: Option<wgpu::Buffer>,
    viewport_bind_group: Option<wgpu::BindGroup>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
    ibo_capacity: usize,
}

impl GpuBatchRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads the frame once and records one `draw_indexed` per staged call.
    ///
    /// Returns the number of draw calls recorded.
    pub(super) fn render(&mut self, ctx: &GpuContext, textures: &GpuTextures, frame: &Frame<'_>) -> Result<usize> {
        self.ensure_bindings(ctx, textures);
        for call in frame.calls {
            self.ensure_pipeline(ctx, call.kind, call.blend);
        }
        self.write_viewport_uniform(ctx, frame.size);
        self.ensure_buffers(ctx, frame.vertices.len(), frame.indices.len());

        let vbo = self.vbo.as_ref().context("vertex buffer missing")?;
        let ibo = self.ibo.as_ref().context("index buffer missing")?;
        if !frame.vertices.is_empty() {
            ctx.queue().write_buffer(vbo, 0, bytemuck::cast_slice(frame.vertices));
        }
        if !frame.indices.is_empty() {
            ctx.queue().write_buffer(ibo, 0, bytemuck::cast_slice(frame.indices));
        }

        let viewport_bg = self.viewport_bind_group.as_ref().context("viewport bind group missing")?;

        let mut encoder = ctx.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("marduk-batch encoder"),
        });

        let load = match frame.clear {
            Some(c) => wgpu::LoadOp::Clear(wgpu::Color {
                r: c.r as f64,
                g: c.g as f64,
                b: c.b as f64,
                a: c.a as f64,
            }),
            None => wgpu::LoadOp::Load,
        };

        let mut draws = 0;
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("marduk-batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_bind_group(0, viewport_bg, &[]);
            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);

            for call in frame.calls {
                let pipeline = self
                    .pipelines
                    .get(&(call.kind, call.blend))
                    .context("pipeline missing")?;
                let bind_group = textures
                    .bind_group(call.texture)
                    .context("texture was not uploaded")?;

                // Each call binds its own state.
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(1, bind_group, &[]);
                rpass.draw_indexed(call.indices.clone(), call.base_vertex, 0..1);
                draws += 1;
            }
        }

        ctx.queue().submit(std::iter::once(encoder.finish()));
        Ok(draws)
    }

    // ── lazy-init helpers ──────────────────────────────────────────────────

    fn ensure_bindings(&mut self, ctx: &GpuContext, textures: &GpuTextures) {
        if self.viewport_bind_group.is_some() && self.pipeline_layout.is_some() {
            return;
        }
        let device = ctx.device();

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("marduk-batch viewport bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: viewport_ubo_min_binding_size(),
                },
                count: None,
            }],
        });

        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("marduk-batch viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("marduk-batch viewport bind group"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("marduk-batch pipeline layout"),
            bind_group_layouts: &[&bgl, textures.layout()],
            immediate_size: 0,
        });

        self.viewport_ubo = Some(ubo);
        self.viewport_bind_group = Some(bind_group);
        self.pipeline_layout = Some(pipeline_layout);
        self.pipelines.clear();
    }

    fn ensure_pipeline(&mut self, ctx: &GpuContext, kind: PrimitiveKind, blend: BlendMode) {
        if self.pipelines.contains_key(&(kind, blend)) {
            return;
        }
        let Some(layout) = self.pipeline_layout.as_ref() else { return };

        let shader = self.shader.get_or_insert_with(|| {
            ctx.device().create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("marduk-batch shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/batch.wgsl").into()),
            })
        });

        let pipeline = ctx.device().create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("marduk-batch pipeline"),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[GpuVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: GpuContext::RENDER_FORMAT,
                    blend: blend_state(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: topology(kind),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("created pipeline for {kind:?}/{blend:?}");
        self.pipelines.insert((kind, blend), pipeline);
    }

    fn write_viewport_uniform(&mut self, ctx: &GpuContext, size: (u32, u32)) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform {
            viewport: [(size.0 as f32).max(1.0), (size.1 as f32).max(1.0)],
            _pad: [0.0; 2],
        };
        ctx.queue().write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_buffers(&mut self, ctx: &GpuContext, vertices: usize, indices: usize) {
        if vertices > self.vbo_capacity || self.vbo.is_none() {
            let cap = vertices.next_power_of_two().max(256);
            self.vbo = Some(ctx.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("marduk-batch vbo"),
                size: (cap * std::mem::size_of::<GpuVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vbo_capacity = cap;
        }

        if indices > self.ibo_capacity || self.ibo.is_none() {
            let cap = indices.next_power_of_two().max(512);
            self.ibo = Some(ctx.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("marduk-batch ibo"),
                size: (cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.ibo_capacity = cap;
        }
    }
}
