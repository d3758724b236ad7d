use std::collections::HashMap;

use anyhow::Result;
use image::RgbaImage;

use crate::geometry::TextureId;
use crate::render::canvas::{TextureStore, premultiply};

use super::GpuContext;

struct GpuTexture {
    // The bind group keeps the view alive; the texture is held so it is
    // released together with the entry.
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// GPU copies of batch textures, keyed by [`TextureId`].
///
/// Each texture carries its own bind group (group 1: texture + sampler).
/// Untextured draws bind a 1×1 opaque white texture.
pub struct GpuTextures {
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    textures: HashMap<TextureId, GpuTexture>,
}

impl GpuTextures {
    pub fn new(ctx: &GpuContext) -> Self {
        let device = ctx.device();

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("marduk-batch texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Nearest filtering matches the software canvas.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("marduk-batch sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let white_px = RgbaImage::from_pixel(1, 1, image::Rgba([255; 4]));
        let white = upload(ctx, &layout, &sampler, &white_px, "marduk-batch white texture");

        Self {
            layout,
            sampler,
            white,
            textures: HashMap::new(),
        }
    }

    /// Uploads every texture of `store` under the same ids.
    pub fn from_store(ctx: &GpuContext, store: &TextureStore) -> Self {
        let mut this = Self::new(ctx);
        for (id, image) in store.iter() {
            this.insert_premultiplied(ctx, id, image);
        }
        log::debug!("uploaded {} textures", this.len());
        this
    }

    /// Uploads a straight-alpha image and returns its new id.
    pub fn insert(&mut self, ctx: &GpuContext, mut image: RgbaImage) -> Result<TextureId> {
        anyhow::ensure!(image.width() > 0 && image.height() > 0, "texture has zero size");
        premultiply(&mut image);
        let id = TextureId::allocate();
        self.insert_premultiplied(ctx, id, &image);
        Ok(id)
    }

    /// Uploads premultiplied pixels under an existing id, replacing any
    /// previous texture with that id.
    pub fn insert_premultiplied(&mut self, ctx: &GpuContext, id: TextureId, image: &RgbaImage) {
        if image.width() == 0 || image.height() == 0 {
            log::warn!("skipping zero-size texture {}", id.raw());
            return;
        }
        let tex = upload(ctx, &self.layout, &self.sampler, image, "marduk-batch texture");
        self.textures.insert(id, tex);
    }

    #[inline]
    pub fn contains(&self, id: TextureId) -> bool {
        self.textures.contains_key(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub(super) fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    /// Bind group for `texture`; `None` resolves to the white texture.
    pub(super) fn bind_group(&self, texture: Option<TextureId>) -> Option<&wgpu::BindGroup> {
        match texture {
            None => Some(&self.white.bind_group),
            Some(id) => self.textures.get(&id).map(|t| &t.bind_group),
        }
    }
}

fn upload(
    ctx: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    image: &RgbaImage,
    label: &str,
) -> GpuTexture {
    let (w, h) = image.dimensions();
    let size = wgpu::Extent3d {
        width: w,
        height: h,
        depth_or_array_layers: 1,
    };

    let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue().write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * w),
            rows_per_image: Some(h),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuTexture {
        _texture: texture,
        bind_group,
    }
}
