use anyhow::{Context, Result};

/// Initialization parameters for the headless GPU context.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,

    /// Accept a software adapter (useful on CI machines without a GPU).
    pub force_fallback_adapter: bool,

    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

/// Owns the wgpu instance, adapter, device and queue.
///
/// No surface is created; rendering goes to offscreen textures made with
/// [`create_render_texture`](Self::create_render_texture).
pub struct GpuContext {
    // Kept alive for the adapter/device lifetime.
    _instance: wgpu::Instance,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl GpuContext {
    /// Color format of textures returned by `create_render_texture`.
    pub const RENDER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Acquires an adapter and device without a window.
    pub async fn headless(init: GpuInit) -> Result<Self> {
        let GpuInit {
            power_preference,
            force_fallback_adapter,
            required_features,
            required_limits,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("marduk-batch device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let info = adapter.get_info();
        log::info!("gpu: {} ({:?})", info.name, info.backend);

        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
        })
    }

    /// Blocking wrapper around [`headless`](Self::headless).
    pub fn headless_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::headless(init))
    }

    #[inline]
    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Creates an offscreen color target of `width`×`height` pixels.
    pub fn create_render_texture(&self, width: u32, height: u32) -> Result<(wgpu::Texture, wgpu::TextureView)> {
        anyhow::ensure!(width > 0 && height > 0, "render texture has zero size");

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("marduk-batch render texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::RENDER_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok((texture, view))
    }
}
