//! GPU textures: uploaded scene images, the depth buffer and shadow maps.

use crate::gpu::pipeline_helpers::DEPTH_FORMAT;
use crate::scene::{Filter, Image, Wrap};

/// An uploaded [`Image`] with its sampler and material bind group.
pub struct GpuTexture {
    texture: wgpu::Texture,
    /// Bind group for the material texture slot (texture + sampler).
    pub bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

impl GpuTexture {
    /// Upload `image` as an sRGB texture and build its bind group against
    /// `layout`.
    #[must_use]
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        image: &Image,
        label: &str,
    ) -> Self {
        let size = (image.width(), image.height());
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let address_mode = match image.wrap {
            Wrap::Repeat => wgpu::AddressMode::Repeat,
            Wrap::Clamp => wgpu::AddressMode::ClampToEdge,
        };
        let filter = match image.filter {
            Filter::Linear => wgpu::FilterMode::Linear,
            Filter::Nearest => wgpu::FilterMode::Nearest,
        };
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let gpu = Self {
            texture,
            bind_group,
            size,
        };
        gpu.write(queue, image);
        gpu
    }

    /// Whether `image` can be written into this texture in place.
    #[must_use]
    pub fn fits(&self, image: &Image) -> bool {
        self.size == (image.width(), image.height())
    }

    /// Re-upload pixels of an image with the same dimensions.
    pub fn write(&self, queue: &wgpu::Queue, image: &Image) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.size.0),
                rows_per_image: Some(self.size.1),
            },
            extent(self.size),
        );
    }
}

/// Depth attachment for the main pass.
pub struct DepthTexture {
    /// Full-texture view.
    pub view: wgpu::TextureView,
}

impl DepthTexture {
    /// Depth buffer of the given size (clamped to at least 1x1).
    #[must_use]
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: extent((width.max(1), height.max(1))),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { view }
    }
}

/// Layered depth texture holding one shadow map per shadow-casting light.
pub struct ShadowMaps {
    /// One render-attachment view per layer.
    pub layer_views: Vec<wgpu::TextureView>,
    /// Array view sampled by the mesh shader.
    pub array_view: wgpu::TextureView,
    /// Edge length of each layer in texels.
    pub size: u32,
}

impl ShadowMaps {
    /// `layers` square depth maps of `size` texels.
    #[must_use]
    pub fn new(device: &wgpu::Device, size: u32, layers: u32) -> Self {
        let size = size.max(1);
        let layers = layers.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Maps"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let array_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Shadow Map Array"),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });
        let layer_views = (0..layers)
            .map(|layer| {
                texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some("Shadow Map Layer"),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    base_array_layer: layer,
                    array_layer_count: Some(1),
                    ..Default::default()
                })
            })
            .collect();
        Self {
            layer_views,
            array_view,
            size,
        }
    }
}

fn extent((width, height): (u32, u32)) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}
