//! Forward renderer for a [`Scene`].
//!
//! A frame is two calls: [`SceneRenderer::prepare`] syncs GPU caches with
//! the scene and writes all uniforms, then [`SceneRenderer::render`]
//! encodes the shadow pass followed by the main pass.

pub mod draw_list;
pub mod pipelines;
pub mod uniforms;
pub mod vertex;

use std::num::NonZeroU64;
use std::sync::Arc;

use bytemuck::Zeroable as _;
use rustc_hash::{FxHashMap, FxHashSet};
use wgpu::util::DeviceExt;

use self::draw_list::{DrawList, DrawSettings, DrawSource};
use self::pipelines::{PipelineCache, PipelineLayouts};
use self::uniforms::{
    FrameUniforms, LightSet, ObjectUniforms, ShadowUniforms, MAX_SHADOW_LAYERS, UNIFORM_STRIDE,
};
use crate::camera::Camera;
use crate::gpu::dynamic_buffer::DynamicBuffer;
use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderError;
use crate::gpu::texture::{DepthTexture, GpuTexture, ShadowMaps};
use crate::options::RenderOptions;
use crate::scene::{Image, NodeId, NodeKind, Scene, TextureId};

/// Vertex and index buffers of a mesh node.
struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    stamp: (u64, usize),
}

/// Vertex buffer of a line list (lines node or wireframe edges).
struct GpuLines {
    vertices: wgpu::Buffer,
    count: u32,
    stamp: (u64, usize),
}

struct CachedTexture {
    gpu: GpuTexture,
    revision: u64,
}

/// Draws a [`Scene`] from a [`Camera`] into a color view.
pub struct SceneRenderer {
    layouts: PipelineLayouts,
    pipelines: PipelineCache,
    options: RenderOptions,

    frame_buffer: wgpu::Buffer,
    shadow_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,

    object_buffer: DynamicBuffer,
    object_bind_group: wgpu::BindGroup,

    shadow_light_buffer: wgpu::Buffer,
    shadow_light_bind_group: wgpu::BindGroup,
    shadow_maps: ShadowMaps,
    shadow_layers: usize,

    depth: DepthTexture,
    white: GpuTexture,
    meshes: FxHashMap<NodeId, GpuMesh>,
    lines: FxHashMap<NodeId, GpuLines>,
    wireframes: FxHashMap<NodeId, GpuLines>,
    textures: FxHashMap<TextureId, CachedTexture>,

    draw_list: DrawList,
    clear_color: wgpu::Color,
}

fn sized_binding(buffer: &wgpu::Buffer, size: usize) -> wgpu::BindingResource<'_> {
    wgpu::BindingResource::Buffer(wgpu::BufferBinding {
        buffer,
        offset: 0,
        size: NonZeroU64::new(size as u64),
    })
}

fn create_object_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &DynamicBuffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Object Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: sized_binding(buffer.buffer(), std::mem::size_of::<ObjectUniforms>()),
        }],
    })
}

/// Object uniforms laid out at [`UNIFORM_STRIDE`] for dynamic offsets.
fn strided<T: bytemuck::Pod>(items: &[T]) -> Vec<u8> {
    let stride = UNIFORM_STRIDE as usize;
    let mut bytes = vec![0u8; items.len().max(1) * stride];
    for (chunk, item) in bytes.chunks_exact_mut(stride).zip(items) {
        let src = bytemuck::bytes_of(item);
        chunk[..src.len()].copy_from_slice(src);
    }
    bytes
}

fn dynamic_offset(slot: usize) -> u32 {
    (slot as u64 * UNIFORM_STRIDE) as u32
}

fn geometry_stamp<T>(revision: u64, data: &Arc<T>) -> (u64, usize) {
    (revision, Arc::as_ptr(data) as usize)
}

impl SceneRenderer {
    /// Build layouts, shaders, shadow maps and fallback resources.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if a shader fails to compose.
    pub fn new(context: &RenderContext, options: &RenderOptions) -> Result<Self, ShaderError> {
        let device = &context.device;
        let layouts = PipelineLayouts::new(device);
        let pipelines = PipelineCache::new(device, &layouts, context.format())?;

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let shadow_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shadow Uniforms"),
            size: std::mem::size_of::<ShadowUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let shadow_maps = ShadowMaps::new(
            device,
            options.shadow_map_size,
            MAX_SHADOW_LAYERS as u32,
        );
        let shadow_sampler = pipeline_helpers::shadow_sampler(device);
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &layouts.frame,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shadow_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&shadow_maps.array_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });

        let object_buffer = DynamicBuffer::new_with_data(
            device,
            "Object Uniforms",
            &strided(&[ObjectUniforms::zeroed()]),
            wgpu::BufferUsages::UNIFORM,
        );
        let object_bind_group = create_object_bind_group(device, &layouts.object, &object_buffer);

        let shadow_light_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Shadow Light Matrices"),
            size: MAX_SHADOW_LAYERS as u64 * UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let shadow_light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Light Bind Group"),
            layout: &layouts.shadow_light,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: sized_binding(&shadow_light_buffer, std::mem::size_of::<[[f32; 4]; 4]>()),
            }],
        });

        let (width, height) = context.size();
        let depth = DepthTexture::new(device, width, height);
        let white = GpuTexture::upload(
            device,
            &context.queue,
            &layouts.texture,
            &Image::filled(1, 1, [255; 4]),
            "White Texture",
        );

        Ok(Self {
            layouts,
            pipelines,
            options: options.clone(),
            frame_buffer,
            shadow_buffer,
            frame_bind_group,
            object_buffer,
            object_bind_group,
            shadow_light_buffer,
            shadow_light_bind_group,
            shadow_maps,
            shadow_layers: 0,
            depth,
            white,
            meshes: FxHashMap::default(),
            lines: FxHashMap::default(),
            wireframes: FxHashMap::default(),
            textures: FxHashMap::default(),
            draw_list: DrawList::default(),
            clear_color: wgpu::Color::BLACK,
        })
    }

    /// Recreate the depth buffer for a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth = DepthTexture::new(device, width, height);
    }

    /// Drop every cached GPU resource of the previous scene.
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.lines.clear();
        self.wireframes.clear();
        self.textures.clear();
        self.draw_list = DrawList::default();
        self.shadow_layers = 0;
    }

    /// Draw calls issued by the last [`prepare`](Self::prepare).
    #[must_use]
    pub fn draw_count(&self) -> usize {
        self.draw_list.items.len()
    }

    /// Sync GPU caches with `scene` and write this frame's uniforms.
    pub fn prepare(&mut self, context: &RenderContext, scene: &Scene, camera: &Camera) {
        let device = &context.device;
        let queue = &context.queue;

        let nodes = scene.iter();
        let lights = LightSet::collect(&nodes);
        let fog = scene.fog().filter(|_| self.options.fog);
        let settings = DrawSettings {
            fog: fog.is_some(),
            shadows: self.options.shadows && !lights.shadow_view_proj.is_empty(),
        };
        self.draw_list = DrawList::build(&nodes, &camera.view(), settings);

        self.sync_geometry(device, scene);
        self.sync_textures(device, queue, scene);
        for item in &self.draw_list.items {
            self.pipelines.ensure(device, item.key);
        }

        let frame = FrameUniforms::new(camera, &lights, fog, context.size());
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        self.shadow_layers = if settings.shadows {
            lights.shadow_view_proj.len()
        } else {
            0
        };
        let shadows = ShadowUniforms::new(&lights, self.shadow_maps.size);
        queue.write_buffer(&self.shadow_buffer, 0, bytemuck::bytes_of(&shadows));
        let matrices: Vec<[[f32; 4]; 4]> = lights
            .shadow_view_proj
            .iter()
            .map(glam::Mat4::to_cols_array_2d)
            .collect();
        if !matrices.is_empty() {
            queue.write_buffer(&self.shadow_light_buffer, 0, &strided(&matrices));
        }

        let objects = strided(&self.draw_list.objects());
        if self.object_buffer.write(device, queue, &objects) {
            self.object_bind_group =
                create_object_bind_group(device, &self.layouts.object, &self.object_buffer);
        }

        let bg = scene.background().to_linear();
        self.clear_color = wgpu::Color {
            r: f64::from(bg.x),
            g: f64::from(bg.y),
            b: f64::from(bg.z),
            a: 1.0,
        };
    }

    fn sync_geometry(&mut self, device: &wgpu::Device, scene: &Scene) {
        let mut live = FxHashSet::default();
        for item in &self.draw_list.items {
            let id = item.source.node();
            let _ = live.insert(id);
            let Some(node) = scene.node(id) else {
                continue;
            };
            match (&item.source, &node.kind) {
                (DrawSource::MeshRange { .. }, NodeKind::Mesh(mesh)) => {
                    let stamp = geometry_stamp(mesh.revision(), mesh.geometry());
                    if self.meshes.get(&id).is_some_and(|m| m.stamp == stamp) {
                        continue;
                    }
                    let geometry = mesh.geometry();
                    let vertices = vertex::mesh_vertices(geometry);
                    let _ = self.meshes.insert(
                        id,
                        GpuMesh {
                            vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                                label: Some("Mesh Vertices"),
                                contents: bytemuck::cast_slice(&vertices),
                                usage: wgpu::BufferUsages::VERTEX,
                            }),
                            indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                                label: Some("Mesh Indices"),
                                contents: bytemuck::cast_slice(&geometry.indices),
                                usage: wgpu::BufferUsages::INDEX,
                            }),
                            stamp,
                        },
                    );
                }
                (DrawSource::Wireframe(_), NodeKind::Mesh(mesh)) => {
                    let stamp = geometry_stamp(mesh.revision(), mesh.geometry());
                    if self.wireframes.get(&id).is_some_and(|m| m.stamp == stamp) {
                        continue;
                    }
                    let vertices = vertex::wireframe_vertices(mesh.geometry());
                    let _ = self
                        .wireframes
                        .insert(id, upload_lines(device, "Wireframe Vertices", &vertices, stamp));
                }
                (DrawSource::Lines(_), NodeKind::Lines(lines)) => {
                    let stamp = (lines.revision(), 0);
                    if self.lines.get(&id).is_some_and(|m| m.stamp == stamp) {
                        continue;
                    }
                    let vertices = vertex::line_vertices(lines.geometry());
                    let _ = self
                        .lines
                        .insert(id, upload_lines(device, "Line Vertices", &vertices, stamp));
                }
                _ => {}
            }
        }
        self.meshes.retain(|id, _| live.contains(id));
        self.wireframes.retain(|id, _| live.contains(id));
        self.lines.retain(|id, _| live.contains(id));
    }

    fn sync_textures(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        for id in self.draw_list.items.iter().filter_map(|item| item.texture) {
            let (Some(image), Some(revision)) = (scene.texture(id), scene.texture_revision(id))
            else {
                continue;
            };
            match self.textures.get_mut(&id) {
                Some(cached) if cached.revision == revision => {}
                Some(cached) if cached.gpu.fits(image) => {
                    cached.gpu.write(queue, image);
                    cached.revision = revision;
                }
                _ => {
                    log::debug!(
                        "uploading texture {} ({}x{})",
                        id.index(),
                        image.width(),
                        image.height()
                    );
                    let gpu = GpuTexture::upload(
                        device,
                        queue,
                        &self.layouts.texture,
                        image,
                        "Scene Texture",
                    );
                    let _ = self.textures.insert(id, CachedTexture { gpu, revision });
                }
            }
        }
    }

    fn texture_bind_group(&self, id: Option<TextureId>) -> &wgpu::BindGroup {
        id.and_then(|id| self.textures.get(&id))
            .map_or(&self.white.bind_group, |t| &t.gpu.bind_group)
    }

    /// Encode the shadow pass and the main pass into `encoder`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        self.encode_shadow_pass(encoder);
        self.encode_main_pass(encoder, view);
    }

    fn encode_shadow_pass(&self, encoder: &mut wgpu::CommandEncoder) {
        let layers = self.shadow_maps.layer_views.iter().take(self.shadow_layers);
        for (layer, layer_view) in layers.enumerate() {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: layer_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(self.pipelines.shadow());
            pass.set_bind_group(0, &self.shadow_light_bind_group, &[dynamic_offset(layer)]);
            for (slot, item) in self.draw_list.shadow_casters() {
                let DrawSource::MeshRange { node, start, count } = item.source else {
                    continue;
                };
                let Some(mesh) = self.meshes.get(&node) else {
                    continue;
                };
                pass.set_bind_group(1, &self.object_bind_group, &[dynamic_offset(slot)]);
                pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(start..start + count, 0, 0..1);
            }
        }
    }

    fn encode_main_pass(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });
        pass.set_bind_group(0, &self.frame_bind_group, &[]);

        let mut bound = None;
        for (slot, item) in self.draw_list.items.iter().enumerate() {
            let Some(pipeline) = self.pipelines.get(&item.key) else {
                continue;
            };
            if bound != Some(item.key) {
                pass.set_pipeline(pipeline);
                bound = Some(item.key);
            }
            pass.set_bind_group(1, &self.object_bind_group, &[dynamic_offset(slot)]);
            match item.source {
                DrawSource::MeshRange { node, start, count } => {
                    let Some(mesh) = self.meshes.get(&node) else {
                        continue;
                    };
                    pass.set_bind_group(2, self.texture_bind_group(item.texture), &[]);
                    pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                    pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(start..start + count, 0, 0..1);
                }
                DrawSource::Wireframe(node) => {
                    if let Some(lines) = self.wireframes.get(&node) {
                        pass.set_vertex_buffer(0, lines.vertices.slice(..));
                        pass.draw(0..lines.count, 0..1);
                    }
                }
                DrawSource::Lines(node) => {
                    if let Some(lines) = self.lines.get(&node) {
                        pass.set_vertex_buffer(0, lines.vertices.slice(..));
                        pass.draw(0..lines.count, 0..1);
                    }
                }
                DrawSource::Sprite(_) => {
                    pass.set_bind_group(2, self.texture_bind_group(item.texture), &[]);
                    pass.draw(0..6, 0..1);
                }
            }
        }
    }
}

fn upload_lines(
    device: &wgpu::Device,
    label: &str,
    vertices: &[vertex::LineVertex],
    stamp: (u64, usize),
) -> GpuLines {
    // keep the buffer non-empty; the draw count stays zero
    let placeholder = [bytemuck::Zeroable::zeroed()];
    let data = if vertices.is_empty() { &placeholder[..] } else { vertices };
    GpuLines {
        vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        }),
        count: vertices.len() as u32,
        stamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strided_pads_each_item_to_the_stride() {
        let bytes = strided(&[[1.0f32; 4], [2.0f32; 4]]);
        assert_eq!(bytes.len(), 2 * UNIFORM_STRIDE as usize);
        let second: &[f32] = bytemuck::cast_slice(&bytes[256..272]);
        assert_eq!(second, &[2.0; 4]);
    }

    #[test]
    fn strided_never_returns_an_empty_buffer() {
        assert_eq!(strided::<[f32; 4]>(&[]).len(), UNIFORM_STRIDE as usize);
    }

    #[test]
    fn dynamic_offsets_step_by_stride() {
        assert_eq!(dynamic_offset(0), 0);
        assert_eq!(dynamic_offset(3), 768);
    }
}
