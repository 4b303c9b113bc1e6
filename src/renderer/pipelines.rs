//! Bind group layouts and lazily built render pipelines.

use rustc_hash::FxHashMap;

use super::draw_list::{BlendMode, DrawKind, PipelineKey};
use super::vertex::{LineVertex, MeshVertex};
use crate::gpu::pipeline_helpers::{self, DEPTH_FORMAT};
use crate::gpu::shader_composer::{sources, ShaderComposer, ShaderError};

/// Bind group layouts shared by every pipeline.
///
/// - group(0): frame uniform, shadow uniform, shadow maps, shadow sampler
/// - group(1): object uniform (dynamic offset)
/// - group(2): color map + sampler (meshes and sprites only)
pub struct PipelineLayouts {
    /// group(0) of the main passes.
    pub frame: wgpu::BindGroupLayout,
    /// group(1) of every pass.
    pub object: wgpu::BindGroupLayout,
    /// group(2) of the mesh and sprite passes.
    pub texture: wgpu::BindGroupLayout,
    /// group(0) of the shadow pass: one light matrix (dynamic offset).
    pub shadow_light: wgpu::BindGroupLayout,
}

impl PipelineLayouts {
    /// Create all layouts.
    #[must_use]
    pub fn new(device: &wgpu::Device) -> Self {
        let vertex_fragment = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Layout"),
            entries: &[
                pipeline_helpers::uniform_buffer(0, vertex_fragment, false),
                pipeline_helpers::uniform_buffer(1, wgpu::ShaderStages::FRAGMENT, false),
                pipeline_helpers::depth_texture_2d_array(2),
                pipeline_helpers::comparison_sampler(3),
            ],
        });
        let object = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Layout"),
            entries: &[pipeline_helpers::uniform_buffer(0, vertex_fragment, true)],
        });
        let texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Texture Layout"),
            entries: &[
                pipeline_helpers::texture_2d(0),
                pipeline_helpers::filtering_sampler(1),
            ],
        });
        let shadow_light = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Light Layout"),
            entries: &[pipeline_helpers::uniform_buffer(
                0,
                wgpu::ShaderStages::VERTEX,
                true,
            )],
        });
        Self {
            frame,
            object,
            texture,
            shadow_light,
        }
    }
}

fn blend_state(mode: BlendMode) -> Option<wgpu::BlendState> {
    match mode {
        BlendMode::Opaque => None,
        BlendMode::Normal => Some(wgpu::BlendState::ALPHA_BLENDING),
        BlendMode::Additive => Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        }),
    }
}

/// Composed shader modules and every pipeline built so far.
pub struct PipelineCache {
    mesh_shader: wgpu::ShaderModule,
    line_shader: wgpu::ShaderModule,
    sprite_shader: wgpu::ShaderModule,
    mesh_layout: wgpu::PipelineLayout,
    line_layout: wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    pipelines: FxHashMap<PipelineKey, wgpu::RenderPipeline>,
    shadow: wgpu::RenderPipeline,
}

impl PipelineCache {
    /// Compose the shaders and build the shadow pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError`] if a shader fails to compose.
    pub fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        color_format: wgpu::TextureFormat,
    ) -> Result<Self, ShaderError> {
        let mut composer = ShaderComposer::new()?;
        let (source, path) = sources::MESH;
        let mesh_shader = composer.compose(device, "Mesh Shader", source, path)?;
        let (source, path) = sources::LINE;
        let line_shader = composer.compose(device, "Line Shader", source, path)?;
        let (source, path) = sources::SPRITE;
        let sprite_shader = composer.compose(device, "Sprite Shader", source, path)?;
        let (source, path) = sources::SHADOW;
        let shadow_shader = composer.compose(device, "Shadow Shader", source, path)?;

        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&layouts.frame, &layouts.object, &layouts.texture],
            push_constant_ranges: &[],
        });
        let line_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Line Pipeline Layout"),
            bind_group_layouts: &[&layouts.frame, &layouts.object],
            push_constant_ranges: &[],
        });
        let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts: &[&layouts.shadow_light, &layouts.object],
            push_constant_ranges: &[],
        });

        let shadow = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Pipeline"),
            layout: Some(&shadow_layout),
            vertex: wgpu::VertexState {
                module: &shadow_shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: None,
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            mesh_shader,
            line_shader,
            sprite_shader,
            mesh_layout,
            line_layout,
            color_format,
            pipelines: FxHashMap::default(),
            shadow,
        })
    }

    /// Build the pipeline for `key` if it does not exist yet.
    pub fn ensure(&mut self, device: &wgpu::Device, key: PipelineKey) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        log::debug!("building pipeline {key:?}");
        let pipeline = self.create(device, key);
        let _ = self.pipelines.insert(key, pipeline);
    }

    /// Pipeline for `key`, if [`ensure`](Self::ensure) has built it.
    #[must_use]
    pub fn get(&self, key: &PipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(key)
    }

    /// Depth-only pipeline of the shadow pass.
    #[must_use]
    pub fn shadow(&self) -> &wgpu::RenderPipeline {
        &self.shadow
    }

    fn create(&self, device: &wgpu::Device, key: PipelineKey) -> wgpu::RenderPipeline {
        let mesh_buffers = [MeshVertex::layout()];
        let line_buffers = [LineVertex::layout()];
        let (label, module, layout, buffers, topology) = match key.kind {
            DrawKind::Mesh => (
                "Mesh Pipeline",
                &self.mesh_shader,
                &self.mesh_layout,
                &mesh_buffers[..],
                wgpu::PrimitiveTopology::TriangleList,
            ),
            DrawKind::Line => (
                "Line Pipeline",
                &self.line_shader,
                &self.line_layout,
                &line_buffers[..],
                wgpu::PrimitiveTopology::LineList,
            ),
            DrawKind::Sprite => (
                "Sprite Pipeline",
                &self.sprite_shader,
                &self.mesh_layout,
                &mesh_buffers[..0],
                wgpu::PrimitiveTopology::TriangleList,
            ),
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module,
                entry_point: Some("vs_main"),
                buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.color_format,
                    blend: blend_state(key.blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: key.cull,
                ..Default::default()
            },
            depth_stencil: Some(pipeline_helpers::depth_stencil_state(
                key.depth_write,
                key.depth_test,
            )),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_blending_adds_to_destination() {
        let Some(state) = blend_state(BlendMode::Additive) else {
            panic!("additive blending must blend");
        };
        assert_eq!(state.color.dst_factor, wgpu::BlendFactor::One);
        assert!(blend_state(BlendMode::Opaque).is_none());
    }
}
