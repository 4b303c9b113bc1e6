//! CPU mirrors of the WGSL uniform structs in `modules/frame.wgsl`.

use bytemuck::Zeroable as _;
use glam::{Mat4, Vec3, Vec4};

use crate::camera::Camera;
use crate::scene::{
    Fog, LightKind, LineMaterial, Material, Shading, SpriteMaterial, WorldNode,
};

/// Lights uploaded per frame; extra lights are ignored.
pub const MAX_LIGHTS: usize = 8;
/// Shadow map layers; extra shadow casters render unshadowed.
pub const MAX_SHADOW_LAYERS: usize = 4;
/// Dynamic-offset stride of per-object and per-layer uniforms.
pub const UNIFORM_STRIDE: u64 = 256;

/// One light in the frame uniform.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    position: [f32; 4],
    direction: [f32; 4],
    color: [f32; 4],
    cone: [f32; 4],
}

/// Per-frame camera, lights and environment.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    camera_position: [f32; 4],
    ambient: [f32; 4],
    fog: [f32; 4],
    clip: [f32; 4],
    lights: [GpuLight; MAX_LIGHTS],
}

/// Light-space matrices of the shadow maps.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowUniforms {
    view_proj: [[[f32; 4]; 4]; MAX_SHADOW_LAYERS],
    params: [f32; 4],
}

/// Per-draw transform and material parameters.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
    specular: [f32; 4],
    uv_transform: [f32; 4],
    flags: [f32; 4],
    extra: [f32; 4],
}

/// Lights gathered from a scene for one frame.
#[derive(Debug, Clone, Default)]
pub struct LightSet {
    /// Sum of ambient lights, linear.
    pub ambient: Vec3,
    /// Direct lights in scene order, at most [`MAX_LIGHTS`].
    pub lights: Vec<GpuLight>,
    /// Shadow camera per layer, at most [`MAX_SHADOW_LAYERS`].
    pub shadow_view_proj: Vec<Mat4>,
    /// Largest depth bias among shadow casters.
    pub shadow_bias: f32,
}

impl LightSet {
    /// Collect lights from the visible nodes of a scene.
    #[must_use]
    pub fn collect(nodes: &[WorldNode<'_>]) -> Self {
        let mut set = Self::default();
        for world_node in nodes {
            let Some(light) = world_node.node.as_light() else {
                continue;
            };
            let radiance = light.color.to_linear() * light.intensity;
            if light.kind == LightKind::Ambient {
                set.ambient += radiance;
                continue;
            }
            if set.lights.len() == MAX_LIGHTS {
                log::debug!("more than {MAX_LIGHTS} lights, ignoring the rest");
                continue;
            }

            let position = world_node.world.w_axis.truncate();
            let mut shadow_layer = -1.0;
            if set.shadow_view_proj.len() < MAX_SHADOW_LAYERS {
                if let (Some(view_proj), Some(shadow)) =
                    (light.shadow_view_proj(position), light.shadow)
                {
                    shadow_layer = set.shadow_view_proj.len() as f32;
                    set.shadow_view_proj.push(view_proj);
                    set.shadow_bias = set.shadow_bias.max(shadow.bias);
                }
            }

            let gpu = match light.kind {
                LightKind::Point { distance, decay } => GpuLight {
                    position: position.extend(0.0).to_array(),
                    direction: [0.0, 0.0, 0.0, distance],
                    color: radiance.extend(decay).to_array(),
                    cone: [0.0, 0.0, shadow_layer, 0.0],
                },
                LightKind::Directional { target } => GpuLight {
                    position: position.extend(1.0).to_array(),
                    direction: (target - position).normalize_or(Vec3::NEG_Y).extend(0.0).to_array(),
                    color: radiance.extend(1.0).to_array(),
                    cone: [0.0, 0.0, shadow_layer, 0.0],
                },
                LightKind::Spot {
                    target,
                    angle,
                    penumbra,
                    distance,
                    decay,
                } => {
                    let cos_outer = angle.cos();
                    // smoothstep needs distinct edges
                    let cos_inner = (angle * (1.0 - penumbra)).cos().max(cos_outer + 1e-4);
                    GpuLight {
                        position: position.extend(2.0).to_array(),
                        direction: (target - position)
                            .normalize_or(Vec3::NEG_Y)
                            .extend(distance)
                            .to_array(),
                        color: radiance.extend(decay).to_array(),
                        cone: [cos_outer, cos_inner, shadow_layer, 0.0],
                    }
                }
                LightKind::Ambient => continue,
            };
            set.lights.push(gpu);
        }
        set
    }
}

impl FrameUniforms {
    /// Frame uniforms for `camera` at the given viewport size.
    #[must_use]
    pub fn new(
        camera: &Camera,
        lights: &LightSet,
        fog: Option<Fog>,
        viewport: (u32, u32),
    ) -> Self {
        let mut gpu_lights = [GpuLight::zeroed(); MAX_LIGHTS];
        for (slot, light) in gpu_lights.iter_mut().zip(&lights.lights) {
            *slot = *light;
        }
        let fog = fog.map_or([0.0; 4], |f| f.color.to_linear().extend(f.density.max(0.0)).to_array());
        Self {
            view_proj: camera.build_matrix().to_cols_array_2d(),
            view: camera.view().to_cols_array_2d(),
            projection: camera.projection().to_cols_array_2d(),
            camera_position: camera.eye.extend(1.0).to_array(),
            ambient: lights.ambient.extend(lights.lights.len() as f32).to_array(),
            fog,
            clip: [
                camera.znear,
                camera.zfar,
                viewport.0 as f32,
                viewport.1 as f32,
            ],
            lights: gpu_lights,
        }
    }
}

impl ShadowUniforms {
    /// Shadow uniforms for maps of `map_size` texels.
    #[must_use]
    pub fn new(lights: &LightSet, map_size: u32) -> Self {
        let mut view_proj = [Mat4::IDENTITY.to_cols_array_2d(); MAX_SHADOW_LAYERS];
        for (slot, m) in view_proj.iter_mut().zip(&lights.shadow_view_proj) {
            *slot = m.to_cols_array_2d();
        }
        Self {
            view_proj,
            params: [
                lights.shadow_bias,
                1.0 / map_size.max(1) as f32,
                lights.shadow_view_proj.len() as f32,
                0.0,
            ],
        }
    }
}

/// Per-draw flags shared by all object kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawFlags {
    /// Sample shadow maps.
    pub receive_shadow: bool,
    /// Blend towards the fog color.
    pub fog: bool,
}

fn flag(on: bool) -> f32 {
    if on {
        1.0
    } else {
        0.0
    }
}

fn shading_index(shading: Shading) -> f32 {
    match shading {
        Shading::Basic => 0.0,
        Shading::Lambert => 1.0,
        Shading::Phong => 2.0,
        Shading::Normal => 3.0,
        Shading::Depth => 4.0,
    }
}

impl ObjectUniforms {
    fn with_model(model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            color: [1.0; 4],
            emissive: [0.0; 4],
            specular: [0.0; 4],
            uv_transform: [1.0, 1.0, 0.0, 0.0],
            flags: [0.0; 4],
            extra: [0.0; 4],
        }
    }

    /// Uniforms for a filled mesh draw.
    #[must_use]
    pub fn mesh(model: Mat4, material: &Material, flags: DrawFlags) -> Self {
        let mut u = Self::with_model(model);
        u.color = material.color.to_linear_rgba(material.alpha()).to_array();
        u.emissive = material.emissive.to_linear_rgba(0.0).to_array();
        u.specular = material.specular.to_linear().extend(material.shininess).to_array();
        if let Some(map) = material.map {
            u.uv_transform = [map.repeat.x, map.repeat.y, map.offset.x, map.offset.y];
        }
        let fog = flags.fog && !matches!(material.shading, Shading::Normal | Shading::Depth);
        u.flags = [
            shading_index(material.shading),
            flag(material.vertex_colors),
            flag(flags.receive_shadow),
            flag(fog),
        ];
        u
    }

    /// Uniforms for a mesh drawn as a wireframe in its material color.
    #[must_use]
    pub fn wireframe(model: Mat4, material: &Material, flags: DrawFlags) -> Self {
        let mut u = Self::with_model(model);
        u.color = material.color.to_linear_rgba(material.alpha()).to_array();
        u.flags = [0.0, flag(material.vertex_colors), 0.0, flag(flags.fog)];
        u
    }

    /// Uniforms for a line draw.
    #[must_use]
    pub fn lines(model: Mat4, material: &LineMaterial, flags: DrawFlags) -> Self {
        let mut u = Self::with_model(model);
        u.color = material.color.to_linear_rgba(material.opacity).to_array();
        u.flags = [0.0, flag(material.vertex_colors), 0.0, flag(flags.fog)];
        if let Some(dash) = material.dash {
            u.extra = [dash.dash_size, dash.gap_size, 0.0, 0.0];
        }
        u
    }

    /// Uniforms for a sprite draw anchored at `center` (fractions of the
    /// quad).
    #[must_use]
    pub fn sprite(
        model: Mat4,
        material: &SpriteMaterial,
        center: glam::Vec2,
        flags: DrawFlags,
    ) -> Self {
        let mut u = Self::with_model(model);
        u.color = material.color.to_linear_rgba(material.opacity).to_array();
        if let Some(map) = material.map {
            u.uv_transform = [map.repeat.x, map.repeat.y, map.offset.x, map.offset.y];
        }
        u.flags = [0.0, 0.0, 0.0, flag(flags.fog)];
        u.extra = [center.x, center.y, 0.0, 0.0];
        u
    }

    /// Model matrix, for shadow and depth sorting consumers.
    #[must_use]
    pub fn model(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model)
    }
}

/// `model`'s origin in camera space, negated so larger is farther.
#[must_use]
pub fn view_depth(view: &Mat4, model: &Mat4) -> f32 {
    -(*view * Vec4::from((model.w_axis.truncate(), 1.0))).z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Color, Light, Node, Scene, TextureId, TextureMap};

    #[test]
    fn sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<GpuLight>(), 64);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 768);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 224);
        assert!(std::mem::size_of::<ObjectUniforms>() as u64 <= UNIFORM_STRIDE);
        assert_eq!(std::mem::size_of::<ShadowUniforms>(), 272);
    }

    #[test]
    fn ambient_lights_are_summed() {
        let mut scene = Scene::new();
        let _ = scene.add(None, Node::light(Light::ambient(Color::from_hex(0x111111))));
        let _ = scene.add(None, Node::light(Light::ambient(Color::from_hex(0x111111))));
        let _ = scene.add(None, Node::light(Light::point(Color::WHITE)).with_position(0.0, 250.0, 0.0));
        let set = LightSet::collect(&scene.iter());
        assert_eq!(set.lights.len(), 1);
        let single = Color::from_hex(0x111111).to_linear();
        assert!((set.ambient - single * 2.0).length() < 1e-6);
        assert_eq!(set.lights[0].position, [0.0, 250.0, 0.0, 0.0]);
        assert_eq!(set.lights[0].cone[2], -1.0);
    }

    #[test]
    fn shadow_layers_are_assigned_in_order() {
        let mut scene = Scene::new();
        for x in [-60.0, 60.0, 150.0] {
            let light = Light::spot(Color::WHITE).with_cone(0.5, 1.0).with_shadow();
            let _ = scene.add(None, Node::light(light).with_position(x, 150.0, -30.0));
        }
        let set = LightSet::collect(&scene.iter());
        assert_eq!(set.shadow_view_proj.len(), 3);
        let layers: Vec<f32> = set.lights.iter().map(|l| l.cone[2]).collect();
        assert_eq!(layers, vec![0.0, 1.0, 2.0]);
        let cone = set.lights[0].cone;
        assert!(cone[1] > cone[0], "inner cone must be narrower than outer");
    }

    #[test]
    fn lights_beyond_the_limit_are_dropped() {
        let mut scene = Scene::new();
        for _ in 0..MAX_LIGHTS + 3 {
            let _ = scene.add(None, Node::light(Light::point(Color::WHITE)));
        }
        let set = LightSet::collect(&scene.iter());
        assert_eq!(set.lights.len(), MAX_LIGHTS);
        let frame = FrameUniforms::new(&Camera::default(), &set, None, (800, 600));
        assert_eq!(frame.ambient[3], MAX_LIGHTS as f32);
        assert_eq!(frame.fog[3], 0.0);
    }

    #[test]
    fn mesh_uniforms_carry_uv_transform_and_flags() {
        let map = TextureMap::new(TextureId(0)).with_repeat(0.1, 1.0);
        let material = Material::normal().with_map(map);
        let u = ObjectUniforms::mesh(
            Mat4::IDENTITY,
            &material,
            DrawFlags {
                receive_shadow: true,
                fog: true,
            },
        );
        assert_eq!(u.uv_transform, [0.1, 1.0, 0.0, 0.0]);
        assert_eq!(u.flags, [3.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn view_depth_grows_away_from_camera() {
        let camera = Camera::default();
        let view = camera.view();
        let near = Mat4::from_translation(camera.eye + camera.forward() * 10.0);
        let far = Mat4::from_translation(camera.eye + camera.forward() * 100.0);
        assert!(view_depth(&view, &far) > view_depth(&view, &near));
        assert!((view_depth(&view, &near) - 10.0).abs() < 1e-3);
    }
}
