//! The surroundings most demos share: floor, sky, fog, axes and lights.

use glam::Vec3;

use super::assets;
use crate::scene::{
    helpers, shapes, Color, Fog, Image, Light, Material, Node, NodeId, Scene, Side, TextureMap,
};

/// Where every demo's camera starts.
pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 150.0, 400.0);
/// Sky box color.
pub const SKY_COLOR: u32 = 0x9990ff;
/// Fog color.
pub const FOG_COLOR: u32 = 0x9999ff;
/// Exponential-squared fog density.
pub const FOG_DENSITY: f32 = 0.000_25;
/// Edge length of the floor plane.
pub const FLOOR_SIZE: f32 = 1000.0;
/// Edge length of the sky box.
pub const SKY_SIZE: f32 = 10_000.0;

/// Ids of the shared stage nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surroundings {
    /// Checkerboard floor.
    pub floor: NodeId,
    /// Inside-out sky box.
    pub sky: NodeId,
    /// World axes.
    pub axes: NodeId,
}

/// Register `image` with the scene and return an identity map onto it.
pub fn texture(scene: &mut Scene, image: Image) -> TextureMap {
    TextureMap::new(scene.add_texture(image))
}

/// Fog, floor, sky and axes.
pub fn surroundings(scene: &mut Scene) -> Surroundings {
    fog(scene);
    Surroundings {
        floor: floor(scene),
        sky: sky(scene),
        axes: axes(scene, 100.0),
    }
}

/// Exp2 fog in the sky's tint.
pub fn fog(scene: &mut Scene) {
    scene.set_fog(Some(Fog::exp2(Color::from_hex(FOG_COLOR), FOG_DENSITY)));
    scene.set_background(Color::from_hex(FOG_COLOR));
}

/// Checkerboard floor just below the origin, visible from both sides.
pub fn floor(scene: &mut Scene) -> NodeId {
    let map = texture(scene, assets::checkerboard()).with_repeat(10.0, 10.0);
    let material = Material::basic(Color::WHITE)
        .with_map(map)
        .with_side(Side::Double);
    scene.add(
        None,
        Node::mesh(shapes::plane(FLOOR_SIZE, FLOOR_SIZE, 1, 1), material)
            .with_name("floor")
            .with_position(0.0, -0.5, 0.0)
            .with_rotation_euler(-std::f32::consts::FRAC_PI_2, 0.0, 0.0),
    )
}

/// Large box seen from inside.
pub fn sky(scene: &mut Scene) -> NodeId {
    let material = Material::basic(Color::from_hex(SKY_COLOR)).with_side(Side::Back);
    scene.add(
        None,
        Node::mesh(shapes::cuboid(SKY_SIZE, SKY_SIZE, SKY_SIZE, 1, 1, 1), material)
            .with_name("sky"),
    )
}

/// Axes helper at the origin.
pub fn axes(scene: &mut Scene, size: f32) -> NodeId {
    scene.add(None, helpers::axes(size))
}

/// White point light at `position`.
pub fn point_light(scene: &mut Scene, position: Vec3) -> NodeId {
    scene.add(
        None,
        Node::light(Light::point(Color::WHITE))
            .with_name("point light")
            .with_position(position.x, position.y, position.z),
    )
}

/// Ambient light of the given color.
pub fn ambient_light(scene: &mut Scene, hex: u32) -> NodeId {
    scene.add(None, Node::light(Light::ambient(Color::from_hex(hex))))
}

/// The default rig: a point light above the origin and a faint ambient.
pub fn lights(scene: &mut Scene) {
    let _ = point_light(scene, Vec3::new(0.0, 250.0, 0.0));
    let _ = ambient_light(scene, 0x11_1111);
}

/// Small unlit sphere marking a light's position.
pub fn bulb(scene: &mut Scene, position: Vec3) -> NodeId {
    scene.add(
        None,
        Node::mesh(
            shapes::sphere(10.0, 16, 8),
            Material::basic(Color::from_hex(0xffaa00)),
        )
        .with_name("bulb")
        .with_position(position.x, position.y, position.z),
    )
}
