//! Texture maps, sprite-sheet animation, canvases, sky boxes,
//! transparency and shadows.

use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

use glam::Vec3;

use super::assets;
use super::stage;
use super::{Demo, DemoSetup, FrameContext, SetupContext};
use crate::scene::canvas::Canvas;
use crate::scene::{
    helpers, shapes, Blending, Color, Geometry, Image, Light, Material, Mesh, Node, NodeId, Scene, Side,
    TextureMap,
};
use crate::sprite::TextureAnimator;

/// Default canvas size, in pixels.
const CANVAS_SIZE: (u32, u32) = (300, 150);

fn add_mesh(scene: &mut Scene, name: &str, geometry: Geometry, material: Material, at: Vec3) -> NodeId {
    scene.add(
        None,
        Node::mesh(geometry, material)
            .with_name(name)
            .with_position(at.x, at.y, at.z),
    )
}

/// Standard die faces in box material order (+X, -X, +Y, -Y, +Z, -Z), so
/// opposite faces sum to seven.
fn dice_materials(scene: &mut Scene) -> Vec<Material> {
    [1, 6, 2, 5, 3, 4]
        .into_iter()
        .map(|face| Material::lambert(Color::WHITE).with_map(stage::texture(scene, assets::dice(face))))
        .collect()
}

/// Moon spheres under three materials, a crate and a die.
pub(super) struct Textures;

impl Demo for Textures {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        let light = Vec3::new(0.0, 150.0, 0.0);
        let _ = stage::point_light(scene, light);
        let _ = stage::bulb(scene, light);
        let _ = stage::ambient_light(scene, 0x44_4444);

        let moon = stage::texture(scene, assets::moon());
        let sphere = || shapes::sphere(40.0, 32, 16);
        let _ = add_mesh(
            scene,
            "moon basic",
            sphere(),
            Material::basic(Color::WHITE).with_map(moon),
            Vec3::new(-100.0, 50.0, 0.0),
        );
        let _ = add_mesh(
            scene,
            "moon lambert",
            sphere(),
            Material::lambert(Color::WHITE).with_map(moon),
            Vec3::new(0.0, 50.0, 0.0),
        );
        let _ = add_mesh(
            scene,
            "moon tinted",
            sphere(),
            Material::lambert(Color::from_hex(0xff_8800)).with_map(moon),
            Vec3::new(100.0, 50.0, 0.0),
        );

        let crate_map = stage::texture(scene, assets::wooden_crate());
        let cube = || shapes::cuboid(85.0, 85.0, 85.0, 1, 1, 1);
        let _ = add_mesh(
            scene,
            "crate",
            cube(),
            Material::basic(Color::WHITE).with_map(crate_map),
            Vec3::new(-60.0, 60.0, -100.0),
        );
        let dice = dice_materials(scene);
        let _ = scene.add(
            None,
            Node::multi_mesh(cube(), dice)
                .with_name("dice")
                .with_position(60.0, 50.0, -100.0),
        );
        DemoSetup::default()
    }
}

/// The same textures tiled 1, 2, 3 and 5 times.
pub(super) struct TexturesRepeat;

impl Demo for TexturesRepeat {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        let light = Vec3::new(0.0, 150.0, 0.0);
        let _ = stage::point_light(scene, light);
        let _ = stage::bulb(scene, light);
        let _ = stage::ambient_light(scene, 0x44_4444);

        let lava = stage::texture(scene, assets::lava());
        let sphere = || shapes::sphere(40.0, 32, 16);
        let spheres = [
            (-100.0, Material::basic(Color::WHITE).with_map(lava)),
            (0.0, Material::lambert(Color::WHITE).with_map(lava.with_repeat(2.0, 2.0))),
            (
                100.0,
                Material::lambert(Color::from_hex(0xff_8800)).with_map(lava.with_repeat(3.0, 3.0)),
            ),
        ];
        for (x, material) in spheres {
            let _ = add_mesh(scene, "lava", sphere(), material, Vec3::new(x, 50.0, 0.0));
        }

        let crate_map = stage::texture(scene, assets::wooden_crate());
        let cube = || shapes::cuboid(85.0, 85.0, 85.0, 1, 1, 1);
        let _ = add_mesh(
            scene,
            "crate",
            cube(),
            Material::basic(Color::WHITE).with_map(crate_map),
            Vec3::new(-60.0, 60.0, -100.0),
        );
        let _ = add_mesh(
            scene,
            "crate repeated",
            cube(),
            Material::basic(Color::WHITE).with_map(crate_map.with_repeat(5.0, 5.0)),
            Vec3::new(60.0, 50.0, -100.0),
        );
        DemoSetup::default()
    }
}

/// A runner and an explosion, each stepping through a sprite sheet.
#[derive(Default)]
pub(super) struct TextureAnimation {
    animated: Vec<(NodeId, TextureAnimator)>,
}

impl TextureAnimation {
    /// Put `image` on a new mesh and start stepping through its tiles.
    fn animate(
        &mut self,
        scene: &mut Scene,
        mut node: Node,
        image: Image,
        grid: (u32, u32, u32),
        tile_duration: Duration,
    ) {
        let animator = match TextureAnimator::new(grid.0, grid.1, grid.2, tile_duration) {
            Ok(animator) => animator,
            Err(e) => {
                log::error!("{}: {e}", node.name);
                return;
            }
        };
        let mut map = stage::texture(scene, image);
        animator.apply(&mut map);
        if let Some(material) = node.as_mesh_mut().and_then(Mesh::material_mut) {
            material.map = Some(map);
        }
        let id = scene.add(None, node);
        self.animated.push((id, animator));
    }
}

impl Demo for TextureAnimation {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        self.animated.clear();
        let _ = stage::surroundings(scene);
        let _ = stage::point_light(scene, Vec3::new(0.0, 250.0, 0.0));
        let _ = stage::ambient_light(scene, 0x11_1111);

        let material = Material::basic(Color::WHITE).with_side(Side::Double);
        self.animate(
            scene,
            Node::mesh(shapes::plane(50.0, 50.0, 1, 1), material.clone())
                .with_name("runner")
                .with_position(-100.0, 25.0, 0.0),
            assets::run_sheet(),
            (assets::RUN_TILES, 1, assets::RUN_TILES),
            Duration::from_millis(75),
        );
        let grid = assets::EXPLOSION_GRID;
        self.animate(
            scene,
            Node::mesh(shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1), material)
                .with_name("explosion")
                .with_position(0.0, 26.0, 0.0),
            assets::explosion_sheet(),
            (grid, grid, grid * grid),
            Duration::from_millis(55),
        );
        DemoSetup::default()
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        let delta = ctx.delta();
        for (id, animator) in &mut self.animated {
            animator.update(delta);
            let map = ctx
                .scene
                .node_mut(*id)
                .and_then(Node::as_mesh_mut)
                .and_then(Mesh::material_mut)
                .and_then(|m| m.map.as_mut());
            if let Some(map) = map {
                animator.apply(map);
            }
        }
    }
}

/// Text and an image painted into canvases at startup.
pub(super) struct TextureFromCanvas;

impl Demo for TextureFromCanvas {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);
        let (w, h) = CANVAS_SIZE;
        let plane = || shapes::plane(w as f32, h as f32, 1, 1);

        let mut text = Canvas::new(w, h);
        if !ctx
            .labels
            .fill_text(&mut text, "Hello World!", 0.0, 50.0, 40.0, [255, 0, 0, 242])
        {
            log::warn!("no font available, the text canvas stays empty");
        }
        let text_map = stage::texture(scene, text.into_image());
        let _ = add_mesh(
            scene,
            "text canvas",
            plane(),
            Material::basic(Color::WHITE)
                .with_map(text_map)
                .with_side(Side::Double)
                .with_opacity(1.0),
            Vec3::new(0.0, 50.0, 0.0),
        );

        let mut picture = Canvas::new(w, h);
        picture.draw_image(0, 0, &assets::dice(5));
        let picture_map = stage::texture(scene, picture.into_image());
        let _ = add_mesh(
            scene,
            "image canvas",
            plane(),
            Material::basic(Color::WHITE)
                .with_map(picture_map)
                .with_side(Side::Double)
                .with_opacity(1.0),
            Vec3::new(0.0, 50.0, -50.0),
        );
        DemoSetup::default()
    }
}

/// A textured box seen from inside.
pub(super) struct Skybox;

impl Demo for Skybox {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::floor(scene);
        let _ = stage::axes(scene, 100.0);
        stage::lights(scene);

        let faces = (0..6)
            .map(|face| {
                let map = stage::texture(scene, assets::sky_face(face));
                Material::basic(Color::WHITE).with_map(map).with_side(Side::Back)
            })
            .collect();
        let _ = scene.add(
            None,
            Node::multi_mesh(shapes::cuboid(5000.0, 5000.0, 5000.0, 1, 1, 1), faces)
                .with_name("skybox"),
        );
        DemoSetup::default()
    }
}

/// Opacity, additive blending and alpha-mapped textures.
pub(super) struct Translucence;

impl Translucence {
    fn spheres(scene: &mut Scene, moon: TextureMap) {
        let sphere = || shapes::sphere(40.0, 32, 16);
        let dark = Color::from_hex(0x33_3333);
        let blue = Color::from_hex(0x00_00ff);
        let spheres = [
            (Vec3::new(-100.0, 50.0, 50.0), Material::basic(Color::from_hex(0xff_0000)).with_opacity(0.5)),
            (Vec3::new(-100.0, 50.0, -50.0), Material::basic(Color::from_hex(0x00_ff00)).with_opacity(0.5)),
            (Vec3::new(-100.0, 50.0, -150.0), Material::basic(blue).with_opacity(0.5)),
            (Vec3::new(0.0, 50.0, 0.0), Material::basic(dark).with_opacity(0.95)),
            (Vec3::new(100.0, 50.0, 0.0), Material::phong(dark).with_opacity(0.95)),
            (
                Vec3::new(200.0, 50.0, 0.0),
                Material::lambert(Color::WHITE).with_map(moon).with_opacity(0.75),
            ),
            (
                Vec3::new(0.0, 50.0, -100.0),
                Material::basic(blue).with_opacity(0.8).with_blending(Blending::Additive),
            ),
            (
                Vec3::new(100.0, 50.0, -100.0),
                Material::basic(blue).with_blending(Blending::Additive),
            ),
        ];
        for (at, material) in spheres {
            let _ = add_mesh(scene, "translucent", sphere(), material, at);
        }
    }
}

impl Demo for Translucence {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);
        let _ = stage::ambient_light(scene, 0x44_4444);

        let moon = stage::texture(scene, assets::moon());
        Self::spheres(scene, moon);

        let ball = stage::texture(scene, assets::red_ball());
        let _ = add_mesh(
            scene,
            "ball",
            shapes::plane(100.0, 100.0, 1, 1),
            Material::basic(Color::WHITE)
                .with_map(ball)
                .with_side(Side::Double)
                .with_opacity(1.0),
            Vec3::new(200.0, 50.0, -100.0),
        );
        DemoSetup::default()
    }
}

/// Three colored spot lights casting shadows of a box onto the floor.
pub(super) struct Shadow;

impl Demo for Shadow {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        stage::fog(scene);
        let _ = stage::sky(scene);
        let _ = stage::axes(scene, 100.0);
        let root = scene.add(None, Node::group().with_name("shadow stage"));

        let spots = [
            (0xff_ff00, Vec3::new(-60.0, 150.0, -30.0), Vec3::ZERO),
            (0xff_0000, Vec3::new(60.0, 150.0, -60.0), Vec3::ZERO),
            (0x00_00ff, Vec3::new(150.0, 80.0, -100.0), Vec3::new(150.0, 10.0, -100.0)),
        ];
        for (hex, at, target) in spots {
            let light = Light::spot(Color::from_hex(hex))
                .with_target(target)
                .with_cone(0.5, 1.0)
                .with_shadow();
            let id = scene.add(
                Some(root),
                Node::light(light)
                    .with_name("spot light")
                    .with_position(at.x, at.y, at.z),
            );
            if let Some(helper) = helpers::shadow_camera(scene, id) {
                let _ = scene.add(Some(root), helper);
            }
        }

        let _ = scene.add(
            Some(root),
            Node::mesh(
                shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1),
                Material::lambert(Color::from_hex(0x88_8888)),
            )
            .with_name("box")
            .with_position(0.0, 50.0, 0.0)
            .with_shadows(true, true),
        );

        let checker = stage::texture(scene, assets::checkerboard()).with_repeat(10.0, 10.0);
        let _ = scene.add(
            Some(root),
            Node::mesh(
                shapes::plane(500.0, 500.0, 1, 1),
                Material::phong(Color::WHITE)
                    .with_specular(Color::BLACK)
                    .with_map(checker),
            )
            .with_name("floor")
            .with_position(0.0, -0.5, 0.0)
            .with_rotation_euler(-FRAC_PI_2, 0.0, 0.0)
            .with_shadows(true, true),
        );
        DemoSetup::default()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::super::harness::Harness;
    use super::super::DemoId;
    use super::*;

    fn first_map(h: &Harness, name: &str) -> Option<TextureMap> {
        let id = h.scene.find_by_name(name)?;
        h.scene.node(id)?.as_mesh()?.material(0)?.map
    }

    #[test]
    fn dice_uses_six_distinct_textures() {
        let h = Harness::new(DemoId::Textures);
        let Some(mesh) = h
            .scene
            .find_by_name("dice")
            .and_then(|id| h.scene.node(id))
            .and_then(Node::as_mesh)
        else {
            panic!("no dice");
        };
        let mut textures: Vec<_> = mesh
            .materials
            .iter()
            .filter_map(|m| m.map.map(|map| map.texture))
            .collect();
        textures.sort_unstable();
        textures.dedup();
        assert_eq!(textures.len(), 6);
    }

    #[test]
    fn repeated_crate_tiles_five_times() {
        let h = Harness::new(DemoId::TexturesRepeat);
        let map = first_map(&h, "crate repeated").map(|m| m.repeat);
        assert_eq!(map, Some(Vec2::splat(5.0)));
    }

    #[test]
    fn runner_advances_one_tile_per_75ms() {
        let mut h = Harness::new(DemoId::TextureAnimation);
        let start = first_map(&h, "runner");
        assert_eq!(start.map(|m| m.repeat), Some(Vec2::new(0.1, 1.0)));
        assert_eq!(start.map(|m| m.offset), Some(Vec2::ZERO));

        h.step(0.076);
        let offset = first_map(&h, "runner").map(|m| m.offset.x).unwrap_or_default();
        assert!((offset - 0.1).abs() < 1e-3, "offset {offset}");
    }

    #[test]
    fn explosion_walks_rows() {
        let mut h = Harness::new(DemoId::TextureAnimation);
        // five tiles of 55 ms: column 1 of row 1
        for _ in 0..5 {
            h.step(0.056);
        }
        let Some(map) = first_map(&h, "explosion") else {
            panic!("no explosion");
        };
        assert!((map.offset - Vec2::new(0.25, 0.25)).length() < 1e-4, "{}", map.offset);
    }

    #[test]
    fn canvases_are_transparent_planes() {
        let h = Harness::new(DemoId::TextureFromCanvas);
        for name in ["text canvas", "image canvas"] {
            let material = h
                .scene
                .find_by_name(name)
                .and_then(|id| h.scene.node(id))
                .and_then(Node::as_mesh)
                .and_then(|m| m.material(0).cloned());
            let Some(material) = material else {
                panic!("missing {name}");
            };
            assert!(material.transparent);
            assert_eq!(material.side, Side::Double);
        }
    }

    #[test]
    fn translucence_mixes_blend_modes() {
        let h = Harness::new(DemoId::Translucence);
        let materials: Vec<Material> = h
            .scene
            .iter()
            .iter()
            .filter(|w| w.node.name == "translucent")
            .filter_map(|w| w.node.as_mesh().and_then(|m| m.material(0).cloned()))
            .collect();
        assert_eq!(materials.len(), 8);
        assert!(materials.iter().all(|m| m.transparent));
        let additive = materials
            .iter()
            .filter(|m| m.blending == Blending::Additive)
            .count();
        assert_eq!(additive, 2);
    }

    #[test]
    fn shadow_lights_have_helpers() {
        let h = Harness::new(DemoId::Shadow);
        let casters = h
            .scene
            .iter()
            .iter()
            .filter(|w| w.node.as_light().is_some_and(Light::casts_shadow))
            .count();
        assert_eq!(casters, 3);
        let Some(root) = h.scene.find_by_name("shadow stage") else {
            panic!("no shadow stage");
        };
        // three lights, three frustum helpers, the box and the floor
        assert_eq!(h.scene.children(root).len(), 8);
    }
}
