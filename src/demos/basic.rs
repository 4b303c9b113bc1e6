//! Materials, wireframes, vertex colors, shapes, lines and helpers.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use rand::Rng;

use super::stage;
use super::{Demo, DemoSetup, SetupContext};
use crate::scene::{
    helpers, shapes, Color, Geometry, LineGeometry, LineMaterial, Material, Node, Scene,
};

/// Basic, Lambert and Phong spheres lit by a point light.
pub(super) struct SolidMaterials;

impl Demo for SolidMaterials {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        let light = Vec3::new(0.0, 150.0, 100.0);
        let _ = stage::point_light(scene, light);
        let _ = stage::bulb(scene, light);

        let blue = Color::from_hex(0x00_0088);
        let spheres = [
            ("basic", -150.0, Material::basic(blue)),
            ("lambert", 0.0, Material::lambert(blue)),
            ("phong", 150.0, Material::phong(blue)),
        ];
        for (name, x, material) in spheres {
            let _ = scene.add(
                None,
                Node::mesh(shapes::sphere(50.0, 32, 16), material)
                    .with_name(name)
                    .with_position(x, 50.0, 0.0),
            );
        }
        DemoSetup::default()
    }
}

/// A wireframe sphere, a solid sphere with a wireframe twin, and the same
/// pair as one multi-material object.
pub(super) struct Wireframe;

impl Demo for Wireframe {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);

        let wire = Material::basic(Color::from_hex(0x00_ee00)).with_wireframe();
        let dark = Material::basic(Color::from_hex(0x00_0088));
        let sphere = || shapes::sphere(50.0, 32, 16);

        let _ = scene.add(
            None,
            Node::mesh(sphere(), wire.clone()).with_position(-150.0, 50.0, 0.0),
        );
        let _ = scene.add(None, Node::mesh(sphere(), dark.clone()).with_position(0.0, 50.0, 0.0));
        let _ = scene.add(None, Node::mesh(sphere(), wire.clone()).with_position(0.0, 50.0, 0.0));

        let group = scene.add_multi_material(None, sphere(), vec![dark, wire]);
        if let Some(node) = scene.node_mut(group) {
            node.transform.translation = Vec3::new(150.0, 50.0, 0.0);
        }
        DemoSetup::default()
    }
}

/// Random face colors, random vertex colors, and a cube colored by
/// position.
pub(super) struct VertexColors;

/// Segments per box edge.
const COLORED_SEGMENTS: u32 = 3;

impl VertexColors {
    fn face_colored(rng: &mut impl Rng) -> Geometry {
        let s = COLORED_SEGMENTS;
        let mut g = shapes::cuboid(80.0, 80.0, 80.0, s, s, s).to_non_indexed();
        for face in 0..g.triangle_count() {
            let color = Color::new(rng.random(), rng.random(), rng.random());
            g.paint_face(face, color);
        }
        g
    }

    fn vertex_colored(rng: &mut impl Rng) -> Geometry {
        let s = COLORED_SEGMENTS;
        let mut g = shapes::cuboid(80.0, 80.0, 80.0, s, s, s).to_non_indexed();
        let colors = (0..g.vertex_count())
            .map(|_| Color::new(rng.random(), rng.random(), rng.random()))
            .collect();
        let _ = g.set_vertex_colors(colors);
        g
    }

    /// Cube whose corners sweep the RGB cube.
    fn color_cube(size: f32) -> Geometry {
        let mut g = shapes::cuboid(size, size, size, 1, 1, 1);
        let channel = |v: f32| (125.0 + v * 255.0 / size).clamp(0.0, 255.0) / 255.0;
        let colors = g
            .positions
            .iter()
            .map(|p| Color::new(channel(p.x), channel(p.y), channel(p.z)))
            .collect();
        let _ = g.set_vertex_colors(colors);
        g
    }
}

impl Demo for VertexColors {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        stage::fog(scene);
        let _ = stage::sky(scene);
        let _ = stage::axes(scene, 100.0);
        stage::lights(scene);

        let material = Material::basic(Color::WHITE).with_vertex_colors();
        let cubes = [
            ("face colors", -100.0, Self::face_colored(ctx.rng)),
            ("vertex colors", 0.0, Self::vertex_colored(ctx.rng)),
            ("color cube", 100.0, Self::color_cube(80.0)),
        ];
        for (name, x, geometry) in cubes {
            let _ = scene.add(
                None,
                Node::mesh(geometry, material.clone())
                    .with_name(name)
                    .with_position(x, 50.0, 0.0),
            );
        }
        DemoSetup::default()
    }
}

/// Every geometry generator, solid with a wireframe overlay.
pub(super) struct Shapes;

impl Shapes {
    fn rows() -> Vec<(Geometry, Vec3)> {
        let at = |x: f32, z: f32| Vec3::new(x, 50.0, z);
        vec![
            (shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1), at(-200.0, 100.0)),
            (shapes::icosahedron(40.0, 0), at(-100.0, 100.0)),
            (shapes::octahedron(40.0, 0), at(0.0, 100.0)),
            (shapes::tetrahedron(40.0, 0), at(100.0, 100.0)),
            (shapes::sphere(40.0, 32, 16), at(200.0, 100.0)),
            (shapes::cuboid(50.0, 50.0, 50.0, 2, 2, 2), at(-200.0, 0.0)),
            (shapes::icosahedron(40.0, 1), at(-100.0, 0.0)),
            (shapes::octahedron(40.0, 1), at(0.0, 0.0)),
            (shapes::tetrahedron(40.0, 1), at(100.0, 0.0)),
            (shapes::sphere_section(40.0, 32, 16, FRAC_PI_2), at(200.0, 0.0)),
            (shapes::cylinder(30.0, 30.0, 80.0, 20, 4), at(-200.0, -100.0)),
            (shapes::cylinder(0.0, 30.0, 80.0, 20, 4), at(-100.0, -100.0)),
            (shapes::cylinder(0.0, 30.0, 100.0, 4, 4), at(0.0, -100.0)),
            (shapes::torus(25.0, 10.0, 8, 4), at(100.0, -100.0)),
            (shapes::torus_knot(30.0, 8.0, 60, 10, 2, 3), at(200.0, -100.0)),
            (shapes::cylinder(30.0, 30.0, 80.0, 6, 4), at(-200.0, -200.0)),
            (shapes::cylinder(10.0, 30.0, 100.0, 20, 4), at(-100.0, -200.0)),
            (shapes::cylinder(15.0, 30.0, 100.0, 6, 4), at(0.0, -200.0)),
            (shapes::torus(30.0, 20.0, 16, 40), at(100.0, -200.0)),
            (shapes::torus_knot(30.0, 6.0, 160, 10, 3, 7), at(200.0, -200.0)),
        ]
    }
}

impl Demo for Shapes {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);

        let shapes_root = scene.add(None, Node::group().with_name("shapes"));
        let solid = Material::basic(Color::from_hex(0xff_ffcc));
        let wire = Material::basic(Color::BLACK).with_wireframe();
        for (geometry, at) in Self::rows() {
            let id = scene.add_multi_material(
                Some(shapes_root),
                geometry,
                vec![solid.clone(), wire.clone()],
            );
            if let Some(node) = scene.node_mut(id) {
                node.transform.translation = at;
            }
        }
        DemoSetup::default()
    }
}

/// A plain line beside a dashed one.
pub(super) struct Extrusion;

impl Extrusion {
    /// Ten-point star outline, 80 wide and 100 tall.
    const STAR: [(f32, f32); 10] = [
        (0.0, 50.0),
        (10.0, 10.0),
        (40.0, 10.0),
        (20.0, -10.0),
        (30.0, -50.0),
        (0.0, -20.0),
        (-30.0, -50.0),
        (-20.0, -10.0),
        (-40.0, 10.0),
        (-10.0, 10.0),
    ];
    const DEPTH: f32 = 4.0;
}

impl Demo for Extrusion {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);

        let outline: Vec<Vec2> = Self::STAR.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
        let geometry = Arc::new(shapes::extrude(&outline, Self::DEPTH));
        let faces = vec![
            Material::basic(Color::from_hex(0xff_ff00)),
            Material::basic(Color::from_hex(0xff_8800)),
        ];
        let star = scene.add(None, Node::group().with_name("star").with_position(0.0, 50.0, 0.0));
        let _ = scene.add(
            Some(star),
            Node::multi_mesh(Arc::clone(&geometry), faces).with_name("star faces"),
        );
        let _ = scene.add(
            Some(star),
            Node::mesh(geometry, Material::basic(Color::BLACK).with_wireframe())
                .with_name("star outline"),
        );
        DemoSetup::default()
    }
}

pub(super) struct DashedLines;

impl Demo for DashedLines {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);

        let vertical = |x: f32| {
            LineGeometry::from_strip(&[Vec3::new(x, -100.0, 0.0), Vec3::new(x, 100.0, 0.0)])
        };
        let _ = scene.add(
            None,
            Node::lines(vertical(-150.0), LineMaterial::new(Color::from_hex(0xcc_0000)))
                .with_name("solid line"),
        );
        let mut dashed = vertical(-100.0);
        dashed.compute_line_distances();
        let _ = scene.add(
            None,
            Node::lines(dashed, LineMaterial::dashed(Color::from_hex(0x00_cc00), 4.0, 2.0))
                .with_name("dashed line"),
        );
        DemoSetup::default()
    }
}

/// Axes, three grids and an arrow around a sphere.
pub(super) struct Helpers;

impl Helpers {
    fn grids(scene: &mut Scene) {
        let grids = [
            (0x00_6600, Vec3::new(100.0, 0.0, 100.0), Vec3::ZERO),
            (0x00_0066, Vec3::new(100.0, 100.0, 0.0), Vec3::new(FRAC_PI_2, 0.0, 0.0)),
            (0x66_0000, Vec3::new(0.0, 100.0, 100.0), Vec3::new(0.0, 0.0, FRAC_PI_2)),
        ];
        for (hex, at, euler) in grids {
            let color = Color::from_hex(hex);
            let _ = scene.add(
                None,
                helpers::grid(200.0, 10, color, color)
                    .with_position(at.x, at.y, at.z)
                    .with_rotation_euler(euler.x, euler.y, euler.z),
            );
        }
    }
}

impl Demo for Helpers {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);

        let _ = scene.add(
            None,
            Node::mesh(
                shapes::sphere(30.0, 32, 16),
                Material::lambert(Color::from_hex(0x00_0088)),
            )
            .with_position(40.0, 40.0, 40.0),
        );
        let _ = scene.add(None, helpers::axes(50.0).with_position(40.0, 40.0, 40.0));
        Self::grids(scene);

        let origin = Vec3::new(50.0, 100.0, 50.0);
        let terminus = Vec3::new(75.0, 75.0, 75.0);
        let _ = helpers::arrow(
            scene,
            None,
            (terminus - origin).normalize(),
            origin,
            50.0,
            Color::from_hex(0x88_4400),
        );
        DemoSetup::default()
    }
}
