//! Billboards: tinted sprites and text labels.

use glam::Vec3;

use super::assets;
use super::stage;
use super::{Demo, DemoSetup, SetupContext};
use crate::scene::{shapes, Color, Material, Node, NodeId, Scene, SpriteMaterial};
use crate::sprite::{LabelPainter, LabelStyle};

/// Add a billboard showing `text` at `at`, sized `width` by `height` units.
fn label(
    scene: &mut Scene,
    painter: &LabelPainter,
    text: &str,
    style: &LabelStyle,
    at: Vec3,
    size: (f32, f32),
) -> NodeId {
    let map = stage::texture(scene, painter.paint(text, style));
    scene.add(
        None,
        Node::sprite(SpriteMaterial::new(map))
            .with_name(text.trim())
            .with_position(at.x, at.y, at.z)
            .with_scale(size.0, size.1, 1.0),
    )
}

/// Three crate sprites tinted red, green and blue.
pub(super) struct Sprites;

impl Demo for Sprites {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);

        let map = stage::texture(scene, assets::wooden_crate());
        for (x, hex) in [(-100.0, 0xff_0000), (0.0, 0x00_ff00), (100.0, 0x00_00ff)] {
            let material = SpriteMaterial::new(map).with_color(Color::from_hex(hex));
            let _ = scene.add(
                None,
                Node::sprite(material)
                    .with_name("crate sprite")
                    .with_position(x, 50.0, 0.0)
                    .with_scale(64.0, 64.0, 1.0),
            );
        }
        DemoSetup::default()
    }
}

/// Two bordered labels floating over a cube.
pub(super) struct SpriteTextLabels;

impl Demo for SpriteTextLabels {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);

        let _ = scene.add(
            None,
            Node::mesh(
                shapes::cuboid(100.0, 100.0, 100.0, 1, 1, 1),
                Material::normal(),
            )
            .with_name("Cube")
            .with_position(0.0, 50.1, 0.0),
        );

        let hello = LabelStyle {
            font_size: 24.0,
            border_color: [255, 0, 0, 255],
            background_color: [255, 100, 100, 204],
            ..LabelStyle::default()
        };
        let _ = label(
            scene,
            ctx.labels,
            "Hello, ",
            &hello,
            Vec3::new(-85.0, 105.0, 55.0),
            (100.0, 50.0),
        );
        let world = LabelStyle {
            font_size: 32.0,
            border_color: [0, 0, 255, 255],
            ..LabelStyle::default()
        };
        let _ = label(
            scene,
            ctx.labels,
            " World!",
            &world,
            Vec3::new(55.0, 105.0, 55.0),
            (100.0, 50.0),
        );
        DemoSetup::default()
    }
}

/// A coarse sphere with every vertex and every third face numbered.
pub(super) struct LabeledGeometry;

impl LabeledGeometry {
    const PUSH_OUT: f32 = 1.1;
    const FACE_STRIDE: usize = 3;
}

impl Demo for LabeledGeometry {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        stage::fog(scene);
        let _ = stage::sky(scene);
        let _ = stage::axes(scene, 100.0);
        stage::lights(scene);

        let geometry = shapes::sphere(100.0, 4, 3)
            .merge_vertices(10.0)
            .to_non_indexed();
        let vertices = geometry.positions.clone();
        let _ = scene.add(
            None,
            Node::mesh(geometry, Material::normal()).with_name("labeled sphere"),
        );

        let vertex_style = LabelStyle {
            font_size: 32.0,
            background_color: [255, 100, 100, 255],
            ..LabelStyle::default()
        };
        for (i, v) in vertices.iter().enumerate() {
            let _ = label(
                scene,
                ctx.labels,
                &format!(" {i} "),
                &vertex_style,
                *v * Self::PUSH_OUT,
                (100.0, 50.0),
            );
        }

        let face_style = LabelStyle {
            font_size: 32.0,
            background_color: [100, 100, 255, 255],
            ..LabelStyle::default()
        };
        for (face, tri) in vertices
            .chunks_exact(3)
            .enumerate()
            .step_by(Self::FACE_STRIDE)
        {
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            let _ = label(
                scene,
                ctx.labels,
                &format!(" {face} "),
                &face_style,
                centroid * Self::PUSH_OUT,
                (100.0, 50.0),
            );
        }
        DemoSetup::default()
    }
}

#[cfg(test)]
mod tests {
    use super::super::harness::Harness;
    use super::super::DemoId;
    use super::*;
    use crate::scene::NodeKind;

    fn sprites(h: &Harness) -> Vec<(String, SpriteMaterial, Vec3)> {
        h.scene
            .iter()
            .into_iter()
            .filter_map(|w| match &w.node.kind {
                NodeKind::Sprite(s) => Some((w.node.name.clone(), s.material, w.node.transform.scale)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn crate_sprites_are_tinted() {
        let h = Harness::new(DemoId::Sprites);
        let all = sprites(&h);
        assert_eq!(all.len(), 3);
        let colors: Vec<_> = all.iter().map(|(_, m, _)| m.color.to_hex()).collect();
        assert_eq!(colors, vec![0xff_0000, 0x00_ff00, 0x00_00ff]);
        assert!(all.iter().all(|(_, _, s)| *s == Vec3::new(64.0, 64.0, 1.0)));
    }

    #[test]
    fn labels_sit_above_the_cube() {
        let h = Harness::new(DemoId::SpriteTextLabels);
        let names: Vec<_> = sprites(&h).into_iter().map(|(n, _, _)| n).collect();
        assert_eq!(names, vec!["Hello,", "World!"]);
        let Some(hello) = h.scene.find_by_name("Hello,") else {
            panic!("no label");
        };
        assert!(h.scene.world_position(hello).y > 100.0);
    }

    #[test]
    fn labels_have_opaque_borders() {
        let painter = LabelPainter::without_font();
        let style = LabelStyle {
            border_color: [255, 0, 0, 255],
            ..LabelStyle::default()
        };
        let image = painter.paint("Hello", &style);
        let mid = image.height() / 2;
        assert_eq!(image.pixel(1, mid), Some([255, 0, 0, 255]));
    }

    #[test]
    fn every_vertex_and_third_face_is_labeled() {
        let h = Harness::new(DemoId::LabeledGeometry);
        let Some(sphere) = h
            .scene
            .find_by_name("labeled sphere")
            .and_then(|id| h.scene.node(id))
            .and_then(Node::as_mesh)
        else {
            panic!("no sphere");
        };
        let vertices = sphere.geometry().vertex_count();
        let faces = sphere.geometry().triangle_count();
        assert_eq!(vertices, faces * 3);
        let labels = sprites(&h).len();
        assert_eq!(labels, vertices + faces.div_ceil(3));
    }
}
