//! Mouse and keyboard driven demos.

use glam::Vec3;
use rand::Rng;

use super::assets;
use super::stage;
use super::{Demo, DemoSetup, FrameContext, SetupContext};
use crate::picking::{RayHit, Raycaster};
use crate::scene::canvas::Canvas;
use crate::scene::{
    shapes, Color, Material, Mesh, Node, NodeId, Scene, SpriteMaterial, TextureMap,
};

/// Color of whatever the cursor is over.
const HIGHLIGHT: u32 = 0xff_ff00;
/// Distance from the eye of the cursor-following sprite.
const SPRITE_DISTANCE: f32 = 150.0;
/// Units per second for held movement keys.
const MOVE_SPEED: f32 = 200.0;
/// Units per press for the arrow keys.
const STEP: f32 = 50.0;

/// Nearest hit on any of `targets` under the cursor.
fn pick_among(ctx: &FrameContext<'_>, targets: &[NodeId]) -> Option<RayHit> {
    Raycaster::new(ctx.pointer_ray())
        .intersect_scene(ctx.scene)
        .into_iter()
        .find(|hit| targets.contains(&hit.node))
}

fn first_material(scene: &mut Scene, id: NodeId) -> Option<&mut Material> {
    scene
        .node_mut(id)
        .and_then(Node::as_mesh_mut)
        .and_then(Mesh::material_mut)
}

/// Recolors the hovered mesh and restores the one it replaces.
#[derive(Debug, Default)]
struct Highlight {
    current: Option<(NodeId, Color)>,
}

impl Highlight {
    /// Returns whether the hovered node changed.
    fn track(&mut self, scene: &mut Scene, hovered: Option<NodeId>) -> bool {
        if self.current.map(|(id, _)| id) == hovered {
            return false;
        }
        if let Some((id, color)) = self.current.take() {
            if let Some(material) = first_material(scene, id) {
                material.color = color;
            }
        }
        if let Some(id) = hovered {
            if let Some(material) = first_material(scene, id) {
                self.current = Some((id, material.color));
                material.color = Color::from_hex(HIGHLIGHT);
            }
        }
        true
    }

    fn node(&self) -> Option<NodeId> {
        self.current.map(|(id, _)| id)
    }
}

/// The hoverable box and floor shared by the hover demos.
fn hover_targets(scene: &mut Scene) -> Vec<NodeId> {
    stage::fog(scene);
    let _ = stage::sky(scene);
    let _ = stage::axes(scene, 100.0);
    stage::lights(scene);
    let cube = scene.add(
        None,
        Node::mesh(
            shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1),
            Material::basic(Color::from_hex(0x00_0088)),
        )
        .with_name("box")
        .with_position(0.0, 26.0, 0.0),
    );
    vec![cube, stage::floor(scene)]
}

/// Highlights the mesh under the cursor.
#[derive(Debug, Default)]
pub(super) struct MouseHover {
    targets: Vec<NodeId>,
    highlight: Highlight,
}

impl Demo for MouseHover {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        self.targets = hover_targets(ctx.scene);
        self.highlight = Highlight::default();
        DemoSetup::default()
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        let hovered = pick_among(ctx, &self.targets).map(|hit| hit.node);
        let _ = self.highlight.track(ctx.scene, hovered);
    }
}

/// Paints clicked faces of a sphere red.
#[derive(Debug, Default)]
pub(super) struct MouseClick {
    sphere: Option<NodeId>,
}

impl Demo for MouseClick {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let _ = stage::surroundings(ctx.scene);
        stage::lights(ctx.scene);

        let mut geometry = shapes::sphere(80.0, 32, 16).to_non_indexed();
        let colors = (0..geometry.triangle_count())
            .flat_map(|_| {
                let shade = Color::new(0.0, 0.0, ctx.rng.random_range(0.2..1.0));
                [shade; 3]
            })
            .collect();
        if !geometry.set_vertex_colors(colors) {
            log::warn!("sphere colors do not match its vertices");
        }
        self.sphere = Some(
            ctx.scene.add(
                None,
                Node::mesh(geometry, Material::basic(Color::WHITE).with_vertex_colors())
                    .with_name("clickable sphere")
                    .with_position(100.0, 50.0, -50.0),
            ),
        );
        DemoSetup::default()
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        if !ctx.mouse.clicked() {
            return;
        }
        let Some(sphere) = self.sphere else {
            return;
        };
        let Some(hit) = ctx.pick(sphere) else {
            return;
        };
        log::debug!("clicked face {} at {}", hit.face_index, hit.point);
        if let Some(mesh) = ctx.scene.node_mut(sphere).and_then(Node::as_mesh_mut) {
            mesh.geometry_mut()
                .paint_face(hit.face_index, Color::from_hex(0xff_0000));
        }
    }
}

/// Hover highlighting plus a name tag that follows the hovered mesh.
#[derive(Debug, Default)]
pub(super) struct MouseTooltip {
    targets: Vec<NodeId>,
    highlight: Highlight,
    /// One painted tag per target, in `targets` order.
    tags: Vec<TextureMap>,
    tooltip: Option<NodeId>,
}

impl MouseTooltip {
    const CANVAS: (u32, u32) = (300, 150);
    const FONT_SIZE: f32 = 20.0;
}

impl Demo for MouseTooltip {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        self.targets = hover_targets(scene);
        self.highlight = Highlight::default();

        self.tags = Vec::with_capacity(self.targets.len());
        for &id in &self.targets {
            let name = scene.node(id).map(|n| n.name.clone()).unwrap_or_default();
            let (w, h) = Self::CANVAS;
            let mut canvas = Canvas::new(w, h);
            let width = ctx.labels.measure(&name, Self::FONT_SIZE);
            canvas.fill_rect(0.0, 0.0, width + 8.0, Self::FONT_SIZE + 8.0, [0, 0, 0, 242]);
            let _ = ctx.labels.fill_text(
                &mut canvas,
                &name,
                4.0,
                Self::FONT_SIZE,
                Self::FONT_SIZE,
                [255, 255, 255, 242],
            );
            self.tags.push(stage::texture(scene, canvas.into_image()));
        }

        self.tooltip = self.tags.first().map(|&map| {
            let mut node = Node::sprite(SpriteMaterial::new(map).without_depth_test())
                .with_name("tooltip")
                .with_scale(200.0, 100.0, 1.0);
            node.visible = false;
            scene.add(None, node)
        });
        DemoSetup::default()
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        let hit = pick_among(ctx, &self.targets);
        let _ = self.highlight.track(ctx.scene, hit.as_ref().map(|h| h.node));
        let Some(tooltip) = self.tooltip else {
            return;
        };
        let tag = self
            .highlight
            .node()
            .and_then(|id| self.targets.iter().position(|&t| t == id))
            .and_then(|i| self.tags.get(i).copied());
        let Some(node) = ctx.scene.node_mut(tooltip) else {
            return;
        };
        node.visible = hit.is_some();
        if let Some(hit) = hit {
            // top-left corner on the hit point
            node.transform.translation = hit.point + Vec3::new(100.0, -50.0, 0.0);
        }
        if let (Some(tag), Some(sprite)) = (tag, node.as_sprite_mut()) {
            sprite.material.map = Some(tag);
        }
    }
}

/// A ball sprite that follows the cursor at a fixed distance.
#[derive(Debug, Default)]
pub(super) struct MouseSprite {
    ball: Option<NodeId>,
}

impl Demo for MouseSprite {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);
        let _ = scene.add(
            None,
            Node::mesh(
                shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1),
                Material::lambert(Color::from_hex(0x88_8888)),
            )
            .with_name("box")
            .with_position(0.0, 26.0, 0.0),
        );
        let map = stage::texture(scene, assets::red_ball());
        self.ball = Some(scene.add(
            None,
            Node::sprite(SpriteMaterial::new(map).without_depth_test())
                .with_name("cursor ball")
                .with_scale(32.0, 32.0, 1.0),
        ));
        DemoSetup::default()
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        if !ctx.mouse.moved() {
            return;
        }
        let ray = ctx.pointer_ray();
        if let Some(node) = self.ball.and_then(|id| ctx.scene.node_mut(id)) {
            node.transform.translation = ctx.camera.eye + ray.direction * SPRITE_DISTANCE;
        }
    }
}

/// A sphere steered with the arrow keys and A/D, recolored while R is held.
#[derive(Debug, Default)]
pub(super) struct KeyboardEvents {
    sphere: Option<NodeId>,
}

impl Demo for KeyboardEvents {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);
        self.sphere = Some(
            scene.add(
                None,
                Node::mesh(
                    shapes::sphere(30.0, 32, 16),
                    Material::lambert(Color::from_hex(0x00_00ff)),
                )
                .with_name("steered sphere")
                .with_position(0.0, 40.0, 0.0),
            ),
        );
        DemoSetup::default()
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        let Some(sphere) = self.sphere else {
            return;
        };
        let keys = ctx.keyboard;
        let mut delta = Vec3::ZERO;
        for (code, dir) in [
            ("ArrowLeft", -Vec3::X),
            ("ArrowRight", Vec3::X),
            ("ArrowUp", -Vec3::Z),
            ("ArrowDown", Vec3::Z),
        ] {
            if keys.down(code) {
                delta += dir * STEP;
            }
        }
        let held = MOVE_SPEED * ctx.dt;
        if keys.pressed("KeyA") {
            delta.x -= held;
        }
        if keys.pressed("KeyD") {
            delta.x += held;
        }

        let recolor = if keys.down("KeyR") {
            Some(0xff_0000)
        } else if keys.up("KeyR") {
            Some(0x00_00ff)
        } else {
            None
        };
        let Some(node) = ctx.scene.node_mut(sphere) else {
            return;
        };
        node.transform.translate_local(delta);
        if let Some(hex) = recolor {
            if let Some(material) = node.as_mesh_mut().and_then(Mesh::material_mut) {
                material.color = Color::from_hex(hex);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::harness::Harness;
    use super::super::DemoId;
    use super::*;

    fn color_of(h: &Harness, name: &str) -> u32 {
        h.scene
            .find_by_name(name)
            .and_then(|id| h.scene.node(id))
            .and_then(Node::as_mesh)
            .and_then(|m| m.material(0))
            .map_or(0, |m| m.color.to_hex())
    }

    #[test]
    fn hover_moves_the_highlight() {
        let mut h = Harness::new(DemoId::MouseHover);
        h.point_at(Vec3::new(0.0, 26.0, 25.0));
        h.step(0.016);
        assert_eq!(color_of(&h, "box"), HIGHLIGHT);

        h.point_at(Vec3::new(-150.0, 0.0, -200.0));
        h.step(0.016);
        assert_eq!(color_of(&h, "box"), 0x00_0088);
        assert_eq!(color_of(&h, "floor"), HIGHLIGHT);
    }

    #[test]
    fn click_paints_one_face() {
        let mut h = Harness::new(DemoId::MouseClick);
        h.point_at(Vec3::new(100.0, 50.0, -50.0));
        h.click();
        h.step(0.016);

        let Some(mesh) = h
            .scene
            .find_by_name("clickable sphere")
            .and_then(|id| h.scene.node(id))
            .and_then(Node::as_mesh)
        else {
            panic!("no sphere");
        };
        let red = Color::from_hex(0xff_0000);
        let geometry = mesh.geometry();
        let colors = geometry.colors.clone().unwrap_or_default();
        assert_eq!(colors.iter().filter(|&&c| c == red).count(), 3);

        // the painted face is on the side facing the camera
        let center = Vec3::new(100.0, 50.0, -50.0);
        let painted: Vec3 = colors
            .iter()
            .zip(&geometry.positions)
            .filter(|(c, _)| **c == red)
            .map(|(_, p)| *p + center)
            .sum::<Vec3>()
            / 3.0;
        assert!(painted.distance(h.camera.eye) < center.distance(h.camera.eye) - 50.0);
    }

    #[test]
    fn click_without_hit_changes_nothing() {
        let mut h = Harness::new(DemoId::MouseClick);
        let _ = h.mouse.handle_mouse_position(0.0, 0.0);
        h.click();
        h.step(0.016);
        let Some(mesh) = h
            .scene
            .find_by_name("clickable sphere")
            .and_then(|id| h.scene.node(id))
            .and_then(Node::as_mesh)
        else {
            panic!("no sphere");
        };
        let colors = mesh.geometry().colors.clone().unwrap_or_default();
        assert!(colors.iter().all(|c| c.r == 0.0 && c.b >= 0.2));
    }

    #[test]
    fn tooltip_shows_only_over_targets() {
        let mut h = Harness::new(DemoId::MouseTooltip);
        let visible = |h: &Harness| {
            h.scene
                .find_by_name("tooltip")
                .and_then(|id| h.scene.node(id))
                .is_some_and(|n| n.visible)
        };
        assert!(!visible(&h));
        h.point_at(Vec3::new(0.0, 26.0, 25.0));
        h.step(0.016);
        assert!(visible(&h));

        // straight up into the sky
        let _ = h.mouse.handle_mouse_position(400.0, 0.0);
        h.step(0.016);
        assert!(!visible(&h));
    }

    #[test]
    fn ball_follows_the_cursor() {
        let mut h = Harness::new(DemoId::MouseSprite);
        let _ = h.mouse.handle_mouse_position(400.0, 400.0);
        h.step(0.016);
        let Some(ball) = h.scene.find_by_name("cursor ball") else {
            panic!("no ball");
        };
        let at = h.scene.world_position(ball);
        assert!((at.distance(h.camera.eye) - SPRITE_DISTANCE).abs() < 1e-2);
        let toward_target = (h.camera.target - h.camera.eye).normalize();
        assert!((at - h.camera.eye).normalize().dot(toward_target) > 0.999);
    }

    #[test]
    fn keys_move_and_recolor_the_sphere() {
        let mut h = Harness::new(DemoId::KeyboardEvents);
        let Some(sphere) = h.scene.find_by_name("steered sphere") else {
            panic!("no sphere");
        };

        let _ = h.keyboard.handle_key("ArrowRight", true);
        h.step(0.1);
        h.step(0.1);
        assert!((h.scene.world_position(sphere).x - STEP).abs() < 1e-4);

        let _ = h.keyboard.handle_key("KeyA", true);
        h.step(0.5);
        assert!((h.scene.world_position(sphere).x - (STEP - 100.0)).abs() < 1e-3);

        let _ = h.keyboard.handle_key("KeyR", true);
        h.step(0.016);
        assert_eq!(color_of(&h, "steered sphere"), 0xff_0000);
        let _ = h.keyboard.handle_key("KeyR", false);
        h.step(0.016);
        assert_eq!(color_of(&h, "steered sphere"), 0x00_00ff);
    }
}
