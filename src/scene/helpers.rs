//! Debug visualisations built from lines and simple meshes.

use glam::{Mat4, Quat, Vec3};

use super::color::Color;
use super::lines::LineGeometry;
use super::material::{LineMaterial, Material};
use super::node::{Node, NodeId};
use super::shapes;
use super::Scene;

/// Three colored lines along +X (red), +Y (green) and +Z (blue).
#[must_use]
pub fn axes(size: f32) -> Node {
    let mut g = LineGeometry::default();
    let axes = [
        (Vec3::X, Color::new(1.0, 0.0, 0.0), Color::new(1.0, 0.6, 0.0)),
        (Vec3::Y, Color::new(0.0, 1.0, 0.0), Color::new(0.6, 1.0, 0.0)),
        (Vec3::Z, Color::new(0.0, 0.0, 1.0), Color::new(0.0, 0.6, 1.0)),
    ];
    for (dir, start, end) in axes {
        g.push_colored(Vec3::ZERO, dir * size, start, end);
    }
    Node::lines(g, LineMaterial::vertex_colored()).with_name("axes")
}

/// Square grid in the XZ plane with `divisions` cells per side. The two
/// centre lines use `center_color`.
#[must_use]
pub fn grid(size: f32, divisions: u32, center_color: Color, line_color: Color) -> Node {
    let divisions = divisions.max(1);
    let step = size / divisions as f32;
    let half = size * 0.5;
    let center = divisions / 2;
    let mut g = LineGeometry::default();
    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if i == center {
            center_color
        } else {
            line_color
        };
        g.push_colored(Vec3::new(-half, 0.0, k), Vec3::new(half, 0.0, k), color, color);
        g.push_colored(Vec3::new(k, 0.0, -half), Vec3::new(k, 0.0, half), color, color);
    }
    Node::lines(g, LineMaterial::vertex_colored()).with_name("grid")
}

/// Arrow from `origin` along `direction`: a line shaft with a cone head
/// taking the last fifth of `length`. Returns the arrow's root node.
pub fn arrow(
    scene: &mut Scene,
    parent: Option<NodeId>,
    direction: Vec3,
    origin: Vec3,
    length: f32,
    color: Color,
) -> NodeId {
    let head_length = 0.2 * length;
    let head_width = 0.2 * head_length;
    let dir = direction.try_normalize().unwrap_or(Vec3::Y);

    let mut root = Node::group().with_name("arrow");
    root.transform.translation = origin;
    root.transform.rotation = Quat::from_rotation_arc(Vec3::Y, dir);
    let root = scene.add(parent, root);

    let shaft = LineGeometry::from_segments(vec![
        Vec3::ZERO,
        Vec3::new(0.0, (length - head_length).max(1e-4), 0.0),
    ]);
    let _ = scene.add(Some(root), Node::lines(shaft, LineMaterial::new(color)));
    let cone = shapes::cylinder(0.0, head_width * 0.5, head_length, 5, 1);
    let _ = scene.add(
        Some(root),
        Node::mesh(cone, Material::basic(color)).with_position(
            0.0,
            length - head_length * 0.5,
            0.0,
        ),
    );
    root
}

/// Wire box of a camera frustum, given the camera's view-projection.
///
/// Draws the near and far rectangles, the four side edges, and a line
/// from the near centre to the far centre.
#[must_use]
pub fn frustum(view_proj: Mat4) -> Node {
    let inv = view_proj.inverse();
    let corner = |x: f32, y: f32, z: f32| inv.project_point3(Vec3::new(x, y, z));
    let near = [
        corner(-1.0, -1.0, 0.0),
        corner(1.0, -1.0, 0.0),
        corner(1.0, 1.0, 0.0),
        corner(-1.0, 1.0, 0.0),
    ];
    let far = [
        corner(-1.0, -1.0, 1.0),
        corner(1.0, -1.0, 1.0),
        corner(1.0, 1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
    ];
    let frame = Color::from_hex(0xffaa00);
    let side = Color::from_hex(0xff0000);
    let axis = Color::from_hex(0xffffff);

    let mut g = LineGeometry::default();
    for i in 0..4 {
        let j = (i + 1) % 4;
        g.push_colored(near[i], near[j], frame, frame);
        g.push_colored(far[i], far[j], frame, frame);
        g.push_colored(near[i], far[i], side, side);
    }
    g.push_colored(corner(0.0, 0.0, 0.0), corner(0.0, 0.0, 1.0), axis, axis);
    Node::lines(g, LineMaterial::vertex_colored()).with_name("frustum")
}

/// Frustum helper for a shadow-casting light node, or `None` when the node
/// is not such a light.
#[must_use]
pub fn shadow_camera(scene: &Scene, light: NodeId) -> Option<Node> {
    let l = scene.node(light)?.as_light()?;
    let view_proj = l.shadow_view_proj(scene.world_position(light))?;
    Some(frustum(view_proj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Light, NodeKind};

    fn lines_of(node: &Node) -> &LineGeometry {
        match &node.kind {
            NodeKind::Lines(l) => l.geometry(),
            _ => panic!("expected a line node"),
        }
    }

    #[test]
    fn axes_have_three_colored_segments() {
        let node = axes(100.0);
        let g = lines_of(&node);
        assert_eq!(g.segment_count(), 3);
        assert_eq!(g.positions[5], Vec3::new(0.0, 0.0, 100.0));
        assert_eq!(g.colors.as_ref().map(Vec::len), Some(6));
    }

    #[test]
    fn grid_has_lines_both_ways() {
        let node = grid(200.0, 10, Color::BLACK, Color::WHITE);
        assert_eq!(lines_of(&node).segment_count(), 22);
    }

    #[test]
    fn arrow_points_along_direction() {
        let mut scene = Scene::new();
        let origin = Vec3::new(50.0, 100.0, 50.0);
        let dir = (Vec3::new(75.0, 75.0, 75.0) - origin).normalize();
        let root = arrow(&mut scene, None, dir, origin, 50.0, Color::from_hex(0x884400));
        let head = scene.children(root)[1];
        let tip_dir = (scene.world_position(head) - origin).normalize();
        assert!(tip_dir.dot(dir) > 0.999);
    }

    #[test]
    fn shadow_camera_needs_shadow_light() {
        let mut scene = Scene::new();
        let plain = scene.add(None, Node::light(Light::spot(Color::WHITE)));
        let shadowed = scene.add(
            None,
            Node::light(Light::spot(Color::WHITE).with_cone(0.5, 1.0).with_shadow())
                .with_position(-60.0, 150.0, -30.0),
        );
        assert!(shadow_camera(&scene, plain).is_none());
        let helper = shadow_camera(&scene, shadowed);
        assert!(helper.as_ref().is_some_and(|n| lines_of(n).segment_count() == 13));
    }
}
