//! Ray casts against the meshes of a scene.

use glam::{Mat4, Vec3};

use super::ray::Ray;
use crate::scene::{Mesh, NodeId, Scene, Side};

/// A ray crossing one triangle of a mesh node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Mesh node that was hit.
    pub node: NodeId,
    /// World-space distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// Vertex indices of the triangle.
    pub face: [u32; 3],
    /// Triangle index within the geometry.
    pub face_index: usize,
}

/// Casts a world-space ray against mesh nodes.
///
/// Hits are sorted nearest first. Triangles are culled the way the
/// material's [`Side`] culls them when drawing, and hidden nodes are
/// never hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raycaster {
    /// The ray being cast.
    pub ray: Ray,
    /// Hits closer than this are ignored.
    pub near: f32,
    /// Hits farther than this are ignored.
    pub far: f32,
}

impl Raycaster {
    /// Cast `ray` with an unbounded range.
    #[must_use]
    pub fn new(ray: Ray) -> Self {
        Self {
            ray,
            near: 0.0,
            far: f32::INFINITY,
        }
    }

    /// Hits on `id` and, when `recursive`, its descendants.
    #[must_use]
    pub fn intersect_node(&self, scene: &Scene, id: NodeId, recursive: bool) -> Vec<RayHit> {
        let mut hits = Vec::new();
        if scene.is_visible(id) {
            self.collect(scene, id, scene.world_matrix(id), recursive, &mut hits);
        }
        sort_hits(&mut hits);
        hits
    }

    /// Hits on every visible mesh in the scene.
    #[must_use]
    pub fn intersect_scene(&self, scene: &Scene) -> Vec<RayHit> {
        let mut hits = Vec::new();
        for entry in scene.iter() {
            if let Some(mesh) = entry.node.as_mesh() {
                self.intersect_mesh(entry.id, mesh, entry.world, &mut hits);
            }
        }
        sort_hits(&mut hits);
        hits
    }

    fn collect(
        &self,
        scene: &Scene,
        id: NodeId,
        world: Mat4,
        recursive: bool,
        hits: &mut Vec<RayHit>,
    ) {
        let Some(node) = scene.node(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        if let Some(mesh) = node.as_mesh() {
            self.intersect_mesh(id, mesh, world, hits);
        }
        if recursive {
            for child in node.children() {
                if let Some(child_node) = scene.node(*child) {
                    let child_world = world * child_node.transform.matrix();
                    self.collect(scene, *child, child_world, true, hits);
                }
            }
        }
    }

    fn intersect_mesh(&self, id: NodeId, mesh: &Mesh, world: Mat4, hits: &mut Vec<RayHit>) {
        let geometry = mesh.geometry();
        let to_world = |i: u32| {
            geometry
                .positions
                .get(i as usize)
                .map(|p| world.transform_point3(*p))
        };
        for (group, material) in mesh.draw_groups() {
            let first_face = group.start as usize / 3;
            for face_index in first_face..first_face + group.count as usize / 3 {
                let Some(face) = geometry.triangle(face_index) else {
                    break;
                };
                let (Some(a), Some(b), Some(c)) =
                    (to_world(face[0]), to_world(face[1]), to_world(face[2]))
                else {
                    continue;
                };
                let Some(hit) = self.ray.intersect_triangle(a, b, c) else {
                    continue;
                };
                let culled = match material.side {
                    Side::Front => !hit.front_facing,
                    Side::Back => hit.front_facing,
                    Side::Double => false,
                };
                if culled || hit.distance < self.near || hit.distance > self.far {
                    continue;
                }
                hits.push(RayHit {
                    node: id,
                    distance: hit.distance,
                    point: self.ray.at(hit.distance),
                    face,
                    face_index,
                });
            }
        }
    }
}

fn sort_hits(hits: &mut [RayHit]) {
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{shapes, Color, Material, Node};

    fn cube_scene() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let near = scene.add(
            None,
            Node::mesh(shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1), Material::basic(Color::WHITE))
                .with_position(0.0, 0.0, 100.0),
        );
        let far = scene.add(
            None,
            Node::mesh(shapes::sphere(25.0, 16, 8), Material::basic(Color::WHITE)),
        );
        (scene, near, far)
    }

    fn down_negative_z() -> Raycaster {
        Raycaster::new(Ray::new(Vec3::new(3.0, 7.0, 500.0), Vec3::NEG_Z))
    }

    #[test]
    fn nearest_hit_comes_first() {
        let (scene, near, far) = cube_scene();
        let hits = down_negative_z().intersect_scene(&scene);
        // front faces only: one hit per object
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert!((hits[0].distance - 375.0).abs() < 1e-3);
        assert_eq!(hits[1].node, far);
        assert!(hits[0].distance <= hits[1].distance);
        assert!((hits[0].point.z - 125.0).abs() < 1e-3);
    }

    #[test]
    fn double_sided_material_reports_exit_face() {
        let mut scene = Scene::new();
        let id = scene.add(
            None,
            Node::mesh(
                shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1),
                Material::basic(Color::WHITE).with_side(Side::Double),
            ),
        );
        let hits = down_negative_z().intersect_node(&scene, id, false);
        assert_eq!(hits.len(), 2);
        let back_only = Material::basic(Color::WHITE).with_side(Side::Back);
        if let Some(mesh) = scene.node_mut(id).and_then(|n| n.as_mesh_mut()) {
            mesh.materials = vec![back_only];
        }
        let hits = down_negative_z().intersect_node(&scene, id, false);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point.z + 25.0).abs() < 1e-3);
    }

    #[test]
    fn front_faces_face_the_ray_origin() {
        let mut scene = Scene::new();
        let id = scene.add(
            None,
            Node::mesh(shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1), Material::basic(Color::WHITE)),
        );
        let hits = down_negative_z().intersect_node(&scene, id, false);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].distance - 475.0).abs() < 1e-3);
        assert!((hits[0].point.z - 25.0).abs() < 1e-3);
    }

    #[test]
    fn back_sided_sky_is_hit_from_inside() {
        let mut scene = Scene::new();
        let sky = scene.add(
            None,
            Node::mesh(
                shapes::cuboid(10000.0, 10000.0, 10000.0, 1, 1, 1),
                Material::basic(Color::WHITE).with_side(Side::Back),
            ),
        );
        let caster = Raycaster::new(Ray::new(Vec3::new(3.0, 7.0, 400.0), Vec3::NEG_Z));
        let hits = caster.intersect_node(&scene, sky, false);
        assert_eq!(hits.len(), 1);
        assert!((hits[0].point.z + 5000.0).abs() < 1e-1);
    }

    #[test]
    fn hidden_nodes_are_skipped() {
        let (mut scene, near, far) = cube_scene();
        scene.node_mut(near).unwrap().visible = false;
        let hits = down_negative_z().intersect_scene(&scene);
        assert!(hits.iter().all(|h| h.node == far));
        assert!(down_negative_z().intersect_node(&scene, near, true).is_empty());
    }

    #[test]
    fn recursive_walk_includes_children() {
        let mut scene = Scene::new();
        let group = scene.add(None, Node::group().with_position(0.0, 0.0, 50.0));
        let child = scene.add(
            Some(group),
            Node::mesh(shapes::plane(20.0, 20.0, 1, 1), Material::basic(Color::WHITE)),
        );
        let caster = down_negative_z();
        assert!(caster.intersect_node(&scene, group, false).is_empty());
        let hits = caster.intersect_node(&scene, group, true);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, child);
        assert!((hits[0].distance - 450.0).abs() < 1e-3);
    }

    #[test]
    fn face_indices_belong_to_geometry() {
        let (scene, near, _) = cube_scene();
        let hit = down_negative_z().intersect_node(&scene, near, false)[0];
        let mesh = scene.node(near).unwrap().as_mesh().unwrap();
        assert_eq!(mesh.geometry().triangle(hit.face_index), Some(hit.face));
    }

    #[test]
    fn range_limits_apply() {
        let (scene, _, far) = cube_scene();
        let mut caster = down_negative_z();
        caster.far = 400.0;
        let hits = caster.intersect_scene(&scene);
        assert!(hits.iter().all(|h| h.node != far));
    }
}
