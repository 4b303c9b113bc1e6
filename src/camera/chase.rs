use glam::Vec3;

use crate::camera::core::Camera;
use crate::scene::{NodeId, Scene};

/// Third-person rig: keeps the camera at a fixed offset in a node's local
/// frame, looking at the node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseCamera {
    /// Eye position relative to the followed node, in its local frame.
    pub offset: Vec3,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 50.0, 200.0),
        }
    }
}

impl ChaseCamera {
    /// Follow with the given local offset.
    #[must_use]
    pub fn new(offset: Vec3) -> Self {
        Self { offset }
    }

    /// Move `camera` behind `node`. Returns `false` if the node is gone.
    pub fn follow(&self, scene: &Scene, node: NodeId, camera: &mut Camera) -> bool {
        if scene.node(node).is_none() {
            return false;
        }
        let world = scene.world_matrix(node);
        camera.eye = world.transform_point3(self.offset);
        camera.target = world.transform_point3(Vec3::ZERO);
        camera.up = Vec3::Y;
        true
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::scene::Node;

    #[test]
    fn offset_follows_node_rotation() {
        let mut scene = Scene::new();
        let id = scene.add(None, Node::group().with_position(10.0, 25.0, 0.0));
        let mut camera = Camera::default();
        let chase = ChaseCamera::default();

        assert!(chase.follow(&scene, id, &mut camera));
        assert!((camera.eye - Vec3::new(10.0, 75.0, 200.0)).length() < 1e-4);
        assert!((camera.target - Vec3::new(10.0, 25.0, 0.0)).length() < 1e-4);

        scene
            .node_mut(id)
            .unwrap()
            .transform
            .rotate_on_axis(Vec3::Y, FRAC_PI_2);
        assert!(chase.follow(&scene, id, &mut camera));
        // local +Z now points along world +X
        assert!((camera.eye - Vec3::new(210.0, 75.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn missing_node_leaves_camera_alone() {
        let mut scene = Scene::new();
        let id = scene.add(None, Node::group());
        let _ = scene.remove(id);
        let mut camera = Camera::default();
        assert!(!ChaseCamera::default().follow(&scene, id, &mut camera));
        assert_eq!(camera, Camera::default());
    }
}
