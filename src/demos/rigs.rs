//! A keyboard-driven box with a camera riding behind it.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::assets;
use super::stage;
use super::{Demo, DemoSetup, FrameContext, SetupContext};
use crate::camera::ChaseCamera;
use crate::scene::{shapes, Color, Material, Node, NodeId, Transform};

/// Where the box starts and returns to on reset.
const HOME: Vec3 = Vec3::new(0.0, 25.1, 0.0);
const MOVE_SPEED: f32 = 200.0;
const TURN_SPEED: f32 = FRAC_PI_2;

/// Marker colors for the box faces, in box material order.
const FACE_COLORS: [u32; 6] = [0xff_3333, 0xff_8800, 0xff_ff33, 0x33_ff33, 0x33_33ff, 0x88_00ff];

/// W/S move, Q/E strafe, A/D turn, R/F pitch, Z resets.
#[derive(Debug, Default)]
pub(super) struct ChaseCameraDemo {
    target: Option<NodeId>,
    chase: ChaseCamera,
}

impl Demo for ChaseCameraDemo {
    fn setup(&mut self, ctx: &mut SetupContext<'_>) -> DemoSetup {
        let scene = &mut *ctx.scene;
        let _ = stage::surroundings(scene);
        stage::lights(scene);

        let faces = FACE_COLORS
            .iter()
            .map(|&hex| {
                let map = stage::texture(scene, assets::marker_face(Color::from_hex(hex)));
                Material::basic(Color::WHITE).with_map(map)
            })
            .collect();
        let target = scene.add(
            None,
            Node::multi_mesh(shapes::cuboid(50.0, 50.0, 50.0, 1, 1, 1), faces)
                .with_name("chased box")
                .with_position(HOME.x, HOME.y, HOME.z),
        );
        self.target = Some(target);

        DemoSetup {
            eye: HOME + self.chase.offset,
            target: HOME,
            orbit: false,
        }
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) {
        let Some(target) = self.target else {
            return;
        };
        let keys = ctx.keyboard;
        let step = MOVE_SPEED * ctx.dt;
        let turn = TURN_SPEED * ctx.dt;
        let axis = |neg: &str, pos: &str| {
            f32::from(u8::from(keys.pressed(pos))) - f32::from(u8::from(keys.pressed(neg)))
        };

        if let Some(node) = ctx.scene.node_mut(target) {
            let transform = &mut node.transform;
            if keys.pressed("KeyZ") {
                *transform = Transform::from_translation(HOME);
            }
            let motion = Vec3::new(axis("KeyQ", "KeyE"), 0.0, axis("KeyW", "KeyS")) * step;
            if motion != Vec3::ZERO {
                transform.translate_local(motion);
            }
            let yaw = axis("KeyD", "KeyA");
            if yaw != 0.0 {
                transform.rotate_on_axis(Vec3::Y, yaw * turn);
            }
            let pitch = axis("KeyF", "KeyR");
            if pitch != 0.0 {
                transform.rotate_on_axis(Vec3::X, pitch * turn);
            }
        }
        if !self.chase.follow(ctx.scene, target, ctx.camera) {
            log::debug!("chased node is gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::harness::Harness;
    use super::super::DemoId;
    use super::*;

    fn position(h: &Harness) -> Vec3 {
        h.scene
            .find_by_name("chased box")
            .map_or(Vec3::NAN, |id| h.scene.world_position(id))
    }

    #[test]
    fn camera_starts_behind_the_box() {
        let h = Harness::new(DemoId::ChaseCamera);
        assert!(!h.setup.orbit);
        assert!((h.camera.eye - (HOME + Vec3::new(0.0, 50.0, 200.0))).length() < 1e-4);
    }

    #[test]
    fn forward_moves_and_camera_follows() {
        let mut h = Harness::new(DemoId::ChaseCamera);
        let _ = h.keyboard.handle_key("KeyW", true);
        h.step(0.5);
        let at = position(&h);
        assert!((at - (HOME - Vec3::new(0.0, 0.0, 100.0))).length() < 1e-3, "{at}");
        assert!((h.camera.target - at).length() < 1e-3);
        assert!((h.camera.eye.z - (at.z + 200.0)).abs() < 1e-3);
    }

    #[test]
    fn turning_left_swings_the_camera() {
        let mut h = Harness::new(DemoId::ChaseCamera);
        let _ = h.keyboard.handle_key("KeyA", true);
        h.step(1.0);
        // a quarter turn left puts the camera on the box's +X side
        assert!((h.camera.eye.x - 200.0).abs() < 1e-2, "{}", h.camera.eye);

        let _ = h.keyboard.handle_key("KeyA", false);
        let _ = h.keyboard.handle_key("KeyZ", true);
        h.step(0.1);
        assert!((position(&h) - HOME).length() < 1e-4);
    }
}
