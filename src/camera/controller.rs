use std::f32::consts::TAU;

use glam::{Mat3, Quat, Vec2, Vec3};

use crate::camera::core::Camera;
use crate::options::CameraOptions;

/// Closest the view direction may come to straight up or down (radians).
const POLE_MARGIN: f32 = 0.01;

const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 10_000.0;

/// Position of an orbit: orientation, focus point and distance.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OrbitPose {
    orientation: Quat,
    distance: f32,
    focus: Vec3,
}

impl OrbitPose {
    /// Orbit pose that reproduces a camera's eye and target.
    fn from_camera(camera: &Camera) -> Self {
        let offset = camera.eye - camera.target;
        let distance = offset.length().max(MIN_DISTANCE);
        let back = offset.normalize_or(Vec3::Z);
        let right = camera.up.cross(back);
        let orientation = if right.length_squared() < 1e-8 {
            Quat::from_rotation_arc(Vec3::Z, back)
        } else {
            let right = right.normalize();
            let up = back.cross(right);
            Quat::from_mat3(&Mat3::from_cols(right, up, back)).normalize()
        };
        Self {
            orientation,
            distance,
            focus: camera.target,
        }
    }
}

/// Mouse-driven orbit around a focus point.
///
/// Horizontal drags yaw around world Y, vertical drags pitch around the
/// camera's right axis and stop short of the poles. With damping below 1
/// the rotation keeps coasting for a few frames after the drag ends.
#[derive(Debug, Clone)]
pub struct OrbitController {
    pose: OrbitPose,
    initial: OrbitPose,
    /// Rotation still to be applied: (yaw, pitch) in radians.
    pending: Vec2,
    camera: Camera,
    viewport_height: f32,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    damping: f32,
    auto_rotate_speed: f32,
    auto_rotate: bool,
    enabled: bool,
}

impl OrbitController {
    /// Start orbiting around `camera.target` from `camera.eye`. The
    /// starting pose is remembered for [`reset`](Self::reset).
    #[must_use]
    pub fn new(camera: Camera, options: &CameraOptions) -> Self {
        let pose = OrbitPose::from_camera(&camera);
        let mut controller = Self {
            pose,
            initial: pose,
            pending: Vec2::ZERO,
            camera,
            viewport_height: 720.0,
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
            damping: options.damping.clamp(0.01, 1.0),
            auto_rotate_speed: options.auto_rotate_speed,
            auto_rotate: false,
            enabled: true,
        };
        controller.update_camera_pos();
        controller
    }

    /// The camera as positioned by the orbit.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Direct access to the camera, for rigs that drive it themselves
    /// while the orbit is disabled.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Point the camera orbits around.
    #[must_use]
    pub fn focus(&self) -> Vec3 {
        self.pose.focus
    }

    /// Distance from the focus point to the eye.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.pose.distance
    }

    /// Whether mouse input moves the camera.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable mouse control. Disabling drops pending inertia.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.pending = Vec2::ZERO;
    }

    /// Whether the turntable rotation is on.
    #[must_use]
    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Turn the turntable rotation on or off.
    pub fn set_auto_rotate(&mut self, on: bool) {
        self.auto_rotate = on;
    }

    /// Flip the turntable rotation and return the new state.
    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.auto_rotate = !self.auto_rotate;
        self.auto_rotate
    }

    /// Track the viewport: aspect ratio and the height that scales drags.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.aspect = width.max(1) as f32 / height.max(1) as f32;
        self.viewport_height = height.max(1) as f32;
    }

    /// Queue an orbit by a cursor delta in pixels. A drag across the full
    /// viewport height turns `rotate_speed` full circles.
    pub fn rotate(&mut self, delta: Vec2) {
        if !self.enabled {
            return;
        }
        let k = TAU * self.rotate_speed / self.viewport_height;
        self.pending += Vec2::new(-delta.x * k, -delta.y * k);
    }

    /// Slide the focus point in the view plane by a cursor delta in pixels.
    /// The point under the cursor follows the cursor at `pan_speed` 1.
    pub fn pan(&mut self, delta: Vec2) {
        if !self.enabled {
            return;
        }
        let right = self.pose.orientation * Vec3::X;
        let up = self.pose.orientation * Vec3::Y;
        let half_height = self.pose.distance * (self.camera.fovy.to_radians() / 2.0).tan();
        let k = 2.0 * half_height / self.viewport_height * self.pan_speed;

        self.pose.focus += right * (-delta.x * k) + up * (delta.y * k);
        self.update_camera_pos();
    }

    /// Dolly towards (positive) or away from the focus point.
    pub fn zoom(&mut self, delta: f32) {
        if !self.enabled {
            return;
        }
        self.pose.distance *= 1.0 - delta * self.zoom_speed;
        self.pose.distance = self.pose.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.update_camera_pos();
    }

    /// Advance inertia and auto-rotation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if !self.enabled {
            return;
        }
        let mut step = self.pending * self.damping;
        self.pending -= step;
        if self.pending.length_squared() < 1e-10 {
            step += self.pending;
            self.pending = Vec2::ZERO;
        }
        if self.auto_rotate {
            step.x -= TAU / 60.0 * self.auto_rotate_speed * dt;
        }
        if step != Vec2::ZERO {
            self.apply_rotation(step);
        }
    }

    /// Return to the pose the controller was created with.
    pub fn reset(&mut self) {
        self.pose = self.initial;
        self.pending = Vec2::ZERO;
        self.update_camera_pos();
    }

    fn apply_rotation(&mut self, step: Vec2) {
        let yawed = Quat::from_rotation_y(step.x) * self.pose.orientation;

        let back = yawed * Vec3::Z;
        let polar = back.y.clamp(-1.0, 1.0).acos();
        let min = POLE_MARGIN;
        let max = std::f32::consts::PI - POLE_MARGIN;
        // positive pitch lowers the eye, increasing the polar angle
        let pitch = (polar + step.y).clamp(min, max) - polar;

        self.pose.orientation = (yawed * Quat::from_rotation_x(pitch)).normalize();
        self.update_camera_pos();
    }

    fn update_camera_pos(&mut self) {
        let dir = self.pose.orientation * Vec3::Z;

        self.camera.eye = self.pose.focus + (dir * self.pose.distance);
        self.camera.target = self.pose.focus;
        self.camera.up = self.pose.orientation * Vec3::Y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> OrbitController {
        let options = CameraOptions {
            damping: 1.0,
            ..CameraOptions::default()
        };
        OrbitController::new(Camera::default(), &options)
    }

    fn assert_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-2, "{a} != {b}");
    }

    #[test]
    fn new_preserves_eye_and_target() {
        let c = controller();
        let initial = Camera::default();
        assert_near(c.camera().eye, initial.eye);
        assert_near(c.camera().target, initial.target);
        assert!(c.camera().up.y > 0.0);
    }

    #[test]
    fn rotation_keeps_distance() {
        let mut c = controller();
        let d = c.distance();
        c.rotate(Vec2::new(120.0, -40.0));
        c.update(1.0 / 60.0);
        assert!((c.camera().eye.distance(c.focus()) - d).abs() < 1e-2);
        assert!(c.camera().eye.x.abs() > 1.0);
    }

    #[test]
    fn pitch_stops_at_pole() {
        let mut c = controller();
        for _ in 0..50 {
            c.rotate(Vec2::new(0.0, 400.0));
            c.update(1.0 / 60.0);
        }
        let back = (c.camera().eye - c.focus()).normalize();
        assert!(back.y < 1.0 && back.y > 0.99);
        assert!(c.camera().up.is_finite());
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let mut c = OrbitController::new(Camera::default(), &CameraOptions::default());
        let start = c.camera().eye;
        c.rotate(Vec2::new(100.0, 0.0));
        c.update(1.0 / 60.0);
        let first = c.camera().eye;
        c.update(1.0 / 60.0);
        assert!(first.distance(start) > 0.0);
        assert!(c.camera().eye.distance(first) > 0.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut c = controller();
        c.zoom(100.0);
        assert_eq!(c.distance(), MIN_DISTANCE);
        for _ in 0..500 {
            c.zoom(-1.0);
        }
        assert_eq!(c.distance(), MAX_DISTANCE);
    }

    #[test]
    fn pan_moves_focus_in_view_plane() {
        let mut c = controller();
        c.pan(Vec2::new(-50.0, 0.0));
        assert!(c.focus().x > 0.0);
        assert!(c.focus().y.abs() < 1e-3);
    }

    #[test]
    fn reset_restores_initial_pose() {
        let mut c = controller();
        c.rotate(Vec2::new(300.0, 100.0));
        c.pan(Vec2::new(20.0, 20.0));
        c.zoom(0.5);
        c.update(0.1);
        c.reset();
        assert_near(c.camera().eye, Camera::default().eye);
        assert_near(c.focus(), Vec3::ZERO);
    }

    #[test]
    fn auto_rotate_turns_without_input() {
        let mut c = controller();
        assert!(c.toggle_auto_rotate());
        let start = c.camera().eye;
        c.update(1.0);
        assert!(c.camera().eye.distance(start) > 1.0);
        assert!((c.camera().eye.y - start.y).abs() < 1e-2);
    }

    #[test]
    fn disabled_controller_ignores_input() {
        let mut c = controller();
        c.set_enabled(false);
        c.rotate(Vec2::new(100.0, 100.0));
        c.zoom(1.0);
        c.update(1.0);
        assert_near(c.camera().eye, Camera::default().eye);
    }

    #[test]
    fn looking_straight_down_has_a_basis() {
        let camera = Camera {
            eye: Vec3::new(0.0, 500.0, 0.0),
            ..Camera::default()
        };
        let c = OrbitController::new(camera, &CameraOptions::default());
        assert_near(c.camera().eye, camera.eye);
    }
}
