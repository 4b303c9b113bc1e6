//! Node transforms.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Local translation, rotation and scale of a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position relative to the parent.
    pub translation: Vec3,
    /// Orientation relative to the parent.
    pub rotation: Quat,
    /// Non-uniform scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, rotation or scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Identity rotation and scale at `translation`.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Set rotation from XYZ Euler angles in radians.
    pub fn set_euler(&mut self, x: f32, y: f32, z: f32) {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
    }

    /// Move along the node's own axes.
    pub fn translate_local(&mut self, delta: Vec3) {
        self.translation += self.rotation * delta;
    }

    /// Rotate around an axis expressed in the node's local frame.
    pub fn rotate_on_axis(&mut self, axis: Vec3, angle: f32) {
        let axis = axis.normalize_or_zero();
        if axis == Vec3::ZERO {
            return;
        }
        self.rotation = (self.rotation * Quat::from_axis_angle(axis, angle))
            .normalize();
    }

    /// Local-to-parent matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn translate_local_follows_rotation() {
        let mut t = Transform::IDENTITY;
        t.rotate_on_axis(Vec3::Y, FRAC_PI_2);
        t.translate_local(Vec3::new(0.0, 0.0, -10.0));
        assert!((t.translation - Vec3::new(-10.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn zero_axis_is_ignored() {
        let mut t = Transform::IDENTITY;
        t.rotate_on_axis(Vec3::ZERO, 1.0);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn matrix_applies_scale_then_rotation_then_translation() {
        let mut t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        t.scale = Vec3::splat(2.0);
        t.set_euler(0.0, 0.0, FRAC_PI_2);
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 4.0, 3.0)).length() < 1e-4);
    }
}
