//! Light sources. A light's position is its node's world translation.

use glam::{Mat4, Vec3};

use super::color::Color;

/// Shadow camera parameters of a shadow-casting light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowCamera {
    /// Near plane of the light's projection.
    pub near: f32,
    /// Far plane of the light's projection.
    pub far: f32,
    /// Half extent of the orthographic box for directional lights.
    pub extent: f32,
    /// Constant depth bias subtracted before comparison.
    pub bias: f32,
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self {
            near: 0.5,
            far: 500.0,
            extent: 250.0,
            bias: 0.0005,
        }
    }
}

/// Light variants and their kind-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform light added to every lit fragment.
    Ambient,
    /// Omnidirectional light. `distance == 0` means no cutoff.
    Point {
        /// Range after which the light has no effect.
        distance: f32,
        /// Attenuation exponent.
        decay: f32,
    },
    /// Parallel rays from the light position towards `target`.
    Directional {
        /// World point the light aims at.
        target: Vec3,
    },
    /// Cone of light from the light position towards `target`.
    Spot {
        /// World point the light aims at.
        target: Vec3,
        /// Half angle of the cone in radians.
        angle: f32,
        /// Fraction of the cone over which intensity fades, in `[0, 1]`.
        penumbra: f32,
        /// Range after which the light has no effect, `0` for none.
        distance: f32,
        /// Attenuation exponent.
        decay: f32,
    },
}

/// A light attached to a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Variant.
    pub kind: LightKind,
    /// Light color.
    pub color: Color,
    /// Scalar multiplier for the color.
    pub intensity: f32,
    /// Shadow map parameters, `Some` when the light casts shadows.
    pub shadow: Option<ShadowCamera>,
}

impl Light {
    fn new(kind: LightKind, color: Color) -> Self {
        Self {
            kind,
            color,
            intensity: 1.0,
            shadow: None,
        }
    }

    /// Ambient light.
    #[must_use]
    pub fn ambient(color: Color) -> Self {
        Self::new(LightKind::Ambient, color)
    }

    /// Point light with no range cutoff.
    #[must_use]
    pub fn point(color: Color) -> Self {
        Self::new(
            LightKind::Point {
                distance: 0.0,
                decay: 1.0,
            },
            color,
        )
    }

    /// Directional light aimed at the origin.
    #[must_use]
    pub fn directional(color: Color) -> Self {
        Self::new(LightKind::Directional { target: Vec3::ZERO }, color)
    }

    /// Spot light aimed at the origin with a 60 degree half angle.
    #[must_use]
    pub fn spot(color: Color) -> Self {
        Self::new(
            LightKind::Spot {
                target: Vec3::ZERO,
                angle: std::f32::consts::FRAC_PI_3,
                penumbra: 0.0,
                distance: 0.0,
                decay: 1.0,
            },
            color,
        )
    }

    /// Set the intensity.
    #[must_use]
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Aim a directional or spot light. Ignored for other kinds.
    #[must_use]
    pub fn with_target(mut self, new_target: Vec3) -> Self {
        match &mut self.kind {
            LightKind::Directional { target } | LightKind::Spot { target, .. } => {
                *target = new_target;
            }
            LightKind::Ambient | LightKind::Point { .. } => {}
        }
        self
    }

    /// Set the cone half angle and penumbra of a spot light.
    #[must_use]
    pub fn with_cone(mut self, new_angle: f32, new_penumbra: f32) -> Self {
        if let LightKind::Spot {
            angle, penumbra, ..
        } = &mut self.kind
        {
            *angle = new_angle.clamp(0.0, std::f32::consts::FRAC_PI_2);
            *penumbra = new_penumbra.clamp(0.0, 1.0);
        }
        self
    }

    /// Cast shadows with default shadow camera parameters.
    #[must_use]
    pub fn with_shadow(mut self) -> Self {
        self.shadow = Some(ShadowCamera::default());
        self
    }

    /// Whether this light can render a shadow map.
    #[must_use]
    pub fn casts_shadow(&self) -> bool {
        self.shadow.is_some()
            && matches!(
                self.kind,
                LightKind::Directional { .. } | LightKind::Spot { .. }
            )
    }

    /// World-space view-projection of the shadow camera for a light at
    /// `position`, or `None` when the light casts no shadow.
    #[must_use]
    pub fn shadow_view_proj(&self, position: Vec3) -> Option<Mat4> {
        let shadow = self.shadow?;
        let (target, projection) = match self.kind {
            LightKind::Spot {
                target,
                angle,
                distance,
                ..
            } => {
                let far = if distance > 0.0 { distance } else { shadow.far };
                let proj = Mat4::perspective_rh(
                    (angle * 2.0).max(1e-3),
                    1.0,
                    shadow.near,
                    far,
                );
                (target, proj)
            }
            LightKind::Directional { target } => {
                let e = shadow.extent;
                let proj = Mat4::orthographic_rh(
                    -e,
                    e,
                    -e,
                    e,
                    shadow.near,
                    shadow.far,
                );
                (target, proj)
            }
            LightKind::Ambient | LightKind::Point { .. } => return None,
        };
        let forward = (target - position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return None;
        }
        let up = if forward.abs_diff_eq(Vec3::Y, 1e-3)
            || forward.abs_diff_eq(Vec3::NEG_Y, 1e-3)
        {
            Vec3::Z
        } else {
            Vec3::Y
        };
        Some(projection * Mat4::look_at_rh(position, target, up))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_directional_and_spot_cast_shadows() {
        assert!(Light::spot(Color::WHITE).with_shadow().casts_shadow());
        assert!(Light::directional(Color::WHITE).with_shadow().casts_shadow());
        assert!(!Light::point(Color::WHITE).with_shadow().casts_shadow());
        assert!(!Light::spot(Color::WHITE).casts_shadow());
    }

    #[test]
    fn spot_shadow_projects_target_to_center() {
        let light = Light::spot(Color::WHITE)
            .with_target(Vec3::new(0.0, 0.0, 0.0))
            .with_cone(0.5, 1.0)
            .with_shadow();
        let position = Vec3::new(-60.0, 150.0, -30.0);
        let Some(m) = light.shadow_view_proj(position) else {
            panic!("spot light should have a shadow camera");
        };
        let clip = m.project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-4 && clip.y.abs() < 1e-4);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn straight_down_light_has_valid_basis() {
        let light = Light::directional(Color::WHITE).with_shadow();
        let m = light.shadow_view_proj(Vec3::new(0.0, 100.0, 0.0));
        assert!(m.is_some_and(|m| m.is_finite()));
    }
}
