use glam::{Mat4, Vec2, Vec3};

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 150.0, 400.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy: 45.0,
            znear: 1.0,
            zfar: 20000.0,
        }
    }
}

impl Camera {
    /// World-to-view matrix.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// View-to-clip matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Unit vector from the eye towards the target.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// Unit vector to the camera's right.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    /// World point at normalised device coordinates `ndc` and clip depth
    /// `depth` (0 at the near plane, 1 at the far plane).
    #[must_use]
    pub fn unproject(&self, ndc: Vec2, depth: f32) -> Vec3 {
        self.build_matrix()
            .inverse()
            .project_point3(ndc.extend(depth))
    }

    /// Normalised device coordinates and clip depth of a world point.
    #[must_use]
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.build_matrix().project_point3(world)
    }

    /// Distance of a world point along the view direction.
    #[must_use]
    pub fn view_depth(&self, world: Vec3) -> f32 {
        -self.view().transform_point3(world).z
    }
}
