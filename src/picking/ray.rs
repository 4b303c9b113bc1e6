//! Rays and ray-triangle intersection.

use glam::{Vec2, Vec3};

use crate::camera::Camera;

/// Determinant below which a ray counts as parallel to a triangle.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A half-line with a normalised direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

/// Where a ray crosses a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Distance along the ray.
    pub distance: f32,
    /// Barycentric weights of the second and third vertex.
    pub barycentric: Vec2,
    /// Whether the triangle's counter-clockwise side faces the ray origin.
    pub front_facing: bool,
}

impl Ray {
    /// Ray from `origin` along `direction` (normalised here).
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray through the near-plane point under `ndc`, heading away from the
    /// eye.
    #[must_use]
    pub fn from_camera(ndc: Vec2, camera: &Camera) -> Self {
        let near = camera.unproject(ndc, 0.0);
        let far = camera.unproject(ndc, 1.0);
        Self::new(near, far - near)
    }

    /// Point at `distance` along the ray.
    #[must_use]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }

    /// Moller-Trumbore intersection against triangle `a b c`. Hits behind
    /// the origin are rejected.
    #[must_use]
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<TriangleHit> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < PARALLEL_EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let distance = edge2.dot(q) * inv_det;
        if distance < 0.0 {
            return None;
        }
        Some(TriangleHit {
            distance,
            barycentric: Vec2::new(u, v),
            // det = -direction . normal, positive when the ray meets the
            // counter-clockwise side
            front_facing: det > 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Vec3 = Vec3::new(-1.0, -1.0, 0.0);
    const B: Vec3 = Vec3::new(1.0, -1.0, 0.0);
    const C: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    #[test]
    fn hits_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = ray.intersect_triangle(A, B, C).unwrap();
        assert!((hit.distance - 5.0).abs() < 1e-5);
        assert!(hit.front_facing);
        assert!((ray.at(hit.distance) - Vec3::ZERO).length() < 1e-5);
    }

    #[test]
    fn back_face_is_reported() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        let hit = ray.intersect_triangle(A, B, C).unwrap();
        assert!(!hit.front_facing);
    }

    #[test]
    fn misses_outside_and_behind() {
        let outside = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(outside.intersect_triangle(A, B, C).is_none());
        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(behind.intersect_triangle(A, B, C).is_none());
        let parallel = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::X);
        assert!(parallel.intersect_triangle(A, B, C).is_none());
    }

    #[test]
    fn camera_ray_points_at_target() {
        let camera = Camera::default();
        let ray = Ray::from_camera(Vec2::ZERO, &camera);
        let to_target = (camera.target - camera.eye).normalize();
        assert!(ray.direction.dot(to_target) > 0.9999);
    }
}
