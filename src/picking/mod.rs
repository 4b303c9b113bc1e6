//! CPU ray casting against scene meshes.
//!
//! Builds a ray from the cursor through the camera and intersects it with
//! mesh triangles, for hover highlighting and click handling in demos.

pub mod ray;
pub mod raycaster;

pub use ray::{Ray, TriangleHit};
pub use raycaster::{RayHit, Raycaster};
