//! Camera types and rigs.
//!
//! A plain perspective [`Camera`](core::Camera), the mouse-driven
//! [`OrbitController`](controller::OrbitController) most demos use, and
//! the [`ChaseCamera`](chase::ChaseCamera) third-person rig.

/// Third-person rig that follows a scene node.
pub mod chase;
/// Orbital camera controller managing rotation, pan and zoom.
pub mod controller;
/// Core camera struct.
pub mod core;

pub use chase::ChaseCamera;
pub use controller::OrbitController;
pub use core::Camera;
