// -- Lint policy ---------------------------------------------------------
// Cargo.toml carries the workspace lint table; these are the crate-level
// additions.

// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
// Unused / redundant code
#![deny(unused_results)]

//! A gallery of small 3D rendering demos built on wgpu.
//!
//! Each demo builds a [`scene::Scene`] (meshes, lines, sprites, lights and
//! procedurally generated textures) and may update it every frame from
//! keyboard and mouse state. The gallery swaps between demos and draws the
//! active one with a forward renderer.
//!
//! # Key entry points
//!
//! - [`GalleryEngine`] - owns the GPU and drives the active demo
//! - [`Gallery`] - the GPU-free demo runtime, usable headlessly
//! - [`sprite::TextureAnimator`] - steps a texture map through the tiles of
//!   a sprite sheet
//! - [`options::Options`] - runtime configuration with TOML presets
//! - [`Viewer`] - a ready-made winit window (feature `viewer`)
//!
//! # Frame
//!
//! Window events become [`InputEvent`]s, which update keyboard and mouse
//! state and may produce a [`GalleryCommand`] (orbit, zoom, switch demo).
//! Each frame the camera rig and the demo advance, then
//! [`renderer::SceneRenderer`] draws a shadow pass, opaque meshes, lines,
//! and finally transparent meshes and sprites back to front.

pub mod camera;
pub mod demos;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod sprite;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use demos::DemoId;
pub use engine::command::GalleryCommand;
pub use engine::{Gallery, GalleryEngine};
pub use error::VignetteError;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
pub use sprite::TextureAnimator;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
