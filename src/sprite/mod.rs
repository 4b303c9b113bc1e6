//! Sprite helpers: sprite-sheet animation and text labels.

pub mod animator;
pub mod label;

pub use animator::{AnimatorError, TextureAnimator};
pub use label::{LabelPainter, LabelStyle};
