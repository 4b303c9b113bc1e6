//! The gallery's interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press or a
//! mouse gesture, is a `GalleryCommand`. The input processor produces
//! them and [`GalleryEngine::execute`](super::GalleryEngine::execute)
//! applies them.

use glam::Vec2;

/// A user-facing operation on the gallery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GalleryCommand {
    /// Orbit the camera by a cursor delta in pixels.
    RotateCamera {
        /// Cursor movement since the last event.
        delta: Vec2,
    },
    /// Slide the camera focus by a cursor delta in pixels.
    PanCamera {
        /// Cursor movement since the last event.
        delta: Vec2,
    },
    /// Dolly the camera towards (positive) or away from its focus.
    Zoom {
        /// Scroll amount.
        delta: f32,
    },
    /// Switch to the next demo.
    NextDemo,
    /// Switch to the previous demo.
    PreviousDemo,
    /// Return the camera to the demo's initial pose.
    ResetCamera,
    /// Toggle turntable rotation of the camera.
    ToggleAutoRotate,
    /// Close the gallery.
    Quit,
}
