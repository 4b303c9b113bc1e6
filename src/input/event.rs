/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor) which
/// updates keyboard and mouse state and converts gestures into
/// [`GalleryCommand`](crate::GalleryCommand) values.
///
/// # Example
///
/// ```
/// use vignette::input::{InputEvent, InputProcessor};
///
/// let mut input = InputProcessor::new();
/// let cmd = input.handle_event(InputEvent::Scroll { delta: 1.0 });
/// assert!(cmd.is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to absolute screen position.
    CursorMoved {
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel (positive = zoom in).
    Scroll {
        /// Scroll amount (positive = zoom in, negative = zoom out).
        delta: f32,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the shift key is held.
        shift: bool,
    },
    /// Physical key pressed or released.
    Key {
        /// Key code in `winit::keyboard::KeyCode` debug format, e.g.
        /// `"KeyA"`, `"ArrowLeft"`, `"Space"`.
        code: String,
        /// `true` for press (including auto-repeat), `false` for release.
        pressed: bool,
    },
    /// The window gained or lost keyboard focus.
    Focused(bool),
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Left,
        }
    }
}
