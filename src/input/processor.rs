//! Converts raw platform events into gallery commands.
//!
//! The `InputProcessor` owns all transient input state (keyboard, mouse
//! tracking, drag detection, modifier keys) and the key-binding map. It
//! sits between raw window events and
//! [`GalleryEngine::execute`](crate::GalleryEngine::execute); demos read
//! the same keyboard and mouse state each frame.

use std::collections::BTreeMap;

use glam::Vec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use super::keyboard::KeyboardState;
use super::mouse::MouseState;
use crate::engine::command::GalleryCommand;

/// Maps physical key strings to [`GalleryCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"PageDown"`, `"BracketLeft"`, `"Escape"`, etc. Demos use letter and
/// arrow keys themselves, so the defaults stay clear of them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string to command tag.
    bindings: BTreeMap<String, KeyCommandTag>,
}

/// Serializable tag for the parameterless subset of [`GalleryCommand`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Switch to the next demo.
    NextDemo,
    /// Switch to the previous demo.
    PreviousDemo,
    /// Return the camera to the demo's initial pose.
    ResetCamera,
    /// Toggle camera auto-rotation.
    ToggleAutoRotate,
    /// Close the gallery.
    Quit,
}

impl KeyCommandTag {
    /// Convert to the corresponding parameterless [`GalleryCommand`].
    fn to_command(self) -> GalleryCommand {
        match self {
            Self::NextDemo => GalleryCommand::NextDemo,
            Self::PreviousDemo => GalleryCommand::PreviousDemo,
            Self::ResetCamera => GalleryCommand::ResetCamera,
            Self::ToggleAutoRotate => GalleryCommand::ToggleAutoRotate,
            Self::Quit => GalleryCommand::Quit,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = BTreeMap::from([
            ("PageDown".into(), KeyCommandTag::NextDemo),
            ("BracketRight".into(), KeyCommandTag::NextDemo),
            ("PageUp".into(), KeyCommandTag::PreviousDemo),
            ("BracketLeft".into(), KeyCommandTag::PreviousDemo),
            ("Home".into(), KeyCommandTag::ResetCamera),
            ("KeyP".into(), KeyCommandTag::ToggleAutoRotate),
            ("Escape".into(), KeyCommandTag::Quit),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<GalleryCommand> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding of that key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }

    /// Keys bound to `tag`, in sorted order.
    #[must_use]
    pub fn keys_for(&self, tag: KeyCommandTag) -> Vec<&str> {
        self.bindings
            .iter()
            .filter(|(_, t)| **t == tag)
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`GalleryCommand`]s.
///
/// Left-drag orbits the camera, right-drag or shift+left-drag pans it,
/// the wheel zooms, and bound keys produce discrete commands.
///
/// # Usage
///
/// ```ignore
/// // In the event loop:
/// if let Some(cmd) = input.handle_event(event) {
///     engine.execute(cmd);
/// }
/// // After the frame has been updated:
/// input.end_frame();
/// ```
#[derive(Debug)]
pub struct InputProcessor {
    /// Cursor, drag and click tracking.
    mouse: MouseState,
    /// Held keys and per-frame transitions.
    keyboard: KeyboardState,
    /// Whether the right mouse button is held.
    right_pressed: bool,
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
    /// Key string to command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mouse: MouseState::new(),
            keyboard: KeyboardState::new(),
            right_pressed: false,
            shift_pressed: false,
            key_bindings: KeyBindings::default(),
        }
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Mouse state for this frame.
    #[must_use]
    pub fn mouse(&self) -> &MouseState {
        &self.mouse
    }

    /// Keyboard state for this frame.
    #[must_use]
    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    /// Whether the shift modifier is held.
    #[must_use]
    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    /// Read-only access to the key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Mutable access to the key bindings for reconfiguration.
    pub fn key_bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.key_bindings
    }

    /// Set the viewport used for normalised cursor coordinates.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.mouse.set_viewport(width, height);
    }

    /// Clear per-frame transitions. Call once after each update.
    pub fn end_frame(&mut self) {
        self.keyboard.end_frame();
        self.mouse.end_frame();
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<GalleryCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed);
                None
            }
            InputEvent::Scroll { delta } => Some(GalleryCommand::Zoom { delta }),
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
            InputEvent::Key { code, pressed } => {
                let changed = self.keyboard.handle_key(&code, pressed);
                if pressed && changed {
                    self.key_bindings.lookup(&code)
                } else {
                    None
                }
            }
            InputEvent::Focused(false) => {
                self.keyboard.release_all();
                self.right_pressed = false;
                let _ = self.mouse.handle_mouse_up();
                None
            }
            InputEvent::Focused(true) => None,
        }
    }

    /// Cursor moved: compute delta, possibly produce a camera command.
    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<GalleryCommand> {
        let delta: Vec2 = self.mouse.handle_mouse_position(x, y);
        if delta == Vec2::ZERO {
            return None;
        }
        if self.right_pressed || (self.mouse.is_pressed() && self.shift_pressed) {
            return Some(GalleryCommand::PanCamera { delta });
        }
        if self.mouse.is_pressed() {
            return Some(GalleryCommand::RotateCamera { delta });
        }
        None
    }

    /// Mouse button press/release: track drag and click state.
    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        match (button, pressed) {
            (MouseButton::Left, true) => self.mouse.handle_mouse_down(),
            (MouseButton::Left, false) => {
                let _ = self.mouse.handle_mouse_up();
            }
            (MouseButton::Right, state) => self.right_pressed = state,
            (MouseButton::Middle, _) => {}
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: &str, pressed: bool) -> InputEvent {
        InputEvent::Key {
            code: code.into(),
            pressed,
        }
    }

    #[test]
    fn bound_key_produces_command_once() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(key("PageDown", true)),
            Some(GalleryCommand::NextDemo)
        );
        // auto-repeat
        assert_eq!(input.handle_event(key("PageDown", true)), None);
        assert_eq!(input.handle_event(key("PageDown", false)), None);
        assert!(input.keyboard().up("PageDown"));
    }

    #[test]
    fn unbound_keys_reach_keyboard_state() {
        let mut input = InputProcessor::new();
        assert_eq!(input.handle_event(key("KeyA", true)), None);
        assert!(input.keyboard().pressed("KeyA"));
        assert!(input.keyboard().down("KeyA"));
        input.end_frame();
        assert!(!input.keyboard().down("KeyA"));
    }

    #[test]
    fn left_drag_rotates_and_shift_drag_pans() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(InputEvent::CursorMoved { x: 10.0, y: 10.0 });
        let _ = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 15.0, y: 10.0 }),
            Some(GalleryCommand::RotateCamera {
                delta: Vec2::new(5.0, 0.0)
            })
        );
        let _ = input.handle_event(InputEvent::ModifiersChanged { shift: true });
        assert!(matches!(
            input.handle_event(InputEvent::CursorMoved { x: 15.0, y: 20.0 }),
            Some(GalleryCommand::PanCamera { .. })
        ));
        let _ = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        assert!(!input.mouse().clicked());
    }

    #[test]
    fn hover_without_button_is_silent() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::CursorMoved { x: 3.0, y: 4.0 }),
            None
        );
        assert_eq!(input.mouse().position(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn custom_binding_overrides_default() {
        let mut bindings = KeyBindings::default();
        bindings.bind("KeyN", KeyCommandTag::NextDemo);
        let mut input = InputProcessor::with_key_bindings(bindings);
        assert_eq!(
            input.handle_event(key("KeyN", true)),
            Some(GalleryCommand::NextDemo)
        );
        assert_eq!(
            input.key_bindings().keys_for(KeyCommandTag::NextDemo),
            vec!["BracketRight", "KeyN", "PageDown"]
        );
    }

    #[test]
    fn focus_loss_releases_keys() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(key("KeyW", true));
        let _ = input.handle_event(InputEvent::Focused(false));
        assert!(!input.keyboard().pressed("KeyW"));
    }
}
