//! Input handling: event types, keyboard and mouse state, and the input
//! processor that converts raw window events into gallery commands.

/// Platform-agnostic input events.
pub mod event;
/// Held keys with per-frame down/up transitions.
pub mod keyboard;
/// Cursor position, drag detection and click tracking.
pub mod mouse;
/// Converts raw events into gallery commands.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyboardState;
pub use mouse::MouseState;
pub use processor::{InputProcessor, KeyBindings, KeyCommandTag};
