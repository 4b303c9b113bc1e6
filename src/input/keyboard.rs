//! Held-key tracking with per-frame transitions.

use rustc_hash::FxHashSet;

/// Which keys are held, and which changed since the last frame.
///
/// Keys are physical key strings in `winit::keyboard::KeyCode` debug
/// format. Transitions recorded by [`handle_key`](Self::handle_key) stay
/// visible through [`down`](Self::down) and [`up`](Self::up) until
/// [`end_frame`](Self::end_frame).
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    held: FxHashSet<String>,
    went_down: FxHashSet<String>,
    went_up: FxHashSet<String>,
}

impl KeyboardState {
    /// No keys held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press or release. Auto-repeat presses of a held key do not
    /// count as new transitions. Returns whether the held state changed.
    pub fn handle_key(&mut self, code: &str, pressed: bool) -> bool {
        if pressed {
            let fresh = self.held.insert(code.to_owned());
            if fresh {
                let _ = self.went_down.insert(code.to_owned());
            }
            fresh
        } else {
            let released = self.held.remove(code);
            if released {
                let _ = self.went_up.insert(code.to_owned());
            }
            released
        }
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        for code in self.held.drain() {
            let _ = self.went_up.insert(code);
        }
    }

    /// Whether `code` is currently held.
    #[must_use]
    pub fn pressed(&self, code: &str) -> bool {
        self.held.contains(code)
    }

    /// Whether `code` went down this frame.
    #[must_use]
    pub fn down(&self, code: &str) -> bool {
        self.went_down.contains(code)
    }

    /// Whether `code` was released this frame.
    #[must_use]
    pub fn up(&self, code: &str) -> bool {
        self.went_up.contains(code)
    }

    /// Whether any key is held.
    #[must_use]
    pub fn any_pressed(&self) -> bool {
        !self.held.is_empty()
    }

    /// Forget this frame's transitions.
    pub fn end_frame(&mut self) {
        self.went_down.clear();
        self.went_up.clear();
    }
}
