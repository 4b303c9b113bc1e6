use glam::Vec2;

/// Cursor travel, in physical pixels, that turns a press into a drag.
const DRAG_THRESHOLD: f32 = 3.0;

/// Tracks cursor position, drag state and per-frame clicks.
///
/// A click is a left press and release without a drag in between. It is
/// reported by [`clicked`](Self::clicked) until [`end_frame`](Self::end_frame).
#[derive(Debug, Clone)]
pub struct MouseState {
    position: Vec2,
    viewport: Vec2,
    press_origin: Option<Vec2>,
    is_dragging: bool,
    clicked: Option<Vec2>,
    moved: bool,
}

impl Default for MouseState {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseState {
    /// Cursor at the origin of a 1x1 viewport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            viewport: Vec2::ONE,
            press_origin: None,
            is_dragging: false,
            clicked: None,
            moved: false,
        }
    }

    /// Set the viewport size used for [`ndc`](Self::ndc).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    }

    /// Update cursor position and return the movement since the last call.
    pub fn handle_mouse_position(&mut self, x: f32, y: f32) -> Vec2 {
        let new = Vec2::new(x, y);
        let delta = new - self.position;
        self.position = new;
        self.moved = true;
        if let Some(origin) = self.press_origin {
            if origin.distance(new) > DRAG_THRESHOLD {
                self.is_dragging = true;
            }
        }
        delta
    }

    /// Record a left button press.
    pub fn handle_mouse_down(&mut self) {
        self.press_origin = Some(self.position);
        self.is_dragging = false;
    }

    /// Record a left button release. Returns `true` when it completes a
    /// click rather than a drag.
    pub fn handle_mouse_up(&mut self) -> bool {
        let was_pressed = self.press_origin.take().is_some();
        let was_dragging = std::mem::take(&mut self.is_dragging);
        let click = was_pressed && !was_dragging;
        if click {
            self.clicked = Some(self.position);
        }
        click
    }

    /// Cursor position in physical pixels from the top-left.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Viewport size in physical pixels.
    #[must_use]
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Cursor in normalised device coordinates, y up.
    #[must_use]
    pub fn ndc(&self) -> Vec2 {
        Vec2::new(
            self.position.x / self.viewport.x * 2.0 - 1.0,
            1.0 - self.position.y / self.viewport.y * 2.0,
        )
    }

    /// Whether the left button is held.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.press_origin.is_some()
    }

    /// Whether the current press has turned into a drag.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Whether a click completed this frame.
    #[must_use]
    pub fn clicked(&self) -> bool {
        self.clicked.is_some()
    }

    /// Whether the cursor moved this frame.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// Forget this frame's click and movement.
    pub fn end_frame(&mut self) {
        self.clicked = None;
        self.moved = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_maps_corners() {
        let mut m = MouseState::new();
        m.set_viewport(800, 600);
        let _ = m.handle_mouse_position(0.0, 0.0);
        assert_eq!(m.ndc(), Vec2::new(-1.0, 1.0));
        let _ = m.handle_mouse_position(800.0, 600.0);
        assert_eq!(m.ndc(), Vec2::new(1.0, -1.0));
        let _ = m.handle_mouse_position(400.0, 300.0);
        assert_eq!(m.ndc(), Vec2::ZERO);
    }

    #[test]
    fn press_release_is_a_click() {
        let mut m = MouseState::new();
        let _ = m.handle_mouse_position(10.0, 10.0);
        m.handle_mouse_down();
        let _ = m.handle_mouse_position(11.0, 10.0);
        assert!(m.handle_mouse_up());
        assert!(m.clicked());
        m.end_frame();
        assert!(!m.clicked());
    }

    #[test]
    fn drag_is_not_a_click() {
        let mut m = MouseState::new();
        m.handle_mouse_down();
        let _ = m.handle_mouse_position(50.0, 0.0);
        assert!(m.is_dragging());
        assert!(!m.handle_mouse_up());
        assert!(!m.clicked());
        assert!(!m.is_dragging());
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut m = MouseState::new();
        assert!(!m.handle_mouse_up());
    }
}
