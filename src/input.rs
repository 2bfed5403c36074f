//! Pointer and keyboard handling for the viewer.
//!
//! [`OrbitInput`] turns raw window events into [`Action`]s: left-drag orbits
//! the camera, the wheel zooms, Escape asks the loop to stop. Events the
//! panel consumed should not be passed in at all.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::camera::Camera;

/// Pixels of trackpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f32 = 100.0;

/// What a window event asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Orbit by a pointer drag in pixels.
    Rotate(Vec2),
    /// Zoom by wheel lines; positive moves closer.
    Zoom(f32),
    /// Leave the frame loop.
    Stop,
}

impl Action {
    /// Apply a camera action. Returns `false` for actions the camera ignores.
    pub fn apply(self, camera: &mut Camera) -> bool {
        match self {
            Action::Rotate(delta) => camera.rotate(delta.x, delta.y),
            Action::Zoom(lines) => camera.zoom(lines),
            Action::Stop => return false,
        }
        true
    }
}

/// Drag tracking state.
#[derive(Debug, Default)]
pub struct OrbitInput {
    dragging: bool,
    last_cursor: Option<Vec2>,
}

impl OrbitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Left button went down or up.
    pub fn set_dragging(&mut self, pressed: bool) {
        self.dragging = pressed;
        if !pressed {
            self.last_cursor = None;
        }
    }

    /// Cursor moved to `position`. Returns the drag delta while dragging.
    pub fn cursor_moved(&mut self, position: Vec2) -> Option<Vec2> {
        if !self.dragging {
            return None;
        }
        let delta = self.last_cursor.map(|last| position - last);
        self.last_cursor = Some(position);
        delta.filter(|d| *d != Vec2::ZERO)
    }

    /// Forget the cursor, e.g. after it left the window.
    pub fn cursor_left(&mut self) {
        self.last_cursor = None;
    }

    /// Translate a window event into an action.
    pub fn handle_event(&mut self, event: &WindowEvent) -> Option<Action> {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.set_dragging(*state == ElementState::Pressed);
                None
            }
            WindowEvent::CursorMoved { position, .. } => self
                .cursor_moved(Vec2::new(position.x as f32, position.y as f32))
                .map(Action::Rotate),
            WindowEvent::CursorLeft { .. } => {
                self.cursor_left();
                None
            }
            WindowEvent::MouseWheel { delta, .. } => Some(Action::Zoom(scroll_lines(*delta))),
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                Some(Action::Stop)
            }
            _ => None,
        }
    }
}

/// Normalize wheel and trackpad scrolling to wheel lines.
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_no_rotation_without_drag() {
        let mut input = OrbitInput::new();
        assert_eq!(input.cursor_moved(Vec2::new(10.0, 10.0)), None);
        assert_eq!(input.cursor_moved(Vec2::new(20.0, 10.0)), None);
    }

    #[test]
    fn test_drag_produces_deltas() {
        let mut input = OrbitInput::new();
        input.set_dragging(true);
        // First move only anchors the cursor.
        assert_eq!(input.cursor_moved(Vec2::new(100.0, 100.0)), None);
        assert_eq!(input.cursor_moved(Vec2::new(110.0, 95.0)), Some(Vec2::new(10.0, -5.0)));
        assert_eq!(input.cursor_moved(Vec2::new(110.0, 95.0)), None);

        input.set_dragging(false);
        assert_eq!(input.cursor_moved(Vec2::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_release_resets_anchor() {
        let mut input = OrbitInput::new();
        input.set_dragging(true);
        input.cursor_moved(Vec2::new(0.0, 0.0));
        input.set_dragging(false);
        input.set_dragging(true);
        // A new drag must not jump by the distance travelled while released.
        assert_eq!(input.cursor_moved(Vec2::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_scroll_normalization() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
        assert_eq!(
            scroll_lines(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -50.0))),
            -0.5
        );
    }

    #[test]
    fn test_actions_drive_camera() {
        let mut camera = Camera::new(1.0);
        let distance = camera.distance;
        assert!(Action::Zoom(1.0).apply(&mut camera));
        assert!(camera.distance < distance);

        let yaw = camera.yaw;
        assert!(Action::Rotate(Vec2::new(50.0, 0.0)).apply(&mut camera));
        camera.update();
        assert!(camera.yaw < yaw);

        assert!(!Action::Stop.apply(&mut camera));
    }
}
