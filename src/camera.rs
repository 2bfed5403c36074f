//! Perspective orbit camera with damped controls.
//!
//! Drag input does not move the camera directly. It accumulates angular
//! velocity, and [`Camera::update`] bleeds a fraction of that velocity into
//! the orbit each frame. Once the pointer is released the camera keeps
//! coasting and settles, and the total rotation still equals what an
//! undamped camera would have done.

use glam::{Mat4, Vec3};

/// Radians of orbit per pixel of pointer drag.
pub const ROTATE_SPEED: f32 = 0.005;
/// Fraction of pending rotation applied per frame.
pub const DEFAULT_DAMPING: f32 = 0.05;
/// Distance multiplier per scroll line.
const ZOOM_STEP: f32 = 0.95;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 50.0;
const PITCH_LIMIT: f32 = 1.5;
/// Velocities below this are snapped to zero.
const REST_EPSILON: f32 = 1e-6;

/// Orbit camera looking at the galaxy.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height of the viewport.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Fraction of pending rotation applied per [`update`](Self::update).
    pub damping: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl Camera {
    /// Camera at `(3, 3, 3)` looking at the origin.
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self::looking_at(Vec3::splat(3.0), Vec3::ZERO);
        camera.aspect = aspect;
        camera
    }

    /// Camera placed at `position`, orbiting `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let offset = position - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let pitch = (offset.y / offset.length().max(f32::EPSILON))
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let yaw = offset.x.atan2(offset.z);

        Self {
            yaw,
            pitch,
            distance,
            target,
            fov_y: 75.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
            damping: DEFAULT_DAMPING,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio after a resize. Zero-sized viewports are ignored.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Queue an orbit from a pointer drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw_velocity -= dx * ROTATE_SPEED;
        self.pitch_velocity += dy * ROTATE_SPEED;
    }

    /// Zoom by scroll lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance * ZOOM_STEP.powf(lines)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Advance damping by one frame.
    pub fn update(&mut self) {
        self.yaw += self.yaw_velocity * self.damping;
        self.pitch = (self.pitch + self.pitch_velocity * self.damping).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let decay = 1.0 - self.damping;
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
        if self.yaw_velocity.abs() < REST_EPSILON {
            self.yaw_velocity = 0.0;
        }
        if self.pitch_velocity.abs() < REST_EPSILON {
            self.pitch_velocity = 0.0;
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_position() {
        let camera = Camera::new(1.5);
        assert!((camera.position() - Vec3::splat(3.0)).length() < 1e-4);
        assert_eq!(camera.aspect, 1.5);
        assert!((camera.fov_y - 75.0_f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_damped_rotation_converges_to_drag_total() {
        let mut camera = Camera::new(1.0);
        let start_yaw = camera.yaw;
        camera.rotate(100.0, 0.0);

        // Damping spreads the motion over many frames.
        camera.update();
        assert!((camera.yaw - start_yaw).abs() < 100.0 * ROTATE_SPEED * 0.1);

        for _ in 0..1_000 {
            camera.update();
        }
        assert_eq!(camera.yaw_velocity, 0.0);
        assert_eq!(camera.pitch_velocity, 0.0);
        assert!((camera.yaw - (start_yaw - 100.0 * ROTATE_SPEED)).abs() < 1e-3);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::new(1.0);
        camera.rotate(0.0, 10_000.0);
        for _ in 0..500 {
            camera.update();
        }
        assert!(camera.pitch <= PITCH_LIMIT);
    }

    #[test]
    fn test_zoom_clamps_distance() {
        let mut camera = Camera::new(1.0);
        let before = camera.distance;
        camera.zoom(1.0);
        assert!(camera.distance < before);
        camera.zoom(1_000.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
        camera.zoom(-1_000.0);
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn test_set_viewport_updates_aspect() {
        let mut camera = Camera::new(1.0);
        camera.set_viewport(1920.0, 1080.0);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
        camera.set_viewport(0.0, 1080.0);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let camera = Camera::new(2.0);
        let clip = camera.view_proj() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
