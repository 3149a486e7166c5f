//! Orbit-style camera controls: drag to rotate around the target, wheel to
//! dolly, right-drag to pan. Motion is damped: input accumulates into deltas
//! and each `update` applies a fraction of them, so the camera keeps gliding
//! for a few frames after the pointer stops.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::globe::Spherical;
use crate::input::queue::{InputEvent, PointerButton};
use crate::renderer::camera::PerspectiveCamera;

/// Keeps phi away from the poles so `look_at` never degenerates.
const POLE_EPSILON: f32 = 1e-3;

/// Pending motion below which the controls are considered settled.
const SETTLE_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Rotate,
    Dolly,
    Pan,
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    state: DragState,
    last_pointer: Vec2,
    /// Pending (theta, phi) rotation.
    rotate_delta: Vec2,
    /// Pending radius multiplier for the next update.
    scale: f32,
    /// Pending target translation.
    pan_offset: Vec3,
}

impl OrbitControls {
    pub fn new(damping_factor: f32) -> Self {
        Self {
            enable_damping: damping_factor > 0.0,
            damping_factor,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            state: DragState::Idle,
            last_pointer: Vec2::ZERO,
            rotate_delta: Vec2::ZERO,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.state != DragState::Idle
    }

    /// Feed one input event. `viewport_height` is the canvas height in CSS
    /// pixels; a full-height drag rotates by one turn.
    pub fn handle(&mut self, event: &InputEvent, viewport_height: f32, camera: &PerspectiveCamera) {
        let height = viewport_height.max(1.0);
        match *event {
            InputEvent::PointerDown { x, y, button } => {
                self.last_pointer = Vec2::new(x, y);
                self.state = match button {
                    PointerButton::Primary => DragState::Rotate,
                    PointerButton::Auxiliary => DragState::Dolly,
                    PointerButton::Secondary => DragState::Pan,
                };
            }
            InputEvent::PointerMove { x, y } => {
                let pos = Vec2::new(x, y);
                let delta = pos - self.last_pointer;
                self.last_pointer = pos;
                match self.state {
                    DragState::Idle => {}
                    DragState::Rotate => {
                        let d = delta * self.rotate_speed;
                        self.rotate_left(2.0 * PI * d.x / height);
                        self.rotate_up(2.0 * PI * d.y / height);
                    }
                    DragState::Dolly => {
                        if delta.y > 0.0 {
                            self.dolly_out(self.zoom_scale());
                        } else if delta.y < 0.0 {
                            self.dolly_in(self.zoom_scale());
                        }
                    }
                    DragState::Pan => self.pan(delta * self.pan_speed, height, camera),
                }
            }
            InputEvent::PointerUp { .. } => self.state = DragState::Idle,
            InputEvent::Wheel { delta_y } => {
                if delta_y < 0.0 {
                    self.dolly_in(self.zoom_scale());
                } else if delta_y > 0.0 {
                    self.dolly_out(self.zoom_scale());
                }
            }
        }
    }

    /// Apply pending motion to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        if self.is_settled() {
            self.rotate_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
            return false;
        }

        let offset = camera.position - camera.target;
        let mut spherical = Spherical::from_vec3(offset);

        let step = if self.enable_damping { self.damping_factor } else { 1.0 };
        spherical.theta += self.rotate_delta.x * step;
        spherical.phi += self.rotate_delta.y * step;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);

        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.target += self.pan_offset * step;
        camera.position = camera.target + spherical.to_vec3();

        if self.enable_damping {
            self.rotate_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.rotate_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;
        true
    }

    fn is_settled(&self) -> bool {
        self.rotate_delta.abs().max_element() < SETTLE_EPSILON
            && self.pan_offset.abs().max_element() < SETTLE_EPSILON
            && (self.scale - 1.0).abs() < SETTLE_EPSILON
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    fn rotate_left(&mut self, angle: f32) {
        self.rotate_delta.x -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.rotate_delta.y -= angle;
    }

    fn dolly_in(&mut self, dolly_scale: f32) {
        self.scale *= dolly_scale;
    }

    fn dolly_out(&mut self, dolly_scale: f32) {
        self.scale /= dolly_scale;
    }

    /// Screen-space pan: moves the target along the camera's right and up axes,
    /// scaled so the point under the cursor stays under the cursor.
    fn pan(&mut self, delta: Vec2, height: f32, camera: &PerspectiveCamera) {
        let offset = camera.position - camera.target;
        let target_distance = offset.length() * (camera.fov_degrees.to_radians() / 2.0).tan();

        let forward = camera.forward();
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward).normalize_or(Vec3::Y);

        self.pan_offset += right * (-2.0 * delta.x * target_distance / height);
        self.pan_offset += up * (2.0 * delta.y * target_distance / height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(25.0, 1.0, 0.1, 100.0).with_position(Vec3::new(12.0, 5.0, 4.0))
    }

    fn drag(controls: &mut OrbitControls, cam: &PerspectiveCamera, button: PointerButton, dx: f32, dy: f32) {
        controls.handle(&InputEvent::PointerDown { x: 100.0, y: 100.0, button }, 600.0, cam);
        controls.handle(&InputEvent::PointerMove { x: 100.0 + dx, y: 100.0 + dy }, 600.0, cam);
        controls.handle(&InputEvent::PointerUp { x: 100.0 + dx, y: 100.0 + dy }, 600.0, cam);
    }

    #[test]
    fn idle_update_keeps_camera() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(0.05);
        assert!(!controls.update(&mut cam));
        assert!((cam.position - Vec3::new(12.0, 5.0, 4.0)).length() < 1e-4);
    }

    #[test]
    fn rotation_preserves_distance() {
        let mut cam = camera();
        let distance = cam.position.length();
        let mut controls = OrbitControls::new(0.0);
        drag(&mut controls, &cam.clone(), PointerButton::Primary, 120.0, 30.0);
        assert!(controls.update(&mut cam));
        assert!((cam.position.length() - distance).abs() < 1e-3);
    }

    #[test]
    fn damping_spreads_motion_over_frames() {
        let mut damped_cam = camera();
        let mut damped = OrbitControls::new(0.05);
        drag(&mut damped, &damped_cam.clone(), PointerButton::Primary, 200.0, 0.0);

        let start = damped_cam.position;
        damped.update(&mut damped_cam);
        let first_step = (damped_cam.position - start).length();
        let after_first = damped_cam.position;
        // Still moving after the pointer is released.
        assert!(damped.update(&mut damped_cam));
        let second_step = (damped_cam.position - after_first).length();
        assert!(second_step > 0.0 && second_step < first_step);
    }

    #[test]
    fn wheel_up_zooms_in() {
        let mut cam = camera();
        let before = cam.position.length();
        let mut controls = OrbitControls::new(0.0);
        controls.handle(&InputEvent::Wheel { delta_y: -100.0 }, 600.0, &cam.clone());
        controls.update(&mut cam);
        assert!((cam.position.length() - before * 0.95).abs() < 1e-3);

        controls.handle(&InputEvent::Wheel { delta_y: 100.0 }, 600.0, &cam.clone());
        controls.update(&mut cam);
        assert!((cam.position.length() - before).abs() < 1e-3);
    }

    #[test]
    fn distance_is_clamped() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(0.0);
        controls.min_distance = 10.0;
        for _ in 0..50 {
            controls.handle(&InputEvent::Wheel { delta_y: -1.0 }, 600.0, &cam.clone());
        }
        controls.update(&mut cam);
        assert!((cam.position.length() - 10.0).abs() < 1e-3);
    }

    #[test]
    fn polar_angle_stays_off_the_pole() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(0.0);
        // A huge upward drag would flip over the pole without the clamp.
        drag(&mut controls, &cam.clone(), PointerButton::Primary, 0.0, 5000.0);
        controls.update(&mut cam);
        let s = Spherical::from_vec3(cam.position - cam.target);
        assert!(s.phi > 0.0 && s.phi < PI);
    }

    #[test]
    fn pan_moves_target() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(0.0);
        drag(&mut controls, &cam.clone(), PointerButton::Secondary, 50.0, 0.0);
        controls.update(&mut cam);
        assert!(cam.target.length() > 0.0);
        // Pan translates eye and target together.
        assert!(((cam.position - cam.target).length() - Vec3::new(12.0, 5.0, 4.0).length()).abs() < 1e-3);
    }

    #[test]
    fn moves_without_button_are_ignored() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(0.0);
        controls.handle(&InputEvent::PointerMove { x: 500.0, y: 500.0 }, 600.0, &cam.clone());
        assert!(!controls.is_dragging());
        assert!(!controls.update(&mut cam));
    }
}
