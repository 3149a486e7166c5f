use glam::{Mat4, Vec3};

/// Perspective camera looking at a target point, Y up.
/// Produces right-handed matrices with clip-space Z in [0, 1].
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Viewport width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Eye position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_degrees,
            aspect,
            near,
            far,
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// Builder-style initial position.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the aspect ratio and rebuild the projection.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    /// Recompute the cached projection after changing fov/aspect/near/far.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// Unit vector from the eye towards the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or(Vec3::NEG_Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_center() {
        let cam = PerspectiveCamera::new(25.0, 16.0 / 9.0, 0.1, 100.0)
            .with_position(Vec3::new(12.0, 5.0, 4.0));
        let clip = cam.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0, "depth in [0,1], got {}", ndc.z);
    }

    #[test]
    fn set_aspect_rebuilds_projection() {
        let mut cam = PerspectiveCamera::new(25.0, 1.0, 0.1, 100.0);
        let before = cam.projection_matrix();
        cam.set_aspect(2.0);
        assert_eq!(cam.aspect, 2.0);
        assert_ne!(before, cam.projection_matrix());
        let expected = Mat4::perspective_rh(25f32.to_radians(), 2.0, 0.1, 100.0);
        assert_eq!(cam.projection_matrix(), expected);
    }

    #[test]
    fn forward_points_at_target() {
        let cam = PerspectiveCamera::new(25.0, 1.0, 0.1, 100.0).with_position(Vec3::X * 5.0);
        assert!((cam.forward() + Vec3::X).length() < 1e-6);
    }
}
