use std::f32::consts::PI;

use glam::Vec3;

/// Spherical coordinates with Y up.
///
/// `phi` is the polar angle measured from +Y, `theta` the azimuth around Y
/// measured from +Z towards +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn new(radius: f32, phi: f32, theta: f32) -> Self {
        Self { radius, phi, theta }
    }

    /// Recover spherical coordinates from a cartesian offset.
    pub fn from_vec3(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::new(0.0, 0.0, 0.0);
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_vec3(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Turns the panel's sun angles into the light direction the shaders use.
///
/// The radius is pinned to 1 so the direction is always unit length. Angles
/// are clamped to the slider ranges: phi in [0, π], theta in [−π, π].
#[derive(Debug, Clone)]
pub struct SunController {
    spherical: Spherical,
    direction: Vec3,
}

impl SunController {
    pub const PHI_RANGE: (f32, f32) = (0.0, PI);
    pub const THETA_RANGE: (f32, f32) = (-PI, PI);

    pub fn new(phi: f32, theta: f32) -> Self {
        let mut sun = Self {
            spherical: Spherical::new(1.0, 0.0, 0.0),
            direction: Vec3::Y,
        };
        sun.set_angles(phi, theta);
        sun
    }

    /// Set both angles and recompute the direction.
    pub fn set_angles(&mut self, phi: f32, theta: f32) -> Vec3 {
        self.spherical.phi = clamp_finite(phi, Self::PHI_RANGE, self.spherical.phi);
        self.spherical.theta = clamp_finite(theta, Self::THETA_RANGE, self.spherical.theta);
        self.direction = self.spherical.to_vec3().normalize_or(Vec3::Y);
        self.direction
    }

    pub fn set_phi(&mut self, phi: f32) -> Vec3 {
        self.set_angles(phi, self.spherical.theta)
    }

    pub fn set_theta(&mut self, theta: f32) -> Vec3 {
        self.set_angles(self.spherical.phi, theta)
    }

    pub fn phi(&self) -> f32 {
        self.spherical.phi
    }

    pub fn theta(&self) -> f32 {
        self.spherical.theta
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }
}

fn clamp_finite(value: f32, (min, max): (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_unit_over_full_range() {
        let steps = 48;
        for i in 0..=steps {
            let phi = PI * i as f32 / steps as f32;
            for j in 0..=steps {
                let theta = -PI + 2.0 * PI * j as f32 / steps as f32;
                let dir = SunController::new(phi, theta).direction();
                assert!(
                    (dir.length() - 1.0).abs() < 1e-5,
                    "phi={phi} theta={theta} len={}",
                    dir.length()
                );
            }
        }
    }

    #[test]
    fn equator_default_points_sideways() {
        let sun = SunController::new(PI * 0.5, 0.5);
        let dir = sun.direction();
        assert!(dir.y.abs() < 1e-6);
        assert!((dir.x - 0.5f32.sin()).abs() < 1e-6);
        assert!((dir.z - 0.5f32.cos()).abs() < 1e-6);
    }

    #[test]
    fn poles() {
        assert!((SunController::new(0.0, 1.0).direction() - Vec3::Y).length() < 1e-6);
        assert!((SunController::new(PI, 1.0).direction() + Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn angles_clamped_to_slider_ranges() {
        let mut sun = SunController::new(5.0, -9.0);
        assert_eq!(sun.phi(), PI);
        assert_eq!(sun.theta(), -PI);
        sun.set_phi(f32::NAN);
        assert_eq!(sun.phi(), PI);
    }

    #[test]
    fn spherical_round_trip() {
        let v = Vec3::new(12.0, 5.0, 4.0);
        let back = Spherical::from_vec3(v).to_vec3();
        assert!((back - v).length() < 1e-4);
    }
}
