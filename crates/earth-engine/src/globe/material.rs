//! The two shaded meshes that make up the globe.
//!
//! The earth surface and the atmosphere shell read the same sun direction and
//! atmosphere colors. `Globe` is the only writer of those values and always
//! writes both materials in the same call.

use glam::{Mat4, Quat, Vec3};

use super::color::Color;
use super::sun::SunController;
use crate::renderer::uniforms::ShadingUniforms;

/// Which triangle faces a material renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

/// Fixed-function state plus the shading uniform set of one shader program.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub side: Side,
    pub transparent: bool,
    pub uniforms: ShadingUniforms,
}

/// A sphere instance in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Rotation about the world Y axis, radians.
    pub rotation_y: f32,
    pub scale: f32,
    pub material: Material,
}

impl Mesh {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.rotation_y),
            Vec3::ZERO,
        )
    }
}

/// Earth surface plus atmosphere shell, and the parameters both depend on.
#[derive(Debug, Clone)]
pub struct Globe {
    pub earth: Mesh,
    pub atmosphere: Mesh,
    sun: SunController,
    day_color: Color,
    twilight_color: Color,
}

impl Globe {
    pub fn new(
        sun: SunController,
        day_color: Color,
        twilight_color: Color,
        atmosphere_scale: f32,
    ) -> Self {
        let shading = shading_uniforms(sun.direction(), day_color, twilight_color);
        Self {
            earth: Mesh {
                rotation_y: 0.0,
                scale: 1.0,
                material: Material {
                    side: Side::Front,
                    transparent: false,
                    uniforms: shading,
                },
            },
            atmosphere: Mesh {
                rotation_y: 0.0,
                scale: atmosphere_scale,
                material: Material {
                    side: Side::Back,
                    transparent: true,
                    uniforms: shading,
                },
            },
            sun,
            day_color,
            twilight_color,
        }
    }

    pub fn set_sun_angles(&mut self, phi: f32, theta: f32) {
        self.sun.set_angles(phi, theta);
        self.push_shading();
    }

    pub fn set_sun_phi(&mut self, phi: f32) {
        self.sun.set_phi(phi);
        self.push_shading();
    }

    pub fn set_sun_theta(&mut self, theta: f32) {
        self.sun.set_theta(theta);
        self.push_shading();
    }

    pub fn set_day_color(&mut self, color: Color) {
        self.day_color = color;
        self.push_shading();
    }

    pub fn set_twilight_color(&mut self, color: Color) {
        self.twilight_color = color;
        self.push_shading();
    }

    pub fn sun(&self) -> &SunController {
        &self.sun
    }

    pub fn day_color(&self) -> Color {
        self.day_color
    }

    pub fn twilight_color(&self) -> Color {
        self.twilight_color
    }

    fn push_shading(&mut self) {
        let shading = shading_uniforms(self.sun.direction(), self.day_color, self.twilight_color);
        self.earth.material.uniforms = shading;
        self.atmosphere.material.uniforms = shading;
    }
}

fn shading_uniforms(sun: Vec3, day: Color, twilight: Color) -> ShadingUniforms {
    ShadingUniforms {
        sun_direction: sun.extend(0.0).to_array(),
        day_color: day.linear_rgba(),
        twilight_color: twilight.linear_rgba(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn globe() -> Globe {
        Globe::new(
            SunController::new(PI * 0.5, 0.5),
            Color::from_hex("#00aaff").unwrap(),
            Color::from_hex("#ff6600").unwrap(),
            1.04,
        )
    }

    #[test]
    fn materials_start_identical() {
        let g = globe();
        assert_eq!(g.earth.material.uniforms, g.atmosphere.material.uniforms);
        assert_eq!(g.earth.material.side, Side::Front);
        assert_eq!(g.atmosphere.material.side, Side::Back);
        assert!(g.atmosphere.material.transparent);
    }

    #[test]
    fn color_change_reaches_both_materials() {
        let mut g = globe();
        let red = Color::from_hex("#ff0000").unwrap();
        g.set_day_color(red);
        assert_eq!(g.earth.material.uniforms.day_color, red.linear_rgba());
        assert_eq!(g.earth.material.uniforms, g.atmosphere.material.uniforms);

        let green = Color::from_hex("#00ff00").unwrap();
        g.set_twilight_color(green);
        assert_eq!(g.atmosphere.material.uniforms.twilight_color, green.linear_rgba());
        assert_eq!(g.earth.material.uniforms, g.atmosphere.material.uniforms);
    }

    #[test]
    fn sun_change_reaches_both_materials() {
        let mut g = globe();
        g.set_sun_angles(0.3, -2.0);
        let expected = g.sun().direction();
        assert!((g.earth.material.uniforms.sun() - expected).length() < 1e-6);
        assert_eq!(g.earth.material.uniforms, g.atmosphere.material.uniforms);

        g.set_sun_theta(1.0);
        assert_eq!(g.sun().theta(), 1.0);
        assert_eq!(g.sun().phi(), 0.3);
        assert_eq!(g.earth.material.uniforms, g.atmosphere.material.uniforms);
    }

    #[test]
    fn atmosphere_is_scaled_shell() {
        let g = globe();
        let m = g.atmosphere.model_matrix();
        let p = m.transform_point3(Vec3::new(2.0, 0.0, 0.0));
        assert!((p.x - 2.08).abs() < 1e-5);
    }

    #[test]
    fn earth_rotation_about_y() {
        let mut g = globe();
        g.earth.rotation_y = PI * 0.5;
        let p = g.earth.model_matrix().transform_point3(Vec3::Z);
        assert!((p - Vec3::X).length() < 1e-5);
    }
}
