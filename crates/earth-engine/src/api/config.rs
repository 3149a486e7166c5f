use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::MAX_SPHERE_SEGMENTS;
use crate::globe::Color;

/// Errors from loading a JSON scene configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid scene config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid scene config: {0}")]
    Invalid(String),
}

/// Tunables for the globe scene.
///
/// Every field has a default, so a JSON override only needs to list what it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Atmosphere color on the lit hemisphere.
    pub atmosphere_day_color: Color,
    /// Atmosphere color near the terminator.
    pub atmosphere_twilight_color: Color,
    /// Initial sun polar angle (radians, [0, π]).
    pub sun_phi: f32,
    /// Initial sun azimuth (radians, [−π, π]).
    pub sun_theta: f32,
    /// Earth sphere radius in world units.
    pub earth_radius: f32,
    /// Sphere tessellation (both directions).
    pub sphere_segments: u32,
    /// Atmosphere shell scale relative to the earth mesh.
    pub atmosphere_scale: f32,
    /// Earth spin in radians per second of elapsed time.
    pub rotation_speed: f32,
    /// Vertical field of view in degrees.
    pub camera_fov_degrees: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub camera_position: [f32; 3],
    /// Orbit-control damping factor (0 = no damping).
    pub damping_factor: f32,
    pub clear_color: Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            atmosphere_day_color: Color { r: 0.0, g: 170.0 / 255.0, b: 1.0 },
            atmosphere_twilight_color: Color { r: 1.0, g: 102.0 / 255.0, b: 0.0 },
            sun_phi: PI * 0.5,
            sun_theta: 0.5,
            earth_radius: 2.0,
            sphere_segments: 64,
            atmosphere_scale: 1.04,
            rotation_speed: 0.1,
            camera_fov_degrees: 25.0,
            camera_near: 0.1,
            camera_far: 100.0,
            camera_position: [12.0, 5.0, 4.0],
            damping_factor: 0.05,
            clear_color: Color { r: 0.0, g: 0.0, b: 17.0 / 255.0 },
        }
    }
}

impl SceneConfig {
    /// Parse a config from JSON and check it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.earth_radius > 0.0) {
            return Err(ConfigError::Invalid("earth_radius must be positive".into()));
        }
        if !(3..=MAX_SPHERE_SEGMENTS).contains(&self.sphere_segments) {
            return Err(ConfigError::Invalid(format!(
                "sphere_segments must be in [3, {MAX_SPHERE_SEGMENTS}]"
            )));
        }
        if !(self.atmosphere_scale > 0.0 && self.atmosphere_scale.is_finite()) {
            return Err(ConfigError::Invalid("atmosphere_scale must be positive".into()));
        }
        if !(self.camera_near > 0.0 && self.camera_far > self.camera_near) {
            return Err(ConfigError::Invalid("camera_far must exceed camera_near > 0".into()));
        }
        if !(self.camera_fov_degrees > 0.0 && self.camera_fov_degrees < 180.0) {
            return Err(ConfigError::Invalid("camera_fov_degrees must be in (0, 180)".into()));
        }
        if !(0.0..1.0).contains(&self.damping_factor) {
            return Err(ConfigError::Invalid("damping_factor must be in [0, 1)".into()));
        }
        Ok(())
    }

    pub fn camera_position(&self) -> Vec3 {
        Vec3::from_array(self.camera_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_constants() {
        let c = SceneConfig::default();
        assert_eq!(c.atmosphere_day_color.to_hex(), "#00aaff");
        assert_eq!(c.atmosphere_twilight_color.to_hex(), "#ff6600");
        assert_eq!(c.clear_color.to_hex(), "#000011");
        assert_eq!(c.camera_position(), Vec3::new(12.0, 5.0, 4.0));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = SceneConfig::from_json(r##"{ "rotation_speed": 0.5, "clear_color": "#101010" }"##)
            .unwrap();
        assert_eq!(c.rotation_speed, 0.5);
        assert_eq!(c.clear_color.to_hex(), "#101010");
        assert_eq!(c.sphere_segments, 64);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            SceneConfig::from_json(r#"{ "camera_near": 0.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            SceneConfig::from_json(r#"{ "atmosphere_day_color": "red" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_oversized_tessellation() {
        assert!(matches!(
            SceneConfig::from_json(r#"{ "sphere_segments": 70000 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(SceneConfig::from_json(r#"{ "sphere_segments": 1024 }"#).is_ok());
        assert!(matches!(
            SceneConfig::from_json(r#"{ "sphere_segments": 2 }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_non_positive_atmosphere_scale() {
        for json in [r#"{ "atmosphere_scale": 0.0 }"#, r#"{ "atmosphere_scale": -1.04 }"#] {
            assert!(matches!(SceneConfig::from_json(json), Err(ConfigError::Invalid(_))));
        }
    }
}
