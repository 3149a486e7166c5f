//! Debug panel model: which parameters are tweakable, their ranges, and how
//! raw input strings become typed scene changes. The DOM layer builds widgets
//! from [`CONTROLS`] and forwards `input` events as [`Tweak`]s.

use std::f32::consts::PI;

use crate::globe::{Color, ColorError};

/// Panel keys, shared with the DOM layer.
pub const ATMOSPHERE_DAY_COLOR: &str = "atmosphereDayColor";
pub const ATMOSPHERE_TWILIGHT_COLOR: &str = "atmosphereTwilightColor";
pub const SUN_PHI: &str = "phi";
pub const SUN_THETA: &str = "theta";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    Color,
    Slider { min: f32, max: f32, step: f32 },
}

/// One widget on the debug panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelControl {
    pub key: &'static str,
    pub kind: ControlKind,
}

pub const CONTROLS: [PanelControl; 4] = [
    PanelControl { key: ATMOSPHERE_DAY_COLOR, kind: ControlKind::Color },
    PanelControl { key: ATMOSPHERE_TWILIGHT_COLOR, kind: ControlKind::Color },
    PanelControl {
        key: SUN_PHI,
        kind: ControlKind::Slider { min: 0.0, max: PI, step: 0.001 },
    },
    PanelControl {
        key: SUN_THETA,
        kind: ControlKind::Slider { min: -PI, max: PI, step: 0.001 },
    },
];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TweakError {
    #[error("unknown panel control {0:?}")]
    UnknownControl(String),
    #[error("bad color for {key}: {source}")]
    Color { key: &'static str, source: ColorError },
    #[error("bad number for {key}: {raw:?}")]
    Number { key: &'static str, raw: String },
}

/// A typed change coming from the debug panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tweak {
    AtmosphereDayColor(Color),
    AtmosphereTwilightColor(Color),
    SunPhi(f32),
    SunTheta(f32),
}

impl Tweak {
    /// Interpret the raw value of control `key`. Slider values are clamped to
    /// the control's range.
    pub fn parse(key: &str, raw: &str) -> Result<Self, TweakError> {
        let control = control(key).ok_or_else(|| TweakError::UnknownControl(key.to_string()))?;
        match control.kind {
            ControlKind::Color => {
                let color = Color::from_hex(raw)
                    .map_err(|source| TweakError::Color { key: control.key, source })?;
                Ok(if control.key == ATMOSPHERE_DAY_COLOR {
                    Tweak::AtmosphereDayColor(color)
                } else {
                    Tweak::AtmosphereTwilightColor(color)
                })
            }
            ControlKind::Slider { min, max, .. } => {
                let value = raw
                    .trim()
                    .parse::<f32>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| TweakError::Number { key: control.key, raw: raw.to_string() })?
                    .clamp(min, max);
                Ok(if control.key == SUN_PHI {
                    Tweak::SunPhi(value)
                } else {
                    Tweak::SunTheta(value)
                })
            }
        }
    }
}

pub fn control(key: &str) -> Option<&'static PanelControl> {
    CONTROLS.iter().find(|c| c.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colors() {
        assert_eq!(
            Tweak::parse(ATMOSPHERE_DAY_COLOR, "#112233").unwrap(),
            Tweak::AtmosphereDayColor(Color::from_hex("#112233").unwrap())
        );
        assert!(matches!(
            Tweak::parse(ATMOSPHERE_TWILIGHT_COLOR, "#xyz"),
            Err(TweakError::Color { .. })
        ));
    }

    #[test]
    fn sliders_clamp_to_range() {
        assert_eq!(Tweak::parse(SUN_PHI, "1.25").unwrap(), Tweak::SunPhi(1.25));
        assert_eq!(Tweak::parse(SUN_PHI, "9").unwrap(), Tweak::SunPhi(PI));
        assert_eq!(Tweak::parse(SUN_THETA, "-9").unwrap(), Tweak::SunTheta(-PI));
        assert!(matches!(Tweak::parse(SUN_THETA, "NaN"), Err(TweakError::Number { .. })));
        assert!(matches!(Tweak::parse(SUN_THETA, ""), Err(TweakError::Number { .. })));
    }

    #[test]
    fn unknown_key() {
        assert_eq!(
            Tweak::parse("radius", "1"),
            Err(TweakError::UnknownControl("radius".into()))
        );
    }

    #[test]
    fn panel_has_two_colors_and_two_sliders() {
        let colors = CONTROLS.iter().filter(|c| c.kind == ControlKind::Color).count();
        assert_eq!(colors, 2);
        assert_eq!(control(SUN_PHI).unwrap().kind, ControlKind::Slider { min: 0.0, max: PI, step: 0.001 });
    }
}
