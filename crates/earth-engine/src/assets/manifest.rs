use serde::{Deserialize, Serialize};

use crate::api::config::{ConfigError, SceneConfig};

/// Which texture slot of the earth shader an image feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Day,
    Night,
    SpecularClouds,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 3] = [Self::Day, Self::Night, Self::SpecularClouds];

    /// Color maps are authored in sRGB; the specular/cloud mask holds data.
    pub fn is_srgb(self) -> bool {
        !matches!(self, Self::SpecularClouds)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "earth-day",
            Self::Night => "earth-night",
            Self::SpecularClouds => "earth-specular-clouds",
        }
    }
}

/// Asset manifest for the globe page. Loaded from a JSON string supplied by
/// the host page; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub textures: TexturePaths,
    /// Anisotropic filtering clamp for the earth textures.
    pub anisotropy: u16,
    /// Scene overrides.
    pub scene: SceneConfig,
}

/// Relative URLs of the three earth textures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TexturePaths {
    pub day: String,
    pub night: String,
    pub specular_clouds: String,
}

impl Default for TexturePaths {
    fn default() -> Self {
        Self {
            day: "./earth/day.jpg".into(),
            night: "./earth/night.jpg".into(),
            specular_clouds: "./earth/specularClouds.jpg".into(),
        }
    }
}

impl TexturePaths {
    pub fn path(&self, slot: TextureSlot) -> &str {
        match slot {
            TextureSlot::Day => &self.day,
            TextureSlot::Night => &self.night,
            TextureSlot::SpecularClouds => &self.specular_clouds,
        }
    }
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            textures: TexturePaths::default(),
            anisotropy: 8,
            scene: SceneConfig::default(),
        }
    }
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.scene.validate()?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_uses_defaults() {
        let manifest = AssetManifest::from_json("{}").unwrap();
        assert_eq!(manifest, AssetManifest::default());
        assert_eq!(manifest.textures.path(TextureSlot::Night), "./earth/night.jpg");
        assert_eq!(manifest.anisotropy, 8);
    }

    #[test]
    fn parse_texture_overrides_and_scene() {
        let json = r#"{
            "textures": { "day": "hd/day.png", "specularClouds": "hd/mask.png" },
            "scene": { "sphere_segments": 128 }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.textures.day, "hd/day.png");
        assert_eq!(manifest.textures.night, "./earth/night.jpg");
        assert_eq!(manifest.textures.specular_clouds, "hd/mask.png");
        assert_eq!(manifest.scene.sphere_segments, 128);
    }

    #[test]
    fn invalid_scene_is_rejected() {
        assert!(AssetManifest::from_json(r#"{ "scene": { "earth_radius": -1 } }"#).is_err());
        assert!(AssetManifest::from_json("not json").is_err());
    }

    #[test]
    fn only_mask_is_linear() {
        assert!(TextureSlot::Day.is_srgb());
        assert!(TextureSlot::Night.is_srgb());
        assert!(!TextureSlot::SpecularClouds.is_srgb());
    }
}
