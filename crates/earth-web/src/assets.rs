use earth_engine::{TexturePaths, TextureSlot};
use gloo_net::http::Request;
use image::RgbaImage;

use crate::error::AssetError;

/// Decoded earth textures. A slot is `None` when its image failed to load.
#[derive(Default)]
pub struct TextureImages {
    pub day: Option<RgbaImage>,
    pub night: Option<RgbaImage>,
    pub specular_clouds: Option<RgbaImage>,
    pub failures: Vec<AssetError>,
}

impl TextureImages {
    pub fn take(&mut self, slot: TextureSlot) -> Option<RgbaImage> {
        match slot {
            TextureSlot::Day => self.day.take(),
            TextureSlot::Night => self.night.take(),
            TextureSlot::SpecularClouds => self.specular_clouds.take(),
        }
    }

    fn set(&mut self, slot: TextureSlot, image: RgbaImage) {
        match slot {
            TextureSlot::Day => self.day = Some(image),
            TextureSlot::Night => self.night = Some(image),
            TextureSlot::SpecularClouds => self.specular_clouds = Some(image),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Fetch and decode all three textures. Failures are collected, not fatal.
pub async fn load_textures(paths: &TexturePaths) -> TextureImages {
    let mut images = TextureImages::default();
    for slot in TextureSlot::ALL {
        let url = paths.path(slot);
        match fetch_image(url).await {
            Ok(image) => {
                log::info!("assets: {} loaded ({}x{})", slot.label(), image.width(), image.height());
                images.set(slot, image);
            }
            Err(err) => {
                log::warn!("assets: {err}");
                images.failures.push(err);
            }
        }
    }
    images
}

async fn fetch_image(url: &str) -> Result<RgbaImage, AssetError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|source| AssetError::Fetch { url: url.to_string(), source })?;
    if !response.ok() {
        return Err(AssetError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let bytes = response
        .binary()
        .await
        .map_err(|source| AssetError::Fetch { url: url.to_string(), source })?;
    decode(url, &bytes)
}

fn decode(url: &str, bytes: &[u8]) -> Result<RgbaImage, AssetError> {
    image::load_from_memory(bytes)
        .map(|image| image.to_rgba8())
        .map_err(|source| AssetError::Decode { url: url.to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_png() {
        let mut png = Vec::new();
        RgbaImage::from_pixel(2, 1, image::Rgba([1, 2, 3, 255]))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let decoded = decode("x.png", &png).unwrap();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(1, 0).0, [1, 2, 3, 255]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode("day.jpg", b"not an image").unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
        assert!(err.to_string().contains("day.jpg"));
    }

    #[test]
    fn take_empties_slot() {
        let mut images = TextureImages::default();
        images.set(TextureSlot::Night, RgbaImage::new(1, 1));
        assert!(images.take(TextureSlot::Night).is_some());
        assert!(images.take(TextureSlot::Night).is_none());
        assert!(!images.is_degraded());
    }
}
