/// Upper bound on the device pixel ratio used for the render surface.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Canvas size in CSS pixels plus the pixel ratio the surface renders at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// `min(devicePixelRatio, MAX_PIXEL_RATIO)`.
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_ratio: clamp_pixel_ratio(device_pixel_ratio),
        }
    }

    /// Width over height. A zero-height viewport reports 1.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Surface size in physical pixels, never smaller than 1×1.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            ((self.width * self.pixel_ratio).round() as u32).max(1),
            ((self.height * self.pixel_ratio).round() as u32).max(1),
        )
    }
}

fn clamp_pixel_ratio(dpr: f32) -> f32 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}
