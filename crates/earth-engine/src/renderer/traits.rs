//! Renderer seam between the headless scene and a GPU backend.
//!
//! The browser build implements this with wgpu in `earth-web`; tests use a
//! recording renderer.

use super::uniforms::MeshUniforms;

/// Complete frame data for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameData {
    /// Earth surface draw (opaque, front faces).
    pub earth: MeshUniforms,
    /// Atmosphere shell draw (transparent, back faces), after the earth.
    pub atmosphere: MeshUniforms,
    /// Linear RGBA clear color.
    pub clear_color: [f32; 4],
}

/// Renderer trait for GPU backends.
pub trait Renderer {
    type Error: std::fmt::Display;

    /// Backend identifier (e.g., "webgpu", "webgl2").
    fn backend(&self) -> &'static str;

    /// Draw one complete frame.
    fn draw(&mut self, frame: &FrameData) -> Result<(), Self::Error>;

    /// Resize the drawing surface, in physical pixels.
    fn resize(&mut self, width: u32, height: u32);
}
