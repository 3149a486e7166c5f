use earth_engine::{InputEvent, Renderer, Scene, Tweak};
use web_sys::HtmlCanvasElement;

use crate::error::GpuError;
use crate::gpu::GlobeRenderer;

/// Wires the engine scene to the GPU renderer and the canvas.
///
/// Lives in a `thread_local!` in the crate root; event listeners and the
/// animation-frame loop reach it through `with_runner`.
pub struct EarthRunner {
    scene: Scene,
    renderer: GlobeRenderer,
    canvas: HtmlCanvasElement,
    last_timestamp: Option<f64>,
}

impl EarthRunner {
    pub fn new(scene: Scene, renderer: GlobeRenderer, canvas: HtmlCanvasElement) -> Self {
        Self {
            scene,
            renderer,
            canvas,
            last_timestamp: None,
        }
    }

    /// One animation frame. `timestamp_ms` is the `requestAnimationFrame`
    /// timestamp; the first frame advances the clock by zero.
    pub fn tick(&mut self, timestamp_ms: f64) {
        let dt = frame_delta(self.last_timestamp, timestamp_ms);
        self.last_timestamp = Some(timestamp_ms);

        match self.scene.frame(dt, &mut self.renderer) {
            Ok(()) | Err(GpuError::Timeout) => {}
            Err(err) => log::error!("render: {err}"),
        }
    }

    /// Match the canvas backing store and surface to a new window size.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        let (physical_width, physical_height) = self.scene.resize(width, height, device_pixel_ratio);
        self.renderer.resize(physical_width, physical_height);
        let (physical_width, physical_height) = self.renderer.surface_size();
        size_canvas(&self.canvas, width, height, physical_width, physical_height);
        log::debug!(
            "resize: {width}x{height} css, {physical_width}x{physical_height} px ({})",
            self.renderer.backend()
        );
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.scene.push_input(event);
    }

    pub fn apply_tweak(&mut self, tweak: Tweak) {
        self.scene.apply_tweak(tweak);
    }
}

/// Set the canvas backing store to physical pixels and its CSS box to the
/// logical size.
pub fn size_canvas(canvas: &HtmlCanvasElement, css_width: f32, css_height: f32, width: u32, height: u32) {
    canvas.set_width(width);
    canvas.set_height(height);
    let style = canvas.style();
    for (property, value) in [("width", css_width), ("height", css_height)] {
        if let Err(err) = style.set_property(property, &format!("{value}px")) {
            log::warn!("resize: {}", crate::error::js_message(&err));
        }
    }
}

/// Seconds since the previous frame; zero on the first frame or if the
/// timestamp went backwards.
fn frame_delta(last_ms: Option<f64>, now_ms: f64) -> f32 {
    match last_ms {
        Some(last) if now_ms > last => ((now_ms - last) / 1000.0) as f32,
        _ => 0.0,
    }
}
