use crate::api::config::SceneConfig;
use crate::controls::OrbitControls;
use crate::core::time::Clock;
use crate::core::viewport::Viewport;
use crate::debug::panel::{self, Tweak};
use crate::globe::{Globe, SunController};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::{FrameData, MeshUniforms, PerspectiveCamera, Renderer};

/// The globe scene: camera, controls, clock, and the two shaded meshes.
///
/// Platform code feeds it resize/input/tweak events and calls [`Scene::frame`]
/// once per animation frame.
pub struct Scene {
    config: SceneConfig,
    clock: Clock,
    viewport: Viewport,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    globe: Globe,
    input: InputQueue,
}

impl Scene {
    pub fn new(config: SceneConfig, viewport: Viewport) -> Self {
        let camera = PerspectiveCamera::new(
            config.camera_fov_degrees,
            viewport.aspect(),
            config.camera_near,
            config.camera_far,
        )
        .with_position(config.camera_position());
        let controls = OrbitControls::new(config.damping_factor);
        let globe = Globe::new(
            SunController::new(config.sun_phi, config.sun_theta),
            config.atmosphere_day_color,
            config.atmosphere_twilight_color,
            config.atmosphere_scale,
        );

        Self {
            config,
            clock: Clock::new(),
            viewport,
            camera,
            controls,
            globe,
            input: InputQueue::new(),
        }
    }

    /// Handle a viewport change. Returns the new surface size in physical
    /// pixels for the renderer.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32) -> (u32, u32) {
        self.viewport = Viewport::new(width, height, device_pixel_ratio);
        self.camera.set_aspect(self.viewport.aspect());
        self.viewport.physical_size()
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Apply a debug-panel change to both shader uniform sets.
    pub fn apply_tweak(&mut self, tweak: Tweak) {
        match tweak {
            Tweak::AtmosphereDayColor(c) => self.globe.set_day_color(c),
            Tweak::AtmosphereTwilightColor(c) => self.globe.set_twilight_color(c),
            Tweak::SunPhi(phi) => self.globe.set_sun_phi(phi),
            Tweak::SunTheta(theta) => self.globe.set_sun_theta(theta),
        }
        log::debug!("tweak applied: {tweak:?}");
    }

    /// Current value of a panel control, formatted for its widget.
    pub fn panel_value(&self, key: &str) -> Option<String> {
        match key {
            panel::ATMOSPHERE_DAY_COLOR => Some(self.globe.day_color().to_hex()),
            panel::ATMOSPHERE_TWILIGHT_COLOR => Some(self.globe.twilight_color().to_hex()),
            panel::SUN_PHI => Some(self.globe.sun().phi().to_string()),
            panel::SUN_THETA => Some(self.globe.sun().theta().to_string()),
            _ => None,
        }
    }

    /// Advance one frame: tick the clock, spin the earth, apply camera
    /// controls, then draw exactly once.
    pub fn frame<R: Renderer>(&mut self, dt: f32, renderer: &mut R) -> Result<(), R::Error> {
        self.update(dt);
        renderer.draw(&self.frame_data())
    }

    /// The simulation half of [`Scene::frame`].
    pub fn update(&mut self, dt: f32) {
        let elapsed = self.clock.tick(dt);
        self.globe.earth.rotation_y = elapsed * self.config.rotation_speed;

        for event in self.input.drain() {
            self.controls.handle(&event, self.viewport.height, &self.camera);
        }
        self.controls.update(&mut self.camera);
    }

    pub fn frame_data(&self) -> FrameData {
        let view_proj = self.camera.view_projection();
        let eye = self.camera.position;
        FrameData {
            earth: MeshUniforms::new(
                self.globe.earth.model_matrix(),
                view_proj,
                eye,
                self.globe.earth.material.uniforms,
            ),
            atmosphere: MeshUniforms::new(
                self.globe.atmosphere.model_matrix(),
                view_proj,
                eye,
                self.globe.atmosphere.material.uniforms,
            ),
            clear_color: self.config.clear_color.linear_rgba(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn globe(&self) -> &Globe {
        &self.globe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globe::Color;
    use crate::input::queue::PointerButton;
    use glam::Vec3;

    /// Records every frame it is asked to draw.
    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<FrameData>,
        size: Option<(u32, u32)>,
    }

    impl Renderer for RecordingRenderer {
        type Error = String;

        fn backend(&self) -> &'static str {
            "recording"
        }

        fn draw(&mut self, frame: &FrameData) -> Result<(), String> {
            self.frames.push(*frame);
            Ok(())
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.size = Some((width, height));
        }
    }

    fn scene() -> Scene {
        Scene::new(SceneConfig::default(), Viewport::new(800.0, 600.0, 1.0))
    }

    #[test]
    fn one_draw_per_frame() {
        let mut s = scene();
        let mut r = RecordingRenderer::default();
        for _ in 0..5 {
            s.frame(1.0 / 60.0, &mut r).unwrap();
        }
        assert_eq!(r.frames.len(), 5);
        assert_eq!(r.backend(), "recording");
    }

    #[test]
    fn earth_rotation_follows_elapsed_time() {
        let mut s = scene();
        let mut r = RecordingRenderer::default();
        s.frame(2.0, &mut r).unwrap();
        s.frame(3.0, &mut r).unwrap();
        assert!((s.globe().earth.rotation_y - 0.5).abs() < 1e-6);
        // The atmosphere shell does not spin.
        assert_eq!(s.globe().atmosphere.rotation_y, 0.0);
    }

    #[test]
    fn resize_sets_exact_aspect_and_capped_ratio() {
        let mut s = scene();
        let mut r = RecordingRenderer::default();
        let (w, h) = s.resize(1280.0, 720.0, 3.0);
        r.resize(w, h);
        assert_eq!(s.camera().aspect, 1280.0 / 720.0);
        assert_eq!(s.viewport().pixel_ratio, 2.0);
        assert_eq!(r.size, Some((2560, 1440)));
    }

    #[test]
    fn tweaks_update_both_uniform_sets() {
        let mut s = scene();
        let pink = Color::from_hex("#ff00ff").unwrap();
        s.apply_tweak(Tweak::AtmosphereTwilightColor(pink));
        s.apply_tweak(Tweak::SunPhi(1.0));
        s.apply_tweak(Tweak::SunTheta(-1.0));

        let frame = s.frame_data();
        assert_eq!(frame.earth.shading, frame.atmosphere.shading);
        assert_eq!(frame.earth.shading.twilight_color, pink.linear_rgba());
        let sun = frame.earth.shading.sun();
        assert!((sun.length() - 1.0).abs() < 1e-5);
        assert_eq!(s.panel_value(panel::ATMOSPHERE_TWILIGHT_COLOR).as_deref(), Some("#ff00ff"));
        assert_eq!(s.panel_value(panel::SUN_PHI).as_deref(), Some("1"));
        assert_eq!(s.panel_value("nope"), None);
    }

    #[test]
    fn queued_input_moves_camera_on_next_frame() {
        let mut s = scene();
        let mut r = RecordingRenderer::default();
        let start = s.camera().position;
        s.push_input(InputEvent::PointerDown { x: 10.0, y: 10.0, button: PointerButton::Primary });
        s.push_input(InputEvent::PointerMove { x: 60.0, y: 10.0 });
        s.frame(0.016, &mut r).unwrap();
        assert!((s.camera().position - start).length() > 1e-3);
        assert!((s.camera().target - Vec3::ZERO).length() < 1e-6);
    }

    #[test]
    fn frame_data_uses_clear_color() {
        let s = scene();
        let f = s.frame_data();
        assert_eq!(f.clear_color, SceneConfig::default().clear_color.linear_rgba());
        assert_eq!(f.earth.camera_position, [12.0, 5.0, 4.0, 1.0]);
    }
}
