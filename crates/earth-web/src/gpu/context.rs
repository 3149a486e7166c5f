use crate::error::GpuError;

/// Multisample count used when the surface format supports it.
pub const PREFERRED_SAMPLE_COUNT: u32 = 4;

/// Device, queue and the canvas surface.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,
    pub format: wgpu::TextureFormat,
    pub sample_count: u32,
    backend: &'static str,
    max_dimension: u32,
}

impl GpuContext {
    /// Create a surface on `canvas` sized `width`×`height` physical pixels.
    /// WebGPU is preferred; WebGL2 is the fallback.
    pub async fn new(
        canvas: web_sys::HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Result<Self, GpuError> {
        // The surface borrows the instance; the instance lives for the page.
        let instance: &'static wgpu::Instance =
            Box::leak(Box::new(wgpu::Instance::new(&wgpu::InstanceDescriptor {
                backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
                ..Default::default()
            })));

        let surface = canvas_surface(instance, canvas)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        let backend = backend_name(info.backend);
        log::info!("gpu: {} ({backend})", info.name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("earth-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                ..Default::default()
            })
            .await?;

        let max_dimension = device.limits().max_texture_dimension_2d;
        let (width, height) = fit_surface(width, height, max_dimension);

        let caps = surface.get_capabilities(&adapter);
        let format = select_srgb_format(&caps.formats).ok_or(GpuError::NoSurfaceFormat)?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = if adapter
            .get_texture_format_features(format)
            .flags
            .sample_count_supported(PREFERRED_SAMPLE_COUNT)
        {
            PREFERRED_SAMPLE_COUNT
        } else {
            log::warn!("gpu: {PREFERRED_SAMPLE_COUNT}x MSAA unsupported for {format:?}, rendering without");
            1
        };

        Ok(Self {
            device,
            queue,
            surface,
            config,
            format,
            sample_count,
            backend,
            max_dimension,
        })
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface. The size is kept within 1 and the device's
    /// texture limit; read the applied size back with [`GpuContext::size`].
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = fit_surface(width, height, self.max_dimension);
        if (width, height) != (self.config.width, self.config.height) {
            log::debug!("gpu: surface {width}x{height}");
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Next frame to draw into, reconfiguring once if the surface went stale.
    pub fn acquire(&self) -> Result<wgpu::SurfaceTexture, GpuError> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("gpu: surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                self.surface
                    .get_current_texture()
                    .map_err(|_| GpuError::SurfaceLost)
            }
            Err(wgpu::SurfaceError::Timeout) => Err(GpuError::Timeout),
            Err(wgpu::SurfaceError::OutOfMemory) => Err(GpuError::OutOfMemory),
            Err(wgpu::SurfaceError::Other) => Err(GpuError::SurfaceLost),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn canvas_surface(
    instance: &'static wgpu::Instance,
    canvas: web_sys::HtmlCanvasElement,
) -> Result<wgpu::Surface<'static>, GpuError> {
    Ok(instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?)
}

#[cfg(not(target_arch = "wasm32"))]
fn canvas_surface(
    _instance: &'static wgpu::Instance,
    _canvas: web_sys::HtmlCanvasElement,
) -> Result<wgpu::Surface<'static>, GpuError> {
    Err(GpuError::UnsupportedTarget)
}

/// Clamp a physical size to at least 1×1 and at most `max` on either side,
/// scaling both sides together so the aspect ratio survives.
fn fit_surface(width: u32, height: u32, max: u32) -> (u32, u32) {
    let (width, height) = (width.max(1), height.max(1));
    let largest = width.max(height);
    if largest <= max {
        return (width, height);
    }
    let scale = f64::from(max) / f64::from(largest);
    let fit = |side: u32| ((f64::from(side) * scale).floor() as u32).clamp(1, max);
    (fit(width), fit(height))
}

fn backend_name(backend: wgpu::Backend) -> &'static str {
    match backend {
        wgpu::Backend::BrowserWebGpu => "webgpu",
        wgpu::Backend::Gl => "webgl2",
        _ => "native",
    }
}

/// Prefer an sRGB format so shader output in linear space is encoded on
/// write; otherwise take the first format offered.
fn select_srgb_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| f.is_srgb())
        .or_else(|| formats.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_srgb_format() {
        let formats = [
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        assert_eq!(
            select_srgb_format(&formats),
            Some(wgpu::TextureFormat::Rgba8UnormSrgb)
        );
    }

    #[test]
    fn falls_back_to_first_format() {
        let formats = [wgpu::TextureFormat::Rgba16Float];
        assert_eq!(select_srgb_format(&formats), Some(wgpu::TextureFormat::Rgba16Float));
        assert_eq!(select_srgb_format(&[]), None);
    }

    #[test]
    fn surface_fits_texture_limit() {
        assert_eq!(fit_surface(16384, 4096, 8192), (8192, 2048));
        assert_eq!(fit_surface(3000, 9000, 8192), (2730, 8192));
        assert_eq!(fit_surface(1920, 1080, 8192), (1920, 1080));
        assert_eq!(fit_surface(0, 0, 8192), (1, 1));
        assert_eq!(fit_surface(100_000, 1, 2048), (2048, 1));
    }

    #[test]
    fn browser_backend_names() {
        assert_eq!(backend_name(wgpu::Backend::BrowserWebGpu), "webgpu");
        assert_eq!(backend_name(wgpu::Backend::Gl), "webgl2");
    }
}
