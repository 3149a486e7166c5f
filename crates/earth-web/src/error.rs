use earth_engine::{BoardError, ConfigError, StoreError};
use wasm_bindgen::{JsCast, JsValue};

/// Startup and runtime failures of the browser bridge.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("required element {0} is missing from the page")]
    MissingElement(&'static str),
    #[error("element {id} is not a {expected}")]
    WrongElementType { id: &'static str, expected: &'static str },
    #[error("invalid manifest: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Js(js_message(&value))
    }
}

/// GPU setup and frame errors.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to create surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
    #[error("canvas surfaces are only available on wasm32 targets")]
    UnsupportedTarget,
    #[error("surface has no supported texture format")]
    NoSurfaceFormat,
    #[error("surface lost")]
    SurfaceLost,
    #[error("out of memory")]
    OutOfMemory,
    /// Recoverable: skip the frame.
    #[error("timeout")]
    Timeout,
}

/// A texture that could not be fetched or decoded.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: gloo_net::Error,
    },
    #[error("fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("decoding {url} failed: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
}

/// Best-effort human-readable text of a thrown JS value.
pub fn js_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}
