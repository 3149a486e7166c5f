pub mod camera;
pub mod traits;
pub mod uniforms;

pub use camera::PerspectiveCamera;
pub use traits::{FrameData, Renderer};
pub use uniforms::{MeshUniforms, ShadingUniforms};
