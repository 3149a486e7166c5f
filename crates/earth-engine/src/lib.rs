pub mod api;
pub mod assets;
pub mod controls;
pub mod core;
pub mod debug;
pub mod geometry;
pub mod globe;
pub mod input;
pub mod messages;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, SceneConfig};
pub use assets::manifest::{AssetManifest, TexturePaths, TextureSlot};
pub use controls::OrbitControls;
pub use core::scene::Scene;
pub use core::time::Clock;
pub use core::viewport::{Viewport, MAX_PIXEL_RATIO};
pub use debug::panel::{ControlKind, PanelControl, Tweak, TweakError, CONTROLS};
pub use geometry::sphere::{SphereGeometry, SphereVertex, MAX_SPHERE_SEGMENTS};
pub use globe::{Color, ColorError, Globe, Spherical, SunController};
pub use input::queue::{InputEvent, InputQueue, PointerButton};
pub use messages::{
    BoardError, BoardView, KeyValueStore, MemoryStore, MessageBoard, MessageId, MessageRecord,
    MessageRepository, StoreError, SubmitOutcome,
};
pub use renderer::{FrameData, MeshUniforms, PerspectiveCamera, Renderer, ShadingUniforms};
