pub mod color;
pub mod material;
pub mod sun;

pub use color::{Color, ColorError};
pub use material::{Globe, Material, Mesh, Side};
pub use sun::{Spherical, SunController};
