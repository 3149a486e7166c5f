pub mod sphere;

pub use sphere::{SphereGeometry, SphereVertex, MAX_SPHERE_SEGMENTS};
