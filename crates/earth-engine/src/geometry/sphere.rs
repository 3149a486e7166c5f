use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};

/// Interleaved sphere vertex: position, normal, uv (8 floats = 32 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// `u` runs west→east around the equator, `v` runs north→south, so
    /// (0, 0) samples the top-left texel of an equirectangular map.
    pub uv: [f32; 2],
}

impl SphereVertex {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Upper bound on segments in either direction; keeps vertex indices well
/// inside `u32`.
pub const MAX_SPHERE_SEGMENTS: u32 = 1024;

/// UV sphere centred at the origin.
///
/// Rings run from the north pole (+Y) to the south pole. Each row has
/// `width_segments + 1` vertices so the seam can carry both u = 0 and u = 1.
/// Triangles wind counter-clockwise when seen from outside.
#[derive(Debug, Clone)]
pub struct SphereGeometry {
    pub vertices: Vec<SphereVertex>,
    pub indices: Vec<u32>,
}

impl SphereGeometry {
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.clamp(3, MAX_SPHERE_SEGMENTS);
        let height_segments = height_segments.clamp(2, MAX_SPHERE_SEGMENTS);

        let row_len = width_segments + 1;
        let mut vertices = Vec::with_capacity((row_len * (height_segments + 1)) as usize);
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (sin_v, cos_v) = (v * PI).sin_cos();
                let (sin_u, cos_u) = (u * 2.0 * PI).sin_cos();
                let normal = [-cos_u * sin_v, cos_v, sin_u * sin_v];
                vertices.push(SphereVertex {
                    position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                    normal,
                    uv: [u, v],
                });
            }
        }

        let index = |ix: u32, iy: u32| iy * row_len + ix;
        let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = index(ix + 1, iy);
                let b = index(ix, iy);
                let c = index(ix, iy + 1);
                let d = index(ix + 1, iy + 1);
                // The pole rows collapse to a point; skip their degenerate halves.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn counts_for_64_by_64() {
        let g = SphereGeometry::new(2.0, 64, 64);
        assert_eq!(g.vertex_count(), 65 * 65);
        // Two triangles per quad, minus one per quad in each pole row.
        assert_eq!(g.indices.len(), (64 * 64 * 2 - 2 * 64) * 3);
        assert!(g.indices.iter().all(|&i| (i as usize) < g.vertex_count()));
    }

    #[test]
    fn vertices_lie_on_sphere() {
        let g = SphereGeometry::new(2.0, 16, 12);
        for v in &g.vertices {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert!((p.length() - 2.0).abs() < 1e-5);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((p / 2.0 - n).length() < 1e-5);
        }
        assert!((g.vertices[0].position[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn triangles_face_outward() {
        let g = SphereGeometry::new(1.0, 12, 8);
        for tri in g.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(g.vertices[i as usize].position));
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0, "triangle {tri:?} winds inward");
        }
    }

    #[test]
    fn segments_are_capped() {
        let g = SphereGeometry::new(1.0, 70_000, 3);
        assert_eq!(g.vertex_count(), (MAX_SPHERE_SEGMENTS as usize + 1) * 4);
        assert!(g.indices.iter().all(|&i| (i as usize) < g.vertex_count()));
    }

    #[test]
    fn vertex_stride() {
        assert_eq!(std::mem::size_of::<SphereVertex>(), SphereVertex::STRIDE_BYTES);
    }
}
