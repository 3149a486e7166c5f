use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Lighting inputs shared by the earth and atmosphere shaders.
/// Must match `Shading` in both WGSL files: 3 × vec4 = 48 bytes.
///
/// The `w` lanes are padding (vec3 in a uniform block is 16-byte aligned).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ShadingUniforms {
    /// Unit vector towards the sun, world space.
    pub sun_direction: [f32; 4],
    /// Atmosphere color on the lit side, linear RGB.
    pub day_color: [f32; 4],
    /// Atmosphere color around the terminator, linear RGB.
    pub twilight_color: [f32; 4],
}

impl ShadingUniforms {
    pub const SIZE_BYTES: usize = 48;

    pub fn sun(&self) -> Vec3 {
        Vec3::new(
            self.sun_direction[0],
            self.sun_direction[1],
            self.sun_direction[2],
        )
    }
}

/// Everything one globe draw call needs.
/// Must match `MeshUniforms` in the WGSL files: 192 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MeshUniforms {
    /// Object-to-world transform.
    pub model: [[f32; 4]; 4],
    /// World-to-clip transform.
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space (w = 1).
    pub camera_position: [f32; 4],
    pub shading: ShadingUniforms,
}

impl MeshUniforms {
    pub const SIZE_BYTES: usize = 192;

    pub fn new(model: Mat4, view_proj: Mat4, camera_position: Vec3, shading: ShadingUniforms) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view_proj: view_proj.to_cols_array_2d(),
            camera_position: camera_position.extend(1.0).to_array(),
            shading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<ShadingUniforms>(), ShadingUniforms::SIZE_BYTES);
        assert_eq!(std::mem::size_of::<MeshUniforms>(), MeshUniforms::SIZE_BYTES);
        // Uniform buffer bindings want 16-byte multiples.
        assert_eq!(MeshUniforms::SIZE_BYTES % 16, 0);
    }

    #[test]
    fn camera_position_has_unit_w() {
        let u = MeshUniforms::new(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Vec3::new(1.0, 2.0, 3.0),
            ShadingUniforms::default(),
        );
        assert_eq!(u.camera_position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(bytemuck::bytes_of(&u).len(), 192);
    }
}
