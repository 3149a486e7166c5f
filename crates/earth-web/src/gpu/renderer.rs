use earth_engine::{FrameData, MeshUniforms, Renderer, SphereGeometry, TextureSlot};

use super::context::GpuContext;
use super::mesh::GpuMesh;
use super::pipeline::{GlobePipelines, RenderTargets};
use super::texture::{self, GpuTexture};
use crate::assets::TextureImages;
use crate::error::GpuError;

/// Draws the earth and its atmosphere shell into the canvas surface.
pub struct GlobeRenderer {
    ctx: GpuContext,
    pipelines: GlobePipelines,
    targets: RenderTargets,
    mesh: GpuMesh,
    earth_uniforms: wgpu::Buffer,
    atmosphere_uniforms: wgpu::Buffer,
    earth_bind_group: wgpu::BindGroup,
    atmosphere_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    // Kept alive for the texture bind group.
    _textures: [GpuTexture; 3],
}

impl GlobeRenderer {
    pub fn new(
        ctx: GpuContext,
        geometry: &SphereGeometry,
        mut images: TextureImages,
        anisotropy: u16,
    ) -> Self {
        let device = &ctx.device;
        let pipelines = GlobePipelines::new(device, ctx.format, ctx.sample_count);
        let (width, height) = ctx.size();
        let targets = RenderTargets::new(device, ctx.format, ctx.sample_count, width, height);
        let mesh = GpuMesh::new(device, geometry);

        let textures = TextureSlot::ALL.map(|slot| match images.take(slot) {
            Some(image) => texture::upload(device, &ctx.queue, slot.label(), image, slot.is_srgb()),
            None => texture::solid(device, &ctx.queue, slot.label(), fallback_texel(slot), slot.is_srgb()),
        });
        let sampler = texture::create_sampler(device, anisotropy);

        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("earth-textures"),
            layout: &pipelines.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&textures[0].view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&textures[1].view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&textures[2].view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let (earth_uniforms, earth_bind_group) = uniform_block(device, &pipelines, "earth-uniforms");
        let (atmosphere_uniforms, atmosphere_bind_group) =
            uniform_block(device, &pipelines, "atmosphere-uniforms");

        Self {
            ctx,
            pipelines,
            targets,
            mesh,
            earth_uniforms,
            atmosphere_uniforms,
            earth_bind_group,
            atmosphere_bind_group,
            texture_bind_group,
            _textures: textures,
        }
    }
}

fn uniform_block(
    device: &wgpu::Device,
    pipelines: &GlobePipelines,
    label: &str,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: MeshUniforms::SIZE_BYTES as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: &pipelines.uniform_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (buffer, bind_group)
}

/// Flat stand-ins: ocean blue by day, unlit by night, no clouds or water.
fn fallback_texel(slot: TextureSlot) -> [u8; 4] {
    match slot {
        TextureSlot::Day => [38, 74, 128, 255],
        TextureSlot::Night => [0, 0, 0, 255],
        TextureSlot::SpecularClouds => [0, 0, 0, 255],
    }
}

impl GlobeRenderer {
    /// Physical size of the surface actually drawn to.
    pub fn surface_size(&self) -> (u32, u32) {
        self.ctx.size()
    }
}

impl Renderer for GlobeRenderer {
    type Error = GpuError;

    fn backend(&self) -> &'static str {
        self.ctx.backend()
    }

    fn draw(&mut self, frame: &FrameData) -> Result<(), GpuError> {
        let queue = &self.ctx.queue;
        queue.write_buffer(&self.earth_uniforms, 0, bytemuck::bytes_of(&frame.earth));
        queue.write_buffer(&self.atmosphere_uniforms, 0, bytemuck::bytes_of(&frame.atmosphere));

        let output = self.ctx.acquire()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let (view, resolve_target) = match &self.targets.msaa_view {
            Some(msaa) => (msaa, Some(&surface_view)),
            None => (&surface_view, None),
        };

        let [r, g, b, a] = frame.clear_color.map(f64::from);
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("globe-frame"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("globe-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(&self.pipelines.earth);
            pass.set_bind_group(0, &self.earth_bind_group, &[]);
            pass.set_bind_group(1, &self.texture_bind_group, &[]);
            self.mesh.draw(&mut pass);

            pass.set_pipeline(&self.pipelines.atmosphere);
            pass.set_bind_group(0, &self.atmosphere_bind_group, &[]);
            self.mesh.draw(&mut pass);
        }

        queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        let (width, height) = self.ctx.size();
        if !self.targets.matches(width, height) {
            self.targets = RenderTargets::new(
                &self.ctx.device,
                self.ctx.format,
                self.ctx.sample_count,
                width,
                height,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks_are_opaque() {
        for slot in TextureSlot::ALL {
            assert_eq!(fallback_texel(slot)[3], 255);
        }
    }

    #[test]
    fn fallback_mask_has_no_clouds_or_water() {
        let [r, g, ..] = fallback_texel(TextureSlot::SpecularClouds);
        assert_eq!((r, g), (0, 0));
    }
}
