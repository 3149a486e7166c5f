use std::num::NonZeroU64;

use earth_engine::MeshUniforms;

use super::mesh::vertex_layout;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

const EARTH_SHADER: &str = include_str!("../shaders/earth.wgsl");
const ATMOSPHERE_SHADER: &str = include_str!("../shaders/atmosphere.wgsl");

/// The two globe pipelines and their bind group layouts.
///
/// Group 0 is the per-mesh [`MeshUniforms`] block for both pipelines;
/// group 1 holds the earth's three textures and sampler.
pub struct GlobePipelines {
    pub earth: wgpu::RenderPipeline,
    pub atmosphere: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
}

impl GlobePipelines {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat, sample_count: u32) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh-uniform-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(MeshUniforms::SIZE_BYTES as u64),
                },
                count: None,
            }],
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("earth-texture-layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                texture_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let earth_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("earth-pipeline-layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });
        let atmosphere_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("atmosphere-pipeline-layout"),
            bind_group_layouts: &[&uniform_layout],
            immediate_size: 0,
        });

        let earth_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("earth-shader"),
            source: wgpu::ShaderSource::Wgsl(EARTH_SHADER.into()),
        });
        let atmosphere_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("atmosphere-shader"),
            source: wgpu::ShaderSource::Wgsl(ATMOSPHERE_SHADER.into()),
        });

        let earth = create_pipeline(
            device,
            &PipelineDesc {
                label: "earth-pipeline",
                layout: &earth_layout,
                shader: &earth_shader,
                color_format,
                sample_count,
                cull_mode: wgpu::Face::Back,
                blend: None,
                depth_write: true,
            },
        );
        // Inner faces of the scaled shell, blended over the earth.
        let atmosphere = create_pipeline(
            device,
            &PipelineDesc {
                label: "atmosphere-pipeline",
                layout: &atmosphere_layout,
                shader: &atmosphere_shader,
                color_format,
                sample_count,
                cull_mode: wgpu::Face::Front,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: false,
            },
        );

        Self {
            earth,
            atmosphere,
            uniform_layout,
            texture_layout,
        }
    }
}

struct PipelineDesc<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    sample_count: u32,
    cull_mode: wgpu::Face,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
}

fn create_pipeline(device: &wgpu::Device, desc: &PipelineDesc<'_>) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(desc.cull_mode),
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: desc.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.color_format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

/// Size-dependent attachments: the multisampled color target (when MSAA is
/// on) and the depth buffer.
pub struct RenderTargets {
    pub msaa_view: Option<wgpu::TextureView>,
    pub depth_view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl RenderTargets {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        sample_count: u32,
        width: u32,
        height: u32,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        };
        let attachment = |label, format| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        let msaa_view = (sample_count > 1).then(|| attachment("msaa-color", color_format));
        let depth_view = attachment("depth-buffer", DEPTH_FORMAT);

        Self {
            msaa_view,
            depth_view,
            width: size.width,
            height: size.height,
        }
    }

    pub fn matches(&self, width: u32, height: u32) -> bool {
        self.width == width.max(1) && self.height == height.max(1)
    }
}
