use image::imageops::{self, FilterType};
use image::RgbaImage;

/// A sampled 2D texture with its default view.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Full mip chain down to 1×1, level 0 first.
pub fn mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let levels = mip_level_count(base.width(), base.height()) as usize;
    let mut chain = Vec::with_capacity(levels);
    chain.push(base);
    while chain.len() < levels {
        let Some(prev) = chain.last() else { break };
        let width = (prev.width() / 2).max(1);
        let height = (prev.height() / 2).max(1);
        let next = imageops::resize(prev, width, height, FilterType::Triangle);
        chain.push(next);
    }
    chain
}

/// Upload `image` with a CPU-generated mip chain. Color maps use an sRGB
/// format so sampling returns linear values.
pub fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: RgbaImage,
    srgb: bool,
) -> GpuTexture {
    let (width, height) = image.dimensions();
    let levels = mip_chain(image);

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: levels.len() as u32,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: texture_format(srgb),
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for (level, pixels) in levels.iter().enumerate() {
        let (width, height) = pixels.dimensions();
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: level as u32,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture { texture, view }
}

/// Single-texel stand-in for a texture that failed to load.
pub fn solid(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    rgba: [u8; 4],
    srgb: bool,
) -> GpuTexture {
    upload(device, queue, label, RgbaImage::from_pixel(1, 1, image::Rgba(rgba)), srgb)
}

fn texture_format(srgb: bool) -> wgpu::TextureFormat {
    if srgb {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

/// Trilinear sampler shared by the earth textures. Longitude wraps, latitude
/// clamps at the poles.
pub fn create_sampler(device: &wgpu::Device, anisotropy: u16) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("earth-sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        anisotropy_clamp: anisotropy.clamp(1, 16),
        ..Default::default()
    })
}
