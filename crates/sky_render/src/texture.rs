//! Texture loading: decode, vertical flip, RGBA8 conversion, CPU mip chain.
//!
//! wgpu has no equivalent of GL's generateMipmap, so the full chain is built
//! on the CPU with a triangle filter and every level is uploaded explicitly.
//! Backdrop images are loaded once at startup, so the extra CPU cost is paid
//! off the hot path.

use image::imageops::FilterType;
use image::RgbaImage;

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub size: (u32, u32),
}

impl Texture {
    /// Decodes an encoded image (PNG) into a GPU texture with a full mip
    /// chain and a clamp-to-edge linear sampler. Fails if the bytes cannot
    /// be decoded; no texture object is created in that case.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self, String> {
        let base = decode_rgba_flipped(bytes)
            .map_err(|e| format!("Failed to decode texture '{label}': {e}"))?;
        let (width, height) = base.dimensions();
        let mips = build_mip_chain(base);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: mips.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (level, mip) in mips.iter().enumerate() {
            let (mip_w, mip_h) = mip.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                mip.as_raw(),
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * mip_w),
                    rows_per_image: Some(mip_h),
                },
                wgpu::Extent3d {
                    width: mip_w,
                    height: mip_h,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            texture,
            view,
            sampler,
            size: (width, height),
        })
    }
}

/// Decode to RGBA8 and flip vertically so row 0 is the bottom of the image,
/// matching the quad's bottom-left UV origin.
fn decode_rgba_flipped(bytes: &[u8]) -> Result<RgbaImage, String> {
    let img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    Ok(img.flipv().to_rgba8())
}

fn build_mip_chain(base: RgbaImage) -> Vec<RgbaImage> {
    let (mut w, mut h) = base.dimensions();
    let mut chain = vec![base];
    while w > 1 || h > 1 {
        w = (w / 2).max(1);
        h = (h / 2).max(1);
        let next = image::imageops::resize(&chain[chain.len() - 1], w, h, FilterType::Triangle);
        chain.push(next);
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    /// 2x2 probe with a distinct color in each corner, encoded as PNG:
    /// red top-left, green top-right, blue bottom-left, white bottom-right.
    fn corner_probe_png() -> Vec<u8> {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, RED);
        img.put_pixel(1, 0, GREEN);
        img.put_pixel(0, 1, BLUE);
        img.put_pixel(1, 1, WHITE);
        let mut bytes = Vec::new();
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("encode probe png");
        bytes
    }

    #[test]
    fn decode_preserves_dimensions() {
        let decoded = decode_rgba_flipped(&corner_probe_png()).expect("probe should decode");
        assert_eq!(decoded.dimensions(), (2, 2));
    }

    #[test]
    fn decode_flips_rows_vertically() {
        let decoded = decode_rgba_flipped(&corner_probe_png()).expect("probe should decode");
        // Source top row (red, green) must land on the decoded bottom row
        // and vice versa.
        assert_eq!(*decoded.get_pixel(0, 1), RED);
        assert_eq!(*decoded.get_pixel(1, 1), GREEN);
        assert_eq!(*decoded.get_pixel(0, 0), BLUE);
        assert_eq!(*decoded.get_pixel(1, 0), WHITE);
    }

    #[test]
    fn decode_rejects_garbage_bytes() {
        let err = decode_rgba_flipped(&[0xde, 0xad, 0xbe, 0xef]).expect_err("must not decode");
        assert!(!err.is_empty());
    }

    #[test]
    fn mip_chain_halves_down_to_one_pixel() {
        let chain = build_mip_chain(RgbaImage::new(8, 4));
        let dims: Vec<(u32, u32)> = chain.iter().map(|m| m.dimensions()).collect();
        assert_eq!(dims, vec![(8, 4), (4, 2), (2, 1), (1, 1)]);
    }

    #[test]
    fn mip_chain_handles_non_power_of_two() {
        let chain = build_mip_chain(RgbaImage::new(5, 3));
        let dims: Vec<(u32, u32)> = chain.iter().map(|m| m.dimensions()).collect();
        assert_eq!(dims, vec![(5, 3), (2, 1), (1, 1)]);
    }

    #[test]
    fn mip_chain_of_single_pixel_is_just_the_base() {
        let chain = build_mip_chain(RgbaImage::new(1, 1));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn solid_color_survives_downsampling() {
        let base = RgbaImage::from_pixel(4, 4, RED);
        let chain = build_mip_chain(base);
        for mip in &chain {
            for pixel in mip.pixels() {
                assert_eq!(*pixel, RED);
            }
        }
    }
}
