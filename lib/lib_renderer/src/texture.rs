use std::path::Path;

use glam::{Vec2, vec2};
use image::{EncodableLayout, RgbaImage};
use lib_gpu::{
    Extent3d, Origin3d, TexelCopyBufferLayout, TexelCopyTextureInfo, TextureAspect,
    TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
    TextureViewDescriptor,
};
use log::debug;

use crate::{RenderContext, RenderError};

/// Pixel dimensions of a texture, kept around for pixel-to-UV conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSize {
    pub width: u32,
    pub height: u32,
}

impl TextureSize {
    pub fn pixel_to_uv(&self, pixel: Vec2) -> Vec2 {
        vec2(pixel.x / self.width as f32, pixel.y / self.height as f32)
    }
}

/// A GPU texture with its pixel dimensions. Cheap to clone; the underlying
/// resource is refcounted, so render objects can share it freely.
#[derive(Debug, Clone)]
pub struct Texture {
    view: TextureView,
    size: TextureSize,
}

impl Texture {
    pub fn from_image(image: &RgbaImage, ctx: RenderContext<'_>) -> Self {
        let texture = ctx.device.create_texture(&TextureDescriptor {
            label: Some("sprite texture"),
            size: Extent3d {
                width: image.width(),
                height: image.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            TexelCopyTextureInfo {
                texture: &texture,
                aspect: TextureAspect::All,
                mip_level: 0,
                origin: Origin3d::ZERO,
            },
            image.as_bytes(),
            TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width() * 4),
                rows_per_image: Some(image.height()),
            },
            texture.size(),
        );

        debug!("uploaded {}x{} texture", image.width(), image.height());

        Self {
            view: texture.create_view(&TextureViewDescriptor::default()),
            size: TextureSize {
                width: image.width(),
                height: image.height(),
            },
        }
    }

    pub fn from_path(path: impl AsRef<Path>, ctx: RenderContext<'_>) -> Result<Self, RenderError> {
        let path = path.as_ref();

        let image = image::open(path)
            .map_err(|source| RenderError::TextureLoad {
                path: path.to_owned(),
                source,
            })?
            .to_rgba8();

        Ok(Self::from_image(&image, ctx))
    }

    pub fn size(&self) -> TextureSize {
        self.size
    }

    pub(crate) fn view(&self) -> &TextureView {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use super::*;

    #[test]
    fn pixel_to_uv_normalizes_by_dimension() {
        let size = TextureSize {
            width: 256,
            height: 128,
        };

        assert_eq!(size.pixel_to_uv(vec2(0.0, 0.0)), vec2(0.0, 0.0));
        assert_eq!(size.pixel_to_uv(vec2(256.0, 128.0)), vec2(1.0, 1.0));
        assert_eq!(size.pixel_to_uv(vec2(64.0, 64.0)), vec2(0.25, 0.5));
    }
}
