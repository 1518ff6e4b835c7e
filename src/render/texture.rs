use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::render::backend::GlBackend;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Failed to load texture {path:?}: {reason}")]
    TextureLoadFailed { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextureWrap {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextureFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapLinear,
}

impl TextureFilter {
    fn uses_mipmaps(self) -> bool {
        matches!(
            self,
            TextureFilter::NearestMipmapNearest | TextureFilter::LinearMipmapLinear
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerSettings {
    pub wrap: TextureWrap,
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            wrap: TextureWrap::Repeat,
            min_filter: TextureFilter::LinearMipmapLinear,
            mag_filter: TextureFilter::Linear,
        }
    }
}

/// Pixels decoded from an image file, ready for upload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

/// Decodes `path` to RGBA8. GL's texture origin is the bottom-left corner,
/// so `flip_vertically` is normally set.
pub fn decode_image<P: AsRef<Path>>(path: P, flip_vertically: bool) -> Result<DecodedImage, ResourceError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| ResourceError::TextureLoadFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let img = if flip_vertically { img.flipv() } else { img };
    let img = img.to_rgba8();

    Ok(DecodedImage {
        width: img.width(),
        height: img.height(),
        format: PixelFormat::Rgba,
        pixels: img.into_raw(),
    })
}

/// A 2D texture object. Deleted on drop.
pub struct Texture<'gl, B: GlBackend> {
    gl: &'gl B,
    id: u32,
    width: u32,
    height: u32,
}

impl<'gl, B: GlBackend> Texture<'gl, B> {
    /// A texture object with sampling state but no image.
    pub fn blank(gl: &'gl B, sampler: &SamplerSettings) -> Self {
        let id = gl.gen_texture();
        gl.bind_texture(id);
        gl.texture_parameters(sampler);
        gl.bind_texture(0);

        Self {
            gl,
            id,
            width: 0,
            height: 0,
        }
    }

    pub fn from_image(gl: &'gl B, image: &DecodedImage, sampler: &SamplerSettings) -> Self {
        let id = gl.gen_texture();
        gl.bind_texture(id);
        gl.texture_parameters(sampler);
        gl.tex_image_2d(image.width, image.height, image.format, &image.pixels);
        if sampler.min_filter.uses_mipmaps() {
            gl.generate_mipmap();
        }
        gl.bind_texture(0);

        log::debug!("Uploaded {}x{} texture {}", image.width, image.height, id);
        Self {
            gl,
            id,
            width: image.width,
            height: image.height,
        }
    }

    pub fn from_file<P: AsRef<Path>>(
        gl: &'gl B,
        path: P,
        sampler: &SamplerSettings,
        flip_vertically: bool,
    ) -> Result<Self, ResourceError> {
        let image = decode_image(path, flip_vertically)?;
        Ok(Self::from_image(gl, &image, sampler))
    }

    /// Like [`Texture::from_file`], but a decode failure is logged and a blank
    /// texture is returned so rendering can go on.
    pub fn from_file_or_blank<P: AsRef<Path>>(
        gl: &'gl B,
        path: P,
        sampler: &SamplerSettings,
        flip_vertically: bool,
    ) -> Self {
        match Self::from_file(gl, path, sampler, flip_vertically) {
            Ok(texture) => texture,
            Err(e) => {
                log::error!("{}", e);
                Self::blank(gl, sampler)
            }
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_blank(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Binds to texture unit `unit`.
    pub fn bind(&self, unit: u32) {
        self.gl.active_texture_unit(unit);
        self.gl.bind_texture(self.id);
    }
}

impl<B: GlBackend> Drop for Texture<'_, B> {
    fn drop(&mut self) {
        self.gl.delete_texture(self.id);
    }
}
