//! Texture ownership and font atlas upload

use crate::{GlTexture, InitError, InitResult};
use dear_imgui_rs::{Context, TextureId};
use glow::{Context as GlContext, HasContext};
use std::borrow::Cow;
use std::collections::HashMap;

/// GL textures the bridge can bind, keyed by the id Dear ImGui draws with.
///
/// Ids start at 1; 0 stays reserved as the null texture.
#[derive(Debug)]
pub struct TextureRegistry {
    textures: HashMap<TextureId, GlTexture>,
    next_id: u64,
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            next_id: 1,
        }
    }

    /// Store `texture` under a fresh id
    pub fn register(&mut self, texture: GlTexture) -> TextureId {
        let id = TextureId::new(self.next_id);
        self.next_id += 1;
        self.textures.insert(id, texture);
        id
    }

    pub fn get(&self, id: TextureId) -> Option<GlTexture> {
        self.textures.get(&id).copied()
    }

    pub fn remove(&mut self, id: TextureId) -> Option<GlTexture> {
        self.textures.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Delete every texture and forget all ids
    pub fn clear(&mut self, gl: &GlContext) {
        for (_, texture) in self.textures.drain() {
            unsafe { gl.delete_texture(texture) };
        }
    }
}

/// Convert atlas pixels to RGBA8.
///
/// 4 bytes per pixel passes through unchanged; 1 byte per pixel (alpha only)
/// expands to white with that alpha. Other layouts are not supported.
pub fn atlas_pixels_to_rgba(pixels: &[u8], bytes_per_pixel: usize) -> Option<Cow<'_, [u8]>> {
    match bytes_per_pixel {
        4 => Some(Cow::Borrowed(pixels)),
        1 => Some(Cow::Owned(
            pixels.iter().flat_map(|&a| [255, 255, 255, a]).collect(),
        )),
        _ => None,
    }
}

/// Create a texture from raw RGBA data
pub fn create_texture_from_rgba(
    gl: &GlContext,
    width: u32,
    height: u32,
    data: &[u8],
) -> InitResult<GlTexture> {
    unsafe {
        let texture = gl.create_texture().map_err(InitError::CreateTexture)?;

        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA as i32,
            width as i32,
            height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(data)),
        );

        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );

        gl.bind_texture(glow::TEXTURE_2D, None);

        Ok(texture)
    }
}

/// Atlas pixels copied out of the GUI context
struct AtlasImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

/// Build the font atlas and copy its pixels as RGBA8
fn read_font_atlas(context: &mut Context) -> InitResult<AtlasImage> {
    if !context.font_atlas_mut().build() {
        return Err(InitError::FontAtlas("atlas build failed".into()));
    }

    let fonts = context.font_atlas();
    let raw_tex = fonts.get_tex_data();
    if raw_tex.is_null() {
        return Err(InitError::FontAtlas("atlas has no texture data".into()));
    }

    // SAFETY: the atlas was just built and is not modified while the pixels are copied.
    unsafe {
        let width = (*raw_tex).Width;
        let height = (*raw_tex).Height;
        let bpp = (*raw_tex).BytesPerPixel;
        let pixels = (*raw_tex).Pixels as *const u8;
        if pixels.is_null() || width <= 0 || height <= 0 || bpp <= 0 {
            return Err(InitError::FontAtlas(format!(
                "atlas texture is empty ({width}x{height}, {bpp} bytes per pixel)"
            )));
        }

        let bpp = bpp as usize;
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(bpp))
            .ok_or_else(|| InitError::FontAtlas("atlas size overflows".into()))?;
        let src = std::slice::from_raw_parts(pixels, len);
        let rgba = atlas_pixels_to_rgba(src, bpp)
            .ok_or_else(|| {
                InitError::FontAtlas(format!("unsupported atlas format: {bpp} bytes per pixel"))
            })?
            .into_owned();

        Ok(AtlasImage {
            width: width as u32,
            height: height as u32,
            rgba,
        })
    }
}

/// Upload the font atlas and tell Dear ImGui which id draws with it.
///
/// Returns the GL texture and the id it was registered under.
pub fn upload_font_atlas(
    gl: &GlContext,
    context: &mut Context,
    registry: &mut TextureRegistry,
) -> InitResult<(GlTexture, TextureId)> {
    let image = read_font_atlas(context)?;
    let texture = create_texture_from_rgba(gl, image.width, image.height, &image.rgba)?;
    let id = registry.register(texture);
    context.font_atlas_mut().set_texture_id(id);

    tracing::info!(
        target: "oslv-imgui-glow",
        width = image.width,
        height = image.height,
        texture_id = id.id(),
        "font atlas uploaded"
    );
    Ok((texture, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rgba_pixels_pass_through() {
        let pixels = [1, 2, 3, 4, 5, 6, 7, 8];
        let rgba = atlas_pixels_to_rgba(&pixels, 4).unwrap();
        assert!(matches!(rgba, Cow::Borrowed(_)));
        assert_eq!(&*rgba, &pixels);
    }

    #[test]
    fn alpha_pixels_expand_to_white() {
        let rgba = atlas_pixels_to_rgba(&[0, 128, 255], 1).unwrap();
        assert_eq!(
            rgba.into_owned(),
            vec![255, 255, 255, 0, 255, 255, 255, 128, 255, 255, 255, 255]
        );
    }

    fn texture(name: u32) -> GlTexture {
        glow::NativeTexture(std::num::NonZeroU32::new(name).unwrap())
    }

    #[test]
    fn registry_ids_start_at_one_and_increase() {
        let mut registry = TextureRegistry::new();
        let a = registry.register(texture(10));
        let b = registry.register(texture(11));
        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 2);
        assert_eq!(registry.get(a), Some(texture(10)));
        assert_eq!(registry.get(TextureId::new(0)), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registry_remove() {
        let mut registry = TextureRegistry::new();
        let id = registry.register(texture(3));
        assert_eq!(registry.remove(id), Some(texture(3)));
        assert_eq!(registry.get(id), None);
        assert!(registry.is_empty());
        // removed ids are not reused
        assert_eq!(registry.register(texture(5)).id(), 2);
    }

    #[test]
    fn other_layouts_are_rejected() {
        assert!(atlas_pixels_to_rgba(&[0; 6], 2).is_none());
        assert!(atlas_pixels_to_rgba(&[0; 6], 3).is_none());
        assert!(atlas_pixels_to_rgba(&[], 0).is_none());
    }
}
