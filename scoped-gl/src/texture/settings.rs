use super::format::{
    compressed_image_size, Channel, CompareFunc, CompareMode, Filter, MinFilter, TextureFormat,
    TextureType, Wrap,
};
use super::{Texture, TextureTarget};
use crate::api::PixelUnpackData;
use crate::binding::{BufferTarget, SaveBinding};
use crate::buffer::Buffer;
use crate::error::GlResult;
use crate::gl;
use crate::gl::types::*;
use tracing::error;

#[derive(Copy, Clone, Debug)]
enum TexelSource<'a> {
    None,
    Slice(&'a [u8]),
    Buffer(&'a Buffer, usize),
}

/// Image specification and sampling parameters for a texture.
///
/// Built fluently, then applied with [`apply`](TextureSettings::apply) (settings obtained from
/// [`Texture::config`]) or [`apply_to`](TextureSettings::apply_to). A builder obtained from
/// `Texture::config` that is dropped without being applied applies itself on drop; failures are
/// logged since they cannot be returned.
///
/// Application uploads the image at `level` (reallocating it), then sets every sampling
/// parameter. Image dimensions and `level` do not persist on the texture beyond what the driver
/// records.
#[derive(Debug)]
#[must_use = "settings obtained from `Texture::config` apply on drop; call `apply` to see errors"]
pub struct TextureSettings<'a> {
    parent: Option<&'a Texture>,

    swizzle: [Channel; 4],
    format: TextureFormat,
    internal_format: TextureFormat,
    ty: TextureType,
    min_filter: MinFilter,
    mag_filter: Filter,

    width: u32,
    height: u32,
    depth: u32,
    level: i32,
    compressed_image_size: usize,
    pixels: TexelSource<'a>,

    aniso: f32,
    compare_mode: CompareMode,
    compare_func: CompareFunc,
    wrap: [Wrap; 3],
    max_lod: f32,
    min_lod: f32,
    lod: f32,
    max_level: i32,
    generate_mipmap: bool,
    border_color: [f32; 4],
}

impl<'a> Default for TextureSettings<'a> {
    fn default() -> Self {
        TextureSettings {
            parent: None,
            swizzle: [Channel::R, Channel::G, Channel::B, Channel::A],
            format: TextureFormat::Rgba,
            internal_format: TextureFormat::Rgba,
            ty: TextureType::UnsignedByte,
            min_filter: MinFilter::Nearest,
            mag_filter: Filter::Nearest,
            width: 0,
            height: 0,
            depth: 1,
            level: 0,
            compressed_image_size: 0,
            pixels: TexelSource::None,
            aniso: 1.0,
            compare_mode: CompareMode::None,
            compare_func: CompareFunc::Greater,
            wrap: [Wrap::Repeat; 3],
            max_lod: 1000.0,
            min_lod: -1000.0,
            lod: 0.0,
            max_level: 1000,
            generate_mipmap: false,
            border_color: [0.0; 4],
        }
    }
}

impl<'a> TextureSettings<'a> {
    /// Detached settings, applied with [`apply_to`](TextureSettings::apply_to).
    pub fn new() -> TextureSettings<'a> {
        TextureSettings::default()
    }

    pub(super) fn for_texture(texture: &'a Texture) -> TextureSettings<'a> {
        let mut settings = TextureSettings::default();
        settings.parent = Some(texture);
        settings
    }

    pub fn swizzle(mut self, r: Channel, g: Channel, b: Channel, a: Channel) -> Self {
        self.swizzle = [r, g, b, a];
        self
    }

    /// Layout of the client pixels passed to [`pixels`](TextureSettings::pixels).
    pub fn format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    /// Component type of the client pixels.
    pub fn type_(mut self, ty: TextureType) -> Self {
        self.ty = ty;
        self
    }

    pub fn internal_format(mut self, format: TextureFormat) -> Self {
        self.internal_format = format;
        self
    }

    pub fn filter(mut self, min_filter: MinFilter, mag_filter: Filter) -> Self {
        self.min_filter = min_filter;
        self.mag_filter = mag_filter;
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Depth of 3D images. Ignored for 1D and 2D textures.
    pub fn depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn size(self, width: u32, height: u32) -> Self {
        self.width(width).height(height)
    }

    pub fn level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    /// Byte size of compressed pixel data. 0 derives it from the internal format and size.
    pub fn compressed_image_size(mut self, size: usize) -> Self {
        self.compressed_image_size = size;
        self
    }

    pub fn pixels(mut self, pixels: &'a [u8]) -> Self {
        self.pixels = TexelSource::Slice(pixels);
        self
    }

    /// Reads the image from `buffer`, starting at `offset` bytes.
    pub fn pixels_from_buffer(mut self, buffer: &'a Buffer, offset: usize) -> Self {
        self.pixels = TexelSource::Buffer(buffer, offset);
        self
    }

    pub fn aniso(mut self, value: f32) -> Self {
        self.aniso = value;
        self
    }

    pub fn compare_mode(mut self, mode: CompareMode) -> Self {
        self.compare_mode = mode;
        self
    }

    pub fn compare_func(mut self, func: CompareFunc) -> Self {
        self.compare_func = func;
        self
    }

    pub fn compare(self, func: CompareFunc, mode: CompareMode) -> Self {
        self.compare_func(func).compare_mode(mode)
    }

    pub fn wrap_s(mut self, wrap: Wrap) -> Self {
        self.wrap[0] = wrap;
        self
    }

    pub fn wrap_t(mut self, wrap: Wrap) -> Self {
        self.wrap[1] = wrap;
        self
    }

    pub fn wrap_r(mut self, wrap: Wrap) -> Self {
        self.wrap[2] = wrap;
        self
    }

    pub fn wrap(self, s: Wrap, t: Wrap, r: Wrap) -> Self {
        self.wrap_s(s).wrap_t(t).wrap_r(r)
    }

    pub fn max_lod(mut self, value: f32) -> Self {
        self.max_lod = value;
        self
    }

    pub fn min_lod(mut self, value: f32) -> Self {
        self.min_lod = value;
        self
    }

    /// Level-of-detail bias.
    pub fn lod(mut self, value: f32) -> Self {
        self.lod = value;
        self
    }

    pub fn max_level(mut self, value: i32) -> Self {
        self.max_level = value;
        self
    }

    pub fn generate_mipmap(mut self, value: bool) -> Self {
        self.generate_mipmap = value;
        self
    }

    /// Sets every mipmapping parameter at once.
    pub fn mipmap(
        self,
        level: i32,
        max_level: i32,
        lod: f32,
        min_lod: f32,
        max_lod: f32,
        generate: bool,
    ) -> Self {
        self.level(level)
            .max_level(max_level)
            .lod(lod)
            .min_lod(min_lod)
            .max_lod(max_lod)
            .generate_mipmap(generate)
    }

    pub fn border_color(mut self, rgba: [f32; 4]) -> Self {
        self.border_color = rgba;
        self
    }

    /// Applies the settings to the texture they were obtained from.
    ///
    /// Does nothing for detached settings.
    pub fn apply(mut self) -> GlResult<()> {
        match self.parent.take() {
            Some(parent) => self.apply_to(parent),
            None => Ok(()),
        }
    }

    /// Applies the settings to `texture`.
    pub fn apply_to(&self, texture: &Texture) -> GlResult<()> {
        let gl = texture.gl();
        let target = texture.target();
        let _save = SaveBinding::with(gl, target, texture.id());
        let unpack_buffer = match self.pixels {
            TexelSource::Buffer(buffer, _) => buffer.id(),
            _ => 0,
        };
        let _save_unpack = SaveBinding::with(gl, BufferTarget::PixelUnpack, unpack_buffer);
        texture.pixel_unpack_settings().apply(gl)?;

        let data = match self.pixels {
            TexelSource::None => PixelUnpackData::BufferOffset(0),
            TexelSource::Slice(pixels) => PixelUnpackData::Slice(pixels),
            TexelSource::Buffer(_, offset) => PixelUnpackData::BufferOffset(offset),
        };
        let t = target as GLenum;
        let (width, height, depth) = (
            self.width as GLsizei,
            self.height as GLsizei,
            self.depth as GLsizei,
        );

        if self.internal_format.is_compressed() {
            let size = match self.compressed_image_size {
                0 => compressed_image_size(self.internal_format, self.width, self.height)
                    .unwrap_or(0),
                size => size,
            };
            glcheck!(
                gl,
                gl.compressed_tex_image_2d(
                    t,
                    self.level,
                    self.internal_format as GLenum,
                    width,
                    height,
                    size as GLsizei,
                    data
                )
            );
        } else {
            let internal_format = self.internal_format as GLint;
            let (format, ty) = (self.format as GLenum, self.ty as GLenum);
            match target {
                TextureTarget::Texture1D => glcheck!(
                    gl,
                    gl.tex_image_1d(t, self.level, internal_format, width, format, ty, data)
                ),
                TextureTarget::Texture2D => glcheck!(
                    gl,
                    gl.tex_image_2d(
                        t,
                        self.level,
                        internal_format,
                        width,
                        height,
                        format,
                        ty,
                        data
                    )
                ),
                TextureTarget::Texture3D => glcheck!(
                    gl,
                    gl.tex_image_3d(
                        t,
                        self.level,
                        internal_format,
                        width,
                        height,
                        depth,
                        format,
                        ty,
                        data
                    )
                ),
            }
        }

        let int_params: [(GLenum, GLint); 13] = [
            (gl::TEXTURE_MAX_LEVEL, self.max_level),
            (gl::GENERATE_MIPMAP, self.generate_mipmap as GLint),
            (gl::TEXTURE_WRAP_S, self.wrap[0] as GLint),
            (gl::TEXTURE_WRAP_T, self.wrap[1] as GLint),
            (gl::TEXTURE_WRAP_R, self.wrap[2] as GLint),
            (gl::TEXTURE_COMPARE_MODE, self.compare_mode as GLint),
            (gl::TEXTURE_COMPARE_FUNC, self.compare_func as GLint),
            (gl::TEXTURE_MIN_FILTER, self.min_filter as GLint),
            (gl::TEXTURE_MAG_FILTER, self.mag_filter as GLint),
            (gl::TEXTURE_SWIZZLE_R, self.swizzle[0] as GLint),
            (gl::TEXTURE_SWIZZLE_G, self.swizzle[1] as GLint),
            (gl::TEXTURE_SWIZZLE_B, self.swizzle[2] as GLint),
            (gl::TEXTURE_SWIZZLE_A, self.swizzle[3] as GLint),
        ];
        for &(pname, value) in int_params.iter() {
            glcheck!(gl, gl.tex_parameter_i(t, pname, value));
        }

        let float_params: [(GLenum, GLfloat); 4] = [
            (gl::TEXTURE_MIN_LOD, self.min_lod),
            (gl::TEXTURE_MAX_LOD, self.max_lod),
            (gl::TEXTURE_LOD_BIAS, self.lod),
            (gl::TEXTURE_MAX_ANISOTROPY_EXT, self.aniso),
        ];
        for &(pname, value) in float_params.iter() {
            glcheck!(gl, gl.tex_parameter_f(t, pname, value));
        }
        glcheck!(
            gl,
            gl.tex_parameter_fv(t, gl::TEXTURE_BORDER_COLOR, &self.border_color)
        );
        Ok(())
    }
}

impl<'a> Drop for TextureSettings<'a> {
    fn drop(&mut self) {
        if let Some(parent) = self.parent.take() {
            if let Err(err) = self.apply_to(parent) {
                error!(id = parent.id(), %err, "failed to apply texture settings");
            }
        }
    }
}

#[cfg(all(test, feature = "soft"))]
mod tests {
    use super::*;
    use crate::api::Gl;
    use crate::soft::SoftGl;
    use crate::texture::ChannelName;
    use std::rc::Rc;

    fn context() -> Gl {
        Gl::new(Rc::new(SoftGl::new(16, 16)))
    }

    fn tex_param_i(texture: &Texture, pname: GLenum) -> GLint {
        let gl = texture.gl();
        let _save = SaveBinding::with(gl, texture.target(), texture.id());
        gl.get_tex_parameter_i(texture.target() as GLenum, pname)
    }

    fn tex_param_f(texture: &Texture, pname: GLenum) -> GLfloat {
        let gl = texture.gl();
        let _save = SaveBinding::with(gl, texture.target(), texture.id());
        gl.get_tex_parameter_f(texture.target() as GLenum, pname)
    }

    #[test]
    fn test_defaults_are_applied() {
        let gl = context();
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        texture.config().size(4, 4).apply().unwrap();

        assert_eq!(tex_param_i(&texture, gl::TEXTURE_MIN_FILTER), gl::NEAREST as GLint);
        assert_eq!(tex_param_i(&texture, gl::TEXTURE_MAG_FILTER), gl::NEAREST as GLint);
        assert_eq!(tex_param_i(&texture, gl::TEXTURE_WRAP_R), gl::REPEAT as GLint);
        assert_eq!(tex_param_i(&texture, gl::TEXTURE_COMPARE_FUNC), gl::GREATER as GLint);
        assert_eq!(tex_param_i(&texture, gl::TEXTURE_MAX_LEVEL), 1000);
        assert_eq!(tex_param_i(&texture, gl::TEXTURE_SWIZZLE_A), gl::ALPHA as GLint);
        assert_eq!(tex_param_f(&texture, gl::TEXTURE_MIN_LOD), -1000.0);
        assert_eq!(tex_param_f(&texture, gl::TEXTURE_MAX_LOD), 1000.0);
        assert_eq!(tex_param_f(&texture, gl::TEXTURE_MAX_ANISOTROPY_EXT), 1.0);
    }

    #[test]
    fn test_builder_overrides() {
        let gl = context();
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        texture
            .config()
            .size(4, 4)
            .filter(MinFilter::LinearMipmapLinear, Filter::Linear)
            .wrap(Wrap::ClampToEdge, Wrap::MirroredRepeat, Wrap::ClampToBorder)
            .compare(CompareFunc::LessEqual, CompareMode::RefToTexture)
            .swizzle(Channel::B, Channel::G, Channel::R, Channel::One)
            .mipmap(0, 3, 0.5, 0.0, 4.0, false)
            .apply()
            .unwrap();

        assert_eq!(
            tex_param_i(&texture, gl::TEXTURE_MIN_FILTER),
            gl::LINEAR_MIPMAP_LINEAR as GLint
        );
        assert_eq!(tex_param_i(&texture, gl::TEXTURE_WRAP_S), gl::CLAMP_TO_EDGE as GLint);
        assert_eq!(tex_param_i(&texture, gl::TEXTURE_WRAP_T), gl::MIRRORED_REPEAT as GLint);
        assert_eq!(
            tex_param_i(&texture, gl::TEXTURE_COMPARE_MODE),
            gl::COMPARE_REF_TO_TEXTURE as GLint
        );
        assert_eq!(tex_param_i(&texture, gl::TEXTURE_SWIZZLE_R), gl::BLUE as GLint);
        assert_eq!(tex_param_i(&texture, gl::TEXTURE_SWIZZLE_A), gl::ONE as GLint);
        assert_eq!(tex_param_i(&texture, gl::TEXTURE_MAX_LEVEL), 3);
        assert_eq!(tex_param_f(&texture, gl::TEXTURE_LOD_BIAS), 0.5);
        assert_eq!(tex_param_f(&texture, gl::TEXTURE_MAX_LOD), 4.0);
    }

    #[test]
    fn test_drop_applies_pending_settings() {
        let gl = context();
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        {
            let _pending = texture.config().size(3, 5);
        }
        assert_eq!(texture.size().unwrap(), (3, 5));
    }

    #[test]
    fn test_detached_settings_apply_to_many() {
        let gl = context();
        let settings = TextureSettings::new()
            .size(2, 2)
            .internal_format(TextureFormat::Rgb8)
            .format(TextureFormat::Rgb);
        let mut a = Texture::new(&gl);
        let mut b = Texture::new(&gl);
        a.create().unwrap();
        b.create().unwrap();
        a.configure(&settings).unwrap();
        b.configure(&settings).unwrap();
        assert_eq!(a.internal_format().unwrap(), TextureFormat::Rgb8);
        assert_eq!(b.channel_count().unwrap(), 3);
        // detached settings do nothing when dropped or applied
        settings.apply().unwrap();
    }

    #[test]
    fn test_compressed_upload_derives_size() {
        let gl = context();
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        let blocks = vec![0xabu8; 64];
        texture
            .config()
            .size(5, 5)
            .internal_format(TextureFormat::CompressedRgbaS3tcDxt5)
            .pixels(&blocks)
            .apply()
            .unwrap();

        assert!(texture.compressed().unwrap());
        assert_eq!(texture.compressed_size().unwrap(), 64);
        assert_eq!(
            texture.internal_format().unwrap(),
            TextureFormat::CompressedRgbaS3tcDxt5
        );
    }

    #[test]
    fn test_upload_from_buffer() {
        let gl = context();
        let mut source = Buffer::with_target(&gl, BufferTarget::PixelUnpack);
        source
            .create_with_data(8, Some(&[0, 0, 0, 0, 1, 2, 3, 4]))
            .unwrap();

        let mut texture = Texture::with_target(&gl, TextureTarget::Texture1D);
        texture.create().unwrap();
        texture
            .config()
            .width(1)
            .pixels_from_buffer(&source, 4)
            .apply()
            .unwrap();

        let mut out = [0u8; 4];
        texture
            .copy_to(&mut out, TextureFormat::Rgba, TextureType::UnsignedByte)
            .unwrap();
        assert_eq!(out, [1, 2, 3, 4]);
        assert_eq!(
            texture.channel_type(ChannelName::Red).unwrap(),
            crate::texture::ChannelType::UnsignedNormalized
        );
    }

    #[test]
    fn test_depth_texture_has_one_channel() {
        let gl = context();
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        texture
            .config()
            .size(4, 4)
            .internal_format(TextureFormat::Depth24)
            .format(TextureFormat::Depth)
            .type_(TextureType::Float)
            .apply()
            .unwrap();
        assert_eq!(texture.channel_count().unwrap(), 1);
    }
}
