use crate::api::{Gl, PixelPackData, PixelUnpackData};
use crate::binding::{BufferTarget, SaveBinding};
use crate::buffer::Buffer;
use crate::error::{Error, GlResult};
use crate::gl;
use crate::gl::types::*;
use crate::pixel_store::{PixelPackSettings, PixelUnpackSettings};
use tracing::trace;

mod format;
mod settings;

pub use self::format::{
    compressed_image_size, Channel, ChannelName, ChannelType, CompareFunc, CompareMode, Filter,
    MinFilter, TextureFormat, TextureType, Wrap,
};
pub use self::settings::TextureSettings;
pub use crate::binding::TextureTarget;

//--------------------------------------------------------------------------------------------------

/// Wrapper for texture objects.
///
/// The texture carries a current mip level (used by queries and transfers) and the pixel
/// transfer settings applied before its uploads and readbacks.
pub struct Texture {
    gl: Gl,
    id: GLuint,
    target: TextureTarget,
    level: i32,
    pack: PixelPackSettings,
    unpack: PixelUnpackSettings,
}

impl_handle_type!(Texture, "texture", |gl, id| gl.delete_texture(id));

impl Texture {
    /// Creates an empty 2D texture wrapper.
    pub fn new(gl: &Gl) -> Texture {
        Texture::with_target(gl, TextureTarget::Texture2D)
    }

    pub fn with_target(gl: &Gl, target: TextureTarget) -> Texture {
        Texture {
            gl: gl.clone(),
            id: 0,
            target,
            level: 0,
            pack: PixelPackSettings::default(),
            unpack: PixelUnpackSettings::default(),
        }
    }

    pub fn create(&mut self) -> GlResult<()> {
        self.id = glcheck!(self.gl, self.gl.gen_texture());
        trace!(id = self.id, kind = "texture", target = ?self.target, "create");
        Ok(())
    }

    pub fn create_with_target(&mut self, target: TextureTarget) -> GlResult<()> {
        self.target = target;
        self.create()
    }

    pub fn recreate(&mut self) -> GlResult<()> {
        self.remove();
        self.create()
    }

    pub fn recreate_with_target(&mut self, target: TextureTarget) -> GlResult<()> {
        self.remove();
        self.create_with_target(target)
    }

    pub fn target(&self) -> TextureTarget {
        self.target
    }

    /// Binds the texture on the active texture unit. The previous binding is not restored.
    pub fn bind(&self) -> GlResult<()> {
        glcheck!(self.gl, self.gl.bind_texture(self.target as GLenum, self.id));
        Ok(())
    }

    /// The mip level used by queries and transfers.
    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn set_level(&mut self, level: i32) {
        self.level = level;
    }

    /// Returns a view of this texture at another mip level.
    pub fn with_level(&self, level: i32) -> TextureRef {
        TextureRef {
            texture: self,
            level,
        }
    }

    /// Returns a view of this texture at its current level.
    pub fn view(&self) -> TextureRef {
        self.with_level(self.level)
    }

    pub fn pixel_pack_settings(&self) -> &PixelPackSettings {
        &self.pack
    }

    pub fn pixel_pack_settings_mut(&mut self) -> &mut PixelPackSettings {
        &mut self.pack
    }

    pub fn pixel_unpack_settings(&self) -> &PixelUnpackSettings {
        &self.unpack
    }

    pub fn pixel_unpack_settings_mut(&mut self) -> &mut PixelUnpackSettings {
        &mut self.unpack
    }

    /// Starts a settings builder that applies to this texture.
    ///
    /// The settings are applied by [`TextureSettings::apply`], or when the builder is dropped.
    pub fn config(&self) -> TextureSettings {
        TextureSettings::for_texture(self)
    }

    /// Applies detached settings to this texture.
    pub fn configure(&self, settings: &TextureSettings) -> GlResult<()> {
        settings.apply_to(self)
    }

    pub fn width(&self) -> GlResult<u32> {
        self.view().width()
    }

    pub fn height(&self) -> GlResult<u32> {
        self.view().height()
    }

    pub fn depth(&self) -> GlResult<u32> {
        self.view().depth()
    }

    pub fn size(&self) -> GlResult<(u32, u32)> {
        self.view().size()
    }

    pub fn size3d(&self) -> GlResult<(u32, u32, u32)> {
        self.view().size3d()
    }

    pub fn internal_format(&self) -> GlResult<TextureFormat> {
        self.view().internal_format()
    }

    pub fn channel_type(&self, channel: ChannelName) -> GlResult<ChannelType> {
        self.view().channel_type(channel)
    }

    pub fn channel_count(&self) -> GlResult<u32> {
        self.view().channel_count()
    }

    pub fn compressed(&self) -> GlResult<bool> {
        self.view().compressed()
    }

    pub fn compressed_size(&self) -> GlResult<usize> {
        self.view().compressed_size()
    }

    pub fn copy_from(&self, src: &[u8], format: TextureFormat, ty: TextureType) -> GlResult<()> {
        self.view().copy_from(src, format, ty)
    }

    pub fn copy_from_with_settings(
        &self,
        src: &[u8],
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelUnpackSettings,
    ) -> GlResult<()> {
        self.view().copy_from_with_settings(src, format, ty, settings)
    }

    pub fn copy_from_buffer(
        &self,
        buffer: &Buffer,
        format: TextureFormat,
        ty: TextureType,
    ) -> GlResult<()> {
        self.view().copy_from_buffer(buffer, format, ty)
    }

    pub fn copy_from_buffer_with_settings(
        &self,
        buffer: &Buffer,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelUnpackSettings,
    ) -> GlResult<()> {
        self.view()
            .copy_from_buffer_with_settings(buffer, format, ty, settings)
    }

    pub fn copy_to(&self, dst: &mut [u8], format: TextureFormat, ty: TextureType) -> GlResult<()> {
        self.view().copy_to(dst, format, ty)
    }

    pub fn copy_to_with_settings(
        &self,
        dst: &mut [u8],
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelPackSettings,
    ) -> GlResult<()> {
        self.view().copy_to_with_settings(dst, format, ty, settings)
    }

    pub fn copy_to_buffer(
        &self,
        buffer: &Buffer,
        format: TextureFormat,
        ty: TextureType,
    ) -> GlResult<()> {
        self.view().copy_to_buffer(buffer, format, ty)
    }

    pub fn copy_to_buffer_with_settings(
        &self,
        buffer: &Buffer,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelPackSettings,
    ) -> GlResult<()> {
        self.view()
            .copy_to_buffer_with_settings(buffer, format, ty, settings)
    }
}

//--------------------------------------------------------------------------------------------------

/// A texture at a specific mip level. Never deletes the texture.
#[derive(Copy, Clone, Debug)]
pub struct TextureRef<'a> {
    texture: &'a Texture,
    level: i32,
}

impl<'a> From<&'a Texture> for TextureRef<'a> {
    fn from(texture: &'a Texture) -> Self {
        texture.view()
    }
}

impl<'a> TextureRef<'a> {
    pub fn texture(&self) -> &'a Texture {
        self.texture
    }

    pub fn id(&self) -> GLuint {
        self.texture.id
    }

    pub fn target(&self) -> TextureTarget {
        self.texture.target
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    fn level_parameter(&self, pname: GLenum) -> GlResult<GLint> {
        let gl = &self.texture.gl;
        let target = self.texture.target;
        let _save = SaveBinding::with(gl, target, self.texture.id);
        let value = glcheck!(
            gl,
            gl.get_tex_level_parameter_i(target as GLenum, self.level, pname)
        );
        Ok(value)
    }

    pub fn width(&self) -> GlResult<u32> {
        Ok(self.level_parameter(gl::TEXTURE_WIDTH)? as u32)
    }

    pub fn height(&self) -> GlResult<u32> {
        Ok(self.level_parameter(gl::TEXTURE_HEIGHT)? as u32)
    }

    pub fn depth(&self) -> GlResult<u32> {
        Ok(self.level_parameter(gl::TEXTURE_DEPTH)? as u32)
    }

    pub fn size(&self) -> GlResult<(u32, u32)> {
        Ok((self.width()?, self.height()?))
    }

    pub fn size3d(&self) -> GlResult<(u32, u32, u32)> {
        Ok((self.width()?, self.height()?, self.depth()?))
    }

    pub fn internal_format(&self) -> GlResult<TextureFormat> {
        let value = self.level_parameter(gl::TEXTURE_INTERNAL_FORMAT)? as GLenum;
        TextureFormat::from_gl(value).ok_or(Error::UnknownEnum {
            what: "internal format",
            value,
        })
    }

    pub fn channel_type(&self, channel: ChannelName) -> GlResult<ChannelType> {
        let value = self.level_parameter(channel as GLenum)? as GLenum;
        ChannelType::from_gl(value).ok_or(Error::UnknownEnum {
            what: "channel type",
            value,
        })
    }

    /// Number of red, green, blue, alpha and depth channels stored in this level.
    pub fn channel_count(&self) -> GlResult<u32> {
        let mut count = 0;
        for &channel in ChannelName::ALL.iter() {
            if self.channel_type(channel)? != ChannelType::None {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn compressed(&self) -> GlResult<bool> {
        Ok(self.level_parameter(gl::TEXTURE_COMPRESSED)? != 0)
    }

    pub fn compressed_size(&self) -> GlResult<usize> {
        Ok(self.level_parameter(gl::TEXTURE_COMPRESSED_IMAGE_SIZE)? as usize)
    }

    /// Overwrites the whole level with client pixels, using the texture's unpack settings.
    pub fn copy_from(&self, src: &[u8], format: TextureFormat, ty: TextureType) -> GlResult<()> {
        self.copy_from_with_settings(src, format, ty, &self.texture.unpack)
    }

    pub fn copy_from_with_settings(
        &self,
        src: &[u8],
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelUnpackSettings,
    ) -> GlResult<()> {
        let gl = &self.texture.gl;
        let _unpack = SaveBinding::with(gl, BufferTarget::PixelUnpack, 0);
        self.upload(format, ty, settings, PixelUnpackData::Slice(src))
    }

    /// Overwrites the whole level with pixels read from the start of `buffer`.
    pub fn copy_from_buffer(
        &self,
        buffer: &Buffer,
        format: TextureFormat,
        ty: TextureType,
    ) -> GlResult<()> {
        self.copy_from_buffer_with_settings(buffer, format, ty, &self.texture.unpack)
    }

    pub fn copy_from_buffer_with_settings(
        &self,
        buffer: &Buffer,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelUnpackSettings,
    ) -> GlResult<()> {
        let gl = &self.texture.gl;
        let _unpack = SaveBinding::with(gl, BufferTarget::PixelUnpack, buffer.id());
        self.upload(format, ty, settings, PixelUnpackData::BufferOffset(0))
    }

    fn upload(
        &self,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelUnpackSettings,
        data: PixelUnpackData,
    ) -> GlResult<()> {
        let (width, height, depth) = self.size3d()?;
        let (width, height, depth) = (width as GLsizei, height as GLsizei, depth as GLsizei);
        let gl = &self.texture.gl;
        let target = self.texture.target;
        let (format, ty) = (format as GLenum, ty as GLenum);
        let _save = SaveBinding::with(gl, target, self.texture.id);
        settings.apply(gl)?;
        match target {
            TextureTarget::Texture1D => glcheck!(
                gl,
                gl.tex_sub_image_1d(target as GLenum, self.level, 0, width, format, ty, data)
            ),
            TextureTarget::Texture2D => glcheck!(
                gl,
                gl.tex_sub_image_2d(
                    target as GLenum,
                    self.level,
                    0,
                    0,
                    width,
                    height,
                    format,
                    ty,
                    data
                )
            ),
            TextureTarget::Texture3D => glcheck!(
                gl,
                gl.tex_sub_image_3d(
                    target as GLenum,
                    self.level,
                    0,
                    0,
                    0,
                    width,
                    height,
                    depth,
                    format,
                    ty,
                    data
                )
            ),
        }
        Ok(())
    }

    /// Reads the whole level into client memory, using the texture's pack settings.
    pub fn copy_to(&self, dst: &mut [u8], format: TextureFormat, ty: TextureType) -> GlResult<()> {
        self.copy_to_with_settings(dst, format, ty, &self.texture.pack)
    }

    pub fn copy_to_with_settings(
        &self,
        dst: &mut [u8],
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelPackSettings,
    ) -> GlResult<()> {
        let gl = &self.texture.gl;
        let _pack = SaveBinding::with(gl, BufferTarget::PixelPack, 0);
        self.readback(format, ty, settings, PixelPackData::Slice(dst))
    }

    /// Reads the whole level into `buffer`, starting at offset 0.
    pub fn copy_to_buffer(
        &self,
        buffer: &Buffer,
        format: TextureFormat,
        ty: TextureType,
    ) -> GlResult<()> {
        self.copy_to_buffer_with_settings(buffer, format, ty, &self.texture.pack)
    }

    pub fn copy_to_buffer_with_settings(
        &self,
        buffer: &Buffer,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelPackSettings,
    ) -> GlResult<()> {
        let gl = &self.texture.gl;
        let _pack = SaveBinding::with(gl, BufferTarget::PixelPack, buffer.id());
        self.readback(format, ty, settings, PixelPackData::BufferOffset(0))
    }

    fn readback(
        &self,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelPackSettings,
        data: PixelPackData,
    ) -> GlResult<()> {
        let gl = &self.texture.gl;
        let target = self.texture.target;
        let _save = SaveBinding::with(gl, target, self.texture.id);
        settings.apply(gl)?;
        glcheck!(
            gl,
            gl.get_tex_image(
                target as GLenum,
                self.level,
                format as GLenum,
                ty as GLenum,
                data
            )
        );
        Ok(())
    }
}

#[cfg(all(test, feature = "soft"))]
mod tests {
    use super::*;
    use crate::binding::current_binding;
    use crate::soft::SoftGl;
    use std::rc::Rc;

    fn context() -> Gl {
        Gl::new(Rc::new(SoftGl::new(16, 16)))
    }

    #[test]
    fn test_queries_restore_binding() {
        let gl = context();
        let mut other = Texture::new(&gl);
        other.create().unwrap();
        other.bind().unwrap();

        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        texture.config().size(8, 4).apply().unwrap();
        assert_eq!(texture.size().unwrap(), (8, 4));
        assert_eq!(texture.depth().unwrap(), 1);
        assert_eq!(
            current_binding(&gl, TextureTarget::Texture2D),
            other.id()
        );
    }

    #[test]
    fn test_level_view_queries_its_level() {
        let gl = context();
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        texture.config().size(8, 8).apply().unwrap();
        texture.config().size(2, 2).level(2).apply().unwrap();

        assert_eq!(texture.with_level(2).size().unwrap(), (2, 2));
        assert_eq!(texture.size().unwrap(), (8, 8));
        texture.set_level(2);
        assert_eq!(texture.width().unwrap(), 2);
    }

    #[test]
    fn test_unspecified_level_reports_defaults() {
        let gl = context();
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        assert_eq!(texture.size().unwrap(), (0, 0));
        assert_eq!(texture.internal_format().unwrap(), TextureFormat::Rgba);
        assert_eq!(texture.channel_count().unwrap(), 0);
        assert!(!texture.compressed().unwrap());
    }

    #[test]
    fn test_copy_from_then_copy_to() {
        let gl = context();
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        texture.config().size(2, 2).apply().unwrap();

        let pixels: Vec<u8> = (1..=16).collect();
        texture
            .copy_from(&pixels, TextureFormat::Rgba, TextureType::UnsignedByte)
            .unwrap();
        let mut out = vec![0u8; 16];
        texture
            .copy_to(&mut out, TextureFormat::Rgba, TextureType::UnsignedByte)
            .unwrap();
        assert_eq!(out, pixels);
    }

    #[test]
    fn test_copy_through_buffers() {
        let gl = context();
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        texture.config().size(2, 1).apply().unwrap();

        let mut upload = Buffer::with_target(&gl, BufferTarget::PixelUnpack);
        upload
            .create_with_data(8, Some(&[10, 20, 30, 40, 50, 60, 70, 80]))
            .unwrap();
        texture
            .copy_from_buffer(&upload, TextureFormat::Rgba, TextureType::UnsignedByte)
            .unwrap();

        let mut download = Buffer::with_target(&gl, BufferTarget::PixelPack);
        download.create_with_data(8, None).unwrap();
        texture
            .copy_to_buffer(&download, TextureFormat::Rgba, TextureType::UnsignedByte)
            .unwrap();

        assert_eq!(current_binding(&gl, BufferTarget::PixelPack), 0);
        assert_eq!(current_binding(&gl, BufferTarget::PixelUnpack), 0);
        let mapping = unsafe { download.map(crate::buffer::BufferAccess::Read) }.unwrap();
        assert_eq!(&mapping[..], &[10, 20, 30, 40, 50, 60, 70, 80]);
    }

    #[test]
    fn test_pack_settings_pad_rows() {
        let gl = context();
        let mut texture = Texture::new(&gl);
        texture.create().unwrap();
        texture.config().size(1, 2).format(TextureFormat::Rgb).apply().unwrap();

        let unpack = PixelUnpackSettings::default().alignment(1);
        texture
            .copy_from_with_settings(
                &[1, 2, 3, 4, 5, 6],
                TextureFormat::Rgb,
                TextureType::UnsignedByte,
                &unpack,
            )
            .unwrap();

        // rows of 3 bytes padded to 4
        let mut out = [0u8; 7];
        texture
            .copy_to(&mut out, TextureFormat::Rgb, TextureType::UnsignedByte)
            .unwrap();
        assert_eq!(&out[0..3], &[1, 2, 3]);
        assert_eq!(&out[4..7], &[4, 5, 6]);
    }
}
