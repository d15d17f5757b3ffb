use crate::api::{Gl, PixelPackData, PixelUnpackData};
use crate::binding::{current_binding, BufferTarget, FramebufferTarget, SaveBinding};
use crate::buffer::Buffer;
use crate::error::{Error, GlResult};
use crate::gl;
use crate::gl::types::*;
use crate::pixel_store::{PixelPackSettings, PixelUnpackSettings};
use crate::renderbuffer::Renderbuffer;
use crate::texture::{Filter, Texture, TextureFormat, TextureRef, TextureTarget, TextureType};
use bitflags::bitflags;
use std::fmt;
use std::ops::Deref;
use tracing::trace;

bitflags! {
    /// Buffers affected by clears and blits.
    pub struct BufferMask: GLbitfield {
        const COLOR = gl::COLOR_BUFFER_BIT;
        const DEPTH = gl::DEPTH_BUFFER_BIT;
        const STENCIL = gl::STENCIL_BUFFER_BIT;
        const COLOR_DEPTH = Self::COLOR.bits | Self::DEPTH.bits;
        const COLOR_STENCIL = Self::COLOR.bits | Self::STENCIL.bits;
        const DEPTH_STENCIL = Self::DEPTH.bits | Self::STENCIL.bits;
        const COLOR_DEPTH_STENCIL = Self::COLOR.bits | Self::DEPTH.bits | Self::STENCIL.bits;
    }
}

/// Rectangle given by two corners, as used by blits. Corners may be swapped to flip the image.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Area {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Area {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Area {
        Area { x1, y1, x2, y2 }
    }
}

/// Rectangle given by its origin and extent.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Region {
        Region {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Size {
        Size { width, height }
    }
}

/// Attachment points of a framebuffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AttachmentPoint {
    Color(u32),
    Depth,
    Stencil,
    DepthStencil,
}

impl AttachmentPoint {
    /// `count` consecutive color attachments starting at index `from`, stopping at the last
    /// representable index.
    pub fn color_range(from: u32, count: u32) -> Vec<AttachmentPoint> {
        (from..from.saturating_add(count))
            .map(AttachmentPoint::Color)
            .collect()
    }

    pub fn to_gl(self) -> GLenum {
        match self {
            // out-of-range indices map to an enum the driver rejects
            AttachmentPoint::Color(index) => gl::COLOR_ATTACHMENT0.saturating_add(index),
            AttachmentPoint::Depth => gl::DEPTH_ATTACHMENT,
            AttachmentPoint::Stencil => gl::STENCIL_ATTACHMENT,
            AttachmentPoint::DepthStencil => gl::DEPTH_STENCIL_ATTACHMENT,
        }
    }
}

/// An image that can be attached to a framebuffer.
#[derive(Copy, Clone, Debug)]
pub enum AttachmentSource<'a> {
    Texture(TextureRef<'a>),
    Renderbuffer(&'a Renderbuffer),
}

impl<'a> From<TextureRef<'a>> for AttachmentSource<'a> {
    fn from(texture: TextureRef<'a>) -> Self {
        AttachmentSource::Texture(texture)
    }
}

impl<'a> From<&'a Texture> for AttachmentSource<'a> {
    fn from(texture: &'a Texture) -> Self {
        AttachmentSource::Texture(texture.view())
    }
}

impl<'a> From<&'a Renderbuffer> for AttachmentSource<'a> {
    fn from(renderbuffer: &'a Renderbuffer) -> Self {
        AttachmentSource::Renderbuffer(renderbuffer)
    }
}

/// What is attached at an attachment point, as reported by the driver.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AttachedObject {
    None,
    Texture { id: GLuint, level: i32 },
    Renderbuffer { id: GLuint },
}

//--------------------------------------------------------------------------------------------------

/// A framebuffer that this value does not own: the default framebuffer, or whatever is currently
/// bound. Never deletes anything.
///
/// Operations bind the framebuffer at the target they act on (draw for `draw`, `clear` and
/// `copy_from`, read for `read` and `copy_to`), and restore the previous binding of that target.
#[derive(Clone)]
pub struct FramebufferRef {
    gl: Gl,
    id: GLuint,
}

impl fmt::Debug for FramebufferRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("FramebufferRef").field(&self.id).finish()
    }
}

impl FramebufferRef {
    /// The default framebuffer.
    pub fn screen(gl: &Gl) -> FramebufferRef {
        FramebufferRef {
            gl: gl.clone(),
            id: 0,
        }
    }

    /// The framebuffer bound at `FRAMEBUFFER` (same as the draw binding).
    pub fn bound(gl: &Gl) -> FramebufferRef {
        FramebufferRef::bound_at(gl, FramebufferTarget::Framebuffer)
    }

    pub fn bound_read(gl: &Gl) -> FramebufferRef {
        FramebufferRef::bound_at(gl, FramebufferTarget::Read)
    }

    pub fn bound_draw(gl: &Gl) -> FramebufferRef {
        FramebufferRef::bound_at(gl, FramebufferTarget::Draw)
    }

    fn bound_at(gl: &Gl, target: FramebufferTarget) -> FramebufferRef {
        FramebufferRef {
            gl: gl.clone(),
            id: current_binding(gl, target),
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    pub fn is_screen(&self) -> bool {
        self.id == 0
    }

    /// Binds at both the read and draw targets. The previous bindings are not restored.
    pub fn bind(&self) -> GlResult<()> {
        self.bind_as(FramebufferTarget::Framebuffer)
    }

    pub fn bind_as(&self, target: FramebufferTarget) -> GlResult<()> {
        glcheck!(self.gl, self.gl.bind_framebuffer(target as GLenum, self.id));
        Ok(())
    }

    /// Selects the single color attachment that fragment output 0 is written to.
    pub fn draw(&self, point: AttachmentPoint) -> GlResult<()> {
        self.draw_many(&[point])
    }

    /// Selects the attachments written by fragment outputs `0..points.len()`.
    pub fn draw_many(&self, points: &[AttachmentPoint]) -> GlResult<()> {
        let buffers: Vec<GLenum> = points.iter().map(|p| p.to_gl()).collect();
        let _save = SaveBinding::with(&self.gl, FramebufferTarget::Draw, self.id);
        glcheck!(self.gl, self.gl.draw_buffers(&buffers));
        Ok(())
    }

    /// Selects the attachment read by `copy_to` and used as the blit source.
    pub fn read(&self, point: AttachmentPoint) -> GlResult<()> {
        let _save = SaveBinding::with(&self.gl, FramebufferTarget::Read, self.id);
        glcheck!(self.gl, self.gl.read_buffer(point.to_gl()));
        Ok(())
    }

    /// Clears the selected buffers to the current clear values.
    pub fn clear(&self, mask: BufferMask) -> GlResult<()> {
        let _save = SaveBinding::with(&self.gl, FramebufferTarget::Draw, self.id);
        glcheck!(self.gl, self.gl.clear(mask.bits()));
        Ok(())
    }

    /// Sets the clear values, then clears the selected buffers.
    ///
    /// The clear values remain set afterwards.
    pub fn clear_with(
        &self,
        mask: BufferMask,
        color: [f32; 4],
        depth: f64,
        stencil: u8,
    ) -> GlResult<()> {
        glcheck!(
            self.gl,
            self.gl.clear_color(color[0], color[1], color[2], color[3])
        );
        glcheck!(self.gl, self.gl.clear_depth(depth));
        glcheck!(self.gl, self.gl.clear_stencil(stencil as GLint));
        self.clear(mask)
    }

    /// Copies `src_area` of this framebuffer's read buffer into `dst_area` of `dst`.
    pub fn blit(
        &self,
        dst: &FramebufferRef,
        src_area: Area,
        dst_area: Area,
        mask: BufferMask,
        filter: Filter,
    ) -> GlResult<()> {
        let _read = SaveBinding::with(&self.gl, FramebufferTarget::Read, self.id);
        let _draw = SaveBinding::with(&self.gl, FramebufferTarget::Draw, dst.id);
        glcheck!(
            self.gl,
            self.gl.blit_framebuffer(
                src_area.x1,
                src_area.y1,
                src_area.x2,
                src_area.y2,
                dst_area.x1,
                dst_area.y1,
                dst_area.x2,
                dst_area.y2,
                mask.bits(),
                filter as GLenum
            )
        );
        Ok(())
    }

    /// Writes client pixels at the origin of the draw buffers.
    pub fn copy_from(
        &self,
        pixels: &[u8],
        size: Size,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelUnpackSettings,
    ) -> GlResult<()> {
        let _unpack = SaveBinding::with(&self.gl, BufferTarget::PixelUnpack, 0);
        self.draw_pixels(size, format, ty, settings, PixelUnpackData::Slice(pixels))
    }

    /// Writes pixels read from the start of `buffer`.
    pub fn copy_from_buffer(
        &self,
        buffer: &Buffer,
        size: Size,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelUnpackSettings,
    ) -> GlResult<()> {
        let _unpack = SaveBinding::with(&self.gl, BufferTarget::PixelUnpack, buffer.id());
        self.draw_pixels(size, format, ty, settings, PixelUnpackData::BufferOffset(0))
    }

    fn draw_pixels(
        &self,
        size: Size,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelUnpackSettings,
        data: PixelUnpackData,
    ) -> GlResult<()> {
        let _save = SaveBinding::with(&self.gl, FramebufferTarget::Draw, self.id);
        settings.apply(&self.gl)?;
        glcheck!(
            self.gl,
            self.gl.draw_pixels(
                size.width as GLsizei,
                size.height as GLsizei,
                format as GLenum,
                ty as GLenum,
                data
            )
        );
        Ok(())
    }

    /// Reads `region` of the read buffer into client memory.
    pub fn copy_to(
        &self,
        pixels: &mut [u8],
        region: Region,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelPackSettings,
    ) -> GlResult<()> {
        let _pack = SaveBinding::with(&self.gl, BufferTarget::PixelPack, 0);
        self.read_pixels(region, format, ty, settings, PixelPackData::Slice(pixels))
    }

    /// Reads `region` of the read buffer into `buffer`, starting at offset 0.
    pub fn copy_to_buffer(
        &self,
        buffer: &Buffer,
        region: Region,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelPackSettings,
    ) -> GlResult<()> {
        let _pack = SaveBinding::with(&self.gl, BufferTarget::PixelPack, buffer.id());
        self.read_pixels(region, format, ty, settings, PixelPackData::BufferOffset(0))
    }

    fn read_pixels(
        &self,
        region: Region,
        format: TextureFormat,
        ty: TextureType,
        settings: &PixelPackSettings,
        data: PixelPackData,
    ) -> GlResult<()> {
        let _save = SaveBinding::with(&self.gl, FramebufferTarget::Read, self.id);
        settings.apply(&self.gl)?;
        glcheck!(
            self.gl,
            self.gl.read_pixels(
                region.x,
                region.y,
                region.width as GLsizei,
                region.height as GLsizei,
                format as GLenum,
                ty as GLenum,
                data
            )
        );
        Ok(())
    }

    /// Returns what is attached at `point`.
    pub fn attachment(&self, point: AttachmentPoint) -> GlResult<AttachedObject> {
        let _save = SaveBinding::with(&self.gl, FramebufferTarget::Draw, self.id);
        let param = |pname: GLenum| -> GlResult<GLint> {
            let value = glcheck!(
                self.gl,
                self.gl.get_framebuffer_attachment_parameter(
                    gl::DRAW_FRAMEBUFFER,
                    point.to_gl(),
                    pname
                )
            );
            Ok(value)
        };
        let ty = param(gl::FRAMEBUFFER_ATTACHMENT_OBJECT_TYPE)? as GLenum;
        match ty {
            gl::NONE => Ok(AttachedObject::None),
            gl::TEXTURE => Ok(AttachedObject::Texture {
                id: param(gl::FRAMEBUFFER_ATTACHMENT_OBJECT_NAME)? as GLuint,
                level: param(gl::FRAMEBUFFER_ATTACHMENT_TEXTURE_LEVEL)?,
            }),
            gl::RENDERBUFFER => Ok(AttachedObject::Renderbuffer {
                id: param(gl::FRAMEBUFFER_ATTACHMENT_OBJECT_NAME)? as GLuint,
            }),
            value => Err(Error::UnknownEnum {
                what: "attachment object type",
                value,
            }),
        }
    }

    /// Checks framebuffer completeness.
    pub fn check(&self) -> GlResult<()> {
        let _save = SaveBinding::with(&self.gl, FramebufferTarget::Draw, self.id);
        let status = glcheck!(
            self.gl,
            self.gl.check_framebuffer_status(gl::DRAW_FRAMEBUFFER)
        );
        if status == gl::FRAMEBUFFER_COMPLETE {
            Ok(())
        } else {
            Err(Error::FramebufferIncomplete(status))
        }
    }
}

//--------------------------------------------------------------------------------------------------

/// An owned framebuffer object.
///
/// Derefs to [`FramebufferRef`] for every operation that does not change the attachments.
pub struct Framebuffer {
    inner: FramebufferRef,
}

impl Framebuffer {
    pub fn new(gl: &Gl) -> Framebuffer {
        Framebuffer {
            inner: FramebufferRef {
                gl: gl.clone(),
                id: 0,
            },
        }
    }

    pub fn created(&self) -> bool {
        self.inner.id != 0
    }

    pub fn create(&mut self) -> GlResult<()> {
        self.inner.id = glcheck!(self.inner.gl, self.inner.gl.gen_framebuffer());
        trace!(id = self.inner.id, kind = "framebuffer", "create");
        Ok(())
    }

    pub fn recreate(&mut self) -> GlResult<()> {
        self.remove();
        self.create()
    }

    pub fn remove(&mut self) {
        if self.inner.id != 0 {
            trace!(id = self.inner.id, kind = "framebuffer", "delete");
            self.inner.gl.delete_framebuffer(self.inner.id);
            self.inner.id = 0;
        }
    }

    /// Attaches an image at `point`.
    ///
    /// The framebuffer is left bound at `FRAMEBUFFER`. Textures attach at their view's level;
    /// 3D textures attach layer 0.
    pub fn attach<'a, S: Into<AttachmentSource<'a>>>(
        &self,
        point: AttachmentPoint,
        source: S,
    ) -> GlResult<()> {
        let gl = &self.inner.gl;
        self.bind()?;
        let attachment = point.to_gl();
        match source.into() {
            AttachmentSource::Renderbuffer(rb) => glcheck!(
                gl,
                gl.framebuffer_renderbuffer(
                    gl::FRAMEBUFFER,
                    attachment,
                    gl::RENDERBUFFER,
                    rb.id()
                )
            ),
            AttachmentSource::Texture(tex) => {
                let (target, id, level) = (tex.target(), tex.id(), tex.level());
                match target {
                    TextureTarget::Texture1D => glcheck!(
                        gl,
                        gl.framebuffer_texture_1d(
                            gl::FRAMEBUFFER,
                            attachment,
                            target as GLenum,
                            id,
                            level
                        )
                    ),
                    TextureTarget::Texture2D => glcheck!(
                        gl,
                        gl.framebuffer_texture_2d(
                            gl::FRAMEBUFFER,
                            attachment,
                            target as GLenum,
                            id,
                            level
                        )
                    ),
                    TextureTarget::Texture3D => glcheck!(
                        gl,
                        gl.framebuffer_texture_3d(
                            gl::FRAMEBUFFER,
                            attachment,
                            target as GLenum,
                            id,
                            level,
                            0
                        )
                    ),
                }
            }
        }
        Ok(())
    }

    /// Removes whatever is attached at `point`. The framebuffer is left bound.
    pub fn detach(&self, point: AttachmentPoint) -> GlResult<()> {
        let gl = &self.inner.gl;
        self.bind()?;
        glcheck!(
            gl,
            gl.framebuffer_renderbuffer(gl::FRAMEBUFFER, point.to_gl(), gl::RENDERBUFFER, 0)
        );
        Ok(())
    }
}

impl Deref for Framebuffer {
    type Target = FramebufferRef;

    fn deref(&self) -> &FramebufferRef {
        &self.inner
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        self.remove()
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Framebuffer").field(&self.inner.id).finish()
    }
}

#[cfg(all(test, feature = "soft"))]
mod tests {
    use super::*;
    use crate::soft::SoftGl;
    use std::rc::Rc;

    fn context() -> Gl {
        Gl::new(Rc::new(SoftGl::new(8, 8)))
    }

    fn color_texture(gl: &Gl, width: u32, height: u32) -> Texture {
        let mut texture = Texture::new(gl);
        texture.create().unwrap();
        texture.config().size(width, height).apply().unwrap();
        texture
    }

    #[test]
    fn test_color_range() {
        assert_eq!(
            AttachmentPoint::color_range(1, 3),
            vec![
                AttachmentPoint::Color(1),
                AttachmentPoint::Color(2),
                AttachmentPoint::Color(3)
            ]
        );
        assert_eq!(AttachmentPoint::Color(2).to_gl(), gl::COLOR_ATTACHMENT0 + 2);
    }

    #[test]
    fn test_color_index_overflow() {
        assert_eq!(
            AttachmentPoint::color_range(u32::MAX - 1, 4),
            vec![AttachmentPoint::Color(u32::MAX - 1)]
        );
        assert_eq!(AttachmentPoint::Color(u32::MAX).to_gl(), u32::MAX);

        let gl = context();
        let texture = color_texture(&gl, 2, 2);
        let mut fbo = Framebuffer::new(&gl);
        fbo.create().unwrap();
        let result = fbo.attach(AttachmentPoint::Color(u32::MAX), &texture);
        if cfg!(debug_assertions) {
            assert!(result.unwrap_err().driver_error().is_some());
        }
        assert_eq!(
            fbo.attachment(AttachmentPoint::Color(0)).unwrap(),
            AttachedObject::None
        );
    }

    #[test]
    fn test_attachment_query() {
        let gl = context();
        let texture = color_texture(&gl, 4, 4);
        let mut rb = Renderbuffer::new(&gl);
        rb.create_with_storage(TextureFormat::Depth24, 4, 4).unwrap();

        let mut fbo = Framebuffer::new(&gl);
        fbo.create().unwrap();
        fbo.attach(AttachmentPoint::Color(0), &texture).unwrap();
        fbo.attach(AttachmentPoint::Depth, &rb).unwrap();

        assert_eq!(
            fbo.attachment(AttachmentPoint::Color(0)).unwrap(),
            AttachedObject::Texture {
                id: texture.id(),
                level: 0
            }
        );
        assert_eq!(
            fbo.attachment(AttachmentPoint::Depth).unwrap(),
            AttachedObject::Renderbuffer { id: rb.id() }
        );
        assert_eq!(
            fbo.attachment(AttachmentPoint::Color(3)).unwrap(),
            AttachedObject::None
        );
        fbo.check().unwrap();

        fbo.detach(AttachmentPoint::Depth).unwrap();
        assert_eq!(
            fbo.attachment(AttachmentPoint::Depth).unwrap(),
            AttachedObject::None
        );
    }

    #[test]
    fn test_empty_framebuffer_is_incomplete() {
        let gl = context();
        let mut fbo = Framebuffer::new(&gl);
        fbo.create().unwrap();
        match fbo.check() {
            Err(Error::FramebufferIncomplete(status)) => {
                assert_eq!(status, gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_clear_and_read_back() {
        let gl = context();
        let texture = color_texture(&gl, 2, 2);
        let mut fbo = Framebuffer::new(&gl);
        fbo.create().unwrap();
        fbo.attach(AttachmentPoint::Color(0), &texture).unwrap();
        FramebufferRef::screen(&gl).bind().unwrap();

        fbo.clear_with(BufferMask::COLOR, [1.0, 0.0, 0.0, 1.0], 1.0, 0)
            .unwrap();
        let mut pixels = [0u8; 16];
        fbo.copy_to(
            &mut pixels,
            Region::new(0, 0, 2, 2),
            TextureFormat::Rgba,
            TextureType::UnsignedByte,
            &PixelPackSettings::default(),
        )
        .unwrap();
        assert_eq!(&pixels[..], &[255u8, 0, 0, 255].repeat(4)[..]);
        assert_eq!(FramebufferRef::bound(&gl).id(), 0);
        assert_eq!(FramebufferRef::bound_read(&gl).id(), 0);
    }

    #[test]
    fn test_draw_buffers_selection() {
        let gl = context();
        let a = color_texture(&gl, 2, 2);
        let b = color_texture(&gl, 2, 2);
        let mut fbo = Framebuffer::new(&gl);
        fbo.create().unwrap();
        fbo.attach(AttachmentPoint::Color(0), &a).unwrap();
        fbo.attach(AttachmentPoint::Color(1), &b).unwrap();
        fbo.draw_many(&AttachmentPoint::color_range(0, 2)).unwrap();

        // only b is cleared when it is the sole draw buffer
        fbo.draw(AttachmentPoint::Color(1)).unwrap();
        fbo.clear_with(BufferMask::COLOR, [0.0, 1.0, 0.0, 1.0], 1.0, 0)
            .unwrap();

        let mut out = [0u8; 16];
        a.copy_to(&mut out, TextureFormat::Rgba, TextureType::UnsignedByte)
            .unwrap();
        assert_eq!(&out[..4], &[0, 0, 0, 0]);
        b.copy_to(&mut out, TextureFormat::Rgba, TextureType::UnsignedByte)
            .unwrap();
        assert_eq!(&out[..4], &[0, 255, 0, 255]);
    }

    #[test]
    fn test_blit_scales_with_nearest_filter() {
        let gl = context();
        let small = color_texture(&gl, 1, 1);
        small
            .copy_from(&[9, 8, 7, 6], TextureFormat::Rgba, TextureType::UnsignedByte)
            .unwrap();
        let large = color_texture(&gl, 4, 4);

        let mut src = Framebuffer::new(&gl);
        let mut dst = Framebuffer::new(&gl);
        src.create().unwrap();
        dst.create().unwrap();
        src.attach(AttachmentPoint::Color(0), &small).unwrap();
        dst.attach(AttachmentPoint::Color(0), &large).unwrap();

        src.blit(
            &dst,
            Area::new(0, 0, 1, 1),
            Area::new(0, 0, 4, 4),
            BufferMask::COLOR,
            Filter::Nearest,
        )
        .unwrap();

        let mut out = [0u8; 64];
        large
            .copy_to(&mut out, TextureFormat::Rgba, TextureType::UnsignedByte)
            .unwrap();
        assert_eq!(&out[..], &[9u8, 8, 7, 6].repeat(16)[..]);
    }

    #[test]
    fn test_read_region_past_coordinate_range() {
        let gl = context();
        let mut out = [0u8; 8];
        let result = FramebufferRef::screen(&gl).copy_to(
            &mut out,
            Region::new(i32::MAX, 0, 2, 1),
            TextureFormat::Rgba,
            TextureType::UnsignedByte,
            &PixelPackSettings::default(),
        );
        if cfg!(debug_assertions) {
            assert_eq!(
                result.unwrap_err().driver_error(),
                Some(crate::DriverError::InvalidValue)
            );
        }
        assert_eq!(out, [0u8; 8]);
    }

    #[test]
    fn test_blit_with_extreme_corners() {
        let gl = context();
        let screen = FramebufferRef::screen(&gl);
        screen
            .blit(
                &screen,
                Area::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX),
                Area::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN),
                BufferMask::COLOR,
                Filter::Nearest,
            )
            .unwrap();
    }

    #[test]
    fn test_copy_from_writes_draw_buffer() {
        let gl = context();
        let screen = FramebufferRef::screen(&gl);
        screen
            .copy_from(
                &[1, 2, 3, 4, 5, 6, 7, 8],
                Size::new(2, 1),
                TextureFormat::Rgba,
                TextureType::UnsignedByte,
                &PixelUnpackSettings::default(),
            )
            .unwrap();

        let mut out = [0u8; 8];
        screen
            .copy_to(
                &mut out,
                Region::new(0, 0, 2, 1),
                TextureFormat::Rgba,
                TextureType::UnsignedByte,
                &PixelPackSettings::default(),
            )
            .unwrap();
        assert_eq!(out, [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_drop_deletes_only_owned() {
        let gl = context();
        let id = {
            let mut fbo = Framebuffer::new(&gl);
            fbo.create().unwrap();
            fbo.bind().unwrap();
            let view = FramebufferRef::bound(&gl);
            assert_eq!(view.id(), fbo.id());
            drop(view);
            fbo.id()
        };
        // deleting a bound framebuffer reverts the binding to the default framebuffer
        assert_eq!(FramebufferRef::bound(&gl).id(), 0);
        assert_ne!(id, 0);
    }
}
