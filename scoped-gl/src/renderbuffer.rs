use crate::api::Gl;
use crate::binding::{RenderbufferTarget, SaveBinding};
use crate::error::{Error, GlResult};
use crate::gl;
use crate::gl::types::*;
use crate::texture::TextureFormat;
use tracing::trace;

/// Single-image storage usable as a framebuffer attachment.
pub struct Renderbuffer {
    gl: Gl,
    id: GLuint,
}

impl_handle_type!(Renderbuffer, "renderbuffer", |gl, id| gl
    .delete_renderbuffer(id));

impl Renderbuffer {
    pub fn new(gl: &Gl) -> Renderbuffer {
        Renderbuffer {
            gl: gl.clone(),
            id: 0,
        }
    }

    pub fn create(&mut self) -> GlResult<()> {
        self.id = glcheck!(self.gl, self.gl.gen_renderbuffer());
        trace!(id = self.id, kind = "renderbuffer", "create");
        Ok(())
    }

    pub fn create_with_storage(
        &mut self,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) -> GlResult<()> {
        self.create()?;
        self.storage(format, width, height)
    }

    pub fn recreate(&mut self) -> GlResult<()> {
        self.remove();
        self.create()
    }

    pub fn recreate_with_storage(
        &mut self,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) -> GlResult<()> {
        self.remove();
        self.create_with_storage(format, width, height)
    }

    /// Binds the renderbuffer. The previous binding is not restored.
    pub fn bind(&self) -> GlResult<()> {
        glcheck!(self.gl, self.gl.bind_renderbuffer(gl::RENDERBUFFER, self.id));
        Ok(())
    }

    /// (Re)allocates the image storage.
    pub fn storage(&self, format: TextureFormat, width: u32, height: u32) -> GlResult<()> {
        let _save = SaveBinding::with(&self.gl, RenderbufferTarget, self.id);
        glcheck!(
            self.gl,
            self.gl.renderbuffer_storage(
                gl::RENDERBUFFER,
                format as GLenum,
                width as GLsizei,
                height as GLsizei
            )
        );
        Ok(())
    }

    fn parameter(&self, pname: GLenum) -> GlResult<GLint> {
        let _save = SaveBinding::with(&self.gl, RenderbufferTarget, self.id);
        let value = glcheck!(
            self.gl,
            self.gl.get_renderbuffer_parameter(gl::RENDERBUFFER, pname)
        );
        Ok(value)
    }

    pub fn width(&self) -> GlResult<u32> {
        Ok(self.parameter(gl::RENDERBUFFER_WIDTH)? as u32)
    }

    pub fn height(&self) -> GlResult<u32> {
        Ok(self.parameter(gl::RENDERBUFFER_HEIGHT)? as u32)
    }

    pub fn internal_format(&self) -> GlResult<TextureFormat> {
        let value = self.parameter(gl::RENDERBUFFER_INTERNAL_FORMAT)? as GLenum;
        TextureFormat::from_gl(value).ok_or(Error::UnknownEnum {
            what: "renderbuffer format",
            value,
        })
    }
}

#[cfg(all(test, feature = "soft"))]
mod tests {
    use super::*;
    use crate::binding::current_binding;
    use crate::soft::SoftGl;
    use std::rc::Rc;

    #[test]
    fn test_storage_is_queryable() {
        let gl = Gl::new(Rc::new(SoftGl::new(16, 16)));
        let mut rb = Renderbuffer::new(&gl);
        rb.create_with_storage(TextureFormat::Depth24Stencil8, 32, 16)
            .unwrap();
        assert_eq!(rb.width().unwrap(), 32);
        assert_eq!(rb.height().unwrap(), 16);
        assert_eq!(rb.internal_format().unwrap(), TextureFormat::Depth24Stencil8);
        assert_eq!(current_binding(&gl, RenderbufferTarget), 0);
    }

    #[test]
    fn test_recreate_with_storage() {
        let gl = Gl::new(Rc::new(SoftGl::new(16, 16)));
        let mut rb = Renderbuffer::new(&gl);
        rb.create_with_storage(TextureFormat::Rgba8, 4, 4).unwrap();
        let old = rb.id();
        rb.recreate_with_storage(TextureFormat::R32F, 2, 2).unwrap();
        assert_ne!(rb.id(), old);
        assert_eq!(rb.internal_format().unwrap(), TextureFormat::R32F);
        rb.remove();
        assert!(!rb.created());
    }
}
