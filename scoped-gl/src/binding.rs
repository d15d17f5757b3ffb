//! Save/restore of "currently bound" state.
//!
//! The driver holds a single current object per binding point, and every operation implicitly
//! targets it. [`SaveBinding`] captures the current binding on construction and restores it when
//! dropped, so a wrapper can bind its own object without disturbing the caller's state.
use crate::api::Gl;
use crate::gl;
use crate::gl::types::*;

/// A slot in the context state that holds one bound object.
pub trait BindingPoint: Copy {
    /// The `get_integer` query returning the object currently bound here.
    fn binding_query(&self) -> GLenum;
    /// Binds `name` (0 for none) at this point.
    fn bind(&self, gl: &Gl, name: GLuint);
}

/// Buffer binding targets.
///
/// The target classifies how a buffer is used; it is not a property of the storage.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum BufferTarget {
    PixelPack = gl::PIXEL_PACK_BUFFER,
    PixelUnpack = gl::PIXEL_UNPACK_BUFFER,
    Array = gl::ARRAY_BUFFER,
    ElementArray = gl::ELEMENT_ARRAY_BUFFER,
}

impl BindingPoint for BufferTarget {
    fn binding_query(&self) -> GLenum {
        match *self {
            BufferTarget::PixelPack => gl::PIXEL_PACK_BUFFER_BINDING,
            BufferTarget::PixelUnpack => gl::PIXEL_UNPACK_BUFFER_BINDING,
            BufferTarget::Array => gl::ARRAY_BUFFER_BINDING,
            BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER_BINDING,
        }
    }

    fn bind(&self, gl: &Gl, name: GLuint) {
        gl.bind_buffer(*self as GLenum, name)
    }
}

/// Texture dimensionality, fixed when the texture is created.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum TextureTarget {
    Texture1D = gl::TEXTURE_1D,
    Texture2D = gl::TEXTURE_2D,
    Texture3D = gl::TEXTURE_3D,
}

impl BindingPoint for TextureTarget {
    fn binding_query(&self) -> GLenum {
        match *self {
            TextureTarget::Texture1D => gl::TEXTURE_BINDING_1D,
            TextureTarget::Texture2D => gl::TEXTURE_BINDING_2D,
            TextureTarget::Texture3D => gl::TEXTURE_BINDING_3D,
        }
    }

    fn bind(&self, gl: &Gl, name: GLuint) {
        gl.bind_texture(*self as GLenum, name)
    }
}

/// Framebuffer binding targets.
///
/// `Framebuffer` binds both the read and draw targets; saving it records the draw binding.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum FramebufferTarget {
    Framebuffer = gl::FRAMEBUFFER,
    Read = gl::READ_FRAMEBUFFER,
    Draw = gl::DRAW_FRAMEBUFFER,
}

impl BindingPoint for FramebufferTarget {
    fn binding_query(&self) -> GLenum {
        match *self {
            FramebufferTarget::Framebuffer => gl::FRAMEBUFFER_BINDING,
            FramebufferTarget::Read => gl::READ_FRAMEBUFFER_BINDING,
            FramebufferTarget::Draw => gl::DRAW_FRAMEBUFFER_BINDING,
        }
    }

    fn bind(&self, gl: &Gl, name: GLuint) {
        gl.bind_framebuffer(*self as GLenum, name)
    }
}

/// The renderbuffer binding point.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RenderbufferTarget;

impl BindingPoint for RenderbufferTarget {
    fn binding_query(&self) -> GLenum {
        gl::RENDERBUFFER_BINDING
    }

    fn bind(&self, gl: &Gl, name: GLuint) {
        gl.bind_renderbuffer(gl::RENDERBUFFER, name)
    }
}

/// The vertex array binding point.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct VertexArrayBinding;

impl BindingPoint for VertexArrayBinding {
    fn binding_query(&self) -> GLenum {
        gl::VERTEX_ARRAY_BINDING
    }

    fn bind(&self, gl: &Gl, name: GLuint) {
        gl.bind_vertex_array(name)
    }
}

/// The current program.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ProgramBinding;

impl BindingPoint for ProgramBinding {
    fn binding_query(&self) -> GLenum {
        gl::CURRENT_PROGRAM
    }

    fn bind(&self, gl: &Gl, name: GLuint) {
        gl.use_program(name)
    }
}

/// The active texture unit. The "name" is the `TEXTURE0 + n` enum, not an object.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ActiveTextureUnit;

impl BindingPoint for ActiveTextureUnit {
    fn binding_query(&self) -> GLenum {
        gl::ACTIVE_TEXTURE
    }

    fn bind(&self, gl: &Gl, name: GLuint) {
        gl.active_texture(name)
    }
}

/// Reads the object currently bound at `point`.
pub fn current_binding<P: BindingPoint>(gl: &Gl, point: P) -> GLuint {
    gl.get_integer(point.binding_query()) as GLuint
}

/// Restores the binding of a binding point when dropped.
///
/// The guard never fails: its driver calls are not error-checked, and the restore runs on every
/// exit path, including unwinding.
#[must_use = "the previous binding is restored when the guard is dropped"]
pub struct SaveBinding<'a, P: BindingPoint> {
    gl: &'a Gl,
    point: P,
    previous: GLuint,
}

impl<'a, P: BindingPoint> SaveBinding<'a, P> {
    /// Records the object currently bound at `point`.
    pub fn new(gl: &'a Gl, point: P) -> SaveBinding<'a, P> {
        let previous = current_binding(gl, point);
        SaveBinding {
            gl,
            point,
            previous,
        }
    }

    /// Records the object currently bound at `point`, then binds `name` there.
    pub fn with(gl: &'a Gl, point: P, name: GLuint) -> SaveBinding<'a, P> {
        let guard = SaveBinding::new(gl, point);
        point.bind(gl, name);
        guard
    }

    /// The object that will be rebound on drop.
    pub fn previous(&self) -> GLuint {
        self.previous
    }
}

impl<'a, P: BindingPoint> Drop for SaveBinding<'a, P> {
    fn drop(&mut self) {
        self.point.bind(self.gl, self.previous);
    }
}

#[cfg(all(test, feature = "soft"))]
mod tests {
    use super::*;
    use crate::soft::SoftGl;
    use std::panic::{self, AssertUnwindSafe};
    use std::rc::Rc;

    fn context() -> Gl {
        Gl::new(Rc::new(SoftGl::new(16, 16)))
    }

    #[test]
    fn test_restores_after_nested_rebinds() {
        let gl = context();
        let a = gl.gen_buffer();
        let b = gl.gen_buffer();
        let c = gl.gen_buffer();
        gl.bind_buffer(gl::ARRAY_BUFFER, a);
        {
            let _outer = SaveBinding::with(&gl, BufferTarget::Array, b);
            assert_eq!(current_binding(&gl, BufferTarget::Array), b);
            {
                let _inner = SaveBinding::with(&gl, BufferTarget::Array, c);
                gl.bind_buffer(gl::ARRAY_BUFFER, b);
                gl.bind_buffer(gl::ARRAY_BUFFER, 0);
            }
            assert_eq!(current_binding(&gl, BufferTarget::Array), b);
        }
        assert_eq!(current_binding(&gl, BufferTarget::Array), a);
    }

    #[test]
    fn test_restores_on_unwind() {
        let gl = context();
        let a = gl.gen_texture();
        let b = gl.gen_texture();
        gl.bind_texture(gl::TEXTURE_2D, a);

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _guard = SaveBinding::with(&gl, TextureTarget::Texture2D, b);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(current_binding(&gl, TextureTarget::Texture2D), a);
    }

    #[test]
    fn test_targets_are_independent() {
        let gl = context();
        let fb = gl.gen_framebuffer();
        {
            let _guard = SaveBinding::with(&gl, FramebufferTarget::Read, fb);
            assert_eq!(current_binding(&gl, FramebufferTarget::Read), fb);
            assert_eq!(current_binding(&gl, FramebufferTarget::Draw), 0);
        }
        assert_eq!(current_binding(&gl, FramebufferTarget::Read), 0);
    }
}
