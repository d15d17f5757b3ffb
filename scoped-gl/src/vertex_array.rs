use crate::api::Gl;
use crate::buffer::Buffer;
use crate::error::GlResult;
use crate::gl;
use crate::gl::types::*;
use tracing::trace;

// vertex array: records which attribute arrays are enabled, and which buffer is the
// element array source

/// Buffer slots that can be assigned while a vertex array is bound.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum VertexArraySlot {
    PixelPack = gl::PIXEL_PACK_BUFFER,
    PixelUnpack = gl::PIXEL_UNPACK_BUFFER,
    Array = gl::ARRAY_BUFFER,
    ElementArray = gl::ELEMENT_ARRAY_BUFFER,
}

pub struct VertexArray {
    gl: Gl,
    id: GLuint,
}

impl_handle_type!(VertexArray, "vertex array", |gl, id| gl
    .delete_vertex_array(id));

impl VertexArray {
    pub fn new(gl: &Gl) -> VertexArray {
        VertexArray {
            gl: gl.clone(),
            id: 0,
        }
    }

    pub fn create(&mut self) -> GlResult<()> {
        self.id = glcheck!(self.gl, self.gl.gen_vertex_array());
        trace!(id = self.id, kind = "vertex array", "create");
        Ok(())
    }

    pub fn recreate(&mut self) -> GlResult<()> {
        self.remove();
        self.create()
    }

    /// Binds the vertex array. The previous binding is not restored.
    pub fn bind(&self) -> GlResult<()> {
        glcheck!(self.gl, self.gl.bind_vertex_array(self.id));
        Ok(())
    }

    pub fn enable_for_attribute(&self, index: u32) -> GlResult<()> {
        self.bind()?;
        glcheck!(self.gl, self.gl.enable_vertex_attrib_array(index));
        Ok(())
    }

    pub fn disable_for_attribute(&self, index: u32) -> GlResult<()> {
        self.bind()?;
        glcheck!(self.gl, self.gl.disable_vertex_attrib_array(index));
        Ok(())
    }

    pub fn enable_for_attributes(&self, indices: &[u32]) -> GlResult<()> {
        self.bind()?;
        for &index in indices {
            glcheck!(self.gl, self.gl.enable_vertex_attrib_array(index));
        }
        Ok(())
    }

    pub fn disable_for_attributes(&self, indices: &[u32]) -> GlResult<()> {
        self.bind()?;
        for &index in indices {
            glcheck!(self.gl, self.gl.disable_vertex_attrib_array(index));
        }
        Ok(())
    }

    /// Returns whether the attribute array `index` is enabled.
    pub fn attribute_enabled(&self, index: u32) -> GlResult<bool> {
        self.bind()?;
        let enabled = glcheck!(
            self.gl,
            self.gl
                .get_vertex_attrib(index, gl::VERTEX_ATTRIB_ARRAY_ENABLED)
        );
        Ok(enabled != 0)
    }

    /// Binds the vertex array, then binds `buffer` at `slot`.
    ///
    /// Both bindings are left in place. Only the element array slot is recorded in the vertex
    /// array itself.
    pub fn attach(&self, slot: VertexArraySlot, buffer: &Buffer) -> GlResult<()> {
        self.bind()?;
        glcheck!(self.gl, self.gl.bind_buffer(slot as GLenum, buffer.id()));
        Ok(())
    }
}

#[cfg(all(test, feature = "soft"))]
mod tests {
    use super::*;
    use crate::binding::{current_binding, BufferTarget, VertexArrayBinding};
    use crate::soft::SoftGl;
    use std::rc::Rc;

    fn context() -> Gl {
        Gl::new(Rc::new(SoftGl::new(16, 16)))
    }

    #[test]
    fn test_attribute_enable_state() {
        let gl = context();
        let mut vao = VertexArray::new(&gl);
        vao.create().unwrap();
        vao.enable_for_attributes(&[0, 2, 3]).unwrap();
        vao.disable_for_attribute(2).unwrap();

        assert!(vao.attribute_enabled(0).unwrap());
        assert!(!vao.attribute_enabled(1).unwrap());
        assert!(!vao.attribute_enabled(2).unwrap());
        assert!(vao.attribute_enabled(3).unwrap());
        assert_eq!(current_binding(&gl, VertexArrayBinding), vao.id());
    }

    #[test]
    fn test_element_array_slot_belongs_to_vertex_array() {
        let gl = context();
        let mut indices = Buffer::with_target(&gl, BufferTarget::ElementArray);
        indices.create_with_data(12, None).unwrap();

        let mut a = VertexArray::new(&gl);
        let mut b = VertexArray::new(&gl);
        a.create().unwrap();
        b.create().unwrap();
        a.attach(VertexArraySlot::ElementArray, &indices).unwrap();
        assert_eq!(current_binding(&gl, BufferTarget::ElementArray), indices.id());

        b.bind().unwrap();
        assert_eq!(current_binding(&gl, BufferTarget::ElementArray), 0);
        a.bind().unwrap();
        assert_eq!(current_binding(&gl, BufferTarget::ElementArray), indices.id());
    }

    #[test]
    fn test_attribute_index_out_of_range() {
        let gl = context();
        let mut vao = VertexArray::new(&gl);
        vao.create().unwrap();
        let result = vao.enable_for_attribute(64);
        if cfg!(debug_assertions) {
            assert_eq!(
                result.unwrap_err().driver_error(),
                Some(crate::DriverError::InvalidValue)
            );
        }
    }
}
