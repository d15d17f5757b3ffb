use crate::api::Gl;
use crate::binding::{BufferTarget, SaveBinding};
use crate::error::GlResult;
use crate::gl;
use crate::gl::types::*;
use std::ops::{Deref, DerefMut};
use std::slice;
use tracing::trace;

/// Access mode of a buffer mapping.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum BufferAccess {
    Read = gl::READ_ONLY,
    Write = gl::WRITE_ONLY,
    ReadWrite = gl::READ_WRITE,
}

/// Linear GPU memory (vertex, index and pixel transfer data).
pub struct Buffer {
    gl: Gl,
    id: GLuint,
    target: BufferTarget,
}

impl_handle_type!(Buffer, "buffer", |gl, id| gl.delete_buffer(id));

impl Buffer {
    /// Creates an empty wrapper. No object is allocated until `create`.
    pub fn new(gl: &Gl) -> Buffer {
        Buffer::with_target(gl, BufferTarget::Array)
    }

    /// Creates an empty wrapper that will bind at `target`.
    pub fn with_target(gl: &Gl, target: BufferTarget) -> Buffer {
        Buffer {
            gl: gl.clone(),
            id: 0,
            target,
        }
    }

    /// Allocates a buffer name.
    pub fn create(&mut self) -> GlResult<()> {
        self.id = glcheck!(self.gl, self.gl.gen_buffer());
        trace!(id = self.id, kind = "buffer", "create");
        Ok(())
    }

    /// Allocates a buffer name and `size` bytes of storage, optionally initialized from `data`.
    pub fn create_with_data(&mut self, size: usize, data: Option<&[u8]>) -> GlResult<()> {
        self.create()?;
        self.data(size, data)
    }

    /// Deletes the current object (if any) and allocates a new one.
    pub fn recreate(&mut self) -> GlResult<()> {
        self.remove();
        self.create()
    }

    pub fn recreate_with_data(&mut self, size: usize, data: Option<&[u8]>) -> GlResult<()> {
        self.remove();
        self.create_with_data(size, data)
    }

    /// The target used by `data`, `sub_data` and `map`.
    pub fn target(&self) -> BufferTarget {
        self.target
    }

    pub fn set_target(&mut self, target: BufferTarget) {
        self.target = target;
    }

    /// Binds the buffer at `target`.
    pub fn bind(&self, target: BufferTarget) -> GlResult<()> {
        glcheck!(self.gl, self.gl.bind_buffer(target as GLenum, self.id));
        Ok(())
    }

    /// Reallocates the storage to `size` bytes and uploads `data` if provided.
    ///
    /// `data`, when given, must hold at least `size` bytes.
    pub fn data(&mut self, size: usize, data: Option<&[u8]>) -> GlResult<()> {
        let target = self.target;
        let _save = SaveBinding::with(&self.gl, target, self.id);
        glcheck!(
            self.gl,
            self.gl
                .buffer_data(target as GLenum, size, data, gl::STREAM_COPY)
        );
        Ok(())
    }

    /// Overwrites `data.len()` bytes starting at `offset`, without reallocating.
    ///
    /// The range must lie within the allocated storage, otherwise the driver reports an error.
    pub fn sub_data(&mut self, offset: usize, data: &[u8]) -> GlResult<()> {
        let target = self.target;
        let _save = SaveBinding::with(&self.gl, target, self.id);
        glcheck!(
            self.gl,
            self.gl.buffer_sub_data(target as GLenum, offset, data)
        );
        Ok(())
    }

    /// Size of the allocated storage in bytes.
    pub fn size(&self) -> GlResult<usize> {
        let target = self.target;
        let _save = SaveBinding::with(&self.gl, target, self.id);
        let size = glcheck!(
            self.gl,
            self.gl.get_buffer_parameter(target as GLenum, gl::BUFFER_SIZE)
        );
        Ok(size as usize)
    }

    /// Maps the buffer storage into client memory.
    ///
    /// The buffer stays bound at its target for the lifetime of the mapping, and is unmapped when
    /// the returned guard is dropped. The previous binding is not restored.
    ///
    /// # Safety
    ///
    /// The returned guard reads and writes driver memory directly. While it is alive, the buffer
    /// must not be unmapped, reallocated or deleted through any other handle to the context
    /// (for example a clone of the `Gl` used to create the buffer).
    pub unsafe fn map(&mut self, access: BufferAccess) -> GlResult<BufferMapping> {
        let target = self.target;
        self.bind(target)?;
        let len = glcheck!(
            self.gl,
            self.gl.get_buffer_parameter(target as GLenum, gl::BUFFER_SIZE)
        ) as usize;
        let ptr = glcheck!(self.gl, self.gl.map_buffer(target as GLenum, access as GLenum));
        Ok(BufferMapping {
            buffer: self,
            ptr,
            len,
            access,
        })
    }

    /// Unmaps the buffer.
    ///
    /// Unmapping a buffer that is not mapped is reported by the driver.
    pub fn unmap(&mut self) -> GlResult<()> {
        let target = self.target;
        let _save = SaveBinding::with(&self.gl, target, self.id);
        glcheck!(self.gl, self.gl.unmap_buffer(target as GLenum));
        Ok(())
    }
}

/// Client view of a mapped buffer. Unmaps on drop.
pub struct BufferMapping<'a> {
    buffer: &'a mut Buffer,
    ptr: *mut u8,
    len: usize,
    access: BufferAccess,
}

impl<'a> BufferMapping<'a> {
    pub fn access(&self) -> BufferAccess {
        self.access
    }

    /// Unmaps the buffer, reporting driver errors.
    pub fn unmap(self) -> GlResult<()> {
        let mut this = std::mem::ManuallyDrop::new(self);
        this.buffer.unmap()
    }
}

impl<'a> Deref for BufferMapping<'a> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        if self.ptr.is_null() {
            return &[];
        }
        // Safety: the driver keeps `ptr` valid for `BUFFER_SIZE` bytes until the buffer is
        // unmapped, and the caller of `map` guarantees nothing else unmaps it meanwhile.
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl<'a> DerefMut for BufferMapping<'a> {
    fn deref_mut(&mut self) -> &mut [u8] {
        if self.ptr.is_null() {
            return &mut [];
        }
        // Safety: see `deref`
        unsafe { slice::from_raw_parts_mut(self.ptr, self.len) }
    }
}

impl<'a> Drop for BufferMapping<'a> {
    fn drop(&mut self) {
        // the target may have been rebound since `map`
        let buffer = &*self.buffer;
        let _save = SaveBinding::with(&buffer.gl, buffer.target, buffer.id);
        buffer.gl.unmap_buffer(buffer.target as GLenum);
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
    fn test_data_then_map_reads_back() {
        let gl = context();
        let mut buffer = Buffer::new(&gl);
        let bytes: Vec<u8> = (0..64).collect();
        buffer.create_with_data(bytes.len(), Some(&bytes)).unwrap();
        assert_eq!(buffer.size().unwrap(), 64);

        let mapping = unsafe { buffer.map(BufferAccess::Read) }.unwrap();
        assert_eq!(&mapping[..], &bytes[..]);
        mapping.unmap().unwrap();
    }

    #[test]
    fn test_sub_data_only_touches_range() {
        let gl = context();
        let mut buffer = Buffer::new(&gl);
        buffer.create_with_data(16, Some(&[7u8; 16])).unwrap();
        buffer.sub_data(4, &[1, 2, 3]).unwrap();

        let mapping = unsafe { buffer.map(BufferAccess::Read) }.unwrap();
        let mut expected = [7u8; 16];
        expected[4..7].copy_from_slice(&[1, 2, 3]);
        assert_eq!(&mapping[..], &expected[..]);
    }

    #[test]
    fn test_write_through_mapping() {
        let gl = context();
        let mut buffer = Buffer::with_target(&gl, BufferTarget::PixelUnpack);
        buffer.create_with_data(4, None).unwrap();
        {
            let mut mapping = unsafe { buffer.map(BufferAccess::Write) }.unwrap();
            mapping.copy_from_slice(&[9, 8, 7, 6]);
        }
        let mapping = unsafe { buffer.map(BufferAccess::Read) }.unwrap();
        assert_eq!(&mapping[..], &[9, 8, 7, 6]);
    }

    #[test]
    fn test_data_restores_previous_binding() {
        let gl = context();
        let mut other = Buffer::new(&gl);
        other.create().unwrap();
        other.bind(BufferTarget::Array).unwrap();

        let mut buffer = Buffer::new(&gl);
        buffer.create_with_data(8, None).unwrap();
        buffer.sub_data(0, &[1; 8]).unwrap();
        assert_eq!(current_binding(&gl, BufferTarget::Array), other.id());
    }

    #[test]
    fn test_out_of_range_sub_data_is_reported() {
        let gl = context();
        let mut buffer = Buffer::new(&gl);
        buffer.create_with_data(4, None).unwrap();
        let result = buffer.sub_data(2, &[0; 4]);
        if cfg!(debug_assertions) {
            assert_eq!(
                result.unwrap_err().driver_error(),
                Some(crate::DriverError::InvalidValue)
            );
        }
    }

    #[test]
    fn test_double_unmap_is_reported() {
        let gl = context();
        let mut buffer = Buffer::new(&gl);
        buffer.create_with_data(4, None).unwrap();
        let mapping = unsafe { buffer.map(BufferAccess::ReadWrite) }.unwrap();
        mapping.unmap().unwrap();
        let result = buffer.unmap();
        if cfg!(debug_assertions) {
            assert_eq!(
                result.unwrap_err().driver_error(),
                Some(crate::DriverError::InvalidOperation)
            );
        }
    }

    #[test]
    fn test_mapping_unmaps_its_own_buffer() {
        let gl = context();
        let mut buffer = Buffer::new(&gl);
        buffer.create_with_data(4, Some(&[1, 2, 3, 4])).unwrap();
        let mut other = Buffer::new(&gl);
        other.create_with_data(4, None).unwrap();
        {
            let mapping = unsafe { buffer.map(BufferAccess::Read) }.unwrap();
            assert_eq!(&mapping[..], &[1, 2, 3, 4]);
            other.bind(BufferTarget::Array).unwrap();
        }
        assert_eq!(current_binding(&gl, BufferTarget::Array), other.id());
        assert_eq!(gl.get_error(), gl::NO_ERROR);

        let mapped = {
            let _save = SaveBinding::with(&gl, BufferTarget::Array, buffer.id());
            gl.get_buffer_parameter(gl::ARRAY_BUFFER, gl::BUFFER_MAPPED)
        };
        assert_eq!(mapped, 0);
        let other_mapped = gl.get_buffer_parameter(gl::ARRAY_BUFFER, gl::BUFFER_MAPPED);
        assert_eq!(other_mapped, 0);
    }

    #[test]
    fn test_recreate_discards_storage() {
        let gl = context();
        let mut buffer = Buffer::new(&gl);
        buffer.create_with_data(4, Some(&[1, 2, 3, 4])).unwrap();
        let old = buffer.id();
        buffer.recreate().unwrap();
        assert_ne!(buffer.id(), old);
        assert_eq!(buffer.size().unwrap(), 0);
    }
}
