//! The driver seam.
//!
//! [`GlApi`] lists the primitive operations this crate issues against a graphics context. Every
//! method acts on whatever object is currently bound at the given target, exactly like the
//! underlying API. [`Gl`] is the cloneable context handle stored by every wrapper.
//!
//! A context is tied to the thread it was made current on. `Gl` holds an `Rc`, which makes every
//! wrapper `!Send` and `!Sync`. Dropping a wrapper issues a delete call, so the context must still
//! be current on the dropping thread.
use crate::gl::types::*;
use std::{fmt, ops::Deref, rc::Rc};

/// Source of pixel data for an upload.
///
/// `BufferOffset` is interpreted relative to the buffer bound at `PIXEL_UNPACK_BUFFER`. When no
/// buffer is bound, `BufferOffset(0)` means "no data" (allocate storage only).
#[derive(Copy, Clone, Debug)]
pub enum PixelUnpackData<'a> {
    BufferOffset(usize),
    Slice(&'a [u8]),
}

/// Destination of pixel data for a readback.
///
/// `BufferOffset` is interpreted relative to the buffer bound at `PIXEL_PACK_BUFFER`.
#[derive(Debug)]
pub enum PixelPackData<'a> {
    BufferOffset(usize),
    Slice(&'a mut [u8]),
}

/// Primitive operations of the graphics driver.
///
/// Implementations record errors in a sticky error flag read by [`GlApi::get_error`]; they must
/// not panic on misuse.
pub trait GlApi {
    fn get_error(&self) -> GLenum;
    fn get_integer(&self, pname: GLenum) -> GLint;

    // --- buffers ---
    fn gen_buffer(&self) -> GLuint;
    fn delete_buffer(&self, buffer: GLuint);
    fn bind_buffer(&self, target: GLenum, buffer: GLuint);
    fn buffer_data(&self, target: GLenum, size: usize, data: Option<&[u8]>, usage: GLenum);
    fn buffer_sub_data(&self, target: GLenum, offset: usize, data: &[u8]);
    /// Maps the buffer bound at `target`. Returns null on failure.
    ///
    /// The returned pointer stays valid for `BUFFER_SIZE` bytes until the buffer is unmapped or
    /// deleted.
    fn map_buffer(&self, target: GLenum, access: GLenum) -> *mut u8;
    fn unmap_buffer(&self, target: GLenum) -> bool;
    fn get_buffer_parameter(&self, target: GLenum, pname: GLenum) -> GLint;

    // --- vertex arrays ---
    fn gen_vertex_array(&self) -> GLuint;
    fn delete_vertex_array(&self, vao: GLuint);
    fn bind_vertex_array(&self, vao: GLuint);
    fn enable_vertex_attrib_array(&self, index: GLuint);
    fn disable_vertex_attrib_array(&self, index: GLuint);
    fn get_vertex_attrib(&self, index: GLuint, pname: GLenum) -> GLint;

    // --- pixel store ---
    fn pixel_store(&self, pname: GLenum, param: GLint);

    // --- textures ---
    fn gen_texture(&self) -> GLuint;
    fn delete_texture(&self, texture: GLuint);
    fn bind_texture(&self, target: GLenum, texture: GLuint);
    fn active_texture(&self, unit: GLenum);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_1d(
        &self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    );
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    );
    #[allow(clippy::too_many_arguments)]
    fn tex_image_3d(
        &self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    );
    #[allow(clippy::too_many_arguments)]
    fn compressed_tex_image_2d(
        &self,
        target: GLenum,
        level: GLint,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        image_size: GLsizei,
        data: PixelUnpackData,
    );
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_1d(
        &self,
        target: GLenum,
        level: GLint,
        x_offset: GLint,
        width: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    );
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_2d(
        &self,
        target: GLenum,
        level: GLint,
        x_offset: GLint,
        y_offset: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    );
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_3d(
        &self,
        target: GLenum,
        level: GLint,
        x_offset: GLint,
        y_offset: GLint,
        z_offset: GLint,
        width: GLsizei,
        height: GLsizei,
        depth: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    );
    fn get_tex_image(
        &self,
        target: GLenum,
        level: GLint,
        format: GLenum,
        ty: GLenum,
        pixels: PixelPackData,
    );
    fn tex_parameter_i(&self, target: GLenum, pname: GLenum, param: GLint);
    fn tex_parameter_f(&self, target: GLenum, pname: GLenum, param: GLfloat);
    fn tex_parameter_fv(&self, target: GLenum, pname: GLenum, params: &[GLfloat; 4]);
    fn get_tex_parameter_i(&self, target: GLenum, pname: GLenum) -> GLint;
    fn get_tex_parameter_f(&self, target: GLenum, pname: GLenum) -> GLfloat;
    fn get_tex_level_parameter_i(&self, target: GLenum, level: GLint, pname: GLenum) -> GLint;

    // --- renderbuffers ---
    fn gen_renderbuffer(&self) -> GLuint;
    fn delete_renderbuffer(&self, renderbuffer: GLuint);
    fn bind_renderbuffer(&self, target: GLenum, renderbuffer: GLuint);
    fn renderbuffer_storage(
        &self,
        target: GLenum,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    );
    fn get_renderbuffer_parameter(&self, target: GLenum, pname: GLenum) -> GLint;

    // --- framebuffers ---
    fn gen_framebuffer(&self) -> GLuint;
    fn delete_framebuffer(&self, framebuffer: GLuint);
    fn bind_framebuffer(&self, target: GLenum, framebuffer: GLuint);
    fn framebuffer_texture_1d(
        &self,
        target: GLenum,
        attachment: GLenum,
        tex_target: GLenum,
        texture: GLuint,
        level: GLint,
    );
    fn framebuffer_texture_2d(
        &self,
        target: GLenum,
        attachment: GLenum,
        tex_target: GLenum,
        texture: GLuint,
        level: GLint,
    );
    #[allow(clippy::too_many_arguments)]
    fn framebuffer_texture_3d(
        &self,
        target: GLenum,
        attachment: GLenum,
        tex_target: GLenum,
        texture: GLuint,
        level: GLint,
        z_offset: GLint,
    );
    fn framebuffer_renderbuffer(
        &self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    );
    fn check_framebuffer_status(&self, target: GLenum) -> GLenum;
    fn get_framebuffer_attachment_parameter(
        &self,
        target: GLenum,
        attachment: GLenum,
        pname: GLenum,
    ) -> GLint;
    fn draw_buffers(&self, buffers: &[GLenum]);
    fn read_buffer(&self, buffer: GLenum);
    fn clear_color(&self, r: GLfloat, g: GLfloat, b: GLfloat, a: GLfloat);
    fn clear_depth(&self, depth: GLdouble);
    fn clear_stencil(&self, stencil: GLint);
    fn clear(&self, mask: GLbitfield);
    #[allow(clippy::too_many_arguments)]
    fn blit_framebuffer(
        &self,
        src_x0: GLint,
        src_y0: GLint,
        src_x1: GLint,
        src_y1: GLint,
        dst_x0: GLint,
        dst_y0: GLint,
        dst_x1: GLint,
        dst_y1: GLint,
        mask: GLbitfield,
        filter: GLenum,
    );
    #[allow(clippy::too_many_arguments)]
    fn read_pixels(
        &self,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelPackData,
    );
    fn draw_pixels(
        &self,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    );

    // --- shaders & programs ---
    fn create_shader(&self, ty: GLenum) -> GLuint;
    fn delete_shader(&self, shader: GLuint);
    fn shader_source(&self, shader: GLuint, source: &str);
    fn compile_shader(&self, shader: GLuint);
    fn get_shader_i(&self, shader: GLuint, pname: GLenum) -> GLint;
    /// Returns at most `max_length - 1` bytes of the shader log.
    fn get_shader_info_log(&self, shader: GLuint, max_length: GLsizei) -> String;
    fn create_program(&self) -> GLuint;
    fn delete_program(&self, program: GLuint);
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn validate_program(&self, program: GLuint);
    fn get_program_i(&self, program: GLuint, pname: GLenum) -> GLint;
    /// Returns at most `max_length - 1` bytes of the program log.
    fn get_program_info_log(&self, program: GLuint, max_length: GLsizei) -> String;
    fn use_program(&self, program: GLuint);
    fn get_uniform_location(&self, program: GLuint, name: &str) -> GLint;

    // --- uniforms ---
    fn program_uniform_1i(&self, program: GLuint, location: GLint, v: [GLint; 1]);
    fn program_uniform_2i(&self, program: GLuint, location: GLint, v: [GLint; 2]);
    fn program_uniform_3i(&self, program: GLuint, location: GLint, v: [GLint; 3]);
    fn program_uniform_4i(&self, program: GLuint, location: GLint, v: [GLint; 4]);
    fn program_uniform_1f(&self, program: GLuint, location: GLint, v: [GLfloat; 1]);
    fn program_uniform_2f(&self, program: GLuint, location: GLint, v: [GLfloat; 2]);
    fn program_uniform_3f(&self, program: GLuint, location: GLint, v: [GLfloat; 3]);
    fn program_uniform_4f(&self, program: GLuint, location: GLint, v: [GLfloat; 4]);
    fn program_uniform_1d(&self, program: GLuint, location: GLint, v: [GLdouble; 1]);
    fn program_uniform_2d(&self, program: GLuint, location: GLint, v: [GLdouble; 2]);
    fn program_uniform_3d(&self, program: GLuint, location: GLint, v: [GLdouble; 3]);
    fn program_uniform_4d(&self, program: GLuint, location: GLint, v: [GLdouble; 4]);
    fn program_uniform_matrix_2fv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLfloat; 4],
    );
    fn program_uniform_matrix_3fv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLfloat; 9],
    );
    fn program_uniform_matrix_4fv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLfloat; 16],
    );
    fn program_uniform_matrix_2dv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLdouble; 4],
    );
    fn program_uniform_matrix_3dv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLdouble; 9],
    );
    fn program_uniform_matrix_4dv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLdouble; 16],
    );
}

/// Handle to a graphics context.
///
/// Cloning is cheap: all clones refer to the same context.
#[derive(Clone)]
pub struct Gl {
    api: Rc<dyn GlApi>,
}

impl Gl {
    /// Wraps a driver implementation.
    pub fn new<A: GlApi + 'static>(api: Rc<A>) -> Gl {
        Gl { api }
    }

    /// Returns whether both handles refer to the same context.
    pub fn same_context(&self, other: &Gl) -> bool {
        Rc::ptr_eq(&self.api, &other.api)
    }
}

impl Deref for Gl {
    type Target = dyn GlApi;

    fn deref(&self) -> &Self::Target {
        &*self.api
    }
}

impl fmt::Debug for Gl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Gl")
            .field("api", &(Rc::as_ptr(&self.api) as *const ()))
            .finish()
    }
}
