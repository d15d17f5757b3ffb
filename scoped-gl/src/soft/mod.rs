//! In-memory reference driver.
//!
//! [`SoftGl`] implements [`GlApi`] on the CPU: object names, bindings, pixel transfers,
//! framebuffer clears, reads and blits, and program linking with uniform storage. It keeps the
//! error semantics of a real context (sticky error flag, nothing happens on error) so wrappers
//! can be exercised without a GPU. It does not rasterize.
//!
//! Shaders are not compiled: the driver reads their global `in`, `out` and `uniform`
//! declarations, checks for `void main()`, and links stages by matching names and types.
use self::state::{SoftResult, State};
use crate::api::{GlApi, PixelPackData, PixelUnpackData};
use crate::gl::types::*;
use crate::uniform::UniformValue;
use glam::{
    DMat2, DMat3, DMat4, DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Vec2, Vec3,
    Vec4,
};
use std::cell::RefCell;
use std::fmt;

mod framebuffers;
mod glsl;
mod pixels;
mod programs;
mod state;
mod textures;

/// Implementation limits reported through `get_integer`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Limits {
    pub max_color_attachments: u32,
    pub max_draw_buffers: u32,
    pub max_vertex_attribs: u32,
    pub max_texture_units: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_color_attachments: 8,
            max_draw_buffers: 8,
            max_vertex_attribs: 16,
            max_texture_units: 16,
        }
    }
}

/// Software implementation of [`GlApi`].
pub struct SoftGl {
    state: RefCell<State>,
}

impl SoftGl {
    /// Creates a context whose default framebuffer is `width` x `height` pixels, with an RGBA8
    /// color buffer and a depth/stencil buffer.
    pub fn new(width: u32, height: u32) -> SoftGl {
        SoftGl::with_limits(width, height, Limits::default())
    }

    pub fn with_limits(width: u32, height: u32, limits: Limits) -> SoftGl {
        SoftGl {
            state: RefCell::new(State::new(width as usize, height as usize, limits)),
        }
    }

    pub fn limits(&self) -> Limits {
        self.state.borrow().limits
    }

    /// The value last assigned to the uniform at `location` of `program`, if any.
    pub fn uniform(&self, program: GLuint, location: GLint) -> Option<UniformValue> {
        self.state.borrow().uniform_value(program, location)
    }

    pub fn is_buffer(&self, name: GLuint) -> bool {
        self.state.borrow().buffers.contains_key(&name)
    }

    pub fn is_texture(&self, name: GLuint) -> bool {
        self.state.borrow().textures.contains_key(&name)
    }

    pub fn is_renderbuffer(&self, name: GLuint) -> bool {
        self.state.borrow().renderbuffers.contains_key(&name)
    }

    pub fn is_framebuffer(&self, name: GLuint) -> bool {
        name != 0 && self.state.borrow().framebuffers.contains_key(&name)
    }

    pub fn is_vertex_array(&self, name: GLuint) -> bool {
        name != 0 && self.state.borrow().vertex_arrays.contains_key(&name)
    }

    pub fn is_shader(&self, name: GLuint) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&name)
            .map_or(false, |s| !s.delete_pending)
    }

    pub fn is_program(&self, name: GLuint) -> bool {
        self.state.borrow().programs.contains_key(&name)
    }

    /// Runs `f` on the state. On failure, records the error and returns the default value.
    fn run<T: Default>(
        &self,
        call: &'static str,
        f: impl FnOnce(&mut State) -> SoftResult<T>,
    ) -> T {
        let mut state = self.state.borrow_mut();
        match f(&mut state) {
            Ok(value) => value,
            Err(failure) => {
                state.record(call, failure);
                T::default()
            }
        }
    }

    fn uniform_call(
        &self,
        call: &'static str,
        program: GLuint,
        location: GLint,
        value: UniformValue,
    ) {
        self.run(call, |s| s.set_uniform(program, location, value))
    }
}

impl fmt::Debug for SoftGl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SoftGl")
            .field("limits", &self.limits())
            .finish()
    }
}

fn transposed<const N: usize>(v: &[f32; N], transpose: bool, n: usize) -> [f32; N] {
    let mut out = *v;
    if transpose {
        for c in 0..n {
            for r in 0..n {
                out[c * n + r] = v[r * n + c];
            }
        }
    }
    out
}

fn transposed_d<const N: usize>(v: &[f64; N], transpose: bool, n: usize) -> [f64; N] {
    let mut out = *v;
    if transpose {
        for c in 0..n {
            for r in 0..n {
                out[c * n + r] = v[r * n + c];
            }
        }
    }
    out
}

impl GlApi for SoftGl {
    fn get_error(&self) -> GLenum {
        self.state.borrow_mut().take_error()
    }

    fn get_integer(&self, pname: GLenum) -> GLint {
        self.run("get_integer", |s| s.get_integer(pname))
    }

    fn gen_buffer(&self) -> GLuint {
        self.state.borrow_mut().gen_buffer()
    }

    fn delete_buffer(&self, buffer: GLuint) {
        self.state.borrow_mut().delete_buffer(buffer)
    }

    fn bind_buffer(&self, target: GLenum, buffer: GLuint) {
        self.run("bind_buffer", |s| s.bind_buffer(target, buffer))
    }

    fn buffer_data(&self, target: GLenum, size: usize, data: Option<&[u8]>, usage: GLenum) {
        self.run("buffer_data", |s| s.buffer_data(target, size, data, usage))
    }

    fn buffer_sub_data(&self, target: GLenum, offset: usize, data: &[u8]) {
        self.run("buffer_sub_data", |s| s.buffer_sub_data(target, offset, data))
    }

    fn map_buffer(&self, target: GLenum, access: GLenum) -> *mut u8 {
        let mut state = self.state.borrow_mut();
        match state.map_buffer(target, access) {
            Ok(ptr) => ptr,
            Err(failure) => {
                state.record("map_buffer", failure);
                std::ptr::null_mut()
            }
        }
    }

    fn unmap_buffer(&self, target: GLenum) -> bool {
        self.run("unmap_buffer", |s| s.unmap_buffer(target))
    }

    fn get_buffer_parameter(&self, target: GLenum, pname: GLenum) -> GLint {
        self.run("get_buffer_parameter", |s| s.get_buffer_parameter(target, pname))
    }

    fn gen_vertex_array(&self) -> GLuint {
        self.state.borrow_mut().gen_vertex_array()
    }

    fn delete_vertex_array(&self, vao: GLuint) {
        self.state.borrow_mut().delete_vertex_array(vao)
    }

    fn bind_vertex_array(&self, vao: GLuint) {
        self.run("bind_vertex_array", |s| s.bind_vertex_array(vao))
    }

    fn enable_vertex_attrib_array(&self, index: GLuint) {
        self.run("enable_vertex_attrib_array", |s| {
            s.set_vertex_attrib_enabled(index, true)
        })
    }

    fn disable_vertex_attrib_array(&self, index: GLuint) {
        self.run("disable_vertex_attrib_array", |s| {
            s.set_vertex_attrib_enabled(index, false)
        })
    }

    fn get_vertex_attrib(&self, index: GLuint, pname: GLenum) -> GLint {
        self.run("get_vertex_attrib", |s| s.get_vertex_attrib(index, pname))
    }

    fn pixel_store(&self, pname: GLenum, param: GLint) {
        self.run("pixel_store", |s| s.pixel_store(pname, param))
    }

    fn gen_texture(&self) -> GLuint {
        self.state.borrow_mut().gen_texture()
    }

    fn delete_texture(&self, texture: GLuint) {
        self.state.borrow_mut().delete_texture(texture)
    }

    fn bind_texture(&self, target: GLenum, texture: GLuint) {
        self.run("bind_texture", |s| s.bind_texture(target, texture))
    }

    fn active_texture(&self, unit: GLenum) {
        self.run("active_texture", |s| s.active_texture(unit))
    }

    fn tex_image_1d(
        &self,
        target: GLenum,
        level: GLint,
        internal_format: GLint,
        width: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    ) {
        self.run("tex_image_1d", |s| {
            s.tex_image(target, 1, level, internal_format, [width, 1, 1], format, ty, pixels)
        })
    }

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
    ) {
        self.run("tex_image_2d", |s| {
            s.tex_image(target, 2, level, internal_format, [width, height, 1], format, ty, pixels)
        })
    }

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
    ) {
        self.run("tex_image_3d", |s| {
            s.tex_image(
                target,
                3,
                level,
                internal_format,
                [width, height, depth],
                format,
                ty,
                pixels,
            )
        })
    }

    fn compressed_tex_image_2d(
        &self,
        target: GLenum,
        level: GLint,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        image_size: GLsizei,
        data: PixelUnpackData,
    ) {
        self.run("compressed_tex_image_2d", |s| {
            s.compressed_tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                image_size,
                data,
            )
        })
    }

    fn tex_sub_image_1d(
        &self,
        target: GLenum,
        level: GLint,
        x_offset: GLint,
        width: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    ) {
        self.run("tex_sub_image_1d", |s| {
            s.tex_sub_image(target, 1, level, [x_offset, 0, 0], [width, 1, 1], format, ty, pixels)
        })
    }

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
    ) {
        self.run("tex_sub_image_2d", |s| {
            s.tex_sub_image(
                target,
                2,
                level,
                [x_offset, y_offset, 0],
                [width, height, 1],
                format,
                ty,
                pixels,
            )
        })
    }

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
    ) {
        self.run("tex_sub_image_3d", |s| {
            s.tex_sub_image(
                target,
                3,
                level,
                [x_offset, y_offset, z_offset],
                [width, height, depth],
                format,
                ty,
                pixels,
            )
        })
    }

    fn get_tex_image(
        &self,
        target: GLenum,
        level: GLint,
        format: GLenum,
        ty: GLenum,
        pixels: PixelPackData,
    ) {
        self.run("get_tex_image", |s| {
            s.get_tex_image(target, level, format, ty, pixels)
        })
    }

    fn tex_parameter_i(&self, target: GLenum, pname: GLenum, param: GLint) {
        self.run("tex_parameter_i", |s| {
            s.tex_parameter(target, pname, param as f32)
        })
    }

    fn tex_parameter_f(&self, target: GLenum, pname: GLenum, param: GLfloat) {
        self.run("tex_parameter_f", |s| s.tex_parameter(target, pname, param))
    }

    fn tex_parameter_fv(&self, target: GLenum, pname: GLenum, params: &[GLfloat; 4]) {
        self.run("tex_parameter_fv", |s| {
            s.tex_parameter_fv(target, pname, params)
        })
    }

    fn get_tex_parameter_i(&self, target: GLenum, pname: GLenum) -> GLint {
        self.run("get_tex_parameter_i", |s| {
            s.get_tex_parameter(target, pname).map(|v| v.round() as GLint)
        })
    }

    fn get_tex_parameter_f(&self, target: GLenum, pname: GLenum) -> GLfloat {
        self.run("get_tex_parameter_f", |s| s.get_tex_parameter(target, pname))
    }

    fn get_tex_level_parameter_i(&self, target: GLenum, level: GLint, pname: GLenum) -> GLint {
        self.run("get_tex_level_parameter_i", |s| {
            s.get_tex_level_parameter(target, level, pname)
        })
    }

    fn gen_renderbuffer(&self) -> GLuint {
        self.state.borrow_mut().gen_renderbuffer()
    }

    fn delete_renderbuffer(&self, renderbuffer: GLuint) {
        self.state.borrow_mut().delete_renderbuffer(renderbuffer)
    }

    fn bind_renderbuffer(&self, target: GLenum, renderbuffer: GLuint) {
        self.run("bind_renderbuffer", |s| {
            s.bind_renderbuffer(target, renderbuffer)
        })
    }

    fn renderbuffer_storage(
        &self,
        target: GLenum,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
    ) {
        self.run("renderbuffer_storage", |s| {
            s.renderbuffer_storage(target, internal_format, width, height)
        })
    }

    fn get_renderbuffer_parameter(&self, target: GLenum, pname: GLenum) -> GLint {
        self.run("get_renderbuffer_parameter", |s| {
            s.get_renderbuffer_parameter(target, pname)
        })
    }

    fn gen_framebuffer(&self) -> GLuint {
        self.state.borrow_mut().gen_framebuffer()
    }

    fn delete_framebuffer(&self, framebuffer: GLuint) {
        self.state.borrow_mut().delete_framebuffer(framebuffer)
    }

    fn bind_framebuffer(&self, target: GLenum, framebuffer: GLuint) {
        self.run("bind_framebuffer", |s| {
            s.bind_framebuffer(target, framebuffer)
        })
    }

    fn framebuffer_texture_1d(
        &self,
        target: GLenum,
        attachment: GLenum,
        tex_target: GLenum,
        texture: GLuint,
        level: GLint,
    ) {
        self.run("framebuffer_texture_1d", |s| {
            s.framebuffer_texture(target, attachment, tex_target, texture, level, 0, 1)
        })
    }

    fn framebuffer_texture_2d(
        &self,
        target: GLenum,
        attachment: GLenum,
        tex_target: GLenum,
        texture: GLuint,
        level: GLint,
    ) {
        self.run("framebuffer_texture_2d", |s| {
            s.framebuffer_texture(target, attachment, tex_target, texture, level, 0, 2)
        })
    }

    fn framebuffer_texture_3d(
        &self,
        target: GLenum,
        attachment: GLenum,
        tex_target: GLenum,
        texture: GLuint,
        level: GLint,
        z_offset: GLint,
    ) {
        self.run("framebuffer_texture_3d", |s| {
            s.framebuffer_texture(target, attachment, tex_target, texture, level, z_offset, 3)
        })
    }

    fn framebuffer_renderbuffer(
        &self,
        target: GLenum,
        attachment: GLenum,
        renderbuffer_target: GLenum,
        renderbuffer: GLuint,
    ) {
        self.run("framebuffer_renderbuffer", |s| {
            s.framebuffer_renderbuffer(target, attachment, renderbuffer_target, renderbuffer)
        })
    }

    fn check_framebuffer_status(&self, target: GLenum) -> GLenum {
        self.run("check_framebuffer_status", |s| {
            s.check_framebuffer_status(target)
        })
    }

    fn get_framebuffer_attachment_parameter(
        &self,
        target: GLenum,
        attachment: GLenum,
        pname: GLenum,
    ) -> GLint {
        self.run("get_framebuffer_attachment_parameter", |s| {
            s.get_framebuffer_attachment_parameter(target, attachment, pname)
        })
    }

    fn draw_buffers(&self, buffers: &[GLenum]) {
        self.run("draw_buffers", |s| s.draw_buffers(buffers))
    }

    fn read_buffer(&self, buffer: GLenum) {
        self.run("read_buffer", |s| s.read_buffer(buffer))
    }

    fn clear_color(&self, r: GLfloat, g: GLfloat, b: GLfloat, a: GLfloat) {
        self.state.borrow_mut().clear_color = [r, g, b, a];
    }

    fn clear_depth(&self, depth: GLdouble) {
        self.state.borrow_mut().clear_depth = depth.max(0.0).min(1.0);
    }

    fn clear_stencil(&self, stencil: GLint) {
        self.state.borrow_mut().clear_stencil = stencil;
    }

    fn clear(&self, mask: GLbitfield) {
        self.run("clear", |s| s.clear(mask))
    }

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
    ) {
        self.run("blit_framebuffer", |s| {
            s.blit_framebuffer(
                [src_x0, src_y0, src_x1, src_y1],
                [dst_x0, dst_y0, dst_x1, dst_y1],
                mask,
                filter,
            )
        })
    }

    fn read_pixels(
        &self,
        x: GLint,
        y: GLint,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelPackData,
    ) {
        self.run("read_pixels", |s| {
            s.read_pixels(x, y, width, height, format, ty, pixels)
        })
    }

    fn draw_pixels(
        &self,
        width: GLsizei,
        height: GLsizei,
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    ) {
        self.run("draw_pixels", |s| {
            s.draw_pixels(width, height, format, ty, pixels)
        })
    }

    fn create_shader(&self, ty: GLenum) -> GLuint {
        self.run("create_shader", |s| s.create_shader(ty))
    }

    fn delete_shader(&self, shader: GLuint) {
        self.run("delete_shader", |s| s.delete_shader(shader))
    }

    fn shader_source(&self, shader: GLuint, source: &str) {
        self.run("shader_source", |s| s.shader_source(shader, source))
    }

    fn compile_shader(&self, shader: GLuint) {
        self.run("compile_shader", |s| s.compile_shader(shader))
    }

    fn get_shader_i(&self, shader: GLuint, pname: GLenum) -> GLint {
        self.run("get_shader_i", |s| s.get_shader_i(shader, pname))
    }

    fn get_shader_info_log(&self, shader: GLuint, max_length: GLsizei) -> String {
        self.run("get_shader_info_log", |s| {
            s.get_shader_info_log(shader, max_length)
        })
    }

    fn create_program(&self) -> GLuint {
        self.state.borrow_mut().create_program()
    }

    fn delete_program(&self, program: GLuint) {
        self.run("delete_program", |s| s.delete_program(program))
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        self.run("attach_shader", |s| s.attach_shader(program, shader))
    }

    fn link_program(&self, program: GLuint) {
        self.run("link_program", |s| s.link_program(program))
    }

    fn validate_program(&self, program: GLuint) {
        self.run("validate_program", |s| s.validate_program(program))
    }

    fn get_program_i(&self, program: GLuint, pname: GLenum) -> GLint {
        self.run("get_program_i", |s| s.get_program_i(program, pname))
    }

    fn get_program_info_log(&self, program: GLuint, max_length: GLsizei) -> String {
        self.run("get_program_info_log", |s| {
            s.get_program_info_log(program, max_length)
        })
    }

    fn use_program(&self, program: GLuint) {
        self.run("use_program", |s| s.use_program(program))
    }

    fn get_uniform_location(&self, program: GLuint, name: &str) -> GLint {
        let mut state = self.state.borrow_mut();
        match state.get_uniform_location(program, name) {
            Ok(location) => location,
            Err(failure) => {
                state.record("get_uniform_location", failure);
                -1
            }
        }
    }

    fn program_uniform_1i(&self, program: GLuint, location: GLint, v: [GLint; 1]) {
        self.uniform_call("program_uniform_1i", program, location, UniformValue::Int(v[0]))
    }

    fn program_uniform_2i(&self, program: GLuint, location: GLint, v: [GLint; 2]) {
        let value = UniformValue::IVec2(IVec2::from(v));
        self.uniform_call("program_uniform_2i", program, location, value)
    }

    fn program_uniform_3i(&self, program: GLuint, location: GLint, v: [GLint; 3]) {
        let value = UniformValue::IVec3(IVec3::from(v));
        self.uniform_call("program_uniform_3i", program, location, value)
    }

    fn program_uniform_4i(&self, program: GLuint, location: GLint, v: [GLint; 4]) {
        let value = UniformValue::IVec4(IVec4::from(v));
        self.uniform_call("program_uniform_4i", program, location, value)
    }

    fn program_uniform_1f(&self, program: GLuint, location: GLint, v: [GLfloat; 1]) {
        self.uniform_call("program_uniform_1f", program, location, UniformValue::Float(v[0]))
    }

    fn program_uniform_2f(&self, program: GLuint, location: GLint, v: [GLfloat; 2]) {
        let value = UniformValue::Vec2(Vec2::from(v));
        self.uniform_call("program_uniform_2f", program, location, value)
    }

    fn program_uniform_3f(&self, program: GLuint, location: GLint, v: [GLfloat; 3]) {
        let value = UniformValue::Vec3(Vec3::from(v));
        self.uniform_call("program_uniform_3f", program, location, value)
    }

    fn program_uniform_4f(&self, program: GLuint, location: GLint, v: [GLfloat; 4]) {
        let value = UniformValue::Vec4(Vec4::from(v));
        self.uniform_call("program_uniform_4f", program, location, value)
    }

    fn program_uniform_1d(&self, program: GLuint, location: GLint, v: [GLdouble; 1]) {
        self.uniform_call("program_uniform_1d", program, location, UniformValue::Double(v[0]))
    }

    fn program_uniform_2d(&self, program: GLuint, location: GLint, v: [GLdouble; 2]) {
        let value = UniformValue::DVec2(DVec2::from(v));
        self.uniform_call("program_uniform_2d", program, location, value)
    }

    fn program_uniform_3d(&self, program: GLuint, location: GLint, v: [GLdouble; 3]) {
        let value = UniformValue::DVec3(DVec3::from(v));
        self.uniform_call("program_uniform_3d", program, location, value)
    }

    fn program_uniform_4d(&self, program: GLuint, location: GLint, v: [GLdouble; 4]) {
        let value = UniformValue::DVec4(DVec4::from(v));
        self.uniform_call("program_uniform_4d", program, location, value)
    }

    fn program_uniform_matrix_2fv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLfloat; 4],
    ) {
        let value = UniformValue::Mat2(Mat2::from_cols_array(&transposed(v, transpose, 2)));
        self.uniform_call("program_uniform_matrix_2fv", program, location, value)
    }

    fn program_uniform_matrix_3fv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLfloat; 9],
    ) {
        let value = UniformValue::Mat3(Mat3::from_cols_array(&transposed(v, transpose, 3)));
        self.uniform_call("program_uniform_matrix_3fv", program, location, value)
    }

    fn program_uniform_matrix_4fv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLfloat; 16],
    ) {
        let value = UniformValue::Mat4(Mat4::from_cols_array(&transposed(v, transpose, 4)));
        self.uniform_call("program_uniform_matrix_4fv", program, location, value)
    }

    fn program_uniform_matrix_2dv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLdouble; 4],
    ) {
        let value = UniformValue::DMat2(DMat2::from_cols_array(&transposed_d(v, transpose, 2)));
        self.uniform_call("program_uniform_matrix_2dv", program, location, value)
    }

    fn program_uniform_matrix_3dv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLdouble; 9],
    ) {
        let value = UniformValue::DMat3(DMat3::from_cols_array(&transposed_d(v, transpose, 3)));
        self.uniform_call("program_uniform_matrix_3dv", program, location, value)
    }

    fn program_uniform_matrix_4dv(
        &self,
        program: GLuint,
        location: GLint,
        transpose: bool,
        v: &[GLdouble; 16],
    ) {
        let value = UniformValue::DMat4(DMat4::from_cols_array(&transposed_d(v, transpose, 4)));
        self.uniform_call("program_uniform_matrix_4dv", program, location, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GlApi;
    use crate::gl;

    #[test]
    fn test_error_flag_is_sticky_until_read() {
        let gl = SoftGl::new(4, 4);
        gl.bind_buffer(0x1234, 0);
        gl.pixel_store(gl::PACK_ALIGNMENT, 3);
        assert_eq!(gl.get_error(), gl::INVALID_ENUM);
        assert_eq!(gl.get_error(), gl::NO_ERROR);
    }

    #[test]
    fn test_names_are_not_reused() {
        let gl = SoftGl::new(4, 4);
        let a = gl.gen_buffer();
        gl.delete_buffer(a);
        let b = gl.gen_buffer();
        assert_ne!(a, b);
        assert!(!gl.is_buffer(a));
        assert!(gl.is_buffer(b));
    }

    #[test]
    fn test_failed_call_has_no_effect() {
        let gl = SoftGl::new(4, 4);
        let buffer = gl.gen_buffer();
        gl.bind_buffer(gl::ARRAY_BUFFER, buffer);
        gl.buffer_data(gl::ARRAY_BUFFER, 4, Some(&[1, 2, 3, 4]), 0xdead);
        assert_eq!(gl.get_error(), gl::INVALID_ENUM);
        assert_eq!(gl.get_buffer_parameter(gl::ARRAY_BUFFER, gl::BUFFER_SIZE), 0);
    }

    #[test]
    fn test_texture_target_is_fixed_on_first_bind() {
        let gl = SoftGl::new(4, 4);
        let texture = gl.gen_texture();
        gl.bind_texture(gl::TEXTURE_2D, texture);
        gl.bind_texture(gl::TEXTURE_3D, texture);
        assert_eq!(gl.get_error(), gl::INVALID_OPERATION);
        assert_eq!(gl.get_integer(gl::TEXTURE_BINDING_3D), 0);
    }

    #[test]
    fn test_uniform_storage() {
        let gl = SoftGl::new(4, 4);
        let vs = gl.create_shader(gl::VERTEX_SHADER);
        gl.shader_source(vs, "uniform mat4 mvp; void main() {}");
        gl.compile_shader(vs);
        let fs = gl.create_shader(gl::FRAGMENT_SHADER);
        gl.shader_source(fs, "uniform vec4 tint[2]; uniform sampler2D tex; void main() {}");
        gl.compile_shader(fs);
        let program = gl.create_program();
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);
        assert_eq!(gl.get_program_i(program, gl::LINK_STATUS), 1);

        assert_eq!(gl.get_uniform_location(program, "mvp"), 0);
        assert_eq!(gl.get_uniform_location(program, "tint[1]"), 2);
        assert_eq!(gl.get_uniform_location(program, "tex"), 3);
        assert_eq!(gl.get_uniform_location(program, "missing"), -1);

        gl.program_uniform_4f(program, 2, [1.0, 2.0, 3.0, 4.0]);
        gl.program_uniform_1i(program, 3, [5]);
        assert_eq!(gl.get_error(), gl::NO_ERROR);
        assert_eq!(
            gl.uniform(program, 2),
            Some(UniformValue::Vec4(Vec4::new(1.0, 2.0, 3.0, 4.0)))
        );
        assert_eq!(gl.uniform(program, 3), Some(UniformValue::Int(5)));

        gl.program_uniform_1f(program, 0, [1.0]);
        assert_eq!(gl.get_error(), gl::INVALID_OPERATION);
        gl.program_uniform_1i(program, 3, [99]);
        assert_eq!(gl.get_error(), gl::INVALID_VALUE);
    }

    #[test]
    fn test_transposed_matrix_upload() {
        let gl = SoftGl::new(4, 4);
        let vs = gl.create_shader(gl::VERTEX_SHADER);
        gl.shader_source(vs, "uniform mat2 m; void main() {}");
        gl.compile_shader(vs);
        let fs = gl.create_shader(gl::FRAGMENT_SHADER);
        gl.shader_source(fs, "void main() {}");
        gl.compile_shader(fs);
        let program = gl.create_program();
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        gl.program_uniform_matrix_2fv(program, 0, true, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            gl.uniform(program, 0),
            Some(UniformValue::Mat2(Mat2::from_cols_array(&[1.0, 3.0, 2.0, 4.0])))
        );
    }
}
