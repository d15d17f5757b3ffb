use super::glsl::Interface;
use super::pixels::{self, InternalFormat, Layout, PixelFormat, PixelStore, Texel};
use super::Limits;
use crate::api::{PixelPackData, PixelUnpackData};
use crate::error::DriverError;
use crate::gl;
use crate::gl::types::*;
use crate::uniform::UniformValue;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// A rejected call: the error flag to record, and why.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) struct Failure {
    pub code: GLenum,
    pub reason: &'static str,
}

pub(super) type SoftResult<T> = Result<T, Failure>;

pub(super) fn fail<T>(code: GLenum, reason: &'static str) -> SoftResult<T> {
    Err(Failure { code, reason })
}

pub(super) fn ensure(condition: bool, code: GLenum, reason: &'static str) -> SoftResult<()> {
    if condition {
        Ok(())
    } else {
        fail(code, reason)
    }
}

/// Converts a signed size argument.
pub(super) fn size_arg(value: GLsizei, reason: &'static str) -> SoftResult<usize> {
    if value < 0 {
        fail(gl::INVALID_VALUE, reason)
    } else {
        Ok(value as usize)
    }
}

//--------------------------------------------------------------------------------------------------

pub(super) struct BufferObject {
    pub data: Vec<u8>,
    pub usage: GLenum,
    pub mapped: Option<GLenum>,
}

pub(super) struct VertexArrayObject {
    pub element_array: GLuint,
    pub enabled: Vec<bool>,
}

/// One image: a texture level, a renderbuffer or a default framebuffer buffer.
#[derive(Clone, Debug)]
pub(super) struct Level {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub internal_format: GLenum,
    pub texels: Vec<Texel>,
    /// Raw blocks of a compressed image. `texels` is empty in that case.
    pub compressed: Option<Vec<u8>>,
}

impl Level {
    pub(super) fn new(width: usize, height: usize, depth: usize, internal_format: GLenum) -> Level {
        let fill = match pixels::internal_format(internal_format) {
            Some(format) => format.store([0.0; 4]),
            None => pixels::DEFAULT_TEXEL,
        };
        Level {
            width,
            height,
            depth,
            internal_format,
            texels: vec![fill; width * height * depth],
            compressed: None,
        }
    }

    pub(super) fn format(&self) -> Option<InternalFormat> {
        pixels::internal_format(self.internal_format)
    }

    pub(super) fn index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.height + y) * self.width + x
    }
}

pub(super) struct TextureObject {
    /// Set on first bind.
    pub target: Option<GLenum>,
    pub levels: BTreeMap<GLint, Level>,
    pub params: HashMap<GLenum, f32>,
    pub border_color: [f32; 4],
}

pub(super) struct RenderbufferObject {
    pub image: Option<Level>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum Attachment {
    Texture {
        name: GLuint,
        level: GLint,
        layer: usize,
    },
    Renderbuffer(GLuint),
}

impl Attachment {
    pub(super) fn references_texture(&self, texture: GLuint) -> bool {
        matches!(*self, Attachment::Texture { name, .. } if name == texture)
    }

    pub(super) fn references_renderbuffer(&self, renderbuffer: GLuint) -> bool {
        *self == Attachment::Renderbuffer(renderbuffer)
    }
}

pub(super) struct FramebufferObject {
    pub color: Vec<Option<Attachment>>,
    pub depth: Option<Attachment>,
    pub stencil: Option<Attachment>,
    pub draw_buffers: Vec<GLenum>,
    pub read_buffer: GLenum,
}

pub(super) struct DefaultFramebuffer {
    pub color: Level,
    pub depth_stencil: Level,
    pub draw_buffer: GLenum,
    pub read_buffer: GLenum,
}

pub(super) struct ShaderObject {
    pub stage: GLenum,
    pub source: String,
    pub compiled: bool,
    pub log: String,
    pub interface: Option<Interface>,
    /// Deleted while attached to a program: kept alive but no longer a valid name.
    pub delete_pending: bool,
}

/// An active uniform of a linked program.
#[derive(Clone, Debug)]
pub(super) struct ActiveUniform {
    pub name: String,
    pub ty: String,
    pub location: GLint,
    pub len: usize,
}

#[derive(Default)]
pub(super) struct ProgramObject {
    pub shaders: Vec<GLuint>,
    pub linked: bool,
    pub validated: bool,
    pub log: String,
    pub uniforms: Vec<ActiveUniform>,
    pub values: HashMap<GLint, UniformValue>,
}

//--------------------------------------------------------------------------------------------------

pub(super) struct State {
    pub limits: Limits,
    pub error: GLenum,
    next_name: GLuint,

    pub buffers: HashMap<GLuint, BufferObject>,
    pub vertex_arrays: HashMap<GLuint, VertexArrayObject>,
    pub textures: HashMap<GLuint, TextureObject>,
    pub renderbuffers: HashMap<GLuint, RenderbufferObject>,
    pub framebuffers: HashMap<GLuint, FramebufferObject>,
    pub default_framebuffer: DefaultFramebuffer,
    pub shaders: HashMap<GLuint, ShaderObject>,
    pub programs: HashMap<GLuint, ProgramObject>,

    pub array_buffer: GLuint,
    pub pixel_pack_buffer: GLuint,
    pub pixel_unpack_buffer: GLuint,
    pub vertex_array: GLuint,
    pub active_unit: usize,
    /// Per texture unit: 1D, 2D and 3D bindings.
    pub texture_units: Vec<[GLuint; 3]>,
    pub renderbuffer: GLuint,
    pub draw_framebuffer: GLuint,
    pub read_framebuffer: GLuint,
    pub program: GLuint,

    pub pack: PixelStore,
    pub unpack: PixelStore,
    pub clear_color: [f32; 4],
    pub clear_depth: f64,
    pub clear_stencil: GLint,
}

impl State {
    pub(super) fn new(width: usize, height: usize, limits: Limits) -> State {
        let mut vertex_arrays = HashMap::new();
        vertex_arrays.insert(0, VertexArrayObject::new(&limits));
        State {
            error: gl::NO_ERROR,
            next_name: 1,
            buffers: HashMap::new(),
            vertex_arrays,
            textures: HashMap::new(),
            renderbuffers: HashMap::new(),
            framebuffers: HashMap::new(),
            default_framebuffer: DefaultFramebuffer {
                color: Level::new(width, height, 1, gl::RGBA8),
                depth_stencil: Level::new(width, height, 1, gl::DEPTH24_STENCIL8),
                draw_buffer: gl::BACK,
                read_buffer: gl::BACK,
            },
            shaders: HashMap::new(),
            programs: HashMap::new(),
            array_buffer: 0,
            pixel_pack_buffer: 0,
            pixel_unpack_buffer: 0,
            vertex_array: 0,
            active_unit: 0,
            texture_units: vec![[0; 3]; limits.max_texture_units as usize],
            renderbuffer: 0,
            draw_framebuffer: 0,
            read_framebuffer: 0,
            program: 0,
            pack: PixelStore::default(),
            unpack: PixelStore::default(),
            clear_color: [0.0; 4],
            clear_depth: 1.0,
            clear_stencil: 0,
            limits,
        }
    }

    /// Records the failure of `call`. The first error sticks until read.
    pub(super) fn record(&mut self, call: &'static str, failure: Failure) {
        debug!(
            call,
            error = ?DriverError::from_gl(failure.code),
            reason = failure.reason,
            "soft driver error"
        );
        if self.error == gl::NO_ERROR {
            self.error = failure.code;
        }
    }

    pub(super) fn take_error(&mut self) -> GLenum {
        std::mem::replace(&mut self.error, gl::NO_ERROR)
    }

    /// Names are shared by all object kinds and never reused.
    pub(super) fn new_name(&mut self) -> GLuint {
        let name = self.next_name;
        self.next_name += 1;
        name
    }

    pub(super) fn get_integer(&self, pname: GLenum) -> SoftResult<GLint> {
        let value = match pname {
            gl::ARRAY_BUFFER_BINDING => self.array_buffer as GLint,
            gl::ELEMENT_ARRAY_BUFFER_BINDING => self.current_vertex_array().element_array as GLint,
            gl::PIXEL_PACK_BUFFER_BINDING => self.pixel_pack_buffer as GLint,
            gl::PIXEL_UNPACK_BUFFER_BINDING => self.pixel_unpack_buffer as GLint,
            gl::VERTEX_ARRAY_BINDING => self.vertex_array as GLint,
            gl::TEXTURE_BINDING_1D => self.texture_units[self.active_unit][0] as GLint,
            gl::TEXTURE_BINDING_2D => self.texture_units[self.active_unit][1] as GLint,
            gl::TEXTURE_BINDING_3D => self.texture_units[self.active_unit][2] as GLint,
            gl::ACTIVE_TEXTURE => (gl::TEXTURE0 + self.active_unit as GLenum) as GLint,
            gl::RENDERBUFFER_BINDING => self.renderbuffer as GLint,
            gl::DRAW_FRAMEBUFFER_BINDING => self.draw_framebuffer as GLint,
            gl::READ_FRAMEBUFFER_BINDING => self.read_framebuffer as GLint,
            gl::CURRENT_PROGRAM => self.program as GLint,
            gl::STENCIL_CLEAR_VALUE => self.clear_stencil,
            gl::MAX_VERTEX_ATTRIBS => self.limits.max_vertex_attribs as GLint,
            gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS => self.limits.max_texture_units as GLint,
            gl::MAX_COLOR_ATTACHMENTS => self.limits.max_color_attachments as GLint,
            gl::MAX_DRAW_BUFFERS => self.limits.max_draw_buffers as GLint,
            gl::READ_BUFFER => self.read_buffer_mode() as GLint,
            gl::PACK_SWAP_BYTES => self.pack.swap_bytes as GLint,
            gl::PACK_LSB_FIRST => self.pack.lsb_first as GLint,
            gl::PACK_ROW_LENGTH => self.pack.row_length,
            gl::PACK_IMAGE_HEIGHT => self.pack.image_height,
            gl::PACK_SKIP_ROWS => self.pack.skip_rows,
            gl::PACK_SKIP_PIXELS => self.pack.skip_pixels,
            gl::PACK_SKIP_IMAGES => self.pack.skip_images,
            gl::PACK_ALIGNMENT => self.pack.alignment,
            gl::UNPACK_SWAP_BYTES => self.unpack.swap_bytes as GLint,
            gl::UNPACK_LSB_FIRST => self.unpack.lsb_first as GLint,
            gl::UNPACK_ROW_LENGTH => self.unpack.row_length,
            gl::UNPACK_IMAGE_HEIGHT => self.unpack.image_height,
            gl::UNPACK_SKIP_ROWS => self.unpack.skip_rows,
            gl::UNPACK_SKIP_PIXELS => self.unpack.skip_pixels,
            gl::UNPACK_SKIP_IMAGES => self.unpack.skip_images,
            gl::UNPACK_ALIGNMENT => self.unpack.alignment,
            pname
                if pname >= gl::DRAW_BUFFER0
                    && pname < gl::DRAW_BUFFER0 + self.limits.max_draw_buffers =>
            {
                self.draw_buffer_mode((pname - gl::DRAW_BUFFER0) as usize) as GLint
            }
            _ => return fail(gl::INVALID_ENUM, "unknown state variable"),
        };
        Ok(value)
    }

    pub(super) fn pixel_store(&mut self, pname: GLenum, param: GLint) -> SoftResult<()> {
        let pack = matches!(
            pname,
            gl::PACK_SWAP_BYTES
                | gl::PACK_LSB_FIRST
                | gl::PACK_ROW_LENGTH
                | gl::PACK_IMAGE_HEIGHT
                | gl::PACK_SKIP_ROWS
                | gl::PACK_SKIP_PIXELS
                | gl::PACK_SKIP_IMAGES
                | gl::PACK_ALIGNMENT
        );
        let store = if pack {
            &mut self.pack
        } else {
            &mut self.unpack
        };
        match pname {
            gl::PACK_ALIGNMENT | gl::UNPACK_ALIGNMENT => {
                ensure(
                    matches!(param, 1 | 2 | 4 | 8),
                    gl::INVALID_VALUE,
                    "alignment must be 1, 2, 4 or 8",
                )?;
                store.alignment = param;
            }
            gl::PACK_SWAP_BYTES | gl::UNPACK_SWAP_BYTES => store.swap_bytes = param != 0,
            gl::PACK_LSB_FIRST | gl::UNPACK_LSB_FIRST => store.lsb_first = param != 0,
            _ => {
                let field = match pname {
                    gl::PACK_ROW_LENGTH | gl::UNPACK_ROW_LENGTH => &mut store.row_length,
                    gl::PACK_IMAGE_HEIGHT | gl::UNPACK_IMAGE_HEIGHT => &mut store.image_height,
                    gl::PACK_SKIP_ROWS | gl::UNPACK_SKIP_ROWS => &mut store.skip_rows,
                    gl::PACK_SKIP_PIXELS | gl::UNPACK_SKIP_PIXELS => &mut store.skip_pixels,
                    gl::PACK_SKIP_IMAGES | gl::UNPACK_SKIP_IMAGES => &mut store.skip_images,
                    _ => return fail(gl::INVALID_ENUM, "unknown pixel store parameter"),
                };
                ensure(param >= 0, gl::INVALID_VALUE, "negative pixel store value")?;
                *field = param;
            }
        }
        Ok(())
    }

    //----------------------------------------------------------------------------------------------
    // Buffers

    fn buffer_binding(&self, target: GLenum) -> SoftResult<GLuint> {
        match target {
            gl::ARRAY_BUFFER => Ok(self.array_buffer),
            gl::ELEMENT_ARRAY_BUFFER => Ok(self.current_vertex_array().element_array),
            gl::PIXEL_PACK_BUFFER => Ok(self.pixel_pack_buffer),
            gl::PIXEL_UNPACK_BUFFER => Ok(self.pixel_unpack_buffer),
            _ => fail(gl::INVALID_ENUM, "invalid buffer target"),
        }
    }

    fn bound_buffer(&mut self, target: GLenum) -> SoftResult<&mut BufferObject> {
        let name = self.buffer_binding(target)?;
        match self.buffers.get_mut(&name) {
            Some(buffer) if name != 0 => Ok(buffer),
            _ => fail(gl::INVALID_OPERATION, "no buffer bound to target"),
        }
    }

    pub(super) fn gen_buffer(&mut self) -> GLuint {
        let name = self.new_name();
        self.buffers.insert(
            name,
            BufferObject {
                data: Vec::new(),
                usage: gl::STATIC_DRAW,
                mapped: None,
            },
        );
        name
    }

    pub(super) fn delete_buffer(&mut self, name: GLuint) {
        if name == 0 || self.buffers.remove(&name).is_none() {
            return;
        }
        for binding in [
            &mut self.array_buffer,
            &mut self.pixel_pack_buffer,
            &mut self.pixel_unpack_buffer,
        ] {
            if *binding == name {
                *binding = 0;
            }
        }
        for vao in self.vertex_arrays.values_mut() {
            if vao.element_array == name {
                vao.element_array = 0;
            }
        }
    }

    pub(super) fn bind_buffer(&mut self, target: GLenum, name: GLuint) -> SoftResult<()> {
        self.buffer_binding(target)?;
        ensure(
            name == 0 || self.buffers.contains_key(&name),
            gl::INVALID_OPERATION,
            "not a buffer name",
        )?;
        match target {
            gl::ARRAY_BUFFER => self.array_buffer = name,
            gl::PIXEL_PACK_BUFFER => self.pixel_pack_buffer = name,
            gl::PIXEL_UNPACK_BUFFER => self.pixel_unpack_buffer = name,
            _ => {
                let vao = self.vertex_array;
                if let Some(vao) = self.vertex_arrays.get_mut(&vao) {
                    vao.element_array = name;
                }
            }
        }
        Ok(())
    }

    pub(super) fn buffer_data(
        &mut self,
        target: GLenum,
        size: usize,
        data: Option<&[u8]>,
        usage: GLenum,
    ) -> SoftResult<()> {
        ensure(
            matches!(
                usage,
                gl::STREAM_DRAW
                    | gl::STREAM_READ
                    | gl::STREAM_COPY
                    | gl::STATIC_DRAW
                    | gl::DYNAMIC_DRAW
            ),
            gl::INVALID_ENUM,
            "invalid buffer usage",
        )?;
        let buffer = self.bound_buffer(target)?;
        ensure(buffer.mapped.is_none(), gl::INVALID_OPERATION, "buffer is mapped")?;
        buffer.data = match data {
            Some(data) => {
                ensure(data.len() >= size, gl::INVALID_VALUE, "data shorter than size")?;
                data[..size].to_vec()
            }
            None => vec![0; size],
        };
        buffer.usage = usage;
        Ok(())
    }

    pub(super) fn buffer_sub_data(
        &mut self,
        target: GLenum,
        offset: usize,
        data: &[u8],
    ) -> SoftResult<()> {
        let buffer = self.bound_buffer(target)?;
        ensure(buffer.mapped.is_none(), gl::INVALID_OPERATION, "buffer is mapped")?;
        let end = offset.checked_add(data.len());
        match end {
            Some(end) if end <= buffer.data.len() => {
                buffer.data[offset..end].copy_from_slice(data);
                Ok(())
            }
            _ => fail(gl::INVALID_VALUE, "range exceeds buffer size"),
        }
    }

    pub(super) fn map_buffer(&mut self, target: GLenum, access: GLenum) -> SoftResult<*mut u8> {
        ensure(
            matches!(access, gl::READ_ONLY | gl::WRITE_ONLY | gl::READ_WRITE),
            gl::INVALID_ENUM,
            "invalid access",
        )?;
        let buffer = self.bound_buffer(target)?;
        ensure(buffer.mapped.is_none(), gl::INVALID_OPERATION, "buffer already mapped")?;
        buffer.mapped = Some(access);
        Ok(buffer.data.as_mut_ptr())
    }

    pub(super) fn unmap_buffer(&mut self, target: GLenum) -> SoftResult<bool> {
        let buffer = self.bound_buffer(target)?;
        match buffer.mapped.take() {
            Some(_) => Ok(true),
            None => fail(gl::INVALID_OPERATION, "buffer is not mapped"),
        }
    }

    pub(super) fn get_buffer_parameter(
        &mut self,
        target: GLenum,
        pname: GLenum,
    ) -> SoftResult<GLint> {
        let buffer = self.bound_buffer(target)?;
        match pname {
            gl::BUFFER_SIZE => Ok(buffer.data.len() as GLint),
            gl::BUFFER_USAGE => Ok(buffer.usage as GLint),
            gl::BUFFER_ACCESS => Ok(buffer.mapped.unwrap_or(gl::READ_WRITE) as GLint),
            gl::BUFFER_MAPPED => Ok(buffer.mapped.is_some() as GLint),
            _ => fail(gl::INVALID_ENUM, "unknown buffer parameter"),
        }
    }

    /// Client data for an upload of `required` bytes, or `None` when only storage is requested.
    pub(super) fn unpack_source<'a>(
        &self,
        pixels: PixelUnpackData<'a>,
        required: usize,
    ) -> SoftResult<Option<Cow<'a, [u8]>>> {
        match pixels {
            PixelUnpackData::Slice(data) => {
                ensure(
                    self.pixel_unpack_buffer == 0,
                    gl::INVALID_OPERATION,
                    "client memory upload with a pixel unpack buffer bound",
                )?;
                ensure(data.len() >= required, gl::INVALID_OPERATION, "client data too small")?;
                Ok(Some(Cow::Borrowed(data)))
            }
            PixelUnpackData::BufferOffset(offset) => {
                if self.pixel_unpack_buffer == 0 {
                    ensure(offset == 0, gl::INVALID_VALUE, "offset without a pixel unpack buffer")?;
                    return Ok(None);
                }
                let buffer = self.buffers.get(&self.pixel_unpack_buffer).ok_or(Failure {
                    code: gl::INVALID_OPERATION,
                    reason: "no pixel unpack buffer bound",
                })?;
                ensure(buffer.mapped.is_none(), gl::INVALID_OPERATION, "unpack buffer is mapped")?;
                match offset.checked_add(required) {
                    Some(end) if end <= buffer.data.len() => {
                        Ok(Some(Cow::Owned(buffer.data[offset..end].to_vec())))
                    }
                    _ => fail(gl::INVALID_OPERATION, "upload reads past the end of the buffer"),
                }
            }
        }
    }

    /// Decodes an upload of `width * height * depth` pixels. Returns `None` when only storage is
    /// requested.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn unpack_texels(
        &self,
        pixels: PixelUnpackData,
        format: GLenum,
        ty: GLenum,
        dims: u32,
        width: usize,
        height: usize,
        depth: usize,
    ) -> SoftResult<Option<(PixelFormat, Vec<Texel>)>> {
        let pixel = PixelFormat::new(format, ty).map_err(|code| Failure {
            code,
            reason: "invalid pixel format or type",
        })?;
        let layout = Layout::new(&self.unpack, &pixel, dims, width, height, depth);
        let source = self.unpack_source(pixels, layout.required_len())?;
        Ok(source.map(|data| (pixel, pixels::unpack(&data, &layout, &pixel))))
    }

    /// Encodes `texels` into the readback destination.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn pack_texels(
        &mut self,
        pixels: PixelPackData,
        pixel: &PixelFormat,
        dims: u32,
        width: usize,
        height: usize,
        depth: usize,
        texels: &[Texel],
    ) -> SoftResult<()> {
        let layout = Layout::new(&self.pack, pixel, dims, width, height, depth);
        let required = layout.required_len();
        match pixels {
            PixelPackData::Slice(out) => {
                ensure(
                    self.pixel_pack_buffer == 0,
                    gl::INVALID_OPERATION,
                    "client memory readback with a pixel pack buffer bound",
                )?;
                ensure(out.len() >= required, gl::INVALID_OPERATION, "client buffer too small")?;
                pixels::pack(out, &layout, pixel, texels);
            }
            PixelPackData::BufferOffset(offset) => {
                let name = self.pixel_pack_buffer;
                ensure(name != 0, gl::INVALID_OPERATION, "no pixel pack buffer bound")?;
                let buffer = self
                    .buffers
                    .get_mut(&name)
                    .ok_or(Failure {
                        code: gl::INVALID_OPERATION,
                        reason: "no pixel pack buffer bound",
                    })?;
                ensure(buffer.mapped.is_none(), gl::INVALID_OPERATION, "pack buffer is mapped")?;
                match offset.checked_add(required) {
                    Some(end) if end <= buffer.data.len() => {
                        pixels::pack(&mut buffer.data[offset..], &layout, pixel, texels)
                    }
                    _ => {
                        return fail(
                            gl::INVALID_OPERATION,
                            "readback writes past the end of the buffer",
                        )
                    }
                }
            }
        }
        Ok(())
    }

    //----------------------------------------------------------------------------------------------
    // Vertex arrays

    pub(super) fn current_vertex_array(&self) -> &VertexArrayObject {
        &self.vertex_arrays[&self.vertex_array]
    }

    pub(super) fn gen_vertex_array(&mut self) -> GLuint {
        let name = self.new_name();
        let vao = VertexArrayObject::new(&self.limits);
        self.vertex_arrays.insert(name, vao);
        name
    }

    pub(super) fn delete_vertex_array(&mut self, name: GLuint) {
        if name != 0 && self.vertex_arrays.remove(&name).is_some() && self.vertex_array == name {
            self.vertex_array = 0;
        }
    }

    pub(super) fn bind_vertex_array(&mut self, name: GLuint) -> SoftResult<()> {
        ensure(
            self.vertex_arrays.contains_key(&name),
            gl::INVALID_OPERATION,
            "not a vertex array name",
        )?;
        self.vertex_array = name;
        Ok(())
    }

    pub(super) fn set_vertex_attrib_enabled(
        &mut self,
        index: GLuint,
        enabled: bool,
    ) -> SoftResult<()> {
        let name = self.vertex_array;
        let vao = self
            .vertex_arrays
            .get_mut(&name)
            .ok_or(Failure {
                code: gl::INVALID_OPERATION,
                reason: "no vertex array bound",
            })?;
        match vao.enabled.get_mut(index as usize) {
            Some(slot) => {
                *slot = enabled;
                Ok(())
            }
            None => fail(gl::INVALID_VALUE, "attribute index out of range"),
        }
    }

    pub(super) fn get_vertex_attrib(&self, index: GLuint, pname: GLenum) -> SoftResult<GLint> {
        let enabled = match self.current_vertex_array().enabled.get(index as usize) {
            Some(&enabled) => enabled,
            None => return fail(gl::INVALID_VALUE, "attribute index out of range"),
        };
        match pname {
            gl::VERTEX_ATTRIB_ARRAY_ENABLED => Ok(enabled as GLint),
            _ => fail(gl::INVALID_ENUM, "unknown vertex attribute parameter"),
        }
    }
}

impl VertexArrayObject {
    fn new(limits: &Limits) -> VertexArrayObject {
        VertexArrayObject {
            element_array: 0,
            enabled: vec![false; limits.max_vertex_attribs as usize],
        }
    }
}
