//! Texture objects and texture units.
use super::pixels::{self, PixelFormat};
use super::state::{ensure, fail, size_arg, Failure, Level, SoftResult, State, TextureObject};
use crate::api::{PixelPackData, PixelUnpackData};
use crate::gl;
use crate::gl::types::*;
use std::collections::{BTreeMap, HashMap};

/// Highest mip level accepted by image specification calls.
pub(super) const MAX_LEVEL: GLint = 14;
/// Largest texture or renderbuffer dimension.
pub(super) const MAX_SIZE: usize = 16384;

fn target_slot(target: GLenum) -> SoftResult<usize> {
    match target {
        gl::TEXTURE_1D => Ok(0),
        gl::TEXTURE_2D => Ok(1),
        gl::TEXTURE_3D => Ok(2),
        _ => fail(gl::INVALID_ENUM, "invalid texture target"),
    }
}

fn target_dims(target: GLenum) -> u32 {
    match target {
        gl::TEXTURE_1D => 1,
        gl::TEXTURE_2D => 2,
        _ => 3,
    }
}

fn check_level(level: GLint) -> SoftResult<()> {
    ensure(
        (0..=MAX_LEVEL).contains(&level),
        gl::INVALID_VALUE,
        "mip level out of range",
    )
}

fn default_params() -> HashMap<GLenum, f32> {
    let params: [(GLenum, f32); 17] = [
        (gl::TEXTURE_MIN_FILTER, gl::NEAREST_MIPMAP_LINEAR as f32),
        (gl::TEXTURE_MAG_FILTER, gl::LINEAR as f32),
        (gl::TEXTURE_WRAP_S, gl::REPEAT as f32),
        (gl::TEXTURE_WRAP_T, gl::REPEAT as f32),
        (gl::TEXTURE_WRAP_R, gl::REPEAT as f32),
        (gl::TEXTURE_MIN_LOD, -1000.0),
        (gl::TEXTURE_MAX_LOD, 1000.0),
        (gl::TEXTURE_BASE_LEVEL, 0.0),
        (gl::TEXTURE_MAX_LEVEL, 1000.0),
        (gl::TEXTURE_LOD_BIAS, 0.0),
        (gl::TEXTURE_COMPARE_MODE, gl::NONE as f32),
        (gl::TEXTURE_COMPARE_FUNC, gl::LEQUAL as f32),
        (gl::TEXTURE_SWIZZLE_R, gl::RED as f32),
        (gl::TEXTURE_SWIZZLE_G, gl::GREEN as f32),
        (gl::TEXTURE_SWIZZLE_B, gl::BLUE as f32),
        (gl::TEXTURE_SWIZZLE_A, gl::ALPHA as f32),
        (gl::GENERATE_MIPMAP, 0.0),
    ];
    let mut map: HashMap<GLenum, f32> = params.iter().copied().collect();
    map.insert(gl::TEXTURE_MAX_ANISOTROPY_EXT, 1.0);
    map
}

/// Checks a texture parameter value.
fn check_param(pname: GLenum, value: f32) -> SoftResult<()> {
    let is_one_of =
        |allowed: &[GLenum]| value.fract() == 0.0 && allowed.contains(&(value as GLenum));
    let valid = match pname {
        gl::TEXTURE_MIN_FILTER => is_one_of(&[
            gl::NEAREST,
            gl::LINEAR,
            gl::NEAREST_MIPMAP_NEAREST,
            gl::LINEAR_MIPMAP_NEAREST,
            gl::NEAREST_MIPMAP_LINEAR,
            gl::LINEAR_MIPMAP_LINEAR,
        ]),
        gl::TEXTURE_MAG_FILTER => is_one_of(&[gl::NEAREST, gl::LINEAR]),
        gl::TEXTURE_WRAP_S | gl::TEXTURE_WRAP_T | gl::TEXTURE_WRAP_R => is_one_of(&[
            gl::REPEAT,
            gl::MIRRORED_REPEAT,
            gl::CLAMP_TO_EDGE,
            gl::CLAMP_TO_BORDER,
            gl::MIRROR_CLAMP_EXT,
            gl::MIRROR_CLAMP_TO_EDGE,
            gl::MIRROR_CLAMP_TO_BORDER_EXT,
        ]),
        gl::TEXTURE_COMPARE_MODE => is_one_of(&[gl::NONE, gl::COMPARE_REF_TO_TEXTURE]),
        gl::TEXTURE_COMPARE_FUNC => is_one_of(&[
            gl::NEVER,
            gl::LESS,
            gl::EQUAL,
            gl::LEQUAL,
            gl::GREATER,
            gl::NOTEQUAL,
            gl::GEQUAL,
            gl::ALWAYS,
        ]),
        gl::TEXTURE_SWIZZLE_R
        | gl::TEXTURE_SWIZZLE_G
        | gl::TEXTURE_SWIZZLE_B
        | gl::TEXTURE_SWIZZLE_A => {
            is_one_of(&[gl::RED, gl::GREEN, gl::BLUE, gl::ALPHA, gl::ZERO, gl::ONE])
        }
        gl::GENERATE_MIPMAP => is_one_of(&[gl::FALSE as GLenum, gl::TRUE as GLenum]),
        gl::TEXTURE_BASE_LEVEL | gl::TEXTURE_MAX_LEVEL => {
            return ensure(value >= 0.0, gl::INVALID_VALUE, "negative mip level");
        }
        gl::TEXTURE_MAX_ANISOTROPY_EXT => {
            return ensure(value >= 1.0, gl::INVALID_VALUE, "anisotropy below 1");
        }
        gl::TEXTURE_MIN_LOD | gl::TEXTURE_MAX_LOD | gl::TEXTURE_LOD_BIAS => true,
        _ => return fail(gl::INVALID_ENUM, "unknown texture parameter"),
    };
    ensure(valid, gl::INVALID_ENUM, "invalid texture parameter value")
}

impl State {
    pub(super) fn bound_texture_name(&self, target: GLenum) -> SoftResult<GLuint> {
        let slot = target_slot(target)?;
        Ok(self.texture_units[self.active_unit][slot])
    }

    /// The texture bound at `target` on the active unit. This driver has no default texture
    /// object: operating on binding 0 is an error.
    fn bound_texture(&mut self, target: GLenum) -> SoftResult<&mut TextureObject> {
        let name = self.bound_texture_name(target)?;
        match self.textures.get_mut(&name) {
            Some(texture) if name != 0 => Ok(texture),
            _ => fail(gl::INVALID_OPERATION, "no texture bound to target"),
        }
    }

    pub(super) fn gen_texture(&mut self) -> GLuint {
        let name = self.new_name();
        self.textures.insert(
            name,
            TextureObject {
                target: None,
                levels: BTreeMap::new(),
                params: default_params(),
                border_color: [0.0; 4],
            },
        );
        name
    }

    pub(super) fn delete_texture(&mut self, name: GLuint) {
        if name == 0 || self.textures.remove(&name).is_none() {
            return;
        }
        for unit in self.texture_units.iter_mut() {
            for binding in unit.iter_mut() {
                if *binding == name {
                    *binding = 0;
                }
            }
        }
        self.detach_everywhere(|a| a.references_texture(name));
    }

    pub(super) fn bind_texture(&mut self, target: GLenum, name: GLuint) -> SoftResult<()> {
        let slot = target_slot(target)?;
        if name != 0 {
            let texture = self.textures.get_mut(&name).ok_or(Failure {
                code: gl::INVALID_OPERATION,
                reason: "not a texture name",
            })?;
            match texture.target {
                Some(t) if t != target => {
                    return fail(gl::INVALID_OPERATION, "texture was created with another target")
                }
                _ => texture.target = Some(target),
            }
        }
        let unit = self.active_unit;
        self.texture_units[unit][slot] = name;
        Ok(())
    }

    pub(super) fn active_texture(&mut self, unit: GLenum) -> SoftResult<()> {
        let index = unit.wrapping_sub(gl::TEXTURE0) as usize;
        ensure(
            unit >= gl::TEXTURE0 && index < self.texture_units.len(),
            gl::INVALID_ENUM,
            "texture unit out of range",
        )?;
        self.active_unit = index;
        Ok(())
    }

    /// Specifies the image of a level. `dims` is 1, 2 or 3, matching the entry point used.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn tex_image(
        &mut self,
        target: GLenum,
        dims: u32,
        level: GLint,
        internal_format: GLint,
        size: [GLsizei; 3],
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    ) -> SoftResult<()> {
        ensure(
            target_dims(target) == dims && target_slot(target).is_ok(),
            gl::INVALID_ENUM,
            "invalid target for this entry point",
        )?;
        check_level(level)?;
        let width = size_arg(size[0], "negative width")?;
        let height = size_arg(size[1], "negative height")?;
        let depth = size_arg(size[2], "negative depth")?;
        ensure(
            width <= MAX_SIZE && height <= MAX_SIZE && depth <= MAX_SIZE,
            gl::INVALID_VALUE,
            "texture too large",
        )?;
        let internal_format = internal_format as GLenum;
        let info = pixels::internal_format(internal_format).ok_or(Failure {
            code: gl::INVALID_VALUE,
            reason: "invalid internal format",
        })?;
        ensure(
            !info.compressed,
            gl::INVALID_OPERATION,
            "compressed internal formats need a compressed upload",
        )?;
        let pixel = PixelFormat::new(format, ty).map_err(|code| Failure {
            code,
            reason: "invalid pixel format or type",
        })?;
        ensure(
            info.class.accepts(pixel.format.class),
            gl::INVALID_OPERATION,
            "pixel format does not match the internal format",
        )?;
        self.bound_texture(target)?;

        let data = self.unpack_texels(pixels, format, ty, dims, width, height, depth)?;
        let mut image = Level::new(width, height, depth, internal_format);
        if let Some((_, texels)) = data {
            for (dst, src) in image.texels.iter_mut().zip(texels) {
                *dst = info.store(src);
            }
        }
        self.bound_texture(target)?.levels.insert(level, image);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn compressed_tex_image_2d(
        &mut self,
        target: GLenum,
        level: GLint,
        internal_format: GLenum,
        width: GLsizei,
        height: GLsizei,
        image_size: GLsizei,
        data: PixelUnpackData,
    ) -> SoftResult<()> {
        ensure(target == gl::TEXTURE_2D, gl::INVALID_ENUM, "invalid target for this entry point")?;
        check_level(level)?;
        let info = pixels::internal_format(internal_format);
        ensure(
            info.map_or(false, |info| info.compressed),
            gl::INVALID_ENUM,
            "not a compressed internal format",
        )?;
        let width = size_arg(width, "negative width")?;
        let height = size_arg(height, "negative height")?;
        let image_size = size_arg(image_size, "negative image size")?;
        self.bound_texture(target)?;

        let blocks = match self.unpack_source(data, image_size)? {
            Some(bytes) => bytes[..image_size].to_vec(),
            None => vec![0; image_size],
        };
        let image = Level {
            width,
            height,
            depth: 1,
            internal_format,
            texels: Vec::new(),
            compressed: Some(blocks),
        };
        self.bound_texture(target)?.levels.insert(level, image);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn tex_sub_image(
        &mut self,
        target: GLenum,
        dims: u32,
        level: GLint,
        offset: [GLint; 3],
        size: [GLsizei; 3],
        format: GLenum,
        ty: GLenum,
        pixels: PixelUnpackData,
    ) -> SoftResult<()> {
        ensure(
            target_dims(target) == dims && target_slot(target).is_ok(),
            gl::INVALID_ENUM,
            "invalid target for this entry point",
        )?;
        check_level(level)?;
        let width = size_arg(size[0], "negative width")?;
        let height = size_arg(size[1], "negative height")?;
        let depth = size_arg(size[2], "negative depth")?;
        ensure(
            offset.iter().all(|&o| o >= 0),
            gl::INVALID_VALUE,
            "negative offset",
        )?;
        let (x0, y0, z0) = (offset[0] as usize, offset[1] as usize, offset[2] as usize);

        let info = {
            let texture = self.bound_texture(target)?;
            let image = texture.levels.get(&level).ok_or(Failure {
                code: gl::INVALID_OPERATION,
                reason: "level has no storage",
            })?;
            ensure(
                image.compressed.is_none(),
                gl::INVALID_OPERATION,
                "level is compressed",
            )?;
            ensure(
                x0 + width <= image.width
                    && y0 + height <= image.height
                    && z0 + depth <= image.depth,
                gl::INVALID_VALUE,
                "region exceeds the level",
            )?;
            image.format().ok_or(Failure {
                code: gl::INVALID_OPERATION,
                reason: "level has no storage",
            })?
        };
        let data = self.unpack_texels(pixels, format, ty, dims, width, height, depth)?;
        let (pixel, texels) = match data {
            Some(data) => data,
            None => return Ok(()),
        };
        ensure(
            info.class.accepts(pixel.format.class),
            gl::INVALID_OPERATION,
            "pixel format does not match the internal format",
        )?;

        let texture = self.bound_texture(target)?;
        if let Some(image) = texture.levels.get_mut(&level) {
            let mut src = texels.into_iter();
            for z in 0..depth {
                for y in 0..height {
                    for x in 0..width {
                        let i = image.index(x0 + x, y0 + y, z0 + z);
                        if let Some(texel) = src.next() {
                            image.texels[i] = info.store(texel);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub(super) fn get_tex_image(
        &mut self,
        target: GLenum,
        level: GLint,
        format: GLenum,
        ty: GLenum,
        pixels: PixelPackData,
    ) -> SoftResult<()> {
        check_level(level)?;
        let pixel = PixelFormat::new(format, ty).map_err(|code| Failure {
            code,
            reason: "invalid pixel format or type",
        })?;
        let dims = target_dims(target);
        let texture = self.bound_texture(target)?;
        let image = match texture.levels.get(&level) {
            Some(image) => image,
            None => return Ok(()),
        };
        ensure(
            image.compressed.is_none(),
            gl::INVALID_OPERATION,
            "compressed images cannot be read back",
        )?;
        let info = image.format().ok_or(Failure {
            code: gl::INVALID_OPERATION,
            reason: "level has no storage",
        })?;
        ensure(
            info.class.accepts(pixel.format.class),
            gl::INVALID_OPERATION,
            "pixel format does not match the internal format",
        )?;
        let (width, height, depth) = (image.width, image.height, image.depth);
        let texels = image.texels.clone();
        self.pack_texels(pixels, &pixel, dims, width, height, depth, &texels)
    }

    pub(super) fn tex_parameter(
        &mut self,
        target: GLenum,
        pname: GLenum,
        value: f32,
    ) -> SoftResult<()> {
        ensure(
            pname != gl::TEXTURE_BORDER_COLOR,
            gl::INVALID_ENUM,
            "border color takes four values",
        )?;
        check_param(pname, value)?;
        self.bound_texture(target)?.params.insert(pname, value);
        Ok(())
    }

    pub(super) fn tex_parameter_fv(
        &mut self,
        target: GLenum,
        pname: GLenum,
        values: &[GLfloat; 4],
    ) -> SoftResult<()> {
        if pname != gl::TEXTURE_BORDER_COLOR {
            return self.tex_parameter(target, pname, values[0]);
        }
        self.bound_texture(target)?.border_color = *values;
        Ok(())
    }

    /// Single-valued parameters only. Border color reads return its red component.
    pub(super) fn get_tex_parameter(&mut self, target: GLenum, pname: GLenum) -> SoftResult<f32> {
        let texture = self.bound_texture(target)?;
        if pname == gl::TEXTURE_BORDER_COLOR {
            return Ok(texture.border_color[0]);
        }
        match texture.params.get(&pname) {
            Some(&value) => Ok(value),
            None => fail(gl::INVALID_ENUM, "unknown texture parameter"),
        }
    }

    pub(super) fn get_tex_level_parameter(
        &mut self,
        target: GLenum,
        level: GLint,
        pname: GLenum,
    ) -> SoftResult<GLint> {
        check_level(level)?;
        let texture = self.bound_texture(target)?;
        let image = texture.levels.get(&level);
        let info = image.and_then(Level::format);
        let value = match pname {
            gl::TEXTURE_WIDTH => image.map_or(0, |i| i.width as GLint),
            gl::TEXTURE_HEIGHT => image.map_or(0, |i| i.height as GLint),
            gl::TEXTURE_DEPTH => image.map_or(0, |i| i.depth as GLint),
            gl::TEXTURE_INTERNAL_FORMAT => image.map_or(gl::RGBA, |i| i.internal_format) as GLint,
            gl::TEXTURE_RED_TYPE
            | gl::TEXTURE_GREEN_TYPE
            | gl::TEXTURE_BLUE_TYPE
            | gl::TEXTURE_ALPHA_TYPE
            | gl::TEXTURE_DEPTH_TYPE => info.map_or(gl::NONE, |f| f.channel_type(pname)) as GLint,
            gl::TEXTURE_COMPRESSED => image.map_or(false, |i| i.compressed.is_some()) as GLint,
            gl::TEXTURE_COMPRESSED_IMAGE_SIZE => match image.and_then(|i| i.compressed.as_ref()) {
                Some(blocks) => blocks.len() as GLint,
                None => return fail(gl::INVALID_OPERATION, "level is not compressed"),
            },
            _ => return fail(gl::INVALID_ENUM, "unknown level parameter"),
        };
        Ok(value)
    }
}
