use crate::api::Gl;
use crate::error::GlResult;
use crate::gl;
use crate::gl::types::*;
use crate::texture::Texture;
use glam::{
    DMat2, DMat3, DMat4, DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Vec2, Vec3,
    Vec4,
};
use std::collections::HashMap;

/// A value that can be assigned to a uniform.
///
/// Matrices are uploaded column-major, untransposed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    IVec2(IVec2),
    IVec3(IVec3),
    IVec4(IVec4),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Double(f64),
    DVec2(DVec2),
    DVec3(DVec3),
    DVec4(DVec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
    DMat2(DMat2),
    DMat3(DMat3),
    DMat4(DMat4),
}

impl UniformValue {
    /// Issues the typed driver call that assigns this value.
    pub fn upload(&self, gl: &Gl, program: GLuint, location: GLint) {
        let (p, l) = (program, location);
        match *self {
            UniformValue::Int(v) => gl.program_uniform_1i(p, l, [v]),
            UniformValue::IVec2(v) => gl.program_uniform_2i(p, l, v.to_array()),
            UniformValue::IVec3(v) => gl.program_uniform_3i(p, l, v.to_array()),
            UniformValue::IVec4(v) => gl.program_uniform_4i(p, l, v.to_array()),
            UniformValue::Float(v) => gl.program_uniform_1f(p, l, [v]),
            UniformValue::Vec2(v) => gl.program_uniform_2f(p, l, v.to_array()),
            UniformValue::Vec3(v) => gl.program_uniform_3f(p, l, v.to_array()),
            UniformValue::Vec4(v) => gl.program_uniform_4f(p, l, v.to_array()),
            UniformValue::Double(v) => gl.program_uniform_1d(p, l, [v]),
            UniformValue::DVec2(v) => gl.program_uniform_2d(p, l, v.to_array()),
            UniformValue::DVec3(v) => gl.program_uniform_3d(p, l, v.to_array()),
            UniformValue::DVec4(v) => gl.program_uniform_4d(p, l, v.to_array()),
            UniformValue::Mat2(m) => gl.program_uniform_matrix_2fv(p, l, false, &m.to_cols_array()),
            UniformValue::Mat3(m) => gl.program_uniform_matrix_3fv(p, l, false, &m.to_cols_array()),
            UniformValue::Mat4(m) => gl.program_uniform_matrix_4fv(p, l, false, &m.to_cols_array()),
            UniformValue::DMat2(m) => {
                gl.program_uniform_matrix_2dv(p, l, false, &m.to_cols_array())
            }
            UniformValue::DMat3(m) => {
                gl.program_uniform_matrix_3dv(p, l, false, &m.to_cols_array())
            }
            UniformValue::DMat4(m) => {
                gl.program_uniform_matrix_4dv(p, l, false, &m.to_cols_array())
            }
        }
    }
}

macro_rules! impl_from_uniform_value {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for UniformValue {
                fn from(v: $t) -> Self {
                    UniformValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_uniform_value!(
    i32 => Int,
    IVec2 => IVec2,
    IVec3 => IVec3,
    IVec4 => IVec4,
    f32 => Float,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    f64 => Double,
    DVec2 => DVec2,
    DVec3 => DVec3,
    DVec4 => DVec4,
    Mat2 => Mat2,
    Mat3 => Mat3,
    Mat4 => Mat4,
    DMat2 => DMat2,
    DMat3 => DMat3,
    DMat4 => DMat4,
);

/// Uniform access for a program.
///
/// Locations are looked up once per name and cached until the program is relinked or recreated.
/// Sampler uniforms get texture units assigned in order of first use.
#[derive(Debug)]
pub struct Uniforms {
    gl: Gl,
    program: GLuint,
    locations: HashMap<String, GLint>,
    units: HashMap<String, u32>,
    next_unit: u32,
}

impl Uniforms {
    pub(crate) fn new(gl: &Gl, program: GLuint) -> Uniforms {
        Uniforms {
            gl: gl.clone(),
            program,
            locations: HashMap::new(),
            units: HashMap::new(),
            next_unit: 0,
        }
    }

    pub(crate) fn reset(&mut self, program: GLuint) {
        self.program = program;
        self.locations.clear();
        self.units.clear();
        self.next_unit = 0;
    }

    /// Location of the uniform `name`, or -1 if the program has no active uniform by that name.
    pub fn location(&mut self, name: &str) -> GlResult<GLint> {
        if let Some(&location) = self.locations.get(name) {
            return Ok(location);
        }
        let location = glcheck!(
            self.gl,
            self.gl.get_uniform_location(self.program, name)
        );
        self.locations.insert(name.to_string(), location);
        Ok(location)
    }

    /// Assigns the uniform `name`. Assigning an inactive uniform is silently ignored.
    pub fn set<V: Into<UniformValue>>(&mut self, name: &str, value: V) -> GlResult<()> {
        let location = self.location(name)?;
        self.set_at(location, value)
    }

    /// Assigns the uniform at `location`.
    pub fn set_at<V: Into<UniformValue>>(&self, location: GLint, value: V) -> GlResult<()> {
        let value = value.into();
        glcheck!(self.gl, value.upload(&self.gl, self.program, location));
        Ok(())
    }

    /// Binds `texture` to the unit assigned to the sampler `name`, assigning the next free unit
    /// on first use. Returns the unit.
    pub fn texture(&mut self, name: &str, texture: &Texture) -> GlResult<u32> {
        let unit = match self.units.get(name) {
            Some(&unit) => unit,
            None => {
                let unit = self.next_unit;
                self.next_unit = self.next_unit.saturating_add(1);
                unit
            }
        };
        self.texture_at_unit(name, unit, texture)
    }

    /// Activates texture unit `unit`, binds `texture` there and points the sampler `name` at it.
    ///
    /// The unit stays active and the texture stays bound.
    pub fn texture_at_unit(&mut self, name: &str, unit: u32, texture: &Texture) -> GlResult<u32> {
        // out-of-range units map to an enum the driver rejects
        let unit_enum = gl::TEXTURE0.saturating_add(unit);
        glcheck!(self.gl, self.gl.active_texture(unit_enum));
        texture.bind()?;
        self.set(name, unit as i32)?;
        self.units.insert(name.to_string(), unit);
        if unit >= self.next_unit {
            self.next_unit = unit.saturating_add(1);
        }
        Ok(unit)
    }

    /// The unit assigned to the sampler `name`, if any.
    pub fn texture_unit(&self, name: &str) -> Option<u32> {
        self.units.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        assert_eq!(UniformValue::from(3i32), UniformValue::Int(3));
        assert_eq!(UniformValue::from(0.5f32), UniformValue::Float(0.5));
        assert_eq!(UniformValue::from(0.25f64), UniformValue::Double(0.25));
        assert_eq!(
            UniformValue::from(Vec3::new(1.0, 2.0, 3.0)),
            UniformValue::Vec3(Vec3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(
            UniformValue::from(DMat2::IDENTITY),
            UniformValue::DMat2(DMat2::IDENTITY)
        );
    }
}
