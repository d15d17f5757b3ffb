//! Shader objects, program linking and uniform storage.
use super::glsl::{self, Interface, Variable};
use super::state::{
    ensure, fail, ActiveUniform, Failure, ProgramObject, ShaderObject, SoftResult, State,
};
use crate::gl;
use crate::gl::types::*;
use crate::uniform::UniformValue;

/// Whether a value of this kind can be assigned to a uniform declared with GLSL type `ty`.
fn accepts(ty: &str, value: &UniformValue) -> bool {
    match value {
        UniformValue::Int(_) => ty == "int" || ty == "bool" || ty.contains("sampler"),
        UniformValue::IVec2(_) => matches!(ty, "ivec2" | "bvec2"),
        UniformValue::IVec3(_) => matches!(ty, "ivec3" | "bvec3"),
        UniformValue::IVec4(_) => matches!(ty, "ivec4" | "bvec4"),
        UniformValue::Float(_) => matches!(ty, "float" | "bool"),
        UniformValue::Vec2(_) => matches!(ty, "vec2" | "bvec2"),
        UniformValue::Vec3(_) => matches!(ty, "vec3" | "bvec3"),
        UniformValue::Vec4(_) => matches!(ty, "vec4" | "bvec4"),
        UniformValue::Double(_) => ty == "double",
        UniformValue::DVec2(_) => ty == "dvec2",
        UniformValue::DVec3(_) => ty == "dvec3",
        UniformValue::DVec4(_) => ty == "dvec4",
        UniformValue::Mat2(_) => matches!(ty, "mat2" | "mat2x2"),
        UniformValue::Mat3(_) => matches!(ty, "mat3" | "mat3x3"),
        UniformValue::Mat4(_) => matches!(ty, "mat4" | "mat4x4"),
        UniformValue::DMat2(_) => matches!(ty, "dmat2" | "dmat2x2"),
        UniformValue::DMat3(_) => matches!(ty, "dmat3" | "dmat3x3"),
        UniformValue::DMat4(_) => matches!(ty, "dmat4" | "dmat4x4"),
    }
}

/// At most `max_length - 1` bytes of `log`, cut on a character boundary.
fn truncated(log: &str, max_length: GLsizei) -> String {
    if max_length <= 1 {
        return String::new();
    }
    let mut end = log.len().min(max_length as usize - 1);
    while !log.is_char_boundary(end) {
        end -= 1;
    }
    log[..end].to_string()
}

fn log_length(log: &str) -> GLint {
    if log.is_empty() {
        0
    } else {
        log.len() as GLint + 1
    }
}

/// Checks that every input of the consuming stage is written by the producing stage.
fn match_interfaces(
    producer: &[&Interface],
    consumer: &[&Interface],
    consumer_name: &str,
    errors: &mut Vec<String>,
) {
    let outputs: Vec<&Variable> = producer.iter().flat_map(|i| i.outputs.iter()).collect();
    for input in consumer.iter().flat_map(|i| i.inputs.iter()) {
        match outputs.iter().find(|o| o.name == input.name) {
            None => errors.push(format!(
                "error: {} input '{}' is not written by the previous stage",
                consumer_name, input.name
            )),
            Some(output) if output.ty != input.ty => errors.push(format!(
                "error: type mismatch on '{}': written as {}, read as {}",
                input.name, output.ty, input.ty
            )),
            Some(_) => {}
        }
    }
}

/// Parses `name` or `name[index]`.
fn split_index(name: &str) -> Option<(&str, Option<usize>)> {
    if !name.ends_with(']') {
        return Some((name, None));
    }
    let open = name.find('[')?;
    let index = name[open + 1..name.len() - 1].parse().ok()?;
    Some((&name[..open], Some(index)))
}

impl State {
    fn shader(&self, name: GLuint) -> SoftResult<&ShaderObject> {
        match self.shaders.get(&name) {
            Some(shader) if !shader.delete_pending => Ok(shader),
            _ if self.programs.contains_key(&name) => fail(gl::INVALID_OPERATION, "not a shader"),
            _ => fail(gl::INVALID_VALUE, "unknown shader name"),
        }
    }

    fn shader_mut(&mut self, name: GLuint) -> SoftResult<&mut ShaderObject> {
        self.shader(name)?;
        self.shaders.get_mut(&name).ok_or(Failure {
            code: gl::INVALID_VALUE,
            reason: "unknown shader name",
        })
    }

    fn program(&self, name: GLuint) -> SoftResult<&ProgramObject> {
        match self.programs.get(&name) {
            Some(program) => Ok(program),
            None if self.shaders.contains_key(&name) => {
                fail(gl::INVALID_OPERATION, "not a program")
            }
            None => fail(gl::INVALID_VALUE, "unknown program name"),
        }
    }

    fn program_mut(&mut self, name: GLuint) -> SoftResult<&mut ProgramObject> {
        self.program(name)?;
        self.programs.get_mut(&name).ok_or(Failure {
            code: gl::INVALID_VALUE,
            reason: "unknown program name",
        })
    }

    pub(super) fn create_shader(&mut self, stage: GLenum) -> SoftResult<GLuint> {
        ensure(
            matches!(
                stage,
                gl::VERTEX_SHADER | gl::FRAGMENT_SHADER | gl::GEOMETRY_SHADER
            ),
            gl::INVALID_ENUM,
            "invalid shader type",
        )?;
        let name = self.new_name();
        self.shaders.insert(
            name,
            ShaderObject {
                stage,
                source: String::new(),
                compiled: false,
                log: String::new(),
                interface: None,
                delete_pending: false,
            },
        );
        Ok(name)
    }

    /// Shaders still attached to a program are only flagged; they go away with the program.
    pub(super) fn delete_shader(&mut self, name: GLuint) -> SoftResult<()> {
        if name == 0 {
            return Ok(());
        }
        self.shader(name)?;
        let attached = self.programs.values().any(|p| p.shaders.contains(&name));
        if attached {
            if let Some(shader) = self.shaders.get_mut(&name) {
                shader.delete_pending = true;
            }
        } else {
            self.shaders.remove(&name);
        }
        Ok(())
    }

    pub(super) fn shader_source(&mut self, name: GLuint, source: &str) -> SoftResult<()> {
        self.shader_mut(name)?.source = source.to_string();
        Ok(())
    }

    pub(super) fn compile_shader(&mut self, name: GLuint) -> SoftResult<()> {
        let shader = self.shader_mut(name)?;
        match glsl::compile(&shader.source, shader.stage == gl::VERTEX_SHADER) {
            Ok(interface) => {
                shader.compiled = true;
                shader.log.clear();
                shader.interface = Some(interface);
            }
            Err(log) => {
                shader.compiled = false;
                shader.log = log;
                shader.interface = None;
            }
        }
        Ok(())
    }

    pub(super) fn get_shader_i(&self, name: GLuint, pname: GLenum) -> SoftResult<GLint> {
        let shader = self.shader(name)?;
        match pname {
            gl::SHADER_TYPE => Ok(shader.stage as GLint),
            gl::COMPILE_STATUS => Ok(shader.compiled as GLint),
            gl::INFO_LOG_LENGTH => Ok(log_length(&shader.log)),
            gl::DELETE_STATUS => Ok(shader.delete_pending as GLint),
            _ => fail(gl::INVALID_ENUM, "unknown shader parameter"),
        }
    }

    pub(super) fn get_shader_info_log(
        &self,
        name: GLuint,
        max_length: GLsizei,
    ) -> SoftResult<String> {
        ensure(max_length >= 0, gl::INVALID_VALUE, "negative log length")?;
        Ok(truncated(&self.shader(name)?.log, max_length))
    }

    pub(super) fn create_program(&mut self) -> GLuint {
        let name = self.new_name();
        self.programs.insert(name, ProgramObject::default());
        name
    }

    pub(super) fn delete_program(&mut self, name: GLuint) -> SoftResult<()> {
        if name == 0 {
            return Ok(());
        }
        self.program(name)?;
        if let Some(program) = self.programs.remove(&name) {
            if self.program == name {
                self.program = 0;
            }
            for shader in program.shaders {
                let orphan = self.shaders.get(&shader).map_or(false, |s| s.delete_pending)
                    && !self.programs.values().any(|p| p.shaders.contains(&shader));
                if orphan {
                    self.shaders.remove(&shader);
                }
            }
        }
        Ok(())
    }

    pub(super) fn attach_shader(&mut self, program: GLuint, shader: GLuint) -> SoftResult<()> {
        self.shader(shader)?;
        let program = self.program_mut(program)?;
        ensure(
            !program.shaders.contains(&shader),
            gl::INVALID_OPERATION,
            "shader already attached",
        )?;
        program.shaders.push(shader);
        Ok(())
    }

    /// Matches stage interfaces and assigns uniform locations. On failure, returns the link log.
    fn link(&self, program: &ProgramObject) -> Result<Vec<ActiveUniform>, String> {
        let mut errors = Vec::new();
        let mut vertex = Vec::new();
        let mut geometry = Vec::new();
        let mut fragment = Vec::new();
        for &name in &program.shaders {
            let shader = match self.shaders.get(&name) {
                Some(shader) => shader,
                None => continue,
            };
            let interface = match (&shader.interface, shader.compiled) {
                (Some(interface), true) => interface,
                _ => {
                    errors.push(format!("error: shader {} is not compiled", name));
                    continue;
                }
            };
            match shader.stage {
                gl::VERTEX_SHADER => vertex.push(interface),
                gl::GEOMETRY_SHADER => geometry.push(interface),
                _ => fragment.push(interface),
            }
        }
        if vertex.is_empty() {
            errors.push("error: no vertex shader attached".to_string());
        }
        if fragment.is_empty() {
            errors.push("error: no fragment shader attached".to_string());
        }
        if !errors.is_empty() {
            return Err(errors.join("\n"));
        }

        if geometry.is_empty() {
            match_interfaces(&vertex, &fragment, "fragment", &mut errors);
        } else {
            match_interfaces(&vertex, &geometry, "geometry", &mut errors);
            match_interfaces(&geometry, &fragment, "fragment", &mut errors);
        }

        let mut uniforms: Vec<ActiveUniform> = Vec::new();
        let mut next_location = 0;
        let declared = vertex
            .iter()
            .chain(geometry.iter())
            .chain(fragment.iter())
            .flat_map(|i| i.uniforms.iter());
        for variable in declared {
            let len = variable.array_len.max(1);
            match uniforms.iter().find(|u| u.name == variable.name) {
                Some(existing) if existing.ty != variable.ty || existing.len != len => {
                    errors.push(format!(
                        "error: uniform '{}' declared as {} and as {}",
                        variable.name, existing.ty, variable
                    ))
                }
                Some(_) => {}
                None => {
                    uniforms.push(ActiveUniform {
                        name: variable.name.clone(),
                        ty: variable.ty.clone(),
                        location: next_location,
                        len,
                    });
                    next_location += len as GLint;
                }
            }
        }

        if errors.is_empty() {
            Ok(uniforms)
        } else {
            Err(errors.join("\n"))
        }
    }

    pub(super) fn link_program(&mut self, name: GLuint) -> SoftResult<()> {
        let result = self.link(self.program(name)?);
        let program = self.program_mut(name)?;
        program.values.clear();
        program.validated = false;
        match result {
            Ok(uniforms) => {
                program.linked = true;
                program.log.clear();
                program.uniforms = uniforms;
            }
            Err(log) => {
                program.linked = false;
                program.log = log;
                program.uniforms.clear();
            }
        }
        Ok(())
    }

    pub(super) fn validate_program(&mut self, name: GLuint) -> SoftResult<()> {
        let program = self.program_mut(name)?;
        program.validated = program.linked;
        if !program.linked {
            program.log = "error: program is not linked".to_string();
        }
        Ok(())
    }

    pub(super) fn get_program_i(&self, name: GLuint, pname: GLenum) -> SoftResult<GLint> {
        let program = self.program(name)?;
        match pname {
            gl::LINK_STATUS => Ok(program.linked as GLint),
            gl::VALIDATE_STATUS => Ok(program.validated as GLint),
            gl::INFO_LOG_LENGTH => Ok(log_length(&program.log)),
            gl::ATTACHED_SHADERS => Ok(program.shaders.len() as GLint),
            gl::DELETE_STATUS => Ok(0),
            _ => fail(gl::INVALID_ENUM, "unknown program parameter"),
        }
    }

    pub(super) fn get_program_info_log(
        &self,
        name: GLuint,
        max_length: GLsizei,
    ) -> SoftResult<String> {
        ensure(max_length >= 0, gl::INVALID_VALUE, "negative log length")?;
        Ok(truncated(&self.program(name)?.log, max_length))
    }

    pub(super) fn use_program(&mut self, name: GLuint) -> SoftResult<()> {
        if name != 0 {
            ensure(self.program(name)?.linked, gl::INVALID_OPERATION, "program is not linked")?;
        }
        self.program = name;
        Ok(())
    }

    fn linked_program(&self, name: GLuint) -> SoftResult<&ProgramObject> {
        let program = self.program(name)?;
        ensure(program.linked, gl::INVALID_OPERATION, "program is not linked")?;
        Ok(program)
    }

    pub(super) fn get_uniform_location(&self, name: GLuint, uniform: &str) -> SoftResult<GLint> {
        let program = self.linked_program(name)?;
        if uniform.starts_with("gl_") {
            return Ok(-1);
        }
        let (base, index) = match split_index(uniform) {
            Some(parts) => parts,
            None => return Ok(-1),
        };
        let location = program
            .uniforms
            .iter()
            .find(|u| u.name == base)
            .and_then(|u| match index {
                None => Some(u.location),
                Some(i) if i < u.len => Some(u.location + i as GLint),
                Some(_) => None,
            });
        Ok(location.unwrap_or(-1))
    }

    pub(super) fn set_uniform(
        &mut self,
        name: GLuint,
        location: GLint,
        value: UniformValue,
    ) -> SoftResult<()> {
        let program = self.linked_program(name)?;
        if location == -1 {
            return Ok(());
        }
        let uniform = program
            .uniforms
            .iter()
            .find(|u| location >= u.location && location < u.location + u.len as GLint)
            .ok_or(Failure {
                code: gl::INVALID_OPERATION,
                reason: "invalid uniform location",
            })?;
        ensure(
            accepts(&uniform.ty, &value),
            gl::INVALID_OPERATION,
            "uniform type mismatch",
        )?;
        if uniform.ty.contains("sampler") {
            if let UniformValue::Int(unit) = value {
                ensure(
                    unit >= 0 && (unit as usize) < self.texture_units.len(),
                    gl::INVALID_VALUE,
                    "sampler unit out of range",
                )?;
            }
        }
        self.program_mut(name)?.values.insert(location, value);
        Ok(())
    }

    pub(super) fn uniform_value(&self, program: GLuint, location: GLint) -> Option<UniformValue> {
        self.programs.get(&program)?.values.get(&location).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_respects_max_length() {
        assert_eq!(truncated("error", 6), "error");
        assert_eq!(truncated("error", 3), "er");
        assert_eq!(truncated("error", 0), "");
        assert_eq!(truncated("é", 2), "");
    }

    #[test]
    fn test_split_index() {
        assert_eq!(split_index("colors"), Some(("colors", None)));
        assert_eq!(split_index("colors[2]"), Some(("colors", Some(2))));
        assert_eq!(split_index("colors[x]"), None);
    }

    #[test]
    fn test_accepts() {
        assert!(accepts("sampler2D", &UniformValue::Int(0)));
        assert!(accepts("bool", &UniformValue::Float(1.0)));
        assert!(!accepts("vec3", &UniformValue::Float(1.0)));
        assert!(accepts("mat4x4", &UniformValue::Mat4(glam::Mat4::IDENTITY)));
    }
}
